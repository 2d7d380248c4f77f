//! Domain logic - pure release rules independent of any repository client

pub mod branch;
pub mod commit;
pub mod tag;
pub mod version;

pub use branch::ReleaseBranch;
pub use commit::{ClassifiedCommit, CommitType, Footer, RawCommit};
pub use tag::{TagName, TagSeparator};
pub use version::{Version, VersionBump};
