pub mod analyzer;
pub mod boundary;
pub mod changelog;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod observer;
pub mod plan;
pub mod ui;
pub mod updater;

pub use error::{ReleaseError, Result};
