// tests/integration_test.rs
use chrono::NaiveDate;
use git2::{Repository, Signature};
use release_pr::client::{Git2Client, RepositoryClient, Snapshot};
use release_pr::config::Config;
use release_pr::observer::RecordingObserver;
use release_pr::plan::{PlanOutcome, ReleasePlanner};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_release_pr_help() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "release-pr", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-pr"));
    assert!(stdout.contains("Plan a release pull request"));
    assert!(stdout.contains("--json"));
}

#[test]
fn test_release_pr_version() {
    let output = Command::new("cargo")
        .args(["run", "--bin", "release-pr", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

fn commit(repo: &Repository, path: &str, content: &str, message: &str) -> git2::Oid {
    let workdir = repo.workdir().unwrap();
    std::fs::write(workdir.join(path), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(path)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Release Bot", "bot@example.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn tag(repo: &Repository, name: &str, oid: git2::Oid) {
    let object = repo.find_object(oid, None).unwrap();
    let sig = Signature::now("Release Bot", "bot@example.com").unwrap();
    repo.tag(name, &object, &sig, name, false).unwrap();
}

#[test]
fn test_plan_against_local_repository() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    let released = commit(
        &repo,
        "Cargo.toml",
        "[package]\nname = \"demo\"\nversion = \"1.2.0\"\n",
        "chore(main): release 1.2.0",
    );
    tag(&repo, "v1.2.0", released);
    commit(&repo, "CHANGELOG.md", "# Changelog\n", "docs: start a changelog");
    commit(
        &repo,
        "src.txt",
        "feature",
        "feat(core): add widgets\n\nCloses: #12\n",
    );
    commit(&repo, "notes.txt", "x", "Update notes");

    let client = Git2Client::open(dir.path()).unwrap();
    let branch = client.default_branch().unwrap();

    let mut config = Config::default();
    config.extra_files.push(release_pr::config::ExtraFileConfig {
        path: "Cargo.toml".to_string(),
        kind: release_pr::config::ExtraFileKind::CargoToml,
        template: None,
    });

    let observer = RecordingObserver::new();
    let planner = ReleasePlanner::new(&config, &observer).unwrap();
    let snapshot = Snapshot::capture(&client, &config).unwrap();
    assert_eq!(snapshot.target_branch, branch);

    let outcome = planner
        .plan(&snapshot, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
        .unwrap();
    let plan = match outcome {
        PlanOutcome::Planned(plan) => plan,
        other => panic!("expected a plan, got {:?}", other),
    };

    assert_eq!(plan.current_tag.to_string(), "v1.3.0");
    assert_eq!(plan.commits.len(), 2);
    assert_eq!(plan.pr_title, format!("chore({}): release 1.3.0", branch));
    assert!(plan.changelog_entry.contains("* **core:** add widgets\n"));

    assert_eq!(plan.updates.len(), 2);
    assert_eq!(
        plan.updates[0].content,
        "# Changelog\n\n## 1.3.0 (2026-10-18)\n\n### Features\n\n* **core:** add widgets\n"
    );
    assert!(!plan.updates[0].is_create());
    assert_eq!(
        plan.updates[1].content,
        "[package]\nname = \"demo\"\nversion = \"1.3.0\"\n"
    );

    // "Update notes" is not conventional and only reported
    assert_eq!(observer.warnings().len(), 1);
}

#[test]
fn test_json_output_for_local_repository() {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();
    commit(&repo, "a.txt", "a", "fix: first fix");

    let output = Command::new("cargo")
        .args(["run", "--bin", "release-pr", "--", "--json", "--date", "2026-10-18", "--repo"])
        .arg(dir.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "planned");
    assert_eq!(json["current_tag"], "v0.0.1");
    assert_eq!(json["version"], "0.0.1");
    assert_eq!(json["updates"][0]["path"], "CHANGELOG.md");
    assert!(json["updates"][0]["revision"].is_null());
}
