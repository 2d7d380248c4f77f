use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use release_pr::cli::orchestration::plan_release;
use release_pr::client::Git2Client;
use release_pr::config;
use release_pr::observer::TracingObserver;
use release_pr::ui;

#[derive(clap::Parser)]
#[command(
    name = "release-pr",
    version,
    about = "Plan a release pull request from conventional commit history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = ".", help = "Path inside the git repository")]
    repo: String,

    #[arg(short, long, help = "Target branch (defaults to the repository default branch)")]
    branch: Option<String>,

    #[arg(long, help = "Release date for the changelog heading (YYYY-MM-DD)")]
    date: Option<NaiveDate>,

    #[arg(long, help = "Print the plan as JSON")]
    json: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "release_pr=info".into()),
    );

    // stdout is reserved for the plan
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref()).context("Error loading config")?;
    if let Some(branch) = args.branch {
        config.target_branch = Some(branch);
    }

    let client = Git2Client::open(&args.repo)
        .with_context(|| format!("Cannot open git repository at {}", args.repo))?;

    if !args.json {
        ui::display_status("Reading repository history...");
    }
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let outcome = plan_release(&client, &config, &TracingObserver, date)?;

    if args.json {
        ui::display_outcome_json(&outcome)?;
    } else {
        ui::display_outcome(&outcome);
        if outcome.is_planned() {
            ui::display_success("Release plan ready");
        }
    }

    Ok(())
}
