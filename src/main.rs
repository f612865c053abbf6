use anyhow::Context as _;
use clap::Parser;
use derek::config::Config;
use derek::permissions::{enabled_feature, permitted_user_feature};
use derek::policy::{PolicyFetcher, PolicySource};
use derek::{command, plan, EventType};
use log::{error, info};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "derek", about = "interpret and authorize Derek comment commands")]
struct Cli {
    /// Read the maintainers list from a local file instead of the repository
    #[arg(long, global = true)]
    policy_file: Option<PathBuf>,
    /// Path of the maintainers list inside the repository
    #[arg(long, global = true)]
    maintainers_file: Option<String>,
    /// Base URL serving raw repository files
    #[arg(long, global = true)]
    host: Option<String>,
    /// Branch the maintainers list is read from
    #[arg(long, global = true)]
    branch: Option<String>,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(clap::Subcommand, Debug)]
enum Cmd {
    /// Print the command contained in a comment body
    Parse { body: String },
    /// Check whether a feature is enabled, or a user may use it
    Check {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        repo: String,
        #[arg(long)]
        feature: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Plan the response to a webhook delivery
    Event {
        #[arg(long, env = "Http_X_Github_Event")]
        event_type: String,
        /// File containing the payload, read from stdin when missing
        #[arg(long)]
        payload: Option<PathBuf>,
    },
}

fn main() {
    init_log();
    if let Err(err) = run() {
        error!("{}", err);
        for cause in err.chain().skip(1) {
            error!("caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

fn init_log() {
    let mut env = env_logger::Builder::new();
    env.format_module_path(false);
    env.filter_module("derek", log::LevelFilter::Info);
    if std::env::var("DEREK_FORCE_COLORS").is_ok() {
        env.write_style(env_logger::WriteStyle::Always);
    }
    if let Ok(content) = std::env::var("RUST_LOG") {
        env.parse_filters(&content);
    }
    env.init();
}

fn policy_source(cli: &Cli) -> anyhow::Result<PolicySource> {
    if let Some(path) = &cli.policy_file {
        return Ok(PolicySource::Local(path.clone()));
    }
    let mut config = Config::from_env();
    if let Some(file) = &cli.maintainers_file {
        config.maintainers_file = file.clone();
    }
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(branch) = &cli.branch {
        config.branch = branch.clone();
    }
    Ok(PolicySource::Remote(PolicyFetcher::new(config)?))
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Cmd::Parse { body } => {
            let command = command::parse(body);
            if command.is_empty() {
                println!("no command");
            } else {
                println!("{}", serde_json::to_string(&command)?);
            }
        }
        Cmd::Check {
            owner,
            repo,
            feature,
            user,
        } => {
            let source = policy_source(&cli)?;
            match user {
                Some(user) => {
                    let permitted = permitted_user_feature(&source, feature, owner, repo, user)?;
                    info!("checked {feature} for {user} on {owner}/{repo}");
                    println!("{}", if permitted { "permitted" } else { "not permitted" });
                }
                None => {
                    let enabled = enabled_feature(&source, feature, owner, repo)?;
                    info!("checked {feature} on {owner}/{repo}");
                    println!("{}", if enabled { "enabled" } else { "disabled" });
                }
            }
        }
        Cmd::Event {
            event_type,
            payload,
        } => {
            let event_type: EventType = event_type.parse()?;
            let payload = match payload {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => std::io::read_to_string(std::io::stdin())
                    .context("failed to read the payload from stdin")?,
            };
            let source = policy_source(&cli)?;
            let plan = plan::plan_event(event_type, &payload, &source)?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
    }

    Ok(())
}
