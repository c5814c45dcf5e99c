use clap::{Parser, Subcommand};
use repo_mirror::commands::*;
use repo_mirror::core::{
    error::{RepoMirrorError, Result},
    print_error,
};
use std::env;

#[derive(Parser)]
#[command(name = "repo-mirror")]
#[command(about = "Cached, change-aware view of a git repository's state")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the mirrored working tree status
    Status,
    /// Show local branches
    Branches {
        /// Also list remote branches
        #[arg(short, long)]
        remote: bool,
    },
    /// Show the mirrored commit history
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show files locked through git LFS
    Locks,
    /// Show the configured git user
    User,
    /// Show repository name, branch and remote
    Info,
    /// Refresh every cache and print the events it fires
    Refresh,
    /// List caches with their last update and verification times
    Caches,
    /// Invalidate a cache (branches, log, repository-info, status, locks, user, or all)
    Invalidate {
        /// Cache name, or "all"
        target: String,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Status => execute_status(),
        Commands::Branches { remote } => execute_branches(remote),
        Commands::Log { limit } => execute_log(limit),
        Commands::Locks => execute_locks(),
        Commands::User => execute_user(),
        Commands::Info => execute_info(),
        Commands::Refresh => execute_refresh(),
        Commands::Caches => execute_caches(),
        Commands::Invalidate { target } => execute_invalidate(&target),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli.command) {
        if let RepoMirrorError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }
}
