use clap::{Parser, Subcommand};
use git_workbench::commands::*;
use git_workbench::core::{
    config::EngineConfig,
    error::{Result, WorkbenchError},
    git::RepositoryClient,
    print_error, print_warning,
    workspace::WorkspaceStore,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-workbench")]
#[command(about = "Repository state engine for terminal git clients")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Repository to operate on (defaults to the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show staged, unstaged and untracked files
    Status,
    /// Show recent commits
    Log {
        /// Number of commits to show
        #[arg(short = 'n', long = "limit")]
        limit: Option<usize>,
        /// Copy the hash of the commit at this position (1-based) to the clipboard
        #[arg(long, value_name = "INDEX")]
        copy: Option<usize>,
    },
    /// List local and remote branches
    Branches,
    /// Switch to a branch
    Checkout {
        /// Create the branch before switching
        #[arg(short = 'b', long = "create")]
        create: bool,
        branch: String,
    },
    /// List stashes
    Stashes,
    /// List tags, newest first
    Tags,
    /// List remotes
    Remotes,
    /// Show the diff of one or more paths
    Diff {
        /// Diff the index against HEAD instead of the working tree against the index
        #[arg(long)]
        staged: bool,
        paths: Vec<PathBuf>,
    },
    /// Stage paths (everything when none are given)
    Add { paths: Vec<PathBuf> },
    /// Unstage paths (everything when none are given)
    Reset { paths: Vec<PathBuf> },
    /// Commit staged changes
    Commit {
        #[arg(short = 'm', long = "message")]
        message: Option<String>,
        /// Amend the last commit, keeping its message unless -m is given
        #[arg(long)]
        amend: bool,
    },
    /// Merge a branch into the current branch
    Merge { branch: String },
    /// Show the files left conflicted by a merge
    Conflicts,
    /// Resolve a conflicted file by picking one side
    Resolve {
        path: PathBuf,
        #[arg(long, conflicts_with = "theirs")]
        ours: bool,
        #[arg(long)]
        theirs: bool,
    },
    /// Abort the merge in progress
    AbortMerge,
    /// Push the current branch
    Push {
        remote: Option<String>,
        /// Set the pushed branch as upstream
        #[arg(short = 'u', long = "set-upstream")]
        set_upstream: bool,
    },
    /// Pull the current branch
    Pull,
    /// Fetch every remote, pruning deleted branches
    Fetch,
    /// Print a summary every time the repository changes
    Watch,
    /// Recent repositories and sessions
    Workspace {
        #[command(subcommand)]
        action: WorkspaceAction,
    },
}

#[derive(Subcommand)]
enum WorkspaceAction {
    /// Remember a repository (defaults to the current one)
    Add { path: Option<PathBuf> },
    /// List recently used repositories
    Recent,
    /// List sessions
    Sessions,
    /// Create a session from a set of repositories
    Create { name: String, paths: Vec<PathBuf> },
    /// Delete a session by id or name
    Delete { session: String },
    /// Make a session the active one
    Use { session: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    env_logger::Builder::new()
        .parse_filters(if cli.debug { "debug" } else { "info" })
        .init();

    if let Err(e) = run(cli).await {
        if let WorkbenchError::NotInGitRepo = e {
            print_error("Not in a git repository");
        } else {
            print_error(&e.to_string());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::load_or_create().unwrap_or_else(|e| {
        print_warning(&format!("Using default settings: {e}"));
        EngineConfig::default()
    });
    let debug = cli.debug;
    let repo_path = match cli.repo {
        Some(path) => path,
        None => env::current_dir()?,
    };

    if let Commands::Workspace { action } = cli.command {
        return run_workspace(action, &repo_path).await;
    }

    let client = RepositoryClient::open(&repo_path, &config)?;
    let result = match cli.command {
        Commands::Status => execute_status(&client).await,
        Commands::Log { limit, copy } => {
            execute_log(&client, limit.unwrap_or(config.log_limit), copy).await
        }
        Commands::Branches => execute_branches(&client).await,
        Commands::Checkout { create, branch } => execute_checkout(&client, &branch, create).await,
        Commands::Stashes => execute_stashes(&client).await,
        Commands::Tags => execute_tags(&client).await,
        Commands::Remotes => execute_remotes(&client).await,
        Commands::Diff { staged, paths } => execute_diff(&client, &paths, staged).await,
        Commands::Add { paths } => execute_add(&client, &paths).await,
        Commands::Reset { paths } => execute_reset(&client, &paths).await,
        Commands::Commit { message, amend } => {
            execute_commit(&client, message.as_deref(), amend).await
        }
        Commands::Merge { branch } => execute_merge(&client, &branch).await,
        Commands::Conflicts => execute_conflicts(&client).await,
        Commands::Resolve { path, ours, theirs } => {
            execute_resolve(&client, &path, ours, theirs).await
        }
        Commands::AbortMerge => execute_abort_merge(&client).await,
        Commands::Push {
            remote,
            set_upstream,
        } => execute_push(&client, remote.as_deref(), set_upstream).await,
        Commands::Pull => execute_pull(&client).await,
        Commands::Fetch => execute_fetch(&client).await,
        Commands::Watch => execute_watch(&client, config.debounce()).await,
        Commands::Workspace { .. } => Ok(()),
    };

    if debug {
        print_activity(&client.activity());
    }

    result
}

async fn run_workspace(action: WorkspaceAction, repo_path: &std::path::Path) -> Result<()> {
    let store = WorkspaceStore::open_default()?;
    store.initialize().await?;

    match action {
        WorkspaceAction::Add { path } => {
            let target = match path {
                Some(path) => path,
                None => RepositoryClient::open(repo_path, &EngineConfig::default())?
                    .workdir()
                    .to_path_buf(),
            };
            execute_workspace_add(&store, &target).await
        }
        WorkspaceAction::Recent => execute_workspace_recent(&store).await,
        WorkspaceAction::Sessions => execute_workspace_sessions(&store).await,
        WorkspaceAction::Create { name, paths } => {
            execute_workspace_create(&store, &name, &paths).await
        }
        WorkspaceAction::Delete { session } => execute_workspace_delete(&store, &session).await,
        WorkspaceAction::Use { session } => execute_workspace_use(&store, &session).await,
    }
}
