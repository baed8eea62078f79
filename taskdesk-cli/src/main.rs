//! Taskdesk CLI - users and tasks from your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{config, login, openapi, register, request, status, tasks};

/// Taskdesk - users and tasks stored as JSON documents
#[derive(Parser)]
#[command(name = "td", version, about, long_about = None)]
struct Cli {
    /// Data directory (defaults to $TASKDESK_DIR or ~/.taskdesk)
    #[arg(long, global = true, env = "TASKDESK_DIR")]
    data_dir: Option<PathBuf>,

    /// Log store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new user
    Register {
        /// Username (must be unique)
        username: String,
        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a username/password pair
    Login {
        /// Username
        username: String,
        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List or create tasks
    Tasks {
        #[command(subcommand)]
        command: tasks::TasksCommands,
    },

    /// Show record counts and file locations
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a request through the api dispatcher
    Request {
        /// HTTP method (GET, POST, ...)
        method: String,
        /// Request path, e.g. /api/tasks
        path: String,
        /// Caller user ID sent in the userid header
        #[arg(long)]
        caller: Option<String>,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },

    /// Print the OpenAPI document
    Openapi,

    /// Change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = commands::resolve_data_dir(cli.data_dir);
    match cli.command {
        Commands::Register {
            username,
            password,
            admin,
            json,
        } => register::run(&data_dir, &username, password, admin, json),
        Commands::Login {
            username,
            password,
            json,
        } => login::run(&data_dir, &username, password, json),
        Commands::Tasks { command } => tasks::run(&data_dir, command),
        Commands::Status { json } => status::run(&data_dir, json),
        Commands::Request {
            method,
            path,
            caller,
            body,
        } => request::run(&data_dir, &method, &path, caller.as_deref(), body.as_deref()),
        Commands::Openapi => openapi::run(),
        Commands::Config { command } => config::run(&data_dir, command),
    }
}
