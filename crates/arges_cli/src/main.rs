//! CLI entry point for the Arges catalog.
//!
//! # Responsibility
//! - Boot an in-memory catalog (optionally with the sample books).
//! - Run one catalog operation and print its JSON response.
//!
//! # Invariants
//! - Mandatory argument checks happen in `arges_core::api`, not here, so the
//!   CLI reports the same errors as any other caller.
//! - State never outlives the process.

use arges_core::{
    default_log_level, execute, init_logging, load_sample_catalog, AuthorSelection,
    BookSelection, DataService, Request,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

/// Arges - in-memory book/author catalog
#[derive(Parser, Debug)]
#[command(name = "arges")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace|debug|info|warn|error); requires --log-dir
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Start from an empty catalog instead of the sample books
    #[arg(long, global = true)]
    empty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List books
    Books {
        /// Resolve each book's author
        #[arg(long)]
        with_author: bool,
    },
    /// List authors
    Authors {
        /// Resolve each author's books
        #[arg(long)]
        with_books: bool,
    },
    /// Add a book, reusing the author when the name already exists
    AddBook {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Remove a book by id
    RemoveBook {
        #[arg(long)]
        id: Option<String>,
    },
    /// Run a raw JSON request, e.g. '{"op":"books","select":{"author":{}}}'
    Request { json: String },
}

impl Command {
    fn into_request(self) -> Result<Request, arges_core::ApiError> {
        Ok(match self {
            Self::Books { with_author } => Request::Books {
                select: if with_author {
                    BookSelection::with_author()
                } else {
                    BookSelection::default()
                },
            },
            Self::Authors { with_books } => Request::Authors {
                select: if with_books {
                    AuthorSelection::with_books()
                } else {
                    AuthorSelection::default()
                },
            },
            Self::AddBook { title, author } => Request::AddBook {
                title,
                author,
                select: BookSelection::with_author(),
            },
            Self::RemoveBook { id } => Request::RemoveBook {
                id,
                select: BookSelection::default(),
            },
            Self::Request { json } => Request::from_json(&json)?,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, String> {
    if let Some(log_dir) = cli.log_dir.as_ref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let service = DataService::in_memory().map_err(|err| err.to_string())?;
    if !cli.empty {
        load_sample_catalog(&service).map_err(|err| err.to_string())?;
    }

    let request = cli.command.into_request().map_err(|err| err.to_string())?;
    info!(
        "event=cli_request module=cli status=start op={}",
        request.operation()
    );
    let response = execute(&service, request).map_err(|err| err.to_string())?;
    let value = response.to_json().map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&value).map_err(|err| err.to_string())
}
