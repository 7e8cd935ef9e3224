//! Docsnap - document snapshots, diffs and merges.
//!
//! This is the main entry point for the docsnap CLI.

mod commands;

use clap::{Parser, Subcommand};
use docsnap_core::{Config, Context};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docsnap")]
#[command(author, version, about = "Snapshot, compare and merge documents", long_about = None)]
struct Cli {
    /// Print logs to stderr at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the version index and snapshot copies
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture the current state of a document
    Snapshot {
        path: PathBuf,

        /// Remark stored with the snapshot
        #[arg(short = 'm', long = "message", default_value = "")]
        remark: String,
    },
    /// List snapshots of a document, newest first
    List {
        /// Document name (file name of the captured document)
        document: String,

        #[arg(long)]
        json: bool,
    },
    /// List documents that have snapshots
    Documents,
    /// Print the text of a snapshot
    Show { document: String, id: String },
    /// Delete a snapshot
    Delete { document: String, id: String },
    /// Overwrite the live document with a snapshot
    Restore { document: String, id: String },
    /// Undo the most recent restore
    Undo,
    /// Compare two document files
    Diff {
        path_a: PathBuf,
        path_b: PathBuf,

        /// Print the structured result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare a snapshot with another snapshot or with the live document
    Compare {
        document: String,
        id: String,

        /// Second snapshot (defaults to the live document)
        other: Option<String>,
    },
    /// Three-way merge remote changes into a working document
    Merge {
        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        remote: PathBuf,

        /// Working document that receives the merge
        #[arg(long = "into")]
        work: PathBuf,

        /// Print the merged text instead of writing it
        #[arg(long)]
        preview: bool,
    },
    /// Show the effective configuration
    Config,
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    let (mut config, sources) = Config::load(Some(cwd.as_path())).await?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    docsnap_util::log::init(config.log_config(cli.verbose));
    tracing::debug!(sources = ?sources, "Configuration loaded");

    match cli.command {
        Commands::Config => return show_config(&config, &sources),
        Commands::Version => {
            print_version();
            return Ok(());
        }
        _ => {}
    }

    let ctx = Context::open(config).await?;
    let store = ctx.store();

    match cli.command {
        Commands::Snapshot { path, remark } => {
            commands::create_snapshot(store, &path, &remark).await
        }
        Commands::List { document, json } => commands::list_snapshots(store, &document, json).await,
        Commands::Documents => commands::list_documents(store).await,
        Commands::Show { document, id } => commands::show_snapshot(store, &document, &id).await,
        Commands::Delete { document, id } => commands::delete_snapshot(store, &document, &id).await,
        Commands::Restore { document, id } => {
            commands::restore_snapshot(store, &document, &id).await
        }
        Commands::Undo => commands::undo_restore(store).await,
        Commands::Diff {
            path_a,
            path_b,
            json,
        } => commands::diff_files(store, &path_a, &path_b, json).await,
        Commands::Compare {
            document,
            id,
            other,
        } => commands::compare_snapshot(store, &document, &id, other.as_deref()).await,
        Commands::Merge {
            base,
            remote,
            work,
            preview,
        } => commands::merge(store, &base, &remote, &work, preview).await,
        Commands::Config | Commands::Version => Ok(()),
    }
}

fn show_config(config: &Config, sources: &[PathBuf]) -> anyhow::Result<()> {
    println!("Configuration sources:");
    if sources.is_empty() {
        println!("  (none)");
    } else {
        for source in sources {
            println!("  {}", source.display());
        }
    }
    println!();

    println!("Data directory: {}", display_data_dir(config));
    println!();

    println!("Current configuration:");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn display_data_dir(config: &Config) -> String {
    config
        .resolved_data_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|e| format!("<{e}>"))
}

/// Print version information.
fn print_version() {
    println!("docsnap {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Snapshots, diffs and merges for text, Markdown and structured documents.");
    println!();
    println!("Data directory default: {}", default_data_dir().display());
}

fn default_data_dir() -> PathBuf {
    docsnap_util::path::data_dir().unwrap_or_else(|| Path::new("<unknown>").to_path_buf())
}
