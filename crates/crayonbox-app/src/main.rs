//! Crayonbox command-line entry point.

use clap::{Parser, Subcommand};
use crayonbox_app::{ReplayError, Replayer, Script, load_config};
use crayonbox_core::session::{DrawingSession, Owner};
use crayonbox_core::shortcuts::ShortcutRegistry;
use crayonbox_core::stickers::StickerCatalog;
use crayonbox_core::storage::FileStorage;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "crayonbox")]
#[command(version, about = "Headless runner for the Crayonbox drawing canvas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded input script and write the resulting images
    Replay {
        /// Path to the JSON script
        script: PathBuf,

        /// Output directory for display.png, thumbnail.jpg and snapshots
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Session config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Storage directory for saved artworks (defaults to the platform data dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Owner id that saved artworks belong to
        #[arg(long, default_value = "local")]
        owner: String,

        /// Owner display name
        #[arg(long, default_value = "Artist")]
        owner_name: String,
    },

    /// List keyboard shortcuts
    Shortcuts,

    /// List the sticker catalog and unlock thresholds
    Catalog,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            script,
            out,
            config,
            data_dir,
            owner,
            owner_name,
        } => replay(script, out, config, data_dir, Owner::new(owner, owner_name)),
        Commands::Shortcuts => {
            ShortcutRegistry::print_all();
            Ok(())
        }
        Commands::Catalog => {
            print_catalog();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn replay(
    script: PathBuf,
    out: PathBuf,
    config: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    owner: Owner,
) -> Result<(), ReplayError> {
    let config = load_config(config.as_deref())?;
    let script = Script::from_path(&script)?;
    let storage = Arc::new(match data_dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    });
    log::info!("Storing artworks in {}", storage.base_path().display());

    let session = DrawingSession::new(config, owner, storage.clone(), storage)?;
    let summary = Replayer::new(session, script.bounds, out).run(&script.steps)?;

    println!("Replayed {} steps", summary.steps);
    for title in &summary.saved {
        println!("  saved: {}", title);
    }
    for sticker in &summary.unlocked {
        println!("  unlocked: {}", sticker);
    }
    for path in &summary.outputs {
        println!("  wrote: {}", path.display());
    }
    Ok(())
}

fn print_catalog() {
    println!("\n=== Stickers ===");
    for entry in StickerCatalog::default().entries() {
        println!(
            "  {:3} {:2} {:12} {}",
            entry.unlock_threshold, entry.glyph, entry.name, entry.description
        );
    }
    println!();
}
