// ABOUTME: Command-line front end for saving and opening folder layouts in a vault on disk.
// ABOUTME: Reads and writes the host's workspace document around each command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fl_app::{DocumentWorkspace, FolderLayout, OpenOutcome};
use fl_core::{Modifier, Settings, Vault};
use fl_input::ModifierState;
use fl_store::FsVault;

#[derive(Parser, Debug)]
#[command(name = "folder-layout")]
#[command(about = "Save and restore per-folder window layouts")]
#[command(version)]
struct Cli {
    /// Vault directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Config file (defaults to ~/.config/folder-layout/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the split threshold from the config
    #[arg(long, value_name = "N")]
    threshold: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save the current arrangement as the folder's layout
    Save { folder: String },
    /// Restore the folder's saved layout, or open its default layout
    Open { folder: String },
    /// Open every file in the folder
    OpenDefault { folder: String },
    /// Simulate an explorer click on the folder
    Click {
        folder: String,
        /// Keys held during the click: key codes (AltLeft, KeyD) or modifier names (alt, ctrl)
        #[arg(long, num_args = 1..)]
        held: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::load_or_default(),
    };
    if let Some(threshold) = cli.threshold {
        settings.split_threshold = threshold;
    }
    settings.validate()?;

    let root = match cli.vault {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading current directory")?,
    };
    tracing::info!("Using vault {}", root.display());

    let vault = FsVault::new(root);
    let mut workspace = DocumentWorkspace::load(&vault).context("loading workspace document")?;
    let mut plugin = FolderLayout::new(vault, settings);

    let result = run(&mut plugin, &mut workspace, cli.command);

    for notice in workspace.take_notices() {
        println!("{}", notice);
    }
    workspace
        .save(plugin.controller_mut().vault_mut())
        .context("saving workspace document")?;
    result
}

fn run(
    plugin: &mut FolderLayout<FsVault>,
    workspace: &mut DocumentWorkspace,
    command: Command,
) -> Result<()> {
    let controller = plugin.controller_mut();
    match command {
        Command::Save { folder } => {
            controller.save(workspace, &folder)?;
            println!("Saved layout for {}", folder);
        }
        Command::Open { folder } => match controller.open(workspace, &folder)? {
            OpenOutcome::Restored => println!("Restored layout for {}", folder),
            OpenOutcome::Default(layout) => println!("No saved layout; opened {:?}", layout),
            OpenOutcome::Fallback { reason, layout } => {
                println!("{}; opened {:?} instead", reason, layout)
            }
        },
        Command::OpenDefault { folder } => {
            let layout = controller.open_default(workspace, &folder)?;
            println!("Opened {:?}", layout);
        }
        Command::Click { folder, held } => {
            let listing = controller.vault().list_recursive("")?;
            plugin.explorer_changed(listing);

            let mut modifiers = ModifierState::empty();
            for key in &held {
                match Modifier::from_label(key) {
                    Some(m) => modifiers = modifiers.with(m),
                    None => plugin.key_down(workspace, key),
                }
            }
            let consumed = plugin.click(workspace, &folder, modifiers);
            plugin.focus_lost(workspace);
            if !consumed {
                println!("Click on {} passed through", folder);
            }
        }
    }
    Ok(())
}
