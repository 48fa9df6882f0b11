//! BlockKit command-line tool
//!
//! Inspects and edits the controls of stored blocks.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use blockkit::{init_logging_with, LogFormat, BUILD_DATE, VERSION};
use blockkit_controls::{validate_controls, TypeRegistry};
use blockkit_settings::{
    Config, EditingSession, FileSettingsRepository, SettingsManager, SettingsRepository,
};

/// Command-line arguments for blockkit
#[derive(Parser, Debug)]
#[command(name = "blockkit")]
#[command(
    version,
    about = "Define the typed, ordered controls of content blocks",
    long_about = None
)]
struct Cli {
    /// Configuration file path (JSON or TOML)
    #[arg(short, long, global = true, env = "BLOCKKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available control types
    Types,
    /// List stored blocks
    List,
    /// Show a block's controls in order, with their generated code
    Show { block: String },
    /// Add a control to a block
    Add {
        block: String,
        /// Control type key
        #[arg(long = "type", default_value = "text")]
        control_type: String,
        #[arg(long)]
        label: String,
        /// Control name; derived from the label when omitted
        #[arg(long)]
        name: Option<String>,
    },
    /// Duplicate a control, appending the copy
    Duplicate { block: String, name: String },
    /// Remove a control
    Remove { block: String, name: String },
    /// Move the control at one position to another (zero-based)
    Move { block: String, from: usize, to: usize },
    /// Run save validation without saving
    Check { block: String },
}

/// Everything a command needs from the configuration.
struct App {
    config: Config,
    registry: Arc<TypeRegistry>,
    repository: Arc<dyn SettingsRepository>,
}

impl App {
    fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let manager = match config_path {
            Some(path) => SettingsManager::load(path),
            None => SettingsManager::new(),
        }
        .context("Failed to load configuration")?;
        let config = manager.config().clone();

        let registry = config
            .type_registry()
            .context("Failed to load control types")?;
        let repository = FileSettingsRepository::new(config.repository.data_dir.clone());
        tracing::debug!("Using block directory {}", repository.data_dir().display());

        Ok(Self {
            config,
            registry: Arc::new(registry),
            repository: Arc::new(repository),
        })
    }

    async fn open(&self, block: &str) -> Result<EditingSession> {
        let mut session = EditingSession::new(
            block,
            Arc::clone(&self.repository),
            Arc::clone(&self.registry),
        )
        .with_editor_settings(self.config.editor.clone());
        session
            .load()
            .await
            .with_context(|| format!("Failed to open block '{}'", block))?;
        Ok(session)
    }
}

fn find_control(session: &EditingSession, name: &str) -> Result<usize> {
    match session.store().iter().position(|c| c.name.trim() == name) {
        Some(index) => Ok(index),
        None => bail!("Block '{}' has no control named '{}'", session.block_id(), name),
    }
}

async fn save(session: &mut EditingSession) -> Result<()> {
    session
        .save()
        .await
        .with_context(|| format!("Failed to save block '{}'", session.block_id()))
}

fn print_types(registry: &TypeRegistry) {
    for descriptor in registry.descriptors() {
        println!(
            "{:<10} {:<10} {:<8} {}",
            descriptor.key,
            descriptor.label,
            descriptor.value_kind.to_string(),
            descriptor.description
        );
    }
}

fn print_block(session: &EditingSession) {
    let store = session.store();
    let registry = store.registry();
    println!("{} ({} controls)", session.metadata().title, store.len());

    for (index, control) in store.iter().enumerate() {
        println!(
            "{:>3}. {} [{}] {}",
            index,
            control.display_label(),
            control.name,
            registry.label_for(&control.control_type)
        );
        let code = registry.code_for(&control.control_type, &control.name);
        if !code.is_empty() {
            println!("     {}", code);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = App::load(cli.config.as_ref())?;

    match cli.command {
        Command::Types => print_types(&ctx.registry),
        Command::List => {
            for block in ctx.repository.list().await.context("Failed to list blocks")? {
                println!("{}", block);
            }
        }
        Command::Show { block } => {
            let session = ctx.open(&block).await?;
            print_block(&session);
        }
        Command::Add {
            block,
            control_type,
            label,
            name,
        } => {
            if !ctx.registry.contains(&control_type) {
                bail!("Unknown control type '{}'", control_type);
            }
            let mut session = ctx.open(&block).await?;
            let id = session.add_control(&control_type);
            let index = session.store().len() - 1;

            let (panel, store) = session.editor_mut();
            panel.on_label_input(store, index, &label);
            match name {
                Some(name) => {
                    panel.on_name_input(store, index, &name);
                    panel.on_name_blur(store, index);
                }
                None => {
                    panel.on_label_blur(store, index);
                }
            }

            save(&mut session).await?;
            tracing::info!("Added control {} to '{}'", id, block);
            print_block(&session);
        }
        Command::Duplicate { block, name } => {
            let mut session = ctx.open(&block).await?;
            let index = find_control(&session, &name)?;
            session.store_mut().duplicate(index);
            save(&mut session).await?;
            print_block(&session);
        }
        Command::Remove { block, name } => {
            let mut session = ctx.open(&block).await?;
            let index = find_control(&session, &name)?;
            session.store_mut().remove(index);
            save(&mut session).await?;
            print_block(&session);
        }
        Command::Move { block, from, to } => {
            let mut session = ctx.open(&block).await?;
            let len = session.store().len();
            if from >= len || to >= len {
                bail!("Positions must be below {} for block '{}'", len, block);
            }
            session.store_mut().move_control(from, to);
            save(&mut session).await?;
            print_block(&session);
        }
        Command::Check { block } => {
            let session = ctx.open(&block).await?;
            validate_controls(session.store().controls())?;
            println!("{}: {} controls, ready to save", block, session.store().len());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging_with(cli.log_format, cli.verbose)?;
    tracing::debug!("blockkit v{} (built {})", VERSION, BUILD_DATE);

    run(cli).await
}
