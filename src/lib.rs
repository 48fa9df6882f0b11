//! # BlockKit
//!
//! An editor engine for the controls of reusable content blocks: typed,
//! user-configurable fields that a block exposes, kept as an ordered list
//! while editing and persisted as a mapping keyed by control name.
//!
//! ## Architecture
//!
//! BlockKit is organized as a workspace with multiple crates:
//!
//! 1. **blockkit-core** - Error taxonomy, name validation, control ids
//! 2. **blockkit-controls** - Control model, type registry, drag reordering,
//!    list store, editor panel, and serialization
//! 3. **blockkit-settings** - Configuration, repositories, editing sessions
//! 4. **blockkit** - Logging setup and the command-line tool
//!
//! ## Features
//!
//! - **Type Dispatch**: every control type maps to an editing widget, extra
//!   fields, a code snippet, and an example output
//! - **Reordering**: pointer-driven drag reordering with midpoint hysteresis
//! - **Safe Saves**: names and labels validated together before every save
//! - **Lossless Round Trip**: unknown persisted fields survive load and save

pub use blockkit_controls::{
    sanitize_variable_name, BlockMetadata, BlockSettings, ControlDefinition, ControlEditorPanel,
    ControlKind, ControlListStore, ControlOption, ControlPatch, DragReorder, EditorWidget,
    ExtraFields, PersistedBlockSettings, TypeDescriptor, TypeRegistry,
};
pub use blockkit_core::{
    generate_control_name, validate_control_name, ControlError, ControlId, Error, Result,
};
pub use blockkit_settings::{
    Config, EditingSession, FileSettingsRepository, InMemorySettingsRepository, SessionState,
    SettingsError, SettingsManager, SettingsRepository,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Compact output on stderr, so command output stays clean
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(LogFormat::default(), 0)
}

/// Initialize logging in `format`; each `verbose` step raises the default level.
pub fn init_logging_with(format: LogFormat, verbose: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false).compact())
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
