//! hrl - OpenHR20 layout lookup tool
//!
//! Resolves EEPROM and trace field names to slots and back, decodes device
//! reports captured from the serial console, and prints the commands that
//! read or write a layout's slots.

use clap::{Parser, Subcommand};
use hr20_layout::config::{error::ConfigError, loader::ConfigLoader, schema::Config, xdg};
use hr20_layout::{
    logging, CatalogError, LayoutCatalog, LayoutKind, LayoutRegistry, RawRecord, Result,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// OpenHR20 layout lookup tool
#[derive(Parser)]
#[command(name = "hrl")]
#[command(version, about = "OpenHR20 EEPROM and trace layout lookup")]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/hr20-layout/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the hrl CLI
#[derive(Subcommand)]
enum Commands {
    /// List every field of a layout
    Fields {
        /// Record space: eeprom or trace
        kind: LayoutKind,
        /// Layout version in hex (default: newest known)
        #[arg(long, value_parser = parse_version)]
        version: Option<u16>,
    },

    /// Look up a field by name or slot (decimal or 0x-prefixed hex)
    Lookup {
        /// Record space: eeprom or trace
        kind: LayoutKind,
        /// Field name or slot index
        key: String,
        /// Layout version in hex (default: newest known)
        #[arg(long, value_parser = parse_version)]
        version: Option<u16>,
    },

    /// Decode a captured device report ("-" reads stdin)
    Decode {
        /// Record space: eeprom or trace
        kind: LayoutKind,
        /// Report file
        file: PathBuf,
        /// Layout version in hex (default: the version the report carries)
        #[arg(long, value_parser = parse_version)]
        version: Option<u16>,
    },

    /// Print the device commands that read every slot of a layout
    ReadCommands {
        /// Record space: eeprom or trace
        kind: LayoutKind,
        /// Layout version in hex (default: newest known)
        #[arg(long, value_parser = parse_version)]
        version: Option<u16>,
    },

    /// Print the EEPROM write command for a field
    Set {
        /// Field name
        name: String,
        /// Byte value (decimal or 0x-prefixed hex)
        #[arg(value_parser = parse_number)]
        value: u32,
        /// Layout version in hex (default: newest known)
        #[arg(long, value_parser = parse_version)]
        version: Option<u16>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show configuration file path
    Path,
    /// Validate configuration and layout files
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log.level);

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> std::result::Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load_default(),
    }
}

fn run(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Config { action } => match action {
            ConfigAction::Path => println!("{}", xdg::config_path().display()),
            ConfigAction::Validate => {
                let catalog = ConfigLoader::load_catalog(config)?;
                println!("Configuration is valid ({} layouts)", catalog.len());
            }
        },
        command => {
            let catalog = ConfigLoader::load_catalog(config)?;
            run_layout_command(command, &catalog)?;
        }
    }
    Ok(())
}

fn run_layout_command(command: Commands, catalog: &LayoutCatalog) -> Result<()> {
    match command {
        Commands::Fields { kind, version } => {
            let layout = select(catalog, kind, version)?;
            for field in layout.fields() {
                println!(
                    "{:#04x}  {:<26} {}",
                    field.index, field.name, field.description
                );
            }
        }
        Commands::Lookup { kind, key, version } => {
            let layout = select(catalog, kind, version)?;
            let (index, name) = match parse_number(&key) {
                Ok(index) => (index, layout.lookup_name(index)?),
                Err(_) => (layout.lookup_index(&key)?, key.as_str()),
            };
            println!("{:#04x}  {}  {}", index, name, layout.describe(name)?);
        }
        Commands::Decode {
            kind,
            file,
            version,
        } => {
            let text = read_report(&file)?;
            let record = RawRecord::parse_report(&text, kind)?;
            let layout = match version {
                Some(_) => select(catalog, kind, version)?,
                None => catalog.for_record(kind, &record)?,
            };
            for decoded in layout.decode(&record) {
                let value = decoded
                    .value
                    .map(|v| format!("{:>5}", v))
                    .unwrap_or_else(|| "    -".to_string());
                println!(
                    "{:#04x}  {:<26} {}  {}",
                    decoded.field.index, decoded.field.name, value, decoded.field.description
                );
            }
            for slot in layout.unmapped_slots(&record) {
                eprintln!("warning: slot {:#04x} is not part of {}", slot, layout.label());
            }
        }
        Commands::ReadCommands { kind, version } => {
            let layout = select(catalog, kind, version)?;
            for command in layout.read_commands(kind) {
                println!("{}", command);
            }
        }
        Commands::Set {
            name,
            value,
            version,
        } => {
            let layout = select(catalog, LayoutKind::Eeprom, version)?;
            println!("{}", layout.format_write_command(&name, value)?);
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Layout for `kind` at `version`, or the newest one when unspecified.
fn select(
    catalog: &LayoutCatalog,
    kind: LayoutKind,
    version: Option<u16>,
) -> std::result::Result<&LayoutRegistry, CatalogError> {
    match version {
        Some(version) => catalog
            .get(kind, version)
            .ok_or(CatalogError::UnsupportedVersion { kind, version }),
        None => catalog
            .latest(kind)
            .map(|(_, layout)| layout)
            .ok_or(CatalogError::MissingVersion { kind }),
    }
}

fn read_report(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Hex layout version, with or without `0x`.
fn parse_version(s: &str) -> std::result::Result<u16, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid layout version '{}': {}", s, e))
}

/// Decimal, or hex with a `0x` prefix.
fn parse_number(s: &str) -> std::result::Result<u32, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|e| format!("invalid number '{}': {}", s, e))
}
