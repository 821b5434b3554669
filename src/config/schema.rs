//! TOML schema types for hr20-layout.
//!
//! `config.toml` controls logging and where extra layout files live. Each
//! layout file describes one record space at one layout version.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::registry::LayoutRegistry;
use crate::types::{FieldDecl, IndexCollision, LayoutKind};

// ---------------------------------------------------------------------------
// config.toml
// ---------------------------------------------------------------------------

/// Root configuration.
///
/// ```toml
/// [log]
/// level = "debug"
///
/// [layouts]
/// dirs = ["~/hr20/layouts"]
/// collision = "last-wins"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub log: LogConfig,
    /// Extra layout sources.
    pub layouts: LayoutsConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Level used when `HRL_LOG` is unset. Default: info.
    pub level: LogLevel,
}

/// Where to find layout files and how to build them.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayoutsConfig {
    /// Directories scanned for `*.toml` layout files. `~` is expanded.
    pub dirs: Vec<String>,
    /// Slot collision handling for loaded layouts. Default: reject.
    pub collision: CollisionPolicy,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// TOML spelling of [`IndexCollision`].
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    #[default]
    Reject,
    LastWins,
}

impl From<CollisionPolicy> for IndexCollision {
    fn from(policy: CollisionPolicy) -> Self {
        match policy {
            CollisionPolicy::Reject => IndexCollision::Reject,
            CollisionPolicy::LastWins => IndexCollision::LastWins,
        }
    }
}

// ---------------------------------------------------------------------------
// Layout files
// ---------------------------------------------------------------------------

/// One layout definition file.
///
/// ```toml
/// kind = "eeprom"
/// version = 0xe2
///
/// [[field]]
/// name = "lcd_contrast"
///
/// [[field]]
/// index = 0xff
/// name = "LAYOUT_VERSION"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LayoutFile {
    /// Record space the layout describes.
    pub kind: LayoutKind,
    /// Version the device reports at slot `0xff`.
    pub version: u16,
    /// Optional label; defaults to `"<kind> <version as hex>"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Field rows in declaration order.
    #[serde(default, rename = "field")]
    pub fields: Vec<FieldDecl>,
}

impl LayoutFile {
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| format!("{} {:02x}", self.kind, self.version))
    }

    /// Build the registry described by this file.
    pub fn build(self, policy: IndexCollision) -> Result<LayoutRegistry, LayoutError> {
        let label = self.label();
        LayoutRegistry::with_policy(label, self.fields, policy)
    }
}
