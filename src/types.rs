//! Core domain types for hr20-layout
//!
//! Field declarations as written in a layout table, fields as resolved by a
//! [`LayoutRegistry`](crate::LayoutRegistry), and the record spaces the
//! thermostat exposes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slot holding the layout version in every record space.
pub const LAYOUT_VERSION_SLOT: u32 = 0xff;

/// Field name reserved for [`LAYOUT_VERSION_SLOT`].
pub const LAYOUT_VERSION_NAME: &str = "LAYOUT_VERSION";

/// Record space exposed by the thermostat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Persistent configuration bytes (`GCaa` / `SCaadd`)
    Eeprom,
    /// Watched diagnostic variables (`Vaa`)
    Trace,
}

impl LayoutKind {
    /// Tag character the device prints in front of each reported slot.
    pub fn report_tag(self) -> char {
        match self {
            LayoutKind::Eeprom => 'E',
            LayoutKind::Trace => 'V',
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Eeprom => write!(f, "eeprom"),
            LayoutKind::Trace => write!(f, "trace"),
        }
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eeprom" | "ee" | "config" => Ok(LayoutKind::Eeprom),
            "trace" | "watch" => Ok(LayoutKind::Trace),
            other => Err(format!(
                "unknown layout kind '{}' (expected 'eeprom' or 'trace')",
                other
            )),
        }
    }
}

/// What to do when a field claims a slot that is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexCollision {
    /// Fail construction with `LayoutError::DuplicateIndex`
    #[default]
    Reject,
    /// Later field takes the slot; the earlier name keeps pointing at it
    LastWins,
}

/// One row of a layout table, before index resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Explicit slot, or `None` to take the next implicit one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Field name
    pub name: String,
    /// Human-readable description (may be empty)
    #[serde(default)]
    pub description: String,
}

impl FieldDecl {
    /// Declaration that takes the next implicit slot.
    pub fn implicit(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            index: None,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Declaration pinned to `index`.
    pub fn at(index: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A field with its resolved slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Slot index
    pub index: u32,
    /// Field name
    pub name: String,
    /// Human-readable description (may be empty)
    pub description: String,
}

/// A layout field paired with the value a record holds for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedField<'a> {
    /// Field definition
    pub field: &'a FieldSpec,
    /// Value from the record, `None` if the record did not report the slot
    pub value: Option<u16>,
}
