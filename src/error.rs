//! Error types for hr20-layout
//!
//! Layout construction and lookup, report parsing and catalog selection each
//! get their own thiserror enum. [`Error`] wraps them for callers that do not
//! care which stage failed.

use thiserror::Error;

use crate::config::error::ConfigError;
use crate::types::LayoutKind;

/// Top-level error type
#[derive(Debug, Error)]
pub enum Error {
    /// Layout construction or lookup error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Device report parsing or encoding error
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Layout selection error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration or layout file error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error reading a device report
    #[error("Failed to read report: {0}")]
    Io(#[from] std::io::Error),
}

/// Layout construction and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Two fields share a name
    #[error("Duplicate field name in layout '{layout}': {name}")]
    DuplicateName {
        /// Layout label
        layout: String,
        /// The repeated name
        name: String,
    },

    /// Two fields resolve to the same slot index
    #[error("Duplicate slot index in layout '{layout}': {index:#04x} claimed by '{first}' and '{second}'")]
    DuplicateIndex {
        /// Layout label
        layout: String,
        /// The contested slot
        index: u32,
        /// Field that claimed the slot first
        first: String,
        /// Field that claimed it again
        second: String,
    },

    /// A field was declared with an empty name
    #[error("Empty field name in layout '{layout}' at position {position}")]
    EmptyName {
        /// Layout label
        layout: String,
        /// Zero-based declaration position
        position: usize,
    },

    /// No field occupies the slot
    #[error("Unknown slot index: {0:#04x}")]
    UnknownIndex(u32),

    /// No field has the name
    #[error("Unknown field name: {0}")]
    UnknownName(String),
}

/// Device report parsing and encoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Line is not of the form `T[hh]=hhhh`
    #[error("Malformed report line {line}: {content:?}")]
    Malformed {
        /// One-based line number
        line: usize,
        /// The offending line
        content: String,
    },

    /// Slot or value is not valid hex or does not fit
    #[error("Invalid hex on report line {line}: {value:?}")]
    InvalidHex {
        /// One-based line number
        line: usize,
        /// The offending token
        value: String,
    },

    /// Slot or value does not fit in the EEPROM write command
    #[error("Value out of range for EEPROM write: {field} = {value}")]
    OutOfRange {
        /// Field name
        field: String,
        /// Requested value
        value: u32,
    },

    /// Field cannot be written by the device
    #[error("Field is read-only: {0}")]
    ReadOnly(String),
}

/// Layout selection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Layout already registered for this kind and version
    #[error("Layout already registered: {kind} version {version:#04x}")]
    DuplicateLayout {
        /// Record space
        kind: LayoutKind,
        /// Layout version
        version: u16,
    },

    /// Record does not report its layout version
    #[error("Record has no LAYOUT_VERSION slot ({kind})")]
    MissingVersion {
        /// Record space
        kind: LayoutKind,
    },

    /// No layout known for the reported version
    #[error("Unsupported {kind} layout version: {version:#04x}")]
    UnsupportedVersion {
        /// Record space
        kind: LayoutKind,
        /// Reported version
        version: u16,
    },
}

/// Result type alias for hr20-layout operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_index_display() {
        let err = LayoutError::DuplicateIndex {
            layout: "eeprom e1".to_string(),
            index: 0xff,
            first: "LAYOUT_VERSION".to_string(),
            second: "security_key7".to_string(),
        };
        let display = format!("{}", err);
        assert!(display.contains("0xff"), "Error should show slot in hex");
        assert!(display.contains("LAYOUT_VERSION"));
        assert!(display.contains("security_key7"));
        assert!(display.contains("eeprom e1"), "Error should name the layout");
    }

    #[test]
    fn test_unknown_name_display() {
        let err = LayoutError::UnknownName("valve_middle".to_string());
        assert_eq!(err.to_string(), "Unknown field name: valve_middle");
    }

    #[test]
    fn test_unknown_index_display() {
        let err = LayoutError::UnknownIndex(999);
        assert!(err.to_string().contains("0x3e7"));
    }

    #[test]
    fn test_malformed_display() {
        let err = RecordError::Malformed {
            line: 3,
            content: "garbage".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("line 3"));
        assert!(display.contains("garbage"));
    }

    #[test]
    fn test_unsupported_version_display() {
        let err = CatalogError::UnsupportedVersion {
            kind: LayoutKind::Trace,
            version: 0x04,
        };
        let display = err.to_string();
        assert!(display.contains("trace"), "Error should name the record space");
        assert!(display.contains("0x04"));
    }

    #[test]
    fn test_layout_error_converts_to_top_level() {
        let err: Error = LayoutError::UnknownName("x".to_string()).into();
        assert!(matches!(err, Error::Layout(LayoutError::UnknownName(_))));
        assert_eq!(err.to_string(), "Unknown field name: x");
    }
}
