//! Named slot layouts for the OpenHR20 thermostat
//!
//! The thermostat exposes its EEPROM configuration and its diagnostic trace
//! variables as byte-addressed slots. This crate maps slot indices to field
//! names and back, with a human-readable description per field, so that
//! device reports can be read and written by name instead of raw offset.
//!
//! # Overview
//!
//! - [`LayoutRegistry`]: immutable, bidirectional name/slot lookup built once
//!   from an ordered list of field declarations
//! - [`builtin`]: the firmware's EEPROM `e1` and trace `03` layouts
//! - [`RawRecord`]: slot values parsed from device report lines
//! - [`LayoutCatalog`]: picks the layout a record reports at slot `0xff`
//! - [`config`]: TOML configuration and extra layout files
//!
//! # Examples
//!
//! ```
//! use hr20_layout::{builtin, LayoutKind, RawRecord};
//!
//! let layout = builtin::eeprom_e1();
//! assert_eq!(layout.lookup_index("temperature0").unwrap(), 1);
//! assert_eq!(layout.lookup_name(0xff).unwrap(), "LAYOUT_VERSION");
//!
//! let record = RawRecord::parse_report("E[01]=24\nE[ff]=e1\n", LayoutKind::Eeprom).unwrap();
//! let decoded = layout.decode(&record);
//! assert_eq!(decoded[1].value, Some(0x24));
//! ```

pub mod builtin;
pub mod catalog;
pub mod config;
mod error;
pub mod logging;
mod record;
mod registry;
mod types;

pub use catalog::LayoutCatalog;
pub use error::{CatalogError, Error, LayoutError, RecordError, Result};
pub use record::RawRecord;
pub use registry::{LayoutBuilder, LayoutRegistry};
pub use types::{
    DecodedField, FieldDecl, FieldSpec, IndexCollision, LayoutKind, LAYOUT_VERSION_NAME,
    LAYOUT_VERSION_SLOT,
};
