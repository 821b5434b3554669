//! Layout selection by record space and layout version

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::builtin::{self, EEPROM_E1_VERSION, TRACE_03_VERSION};
use crate::error::CatalogError;
use crate::record::RawRecord;
use crate::registry::LayoutRegistry;
use crate::types::LayoutKind;

/// Known layouts keyed by `(kind, version)`
///
/// Built-in layouts are borrowed from their process-wide instances; layouts
/// loaded at runtime are owned by the catalog.
#[derive(Debug, Clone, Default)]
pub struct LayoutCatalog {
    layouts: BTreeMap<(LayoutKind, u16), Cow<'static, LayoutRegistry>>,
}

impl LayoutCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the firmware's EEPROM `e1` and trace `03` layouts.
    pub fn builtin() -> Self {
        let mut layouts = BTreeMap::new();
        layouts.insert(
            (LayoutKind::Eeprom, EEPROM_E1_VERSION),
            Cow::Borrowed(builtin::eeprom_e1()),
        );
        layouts.insert(
            (LayoutKind::Trace, TRACE_03_VERSION),
            Cow::Borrowed(builtin::trace_03()),
        );
        Self { layouts }
    }

    /// Register `layout` for `kind` at `version`.
    ///
    /// # Errors
    /// * `CatalogError::DuplicateLayout` - the pair is already registered
    pub fn insert(
        &mut self,
        kind: LayoutKind,
        version: u16,
        layout: LayoutRegistry,
    ) -> Result<(), CatalogError> {
        if self.layouts.contains_key(&(kind, version)) {
            return Err(CatalogError::DuplicateLayout { kind, version });
        }
        tracing::debug!(%kind, version, layout = %layout.label(), "layout registered");
        self.layouts.insert((kind, version), Cow::Owned(layout));
        Ok(())
    }

    pub fn get(&self, kind: LayoutKind, version: u16) -> Option<&LayoutRegistry> {
        self.layouts.get(&(kind, version)).map(|layout| &**layout)
    }

    /// Highest registered version for `kind`.
    pub fn latest(&self, kind: LayoutKind) -> Option<(u16, &LayoutRegistry)> {
        self.layouts
            .range((kind, u16::MIN)..=(kind, u16::MAX))
            .next_back()
            .map(|(&(_, version), layout)| (version, &**layout))
    }

    /// Layout matching the version `record` reports at slot `0xff`.
    ///
    /// # Errors
    /// * `CatalogError::MissingVersion` - the record lacks slot `0xff`
    /// * `CatalogError::UnsupportedVersion` - no layout for that version
    pub fn for_record(
        &self,
        kind: LayoutKind,
        record: &RawRecord,
    ) -> Result<&LayoutRegistry, CatalogError> {
        let version = record
            .layout_version()
            .ok_or(CatalogError::MissingVersion { kind })?;
        self.get(kind, version)
            .ok_or(CatalogError::UnsupportedVersion { kind, version })
    }

    /// Registered `(kind, version)` pairs in ascending order.
    pub fn versions(&self) -> impl Iterator<Item = (LayoutKind, u16)> + '_ {
        self.layouts.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::LayoutBuilder;

    fn eeprom_e2() -> LayoutRegistry {
        LayoutBuilder::new("eeprom e2")
            .field("lcd_contrast", "")
            .field_at(0xff, "LAYOUT_VERSION", "")
            .build()
            .expect("valid layout")
    }

    #[test]
    fn test_builtin_contents() {
        let catalog = LayoutCatalog::builtin();
        assert_eq!(
            catalog.versions().collect::<Vec<_>>(),
            vec![(LayoutKind::Eeprom, 0xe1), (LayoutKind::Trace, 0x03)]
        );
        let trace = catalog.get(LayoutKind::Trace, 0x03).expect("trace 03");
        assert_eq!(trace.lookup_index("MOTOR_PosOvershoot"), Ok(12));
        assert!(catalog.get(LayoutKind::Trace, 0xe1).is_none());
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut catalog = LayoutCatalog::builtin();
        let err = catalog
            .insert(LayoutKind::Eeprom, 0xe1, eeprom_e2())
            .expect_err("duplicate");
        assert_eq!(
            err,
            CatalogError::DuplicateLayout {
                kind: LayoutKind::Eeprom,
                version: 0xe1,
            }
        );
    }

    #[test]
    fn test_latest() {
        let mut catalog = LayoutCatalog::builtin();
        catalog
            .insert(LayoutKind::Eeprom, 0xe2, eeprom_e2())
            .expect("new version");
        let (version, layout) = catalog.latest(LayoutKind::Eeprom).expect("has eeprom");
        assert_eq!(version, 0xe2);
        assert_eq!(layout.label(), "eeprom e2");
        assert_eq!(catalog.latest(LayoutKind::Trace).map(|(v, _)| v), Some(3));
        assert!(LayoutCatalog::new().latest(LayoutKind::Trace).is_none());
    }

    #[test]
    fn test_for_record_selects_by_version() {
        let catalog = LayoutCatalog::builtin();
        let record: RawRecord = [(0, 0x0e), (0xff, 0xe1)].into_iter().collect();
        let layout = catalog
            .for_record(LayoutKind::Eeprom, &record)
            .expect("e1 is known");
        assert_eq!(layout.label(), "eeprom e1");
    }

    #[test]
    fn test_for_record_missing_version() {
        let catalog = LayoutCatalog::builtin();
        let record: RawRecord = [(0, 0x0e)].into_iter().collect();
        assert_eq!(
            catalog.for_record(LayoutKind::Eeprom, &record),
            Err(CatalogError::MissingVersion {
                kind: LayoutKind::Eeprom
            })
        );
    }

    #[test]
    fn test_for_record_unsupported_version() {
        let catalog = LayoutCatalog::builtin();
        let record: RawRecord = [(0xff, 0x04)].into_iter().collect();
        assert_eq!(
            catalog.for_record(LayoutKind::Trace, &record),
            Err(CatalogError::UnsupportedVersion {
                kind: LayoutKind::Trace,
                version: 4,
            })
        );
    }
}
