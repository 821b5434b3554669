//! Raw slot/value records and their device report format
//!
//! The thermostat answers slot reads with lines such as `E[1a]=2b`
//! (EEPROM, `GCaa`) or `V[03]=0a1f` (trace, `Vaa`), sometimes preceded by
//! the echoed command (`GC1:E[1a]=2b`). Slot `0xff` carries the layout
//! version. This module turns such text into a [`RawRecord`] and pairs
//! records with a [`LayoutRegistry`].

use std::collections::BTreeMap;

use crate::error::{LayoutError, RecordError, Result};
use crate::registry::LayoutRegistry;
use crate::types::{DecodedField, LayoutKind, LAYOUT_VERSION_SLOT};

/// Values read from a device, keyed by slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    values: BTreeMap<u32, u16>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse report text for one record space.
    ///
    /// Blank lines are ignored, as are lines tagged for another record
    /// space. A slot reported twice keeps its last value.
    ///
    /// # Errors
    /// * `RecordError::Malformed` - a line is not `[prefix]T[hh]=hhhh`
    /// * `RecordError::InvalidHex` - slot or value is not hex or overflows
    pub fn parse_report(text: &str, kind: LayoutKind) -> std::result::Result<Self, RecordError> {
        let mut record = Self::new();
        for (i, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let (tag, slot, value) = parse_report_line(i + 1, line)?;
            if tag != kind.report_tag() {
                tracing::debug!(line = i + 1, tag = %tag, "skipping line for another record space");
                continue;
            }
            if record.values.insert(slot, value).is_some() {
                tracing::debug!(slot, "slot reported more than once, keeping last value");
            }
        }
        Ok(record)
    }

    /// Set `slot` to `value`, returning the previous value.
    pub fn insert(&mut self, slot: u32, value: u16) -> Option<u16> {
        self.values.insert(slot, value)
    }

    pub fn get(&self, slot: u32) -> Option<u16> {
        self.values.get(&slot).copied()
    }

    /// Value of the `LAYOUT_VERSION` slot, if reported.
    pub fn layout_version(&self) -> Option<u16> {
        self.get(LAYOUT_VERSION_SLOT)
    }

    /// Slots and values in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        self.values.iter().map(|(&slot, &value)| (slot, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(u32, u16)> for RawRecord {
    fn from_iter<T: IntoIterator<Item = (u32, u16)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Split one report line into tag, slot and value.
fn parse_report_line(
    line_no: usize,
    line: &str,
) -> std::result::Result<(char, u32, u16), RecordError> {
    let malformed = || RecordError::Malformed {
        line: line_no,
        content: line.to_string(),
    };

    let open = line.find('[').ok_or_else(malformed)?;
    let tag = line[..open].chars().last().ok_or_else(malformed)?;
    if !tag.is_ascii_uppercase() {
        return Err(malformed());
    }

    let rest = &line[open + 1..];
    let close = rest.find(']').ok_or_else(malformed)?;
    let slot_hex = &rest[..close];
    let value_hex = rest[close + 1..].strip_prefix('=').ok_or_else(malformed)?;

    let slot = parse_hex::<u32>(line_no, slot_hex)?;
    let value = parse_hex::<u16>(line_no, value_hex.trim())?;
    Ok((tag, slot, value))
}

fn parse_hex<T: FromHex>(line_no: usize, token: &str) -> std::result::Result<T, RecordError> {
    let invalid = || RecordError::InvalidHex {
        line: line_no,
        value: token.to_string(),
    };
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    T::from_hex(token).ok_or_else(invalid)
}

trait FromHex: Sized {
    fn from_hex(token: &str) -> Option<Self>;
}

impl FromHex for u32 {
    fn from_hex(token: &str) -> Option<Self> {
        u32::from_str_radix(token, 16).ok()
    }
}

impl FromHex for u16 {
    fn from_hex(token: &str) -> Option<Self> {
        u16::from_str_radix(token, 16).ok()
    }
}

impl LayoutRegistry {
    /// Pair every field, in declaration order, with the record's value.
    pub fn decode<'a>(&'a self, record: &RawRecord) -> Vec<DecodedField<'a>> {
        let unmapped = self.unmapped_slots(record);
        if !unmapped.is_empty() {
            tracing::debug!(
                layout = %self.label(),
                count = unmapped.len(),
                "record holds slots this layout does not name"
            );
        }
        self.fields()
            .iter()
            .map(|field| DecodedField {
                field,
                value: record.get(field.index),
            })
            .collect()
    }

    /// Record slots that no field of this layout occupies.
    pub fn unmapped_slots(&self, record: &RawRecord) -> Vec<u32> {
        record
            .iter()
            .map(|(slot, _)| slot)
            .filter(|&slot| !self.contains_index(slot))
            .collect()
    }

    /// Device commands that read every field of this layout, in slot order.
    pub fn read_commands(&self, kind: LayoutKind) -> Vec<String> {
        let mut slots: Vec<u32> = self.fields().iter().map(|f| f.index).collect();
        slots.sort_unstable();
        slots.dedup();
        slots
            .into_iter()
            .map(|slot| match kind {
                LayoutKind::Eeprom => format!("GC{:02x}", slot),
                LayoutKind::Trace => format!("V{:02x}", slot),
            })
            .collect()
    }

    /// Resolve `name` to the byte slot and byte value of an EEPROM write.
    ///
    /// # Errors
    /// * `LayoutError::UnknownName` - no such field
    /// * `RecordError::ReadOnly` - the field is `LAYOUT_VERSION`
    /// * `RecordError::OutOfRange` - slot or value does not fit a byte
    pub fn encode(&self, name: &str, value: u32) -> Result<(u8, u8)> {
        let slot = self.lookup_index(name)?;
        if slot == LAYOUT_VERSION_SLOT {
            return Err(RecordError::ReadOnly(name.to_string()).into());
        }
        let out_of_range = || RecordError::OutOfRange {
            field: name.to_string(),
            value,
        };
        let slot = u8::try_from(slot).map_err(|_| out_of_range())?;
        let byte = u8::try_from(value).map_err(|_| out_of_range())?;
        Ok((slot, byte))
    }

    /// EEPROM write command (`SCaadd`) setting `name` to `value`.
    pub fn format_write_command(&self, name: &str, value: u32) -> Result<String> {
        let (slot, byte) = self.encode(name, value)?;
        Ok(format!("SC{:02x}{:02x}", slot, byte))
    }

    /// Value of `name` in `record`.
    ///
    /// Fails with `UnknownName` if the layout has no such field; returns
    /// `None` if the record did not report it.
    pub fn value_of(
        &self,
        record: &RawRecord,
        name: &str,
    ) -> std::result::Result<Option<u16>, LayoutError> {
        self.lookup_index(name).map(|slot| record.get(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::registry::LayoutBuilder;

    fn layout() -> LayoutRegistry {
        LayoutBuilder::new("test")
            .field("lcd_contrast", "")
            .field("temperature0", "frost protection")
            .field_at(0xff, "LAYOUT_VERSION", "")
            .build()
            .expect("valid layout")
    }

    #[test]
    fn test_parse_plain_lines() {
        let record = RawRecord::parse_report("E[00]=0e\nE[01]=24\nE[ff]=e1\n", LayoutKind::Eeprom)
            .expect("should parse");
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(1), Some(0x24));
        assert_eq!(record.layout_version(), Some(0xe1));
    }

    #[test]
    fn test_parse_with_command_echo_prefix() {
        let record =
            RawRecord::parse_report("GC1:E[1a]=2b\r\n", LayoutKind::Eeprom).expect("should parse");
        assert_eq!(record.get(0x1a), Some(0x2b));
    }

    #[test]
    fn test_parse_skips_other_record_space() {
        let text = "V[00]=08fc\nE[00]=0e\n\n   \nV[ff]=0003\n";
        let trace = RawRecord::parse_report(text, LayoutKind::Trace).expect("should parse");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.get(0), Some(0x08fc));
        assert_eq!(trace.layout_version(), Some(3));
    }

    #[test]
    fn test_parse_accepts_uppercase_hex() {
        let record = RawRecord::parse_report("E[1A]=FF", LayoutKind::Eeprom).expect("should parse");
        assert_eq!(record.get(0x1a), Some(0xff));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let record =
            RawRecord::parse_report("E[05]=01\nE[05]=02", LayoutKind::Eeprom).expect("should parse");
        assert_eq!(record.get(5), Some(2));
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = RawRecord::parse_report("E[00]=0e\nGC0", LayoutKind::Eeprom)
            .expect_err("should fail");
        assert_eq!(
            err,
            RecordError::Malformed {
                line: 2,
                content: "GC0".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_missing_equals() {
        let err = RawRecord::parse_report("E[00]0e", LayoutKind::Eeprom).expect_err("should fail");
        assert!(matches!(err, RecordError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_parse_invalid_hex() {
        let err = RawRecord::parse_report("E[zz]=01", LayoutKind::Eeprom).expect_err("should fail");
        assert_eq!(
            err,
            RecordError::InvalidHex {
                line: 1,
                value: "zz".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_value_overflow() {
        let err =
            RawRecord::parse_report("V[00]=123456", LayoutKind::Trace).expect_err("should fail");
        assert!(matches!(err, RecordError::InvalidHex { line: 1, .. }));
    }

    #[test]
    fn test_decode_in_declaration_order() {
        let layout = layout();
        let record: RawRecord = [(1, 0x24), (0xff, 0xe1), (0x30, 7)].into_iter().collect();
        let decoded = layout.decode(&record);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].field.name, "lcd_contrast");
        assert_eq!(decoded[0].value, None);
        assert_eq!(decoded[1].field.description, "frost protection");
        assert_eq!(decoded[1].value, Some(0x24));
        assert_eq!(decoded[2].value, Some(0xe1));
        assert_eq!(layout.unmapped_slots(&record), vec![0x30]);
    }

    #[test]
    fn test_value_of() {
        let layout = layout();
        let record: RawRecord = [(1, 0x24)].into_iter().collect();
        assert_eq!(layout.value_of(&record, "temperature0"), Ok(Some(0x24)));
        assert_eq!(layout.value_of(&record, "lcd_contrast"), Ok(None));
        assert!(layout.value_of(&record, "bogus").is_err());
    }

    #[test]
    fn test_read_commands() {
        let layout = layout();
        assert_eq!(
            layout.read_commands(LayoutKind::Eeprom),
            vec!["GC00", "GC01", "GCff"]
        );
        assert_eq!(layout.read_commands(LayoutKind::Trace)[2], "Vff");
    }

    #[test]
    fn test_format_write_command() {
        let layout = layout();
        assert_eq!(
            layout.format_write_command("temperature0", 0x24).expect("encodable"),
            "SC0124"
        );
    }

    #[test]
    fn test_encode_rejects_layout_version() {
        let err = layout().encode("LAYOUT_VERSION", 1).expect_err("read-only");
        assert!(matches!(err, Error::Record(RecordError::ReadOnly(_))));
    }

    #[test]
    fn test_encode_rejects_wide_value() {
        let err = layout().encode("lcd_contrast", 256).expect_err("too wide");
        assert!(matches!(
            err,
            Error::Record(RecordError::OutOfRange { value: 256, .. })
        ));
    }

    #[test]
    fn test_encode_unknown_field() {
        let err = layout().encode("nope", 1).expect_err("unknown");
        assert!(matches!(err, Error::Layout(LayoutError::UnknownName(_))));
    }
}
