//! Layouts shipped with the OpenHR20 firmware
//!
//! EEPROM layout `e1` and trace layout `03`. Each is built on first use and
//! shared for the rest of the process.

use std::sync::OnceLock;

use crate::registry::LayoutRegistry;
use crate::types::{FieldDecl, LAYOUT_VERSION_NAME, LAYOUT_VERSION_SLOT};

/// Version reported at slot `0xff` of the EEPROM layout below.
pub const EEPROM_E1_VERSION: u16 = 0xe1;

/// Version reported at slot `0xff` of the trace layout below.
pub const TRACE_03_VERSION: u16 = 0x03;

const EEPROM_E1_FIELDS: &[(&str, &str)] = &[
    ("lcd_contrast", ""),
    ("temperature0", "temperature 0  - frost protection (unit is 0.5stC)"),
    ("temperature1", "temperature 1  - energy save (unit is 0.5stC)"),
    ("temperature2", "temperature 2  - comfort (unit is 0.5stC)"),
    ("temperature3", "temperature 3  - supercomfort (unit is 0.5stC)"),
    ("PP_Factor", "Proportional kvadratic tuning constant, multiplied with 256"),
    ("P_Factor", "Proportional tuning constant, multiplied with 256"),
    ("I_Factor", "Integral tuning constant, multiplied with 256"),
    ("temp_tolerance", "tolerance of temperature in 1/100 degree to lazy integrator (improve stability)"),
    ("PID_interval", "PID_interval*5 = interval in seconds"),
    ("valve_min", "valve position limiter min"),
    ("valve_center", "default valve position for \"zero - error\" - improve stabilization after change temperature"),
    ("valve_max", "valve position limiter max"),
    ("motor_pwm_min", "min PWM for motor"),
    ("motor_pwm_max", "max PWM for motor"),
    ("motor_eye_low", "min signal lenght to accept low level (multiplied by 2)"),
    ("motor_eye_high", "min signal lenght to accept high level (multiplied by 2)"),
    ("motor_end_detect_cal", "stop timer threshold in % to previous average"),
    ("motor_end_detect_run", "stop timer threshold in % to previous average"),
    ("motor_speed", "/8"),
    ("motor_speed_ctl_gain", ""),
    ("motor_pwm_max_step", ""),
    ("MOTOR_ManuCalibration_L", ""),
    ("MOTOR_ManuCalibration_H", ""),
    ("temp_cal_table0", "temperature calibration table"),
    ("temp_cal_table1", "temperature calibration table"),
    ("temp_cal_table2", "temperature calibration table"),
    ("temp_cal_table3", "temperature calibration table"),
    ("temp_cal_table4", "temperature calibration table"),
    ("temp_cal_table5", "temperature calibration table"),
    ("temp_cal_table6", "temperature calibration table"),
    ("timer_mode", "=0 only one program, =1 programs for weekdays"),
    ("bat_warning_thld", "treshold for battery warning [unit 0.02V]=[unit 0.01V per cell]"),
    ("bat_low_thld", "threshold for battery low [unit 0.02V]=[unit 0.01V per cell]"),
    ("window_open_thld", "threshold for window open/close detection unit is 0.1C"),
    ("window_open_noise_filter", ""),
    ("window_close_noise_filter", ""),
    ("RFM_devaddr", "HR20's own device address in RFM radio networking. =0 mean disable radio"),
    ("security_key0", "key for encrypted radio messasges"),
    ("security_key1", "key for encrypted radio messasges"),
    ("security_key2", "key for encrypted radio messasges"),
    ("security_key3", "key for encrypted radio messasges"),
    ("security_key4", "key for encrypted radio messasges"),
    ("security_key5", "key for encrypted radio messasges"),
    ("security_key6", "key for encrypted radio messasges"),
    ("security_key7", "key for encrypted radio messasges"),
];

const TRACE_03_FIELDS: &[(&str, &str)] = &[
    ("temp_average", "average temperature [1/100 degree C]"),
    ("bat_average", "battery voltage [1/1000 V]"),
    ("sumError_LO_W", ""),
    ("sumError_HI_W", ""),
    ("CTL_temp_wanted", ""),
    ("CTL_temp_wanted_last", ""),
    ("CTL_temp_auto", ""),
    ("CTL_mode_auto", ""),
    ("CTL_mode_window", "Controller mode window timeout (0=closed)"),
    ("motor_diag", "MOTOR diagnostic, time between 2 pulses"),
    ("MOTOR_PosMax", "MOTOR maximum position [pulses]"),
    ("MOTOR_PosAct", "MOTOR actual position [pulses]"),
    ("MOTOR_PosOvershoot", "volume of pulses after last motor stop"),
];

/// Implicit rows followed by the `LAYOUT_VERSION` marker at `0xff`.
fn versioned_decls(rows: &[(&str, &str)]) -> Vec<FieldDecl> {
    rows.iter()
        .map(|&(name, description)| FieldDecl::implicit(name, description))
        .chain(std::iter::once(FieldDecl::at(
            LAYOUT_VERSION_SLOT,
            LAYOUT_VERSION_NAME,
            "",
        )))
        .collect()
}

/// Build one of the static tables above.
///
/// The tables are compile-time constants with unique, non-empty names and
/// implicit slots below `0xff`, so construction cannot fail;
/// `test_static_tables_build` checks every table through the fallible path.
fn build(label: &str, rows: &[(&str, &str)]) -> LayoutRegistry {
    match LayoutRegistry::new(label, versioned_decls(rows)) {
        Ok(layout) => layout,
        Err(e) => unreachable!("built-in layout '{}' is invalid: {}", label, e),
    }
}

/// EEPROM configuration layout, version `0xe1`.
pub fn eeprom_e1() -> &'static LayoutRegistry {
    static LAYOUT: OnceLock<LayoutRegistry> = OnceLock::new();
    LAYOUT.get_or_init(|| build("eeprom e1", EEPROM_E1_FIELDS))
}

/// Diagnostic trace layout, version `0x03`.
pub fn trace_03() -> &'static LayoutRegistry {
    static LAYOUT: OnceLock<LayoutRegistry> = OnceLock::new();
    LAYOUT.get_or_init(|| build("trace 03", TRACE_03_FIELDS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eeprom_lookups() {
        let layout = eeprom_e1();
        assert_eq!(layout.lookup_index("lcd_contrast"), Ok(0));
        assert_eq!(layout.lookup_index("temperature0"), Ok(1));
        assert_eq!(layout.lookup_index("security_key7"), Ok(45));
        assert_eq!(layout.lookup_index("LAYOUT_VERSION"), Ok(255));
        assert_eq!(layout.lookup_name(1), Ok("temperature0"));
        assert_eq!(layout.len(), 47);
    }

    #[test]
    fn test_eeprom_descriptions() {
        let layout = eeprom_e1();
        assert_eq!(layout.describe("motor_speed"), Ok("/8"));
        assert_eq!(layout.describe("lcd_contrast"), Ok(""));
        assert!(layout
            .describe("valve_center")
            .expect("known field")
            .contains("\"zero - error\""));
    }

    #[test]
    fn test_trace_lookups() {
        let layout = trace_03();
        assert_eq!(layout.lookup_index("temp_average"), Ok(0));
        assert_eq!(layout.lookup_index("MOTOR_PosOvershoot"), Ok(12));
        assert_eq!(layout.lookup_index("LAYOUT_VERSION"), Ok(255));
        assert_eq!(layout.len(), 14);
    }

    #[test]
    fn test_static_tables_build() {
        for (label, rows) in [
            ("eeprom e1", EEPROM_E1_FIELDS),
            ("trace 03", TRACE_03_FIELDS),
        ] {
            let layout = LayoutRegistry::new(label, versioned_decls(rows))
                .unwrap_or_else(|e| panic!("{label} should build: {e}"));
            assert_eq!(layout.len(), rows.len() + 1);
            assert!(rows.len() < LAYOUT_VERSION_SLOT as usize);
            for (slot, &(name, _)) in rows.iter().enumerate() {
                assert_eq!(layout.lookup_index(name), Ok(slot as u32));
            }
        }
    }

    #[test]
    fn test_builtins_are_memoized() {
        assert!(std::ptr::eq(eeprom_e1(), eeprom_e1()));
        assert!(std::ptr::eq(trace_03(), trace_03()));
    }
}
