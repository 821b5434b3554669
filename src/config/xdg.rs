//! Platform-aware path resolution for hr20-layout.
//!
//! - Config: `$XDG_CONFIG_HOME/hr20-layout`, else the platform config dir
//!   (`~/.config/hr20-layout` on Linux,
//!   `~/Library/Application Support/hr20-layout` on macOS)
//! - Layout files: `<config dir>/layouts`

use std::path::PathBuf;

const APP_NAME: &str = "hr20-layout";

/// Returns the configuration directory for hr20-layout.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path to the main configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the directory scanned for layout files by default.
pub fn layouts_dir() -> PathBuf {
    config_dir().join("layouts")
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, or no home directory is known, it is
/// returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path == "~" => home,
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper: run a closure with env vars temporarily set, then restore.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<_> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        f();

        for (k, original) in &originals {
            match original {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
    }

    #[test]
    #[serial(env)]
    fn test_config_path_with_xdg_override() {
        with_env(&[("XDG_CONFIG_HOME", Some("/custom/config"))], || {
            assert_eq!(
                config_path(),
                PathBuf::from("/custom/config/hr20-layout/config.toml")
            );
            assert_eq!(
                layouts_dir(),
                PathBuf::from("/custom/config/hr20-layout/layouts")
            );
        });
    }

    #[test]
    #[serial(env)]
    fn test_config_dir_without_xdg_ends_with_app_name() {
        with_env(&[("XDG_CONFIG_HOME", None)], || {
            assert!(config_dir().ends_with(APP_NAME));
        });
    }

    #[test]
    #[serial(env)]
    fn test_expand_tilde_with_home_prefix() {
        with_env(&[("HOME", Some("/home/tester"))], || {
            assert_eq!(
                expand_tilde("~/layouts"),
                PathBuf::from("/home/tester/layouts")
            );
            assert_eq!(expand_tilde("~"), PathBuf::from("/home/tester"));
        });
    }

    #[test]
    fn test_expand_tilde_absolute_path_unchanged() {
        assert_eq!(expand_tilde("/opt/layouts"), PathBuf::from("/opt/layouts"));
        assert_eq!(expand_tilde("rel/~/x"), PathBuf::from("rel/~/x"));
    }
}
