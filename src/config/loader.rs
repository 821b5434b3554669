//! Configuration and layout file loader with position-aware error reporting.
//!
//! Loads `config.toml` from a specific path or the default XDG location
//! (falling back to `Config::default()` when the default file is absent),
//! and assembles a [`LayoutCatalog`] from the built-in layouts plus every
//! `*.toml` layout file in the configured directories.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::catalog::LayoutCatalog;
use crate::config::error::ConfigError;
use crate::config::schema::{Config, LayoutFile};
use crate::config::xdg;
use crate::error::Result;
use crate::registry::LayoutRegistry;
use crate::types::{IndexCollision, LayoutKind};

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a specific path.
    ///
    /// Returns `ConfigError::NotFound` if the file does not exist, or
    /// `ConfigError::ReadError` for other I/O failures.
    pub fn load_from_path(path: &Path) -> std::result::Result<Config, ConfigError> {
        let content = read_file(path)?;
        Self::parse_toml(&content, path)
    }

    /// Load configuration from the default XDG location.
    ///
    /// If no file exists at the default path, returns `Config::default()`
    /// instead of an error.
    pub fn load_default() -> std::result::Result<Config, ConfigError> {
        let path = xdg::config_path();
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }

    /// Load one layout file and build its registry.
    pub fn load_layout_file(
        path: &Path,
        policy: IndexCollision,
    ) -> std::result::Result<(LayoutKind, u16, LayoutRegistry), ConfigError> {
        let content = read_file(path)?;
        let file: LayoutFile = Self::parse_toml(&content, path)?;
        let (kind, version) = (file.kind, file.version);
        let layout = file.build(policy).map_err(|source| ConfigError::InvalidLayout {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), %kind, version, fields = layout.len(), "layout file loaded");
        Ok((kind, version, layout))
    }

    /// Directories to scan for layout files.
    ///
    /// The configured directories (with `~` expanded) followed by the default
    /// XDG layouts directory when it exists and is not already listed.
    pub fn layout_dirs(config: &Config) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = config
            .layouts
            .dirs
            .iter()
            .map(|d| xdg::expand_tilde(d))
            .collect();
        let default_dir = xdg::layouts_dir();
        if default_dir.is_dir() && !dirs.contains(&default_dir) {
            dirs.push(default_dir);
        }
        dirs
    }

    /// Built-in layouts plus every layout file found in `layout_dirs`.
    ///
    /// Files are read in name order within each directory. A missing
    /// directory is skipped with a warning.
    ///
    /// # Errors
    /// * `ConfigError` - a layout file cannot be read, parsed or built
    /// * `CatalogError::DuplicateLayout` - two sources claim one kind/version
    pub fn load_catalog(config: &Config) -> Result<LayoutCatalog> {
        let policy = IndexCollision::from(config.layouts.collision);
        let mut catalog = LayoutCatalog::builtin();
        for dir in Self::layout_dirs(config) {
            for path in layout_files(&dir)? {
                let (kind, version, layout) = Self::load_layout_file(&path, policy)?;
                catalog.insert(kind, version, layout)?;
            }
        }
        tracing::info!(layouts = catalog.len(), "layout catalog ready");
        Ok(catalog)
    }

    /// Parse TOML into `T` with position-aware error reporting.
    fn parse_toml<T: DeserializeOwned>(
        content: &str,
        path: &Path,
    ) -> std::result::Result<T, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map(|span| {
                    let line = content[..span.start].matches('\n').count() + 1;
                    let last_newline = content[..span.start]
                        .rfind('\n')
                        .map(|p| p + 1)
                        .unwrap_or(0);
                    let column = span.start - last_newline + 1;
                    (line, column)
                })
                .unwrap_or((0, 0));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

fn read_file(path: &Path) -> std::result::Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// `*.toml` files directly inside `dir`, sorted by name.
fn layout_files(dir: &Path) -> std::result::Result<Vec<PathBuf>, ConfigError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Layout directory {:?} does not exist, skipping", dir);
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ConfigError::ReadError {
                path: dir.to_path_buf(),
                source: e,
            })?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
