/// Configuration error types.
pub mod error;

/// Configuration and layout file loader.
pub mod loader;

/// TOML schema types for the configuration and layout files.
pub mod schema;

/// XDG Base Directory path resolution utilities.
pub mod xdg;
