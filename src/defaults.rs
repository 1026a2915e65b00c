//! Default values for component-catalog configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Default settings filename looked up in the current directory.
pub const DEFAULT_CONFIG_FILENAME: &str = ".component-catalog.yaml";

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "COMPONENT_CATALOG_CONFIG";

/// Environment variable naming the default source (installation) root.
pub const SOURCE_ENV_VAR: &str = "COMPONENT_CATALOG_SOURCE";

/// Folder appended to an accepted destination directory.
pub const PRODUCT_NAME: &str = "Flashpoint";

/// Local id of the reserved root category whose subtree is always required.
pub const REQUIRED_ROOT: &str = "required";

/// Joins ancestor ids into a component id.
pub const ID_SEPARATOR: &str = "-";

/// Extension of component archives, used when a component has no `url`.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Directory under the source root holding the marker files.
pub const MARKERS_DIR: &str = "Components";

/// Extension of marker files.
pub const MARKER_EXTENSION: &str = "txt";

/// Name of the cloud-sync folder under the user's home directory.
pub const CLOUD_SYNC_DIR: &str = "OneDrive";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_filename_is_hidden_yaml() {
        assert!(DEFAULT_CONFIG_FILENAME.starts_with('.'));
        assert!(DEFAULT_CONFIG_FILENAME.ends_with(".yaml"));
    }

    #[test]
    fn test_separator_is_single_char() {
        assert_eq!(ID_SEPARATOR.chars().count(), 1);
    }
}
