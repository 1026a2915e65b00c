//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `component-catalog` library. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`ManifestError`**: A structured manifest-integrity failure naming the
//!   offending node type, the attribute involved and a human reason. These are
//!   unrecoverable for the load: a partially valid catalog is never returned.
//!
//! - **`PathRejection`**: A typed reason for refusing a destination or source
//!   directory. Path rejections are recoverable, the caller may simply retry
//!   with another directory.
//!
//! - **`Error`**: The main enum wrapping the above plus selection, marker,
//!   configuration and I/O failures.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A manifest integrity error.
///
/// `node` is the element name (`list`, `category`, `component`, or `document`
/// for XML syntax errors), `attribute` the attribute that was missing or
/// malformed when one applies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid manifest {node}{}: {reason}", attribute.as_ref().map(|a| format!(" attribute \"{}\"", a)).unwrap_or_default())]
pub struct ManifestError {
    pub node: String,
    pub attribute: Option<String>,
    pub reason: String,
}

impl ManifestError {
    pub fn new(node: impl Into<String>, attribute: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            attribute: attribute.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// A required attribute was not present on the element.
    pub fn missing(node: &str, attribute: &str) -> Self {
        Self::new(
            node,
            Some(attribute),
            format!("required {} attribute \"{}\" was not found", node, attribute),
        )
    }
}

/// Why a candidate directory was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRejection {
    /// Under the 64-bit or 32-bit Program Files directory.
    ProgramFiles,
    /// Under the OS temporary directory.
    Temporary,
    /// Under a cloud-sync folder such as OneDrive.
    CloudSync,
    /// Under a directory listed in the `protected_paths` setting.
    Protected,
    /// No marker file of any catalog component exists under the directory.
    NotAnInstallation,
}

impl fmt::Display for PathRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PathRejection::ProgramFiles => "the Program Files directory",
            PathRejection::Temporary => "the Temporary Files directory",
            PathRejection::CloudSync => "a cloud-synced (OneDrive) directory",
            PathRejection::Protected => "a protected directory",
            PathRejection::NotAnInstallation => "not a recognized installation",
        };
        f.write_str(text)
    }
}

/// Main error type for component-catalog operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest document is not a valid catalog.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A destination or source directory was refused.
    #[error("Path rejected: {} is {reason}", path.display())]
    PathRejected { path: PathBuf, reason: PathRejection },

    /// Dependency resolution found installed components that would have to be
    /// removed while something still depends on them.
    #[error("The following components cannot be removed because one or more components depend on them: {}", blocked.join(", "))]
    DependencyConflict { blocked: Vec<String> },

    /// A selection referenced an id that is not in the catalog.
    #[error("Unknown component or category: {id}{}", suggestion.as_ref().map(|s| format!(" (did you mean '{}'?)", s)).unwrap_or_default())]
    UnknownComponent {
        id: String,
        /// Closest id in the catalog, if one is near enough
        suggestion: Option<String>,
    },

    /// Attempted to deselect a required component or category.
    #[error("Required component cannot be deselected: {id}")]
    RequiredComponent { id: String },

    /// A circular chain was found in component `depends` lists.
    #[error("Cycle detected in component dependencies: {cycle}")]
    CycleDetected { cycle: String },

    /// A marker file exists but could not be interpreted.
    #[error("Invalid marker file {}: {message}", path.display())]
    Marker { path: PathBuf, message: String },

    /// An error occurred while parsing the settings file.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
