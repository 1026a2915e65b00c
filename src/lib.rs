//! # Component Catalog Library
//!
//! Core of an installer for a large catalog of optional downloadable
//! components. It parses the component manifest into a tree, tracks which
//! components are installed on disk, resolves inter-component dependencies
//! when the user changes the selection, accounts sizes, and refuses unsafe
//! destination directories. Downloading, archive extraction and UI rendering
//! are left to the caller; the `component-catalog` binary is one such caller.
//!
//! ## Quick Example
//!
//! ```
//! use component_catalog::config::Settings;
//! use component_catalog::session::Session;
//! use component_catalog::sizes::format_bytes;
//!
//! let xml = r#"
//! <list url="https://example.com/fp">
//!   <category id="extras" title="Extras" description="Optional content">
//!     <component id="a" title="Alpha" description="" hash="0000000a"
//!                size="1500000" depends="extras-b"/>
//!     <component id="b" title="Beta" description="" hash="0000000b" size="500"/>
//!   </category>
//! </list>
//! "#;
//!
//! let mut session = Session::load(xml, Settings::default()).unwrap();
//! let outcome = session.select(&["extras-a"], true, |resolution| {
//!     // Beta is pulled in as a dependency of Alpha
//!     resolution.added_titles() == ["Beta"]
//! }).unwrap();
//!
//! assert!(outcome.is_applied());
//! assert_eq!(format_bytes(session.sizes().to_download), "1.5MB");
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the typed Category/Component tree and its XML
//!   parser, with derived ids, URLs, install paths and required flags.
//! - **Walker (`walker`)**: depth-first traversal in document order.
//! - **Install State (`install_state`)**: marker files under the source
//!   directory decide what is installed.
//! - **Resolver (`resolver`)**: dependency closure of the selection, split into
//!   blocked removals and advisory additions.
//! - **Sizes (`sizes`)**: downloaded, to-download and modified totals plus
//!   byte formatting.
//! - **Path Guard (`path_guard`)**: destination and source directory checks.
//! - **Session (`session`)**: the explicit context value tying it all together.

pub mod config;
pub mod defaults;
pub mod error;
pub mod install_state;
pub mod manifest;
pub mod output;
pub mod path_guard;
pub mod resolver;
pub mod session;
pub mod sizes;
pub mod suggestions;
pub mod walker;

#[cfg(test)]
mod format_proptest;
