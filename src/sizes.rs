//! Byte totals derived from the catalog and human-readable formatting.
//!
//! Totals are always recomputed from scratch by walking the tree. They are
//! cheap to derive and an incremental counter would drift whenever a flag is
//! changed outside the expected path.
//!
//! Sums saturate at `u64::MAX` instead of overflowing.

use serde::Serialize;

use crate::error::Result;
use crate::install_state::InstallLookup;
use crate::manifest::{Catalog, Component};

/// Aggregate sizes in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeTotals {
    /// Components currently installed.
    pub downloaded: u64,
    /// Components slated for a network fetch.
    pub to_download: u64,
    /// Every currently checked component.
    pub modified: u64,
}

impl SizeTotals {
    /// Recompute all three totals.
    ///
    /// Installed components count with the size recorded in their marker when
    /// it is readable. With `refresh_outdated`, installed components whose
    /// marker hash no longer matches the manifest count toward `to_download`.
    pub fn compute(
        catalog: &Catalog,
        lookup: &dyn InstallLookup,
        refresh_outdated: bool,
    ) -> Result<Self> {
        let mut totals = Self::default();
        for component in catalog.components() {
            if !component.installed && !component.checked {
                continue;
            }
            let marker = if component.installed {
                lookup.marker(component)?
            } else {
                None
            };
            let effective = marker
                .as_ref()
                .and_then(|m| m.size)
                .unwrap_or(component.size);

            if component.installed {
                totals.downloaded = totals.downloaded.saturating_add(effective);
            }
            if component.checked {
                totals.modified = totals.modified.saturating_add(effective);
                let outdated = refresh_outdated
                    && marker.as_ref().is_some_and(|m| m.is_outdated(component));
                if !component.installed || outdated {
                    totals.to_download = totals.to_download.saturating_add(component.size);
                }
            }
        }
        Ok(totals)
    }
}

/// Sum of manifest sizes of the components matching `predicate`.
pub fn total_size<F>(catalog: &Catalog, mut predicate: F) -> u64
where
    F: FnMut(&Component) -> bool,
{
    catalog
        .components()
        .filter(|c| predicate(c))
        .fold(0u64, |total, c| total.saturating_add(c.size))
}

/// Format a byte count for display.
///
/// Units step at powers of 1000. Values of a kilobyte and up are truncated
/// (not rounded) to one decimal: `1_599_999` is `1.5MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (1_000_000_000_000, "TB"),
        (1_000_000_000, "GB"),
        (1_000_000, "MB"),
        (1_000, "KB"),
    ];

    for (scale, unit) in UNITS {
        if bytes >= scale {
            let tenths = bytes / (scale / 10);
            return format!("{}.{}{}", tenths / 10, tenths % 10, unit);
        }
    }
    format!("{}B", bytes)
}

/// Format a signed difference, e.g. `+1.5MB` or `-200B`.
pub fn format_delta(from: u64, to: u64) -> String {
    if to >= from {
        format!("+{}", format_bytes(to - from))
    } else {
        format!("-{}", format_bytes(from - to))
    }
}
