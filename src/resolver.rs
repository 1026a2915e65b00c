//! # Dependency Resolution
//!
//! Given the current selection, compute every component that must also be
//! selected and classify each forced addition:
//!
//! - **blocked**: the component is installed. It was deselected for removal
//!   but something selected still depends on it, so the removal must not go
//!   ahead.
//! - **added**: the component is not installed and will be newly fetched.
//!   This is advisory; the caller acknowledges it and proceeds.
//!
//! Resolution never mutates the catalog. The caller inspects the returned
//! [`Resolution`] and either commits it with [`commit`] or discards it, which
//! keeps the selection consistent when a removal is blocked or the user
//! cancels.
//!
//! Dependencies of a component come from its marker file when one exists
//! (the installed artifact's recorded dependencies), otherwise from the
//! manifest. The closure is transitive and computed in one call, so resolving
//! again right after a commit is a no-op. Cycles in `depends` are not an
//! error here: every member of the cycle simply ends up selected.

use std::collections::{HashMap, HashSet, VecDeque};

use log::info;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::install_state::InstallLookup;
use crate::manifest::{Catalog, Component};
use crate::walker;

/// A component forced into the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forced {
    pub id: String,
    pub title: String,
    /// Titles of the selected components that depend on it.
    pub required_by: Vec<String>,
}

impl Forced {
    /// `Title (required by A, B)`.
    pub fn describe(&self) -> String {
        if self.required_by.is_empty() {
            self.title.clone()
        } else {
            format!("{} (required by {})", self.title, self.required_by.join(", "))
        }
    }
}

/// Outcome of a resolution pass. Both lists are in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub blocked: Vec<Forced>,
    pub added: Vec<Forced>,
}

impl Resolution {
    /// Nothing needs to change.
    pub fn is_noop(&self) -> bool {
        self.blocked.is_empty() && self.added.is_empty()
    }

    pub fn is_blocked(&self) -> bool {
        !self.blocked.is_empty()
    }

    pub fn blocked_titles(&self) -> Vec<&str> {
        self.blocked.iter().map(|f| f.title.as_str()).collect()
    }

    pub fn added_titles(&self) -> Vec<&str> {
        self.added.iter().map(|f| f.title.as_str()).collect()
    }

    /// Turn a blocking resolution into [`Error::DependencyConflict`].
    pub fn into_result(self) -> Result<Self> {
        if self.is_blocked() {
            Err(Error::DependencyConflict {
                blocked: self.blocked.iter().map(Forced::describe).collect(),
            })
        } else {
            Ok(self)
        }
    }
}

/// Compute the dependency closure of the current selection.
pub fn resolve(catalog: &Catalog, lookup: &dyn InstallLookup) -> Result<Resolution> {
    let by_id: HashMap<&str, &Component> = catalog
        .components()
        .map(|c| (c.info.id.as_str(), c))
        .collect();

    let mut selected: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&Component> = VecDeque::new();
    for component in catalog.components().filter(|c| c.checked) {
        selected.insert(component.info.id.as_str());
        queue.push_back(component);
    }

    let mut forced: HashSet<&str> = HashSet::new();
    let mut required_by: HashMap<&str, Vec<String>> = HashMap::new();

    while let Some(component) = queue.pop_front() {
        let depends = match lookup.marker(component)? {
            Some(marker) => marker.depends,
            None => component.depends.clone(),
        };

        for dependency in &depends {
            let Some(target) = by_id.get(dependency.as_str()).copied() else {
                continue;
            };
            let target_id = target.info.id.as_str();

            let requirers = required_by.entry(target_id).or_default();
            if !requirers.contains(&component.info.title) {
                requirers.push(component.info.title.clone());
            }

            if selected.insert(target_id) {
                forced.insert(target_id);
                queue.push_back(target);
            }
        }
    }

    let mut resolution = Resolution::default();
    for component in walker::components(&catalog.nodes) {
        let id = component.info.id.as_str();
        if !forced.contains(id) {
            continue;
        }
        let entry = Forced {
            id: id.to_string(),
            title: component.info.title.clone(),
            required_by: required_by.remove(id).unwrap_or_default(),
        };
        if lookup.is_installed(component) {
            resolution.blocked.push(entry);
        } else {
            info!("Dependency {} will also be installed", entry.id);
            resolution.added.push(entry);
        }
    }

    Ok(resolution)
}

/// Check every component forced by `resolution`. Returns how many changed.
pub fn commit(catalog: &mut Catalog, resolution: &Resolution) -> usize {
    let ids: HashSet<&str> = resolution
        .blocked
        .iter()
        .chain(&resolution.added)
        .map(|f| f.id.as_str())
        .collect();

    let mut changed = 0;
    walker::walk_components_mut(&mut catalog.nodes, |c| {
        if !c.checked && ids.contains(c.info.id.as_str()) {
            c.checked = true;
            changed += 1;
        }
    });
    changed
}
