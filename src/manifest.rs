//! # Component Manifest
//!
//! This module defines the typed catalog tree and the parser that builds it
//! from the manifest XML document.
//!
//! ## Document Shape
//!
//! ```xml
//! <list url="https://example.com/components">
//!   <category id="required" title="Core" description="Always installed">
//!     <component id="base" title="Base" description="..." hash="1a2b3c4d" size="1024"/>
//!   </category>
//!   <category id="extras" title="Extras" description="...">
//!     <component id="music" title="Music" description="..." hash="deadbeef"
//!                size="2048" depends="required-base" checked="true"/>
//!   </category>
//! </list>
//! ```
//!
//! ## Derived Fields
//!
//! - **id**: the local `id` of every ancestor (document root excluded) and of
//!   the node itself, joined with the configured separator, outermost first.
//! - **required**: true when the node lives under the reserved root category
//!   or under a category that declares `required="true"`. The first id
//!   segment must equal `required_root` as a whole: `requiredExtras` is not
//!   under the `required` root.
//! - **url**: with no own `url` attribute, `<base>/<id>.<ext>`; otherwise the
//!   base URL, every ancestor `url` fragment and the node's own fragment joined
//!   with `/`.
//! - **checked**: the `checked` attribute, forced true for required
//!   components.
//! - **path**: the install path of a component, one segment per ancestor
//!   category (its `url` fragment, falling back to its local id). A category
//!   fragment may not leave its parent directory.
//!
//! Any missing required attribute, malformed hash, non-numeric size,
//! malformed boolean or duplicate id aborts the whole parse with a
//! [`ManifestError`]. A partially valid catalog is never returned.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use log::{debug, info};
use url::Url;
use xot::{NameId, Xot};

use crate::config::Settings;
use crate::error::{Error, ManifestError, Result};
use crate::suggestions;
use crate::walker;

/// Fields shared by categories and components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    /// Hierarchical id, unique within the catalog.
    pub id: String,
    /// The node's own `id` attribute.
    pub local_id: String,
    pub title: String,
    pub description: String,
    /// Required nodes are shown disabled and can never be deselected.
    pub required: bool,
}

/// A grouping node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub info: NodeInfo,
    pub children: Vec<Node>,
}

/// An installable leaf node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub info: NodeInfo,
    /// Absolute download URL of the archive.
    pub url: String,
    /// Install path relative to the markers directory.
    pub path: PathBuf,
    /// Expected archive checksum, 8 hex characters.
    pub hash: String,
    /// Archive size in bytes.
    pub size: u64,
    /// Ids of components that must be selected whenever this one is.
    pub depends: Vec<String>,
    /// Selection flag.
    pub checked: bool,
    /// Whether a marker file was found at the last sync.
    pub installed: bool,
}

/// A node of the catalog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Category(Category),
    Component(Component),
}

impl Node {
    pub fn info(&self) -> &NodeInfo {
        match self {
            Node::Category(category) => &category.info,
            Node::Component(component) => &component.info,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Node::Component(component) => Some(component),
            Node::Category(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Category(category) => &category.children,
            Node::Component(_) => &[],
        }
    }
}

/// The parsed catalog: the document root's base URL and its top-level nodes.
///
/// The structure is fixed after parsing. Only the `checked` and `installed`
/// flags of components change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub base_url: String,
    pub nodes: Vec<Node>,
}

impl Catalog {
    /// Pre-order iterator over every node.
    pub fn iter(&self) -> walker::PreOrder<'_> {
        walker::iter(&self.nodes)
    }

    /// Every component in document order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        walker::components(&self.nodes)
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.iter().find(|node| node.info().id == id)
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components().find(|component| component.info.id == id)
    }

    /// Ids of the currently checked components, in document order.
    pub fn checked_ids(&self) -> Vec<String> {
        self.components()
            .filter(|c| c.checked)
            .map(|c| c.info.id.clone())
            .collect()
    }

    /// Set the checked flag of every component to its membership in `ids`.
    /// Required components stay checked.
    pub fn restore_selection(&mut self, ids: &[String]) {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        walker::walk_components_mut(&mut self.nodes, |c| {
            c.checked = c.info.required || ids.contains(c.info.id.as_str());
        });
    }

    /// Check or uncheck a node.
    ///
    /// A component is set directly. A category cascades to every descendant
    /// component; when unchecking, required descendants stay checked. Unchecking
    /// a required node is refused. Returns the number of components whose flag
    /// changed.
    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<usize> {
        if let Some(node) = walker::find_mut(&mut self.nodes, id) {
            return set_node_checked(node, checked);
        }
        Err(self.unknown(id))
    }

    /// Build an [`Error::UnknownComponent`] with the closest catalog id.
    pub fn unknown(&self, id: &str) -> Error {
        let ids: Vec<&str> = self.iter().map(|node| node.info().id.as_str()).collect();
        Error::UnknownComponent {
            id: id.to_string(),
            suggestion: suggestions::find_similar(id, &ids).map(str::to_string),
        }
    }

    /// `(component id, dependency id)` pairs whose dependency names no
    /// component in the catalog.
    pub fn dangling_dependencies(&self) -> Vec<(String, String)> {
        let known: HashSet<&str> = self.components().map(|c| c.info.id.as_str()).collect();
        self.components()
            .flat_map(|c| {
                c.depends
                    .iter()
                    .filter(|d| !known.contains(d.as_str()))
                    .map(move |d| (c.info.id.clone(), d.clone()))
            })
            .collect()
    }

    /// Find a cycle in the `depends` graph, returning the ids along it with
    /// the first id repeated at the end.
    pub fn find_dependency_cycle(&self) -> Option<Vec<String>> {
        let graph: HashMap<&str, &[String]> = self
            .components()
            .map(|c| (c.info.id.as_str(), c.depends.as_slice()))
            .collect();
        let mut finished = HashSet::new();

        for component in self.components() {
            let mut path = Vec::new();
            if let Some(cycle) =
                detect_cycle(component.info.id.as_str(), &graph, &mut path, &mut finished)
            {
                return Some(cycle);
            }
        }
        None
    }

    /// Fail with [`Error::CycleDetected`] when the `depends` graph has a cycle.
    pub fn check_cycles(&self) -> Result<()> {
        match self.find_dependency_cycle() {
            Some(cycle) => Err(Error::CycleDetected {
                cycle: cycle.join(" -> "),
            }),
            None => Ok(()),
        }
    }
}

fn set_node_checked(node: &mut Node, checked: bool) -> Result<usize> {
    if !checked && node.info().required {
        return Err(Error::RequiredComponent {
            id: node.info().id.clone(),
        });
    }

    let mut changed = 0;
    match node {
        Node::Component(component) => {
            if component.checked != checked {
                component.checked = checked;
                changed += 1;
            }
        }
        Node::Category(category) => {
            walker::walk_components_mut(&mut category.children, |c| {
                if c.checked != checked && (checked || !c.info.required) {
                    c.checked = checked;
                    changed += 1;
                }
            });
        }
    }
    Ok(changed)
}

/// True when no segment of `fragment` leaves its parent directory.
fn is_relative_fragment(fragment: &str) -> bool {
    fragment
        .trim_matches('/')
        .split(['/', '\\'])
        .all(|segment| segment != "." && segment != ".." && !segment.contains(':'))
}

fn detect_cycle<'a>(
    id: &'a str,
    graph: &HashMap<&'a str, &'a [String]>,
    path: &mut Vec<&'a str>,
    finished: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    if let Some(start) = path.iter().position(|p| *p == id) {
        let mut cycle: Vec<String> = path[start..].iter().map(|p| p.to_string()).collect();
        cycle.push(id.to_string());
        return Some(cycle);
    }
    if finished.contains(id) {
        return None;
    }

    let depends = graph.get(id)?;
    path.push(id);
    for dependency in depends.iter() {
        if let Some((key, _)) = graph.get_key_value(dependency.as_str()) {
            if let Some(cycle) = detect_cycle(*key, graph, path, finished) {
                return Some(cycle);
            }
        }
    }
    path.pop();
    finished.insert(id);
    None
}

/// Parse a manifest document into a [`Catalog`].
pub fn parse(xml: &str, settings: &Settings) -> std::result::Result<Catalog, ManifestError> {
    let mut xot = Xot::new();
    let names = Names::new(&mut xot);
    let document = xot
        .parse(xml)
        .map_err(|e| ManifestError::new("document", None, e.to_string()))?;

    let root = xot
        .children(document)
        .find(|node| xot.element(*node).is_some())
        .ok_or_else(|| ManifestError::new("document", None, "no root element"))?;

    let base_url = xot
        .get_attribute(root, names.url)
        .ok_or_else(|| ManifestError::missing("list", "url"))?;
    Url::parse(base_url).map_err(|e| {
        ManifestError::new("list", Some("url"), format!("\"{}\" is not a valid URL: {}", base_url, e))
    })?;

    let mut parser = Parser {
        xot: &xot,
        names: &names,
        settings,
        base_url: base_url.trim_end_matches('/').to_string(),
        seen: HashSet::new(),
    };
    let nodes = parser.children(root, &Lineage::default())?;

    let catalog = Catalog {
        base_url: base_url.to_string(),
        nodes,
    };
    info!(
        "Loaded manifest with {} nodes ({} components)",
        catalog.iter().count(),
        catalog.components().count()
    );
    Ok(catalog)
}

/// Read and parse a manifest file.
pub fn from_file<P: AsRef<Path>>(path: P, settings: &Settings) -> Result<Catalog> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    Ok(parse(&content, settings)?)
}

/// Interned element and attribute names.
struct Names {
    category: NameId,
    component: NameId,
    id: NameId,
    title: NameId,
    description: NameId,
    url: NameId,
    required: NameId,
    hash: NameId,
    size: NameId,
    depends: NameId,
    checked: NameId,
}

impl Names {
    fn new(xot: &mut Xot) -> Self {
        Self {
            category: xot.add_name("category"),
            component: xot.add_name("component"),
            id: xot.add_name("id"),
            title: xot.add_name("title"),
            description: xot.add_name("description"),
            url: xot.add_name("url"),
            required: xot.add_name("required"),
            hash: xot.add_name("hash"),
            size: xot.add_name("size"),
            depends: xot.add_name("depends"),
            checked: xot.add_name("checked"),
        }
    }
}

/// What a node inherits from its ancestors.
#[derive(Debug, Clone, Default)]
struct Lineage {
    ids: Vec<String>,
    url_fragments: Vec<String>,
    path: PathBuf,
    required: bool,
}

struct Parser<'a> {
    xot: &'a Xot,
    names: &'a Names,
    settings: &'a Settings,
    base_url: String,
    seen: HashSet<String>,
}

impl<'a> Parser<'a> {
    fn children(
        &mut self,
        parent: xot::Node,
        lineage: &Lineage,
    ) -> std::result::Result<Vec<Node>, ManifestError> {
        let mut nodes = Vec::new();
        for child in self.xot.children(parent) {
            let Some(element) = self.xot.element(child) else {
                continue;
            };
            let name = element.name();
            if name == self.names.category {
                nodes.push(Node::Category(self.category(child, lineage)?));
            } else if name == self.names.component {
                nodes.push(Node::Component(self.component(child, lineage)?));
            } else {
                return Err(ManifestError::new(
                    "element",
                    None,
                    "unexpected element, expected <category> or <component>",
                ));
            }
        }
        Ok(nodes)
    }

    fn category(
        &mut self,
        node: xot::Node,
        lineage: &Lineage,
    ) -> std::result::Result<Category, ManifestError> {
        const KIND: &str = "category";
        let mut info = self.info(KIND, node, lineage)?;
        info.required |= self.flag(KIND, node, self.names.required, "required")?;

        let fragment = self.attribute(node, self.names.url);
        if fragment.is_some_and(|f| !is_relative_fragment(f)) {
            return Err(ManifestError::new(
                KIND,
                Some("url"),
                format!(
                    "url of category \"{}\" must be a relative path without '.' or '..'",
                    info.title
                ),
            ));
        }
        let mut inner = lineage.clone();
        inner.ids.push(info.local_id.clone());
        inner
            .path
            .push(fragment.map(|f| f.trim_matches('/')).unwrap_or(info.local_id.as_str()));
        if let Some(fragment) = fragment {
            inner.url_fragments.push(fragment.to_string());
        }
        inner.required = info.required;

        debug!("Parsed category {}", info.id);
        let children = self.children(node, &inner)?;
        Ok(Category { info, children })
    }

    fn component(
        &mut self,
        node: xot::Node,
        lineage: &Lineage,
    ) -> std::result::Result<Component, ManifestError> {
        const KIND: &str = "component";
        let info = self.info(KIND, node, lineage)?;

        let hash = self.required_attribute(KIND, node, self.names.hash, "hash")?;
        if hash.len() != 8 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ManifestError::new(
                KIND,
                Some("hash"),
                format!("hash of component \"{}\" is invalid", info.title),
            ));
        }

        let size = self
            .required_attribute(KIND, node, self.names.size, "size")?
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                ManifestError::new(
                    KIND,
                    Some("size"),
                    format!("size of component \"{}\" is not a number", info.title),
                )
            })?;

        let depends = self
            .attribute(node, self.names.depends)
            .map(|d| d.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        // Required components are always part of the selection
        let checked = self.flag(KIND, node, self.names.checked, "checked")? || info.required;

        let url = match self.attribute(node, self.names.url) {
            Some(fragment) => {
                let mut parts = vec![self.base_url.as_str()];
                parts.extend(lineage.url_fragments.iter().map(|f| f.trim_matches('/')));
                parts.push(fragment.trim_matches('/'));
                parts.join("/")
            }
            None => format!(
                "{}/{}.{}",
                self.base_url, info.id, self.settings.archive_extension
            ),
        };

        Ok(Component {
            url,
            path: lineage.path.clone(),
            hash: hash.to_string(),
            size,
            depends,
            checked,
            installed: false,
            info,
        })
    }

    fn info(
        &mut self,
        kind: &str,
        node: xot::Node,
        lineage: &Lineage,
    ) -> std::result::Result<NodeInfo, ManifestError> {
        let local_id = self.required_attribute(kind, node, self.names.id, "id")?;
        let separator = self.settings.id_separator.as_str();
        let id = if lineage.ids.is_empty() {
            local_id.to_string()
        } else {
            format!("{}{}{}", lineage.ids.join(separator), separator, local_id)
        };

        if !self.seen.insert(id.clone()) {
            return Err(ManifestError::new(
                kind,
                Some("id"),
                format!("duplicate id \"{}\"", id),
            ));
        }

        let root_id = lineage.ids.first().map(String::as_str).unwrap_or(local_id);
        Ok(NodeInfo {
            required: lineage.required || root_id == self.settings.required_root,
            title: self
                .required_attribute(kind, node, self.names.title, "title")?
                .to_string(),
            description: self
                .required_attribute(kind, node, self.names.description, "description")?
                .to_string(),
            local_id: local_id.to_string(),
            id,
        })
    }

    fn attribute(&self, node: xot::Node, name: NameId) -> Option<&'a str> {
        self.xot.get_attribute(node, name)
    }

    fn required_attribute(
        &self,
        kind: &str,
        node: xot::Node,
        name: NameId,
        label: &str,
    ) -> std::result::Result<&'a str, ManifestError> {
        self.attribute(node, name)
            .ok_or_else(|| ManifestError::missing(kind, label))
    }

    /// Optional boolean attribute, false when absent.
    fn flag(
        &self,
        kind: &str,
        node: xot::Node,
        name: NameId,
        label: &str,
    ) -> std::result::Result<bool, ManifestError> {
        match self.attribute(node, name).map(str::trim) {
            None => Ok(false),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
            Some(value) => Err(ManifestError::new(
                kind,
                Some(label),
                format!("\"{}\" is not a boolean", value),
            )),
        }
    }
}
