//! # Tree Command Implementation
//!
//! This module implements the `tree` subcommand, which renders the catalog
//! hierarchy with each component's selection box, size and install state.
//!
//! ## Functionality
//!
//! - **Catalog Visualization**: categories and components in document order
//! - **Install State**: with `--source`, markers are read and the selection
//!   mirrors what is installed
//! - **Depth Control**: `--depth` limits how many levels are printed
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use component_catalog::manifest::Node;
use component_catalog::output::{checkbox, emoji, status_tags, OutputConfig};
use component_catalog::session::Mode;
use component_catalog::sizes::format_bytes;

use super::{open_session, Context, ManifestArgs, SourceArgs};

/// Display the component tree
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Maximum depth to display in the tree.
    ///
    /// Use 0 to show only the top-level nodes.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `tree` command.
pub fn execute(args: TreeArgs, ctx: &Context) -> Result<()> {
    let session = open_session(&args.manifest, &args.source, Mode::Manage, ctx)?;
    let catalog = session.catalog();

    println!(
        "{} Components in {}",
        emoji(&ctx.output, "🌳", "[TREE]"),
        args.manifest.manifest.display()
    );

    let root = TreeNode {
        label: catalog.base_url.clone(),
        children: catalog
            .nodes
            .iter()
            .map(|node| build_tree_node(node, &ctx.output, args.depth.unwrap_or(usize::MAX), 0))
            .collect(),
    };
    print_tree(&root).map_err(|e| anyhow::anyhow!("Failed to display tree: {}", e))?;

    let sizes = session.sizes();
    println!();
    println!(
        "Selected: {}  To download: {}",
        format_bytes(sizes.modified),
        format_bytes(sizes.to_download)
    );
    Ok(())
}

fn label(node: &Node, output: &OutputConfig) -> String {
    match node {
        Node::Category(category) => {
            let required = if category.info.required { " (required)" } else { "" };
            format!("{} [{}]{}", category.info.title, category.info.id, required)
        }
        Node::Component(component) => format!(
            "{} {} [{}] {}{}",
            checkbox(component),
            component.info.title,
            component.info.id,
            format_bytes(component.size),
            status_tags(output, component)
        ),
    }
}

fn build_tree_node(
    node: &Node,
    output: &OutputConfig,
    max_depth: usize,
    current_depth: usize,
) -> TreeNode {
    let children = if current_depth >= max_depth {
        vec![]
    } else {
        node.children()
            .iter()
            .map(|child| build_tree_node(child, output, max_depth, current_depth + 1))
            .collect()
    };
    TreeNode {
        label: label(node, output),
        children,
    }
}

/// Tree node structure for ptree visualization
#[derive(Clone)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
}

impl TreeItem for TreeNode {
    type Child = TreeNode;

    fn write_self<W: std::io::Write>(
        &self,
        f: &mut W,
        _style: &ptree::Style,
    ) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}
