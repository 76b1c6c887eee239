use modforge_craft_data::TechType;
use rustc_hash::FxHashMap as HashMap;

use crate::CraftTreeError;
use crate::tree::{CraftTree, Icon, LinkNode};

/// Key under which the root of every tree is registered.
pub const ROOT_KEY: &str = "root";

/// Maps tab ids to the nodes they were attached as.
///
/// Registering an id twice keeps the newer node.
#[derive(Debug, Default)]
pub struct NodeRegistry {
	nodes: HashMap<String, LinkNode>,
}

impl NodeRegistry {
	/// Creates a registry holding only `root` under [`ROOT_KEY`].
	pub fn with_root(root: LinkNode) -> Self {
		let mut registry = Self::default();
		registry.insert(ROOT_KEY, root);
		registry
	}

	/// Registers `node` under `key`, returning the node it replaced.
	pub fn insert(&mut self, key: impl Into<String>, node: LinkNode) -> Option<LinkNode> {
		self.nodes.insert(key.into(), node)
	}

	/// Returns the node currently registered under `key`.
	pub fn get(&self, key: &str) -> Option<LinkNode> {
		self.nodes.get(key).copied()
	}

	/// Returns whether `key` is registered.
	pub fn contains(&self, key: &str) -> bool {
		self.nodes.contains_key(key)
	}

	/// Returns the number of registered keys, the root key included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// A tree under construction together with its key index.
///
/// All mutation goes through keys; a missing parent key is reported as
/// [`CraftTreeError::MissingParent`].
#[derive(Debug)]
pub struct LinkedTree {
	tree: CraftTree,
	nodes: NodeRegistry,
}

impl LinkedTree {
	/// Creates the tree root and registers it before anything else can be linked.
	pub fn new(name: impl Into<String>) -> Self {
		let (tree, root) = CraftTree::new(name);
		Self {
			tree,
			nodes: NodeRegistry::with_root(root),
		}
	}

	/// Returns the tree built so far.
	pub fn tree(&self) -> &CraftTree {
		&self.tree
	}

	/// Returns the key index.
	pub fn nodes(&self) -> &NodeRegistry {
		&self.nodes
	}

	/// Finishes construction, dropping the key index.
	pub fn into_tree(self) -> CraftTree {
		self.tree
	}

	/// Adds a tab under `parent` (the root when `None`) and registers it under `tab_id`.
	pub fn add_tab(&mut self, tab_id: &str, display_text: &str, icon: Icon, parent: Option<&str>) -> Result<LinkNode, CraftTreeError> {
		let parent = self.parent(parent, || format!("tab '{tab_id}'"))?;
		let tab = self.tree.add_tab(parent, tab_id, display_text, icon);
		if let Some(previous) = self.nodes.insert(tab_id, tab) {
			tracing::debug!(tree = self.tree.name(), tab_id, previous = ?previous.id(), "craft_tree.tab_replaced");
		}
		Ok(tab)
	}

	/// Adds a craft node for `tech_type` under `parent` (the root when `None`).
	pub fn add_craft(&mut self, tech_type: TechType, parent: Option<&str>) -> Result<(), CraftTreeError> {
		let parent = self.parent(parent, || format!("craft node {tech_type}"))?;
		self.tree.add_craft(parent, tech_type);
		Ok(())
	}

	fn parent(&self, key: Option<&str>, child: impl FnOnce() -> String) -> Result<LinkNode, CraftTreeError> {
		let key = key.unwrap_or(ROOT_KEY);
		self.nodes.get(key).ok_or_else(|| CraftTreeError::MissingParent {
			owner: self.tree.name().to_owned(),
			parent: key.to_owned(),
			child: child(),
		})
	}
}
