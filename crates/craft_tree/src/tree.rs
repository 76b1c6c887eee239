use std::fmt::Write as _;

use modforge_craft_data::TechType;

/// Sprite reference shown on a tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icon(String);

impl Icon {
	pub fn new(sprite: impl Into<String>) -> Self {
		Self(sprite.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Index of a node inside one [`CraftTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
	const ROOT: Self = Self(0);

	fn index(self) -> usize {
		self.0 as usize
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
	Root,
	Tab,
}

/// Handle to a node that accepts children.
///
/// Handles are only valid for the tree that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkNode {
	id: NodeId,
	kind: LinkKind,
}

impl LinkNode {
	pub const fn id(self) -> NodeId {
		self.id
	}

	pub const fn kind(self) -> LinkKind {
		self.kind
	}

	pub const fn is_root(self) -> bool {
		matches!(self.kind, LinkKind::Root)
	}
}

/// Display data carried by a tab node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
	pub id: String,
	pub display_text: String,
	pub icon: Icon,
}

/// One child entry of a root or tab, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CraftNode {
	Tab(LinkNode),
	Craft(TechType),
}

#[derive(Debug)]
struct Slot {
	kind: LinkKind,
	tab: Option<TabInfo>,
	children: Vec<CraftNode>,
}

/// Append-only crafting tree.
///
/// The root is created together with the tree; tabs and craft nodes can only
/// be added below an existing node and are never removed.
#[derive(Debug)]
pub struct CraftTree {
	name: String,
	slots: Vec<Slot>,
}

impl CraftTree {
	/// Creates a tree and returns it with its root handle.
	pub fn new(name: impl Into<String>) -> (Self, LinkNode) {
		let tree = Self {
			name: name.into(),
			slots: vec![Slot {
				kind: LinkKind::Root,
				tab: None,
				children: Vec::new(),
			}],
		};
		let root = tree.root();
		(tree, root)
	}

	/// Name the tree was created with.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Handle of the root node.
	pub fn root(&self) -> LinkNode {
		LinkNode {
			id: NodeId::ROOT,
			kind: LinkKind::Root,
		}
	}

	/// Number of nodes that accept children, the root included.
	pub fn node_count(&self) -> usize {
		self.slots.len()
	}

	/// Whether nothing has been added below the root.
	pub fn is_empty(&self) -> bool {
		self.slots[0].children.is_empty()
	}

	/// Adds a tab below `parent` and returns its handle.
	///
	/// # Panics
	///
	/// Panics if `parent` belongs to another tree.
	pub fn add_tab(&mut self, parent: LinkNode, id: impl Into<String>, display_text: impl Into<String>, icon: Icon) -> LinkNode {
		let node = LinkNode {
			id: NodeId(self.slots.len() as u32),
			kind: LinkKind::Tab,
		};
		self.slots.push(Slot {
			kind: LinkKind::Tab,
			tab: Some(TabInfo {
				id: id.into(),
				display_text: display_text.into(),
				icon,
			}),
			children: Vec::new(),
		});
		self.slots[parent.id.index()].children.push(CraftNode::Tab(node));
		node
	}

	/// Adds a craft node for `tech_type` below `parent`.
	///
	/// # Panics
	///
	/// Panics if `parent` belongs to another tree.
	pub fn add_craft(&mut self, parent: LinkNode, tech_type: TechType) {
		self.slots[parent.id.index()].children.push(CraftNode::Craft(tech_type));
	}

	/// Children of `node` in insertion order; empty for unknown handles.
	pub fn children(&self, node: LinkNode) -> &[CraftNode] {
		self.slots.get(node.id.index()).map_or(&[], |slot| slot.children.as_slice())
	}

	/// Display data of a tab; `None` for the root.
	pub fn tab(&self, node: LinkNode) -> Option<&TabInfo> {
		self.slots.get(node.id.index()).and_then(|slot| slot.tab.as_ref())
	}

	/// Follows tab ids from the root, taking the first matching child at each step.
	pub fn tab_at_path(&self, path: &[&str]) -> Option<LinkNode> {
		let mut current = self.root();
		for segment in path {
			current = self.children(current).iter().find_map(|child| match child {
				CraftNode::Tab(tab) if self.tab(*tab).is_some_and(|info| info.id == *segment) => Some(*tab),
				_ => None,
			})?;
		}
		Some(current)
	}

	/// Every craftable item in depth-first, insertion order.
	pub fn crafts(&self) -> Vec<TechType> {
		let mut out = Vec::new();
		self.collect_crafts(self.root(), &mut out);
		out
	}

	fn collect_crafts(&self, node: LinkNode, out: &mut Vec<TechType>) {
		for child in self.children(node) {
			match *child {
				CraftNode::Tab(tab) => self.collect_crafts(tab, out),
				CraftNode::Craft(tech_type) => out.push(tech_type),
			}
		}
	}

	/// Indented text rendering of the tree, one node per line.
	pub fn outline(&self) -> String {
		let mut out = String::new();
		let _ = writeln!(out, "{}", self.name);
		self.write_outline(self.root(), 1, &mut out);
		out
	}

	fn write_outline(&self, node: LinkNode, depth: usize, out: &mut String) {
		debug_assert!(self.slots[node.id.index()].kind == node.kind);
		for child in self.children(node) {
			let indent = "  ".repeat(depth);
			match *child {
				CraftNode::Tab(tab) => {
					if let Some(info) = self.tab(tab) {
						let _ = writeln!(out, "{indent}tab {} \"{}\"", info.id, info.display_text);
					}
					self.write_outline(tab, depth + 1, out);
				}
				CraftNode::Craft(tech_type) => {
					let _ = writeln!(out, "{indent}craft {}", tech_type.raw());
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn new_tree_has_only_root() {
		let (tree, root) = CraftTree::new("bench");
		assert!(root.is_root());
		assert!(tree.is_empty());
		assert_eq!(tree.node_count(), 1);
		assert!(tree.tab(root).is_none());
	}

	#[test]
	fn children_keep_insertion_order() {
		let (mut tree, root) = CraftTree::new("bench");
		let fuel = tree.add_tab(root, "fuel", "Fuel", Icon::new("fuel.png"));
		tree.add_craft(fuel, TechType::from_raw(7));
		let tools = tree.add_tab(fuel, "tools", "Tools", Icon::new("tools.png"));

		assert_eq!(tree.children(fuel), &[CraftNode::Craft(TechType::from_raw(7)), CraftNode::Tab(tools)]);
		assert_eq!(tree.tab_at_path(&["fuel", "tools"]), Some(tools));
		assert_eq!(tree.tab(tools).map(|t| t.icon.as_str()), Some("tools.png"));
	}

	#[test]
	fn outline_renders_nested_tabs() {
		let (mut tree, root) = CraftTree::new("bench");
		let a = tree.add_tab(root, "a", "A", Icon::new("a"));
		tree.add_craft(a, TechType::from_raw(1));
		tree.add_craft(root, TechType::from_raw(2));

		assert!(!tree.is_empty());
		assert_eq!(tree.node_count(), 2);
		assert_eq!(tree.outline(), "bench\n  tab a \"A\"\n    craft 1\n  craft 2\n");
		assert_eq!(tree.crafts(), vec![TechType::from_raw(1), TechType::from_raw(2)]);
	}
}
