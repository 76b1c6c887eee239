use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::tree::CraftTree;

/// Identifier of a registered custom craft tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CraftTreeType(u32);

impl CraftTreeType {
	/// First value handed out to custom trees. Host trees live below it.
	pub const FIRST_CUSTOM: u32 = 100;

	pub const fn raw(self) -> u32 {
		self.0
	}
}

#[derive(Debug)]
struct Trees {
	by_type: HashMap<CraftTreeType, Arc<CraftTree>>,
	by_name: HashMap<String, CraftTreeType>,
	next: u32,
}

impl Default for Trees {
	fn default() -> Self {
		Self {
			by_type: HashMap::default(),
			by_name: HashMap::default(),
			next: CraftTreeType::FIRST_CUSTOM,
		}
	}
}

/// Finalized custom craft trees, looked up by type or by tree name.
#[derive(Debug, Default)]
pub struct CraftTreeRegistry {
	trees: RwLock<Trees>,
}

impl CraftTreeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a finished tree and allocates its type.
	///
	/// A later tree with the same name takes over the name lookup; the older
	/// tree stays reachable by its own type.
	pub fn register(&self, tree: CraftTree) -> CraftTreeType {
		let mut trees = self.trees.write();
		let tree_type = CraftTreeType(trees.next);
		trees.next = trees.next.wrapping_add(1);
		trees.by_name.insert(tree.name().to_owned(), tree_type);
		tracing::debug!(tree = tree.name(), tree_type = tree_type.raw(), "craft_tree.register");
		trees.by_type.insert(tree_type, Arc::new(tree));
		tree_type
	}

	/// Returns the tree registered as `tree_type`.
	pub fn get(&self, tree_type: CraftTreeType) -> Option<Arc<CraftTree>> {
		self.trees.read().by_type.get(&tree_type).cloned()
	}

	/// Returns the newest tree registered under `name`, with its type.
	pub fn find(&self, name: &str) -> Option<(CraftTreeType, Arc<CraftTree>)> {
		let trees = self.trees.read();
		let tree_type = *trees.by_name.get(name)?;
		trees.by_type.get(&tree_type).map(|tree| (tree_type, Arc::clone(tree)))
	}

	/// Returns the number of registered trees.
	pub fn len(&self) -> usize {
		self.trees.read().by_type.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Forgets every tree and restarts allocation at [`CraftTreeType::FIRST_CUSTOM`].
	pub fn clear(&self) {
		*self.trees.write() = Trees::default();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn registered_tree_is_found_by_type_and_name() {
		let registry = CraftTreeRegistry::new();
		let (tree, _) = CraftTree::new("bench");
		let tree_type = registry.register(tree);

		assert_eq!(tree_type.raw(), CraftTreeType::FIRST_CUSTOM);
		assert_eq!(registry.get(tree_type).map(|t| t.name().to_owned()).as_deref(), Some("bench"));
		assert_eq!(registry.find("bench").map(|(t, _)| t), Some(tree_type));
	}

	#[test]
	fn name_lookup_follows_newest_tree() {
		let registry = CraftTreeRegistry::new();
		let first = registry.register(CraftTree::new("bench").0);
		let second = registry.register(CraftTree::new("bench").0);

		assert_ne!(first, second);
		assert_eq!(registry.find("bench").map(|(t, _)| t), Some(second));
		assert!(registry.get(first).is_some());
		assert_eq!(registry.len(), 2);
	}
}
