use std::sync::Arc;

use modforge_craft_data::{TechType, TechTypeRegistry};

use crate::linking::LinkedTree;
use crate::operation::{BuildOperation, CraftItem};
use crate::queue::OperationQueue;
use crate::registry::{CraftTreeRegistry, CraftTreeType};
use crate::spawnable::Spawnable;
use crate::tree::Icon;
use crate::CraftTreeError;

/// Base model a custom fabricator is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FabricatorModel {
	/// The wall-mounted fabricator.
	#[default]
	Fabricator,
	/// The floor-standing modification station.
	Workbench,
	/// The compact fabricator used inside vehicles and moon pools.
	MoonPool,
	/// A model supplied by the mod itself.
	Custom,
}

/// Where a fabricator may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRules {
	pub allowed_in_base: bool,
	pub allowed_in_cyclops: bool,
	pub allowed_outside: bool,
	pub allowed_on_ceiling: bool,
	pub allowed_on_ground: bool,
	pub allowed_on_wall: bool,
	pub rotation_enabled: bool,
}

impl PlacementRules {
	/// Default rules: workbenches stand on the floor and rotate, everything else hangs on walls.
	pub fn for_model(model: FabricatorModel) -> Self {
		let workbench = model == FabricatorModel::Workbench;
		Self {
			allowed_in_base: true,
			allowed_in_cyclops: true,
			allowed_outside: false,
			allowed_on_ceiling: false,
			allowed_on_ground: workbench,
			allowed_on_wall: !workbench,
			rotation_enabled: workbench,
		}
	}
}

/// A modded fabricator and the custom craft tree it serves.
///
/// Tree nodes are registered with [`add_tab_node`](Self::add_tab_node) and
/// [`add_craft_node`](Self::add_craft_node) at any point during mod setup and
/// are only linked when [`finalize`](Self::finalize) runs, in registration
/// order. Finalize runs once.
#[derive(Debug)]
pub struct CustomFabricator {
	item: Arc<Spawnable>,
	model: FabricatorModel,
	placement: PlacementRules,
	queue: OperationQueue,
	tree_type: Option<CraftTreeType>,
}

impl CustomFabricator {
	pub fn new(class_id: impl Into<String>, friendly_name: impl Into<String>, description: impl Into<String>) -> Self {
		let item = Spawnable::new(class_id, friendly_name, description);
		let queue = OperationQueue::new(item.class_id());
		Self {
			item: Arc::new(item),
			model: FabricatorModel::default(),
			placement: PlacementRules::for_model(FabricatorModel::default()),
			queue,
			tree_type: None,
		}
	}

	/// Switches the model and resets placement rules to that model's defaults.
	pub fn with_model(mut self, model: FabricatorModel) -> Self {
		self.model = model;
		self.placement = PlacementRules::for_model(model);
		self
	}

	pub fn with_placement(mut self, placement: PlacementRules) -> Self {
		self.placement = placement;
		self
	}

	pub fn item(&self) -> &Arc<Spawnable> {
		&self.item
	}

	pub fn class_id(&self) -> &str {
		self.item.class_id()
	}

	pub fn model(&self) -> FabricatorModel {
		self.model
	}

	pub fn placement(&self) -> PlacementRules {
		self.placement
	}

	/// Type of the finalized tree; `None` until [`finalize`](Self::finalize) succeeds.
	pub fn tree_type(&self) -> Option<CraftTreeType> {
		self.tree_type
	}

	/// Identifier of the fabricator itself, once patched.
	pub fn tech_type(&self) -> Option<TechType> {
		self.item.tech_type()
	}

	pub fn pending(&self) -> usize {
		self.queue.len()
	}

	/// Queues a tab under `parent_tab_id`, or under the root when `None`.
	pub fn add_tab_node(&mut self, tab_id: &str, display_text: &str, icon: Icon, parent_tab_id: Option<&str>) -> Result<(), CraftTreeError> {
		self.queue.push(BuildOperation::add_tab(tab_id, display_text, icon, parent_tab_id))
	}

	/// Queues a craft node under `parent_tab_id`, or under the root when `None`.
	///
	/// `item` may be a [`TechType`], a modded item name, or an `Arc<Spawnable>`.
	pub fn add_craft_node(&mut self, item: impl Into<CraftItem>, parent_tab_id: Option<&str>) -> Result<(), CraftTreeError> {
		self.queue.push(BuildOperation::add_craft(item, parent_tab_id))
	}

	/// Patches the fabricator, builds its tree from the queued operations and registers it.
	pub fn finalize(&mut self, tech_types: &TechTypeRegistry, trees: &CraftTreeRegistry) -> Result<CraftTreeType, CraftTreeError> {
		if self.queue.is_drained() {
			return Err(CraftTreeError::AlreadyFinalized(self.class_id().to_owned()));
		}

		self.item.patch(tech_types);

		let mut linked = LinkedTree::new(self.item.class_id());
		let report = self.queue.drain(&mut linked, tech_types)?;
		let tree_type = trees.register(linked.into_tree());
		self.tree_type = Some(tree_type);

		tracing::info!(
			fabricator = self.item.class_id(),
			tree_type = tree_type.raw(),
			linked = report.linked,
			skipped = report.skipped,
			"craft_tree.finalize"
		);
		Ok(tree_type)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn placement_defaults_follow_model() {
		let wall = PlacementRules::for_model(FabricatorModel::Fabricator);
		assert!(wall.allowed_on_wall && !wall.allowed_on_ground && !wall.rotation_enabled);

		let bench = CustomFabricator::new("Bench", "Bench", "").with_model(FabricatorModel::Workbench);
		let rules = bench.placement();
		assert!(rules.allowed_on_ground && !rules.allowed_on_wall && rules.rotation_enabled);
		assert!(rules.allowed_in_base && !rules.allowed_outside);
	}

	#[test]
	fn finalize_patches_fabricator_and_registers_tree() {
		let tech_types = TechTypeRegistry::new();
		let trees = CraftTreeRegistry::new();
		let mut fab = CustomFabricator::new("OreRefinery", "Ore Refinery", "Refines ore.");
		fab.add_craft_node(TechType::from_raw(4), None).unwrap();

		let tree_type = fab.finalize(&tech_types, &trees).unwrap();

		assert_eq!(fab.tree_type(), Some(tree_type));
		assert_eq!(fab.tech_type(), tech_types.try_resolve("OreRefinery"));
		assert_eq!(trees.get(tree_type).map(|t| t.crafts()), Some(vec![TechType::from_raw(4)]));
	}

	#[test]
	fn failed_finalize_registers_nothing() {
		let tech_types = TechTypeRegistry::new();
		let trees = CraftTreeRegistry::new();
		let mut fab = CustomFabricator::new("Broken", "Broken", "");
		fab.add_craft_node(TechType::from_raw(4), Some("ghost")).unwrap();

		assert!(matches!(fab.finalize(&tech_types, &trees), Err(CraftTreeError::MissingParent { .. })));
		assert!(trees.is_empty());
		assert_eq!(fab.tree_type(), None);
		assert_eq!(fab.finalize(&tech_types, &trees), Err(CraftTreeError::AlreadyFinalized("Broken".into())));
	}
}
