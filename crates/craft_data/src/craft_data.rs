use glam::IVec2;
use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::TechType;

/// One ingredient line of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
	pub tech_type: TechType,
	pub amount: u32,
}

impl Ingredient {
	pub const fn new(tech_type: TechType, amount: u32) -> Self {
		Self { tech_type, amount }
	}
}

/// Recipe for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechData {
	pub craft_amount: u32,
	pub ingredients: Vec<Ingredient>,
	#[serde(default)]
	pub linked_items: Vec<TechType>,
}

impl Default for TechData {
	fn default() -> Self {
		Self {
			craft_amount: 1,
			ingredients: Vec::new(),
			linked_items: Vec::new(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
	None,
	Hand,
	Head,
	Body,
	Gloves,
	Foots,
	Tank,
	Chip,
	BatteryCharger,
	PowerCellCharger,
	VehicleModule,
	CyclopsModule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuickSlotType {
	None,
	Passive,
	Instant,
	Selectable,
	SelectableChargeable,
	Toggleable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarvestType {
	None,
	Pick,
	DamageAlive,
	DamageDead,
	Click,
}

/// Inventory cell background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackgroundType {
	Normal,
	Blueprint,
	PlantWater,
	PlantWaterSeed,
	PlantAir,
	PlantAirSeed,
	ExosuitArm,
}

/// Top-level grouping used by the builder menus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechGroup(pub String);

/// Category inside a [`TechGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechCategory(pub String);

type GroupKey = (TechGroup, TechCategory);

#[derive(Debug, Default)]
struct CraftData {
	tech_data: HashMap<TechType, TechData>,
	equipment_types: HashMap<TechType, EquipmentType>,
	quick_slot_types: HashMap<TechType, QuickSlotType>,
	harvest_outputs: HashMap<TechType, TechType>,
	harvest_types: HashMap<TechType, HarvestType>,
	final_cut_bonuses: HashMap<TechType, i32>,
	item_sizes: HashMap<TechType, IVec2>,
	crafting_times: HashMap<TechType, f32>,
	cooked_variants: HashMap<TechType, TechType>,
	background_types: HashMap<TechType, BackgroundType>,
	buildables: Vec<TechType>,
	group_additions: HashMap<GroupKey, Vec<TechType>>,
	group_removals: HashMap<GroupKey, Vec<TechType>>,
}

/// Generates an upsert setter and a copying getter for one per-item property map.
macro_rules! property {
	($(#[$doc:meta])* $field:ident, $set:ident, $get:ident, $value:ty) => {
		$(#[$doc])*
		pub fn $set(&self, tech_type: TechType, value: $value) {
			self.data.write().$field.insert(tech_type, value);
		}

		pub fn $get(&self, tech_type: TechType) -> Option<$value> {
			self.data.read().$field.get(&tech_type).cloned()
		}
	};
}

/// Process-wide store of per-item craft data overrides.
///
/// Every setter is an upsert keyed by [`TechType`]; the last write wins. The
/// host reads the overrides back when it applies them to its own tables.
#[derive(Debug, Default)]
pub struct CraftDataRegistry {
	data: RwLock<CraftData>,
}

impl CraftDataRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	property!(
		/// Sets the recipe of an item. Works for host items too.
		tech_data, set_tech_data, tech_data, TechData
	);
	property!(equipment_types, set_equipment_type, equipment_type, EquipmentType);
	property!(quick_slot_types, set_quick_slot_type, quick_slot_type, QuickSlotType);
	property!(
		/// Sets which item is received when `tech_type` is harvested.
		harvest_outputs, set_harvest_output, harvest_output, TechType
	);
	property!(harvest_types, set_harvest_type, harvest_type, HarvestType);
	property!(
		/// Sets how many extra slices are granted on the final knife hit.
		final_cut_bonuses, set_harvest_final_cut_bonus, harvest_final_cut_bonus, i32
	);
	property!(item_sizes, set_item_size, item_size, IVec2);
	property!(
		/// Sets crafting time in seconds.
		crafting_times, set_crafting_time, crafting_time, f32
	);
	property!(
		/// Associates an inedible item with its cooked counterpart.
		cooked_variants, set_cooked_variant, cooked_variant, TechType
	);
	property!(background_types, set_background_type, background_type, BackgroundType);

	/// Marks an item as buildable. Repeated calls are ignored.
	pub fn add_buildable(&self, tech_type: TechType) {
		let mut data = self.data.write();
		if !data.buildables.contains(&tech_type) {
			data.buildables.push(tech_type);
		}
	}

	pub fn buildables(&self) -> Vec<TechType> {
		self.data.read().buildables.clone()
	}

	/// Adds an item to a builder group/category.
	pub fn add_to_group(&self, group: TechGroup, category: TechCategory, tech_type: TechType) {
		let mut data = self.data.write();
		let key = (group, category);
		if let Some(removed) = data.group_removals.get_mut(&key) {
			removed.retain(|t| *t != tech_type);
		}
		let added = data.group_additions.entry(key).or_default();
		if !added.contains(&tech_type) {
			added.push(tech_type);
		}
	}

	/// Removes an item from a builder group/category, including host items.
	pub fn remove_from_group(&self, group: TechGroup, category: TechCategory, tech_type: TechType) {
		let mut data = self.data.write();
		let key = (group, category);
		if let Some(added) = data.group_additions.get_mut(&key) {
			added.retain(|t| *t != tech_type);
		}
		let removed = data.group_removals.entry(key).or_default();
		if !removed.contains(&tech_type) {
			removed.push(tech_type);
		}
	}

	pub fn group_additions(&self, group: &TechGroup, category: &TechCategory) -> Vec<TechType> {
		let key = (group.clone(), category.clone());
		self.data.read().group_additions.get(&key).cloned().unwrap_or_default()
	}

	pub fn group_removals(&self, group: &TechGroup, category: &TechCategory) -> Vec<TechType> {
		let key = (group.clone(), category.clone());
		self.data.read().group_removals.get(&key).cloned().unwrap_or_default()
	}

	/// Drops every override, e.g. when the owning mod set is unloaded.
	pub fn clear(&self) {
		*self.data.write() = CraftData::default();
		tracing::debug!("craft_data.clear");
	}
}
