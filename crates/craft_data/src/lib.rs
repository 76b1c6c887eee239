//! Item identifiers and the per-item data stores that mods edit.
//!
//! Both registries here are plain upsert stores: [`TechTypeRegistry`] maps
//! modded item names to [`TechType`] values and [`CraftDataRegistry`] holds
//! recipe, slot, size and grouping overrides. Neither imposes ordering; that
//! is the job of the craft tree builder.

mod craft_data;
mod tech_type;

pub use craft_data::{
	BackgroundType, CraftDataRegistry, EquipmentType, HarvestType, Ingredient, QuickSlotType, TechCategory, TechData, TechGroup,
};
pub use tech_type::{TechType, TechTypeRegistry};
