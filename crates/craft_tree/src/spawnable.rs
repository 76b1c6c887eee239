use std::sync::OnceLock;

use modforge_craft_data::{TechType, TechTypeRegistry};

/// Definition of a modded item that owns a [`TechType`] once patched.
///
/// Patching registers the item's class id with the [`TechTypeRegistry`] and
/// happens at most once, however many callers ask for it.
#[derive(Debug)]
pub struct Spawnable {
	class_id: String,
	friendly_name: String,
	description: String,
	tech_type: OnceLock<TechType>,
}

impl Spawnable {
	pub fn new(class_id: impl Into<String>, friendly_name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			class_id: class_id.into(),
			friendly_name: friendly_name.into(),
			description: description.into(),
			tech_type: OnceLock::new(),
		}
	}

	pub fn class_id(&self) -> &str {
		&self.class_id
	}

	pub fn friendly_name(&self) -> &str {
		&self.friendly_name
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn is_patched(&self) -> bool {
		self.tech_type.get().is_some()
	}

	/// The item's identifier, if it has been patched.
	pub fn tech_type(&self) -> Option<TechType> {
		self.tech_type.get().copied()
	}

	/// Registers the item and returns its identifier; later calls return the same value.
	pub fn patch(&self, tech_types: &TechTypeRegistry) -> TechType {
		*self.tech_type.get_or_init(|| {
			let tech_type = tech_types.register(&self.class_id);
			tracing::debug!(class_id = %self.class_id, tech_type = tech_type.raw(), "spawnable.patch");
			tech_type
		})
	}
}
