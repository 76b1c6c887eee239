use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

/// Numeric identifier of one craftable or spawnable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechType(u32);

impl TechType {
	/// First raw value handed out to modded items. Host-defined items live below it.
	pub const FIRST_MODDED: u32 = 11_000;

	pub const fn from_raw(raw: u32) -> Self {
		Self(raw)
	}

	pub const fn raw(self) -> u32 {
		self.0
	}

	pub const fn is_modded(self) -> bool {
		self.0 >= Self::FIRST_MODDED
	}
}

impl fmt::Display for TechType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TechType({})", self.0)
	}
}

#[derive(Debug)]
struct Names {
	by_name: HashMap<String, TechType>,
	by_id: HashMap<TechType, String>,
	next: u32,
}

impl Default for Names {
	fn default() -> Self {
		Self {
			by_name: HashMap::default(),
			by_id: HashMap::default(),
			next: TechType::FIRST_MODDED,
		}
	}
}

/// Name-to-identifier service for modded items.
///
/// Constructed once per process and shared by `Arc`. Every item registered by
/// name gets a fresh [`TechType`]; registering the same name twice returns the
/// identifier allocated the first time.
#[derive(Debug, Default)]
pub struct TechTypeRegistry {
	names: RwLock<Names>,
}

impl TechTypeRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocates (or returns the existing) identifier for `name`.
	pub fn register(&self, name: &str) -> TechType {
		if let Some(existing) = self.try_resolve(name) {
			return existing;
		}

		let mut names = self.names.write();
		// Another caller may have won the race between the read and write locks.
		if let Some(&existing) = names.by_name.get(name) {
			return existing;
		}

		let tech_type = TechType(names.next);
		names.next = names.next.wrapping_add(1);
		names.by_name.insert(name.to_owned(), tech_type);
		names.by_id.insert(tech_type, name.to_owned());
		tracing::debug!(name, tech_type = tech_type.raw(), "tech_type.register");
		tech_type
	}

	/// Looks up a previously registered modded item.
	pub fn try_resolve(&self, name: &str) -> Option<TechType> {
		self.names.read().by_name.get(name).copied()
	}

	/// Returns the registered name of a modded item.
	pub fn name_of(&self, tech_type: TechType) -> Option<String> {
		self.names.read().by_id.get(&tech_type).cloned()
	}

	pub fn len(&self) -> usize {
		self.names.read().by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Forgets every registration and restarts allocation at [`TechType::FIRST_MODDED`].
	pub fn clear(&self) {
		*self.names.write() = Names::default();
	}
}
