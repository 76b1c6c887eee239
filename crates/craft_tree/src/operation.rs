use std::fmt;
use std::sync::Arc;

use modforge_craft_data::{TechType, TechTypeRegistry};

use crate::linking::LinkedTree;
use crate::spawnable::Spawnable;
use crate::tree::Icon;
use crate::CraftTreeError;

/// The item a craft node points at, in order of how much work resolving it takes.
#[derive(Debug, Clone)]
pub enum CraftItem {
	/// A known identifier.
	TechType(TechType),
	/// A modded item looked up by name when the tree is finalized. Unknown names are skipped.
	Modded(String),
	/// Another definition; patched on demand if it has not been yet.
	Spawnable(Arc<Spawnable>),
}

impl From<TechType> for CraftItem {
	fn from(tech_type: TechType) -> Self {
		Self::TechType(tech_type)
	}
}

impl From<&str> for CraftItem {
	fn from(name: &str) -> Self {
		Self::Modded(name.to_owned())
	}
}

impl From<String> for CraftItem {
	fn from(name: String) -> Self {
		Self::Modded(name)
	}
}

impl From<Arc<Spawnable>> for CraftItem {
	fn from(item: Arc<Spawnable>) -> Self {
		Self::Spawnable(item)
	}
}

impl fmt::Display for CraftItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TechType(tech_type) => write!(f, "{tech_type}"),
			Self::Modded(name) => write!(f, "'{name}'"),
			Self::Spawnable(item) => write!(f, "'{}'", item.class_id()),
		}
	}
}

/// One deferred tree mutation with all of its arguments captured by value.
#[derive(Debug, Clone)]
pub enum BuildOperation {
	AddTab {
		tab_id: String,
		display_text: String,
		icon: Icon,
		parent: Option<String>,
	},
	AddCraft {
		item: CraftItem,
		parent: Option<String>,
	},
}

/// What applying one operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
	Linked,
	Skipped,
}

impl BuildOperation {
	pub fn add_tab(tab_id: impl Into<String>, display_text: impl Into<String>, icon: Icon, parent: Option<&str>) -> Self {
		Self::AddTab {
			tab_id: tab_id.into(),
			display_text: display_text.into(),
			icon,
			parent: parent.map(str::to_owned),
		}
	}

	pub fn add_craft(item: impl Into<CraftItem>, parent: Option<&str>) -> Self {
		Self::AddCraft {
			item: item.into(),
			parent: parent.map(str::to_owned),
		}
	}

	/// Applies the operation to `target`.
	///
	/// Unknown modded names are logged and skipped. A missing parent is returned as an error.
	pub fn apply(self, target: &mut LinkedTree, tech_types: &TechTypeRegistry) -> Result<Applied, CraftTreeError> {
		match self {
			Self::AddTab {
				tab_id,
				display_text,
				icon,
				parent,
			} => {
				target.add_tab(&tab_id, &display_text, icon, parent.as_deref())?;
				Ok(Applied::Linked)
			}
			Self::AddCraft { item, parent } => {
				let Some(tech_type) = resolve(&item, target.tree().name(), tech_types) else {
					return Ok(Applied::Skipped);
				};
				target.add_craft(tech_type, parent.as_deref())?;
				Ok(Applied::Linked)
			}
		}
	}
}

fn resolve(item: &CraftItem, tree: &str, tech_types: &TechTypeRegistry) -> Option<TechType> {
	match item {
		CraftItem::TechType(tech_type) => Some(*tech_type),
		CraftItem::Modded(name) => {
			let resolved = tech_types.try_resolve(name);
			if resolved.is_none() {
				tracing::info!(tree, item = %name, "Did not find a TechType value for '{name}' to add to the custom craft tree '{tree}'");
			}
			resolved
		}
		CraftItem::Spawnable(spawnable) => {
			if !spawnable.is_patched() {
				tracing::info!(
					tree,
					item = spawnable.class_id(),
					"'{}' had to be patched early to obtain its TechType value for the custom craft tree '{tree}'",
					spawnable.class_id()
				);
			}
			Some(spawnable.patch(tech_types))
		}
	}
}
