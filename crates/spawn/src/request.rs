use std::fmt;

use glam::{Quat, Vec3};
use modforge_craft_data::TechType;
use serde::{Deserialize, Serialize};

/// How the object to spawn is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnTarget {
	/// Prefab class id, looked up in the prefab database.
	ClassId(String),
	/// Item identifier, looked up through its craft data.
	TechType(TechType),
}

impl fmt::Display for SpawnTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ClassId(class_id) => f.write_str(class_id),
			Self::TechType(tech_type) => write!(f, "{tech_type}"),
		}
	}
}

/// One object to place in the world.
///
/// A successful spawn appends an equal record to the [`SaveList`](crate::SaveList)
/// so the object can be placed again after a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
	pub target: SpawnTarget,
	pub position: Vec3,
	#[serde(default = "identity")]
	pub rotation: Quat,
}

fn identity() -> Quat {
	Quat::IDENTITY
}

impl SpawnRequest {
	pub fn by_class_id(class_id: impl Into<String>, position: Vec3, rotation: Quat) -> Self {
		Self {
			target: SpawnTarget::ClassId(class_id.into()),
			position,
			rotation,
		}
	}

	pub fn by_tech_type(tech_type: TechType, position: Vec3, rotation: Quat) -> Self {
		Self {
			target: SpawnTarget::TechType(tech_type),
			position,
			rotation,
		}
	}
}
