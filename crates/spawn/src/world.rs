//! Host-side collaborators the coordinator drives.

use async_trait::async_trait;
use glam::{IVec3, Quat, Vec3};
use modforge_craft_data::TechType;

/// Streaming granularity of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellLevel {
	Near,
	Medium,
	Far,
	VeryFar,
	/// Lives with its batch and is loaded together with it.
	Batch,
	/// Always loaded.
	Global,
}

/// A resolved prefab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefab {
	pub class_id: String,
	/// `None` when the prefab is not managed by the world streamer at all.
	pub cell_level: Option<CellLevel>,
}

impl Prefab {
	/// Whether spawning may skip waiting for terrain streaming.
	pub fn is_streaming_exempt(&self) -> bool {
		matches!(self.cell_level, Some(CellLevel::Batch | CellLevel::Global))
	}
}

/// Spatial partition of the world; the unit in which terrain loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(pub IVec3);

/// Host handle of an instantiated entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

/// Asynchronous prefab lookup.
#[async_trait]
pub trait PrefabResolver: Send + Sync {
	async fn resolve_by_class_id(&self, class_id: &str) -> Option<Prefab>;

	async fn resolve_by_tech_type(&self, tech_type: TechType) -> Option<Prefab>;
}

/// World streaming state. All methods are polled and must not block.
pub trait WorldStreamer: Send + Sync {
	/// Whether the streamer itself has finished initialising.
	fn is_ready(&self) -> bool;

	fn containing_batch(&self, position: Vec3) -> BatchId;

	/// Whether the terrain of `batch` is fully loaded.
	fn is_batch_compiled(&self, batch: BatchId) -> bool;
}

/// Entity lifecycle on the host side.
pub trait EntityHost: Send + Sync {
	/// Creates an inactive instance of `prefab` at the given transform.
	fn instantiate_deactivated(&self, prefab: &Prefab, position: Vec3, rotation: Quat) -> EntityId;

	fn activate(&self, entity: EntityId);

	/// Hands the entity to the cell manager. `batch` is `None` for streaming-exempt entities.
	fn register(&self, entity: EntityId, batch: Option<BatchId>);

	/// Destroys an instance that will never be activated.
	fn discard(&self, entity: EntityId);
}
