//! Readiness-gated spawning of world entities.
//!
//! A [`SpawnCoordinator`] handles exactly one [`SpawnRequest`]: it resolves
//! the prefab through a [`PrefabResolver`], waits until the [`WorldStreamer`]
//! is ready and the terrain batch at the target position has loaded, then
//! activates and registers the entity through the [`EntityHost`] and appends
//! the request to the shared [`SaveList`].
//!
//! Coordinators are started and torn down through a [`Spawner`].

mod config;
mod coordinator;
mod error;
mod request;
mod save_list;
mod spawner;
pub mod world;

pub use config::{ConfigError, SpawnConfig};
pub use coordinator::{SpawnContext, SpawnCoordinator, SpawnOutcome, SpawnReport, SpawnState};
pub use error::SpawnError;
pub use request::{SpawnRequest, SpawnTarget};
pub use save_list::SaveList;
pub use spawner::{SpawnHandle, SpawnSet, Spawner};
pub use world::{BatchId, CellLevel, EntityHost, EntityId, Prefab, PrefabResolver, WorldStreamer};
