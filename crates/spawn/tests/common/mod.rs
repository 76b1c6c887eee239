//! In-memory world collaborators for spawn integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use glam::{IVec3, Quat, Vec3};
use modforge_craft_data::TechType;
use modforge_spawn::world::{BatchId, CellLevel, EntityHost, EntityId, Prefab, PrefabResolver, WorldStreamer};
use modforge_spawn::{SaveList, SpawnConfig, SpawnContext, SpawnRequest};
use parking_lot::Mutex;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn prefab(class_id: &str, cell_level: Option<CellLevel>) -> Prefab {
	Prefab {
		class_id: class_id.to_owned(),
		cell_level,
	}
}

pub fn request(class_id: &str, x: f32) -> SpawnRequest {
	SpawnRequest::by_class_id(class_id, Vec3::new(x, -20.0, 0.0), Quat::IDENTITY)
}

#[derive(Default)]
pub struct FakeResolver {
	by_class_id: HashMap<String, Prefab>,
	by_tech_type: HashMap<TechType, Prefab>,
	hang: bool,
	pub lookups: AtomicU32,
}

impl FakeResolver {
	pub fn with(mut self, prefab: Prefab) -> Self {
		self.by_class_id.insert(prefab.class_id.clone(), prefab);
		self
	}

	pub fn with_tech_type(mut self, tech_type: TechType, prefab: Prefab) -> Self {
		self.by_tech_type.insert(tech_type, prefab);
		self
	}

	/// Lookups never complete.
	pub fn hanging() -> Self {
		Self {
			hang: true,
			..Self::default()
		}
	}

	async fn settle(&self) {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		if self.hang {
			std::future::pending::<()>().await;
		}
		tokio::task::yield_now().await;
	}
}

#[async_trait]
impl PrefabResolver for FakeResolver {
	async fn resolve_by_class_id(&self, class_id: &str) -> Option<Prefab> {
		self.settle().await;
		self.by_class_id.get(class_id).cloned()
	}

	async fn resolve_by_tech_type(&self, tech_type: TechType) -> Option<Prefab> {
		self.settle().await;
		self.by_tech_type.get(&tech_type).cloned()
	}
}

/// Streamer whose predicates turn true after a fixed number of failed polls.
pub struct FakeStreamer {
	ready_after: u32,
	compiled_after: u32,
	pub ready_calls: AtomicU32,
	pub batch_calls: AtomicU32,
}

impl FakeStreamer {
	pub fn new(ready_after: u32, compiled_after: u32) -> Self {
		Self {
			ready_after,
			compiled_after,
			ready_calls: AtomicU32::new(0),
			batch_calls: AtomicU32::new(0),
		}
	}

	pub fn loaded() -> Self {
		Self::new(0, 0)
	}

	pub fn never_ready() -> Self {
		Self::new(u32::MAX, u32::MAX)
	}

	pub fn never_compiled() -> Self {
		Self::new(0, u32::MAX)
	}

	pub fn polls(&self) -> (u32, u32) {
		(self.ready_calls.load(Ordering::SeqCst), self.batch_calls.load(Ordering::SeqCst))
	}
}

impl WorldStreamer for FakeStreamer {
	fn is_ready(&self) -> bool {
		self.ready_calls.fetch_add(1, Ordering::SeqCst) >= self.ready_after
	}

	fn containing_batch(&self, position: Vec3) -> BatchId {
		BatchId(IVec3::new((position.x / 160.0).floor() as i32, (position.y / 160.0).floor() as i32, (position.z / 160.0).floor() as i32))
	}

	fn is_batch_compiled(&self, _batch: BatchId) -> bool {
		self.batch_calls.fetch_add(1, Ordering::SeqCst) >= self.compiled_after
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
	Instantiated(EntityId),
	Activated(EntityId),
	/// `saved` is the save-list length observed at registration time.
	Registered { entity: EntityId, batch: Option<BatchId>, saved: usize },
	Discarded(EntityId),
}

pub struct FakeHost {
	next: AtomicU64,
	save_list: SaveList,
	events: Mutex<Vec<HostEvent>>,
}

impl FakeHost {
	pub fn new(save_list: SaveList) -> Self {
		Self {
			next: AtomicU64::new(1),
			save_list,
			events: Mutex::new(Vec::new()),
		}
	}

	pub fn events(&self) -> Vec<HostEvent> {
		self.events.lock().clone()
	}

	pub fn registrations(&self) -> usize {
		self.events().iter().filter(|e| matches!(e, HostEvent::Registered { .. })).count()
	}
}

impl EntityHost for FakeHost {
	fn instantiate_deactivated(&self, _prefab: &Prefab, _position: Vec3, _rotation: Quat) -> EntityId {
		let entity = EntityId(self.next.fetch_add(1, Ordering::SeqCst));
		self.events.lock().push(HostEvent::Instantiated(entity));
		entity
	}

	fn activate(&self, entity: EntityId) {
		self.events.lock().push(HostEvent::Activated(entity));
	}

	fn register(&self, entity: EntityId, batch: Option<BatchId>) {
		let saved = self.save_list.len();
		self.events.lock().push(HostEvent::Registered { entity, batch, saved });
	}

	fn discard(&self, entity: EntityId) {
		self.events.lock().push(HostEvent::Discarded(entity));
	}
}

pub struct World {
	pub ctx: SpawnContext,
	pub resolver: Arc<FakeResolver>,
	pub streamer: Arc<FakeStreamer>,
	pub host: Arc<FakeHost>,
}

impl World {
	pub fn new(resolver: FakeResolver, streamer: FakeStreamer, config: SpawnConfig) -> Self {
		init_tracing();
		let save_list = SaveList::new();
		let resolver = Arc::new(resolver);
		let streamer = Arc::new(streamer);
		let host = Arc::new(FakeHost::new(save_list.clone()));
		let ctx = SpawnContext {
			resolver: Arc::clone(&resolver) as Arc<dyn PrefabResolver>,
			streamer: Arc::clone(&streamer) as Arc<dyn WorldStreamer>,
			host: Arc::clone(&host) as Arc<dyn EntityHost>,
			save_list,
			config,
		};
		Self {
			ctx,
			resolver,
			streamer,
			host,
		}
	}

	pub fn save_list(&self) -> &SaveList {
		&self.ctx.save_list
	}
}
