use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::world::{BatchId, EntityHost, EntityId, Prefab, PrefabResolver, WorldStreamer};
use crate::{SaveList, SpawnConfig, SpawnError, SpawnRequest, SpawnTarget};

/// Lifecycle of one coordinator.
///
/// `Resolving → WaitingForStreamingReady → WaitingForBatch → Registering → Done`.
/// Streaming-exempt prefabs go from `Resolving` straight to `Registering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnState {
	Resolving,
	/// Waiting for the world streamer to initialise.
	WaitingForStreamingReady,
	/// Waiting for the terrain batch around the target position to load.
	WaitingForBatch,
	Registering,
	Done,
	Failed,
	Cancelled,
}

impl SpawnState {
	pub const fn is_terminal(self) -> bool {
		matches!(self, Self::Done | Self::Failed | Self::Cancelled)
	}
}

/// What a finished spawn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
	pub entity: EntityId,
	/// `None` for streaming-exempt prefabs.
	pub batch: Option<BatchId>,
	/// Failed polls of the streamer-ready predicate.
	pub ready_polls: u32,
	/// Failed polls of the batch-compiled predicate.
	pub batch_polls: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnOutcome {
	Spawned(SpawnReport),
	Failed(SpawnError),
	/// Torn down from outside while suspended in `phase`.
	Cancelled { phase: SpawnState },
}

impl SpawnOutcome {
	pub fn is_spawned(&self) -> bool {
		matches!(self, Self::Spawned(_))
	}
}

/// Collaborators shared by every coordinator of one world.
#[derive(Clone)]
pub struct SpawnContext {
	pub resolver: Arc<dyn PrefabResolver>,
	pub streamer: Arc<dyn WorldStreamer>,
	pub host: Arc<dyn EntityHost>,
	pub save_list: SaveList,
	pub config: SpawnConfig,
}

impl fmt::Debug for SpawnContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SpawnContext")
			.field("config", &self.config)
			.field("saved", &self.save_list.len())
			.finish_non_exhaustive()
	}
}

/// Deactivated instance owned by a running coordinator.
///
/// Dropped without [`commit`](Self::commit) it is discarded, so a coordinator
/// that is cancelled, times out, or has its task aborted never leaves a
/// half-spawned entity behind.
struct PendingEntity {
	host: Arc<dyn EntityHost>,
	entity: EntityId,
	committed: bool,
}

impl PendingEntity {
	fn instantiate(host: Arc<dyn EntityHost>, prefab: &Prefab, request: &SpawnRequest) -> Self {
		let entity = host.instantiate_deactivated(prefab, request.position, request.rotation);
		Self {
			host,
			entity,
			committed: false,
		}
	}

	/// Activates and registers the instance; it is no longer discarded on drop.
	fn commit(mut self, batch: Option<BatchId>) -> EntityId {
		self.host.activate(self.entity);
		self.host.register(self.entity, batch);
		self.committed = true;
		self.entity
	}
}

impl Drop for PendingEntity {
	fn drop(&mut self) {
		if !self.committed {
			tracing::debug!(entity = self.entity.0, "spawn.discard");
			self.host.discard(self.entity);
		}
	}
}

enum Interrupt {
	Cancelled(SpawnState),
	TimedOut(SpawnState, u32),
}

/// Drives one [`SpawnRequest`] from lookup to registration.
///
/// Suspends only while resolving the prefab, while waiting for the streamer
/// and while waiting for the target batch. Each of those waits also watches
/// the cancellation token. A coordinator that ends without registering,
/// including one whose task is aborted, discards its instance and writes
/// nothing to the save list.
pub struct SpawnCoordinator {
	request: SpawnRequest,
	ctx: SpawnContext,
	cancel: CancellationToken,
	state: watch::Sender<SpawnState>,
}

impl SpawnCoordinator {
	pub fn new(request: SpawnRequest, ctx: SpawnContext, cancel: CancellationToken) -> Self {
		let (state, _) = watch::channel(SpawnState::Resolving);
		Self {
			request,
			ctx,
			cancel,
			state,
		}
	}

	pub fn request(&self) -> &SpawnRequest {
		&self.request
	}

	/// Receiver that observes every state transition.
	pub fn subscribe(&self) -> watch::Receiver<SpawnState> {
		self.state.subscribe()
	}

	pub async fn run(self) -> SpawnOutcome {
		let target = self.request.target.to_string();
		tracing::debug!(spawn_target = %target, "spawn.start");

		let resolved = tokio::select! {
			biased;
			_ = self.cancel.cancelled() => None,
			prefab = self.resolve() => Some(prefab),
		};
		let Some(prefab) = resolved else {
			return self.cancelled(SpawnState::Resolving);
		};
		let Some(prefab) = prefab else {
			let err = SpawnError::PrefabNotFound(target);
			tracing::error!(error = %err, "spawn.resolve_failed");
			self.transition(SpawnState::Failed);
			return SpawnOutcome::Failed(err);
		};

		let pending = PendingEntity::instantiate(Arc::clone(&self.ctx.host), &prefab, &self.request);

		let (batch, ready_polls, batch_polls) = if prefab.is_streaming_exempt() {
			(None, 0, 0)
		} else {
			match self.wait_for_terrain(&prefab).await {
				Ok((batch, ready_polls, batch_polls)) => (Some(batch), ready_polls, batch_polls),
				Err(Interrupt::Cancelled(phase)) => {
					drop(pending);
					return self.cancelled(phase);
				}
				Err(Interrupt::TimedOut(phase, polls)) => {
					drop(pending);
					let err = SpawnError::StreamingTimeout { target, phase, polls };
					tracing::warn!(error = %err, "spawn.timeout");
					self.transition(SpawnState::Failed);
					return SpawnOutcome::Failed(err);
				}
			}
		};

		self.transition(SpawnState::Registering);
		let entity = pending.commit(batch);
		self.ctx.save_list.append(self.request.clone());
		self.transition(SpawnState::Done);
		tracing::debug!(spawn_target = %target, entity = entity.0, ready_polls, batch_polls, "spawn.done");

		SpawnOutcome::Spawned(SpawnReport {
			entity,
			batch,
			ready_polls,
			batch_polls,
		})
	}

	async fn resolve(&self) -> Option<Prefab> {
		match &self.request.target {
			SpawnTarget::ClassId(class_id) => self.ctx.resolver.resolve_by_class_id(class_id).await,
			SpawnTarget::TechType(tech_type) => self.ctx.resolver.resolve_by_tech_type(*tech_type).await,
		}
	}

	/// Waits for the streamer, then for the batch containing the target position.
	async fn wait_for_terrain(&self, prefab: &Prefab) -> Result<(BatchId, u32, u32), Interrupt> {
		let period = self.ctx.config.poll_interval();
		let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		let streamer = Arc::clone(&self.ctx.streamer);
		tracing::trace!(class_id = %prefab.class_id, cell_level = ?prefab.cell_level, "spawn.wait_streamer");
		let ready_polls = self.poll_until(SpawnState::WaitingForStreamingReady, &mut ticker, || streamer.is_ready()).await?;

		let batch = streamer.containing_batch(self.request.position);
		tracing::trace!(batch = ?batch.0, "spawn.wait_batch");
		let batch_polls = self.poll_until(SpawnState::WaitingForBatch, &mut ticker, || streamer.is_batch_compiled(batch)).await?;

		Ok((batch, ready_polls, batch_polls))
	}

	/// Checks `ready` once per tick until it holds, returning the number of failed checks.
	async fn poll_until(&self, phase: SpawnState, ticker: &mut Interval, mut ready: impl FnMut() -> bool) -> Result<u32, Interrupt> {
		self.transition(phase);
		let mut failed = 0u32;
		loop {
			if self.cancel.is_cancelled() {
				return Err(Interrupt::Cancelled(phase));
			}
			if ready() {
				return Ok(failed);
			}
			failed = failed.saturating_add(1);
			if self.ctx.config.max_polls().is_some_and(|max| failed >= max) {
				return Err(Interrupt::TimedOut(phase, failed));
			}

			tokio::select! {
				biased;
				_ = self.cancel.cancelled() => return Err(Interrupt::Cancelled(phase)),
				_ = ticker.tick() => {}
			}
		}
	}

	fn cancelled(&self, phase: SpawnState) -> SpawnOutcome {
		tracing::debug!(spawn_target = %self.request.target, ?phase, "spawn.cancelled");
		self.transition(SpawnState::Cancelled);
		SpawnOutcome::Cancelled { phase }
	}

	fn transition(&self, state: SpawnState) {
		self.state.send_replace(state);
	}
}
