use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::coordinator::{SpawnContext, SpawnCoordinator, SpawnOutcome, SpawnState};
use crate::{SaveList, SpawnError, SpawnRequest};

/// Handle to one running coordinator.
#[derive(Debug)]
pub struct SpawnHandle {
	cancel: CancellationToken,
	state: watch::Receiver<SpawnState>,
	join: JoinHandle<SpawnOutcome>,
}

impl SpawnHandle {
	/// Current state of the coordinator.
	pub fn state(&self) -> SpawnState {
		*self.state.borrow()
	}

	/// Resolves once the coordinator reaches a state matching `pred`, or finishes.
	pub async fn wait_for(&mut self, pred: impl FnMut(&SpawnState) -> bool) -> SpawnState {
		let reached = self.state.wait_for(pred).await.map(|state| *state);
		reached.unwrap_or_else(|_| *self.state.borrow())
	}

	/// Tears the coordinator down at its next suspension point.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	pub async fn join(self) -> SpawnOutcome {
		match self.join.await {
			Ok(outcome) => outcome,
			Err(err) => SpawnOutcome::Failed(SpawnError::Join(err.to_string())),
		}
	}
}

/// Owns the coordinators of one world.
///
/// Every coordinator runs on its own task with a child of the spawner's
/// cancellation token, so [`shutdown`](Self::shutdown) tears all of them down.
#[derive(Debug)]
pub struct Spawner {
	ctx: SpawnContext,
	runtime: Handle,
	root: CancellationToken,
}

impl Spawner {
	/// Creates a spawner that runs coordinators on `runtime`.
	pub fn new(ctx: SpawnContext, runtime: Handle) -> Self {
		Self {
			ctx,
			runtime,
			root: CancellationToken::new(),
		}
	}

	/// Creates a spawner on the runtime of the calling task.
	///
	/// # Panics
	///
	/// Panics when called outside a Tokio runtime.
	pub fn current(ctx: SpawnContext) -> Self {
		Self::new(ctx, Handle::current())
	}

	pub fn save_list(&self) -> &SaveList {
		&self.ctx.save_list
	}

	pub fn is_shut_down(&self) -> bool {
		self.root.is_cancelled()
	}

	/// Starts a coordinator for `request`.
	///
	/// After [`shutdown`](Self::shutdown) the coordinator starts already
	/// cancelled and ends without touching the world.
	pub fn spawn(&self, request: SpawnRequest) -> SpawnHandle {
		let cancel = self.root.child_token();
		let coordinator = SpawnCoordinator::new(request, self.ctx.clone(), cancel.clone());
		let state = coordinator.subscribe();
		tracing::trace!(spawn_target = %coordinator.request().target, "spawner.spawn");
		let join = self.runtime.spawn(coordinator.run());
		SpawnHandle { cancel, state, join }
	}

	/// Starts one coordinator per request, e.g. to restore saved spawns after a reload.
	pub fn spawn_all(&self, requests: impl IntoIterator<Item = SpawnRequest>) -> SpawnSet {
		let mut set = SpawnSet { inner: JoinSet::new() };
		for request in requests {
			let coordinator = SpawnCoordinator::new(request, self.ctx.clone(), self.root.child_token());
			set.inner.spawn_on(coordinator.run(), &self.runtime);
		}
		tracing::debug!(count = set.len(), "spawner.spawn_all");
		set
	}

	/// Cancels every coordinator started by this spawner, e.g. on scene unload.
	pub fn shutdown(&self) {
		tracing::debug!("spawner.shutdown");
		self.root.cancel();
	}
}

impl Drop for Spawner {
	fn drop(&mut self) {
		self.root.cancel();
	}
}

/// Group of coordinators joined together.
#[derive(Debug)]
pub struct SpawnSet {
	inner: JoinSet<SpawnOutcome>,
}

impl SpawnSet {
	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Waits for the next coordinator to finish, in completion order.
	pub async fn join_next(&mut self) -> Option<SpawnOutcome> {
		let joined = self.inner.join_next().await?;
		Some(joined.unwrap_or_else(|err| SpawnOutcome::Failed(SpawnError::Join(err.to_string()))))
	}

	/// Waits for every coordinator, returning outcomes in completion order.
	pub async fn join_all(mut self) -> Vec<SpawnOutcome> {
		let mut outcomes = Vec::with_capacity(self.inner.len());
		while let Some(outcome) = self.join_next().await {
			outcomes.push(outcome);
		}
		outcomes
	}
}
