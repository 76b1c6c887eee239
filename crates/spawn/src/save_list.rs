use std::sync::Arc;

use parking_lot::Mutex;

use crate::SpawnRequest;

/// Append-only list of completed spawns, shared by every coordinator.
///
/// Cloning yields another handle to the same list.
#[derive(Debug, Clone, Default)]
pub struct SaveList {
	records: Arc<Mutex<Vec<SpawnRequest>>>,
}

impl SaveList {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&self, record: SpawnRequest) {
		self.records.lock().push(record);
	}

	/// Copy of every record, in append order.
	pub fn snapshot(&self) -> Vec<SpawnRequest> {
		self.records.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.records.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
