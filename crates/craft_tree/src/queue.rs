use modforge_craft_data::TechTypeRegistry;

use crate::linking::LinkedTree;
use crate::operation::{Applied, BuildOperation};
use crate::CraftTreeError;

/// Counts from one [`OperationQueue::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
	pub linked: usize,
	pub skipped: usize,
}

/// Ordered buffer of tree operations owned by one tree builder.
///
/// Operations are only recorded until [`drain`](Self::drain) runs; they are
/// then applied in the order they were pushed. The queue can be drained once.
/// Pushing after that, or draining again, yields
/// [`CraftTreeError::AlreadyFinalized`].
#[derive(Debug)]
pub struct OperationQueue {
	owner: String,
	ops: Vec<BuildOperation>,
	drained: bool,
}

impl OperationQueue {
	pub fn new(owner: impl Into<String>) -> Self {
		Self {
			owner: owner.into(),
			ops: Vec::new(),
			drained: false,
		}
	}

	pub fn owner(&self) -> &str {
		&self.owner
	}

	/// Number of operations waiting to be applied.
	pub fn len(&self) -> usize {
		self.ops.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	pub fn is_drained(&self) -> bool {
		self.drained
	}

	pub fn push(&mut self, op: BuildOperation) -> Result<(), CraftTreeError> {
		if self.drained {
			return Err(CraftTreeError::AlreadyFinalized(self.owner.clone()));
		}
		self.ops.push(op);
		Ok(())
	}

	/// Applies every queued operation to `target`, sequentially and in push order.
	///
	/// Stops at the first [`CraftTreeError::MissingParent`]. The queue counts
	/// as drained even then, so a failed finalize cannot be replayed on top of
	/// the partial tree.
	pub fn drain(&mut self, target: &mut LinkedTree, tech_types: &TechTypeRegistry) -> Result<DrainReport, CraftTreeError> {
		if self.drained {
			return Err(CraftTreeError::AlreadyFinalized(self.owner.clone()));
		}
		self.drained = true;

		let ops = std::mem::take(&mut self.ops);
		tracing::debug!(owner = %self.owner, pending = ops.len(), "craft_tree.drain");

		let mut report = DrainReport::default();
		for op in ops {
			match op.apply(target, tech_types)? {
				Applied::Linked => report.linked += 1,
				Applied::Skipped => report.skipped += 1,
			}
		}
		Ok(report)
	}
}
