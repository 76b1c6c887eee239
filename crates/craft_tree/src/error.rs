use thiserror::Error;

/// Errors raised while building a custom craft tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CraftTreeError {
	/// An operation named a parent tab that had not been added when it ran.
	///
	/// Operations replay in registration order, so this always means a child
	/// was registered before its parent. Finalize stops at the first one.
	#[error("craft tree '{owner}': parent tab '{parent}' does not exist (needed by {child})")]
	MissingParent { owner: String, parent: String, child: String },
	/// The tree was already finalized; its operation queue is closed.
	#[error("craft tree '{0}' was already finalized")]
	AlreadyFinalized(String),
}
