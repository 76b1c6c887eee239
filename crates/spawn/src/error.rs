use thiserror::Error;

use crate::SpawnState;

/// Why a coordinator gave up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
	#[error("no prefab found for {0}; process for coordinated spawn canceled")]
	PrefabNotFound(String),
	#[error("gave up spawning {target} after {polls} polls while {phase:?}")]
	StreamingTimeout { target: String, phase: SpawnState, polls: u32 },
	#[error("spawn task failed: {0}")]
	Join(String),
}
