//! Custom craft trees built from deferred, ordered operations.
//!
//! Mods describe a fabricator's tree through [`CustomFabricator::add_tab_node`]
//! and [`CustomFabricator::add_craft_node`]. Those calls come from code whose
//! initialisation order is not guaranteed, so nothing is linked when they are
//! made: each call becomes a [`BuildOperation`] in the fabricator's
//! [`OperationQueue`]. [`CustomFabricator::finalize`] then creates the root,
//! replays the queue in registration order against a [`LinkedTree`], and
//! stores the result in the [`CraftTreeRegistry`].

mod error;
mod fabricator;
mod linking;
mod operation;
mod queue;
mod registry;
mod spawnable;
mod tree;

pub use error::CraftTreeError;
pub use fabricator::{CustomFabricator, FabricatorModel, PlacementRules};
pub use linking::{LinkedTree, NodeRegistry, ROOT_KEY};
pub use operation::{Applied, BuildOperation, CraftItem};
pub use queue::{DrainReport, OperationQueue};
pub use registry::{CraftTreeRegistry, CraftTreeType};
pub use spawnable::Spawnable;
pub use tree::{CraftNode, CraftTree, Icon, LinkKind, LinkNode, NodeId, TabInfo};
