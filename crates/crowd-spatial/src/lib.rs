//! `crowd-spatial` — obstacle storage and the two spatial indices that feed
//! neighbor queries.
//!
//! # What lives here
//!
//! | Module            | Contents                                            |
//! |-------------------|-----------------------------------------------------|
//! | [`obstacle`]      | `ObstacleMap`: arena of linked polygon vertices     |
//! | [`agent_tree`]    | `AgentKdTree`: flat pre-order median-split AABB tree|
//! | [`obstacle_tree`] | `ObstacleKdTree`: BSP over obstacle edges           |
//! | [`neighbors`]     | `NeighborList`: bounded sorted candidate set        |
//! | [`error`]         | `SpatialError`, `SpatialResult`                     |
//!
//! Both trees hold ids into state owned elsewhere (agent positions as slices,
//! obstacle vertices in the [`ObstacleMap`]); they never own the entities they
//! index.

pub mod agent_tree;
pub mod error;
pub mod neighbors;
pub mod obstacle;
pub mod obstacle_tree;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent_tree::{AgentKdTree, MAX_LEAF_SIZE};
pub use error::{SpatialError, SpatialResult};
pub use neighbors::NeighborList;
pub use obstacle::{ObstacleMap, ObstacleVertex};
pub use obstacle_tree::ObstacleKdTree;
