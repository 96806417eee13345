//! Agent storage: `AgentStore` (SoA kinematics) and `AgentScratch`
//! (per-step working state).
//!
//! # Why two structs?
//!
//! The compute phase needs `&AgentStore` (shared read access to every
//! agent's kinematics) and exclusive mutable access to each agent's own
//! scratch simultaneously.  Keeping the scratch in a separate `Vec`
//! resolves the borrow cleanly:
//!
//! ```ignore
//! // crowd-sim step loop (simplified):
//! let store: &AgentStore = &sim.agents;
//! sim.scratch
//!     .par_iter_mut()
//!     .enumerate()
//!     .for_each(|(i, scratch)| compute_agent(AgentId::from_index(i), store, scratch, ...));
//! ```

use crowd_core::{AgentId, AgentParams, Line, Vec2, VertexId};
use crowd_spatial::NeighborList;

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent kinematics and parameters.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is
/// the index into all of them.  The compute phase reads this immutably; only
/// the update phase and the façade's setters write to it.
#[derive(Default)]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Disk center of each agent.
    pub position: Vec<Vec2>,

    /// Velocity adopted at the end of the last step.
    pub velocity: Vec<Vec2>,

    /// Externally supplied target velocity for the next step.
    pub pref_velocity: Vec<Vec2>,

    /// Per-agent tunables.
    pub params: Vec<AgentParams>,
}

impl AgentStore {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count).map(AgentId::from_index)
    }

    pub(crate) fn push(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        params: AgentParams,
    ) -> AgentId {
        let id = AgentId::from_index(self.count);
        self.position.push(position);
        self.velocity.push(velocity);
        self.pref_velocity.push(Vec2::ZERO);
        self.params.push(params);
        self.count += 1;
        id
    }
}

// ── AgentScratch ──────────────────────────────────────────────────────────────

/// Per-agent working state of one step.  Buffers are reused across steps to
/// keep the compute phase allocation-free once warmed up.
#[derive(Default)]
pub(crate) struct AgentScratch {
    /// Nearest agents, ascending by squared distance, capped at
    /// `max_neighbors`.
    pub agent_neighbors: NeighborList,

    /// Obstacle edges within range, in tree visit order.
    pub obstacle_neighbors: Vec<(f32, VertexId)>,

    /// Half-plane constraints: obstacle lines first, then agent lines.
    pub orca_lines: Vec<Line>,

    /// Obstacle-line count at the head of `orca_lines`.
    pub obstacle_line_count: usize,

    /// Velocity staged by the compute phase, adopted by the update phase.
    pub new_velocity: Vec2,

    /// Whether the fallback had to relax agent constraints this step.
    pub used_fallback: bool,
}
