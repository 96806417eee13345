//! Per-agent parameter block and the default-agent template.

use crate::vec2::Vec2;

/// Tunable parameters of one agent.
///
/// Normal use keeps `radius >= 0`, `max_speed >= 0`,
/// `neighbor_dist >= radius`, and both horizons positive.  None of this is
/// enforced; the solver is total over whatever values it is given.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentParams {
    /// Range within which other agents are considered (center to center).
    pub neighbor_dist: f32,

    /// At most this many nearest agents influence the velocity choice.
    pub max_neighbors: usize,

    /// Planning window against other agents, in seconds.  Larger values make
    /// the agent react earlier but constrain it more.
    pub time_horizon: f32,

    /// Planning window against obstacles, in seconds.
    pub time_horizon_obst: f32,

    /// Disk radius of the agent.
    pub radius: f32,

    /// Speed cap; the chosen velocity never exceeds it.
    pub max_speed: f32,
}

/// Template installed by `set_agent_defaults`: parameters plus the initial
/// velocity given to agents added without explicit parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentDefaults {
    pub params: AgentParams,
    pub velocity: Vec2,
}

impl AgentDefaults {
    /// Template with the given parameters and a zero initial velocity.
    pub fn new(params: AgentParams) -> Self {
        Self { params, velocity: Vec2::ZERO }
    }
}
