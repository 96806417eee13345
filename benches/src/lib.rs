//! Shared scenario builders for the benchmarks.

use crowd_core::{AgentDefaults, AgentParams, Vec2};
use crowd_sim::Simulator;

/// A ring of `count` agents aiming at their antipodes, matching the demo
/// scenario at configurable scale.
pub fn ring_simulator(count: usize, ring_radius: f32) -> (Simulator, Vec<Vec2>) {
    let mut sim = Simulator::with_defaults(
        0.25,
        AgentDefaults::new(AgentParams {
            neighbor_dist: 15.0,
            max_neighbors: 10,
            time_horizon: 10.0,
            time_horizon_obst: 10.0,
            radius: 1.5,
            max_speed: 2.0,
        }),
    );

    let mut goals = Vec::with_capacity(count);
    for i in 0..count {
        let angle = i as f32 * std::f32::consts::TAU / count as f32;
        let position = Vec2::new(angle.cos(), angle.sin()) * ring_radius;
        sim.add_agent(position).expect("defaults are installed");
        goals.push(-position);
    }
    (sim, goals)
}

/// Point every agent at its goal with unit preferred speed.
pub fn aim_at_goals(sim: &mut Simulator, goals: &[Vec2]) {
    let agents: Vec<_> = sim.agents().agent_ids().collect();
    for (agent, &goal) in agents.into_iter().zip(goals) {
        let goal_vector = goal - sim.agent_position(agent);
        let pref = if goal_vector.abs_sq() > 1.0 {
            goal_vector.normalize()
        } else {
            goal_vector
        };
        sim.set_agent_pref_velocity(agent, pref);
    }
}
