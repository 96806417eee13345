//! 250 agents evenly distributed on a circle, each trying to reach the
//! antipodal position.  Prints the global time and every agent position once
//! per step until all agents arrive.

use crowd_core::{AgentDefaults, AgentParams, Vec2};
use crowd_sim::Simulator;

const AGENTS: usize = 250;
const RING_RADIUS: f32 = 200.0;

fn setup(sim: &mut Simulator) -> Vec<Vec2> {
    sim.set_time_step(0.25);
    sim.set_agent_defaults(AgentDefaults::new(AgentParams {
        neighbor_dist: 15.0,
        max_neighbors: 10,
        time_horizon: 10.0,
        time_horizon_obst: 10.0,
        radius: 1.5,
        max_speed: 2.0,
    }));

    let mut goals = Vec::with_capacity(AGENTS);
    for i in 0..AGENTS {
        let angle = i as f32 * std::f32::consts::TAU / AGENTS as f32;
        let position = Vec2::new(angle.cos(), angle.sin()) * RING_RADIUS;
        let agent = sim.add_agent(position).expect("defaults are installed");
        goals.push(-sim.agent_position(agent));
    }
    goals
}

fn set_preferred_velocities(sim: &mut Simulator, goals: &[Vec2]) {
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

fn all_arrived(sim: &Simulator, goals: &[Vec2]) -> bool {
    sim.agents().agent_ids().zip(goals).all(|(agent, &goal)| {
        let radius = sim.agent_radius(agent);
        (sim.agent_position(agent) - goal).abs_sq() <= radius * radius
    })
}

fn print_positions(sim: &Simulator) {
    print!("{}", sim.global_time());
    for agent in sim.agents().agent_ids() {
        print!(" {}", sim.agent_position(agent));
    }
    println!();
}

fn main() {
    let mut sim = Simulator::new();
    let goals = setup(&mut sim);

    loop {
        print_positions(&sim);
        set_preferred_velocities(&mut sim, &goals);
        sim.step();
        if all_arrived(&sim, &goals) {
            break;
        }
    }
    print_positions(&sim);
}
