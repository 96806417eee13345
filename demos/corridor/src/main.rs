//! Two streams of agents crossing each other inside a walled corridor.
//!
//! The corridor is built from two rectangular obstacles; preferred
//! velocities get a tiny random perturbation so perfectly symmetric
//! stand-offs cannot persist.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crowd_core::{AgentDefaults, AgentParams, Vec2};
use crowd_sim::Simulator;

const PER_SIDE: usize = 5;
const MAX_STEPS: usize = 4000;

fn setup(sim: &mut Simulator) -> Vec<Vec2> {
    sim.set_time_step(0.25);
    sim.set_agent_defaults(AgentDefaults::new(AgentParams {
        neighbor_dist: 10.0,
        max_neighbors: 10,
        time_horizon: 5.0,
        time_horizon_obst: 5.0,
        radius: 0.5,
        max_speed: 1.5,
    }));

    // Corridor walls: solid rectangles above and below the gap |y| < 1.5.
    sim.add_obstacle(&[
        Vec2::new(-10.0, 1.5),
        Vec2::new(10.0, 1.5),
        Vec2::new(10.0, 4.0),
        Vec2::new(-10.0, 4.0),
    ])
    .expect("valid polygon");
    sim.add_obstacle(&[
        Vec2::new(-10.0, -4.0),
        Vec2::new(10.0, -4.0),
        Vec2::new(10.0, -1.5),
        Vec2::new(-10.0, -1.5),
    ])
    .expect("valid polygon");
    sim.process_obstacles();

    let mut goals = Vec::new();
    for i in 0..PER_SIDE {
        let y = (i as f32 - (PER_SIDE - 1) as f32 * 0.5) * 0.5;
        sim.add_agent(Vec2::new(-13.0 - i as f32, y))
            .expect("defaults are installed");
        goals.push(Vec2::new(13.0 + i as f32, y));

        sim.add_agent(Vec2::new(13.0 + i as f32, -y))
            .expect("defaults are installed");
        goals.push(Vec2::new(-13.0 - i as f32, -y));
    }
    goals
}

fn set_preferred_velocities(sim: &mut Simulator, goals: &[Vec2], rng: &mut SmallRng) {
    let agents: Vec<_> = sim.agents().agent_ids().collect();
    for (agent, &goal) in agents.into_iter().zip(goals) {
        let goal_vector = goal - sim.agent_position(agent);
        let mut pref = if goal_vector.abs_sq() > 1.0 {
            goal_vector.normalize() * 1.5
        } else {
            goal_vector
        };

        // Nudge to break ties between mirrored agents.
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = rng.gen_range(0.0..0.0001);
        pref += Vec2::new(angle.cos(), angle.sin()) * dist;

        sim.set_agent_pref_velocity(agent, pref);
    }
}

fn all_arrived(sim: &Simulator, goals: &[Vec2]) -> bool {
    sim.agents().agent_ids().zip(goals).all(|(agent, &goal)| {
        (sim.agent_position(agent) - goal).abs_sq() <= 1.0
    })
}

fn main() {
    let mut sim = Simulator::new();
    let goals = setup(&mut sim);
    let mut rng = SmallRng::seed_from_u64(1);

    for step in 0..MAX_STEPS {
        if step % 8 == 0 {
            print!("{}", sim.global_time());
            for agent in sim.agents().agent_ids() {
                print!(" {}", sim.agent_position(agent));
            }
            println!();
        }

        set_preferred_velocities(&mut sim, &goals, &mut rng);
        sim.step();

        if all_arrived(&sim, &goals) {
            println!("all agents arrived at t = {}", sim.global_time());
            return;
        }
    }
    println!("stopped after {MAX_STEPS} steps");
}
