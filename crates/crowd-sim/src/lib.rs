//! `crowd-sim` — the simulation façade and its step loop.
//!
//! # Two-phase step
//!
//! ```text
//! step():
//!   ① Index    — rebuild the agent kd-tree over current positions.
//!   ② Compute  — per agent (parallel with the `parallel` feature):
//!                  gather agent and obstacle neighbors, derive half-plane
//!                  constraints, pick the staged new velocity.
//!   ③ Update   — per agent: adopt the staged velocity, advance position.
//!   ④ Advance global time by the time step.
//! ```
//!
//! The boundary between ② and ③ is a barrier: every agent decides against a
//! frozen snapshot of the previous state.  Each compute task writes only its
//! own scratch slot and reads everything else immutably, so the phases are
//! data-race free without locks.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs both per-agent phases on Rayon's thread pool.     |
//!
//! # Quick-start
//!
//! ```rust
//! use crowd_core::{AgentDefaults, AgentParams, Vec2};
//! use crowd_sim::Simulator;
//!
//! let defaults = AgentDefaults::new(AgentParams {
//!     neighbor_dist: 15.0,
//!     max_neighbors: 10,
//!     time_horizon: 10.0,
//!     time_horizon_obst: 10.0,
//!     radius: 1.5,
//!     max_speed: 2.0,
//! });
//! let mut sim = Simulator::with_defaults(0.25, defaults);
//!
//! let a = sim.add_agent(Vec2::new(0.0, 0.0)).unwrap();
//! sim.set_agent_pref_velocity(a, Vec2::new(2.0, 0.0));
//! sim.step();
//! assert_eq!(sim.agent_position(a), Vec2::new(0.5, 0.0));
//! ```

pub mod error;
pub mod observer;
pub mod sim;
pub mod store;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, StepObserver};
pub use sim::Simulator;
pub use store::AgentStore;
