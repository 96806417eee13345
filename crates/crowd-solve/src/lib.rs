//! `crowd-solve` — per-agent velocity selection.
//!
//! Two layers:
//!
//! - [`orca`] turns neighboring agents and obstacle edges into half-plane
//!   constraints on the agent's next velocity.  If both parties to an
//!   encounter pick from their respective half-planes, neither collides
//!   within the time horizon.
//! - [`lp`] picks the velocity closest to the preferred one subject to those
//!   half-planes and the speed cap, falling back to a relaxation that keeps
//!   obstacle constraints hard when the agent constraints are mutually
//!   infeasible.
//!
//! Everything here is pure computation over immutable inputs; the crate has
//! no state of its own.

pub mod lp;
pub mod orca;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use lp::{avoiding_velocity, OptimalValue};
pub use orca::{agent_line, obstacle_line, Body};
