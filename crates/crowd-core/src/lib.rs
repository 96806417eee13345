//! `crowd-core` — foundational types for the `crowd` collision-avoidance
//! workspace.
//!
//! This crate is a dependency of every other `crowd-*` crate.  It has no
//! `crowd-*` dependencies and minimal external ones (only optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`vec2`]    | `Vec2`, `det`, `left_of`, `EPSILON`                   |
//! | [`geom`]    | `Line` (half-plane carrier), segment distance         |
//! | [`ids`]     | `AgentId`, `VertexId`                                 |
//! | [`params`]  | `AgentParams`, `AgentDefaults`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |

pub mod geom;
pub mod ids;
pub mod params;
pub mod vec2;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geom::{dist_sq_point_segment, Line};
pub use ids::{AgentId, VertexId};
pub use params::{AgentDefaults, AgentParams};
pub use vec2::{det, left_of, Vec2, EPSILON};
