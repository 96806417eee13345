//! Half-plane constraint derivation.
//!
//! Every neighboring agent and every nearby obstacle edge contributes one
//! oriented [`Line`] whose closed left half-plane is the set of velocities
//! that keep the agent clear of that neighbor for the relevant time horizon.
//! Agent constraints place the line at `velocity + u / 2`, where `u` is the
//! smallest change of relative velocity that escapes the velocity obstacle:
//! both parties shift by half, which is what makes the avoidance reciprocal.
//! The half factor is part of the derivation, not a tunable.

use crowd_core::{det, Line, Vec2, VertexId, EPSILON};
use crowd_spatial::ObstacleMap;

/// Immutable kinematic view of one agent, enough to derive constraints
/// against it.
#[derive(Copy, Clone, Debug)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

/// Constraint induced on `body` by the neighboring agent `other`.
///
/// Outside contact, the velocity obstacle is the cone over the disc of
/// combined radius at `relative_position / time_horizon`; the current
/// relative velocity is projected onto its nearest boundary feature (cap or
/// leg).  Once discs already overlap, escaping within a single `time_step`
/// takes over as the requirement.
pub fn agent_line(body: &Body, other: &Body, time_horizon: f32, time_step: f32) -> Line {
    let relative_position = other.position - body.position;
    let relative_velocity = body.velocity - other.velocity;
    let dist_sq = relative_position.abs_sq();
    let combined_radius = body.radius + other.radius;
    let combined_radius_sq = combined_radius * combined_radius;

    let direction;
    let u;

    if dist_sq > combined_radius_sq {
        // No contact yet.
        let inv_time_horizon = 1.0 / time_horizon;
        let w = relative_velocity - relative_position * inv_time_horizon;
        let w_length_sq = w.abs_sq();

        let dot1 = w.dot(relative_position);
        if dot1 < 0.0 && dot1 * dot1 > combined_radius_sq * w_length_sq {
            // Projects onto the cut-off cap.
            let w_length = w_length_sq.sqrt();
            let unit_w = w / w_length;

            direction = Vec2::new(unit_w.y, -unit_w.x);
            u = unit_w * (combined_radius * inv_time_horizon - w_length);
        } else {
            // Projects onto a leg; ties go to the right leg.
            let leg = (dist_sq - combined_radius_sq).sqrt();

            if det(relative_position, w) > 0.0 {
                direction = Vec2::new(
                    relative_position.x * leg - relative_position.y * combined_radius,
                    relative_position.x * combined_radius + relative_position.y * leg,
                ) / dist_sq;
            } else {
                direction = -Vec2::new(
                    relative_position.x * leg + relative_position.y * combined_radius,
                    -relative_position.x * combined_radius + relative_position.y * leg,
                ) / dist_sq;
            }

            let dot2 = relative_velocity.dot(direction);
            u = direction * dot2 - relative_velocity;
        }
    } else {
        // Discs overlap: get out within one time step.
        let inv_time_step = 1.0 / time_step;
        let w = relative_velocity - relative_position * inv_time_step;
        let w_length = w.abs();
        let unit_w = w / w_length;

        direction = Vec2::new(unit_w.y, -unit_w.x);
        u = unit_w * (combined_radius * inv_time_step - w_length);
    }

    Line {
        point: body.velocity + u * 0.5,
        direction,
    }
}

/// Constraint induced on `body` by the directed obstacle edge starting at
/// `edge`, or `None` when the edge contributes nothing new.
///
/// Obstacles are not reciprocal: the full avoidance responsibility is the
/// agent's, so the line sits on the boundary of the velocity obstacle
/// itself, scaled by `1 / time_horizon_obst` and inflated by the agent
/// radius.  Edges whose velocity obstacle is already excluded by an earlier
/// line in `existing`, and legs that belong to a neighboring edge, are
/// skipped; the neighboring edge emits them itself.
pub fn obstacle_line(
    body: &Body,
    time_horizon_obst: f32,
    edge: VertexId,
    map: &ObstacleMap,
    existing: &[Line],
) -> Option<Line> {
    let inv_time_horizon = 1.0 / time_horizon_obst;

    let mut obstacle1 = edge;
    let mut obstacle2 = map[obstacle1].next;

    let relative_position1 = map[obstacle1].point - body.position;
    let relative_position2 = map[obstacle2].point - body.position;

    // Skip this edge if its entire scaled velocity obstacle already lies on
    // the forbidden side of a previously emitted constraint.
    let margin = inv_time_horizon * body.radius;
    for line in existing {
        if det(relative_position1 * inv_time_horizon - line.point, line.direction) - margin
            >= -EPSILON
            && det(relative_position2 * inv_time_horizon - line.point, line.direction) - margin
                >= -EPSILON
        {
            return None;
        }
    }

    let dist_sq1 = relative_position1.abs_sq();
    let dist_sq2 = relative_position2.abs_sq();
    let radius_sq = body.radius * body.radius;

    let obstacle_vector = map[obstacle2].point - map[obstacle1].point;
    let s = (-relative_position1).dot(obstacle_vector) / obstacle_vector.abs_sq();
    let dist_sq_line = (-relative_position1 - obstacle_vector * s).abs_sq();

    // ── Collision cases: constrain against the feature already touched ────
    if s < 0.0 && dist_sq1 <= radius_sq {
        if map[obstacle1].is_convex {
            return Some(Line {
                point: Vec2::ZERO,
                direction: Vec2::new(-relative_position1.y, relative_position1.x).normalize(),
            });
        }
        return None;
    }
    if s > 1.0 && dist_sq2 <= radius_sq {
        // The neighboring edge owns this endpoint unless the agent faces it.
        if map[obstacle2].is_convex
            && det(relative_position2, map[obstacle2].unit_dir) >= 0.0
        {
            return Some(Line {
                point: Vec2::ZERO,
                direction: Vec2::new(-relative_position2.y, relative_position2.x).normalize(),
            });
        }
        return None;
    }
    if (0.0..1.0).contains(&s) && dist_sq_line <= radius_sq {
        return Some(Line {
            point: Vec2::ZERO,
            direction: -map[obstacle1].unit_dir,
        });
    }

    // ── No collision: build the legs of the velocity obstacle ─────────────
    let mut left_leg_direction;
    let mut right_leg_direction;

    if s < 0.0 && dist_sq_line <= radius_sq {
        // Obliquely viewed past the first endpoint; both legs anchor there.
        if !map[obstacle1].is_convex {
            return None;
        }
        obstacle2 = obstacle1;

        let leg1 = (dist_sq1 - radius_sq).sqrt();
        left_leg_direction = Vec2::new(
            relative_position1.x * leg1 - relative_position1.y * body.radius,
            relative_position1.x * body.radius + relative_position1.y * leg1,
        ) / dist_sq1;
        right_leg_direction = Vec2::new(
            relative_position1.x * leg1 + relative_position1.y * body.radius,
            -relative_position1.x * body.radius + relative_position1.y * leg1,
        ) / dist_sq1;
    } else if s > 1.0 && dist_sq_line <= radius_sq {
        // Obliquely viewed past the second endpoint.
        if !map[obstacle2].is_convex {
            return None;
        }
        obstacle1 = obstacle2;

        let leg2 = (dist_sq2 - radius_sq).sqrt();
        left_leg_direction = Vec2::new(
            relative_position2.x * leg2 - relative_position2.y * body.radius,
            relative_position2.x * body.radius + relative_position2.y * leg2,
        ) / dist_sq2;
        right_leg_direction = Vec2::new(
            relative_position2.x * leg2 + relative_position2.y * body.radius,
            -relative_position2.x * body.radius + relative_position2.y * leg2,
        ) / dist_sq2;
    } else {
        left_leg_direction = if map[obstacle1].is_convex {
            let leg1 = (dist_sq1 - radius_sq).sqrt();
            Vec2::new(
                relative_position1.x * leg1 - relative_position1.y * body.radius,
                relative_position1.x * body.radius + relative_position1.y * leg1,
            ) / dist_sq1
        } else {
            // Non-convex vertex: the leg collapses onto the edge.
            -map[obstacle1].unit_dir
        };
        right_leg_direction = if map[obstacle2].is_convex {
            let leg2 = (dist_sq2 - radius_sq).sqrt();
            Vec2::new(
                relative_position2.x * leg2 + relative_position2.y * body.radius,
                -relative_position2.x * body.radius + relative_position2.y * leg2,
            ) / dist_sq2
        } else {
            map[obstacle1].unit_dir
        };
    }

    // A leg that points into a neighboring edge belongs to that edge;
    // replace it with the neighbor's cut-off line and remember not to emit
    // it from here.
    let left_neighbor = map[obstacle1].prev;
    let mut is_left_leg_foreign = false;
    let mut is_right_leg_foreign = false;

    if map[obstacle1].is_convex
        && det(left_leg_direction, -map[left_neighbor].unit_dir) >= 0.0
    {
        left_leg_direction = -map[left_neighbor].unit_dir;
        is_left_leg_foreign = true;
    }
    if map[obstacle2].is_convex && det(right_leg_direction, map[obstacle2].unit_dir) <= 0.0 {
        right_leg_direction = map[obstacle2].unit_dir;
        is_right_leg_foreign = true;
    }

    let left_cutoff = (map[obstacle1].point - body.position) * inv_time_horizon;
    let right_cutoff = (map[obstacle2].point - body.position) * inv_time_horizon;
    let cutoff_vector = right_cutoff - left_cutoff;

    // Project the current velocity onto the velocity obstacle boundary.
    let t = if obstacle1 == obstacle2 {
        0.5
    } else {
        (body.velocity - left_cutoff).dot(cutoff_vector) / cutoff_vector.abs_sq()
    };
    let t_left = (body.velocity - left_cutoff).dot(left_leg_direction);
    let t_right = (body.velocity - right_cutoff).dot(right_leg_direction);

    if (t < 0.0 && t_left < 0.0) || (obstacle1 == obstacle2 && t_left < 0.0 && t_right < 0.0) {
        // Closest to the left cut-off circle.
        let unit_w = (body.velocity - left_cutoff).normalize();
        return Some(Line {
            direction: Vec2::new(unit_w.y, -unit_w.x),
            point: left_cutoff + unit_w * (body.radius * inv_time_horizon),
        });
    }
    if t > 1.0 && t_right < 0.0 {
        // Closest to the right cut-off circle.
        let unit_w = (body.velocity - right_cutoff).normalize();
        return Some(Line {
            direction: Vec2::new(unit_w.y, -unit_w.x),
            point: right_cutoff + unit_w * (body.radius * inv_time_horizon),
        });
    }

    // Otherwise the nearest of cut-off line, left leg, and right leg wins.
    let dist_sq_cutoff = if t < 0.0 || t > 1.0 || obstacle1 == obstacle2 {
        f32::INFINITY
    } else {
        (body.velocity - (left_cutoff + cutoff_vector * t)).abs_sq()
    };
    let dist_sq_left = if t_left < 0.0 {
        f32::INFINITY
    } else {
        (body.velocity - (left_cutoff + left_leg_direction * t_left)).abs_sq()
    };
    let dist_sq_right = if t_right < 0.0 {
        f32::INFINITY
    } else {
        (body.velocity - (right_cutoff + right_leg_direction * t_right)).abs_sq()
    };

    if dist_sq_cutoff <= dist_sq_left && dist_sq_cutoff <= dist_sq_right {
        let direction = -map[obstacle1].unit_dir;
        return Some(Line {
            direction,
            point: left_cutoff
                + Vec2::new(-direction.y, direction.x) * (body.radius * inv_time_horizon),
        });
    }
    if dist_sq_left <= dist_sq_right {
        if is_left_leg_foreign {
            return None;
        }
        let direction = left_leg_direction;
        return Some(Line {
            direction,
            point: left_cutoff
                + Vec2::new(-direction.y, direction.x) * (body.radius * inv_time_horizon),
        });
    }

    if is_right_leg_foreign {
        return None;
    }
    let direction = -right_leg_direction;
    Some(Line {
        direction,
        point: right_cutoff
            + Vec2::new(-direction.y, direction.x) * (body.radius * inv_time_horizon),
    })
}
