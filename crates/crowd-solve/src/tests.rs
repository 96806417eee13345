//! Unit tests for constraint derivation and the velocity programs.

use crowd_core::{det, Line, Vec2, EPSILON};

// ── Linear programs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lp {
    use super::*;
    use crate::lp::{avoiding_velocity, solve_2d, OptimalValue};

    #[test]
    fn unconstrained_returns_preference() {
        let (v, fallback) = avoiding_velocity(&[], 0, 2.0, Vec2::new(1.5, 0.5));
        assert_eq!(v, Vec2::new(1.5, 0.5));
        assert!(!fallback);
    }

    #[test]
    fn preference_clamped_to_speed_disc() {
        let (v, fallback) = avoiding_velocity(&[], 0, 2.0, Vec2::new(6.0, 8.0));
        assert!(!fallback);
        assert!((v.abs() - 2.0).abs() < 1e-6);
        assert!((v.x - 1.2).abs() < 1e-6);
        assert!((v.y - 1.6).abs() < 1e-6);
    }

    #[test]
    fn single_constraint_projects_preference() {
        // Permits vy <= 0.25 only.
        let wall = Line {
            point: Vec2::new(0.0, 0.25),
            direction: Vec2::new(-1.0, 0.0),
        };
        let (v, fallback) = avoiding_velocity(&[wall], 1, 3.0, Vec2::new(0.0, 3.0));
        assert!(!fallback);
        assert!((v.y - 0.25).abs() < 1e-6);
        assert!(v.x.abs() < 1e-6);
    }

    #[test]
    fn satisfied_constraint_leaves_preference_alone() {
        let wall = Line {
            point: Vec2::new(0.0, 0.25),
            direction: Vec2::new(-1.0, 0.0),
        };
        let (v, fallback) = avoiding_velocity(&[wall], 1, 3.0, Vec2::new(1.0, -1.0));
        assert!(!fallback);
        assert_eq!(v, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn direction_mode_picks_extreme_point() {
        let keep_left = Line {
            point: Vec2::new(0.5, 0.0),
            direction: Vec2::new(0.0, 1.0),
        };
        let v = solve_2d(&[keep_left], 1.0, &OptimalValue::Direction(Vec2::new(1.0, 0.0)))
            .unwrap();
        // Max x subject to x <= 0.5 within the unit disc.
        assert!((v.x - 0.5).abs() < 1e-6, "got {v:?}");
    }

    #[test]
    fn antiparallel_constraints_are_infeasible() {
        let up = Line {
            point: Vec2::new(0.0, 1.0),
            direction: Vec2::new(1.0, 0.0),
        };
        let down = Line {
            point: Vec2::new(0.0, -1.0),
            direction: Vec2::new(-1.0, 0.0),
        };
        let result = solve_2d(&[up, down], 5.0, &OptimalValue::Point(Vec2::ZERO));
        assert!(matches!(result, Err((1, _))));
    }

    #[test]
    fn fallback_balances_violations() {
        // vy >= 1 and vy <= -1 cannot both hold; the relaxed solution sits
        // exactly between them.
        let up = Line {
            point: Vec2::new(0.0, 1.0),
            direction: Vec2::new(1.0, 0.0),
        };
        let down = Line {
            point: Vec2::new(0.0, -1.0),
            direction: Vec2::new(-1.0, 0.0),
        };
        let (v, fallback) = avoiding_velocity(&[up, down], 0, 5.0, Vec2::ZERO);
        assert!(fallback);
        assert!(v.abs() <= 5.0 + EPSILON);
        assert!(v.y.abs() < 1e-5, "violations should balance, got {v:?}");
    }

    #[test]
    fn fallback_keeps_obstacle_constraints_hard() {
        // Obstacle: vy <= 0.25.  Agents: vy >= 1 and vy >= 2 (unsatisfiable
        // together with the obstacle).
        let obstacle = Line {
            point: Vec2::new(0.0, 0.25),
            direction: Vec2::new(-1.0, 0.0),
        };
        let agent1 = Line {
            point: Vec2::new(0.0, 1.0),
            direction: Vec2::new(1.0, 0.0),
        };
        let agent2 = Line {
            point: Vec2::new(0.0, 2.0),
            direction: Vec2::new(1.0, 0.0),
        };

        let lines = [obstacle, agent1, agent2];
        let (v, fallback) = avoiding_velocity(&lines, 1, 5.0, Vec2::new(0.0, 3.0));

        assert!(fallback);
        assert!(
            det(obstacle.direction, v - obstacle.point) >= -EPSILON,
            "obstacle constraint violated by {v:?}"
        );
        assert!(v.abs() <= 5.0 + EPSILON);
    }
}

// ── Agent constraints ─────────────────────────────────────────────────────────

#[cfg(test)]
mod agent_constraints {
    use super::*;
    use crate::lp::avoiding_velocity;
    use crate::orca::{agent_line, Body};

    fn assert_close(a: Vec2, b: Vec2, tol: f32) {
        assert!((a - b).abs() < tol, "left: {a:?}, right: {b:?}");
    }

    #[test]
    fn head_on_pair_is_mirrored() {
        let a = Body {
            position: Vec2::new(-5.0, 0.0),
            velocity: Vec2::new(5.0, 0.0),
            radius: 1.0,
        };
        let b = Body {
            position: Vec2::new(5.0, 0.0),
            velocity: Vec2::new(-5.0, 0.0),
            radius: 1.0,
        };

        let line_a = agent_line(&a, &b, 2.0, 0.25);
        let line_b = agent_line(&b, &a, 2.0, 0.25);

        // On-axis approach projects onto the right leg in each agent's own
        // frame, so the two constraints are point reflections of each other.
        assert_close(line_a.point, -line_b.point, 1e-4);
        assert_close(line_a.direction, -line_b.direction, 1e-4);
        assert_close(line_a.point, Vec2::new(4.8, -0.98), 1e-3);
        assert_close(line_a.direction, Vec2::new(-0.9798, 0.2), 1e-3);
    }

    #[test]
    fn head_on_pair_sidesteps_reciprocally() {
        let a = Body {
            position: Vec2::new(-5.0, 0.0),
            velocity: Vec2::new(5.0, 0.0),
            radius: 1.0,
        };
        let b = Body {
            position: Vec2::new(5.0, 0.0),
            velocity: Vec2::new(-5.0, 0.0),
            radius: 1.0,
        };

        let line_a = agent_line(&a, &b, 2.0, 0.25);
        let line_b = agent_line(&b, &a, 2.0, 0.25);

        let (va, _) = avoiding_velocity(&[line_a], 0, 1.0, Vec2::new(1.0, 0.0));
        let (vb, _) = avoiding_velocity(&[line_b], 0, 1.0, Vec2::new(-1.0, 0.0));

        assert!(va.y.abs() > 0.01, "agent a should sidestep, got {va:?}");
        assert!((va.y + vb.y).abs() < 1e-4, "sidesteps should mirror");
        assert!(va.abs() <= 1.0 + EPSILON && vb.abs() <= 1.0 + EPSILON);
    }

    #[test]
    fn distant_pair_keeps_preference() {
        // Contact is 4 s away but the horizon is 2 s: the constraint exists
        // yet does not bind the preferred velocity.
        let a = Body {
            position: Vec2::new(-5.0, 0.0),
            velocity: Vec2::new(1.0, 0.0),
            radius: 1.0,
        };
        let b = Body {
            position: Vec2::new(5.0, 0.0),
            velocity: Vec2::new(-1.0, 0.0),
            radius: 1.0,
        };

        let line = agent_line(&a, &b, 2.0, 0.25);
        let (v, fallback) = avoiding_velocity(&[line], 0, 1.0, Vec2::new(1.0, 0.0));
        assert!(!fallback);
        assert_close(v, Vec2::new(1.0, 0.0), 1e-5);
    }

    #[test]
    fn overlapping_pair_pushes_apart_within_time_step() {
        let a = Body {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: 1.0,
        };
        let b = Body {
            position: Vec2::new(1.0, 0.0),
            velocity: Vec2::ZERO,
            radius: 1.0,
        };

        // Overlap depth 1 over dt = 0.25 needs relative escape speed 4;
        // half of that is this agent's share.
        let line = agent_line(&a, &b, 2.0, 0.25);
        assert_close(line.point, Vec2::new(-2.0, 0.0), 1e-5);
        assert_close(line.direction, Vec2::new(0.0, 1.0), 1e-5);

        let (v, fallback) = avoiding_velocity(&[line], 0, 5.0, Vec2::ZERO);
        assert!(!fallback);
        assert_close(v, Vec2::new(-2.0, 0.0), 1e-5);
    }

    #[test]
    fn constraint_point_encodes_half_responsibility() {
        let a = Body {
            position: Vec2::ZERO,
            velocity: Vec2::new(0.3, 0.7),
            radius: 0.5,
        };
        let b = Body {
            position: Vec2::new(2.0, 1.0),
            velocity: Vec2::new(-0.4, 0.1),
            radius: 0.5,
        };

        let line = agent_line(&a, &b, 5.0, 0.1);
        // point = velocity + u/2, so u = 2 * (point - velocity) and the line
        // direction is perpendicular to the escape vector on the cap.
        let u = (line.point - a.velocity) * 2.0;
        assert!(u.abs() > 0.0, "constraint should bind");
        assert!(
            u.dot(line.direction).abs() < 1e-5,
            "direction must be perpendicular to the escape vector"
        );
    }
}

// ── Obstacle constraints ──────────────────────────────────────────────────────

#[cfg(test)]
mod obstacle_constraints {
    use super::*;
    use crate::orca::{obstacle_line, Body};
    use crowd_spatial::ObstacleMap;

    fn wall() -> ObstacleMap {
        let mut map = ObstacleMap::new();
        map.add_polygon(&[Vec2::new(-5.0, 1.0), Vec2::new(5.0, 1.0)])
            .unwrap();
        map
    }

    #[test]
    fn facing_wall_caps_approach_speed() {
        let map = wall();
        let body = Body {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: 0.5,
        };

        let line = obstacle_line(&body, 2.0, crowd_core::VertexId(0), &map, &[])
            .expect("wall in range must constrain");

        // Cut-off line of the scaled velocity obstacle: approach the wall at
        // no more than (gap - radius) / horizon.
        assert!((line.direction - Vec2::new(-1.0, 0.0)).abs() < 1e-5);
        assert!((line.point.y - 0.25).abs() < 1e-5);
    }

    #[test]
    fn covered_edge_is_skipped() {
        let map = wall();
        let body = Body {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            radius: 0.5,
        };

        let line = obstacle_line(&body, 2.0, crowd_core::VertexId(0), &map, &[])
            .expect("first pass emits");
        let again = obstacle_line(&body, 2.0, crowd_core::VertexId(0), &map, &[line]);
        assert!(again.is_none(), "edge already covered by its own line");
    }

    #[test]
    fn touching_segment_forbids_further_approach() {
        let map = wall();
        let body = Body {
            position: Vec2::new(0.0, 0.8),
            velocity: Vec2::ZERO,
            radius: 0.5,
        };

        // Already inside the inflated segment: the constraint passes through
        // the velocity origin, parallel to the wall.
        let line = obstacle_line(&body, 2.0, crowd_core::VertexId(0), &map, &[])
            .expect("collision case still constrains");
        assert_eq!(line.point, Vec2::ZERO);
        assert!((line.direction - Vec2::new(-1.0, 0.0)).abs() < 1e-5);
    }

    #[test]
    fn back_side_edge_constrains_the_other_way() {
        let map = wall();
        let body = Body {
            position: Vec2::new(0.0, 2.0),
            velocity: Vec2::ZERO,
            radius: 0.5,
        };

        // From above, the facing edge is the reversed one (vertex 1).
        let line = obstacle_line(&body, 2.0, crowd_core::VertexId(1), &map, &[])
            .expect("reverse edge must constrain");
        assert!((line.direction - Vec2::new(1.0, 0.0)).abs() < 1e-5);
        assert!((line.point.y + 0.25).abs() < 1e-5);
    }
}
