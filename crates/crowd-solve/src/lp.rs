//! Incremental linear programs over half-plane constraints.
//!
//! The primary program picks the velocity nearest the preferred one inside
//! the speed disc and every half-plane, visiting constraints one at a time
//! and re-solving on the boundary of the first violated one (expected O(n)).
//! When that becomes infeasible, [`solve_3d`] minimizes the largest
//! violation across the agent constraints while never relaxing the obstacle
//! constraints at the head of the list.

use crowd_core::{det, Line, Vec2, EPSILON};

/// The objective of a solve, ignoring constraints.
#[derive(Copy, Clone, Debug)]
pub enum OptimalValue {
    /// Prefer the feasible velocity nearest this point.
    Point(Vec2),
    /// Prefer the feasible velocity furthest along this unit direction.
    Direction(Vec2),
}

/// Re-solve restricted to the boundary line of constraint `line_no`,
/// intersected with the speed disc and constraints `0..line_no`.
///
/// Returns `None` when that intersection is empty.
fn solve_on_line(
    lines: &[Line],
    line_no: usize,
    radius: f32,
    optimal: &OptimalValue,
) -> Option<Vec2> {
    let line = &lines[line_no];
    let dot = line.point.dot(line.direction);
    let discriminant = dot * dot + radius * radius - line.point.abs_sq();

    if discriminant < 0.0 {
        // The speed disc misses this line entirely.
        return None;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let mut t_left = -dot - sqrt_discriminant;
    let mut t_right = -dot + sqrt_discriminant;

    for prev in &lines[..line_no] {
        let denominator = det(line.direction, prev.direction);
        let numerator = det(prev.direction, line.point - prev.point);

        if denominator.abs() <= EPSILON {
            // Parallel lines: either the whole line is feasible for `prev`
            // or none of it is.
            if numerator < 0.0 {
                return None;
            }
            continue;
        }

        let t = numerator / denominator;
        if denominator >= 0.0 {
            t_right = t_right.min(t);
        } else {
            t_left = t_left.max(t);
        }

        if t_left > t_right {
            return None;
        }
    }

    let t = match *optimal {
        OptimalValue::Direction(direction) => {
            if direction.dot(line.direction) > 0.0 {
                t_right
            } else {
                t_left
            }
        }
        OptimalValue::Point(point) => {
            let t = line.direction.dot(point - line.point);
            t.clamp(t_left, t_right)
        }
    };

    Some(line.point + line.direction * t)
}

/// Solve the two-dimensional program over all `lines` within the speed disc.
///
/// `Err((index, partial))` reports the first infeasible constraint together
/// with the best velocity found before reaching it.
pub fn solve_2d(
    lines: &[Line],
    radius: f32,
    optimal: &OptimalValue,
) -> Result<Vec2, (usize, Vec2)> {
    let mut result = match *optimal {
        OptimalValue::Direction(direction) => direction * radius,
        OptimalValue::Point(point) if point.abs_sq() > radius * radius => {
            point.normalize() * radius
        }
        OptimalValue::Point(point) => point,
    };

    for (i, line) in lines.iter().enumerate() {
        if det(line.direction, line.point - result) > 0.0 {
            // The current optimum violates this constraint; the new optimum
            // lies on its boundary.
            match solve_on_line(lines, i, radius, optimal) {
                Some(v) => result = v,
                None => return Err((i, result)),
            }
        }
    }

    Ok(result)
}

/// Relax the agent constraints starting at `begin_line`, minimizing the
/// maximum violation.  Constraints before `num_obstacle_lines` are obstacle
/// half-planes and stay hard.
///
/// Always produces a velocity of magnitude at most `radius`.
pub fn solve_3d(
    lines: &[Line],
    num_obstacle_lines: usize,
    begin_line: usize,
    radius: f32,
    mut result: Vec2,
) -> Vec2 {
    log::debug!("velocity program infeasible at constraint {begin_line}; relaxing agent constraints");

    let mut distance = 0.0_f32;

    for i in begin_line..lines.len() {
        let line = &lines[i];
        if det(line.direction, line.point - result) <= distance {
            continue;
        }

        // Project every earlier agent constraint onto `line`, keeping the
        // obstacle constraints untouched at the head.
        let mut projected: Vec<Line> = lines[..num_obstacle_lines].to_vec();

        for prev in &lines[num_obstacle_lines..i] {
            let determinant = det(line.direction, prev.direction);

            let point = if determinant.abs() <= EPSILON {
                if line.direction.dot(prev.direction) > 0.0 {
                    // Same direction: `prev` is redundant here.
                    continue;
                }
                (line.point + prev.point) * 0.5
            } else {
                line.point
                    + line.direction
                        * (det(prev.direction, line.point - prev.point) / determinant)
            };

            projected.push(Line {
                point,
                direction: (prev.direction - line.direction).normalize(),
            });
        }

        // The projected system is feasible by construction; if rounding says
        // otherwise, keep the previous result.
        let optimal = OptimalValue::Direction(Vec2::new(-line.direction.y, line.direction.x));
        if let Ok(v) = solve_2d(&projected, radius, &optimal) {
            result = v;
        }

        distance = det(line.direction, line.point - result);
    }

    result
}

/// Choose the new velocity for one agent.
///
/// The first `num_obstacle_lines` entries of `lines` are obstacle
/// constraints; the rest come from agent neighbors.  Returns the chosen
/// velocity and whether the fallback had to relax agent constraints.
pub fn avoiding_velocity(
    lines: &[Line],
    num_obstacle_lines: usize,
    max_speed: f32,
    pref_velocity: Vec2,
) -> (Vec2, bool) {
    match solve_2d(lines, max_speed, &OptimalValue::Point(pref_velocity)) {
        Ok(v) => (v, false),
        Err((failed, partial)) => (
            solve_3d(lines, num_obstacle_lines, failed, max_speed, partial),
            true,
        ),
    }
}
