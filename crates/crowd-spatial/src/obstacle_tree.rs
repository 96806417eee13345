//! Binary space partition over obstacle edges.
//!
//! Each node stores the first endpoint of its splitting edge; edges entirely
//! on one side of the splitter's line go to that subtree, and edges crossing
//! the line are split in two at the intersection point.  The split inserts a
//! real vertex into the [`ObstacleMap`], so after the build every edge lies
//! wholly on one side of every splitter above it.

use crowd_core::{det, dist_sq_point_segment, left_of, Vec2, VertexId, EPSILON};

use crate::obstacle::ObstacleMap;

struct ObstacleTreeNode {
    /// First endpoint of the splitting edge.
    edge: VertexId,
    left: Option<Box<ObstacleTreeNode>>,
    right: Option<Box<ObstacleTreeNode>>,
}

/// The obstacle BSP.  Build once via [`build`](Self::build) after all
/// obstacles are added; rebuild after adding more.
#[derive(Default)]
pub struct ObstacleKdTree {
    root: Option<Box<ObstacleTreeNode>>,
}

impl ObstacleKdTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard any previous tree and rebuild over all edges in `map`.
    ///
    /// Splitting may append vertices to `map`; ids handed out earlier stay
    /// valid.
    pub fn build(&mut self, map: &mut ObstacleMap) {
        let edges: Vec<VertexId> = map.vertex_ids().collect();
        self.root = Self::build_recursive(map, edges);
    }

    fn build_recursive(
        map: &mut ObstacleMap,
        edges: Vec<VertexId>,
    ) -> Option<Box<ObstacleTreeNode>> {
        if edges.is_empty() {
            return None;
        }

        // Pick the splitter that lexicographically minimizes
        // (max(left, right), min(left, right)).
        let mut optimal_split = 0;
        let mut min_left = edges.len();
        let mut min_right = edges.len();

        for (i, &ei) in edges.iter().enumerate() {
            let mut left_size = 0usize;
            let mut right_size = 0usize;

            let i1 = map[ei].point;
            let i2 = map[map[ei].next].point;

            for (j, &ej) in edges.iter().enumerate() {
                if i == j {
                    continue;
                }

                let j1_left = left_of(i1, i2, map[ej].point);
                let j2_left = left_of(i1, i2, map[map[ej].next].point);

                if j1_left >= -EPSILON && j2_left >= -EPSILON {
                    left_size += 1;
                } else if j1_left <= EPSILON && j2_left <= EPSILON {
                    right_size += 1;
                } else {
                    left_size += 1;
                    right_size += 1;
                }

                if (left_size.max(right_size), left_size.min(right_size))
                    >= (min_left.max(min_right), min_left.min(min_right))
                {
                    break;
                }
            }

            if (left_size.max(right_size), left_size.min(right_size))
                < (min_left.max(min_right), min_left.min(min_right))
            {
                min_left = left_size;
                min_right = right_size;
                optimal_split = i;
            }
        }

        let mut left_edges = Vec::with_capacity(min_left);
        let mut right_edges = Vec::with_capacity(min_right);

        let ei = edges[optimal_split];
        let i1 = map[ei].point;
        let i2 = map[map[ei].next].point;

        for (j, &ej) in edges.iter().enumerate() {
            if j == optimal_split {
                continue;
            }

            let j1 = map[ej].point;
            let j2 = map[map[ej].next].point;

            let j1_left = left_of(i1, i2, j1);
            let j2_left = left_of(i1, i2, j2);

            if j1_left >= -EPSILON && j2_left >= -EPSILON {
                left_edges.push(ej);
            } else if j1_left <= EPSILON && j2_left <= EPSILON {
                right_edges.push(ej);
            } else {
                // Edge crosses the splitter's line; cut it at the
                // intersection and send one half each way.
                let t = det(i2 - i1, j1 - i1) / det(i2 - i1, j1 - j2);
                let split_point = j1 + (j2 - j1) * t;
                let new_edge = map.split_edge(ej, split_point);

                if j1_left > 0.0 {
                    left_edges.push(ej);
                    right_edges.push(new_edge);
                } else {
                    right_edges.push(ej);
                    left_edges.push(new_edge);
                }
            }
        }

        Some(Box::new(ObstacleTreeNode {
            edge: ei,
            left: Self::build_recursive(map, left_edges),
            right: Self::build_recursive(map, right_edges),
        }))
    }

    /// Append every edge within `range_sq` of `position` that faces it (the
    /// position is on the edge's outward right side) to `out` as
    /// `(dist_sq, first_endpoint)` pairs, in visit order.
    pub fn query_neighbors(
        &self,
        map: &ObstacleMap,
        position: Vec2,
        range_sq: f32,
        out: &mut Vec<(f32, VertexId)>,
    ) {
        Self::query_neighbors_recursive(map, position, range_sq, self.root.as_deref(), out);
    }

    fn query_neighbors_recursive(
        map: &ObstacleMap,
        position: Vec2,
        range_sq: f32,
        node: Option<&ObstacleTreeNode>,
        out: &mut Vec<(f32, VertexId)>,
    ) {
        let Some(node) = node else {
            return;
        };

        let v1 = node.edge;
        let v2 = map[v1].next;
        let p1 = map[v1].point;
        let p2 = map[v2].point;

        let agent_left = left_of(p1, p2, position);

        let (near, far) = if agent_left >= 0.0 {
            (node.left.as_deref(), node.right.as_deref())
        } else {
            (node.right.as_deref(), node.left.as_deref())
        };

        Self::query_neighbors_recursive(map, position, range_sq, near, out);

        let dist_sq_line = agent_left * agent_left / (p2 - p1).abs_sq();
        if dist_sq_line < range_sq {
            if agent_left < 0.0 {
                // Only edges seen from their outward side count.
                let dist_sq = dist_sq_point_segment(p1, p2, position);
                if dist_sq < range_sq {
                    out.push((dist_sq, v1));
                }
            }

            Self::query_neighbors_recursive(map, position, range_sq, far, out);
        }
    }

    /// `true` if the tube of `radius` around the segment from `q1` to `q2`
    /// crosses no obstacle edge.
    pub fn query_visibility(&self, map: &ObstacleMap, q1: Vec2, q2: Vec2, radius: f32) -> bool {
        Self::query_visibility_recursive(map, q1, q2, radius, self.root.as_deref())
    }

    fn query_visibility_recursive(
        map: &ObstacleMap,
        q1: Vec2,
        q2: Vec2,
        radius: f32,
        node: Option<&ObstacleTreeNode>,
    ) -> bool {
        let Some(node) = node else {
            return true;
        };

        let p1 = map[node.edge].point;
        let p2 = map[map[node.edge].next].point;

        let q1_left = left_of(p1, p2, q1);
        let q2_left = left_of(p1, p2, q2);
        let inv_length = 1.0 / (p2 - p1).abs_sq();
        let radius_sq = radius * radius;

        let left = node.left.as_deref();
        let right = node.right.as_deref();

        if q1_left >= 0.0 && q2_left >= 0.0 {
            // Both endpoints on the left: the right side only matters if
            // either endpoint is within the radius margin of the line.
            return Self::query_visibility_recursive(map, q1, q2, radius, left)
                && ((q1_left * q1_left * inv_length >= radius_sq
                    && q2_left * q2_left * inv_length >= radius_sq)
                    || Self::query_visibility_recursive(map, q1, q2, radius, right));
        }
        if q1_left <= 0.0 && q2_left <= 0.0 {
            return Self::query_visibility_recursive(map, q1, q2, radius, right)
                && ((q1_left * q1_left * inv_length >= radius_sq
                    && q2_left * q2_left * inv_length >= radius_sq)
                    || Self::query_visibility_recursive(map, q1, q2, radius, left));
        }
        if q1_left >= 0.0 && q2_left <= 0.0 {
            // The segment crosses from left to right, which the splitter's
            // edge orientation permits; both sides must agree.
            return Self::query_visibility_recursive(map, q1, q2, radius, left)
                && Self::query_visibility_recursive(map, q1, q2, radius, right);
        }

        let p1_left = left_of(q1, q2, p1);
        let p2_left = left_of(q1, q2, p2);
        let inv_length_q = 1.0 / (q2 - q1).abs_sq();

        p1_left * p2_left >= 0.0
            && p1_left * p1_left * inv_length_q > radius_sq
            && p2_left * p2_left * inv_length_q > radius_sq
            && Self::query_visibility_recursive(map, q1, q2, radius, left)
            && Self::query_visibility_recursive(map, q1, q2, radius, right)
    }
}
