//! Median-split AABB tree over agent positions.
//!
//! # Data layout
//!
//! Nodes live in a dense array of size `2*N - 1`, laid out in pre-order:
//! a node's left child is `node + 1` and its right child is
//! `node + 2 * left_size`.  There are no child pointers to chase and
//! siblings of the descent path stay close in memory.  The layout is
//! load-bearing for query throughput; keep it.
//!
//! The tree indexes a permutation of [`AgentId`]s and reads positions from a
//! caller-provided slice, so it never owns or borrows agent state between
//! calls.  It is rebuilt from scratch every simulation step.

use crowd_core::{AgentId, Vec2};

use crate::neighbors::NeighborList;

/// Nodes with at most this many agents are leaves.
pub const MAX_LEAF_SIZE: usize = 10;

#[derive(Copy, Clone, Default)]
struct AgentTreeNode {
    begin: usize,
    end: usize,
    left: usize,
    right: usize,
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl AgentTreeNode {
    /// Squared distance from `p` to this node's AABB; zero inside.
    #[inline]
    fn dist_sq(&self, p: Vec2) -> f32 {
        let dx_lo = (self.min_x - p.x).max(0.0);
        let dx_hi = (p.x - self.max_x).max(0.0);
        let dy_lo = (self.min_y - p.y).max(0.0);
        let dy_hi = (p.y - self.max_y).max(0.0);
        dx_lo * dx_lo + dx_hi * dx_hi + dy_lo * dy_lo + dy_hi * dy_hi
    }
}

/// The agent kd-tree.
#[derive(Default)]
pub struct AgentKdTree {
    agents: Vec<AgentId>,
    nodes: Vec<AgentTreeNode>,
}

impl AgentKdTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the tree over `positions` (indexed by `AgentId`).
    ///
    /// Agents added since the last build are appended to the internal
    /// permutation first; the recursion then repartitions everything.
    pub fn build(&mut self, positions: &[Vec2]) {
        if self.agents.len() < positions.len() {
            for i in self.agents.len()..positions.len() {
                self.agents.push(AgentId::from_index(i));
            }
            self.nodes
                .resize(2 * self.agents.len() - 1, AgentTreeNode::default());
        }

        if !self.agents.is_empty() {
            let end = self.agents.len();
            self.build_recursive(positions, 0, end, 0);
        }
    }

    fn build_recursive(&mut self, positions: &[Vec2], begin: usize, end: usize, node: usize) {
        let mut min_x;
        let mut max_x;
        let mut min_y;
        let mut max_y;
        {
            let p = positions[self.agents[begin].index()];
            min_x = p.x;
            max_x = p.x;
            min_y = p.y;
            max_y = p.y;
        }
        for i in begin + 1..end {
            let p = positions[self.agents[i].index()];
            max_x = max_x.max(p.x);
            min_x = min_x.min(p.x);
            max_y = max_y.max(p.y);
            min_y = min_y.min(p.y);
        }

        self.nodes[node] = AgentTreeNode {
            begin,
            end,
            left: 0,
            right: 0,
            min_x,
            max_x,
            min_y,
            max_y,
        };

        if end - begin <= MAX_LEAF_SIZE {
            return;
        }

        // Split the wider extent at its midpoint.
        let is_vertical = max_x - min_x > max_y - min_y;
        let split_value = if is_vertical {
            0.5 * (max_x + min_x)
        } else {
            0.5 * (max_y + min_y)
        };

        let coord = |agents: &[AgentId], i: usize| {
            let p = positions[agents[i].index()];
            if is_vertical {
                p.x
            } else {
                p.y
            }
        };

        let mut left = begin;
        let mut right = end;
        while left < right {
            while left < right && coord(&self.agents, left) < split_value {
                left += 1;
            }
            while right > left && coord(&self.agents, right - 1) >= split_value {
                right -= 1;
            }
            if left < right {
                self.agents.swap(left, right - 1);
                left += 1;
                right -= 1;
            }
        }

        // A degenerate partition would loop forever; force one element left.
        if left == begin {
            left += 1;
        }

        let left_child = node + 1;
        let right_child = node + 2 * (left - begin);
        self.nodes[node].left = left_child;
        self.nodes[node].right = right_child;

        self.build_recursive(positions, begin, left, left_child);
        self.build_recursive(positions, left, end, right_child);
    }

    /// Collect up to `neighbors.cap` agents nearest to `agent` into
    /// `neighbors`, bounded by its current range.  `agent` itself is skipped.
    pub fn query(&self, positions: &[Vec2], agent: AgentId, neighbors: &mut NeighborList) {
        if self.nodes.is_empty() {
            return;
        }
        self.query_recursive(positions, agent, neighbors, 0);
    }

    fn query_recursive(
        &self,
        positions: &[Vec2],
        agent: AgentId,
        neighbors: &mut NeighborList,
        node: usize,
    ) {
        let n = self.nodes[node];
        let p = positions[agent.index()];

        if n.end - n.begin <= MAX_LEAF_SIZE {
            for i in n.begin..n.end {
                let other = self.agents[i];
                if other != agent {
                    let dist_sq = (p - positions[other.index()]).abs_sq();
                    neighbors.insert(dist_sq, other);
                }
            }
            return;
        }

        let dist_sq_left = self.nodes[n.left].dist_sq(p);
        let dist_sq_right = self.nodes[n.right].dist_sq(p);

        // Descend into the closer child first so the range shrinks before
        // the farther child is tested.
        if dist_sq_left < dist_sq_right {
            if dist_sq_left < neighbors.range_sq() {
                self.query_recursive(positions, agent, neighbors, n.left);
                if dist_sq_right < neighbors.range_sq() {
                    self.query_recursive(positions, agent, neighbors, n.right);
                }
            }
        } else if dist_sq_right < neighbors.range_sq() {
            self.query_recursive(positions, agent, neighbors, n.right);
            if dist_sq_left < neighbors.range_sq() {
                self.query_recursive(positions, agent, neighbors, n.left);
            }
        }
    }
}
