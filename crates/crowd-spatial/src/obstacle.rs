//! Obstacle vertex arena.
//!
//! # Data layout
//!
//! Every polygon vertex is one [`ObstacleVertex`] in a single flat arena,
//! addressed by [`VertexId`].  `prev`/`next` are ids, not references, so the
//! cyclic linkage survives arena growth: when the obstacle BSP splits a
//! crossing edge it appends the new vertex at the tail and splices it into
//! the cycle without moving anything.
//!
//! A vertex also represents the directed edge from it to `next`.  Polygons
//! are given in counter-clockwise order and avoided on their right side, so
//! a CCW-wound polygon is a solid obstacle and a CCW-wound boundary encloses
//! the walkable area.  A two-vertex polygon is a wall: its two directed
//! edges point in opposite directions and both sides are avoided.

use std::ops::Index;

use crowd_core::{left_of, Vec2, VertexId};

use crate::error::{SpatialError, SpatialResult};

/// One polygon vertex, doubling as the directed edge toward `next`.
#[derive(Copy, Clone, Debug)]
pub struct ObstacleVertex {
    /// Position of the vertex.
    pub point: Vec2,

    /// Unit vector from `point` toward `next`'s point.
    pub unit_dir: Vec2,

    /// Cyclic predecessor within the same polygon.
    pub prev: VertexId,

    /// Cyclic successor within the same polygon.
    pub next: VertexId,

    /// `true` iff the polygon turns left (or goes straight) at this vertex.
    /// Two-vertex walls and split vertices are always convex.
    pub is_convex: bool,
}

/// Arena of all obstacle vertices in the simulation.
#[derive(Default)]
pub struct ObstacleMap {
    vertices: Vec<ObstacleVertex>,
}

impl ObstacleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterator over all `VertexId`s in ascending index order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::from_index)
    }

    /// Successor of `v` in its polygon cycle.
    #[inline]
    pub fn next(&self, v: VertexId) -> VertexId {
        self.vertices[v.index()].next
    }

    /// Predecessor of `v` in its polygon cycle.
    #[inline]
    pub fn prev(&self, v: VertexId) -> VertexId {
        self.vertices[v.index()].prev
    }

    /// Append a polygon of `points` (CCW order) and return the id of its
    /// first vertex.
    ///
    /// A polygon of fewer than 2 vertices is rejected without touching the
    /// arena.
    pub fn add_polygon(&mut self, points: &[Vec2]) -> SpatialResult<VertexId> {
        let n = points.len();
        if n < 2 {
            return Err(SpatialError::DegeneratePolygon(n));
        }

        let first = self.vertices.len();
        for (i, &point) in points.iter().enumerate() {
            let next_i = if i == n - 1 { 0 } else { i + 1 };
            let prev_i = if i == 0 { n - 1 } else { i - 1 };

            let is_convex = if n == 2 {
                true
            } else {
                left_of(points[prev_i], point, points[next_i]) >= 0.0
            };

            self.vertices.push(ObstacleVertex {
                point,
                unit_dir: (points[next_i] - point).normalize(),
                prev: VertexId::from_index(first + prev_i),
                next: VertexId::from_index(first + next_i),
                is_convex,
            });
        }

        Ok(VertexId::from_index(first))
    }

    /// Splice a new vertex at `point` between `v` and its successor.
    ///
    /// The new vertex inherits `v`'s edge direction and is marked convex.
    /// Returns the new vertex's id.
    pub(crate) fn split_edge(&mut self, v: VertexId, point: Vec2) -> VertexId {
        let id = VertexId::from_index(self.vertices.len());
        let old_next = self.vertices[v.index()].next;

        self.vertices.push(ObstacleVertex {
            point,
            unit_dir: self.vertices[v.index()].unit_dir,
            prev: v,
            next: old_next,
            is_convex: true,
        });

        self.vertices[v.index()].next = id;
        self.vertices[old_next.index()].prev = id;

        id
    }
}

impl Index<VertexId> for ObstacleMap {
    type Output = ObstacleVertex;

    #[inline]
    fn index(&self, v: VertexId) -> &ObstacleVertex {
        &self.vertices[v.index()]
    }
}
