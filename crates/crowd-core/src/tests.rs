//! Unit tests for crowd-core primitives.

#[cfg(test)]
mod vec2 {
    use crate::vec2::{det, left_of, Vec2};

    #[test]
    fn dot_and_lengths() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.dot(v), 25.0);
        assert_eq!(v.abs_sq(), 25.0);
        assert_eq!(v.abs(), 5.0);
    }

    #[test]
    fn normalize_is_unit() {
        let v = Vec2::new(3.0, 4.0).normalize();
        assert!((v.abs() - 1.0).abs() < 1e-6);
        assert!((v.x - 0.6).abs() < 1e-6);
        assert!((v.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn operators() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(-3.0, 5.0);
        assert_eq!(a + b, Vec2::new(-2.0, 7.0));
        assert_eq!(a - b, Vec2::new(4.0, -3.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a / 2.0, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn det_orientation() {
        // det of (x-axis, y-axis) is positive; swapped arguments flip sign.
        assert_eq!(det(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)), 1.0);
        assert_eq!(det(Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)), -1.0);
        assert_eq!(det(Vec2::new(2.0, 2.0), Vec2::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn left_of_sign() {
        let a = Vec2::ZERO;
        let b = Vec2::new(1.0, 0.0);
        // Point above the directed line a->b is to its left.
        assert!(left_of(a, b, Vec2::new(0.5, 1.0)) > 0.0);
        assert!(left_of(a, b, Vec2::new(0.5, -1.0)) < 0.0);
        assert_eq!(left_of(a, b, Vec2::new(2.0, 0.0)), 0.0);
    }
}

#[cfg(test)]
mod geom {
    use crate::geom::{dist_sq_point_segment, Line};
    use crate::vec2::Vec2;

    #[test]
    fn segment_distance_interior() {
        let a = Vec2::new(-1.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        assert_eq!(dist_sq_point_segment(a, b, Vec2::new(0.0, 2.0)), 4.0);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Vec2::new(-1.0, 0.0);
        let b = Vec2::new(1.0, 0.0);
        assert_eq!(dist_sq_point_segment(a, b, Vec2::new(-3.0, 0.0)), 4.0);
        assert_eq!(dist_sq_point_segment(a, b, Vec2::new(4.0, 0.0)), 9.0);
    }

    #[test]
    fn line_margin_sign() {
        // Line through origin pointing up: permitted half-plane is x <= 0.
        let line = Line { point: Vec2::ZERO, direction: Vec2::new(0.0, 1.0) };
        assert!(line.margin(Vec2::new(-1.0, 3.0)) > 0.0);
        assert!(line.margin(Vec2::new(1.0, -2.0)) < 0.0);
        assert_eq!(line.margin(Vec2::new(0.0, 5.0)), 0.0);
    }
}

#[cfg(test)]
mod ids {
    use crate::ids::{AgentId, VertexId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId::from_index(42);
        assert_eq!(id, AgentId(42));
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(VertexId(100) > VertexId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(VertexId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "agent #7");
        assert_eq!(VertexId(3).to_string(), "vertex #3");
        assert_eq!(VertexId::INVALID.to_string(), "vertex #invalid");
    }
}
