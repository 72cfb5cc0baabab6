//! Integer 2-D points.

/// A point on the integer grid.
///
/// Two points are equal iff both coordinates match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_345() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = Point::new(69420, 17);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_distance_across_full_grid() {
        let a = Point::new(0, 0);
        let b = Point::new(69420, 69420);
        let expected = 69420.0 * std::f64::consts::SQRT_2;
        assert!((a.distance_to(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_distance_extreme_coordinates() {
        let a = Point::new(i64::MIN, i64::MIN);
        let b = Point::new(i64::MAX, i64::MIN);
        let d = a.distance_to(&b);
        assert!(d.is_finite());
        assert!((d - 2f64.powi(64)).abs() / 2f64.powi(64) < 1e-12);
        assert_eq!(b.distance_to(&a), d);

        let c = Point::new(i64::MAX, i64::MAX);
        assert!((a.distance_to(&c) - 2f64.powi(64) * std::f64::consts::SQRT_2).abs() < 1e6);
    }

    #[test]
    fn test_equality_by_coordinates() {
        assert_eq!(Point::new(1, 2), Point::new(1, 2));
        assert_ne!(Point::new(1, 2), Point::new(2, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::new(5, -3).to_string(), "(5, -3)");
    }
}
