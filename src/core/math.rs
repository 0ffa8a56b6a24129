// Math utilities and helper functions

use glam::Vec2;

/// Zero out an axis whose magnitude is below the deadzone
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() >= deadzone {
        value
    } else {
        0.0
    }
}

/// Signed area of a closed polygon (positive when counter-clockwise in a y-up frame)
pub fn signed_area(points: &[Vec2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice_area += a.perp_dot(b);
    }
    twice_area * 0.5
}

/// Area centroid of a closed polygon; falls back to the vertex mean when degenerate
pub fn centroid(points: &[Vec2]) -> Vec2 {
    let area = signed_area(points);
    if area.abs() <= f32::EPSILON {
        if points.is_empty() {
            return Vec2::ZERO;
        }
        return points.iter().copied().sum::<Vec2>() / points.len() as f32;
    }

    let mut sum = Vec2::ZERO;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        sum += (*a + b) * a.perp_dot(b);
    }
    sum / (6.0 * area)
}

/// Check that every turn of a closed polygon goes the same way
pub fn is_convex(points: &[Vec2]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut sign = 0.0_f32;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let c = points[(i + 2) % points.len()];
        let cross = (b - a).perp_dot(c - b);

        if cross.abs() <= 1e-6 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.2), 0.0);
        assert_eq!(apply_deadzone(-0.19, 0.2), 0.0);
        assert_eq!(apply_deadzone(0.2, 0.2), 0.2);
        assert_eq!(apply_deadzone(-0.7, 0.2), -0.7);
    }

    #[test]
    fn test_square_area_and_centroid() {
        let square = unit_square();
        assert_eq!(signed_area(&square), 1.0);
        assert_eq!(centroid(&square), Vec2::new(0.5, 0.5));

        let mut clockwise = square.clone();
        clockwise.reverse();
        assert_eq!(signed_area(&clockwise), -1.0);
        assert_eq!(centroid(&clockwise), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_convexity() {
        assert!(is_convex(&unit_square()));

        let l_shape = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(!is_convex(&l_shape));
        assert!(!is_convex(&l_shape[..2]));
    }
}
