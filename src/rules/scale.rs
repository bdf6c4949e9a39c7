//! Distance on the loop of scale

/// Distance between two scales on a cyclical [0, 1] spectrum.
///
/// 0.0 and 1.0 are the same point, so the result is symmetric and never
/// exceeds 0.5.
pub fn scale_distance(a: f64, b: f64) -> f64 {
    let dist = (a - b).abs();
    dist.min(1.0 - dist)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_scale_distance_values() {
        assert!(approx(scale_distance(0.1, 0.9), 0.2));
        assert!(approx(scale_distance(0.1, 0.2), 0.1));
        assert!(approx(scale_distance(0.0, 1.0), 0.0));
        assert!(approx(scale_distance(0.0, 0.5), 0.5));
    }

    #[test]
    fn test_scale_distance_symmetric() {
        assert!(approx(scale_distance(0.3, 0.75), scale_distance(0.75, 0.3)));
    }

    #[test]
    fn test_equal_scales_are_zero() {
        assert_eq!(scale_distance(0.42, 0.42), 0.0);
    }
}
