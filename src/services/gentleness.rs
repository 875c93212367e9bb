// src/services/gentleness.rs
// DOCUMENTATION: Gentleness scale helpers (1 = very mild, 20 = very aggressive)

pub const MIN_GENTLENESS: i32 = 1;
pub const MAX_GENTLENESS: i32 = 20;

pub fn is_valid(value: i32) -> bool {
    (MIN_GENTLENESS..=MAX_GENTLENESS).contains(&value)
}

/// Human label of the band a value falls in
pub fn label(value: Option<i32>) -> &'static str {
    match value {
        Some(1..=3) => "Very mild",
        Some(4..=7) => "Mild",
        Some(8..=12) => "Moderate",
        Some(13..=17) => "Aggressive",
        Some(18..=20) => "Very aggressive",
        _ => "Not rated",
    }
}

/// Hex colour of the band a value falls in
pub fn color(value: Option<i32>) -> &'static str {
    match value {
        Some(1..=3) => "#fff176",
        Some(4..=7) => "#f9bd59",
        Some(8..=12) => "#e8863b",
        Some(13..=17) => "#d03c1f",
        Some(18..=20) => "#7e0404",
        _ => "#808080",
    }
}

/// Rounded mean of a set of ratings, None when there are none
pub fn average(ratings: &[i32]) -> Option<i32> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|&r| r as i64).sum();
    Some((sum as f64 / ratings.len() as f64).round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(label(Some(3)), "Very mild");
        assert_eq!(label(Some(4)), "Mild");
        assert_eq!(label(Some(12)), "Moderate");
        assert_eq!(label(Some(13)), "Aggressive");
        assert_eq!(label(Some(20)), "Very aggressive");
    }

    #[test]
    fn test_out_of_scale_is_not_rated() {
        assert_eq!(label(None), "Not rated");
        assert_eq!(label(Some(0)), "Not rated");
        assert_eq!(label(Some(21)), "Not rated");
        assert_eq!(color(Some(21)), "#808080");
        assert!(!is_valid(0));
        assert!(is_valid(20));
    }

    #[test]
    fn test_average_rounds_half_up() {
        assert_eq!(average(&[]), None);
        assert_eq!(average(&[5, 6]), Some(6));
        assert_eq!(average(&[4, 4, 5]), Some(4));
    }
}
