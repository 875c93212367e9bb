// src/services/user_rank.rs
// DOCUMENTATION: Member rank computed from activity
// PURPOSE: 0-5 stars in half-star steps, with a slow progression curve

use serde::{Deserialize, Serialize};

use crate::models::ProfileStats;

const STAR_TITLES: [&str; 6] = [
    "Shaving Novice",
    "Shaving Initiate",
    "Shaving Amateur",
    "Shaving Enthusiast",
    "Shaving Expert",
    "Master Barber",
];

/// Points needed for each half star, index 0 = 0 stars, index 10 = 5 stars
const STAR_THRESHOLDS: [i64; 11] = [0, 10, 25, 50, 100, 160, 230, 310, 400, 500, 600];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRank {
    pub stars: f32,
    pub title: String,
    pub current_points: i64,
    /// None once the top tier is reached
    pub next_star_points: Option<i64>,
    /// Percent towards the next half star
    pub progress: u8,
}

/// Activity points, weights in hundredths so the floor is exact
pub fn activity_points(stats: &ProfileStats) -> i64 {
    let hundredths = stats.owned_razors * 50
        + stats.reviews_posted * 200
        + stats.comments_posted * 50
        + stats.likes_received * 25
        + stats.razors_created * 300
        + stats.favorite_razors * 25
        + stats.wishlisted_razors * 15;
    hundredths / 100
}

pub fn rank_for(stats: &ProfileStats) -> UserRank {
    let points = activity_points(stats);

    let star_index = STAR_THRESHOLDS
        .iter()
        .rposition(|&threshold| points >= threshold)
        .unwrap_or(0);

    let stars = star_index as f32 / 2.0;
    let title = STAR_TITLES[(star_index / 2).min(STAR_TITLES.len() - 1)].to_string();

    let (next_star_points, progress) = match STAR_THRESHOLDS.get(star_index + 1) {
        Some(&next) => {
            let current = STAR_THRESHOLDS[star_index];
            let pct = ((points - current) * 100 / (next - current)).min(99);
            (Some(next), pct as u8)
        }
        None => (None, 100),
    };

    UserRank {
        stars,
        title,
        current_points: points,
        next_star_points,
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_member_is_novice() {
        let rank = rank_for(&ProfileStats::default());
        assert_eq!(rank.stars, 0.0);
        assert_eq!(rank.title, "Shaving Novice");
        assert_eq!(rank.next_star_points, Some(10));
        assert_eq!(rank.progress, 0);
    }

    #[test]
    fn test_points_are_floored() {
        let stats = ProfileStats {
            wishlisted_razors: 6,
            owned_razors: 1,
            ..Default::default()
        };
        // 0.9 + 0.5 = 1.4
        assert_eq!(activity_points(&stats), 1);
    }

    #[test]
    fn test_half_star_and_progress() {
        let stats = ProfileStats {
            reviews_posted: 9,
            ..Default::default()
        };
        let rank = rank_for(&stats);
        assert_eq!(rank.current_points, 18);
        assert_eq!(rank.stars, 0.5);
        assert_eq!(rank.title, "Shaving Novice");
        assert_eq!(rank.next_star_points, Some(25));
        // (18 - 10) / (25 - 10) = 53%
        assert_eq!(rank.progress, 53);
    }

    #[test]
    fn test_top_tier() {
        let stats = ProfileStats {
            razors_created: 250,
            ..Default::default()
        };
        let rank = rank_for(&stats);
        assert_eq!(rank.stars, 5.0);
        assert_eq!(rank.title, "Master Barber");
        assert_eq!(rank.next_star_points, None);
        assert_eq!(rank.progress, 100);
    }
}
