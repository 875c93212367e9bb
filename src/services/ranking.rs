// src/services/ranking.rs
// DOCUMENTATION: Favorite ordering planner
// PURPOSE: Decide which favorite_rating values change when a favorite moves
//
// Favorites are displayed by favorite_rating DESC NULLS FIRST, id ASC.
// Position 1 is the top of the list (highest rating). The planner is pure:
// CollectionService loads the rows under a row lock, asks for a plan and
// writes the returned updates in the same transaction.

use crate::errors::RazorError;
use crate::models::MoveDirection;

/// One favorite in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedFavorite {
    pub entry_id: i64,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingUpdate {
    pub entry_id: i64,
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Rows whose rating must be written, in display order
    pub updates: Vec<RatingUpdate>,
    /// False when the item was already at the edge it was pushed against
    pub moved: bool,
}

/// Ratings after repair, one per input item, strictly descending.
///
/// NULL ratings get values above the current maximum; the topmost NULL gets
/// the highest one so the displayed order does not change. If the result is
/// still not strictly descending (duplicates, or a list not in display
/// order), the whole list is renumbered n..1.
pub fn repaired_ratings(favorites: &[RankedFavorite]) -> Vec<i32> {
    let max = favorites.iter().filter_map(|f| f.rating).max().unwrap_or(0);
    let nulls = favorites.iter().filter(|f| f.rating.is_none()).count() as i32;

    let mut next = max + nulls;
    let mut ratings: Vec<i32> = favorites
        .iter()
        .map(|f| match f.rating {
            Some(r) => r,
            None => {
                let assigned = next;
                next -= 1;
                assigned
            }
        })
        .collect();

    if !is_strictly_descending(&ratings) {
        let n = ratings.len() as i32;
        ratings = (0..n).map(|i| n - i).collect();
    }

    ratings
}

fn is_strictly_descending(ratings: &[i32]) -> bool {
    ratings.windows(2).all(|pair| pair[0] > pair[1])
}

/// Plan a move of the favorite at 1-based `position`.
///
/// Moving the first item up or the last item down only repairs (if needed).
pub fn plan_move(
    favorites: &[RankedFavorite],
    position: usize,
    direction: MoveDirection,
) -> Result<MovePlan, RazorError> {
    if position == 0 || position > favorites.len() {
        return Err(RazorError::InvalidInput(format!(
            "position {} is outside the favorites list (1..={})",
            position,
            favorites.len()
        )));
    }

    let mut ratings = repaired_ratings(favorites);
    let index = position - 1;
    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&i| i < favorites.len()),
    };

    let moved = match neighbour {
        Some(other) => {
            ratings.swap(index, other);
            true
        }
        None => false,
    };

    let updates = favorites
        .iter()
        .zip(&ratings)
        .filter(|(fav, rating)| fav.rating != Some(**rating))
        .map(|(fav, &rating)| RatingUpdate {
            entry_id: fav.entry_id,
            rating,
        })
        .collect();

    Ok(MovePlan { updates, moved })
}
