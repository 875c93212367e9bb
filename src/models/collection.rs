// src/models/collection.rs
// DOCUMENTATION: Per-user collection entries (owned / wishlist / favorites)
// PURPOSE: Row mapping plus the request DTOs of the /collections routes

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::RazorSummary;

/// Collection entry joined with its razor (razor columns are prefixed `r_`)
#[derive(Debug, Clone, FromRow)]
pub struct CollectionRow {
    pub id: i64,
    pub razor_id: i64,
    pub in_collection: bool,
    pub in_wishlist: bool,
    pub is_favorite: bool,
    pub favorite_rating: Option<i32>,
    pub is_variant: bool,
    pub variant_material: Option<String>,
    pub variant_finish: Option<String>,
    pub variant_comb_type: Option<String>,
    pub variant_notes: Option<String>,
    pub r_manufacturer: String,
    pub r_model: String,
    pub r_reference: Option<String>,
    pub r_image_url: Option<String>,
    pub r_blade_type: String,
    pub r_avg_gentleness: Option<i32>,
}

/// Entry as returned by the API and stored in share snapshots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionEntry {
    pub id: i64,
    pub razor_id: i64,
    pub in_collection: bool,
    pub in_wishlist: bool,
    pub is_favorite: bool,
    pub favorite_rating: Option<i32>,
    pub is_variant: bool,
    pub variant_material: Option<String>,
    pub variant_finish: Option<String>,
    pub variant_comb_type: Option<String>,
    pub variant_notes: Option<String>,
    #[serde(rename = "razors")]
    pub razor: RazorSummary,
}

impl From<CollectionRow> for CollectionEntry {
    fn from(row: CollectionRow) -> Self {
        CollectionEntry {
            id: row.id,
            razor_id: row.razor_id,
            in_collection: row.in_collection,
            in_wishlist: row.in_wishlist,
            is_favorite: row.is_favorite,
            favorite_rating: row.favorite_rating,
            is_variant: row.is_variant,
            variant_material: row.variant_material,
            variant_finish: row.variant_finish,
            variant_comb_type: row.variant_comb_type,
            variant_notes: row.variant_notes,
            razor: RazorSummary {
                id: row.razor_id,
                manufacturer: row.r_manufacturer,
                model: row.r_model,
                reference: row.r_reference,
                image_url: row.r_image_url,
                blade_type: row.r_blade_type,
                avg_gentleness: row.r_avg_gentleness,
            },
        }
    }
}

impl CollectionEntry {
    /// Case-insensitive match on manufacturer / model, plus exact manufacturer filter
    pub fn matches(&self, filter: &CollectionFilter) -> bool {
        let matches_search = match filter.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                self.razor.manufacturer.to_lowercase().contains(&term)
                    || self.razor.model.to_lowercase().contains(&term)
            }
        };
        let matches_manufacturer = match filter.manufacturer.as_deref() {
            None | Some("") => true,
            Some(m) => self.razor.manufacturer == m,
        };
        matches_search && matches_manufacturer
    }
}

/// The three flags a non-variant entry carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct CollectionFlags {
    pub in_collection: bool,
    pub in_wishlist: bool,
    pub is_favorite: bool,
}

impl CollectionFlags {
    /// A primary entry with no flag left is deleted
    pub fn is_empty(&self) -> bool {
        !self.in_collection && !self.in_wishlist && !self.is_favorite
    }
}

/// Which list a toggle request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Owned,
    Wishlist,
    Favorite,
}

#[derive(Debug, Deserialize)]
pub struct ToggleCollectionRequest {
    pub kind: CollectionKind,
}

/// Body of POST /collections/{razor_id}/variants
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddVariantRequest {
    pub material: Option<String>,
    pub finish: Option<String>,
    pub comb_type: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Direction of a favorite reorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Body of POST /collections/favorites/move; `position` is 1-based
#[derive(Debug, Deserialize)]
pub struct MoveFavoriteRequest {
    pub position: usize,
    pub direction: MoveDirection,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionFilter {
    pub q: Option<String>,
    pub manufacturer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub owned: Vec<CollectionEntry>,
    pub wishlist: Vec<CollectionEntry>,
    pub favorites: Vec<CollectionEntry>,
    /// Manufacturers present in owned + wishlist, for the filter dropdown
    pub manufacturers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleCollectionResponse {
    pub razor_id: i64,
    pub in_collection: bool,
    pub in_wishlist: bool,
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(manufacturer: &str, model: &str) -> CollectionEntry {
        CollectionEntry {
            id: 1,
            razor_id: 1,
            in_collection: true,
            in_wishlist: false,
            is_favorite: false,
            favorite_rating: None,
            is_variant: false,
            variant_material: None,
            variant_finish: None,
            variant_comb_type: None,
            variant_notes: None,
            razor: RazorSummary {
                id: 1,
                manufacturer: manufacturer.into(),
                model: model.into(),
                reference: None,
                image_url: None,
                blade_type: "DE".into(),
                avg_gentleness: None,
            },
        }
    }

    #[test]
    fn test_flags_empty_only_when_all_cleared() {
        assert!(CollectionFlags::default().is_empty());
        assert!(!CollectionFlags {
            is_favorite: true,
            ..Default::default()
        }
        .is_empty());
        assert!(!CollectionFlags {
            in_wishlist: true,
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let e = entry("Rockwell", "6S");
        let filter = CollectionFilter {
            q: Some("rock".into()),
            manufacturer: None,
        };
        assert!(e.matches(&filter));

        let filter = CollectionFilter {
            q: Some("merkur".into()),
            manufacturer: None,
        };
        assert!(!e.matches(&filter));
    }

    #[test]
    fn test_filter_manufacturer_is_exact() {
        let e = entry("Rockwell", "6S");
        let filter = CollectionFilter {
            q: None,
            manufacturer: Some("Rockwell".into()),
        };
        assert!(e.matches(&filter));

        let filter = CollectionFilter {
            q: None,
            manufacturer: Some("rockwell".into()),
        };
        assert!(!e.matches(&filter));
    }

    #[test]
    fn test_entry_serializes_razor_under_razors_key() {
        let value = serde_json::to_value(entry("Merkur", "34C")).unwrap();
        assert_eq!(value["razors"]["manufacturer"], "Merkur");
        assert!(value.get("razor").is_none());
    }
}
