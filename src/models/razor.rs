// src/models/razor.rs
// DOCUMENTATION: Core data structures for razors
// PURPOSE: Database rows, request DTOs and response DTOs for the catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::RatingWithAuthor;

/// Represents a complete razor record from the database
/// DOCUMENTATION: Maps directly to the razors table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Razor {
    pub id: i64,

    /// Brand name, e.g. "Merkur"
    pub manufacturer: String,

    /// Model name, e.g. "34C"
    pub model: String,

    /// Optional reference / catalog number
    pub reference: Option<String>,

    /// DE, SE, straight, shavette...
    pub blade_type: String,

    pub image_url: Option<String>,

    /// Technical measurements
    pub weight_grams: Option<f64>,
    pub gap_mm: Option<f64>,
    pub blade_exposure_mm: Option<f64>,
    pub cutting_angle: Option<f64>,

    pub price: Option<f64>,
    pub release_year: Option<i32>,

    /// Comma-separated variant options
    pub material_variant: Option<String>,
    pub available_finish: Option<String>,
    pub comb_type: Option<String>,

    pub additional_info: Option<String>,

    /// Private razors are only listed for their creator
    pub is_private: bool,

    /// Rounded community gentleness (1-20), None while unrated
    pub avg_gentleness: Option<i32>,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact razor view embedded in collection entries and share snapshots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RazorSummary {
    pub id: i64,
    pub manufacturer: String,
    pub model: String,
    pub reference: Option<String>,
    pub image_url: Option<String>,
    pub blade_type: String,
    pub avg_gentleness: Option<i32>,
}

impl Razor {
    /// Whether `user` may see this razor at all
    pub fn is_visible_to(&self, user: Option<Uuid>) -> bool {
        !self.is_private || (user.is_some() && user == self.created_by)
    }

    /// Variant options parsed from the comma-separated columns
    pub fn variant_options(&self) -> VariantOptions {
        VariantOptions {
            materials: split_options(self.material_variant.as_deref()),
            finishes: split_options(self.available_finish.as_deref()),
            comb_types: split_options(self.comb_type.as_deref()),
        }
    }
}

/// Variant choices a razor is offered in
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct VariantOptions {
    pub materials: Vec<String>,
    pub finishes: Vec<String>,
    pub comb_types: Vec<String>,
}

impl VariantOptions {
    /// A razor "has variants" when any option list offers a real choice
    pub fn has_variants(&self) -> bool {
        self.materials.len() > 1 || self.finishes.len() > 1 || self.comb_types.len() > 1
    }
}

/// Split "Brass, Zamak ,Steel" into trimmed, non-empty options
pub fn split_options(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Request DTO for creating a new razor
/// DOCUMENTATION: Used by POST /razors
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateRazorRequest {
    #[validate(length(min = 1, max = 255))]
    pub manufacturer: String,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    #[serde(default)]
    pub reference: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub blade_type: String,

    #[serde(default)]
    #[validate(url)]
    pub image_url: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub weight_grams: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub gap_mm: Option<f64>,

    #[serde(default)]
    pub blade_exposure_mm: Option<f64>,

    #[serde(default)]
    pub cutting_angle: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,

    #[serde(default)]
    #[validate(range(min = 1800, max = 2100))]
    pub release_year: Option<i32>,

    #[serde(default)]
    pub material_variant: Option<String>,

    #[serde(default)]
    pub available_finish: Option<String>,

    #[serde(default)]
    pub comb_type: Option<String>,

    #[serde(default)]
    pub additional_info: Option<String>,

    #[serde(default)]
    pub is_private: bool,
}

impl CreateRazorRequest {
    /// Blank optional strings are stored as NULL
    pub fn normalized(mut self) -> Self {
        self.manufacturer = self.manufacturer.trim().to_string();
        self.model = self.model.trim().to_string();
        self.blade_type = self.blade_type.trim().to_string();
        for field in [
            &mut self.reference,
            &mut self.image_url,
            &mut self.material_variant,
            &mut self.available_finish,
            &mut self.comb_type,
            &mut self.additional_info,
        ] {
            *field = blank_to_none(field.take());
        }
        self
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request DTO for updating an existing razor
/// DOCUMENTATION: All fields are optional - only provided fields are updated
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRazorRequest {
    #[validate(length(min = 1, max = 255))]
    pub manufacturer: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub model: Option<String>,
    pub reference: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub blade_type: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub weight_grams: Option<f64>,
    pub gap_mm: Option<f64>,
    pub blade_exposure_mm: Option<f64>,
    pub cutting_angle: Option<f64>,
    pub price: Option<f64>,
    #[validate(range(min = 1800, max = 2100))]
    pub release_year: Option<i32>,
    pub material_variant: Option<String>,
    pub available_finish: Option<String>,
    pub comb_type: Option<String>,
    pub additional_info: Option<String>,
    pub is_private: Option<bool>,
}

/// Sort orders accepted by GET /razors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RazorSort {
    #[default]
    Relevance,
    GentlenessAsc,
    GentlenessDesc,
    NameAsc,
    NameDesc,
    Newest,
    ReleaseYearAsc,
    ReleaseYearDesc,
}

impl RazorSort {
    /// ORDER BY clause, always ending with a stable tiebreaker
    pub fn order_by(self) -> &'static str {
        match self {
            RazorSort::Relevance => "manufacturer ASC, model ASC, id ASC",
            RazorSort::GentlenessAsc => "avg_gentleness ASC NULLS LAST, id ASC",
            RazorSort::GentlenessDesc => "avg_gentleness DESC NULLS LAST, id ASC",
            RazorSort::NameAsc => "manufacturer ASC, model ASC, id ASC",
            RazorSort::NameDesc => "manufacturer DESC, model DESC, id DESC",
            RazorSort::Newest => "created_at DESC, id DESC",
            RazorSort::ReleaseYearAsc => "release_year ASC NULLS LAST, id ASC",
            RazorSort::ReleaseYearDesc => "release_year DESC NULLS LAST, id ASC",
        }
    }
}

/// Search query parameters
/// DOCUMENTATION: All parameters are optional for flexible searching
#[derive(Debug, Default, Deserialize)]
pub struct RazorSearchQuery {
    /// Free text matched against manufacturer, model, reference and notes
    pub q: Option<String>,
    pub blade_type: Option<String>,
    pub manufacturer: Option<String>,
    pub min_gentleness: Option<i32>,
    pub max_gentleness: Option<i32>,
    /// Keep razors nobody has rated yet when filtering on gentleness
    #[serde(default)]
    pub include_unrated: bool,
    pub min_weight: Option<f64>,
    pub max_weight: Option<f64>,
    pub min_gap: Option<f64>,
    pub max_gap: Option<f64>,
    pub min_blade_exposure: Option<f64>,
    pub max_blade_exposure: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_release_year: Option<i32>,
    pub max_release_year: Option<i32>,
    #[serde(default)]
    pub sort: RazorSort,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Results per page (max 100)
    pub limit: Option<i64>,
}

/// Highest page whose offset still fits in an i64 at the largest page size
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

const MAX_PAGE_SIZE: i64 = 100;

impl RazorSearchQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Paginated list response
#[derive(Debug, Serialize)]
pub struct RazorListResponse {
    pub data: Vec<Razor>,
    pub total_count: i64,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

/// Detailed response for GET /razors/{id}
#[derive(Debug, Serialize)]
pub struct RazorDetailResponse {
    #[serde(flatten)]
    pub razor: Razor,
    pub gentleness_label: &'static str,
    pub gentleness_color: &'static str,
    pub variants: VariantOptions,
    pub has_variants: bool,
    pub ratings: Vec<RatingWithAuthor>,
    pub review_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn razor() -> Razor {
        Razor {
            id: 1,
            manufacturer: "Merkur".into(),
            model: "34C".into(),
            reference: None,
            blade_type: "DE".into(),
            image_url: None,
            weight_grams: Some(82.0),
            gap_mm: None,
            blade_exposure_mm: None,
            cutting_angle: None,
            price: None,
            release_year: None,
            material_variant: Some("Brass, Zamak".into()),
            available_finish: Some("Chrome".into()),
            comb_type: None,
            additional_info: None,
            is_private: false,
            avg_gentleness: Some(6),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_split_options_trims_and_drops_blanks() {
        assert_eq!(
            split_options(Some(" Brass, ,Zamak ,")),
            vec!["Brass".to_string(), "Zamak".to_string()]
        );
        assert!(split_options(None).is_empty());
    }

    #[test]
    fn test_has_variants_needs_a_real_choice() {
        let mut r = razor();
        assert!(r.variant_options().has_variants());

        r.material_variant = Some("Brass".into());
        assert!(!r.variant_options().has_variants());
    }

    #[test]
    fn test_private_razor_visible_only_to_creator() {
        let owner = Uuid::new_v4();
        let mut r = razor();
        r.is_private = true;
        r.created_by = Some(owner);

        assert!(r.is_visible_to(Some(owner)));
        assert!(!r.is_visible_to(Some(Uuid::new_v4())));
        assert!(!r.is_visible_to(None));
    }

    #[test]
    fn test_search_query_paging_is_clamped() {
        let query = RazorSearchQuery {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.limit(), 100);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_huge_page_does_not_overflow_offset() {
        let query = actix_web::web::Query::<RazorSearchQuery>::from_query(
            "page=9223372036854775807&limit=100",
        )
        .unwrap()
        .into_inner();

        assert_eq!(query.page(), MAX_PAGE);
        assert!(query.offset() >= 0);
        assert!(query.page().checked_mul(query.limit()).is_some());
    }

    #[test]
    fn test_normalized_blanks_become_none() {
        let req = CreateRazorRequest {
            manufacturer: " Gillette ".into(),
            model: "Tech".into(),
            reference: Some("   ".into()),
            blade_type: "DE".into(),
            image_url: None,
            weight_grams: None,
            gap_mm: None,
            blade_exposure_mm: None,
            cutting_angle: None,
            price: None,
            release_year: Some(1950),
            material_variant: Some("".into()),
            available_finish: None,
            comb_type: None,
            additional_info: Some(" vintage ".into()),
            is_private: false,
        }
        .normalized();

        assert_eq!(req.manufacturer, "Gillette");
        assert_eq!(req.reference, None);
        assert_eq!(req.material_variant, None);
        assert_eq!(req.additional_info.as_deref(), Some("vintage"));
    }
}
