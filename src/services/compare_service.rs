// src/services/compare_service.rs
// DOCUMENTATION: Side-by-side razor comparison

use crate::db::RazorRepository;
use crate::errors::RazorError;
use crate::models::{CompareResponse, ComparedRazor, Razor};
use crate::services::gentleness;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub const MAX_COMPARED: usize = 4;

/// Parse "3,1,3, 7" into [3, 1, 7]: order kept, duplicates dropped
pub fn parse_ids(raw: &str) -> Result<Vec<i64>, RazorError> {
    let mut ids: Vec<i64> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<i64>()
            .map_err(|_| RazorError::InvalidInput(format!("'{}' is not a razor id", part)))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(RazorError::InvalidInput(
            "ids must list at least one razor".to_string(),
        ));
    }
    if ids.len() > MAX_COMPARED {
        return Err(RazorError::InvalidInput(format!(
            "At most {} razors can be compared",
            MAX_COMPARED
        )));
    }
    Ok(ids)
}

/// Arrange fetched razors in request order; ids with no visible razor go to `missing`
pub fn arrange(ids: &[i64], razors: Vec<Razor>, viewer: Option<Uuid>) -> CompareResponse {
    let mut by_id: HashMap<i64, Razor> = razors
        .into_iter()
        .filter(|r| r.is_visible_to(viewer))
        .map(|r| (r.id, r))
        .collect();

    let mut compared = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in ids {
        match by_id.remove(id) {
            Some(razor) => compared.push(ComparedRazor {
                gentleness_label: gentleness::label(razor.avg_gentleness),
                gentleness_color: gentleness::color(razor.avg_gentleness),
                razor,
            }),
            None => missing.push(*id),
        }
    }

    CompareResponse {
        razors: compared,
        missing,
    }
}

pub struct CompareService;

impl CompareService {
    pub async fn compare(
        pool: &PgPool,
        raw_ids: &str,
        viewer: Option<Uuid>,
    ) -> Result<CompareResponse, RazorError> {
        let ids = parse_ids(raw_ids)?;
        let razors = RazorRepository::get_many(pool, &ids).await?;
        Ok(arrange(&ids, razors, viewer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn razor(id: i64, avg: Option<i32>, private: bool) -> Razor {
        Razor {
            id,
            manufacturer: "Merkur".into(),
            model: format!("M{}", id),
            reference: None,
            blade_type: "DE".into(),
            image_url: None,
            weight_grams: None,
            gap_mm: None,
            blade_exposure_mm: None,
            cutting_angle: None,
            price: None,
            release_year: None,
            material_variant: None,
            available_finish: None,
            comb_type: None,
            additional_info: None,
            is_private: private,
            avg_gentleness: avg,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_ids_dedups_in_order() {
        assert_eq!(parse_ids("3, 1,3,,7").unwrap(), vec![3, 1, 7]);
    }

    #[test]
    fn test_parse_ids_rejects_bad_input() {
        assert!(parse_ids("").is_err());
        assert!(parse_ids(" , ").is_err());
        assert!(parse_ids("1,abc").is_err());
        assert!(parse_ids("1,2,3,4,5").is_err());
        // duplicates do not count against the cap
        assert_eq!(parse_ids("1,2,3,4,4").unwrap().len(), 4);
    }

    #[test]
    fn test_arrange_keeps_request_order_and_skips_unknown() {
        let response = arrange(
            &[9, 2, 5],
            vec![razor(2, Some(10), false), razor(9, None, false)],
            None,
        );
        let ids: Vec<i64> = response.razors.iter().map(|r| r.razor.id).collect();
        assert_eq!(ids, vec![9, 2]);
        assert_eq!(response.missing, vec![5]);
        assert_eq!(response.razors[0].gentleness_label, "Not rated");
        assert_eq!(response.razors[1].gentleness_label, "Moderate");
    }

    #[test]
    fn test_arrange_hides_private_razors() {
        let response = arrange(&[1], vec![razor(1, None, true)], None);
        assert!(response.razors.is_empty());
        assert_eq!(response.missing, vec![1]);
    }
}
