// src/models/compare.rs

use serde::{Deserialize, Serialize};

use super::Razor;

/// Query string of GET /compare, e.g. `?ids=3,7,12`
#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    pub ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ComparedRazor {
    #[serde(flatten)]
    pub razor: Razor,
    pub gentleness_label: &'static str,
    pub gentleness_color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub razors: Vec<ComparedRazor>,
    /// Requested ids that do not exist or are not visible
    pub missing: Vec<i64>,
}
