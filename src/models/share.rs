// src/models/share.rs
// DOCUMENTATION: Collection share links
// PURPOSE: Wire format of /api/collections/share and /api/collections/shared/{token}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::CollectionEntry;

/// Which subset of a collection is shared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Favorites,
    Owned,
    Wishlist,
}

impl CollectionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "favorites" => Some(CollectionType::Favorites),
            "owned" => Some(CollectionType::Owned),
            "wishlist" => Some(CollectionType::Wishlist),
            _ => None,
        }
    }
}

/// Body of POST /api/collections/share.
/// `collectionType` stays a raw string so an unknown value gets our own 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub collection_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShareCreator {
    pub username: String,
    pub rank: String,
}

/// Frozen copy of a collection, stored as JSONB
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    #[serde(rename = "type")]
    pub collection_type: CollectionType,
    pub razors: Vec<CollectionEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_count: Option<i64>,
    pub creator: ShareCreator,
}

/// Stored share row
#[derive(Debug, Clone, FromRow)]
pub struct CollectionShare {
    pub id: i64,
    pub user_id: Uuid,
    pub share_token: String,
    pub collection_data: Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLink {
    pub share_token: String,
    pub share_url: String,
    pub bb_code: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct ShareCreatedResponse {
    pub success: bool,
    pub data: ShareLink,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedCollectionResponse {
    pub success: bool,
    pub data: Value,
    pub shared_at: String,
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_request_uses_camel_case() {
        let req: ShareRequest =
            serde_json::from_str(r#"{"collectionType":"owned","limit":5}"#).unwrap();
        assert_eq!(req.collection_type.as_deref(), Some("owned"));
        assert_eq!(req.limit, Some(5));

        let empty: ShareRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.collection_type.is_none());
    }

    #[test]
    fn test_collection_type_parse() {
        assert_eq!(
            CollectionType::parse("favorites"),
            Some(CollectionType::Favorites)
        );
        assert_eq!(CollectionType::parse("Favorites"), None);
        assert_eq!(CollectionType::parse("all"), None);
    }

    #[test]
    fn test_snapshot_wire_names() {
        let snapshot = CollectionSnapshot {
            collection_type: CollectionType::Favorites,
            razors: vec![],
            top_count: Some(3),
            creator: ShareCreator {
                username: "jd".into(),
                rank: "Shaving Novice".into(),
            },
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["type"], "favorites");
        assert_eq!(value["topCount"], 3);
        assert_eq!(value["creator"]["username"], "jd");

        let owned = CollectionSnapshot {
            collection_type: CollectionType::Owned,
            top_count: None,
            ..snapshot
        };
        let value = serde_json::to_value(&owned).unwrap();
        assert!(value.get("topCount").is_none());
    }
}
