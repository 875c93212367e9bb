// src/services/share_service.rs
// DOCUMENTATION: Collection share links
// PURPOSE: Freeze a collection list into a snapshot and hand out an expiring token
//
// A share is immutable once stored: later changes to the collection are
// not reflected, and nothing revokes a link before it expires.

use crate::config::Config;
use crate::db::{CollectionRepository, ProfileRepository, ShareRepository};
use crate::errors::RazorError;
use crate::models::{
    CollectionEntry, CollectionShare, CollectionSnapshot, CollectionType, ShareCreator,
    ShareLink, ShareRequest, SharedCollectionResponse,
};
use crate::services::rate_limit::ShareRateLimiter;
use crate::services::user_rank;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

pub const SHARE_TOKEN_LEN: usize = 12;

const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Attempts before giving up on token collisions
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Random URL-safe token
pub fn generate_share_token() -> String {
    let mut rng = rand::thread_rng();
    (0..SHARE_TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

pub fn share_url(site_url: &str, token: &str) -> String {
    format!(
        "{}/collections/shared/{}",
        site_url.trim_end_matches('/'),
        token
    )
}

/// Title used in the BBCode link
pub fn collection_title(collection_type: CollectionType, top_count: Option<i64>) -> String {
    match (collection_type, top_count) {
        (CollectionType::Favorites, Some(n)) if n > 0 => {
            format!("Top {} of my favorite razors", n)
        }
        (CollectionType::Favorites, _) => "My favorite razors".to_string(),
        (CollectionType::Owned, _) => "My razor collection".to_string(),
        (CollectionType::Wishlist, _) => "My razor wishlist".to_string(),
    }
}

pub fn bb_code(url: &str, title: &str) -> String {
    format!("[url={}]{} on Relife Razor[/url]", url, title)
}

pub fn expires_at(now: DateTime<Utc>, ttl_days: i64) -> DateTime<Utc> {
    now + Duration::days(ttl_days)
}

/// A share stays readable up to and including its expiry instant
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}

/// ISO-8601 with milliseconds, e.g. 2025-01-31T10:00:00.000Z
pub fn iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse the request body into (type, favorites limit)
/// DOCUMENTATION: Defaults to favorites with no limit; a negative limit means none
pub fn parse_request(req: &ShareRequest) -> Result<(CollectionType, Option<i64>), RazorError> {
    let collection_type = match req.collection_type.as_deref() {
        None => CollectionType::Favorites,
        Some(raw) => CollectionType::parse(raw).ok_or_else(|| {
            RazorError::InvalidInput(format!(
                "collectionType must be one of favorites, owned, wishlist (got '{}')",
                raw
            ))
        })?,
    };

    let limit = req.limit.filter(|&n| n > 0);
    Ok((collection_type, limit))
}

/// Build the snapshot stored with the share
pub fn build_snapshot(
    collection_type: CollectionType,
    limit: Option<i64>,
    razors: Vec<CollectionEntry>,
    creator: ShareCreator,
) -> CollectionSnapshot {
    let top_count = match collection_type {
        CollectionType::Favorites => Some(limit.unwrap_or(0)),
        CollectionType::Owned | CollectionType::Wishlist => None,
    };

    CollectionSnapshot {
        collection_type,
        razors,
        top_count,
        creator,
    }
}

pub struct ShareService;

impl ShareService {
    /// POST /api/collections/share
    pub async fn create_share(
        pool: &PgPool,
        config: &Config,
        limiter: &ShareRateLimiter,
        user_id: Uuid,
        req: ShareRequest,
    ) -> Result<ShareLink, RazorError> {
        let (collection_type, limit) = parse_request(&req)?;
        limiter.check(user_id)?;

        // Only favorites are truncated
        let row_limit = match collection_type {
            CollectionType::Favorites => limit,
            _ => None,
        };
        let razors: Vec<CollectionEntry> =
            CollectionRepository::list_entries(pool, user_id, collection_type, row_limit)
                .await?
                .into_iter()
                .map(CollectionEntry::from)
                .collect();

        let profile = ProfileRepository::get_by_id(pool, user_id).await?;
        let stats = ProfileRepository::stats(pool, user_id).await?;
        let creator = ShareCreator {
            username: profile.display_name(),
            rank: user_rank::rank_for(&stats).title,
        };

        let snapshot = build_snapshot(collection_type, row_limit, razors, creator);
        let data = serde_json::to_value(&snapshot)
            .map_err(|e| RazorError::InternalError(format!("snapshot encoding failed: {}", e)))?;
        let expiry = expires_at(Utc::now(), config.share_ttl_days);

        let share = Self::store_with_fresh_token(pool, user_id, &data, expiry).await?;

        let url = share_url(&config.site_url, &share.share_token);
        let title = collection_title(collection_type, snapshot.top_count);
        log::info!(
            "User {} shared {} {:?} razors as {}",
            user_id,
            snapshot.razors.len(),
            collection_type,
            share.share_token
        );

        Ok(ShareLink {
            bb_code: bb_code(&url, &title),
            share_url: url,
            share_token: share.share_token,
            expires_at: iso(share.expires_at),
        })
    }

    async fn store_with_fresh_token(
        pool: &PgPool,
        user_id: Uuid,
        data: &serde_json::Value,
        expiry: DateTime<Utc>,
    ) -> Result<CollectionShare, RazorError> {
        let mut last_error = None;
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = generate_share_token();
            match ShareRepository::insert_share(pool, user_id, &token, data, expiry).await {
                Err(RazorError::Conflict(msg)) => {
                    log::warn!("{}; retrying", msg);
                    last_error = Some(msg);
                }
                other => return other,
            }
        }
        Err(RazorError::InternalError(
            last_error.unwrap_or_else(|| "could not allocate a share token".to_string()),
        ))
    }

    /// GET /api/collections/shared/{token}
    pub async fn get_shared(
        pool: &PgPool,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SharedCollectionResponse, RazorError> {
        let share = ShareRepository::find_by_token(pool, token)
            .await?
            .ok_or_else(|| RazorError::NotFound("Shared collection".to_string()))?;

        if is_expired(share.expires_at, now) {
            log::debug!("Share {} expired at {}", token, share.expires_at);
            return Err(RazorError::Gone("This share link has expired".to_string()));
        }

        Ok(SharedCollectionResponse {
            success: true,
            data: share.collection_data,
            shared_at: iso(share.created_at),
            expires_at: iso(share.expires_at),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn creator() -> ShareCreator {
        ShareCreator {
            username: "Jane".into(),
            rank: "Shaving Novice".into(),
        }
    }

    #[test]
    fn test_token_shape() {
        for _ in 0..50 {
            let token = generate_share_token();
            assert_eq!(token.len(), SHARE_TOKEN_LEN);
            assert!(token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
        assert_ne!(generate_share_token(), generate_share_token());
    }

    #[test]
    fn test_share_url_trims_trailing_slash() {
        assert_eq!(
            share_url("https://razors.example/", "abc"),
            "https://razors.example/collections/shared/abc"
        );
        assert_eq!(
            share_url("https://razors.example", "abc"),
            "https://razors.example/collections/shared/abc"
        );
    }

    #[test]
    fn test_titles_and_bb_code() {
        assert_eq!(
            collection_title(CollectionType::Favorites, Some(5)),
            "Top 5 of my favorite razors"
        );
        assert_eq!(
            collection_title(CollectionType::Favorites, Some(0)),
            "My favorite razors"
        );
        assert_eq!(
            collection_title(CollectionType::Owned, None),
            "My razor collection"
        );
        assert_eq!(
            collection_title(CollectionType::Wishlist, None),
            "My razor wishlist"
        );
        assert_eq!(
            bb_code("https://x/s/1", "My razor wishlist"),
            "[url=https://x/s/1]My razor wishlist on Relife Razor[/url]"
        );
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let expiry = expires_at(now, 30);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 1, 31, 12, 0, 0).unwrap());

        assert!(!is_expired(expiry, expiry));
        assert!(!is_expired(expiry, expiry - Duration::seconds(1)));
        assert!(is_expired(expiry, expiry + Duration::milliseconds(1)));
    }

    #[test]
    fn test_iso_format() {
        let dt = Utc.with_ymd_and_hms(2025, 1, 31, 10, 0, 0).unwrap();
        assert_eq!(iso(dt), "2025-01-31T10:00:00.000Z");
    }

    #[test]
    fn test_parse_request_defaults_and_errors() {
        let (kind, limit) = parse_request(&ShareRequest::default()).unwrap();
        assert_eq!(kind, CollectionType::Favorites);
        assert_eq!(limit, None);

        let req = ShareRequest {
            collection_type: Some("wishlist".into()),
            limit: Some(-3),
        };
        assert_eq!(parse_request(&req).unwrap(), (CollectionType::Wishlist, None));

        let req = ShareRequest {
            collection_type: Some("everything".into()),
            limit: None,
        };
        assert!(matches!(
            parse_request(&req),
            Err(RazorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_snapshot_top_count() {
        let favorites = build_snapshot(CollectionType::Favorites, Some(3), vec![], creator());
        assert_eq!(favorites.top_count, Some(3));

        let all_favorites = build_snapshot(CollectionType::Favorites, None, vec![], creator());
        assert_eq!(all_favorites.top_count, Some(0));

        let owned = build_snapshot(CollectionType::Owned, Some(3), vec![], creator());
        assert_eq!(owned.top_count, None);
    }
}
