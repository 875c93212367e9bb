// src/models/profile.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::user_rank::UserRank;

/// Public part of a user profile (password hash never leaves the repository)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Full name when set, otherwise the username
    pub fn display_name(&self) -> String {
        display_name(self.full_name.as_deref(), Some(&self.username))
    }
}

/// Name shown to other users, falling back to a generic label
pub fn display_name(full_name: Option<&str>, username: Option<&str>) -> String {
    [full_name, username]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("User")
        .to_string()
}

/// Activity counters used for the rank computation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct ProfileStats {
    pub razors_created: i64,
    pub comments_posted: i64,
    pub reviews_posted: i64,
    pub likes_received: i64,
    pub owned_razors: i64,
    pub wishlisted_razors: i64,
    pub favorite_razors: i64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub stats: ProfileStats,
    pub rank: UserRank,
}

/// Body of PUT /profiles/me; the whole editable part is sent every time
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(max = 500))]
    #[serde(default)]
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    /// Trimmed username, and a blank bio clears it
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.bio = self
            .bio
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        self
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(max = 120))]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(display_name(Some("Jean Dupont"), Some("jd")), "Jean Dupont");
        assert_eq!(display_name(Some("  "), Some("jd")), "jd");
        assert_eq!(display_name(None, None), "User");
    }

    #[test]
    fn test_profile_update_normalization() {
        let req = UpdateProfileRequest {
            username: "  barber_joe ".into(),
            bio: Some("   ".into()),
        }
        .normalized();
        assert_eq!(req.username, "barber_joe");
        assert_eq!(req.bio, None);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_profile_update_validation() {
        let short = UpdateProfileRequest {
            username: "jo".into(),
            bio: None,
        };
        assert!(short.validate().is_err());

        let long_bio = UpdateProfileRequest {
            username: "barber_joe".into(),
            bio: Some("x".repeat(501)),
        };
        assert!(long_bio.validate().is_err());

        let req: UpdateProfileRequest = serde_json::from_str(r#"{"username":"barber_joe"}"#).unwrap();
        assert!(req.bio.is_none());
    }
}
