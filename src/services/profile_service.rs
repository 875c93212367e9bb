// src/services/profile_service.rs
// DOCUMENTATION: Public profiles with activity stats and rank

use crate::db::ProfileRepository;
use crate::errors::RazorError;
use crate::models::{ProfileResponse, UpdateProfileRequest};
use crate::services::user_rank;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct ProfileService;

impl ProfileService {
    pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<ProfileResponse, RazorError> {
        let profile = ProfileRepository::get_by_id(pool, id).await?;
        let stats = ProfileRepository::stats(pool, id).await?;
        Ok(ProfileResponse {
            rank: user_rank::rank_for(&stats),
            profile,
            stats,
        })
    }

    /// PUT /profiles/me
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, RazorError> {
        let req = req.normalized();
        req.validate()?;

        let profile =
            ProfileRepository::update_profile(pool, id, &req.username, req.bio.as_deref()).await?;
        log::info!("Profile {} updated (username: {})", id, profile.username);

        Self::get_profile(pool, id).await
    }
}
