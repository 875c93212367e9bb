// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth;
pub mod collection_service;
pub mod comment_service;
pub mod compare_service;
pub mod gentleness;
pub mod profile_service;
pub mod ranking;
pub mod rate_limit;
pub mod rating_service;
pub mod razor_service;
pub mod review_service;
pub mod share_service;
pub mod user_rank;

pub use auth::{authenticate, authenticate_optional, start_token_sweep, AuthService, AuthUser};
pub use collection_service::CollectionService;
pub use comment_service::CommentService;
pub use compare_service::CompareService;
pub use profile_service::ProfileService;
pub use rate_limit::{start_cleanup_task, ShareRateLimiter};
pub use rating_service::RatingService;
pub use razor_service::RazorService;
pub use review_service::ReviewService;
pub use share_service::ShareService;
