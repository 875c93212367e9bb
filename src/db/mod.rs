// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod collection_repository;
pub mod comment_repository;
pub mod profile_repository;
pub mod rating_repository;
pub mod razor_repository;
pub mod review_repository;
pub mod share_repository;

pub use collection_repository::*;
pub use comment_repository::*;
pub use profile_repository::*;
pub use rating_repository::*;
pub use razor_repository::*;
pub use review_repository::*;
pub use share_repository::*;
