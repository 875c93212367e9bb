// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod collection;
pub mod comment;
pub mod compare;
pub mod profile;
pub mod rating;
pub mod razor;
pub mod review;
pub mod share;

pub use collection::*;
pub use comment::*;
pub use compare::*;
pub use profile::*;
pub use rating::*;
pub use razor::*;
pub use review::*;
pub use share::*;
