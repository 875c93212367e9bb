// src/services/collection_service.rs
// DOCUMENTATION: Business logic for personal collections
// PURPOSE: Owned / wishlist / favorite toggles, variants and favorite reordering

use crate::db::{CollectionRepository, RazorRepository};
use crate::errors::RazorError;
use crate::models::{
    AddVariantRequest, CollectionEntry, CollectionFilter, CollectionFlags, CollectionKind,
    CollectionType, CollectionsResponse, MoveFavoriteRequest, ToggleCollectionResponse,
    VariantOptions,
};
use crate::services::auth::AuthUser;
use crate::services::ranking;
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Flags after toggling `kind`. Owned and wishlist exclude each other.
pub fn toggled(flags: CollectionFlags, kind: CollectionKind) -> CollectionFlags {
    let mut next = flags;
    match kind {
        CollectionKind::Owned => {
            next.in_collection = !flags.in_collection;
            if next.in_collection {
                next.in_wishlist = false;
            }
        }
        CollectionKind::Wishlist => {
            next.in_wishlist = !flags.in_wishlist;
            if next.in_wishlist {
                next.in_collection = false;
            }
        }
        CollectionKind::Favorite => next.is_favorite = !flags.is_favorite,
    }
    next
}

/// Every provided variant value must be one the razor is offered in
pub fn validate_variant(options: &VariantOptions, req: &AddVariantRequest) -> Result<(), RazorError> {
    let checks = [
        ("material", req.material.as_deref(), &options.materials),
        ("finish", req.finish.as_deref(), &options.finishes),
        ("comb_type", req.comb_type.as_deref(), &options.comb_types),
    ];

    for (field, value, allowed) in checks {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !allowed.iter().any(|a| a == value) {
                return Err(RazorError::InvalidInput(format!(
                    "{} '{}' is not offered for this razor",
                    field, value
                )));
            }
        }
    }
    Ok(())
}

/// Sorted, distinct manufacturers across the given entries
pub fn manufacturers_of<'a>(entries: impl IntoIterator<Item = &'a CollectionEntry>) -> Vec<String> {
    entries
        .into_iter()
        .map(|e| e.razor.manufacturer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub struct CollectionService;

impl CollectionService {
    /// GET /collections
    pub async fn get_collections(
        pool: &PgPool,
        user_id: Uuid,
        filter: &CollectionFilter,
    ) -> Result<CollectionsResponse, RazorError> {
        let owned = Self::load(pool, user_id, CollectionType::Owned).await?;
        let wishlist = Self::load(pool, user_id, CollectionType::Wishlist).await?;
        let favorites = Self::load(pool, user_id, CollectionType::Favorites).await?;

        let manufacturers = manufacturers_of(owned.iter().chain(wishlist.iter()));

        Ok(CollectionsResponse {
            owned: owned.into_iter().filter(|e| e.matches(filter)).collect(),
            wishlist: wishlist.into_iter().filter(|e| e.matches(filter)).collect(),
            favorites,
            manufacturers,
        })
    }

    pub async fn get_favorites(pool: &PgPool, user_id: Uuid) -> Result<Vec<CollectionEntry>, RazorError> {
        Self::load(pool, user_id, CollectionType::Favorites).await
    }

    async fn load(
        pool: &PgPool,
        user_id: Uuid,
        list: CollectionType,
    ) -> Result<Vec<CollectionEntry>, RazorError> {
        Ok(CollectionRepository::list_entries(pool, user_id, list, None)
            .await?
            .into_iter()
            .map(CollectionEntry::from)
            .collect())
    }

    /// POST /collections/{razor_id}/toggle
    pub async fn toggle(
        pool: &PgPool,
        user: AuthUser,
        razor_id: i64,
        kind: CollectionKind,
    ) -> Result<ToggleCollectionResponse, RazorError> {
        let razor = RazorRepository::get_by_id(pool, razor_id).await?;
        if !razor.is_visible_to(Some(user.id)) {
            return Err(RazorError::NotFound(format!("Razor {}", razor_id)));
        }

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RazorError::db("Begin toggle transaction failed", e))?;

        CollectionRepository::ensure_primary_entry(&mut *tx, user.id, razor_id).await?;
        let (entry_id, current) = CollectionRepository::lock_primary_entry(&mut *tx, user.id, razor_id)
            .await?
            .ok_or_else(|| {
                RazorError::InternalError(format!("Collection entry for razor {} vanished", razor_id))
            })?;

        let flags = toggled(current, kind);
        CollectionRepository::update_flags(&mut *tx, user.id, entry_id, flags).await?;

        tx.commit()
            .await
            .map_err(|e| RazorError::db("Commit toggle failed", e))?;

        log::info!(
            "User {} toggled {:?} on razor {} -> {:?}",
            user.id,
            kind,
            razor_id,
            flags
        );

        Ok(ToggleCollectionResponse {
            razor_id,
            in_collection: flags.in_collection,
            in_wishlist: flags.in_wishlist,
            is_favorite: flags.is_favorite,
        })
    }

    /// POST /collections/{razor_id}/variants
    pub async fn add_variant(
        pool: &PgPool,
        user: AuthUser,
        razor_id: i64,
        req: AddVariantRequest,
    ) -> Result<i64, RazorError> {
        let razor = RazorRepository::get_by_id(pool, razor_id).await?;
        if !razor.is_visible_to(Some(user.id)) {
            return Err(RazorError::NotFound(format!("Razor {}", razor_id)));
        }
        validate_variant(&razor.variant_options(), &req)?;

        let entry_id = CollectionRepository::insert_variant(pool, user.id, razor_id, &req).await?;
        log::info!("User {} added variant {} of razor {}", user.id, entry_id, razor_id);
        Ok(entry_id)
    }

    /// DELETE /collections/entries/{entry_id}
    pub async fn remove_entry(pool: &PgPool, user: AuthUser, entry_id: i64) -> Result<(), RazorError> {
        if CollectionRepository::delete_entry(pool, user.id, entry_id).await? == 0 {
            return Err(RazorError::NotFound(format!("Collection entry {}", entry_id)));
        }
        Ok(())
    }

    /// DELETE /collections/{razor_id}/favorite
    pub async fn remove_favorite(pool: &PgPool, user: AuthUser, razor_id: i64) -> Result<(), RazorError> {
        if CollectionRepository::clear_favorite(pool, user.id, razor_id).await? == 0 {
            return Err(RazorError::NotFound(format!("Favorite razor {}", razor_id)));
        }
        Ok(())
    }

    /// POST /collections/favorites/move
    /// DOCUMENTATION: Lock, repair, swap and write in one transaction, then reload
    pub async fn move_favorite(
        pool: &PgPool,
        user: AuthUser,
        req: MoveFavoriteRequest,
    ) -> Result<Vec<CollectionEntry>, RazorError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RazorError::db("Begin reorder transaction failed", e))?;

        let favorites = CollectionRepository::lock_favorites(&mut *tx, user.id).await?;
        let plan = ranking::plan_move(&favorites, req.position, req.direction)?;

        for update in &plan.updates {
            CollectionRepository::set_favorite_rating(&mut *tx, update.entry_id, update.rating)
                .await?;
        }

        tx.commit()
            .await
            .map_err(|e| RazorError::db("Commit reorder failed", e))?;

        log::info!(
            "User {} moved favorite #{} {:?} (moved: {}, rows written: {})",
            user.id,
            req.position,
            req.direction,
            plan.moved,
            plan.updates.len()
        );

        Self::get_favorites(pool, user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RazorSummary;

    fn flags(in_collection: bool, in_wishlist: bool, is_favorite: bool) -> CollectionFlags {
        CollectionFlags {
            in_collection,
            in_wishlist,
            is_favorite,
        }
    }

    #[test]
    fn test_owned_clears_wishlist() {
        let next = toggled(flags(false, true, false), CollectionKind::Owned);
        assert_eq!(next, flags(true, false, false));
    }

    #[test]
    fn test_wishlist_clears_owned() {
        let next = toggled(flags(true, false, true), CollectionKind::Wishlist);
        assert_eq!(next, flags(false, true, true));
    }

    #[test]
    fn test_first_toggle_never_leaves_an_empty_entry() {
        for kind in [CollectionKind::Owned, CollectionKind::Wishlist, CollectionKind::Favorite] {
            assert!(!toggled(CollectionFlags::default(), kind).is_empty());
        }
    }

    #[test]
    fn test_untoggling_leaves_other_flags() {
        let next = toggled(flags(true, false, true), CollectionKind::Owned);
        assert_eq!(next, flags(false, false, true));
    }

    #[test]
    fn test_favorite_toggle_is_independent() {
        let start = flags(false, true, false);
        let on = toggled(start, CollectionKind::Favorite);
        assert_eq!(on, flags(false, true, true));
        assert_eq!(toggled(on, CollectionKind::Favorite), start);
    }

    #[test]
    fn test_new_entry_from_default() {
        let next = toggled(CollectionFlags::default(), CollectionKind::Favorite);
        assert_eq!(next, flags(false, false, true));
    }

    fn options() -> VariantOptions {
        VariantOptions {
            materials: vec!["Brass".into(), "Stainless".into()],
            finishes: vec!["Chrome".into()],
            comb_types: vec![],
        }
    }

    #[test]
    fn test_variant_values_must_be_offered() {
        let ok = AddVariantRequest {
            material: Some("Stainless".into()),
            finish: Some(" Chrome ".into()),
            ..Default::default()
        };
        assert!(validate_variant(&options(), &ok).is_ok());

        let bad = AddVariantRequest {
            material: Some("Titanium".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_variant(&options(), &bad),
            Err(RazorError::InvalidInput(_))
        ));

        let no_combs = AddVariantRequest {
            comb_type: Some("Open comb".into()),
            ..Default::default()
        };
        assert!(validate_variant(&options(), &no_combs).is_err());
    }

    #[test]
    fn test_blank_variant_values_are_ignored() {
        let req = AddVariantRequest {
            material: Some("  ".into()),
            notes: Some("gift from dad".into()),
            ..Default::default()
        };
        assert!(validate_variant(&options(), &req).is_ok());
    }

    #[test]
    fn test_manufacturers_are_distinct_and_sorted() {
        let entry = |m: &str| CollectionEntry {
            id: 1,
            razor_id: 1,
            in_collection: true,
            in_wishlist: false,
            is_favorite: false,
            favorite_rating: None,
            is_variant: false,
            variant_material: None,
            variant_finish: None,
            variant_comb_type: None,
            variant_notes: None,
            razor: RazorSummary {
                id: 1,
                manufacturer: m.into(),
                model: "x".into(),
                reference: None,
                image_url: None,
                blade_type: "DE".into(),
                avg_gentleness: None,
            },
        };
        let entries = vec![entry("Rockwell"), entry("Merkur"), entry("Rockwell")];
        assert_eq!(manufacturers_of(&entries), vec!["Merkur", "Rockwell"]);
    }
}
