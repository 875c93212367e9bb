// src/services/comment_service.rs
// DOCUMENTATION: Threaded comments on reviews
// PURPOSE: Turn the flat comment list into a reply tree, and guard writes

use crate::db::{CommentRepository, ReviewRepository};
use crate::errors::RazorError;
use crate::models::{Comment, CommentNode, CreateCommentRequest};
use crate::services::auth::AuthUser;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

/// Nest comments under their parents.
///
/// Input order is kept among siblings, so pass comments sorted by creation
/// time. A comment whose parent is not in the list becomes a root.
pub fn build_tree(comments: Vec<Comment>) -> Vec<CommentNode> {
    let ids: HashSet<i64> = comments.iter().map(|c| c.id).collect();

    let mut children: HashMap<i64, Vec<Comment>> = HashMap::new();
    let mut roots = Vec::new();
    for comment in comments {
        match comment.parent_comment_id {
            Some(parent) if parent != comment.id && ids.contains(&parent) => {
                children.entry(parent).or_default().push(comment)
            }
            _ => roots.push(comment),
        }
    }

    roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect()
}

fn attach(comment: Comment, children: &mut HashMap<i64, Vec<Comment>>) -> CommentNode {
    let replies = children
        .remove(&comment.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, children))
        .collect();

    CommentNode { comment, replies }
}

pub struct CommentService;

impl CommentService {
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: i64,
    ) -> Result<Vec<CommentNode>, RazorError> {
        ReviewRepository::get_by_id(pool, review_id).await?;
        let comments = CommentRepository::get_comments_by_review(pool, review_id).await?;
        Ok(build_tree(comments))
    }

    pub async fn create_comment(
        pool: &PgPool,
        user: AuthUser,
        review_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment, RazorError> {
        ReviewRepository::get_by_id(pool, review_id).await?;

        if let Some(parent_id) = req.parent_comment_id {
            match CommentRepository::get_owner(pool, parent_id).await? {
                Some((parent_review, _)) if parent_review == review_id => {}
                Some(_) => {
                    return Err(RazorError::InvalidInput(format!(
                        "Comment {} belongs to another review",
                        parent_id
                    )))
                }
                None => return Err(RazorError::NotFound(format!("Comment {}", parent_id))),
            }
        }

        let content = req.content.trim();
        if content.is_empty() {
            return Err(RazorError::InvalidInput("Comment cannot be empty".to_string()));
        }

        let comment = CommentRepository::create_comment(
            pool,
            review_id,
            user.id,
            content,
            req.parent_comment_id,
        )
        .await?;
        log::info!("User {} commented on review {}", user.id, review_id);
        Ok(comment)
    }

    /// Author or admin only; replies go with it
    pub async fn delete_comment(pool: &PgPool, user: AuthUser, id: i64) -> Result<(), RazorError> {
        let (_, author) = CommentRepository::get_owner(pool, id)
            .await?
            .ok_or_else(|| RazorError::NotFound(format!("Comment {}", id)))?;

        if !user.can_manage(Some(author)) {
            return Err(RazorError::Forbidden);
        }

        CommentRepository::delete_comment(pool, id).await?;
        log::info!("Comment {} deleted by {}", id, user.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn comment(id: i64, parent: Option<i64>, minute: i64) -> Comment {
        Comment {
            id,
            review_id: 1,
            user_id: Uuid::nil(),
            parent_comment_id: parent,
            content: format!("comment {}", id),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minute),
            username: "user".into(),
            full_name: None,
            avatar_url: None,
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<i64> {
        nodes.iter().map(|n| n.comment.id).collect()
    }

    #[test]
    fn test_replies_nest_under_parents() {
        let tree = build_tree(vec![
            comment(1, None, 0),
            comment(2, Some(1), 1),
            comment(3, None, 2),
            comment(4, Some(2), 3),
            comment(5, Some(1), 4),
        ]);

        assert_eq!(ids(&tree), vec![1, 3]);
        assert_eq!(ids(&tree[0].replies), vec![2, 5]);
        assert_eq!(ids(&tree[0].replies[0].replies), vec![4]);
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn test_orphan_is_promoted_to_root() {
        let tree = build_tree(vec![
            comment(1, None, 0),
            comment(7, Some(99), 1),
            comment(8, Some(7), 2),
        ]);

        assert_eq!(ids(&tree), vec![1, 7]);
        assert_eq!(ids(&tree[1].replies), vec![8]);
    }

    #[test]
    fn test_self_parent_does_not_vanish() {
        let tree = build_tree(vec![comment(3, Some(3), 0)]);
        assert_eq!(ids(&tree), vec![3]);
    }

    #[test]
    fn test_empty() {
        assert!(build_tree(vec![]).is_empty());
    }

    #[test]
    fn test_tree_serializes_flat_fields_with_replies() {
        let tree = build_tree(vec![comment(1, None, 0), comment(2, Some(1), 1)]);
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["replies"][0]["content"], "comment 2");
    }
}
