//! Link and unlink once both endpoints have passed their ownership checks.

use crate::error::{DomainError, RepoError};
use crate::ports::{LinkKind, LinkRepository};

fn describe(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::MoodCategory => "Category is already assigned to this mood",
        LinkKind::MoodTag => "Tag is already assigned to this mood",
        LinkKind::FoodCategory => "Category is already assigned to this food",
    }
}

fn describe_missing(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::MoodCategory => "Category is not assigned to this mood",
        LinkKind::MoodTag => "Tag is not assigned to this mood",
        LinkKind::FoodCategory => "Category is not assigned to this food",
    }
}

/// Link two records. An existing link is a conflict, never a no-op.
pub(crate) async fn attach(
    links: &dyn LinkRepository,
    kind: LinkKind,
    left: i64,
    right: i64,
) -> Result<(), DomainError> {
    if links.is_linked(kind, left, right).await? {
        return Err(DomainError::Conflict(describe(kind).to_string()));
    }

    links
        .link(kind, left, right)
        .await
        .map_err(|e| super::unique(e, describe(kind)))
}

/// Remove a link. Neither endpoint is deleted.
pub(crate) async fn detach(
    links: &dyn LinkRepository,
    kind: LinkKind,
    left: i64,
    right: i64,
) -> Result<(), DomainError> {
    match links.unlink(kind, left, right).await {
        Ok(()) => Ok(()),
        Err(RepoError::NotFound) => Err(DomainError::NotFound(describe_missing(kind).to_string())),
        Err(e) => Err(e.into()),
    }
}
