// This is the infra layer - it implements the traits defined in core.
// This file provides an IN-MEMORY implementation of ReviewStore.
//
// Applications live entirely in process memory; durable storage is the
// embedding application's concern and would be another implementation of
// the same trait.

use crate::core::review::{ApplicationKind, ContentApplication, ReviewError, ReviewStatus, ReviewStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// In-memory implementation of ReviewStore.
///
/// DashMap keeps individual reads and writes safe across async tasks. That
/// does not serialize the service's read-modify-write vote workflow -
/// callers still serialize updates per application id.
pub struct InMemoryReviewStore {
    /// Maps application id -> application.
    applications: DashMap<String, ContentApplication>,
    /// Registered reviewers. The value marks active standing.
    reviewers: DashMap<String, bool>,
}

impl InMemoryReviewStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            applications: DashMap::new(),
            reviewers: DashMap::new(),
        }
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn get_application(
        &self,
        id: &str,
    ) -> Result<Option<ContentApplication>, ReviewError> {
        Ok(self.applications.get(id).map(|entry| entry.clone()))
    }

    async fn save_application(&self, app: ContentApplication) -> Result<(), ReviewError> {
        self.applications.insert(app.id.clone(), app);
        Ok(())
    }

    async fn pending_applications(
        &self,
        kind: ApplicationKind,
    ) -> Result<Vec<ContentApplication>, ReviewError> {
        let mut apps: Vec<ContentApplication> = self
            .applications
            .iter()
            .filter(|entry| entry.kind == kind && entry.status == ReviewStatus::Pending)
            .map(|entry| entry.clone())
            .collect();

        // Oldest first, the order a review queue presents them in
        apps.sort_by_key(|app| app.created_at);

        Ok(apps)
    }

    async fn is_reviewer(&self, reviewer: &str) -> Result<bool, ReviewError> {
        Ok(self.reviewers.get(reviewer).map(|v| *v).unwrap_or(false))
    }

    async fn add_reviewer(&self, reviewer: &str) -> Result<(), ReviewError> {
        self.reviewers.insert(reviewer.to_string(), true);
        Ok(())
    }
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let store = InMemoryReviewStore::new();

        assert!(store.get_application("cid-1").await.unwrap().is_none());

        let app = ContentApplication::new(
            "cid-1",
            ApplicationKind::Content,
            "alice",
            "Title",
            "Body",
            None,
        );
        store.save_application(app).await.unwrap();

        let fetched = store.get_application("cid-1").await.unwrap().unwrap();
        assert_eq!(fetched.author, "alice");
        assert_eq!(fetched.status, ReviewStatus::Pending);
    }

    #[tokio::test]
    async fn pending_listing_filters_by_kind_and_status() {
        let store = InMemoryReviewStore::new();

        let content = ContentApplication::new(
            "cid-1",
            ApplicationKind::Content,
            "alice",
            "Post",
            "",
            None,
        );
        let asset =
            ContentApplication::new("col-1", ApplicationKind::Asset, "bob", "Pack", "", None);
        let mut decided = ContentApplication::new(
            "cid-2",
            ApplicationKind::Content,
            "carol",
            "Old",
            "",
            None,
        );
        decided.status = ReviewStatus::Rejected;

        store.save_application(content).await.unwrap();
        store.save_application(asset).await.unwrap();
        store.save_application(decided).await.unwrap();

        let pending = store
            .pending_applications(ApplicationKind::Content)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "cid-1");
    }

    #[tokio::test]
    async fn unknown_identifier_is_not_a_reviewer() {
        let store = InMemoryReviewStore::new();

        assert!(!store.is_reviewer("rev-1").await.unwrap());
        store.add_reviewer("rev-1").await.unwrap();
        assert!(store.is_reviewer("rev-1").await.unwrap());
    }
}
