// Review service - core business logic for content moderation.
//
// This service handles:
// - Content, asset and comment submissions
// - Reviewer candidacies (apply -> get voted in by existing reviewers)
// - Vote accumulation against configurable thresholds
// - Finalization (approved/rejected) exactly once per application
//
// NO storage or transport dependencies here - just pure domain logic
// behind the `ReviewStore` port.

use super::review_models::{
    ApplicationKind, ContentApplication, ReviewConfig, ReviewStatus, ReviewVote, ThresholdPair,
    VoteOutcome,
};
use async_trait::async_trait;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ReviewError {
    /// Empty reviewer identifier, or a voter that is not a registered
    /// reviewer.
    #[error("Invalid reviewer")]
    InvalidReviewer,

    /// A zero threshold would make every item instantly decided or never
    /// decidable, so it is refused up front instead of evaluated.
    #[error("Threshold must be at least 1")]
    InvalidThreshold,

    #[error("Application already exists: {0}")]
    AlreadySubmitted(String),

    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ============================================================================
// DECISION ENGINE
// ============================================================================

/// Record one reviewer's vote on an application and evaluate termination.
///
/// A reviewer holds exactly one current opinion per item: voting again
/// replaces the earlier vote (which can flip an approval to a rejection and
/// vice versa). The derived counts are recomputed from the vote map after
/// every change.
///
/// Approval is evaluated before rejection, so an update that satisfies both
/// thresholds at once finalizes as `Approved`.
///
/// Votes against an already-terminal application are no-ops: the unchanged
/// status is returned with `finalized = false` and the vote is not stored.
///
/// Pure data transformation - mutates only the application passed in,
/// performs no I/O.
pub fn apply_vote(
    app: &mut ContentApplication,
    reviewer: &str,
    approved: bool,
    reason: impl Into<String>,
    thresholds: ThresholdPair,
) -> Result<VoteOutcome, ReviewError> {
    if reviewer.trim().is_empty() {
        return Err(ReviewError::InvalidReviewer);
    }
    if thresholds.approved == 0 || thresholds.rejected == 0 {
        return Err(ReviewError::InvalidThreshold);
    }

    if app.status.is_terminal() {
        return Ok(VoteOutcome {
            status: app.status,
            finalized: false,
        });
    }

    app.votes.insert(
        reviewer.to_string(),
        ReviewVote {
            reviewer: reviewer.to_string(),
            approved,
            reason: reason.into(),
        },
    );
    app.recount();

    if app.approved_count >= thresholds.approved {
        app.status = ReviewStatus::Approved;
        return Ok(VoteOutcome {
            status: ReviewStatus::Approved,
            finalized: true,
        });
    }
    if app.rejected_count >= thresholds.rejected {
        app.status = ReviewStatus::Rejected;
        return Ok(VoteOutcome {
            status: ReviewStatus::Rejected,
            finalized: true,
        });
    }

    Ok(VoteOutcome {
        status: ReviewStatus::Pending,
        finalized: false,
    })
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting applications and the reviewer registry.
///
/// Following the same pattern as the other store ports: the core defines
/// WHAT it needs, the infra layer provides the implementation.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Fetch an application by id.
    async fn get_application(
        &self,
        id: &str,
    ) -> Result<Option<ContentApplication>, ReviewError>;

    /// Insert or replace an application.
    async fn save_application(&self, app: ContentApplication) -> Result<(), ReviewError>;

    /// All pending applications of one category, oldest first.
    async fn pending_applications(
        &self,
        kind: ApplicationKind,
    ) -> Result<Vec<ContentApplication>, ReviewError>;

    /// Whether this identifier is a registered reviewer.
    async fn is_reviewer(&self, reviewer: &str) -> Result<bool, ReviewError>;

    /// Register a reviewer.
    async fn add_reviewer(&self, reviewer: &str) -> Result<(), ReviewError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Moderation service orchestrating the decision engine over a store.
///
/// The thresholds are fixed at construction and never change for the
/// service's lifetime. `record_vote` is a read-modify-write over a single
/// application; callers behind a concurrent front-end must serialize
/// updates per application id.
#[derive(Debug)]
pub struct ReviewService<S: ReviewStore> {
    store: S,
    config: ReviewConfig,
}

impl<S: ReviewStore> ReviewService<S> {
    /// Create a new review service. Fails with `InvalidThreshold` if any of
    /// the six configured thresholds is zero.
    pub fn new(store: S, config: ReviewConfig) -> Result<Self, ReviewError> {
        for pair in [config.content, config.asset, config.reviewer] {
            if pair.approved == 0 || pair.rejected == 0 {
                return Err(ReviewError::InvalidThreshold);
            }
        }
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Register an initial reviewer directly, bypassing candidacy voting.
    ///
    /// Intended for the composition root: someone has to be able to cast
    /// the first votes. Later reviewers join via `apply_reviewer`.
    pub async fn bootstrap_reviewer(&self, reviewer: &str) -> Result<(), ReviewError> {
        if reviewer.trim().is_empty() {
            return Err(ReviewError::InvalidReviewer);
        }
        self.store.add_reviewer(reviewer).await
    }

    /// Submit content (or a comment, via `parent_id`) for review.
    pub async fn submit_content(
        &self,
        id: &str,
        author: &str,
        title: &str,
        body: &str,
        parent_id: Option<String>,
    ) -> Result<(), ReviewError> {
        let app = ContentApplication::new(
            id,
            ApplicationKind::Content,
            author,
            title,
            body,
            parent_id,
        );
        self.submit(app).await
    }

    /// Submit an asset for review.
    pub async fn submit_asset(
        &self,
        id: &str,
        author: &str,
        title: &str,
        description: &str,
    ) -> Result<(), ReviewError> {
        let app =
            ContentApplication::new(id, ApplicationKind::Asset, author, title, description, None);
        self.submit(app).await
    }

    /// Apply for reviewer standing. The candidacy is an application like
    /// any other, decided by the existing reviewers against the reviewer
    /// threshold pair; the resume travels in the application body.
    pub async fn apply_reviewer(&self, candidate: &str, resume: &str) -> Result<(), ReviewError> {
        if candidate.trim().is_empty() {
            return Err(ReviewError::InvalidReviewer);
        }
        if self.store.is_reviewer(candidate).await? {
            return Err(ReviewError::AlreadySubmitted(candidate.to_string()));
        }
        let app = ContentApplication::new(
            candidate,
            ApplicationKind::Reviewer,
            candidate,
            "",
            resume,
            None,
        );
        self.submit(app).await
    }

    /// Replace the resume on a pending candidacy. A no-op once the
    /// candidacy is terminal, same as late votes.
    pub async fn update_reviewer_resume(
        &self,
        candidate: &str,
        resume: &str,
    ) -> Result<(), ReviewError> {
        let mut app = self
            .store
            .get_application(candidate)
            .await?
            .filter(|a| a.kind == ApplicationKind::Reviewer)
            .ok_or_else(|| ReviewError::UnknownApplication(candidate.to_string()))?;

        if app.status.is_terminal() {
            return Ok(());
        }

        app.body = resume.to_string();
        self.store.save_application(app).await
    }

    /// Record one reviewer's vote on an application.
    ///
    /// Only registered reviewers may vote. The threshold pair is selected
    /// by the application's category. When a reviewer candidacy finalizes
    /// as approved, the candidate joins the reviewer registry.
    pub async fn record_vote(
        &self,
        id: &str,
        reviewer: &str,
        approved: bool,
        reason: &str,
    ) -> Result<VoteOutcome, ReviewError> {
        if !self.store.is_reviewer(reviewer).await? {
            return Err(ReviewError::InvalidReviewer);
        }

        let mut app = self
            .store
            .get_application(id)
            .await?
            .ok_or_else(|| ReviewError::UnknownApplication(id.to_string()))?;

        let thresholds = self.config.pair_for(app.kind);
        let outcome = apply_vote(&mut app, reviewer, approved, reason, thresholds)?;

        if outcome.finalized {
            tracing::info!(
                id = %app.id,
                kind = %app.kind,
                status = %outcome.status,
                approved = app.approved_count,
                rejected = app.rejected_count,
                "Application finalized"
            );
        } else {
            tracing::debug!(
                id = %app.id,
                reviewer = %reviewer,
                approved,
                "Vote recorded"
            );
        }

        let newly_approved_reviewer = outcome.finalized
            && outcome.status == ReviewStatus::Approved
            && app.kind == ApplicationKind::Reviewer;
        let candidate = app.id.clone();

        self.store.save_application(app).await?;
        if newly_approved_reviewer {
            self.store.add_reviewer(&candidate).await?;
        }

        Ok(outcome)
    }

    /// Current status of an application.
    pub async fn status(&self, id: &str) -> Result<ReviewStatus, ReviewError> {
        self.store
            .get_application(id)
            .await?
            .map(|app| app.status)
            .ok_or_else(|| ReviewError::UnknownApplication(id.to_string()))
    }

    /// Full application record, for display.
    pub async fn application(&self, id: &str) -> Result<Option<ContentApplication>, ReviewError> {
        self.store.get_application(id).await
    }

    /// Pending applications of one category, oldest first.
    pub async fn pending(
        &self,
        kind: ApplicationKind,
    ) -> Result<Vec<ContentApplication>, ReviewError> {
        self.store.pending_applications(kind).await
    }

    pub async fn is_reviewer(&self, reviewer: &str) -> Result<bool, ReviewError> {
        self.store.is_reviewer(reviewer).await
    }

    async fn submit(&self, app: ContentApplication) -> Result<(), ReviewError> {
        if self.store.get_application(&app.id).await?.is_some() {
            return Err(ReviewError::AlreadySubmitted(app.id));
        }
        tracing::info!(id = %app.id, kind = %app.kind, author = %app.author, "Application submitted");
        self.store.save_application(app).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
