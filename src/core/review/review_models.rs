// Review domain models - data structures for the moderation workflow.
//
// These are pure domain types with no storage dependencies.
// The infra layer persists them; the service layer mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single reviewer's current opinion on an application.
///
/// One vote per reviewer per item - a later vote by the same reviewer
/// replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewVote {
    pub reviewer: String,
    pub approved: bool,
    /// Free-text justification, not interpreted by the engine.
    pub reason: String,
}

/// Moderation status of an application.
///
/// `Approved` and `Rejected` are terminal: once reached, further votes
/// are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Pending => write!(f, "pending"),
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Which review category an application belongs to.
///
/// The decision logic is identical for all three; only the threshold pair
/// differs. The submitter picks the category, the engine never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationKind {
    /// Plain text content, or a comment on other content.
    Content,
    /// Binary/asset content (e.g. an uploaded collection).
    Asset,
    /// A candidate applying for reviewer standing.
    Reviewer,
}

impl std::fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationKind::Content => write!(f, "content"),
            ApplicationKind::Asset => write!(f, "asset"),
            ApplicationKind::Reviewer => write!(f, "reviewer"),
        }
    }
}

/// A piece of submitted content (or comment, asset, or reviewer candidacy)
/// awaiting or having received moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentApplication {
    /// Unique identifier (e.g. a CID). Reviewer candidacies use the
    /// candidate's own identifier.
    pub id: String,
    /// Set when this application is a comment on other content.
    pub parent_id: Option<String>,
    pub kind: ApplicationKind,
    pub author: String,
    pub title: String,
    /// Opaque text. Carries the resume for a reviewer candidacy.
    pub body: String,
    /// Current vote per reviewer.
    pub votes: HashMap<String, ReviewVote>,
    /// Derived from `votes`; recomputed on every vote change, never set
    /// independently.
    pub approved_count: u32,
    pub rejected_count: u32,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl ContentApplication {
    /// Create a fresh pending application with no votes.
    pub fn new(
        id: impl Into<String>,
        kind: ApplicationKind,
        author: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id,
            kind,
            author: author.into(),
            title: title.into(),
            body: body.into(),
            votes: HashMap::new(),
            approved_count: 0,
            rejected_count: 0,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Recompute the derived counts from the vote map.
    ///
    /// Invariant: `approved_count + rejected_count == votes.len()` - every
    /// vote is either approved or rejected, there is no abstain state.
    pub(crate) fn recount(&mut self) {
        self.approved_count = self.votes.values().filter(|v| v.approved).count() as u32;
        self.rejected_count = self.votes.len() as u32 - self.approved_count;
    }
}

/// Minimum vote counts required to finalize a decision in each direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub approved: u32,
    pub rejected: u32,
}

/// Process-wide review configuration: one threshold pair per application
/// category. Set once at startup and treated as immutable afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub content: ThresholdPair,
    pub asset: ThresholdPair,
    pub reviewer: ThresholdPair,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            // Two concurring reviewers per direction, so no single
            // reviewer decides an item on their own.
            content: ThresholdPair {
                approved: 2,
                rejected: 2,
            },
            asset: ThresholdPair {
                approved: 2,
                rejected: 2,
            },
            reviewer: ThresholdPair {
                approved: 2,
                rejected: 2,
            },
        }
    }
}

impl ReviewConfig {
    /// Load thresholds from `REVIEW_*_THRESHOLD` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        fn env_u32(name: &str, default: u32) -> u32 {
            std::env::var(name)
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(default)
        }

        let defaults = Self::default();
        Self {
            content: ThresholdPair {
                approved: env_u32(
                    "REVIEW_CONTENT_APPROVED_THRESHOLD",
                    defaults.content.approved,
                ),
                rejected: env_u32(
                    "REVIEW_CONTENT_REJECTED_THRESHOLD",
                    defaults.content.rejected,
                ),
            },
            asset: ThresholdPair {
                approved: env_u32("REVIEW_ASSET_APPROVED_THRESHOLD", defaults.asset.approved),
                rejected: env_u32("REVIEW_ASSET_REJECTED_THRESHOLD", defaults.asset.rejected),
            },
            reviewer: ThresholdPair {
                approved: env_u32(
                    "REVIEW_REVIEWER_APPROVED_THRESHOLD",
                    defaults.reviewer.approved,
                ),
                rejected: env_u32(
                    "REVIEW_REVIEWER_REJECTED_THRESHOLD",
                    defaults.reviewer.rejected,
                ),
            },
        }
    }

    /// The threshold pair that applies to a given application category.
    pub fn pair_for(&self, kind: ApplicationKind) -> ThresholdPair {
        match kind {
            ApplicationKind::Content => self.content,
            ApplicationKind::Asset => self.asset,
            ApplicationKind::Reviewer => self.reviewer,
        }
    }
}

/// Result of recording a vote.
///
/// `finalized` is true exactly on the call that crossed a threshold, so the
/// caller can trigger follow-up effects (publish, notify) once and only
/// once. A vote against an already-terminal item returns the unchanged
/// status with `finalized = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub status: ReviewStatus,
    pub finalized: bool,
}
