// Content moderation by reviewer vote.
//
// **Architecture Overview:**
// - `core/` = Business logic (storage-agnostic)
// - `infra/` = Implementations of core traits (stores)
//
// Submitted content, assets and reviewer candidacies accumulate reviewer
// votes until one of the configured thresholds is crossed, at which point
// the decision is final. The embedding application wires a store into
// `ReviewService`, seeds the first reviewer, and reacts to the returned
// outcomes (publishing, notifications, rewards are all its concern).

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;

pub use crate::core::review::{
    apply_vote, ApplicationKind, ContentApplication, ReviewConfig, ReviewError, ReviewService,
    ReviewStatus, ReviewStore, ReviewVote, ThresholdPair, VoteOutcome,
};
pub use crate::infra::review::InMemoryReviewStore;
