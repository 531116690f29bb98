// Core review module - contains the moderation decision logic.

pub mod review_models;
pub mod review_service;

pub use review_models::*;
pub use review_service::*;
