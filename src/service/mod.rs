//! Service layer: business logic orchestration.
//!
//! [`ChallengeService`] coordinates challenge and deposit operations
//! against a [`crate::persistence::ChallengeStore`] and emits events
//! through the [`crate::domain::EventBus`].

pub mod challenge_service;

pub use challenge_service::ChallengeService;
