//! # challenge-ledger
//!
//! Core ledger for the "1 to 200 and back" savings challenge of a
//! personal-finance tracker.
//!
//! The crate generates the deterministic deposit plan for a challenge
//! target, tracks each deposit obligation through its cyclic
//! three-state machine, and derives aggregate progress on demand. The
//! surrounding web application (pages, routing, authentication,
//! charting) is the caller — this crate is the bookkeeping core.
//!
//! ## Architecture
//!
//! ```text
//! Embedding application
//!     │
//!     ├── ChallengeService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── Deposit plan generator, status machine, progress (domain/)
//!     │
//!     └── ChallengeStore (persistence/)
//!         ├── PostgresStore
//!         └── MemoryStore
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
