//! # Tutorius Core
//!
//! Domain types, traits, and error definitions for the Tutorius AI tutoring
//! engine. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external collaborators of the tutoring engine are defined as
//! traits here: the [`ProgressStore`] (relational rows about subjects,
//! topics, progress, and chat history) and the [`CompletionService`] (a
//! remote chat-completion API). Implementations live in their respective
//! crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod completion;
pub mod error;
pub mod message;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use completion::{CompletionRequest, CompletionService, SamplingConfig};
pub use error::{CompletionError, Error, Result, StoreError, TutorError};
pub use message::{Message, Role};
pub use store::{
    Exchange, NewExchange, ProgressStore, ProgressSummary, Subject, SubjectProgress, Topic,
    TopicStatus,
};
