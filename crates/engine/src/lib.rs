//! The tutoring engine — context assembly and recommendation generation.
//!
//! One chat turn flows through [`TutorEngine::chat`]:
//!
//! 1. **Validate** the request (empty input fails before any I/O)
//! 2. **Resolve** the grade level (explicit → subject row → default)
//! 3. **Fetch** the progress summary and recent history (failures degrade
//!    to empty context rather than blocking the turn)
//! 4. **Select** the system prompt: the guide persona, or a subject tutor
//!    persona with its curriculum block
//! 5. **Send** `[system] + history turns + [user]` to the completion service
//! 6. **Persist** the finished exchange and return the answer
//!
//! [`TutorEngine::recommendations`] shares the progress fetch, asks the
//! model for structured suggestions, and falls back to a deterministic
//! local list on any failure.

pub mod assembler;
pub mod extract;
mod prompts;
pub mod recommend;

pub use assembler::{ChatRequest, Mode, TutorEngine};
pub use extract::extract_json_object;
pub use recommend::Recommendation;
