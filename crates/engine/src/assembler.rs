//! The context assembler — builds the message list for one tutoring turn,
//! forwards it to the completion service, and persists the exchange.

use std::sync::Arc;

use tracing::{debug, warn};

use tutorius_core::completion::{CompletionRequest, CompletionService};
use tutorius_core::error::{CompletionError, TutorError};
use tutorius_core::message::Message;
use tutorius_core::store::{
    NewExchange, ProgressStore, ProgressSummary, DEFAULT_GRADE, HISTORY_LIMIT,
};
use tutorius_curriculum::{CurriculumCatalog, PersonaCatalog};

use crate::prompts::{self, TutorPromptInput};
use crate::recommend::{self, Recommendation};

/// The operating mode of one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The routing persona — recommends a subject tutor, never teaches.
    #[default]
    Guide,
    /// A subject-bound tutor persona with its curriculum.
    Tutor,
}

impl Mode {
    /// Parse a request parameter; absent or unrecognized values mean guide.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("tutor") => Self::Tutor,
            _ => Self::Guide,
        }
    }
}

/// One user turn as received from the caller.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The student (required, non-empty)
    pub user_id: String,

    /// The student's message (required, non-empty)
    pub message: String,

    /// Operating mode; defaults to guide
    pub mode: Mode,

    /// Subject name for persona and curriculum lookup (tutor mode)
    pub subject_name: Option<String>,

    /// Subject row ID for grade resolution and scoping
    pub subject_id: Option<String>,

    /// Current topic, informational only
    pub topic: Option<String>,

    /// Explicit grade level; resolved from the subject row when absent
    pub grade: Option<u8>,
}

impl ChatRequest {
    /// A guide-mode request with no subject context.
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            message: message.into(),
            mode: Mode::Guide,
            subject_name: None,
            subject_id: None,
            topic: None,
            grade: None,
        }
    }
}

/// The tutoring engine. Stateless between calls — create one and reuse it.
pub struct TutorEngine {
    store: Arc<dyn ProgressStore>,
    completion: Arc<dyn CompletionService>,
    personas: PersonaCatalog,
    curricula: CurriculumCatalog,
    model: String,
}

impl TutorEngine {
    /// Create an engine with the built-in persona and curriculum catalogs.
    pub fn new(
        store: Arc<dyn ProgressStore>,
        completion: Arc<dyn CompletionService>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            completion,
            personas: PersonaCatalog::builtin(),
            curricula: CurriculumCatalog::builtin(),
            model: model.into(),
        }
    }

    /// Replace the persona catalog (e.g., with a configuration-loaded one).
    pub fn with_personas(mut self, personas: PersonaCatalog) -> Self {
        self.personas = personas;
        self
    }

    /// Replace the curriculum catalog.
    pub fn with_curricula(mut self, curricula: CurriculumCatalog) -> Self {
        self.curricula = curricula;
        self
    }

    /// Process one user turn and return the tutor's reply.
    ///
    /// Input validation happens before any store or network access. Store
    /// failures degrade to empty context; only a completion failure aborts
    /// the turn, classified into a localized [`TutorError::TutorUnavailable`].
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, TutorError> {
        if request.user_id.trim().is_empty() {
            return Err(TutorError::InvalidInput("user_id".into()));
        }
        if request.message.trim().is_empty() {
            return Err(TutorError::InvalidInput("message".into()));
        }

        let subject_id = request.subject_id.as_deref();
        let grade = self.resolve_grade(request).await;

        let summary = match self
            .store
            .progress_summary(&request.user_id, subject_id)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Progress summary unavailable, continuing without it: {e}");
                ProgressSummary::default()
            }
        };

        let history = match self
            .store
            .recent_exchanges(&request.user_id, subject_id, HISTORY_LIMIT)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                warn!("Chat history unavailable, continuing without it: {e}");
                Vec::new()
            }
        };

        let system_prompt = match request.mode {
            Mode::Guide => prompts::guide_prompt(&summary),
            Mode::Tutor => {
                let subject = request.subject_name.as_deref();
                let persona = self.personas.resolve(subject);
                let curriculum = subject.and_then(|name| self.curricula.lookup(name, grade));
                prompts::tutor_prompt(&TutorPromptInput {
                    persona,
                    subject_name: subject,
                    topic: request.topic.as_deref(),
                    grade,
                    summary: &summary,
                    curriculum,
                })
            }
        };

        // [system] + one (user, assistant) pair per stored exchange + [user]
        let mut messages = Vec::with_capacity(history.len() * 2 + 2);
        messages.push(Message::system(system_prompt));
        for exchange in &history {
            messages.push(Message::user(&exchange.message));
            messages.push(Message::assistant(&exchange.response));
        }
        messages.push(Message::user(&request.message));

        debug!(
            mode = ?request.mode,
            history_turns = history.len() * 2,
            "Assembled tutoring context"
        );

        let completion_request = CompletionRequest::new(&self.model, messages);
        let response = self
            .completion
            .complete(completion_request)
            .await
            .map_err(classify_unavailable)?;

        if let Err(e) = self
            .store
            .append_exchange(NewExchange {
                user_id: request.user_id.clone(),
                subject_id: request.subject_id.clone(),
                message: request.message.clone(),
                response: response.clone(),
            })
            .await
        {
            warn!("Failed to persist exchange, returning the answer anyway: {e}");
        }

        Ok(response)
    }

    /// Generate study recommendations for a student.
    ///
    /// Never fails outward: store or completion failures, unparseable model
    /// output, and degenerate replies all fall back to the deterministic
    /// local list.
    pub async fn recommendations(
        &self,
        user_id: &str,
        subject_id: Option<&str>,
    ) -> Vec<Recommendation> {
        let summary = match self.store.progress_summary(user_id, subject_id).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Progress summary unavailable for recommendations: {e}");
                None
            }
        };

        if let Some(summary) = &summary {
            if let Some(recommendations) = self.request_recommendations(summary).await {
                return recommendations;
            }
            debug!("Falling back to local recommendations");
        }

        recommend::fallback_recommendations(summary.as_ref())
    }

    async fn request_recommendations(
        &self,
        summary: &ProgressSummary,
    ) -> Option<Vec<Recommendation>> {
        let messages = vec![
            Message::system(recommend::RECOMMENDER_SYSTEM_PROMPT),
            Message::user(recommend::recommendation_prompt(summary)),
        ];
        let request = CompletionRequest::new(&self.model, messages);

        match self.completion.complete(request).await {
            Ok(raw) => recommend::parse_recommendations(&raw),
            Err(e) => {
                warn!("Recommendation completion failed: {e}");
                None
            }
        }
    }

    async fn resolve_grade(&self, request: &ChatRequest) -> u8 {
        if let Some(grade) = request.grade {
            return grade;
        }

        if let Some(subject_id) = request.subject_id.as_deref() {
            match self.store.subject_grade(subject_id).await {
                Ok(Some(grade)) => return grade,
                Ok(None) => {}
                Err(e) => warn!("Subject grade lookup failed, assuming default: {e}"),
            }
        }

        DEFAULT_GRADE
    }
}

/// Map a completion failure to the localized message shown to the student.
fn classify_unavailable(err: CompletionError) -> TutorError {
    let message = match &err {
        CompletionError::AuthenticationFailed(_)
        | CompletionError::Api {
            status_code: 401 | 403,
            ..
        } => "AI paslaugos prieigos raktas negalioja. Kreipkitės į administratorių.",
        CompletionError::RateLimited { .. } => {
            "AI tutorius šiuo metu perkrautas. Pabandykite dar kartą po kelių sekundžių."
        }
        CompletionError::Api { status_code, .. } if *status_code >= 500 => {
            "AI paslaugoje įvyko klaida. Pabandykite dar kartą po kelių sekundžių."
        }
        CompletionError::Timeout(_) => "Užklausa užtruko per ilgai. Pabandykite dar kartą.",
        CompletionError::Network(detail)
            if detail.contains("timeout") || detail.contains("timed out") =>
        {
            "Užklausa užtruko per ilgai. Pabandykite dar kartą."
        }
        _ => "Nepavyko gauti AI tutoriaus atsakymo. Pabandykite dar kartą.",
    };

    warn!("Completion failed: {err}");
    TutorError::TutorUnavailable {
        message: message.into(),
    }
}
