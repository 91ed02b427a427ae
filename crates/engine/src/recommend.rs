//! Study recommendations — the model-backed path and its deterministic
//! local fallback.

use serde::{Deserialize, Serialize};

use tutorius_core::store::ProgressSummary;

use crate::extract::extract_json_object;

/// Progress below this marks a subject as needing focused attention.
const FOCUS_THRESHOLD: f32 = 50.0;

/// At most this many focus entries are added by the fallback.
const FOCUS_LIMIT: usize = 2;

/// Most recommendations the model-backed path will return.
const MAX_RECOMMENDATIONS: usize = 5;

/// Fewer parsed records than this counts as a degenerate model reply.
const MIN_RECOMMENDATIONS: usize = 3;

/// One study recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Recommendation category (e.g., "focus", "practice", "general")
    #[serde(rename = "type")]
    pub kind: String,

    /// Short headline
    pub title: String,

    /// What the student should do
    pub description: String,

    /// Subject this recommendation targets, when subject-bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// "high" | "medium" | "low"
    #[serde(default = "default_priority")]
    pub priority: String,

    /// Suggested time investment (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,

    /// Why this recommendation was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn default_priority() -> String {
    "medium".into()
}

#[derive(Debug, Deserialize)]
struct RecommendationPayload {
    #[serde(default)]
    recommendations: Vec<Recommendation>,
}

/// The system prompt for the recommendation request.
pub(crate) const RECOMMENDER_SYSTEM_PROMPT: &str = "\
Tu esi mokymosi planavimo asistentas Lietuvos moksleiviams. Pagal mokinio \
progresą sudarai konkrečias mokymosi rekomendacijas.

Atsakyk TIK JSON objektu šia forma, be jokio kito teksto:
{\"recommendations\": [{\"type\": \"focus|practice|review|general\", \
\"title\": \"...\", \"description\": \"...\", \"subject\": \"...\", \
\"priority\": \"high|medium|low\", \"estimatedTime\": \"...\", \
\"reason\": \"...\"}]}

Pateik nuo 3 iki 5 rekomendacijų lietuvių kalba.";

/// Build the user message carrying the student's progress data.
pub(crate) fn recommendation_prompt(summary: &ProgressSummary) -> String {
    let mut prompt = String::from("Mokinio progresas:\n");

    if summary.subjects.is_empty() {
        prompt.push_str("- dalykų kol kas nėra\n");
    } else {
        for subject in &summary.subjects {
            prompt.push_str(&format!(
                "- {}: {:.0}%\n",
                subject.name, subject.progress_pct
            ));
        }
    }

    prompt.push_str(&format!(
        "Bendras progresas: {:.0}%\n",
        summary.overall_progress
    ));

    if !summary.weak_areas.is_empty() {
        prompt.push_str(&format!(
            "Silpnosios temos: {}\n",
            summary.weak_areas.join(", ")
        ));
    }

    prompt.push_str("\nSudaryk mokymosi rekomendacijas šiam mokiniui.");
    prompt
}

/// Parse the model's reply into recommendations.
///
/// Returns `None` on extraction or parse failure, or when the reply carries
/// fewer than three records — callers fall back to the local list.
pub(crate) fn parse_recommendations(raw: &str) -> Option<Vec<Recommendation>> {
    let json = extract_json_object(raw)?;
    let payload: RecommendationPayload = serde_json::from_str(&json).ok()?;

    let mut recommendations = payload.recommendations;
    if recommendations.len() < MIN_RECOMMENDATIONS {
        return None;
    }
    recommendations.truncate(MAX_RECOMMENDATIONS);
    Some(recommendations)
}

/// The deterministic fallback list.
///
/// Always one generic study-habit entry; with a known summary, up to two
/// focus entries for subjects under 50% progress, in subject-list order.
pub(crate) fn fallback_recommendations(summary: Option<&ProgressSummary>) -> Vec<Recommendation> {
    let mut recommendations = vec![Recommendation {
        kind: "general".into(),
        title: "Mokykis reguliariai".into(),
        description: "Skirk mokymuisi bent 30 minučių kasdien – trumpos, bet dažnos sesijos \
                      įsimena geriausiai."
            .into(),
        subject: None,
        priority: "medium".into(),
        estimated_time: Some("30 min per dieną".into()),
        reason: Some("Pastovus ritmas duoda daugiausiai pažangos.".into()),
    }];

    if let Some(summary) = summary {
        for subject in summary
            .subjects
            .iter()
            .filter(|s| s.progress_pct < FOCUS_THRESHOLD)
            .take(FOCUS_LIMIT)
        {
            recommendations.push(Recommendation {
                kind: "focus".into(),
                title: format!("Sustiprink dalyką: {}", subject.name),
                description: format!(
                    "Šio dalyko progresas kol kas {:.0}% – verta skirti jam papildomo dėmesio.",
                    subject.progress_pct
                ),
                subject: Some(subject.name.clone()),
                priority: "high".into(),
                estimated_time: Some("45 min".into()),
                reason: Some("Progresas žemiau 50%.".into()),
            });
        }
    }

    recommendations
}
