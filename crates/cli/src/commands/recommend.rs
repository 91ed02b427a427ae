//! `tutorius recommend` — print study recommendations for a student.
//!
//! Works without an api key: the engine falls back to its deterministic
//! local list when the completion call fails.

use tutorius_config::AppConfig;

pub async fn run(user: &str, subject_id: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    if config.api_key.is_none() {
        tracing::warn!("No API key configured; recommendations will use the local fallback");
    }

    let engine = super::build_engine(&config).await?;
    let recommendations = engine.recommendations(user, subject_id).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    println!();
    for (i, rec) in recommendations.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, rec.priority, rec.title);
        println!("     {}", rec.description);
        if let Some(subject) = &rec.subject {
            println!("     Dalykas: {subject}");
        }
        if let Some(time) = &rec.estimated_time {
            println!("     Trukmė: {time}");
        }
        println!();
    }

    Ok(())
}
