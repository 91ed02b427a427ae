//! CLI command implementations.

pub mod chat;
pub mod recommend;
pub mod seed;

use std::sync::Arc;

use anyhow::Context;

use tutorius_config::AppConfig;
use tutorius_curriculum::{CurriculumCatalog, PersonaCatalog};
use tutorius_engine::TutorEngine;
use tutorius_providers::OpenRouterClient;
use tutorius_store::SqliteStore;

/// Wire config → store → provider → engine.
///
/// An absent api key still produces a working engine — completion calls
/// will fail with an authentication error, which chat surfaces as a
/// localized message and recommendations degrade around.
pub(crate) async fn build_engine(config: &AppConfig) -> anyhow::Result<TutorEngine> {
    let store = Arc::new(
        SqliteStore::new(&config.database.path)
            .await
            .with_context(|| format!("opening progress store at {}", config.database.path))?,
    );

    let api_key = config.api_key.clone().unwrap_or_default();
    let completion = Arc::new(OpenRouterClient::new(
        "openrouter",
        &config.base_url,
        api_key,
    ));

    let mut personas = PersonaCatalog::builtin();
    if let Some(path) = &config.curriculum.personas_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading persona table {}", path.display()))?;
        let added = personas.merge_toml(&content)?;
        tracing::debug!(added, "Merged persona table from {}", path.display());
    }

    let mut curricula = CurriculumCatalog::builtin();
    if let Some(path) = &config.curriculum.outlines_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading curriculum table {}", path.display()))?;
        let added = curricula.merge_toml(&content)?;
        tracing::debug!(added, "Merged curriculum table from {}", path.display());
    }

    Ok(TutorEngine::new(store, completion, &config.model)
        .with_personas(personas)
        .with_curricula(curricula))
}

/// Print setup guidance when no api key is configured.
pub(crate) fn print_api_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    export TUTORIUS_API_KEY='sk-or-v1-...'    (generic)");
    eprintln!("    export OPENROUTER_API_KEY='sk-or-v1-...'  (recommended)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!(
        "    {}",
        AppConfig::config_dir().join("config.toml").display()
    );
    eprintln!();
    eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
    eprintln!();
}
