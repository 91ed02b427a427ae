//! `tutorius seed` — load a demo dataset so `chat` and `recommend` have
//! progress context to work with.

use anyhow::Context;

use tutorius_config::AppConfig;
use tutorius_core::store::{Subject, Topic, TopicStatus};
use tutorius_store::SqliteStore;

pub async fn run(user: &str) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let store = SqliteStore::new(&config.database.path)
        .await
        .with_context(|| format!("opening progress store at {}", config.database.path))?;

    let subjects = [
        ("fizika-11", "Fizika", 11, Some("p. Kazlauskienė")),
        ("matematika-11", "Matematika", 11, Some("p. Petrauskas")),
        ("chemija-11", "Chemija", 11, None),
    ];

    for (id, name, grade, teacher) in subjects {
        store
            .upsert_subject(&Subject {
                id: id.into(),
                user_id: user.into(),
                name: name.into(),
                grade,
                teacher: teacher.map(String::from),
            })
            .await?;
    }

    let topics = [
        ("fiz-kinematika", "fizika-11", "Kinematika", TopicStatus::Completed, Some(85.0)),
        ("fiz-dinamika", "fizika-11", "Dinamika", TopicStatus::InProgress, Some(45.0)),
        ("fiz-energija", "fizika-11", "Judesio kiekis ir energija", TopicStatus::InProgress, Some(62.0)),
        ("fiz-svyravimai", "fizika-11", "Mechaniniai svyravimai ir bangos", TopicStatus::Locked, None),
        ("mat-funkcijos", "matematika-11", "Funkcijos", TopicStatus::Completed, Some(78.0)),
        ("mat-trigonometrija", "matematika-11", "Trigonometrija", TopicStatus::InProgress, Some(52.0)),
        ("chem-atomas", "chemija-11", "Atomo sandara", TopicStatus::Completed, Some(91.0)),
        ("chem-reakcijos", "chemija-11", "Cheminės reakcijos", TopicStatus::InProgress, Some(66.0)),
    ];

    for (id, subject_id, title, status, score) in topics {
        store
            .upsert_topic(&Topic {
                id: id.into(),
                subject_id: subject_id.into(),
                title: title.into(),
                status,
                score,
            })
            .await?;
    }

    store.record_progress(user, "fizika-11", 48.0).await?;
    store.record_progress(user, "matematika-11", 65.0).await?;
    store.record_progress(user, "chemija-11", 72.0).await?;

    println!(
        "Seeded {} subjects and {} topics for user '{user}' into {}",
        subjects.len(),
        topics.len(),
        config.database.path
    );
    Ok(())
}
