//! System prompt templates for the two operating modes.
//!
//! The guide persona never teaches — it only routes the student toward a
//! subject tutor, so its template receives nothing but the subject list and
//! the overall progress number. The tutor template carries the persona, the
//! grade, the student's weak areas, and (when the catalog has a match) the
//! rendered curriculum block.

use tutorius_core::store::ProgressSummary;
use tutorius_curriculum::{CurriculumOutline, Persona};

/// Interpolation inputs for the tutor-mode template.
pub(crate) struct TutorPromptInput<'a> {
    pub persona: &'a Persona,
    pub subject_name: Option<&'a str>,
    pub topic: Option<&'a str>,
    pub grade: u8,
    pub summary: &'a ProgressSummary,
    pub curriculum: Option<&'a CurriculumOutline>,
}

/// The guide persona ("Mokslo Gidas") system prompt.
pub(crate) fn guide_prompt(summary: &ProgressSummary) -> String {
    let subject_list = if summary.subjects.is_empty() {
        "kol kas nėra".to_string()
    } else {
        summary
            .subjects
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Tu esi Mokslo Gidas 🧭 – draugiškas mokymosi vedlys Lietuvos moksleiviams.\n\
         \n\
         Mokinio dalykai: {subject_list}\n\
         Bendras progresas: {overall:.0}%\n\
         \n\
         Tavo vienintelė užduotis – padėti mokiniui išsirinkti tinkamą dalyko tutorių ir \
         palaikyti jo mokymosi motyvaciją.\n\
         \n\
         GRIEŽTOS TAISYKLĖS:\n\
         1. NIEKADA nemokyk dalyko turinio: neaiškink temų, nespręsk uždavinių, nerašyk formulių.\n\
         2. Jei mokinys užduoda dalykinį klausimą, pasiūlyk jam atsidaryti to dalyko tutorių ir \
         paaiškink, kuo tas tutorius padės.\n\
         3. Patardamas, nuo ko pradėti, remkis mokinio dalykų sąrašu ir bendru progresu.\n\
         4. Atsakyk lietuviškai, trumpai ir padrąsinančiai.",
        overall = summary.overall_progress
    )
}

/// The subject-tutor system prompt.
pub(crate) fn tutor_prompt(input: &TutorPromptInput<'_>) -> String {
    let persona = input.persona;
    let topic = input.topic.unwrap_or("nenurodyta");
    let weak_areas = if input.summary.weak_areas.is_empty() {
        "Nėra".to_string()
    } else {
        input.summary.weak_areas.join(", ")
    };
    let subject_label = input.subject_name.unwrap_or("tavo dalyką");

    let mut prompt = format!(
        "Tu esi {name} {emoji} – {expertise}.\n\
         \n\
         Mokymo stilius: {style}\n\
         Klasė: {grade}\n\
         Dabartinė tema: {topic}\n\
         \n\
         Mokinio bendras progresas: {overall:.0}%\n\
         Silpnosios vietos: {weak_areas}\n",
        name = persona.name,
        emoji = persona.emoji,
        expertise = persona.expertise,
        style = persona.style,
        grade = input.grade,
        overall = input.summary.overall_progress,
    );

    if !persona.topics.is_empty() {
        prompt.push_str(&format!("Dėstomos temos: {}\n", persona.topics.join(", ")));
    }

    if let Some(outline) = input.curriculum {
        prompt.push('\n');
        prompt.push_str(&outline.render());
    }

    prompt.push_str(&format!(
        "\nTAISYKLĖS:\n\
         1. Neperženk {grade} klasės programos ribų – sudėtingesnius klausimus paaiškink tik tiek, \
         kiek reikia programai suprasti.\n\
         2. Kai aktualu, cituok programos formules tiksliai taip, kaip jos užrašytos.\n\
         3. Skirk daugiau dėmesio mokinio silpnosioms vietoms.\n\
         4. Jei klausimas nesusijęs su {subject_label}, pasiūlyk mokiniui grįžti pas Mokslo Gidą, \
         kuris parinks tinkamą tutorių.\n\
         5. Atsakyk lietuviškai, aiškiai ir kantriai.",
        grade = input.grade,
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorius_core::store::SubjectProgress;
    use tutorius_curriculum::{CurriculumCatalog, PersonaCatalog};

    fn summary_with(subjects: &[(&str, f32)], weak: &[&str]) -> ProgressSummary {
        let subjects: Vec<SubjectProgress> = subjects
            .iter()
            .enumerate()
            .map(|(i, (name, pct))| SubjectProgress {
                id: format!("s{i}"),
                name: name.to_string(),
                progress_pct: *pct,
            })
            .collect();
        let overall = if subjects.is_empty() {
            0.0
        } else {
            subjects.iter().map(|s| s.progress_pct).sum::<f32>() / subjects.len() as f32
        };
        ProgressSummary {
            subjects,
            overall_progress: overall,
            weak_areas: weak.iter().map(|w| w.to_string()).collect(),
        }
    }

    #[test]
    fn guide_lists_subjects_and_progress() {
        let prompt = guide_prompt(&summary_with(&[("Fizika", 40.0), ("Chemija", 60.0)], &[]));
        assert!(prompt.contains("Mokslo Gidas"));
        assert!(prompt.contains("Fizika, Chemija"));
        assert!(prompt.contains("50%"));
        assert!(prompt.contains("NIEKADA nemokyk"));
    }

    #[test]
    fn guide_handles_no_subjects() {
        let prompt = guide_prompt(&ProgressSummary::default());
        assert!(prompt.contains("kol kas nėra"));
        assert!(prompt.contains("0%"));
    }

    #[test]
    fn tutor_interpolates_persona_and_weak_areas() {
        let catalog = PersonaCatalog::builtin();
        let persona = catalog.resolve(Some("Fizika"));
        let summary = summary_with(&[("Fizika", 35.0)], &["Dinamika", "Kinematika"]);

        let prompt = tutor_prompt(&TutorPromptInput {
            persona,
            subject_name: Some("Fizika"),
            topic: Some("Niutono dėsniai"),
            grade: 11,
            summary: &summary,
            curriculum: None,
        });

        assert!(prompt.contains("Fizikos Tutorius"));
        assert!(prompt.contains("Dabartinė tema: Niutono dėsniai"));
        assert!(prompt.contains("Silpnosios vietos: Dinamika, Kinematika"));
        assert!(prompt.contains("Klasė: 11"));
    }

    #[test]
    fn tutor_shows_nera_for_no_weak_areas() {
        let catalog = PersonaCatalog::builtin();
        let prompt = tutor_prompt(&TutorPromptInput {
            persona: catalog.resolve(Some("Fizika")),
            subject_name: Some("Fizika"),
            topic: None,
            grade: 11,
            summary: &ProgressSummary::default(),
            curriculum: None,
        });
        assert!(prompt.contains("Silpnosios vietos: Nėra"));
        assert!(prompt.contains("Dabartinė tema: nenurodyta"));
    }

    #[test]
    fn tutor_splices_curriculum_block() {
        let personas = PersonaCatalog::builtin();
        let curricula = CurriculumCatalog::builtin();
        let prompt = tutor_prompt(&TutorPromptInput {
            persona: personas.resolve(Some("Fizika")),
            subject_name: Some("Fizika"),
            topic: None,
            grade: 11,
            summary: &ProgressSummary::default(),
            curriculum: curricula.lookup("Fizika", 11),
        });
        assert!(prompt.contains("11 KLASĖS FIZIKOS PROGRAMA"));
        assert!(prompt.contains("F = ma"));
    }

    #[test]
    fn fallback_persona_advertises_no_topics() {
        let catalog = PersonaCatalog::builtin();
        let prompt = tutor_prompt(&TutorPromptInput {
            persona: catalog.resolve(Some("Filosofija")),
            subject_name: Some("Filosofija"),
            topic: None,
            grade: 11,
            summary: &ProgressSummary::default(),
            curriculum: None,
        });
        assert!(prompt.contains("AI Tutorius"));
        assert!(!prompt.contains("Dėstomos temos:"));
    }
}
