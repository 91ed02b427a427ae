//! Tutor personas — one per subject, plus the generic fallback.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// A subject-bound tutor persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name (e.g., "Fizikos Tutorius")
    pub name: String,

    /// Emoji shown next to the name
    pub emoji: String,

    /// Expertise blurb interpolated into the prompt
    pub expertise: String,

    /// Stylistic instruction for how the persona teaches
    pub style: String,

    /// Topics the persona advertises
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Lookup table from subject name to persona.
///
/// Resolution is exact-match on the subject name; anything else (including
/// a missing subject) resolves to the generic fallback persona, which
/// advertises no topics.
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    by_subject: HashMap<String, Persona>,
    fallback: Persona,
}

/// TOML shape: `[personas.<subject name>]` tables.
#[derive(Debug, Deserialize)]
struct PersonaFile {
    #[serde(default)]
    personas: HashMap<String, Persona>,
}

impl PersonaCatalog {
    /// A catalog with only the generic fallback persona.
    pub fn empty() -> Self {
        Self {
            by_subject: HashMap::new(),
            fallback: generic_fallback(),
        }
    }

    /// The built-in catalog covering the Lithuanian secondary-school subjects.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (subject, persona) in builtin_personas() {
            catalog.insert(subject, persona);
        }
        catalog
    }

    /// Register (or replace) the persona for a subject.
    pub fn insert(&mut self, subject: impl Into<String>, persona: Persona) {
        self.by_subject.insert(subject.into(), persona);
    }

    /// Resolve a subject name to its persona, falling back to the generic
    /// "AI Tutorius" for unknown or missing subjects.
    pub fn resolve(&self, subject: Option<&str>) -> &Persona {
        subject
            .and_then(|name| self.by_subject.get(name))
            .unwrap_or(&self.fallback)
    }

    /// The generic fallback persona.
    pub fn fallback(&self) -> &Persona {
        &self.fallback
    }

    /// Merge personas parsed from TOML into this catalog.
    /// Returns how many entries were added or replaced.
    pub fn merge_toml(&mut self, source: &str) -> Result<usize, CatalogError> {
        let file: PersonaFile = toml::from_str(source)?;
        let count = file.personas.len();
        for (subject, persona) in file.personas {
            self.by_subject.insert(subject, persona);
        }
        Ok(count)
    }

    /// Subject names with a registered persona.
    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.by_subject.keys().map(String::as_str)
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn generic_fallback() -> Persona {
    Persona {
        name: "AI Tutorius".into(),
        emoji: "🎓".into(),
        expertise: "universalus pagalbininkas visiems mokykliniams dalykams".into(),
        style: "Atsako aiškiai ir draugiškai, pritaiko paaiškinimą mokinio lygiui".into(),
        topics: Vec::new(),
    }
}

fn builtin_personas() -> Vec<(&'static str, Persona)> {
    fn persona(
        name: &str,
        emoji: &str,
        expertise: &str,
        style: &str,
        topics: &[&str],
    ) -> Persona {
        Persona {
            name: name.into(),
            emoji: emoji.into(),
            expertise: expertise.into(),
            style: style.into(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    vec![
        (
            "Fizika",
            persona(
                "Fizikos Tutorius",
                "⚛️",
                "mechanikos, termodinamikos, elektros ir šiuolaikinės fizikos specialistas",
                "Aiškina nuosekliai, kiekvieną dėsnį sieja su kasdieniais pavyzdžiais ir visada užrašo formulę",
                &[
                    "Kinematika",
                    "Dinamika",
                    "Judesio kiekis ir energija",
                    "Svyravimai ir bangos",
                    "Elektra",
                ],
            ),
        ),
        (
            "Matematika",
            persona(
                "Matematikos Tutorius",
                "📐",
                "algebros, geometrijos ir matematinės analizės specialistas",
                "Sprendžia žingsnis po žingsnio ir po kiekvieno žingsnio patikrina, ar mokinys suprato",
                &[
                    "Funkcijos",
                    "Trigonometrija",
                    "Vektoriai",
                    "Tikimybės",
                    "Išvestinės",
                ],
            ),
        ),
        (
            "Chemija",
            persona(
                "Chemijos Tutorius",
                "🧪",
                "bendrosios ir organinės chemijos specialistas",
                "Aiškina per reakcijų lygtis ir vaizdingus eksperimentų pavyzdžius",
                &[
                    "Atomo sandara",
                    "Periodinė sistema",
                    "Cheminės reakcijos",
                    "Organinė chemija",
                ],
            ),
        ),
        (
            "Biologija",
            persona(
                "Biologijos Tutorius",
                "🧬",
                "ląstelės biologijos, genetikos ir ekologijos specialistas",
                "Aiškina per procesų schemas ir gyvus pavyzdžius iš gamtos",
                &["Ląstelė", "Genetika", "Evoliucija", "Ekologija"],
            ),
        ),
        (
            "Istorija",
            persona(
                "Istorijos Tutorius",
                "🏛️",
                "Lietuvos ir pasaulio istorijos specialistas",
                "Pasakoja per priežasčių ir pasekmių grandines, sieja epochas tarpusavyje",
                &[
                    "Lietuvos istorija",
                    "Pasaulio istorija XX a.",
                    "Šaltojo karo laikotarpis",
                ],
            ),
        ),
        (
            "Lietuvių kalba",
            persona(
                "Lietuvių kalbos Tutorius",
                "📖",
                "gramatikos, literatūros analizės ir rašinių specialistas",
                "Taiso klaidas švelniai, kiekvieną taisyklę iliustruoja sakinio pavyzdžiu",
                &["Gramatika", "Literatūros analizė", "Rašiniai"],
            ),
        ),
        (
            "Anglų kalba",
            persona(
                "Anglų kalbos Tutorius",
                "🗣️",
                "anglų kalbos gramatikos, žodyno ir kalbėjimo specialistas",
                "Kalbina mokinį angliškai, bet paaiškinimus pateikia lietuviškai",
                &["Gramatika", "Žodynas", "Kalbėjimas", "Rašymas"],
            ),
        ),
        (
            "Informatika",
            persona(
                "Informatikos Tutorius",
                "💻",
                "algoritmų, programavimo ir duomenų struktūrų specialistas",
                "Kiekvieną sąvoką parodo trumpu kodo pavyzdžiu ir skatina išbandyti pačiam",
                &["Algoritmai", "Programavimas", "Duomenų struktūros"],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_subject() {
        let catalog = PersonaCatalog::builtin();
        let persona = catalog.resolve(Some("Fizika"));
        assert_eq!(persona.name, "Fizikos Tutorius");
        assert!(!persona.topics.is_empty());
    }

    #[test]
    fn unknown_subject_falls_back_to_generic() {
        let catalog = PersonaCatalog::builtin();
        let persona = catalog.resolve(Some("Astrologija"));
        assert_eq!(persona.name, "AI Tutorius");
        assert!(persona.topics.is_empty());
    }

    #[test]
    fn missing_subject_falls_back_to_generic() {
        let catalog = PersonaCatalog::builtin();
        assert_eq!(catalog.resolve(None).name, "AI Tutorius");
    }

    #[test]
    fn lookup_is_exact_match() {
        let catalog = PersonaCatalog::builtin();
        // Case and whitespace are not normalized.
        assert_eq!(catalog.resolve(Some("fizika")).name, "AI Tutorius");
        assert_eq!(catalog.resolve(Some(" Fizika")).name, "AI Tutorius");
    }

    #[test]
    fn merge_toml_adds_new_subject() {
        let mut catalog = PersonaCatalog::builtin();
        let added = catalog
            .merge_toml(
                r#"
                [personas."Geografija"]
                name = "Geografijos Tutorius"
                emoji = "🌍"
                expertise = "gamtinės ir visuomeninės geografijos specialistas"
                style = "Aiškina per žemėlapius"
                topics = ["Klimatas", "Gyventojai"]
                "#,
            )
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(
            catalog.resolve(Some("Geografija")).name,
            "Geografijos Tutorius"
        );
    }

    #[test]
    fn merge_toml_rejects_malformed_input() {
        let mut catalog = PersonaCatalog::empty();
        assert!(catalog.merge_toml("[personas.Fizika]\nname = 3").is_err());
    }
}
