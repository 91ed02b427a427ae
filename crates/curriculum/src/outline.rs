//! Curriculum outlines — structured course programs keyed by subject and
//! grade, rendered into the text block spliced into tutor prompts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// One unit of a course program with its topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumUnit {
    /// Unit title (e.g., "Dinamika")
    pub title: String,

    /// Topics covered by the unit
    #[serde(default)]
    pub topics: Vec<String>,
}

/// A full course program for one subject and grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumOutline {
    /// Subject name the outline belongs to (e.g., "Fizika")
    pub subject: String,

    /// Grade level the outline covers
    pub grade: u8,

    /// Header line used when the outline is rendered into a prompt
    pub title: String,

    /// Ordered course units
    #[serde(default)]
    pub units: Vec<CurriculumUnit>,

    /// Learning objectives
    #[serde(default)]
    pub objectives: Vec<String>,

    /// Key formulas the tutor is expected to cite
    #[serde(default)]
    pub formulas: Vec<String>,

    /// Practical works in the program
    #[serde(default)]
    pub practical_works: Vec<String>,
}

impl CurriculumOutline {
    /// Serialize the outline into the formatted text block spliced into a
    /// tutor prompt.
    pub fn render(&self) -> String {
        let mut out = format!("=== {} ===\n", self.title);

        if !self.units.is_empty() {
            out.push_str("\nTemos:\n");
            for (i, unit) in self.units.iter().enumerate() {
                if unit.topics.is_empty() {
                    out.push_str(&format!("{}. {}\n", i + 1, unit.title));
                } else {
                    out.push_str(&format!(
                        "{}. {}: {}\n",
                        i + 1,
                        unit.title,
                        unit.topics.join(", ")
                    ));
                }
            }
        }

        if !self.objectives.is_empty() {
            out.push_str("\nMokymosi tikslai:\n");
            for objective in &self.objectives {
                out.push_str(&format!("- {objective}\n"));
            }
        }

        if !self.formulas.is_empty() {
            out.push_str("\nPagrindinės formulės:\n");
            for formula in &self.formulas {
                out.push_str(&format!("- {formula}\n"));
            }
        }

        if !self.practical_works.is_empty() {
            out.push_str("\nPraktikos darbai:\n");
            for work in &self.practical_works {
                out.push_str(&format!("- {work}\n"));
            }
        }

        out
    }
}

/// Lookup table from `(subject name, grade)` to a curriculum outline.
#[derive(Debug, Clone, Default)]
pub struct CurriculumCatalog {
    by_key: HashMap<(String, u8), CurriculumOutline>,
}

/// TOML shape: repeated `[[outlines]]` tables.
#[derive(Debug, Deserialize)]
struct OutlineFile {
    #[serde(default)]
    outlines: Vec<CurriculumOutline>,
}

impl CurriculumCatalog {
    /// A catalog with no outlines.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in catalog. Currently covers Fizika, grade 11.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(physics_grade_11());
        catalog
    }

    /// Register (or replace) an outline under its `(subject, grade)` key.
    pub fn insert(&mut self, outline: CurriculumOutline) {
        self.by_key
            .insert((outline.subject.clone(), outline.grade), outline);
    }

    /// Exact-match lookup by subject name and grade.
    pub fn lookup(&self, subject: &str, grade: u8) -> Option<&CurriculumOutline> {
        self.by_key.get(&(subject.to_string(), grade))
    }

    /// Merge outlines parsed from TOML into this catalog.
    /// Returns how many entries were added or replaced.
    pub fn merge_toml(&mut self, source: &str) -> Result<usize, CatalogError> {
        let file: OutlineFile = toml::from_str(source)?;
        let count = file.outlines.len();
        for outline in file.outlines {
            self.insert(outline);
        }
        Ok(count)
    }

    /// Number of registered outlines.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the catalog has no outlines.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// The built-in Fizika grade-11 course program.
fn physics_grade_11() -> CurriculumOutline {
    fn unit(title: &str, topics: &[&str]) -> CurriculumUnit {
        CurriculumUnit {
            title: title.into(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    CurriculumOutline {
        subject: "Fizika".into(),
        grade: 11,
        title: "11 KLASĖS FIZIKOS PROGRAMA".into(),
        units: vec![
            unit(
                "Kinematika",
                &[
                    "Tolyginis tiesiaeigis judėjimas",
                    "Tolygiai kintamas judėjimas",
                    "Laisvasis kritimas",
                    "Kreivaeigis judėjimas",
                ],
            ),
            unit(
                "Dinamika",
                &[
                    "Niutono dėsniai",
                    "Visuotinės traukos dėsnis",
                    "Trinties jėga",
                    "Tamprumo jėga",
                ],
            ),
            unit(
                "Judesio kiekis ir energija",
                &[
                    "Judesio kiekio tvermės dėsnis",
                    "Mechaninis darbas ir galia",
                    "Kinetinė ir potencinė energija",
                    "Energijos tvermės dėsnis",
                ],
            ),
            unit(
                "Mechaniniai svyravimai ir bangos",
                &[
                    "Harmoniniai svyravimai",
                    "Matematinė svyruoklė",
                    "Bangos ilgis ir dažnis",
                    "Garso bangos",
                ],
            ),
        ],
        objectives: strings(&[
            "Taikyti kinematikos lygtis tiesiaeigiam ir tolygiai kintamam judėjimui",
            "Analizuoti kūnų sąveiką remiantis Niutono dėsniais",
            "Taikyti judesio kiekio ir energijos tvermės dėsnius uždaviniams spręsti",
            "Sieti svyravimų ir bangų dydžius su realiais reiškiniais",
        ]),
        formulas: strings(&[
            "v = s / t",
            "a = (v - v₀) / t",
            "s = v₀t + at²/2",
            "F = ma",
            "F = G·m₁·m₂/r²",
            "p = mv",
            "A = F·s·cosα",
            "Ek = mv²/2",
            "Ep = mgh",
            "T = 2π√(l/g)",
            "v = λ·f",
        ]),
        practical_works: strings(&[
            "Laisvojo kritimo pagreičio matavimas",
            "Trinties koeficiento nustatymas",
            "Matematinės svyruoklės tyrimas",
            "Garso greičio matavimas",
        ]),
    }
}
