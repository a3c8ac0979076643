//! Gazetteer Entity Recognizer
//!
//! Offline EntityRecognizer that finds known place names in text. Used when
//! no NER model server is configured.
//!
//! Country names are deliberately absent from the built-in list: countries
//! are found by the catalog scan, and a gazetteer hit for them would only
//! duplicate that work as a city lookup.

use crate::domain::entities::{EntityLabel, RecognizedEntity};
use crate::domain::errors::ExtractionError;
use crate::domain::ports::EntityRecognizer;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;

const BUILTIN_GPE: &[&str] = &[
    "Amsterdam", "Athens", "Auckland", "Bangkok", "Barcelona", "Beijing", "Berlin",
    "Bogotá", "Boston", "Brussels", "Budapest", "Buenos Aires", "Cairo", "Cape Town",
    "Casablanca", "Chicago", "Copenhagen", "Delhi", "Dubai", "Dublin", "Edinburgh",
    "Florence", "Frankfurt", "Geneva", "Hamburg", "Helsinki", "Ho Chi Minh City",
    "Istanbul", "Jakarta", "Jerusalem", "Johannesburg", "Kyiv", "Kyoto",
    "Lagos", "Lima", "Lisbon", "London", "Los Angeles", "Lyon", "Madrid", "Manchester",
    "Marrakesh", "Marseille", "Melbourne", "Mexico City", "Miami", "Milan", "Montreal",
    "Moscow", "Mumbai", "Munich", "Nairobi", "Naples", "New Orleans", "New York",
    "Nice", "Osaka", "Oslo", "Paris", "Porto", "Prague", "Reykjavik", "Rio de Janeiro",
    "Rome", "San Francisco", "Santiago", "Seattle", "Seoul", "Seville", "Shanghai",
    "Stockholm", "Sydney", "São Paulo", "Taipei", "Tokyo", "Toronto", "Valencia",
    "Vancouver", "Venice", "Vienna", "Warsaw", "Washington", "Zurich", "The Hague",
];

const BUILTIN_LOC: &[&str] = &[
    "Africa", "Alps", "Amazon", "Andes", "Asia", "Atlantic Ocean",
    "Balkans", "Baltic Sea", "Caribbean", "Danube", "Europe", "Himalayas",
    "Indian Ocean", "Lake Geneva", "Mediterranean", "Mount Everest", "Nile",
    "North America", "North Sea", "Pacific Ocean", "Patagonia", "Pyrenees", "Rhine",
    "Rocky Mountains", "Sahara", "Scandinavia", "Siberia", "South America",
    "the Alps", "the Andes",
];

const BUILTIN_FAC: &[&str] = &[
    "Big Ben", "Brandenburg Gate", "Colosseum", "Eiffel Tower", "Golden Gate Bridge",
    "Heathrow", "Louvre", "Sagrada Família", "Statue of Liberty", "Sydney Opera House",
    "Taj Mahal", "Tower Bridge",
];

/// Known place name with its label.
#[derive(Debug, Clone)]
struct Entry {
    name: String,
    label: EntityLabel,
}

/// Rule-based recognizer over a fixed list of names.
///
/// Matching is case-sensitive and whole-word. When matches overlap, the one
/// starting first wins, then the longest ("New York" over "York").
pub struct GazetteerRecognizer {
    entries: Vec<Entry>,
}

impl GazetteerRecognizer {
    /// Recognizer over `(name, label)` pairs. Empty names are ignored.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, EntityLabel)>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, label)| Entry {
                name: name.into(),
                label,
            })
            .filter(|e| !e.name.trim().is_empty())
            .collect();
        Self { entries }
    }

    /// Recognizer over the built-in world gazetteer.
    pub fn builtin() -> Self {
        let gpe = BUILTIN_GPE.iter().map(|n| (*n, EntityLabel::Gpe));
        let loc = BUILTIN_LOC.iter().map(|n| (*n, EntityLabel::Loc));
        let fac = BUILTIN_FAC.iter().map(|n| (*n, EntityLabel::Fac));
        Self::new(gpe.chain(loc).chain(fac))
    }

    /// Parse `name<TAB>label` lines. Blank lines and `#` comments are
    /// skipped; a missing label means GPE.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .map(|line| match line.split_once('\t') {
                Some((name, label)) => (name.trim().to_string(), EntityLabel::parse(label)),
                None => (line.trim().to_string(), EntityLabel::Gpe),
            });
        Self::new(entries)
    }

    /// Load a gazetteer file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gazetteer {}", path.display()))?;
        let recognizer = Self::parse(&content);
        if recognizer.is_empty() {
            anyhow::bail!("gazetteer {} has no entries", path.display());
        }
        Ok(recognizer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All non-overlapping whole-word matches, in text order.
    fn find(&self, text: &str) -> Vec<RecognizedEntity> {
        let mut spans: Vec<(usize, usize, &Entry)> = self
            .entries
            .iter()
            .flat_map(|entry| {
                text.match_indices(entry.name.as_str())
                    .map(move |(start, m)| (start, start + m.len(), entry))
            })
            .filter(|&(start, end, _)| is_word_boundary(text, start, end))
            .collect();

        spans.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut last_end = 0;
        let mut found = Vec::new();
        for (start, end, entry) in spans {
            if start < last_end {
                continue;
            }
            last_end = end;
            found.push(RecognizedEntity::new(&text[start..end], entry.label.clone()));
        }
        found
    }
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

impl Default for GazetteerRecognizer {
    fn default() -> Self {
        Self::builtin()
    }
}

#[async_trait]
impl EntityRecognizer for GazetteerRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, ExtractionError> {
        Ok(self.find(text))
    }
}
