//! Query language detection and analyzer routing.
//!
//! Detection is a lightweight scoring pass over the query text (diacritics,
//! stop words, morphology), not a statistical model. Scores for French and
//! English are normalized into a probability pair; an empty or neutral
//! query falls back to a French-leaning prior matching the platform's
//! audience.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Languages the search pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "en")]
    English,
    Auto,
}

impl SupportedLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedLanguage::French => "fr",
            SupportedLanguage::English => "en",
            SupportedLanguage::Auto => "auto",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fr" => Some(SupportedLanguage::French),
            "en" => Some(SupportedLanguage::English),
            "auto" => Some(SupportedLanguage::Auto),
            _ => None,
        }
    }
}

impl std::fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLanguage {
    pub language: SupportedLanguage,
    /// Normalized confidence in `[0, 1]`; the two candidates' confidences
    /// sum to 1.
    pub confidence: f64,
    /// Both candidates ranked by confidence, winner first.
    pub candidates: Vec<(SupportedLanguage, f64)>,
}

impl DetectedLanguage {
    fn ranked(french: f64, english: f64) -> Self {
        let mut candidates = vec![
            (SupportedLanguage::French, french),
            (SupportedLanguage::English, english),
        ];
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (language, confidence) = candidates[0];
        Self {
            language,
            confidence,
            candidates,
        }
    }
}

static FRENCH_DIACRITICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[àâäéèêëïîôöùûüÿç]").expect("diacritics pattern must compile")
});

const FRENCH_KEYWORDS: &[&str] = &[
    "le", "la", "les", "de", "du", "des", "un", "une", "et", "ou", "à", "au", "aux", "dans", "sur",
    "avec", "pour", "par", "sans", "sous", "entre", "chez", "vers", "restaurant", "hôtel",
    "service", "entreprise", "société", "boutique", "magasin", "français", "française", "douala",
    "yaoundé", "cameroun", "camerounais",
];

const ENGLISH_KEYWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "to", "in", "on", "at", "by", "for", "with", "from", "up",
    "about", "into", "over", "after", "under", "between", "through", "restaurant", "hotel",
    "service", "company", "business", "shop", "store", "english", "american", "british",
    "international", "global",
];

static FRENCH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(qu'|d'|l'|n'|s'|t'|j'|m'|c')\w+",
        r"(?i)\b\w+tion\b",
        r"(?i)\b\w+ment\b",
        r"(?i)\b\w+eur\b",
        r"(?i)\b\w+aise?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("language pattern must compile"))
    .collect()
});

static ENGLISH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b\w+ing\b",
        r"(?i)\b\w+ed\b",
        r"(?i)\b\w+ly\b",
        r"(?i)\b\w+tion\b",
        r"(?i)\bth(e|is|at|ere|ey)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("language pattern must compile"))
    .collect()
});

const DIACRITIC_WEIGHT: f64 = 0.3;
const KEYWORD_WEIGHT: f64 = 0.2;
const PATTERN_WEIGHT: f64 = 0.1;
const PATTERN_CAP: f64 = 0.5;
// Prior favours French for an audience where it dominates
const FRENCH_PRIOR: f64 = 0.6;

/// Detects the dominant language of free-text queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Score the query against both languages. Empty input reports an even
    /// 0.5, and queries with no indicators at all fall back to the
    /// French-leaning prior.
    pub fn detect(&self, query: &str) -> DetectedLanguage {
        let text = query.trim().to_lowercase();
        if text.is_empty() {
            return DetectedLanguage::ranked(0.5, 0.5);
        }

        let mut french = 0.0;
        let mut english = 0.0;

        if FRENCH_DIACRITICS.is_match(&text) {
            french += DIACRITIC_WEIGHT;
        }

        for word in text.split_whitespace() {
            if FRENCH_KEYWORDS.contains(&word) {
                french += KEYWORD_WEIGHT;
            }
            if ENGLISH_KEYWORDS.contains(&word) {
                english += KEYWORD_WEIGHT;
            }
        }

        french += pattern_score(&FRENCH_PATTERNS, &text);
        english += pattern_score(&ENGLISH_PATTERNS, &text);

        let total = french + english;
        if total == 0.0 {
            return DetectedLanguage::ranked(FRENCH_PRIOR, 1.0 - FRENCH_PRIOR);
        }

        // Ties rank French first, the platform's dominant language
        DetectedLanguage::ranked(french / total, english / total)
    }

    /// Index-time analyzer for a language.
    pub fn analyzer_for(&self, language: SupportedLanguage) -> &'static str {
        match language {
            SupportedLanguage::French => "french_analyzer",
            SupportedLanguage::English => "english_analyzer",
            SupportedLanguage::Auto => "multilingual_analyzer",
        }
    }

    /// Query-time analyzer for a language.
    pub fn search_analyzer_for(&self, language: SupportedLanguage) -> &'static str {
        match language {
            SupportedLanguage::French => "french_search_analyzer",
            SupportedLanguage::English => "english_search_analyzer",
            SupportedLanguage::Auto => "multilingual_analyzer",
        }
    }

    /// Field list with per-language boosts for a multi-match query.
    ///
    /// Language-specific sub-fields outrank the base fields; `Auto` blends
    /// both variants at intermediate boosts.
    pub fn boosted_fields_for(&self, language: SupportedLanguage) -> Vec<String> {
        let base = ["name^3", "description^2", "category.name^2", "tags"];
        let mut fields: Vec<String> = match language {
            SupportedLanguage::French => vec![
                "name.french^3.5".to_string(),
                "description.french^2.5".to_string(),
                "category.name.french^2.5".to_string(),
                "tags.french^1.8".to_string(),
            ],
            SupportedLanguage::English => vec![
                "name.english^3.5".to_string(),
                "description.english^2.5".to_string(),
                "category.name.english^2.5".to_string(),
                "tags.english^1.8".to_string(),
            ],
            SupportedLanguage::Auto => vec![
                "name.french^3.2".to_string(),
                "name.english^3.2".to_string(),
                "description.french^2.2".to_string(),
                "description.english^2.2".to_string(),
                "category.name.french^2.2".to_string(),
                "category.name.english^2.2".to_string(),
                "tags.french^1.6".to_string(),
                "tags.english^1.6".to_string(),
            ],
        };
        fields.extend(base.iter().map(|f| f.to_string()));
        fields
    }
}

fn pattern_score(patterns: &[Regex], text: &str) -> f64 {
    let matched: usize = patterns.iter().map(|p| p.find_iter(text).count()).sum();
    (matched as f64 * PATTERN_WEIGHT).min(PATTERN_CAP)
}
