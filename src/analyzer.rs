// Response Analyzer - derives a signal bundle from one free-text answer
use crate::lexicon::{
    ACTIVE_INDICATORS, ASPIRATION_TERMS, CONCRETE_NOUNS, CONTRAST_CONJUNCTIONS, DEFERRALS,
    EXTERNAL_TRIGGERS, FEAR_TERMS, FIRST_PERSON_PRONOUNS, FUTURE_CUES, GENUINE_EMOTIONS, HEDGES,
    JUSTIFICATION_CUES, KEY_PHRASE_MARKERS, NUMERIC_TOKENS, PASSIVE_INDICATORS, PAST_CUES,
    PERFORMATIVE_PHRASES, THIRD_PERSON_PRONOUNS,
};
use crate::signals::{Agency, Authenticity, PatternTag, SignalBundle, Specificity};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Case-insensitive alternation bounded by word boundaries.
fn word_regex(terms: &[&str]) -> Regex {
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("word list regex should compile")
}

/// Case-insensitive alternation matched anywhere, including inside longer words.
fn substring_regex(terms: &[&str]) -> Regex {
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    Regex::new(&format!("(?i)(?:{})", alternation)).expect("term list regex should compile")
}

/// Compiled matchers, one per signal dimension.
struct SignalPatterns {
    numeric: Regex,
    concrete_nouns: Regex,
    passive: Regex,
    active: Regex,
    performative: Regex,
    genuine: Regex,
    future: Regex,
    past: Regex,
    fear: Regex,
    aspiration: Regex,
    external_trigger: Regex,
    first_person: Regex,
    third_person: Regex,
    hedges: Regex,
    deferrals: Regex,
    contrast: Regex,
    justification: Regex,
}

lazy_static! {
    static ref PATTERNS: SignalPatterns = SignalPatterns {
        numeric: Regex::new(NUMERIC_TOKENS).expect("numeric regex should compile"),
        concrete_nouns: word_regex(CONCRETE_NOUNS),
        passive: word_regex(PASSIVE_INDICATORS),
        active: word_regex(ACTIVE_INDICATORS),
        performative: word_regex(PERFORMATIVE_PHRASES),
        genuine: word_regex(GENUINE_EMOTIONS),
        future: substring_regex(FUTURE_CUES),
        past: substring_regex(PAST_CUES),
        fear: substring_regex(FEAR_TERMS),
        aspiration: substring_regex(ASPIRATION_TERMS),
        external_trigger: substring_regex(EXTERNAL_TRIGGERS),
        first_person: word_regex(FIRST_PERSON_PRONOUNS),
        third_person: word_regex(THIRD_PERSON_PRONOUNS),
        hedges: substring_regex(HEDGES),
        deferrals: substring_regex(DEFERRALS),
        contrast: substring_regex(CONTRAST_CONJUNCTIONS),
        justification: substring_regex(JUSTIFICATION_CUES),
    };
}

/// Threshold constants for every heuristic dimension.
///
/// Defaults are the fixed design parameters; comparisons marked "more than"
/// are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Numeric tokens needed (more than) for the +3 specificity bonus
    pub numeric_tokens: usize,
    /// Concrete nouns needed (more than) for the +2 specificity bonus
    pub concrete_nouns: usize,
    /// Answers shorter than this many words earn the +1 brevity bonus
    pub brevity_words: usize,
    pub high_specificity_score: u32,
    pub medium_specificity_score: u32,
    /// One side of the agency balance must exceed this multiple of the other
    pub agency_ratio: usize,
    /// Future/past cue margin (more than) for a temporal orientation tag
    pub temporal_margin: usize,
    /// External attribution is only evaluated above this word count
    pub attribution_words: usize,
    pub attribution_ratio: usize,
    /// Contrast conjunctions needed (more than) for self-contradiction
    pub contrast_conjunctions: usize,
    /// Over-explaining is only flagged above this word count
    pub over_explaining_words: usize,
    pub key_phrase_min_chars: usize,
    /// Exclusive upper bound
    pub key_phrase_max_chars: usize,
    pub max_key_phrases: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            numeric_tokens: 2,
            concrete_nouns: 3,
            brevity_words: 30,
            high_specificity_score: 3,
            medium_specificity_score: 1,
            agency_ratio: 2,
            temporal_margin: 2,
            attribution_words: 30,
            attribution_ratio: 2,
            contrast_conjunctions: 1,
            over_explaining_words: 40,
            key_phrase_min_chars: 20,
            key_phrase_max_chars: 120,
            max_key_phrases: 2,
        }
    }
}

/// Pure, deterministic answer analyzer.
#[derive(Debug, Clone, Default)]
pub struct ResponseAnalyzer {
    config: AnalyzerConfig,
}

impl ResponseAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Derive the full signal bundle for one answer
    pub fn analyze(&self, text: &str) -> SignalBundle {
        let mut patterns = Vec::new();
        let word_count = word_count(text);

        let specificity = self.specificity(text);
        match specificity {
            Specificity::Low => patterns.push(PatternTag::VagueNarrative),
            Specificity::High => patterns.push(PatternTag::HighSpecificity),
            Specificity::Medium => {}
        }

        let agency = self.agency(text);
        match agency {
            Agency::Passive => patterns.push(PatternTag::PowerlessFraming),
            Agency::Active => patterns.push(PatternTag::AgencyClaimed),
            Agency::Mixed => {}
        }

        let authenticity = self.authenticity(text);
        match authenticity {
            Authenticity::Performative => patterns.push(PatternTag::PerformativeResponse),
            Authenticity::Authentic => patterns.push(PatternTag::AuthenticEmotion),
            Authenticity::Neutral => {}
        }

        let future = PATTERNS.future.find_iter(text).count();
        let past = PATTERNS.past.find_iter(text).count();
        if future > past + self.config.temporal_margin {
            patterns.push(PatternTag::FutureOriented);
        }
        if past > future + self.config.temporal_margin {
            patterns.push(PatternTag::PastAnchored);
        }

        if PATTERNS.fear.is_match(text) {
            patterns.push(PatternTag::FearDetected);
        }
        if PATTERNS.aspiration.is_match(text) {
            patterns.push(PatternTag::AspirationDetected);
        }

        if word_count > self.config.attribution_words && PATTERNS.external_trigger.is_match(text) {
            let personal = PATTERNS.first_person.find_iter(text).count();
            let external = PATTERNS.third_person.find_iter(text).count();
            if external > personal * self.config.attribution_ratio {
                patterns.push(PatternTag::ExternalAttribution);
            }
        }

        if PATTERNS.hedges.is_match(text) {
            patterns.push(PatternTag::UncertaintyMarkers);
        }
        if PATTERNS.deferrals.is_match(text) {
            patterns.push(PatternTag::TemporalAvoidance);
        }

        if PATTERNS.contrast.find_iter(text).count() > self.config.contrast_conjunctions {
            patterns.push(PatternTag::SelfContradiction);
        }

        if word_count > self.config.over_explaining_words && PATTERNS.justification.is_match(text) {
            patterns.push(PatternTag::OverExplaining);
        }

        let key_phrases = self.key_phrases(text);

        debug!(
            words = word_count,
            ?specificity,
            ?agency,
            ?authenticity,
            tags = ?patterns,
            "analyzed answer"
        );

        SignalBundle {
            patterns,
            key_phrases,
            specificity,
            agency,
            authenticity,
        }
    }

    pub fn specificity(&self, text: &str) -> Specificity {
        let numbers = PATTERNS.numeric.find_iter(text).count();
        let concrete = PATTERNS.concrete_nouns.find_iter(text).count();

        let mut score = 0;
        if numbers > self.config.numeric_tokens {
            score += 3;
        }
        if concrete > self.config.concrete_nouns {
            score += 2;
        }
        if word_count(text) < self.config.brevity_words {
            score += 1;
        }

        if score >= self.config.high_specificity_score {
            Specificity::High
        } else if score >= self.config.medium_specificity_score {
            Specificity::Medium
        } else {
            Specificity::Low
        }
    }

    pub fn agency(&self, text: &str) -> Agency {
        let passive = PATTERNS.passive.find_iter(text).count();
        let active = PATTERNS.active.find_iter(text).count();

        if passive > active * self.config.agency_ratio {
            Agency::Passive
        } else if active > passive * self.config.agency_ratio {
            Agency::Active
        } else {
            Agency::Mixed
        }
    }

    pub fn authenticity(&self, text: &str) -> Authenticity {
        let performative = PATTERNS.performative.find_iter(text).count();
        let genuine = PATTERNS.genuine.find_iter(text).count();

        if performative > genuine {
            Authenticity::Performative
        } else if genuine > 0 {
            Authenticity::Authentic
        } else {
            Authenticity::Neutral
        }
    }

    /// First-person sentences of moderate length, in source order
    pub fn key_phrases(&self, text: &str) -> Vec<String> {
        text.split(['.', '!', '?'])
            .filter(|sentence| {
                let lower = sentence.to_lowercase();
                KEY_PHRASE_MARKERS.iter().any(|m| lower.contains(m))
            })
            .map(str::trim)
            .filter(|sentence| {
                let len = sentence.chars().count();
                len >= self.config.key_phrase_min_chars && len < self.config.key_phrase_max_chars
            })
            .take(self.config.max_key_phrases)
            .map(str::to_string)
            .collect()
    }
}

/// Whitespace-delimited word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
