// Lexicon - static keyword tables per diagnosis category and per signal dimension
use crate::error::DiagnosticError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Diagnosis categories in declaration order.
///
/// The derived `Ord` follows declaration order, which the scorer relies on
/// for tie-breaking and which `BTreeMap<Category, _>` iteration preserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    SignalMetabolism,
    OfferMarket,
    OperationalDrift,
    TalentCulture,
    ConversionNarrative,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::SignalMetabolism,
        Category::OfferMarket,
        Category::OperationalDrift,
        Category::TalentCulture,
        Category::ConversionNarrative,
    ];

    /// Fallback primary when no category shows any textual evidence.
    pub const DEFAULT: Category = Category::SignalMetabolism;

    pub fn key(&self) -> &'static str {
        match self {
            Category::SignalMetabolism => "SIGNAL_METABOLISM",
            Category::OfferMarket => "OFFER_MARKET",
            Category::OperationalDrift => "OPERATIONAL_DRIFT",
            Category::TalentCulture => "TALENT_CULTURE",
            Category::ConversionNarrative => "CONVERSION_NARRATIVE",
        }
    }

    /// Static presentation content for this category
    pub fn content(&self) -> &'static CategoryContent {
        match self {
            Category::SignalMetabolism => &SIGNAL_METABOLISM_CONTENT,
            Category::OfferMarket => &OFFER_MARKET_CONTENT,
            Category::OperationalDrift => &OPERATIONAL_DRIFT_CONTENT,
            Category::TalentCulture => &TALENT_CULTURE_CONTENT,
            Category::ConversionNarrative => &CONVERSION_NARRATIVE_CONTENT,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == normalized)
            .ok_or_else(|| DiagnosticError::UnknownCategory(s.to_string()))
    }
}

/// Fixed narrative content rendered for a diagnosed category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryContent {
    pub name: &'static str,
    pub code: &'static str,
    pub description: &'static str,
    pub cost: &'static str,
    pub pathway: &'static str,
    pub signature: &'static str,
    pub avoidance: &'static str,
}

static SIGNAL_METABOLISM_CONTENT: CategoryContent = CategoryContent {
    name: "Signal Metabolism Failure",
    code: "PATTERN_SM_001",
    description: "You're drowning in information because you're avoiding making a decision. The 'overwhelm' is a defense mechanism. It lets you stay busy without committing.",
    cost: "Every day you stay paralyzed, opportunities pass to people who make imperfect decisions faster than you make perfect ones. Your overthinking is expensive.",
    pathway: "Decision Velocity + Embodied Clarity",
    signature: "analysis_paralysis :: decision_avoidance :: perfectionism_as_defense",
    avoidance: "You use 'needing more data' as permission to stay stuck.",
};

static OFFER_MARKET_CONTENT: CategoryContent = CategoryContent {
    name: "Offer-Market Misalignment",
    code: "PATTERN_OM_002",
    description: "Your solution isn't the problem. Your unwillingness to claim a position and own it is. You're trying to please everyone, which means you serve no one.",
    cost: "Diluted messaging. Confused prospects. Revenue leaking everywhere because you won't commit to who you're actually for.",
    pathway: "Positioning Clarity + Message Courage",
    signature: "positioning_avoidance :: people_pleasing :: commitment_phobia",
    avoidance: "You call it 'testing' when it's really fear of being seen.",
};

static OPERATIONAL_DRIFT_CONTENT: CategoryContent = CategoryContent {
    name: "Operational Drift",
    code: "PATTERN_OD_003",
    description: "Your systems are broken because you'd rather stay busy than fix what's actually broken. The chaos gives you an excuse for why you're not growing.",
    cost: "Burnout. Wasted energy. Growth that feels like punishment because your infrastructure can't handle it. You're building on sand.",
    pathway: "System Integrity + Sustainable Scale",
    signature: "chaos_as_identity :: efficiency_avoidance :: growth_self_sabotage",
    avoidance: "You wear 'busy' like a badge instead of admitting you're afraid to build something that actually works.",
};

static TALENT_CULTURE_CONTENT: CategoryContent = CategoryContent {
    name: "Talent-Culture Friction",
    code: "PATTERN_TC_004",
    description: "Your best people are leaving because you haven't created a culture worth staying for. You blame them, but the pattern is you.",
    cost: "Turnover costs you more than money. It costs you momentum, trust, and the ability to build anything lasting. You're a training ground for your competitors.",
    pathway: "Leadership Accountability + Cultural Integrity",
    signature: "leadership_avoidance :: accountability_deficit :: cultural_negligence",
    avoidance: "You say 'people just don't get it' when the real issue is you haven't defined what 'it' is.",
};

static CONVERSION_NARRATIVE_CONTENT: CategoryContent = CategoryContent {
    name: "Conversion Narrative Collapse",
    code: "PATTERN_CN_005",
    description: "People don't buy because your story doesn't compel them. You're explaining features when you should be addressing the fear that keeps them from acting.",
    cost: "Traffic without revenue. Attention without conversion. You're close to the sale but can't close it because you don't understand what people actually buy.",
    pathway: "Narrative Coherence + Trust Architecture",
    signature: "story_failure :: trust_gap :: emotional_disconnection",
    avoidance: "You focus on tactics (A/B testing, copy tweaks) to avoid the real work: telling a story that matters.",
};

/// Term lists scored for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLexicon {
    pub keywords: Vec<String>,
    pub emotional: Vec<String>,
    pub deflection: Vec<String>,
    pub avoidance: Vec<String>,
}

impl CategoryLexicon {
    fn from_static(
        keywords: &[&str],
        emotional: &[&str],
        deflection: &[&str],
        avoidance: &[&str],
    ) -> Self {
        let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self {
            keywords: owned(keywords),
            emotional: owned(emotional),
            deflection: owned(deflection),
            avoidance: owned(avoidance),
        }
    }
}

/// Immutable category lexicon injected into the scorer.
///
/// Every category in [`Category::ALL`] is guaranteed to have an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<Category, CategoryLexicon>,
}

lazy_static! {
    static ref STANDARD_LEXICON: Lexicon = Lexicon::build_standard();
}

impl Lexicon {
    /// The built-in lexicon, constructed once per process.
    pub fn standard() -> &'static Lexicon {
        &STANDARD_LEXICON
    }

    /// Build a lexicon from explicit entries; every category must be present.
    pub fn from_entries(
        entries: BTreeMap<Category, CategoryLexicon>,
    ) -> Result<Self, DiagnosticError> {
        if let Some(missing) = Category::ALL.iter().find(|c| !entries.contains_key(c)) {
            return Err(DiagnosticError::IncompleteLexicon(*missing));
        }
        Ok(Self { entries })
    }

    /// Parse a lexicon override: a JSON object keyed by category key.
    pub fn from_json(json: &str) -> Result<Self, DiagnosticError> {
        let entries: BTreeMap<Category, CategoryLexicon> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> Result<Self, DiagnosticError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn entry(&self, category: Category) -> &CategoryLexicon {
        // from_entries guarantees completeness
        &self.entries[&category]
    }

    /// Entries in category declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryLexicon)> {
        self.entries.iter().map(|(c, l)| (*c, l))
    }

    fn build_standard() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            Category::SignalMetabolism,
            CategoryLexicon::from_static(
                &[
                    "data", "unclear", "confused", "overwhelmed", "too much", "noise", "don't know",
                    "tracking", "metrics", "dashboard", "reporting", "information", "paralysis",
                ],
                &["confused", "overwhelmed", "scattered", "lost", "drowning"],
                &["maybe", "not sure", "complicated", "it's complex"],
                &["eventually", "someday", "when things calm down"],
            ),
        );
        entries.insert(
            Category::OfferMarket,
            CategoryLexicon::from_static(
                &[
                    "market", "audience", "targeting", "messaging", "positioning", "competition",
                    "pricing", "leads", "wrong customers", "fit", "niche", "segment",
                ],
                &["frustrated", "stuck", "invisible", "ignored"],
                &["they don't understand", "wrong audience", "market isn't ready"],
                &["need more research", "testing", "not the right time"],
            ),
        );
        entries.insert(
            Category::OperationalDrift,
            CategoryLexicon::from_static(
                &[
                    "process", "systems", "efficiency", "bottleneck", "slow", "broken",
                    "inefficient",
                    "waste", "redundant", "manual", "workflow", "scale", "capacity",
                ],
                &["exhausted", "burnt out", "grinding", "trapped"],
                &["always been this way", "too busy to fix", "need more resources"],
                &["after this quarter", "when we hire", "temporary situation"],
            ),
        );
        entries.insert(
            Category::TalentCulture,
            CategoryLexicon::from_static(
                &[
                    "team", "people", "culture", "hiring", "retention", "turnover", "morale",
                    "alignment", "communication", "leadership", "politics", "conflict",
                    "resistance",
                ],
                &["frustrated", "disappointed", "alone", "betrayed", "angry"],
                &["they just don't get it", "wrong people", "can't find good talent"],
                &["need better hiring process", "culture takes time", "generational issue"],
            ),
        );
        entries.insert(
            Category::ConversionNarrative,
            CategoryLexicon::from_static(
                &[
                    "conversion", "cart", "abandon", "sales", "funnel", "landing", "traffic",
                    "visitors", "bounce", "engagement", "messaging", "story", "trust", "urgency",
                ],
                &["disappointed", "confused", "powerless"],
                &[
                    "price sensitive market",
                    "competition undercutting",
                    "people don't understand value",
                ],
                &["need more traffic first", "testing messaging", "market education"],
            ),
        );
        Self { entries }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::standard().clone()
    }
}

// Signal dimension word lists consumed by the response analyzer.

/// ASCII digits only; other scripts' numerals are not numeric tokens
pub const NUMERIC_TOKENS: &str = r"[0-9]+|\$|%";

pub const CONCRETE_NOUNS: &[&str] = &[
    "day", "week", "month", "person", "team", "customer", "revenue", "hour", "meeting", "project",
    "client",
];

pub const PASSIVE_INDICATORS: &[&str] = &[
    "was", "were", "been", "being", "can't", "couldn't", "unable", "impossible", "forced",
    "made me", "have to",
];

pub const ACTIVE_INDICATORS: &[&str] = &[
    "i will", "i am", "i did", "i choose", "i decided", "i'm going to", "i created", "i built",
];

pub const PERFORMATIVE_PHRASES: &[&str] =
    &["should", "supposed to", "right thing", "proper", "appropriate"];

pub const GENUINE_EMOTIONS: &[&str] = &[
    "feel", "feeling", "scared", "angry", "frustrated", "excited", "terrified", "hopeful",
];

pub const FUTURE_CUES: &[&str] = &["will", "going to", "plan", "next", "future"];

pub const PAST_CUES: &[&str] = &["was", "were", "had", "previous", "before"];

pub const FEAR_TERMS: &[&str] = &["afraid", "fear", "scared", "anxious", "worry"];

pub const ASPIRATION_TERMS: &[&str] = &["hope", "want", "wish", "dream"];

pub const EXTERNAL_TRIGGERS: &[&str] = &["they", "them", "people", "others", "someone"];

pub const FIRST_PERSON_PRONOUNS: &[&str] = &["i", "me", "my", "mine"];

pub const THIRD_PERSON_PRONOUNS: &[&str] = &["they", "them", "their", "people", "others"];

pub const HEDGES: &[&str] = &[
    "maybe", "might", "probably", "possibly", "not sure", "i think", "kind of", "sort of",
];

pub const DEFERRALS: &[&str] = &[
    "eventually", "someday", "at some point", "one day", "when things", "after",
];

pub const CONTRAST_CONJUNCTIONS: &[&str] = &["but", "however", "although", "though"];

pub const JUSTIFICATION_CUES: &[&str] =
    &["because", "reason", "explain", "understand", "make sense"];

pub const KEY_PHRASE_MARKERS: &[&str] = &["i ", "my ", "me "];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lexicon_covers_every_category() {
        let lexicon = Lexicon::standard();
        let order: Vec<Category> = lexicon.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Category::ALL.to_vec());
        assert!(lexicon.entry(Category::OfferMarket).keywords.contains(&"pricing".to_string()));
    }

    #[test]
    fn test_incomplete_override_is_rejected() {
        let json = r#"{
            "SIGNAL_METABOLISM": {"keywords": ["data"], "emotional": [], "deflection": [], "avoidance": []}
        }"#;
        match Lexicon::from_json(json) {
            Err(DiagnosticError::IncompleteLexicon(missing)) => {
                assert_eq!(missing, Category::OfferMarket)
            }
            other => panic!("expected incomplete lexicon error, got {:?}", other),
        }
    }

    #[test]
    fn test_standard_round_trips_through_json() {
        let json = serde_json::to_string(Lexicon::standard()).unwrap();
        let parsed = Lexicon::from_json(&json).unwrap();
        assert_eq!(&parsed, Lexicon::standard());
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("offer_market".parse::<Category>().unwrap(), Category::OfferMarket);
        assert_eq!("Talent-Culture".parse::<Category>().unwrap(), Category::TalentCulture);
        assert!("unknown".parse::<Category>().is_err());
    }

    #[test]
    fn test_content_codes_are_unique() {
        let mut codes: Vec<&str> = Category::ALL.iter().map(|c| c.content().code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Category::ALL.len());
    }
}
