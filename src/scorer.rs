// Category Scorer - weighted lexicon hits across all answers, ranked by raw score
use crate::lexicon::{Category, CategoryLexicon, Lexicon};
use crate::signals::{Agency, AnswerMap, BundleMap, PatternTag};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const KEYWORD_WEIGHT: u32 = 2;
pub const EMOTIONAL_WEIGHT: u32 = 3;
pub const DEFLECTION_WEIGHT: u32 = 2;
pub const AVOIDANCE_WEIGHT: u32 = 2;

/// Bonus per answer carrying `self_contradiction`
pub const CONTRADICTION_BONUS: u32 = 5;
/// Bonus per answer with passive agency
pub const PASSIVE_BONUS: u32 = 3;

/// Number of ranked categories returned
pub const RANKED_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub key: Category,
    pub raw_score: u32,
    pub max_possible: u32,
    /// Percentage 0-100 of `max_possible` matched
    pub confidence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub primary: Category,
    /// Top categories, highest raw score first
    pub ranked: Vec<CategoryScore>,
}

/// Scores categories against an injected lexicon.
#[derive(Debug, Clone)]
pub struct CategoryScorer {
    lexicon: Arc<Lexicon>,
}

impl CategoryScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score every category and rank them.
    ///
    /// Matching is plain substring containment on the lowercased blob, so
    /// short terms also hit inside longer words ("team" in "steamroller").
    pub fn score(&self, answers: &AnswerMap, bundles: &BundleMap) -> ScoreReport {
        let blob = answers
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let contradictions = bundles
            .values()
            .filter(|b| b.has(PatternTag::SelfContradiction))
            .count() as u32;
        let passive = bundles
            .values()
            .filter(|b| b.agency == Agency::Passive)
            .count() as u32;
        let bonus = CONTRADICTION_BONUS * contradictions + PASSIVE_BONUS * passive;

        let mut scores: Vec<CategoryScore> = self
            .lexicon
            .iter()
            .map(|(category, entry)| {
                let (mut raw_score, mut max_possible) = lexicon_hits(entry, &blob);
                if raw_score > 0 {
                    raw_score += bonus;
                    max_possible += bonus;
                }
                debug!(
                    category = category.key(),
                    raw_score, max_possible, "category scored"
                );
                CategoryScore {
                    key: category,
                    raw_score,
                    max_possible,
                    confidence: confidence(raw_score, max_possible),
                }
            })
            .collect();

        // stable: equal raw scores keep declaration order
        scores.sort_by(|a, b| b.raw_score.cmp(&a.raw_score));

        let primary = match scores.first() {
            Some(top) if top.raw_score > 0 => top.key,
            _ => Category::DEFAULT,
        };
        scores.truncate(RANKED_LIMIT);

        info!(primary = primary.key(), "diagnosis scored");

        ScoreReport {
            primary,
            ranked: scores,
        }
    }
}

impl Default for CategoryScorer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

/// (matched weight, possible weight) for one category's term lists
fn lexicon_hits(entry: &CategoryLexicon, blob: &str) -> (u32, u32) {
    let lists = [
        (&entry.keywords, KEYWORD_WEIGHT),
        (&entry.emotional, EMOTIONAL_WEIGHT),
        (&entry.deflection, DEFLECTION_WEIGHT),
        (&entry.avoidance, AVOIDANCE_WEIGHT),
    ];

    let mut raw = 0;
    let mut max = 0;
    for (terms, weight) in lists {
        for term in terms {
            max += weight;
            if blob.contains(term.to_lowercase().as_str()) {
                raw += weight;
            }
        }
    }
    (raw, max)
}

/// round(100 * raw / max), halves rounding up; 0 when nothing is possible
pub fn confidence(raw_score: u32, max_possible: u32) -> u32 {
    if max_possible == 0 {
        return 0;
    }
    (200 * raw_score + max_possible) / (2 * max_possible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ResponseAnalyzer;
    use crate::signals::{SignalBundle, Slot};
    use std::collections::BTreeMap;

    fn scorer() -> CategoryScorer {
        CategoryScorer::default()
    }

    fn session(texts: &[(Slot, &str)]) -> (AnswerMap, BundleMap) {
        let analyzer = ResponseAnalyzer::new();
        let answers: AnswerMap = texts.iter().map(|(s, t)| (*s, t.to_string())).collect();
        let bundles: BundleMap = answers
            .iter()
            .map(|(s, t)| (*s, analyzer.analyze(t)))
            .collect();
        (answers, bundles)
    }

    fn score_of(report: &ScoreReport, category: Category) -> Option<&CategoryScore> {
        report.ranked.iter().find(|s| s.key == category)
    }

    #[test]
    fn test_confidence_rounding() {
        assert_eq!(confidence(0, 0), 0);
        assert_eq!(confidence(1, 3), 33);
        assert_eq!(confidence(2, 3), 67);
        assert_eq!(confidence(1, 8), 13); // 12.5 rounds up
        assert_eq!(confidence(5, 5), 100);
    }

    #[test]
    fn test_no_overlap_defaults_to_first_category() {
        let (answers, bundles) = session(&[(Slot::Outcome, "Zzz qqq xyz vvv")]);
        let report = scorer().score(&answers, &bundles);
        assert_eq!(report.primary, Category::SignalMetabolism);
        assert_eq!(report.ranked.len(), RANKED_LIMIT);
        assert!(report.ranked.iter().all(|s| s.raw_score == 0 && s.confidence == 0));
        let order: Vec<_> = report.ranked.iter().map(|s| s.key).collect();
        assert_eq!(order, Category::ALL[..3].to_vec());
    }

    #[test]
    fn test_substring_match_counts_inside_words() {
        let (answers, bundles) = session(&[(Slot::Outcome, "A steamroller of a quarter")]);
        let report = scorer().score(&answers, &bundles);
        assert_eq!(report.primary, Category::TalentCulture);
        let talent = score_of(&report, Category::TalentCulture).unwrap();
        assert_eq!(talent.raw_score, KEYWORD_WEIGHT);
    }

    #[test]
    fn test_equal_scores_keep_declaration_order() {
        // "pricing" (OFFER_MARKET) and "funnel" (CONVERSION_NARRATIVE) score 2 each
        let (answers, bundles) = session(&[(Slot::Outcome, "Pricing and the funnel")]);
        let report = scorer().score(&answers, &bundles);
        assert_eq!(report.ranked[0].key, Category::OfferMarket);
        assert_eq!(report.ranked[1].key, Category::ConversionNarrative);
        assert_eq!(report.primary, Category::OfferMarket);
    }

    #[test]
    fn test_bonus_only_applies_to_matching_categories() {
        let passive = SignalBundle {
            agency: Agency::Passive,
            patterns: vec![PatternTag::PowerlessFraming, PatternTag::SelfContradiction],
            ..ResponseAnalyzer::new().analyze("")
        };
        let mut answers = AnswerMap::new();
        answers.insert(Slot::Outcome, "the pricing".to_string());
        let mut bundles = BTreeMap::new();
        bundles.insert(Slot::Outcome, passive);

        let report = scorer().score(&answers, &bundles);
        let offer = score_of(&report, Category::OfferMarket).unwrap();
        let offer_max = 2 * 12 + 3 * 4 + 2 * 3 + 2 * 3;
        assert_eq!(offer.raw_score, KEYWORD_WEIGHT + CONTRADICTION_BONUS + PASSIVE_BONUS);
        assert_eq!(offer.max_possible, offer_max + CONTRADICTION_BONUS + PASSIVE_BONUS);

        let untouched = score_of(&report, Category::SignalMetabolism).unwrap();
        assert_eq!(untouched.raw_score, 0);
        assert_eq!(untouched.max_possible, 2 * 13 + 3 * 5 + 2 * 4 + 2 * 3);
    }

    #[test]
    fn test_adding_keyword_never_lowers_score() {
        let base = [(Slot::Outcome, "We keep missing the market on this launch")];
        let more = [(Slot::Outcome, "We keep missing the market on this launch and pricing")];
        let (a1, b1) = session(&base);
        let (a2, b2) = session(&more);
        let before = score_of(&scorer().score(&a1, &b1), Category::OfferMarket).unwrap().raw_score;
        let after = score_of(&scorer().score(&a2, &b2), Category::OfferMarket).unwrap().raw_score;
        assert!(after >= before);
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let (answers, bundles) = session(&[
            (Slot::Outcome, "I want our team to fix the broken workflow"),
            (Slot::Obstacle, "The process is slow and I feel exhausted"),
        ]);
        let first = scorer().score(&answers, &bundles);
        let second = scorer().score(&answers, &bundles);
        assert_eq!(first, second);
        assert_eq!(first.primary, Category::OperationalDrift);
    }
}
