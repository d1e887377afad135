// Contradiction Detector - cross-answer inconsistency rules
use crate::signals::{AnswerMap, BundleMap, PatternTag, SignalBundle, Slot};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Characters quoted from a raw answer when it has no key phrase
const FALLBACK_QUOTE_CHARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionKind {
    CommitmentVsBlame,
    DesireVsPowerlessness,
    PatternMinimization,
}

impl ContradictionKind {
    /// Rules in evaluation order
    pub const ALL: [ContradictionKind; 3] = [
        ContradictionKind::CommitmentVsBlame,
        ContradictionKind::DesireVsPowerlessness,
        ContradictionKind::PatternMinimization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContradictionKind::CommitmentVsBlame => "commitment_vs_blame",
            ContradictionKind::DesireVsPowerlessness => "desire_vs_powerlessness",
            ContradictionKind::PatternMinimization => "pattern_minimization",
        }
    }

    /// The two slots a rule compares
    pub fn slots(&self) -> (Slot, Slot) {
        match self {
            ContradictionKind::CommitmentVsBlame | ContradictionKind::DesireVsPowerlessness => {
                (Slot::Outcome, Slot::Obstacle)
            }
            ContradictionKind::PatternMinimization => (Slot::Pattern, Slot::Cost),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ContradictionKind::CommitmentVsBlame => {
                "You claim commitment but blame external factors for your obstacles"
            }
            ContradictionKind::DesireVsPowerlessness => {
                "You want the outcome but frame yourself as powerless to overcome obstacles"
            }
            ContradictionKind::PatternMinimization => {
                "You blame others for the pattern but can't articulate what it actually costs you"
            }
        }
    }

    fn fires(&self, first: &SignalBundle, second: &SignalBundle) -> bool {
        match self {
            ContradictionKind::CommitmentVsBlame => {
                first.has(PatternTag::HighSpecificity)
                    && second.has(PatternTag::ExternalAttribution)
            }
            ContradictionKind::DesireVsPowerlessness => {
                first.has(PatternTag::AspirationDetected)
                    && second.has(PatternTag::PowerlessFraming)
            }
            ContradictionKind::PatternMinimization => {
                first.has(PatternTag::ExternalAttribution)
                    && !second.has(PatternTag::HighSpecificity)
            }
        }
    }
}

/// One detected inconsistency between two answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionFinding {
    #[serde(rename = "type")]
    pub kind: ContradictionKind,
    pub message: String,
    pub quotes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContradictionDetector;

impl ContradictionDetector {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every rule whose two slots are both answered.
    ///
    /// Rules with a missing slot are skipped silently.
    pub fn detect(&self, answers: &AnswerMap, bundles: &BundleMap) -> Vec<ContradictionFinding> {
        ContradictionKind::ALL
            .iter()
            .filter_map(|kind| self.evaluate(*kind, answers, bundles))
            .collect()
    }

    /// Evaluate only the rules completed by filling `slot`.
    ///
    /// Rules whose partner slot is still empty are skipped; they are picked
    /// up later when the partner is filled.
    pub fn detect_completed(
        &self,
        slot: Slot,
        answers: &AnswerMap,
        bundles: &BundleMap,
    ) -> Vec<ContradictionFinding> {
        ContradictionKind::ALL
            .iter()
            .filter(|kind| {
                let (a, b) = kind.slots();
                a == slot || b == slot
            })
            .filter_map(|kind| self.evaluate(*kind, answers, bundles))
            .collect()
    }

    fn evaluate(
        &self,
        kind: ContradictionKind,
        answers: &AnswerMap,
        bundles: &BundleMap,
    ) -> Option<ContradictionFinding> {
        let (first_slot, second_slot) = kind.slots();
        let first_answer = answers.get(&first_slot)?;
        let second_answer = answers.get(&second_slot)?;
        let first = bundles.get(&first_slot)?;
        let second = bundles.get(&second_slot)?;

        if !kind.fires(first, second) {
            return None;
        }

        let quotes = match kind {
            ContradictionKind::CommitmentVsBlame => vec![
                quote(first, first_answer),
                quote(second, second_answer),
            ],
            ContradictionKind::DesireVsPowerlessness => vec![quote(first, first_answer)],
            ContradictionKind::PatternMinimization => Vec::new(),
        };

        debug!(kind = kind.as_str(), "contradiction detected");

        Some(ContradictionFinding {
            kind,
            message: kind.message().to_string(),
            quotes,
        })
    }
}

/// First key phrase, or the opening characters of the raw answer
fn quote(bundle: &SignalBundle, answer: &str) -> String {
    match bundle.first_key_phrase() {
        Some(phrase) => phrase.to_string(),
        None => answer.chars().take(FALLBACK_QUOTE_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::{Agency, Authenticity, Specificity};

    fn bundle(tags: &[PatternTag], phrases: &[&str]) -> SignalBundle {
        SignalBundle {
            patterns: tags.to_vec(),
            key_phrases: phrases.iter().map(|p| p.to_string()).collect(),
            specificity: Specificity::Medium,
            agency: Agency::Mixed,
            authenticity: Authenticity::Neutral,
        }
    }

    fn maps(entries: Vec<(Slot, &str, SignalBundle)>) -> (AnswerMap, BundleMap) {
        let mut answers = AnswerMap::new();
        let mut bundles = BundleMap::new();
        for (slot, text, b) in entries {
            answers.insert(slot, text.to_string());
            bundles.insert(slot, b);
        }
        (answers, bundles)
    }

    #[test]
    fn test_commitment_vs_blame_quotes_both_answers() {
        let (answers, bundles) = maps(vec![
            (
                Slot::Outcome,
                "I will hit 40 new clients",
                bundle(&[PatternTag::HighSpecificity], &["I will hit 40 new clients"]),
            ),
            (
                Slot::Obstacle,
                "x".repeat(100).as_str(),
                bundle(&[PatternTag::ExternalAttribution], &[]),
            ),
        ]);

        let findings = ContradictionDetector::new().detect(&answers, &bundles);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, ContradictionKind::CommitmentVsBlame);
        assert_eq!(findings[0].quotes[0], "I will hit 40 new clients");
        assert_eq!(findings[0].quotes[1], "x".repeat(80));
    }

    #[test]
    fn test_rules_skip_missing_slots() {
        let (answers, bundles) = maps(vec![(
            Slot::Outcome,
            "I will hit 40 new clients",
            bundle(&[PatternTag::HighSpecificity, PatternTag::AspirationDetected], &[]),
        )]);
        assert!(ContradictionDetector::new().detect(&answers, &bundles).is_empty());
    }

    #[test]
    fn test_findings_follow_rule_order() {
        let (answers, bundles) = maps(vec![
            (
                Slot::Outcome,
                "outcome text",
                bundle(&[PatternTag::HighSpecificity, PatternTag::AspirationDetected], &[]),
            ),
            (
                Slot::Obstacle,
                "obstacle text",
                bundle(&[PatternTag::ExternalAttribution, PatternTag::PowerlessFraming], &[]),
            ),
            (Slot::Pattern, "pattern text", bundle(&[PatternTag::ExternalAttribution], &[])),
            (Slot::Cost, "cost text", bundle(&[], &[])),
        ]);

        let kinds: Vec<_> = ContradictionDetector::new()
            .detect(&answers, &bundles)
            .into_iter()
            .map(|f| f.kind)
            .collect();
        assert_eq!(kinds, ContradictionKind::ALL.to_vec());
    }

    #[test]
    fn test_desire_vs_powerlessness_quotes_outcome_only() {
        let (answers, bundles) = maps(vec![
            (
                Slot::Outcome,
                "short",
                bundle(&[PatternTag::AspirationDetected], &[]),
            ),
            (Slot::Obstacle, "obstacle", bundle(&[PatternTag::PowerlessFraming], &[])),
        ]);
        let findings = ContradictionDetector::new().detect(&answers, &bundles);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].quotes, vec!["short".to_string()]);
    }

    #[test]
    fn test_pattern_minimization_suppressed_by_specific_cost() {
        let (answers, bundles) = maps(vec![
            (Slot::Pattern, "pattern", bundle(&[PatternTag::ExternalAttribution], &[])),
            (Slot::Cost, "cost", bundle(&[PatternTag::HighSpecificity], &[])),
        ]);
        assert!(ContradictionDetector::new().detect(&answers, &bundles).is_empty());
    }

    #[test]
    fn test_detect_completed_only_evaluates_new_pairs() {
        let (answers, bundles) = maps(vec![
            (Slot::Outcome, "o", bundle(&[PatternTag::HighSpecificity], &[])),
            (Slot::Obstacle, "b", bundle(&[PatternTag::ExternalAttribution], &[])),
            (Slot::Pattern, "p", bundle(&[], &[])),
        ]);
        let detector = ContradictionDetector::new();
        assert_eq!(detector.detect_completed(Slot::Obstacle, &answers, &bundles).len(), 1);
        // pattern's partner (cost) is still empty, outcome/obstacle already handled
        assert!(detector.detect_completed(Slot::Pattern, &answers, &bundles).is_empty());
    }

    #[test]
    fn test_finding_serializes_type_field() {
        let finding = ContradictionFinding {
            kind: ContradictionKind::PatternMinimization,
            message: ContradictionKind::PatternMinimization.message().to_string(),
            quotes: Vec::new(),
        };
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["type"], "pattern_minimization");
    }
}
