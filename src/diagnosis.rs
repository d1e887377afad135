// Diagnosis - ranked scores joined with the static category content
use crate::lexicon::{Category, CategoryContent};
use crate::scorer::{CategoryScore, ScoreReport};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisEntry {
    pub category: Category,
    pub confidence: u32,
    pub raw_score: u32,
    pub content: &'static CategoryContent,
}

impl DiagnosisEntry {
    fn from_score(score: &CategoryScore) -> Self {
        Self {
            category: score.key,
            confidence: score.confidence,
            raw_score: score.raw_score,
            content: score.key.content(),
        }
    }
}

/// Primary pattern plus the runner-up categories.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub primary: DiagnosisEntry,
    pub alternatives: Vec<DiagnosisEntry>,
}

impl Diagnosis {
    pub fn from_report(report: &ScoreReport) -> Self {
        let primary = report
            .ranked
            .iter()
            .find(|s| s.key == report.primary)
            .map(DiagnosisEntry::from_score)
            .unwrap_or(DiagnosisEntry {
                category: report.primary,
                confidence: 0,
                raw_score: 0,
                content: report.primary.content(),
            });

        let alternatives = report
            .ranked
            .iter()
            .filter(|s| s.key != report.primary)
            .map(DiagnosisEntry::from_score)
            .collect();

        Self {
            primary,
            alternatives,
        }
    }

    /// Consultant-facing engagement guidance for the primary pattern
    pub fn engagement_approach(&self) -> String {
        let content = self.primary.content;
        format!(
            "Open with acknowledgment of their 90-day commitment. Mirror the obstacle they \
             identified; don't minimize it. Position the diagnosis as pattern recognition, not \
             judgment. Emphasize that the {} is a systems issue, not a personal failure. The \
             pathway ({}) is designed specifically to interrupt the recurring pattern they \
             described. Frame this as inevitability intervention: if nothing changes, the cost \
             compounds exponentially.",
            content.name.to_lowercase(),
            content.pathway
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(key: Category, raw_score: u32) -> CategoryScore {
        CategoryScore {
            key,
            raw_score,
            max_possible: 50,
            confidence: raw_score * 2,
        }
    }

    #[test]
    fn test_primary_and_alternatives() {
        let report = ScoreReport {
            primary: Category::OfferMarket,
            ranked: vec![
                score(Category::OfferMarket, 10),
                score(Category::ConversionNarrative, 4),
                score(Category::SignalMetabolism, 0),
            ],
        };
        let diagnosis = Diagnosis::from_report(&report);
        assert_eq!(diagnosis.primary.category, Category::OfferMarket);
        assert_eq!(diagnosis.primary.confidence, 20);
        assert_eq!(diagnosis.primary.content.code, "PATTERN_OM_002");
        let alts: Vec<_> = diagnosis.alternatives.iter().map(|a| a.category).collect();
        assert_eq!(alts, vec![Category::ConversionNarrative, Category::SignalMetabolism]);
    }

    #[test]
    fn test_engagement_mentions_pathway() {
        let report = ScoreReport {
            primary: Category::OperationalDrift,
            ranked: vec![score(Category::OperationalDrift, 6)],
        };
        let text = Diagnosis::from_report(&report).engagement_approach();
        assert!(text.contains("operational drift"));
        assert!(text.contains("System Integrity + Sustainable Scale"));
    }
}
