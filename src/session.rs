// Session - collecting -> scoring -> diagnosed, with incremental contradiction checks
use crate::contradiction::ContradictionFinding;
use crate::diagnosis::Diagnosis;
use crate::engine::Engine;
use crate::error::DiagnosticError;
use crate::prompts::{self, Domain, Prompt};
use crate::scorer::{CategoryScore, ScoreReport};
use crate::signals::{AnswerMap, BundleMap, PatternTag, SignalBundle, Slot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "phase", content = "slot")]
pub enum Phase {
    Collecting(Slot),
    Scoring,
    Diagnosed,
}

/// What one accepted answer produced
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub slot: Slot,
    pub bundle: SignalBundle,
    pub new_findings: Vec<ContradictionFinding>,
    /// Set when this answer completed the session
    pub diagnosis: Option<Diagnosis>,
}

pub struct Session<'a> {
    engine: &'a Engine,
    domain: Domain,
    started_at: DateTime<Utc>,
    phase: Phase,
    answers: AnswerMap,
    bundles: BundleMap,
    findings: Vec<ContradictionFinding>,
    report: Option<ScoreReport>,
    diagnosis: Option<Diagnosis>,
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a Engine, domain: Domain) -> Self {
        Self {
            engine,
            domain,
            started_at: Utc::now(),
            phase: Phase::Collecting(Slot::Outcome),
            answers: AnswerMap::new(),
            bundles: BundleMap::new(),
            findings: Vec::new(),
            report: None,
            diagnosis: None,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Prompt for the slot awaiting an answer
    pub fn current_prompt(&self) -> Option<Prompt> {
        match self.phase {
            Phase::Collecting(slot) => Some(prompts::prompt(self.domain, slot)),
            _ => None,
        }
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn bundles(&self) -> &BundleMap {
        &self.bundles
    }

    /// Findings in detection order
    pub fn findings(&self) -> &[ContradictionFinding] {
        &self.findings
    }

    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.diagnosis.as_ref()
    }

    /// Accept the answer for the current slot.
    ///
    /// The fourth answer moves the session through scoring to diagnosed.
    pub fn submit(&mut self, text: &str) -> Result<SubmitOutcome, DiagnosticError> {
        let slot = match self.phase {
            Phase::Collecting(slot) => slot,
            _ => return Err(DiagnosticError::SessionComplete),
        };

        let min = self.engine.min_answer_chars();
        let actual = text.trim().chars().count();
        if actual < min {
            return Err(DiagnosticError::AnswerTooShort { slot, min, actual });
        }

        let bundle = self.engine.analyze(text);
        self.answers.insert(slot, text.to_string());
        self.bundles.insert(slot, bundle.clone());

        let new_findings = self
            .engine
            .detect_completed(slot, &self.answers, &self.bundles);
        self.findings.extend(new_findings.iter().cloned());

        let diagnosis = match slot.next() {
            Some(next) => {
                self.phase = Phase::Collecting(next);
                None
            }
            None => Some(self.conclude()),
        };

        Ok(SubmitOutcome {
            slot,
            bundle,
            new_findings,
            diagnosis,
        })
    }

    fn conclude(&mut self) -> Diagnosis {
        self.phase = Phase::Scoring;
        info!("All answers collected, scoring categories");

        let report = self.engine.score_categories(&self.answers, &self.bundles);
        let diagnosis = Diagnosis::from_report(&report);
        self.report = Some(report);
        self.diagnosis = Some(diagnosis.clone());
        self.phase = Phase::Diagnosed;

        info!(
            pattern = diagnosis.primary.content.code,
            confidence = diagnosis.primary.confidence,
            "Session diagnosed"
        );
        diagnosis
    }

    pub fn export(&self) -> SessionExport {
        self.export_at(self.started_at)
    }

    pub fn export_at(&self, timestamp: DateTime<Utc>) -> SessionExport {
        SessionExport {
            timestamp,
            domain: self.domain.name().to_string(),
            responses: self.answers.clone(),
            detected_patterns: self
                .answers
                .iter()
                .map(|(slot, response)| SlotPatterns {
                    question: *slot,
                    response: response.clone(),
                    patterns: self
                        .bundles
                        .get(slot)
                        .map(|b| b.patterns.clone())
                        .unwrap_or_default(),
                })
                .collect(),
            contradictions: self.findings.clone(),
            diagnosis: self.diagnosis.as_ref().map(|d| ExportedDiagnosis {
                pattern: d.primary.content.name.to_string(),
                code: d.primary.content.code.to_string(),
                signature: d.primary.content.signature.to_string(),
                confidence: d.primary.confidence,
            }),
            ranked: self
                .report
                .as_ref()
                .map(|r| r.ranked.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPatterns {
    pub question: Slot,
    pub response: String,
    pub patterns: Vec<PatternTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedDiagnosis {
    pub pattern: String,
    pub code: String,
    pub signature: String,
    pub confidence: u32,
}

/// Self-contained record of a session, suitable for sharing as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub timestamp: DateTime<Utc>,
    pub domain: String,
    pub responses: AnswerMap,
    pub detected_patterns: Vec<SlotPatterns>,
    pub contradictions: Vec<ContradictionFinding>,
    pub diagnosis: Option<ExportedDiagnosis>,
    pub ranked: Vec<CategoryScore>,
}

impl SessionExport {
    pub fn to_json(&self) -> Result<String, DiagnosticError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Suggested export file name
    pub fn file_name(&self) -> String {
        format!("aionos-session-{}.json", self.timestamp.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contradiction::ContradictionKind;
    use crate::lexicon::Category;
    use crate::signals::Specificity;

    const OUTCOME: &str =
        "I will increase revenue by $50k this quarter through 3 new client contracts.";
    const OBSTACLE: &str = "They don't understand my pricing and people keep undercutting me. \
        They copy whatever we launch, they sell it to the same buyers for less, and people \
        believe them because others in the market repeat what they say about us to anyone \
        who will listen.";
    const PATTERN: &str = "I keep underpricing because I'm afraid of losing the deal.";
    const COST: &str = "I'm losing about $10k a month and 2 clients a year.";

    #[test]
    fn test_full_session_flow() {
        let engine = Engine::default();
        let mut session = engine.session(Domain::Business);
        assert_eq!(session.phase(), Phase::Collecting(Slot::Outcome));
        assert_eq!(session.current_prompt().unwrap().layer, "COMMITMENT_LAYER");

        let outcome = session.submit(OUTCOME).unwrap();
        assert_eq!(outcome.bundle.specificity, Specificity::High);
        assert!(outcome.new_findings.is_empty());

        let obstacle = session.submit(OBSTACLE).unwrap();
        assert!(obstacle.bundle.has(PatternTag::ExternalAttribution));
        assert_eq!(obstacle.new_findings.len(), 1);
        assert_eq!(obstacle.new_findings[0].kind, ContradictionKind::CommitmentVsBlame);

        session.submit(PATTERN).unwrap();
        assert_eq!(session.phase(), Phase::Collecting(Slot::Cost));

        let cost = session.submit(COST).unwrap();
        assert!(cost.bundle.has(PatternTag::HighSpecificity));
        assert_eq!(session.phase(), Phase::Diagnosed);

        // earlier findings are kept, not re-emitted
        let kinds: Vec<_> = session.findings().iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![ContradictionKind::CommitmentVsBlame]);

        let report = session.report().unwrap();
        let market_or_narrative = report.ranked.iter().any(|s| {
            let relevant = matches!(s.key, Category::OfferMarket | Category::ConversionNarrative);
            relevant && s.raw_score > 0
        });
        assert!(market_or_narrative);
        assert_eq!(report.primary, Category::OfferMarket);
        assert_eq!(cost.diagnosis.unwrap().primary.category, Category::OfferMarket);
    }

    #[test]
    fn test_short_answer_is_rejected_without_advancing() {
        let engine = Engine::default();
        let mut session = engine.session(Domain::Personal);
        let err = session.submit("   too short   ").unwrap_err();
        assert!(matches!(
            err,
            DiagnosticError::AnswerTooShort {
                slot: Slot::Outcome,
                actual: 9,
                ..
            }
        ));
        assert_eq!(session.phase(), Phase::Collecting(Slot::Outcome));
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_submit_after_diagnosis_fails() {
        let engine = Engine::default();
        let mut session = engine.session(Domain::Health);
        for text in [OUTCOME, OBSTACLE, PATTERN, COST] {
            session.submit(text).unwrap();
        }
        assert!(matches!(
            session.submit(OUTCOME),
            Err(DiagnosticError::SessionComplete)
        ));
        assert!(session.current_prompt().is_none());
    }

    #[test]
    fn test_export_carries_diagnosis() {
        let engine = Engine::default();
        let answers: AnswerMap = [
            (Slot::Outcome, OUTCOME),
            (Slot::Obstacle, OBSTACLE),
            (Slot::Pattern, PATTERN),
            (Slot::Cost, COST),
        ]
        .into_iter()
        .map(|(s, t)| (s, t.to_string()))
        .collect();
        let session = engine.run(Domain::Business, &answers).unwrap();

        let timestamp = DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let export = session.export_at(timestamp);
        assert_eq!(export.domain, "Business / Leadership");
        assert_eq!(export.detected_patterns.len(), 4);
        assert_eq!(export.detected_patterns[0].question, Slot::Outcome);
        assert_eq!(export.diagnosis.as_ref().unwrap().code, "PATTERN_OM_002");
        assert_eq!(export.file_name(), "aionos-session-1735787045000.json");

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["contradictions"][0]["type"], "commitment_vs_blame");
        assert_eq!(json["responses"]["cost"], COST);
    }
}
