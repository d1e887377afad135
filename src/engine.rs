// Engine - the in-process call surface consumed by a presentation layer
use crate::analyzer::{AnalyzerConfig, ResponseAnalyzer};
use crate::config::{Settings, MIN_ANSWER_CHARS, PREVIEW_CHARS};
use crate::contradiction::{ContradictionDetector, ContradictionFinding};
use crate::error::DiagnosticError;
use crate::lexicon::Lexicon;
use crate::prompts::Domain;
use crate::scorer::{CategoryScorer, ScoreReport};
use crate::session::Session;
use crate::signals::{AnswerMap, BundleMap, SignalBundle, Slot};
use std::sync::Arc;

/// Analyzer, detector and scorer wired to one immutable lexicon.
#[derive(Debug, Clone)]
pub struct Engine {
    analyzer: ResponseAnalyzer,
    detector: ContradictionDetector,
    scorer: CategoryScorer,
    min_answer_chars: usize,
    preview_chars: usize,
}

impl Engine {
    pub fn new(lexicon: Arc<Lexicon>, analyzer: AnalyzerConfig) -> Self {
        Self {
            analyzer: ResponseAnalyzer::with_config(analyzer),
            detector: ContradictionDetector::new(),
            scorer: CategoryScorer::new(lexicon),
            min_answer_chars: MIN_ANSWER_CHARS,
            preview_chars: PREVIEW_CHARS,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, DiagnosticError> {
        let mut engine = Self::new(settings.lexicon()?, settings.analyzer.clone());
        engine.min_answer_chars = settings.min_answer_chars;
        engine.preview_chars = settings.preview_chars;
        Ok(engine)
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.scorer.lexicon()
    }

    pub fn min_answer_chars(&self) -> usize {
        self.min_answer_chars
    }

    pub fn analyze(&self, text: &str) -> SignalBundle {
        self.analyzer.analyze(text)
    }

    /// Live analysis while typing; `None` until the draft is long enough
    pub fn preview(&self, draft: &str) -> Option<SignalBundle> {
        if draft.chars().count() > self.preview_chars {
            Some(self.analyzer.analyze(draft))
        } else {
            None
        }
    }

    pub fn detect_contradictions(
        &self,
        answers: &AnswerMap,
        bundles: &BundleMap,
    ) -> Vec<ContradictionFinding> {
        self.detector.detect(answers, bundles)
    }

    pub(crate) fn detect_completed(
        &self,
        slot: Slot,
        answers: &AnswerMap,
        bundles: &BundleMap,
    ) -> Vec<ContradictionFinding> {
        self.detector.detect_completed(slot, answers, bundles)
    }

    pub fn score_categories(&self, answers: &AnswerMap, bundles: &BundleMap) -> ScoreReport {
        self.scorer.score(answers, bundles)
    }

    pub fn session(&self, domain: Domain) -> Session<'_> {
        Session::new(self, domain)
    }

    /// Feed a complete answer set through a fresh session, in slot order
    pub fn run(&self, domain: Domain, answers: &AnswerMap) -> Result<Session<'_>, DiagnosticError> {
        let missing: Vec<Slot> = Slot::ALL
            .iter()
            .copied()
            .filter(|slot| !answers.contains_key(slot))
            .collect();
        if !missing.is_empty() {
            return Err(DiagnosticError::SessionIncomplete { missing });
        }

        let mut session = self.session(domain);
        for text in answers.values() {
            session.submit(text)?;
        }
        Ok(session)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()), AnalyzerConfig::default())
    }
}
