//! Rule-based diagnostic engine: four free-text answers in, one behavioral
//! pattern category out, with the signals and contradictions that led there.
//!
//! The core ([`analyzer`], [`contradiction`], [`scorer`]) is pure and
//! infallible. [`engine::Engine`] wires it to a lexicon and [`session::Session`]
//! drives the four-question flow.

pub mod analyzer;
pub mod config;
pub mod contradiction;
pub mod diagnosis;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod output;
pub mod prompts;
pub mod scorer;
pub mod session;
pub mod signals;

pub use analyzer::{AnalyzerConfig, ResponseAnalyzer};
pub use config::Settings;
pub use contradiction::{ContradictionDetector, ContradictionFinding, ContradictionKind};
pub use diagnosis::Diagnosis;
pub use engine::Engine;
pub use error::DiagnosticError;
pub use lexicon::{Category, Lexicon};
pub use prompts::Domain;
pub use scorer::{CategoryScore, CategoryScorer, ScoreReport};
pub use session::{Session, SessionExport};
pub use signals::{AnswerMap, PatternTag, SignalBundle, Slot};
