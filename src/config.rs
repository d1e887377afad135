// Settings - optional JSON config file layered over the fixed defaults
use crate::analyzer::AnalyzerConfig;
use crate::error::DiagnosticError;
use crate::lexicon::Lexicon;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Orchestrator-level answer gating, in characters
pub const MIN_ANSWER_CHARS: usize = 20;
pub const PREVIEW_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Replacement category lexicon (JSON keyed by category)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexicon: Option<PathBuf>,
    /// Trimmed answers shorter than this are rejected on submit
    pub min_answer_chars: usize,
    /// Live previews start once an answer is longer than this
    pub preview_chars: usize,
    pub analyzer: AnalyzerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lexicon: None,
            min_answer_chars: MIN_ANSWER_CHARS,
            preview_chars: PREVIEW_CHARS,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Settings {
    /// Load from an explicit path, or from the default location if present.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, DiagnosticError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, DiagnosticError> {
        debug!("Loading settings from {}", path.display());
        let content = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&content)?;

        // lexicon paths are relative to the settings file
        if let (Some(lexicon), Some(parent)) = (settings.lexicon.as_ref(), path.parent()) {
            if lexicon.is_relative() {
                settings.lexicon = Some(parent.join(lexicon));
            }
        }
        Ok(settings)
    }

    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|dir| dir.join("aionos").join("config.json"))
    }

    /// The configured lexicon, or the built-in one
    pub fn lexicon(&self) -> Result<Arc<Lexicon>, DiagnosticError> {
        match &self.lexicon {
            Some(path) => {
                debug!("Loading lexicon override from {}", path.display());
                Ok(Arc::new(Lexicon::load(path)?))
            }
            None => Ok(Arc::new(Lexicon::standard().clone())),
        }
    }
}
