// Signal bundle - structured heuristics derived from a single answer
use crate::error::DiagnosticError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Answer slots, filled in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Outcome,
    Obstacle,
    Pattern,
    Cost,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Outcome, Slot::Obstacle, Slot::Pattern, Slot::Cost];

    pub fn id(&self) -> &'static str {
        match self {
            Slot::Outcome => "outcome",
            Slot::Obstacle => "obstacle",
            Slot::Pattern => "pattern",
            Slot::Cost => "cost",
        }
    }

    /// Zero-based position in the collection order
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<Slot> {
        Slot::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Slot {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "outcome" => Ok(Slot::Outcome),
            "obstacle" => Ok(Slot::Obstacle),
            "pattern" => Ok(Slot::Pattern),
            "cost" => Ok(Slot::Cost),
            _ => Err(DiagnosticError::UnknownSlot(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Specificity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agency {
    Passive,
    Active,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authenticity {
    Performative,
    Authentic,
    Neutral,
}

/// Fixed vocabulary of heuristic tags an answer can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternTag {
    VagueNarrative,
    HighSpecificity,
    PowerlessFraming,
    AgencyClaimed,
    PerformativeResponse,
    AuthenticEmotion,
    FutureOriented,
    PastAnchored,
    FearDetected,
    AspirationDetected,
    ExternalAttribution,
    UncertaintyMarkers,
    TemporalAvoidance,
    SelfContradiction,
    OverExplaining,
}

impl PatternTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternTag::VagueNarrative => "vague_narrative",
            PatternTag::HighSpecificity => "high_specificity",
            PatternTag::PowerlessFraming => "powerless_framing",
            PatternTag::AgencyClaimed => "agency_claimed",
            PatternTag::PerformativeResponse => "performative_response",
            PatternTag::AuthenticEmotion => "authentic_emotion",
            PatternTag::FutureOriented => "future_oriented",
            PatternTag::PastAnchored => "past_anchored",
            PatternTag::FearDetected => "fear_detected",
            PatternTag::AspirationDetected => "aspiration_detected",
            PatternTag::ExternalAttribution => "external_attribution",
            PatternTag::UncertaintyMarkers => "uncertainty_markers",
            PatternTag::TemporalAvoidance => "temporal_avoidance",
            PatternTag::SelfContradiction => "self_contradiction",
            PatternTag::OverExplaining => "over_explaining",
        }
    }

    /// Confrontational one-liner shown while the user is still typing
    pub fn callout(&self) -> String {
        match self {
            PatternTag::ExternalAttribution => "You're blaming others".to_string(),
            PatternTag::TemporalAvoidance => "You're postponing action".to_string(),
            PatternTag::PowerlessFraming => "You're claiming helplessness".to_string(),
            PatternTag::SelfContradiction => "Your answer contradicts itself".to_string(),
            PatternTag::OverExplaining => "You're rationalizing, not answering".to_string(),
            other => other.as_str().replace('_', " "),
        }
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers keyed by slot; iteration follows slot order.
pub type AnswerMap = BTreeMap<Slot, String>;

/// Signal bundles keyed by slot.
pub type BundleMap = BTreeMap<Slot, SignalBundle>;

/// Everything the analyzer derives from one answer.
///
/// `patterns` holds each tag at most once, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub patterns: Vec<PatternTag>,
    pub key_phrases: Vec<String>,
    pub specificity: Specificity,
    pub agency: Agency,
    pub authenticity: Authenticity,
}

impl SignalBundle {
    pub fn has(&self, tag: PatternTag) -> bool {
        self.patterns.contains(&tag)
    }

    pub fn first_key_phrase(&self) -> Option<&str> {
        self.key_phrases.first().map(String::as_str)
    }

    /// Callouts for the first `limit` tags
    pub fn callouts(&self, limit: usize) -> Vec<String> {
        self.patterns.iter().take(limit).map(|t| t.callout()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_order() {
        assert_eq!(Slot::Outcome.next(), Some(Slot::Obstacle));
        assert_eq!(Slot::Cost.next(), None);
        assert_eq!(Slot::Pattern.index(), 2);
        assert_eq!("COST".parse::<Slot>().unwrap(), Slot::Cost);
        assert!("feelings".parse::<Slot>().is_err());
    }

    #[test]
    fn test_callouts() {
        assert_eq!(PatternTag::ExternalAttribution.callout(), "You're blaming others");
        assert_eq!(PatternTag::FearDetected.callout(), "fear detected");
    }

    #[test]
    fn test_tag_serializes_as_snake_case() {
        let json = serde_json::to_string(&PatternTag::HighSpecificity).unwrap();
        assert_eq!(json, "\"high_specificity\"");
        for tag in [PatternTag::OverExplaining, PatternTag::UncertaintyMarkers] {
            assert_eq!(serde_json::to_string(&tag).unwrap(), format!("\"{}\"", tag.as_str()));
        }
    }
}
