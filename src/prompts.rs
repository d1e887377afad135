// Prompt tables - question text per life domain and answer slot.
// Pure data; nothing here feeds the scoring core.
use crate::error::DiagnosticError;
use crate::signals::Slot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Domain {
    #[default]
    Business,
    Personal,
    Health,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Business, Domain::Personal, Domain::Health];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Business => "Business / Leadership",
            Domain::Personal => "Personal / Relationships",
            Domain::Health => "Health / Habits",
        }
    }

    pub fn context_words(&self) -> &'static [&'static str] {
        match self {
            Domain::Business => &[
                "revenue", "team", "growth", "scale", "market", "client", "employee", "operations",
                "sales", "strategy",
            ],
            Domain::Personal => &[
                "relationship", "partner", "family", "dating", "marriage", "friendship",
                "connection", "intimacy", "trust", "boundaries",
            ],
            Domain::Health => &[
                "weight", "exercise", "diet", "sleep", "energy", "fitness", "habit", "health",
                "body", "wellness",
            ],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" | "leadership" => Ok(Domain::Business),
            "personal" | "relationships" => Ok(Domain::Personal),
            "health" | "habits" => Ok(Domain::Health),
            _ => Err(DiagnosticError::UnknownDomain(s.to_string())),
        }
    }
}

/// Everything shown to the user for one slot.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Prompt {
    pub slot: Slot,
    pub layer: &'static str,
    pub question: &'static str,
    pub placeholder: &'static str,
    pub system_prompt: &'static str,
    pub somatic_prompt: &'static str,
}

pub fn prompt(domain: Domain, slot: Slot) -> Prompt {
    let (layer, question, system_prompt, somatic_prompt) = match slot {
        Slot::Outcome => (
            "COMMITMENT_LAYER",
            "What outcome are you actually committed to? Not what you think you should want, but what your body knows you need.",
            "ANALYZING: Authentic commitment vs. performative goals...",
            "Before answering: Take three breaths. What sensations are present in your chest and gut right now? If you feel nothing, that's the first problem.",
        ),
        Slot::Obstacle => (
            "OBSTACLE_SUBSTRATE",
            "What's the real obstacle? Not the story you tell others, but the truth you avoid saying out loud.",
            "DETECTING: External blame vs. internal accountability...",
            "Notice where you feel resistance in your body as you read this question. If you want to skip this, ask yourself why.",
        ),
        Slot::Pattern => (
            "PATTERN_MEMORY",
            "What pattern keeps repeating because you're choosing it, even if unconsciously?",
            "SCANNING: Agency denial and responsibility avoidance...",
            "If this pattern had a physical location in your body, where would it live? What does it feel like? Don't intellectualize. Feel it.",
        ),
        Slot::Cost => (
            "CONSEQUENCE_MATRIX",
            "If nothing changes, what does staying in this pattern actually cost you? Not theory. The real price you're paying right now.",
            "CALCULATING: Real cost vs. minimized cost...",
            "As you consider this cost, notice what happens in your body. Contraction? Expansion? Numbness? Whatever you feel, that's the truth.",
        ),
    };

    Prompt {
        slot,
        layer,
        question,
        placeholder: placeholder(domain, slot),
        system_prompt,
        somatic_prompt,
    }
}

fn placeholder(domain: Domain, slot: Slot) -> &'static str {
    match (domain, slot) {
        (_, Slot::Outcome) => "If you write something vague, the system will call you out...",
        (_, Slot::Obstacle) => "If you blame someone else, the system will detect it...",
        (_, Slot::Pattern) => "No victim story. What's YOUR role in keeping this alive?",
        (Domain::Business, Slot::Cost) => "Revenue, people, time. Put a number on it...",
        (Domain::Personal, Slot::Cost) => "Who pays for this besides you? Name them...",
        (Domain::Health, Slot::Cost) => "What is your body already telling you this costs?",
    }
}

/// All four prompts for a domain, in slot order
pub fn prompts(domain: Domain) -> Vec<Prompt> {
    Slot::ALL.iter().map(|slot| prompt(domain, *slot)).collect()
}
