// Agent-friendly CLI output: colored for terminals, plain for pipes, JSON for tools
use crate::contradiction::ContradictionFinding;
use crate::diagnosis::Diagnosis;
use crate::lexicon::Lexicon;
use crate::prompts::{self, Domain, Prompt};
use crate::signals::{AnswerMap, SignalBundle};
use colored::Colorize;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::Table;
use serde::Serialize;
use std::io::{self, IsTerminal};

/// Callouts shown per live preview
pub const MAX_CALLOUTS: usize = 3;

/// Output mode for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colors and symbols
    Human,
    /// One JSON document per command
    Json,
    /// No colors (for pipes/logs)
    Plain,
}

impl OutputMode {
    /// Auto-detect output mode based on environment
    pub fn auto() -> Self {
        if std::env::var("AIONOS_JSON").is_ok() {
            Self::Json
        } else if !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Human
        }
    }

    /// Explicit flags win over detection
    pub fn from_flags(json: bool, plain: bool) -> Self {
        if json {
            Self::Json
        } else if plain {
            Self::Plain
        } else {
            Self::auto()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum EventLevel {
    Success,
    Warning,
}

/// Status line emitted in JSON mode
#[derive(Debug, Clone, Serialize)]
struct Event<'a> {
    level: EventLevel,
    message: &'a str,
}

/// CLI output writer with mode awareness
pub struct OutputWriter {
    mode: OutputMode,
}

impl OutputWriter {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        match self.mode {
            OutputMode::Human => {
                println!();
                println!("{}", title.cyan().bold());
                println!("{}", "═".repeat(title.chars().count()).cyan());
            }
            OutputMode::Plain => {
                println!();
                println!("{}", title);
                println!("{}", "=".repeat(title.chars().count()));
            }
            OutputMode::Json => {}
        }
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "✓".green(), message),
            OutputMode::Plain => println!("  [OK] {}", message),
            OutputMode::Json => self.emit_event(EventLevel::Success, message),
        }
    }

    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Human => println!("  {} {}", "⚠".yellow(), message),
            OutputMode::Plain => println!("  [WARN] {}", message),
            OutputMode::Json => self.emit_event(EventLevel::Warning, message),
        }
    }

    pub fn info(&self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Plain => println!("  {}", message),
            OutputMode::Json => {}
        }
    }

    pub fn metric(&self, label: &str, value: &str) {
        match self.mode {
            OutputMode::Human => println!("    • {}: {}", label, value.green()),
            OutputMode::Plain => println!("    - {}: {}", label, value),
            OutputMode::Json => {}
        }
    }

    /// Print a key-value table
    pub fn table(&self, rows: &[(&str, String)]) {
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        match self.mode {
            OutputMode::Human => {
                for (key, value) in rows {
                    println!("  {:width$} │ {}", key.yellow(), value, width = width);
                }
            }
            OutputMode::Plain => {
                for (key, value) in rows {
                    println!("  {:width$} : {}", key, value, width = width);
                }
            }
            OutputMode::Json => {}
        }
    }

    fn emit_event(&self, level: EventLevel, message: &str) {
        if let Ok(json) = serde_json::to_string(&Event { level, message }) {
            eprintln!("{}", json);
        }
    }

    /// Final structured result (JSON mode only)
    pub fn emit<T: Serialize>(&self, value: &T) -> Result<(), serde_json::Error> {
        if self.is_json() {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }

    /// Question, placeholder and check-in for the slot being asked
    pub fn prompt(&self, prompt: &Prompt) {
        if self.is_json() {
            return;
        }
        self.section(&format!("[{}] {}", prompt.slot.index() + 1, prompt.layer));
        match self.mode {
            OutputMode::Human => {
                println!("  {}", prompt.system_prompt.dimmed());
                println!("  {}", prompt.somatic_prompt.italic());
                println!();
                println!("  {}", prompt.question.bold());
                println!("  {}", prompt.placeholder.dimmed());
            }
            _ => {
                println!("  {}", prompt.system_prompt);
                println!("  {}", prompt.somatic_prompt);
                println!();
                println!("  {}", prompt.question);
                println!("  ({})", prompt.placeholder);
            }
        }
    }

    /// Signal summary for one answer
    pub fn bundle(&self, bundle: &SignalBundle) {
        let tags = if bundle.patterns.is_empty() {
            "none".to_string()
        } else {
            bundle
                .patterns
                .iter()
                .map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        self.table(&[
            ("specificity", format!("{:?}", bundle.specificity).to_lowercase()),
            ("agency", format!("{:?}", bundle.agency).to_lowercase()),
            ("authenticity", format!("{:?}", bundle.authenticity).to_lowercase()),
            ("patterns", tags),
        ]);
        for phrase in &bundle.key_phrases {
            self.metric("key phrase", &format!("\"{}\"", phrase));
        }
    }

    /// Confrontation lines for the leading tags of a draft
    pub fn callouts(&self, bundle: &SignalBundle) {
        for callout in bundle.callouts(MAX_CALLOUTS) {
            self.warning(&callout);
        }
    }

    pub fn findings(&self, findings: &[ContradictionFinding]) {
        if findings.is_empty() || self.is_json() {
            return;
        }
        self.section("CONTRADICTIONS FOUND");
        for finding in findings {
            match self.mode {
                OutputMode::Human => println!("  {} {}", "⚠".red(), finding.message.red()),
                _ => println!("  [!] {}", finding.message),
            }
            for quote in &finding.quotes {
                println!("      \"{}\"", quote);
            }
        }
    }

    pub fn diagnosis(&self, diagnosis: &Diagnosis) {
        if self.is_json() {
            return;
        }
        let content = diagnosis.primary.content;
        self.section("YOUR PATTERN");
        match self.mode {
            OutputMode::Human => println!("  {}", content.name.red().bold()),
            _ => println!("  {}", content.name),
        }
        self.table(&[
            ("code", content.code.to_string()),
            ("confidence", format!("{}%", diagnosis.primary.confidence)),
            ("signature", content.signature.to_string()),
            ("pathway", content.pathway.to_string()),
        ]);

        self.section("WHAT YOU'RE AVOIDING");
        self.info(content.description);
        self.section("YOUR PATTERN IN ACTION");
        self.info(content.avoidance);
        self.section("COST OF STAYING HERE");
        self.info(content.cost);

        if !diagnosis.alternatives.is_empty() {
            self.section("ALSO PRESENT");
            for alt in &diagnosis.alternatives {
                self.metric(
                    alt.content.name,
                    &format!("{}% ({})", alt.confidence, alt.content.code),
                );
            }
        }
    }

    /// Category reference table
    pub fn categories(&self, lexicon: &Lexicon) {
        if self.is_json() {
            return;
        }
        println!("{}", categories_table(lexicon, self.mode));
    }
}

/// Reference table of categories with their content and lexicon size
pub fn categories_table(lexicon: &Lexicon, mode: OutputMode) -> Table {
    let mut table = Table::new();
    let preset = match mode {
        OutputMode::Human => UTF8_FULL,
        _ => ASCII_FULL,
    };
    table
        .load_preset(preset)
        .set_header(vec!["Category", "Code", "Pathway", "Signature", "Terms"]);

    for (category, entry) in lexicon.iter() {
        let content = category.content();
        let terms = entry.keywords.len()
            + entry.emotional.len()
            + entry.deflection.len()
            + entry.avoidance.len();
        table.add_row(vec![
            content.name.to_string(),
            content.code.to_string(),
            content.pathway.to_string(),
            content.signature.to_string(),
            terms.to_string(),
        ]);
    }
    table
}

/// Consultant-facing write-up of a diagnosed session
pub fn consultant_brief(domain: Domain, answers: &AnswerMap, diagnosis: &Diagnosis) -> String {
    let content = diagnosis.primary.content;
    let mut brief = String::new();

    brief.push_str("DIAGNOSTIC BRIEF\n");
    brief.push_str(&format!("Domain: {}\n\n", domain.name()));

    brief.push_str("IDENTIFIED PATTERN\n");
    brief.push_str(&format!("{}\n", content.name));
    brief.push_str(&format!("Pattern ID: {}\n", content.code));
    brief.push_str(&format!("Signature: {}\n\n", content.signature));

    brief.push_str("EXTRACTED SIGNALS (RAW DATA)\n");
    for prompt in prompts::prompts(domain) {
        brief.push_str(&format!("[{}]\n", prompt.layer));
        brief.push_str(&format!("  {}\n", prompt.question));
        let answer = answers.get(&prompt.slot).map(String::as_str).unwrap_or("");
        brief.push_str(&format!("  > {}\n", answer));
    }
    brief.push('\n');

    brief.push_str("RECOMMENDED ENGAGEMENT APPROACH\n");
    brief.push_str(&diagnosis.engagement_approach());
    brief.push_str("\n\n");

    brief.push_str("SUGGESTED INTERVENTION PACKAGE\n");
    brief.push_str(&format!("{}\n", content.pathway));
    brief.push_str("90-day intensive engagement protocol\n");
    brief
}
