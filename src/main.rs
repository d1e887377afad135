use aionos::output::{consultant_brief, OutputMode, OutputWriter, MAX_CALLOUTS};
use aionos::{AnswerMap, DiagnosticError, Domain, Engine, Session, Settings, Slot};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "aionos")]
#[command(about = "Diagnose the behavioral pattern behind four honest answers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Plain text output without colors
    #[arg(long, global = true, conflicts_with = "json")]
    plain: bool,

    /// Settings file (default: <config dir>/aionos/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signals detected in a single answer
    Analyze {
        /// Answer text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Diagnose a complete set of answers non-interactively
    Diagnose {
        /// JSON file with "outcome", "obstacle", "pattern" and "cost" keys
        #[arg(short, long)]
        answers: Option<PathBuf>,

        /// What outcome are you actually committed to?
        #[arg(long)]
        outcome: Option<String>,

        /// What's the real obstacle?
        #[arg(long)]
        obstacle: Option<String>,

        /// What pattern keeps repeating?
        #[arg(long)]
        pattern: Option<String>,

        /// What does staying in this pattern cost you?
        #[arg(long)]
        cost: Option<String>,

        /// Life domain (business, personal, health)
        #[arg(short, long, default_value = "business")]
        domain: Domain,

        /// Write the session record as JSON (file or directory)
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print the consultant brief
        #[arg(long)]
        brief: bool,
    },

    /// Answer the four questions interactively
    Session {
        /// Life domain (business, personal, health)
        #[arg(short, long, default_value = "business")]
        domain: Domain,

        /// Write the session record as JSON (file or directory)
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print the consultant brief
        #[arg(long)]
        brief: bool,
    },

    /// List the diagnosis categories
    Categories,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins when set
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let out = OutputWriter::new(OutputMode::from_flags(cli.json, cli.plain));
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let engine = Engine::from_settings(&settings).context("Failed to build diagnostic engine")?;

    match cli.command {
        Commands::Analyze { text } => {
            let text = text.join(" ");
            let bundle = engine.analyze(&text);
            let callouts = bundle.callouts(MAX_CALLOUTS);

            if out.is_json() {
                out.emit(&json!({ "bundle": bundle, "callouts": callouts }))?;
            } else {
                out.section("SIGNALS");
                out.bundle(&bundle);
                if !callouts.is_empty() {
                    out.section("CALLOUTS");
                    out.callouts(&bundle);
                }
            }
            Ok(())
        }

        Commands::Diagnose {
            answers,
            outcome,
            obstacle,
            pattern,
            cost,
            domain,
            export,
            brief,
        } => {
            let mut map = match answers {
                Some(path) => load_answers(&path)?,
                None => AnswerMap::new(),
            };
            for (slot, text) in [
                (Slot::Outcome, outcome),
                (Slot::Obstacle, obstacle),
                (Slot::Pattern, pattern),
                (Slot::Cost, cost),
            ] {
                if let Some(text) = text {
                    map.insert(slot, text);
                }
            }

            info!("Diagnosing {} answers in {}", map.len(), domain);
            let session = engine.run(domain, &map)?;
            finish(&session, &out, export.as_deref(), brief)
        }

        Commands::Session {
            domain,
            export,
            brief,
        } => {
            let session = run_interactive(&engine, domain, &out)?;
            finish(&session, &out, export.as_deref(), brief)
        }

        Commands::Categories => {
            if out.is_json() {
                let categories: Vec<_> = engine
                    .lexicon()
                    .iter()
                    .map(|(category, entry)| {
                        json!({
                            "key": category,
                            "content": category.content(),
                            "lexicon": entry,
                        })
                    })
                    .collect();
                out.emit(&categories)?;
            } else {
                out.section("DIAGNOSIS CATEGORIES");
                out.categories(engine.lexicon());
            }
            Ok(())
        }
    }
}

fn load_answers(path: &Path) -> Result<AnswerMap> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    let answers: AnswerMap = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse answers file {}", path.display()))?;
    Ok(answers)
}

/// Ask each prompt on stdin until the session is diagnosed
fn run_interactive<'a>(
    engine: &'a Engine,
    domain: Domain,
    out: &OutputWriter,
) -> Result<Session<'a>> {
    let mut session = engine.session(domain);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    out.section(&format!("AION OS :: {}", domain.name()));
    out.info("Answer honestly. One line per answer.");

    while let Some(prompt) = session.current_prompt() {
        out.prompt(&prompt);
        if !out.is_json() {
            print!("  > ");
            io::stdout().flush()?;
        }

        let line = match lines.next() {
            Some(line) => line.context("Failed to read answer from stdin")?,
            None => bail!("Input ended before all four answers were given"),
        };

        if let Some(preview) = engine.preview(&line) {
            out.callouts(&preview);
        }

        match session.submit(&line) {
            Ok(outcome) => {
                for finding in &outcome.new_findings {
                    out.warning(&finding.message);
                }
            }
            Err(DiagnosticError::AnswerTooShort { min, .. }) => {
                out.warning(&format!(
                    "That's not an answer. Give it at least {} characters.",
                    min
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(session)
}

fn finish(
    session: &Session<'_>,
    out: &OutputWriter,
    export: Option<&Path>,
    brief: bool,
) -> Result<()> {
    let diagnosis = session
        .diagnosis()
        .context("Session ended without a diagnosis")?;
    let record = session.export();
    let brief_text =
        brief.then(|| consultant_brief(session.domain(), session.answers(), diagnosis));

    if out.is_json() {
        let mut value = serde_json::to_value(&record)?;
        if let (Some(text), Some(obj)) = (&brief_text, value.as_object_mut()) {
            obj.insert("brief".to_string(), json!(text));
        }
        out.emit(&value)?;
    } else {
        out.findings(session.findings());
        out.diagnosis(diagnosis);
    }

    if let Some(path) = export {
        let path = if path.is_dir() {
            path.join(record.file_name())
        } else {
            path.to_path_buf()
        };
        fs::write(&path, record.to_json()?)
            .with_context(|| format!("Failed to write session export to {}", path.display()))?;
        out.success(&format!("Session exported to {}", path.display()));
    }

    if let Some(text) = brief_text {
        if !out.is_json() {
            out.section("CONSULTANT BRIEF");
            println!("{}", text);
        }
    }

    Ok(())
}
