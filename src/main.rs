use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use callcheck::engine::KeywordRule;
use callcheck::io::{read_audio, AnalysisReport, Scorecard};
use callcheck::llm::{generate_dispute_letter, generate_summary, DisputeContext};
use callcheck::store::DEFAULT_HISTORY_FILE;
use callcheck::transcription::mime_type_for;
use callcheck::{
    analyze, read_transcript, AnthropicClient, AnthropicConfig, CallRecord, CallStore, CallType,
    DeepgramClient, DeepgramConfig, JsonFileStore, MoveSize, Settings, TopicRegistry, TopicResult,
    Transcriber,
};

#[derive(Parser)]
#[command(name = "callcheck")]
#[command(author, version, about = "Sales call disclosure checker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a transcript for required disclosures and unusual promises
    Analyze {
        /// Transcript file (plain text or Deepgram JSON), or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Reviewer settings (JSON)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Topic catalog replacing the built-in one (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output file for the machine-readable report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the scorecard and annotated transcript (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Also write a short LLM summary of the call
        #[arg(long)]
        summarize: bool,

        /// Save the analyzed call to history
        #[arg(long)]
        save: bool,

        /// History file
        #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
        history: PathBuf,

        /// Sales rep on the call (saved when rep tracking is enabled)
        #[arg(long)]
        rep_name: Option<String>,

        /// Date of the call, YYYY-MM-DD (saved when rep tracking is enabled)
        #[arg(long)]
        call_date: Option<NaiveDate>,

        /// Reviewer notes saved with the call
        #[arg(long)]
        notes: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Transcribe an audio recording
    Transcribe {
        /// Audio file (mp3, wav, m4a, ...)
        #[arg(short, long)]
        audio: PathBuf,

        /// Output file for the transcript text; printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a transcript in a few sentences
    Summarize {
        /// Transcript file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Draft a response to a customer dispute about a call
    Dispute {
        /// Id of a saved call
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        record: Option<String>,

        /// Transcript file to analyze instead of a saved call
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// History file
        #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
        history: PathBuf,

        /// Reviewer settings (JSON)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Topic catalog replacing the built-in one (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Kind of move, e.g. local-hourly or interstate
        #[arg(long, default_value = "unknown", value_parser = parse_kebab::<CallType>)]
        call_type: CallType,

        /// Size of move, e.g. two-bedroom or office
        #[arg(long, default_value = "unknown", value_parser = parse_kebab::<MoveSize>)]
        move_size: MoveSize,

        /// Sales rep on the call; overrides the saved value
        #[arg(long)]
        rep_name: Option<String>,

        /// Date of the call, YYYY-MM-DD; overrides the saved value
        #[arg(long)]
        call_date: Option<NaiveDate>,

        /// Notes for the letter; overrides the saved value
        #[arg(long)]
        notes: Option<String>,

        /// Output file for the letter; printed when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Manage saved calls
    History {
        #[command(subcommand)]
        action: HistoryAction,

        /// History file
        #[arg(long, global = true, default_value = DEFAULT_HISTORY_FILE)]
        history: PathBuf,

        /// Verbose output
        #[arg(short, long, global = true)]
        verbose: bool,
    },

    /// List the topic catalog
    Topics {
        /// Reviewer settings (JSON), used to mark enabled topics
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Topic catalog replacing the built-in one (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List saved calls, newest first
    List,
    /// Print the scorecard of a saved call
    Show { id: String },
    /// Delete a saved call
    Delete { id: String },
    /// Delete all saved calls
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            settings,
            catalog,
            output,
            human_readable,
            summarize,
            save,
            history,
            rep_name,
            call_date,
            notes,
            verbose,
        } => {
            setup_logging(verbose);
            analyze_call(AnalyzeArgs {
                input,
                settings,
                catalog,
                output,
                human_readable,
                summarize,
                save: save.then_some(history),
                rep_name,
                call_date,
                notes,
            })
            .await
        }
        Commands::Transcribe {
            audio,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            transcribe_audio(&audio, output.as_deref()).await
        }
        Commands::Summarize { input, verbose } => {
            setup_logging(verbose);
            summarize_call(&input).await
        }
        Commands::Dispute {
            record,
            input,
            history,
            settings,
            catalog,
            call_type,
            move_size,
            rep_name,
            call_date,
            notes,
            output,
            verbose,
        } => {
            setup_logging(verbose);
            let source = match (record, input) {
                (Some(id), _) => DisputeSource::Saved { id, history },
                (None, Some(input)) => DisputeSource::Transcript {
                    input,
                    settings,
                    catalog,
                },
                (None, None) => bail!("Either --record or --input is required"),
            };
            draft_dispute(
                source,
                call_type,
                move_size,
                rep_name,
                call_date,
                notes,
                output.as_deref(),
            )
            .await
        }
        Commands::History {
            action,
            history,
            verbose,
        } => {
            setup_logging(verbose);
            manage_history(action, history)
        }
        Commands::Topics {
            settings,
            catalog,
            verbose,
        } => {
            setup_logging(verbose);
            list_topics(settings.as_deref(), catalog.as_deref())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Parse a kebab-case enum value the same way the JSON files spell it
fn parse_kebab<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unrecognized value: {}", value))
}

fn load_registry(catalog: Option<&Path>) -> Result<TopicRegistry> {
    match catalog {
        Some(path) => {
            info!("Loading topic catalog from {:?}", path);
            TopicRegistry::from_json_file(path)
        }
        None => Ok(TopicRegistry::builtin()),
    }
}

fn load_settings(settings: Option<&Path>) -> Result<Settings> {
    match settings {
        Some(path) => {
            info!("Loading settings from {:?}", path);
            Settings::from_json_file(path)
        }
        None => Ok(Settings::default()),
    }
}

/// Analyze a transcript and keep only the enabled topics
fn run_analysis(
    transcript: &str,
    registry: &TopicRegistry,
    settings: &Settings,
) -> Result<Vec<TopicResult>> {
    let overlay = settings
        .overlay(registry)
        .context("Invalid settings")?;
    let results = settings.filter_enabled(analyze(transcript, registry, &overlay));
    info!(
        "Analyzed {} chars against {} topics",
        transcript.len(),
        results.len()
    );
    Ok(results)
}

struct AnalyzeArgs {
    input: PathBuf,
    settings: Option<PathBuf>,
    catalog: Option<PathBuf>,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    summarize: bool,
    /// History file, when the call should be saved
    save: Option<PathBuf>,
    rep_name: Option<String>,
    call_date: Option<NaiveDate>,
    notes: Option<String>,
}

async fn analyze_call(args: AnalyzeArgs) -> Result<()> {
    info!("Loading transcript from {:?}", args.input);
    let transcript = read_transcript(&args.input)?;
    let registry = load_registry(args.catalog.as_deref())?;
    let settings = load_settings(args.settings.as_deref())?;

    let results = run_analysis(&transcript, &registry, &settings)?;
    let needs_review = settings.needs_review(&transcript, &results);
    let report = AnalysisReport::new(&transcript, results, needs_review);
    let scorecard = Scorecard::new(&report);

    print!("{}", scorecard.format());

    if let Some(path) = &args.output {
        report.write_json(path)?;
        info!("Report written to {:?}", path);
    }
    if let Some(path) = &args.human_readable {
        scorecard.write_file(path)?;
        info!("Scorecard written to {:?}", path);
    }

    if let Some(history) = args.save {
        let mut record = CallRecord::new(
            transcript.clone(),
            report.results.clone(),
            report.score.percent,
            report.score.fully_passed(),
        );
        if settings.track_rep {
            record.rep_name = args.rep_name.unwrap_or_default();
            record.call_date = args.call_date;
        }
        record.notes = args.notes.unwrap_or_default();

        let mut store = JsonFileStore::new(history);
        store.put(record.clone())?;
        info!("Saved call {} to {:?}", record.id, store.path());
    }

    if args.summarize {
        // The report is already out; a failed summary only costs the summary
        match AnthropicConfig::from_env() {
            Ok(config) => {
                let client = AnthropicClient::new(config);
                match generate_summary(&client, &transcript).await {
                    Ok(summary) => println!("\nSummary\n-------\n{}", summary),
                    Err(e) => warn!("Summary failed: {}", e),
                }
            }
            Err(e) => warn!("Summary skipped: {:#}", e),
        }
    }

    Ok(())
}

async fn transcribe_audio(audio: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = read_audio(audio)?;
    let extension = audio
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let client = DeepgramClient::new(DeepgramConfig::from_env()?);
    let transcript = client.transcribe(&bytes, mime_type_for(extension)).await?;
    info!("Transcribed {} chars", transcript.len());

    match output {
        Some(path) => {
            std::fs::write(path, &transcript)
                .with_context(|| format!("Failed to write file: {:?}", path))?;
            info!("Transcript written to {:?}", path);
        }
        None => println!("{}", transcript),
    }
    Ok(())
}

async fn summarize_call(input: &Path) -> Result<()> {
    let transcript = read_transcript(input)?;
    let client = AnthropicClient::new(AnthropicConfig::from_env()?);
    let summary = generate_summary(&client, &transcript).await?;
    println!("{}", summary);
    Ok(())
}

enum DisputeSource {
    Saved {
        id: String,
        history: PathBuf,
    },
    Transcript {
        input: PathBuf,
        settings: Option<PathBuf>,
        catalog: Option<PathBuf>,
    },
}

async fn draft_dispute(
    source: DisputeSource,
    call_type: CallType,
    move_size: MoveSize,
    rep_name: Option<String>,
    call_date: Option<NaiveDate>,
    notes: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let record = match source {
        DisputeSource::Saved { id, history } => {
            let store = JsonFileStore::new(history);
            match store.get(&id)? {
                Some(record) => record,
                None => bail!("No saved call with id {}", id),
            }
        }
        DisputeSource::Transcript {
            input,
            settings,
            catalog,
        } => {
            let transcript = read_transcript(&input)?;
            let registry = load_registry(catalog.as_deref())?;
            let settings = load_settings(settings.as_deref())?;
            let results = run_analysis(&transcript, &registry, &settings)?;
            CallRecord::new(transcript, results, 0, false)
        }
    };

    let rep_name = rep_name.unwrap_or(record.rep_name);
    let notes = notes.unwrap_or(record.notes);
    let ctx = DisputeContext {
        rep_name: &rep_name,
        call_date: call_date.or(record.call_date),
        call_type,
        move_size,
        notes: &notes,
        transcript: &record.transcript,
        results: &record.results,
    };

    let client = AnthropicClient::new(AnthropicConfig::from_env()?);
    let letter = generate_dispute_letter(&client, &ctx).await?;

    match output {
        Some(path) => {
            std::fs::write(path, &letter)
                .with_context(|| format!("Failed to write file: {:?}", path))?;
            info!("Letter written to {:?}", path);
        }
        None => println!("{}", letter),
    }
    Ok(())
}

fn manage_history(action: HistoryAction, history: PathBuf) -> Result<()> {
    let mut store = JsonFileStore::new(history);

    match action {
        HistoryAction::List => {
            let records = store.list()?;
            if records.is_empty() {
                println!("No saved calls");
            }
            for record in records {
                let status = if record.fully_passed { "PASS" } else { "FAIL" };
                let rep = if record.rep_name.is_empty() {
                    "-"
                } else {
                    record.rep_name.as_str()
                };
                println!(
                    "{}  {}  {:>3}%  {}  {}",
                    record.id,
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.score,
                    status,
                    rep
                );
            }
        }
        HistoryAction::Show { id } => {
            let Some(record) = store.get(&id)? else {
                bail!("No saved call with id {}", id);
            };
            if !record.rep_name.is_empty() {
                println!("Rep: {}", record.rep_name);
            }
            if let Some(date) = record.call_date {
                println!("Call date: {}", date);
            }
            if !record.notes.is_empty() {
                println!("Notes: {}", record.notes);
            }
            let report = AnalysisReport::new(&record.transcript, record.results, false);
            print!("{}", Scorecard::new(&report).format());
        }
        HistoryAction::Delete { id } => {
            if store.delete(&id)? {
                info!("Deleted call {}", id);
            } else {
                bail!("No saved call with id {}", id);
            }
        }
        HistoryAction::Clear => {
            store.clear()?;
            info!("History cleared");
        }
    }
    Ok(())
}

fn list_topics(settings: Option<&Path>, catalog: Option<&Path>) -> Result<()> {
    let registry = load_registry(catalog)?;
    let settings = load_settings(settings)?;

    println!("Topics");
    println!("======");
    for entry in registry.entries() {
        let topic = &entry.topic;
        let enabled = if settings.is_enabled(&topic.id) { "x" } else { " " };
        println!(
            "[{}] {} ({}, {:?}): {} keywords, {} patterns",
            enabled,
            topic.label,
            topic.id,
            topic.scoring_mode,
            topic.keywords.len(),
            topic.patterns.len()
        );

        let keywords: Vec<&str> = entry.keyword_rules().iter().map(KeywordRule::keyword).collect();
        if !keywords.is_empty() {
            println!("    keywords: {}", keywords.join(", "));
        }

        let mut parameters: Vec<String> = Vec::new();
        for rule in entry.pattern_rules() {
            if !rule.is_valid() {
                println!("    skipped invalid pattern: {}", rule.label());
            } else if let Some(parameter) = rule.parameter() {
                parameters.push(parameter.to_string());
            }
        }
        if !parameters.is_empty() {
            println!("    parameters: {}", parameters.join(", "));
        }
    }
    Ok(())
}
