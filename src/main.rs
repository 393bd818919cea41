use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use handoff::{
    ComparisonReport, ConversationEvaluator, CorpusSynthesizer, EvaluationReport, GeminiClient,
    GeminiConfig, ResponseComparator, SalesContext, UseCase, detect_client_interest,
    extract_first_advisor_reply, parse_conversations_file, run_batch,
};

#[derive(Parser)]
#[command(name = "handoff")]
#[command(author, version, about = "Bot-to-advisor handoff conversation analysis pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score advisor response quality for a batch of conversations
    Evaluate {
        /// Input conversation rows (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the evaluation report (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Optional output file for a human-readable summary
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Generation model to use
        #[arg(long)]
        model: Option<String>,

        /// Minimum delay between generation requests in milliseconds
        #[arg(long, default_value = "500")]
        min_interval_ms: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compare advisor first replies against generated alternatives
    Compare {
        /// Input conversation rows (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the comparison report (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Optional output file for a human-readable summary
        #[arg(long)]
        summary: Option<PathBuf>,

        /// Sales script file to embed in generation prompts
        #[arg(long)]
        sales_script: Option<PathBuf>,

        /// Knowledge base file to embed in generation prompts
        #[arg(long)]
        knowledge_base: Option<PathBuf>,

        /// Generation model to use
        #[arg(long)]
        model: Option<String>,

        /// Minimum delay between generation requests in milliseconds
        #[arg(long, default_value = "500")]
        min_interval_ms: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Synthesize a sales script and/or knowledge base from an evaluation report
    Synthesize {
        /// Input evaluation report (JSON, from `evaluate`)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the synthesized sales script
        #[arg(long)]
        script_out: Option<PathBuf>,

        /// Restrict the sales script to one use case
        #[arg(long)]
        use_case: Option<UseCase>,

        /// Output file for the synthesized knowledge base
        #[arg(long)]
        kb_out: Option<PathBuf>,

        /// Generation model to use
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect structural signals of a batch without calling the backend
    Analyze {
        /// Input conversation rows (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            input,
            output,
            summary,
            model,
            min_interval_ms,
            verbose,
        } => {
            setup_logging(verbose);
            evaluate_batch(input, output, summary, model, min_interval_ms).await
        }
        Commands::Compare {
            input,
            output,
            summary,
            sales_script,
            knowledge_base,
            model,
            min_interval_ms,
            verbose,
        } => {
            setup_logging(verbose);
            compare_batch(
                input,
                output,
                summary,
                sales_script,
                knowledge_base,
                model,
                min_interval_ms,
            )
            .await
        }
        Commands::Synthesize {
            input,
            script_out,
            use_case,
            kb_out,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            synthesize(input, script_out, use_case, kb_out, model).await
        }
        Commands::Analyze { input, verbose } => {
            setup_logging(verbose);
            analyze(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn api_config(model: Option<String>, min_interval_ms: Option<u64>) -> Result<GeminiConfig> {
    let mut config = GeminiConfig::from_env()?;
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(ms) = min_interval_ms {
        config.min_call_interval = Duration::from_millis(ms);
    }
    Ok(config)
}

async fn evaluate_batch(
    input: PathBuf,
    output: PathBuf,
    summary: Option<PathBuf>,
    model: Option<String>,
    min_interval_ms: u64,
) -> Result<()> {
    info!("Loading conversations from {:?}", input);
    let records = parse_conversations_file(&input).context("Failed to load conversation rows")?;
    info!("Loaded {} eligible conversations", records.len());

    let client = GeminiClient::new(api_config(model, Some(min_interval_ms))?);
    let evaluator = ConversationEvaluator::new(client);
    let evaluator = &evaluator;

    let results = run_batch(
        records,
        |record| async move { Ok(evaluator.evaluate(&record).await) },
        |done, total| info!("Evaluated {}/{} conversations", done, total),
    )
    .await?;

    let report = EvaluationReport::new(results);
    report.write_json(&output)?;
    info!(
        "Report written to {:?} ({} succeeded, {} failed)",
        output, report.metadata.succeeded, report.metadata.failed
    );

    if let Some(summary_path) = summary {
        write_text(&summary_path, &report.format_summary())?;
        info!("Summary written to {:?}", summary_path);
    }

    Ok(())
}

async fn compare_batch(
    input: PathBuf,
    output: PathBuf,
    summary: Option<PathBuf>,
    sales_script: Option<PathBuf>,
    knowledge_base: Option<PathBuf>,
    model: Option<String>,
    min_interval_ms: u64,
) -> Result<()> {
    info!("Loading conversations from {:?}", input);
    let records = parse_conversations_file(&input).context("Failed to load conversation rows")?;
    info!("Loaded {} eligible conversations", records.len());

    let context = SalesContext {
        sales_script: read_optional_text(sales_script.as_deref())?,
        knowledge_base: read_optional_text(knowledge_base.as_deref())?,
    };

    let client = GeminiClient::new(api_config(model, Some(min_interval_ms))?);
    let comparator = ResponseComparator::new(client, context);
    let comparator = &comparator;

    let results = run_batch(
        records,
        |record| async move { Ok(comparator.compare(&record).await) },
        |done, total| info!("Compared {}/{} conversations", done, total),
    )
    .await?;

    let report = ComparisonReport::new(results);
    report.write_json(&output)?;
    info!(
        "Report written to {:?} ({} evaluated, {} errored)",
        output, report.metadata.succeeded, report.metadata.failed
    );

    if let Some(summary_path) = summary {
        write_text(&summary_path, &report.format_summary())?;
        info!("Summary written to {:?}", summary_path);
    }

    Ok(())
}

async fn synthesize(
    input: PathBuf,
    script_out: Option<PathBuf>,
    use_case: Option<UseCase>,
    kb_out: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    if script_out.is_none() && kb_out.is_none() {
        anyhow::bail!("nothing to synthesize: pass --script-out and/or --kb-out");
    }

    info!("Loading evaluation report from {:?}", input);
    let report = EvaluationReport::read_json(&input)?;
    info!("Loaded {} evaluation results", report.results.len());

    let client = GeminiClient::new(api_config(model, None)?);
    let synthesizer = CorpusSynthesizer::new(client);

    if let Some(path) = script_out {
        let script = match use_case {
            Some(use_case) => synthesizer
                .use_case_script(&report.results, use_case)
                .await
                .context("Sales script synthesis failed")?,
            None => synthesizer
                .sales_script(&report.results)
                .await
                .context("Sales script synthesis failed")?,
        };
        write_text(&path, &script)?;
        info!("Sales script written to {:?}", path);
    }

    if let Some(path) = kb_out {
        let kb = synthesizer
            .knowledge_base(&report.results)
            .await
            .context("Knowledge base synthesis failed")?;
        write_text(&path, &kb)?;
        info!("Knowledge base written to {:?}", path);
    }

    Ok(())
}

fn analyze(input: PathBuf) -> Result<()> {
    info!("Analyzing conversations from {:?}", input);
    let records = parse_conversations_file(&input).context("Failed to load conversation rows")?;

    println!("Conversation Analysis");
    println!("=====================");
    println!("Eligible conversations: {}", records.len());

    let with_bot = records.iter().filter(|r| r.bot_transcript.is_some()).count();
    println!("With bot transcript: {}", with_bot);
    println!();

    let mut financing = 0;
    let mut test_drive = 0;
    let mut cash = 0;
    let mut with_model = 0;
    let mut tagged_replies = 0;
    let mut reply_chars = 0usize;

    for record in &records {
        let signals = detect_client_interest(record.bot_transcript_or_empty());
        if signals.financing {
            financing += 1;
        }
        if signals.test_drive {
            test_drive += 1;
        }
        if signals.cash_purchase {
            cash += 1;
        }
        if signals.model.is_some() {
            with_model += 1;
        }

        let reply = extract_first_advisor_reply(&record.advisor_transcript);
        if !reply.is_empty() {
            tagged_replies += 1;
            reply_chars += reply.chars().count();
        }
    }

    println!("Interest Signals");
    println!("----------------");
    println!("Financing: {}", financing);
    println!("Test drive: {}", test_drive);
    println!("Cash purchase: {}", cash);
    println!("Model mentioned: {}", with_model);
    println!();

    println!("First Advisor Replies");
    println!("---------------------");
    println!("Extracted: {}", tagged_replies);
    if tagged_replies > 0 {
        println!("Average length: {} chars", reply_chars / tagged_replies);
    }

    Ok(())
}

fn read_optional_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path)),
        None => Ok(String::new()),
    }
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))
}
