//! CLI entry point for releasegate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `releasegate-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use releasegate_app::{
    AppError, ExplainOutput, Pipeline, RewriteHook, SignoffRequest, SubmissionInput,
    approve_case, block_case, evaluate_draft, export_packet, format_case_list,
    format_explanation, format_not_found, list_cases, load_policy_pack, publish_case,
    render_annotations, render_markdown, review_for_case, review_for_draft, revise_case,
    run_explain, serialize_packet, show_case, submit_case,
};
use releasegate_domain::PackCache;
use releasegate_settings::{Overrides, ResolvedConfig};
use releasegate_store::FileStore;
use releasegate_types::{Decision, Evaluation, Revision};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "releasegate",
    version,
    about = "Compliance gate for outbound marketing drafts"
)]
struct Cli {
    /// Path to releasegate config TOML.
    #[arg(long, default_value = "releasegate.toml")]
    config: Utf8PathBuf,

    /// Override the case store directory.
    #[arg(long)]
    store_dir: Option<Utf8PathBuf>,

    /// Override routing profile (default|strict).
    #[arg(long)]
    profile: Option<String>,

    /// Override policy pack (builtin:<name> or a path to a pack JSON file).
    #[arg(long)]
    policy: Option<String>,

    /// Request advisory rewrite suggestions (needs an API key).
    #[arg(long)]
    rewrite: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug, Clone)]
struct DraftArgs {
    /// File containing the draft text.
    #[arg(long)]
    draft: Utf8PathBuf,

    /// Outbound channel (email|push|landing_page|blog).
    #[arg(long, default_value = "email")]
    channel: String,

    #[arg(long)]
    product: Option<String>,

    #[arg(long)]
    audience: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a draft without recording a case.
    Evaluate {
        #[command(flatten)]
        draft: DraftArgs,

        /// Where to write the evaluation JSON (stdout if omitted).
        #[arg(long)]
        out: Option<Utf8PathBuf>,

        /// Write a Markdown review summary.
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,

        /// Print GitHub Actions annotations for violations.
        #[arg(long)]
        annotations: bool,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max_annotations: usize,
    },

    /// Open a case for a draft and record its first evaluation.
    Submit {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Record an edited draft as a new revision of a case.
    Revise {
        case_id: String,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// List cases, most recently updated first.
    List {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show the latest evaluation and revision history of a case.
    Show { case_id: String },

    /// Export the approval packet for the latest revision.
    Export {
        case_id: String,

        /// Where to write the packet JSON (stdout if omitted).
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Approve a case. Escalated decisions need an approver name and override reason.
    Approve {
        case_id: String,

        #[arg(long)]
        approver_name: Option<String>,

        #[arg(long)]
        approver_email: Option<String>,

        #[arg(long)]
        override_reason: Option<String>,
    },

    /// Publish an approved case.
    Publish { case_id: String },

    /// Block a case from publication.
    Block { case_id: String },

    /// Explain a policy rule.
    Explain {
        /// The rule id (e.g., "R-RISK-NO-RISK").
        rule_id: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = run(&cli);
    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(AppError::Setup(msg)) => eprintln!("setup required: {msg}"),
                Some(app) => eprintln!("{app}"),
                None => eprintln!("releasegate error: {err:#}"),
            }
            std::process::exit(error_exit_code(&err));
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let resolved = resolve(cli)?;

    match &cli.cmd {
        Commands::Evaluate {
            draft,
            out,
            markdown_out,
            annotations,
            max_annotations,
        } => cmd_evaluate(
            &resolved,
            draft,
            out.as_deref(),
            markdown_out.as_deref(),
            *annotations,
            *max_annotations,
        ),
        Commands::Submit { draft } => cmd_submit(&resolved, draft),
        Commands::Revise { case_id, draft } => cmd_revise(&resolved, case_id, draft),
        Commands::List { limit } => cmd_list(&resolved, *limit),
        Commands::Show { case_id } => cmd_show(&resolved, case_id),
        Commands::Export { case_id, out } => cmd_export(&resolved, case_id, out.as_deref()),
        Commands::Approve {
            case_id,
            approver_name,
            approver_email,
            override_reason,
        } => cmd_approve(
            &resolved,
            case_id,
            SignoffRequest {
                approver_name: approver_name.clone(),
                approver_email: approver_email.clone(),
                override_reason: override_reason.clone(),
            },
        ),
        Commands::Publish { case_id } => cmd_publish(&resolved, case_id),
        Commands::Block { case_id } => cmd_block(&resolved, case_id),
        Commands::Explain { rule_id } => cmd_explain(&resolved, rule_id),
    }
}

/// Exit code for a failed command: 3 when setup is required, otherwise 1.
fn error_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Setup(_)) => 3,
        _ => 1,
    }
}

fn evaluation_exit_code(evaluation: &Evaluation) -> i32 {
    match evaluation.decision {
        Decision::Pass => 0,
        Decision::NeedsChanges | Decision::Escalate => 2,
    }
}

fn resolve(cli: &Cli) -> anyhow::Result<ResolvedConfig> {
    // Missing config file is allowed (defaults apply).
    let cfg_text = std::fs::read_to_string(&cli.config).unwrap_or_default();
    let cfg = if cfg_text.trim().is_empty() {
        releasegate_settings::ReleasegateConfigV1::default()
    } else {
        releasegate_settings::parse_config_toml(&cfg_text)
            .with_context(|| format!("parse config: {}", cli.config))?
    };

    let overrides = Overrides {
        profile: cli.profile.clone(),
        policy_pack: cli.policy.clone(),
        store_dir: cli.store_dir.as_ref().map(|d| d.to_string()),
        rewrite_enabled: cli.rewrite.then_some(true),
    };
    let resolved = releasegate_settings::resolve_config(cfg, overrides).context("resolve config")?;
    debug!(
        profile = %resolved.profile,
        policy = ?resolved.policy,
        store_dir = %resolved.store_dir,
        "config resolved"
    );
    Ok(resolved)
}

fn pipeline(resolved: &ResolvedConfig) -> anyhow::Result<Pipeline> {
    let pack = load_policy_pack(&resolved.policy)?;
    let pipeline = Pipeline::new(&pack, resolved.routing, &PackCache::new())?
        .with_rewrite(RewriteHook::from_settings(&resolved.rewrite));
    Ok(pipeline)
}

fn open_store(resolved: &ResolvedConfig) -> anyhow::Result<FileStore> {
    Ok(FileStore::open(&resolved.store_dir).map_err(AppError::from)?)
}

fn submission_input(args: &DraftArgs) -> anyhow::Result<SubmissionInput> {
    let text = std::fs::read_to_string(&args.draft)
        .with_context(|| format!("read draft: {}", args.draft))?;
    Ok(SubmissionInput {
        text,
        channel: args.channel.clone(),
        product: args.product.clone(),
        audience: args.audience.clone(),
    })
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn print_revision(case_id: &str, revision: &Revision) {
    let evaluation = &revision.evaluation;
    println!("case: {case_id}");
    println!("revision: {}", revision.id);
    println!("decision: {}", evaluation.decision.as_str());
    println!("severity: {}", evaluation.severity.as_str());
    println!("confidence: {:.2}", evaluation.confidence.score);
    for v in &evaluation.violations {
        println!("violation: {} ({})", v.rule_id, v.severity.as_str());
    }
}

fn cmd_evaluate(
    resolved: &ResolvedConfig,
    args: &DraftArgs,
    out: Option<&Utf8Path>,
    markdown_out: Option<&Utf8Path>,
    annotations: bool,
    max_annotations: usize,
) -> anyhow::Result<i32> {
    let input = submission_input(args)?;
    // Citation offsets point into the trimmed draft.
    let text = input.text.trim().to_string();
    let pipeline = pipeline(resolved)?;
    let evaluation = evaluate_draft(&pipeline, input)?;

    let mut json = serde_json::to_string_pretty(&evaluation).context("serialize evaluation")?;
    json.push('\n');
    match out {
        Some(path) => write_text_file(path, &json).context("write evaluation json")?,
        None if !annotations => print!("{json}"),
        None => {}
    }

    if markdown_out.is_some() || annotations {
        let review = review_for_draft(args.draft.as_str(), args.draft.as_str(), &text, &evaluation);
        if let Some(path) = markdown_out {
            write_text_file(path, &render_markdown(&review)).context("write markdown")?;
        }
        if annotations {
            for annotation in render_annotations(&review, max_annotations) {
                println!("{}", annotation);
            }
        }
    }

    Ok(evaluation_exit_code(&evaluation))
}

fn cmd_submit(resolved: &ResolvedConfig, args: &DraftArgs) -> anyhow::Result<i32> {
    let input = submission_input(args)?;
    let pipeline = pipeline(resolved)?;
    let store = FileStore::open_or_create(&resolved.store_dir).map_err(AppError::from)?;
    let output = submit_case(&store, &pipeline, input)?;
    print_revision(&output.case.id, &output.revision);
    Ok(0)
}

fn cmd_revise(resolved: &ResolvedConfig, case_id: &str, args: &DraftArgs) -> anyhow::Result<i32> {
    let input = submission_input(args)?;
    let pipeline = pipeline(resolved)?;
    let store = open_store(resolved)?;
    let output = revise_case(&store, &pipeline, case_id, input)?;
    print_revision(&output.case.id, &output.revision);
    Ok(0)
}

fn cmd_list(resolved: &ResolvedConfig, limit: usize) -> anyhow::Result<i32> {
    let store = open_store(resolved)?;
    print!("{}", format_case_list(&list_cases(&store, limit)?));
    Ok(0)
}

fn cmd_show(resolved: &ResolvedConfig, case_id: &str) -> anyhow::Result<i32> {
    let store = open_store(resolved)?;
    let shown = show_case(&store, case_id)?;
    match review_for_case(&shown.loaded, shown.packet.as_ref()) {
        Some(review) => print!("{}", render_markdown(&review)),
        None => println!("{} ({}): no revisions", shown.loaded.case.id, shown.loaded.case.status),
    }
    Ok(0)
}

fn cmd_export(resolved: &ResolvedConfig, case_id: &str, out: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let store = open_store(resolved)?;
    let record = export_packet(&store, case_id)?;
    let json = serialize_packet(&record.packet).context("serialize packet")?;
    match out {
        Some(path) => {
            write_text_file(path, &json).context("write packet json")?;
            eprintln!("wrote approval packet {} to {}", record.id, path);
        }
        None => print!("{json}"),
    }
    Ok(0)
}

fn cmd_approve(
    resolved: &ResolvedConfig,
    case_id: &str,
    request: SignoffRequest,
) -> anyhow::Result<i32> {
    let store = open_store(resolved)?;
    let output = approve_case(&store, case_id, &request)?;
    println!("approved: {}", output.case.id);
    if let Some(signoff) = &output.signoff {
        println!(
            "signoff: {} ({})",
            signoff.approver_name, signoff.override_reason
        );
    }
    Ok(0)
}

fn cmd_publish(resolved: &ResolvedConfig, case_id: &str) -> anyhow::Result<i32> {
    let store = open_store(resolved)?;
    let case = publish_case(&store, case_id)?;
    println!("published: {}", case.id);
    Ok(0)
}

fn cmd_block(resolved: &ResolvedConfig, case_id: &str) -> anyhow::Result<i32> {
    let store = open_store(resolved)?;
    let case = block_case(&store, case_id)?;
    println!("blocked: {}", case.id);
    Ok(0)
}

fn cmd_explain(resolved: &ResolvedConfig, rule_id: &str) -> anyhow::Result<i32> {
    let pack = load_policy_pack(&resolved.policy)?;
    match run_explain(&pack, rule_id) {
        ExplainOutput::Found {
            policy_version,
            rule,
        } => {
            print!("{}", format_explanation(&policy_version, &rule));
            Ok(0)
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
        } => {
            eprint!("{}", format_not_found(&identifier, &available_rule_ids));
            Ok(1)
        }
    }
}
