//! # content-audit
//!
//! Command-line front end for the content audit service. Each subcommand
//! drives one workflow: load pages, run the analysis, print the results and
//! optionally export them as CSV.
//!
//! ```bash
//! content-audit cluster --file sitemap.xml --export
//! content-audit links --url https://example.com/a --url https://example.com/b --language de
//! content-audit localize --pair https://example.com/en https://example.com/de --threshold 0.6
//! content-audit readiness --urls-from urls.txt --expand 0
//! ```

mod config;
mod effects;
mod logging;
mod render;
mod session;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use audit_core::{split_url_input, ClusterId, LinkRequestParams, Msg, PairField, WorkflowKind};
use audit_engine::{ArtifactWriter, EngineHandle};
use audit_logging::audit_debug;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use crate::effects::EffectRunner;
use crate::logging::LogDestination;
use crate::session::Session;

#[derive(Parser)]
#[command(
    name = "content-audit",
    about = "Cluster, interlink, localization-check and AI-readiness-score website content",
    version
)]
struct Cli {
    /// Path to the RON configuration file.
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Base URL of the analysis service. Overrides the config file and AUDIT_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory CSV exports are written to.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "terminal")]
    log: LogDestination,

    /// Log debug output.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Group pages into semantic clusters.
    Cluster {
        #[command(flatten)]
        source: SourceArgs,

        /// List the pages of this cluster instead of the keyword overview.
        #[arg(long)]
        cluster: Option<String>,

        /// Write clusters.csv.
        #[arg(long)]
        export: bool,
    },

    /// Suggest internal links between pages.
    Links {
        #[command(flatten)]
        source: SourceArgs,

        /// Only show links touching a page in this language.
        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        min_similarity: Option<f64>,

        /// Upper bound on suggestions per source page, applied by the service.
        #[arg(long)]
        max_links: Option<u32>,

        #[arg(long)]
        same_language_only: bool,

        /// Write internal_links.csv with the filtered links.
        #[arg(long)]
        export: bool,
    },

    /// Compare original pages with their translations.
    Localize {
        /// An original URL followed by its translation URL. Repeatable.
        #[arg(long = "pair", num_args = 2, value_names = ["ORIGINAL", "TRANSLATION"], required = true)]
        pairs: Vec<String>,

        /// Similarity below this is reported as drift.
        #[arg(long)]
        threshold: Option<f64>,

        /// Write localization_consistency.csv.
        #[arg(long)]
        export: bool,
    },

    /// Score pages for AI readiness.
    Readiness {
        #[command(flatten)]
        source: SourceArgs,

        /// Replace a page's content before scoring, as INDEX=FILE. Repeatable.
        #[arg(long = "content", value_parser = parse_content_edit)]
        edits: Vec<(usize, PathBuf)>,

        /// Print the loaded pages and stop before scoring.
        #[arg(long)]
        review: bool,

        /// Show the full page content of this result row.
        #[arg(long)]
        expand: Option<usize>,
    },
}

/// Where pages come from: an uploaded file or a list of URLs to fetch.
#[derive(Args)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Sitemap, HTML or CSV file to upload.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Page URL to fetch. Repeatable.
    #[arg(long = "url")]
    urls: Vec<String>,

    /// Text file with one URL per line.
    #[arg(long)]
    urls_from: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log, level);

    let mut app_config = config::load(&cli.config);
    app_config.apply_env_api_url(std::env::var(config::API_URL_ENV).ok());
    if let Some(url) = cli.api_url {
        app_config.api_url = url;
    }
    if let Some(out) = cli.out {
        app_config.output_dir = out;
    }

    let engine = EngineHandle::new(app_config.client_settings())
        .with_context(|| format!("invalid service url {}", app_config.api_url))?;
    let runner = EffectRunner::new(engine, ArtifactWriter::new(app_config.output_dir.clone()));
    let mut session = Session::new(runner, app_config.wait_limit());
    session.dispatch(Msg::MinSimilarityChanged(app_config.min_similarity))?;
    session.dispatch(Msg::ThresholdChanged(app_config.threshold))?;
    session.dispatch(Msg::LinkParamsChanged(app_config.link_params()))?;

    match cli.command {
        Command::Cluster {
            source,
            cluster,
            export,
        } => run_cluster(&mut session, &source, cluster, export),
        Command::Links {
            source,
            language,
            min_similarity,
            max_links,
            same_language_only,
            export,
        } => {
            let defaults = app_config.link_params();
            let params = LinkRequestParams {
                max_links_per_page: max_links.unwrap_or(defaults.max_links_per_page),
                same_language_only: same_language_only || defaults.same_language_only,
            };
            run_links(&mut session, &source, params, language, min_similarity, export)
        }
        Command::Localize {
            pairs,
            threshold,
            export,
        } => run_localize(&mut session, &pairs, threshold, export),
        Command::Readiness {
            source,
            edits,
            review,
            expand,
        } => run_readiness(&mut session, &source, edits, review, expand),
    }
}

fn run_cluster(
    session: &mut Session,
    source: &SourceArgs,
    cluster: Option<String>,
    export: bool,
) -> anyhow::Result<()> {
    let workflow = WorkflowKind::Clustering;
    ingest(session, workflow, source)?;
    print_lines(render::pages(&session.view().clustering.pages));

    analyze(session, workflow)?;
    if let Some(cluster) = cluster {
        session.dispatch(Msg::ClusterSelected(Some(ClusterId::new(cluster))))?;
    }
    print_lines(render::clustering(&session.view().clustering));

    if export {
        export_workflow(session, workflow)?;
    }
    Ok(())
}

fn run_links(
    session: &mut Session,
    source: &SourceArgs,
    params: LinkRequestParams,
    language: Option<String>,
    min_similarity: Option<f64>,
    export: bool,
) -> anyhow::Result<()> {
    let workflow = WorkflowKind::InternalLinks;
    session.dispatch(Msg::LinkParamsChanged(params))?;
    ingest(session, workflow, source)?;
    print_lines(render::pages(&session.view().links.pages));

    analyze(session, workflow)?;
    if let Some(language) = language {
        session.dispatch(Msg::LanguageSelected(language))?;
    }
    if let Some(min_similarity) = min_similarity {
        session.dispatch(Msg::MinSimilarityChanged(min_similarity))?;
    }
    print_lines(render::links(&session.view().links));

    if export {
        export_workflow(session, workflow)?;
    }
    Ok(())
}

fn run_localize(
    session: &mut Session,
    pairs: &[String],
    threshold: Option<f64>,
    export: bool,
) -> anyhow::Result<()> {
    let workflow = WorkflowKind::Localization;
    for (index, pair) in pairs.chunks(2).enumerate() {
        if index > 0 {
            session.dispatch(Msg::PairAdded)?;
        }
        let [original, translation] = pair else {
            bail!("--pair takes an original and a translation URL");
        };
        session.dispatch(Msg::PairEdited {
            index,
            field: PairField::Original,
            value: original.clone(),
        })?;
        session.dispatch(Msg::PairEdited {
            index,
            field: PairField::Translation,
            value: translation.clone(),
        })?;
    }
    if let Some(threshold) = threshold {
        session.dispatch(Msg::ThresholdChanged(threshold))?;
    }

    analyze(session, workflow)?;
    print_lines(render::localization(&session.view().localization));

    if export {
        export_workflow(session, workflow)?;
    }
    Ok(())
}

fn run_readiness(
    session: &mut Session,
    source: &SourceArgs,
    edits: Vec<(usize, PathBuf)>,
    review: bool,
    expand: Option<usize>,
) -> anyhow::Result<()> {
    let workflow = WorkflowKind::AiReadiness;
    ingest(session, workflow, source)?;

    for (index, path) in edits {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading replacement content from {}", path.display()))?;
        let len = session.state().readiness().pages().len();
        if index >= len {
            bail!("page {index} is out of range ({len} pages loaded)");
        }
        session.dispatch(Msg::ContentEdited {
            workflow,
            index,
            content,
        })?;
    }

    print_lines(render::editable_pages(&session.view().readiness.pages));
    if review {
        return Ok(());
    }

    analyze(session, workflow)?;
    if let Some(row) = expand {
        session.dispatch(Msg::ContentToggled(row))?;
    }
    print_lines(render::readiness(&session.view().readiness));
    Ok(())
}

fn ingest(session: &mut Session, workflow: WorkflowKind, source: &SourceArgs) -> anyhow::Result<()> {
    let msg = if let Some(path) = &source.file {
        session.dispatch(Msg::FileSelected {
            workflow,
            path: Some(path.clone()),
        })?;
        Msg::UploadClicked { workflow }
    } else {
        let urls = match &source.urls_from {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading urls from {}", path.display()))?;
                split_url_input(&raw)
            }
            None => source.urls.clone(),
        };
        Msg::UrlsSubmitted { workflow, urls }
    };
    let loaded = session.ingest(workflow, msg)?;
    audit_debug!(workflow: workflow, "{loaded} pages loaded");
    report_status(session, workflow);
    Ok(())
}

fn analyze(session: &mut Session, workflow: WorkflowKind) -> anyhow::Result<()> {
    session.dispatch_and_wait(workflow, Msg::AnalyzeClicked { workflow })?;
    session.ensure_ok(workflow)?;
    report_status(session, workflow);
    Ok(())
}

fn export_workflow(session: &mut Session, workflow: WorkflowKind) -> anyhow::Result<()> {
    session.dispatch(Msg::ExportClicked { workflow })?;
    let exported = session.take_exported();
    if exported.is_empty() {
        println!("Nothing to export.");
    }
    for path in exported {
        println!("Exported {}", path.display());
    }
    Ok(())
}

fn report_status(session: &Session, workflow: WorkflowKind) {
    let state = session.state();
    println!(
        "{}",
        render::status_line(workflow, state.phase(workflow), state.error(workflow))
    );
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
    println!();
}

fn parse_content_edit(value: &str) -> Result<(usize, PathBuf), String> {
    let (index, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=FILE, got {value:?}"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|err| format!("invalid page index {index:?}: {err}"))?;
    Ok((index, PathBuf::from(path)))
}
