#![deny(missing_docs)]
//! LogTriage command-line interface.
//!
//! Uploads log files to the analysis backend and renders the resulting
//! report, and checks backend connectivity.

mod transport;

use clap::{Args, Parser, Subcommand, ValueEnum};
use logtriage_core::{
    ApiConfig, ConnectivityStatus, HtmlRenderer, JsonRenderer, MarkdownRenderer, OutputRegion,
    OutputView, Pipeline, RenderedRegion, Renderer, SubmissionOutcome, TextRenderer, Transport,
    UploadFile, contract_json, probe_status,
};
use std::path::{Path, PathBuf};
use transport::ReqwestTransport;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DEFAULT_HOST: &str = "localhost";

#[derive(Parser)]
#[command(name = "logtriage", version, about = "LogTriage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct HostArgs {
    /// Hostname the client runs under; loopback hosts use the development backend.
    #[arg(long, env = "LOGTRIAGE_HOST", default_value = DEFAULT_HOST)]
    host: String,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for the rendered view.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the rendered view to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Markdown,
    Html,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the analysis backend is reachable.
    Status {
        #[command(flatten)]
        host: HostArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Upload a log file for analysis and render the report.
    Analyze {
        /// Log file to analyze. Nothing happens when omitted.
        file: Option<PathBuf>,
        #[command(flatten)]
        host: HostArgs,
        #[command(flatten)]
        report: OutputArgs,
        /// Skip the backend status check that runs alongside the upload.
        #[arg(long)]
        no_status: bool,
    },
    /// Print the OpenAPI description of the supported backend contract.
    Contract {
        /// Write the document to a file instead of stdout.
        #[arg(long = "report-output")]
        report_output: Option<PathBuf>,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { host, report } => {
            let config = ApiConfig::from_hostname(&host.host);
            let transport = ReqwestTransport::new()?;
            run_status(&transport, &config, &report).await?;
        }
        Commands::Analyze {
            file,
            host,
            report,
            no_status,
        } => {
            let config = ApiConfig::from_hostname(&host.host);
            let transport = ReqwestTransport::new()?;
            let run = run_analyze(transport, config, file, &report, !no_status).await?;
            if let Some(line) = &run.backend_status {
                eprint!("{line}");
            }
            if matches!(run.outcome, SubmissionOutcome::Stale(_)) {
                log::warn!("analysis result was superseded before it could be shown");
            }
        }
        Commands::Contract { report_output } => {
            let output = OutputArgs {
                format: OutputFormat::Json,
                report_output,
            };
            emit_output(&output, contract_json()?).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

/// Output region for the terminal.
///
/// Progress goes to stderr as soon as it is shown; the final view is kept
/// until the caller emits it.
struct ConsoleRegion {
    inner: RenderedRegion<Box<dyn Renderer + Send>>,
    show_progress: bool,
}

impl ConsoleRegion {
    fn new(format: OutputFormat, show_progress: bool) -> Self {
        Self {
            inner: RenderedRegion::new(renderer_for(format)),
            show_progress,
        }
    }

    fn take_content(&mut self) -> Option<String> {
        self.inner.take_content()
    }
}

impl OutputRegion for ConsoleRegion {
    fn replace(&mut self, view: &OutputView) {
        if self.show_progress && matches!(view, OutputView::Loading(_)) {
            eprint!("{}", TextRenderer.render(view));
        }
        self.inner.replace(view);
    }
}

fn renderer_for(format: OutputFormat) -> Box<dyn Renderer + Send> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer),
        OutputFormat::Markdown => Box::new(MarkdownRenderer),
        OutputFormat::Html => Box::new(HtmlRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

async fn run_status<T: Transport>(
    transport: &T,
    config: &ApiConfig,
    output: &OutputArgs,
) -> CliResult<ConnectivityStatus> {
    let mut region = ConsoleRegion::new(output.format, false);
    let status = probe_status(transport, config, Some(&mut region)).await;
    if let Some(contents) = region.take_content() {
        emit_output(output, contents).await?;
    }
    Ok(status)
}

/// What an `analyze` run produced.
#[derive(Debug)]
struct AnalyzeRun {
    outcome: SubmissionOutcome,
    /// Backend status line from the check that ran alongside the upload.
    backend_status: Option<String>,
}

async fn run_analyze<T: Transport>(
    transport: T,
    config: ApiConfig,
    file: Option<PathBuf>,
    output: &OutputArgs,
    check_status: bool,
) -> CliResult<AnalyzeRun> {
    let upload = match file {
        Some(path) => Some(load_upload(&path).await?),
        None => None,
    };

    let region = ConsoleRegion::new(output.format, true);
    let pipeline = Pipeline::new(config, transport, region);

    if upload.is_none() {
        log::info!("no log file selected; nothing to analyze");
        return Ok(AnalyzeRun {
            outcome: pipeline.submit(None).await,
            backend_status: None,
        });
    }

    let (outcome, backend_status) = if check_status {
        let mut status_region = RenderedRegion::new(TextRenderer);
        let probe = probe_status(
            pipeline.transport(),
            pipeline.config(),
            Some(&mut status_region),
        );
        let (_, outcome) = tokio::join!(probe, pipeline.submit(upload));
        (outcome, status_region.take_content())
    } else {
        (pipeline.submit(upload).await, None)
    };

    let mut region = pipeline.into_region();
    if let Some(contents) = region.take_content() {
        emit_output(output, contents).await?;
    }
    Ok(AnalyzeRun {
        outcome,
        backend_status,
    })
}

async fn load_upload(path: &Path) -> CliResult<UploadFile> {
    let content = tokio::fs::read(path).await.map_err(|err| {
        format!("failed to read log file {}: {err}", path.display())
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadFile::new(name, content))
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}
