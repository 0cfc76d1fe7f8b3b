use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use smart_content_core::{
    BackendConfig, Command, Dispatcher, ProcessingOption, ProcessingOptions, RequestLifecycle,
    ResultTab, SessionHandle, SourceKind, config::parse_timeout_secs, format_preview,
    format_result_readable, spawn_session,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod media;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let whole = d.as_secs();
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// CLI wrapper for SourceKind (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliSource {
    Youtube,
    Video,
    Audio,
    Document,
    /// Generic upload, routed by content type
    Upload,
}

impl From<CliSource> for SourceKind {
    fn from(cli: CliSource) -> Self {
        match cli {
            CliSource::Youtube => SourceKind::Youtube,
            CliSource::Video => SourceKind::Video,
            CliSource::Audio => SourceKind::Audio,
            CliSource::Document => SourceKind::Document,
            CliSource::Upload => SourceKind::Upload,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliSection {
    Summary,
    Transcript,
    Notes,
    Quiz,
}

impl From<CliSection> for ProcessingOption {
    fn from(cli: CliSection) -> Self {
        match cli {
            CliSection::Summary => ProcessingOption::Summary,
            CliSection::Transcript => ProcessingOption::Transcript,
            CliSection::Notes => ProcessingOption::Notes,
            CliSection::Quiz => ProcessingOption::Quiz,
        }
    }
}

impl From<CliSection> for ResultTab {
    fn from(cli: CliSection) -> Self {
        match cli {
            CliSection::Summary => ResultTab::Summary,
            CliSection::Transcript => ResultTab::Transcript,
            CliSection::Notes => ResultTab::Notes,
            CliSection::Quiz => ResultTab::Quiz,
        }
    }
}

#[derive(Parser)]
#[command(name = "smart-content")]
#[command(
    about = "Analyze a YouTube link, media file or document: transcript, summary, notes and quiz"
)]
struct Cli {
    /// Kind of content source
    source: CliSource,

    /// YouTube URL, or path of the file to upload
    input: String,

    /// Result sections to request (comma separated)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_values = ["transcript", "summary"]
    )]
    options: Vec<CliSection>,

    /// Section to show. Defaults to summary, or the first requested section.
    #[arg(short, long)]
    tab: Option<CliSection>,

    /// Show every requested section
    #[arg(long)]
    all_tabs: bool,

    /// Analysis service base URL (overrides SMART_CONTENT_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds, 0 waits forever (overrides SMART_CONTENT_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<String>,

    /// Content type of the uploaded file. Guessed from the extension by default.
    #[arg(long)]
    content_type: Option<String>,

    /// Print the analysis result as JSON
    #[arg(long)]
    json: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("smart_content=warn,smart_content_core=warn"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true),
            )
            .with(env_filter)
            .init();
    }
}

fn build_config(cli: &Cli) -> Result<BackendConfig> {
    let mut config = BackendConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = BackendConfig::new(url.as_str())?.with_timeout(config.timeout);
    }
    if let Some(raw) = &cli.timeout {
        config = config.with_timeout(parse_timeout_secs("--timeout", raw)?);
    }
    Ok(config)
}

fn fail(message: &str) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e.to_string()),
    };
    info!(base_url = %config.base_url, timeout = ?config.timeout, "backend configured");

    println!(
        "\n{}  {}\n",
        style("smart-content").cyan().bold(),
        style("Content Analyzer").dim()
    );
    println!(
        "{} Backend: {}",
        style("✓").green().bold(),
        style(&config.base_url).dim()
    );

    let enabled: Vec<ProcessingOption> = cli.options.iter().map(|o| (*o).into()).collect();
    let options = ProcessingOptions::from_enabled(&enabled);
    let mut handle = spawn_session(Dispatcher::new(config), options);

    let outcome = run(&cli, &mut handle).await;
    handle.shutdown().await;

    if let Err(e) = outcome {
        fail(&format!("{e:#}"));
    }
    Ok(())
}

async fn run(cli: &Cli, handle: &mut SessionHandle) -> Result<()> {
    let kind: SourceKind = cli.source.into();
    handle.send(Command::SelectSource(kind)).await?;

    let selected = if kind == SourceKind::Youtube {
        handle.send(Command::SetUrl(cli.input.clone())).await?
    } else {
        let path = PathBuf::from(&cli.input);
        let file = media::load_upload(&path, cli.content_type.as_deref()).await?;
        println!(
            "{} File: {} {}",
            style("✓").green().bold(),
            file.name,
            style(format!("({})", file.content_type)).dim()
        );
        handle.send(Command::ChooseFile(file)).await?
    };

    if let Some(preview) = &selected.preview {
        println!("{} {}", style("✓").green().bold(), format_preview(preview).trim_end());
    }
    if !selected.can_submit {
        bail!("Not a recognizable YouTube link: {}", cli.input);
    }

    println!("{}", style("─".repeat(60)).dim());

    let started = Instant::now();
    let spinner = create_spinner(&format!("Analyzing {}...", kind));
    let submitted = handle.send(Command::Submit).await?;

    if let Some(document) = submitted.document_chat {
        spinner.finish_and_clear();
        println!(
            "{} {} is a PDF, open it in the document chat assistant.",
            style("→").cyan().bold(),
            style(document).bold()
        );
        return Ok(());
    }

    let mut settled = handle.wait_until_settled().await?;
    spinner.finish_and_clear();

    if let Some(tab) = cli.tab {
        let tab: ResultTab = tab.into();
        if !settled.tabs.contains(&tab) {
            println!(
                "{} {} was not requested, showing the default section",
                style("!").yellow().bold(),
                tab.label()
            );
        }
        settled = handle.send(Command::SelectTab(tab)).await?;
    }

    let result = match &settled.lifecycle {
        RequestLifecycle::Success(result) => result,
        RequestLifecycle::Error(message) => bail!("{message}"),
        other => bail!("request ended in unexpected state: {}", other.name()),
    };

    println!(
        "{} Analysis complete {}",
        style("✓").green().bold(),
        style(format!("[{}]", format_duration(started.elapsed()))).dim()
    );
    println!("{}", style("─".repeat(60)).dim());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let shown: Vec<ResultTab> = if cli.all_tabs {
        settled.tabs.clone()
    } else {
        settled.active_tab.into_iter().collect()
    };
    let readable = format_result_readable(result, &settled.tabs, &shown, settled.active_tab);
    println!("{}", readable);

    Ok(())
}
