use std::path::PathBuf;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{CliArgs, Command, SubmitArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile, IfMissing};
use crate::form::{score_options, RecordForm};
use crate::output::{self, OutputFormat};
use crate::record::Mood;
use crate::render::terminal::{TerminalOptions, TerminalSurface, DEFAULT_COLUMN_WIDTH};
use crate::render::{ListView, MemorySurface};
use crate::session::Session;
use crate::store::{RecordStore, StoreOptions};

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    endpoint: Option<String>,
    timeout: Option<u64>,
    export_dir: PathBuf,
    no_color: bool,
    terminal: TerminalOptions,
    config_path: Option<PathBuf>,
    command: Command,
}

fn build_run_config(
    args: CliArgs,
    cfg: ConfigFile,
    config_path: Option<PathBuf>,
) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);
    let full_text = args.full_text || cfg.full_text.unwrap_or(false);
    let column_width = args
        .column_width
        .or(cfg.column_width)
        .unwrap_or(DEFAULT_COLUMN_WIDTH);
    if column_width < 4 {
        return Err(format!(
            "invalid column_width {column_width}, expected at least 4 characters"
        ));
    }

    let endpoint = args
        .endpoint
        .or(cfg.endpoint)
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    let timeout = args.timeout.or(cfg.timeout).filter(|t| *t > 0);

    let export_dir = match &args.command {
        Command::Export { dir: Some(dir) } => dir.clone(),
        _ => cfg.export_dir.unwrap_or_else(|| ".".to_string()),
    };

    Ok(RunConfig {
        endpoint,
        timeout,
        export_dir: config::expand_tilde(&export_dir),
        no_color,
        terminal: TerminalOptions {
            full_text,
            column_width,
        },
        config_path,
        command: args.command,
    })
}

fn build_store(run: &RunConfig) -> Result<RecordStore, String> {
    let endpoint = run.endpoint.clone().ok_or_else(|| {
        "no record store endpoint configured (use --endpoint or set endpoint in the config file)"
            .to_string()
    })?;
    RecordStore::new(&StoreOptions {
        endpoint,
        timeout_seconds: run.timeout,
    })
    .map_err(|e| e.to_string())
}

fn form_from_args(args: SubmitArgs) -> RecordForm {
    RecordForm {
        score: args.score,
        mood: args.mood.unwrap_or_default(),
        word: args.word,
        summary: args.summary,
        praise: args.praise,
        helpful: args.helpful,
        nickname: args.nickname,
        ..RecordForm::default()
    }
}

fn print_form() {
    let scores = score_options()
        .into_iter()
        .map(|o| o.label)
        .collect::<Vec<_>>()
        .join(", ");
    let moods = Mood::ALL
        .iter()
        .map(|m| {
            if *m == Mood::default() {
                format!("{} {} (default)", m.glyph(), m.label())
            } else {
                format!("{} {}", m.glyph(), m.label())
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format_kv_line("Scores", &scores);
    format_kv_line("Moods", &moods);
}

async fn run_list(run: &RunConfig, format: OutputFormat) -> Result<(), String> {
    let store = build_store(run)?;
    match format {
        OutputFormat::Text => {
            format_kv_line("Endpoint", store.endpoint().as_str());
            println!();
            let mut session = Session::new(store, TerminalSurface::new(run.terminal));
            session.load().await;
            if let ListView::Rows(_) = session.view() {
                let summary = output::summarize(session.records());
                let average = summary
                    .average_score
                    .map(|a| format!("{a:.1}"))
                    .unwrap_or_else(|| "-".to_string());
                format_kv_line(
                    "Records",
                    &format!("{} (average score {})", summary.total, average),
                );
            }
            Ok(())
        }
        OutputFormat::Json => {
            let mut session = Session::new(store, MemorySurface::default());
            session.load().await;
            if let ListView::Error(message) = session.view() {
                return Err(message.clone());
            }
            let rendered = output::render_json(session.records());
            print!("{}", String::from_utf8_lossy(&rendered));
            Ok(())
        }
    }
}

async fn run_submit(run: &RunConfig, args: SubmitArgs) -> Result<(), String> {
    let store = build_store(run)?;
    let mut session = Session::new(store, TerminalSurface::new(run.terminal));
    let mut form = form_from_args(args);
    match session.submit(&mut form).await {
        Ok(_) => {
            println!("{}", "✅ 성공적으로 기록되었습니다.".bold().green());
            Ok(())
        }
        Err(e) => Err(e.alert()),
    }
}

async fn run_export(run: &RunConfig) -> Result<(), String> {
    let store = build_store(run)?;
    let mut session = Session::new(store, TerminalSurface::new(run.terminal));
    session.load().await;
    let outcome = session
        .export(&run.export_dir)
        .map_err(|e| e.to_string())?;
    println!("{}", outcome.notice().bold());
    Ok(())
}

fn run_init_config(run: &RunConfig) -> Result<(), String> {
    let path = run
        .config_path
        .clone()
        .or_else(config::default_config_path)
        .ok_or_else(|| "could not determine a config path, pass --config".to_string())?;
    if config::ensure_default_config_file(&path).map_err(|e| e.to_string())? {
        format_kv_line("Config", &format!("written to {}", path.display()));
    } else {
        format_kv_line("Config", &format!("already exists at {}", path.display()));
    }
    Ok(())
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    match run.command.clone() {
        Command::List { format } => {
            let format = OutputFormat::parse(&format)
                .ok_or_else(|| format!("invalid --format '{format}', expected text or json"))?;
            run_list(&run, format).await
        }
        Command::Submit(args) => run_submit(&run, args).await,
        Command::Export { .. } => run_export(&run).await,
        Command::Form => {
            print_form();
            Ok(())
        }
        Command::InitConfig => run_init_config(&run),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_tracing(args.verbose);

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match (&args.command, user_config_path.as_ref()) {
        (Command::InitConfig, _) => ConfigFile::default(),
        (_, Some(path)) => {
            config::load_config(path, IfMissing::Fail).map_err(|e| e.to_string())?
        }
        (_, None) => match config::default_config_path() {
            Some(path) => {
                config::load_config(&path, IfMissing::UseDefaults).map_err(|e| e.to_string())?
            }
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg, user_config_path)?;
    if run.no_color {
        colored::control::set_override(false);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
