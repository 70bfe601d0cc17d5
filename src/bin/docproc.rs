//! CLI binary for docproc.
//!
//! The terminal is the view layer: it turns flags (or stdin commands in
//! interactive mode) into form events and prints the rendered form.

use anyhow::{Context, Result};
use clap::Parser;
use docproc::{
    Banner, DocumentProcessor, FormConfig, FormController, FormObserver, FormState, FormView,
    Phase, SelectedFile, SimulatedProcessor, Ticket, ViewCommand,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Terminal observer using indicatif ───────────────────────────────────────

/// Shows a "Processing..." spinner for the in-flight submission and reports
/// view commands the terminal has to act on.
struct CliObserver {
    spinner: Mutex<Option<ProgressBar>>,
    show_progress: bool,
}

impl CliObserver {
    fn new(show_progress: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            show_progress,
        })
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(bar) = guard.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl FormObserver for CliObserver {
    fn on_submission_start(&self, _ticket: Ticket, file_name: &str) {
        if !self.show_progress {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(format!("Processing... {}", dim(file_name)));
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(bar);
        }
    }

    fn on_transition(&self, from: &Phase, _to: &Phase) {
        if matches!(from, Phase::Processing(_)) {
            self.clear_spinner();
        }
    }

    fn on_view_command(&self, command: &ViewCommand) {
        match command {
            ViewCommand::ClearFileInput => {
                if self.show_progress {
                    eprintln!("{}", dim("file input cleared"));
                }
            }
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Process a document (key from the environment)
  DOCPROC_API_KEY=sk-test docproc report.pdf

  # Key on the command line, shown unmasked in the output
  docproc report.pdf --api-key sk-test --show-key

  # Reject files outside the advertised types and 10MB limit
  docproc big.pdf --api-key sk-test --enforce-limits

  # Rendered form as JSON
  docproc report.pdf --api-key sk-test --json

  # Drive the form from stdin
  docproc --interactive

INTERACTIVE COMMANDS:
  file <path>   select a document
  key <text>    set the API key text (empty clears it)
  toggle        show / hide the API key
  submit        process the document
  reset         clear the form ("Process Another")
  show          print the form
  quit          exit

ENVIRONMENT VARIABLES:
  DOCPROC_API_KEY     API key used when --api-key is not given
  DOCPROC_DELAY_MS    Simulated processing time in milliseconds
  RUST_LOG            Override log filter (e.g. docproc=debug)
"#;

/// Submit a document for processing with an API key.
#[derive(Parser, Debug)]
#[command(
    name = "docproc",
    version,
    about = "Submit a document for processing with an API key",
    long_about = "Select a document, provide an API key and submit it for processing. \
Processing is simulated: it waits a fixed delay and succeeds. Supported types: \
PDF, DOC, DOCX, TXT, MD (max 10MB, advisory unless --enforce-limits).",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to process.
    file: Option<PathBuf>,

    /// API key. Never stored or logged.
    #[arg(long, env = "DOCPROC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Show the API key unmasked in the rendered form.
    #[arg(long)]
    show_key: bool,

    /// Simulated processing time in milliseconds.
    #[arg(long, env = "DOCPROC_DELAY_MS", default_value_t = 2000)]
    delay_ms: u64,

    /// Reject unsupported extensions and files over the size limit.
    #[arg(long, env = "DOCPROC_ENFORCE_LIMITS")]
    enforce_limits: bool,

    /// Make the simulated processor fail with this reason.
    #[arg(long, value_name = "REASON")]
    simulate_failure: Option<String>,

    /// Output the rendered form as JSON.
    #[arg(long)]
    json: bool,

    /// Read form commands from stdin.
    #[arg(short, long)]
    interactive: bool,

    /// Disable the spinner.
    #[arg(long, env = "DOCPROC_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCPROC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the final banner and errors.
    #[arg(short, long, env = "DOCPROC_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers what the user needs to see while busy, so library
    // INFO logs are hidden unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let observer = CliObserver::new(show_progress);
    let config = FormConfig::builder()
        .processing_delay_ms(cli.delay_ms)
        .enforce_file_limits(cli.enforce_limits)
        .observer(observer.clone() as Arc<dyn FormObserver>)
        .build()
        .context("Invalid configuration")?;

    let delay = config.processing_delay();
    let processor: Arc<dyn DocumentProcessor> = match cli.simulate_failure {
        Some(ref reason) => Arc::new(SimulatedProcessor::failing(delay, reason.clone())),
        None => Arc::new(SimulatedProcessor::new(delay)),
    };
    let mut form = FormController::new(processor, config);

    if cli.show_key {
        form.toggle_key_visibility();
    }
    if let Some(ref key) = cli.api_key {
        form.edit_api_key(key.as_str());
    }
    if let Some(ref path) = cli.file {
        let file = SelectedFile::from_path(path)
            .await
            .with_context(|| format!("Failed to select {}", path.display()))?;
        form.select_file(file);
    }

    if cli.interactive {
        run_interactive(&mut form, &cli, BufReader::new(tokio::io::stdin())).await?;
        observer.clear_spinner();
    } else {
        // ── One-shot submit ──────────────────────────────────────────────
        form.submit().await;
        observer.clear_spinner();
        emit(&form.view(), &cli)?;
    }

    Ok(if ends_in_error(form.state()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// The process fails when the form is left showing an error banner.
fn ends_in_error(state: &FormState) -> bool {
    matches!(state.phase, Phase::Errored(_))
}

/// Read commands until EOF or `quit`, applying completions as they arrive
/// so `reset` can interrupt a running submission.
async fn run_interactive<R>(form: &mut FormController, cli: &Cli, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    if !cli.quiet {
        eprintln!("{}", dim("commands: file <path> | key <text> | toggle | submit | reset | show | quit"));
        emit(&form.view(), cli)?;
    }

    loop {
        tokio::select! {
            _ = form.next_completion(), if form.state().is_processing() => {
                emit(&form.view(), cli)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                let (cmd, rest) = match line.trim_start().split_once(char::is_whitespace) {
                    Some((c, r)) => (c.to_string(), r.trim().to_string()),
                    None => (line.trim().to_string(), String::new()),
                };
                match cmd.as_str() {
                    "" => continue,
                    "file" => match SelectedFile::from_path(&rest).await {
                        Ok(file) => form.select_file(file),
                        Err(e) => {
                            eprintln!("{} {}", red("✗"), e);
                            continue;
                        }
                    },
                    "key" => form.edit_api_key(rest),
                    "toggle" => form.toggle_key_visibility(),
                    "submit" => {
                        form.begin_submit();
                    }
                    "reset" => form.reset(),
                    "show" => {}
                    "quit" | "exit" => break,
                    other => {
                        eprintln!("{} unknown command '{}'", red("✗"), other);
                        continue;
                    }
                }
                emit(&form.view(), cli)?;
            }
        }
    }

    // Dropping the form aborts its task, so finish a pending submission first.
    if form.state().is_processing() {
        form.next_completion().await;
        emit(&form.view(), cli)?;
    }

    Ok(())
}

/// Print the form as JSON or as text, honouring `--quiet`.
fn emit(view: &FormView, cli: &Cli) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(view).context("Failed to serialise form")?;
        println!("{json}");
    } else if cli.quiet {
        if let Some(ref banner) = view.banner {
            println!("{}", banner.message());
        }
    } else {
        print_form(view);
    }
    Ok(())
}

fn print_form(view: &FormView) {
    println!();
    println!("{}", bold(view.title));
    println!("{}", dim(view.subtitle));
    println!();
    println!("{} {}", cyan("◆"), bold(view.card_title));
    println!("  {}", dim(view.card_description));
    println!();

    println!("  Select Document  {}", dim(&format!("[{}]", view.file_accept)));
    match view.selected_file {
        Some(ref line) => println!("    {} {}", green("✓"), green(line)),
        None => println!("    {}", dim("(no file selected)")),
    }

    let key = if view.api_key_display.is_empty() {
        dim(view.api_key_placeholder)
    } else {
        view.api_key_display.clone()
    };
    println!("  API Key          {}  {}", key, dim(&format!("({})", view.key_toggle_label)));
    println!();

    println!("  {} {}", cyan("🔒"), bold(view.privacy_title));
    println!("     {}", dim(view.privacy_notice));
    println!();

    match view.banner {
        Some(Banner::Error(ref m)) => println!("  {} {}", red("✗"), red(m)),
        Some(Banner::Success(ref m)) => println!("  {} {}", green("✓"), green(m)),
        None => {}
    }

    let submit = format!("[ {} ]", view.submit_label);
    let submit = if view.submit_enabled {
        bold(&submit)
    } else {
        dim(&submit)
    };
    match view.reset_label {
        Some(reset) => println!("  {}  [ {} ]", submit, reset),
        None => println!("  {}", submit),
    }
    println!();

    println!("  {}", dim("Supported file types:"));
    println!("  {}", dim(&view.supported_types));
    println!();
    println!("{}", dim(view.footer));
}
