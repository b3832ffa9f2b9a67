use chrono::Local;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use daily_invoices::config::{config_dir, init_config_dir, load_config, ConfigSource};
use daily_invoices::invoice::HttpTransport;
use daily_invoices::view::{
    DateSelector, InvoiceView, Layout, LoadingIndicator, NativeDateInput, RangePicker,
    TerminalPresenter,
};
use daily_invoices::{Config, InvoiceFetcher, Result, ViewerError};

#[derive(Parser)]
#[command(name = "invoices")]
#[command(version, about = "Daily invoice viewer", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir for invoices)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Log request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the config directory with a template config.toml
    Init,

    /// Show the invoices for one day
    Show {
        #[command(flatten)]
        day: DayArgs,

        /// Shift the chosen day by this many days (e.g. -1 for the day before)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,

        /// Show line items as a table
        #[arg(long)]
        table: bool,
    },

    /// Step through days interactively (n, p, r, q or a date)
    Browse {
        #[command(flatten)]
        day: DayArgs,

        /// Show line items as a table
        #[arg(long)]
        table: bool,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Args)]
#[group(multiple = false)]
struct DayArgs {
    /// Day to show, as YYYY-MM-DD (default: today)
    #[arg(short, long, value_name = "YYYY-MM-DD")]
    date: Option<String>,

    /// Day to show in the picker's display format (e.g. "5 Mar 2024")
    #[arg(short, long, value_name = "DAY")]
    pick: Option<String>,
}

type StdoutView = InvoiceView<HttpTransport, TerminalPresenter<io::Stdout>>;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "daily_invoices=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Show { day, offset, table } => cmd_show(&cfg_dir, &day, offset, table),
        Commands::Browse { day, table } => cmd_browse(&cfg_dir, &day, table),
        Commands::Config => cmd_config(&cfg_dir),
    }
}

/// Initialize config directory with the template file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config_dir(cfg_dir)?;

    println!("Initialized invoices config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Point at your API:   $EDITOR {}", path.display());
    println!("  2. Show today's sales:  invoices show");

    Ok(())
}

fn selector_for(config: &Config, day: &DayArgs) -> Result<Box<dyn DateSelector>> {
    let today = Local::now().date_naive();
    let format = &config.display.date_format;

    let selector: Box<dyn DateSelector> = match (&day.date, &day.pick) {
        (_, Some(input)) => {
            let mut picker = RangePicker::new(today, format)?;
            let date = picker.parse(input)?;
            picker.set_value(date)?;
            Box::new(picker)
        }
        (Some(input), None) => {
            let mut native = NativeDateInput::new(today, format)?;
            let date = native.parse(input)?;
            native.set_value(date)?;
            Box::new(native)
        }
        (None, None) => Box::new(NativeDateInput::new(today, format)?),
    };
    Ok(selector)
}

fn build_view(cfg_dir: &Path, day: &DayArgs, table: bool) -> Result<StdoutView> {
    let (config, _) = load_config(cfg_dir)?;
    let selector = selector_for(&config, day)?;
    let layout = if table { Layout::Table } else { Layout::Text };
    let presenter = TerminalPresenter::new(
        io::stdout(),
        layout,
        &config.display.currency_symbol,
        LoadingIndicator::for_stderr(),
    );

    Ok(InvoiceView::new(
        selector,
        InvoiceFetcher::from_settings(&config.api),
        presenter,
        &config.display.currency_symbol,
    ))
}

/// Fetch and print one day
fn cmd_show(cfg_dir: &Path, day: &DayArgs, offset: i64, table: bool) -> Result<()> {
    let mut view = build_view(cfg_dir, day, table)?;
    if offset == 0 {
        view.load()
    } else {
        view.shift_by(offset)
    }
}

const BROWSE_HELP: &str = "Commands: n/next, p/prev, r/refresh, q/quit, or type a date";

/// Interactive day-by-day navigation driven by stdin
fn cmd_browse(cfg_dir: &Path, day: &DayArgs, table: bool) -> Result<()> {
    let mut view = build_view(cfg_dir, day, table)?;
    view.load()?;

    println!();
    println!("{BROWSE_HELP}");
    prompt()?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let outcome = match line.trim() {
            "" => Ok(()),
            "q" | "quit" | "exit" => break,
            "n" | "next" => view.shift_by(1),
            "p" | "prev" => view.shift_by(-1),
            "r" | "refresh" => view.load(),
            "h" | "help" | "?" => {
                println!("{BROWSE_HELP}");
                Ok(())
            }
            input => view.select(input),
        };

        match outcome {
            Ok(()) => {}
            Err(e @ (ViewerError::InvalidDate { .. } | ViewerError::DateOutOfRange { .. })) => {
                println!("{e}");
            }
            Err(e) => return Err(e),
        }
        prompt()?;
    }

    Ok(())
}

fn prompt() -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Print the effective configuration and where it came from
fn cmd_config(cfg_dir: &Path) -> Result<()> {
    let (config, source) = load_config(cfg_dir)?;
    let today = NativeDateInput::new(Local::now().date_naive(), &config.display.date_format)?;

    println!("Invoices Config");
    println!("{}", "-".repeat(50));
    match source {
        ConfigSource::File(path) => println!("Config file:      {} (active)", path.display()),
        ConfigSource::Defaults => println!(
            "Config file:      {} (not found, using defaults)",
            cfg_dir.join("config.toml").display()
        ),
    }
    println!("Endpoint:         {}", config.api.endpoint);
    println!("Organization id:  {}", config.api.organization_id);
    println!("Timeout:          {}s", config.api.timeout_secs);
    println!("Currency:         {}", config.display.currency_symbol);
    println!(
        "Date format:      {} (today: {})",
        config.display.date_format,
        today.display(today.value())
    );

    Ok(())
}
