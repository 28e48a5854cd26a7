//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration (flags, then `.env`/environment, then defaults)
//! - loads the dataset
//! - prints tables/charts or launches the TUI
//! - writes optional exports

use clap::Parser;

use crate::cli::{ChartArgs, Command, SourceArgs, TableArgs};
use crate::domain::{DEFAULT_SMOOTHING_WINDOW, DashboardConfig, DataSource, SortDirective};
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;

const ENV_SOURCE: &str = "SALES_DATA_SOURCE";
const ENV_WINDOW: &str = "SALES_SMOOTHING_WINDOW";

/// Entry point for the `sales` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `sales` and `sales -s data.json` to behave like `sales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    dotenvy::dotenv().ok();

    let target = match cli.command {
        Command::Tui(_) => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    crate::logging::init(target)?;

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Table(args) => handle_table(args),
        Command::Chart(args) => handle_chart(args),
        Command::Summary(args) => handle_summary(args),
    }
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.common)?;
    config.sort = args.sort.map(|key| {
        if args.desc {
            SortDirective::descending(key)
        } else {
            SortDirective::ascending(key)
        }
    });
    config.export = args.export.clone();

    let store = pipeline::load_store(&config.source)?;
    let view = pipeline::build_view(&store.snapshot(), config.sort, config.window)?;

    println!("{}", crate::report::format_sales_table(&view.rows, view.sort));

    if let Some(path) = &config.export {
        crate::io::write_sales_csv(path, &view.rows)?;
    }
    Ok(())
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let mut config = config_from_args(&args.common)?;
    config.plot_width = args.width;
    config.plot_height = args.height;

    let store = pipeline::load_store(&config.source)?;
    let view = pipeline::build_view(&store.snapshot(), None, config.window)?;

    println!("Retail Sales (R) / Wholesale Sales (W)");
    println!(
        "{}",
        crate::plot::render_ascii_chart(&view.chart, config.plot_width, config.plot_height)
    );
    Ok(())
}

fn handle_summary(args: SourceArgs) -> Result<(), AppError> {
    let config = config_from_args(&args)?;
    let store = pipeline::load_store(&config.source)?;
    let snapshot = store.snapshot();

    match &snapshot.product {
        Some(product) => println!("{}", crate::report::format_product_summary(product)),
        None => println!("Loading..."),
    }
    Ok(())
}

/// Resolve configuration: CLI flag, then environment, then built-in default.
pub fn config_from_args(args: &SourceArgs) -> Result<DashboardConfig, AppError> {
    let env_source = std::env::var(ENV_SOURCE).ok();
    let env_window = std::env::var(ENV_WINDOW).ok();
    resolve_config(args, env_source.as_deref(), env_window.as_deref())
}

fn resolve_config(
    args: &SourceArgs,
    env_source: Option<&str>,
    env_window: Option<&str>,
) -> Result<DashboardConfig, AppError> {
    let source = args
        .source
        .as_deref()
        .or(env_source)
        .map(DataSource::parse)
        .unwrap_or(DataSource::Bundled);

    let window = match (args.window, env_window) {
        (Some(w), _) => w,
        (None, Some(raw)) => raw.trim().parse::<i64>().map_err(|e| {
            AppError::invalid_argument(format!("Invalid {ENV_WINDOW} '{raw}': {e}"))
        })?,
        (None, None) => DEFAULT_SMOOTHING_WINDOW,
    };
    if window <= 0 {
        return Err(AppError::invalid_argument(format!(
            "Smoothing window must be positive (got {window})."
        )));
    }

    Ok(DashboardConfig {
        source,
        window,
        ..DashboardConfig::default()
    })
}

/// Rewrite argv so `sales` defaults to `sales tui`.
///
/// Rules:
/// - `sales`                      -> `sales tui`
/// - `sales -s data.json ...`     -> `sales tui -s data.json ...`
/// - `sales --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "table" | "chart" | "summary");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
