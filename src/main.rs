// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{anyhow, Result};
use std::env;

use mini_crm::chart::{ChartDataProvider, LedgerTrendProvider, MockTrendProvider};
use mini_crm::logging::init_logging;
use mini_crm::{text_chart, AppConfig, InventoryLedger, VERSION};

const USAGE: &str = "\
mini-crm - produce wholesaler CRM

USAGE:
    mini-crm                          Start the terminal UI
    mini-crm report <merchant> [year] Print a text sales chart
        --ledger                      Sum the sample ledger instead of mock data
    mini-crm --help                   Show this message

Config is read from $MINI_CRM_CONFIG or config/mini-crm.toml.";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = AppConfig::load()?;
    let _logger = init_logging(&config.logging)?;
    log::info!("mini-crm {} starting", VERSION);

    if args.len() > 1 && args[1] == "report" {
        run_report(&config, &args[2..])?;
    } else if args.len() > 1 {
        eprintln!("❌ Unknown command: {}\n", args[1]);
        eprintln!("{}", USAGE);
        std::process::exit(2);
    } else {
        // UI mode (default)
        run_ui_mode(config)?;
    }

    Ok(())
}

fn run_report(config: &AppConfig, args: &[String]) -> Result<()> {
    let use_ledger = args.iter().any(|a| a == "--ledger");
    let args: Vec<&String> = args.iter().filter(|a| *a != "--ledger").collect();

    let merchant = args
        .first()
        .ok_or_else(|| anyhow!("report needs a merchant name, e.g. mini-crm report \"Mall E\""))?;
    let year: i32 = match args.get(1) {
        Some(raw) => raw.parse().map_err(|_| anyhow!("invalid year: {}", raw))?,
        None => 2024,
    };

    let series = if use_ledger {
        let ledger = InventoryLedger::with_defaults();
        LedgerTrendProvider::new(&ledger).monthly_series(merchant, year)?
    } else {
        MockTrendProvider::new(config.chart.jitter).monthly_series(merchant, year)?
    };
    let title = format!("📈 {} - {} monthly purchases", merchant, year);

    print!("{}", text_chart(&title, &series, "box"));
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: AppConfig) -> Result<()> {
    let mut app = ui::App::new(config);
    ui::run_ui(&mut app)?;

    log::info!("UI closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin crm-server --features server");
    std::process::exit(1);
}
