// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use monthly_budget::{format_money, month_label, Command, Settings, SqliteStore, Tracker};

fn main() -> Result<()> {
    let settings = Settings::load();
    init_logging(&settings)?;

    let store = SqliteStore::open(&settings.db_path)
        .with_context(|| format!("Failed to open database {}", settings.db_path.display()))?;
    let tracker = Tracker::load(store);

    match settings.command {
        Command::Summary => run_summary(&tracker),
        Command::Ui => run_ui_mode(tracker),
    }
}

fn init_logging(settings: &Settings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("Failed to open log file {}", settings.log_file.display()))?;

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    tracing::info!(db = %settings.db_path.display(), "starting monthly-budget");
    Ok(())
}

fn run_summary(tracker: &Tracker<SqliteStore>) -> Result<()> {
    let today = Local::now().date_naive();
    let dashboard = tracker.dashboard(today);
    let summary = dashboard.summary;

    println!("📅 {}", month_label(today));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  My Income:              {:>14}", format_money(summary.income));
    println!("  Money Spent This Month: {:>14}", format_money(summary.total_spent));
    println!("  Money Left:             {:>14}", format_money(summary.money_left));

    println!("\n📊 Daily Spending");
    if dashboard.daily.is_empty() {
        println!("  No spending data to display.");
    }
    for point in &dashboard.daily {
        println!("  {}  {:>12}", point.label(), format_money(point.amount));
    }

    println!("\n🏷️  Top Spending Categories");
    if dashboard.categories.is_empty() {
        println!("  No spending data to display.");
    }
    for point in &dashboard.categories {
        println!(
            "  {:<20} {:>12}  {:>3.0}%",
            point.slice.label(),
            format_money(point.amount),
            monthly_budget::share(point, summary.total_spent)
        );
    }

    println!("\n🧾 Expenses ({})", dashboard.month_expenses.len());
    if dashboard.month_expenses.is_empty() {
        println!("  You have no expenses recorded this month.");
    }
    for expense in dashboard.list_view() {
        println!(
            "  {}  {} {:<28} {:>12}",
            expense.date,
            expense.category.icon(),
            expense.description,
            format_money(expense.amount)
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(tracker: Tracker<SqliteStore>) -> Result<()> {
    let mut app = ui::App::new(tracker);
    ui::run_ui(&mut app)?;
    tracing::info!("dashboard closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_tracker: Tracker<SqliteStore>) -> Result<()> {
    eprintln!("❌ Dashboard mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a summary: monthly-budget summary");
    std::process::exit(1);
}
