// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use bike_dashboard::{
    init_tracing, ChartId, ConfigArgs, DashboardService, DASHBOARD_TITLE, VERSION,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bike-dashboard")]
#[command(version = VERSION)]
#[command(about = "Bike sharing data dashboard for daily and hourly rental records")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,

    /// Print record counts and the four aggregate series
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.resolve().context("Failed to load configuration")?;

    let command = cli.command.unwrap_or(Command::Tui);
    match command {
        // Keep the alternate screen clean unless RUST_LOG asks for more
        Command::Tui => init_tracing("warn"),
        Command::Summary { .. } => init_tracing(&config.logging.level),
    }

    let service = match DashboardService::load(&config.data) {
        Ok(service) => service,
        Err(e) => {
            tracing::error!(error = %e, "Dataset load failed");
            eprintln!("❌ Data unavailable: {}", e);
            std::process::exit(1);
        }
    };

    match command {
        Command::Tui => run_ui_mode(&service),
        Command::Summary { json } => print_summary(&service, json),
    }
}

fn print_summary(service: &DashboardService, json: bool) -> Result<()> {
    if json {
        let payload = serde_json::json!({
            "overview": service.overview(),
            "charts": service.charts(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let overview = service.overview();

    println!("{}", DASHBOARD_TITLE);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total Daily Records:  {}", overview.daily_records);
    println!("Total Hourly Records: {}", overview.hourly_records);
    println!("Columns in Daily Data:  {}", overview.daily_columns.join(", "));
    println!("Columns in Hourly Data: {}", overview.hourly_columns.join(", "));

    for id in ChartId::ALL {
        let series = service.chart(id);
        println!("\n{} ({} / {})", series.title, series.x_label, series.y_label);
        for point in &series.points {
            println!("  {:>20}  {:>10.2}", point.label, point.value);
        }
        if let Some(peak) = series.peak() {
            println!("  Peak: {} ({:.2})", peak.label, peak.value);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(service: &DashboardService) -> Result<()> {
    let mut app = ui::App::new(service);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_service: &DashboardService) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print the numbers: bike-dashboard summary");
    std::process::exit(1);
}
