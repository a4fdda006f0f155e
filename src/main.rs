// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the CSV, printing diagnostics.
// - Option [2] renders the sales and finance pages for the selected period,
//   exports every view as CSV and writes a JSON summary.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
use anyhow::Context;
use clap::Parser;
use liquor_dashboard::args::Args;
use liquor_dashboard::reports::{self, SalesSelection};
use liquor_dashboard::types::{PeriodSeriesRow, RankedRow, SeriesRow};
use liquor_dashboard::{loader, output, util, Dataset, Measure};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

// The table is loaded once and then only read, so it is shared behind an Arc
// instead of being cloned for every report run.
#[derive(Default)]
struct AppState {
    data: Option<Arc<Dataset>>,
}

fn init_logger(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        let resp = read_line("Back to Report Selection (Y/N): ").to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Ask for the sales page month, keeping `current` on empty input.
fn prompt_month(current: u32) -> u32 {
    loop {
        let resp = read_line(&format!("Month 1-12 [{}]: ", current));
        if resp.is_empty() {
            return current;
        }
        match resp.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => return m,
            _ => println!("Invalid month. Please enter a number from 1 to 12."),
        }
    }
}

/// Handle option [1]: load and clean the CSV file.
fn handle_load(args: &Args, state: &mut AppState) -> anyhow::Result<()> {
    let (data, report) = loader::load_and_clean(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    println!(
        "Processing dataset... ({} rows read, {} kept)",
        util::format_int(report.total_rows),
        util::format_int(report.kept_rows)
    );
    println!(
        "Note: {} rows dropped due to missing values, {} unreadable.",
        util::format_int(report.incomplete_rows),
        util::format_int(report.parse_errors)
    );
    if report.defaulted_coords > 0 {
        println!(
            "Info: Defaulted coordinates for {} rows.",
            util::format_int(report.defaulted_coords)
        );
    }
    let years: Vec<String> = data.years().iter().map(|y| y.to_string()).collect();
    println!("Years available: {}\n", years.join(", "));
    state.data = Some(Arc::new(data));
    Ok(())
}

fn export<T: serde::Serialize>(dir: &Path, name: &str, rows: &[T]) -> anyhow::Result<()> {
    let path = dir.join(name);
    output::write_csv(&path, rows).with_context(|| format!("Failed to write {}", path.display()))
}

/// Handle option [2]: render both pages, export them and write the summary.
fn handle_generate_reports(args: &Args, state: &AppState, month: u32) -> anyhow::Result<()> {
    let Some(data) = state.data.as_deref() else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };
    let season_measure = Measure::from_name(&args.season_measure)?;
    let selection = SalesSelection {
        year: args.year,
        month,
        counties: args.counties.clone(),
        products: args.products.clone(),
        season_measure,
    };
    debug!("{:?}", selection);
    std::fs::create_dir_all(&args.out_dir)?;
    let dir = args.out_dir.as_path();

    println!("Generating reports for {}-{:02}...\n", args.year, month);

    let sales = reports::sales_overview(data, &selection)?;
    let cards = reports::card_rows(&sales.cards);
    export(dir, "sales_cards.csv", &cards)?;
    output::preview_table("Sales: Month KPIs", Some("change vs. previous month"), &cards, cards.len());

    export(dir, "sales_monthly.csv", &sales.monthly)?;
    output::preview_table::<PeriodSeriesRow>("Monthly Bottles and Sales", None, &sales.monthly, 12);

    let counties = reports::ranked_rows(&sales.top_counties, false);
    export(dir, "sales_top_counties.csv", &counties)?;
    output::preview_table::<RankedRow>(
        "Top Counties by Bottles Sold",
        Some("year to date"),
        &counties,
        reports::TOP_COUNTIES,
    );

    let products = reports::ranked_rows(&sales.top_products, true);
    export(dir, "sales_top_products.csv", &products)?;
    output::preview_table("Top Products by Sale Dollars", None, &products, reports::TOP_PRODUCTS);

    export(dir, "sales_product_table.csv", &sales.product_table)?;
    output::preview_table(
        "Products",
        Some("year to date, share of sale dollars"),
        &sales.product_table,
        reports::PRODUCT_TABLE_ROWS,
    );

    export(dir, "sales_county_months.csv", &sales.county_months)?;
    output::preview_table("Selected Counties vs. All", None, &sales.county_months, 12);

    let activity = &sales.product_activity;
    println!(
        "Selected products: {} orders this month ({} to date), {} distinct stores this month ({} to date)\n",
        util::format_int(activity.month_orders),
        util::format_int(activity.orders_to_date),
        util::format_int(activity.month_distinct_stores),
        util::format_int(activity.distinct_stores_to_date)
    );

    export(dir, "sales_season_share.csv", &sales.season_share)?;
    output::preview_table("Consumption per Season", None, &sales.season_share, 4);

    let finance = reports::finance_overview(data, args.year)?;
    let finance_cards = reports::card_rows(&finance.cards);
    export(dir, "finance_cards.csv", &finance_cards)?;
    output::preview_table(
        "Finance: Annual KPIs",
        Some("change vs. previous year"),
        &finance_cards,
        finance_cards.len(),
    );

    export(dir, "finance_weekly.csv", &finance.weekly)?;
    output::preview_table("Weekly Revenue", None, &finance.weekly, 5);

    let monthly_products: Vec<SeriesRow> = reports::series_rows(&finance.monthly_products, false);
    export(dir, "finance_monthly_products.csv", &monthly_products)?;
    println!(
        "(Top {} month/product bars exported to finance_monthly_products.csv)\n",
        monthly_products.len()
    );

    let summary = reports::generate_summary(data, args.year, month);
    let summary_path = dir.join("summary.json");
    output::write_json(&summary_path, &summary)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"year_sale_dollars\": {}, \"year_bottles_sold\": {}}}\n",
        util::format_number(summary.year_sale_dollars, 2),
        util::format_number(summary.year_bottles_sold, 0)
    );
    info!("Reports written to {}", dir.display());
    Ok(())
}

fn run_batch(args: &Args) -> anyhow::Result<()> {
    let mut state = AppState::default();
    handle_load(args, &mut state)?;
    handle_generate_reports(args, &state, args.month)
}

fn run_menu(args: &Args) {
    let mut state = AppState::default();
    let mut month = args.month;
    loop {
        println!("Select an option:");
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        match read_line("Enter choice: ").as_str() {
            "1" => {
                if let Err(e) = handle_load(args, &mut state) {
                    eprintln!("{:#}\n", e);
                }
            }
            "2" => {
                println!();
                month = prompt_month(month);
                if let Err(e) = handle_generate_reports(args, &state, month) {
                    eprintln!("{:#}\n", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level);
    debug!("{:?}", args);

    if !args.batch {
        run_menu(&args);
        return ExitCode::SUCCESS;
    }
    match run_batch(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
