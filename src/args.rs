//! Command-line configuration for the dashboard binary.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Iowa liquor sales dashboard.
///
/// Loads the annual sales CSV once, then renders the sales and finance pages
/// (KPI cards with period-over-period deltas, chart series, ranked tables) for
/// the selected year and month. Every view is also exported as CSV, with the
/// headline numbers in `summary.json`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// Path to the sales CSV.
    #[arg(long, env = "LIQUOR_DATA", default_value = "data/liquor_iowa_2021.csv")]
    pub data: PathBuf,

    /// Directory the report files are written to.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Logging verbosity. `RUST_LOG` overrides this when set.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    pub log_level: LevelFilter,

    #[arg(long, default_value_t = 2021)]
    pub year: i32,

    /// Month of the sales page, 1 to 12.
    #[arg(long, default_value_t = 11)]
    pub month: u32,

    /// Counties for the county chart, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub counties: Vec<String>,

    /// Products for the product cards and season chart, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub products: Vec<String>,

    /// Measure shown in the season chart.
    #[arg(long, default_value = "bottles_sold")]
    pub season_measure: String,

    /// Load, generate the reports once and exit without the menu.
    #[arg(long)]
    pub batch: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_widget_state() {
        let args = Args::try_parse_from(["liquor-dashboard"]).unwrap();
        assert_eq!(args.year, 2021);
        assert_eq!(args.month, 11);
        assert_eq!(args.log_level, LevelFilter::INFO);
        assert!(args.counties.is_empty());
        assert!(!args.batch);
    }

    #[test]
    fn lists_are_comma_separated() {
        let args = Args::try_parse_from([
            "liquor-dashboard",
            "--counties",
            "POLK,LINN",
            "--products",
            "TITOS",
            "--log-level",
            "debug",
            "--batch",
        ])
        .unwrap();
        assert_eq!(args.counties, vec!["POLK", "LINN"]);
        assert_eq!(args.products, vec!["TITOS"]);
        assert_eq!(args.log_level, LevelFilter::DEBUG);
        assert!(args.batch);
    }
}
