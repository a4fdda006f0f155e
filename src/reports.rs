//! Dashboard pages built from engine calls.
//!
//! Each KPI card or chart of the sales and finance pages is a small piece of
//! configuration (metric, dimension, window, N) fed to the engine. Nothing
//! here touches the dataset except through [`crate::engine`].

use crate::dataset::Dataset;
use crate::delta::{format_delta, Delta, Tone};
use crate::engine::{self, AggregateResult};
use crate::error::{DashboardError, Result};
use crate::query::{Column, ComparisonWindow, Dimension, FilterRequest, GroupKey, Measure, Metric};
use crate::types::{
    CountyMonthRow, KpiCardRow, PeriodSeriesRow, ProductShareRow, RankedRow, SeriesRow, ShareRow,
    SummaryStats,
};
use crate::util::{format_currency, format_number};
use tracing::debug;

pub const TOP_COUNTIES: usize = 5;
pub const TOP_PRODUCTS: usize = 3;
pub const PRODUCT_TABLE_ROWS: usize = 8;
pub const MONTHLY_PRODUCT_BARS: usize = 220;

pub struct CardSpec {
    pub title: &'static str,
    pub metric: Metric,
}

pub const SALES_CARDS: [CardSpec; 6] = [
    CardSpec { title: "Month Bottles Sold", metric: Metric::Total(Measure::BottlesSold) },
    CardSpec { title: "Month Revenue", metric: Metric::Total(Measure::GrossMargin) },
    CardSpec { title: "Month Costs", metric: Metric::Total(Measure::StateBottleCost) },
    CardSpec { title: "Month Vendors", metric: Metric::Distinct(Column::VendorNumber) },
    CardSpec { title: "Month Products", metric: Metric::Distinct(Column::ItemDescription) },
    CardSpec { title: "Month Cities", metric: Metric::Distinct(Column::City) },
];

pub const FINANCE_CARDS: [CardSpec; 6] = [
    CardSpec { title: "Annual Revenue", metric: Metric::Total(Measure::GrossMargin) },
    CardSpec { title: "Annual Costs", metric: Metric::Total(Measure::StateBottleCost) },
    CardSpec { title: "Bottles Sold", metric: Metric::Total(Measure::BottlesSold) },
    CardSpec { title: "Vendors", metric: Metric::Distinct(Column::VendorNumber) },
    CardSpec { title: "Invoice Lines", metric: Metric::Rows },
    CardSpec { title: "Products", metric: Metric::Distinct(Column::ItemDescription) },
];

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub metric: Metric,
    pub current: f64,
    pub prior: f64,
    /// `None` when the prior period is zero.
    pub delta: Option<Delta>,
}

/// Widget state of the sales page.
#[derive(Debug, Clone)]
pub struct SalesSelection {
    pub year: i32,
    pub month: u32,
    pub counties: Vec<String>,
    pub products: Vec<String>,
    /// Measure shown in the season pie chart.
    pub season_measure: Measure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductActivity {
    pub month_orders: usize,
    pub orders_to_date: usize,
    pub month_distinct_stores: usize,
    pub distinct_stores_to_date: usize,
}

#[derive(Debug, Clone)]
pub struct SalesOverview {
    pub cards: Vec<KpiCard>,
    pub monthly: Vec<PeriodSeriesRow>,
    pub top_counties: AggregateResult,
    pub top_products: AggregateResult,
    pub product_table: Vec<ProductShareRow>,
    pub county_months: Vec<CountyMonthRow>,
    pub product_activity: ProductActivity,
    pub season_share: Vec<ShareRow>,
}

#[derive(Debug, Clone)]
pub struct FinanceOverview {
    pub cards: Vec<KpiCard>,
    pub weekly: Vec<PeriodSeriesRow>,
    pub monthly_products: AggregateResult,
}

/// Evaluate one card against its prior period.
pub fn build_card(
    dataset: &Dataset,
    request: &FilterRequest,
    spec: &CardSpec,
    window: ComparisonWindow,
) -> Result<KpiCard> {
    let cmp = engine::compare(dataset, request, spec.metric, window)?;
    let delta = match format_delta(cmp.current, cmp.prior) {
        Ok(d) => Some(d),
        Err(DashboardError::DivisionUndefined { .. }) => {
            debug!("{}: no prior data for {}", spec.title, window);
            None
        }
        Err(e) => return Err(e),
    };
    Ok(KpiCard {
        title: spec.title,
        metric: spec.metric,
        current: cmp.current,
        prior: cmp.prior,
        delta,
    })
}

pub fn sales_overview(dataset: &Dataset, selection: &SalesSelection) -> Result<SalesOverview> {
    let year = selection.year;
    let month = selection.month;
    let base = FilterRequest::new(year, Measure::BottlesSold, Dimension::Month);
    let this_month = base.clone().month(month);
    let to_date = this_month.clone().cumulative();

    let cards = SALES_CARDS
        .iter()
        .map(|spec| build_card(dataset, &this_month, spec, ComparisonWindow::MonthOverMonth))
        .collect::<Result<Vec<_>>>()?;

    let monthly = period_series(dataset, &base);

    let top_counties = engine::rank(
        dataset,
        &to_date.clone().dimension(Dimension::County),
        TOP_COUNTIES,
    );
    let top_products = engine::top_products(
        dataset,
        &base.clone().measure(Measure::SaleDollars),
        TOP_PRODUCTS,
    );
    let product_table = product_table(dataset, &to_date, PRODUCT_TABLE_ROWS);
    let county_months = county_months(dataset, &base, &selection.counties);

    let for_products = |req: &FilterRequest| req.clone().products(selection.products.iter().cloned());
    let product_activity = ProductActivity {
        month_orders: engine::row_count(dataset, &for_products(&this_month)),
        orders_to_date: engine::row_count(dataset, &for_products(&to_date)),
        month_distinct_stores: engine::distinct_count(dataset, &for_products(&this_month), Column::StoreName),
        distinct_stores_to_date: engine::distinct_count(dataset, &for_products(&to_date), Column::StoreName),
    };

    let seasons = engine::sum_by_dimension(
        dataset,
        &for_products(&base)
            .measure(selection.season_measure)
            .dimension(Dimension::Season),
    );
    let season_share = share_rows(&seasons, selection.season_measure.is_currency());

    Ok(SalesOverview {
        cards,
        monthly,
        top_counties,
        top_products,
        product_table,
        county_months,
        product_activity,
        season_share,
    })
}

pub fn finance_overview(dataset: &Dataset, year: i32) -> Result<FinanceOverview> {
    let base = FilterRequest::new(year, Measure::BottlesSold, Dimension::Week);
    let cards = FINANCE_CARDS
        .iter()
        .map(|spec| build_card(dataset, &base, spec, ComparisonWindow::YearOverYear))
        .collect::<Result<Vec<_>>>()?;
    let weekly = period_series(dataset, &base);
    let monthly_products = engine::rank(
        dataset,
        &base.dimension(Dimension::MonthItem),
        MONTHLY_PRODUCT_BARS,
    );
    Ok(FinanceOverview {
        cards,
        weekly,
        monthly_products,
    })
}

/// Bottles sold and sale dollars per week or month, whichever the request
/// groups by.
fn period_series(dataset: &Dataset, request: &FilterRequest) -> Vec<PeriodSeriesRow> {
    let bottles = engine::sum_by_dimension(dataset, &request.clone().measure(Measure::BottlesSold));
    let dollars = engine::sum_by_dimension(dataset, &request.clone().measure(Measure::SaleDollars));
    bottles
        .rows
        .iter()
        .filter_map(|p| {
            let period = match p.key {
                GroupKey::Week(n) | GroupKey::Month(n) => n,
                _ => return None,
            };
            Some(PeriodSeriesRow {
                period,
                bottles_sold: format_number(p.value, 0),
                sale_dollars: format_currency(dollars.value_of(&p.key).unwrap_or(0.0), 0),
            })
        })
        .collect()
}

/// Top `n` products by sale dollars with their bottles sold and their share
/// of sale dollars across every product in the window.
pub fn product_table(dataset: &Dataset, request: &FilterRequest, n: usize) -> Vec<ProductShareRow> {
    let items = request.clone().dimension(Dimension::Item);
    let dollars = engine::sum_by_dimension(dataset, &items.clone().measure(Measure::SaleDollars));
    let bottles = engine::sum_by_dimension(dataset, &items.measure(Measure::BottlesSold));
    let shares = engine::shares(&dollars);

    let mut ranked = dollars;
    ranked.rows.sort_by(|a, b| a.value.total_cmp(&b.value));
    let skip = ranked.rows.len().saturating_sub(n);

    ranked
        .rows
        .into_iter()
        .skip(skip)
        .map(|p| {
            let share = shares
                .iter()
                .find(|(k, _)| *k == p.key)
                .map(|(_, pct)| *pct)
                .unwrap_or(0.0);
            ProductShareRow {
                product: p.key.to_string(),
                sale_dollars: format_currency(p.value, 0),
                bottles_sold: format_number(bottles.value_of(&p.key).unwrap_or(0.0), 0),
                share_pct: format_number(share, 2),
            }
        })
        .collect()
}

/// Monthly bottles sold for the chosen counties next to the all-county line.
fn county_months(dataset: &Dataset, base: &FilterRequest, counties: &[String]) -> Vec<CountyMonthRow> {
    let all = engine::sum_by_dimension(dataset, base);
    let selected = engine::sum_by_dimension(dataset, &base.clone().counties(counties.iter().cloned()));
    all.rows
        .iter()
        .filter_map(|p| match p.key {
            GroupKey::Month(m) => Some(CountyMonthRow {
                month: m,
                selected: format_number(selected.value_of(&p.key).unwrap_or(0.0), 0),
                all: format_number(p.value, 0),
            }),
            _ => None,
        })
        .collect()
}

fn format_value(value: f64, currency: bool) -> String {
    if currency {
        format_currency(value, 0)
    } else {
        format_number(value, 0)
    }
}

fn metric_is_currency(metric: Metric) -> bool {
    matches!(metric, Metric::Total(m) if m.is_currency())
}

pub fn card_rows(cards: &[KpiCard]) -> Vec<KpiCardRow> {
    cards
        .iter()
        .map(|c| {
            let (change, tone) = match &c.delta {
                Some(d) => (
                    d.display.clone(),
                    match d.tone {
                        Tone::Good => "good",
                        Tone::Bad => "bad",
                    },
                ),
                None => ("no prior data".to_string(), "none"),
            };
            KpiCardRow {
                card: c.title.to_string(),
                value: format_value(c.current, metric_is_currency(c.metric)),
                change,
                tone: tone.to_string(),
            }
        })
        .collect()
}

pub fn series_rows(result: &AggregateResult, currency: bool) -> Vec<SeriesRow> {
    result
        .rows
        .iter()
        .map(|p| SeriesRow {
            key: p.key.to_string(),
            value: format_value(p.value, currency),
        })
        .collect()
}

/// Ranked rows, largest first, numbered from 1.
pub fn ranked_rows(result: &AggregateResult, currency: bool) -> Vec<RankedRow> {
    result
        .rows
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, p)| RankedRow {
            rank: idx + 1,
            name: p.key.to_string(),
            value: format_value(p.value, currency),
        })
        .collect()
}

pub fn share_rows(result: &AggregateResult, currency: bool) -> Vec<ShareRow> {
    engine::shares(result)
        .into_iter()
        .zip(result.rows.iter())
        .map(|((key, pct), p)| ShareRow {
            key: key.to_string(),
            value: format_value(p.value, currency),
            share_pct: format_number(pct, 2),
        })
        .collect()
}

pub fn generate_summary(dataset: &Dataset, year: i32, month: u32) -> SummaryStats {
    let year_req = FilterRequest::new(year, Measure::SaleDollars, Dimension::Month);
    SummaryStats {
        year,
        month,
        total_rows: dataset.len(),
        n_categories: dataset.n_categories(),
        n_stores: dataset.n_stores(),
        n_counties: dataset.n_counties(),
        year_sale_dollars: engine::total(dataset, &year_req),
        year_bottles_sold: engine::total(dataset, &year_req.measure(Measure::BottlesSold)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::Sign;
    use crate::test::fixture;

    fn selection(month: u32) -> SalesSelection {
        SalesSelection {
            year: 2021,
            month,
            counties: vec!["POLK".to_string()],
            products: vec!["TITOS".to_string()],
            season_measure: Measure::SaleDollars,
        }
    }

    #[test]
    fn sales_cards_compare_against_previous_month() {
        let ds = fixture();
        let overview = sales_overview(&ds, &selection(2)).unwrap();
        let bottles = &overview.cards[0];
        assert_eq!((bottles.current, bottles.prior), (13.0, 42.0));
        let delta = bottles.delta.as_ref().unwrap();
        assert_eq!(delta.sign, Sign::Minus);
        assert!((delta.percent - (13.0 - 42.0) / 42.0 * 100.0).abs() < 1e-9);

        let revenue = &overview.cards[1];
        assert!((revenue.current - 92.0).abs() < 1e-9);
        assert!((revenue.prior - 190.0).abs() < 1e-9);

        let cities = &overview.cards[5];
        assert_eq!((cities.current, cities.prior), (2.0, 2.0));
    }

    #[test]
    fn january_cards_have_no_prior_data() {
        let ds = fixture();
        let overview = sales_overview(&ds, &selection(1)).unwrap();
        assert!(overview.cards.iter().all(|c| c.delta.is_none() && c.prior == 0.0));
        let rows = card_rows(&overview.cards);
        assert_eq!(rows[0].value, "42");
        assert_eq!(rows[1].value, "$190");
        assert_eq!(rows[0].change, "no prior data");
    }

    #[test]
    fn sales_charts_follow_the_selection() {
        let ds = fixture();
        let overview = sales_overview(&ds, &selection(1)).unwrap();

        assert_eq!(overview.monthly.len(), 2);
        assert_eq!(overview.monthly[0].bottles_sold, "42");
        assert_eq!(overview.monthly[1].sale_dollars, "$275");

        // Year to date through January.
        let counties: Vec<String> = overview.top_counties.rows.iter().map(|p| p.key.to_string()).collect();
        assert_eq!(counties, vec!["LINN", "POLK"]);

        let products = ranked_rows(&overview.top_products, true);
        assert_eq!(products[0].name, "TITOS");
        assert_eq!(products[0].value, "$440");
        assert_eq!(products.len(), 3);

        assert_eq!(overview.county_months[0].selected, "36");
        assert_eq!(overview.county_months[0].all, "42");
        assert_eq!(overview.county_months[1].selected, "3");

        assert_eq!(
            overview.product_activity,
            ProductActivity {
                month_orders: 1,
                orders_to_date: 1,
                month_distinct_stores: 1,
                distinct_stores_to_date: 1,
            }
        );
        assert_eq!(overview.season_share.len(), 1);
        assert_eq!(overview.season_share[0].share_pct, "100.00");
    }

    #[test]
    fn product_table_shares_use_every_product() {
        let ds = fixture();
        let req = FilterRequest::new(2021, Measure::SaleDollars, Dimension::Item).month(2).cumulative();
        let table = product_table(&ds, &req, 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table[1].product, "TITOS");
        assert_eq!(table[1].sale_dollars, "$440");
        assert_eq!(table[1].bottles_sold, "22");
        // 440 of 845
        assert_eq!(table[1].share_pct, "52.07");
    }

    #[test]
    fn finance_overview_uses_year_over_year() {
        let ds = fixture();
        let finance = finance_overview(&ds, 2021).unwrap();
        assert_eq!(finance.cards.len(), 6);
        assert!(finance.cards.iter().all(|c| c.delta.is_none()));
        assert_eq!(finance.cards[4].current, 5.0);
        assert_eq!(finance.weekly.len(), 5);
        assert_eq!(finance.monthly_products.len(), 5);
        assert_eq!(
            finance.monthly_products.rows.last().map(|p| p.key.clone()),
            Some(GroupKey::MonthItem(1, "BLACK VELVET".to_string()))
        );
    }

    #[test]
    fn summary_counts_the_table() {
        let ds = fixture();
        let s = generate_summary(&ds, 2021, 2);
        assert_eq!(s.total_rows, 5);
        assert_eq!(s.n_stores, 3);
        assert_eq!(s.year_sale_dollars, 845.0);
        assert_eq!(s.year_bottles_sold, 55.0);
    }
}
