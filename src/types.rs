use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tabled::Tabled;

/// One line of the source CSV before cleaning. Every field is optional so a
/// short or sparse line deserializes and can be counted instead of aborting
/// the whole load.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawRow {
    pub date: Option<String>,
    #[serde(alias = "store_id")]
    pub store_number: Option<String>,
    pub store_name: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub category_name: Option<String>,
    pub item_description: Option<String>,
    pub vendor_number: Option<String>,
    pub bottles_sold: Option<String>,
    pub sale_dollars: Option<String>,
    pub state_bottle_cost: Option<String>,
    pub volume_sold_liters: Option<String>,
    pub volume_sold_gallons: Option<String>,
    pub bottle_volume_ml: Option<String>,
    #[serde(alias = "invoice_id")]
    pub invoice_and_item_number: Option<String>,
    pub store_location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, EnumIter)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Meteorological season of a calendar month. December belongs to the
    /// winter that continues into January and February.
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            12 | 1 | 2 => Some(Season::Winter),
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            _ => None,
        }
    }
}

/// A cleaned sale line. Built once by the loader and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub store_id: String,
    pub store_name: String,
    pub county: String,
    pub city: String,
    pub category_name: String,
    pub item_description: String,
    pub vendor_number: String,
    pub bottles_sold: f64,
    pub sale_dollars: f64,
    pub state_bottle_cost: f64,
    pub volume_sold_liters: f64,
    pub volume_sold_gallons: f64,
    pub bottle_volume_ml: f64,
    pub invoice_id: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub iso_week: u32,
    pub season: Season,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiCardRow {
    #[serde(rename = "Card")]
    #[tabled(rename = "Card")]
    pub card: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "Change")]
    #[tabled(rename = "Change")]
    pub change: String,
    #[serde(rename = "Tone")]
    #[tabled(rename = "Tone")]
    pub tone: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SeriesRow {
    #[serde(rename = "Key")]
    #[tabled(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PeriodSeriesRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: u32,
    #[serde(rename = "BottlesSold")]
    #[tabled(rename = "BottlesSold")]
    pub bottles_sold: String,
    #[serde(rename = "SaleDollars")]
    #[tabled(rename = "SaleDollars")]
    pub sale_dollars: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CountyMonthRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: u32,
    #[serde(rename = "SelectedCounties")]
    #[tabled(rename = "SelectedCounties")]
    pub selected: String,
    #[serde(rename = "AllCounties")]
    #[tabled(rename = "AllCounties")]
    pub all: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ProductShareRow {
    #[serde(rename = "Product")]
    #[tabled(rename = "Product")]
    pub product: String,
    #[serde(rename = "SaleDollars")]
    #[tabled(rename = "SaleDollars")]
    pub sale_dollars: String,
    #[serde(rename = "BottlesSold")]
    #[tabled(rename = "BottlesSold")]
    pub bottles_sold: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankedRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ShareRow {
    #[serde(rename = "Key")]
    #[tabled(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
    #[serde(rename = "SharePct")]
    #[tabled(rename = "SharePct")]
    pub share_pct: String,
}

/// Headline numbers written to `summary.json`.
#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub year: i32,
    pub month: u32,
    pub total_rows: usize,
    pub n_categories: usize,
    pub n_stores: usize,
    pub n_counties: usize,
    pub year_sale_dollars: f64,
    pub year_bottles_sold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use strum::IntoEnumIterator;

    #[test]
    fn every_month_has_exactly_one_season() {
        assert_eq!(Season::from_month(12), Some(Season::Winter));
        assert_eq!(Season::from_month(6), Some(Season::Summer));
        assert_eq!(Season::from_month(3), Some(Season::Spring));
        assert_eq!(Season::from_month(11), Some(Season::Fall));
        let seen: BTreeSet<Season> = (1..=12).filter_map(Season::from_month).collect();
        assert_eq!(seen, Season::iter().collect::<BTreeSet<_>>());
        assert_eq!((1..=12).filter_map(Season::from_month).count(), 12);
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn season_labels() {
        let labels: Vec<String> = Season::iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["Winter", "Spring", "Summer", "Fall"]);
    }
}
