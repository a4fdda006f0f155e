//! The typed description of what a widget wants computed.
//!
//! A [`FilterRequest`] is built fresh from the current widget state for every
//! interaction. String inputs are parsed into the enums here, so an unknown
//! measure or dimension is rejected before it reaches the engine.

use crate::error::{DashboardError, Result};
use crate::types::{Season, TransactionRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// A summable numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Measure {
    BottlesSold,
    SaleDollars,
    VolumeSoldLiters,
    VolumeSoldGallons,
    BottleVolumeMl,
    StateBottleCost,
    /// `sale_dollars - state_bottle_cost`
    GrossMargin,
}

impl Measure {
    pub fn from_name(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| DashboardError::InvalidMeasure(s.to_string()))
    }

    pub fn value(self, r: &TransactionRecord) -> f64 {
        match self {
            Measure::BottlesSold => r.bottles_sold,
            Measure::SaleDollars => r.sale_dollars,
            Measure::VolumeSoldLiters => r.volume_sold_liters,
            Measure::VolumeSoldGallons => r.volume_sold_gallons,
            Measure::BottleVolumeMl => r.bottle_volume_ml,
            Measure::StateBottleCost => r.state_bottle_cost,
            Measure::GrossMargin => r.sale_dollars - r.state_bottle_cost,
        }
    }

    /// Whether values of this measure are dollar amounts.
    pub fn is_currency(self) -> bool {
        matches!(
            self,
            Measure::SaleDollars | Measure::StateBottleCost | Measure::GrossMargin
        )
    }
}

/// A categorical column used for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Dimension {
    Week,
    Month,
    County,
    Item,
    Season,
    Store,
    City,
    Category,
    /// (month, item) pairs, for the per-month product chart.
    MonthItem,
}

impl Dimension {
    pub fn from_name(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| DashboardError::InvalidDimension(s.to_string()))
    }

    pub fn key(self, r: &TransactionRecord) -> GroupKey {
        match self {
            Dimension::Week => GroupKey::Week(r.iso_week),
            Dimension::Month => GroupKey::Month(r.month),
            Dimension::County => GroupKey::Text(r.county.clone()),
            Dimension::Item => GroupKey::Text(r.item_description.clone()),
            Dimension::Season => GroupKey::Season(r.season),
            Dimension::Store => GroupKey::Text(r.store_name.clone()),
            Dimension::City => GroupKey::Text(r.city.clone()),
            Dimension::Category => GroupKey::Text(r.category_name.clone()),
            Dimension::MonthItem => GroupKey::MonthItem(r.month, r.item_description.clone()),
        }
    }
}

/// Column whose distinct values are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Column {
    VendorNumber,
    ItemDescription,
    City,
    County,
    StoreName,
    CategoryName,
    InvoiceId,
}

impl Column {
    pub fn from_name(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| DashboardError::InvalidColumn(s.to_string()))
    }

    pub fn value(self, r: &TransactionRecord) -> &str {
        match self {
            Column::VendorNumber => &r.vendor_number,
            Column::ItemDescription => &r.item_description,
            Column::City => &r.city,
            Column::County => &r.county,
            Column::StoreName => &r.store_name,
            Column::CategoryName => &r.category_name,
            Column::InvoiceId => &r.invoice_id,
        }
    }
}

/// How `month` restricts rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PeriodMode {
    /// `month == m`
    #[default]
    Exact,
    /// `month <= m`, i.e. year to date
    Cumulative,
}

impl PeriodMode {
    pub fn from_name(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| DashboardError::InvalidPeriodMode(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ComparisonWindow {
    MonthOverMonth,
    YearOverYear,
}

impl ComparisonWindow {
    pub fn from_name(s: &str) -> Result<Self> {
        Self::from_str(s.trim()).map_err(|_| DashboardError::InvalidComparison(s.to_string()))
    }
}

/// The scalar shown on a KPI card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Total(Measure),
    Distinct(Column),
    Rows,
}

/// Grouping key of one aggregate bucket. Ordering is the dimension's natural
/// order: numbers ascending, seasons Winter through Fall, text lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Week(u32),
    Month(u32),
    Season(Season),
    Text(String),
    MonthItem(u32, String),
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Week(w) => write!(f, "{}", w),
            GroupKey::Month(m) => write!(f, "{}", m),
            GroupKey::Season(s) => write!(f, "{}", s),
            GroupKey::Text(t) => f.write_str(t),
            GroupKey::MonthItem(m, item) => write!(f, "{} / {}", m, item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub year: i32,
    pub month: Option<u32>,
    pub period_mode: PeriodMode,
    /// OR-matched; empty means every county.
    pub counties: BTreeSet<String>,
    /// OR-matched; empty means every product.
    pub products: BTreeSet<String>,
    pub measure: Measure,
    pub dimension: Dimension,
}

impl FilterRequest {
    pub fn new(year: i32, measure: Measure, dimension: Dimension) -> Self {
        Self {
            year,
            month: None,
            period_mode: PeriodMode::Exact,
            counties: BTreeSet::new(),
            products: BTreeSet::new(),
            measure,
            dimension,
        }
    }

    /// Build a request from widget strings.
    pub fn parse(year: i32, measure: &str, dimension: &str) -> Result<Self> {
        Ok(Self::new(
            year,
            Measure::from_name(measure)?,
            Dimension::from_name(dimension)?,
        ))
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Restrict to `month <= m` instead of `month == m`.
    pub fn cumulative(mut self) -> Self {
        self.period_mode = PeriodMode::Cumulative;
        self
    }

    pub fn period_mode(mut self, mode: PeriodMode) -> Self {
        self.period_mode = mode;
        self
    }

    pub fn counties<I, S>(mut self, counties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.counties = counties.into_iter().map(Into::into).collect();
        self
    }

    pub fn products<I, S>(mut self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    pub fn dimension(mut self, dimension: Dimension) -> Self {
        self.dimension = dimension;
        self
    }

    /// Row predicate. A month outside 1..=12 matches nothing.
    pub fn matches(&self, r: &TransactionRecord) -> bool {
        if r.year != self.year {
            return false;
        }
        if let Some(m) = self.month {
            if !(1..=12).contains(&m) {
                return false;
            }
            let in_period = match self.period_mode {
                PeriodMode::Exact => r.month == m,
                PeriodMode::Cumulative => r.month <= m,
            };
            if !in_period {
                return false;
            }
        }
        (self.counties.is_empty() || self.counties.contains(&r.county))
            && (self.products.is_empty() || self.products.contains(&r.item_description))
    }

    /// The same request over the immediately preceding period.
    ///
    /// Month-over-month moves January back to December of the previous year.
    pub fn prior(&self, window: ComparisonWindow) -> Result<FilterRequest> {
        let mut prior = self.clone();
        match window {
            ComparisonWindow::YearOverYear => prior.step_back_year(),
            ComparisonWindow::MonthOverMonth => match self.month {
                None => return Err(DashboardError::MonthRequired),
                Some(1) => {
                    prior.month = Some(12);
                    prior.step_back_year();
                }
                Some(m) if (2..=12).contains(&m) => prior.month = Some(m - 1),
                // Out of range stays out of range and keeps matching nothing.
                Some(_) => {}
            },
        }
        Ok(prior)
    }

    /// Move to the previous year. There is none before `i32::MIN`, so the
    /// request is pointed at month 0, which matches nothing.
    fn step_back_year(&mut self) {
        match self.year.checked_sub(1) {
            Some(y) => self.year = y,
            None => self.month = Some(0),
        }
    }
}
