use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::{RawRow, Season, TransactionRecord};
use crate::util::{parse_date_safe, parse_f64_safe, parse_location};
use chrono::Datelike;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Lines the CSV reader could not deserialize at all.
    pub parse_errors: usize,
    /// Rows with a missing or unparseable required value.
    pub incomplete_rows: usize,
    /// Kept rows whose store location fell back to `(0.0, 0.0)`.
    pub defaulted_coords: usize,
}

pub fn load_and_clean(path: impl AsRef<Path>) -> Result<(Dataset, LoadReport)> {
    let path = path.as_ref();
    info!("Loading sales data from {}", path.display());
    let file = std::fs::File::open(path)?;
    load_from_reader(file)
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(Dataset, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    // A broken header is fatal; broken lines below it are not.
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    let mut parse_errors = 0usize;
    let mut blank_rows = 0usize;
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("Skipping unreadable CSV line: {}", e);
                parse_errors += 1;
                continue;
            }
        };
        // Every column counts, including ones the table does not keep.
        if record.len() < headers.len() || record.iter().any(|f| f.trim().is_empty()) {
            blank_rows += 1;
            continue;
        }
        match record.deserialize::<RawRow>(Some(&headers)) {
            Ok(r) => rows.push(r),
            Err(e) => {
                debug!("Skipping unreadable CSV line: {}", e);
                parse_errors += 1;
            }
        }
    }

    let (dataset, mut report) = normalize(rows);
    report.total_rows += parse_errors + blank_rows;
    report.incomplete_rows += blank_rows;
    report.parse_errors = parse_errors;
    info!(
        "Loaded {} of {} rows ({} incomplete, {} unreadable, {} default coordinates)",
        report.kept_rows,
        report.total_rows,
        report.incomplete_rows,
        report.parse_errors,
        report.defaulted_coords
    );
    Ok((dataset, report))
}

/// Clean raw rows into the immutable table. Pure: no IO, no logging beyond
/// diagnostics.
///
/// A row missing any column is dropped whole. A row whose store location is
/// present but not a coordinate pair is kept with latitude and longitude 0.0.
pub fn normalize<I>(rows: I) -> (Dataset, LoadReport)
where
    I: IntoIterator<Item = RawRow>,
{
    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for row in rows {
        report.total_rows += 1;
        match clean_row(row) {
            Some((record, defaulted)) => {
                if defaulted {
                    report.defaulted_coords += 1;
                }
                records.push(record);
            }
            None => report.incomplete_rows += 1,
        }
    }

    if report.incomplete_rows > 0 {
        warn!("Dropped {} incomplete rows", report.incomplete_rows);
    }
    report.kept_rows = records.len();
    (Dataset::new(records), report)
}

fn text(v: Option<String>) -> Option<String> {
    let s = v?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Returns the cleaned record and whether its coordinates were defaulted.
fn clean_row(row: RawRow) -> Option<(TransactionRecord, bool)> {
    let date = parse_date_safe(row.date.as_deref())?;
    let bottles_sold = parse_f64_safe(row.bottles_sold.as_deref())?;
    let sale_dollars = parse_f64_safe(row.sale_dollars.as_deref())?;
    let state_bottle_cost = parse_f64_safe(row.state_bottle_cost.as_deref())?;
    let volume_sold_liters = parse_f64_safe(row.volume_sold_liters.as_deref())?;
    let volume_sold_gallons = parse_f64_safe(row.volume_sold_gallons.as_deref())?;
    let bottle_volume_ml = parse_f64_safe(row.bottle_volume_ml.as_deref())?;
    let location = text(row.store_location)?;

    let month = date.month();
    let season = Season::from_month(month)?;
    let (latitude, longitude, defaulted) = match parse_location(&location) {
        Some((lat, lon)) => (lat, lon, false),
        None => {
            debug!("Unparseable store location {:?}, using 0.0/0.0", location);
            (0.0, 0.0, true)
        }
    };

    let record = TransactionRecord {
        date,
        store_id: text(row.store_number)?,
        store_name: text(row.store_name)?,
        county: text(row.county)?,
        city: text(row.city)?,
        category_name: text(row.category_name)?,
        item_description: text(row.item_description)?,
        vendor_number: text(row.vendor_number)?,
        bottles_sold,
        sale_dollars,
        state_bottle_cost,
        volume_sold_liters,
        volume_sold_gallons,
        bottle_volume_ml,
        invoice_id: text(row.invoice_and_item_number)?,
        year: date.year(),
        month,
        day: date.day(),
        iso_week: date.iso_week().week(),
        season,
        latitude,
        longitude,
    };
    Some((record, defaulted))
}
