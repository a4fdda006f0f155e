//! Shared test fixtures.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::dataset::Dataset;
use crate::loader::normalize;
use crate::types::RawRow;

/// A complete raw row with placeholder store/vendor fields.
pub fn raw(date: &str, county: &str, item: &str, bottles: f64, sale: f64, invoice: &str) -> RawRow {
    RawRow {
        date: Some(date.to_string()),
        store_number: Some("2633".to_string()),
        store_name: Some("HY-VEE #3".to_string()),
        county: Some(county.to_string()),
        city: Some("DES MOINES".to_string()),
        category_name: Some("VODKA".to_string()),
        item_description: Some(item.to_string()),
        vendor_number: Some("260".to_string()),
        bottles_sold: Some(bottles.to_string()),
        sale_dollars: Some(sale.to_string()),
        state_bottle_cost: Some((sale * 2.0 / 3.0).to_string()),
        volume_sold_liters: Some((bottles * 0.75).to_string()),
        volume_sold_gallons: Some((bottles * 0.2).to_string()),
        bottle_volume_ml: Some("750".to_string()),
        invoice_and_item_number: Some(invoice.to_string()),
        store_location: Some("POINT (-93.61 41.59)".to_string()),
    }
}

fn with_store(mut row: RawRow, id: &str, name: &str, city: &str) -> RawRow {
    row.store_number = Some(id.to_string());
    row.store_name = Some(name.to_string());
    row.city = Some(city.to_string());
    row
}

fn with_item(mut row: RawRow, category: &str, vendor: &str, cost: f64) -> RawRow {
    row.category_name = Some(category.to_string());
    row.vendor_number = Some(vendor.to_string());
    row.state_bottle_cost = Some(cost.to_string());
    row
}

/// Five sales across January and February 2021 in two counties.
///
/// | invoice | date       | county | item         | bottles | sale  | cost  | week |
/// |---------|------------|--------|--------------|---------|-------|-------|------|
/// | INV-1   | 2021-01-05 | POLK   | TITOS        | 12      | 240   | 160   | 1    |
/// | INV-2   | 2021-01-12 | POLK   | BLACK VELVET | 24      | 180   | 120   | 2    |
/// | INV-3   | 2021-01-20 | LINN   | JAMESON      | 6       | 150   | 100   | 3    |
/// | INV-4   | 2021-02-03 | LINN   | TITOS        | 10      | 200   | 133   | 5    |
/// | INV-5   | 2021-02-15 | POLK   | JAMESON      | 3       | 75    | 50    | 7    |
pub fn fixture() -> Dataset {
    let rows = vec![
        with_item(
            raw("2021-01-05", "POLK", "TITOS", 12.0, 240.0, "INV-1"),
            "VODKA",
            "260",
            160.0,
        ),
        with_item(
            raw("2021-01-12", "POLK", "BLACK VELVET", 24.0, 180.0, "INV-2"),
            "VODKA",
            "65",
            120.0,
        ),
        with_store(
            with_item(
                raw("2021-01-20", "LINN", "JAMESON", 6.0, 150.0, "INV-3"),
                "WHISKY",
                "370",
                100.0,
            ),
            "4829",
            "CENTRAL CITY",
            "CEDAR RAPIDS",
        ),
        with_store(
            with_item(
                raw("2021-02-03", "LINN", "TITOS", 10.0, 200.0, "INV-4"),
                "VODKA",
                "260",
                133.0,
            ),
            "4829",
            "CENTRAL CITY",
            "CEDAR RAPIDS",
        ),
        with_store(
            with_item(
                raw("2021-02-15", "POLK", "JAMESON", 3.0, 75.0, "INV-5"),
                "WHISKY",
                "370",
                50.0,
            ),
            "5102",
            "FAREWAY",
            "ANKENY",
        ),
    ];
    let (dataset, report) = normalize(rows);
    assert_eq!(report.kept_rows, 5);
    dataset
}
