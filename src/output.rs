use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(no rows)`.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SeriesRow;

    fn rows() -> Vec<SeriesRow> {
        vec![
            SeriesRow { key: "LINN".to_string(), value: "6".to_string() },
            SeriesRow { key: "POLK".to_string(), value: "36".to_string() },
        ]
    }

    #[test]
    fn render_table_limits_rows() {
        let out = render_table(&rows(), 1);
        assert!(out.contains("| Key"));
        assert!(out.contains("LINN"));
        assert!(!out.contains("POLK"));
        assert_eq!(render_table::<SeriesRow>(&[], 5), "(no rows)");
    }

    #[test]
    fn writes_csv_and_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let csv_path = dir.path().join("series.csv");
        write_csv(&csv_path, &rows()).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text, "Key,Value\nLINN,6\nPOLK,36\n");

        let json_path = dir.path().join("series.json");
        write_json(&json_path, &rows()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value[1]["Key"], "POLK");
    }
}
