//! Period-over-period percentage deltas for KPI cards.

use crate::error::{DashboardError, Result};
use crate::util::format_number;
use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sign::Plus => f.write_str("+"),
            Sign::Minus => f.write_str("-"),
        }
    }
}

/// Colour hint for the renderer. Positive change is good, anything else bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Good,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delta {
    pub percent: f64,
    pub sign: Sign,
    pub tone: Tone,
    pub display: String,
}

/// `(current - prior) / prior * 100`, with two decimals in `display`.
///
/// A zero prior has no defined percentage and returns
/// [`DashboardError::DivisionUndefined`]; callers decide what to show.
pub fn format_delta(current: f64, prior: f64) -> Result<Delta> {
    format_delta_with(current, prior, 2)
}

pub fn format_delta_with(current: f64, prior: f64, decimals: usize) -> Result<Delta> {
    if prior == 0.0 {
        return Err(DashboardError::DivisionUndefined { current });
    }
    let percent = (current - prior) / prior * 100.0;
    Ok(if percent > 0.0 {
        Delta {
            percent,
            sign: Sign::Plus,
            tone: Tone::Good,
            display: format!("+{}%", format_number(percent, decimals)),
        }
    } else {
        Delta {
            percent,
            sign: Sign::Minus,
            tone: Tone::Bad,
            display: format!("{}%", format_number(percent, decimals)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_change() {
        let d = format_delta(110.0, 100.0).unwrap();
        assert!((d.percent - 10.0).abs() < 1e-9);
        assert_eq!(d.sign, Sign::Plus);
        assert_eq!(d.tone, Tone::Good);
        assert_eq!(d.display, "+10.00%");
    }

    #[test]
    fn negative_change() {
        let d = format_delta(90.0, 100.0).unwrap();
        assert!((d.percent + 10.0).abs() < 1e-9);
        assert_eq!(d.sign, Sign::Minus);
        assert_eq!(d.tone, Tone::Bad);
        assert_eq!(d.display, "-10.00%");
    }

    #[test]
    fn no_change_is_not_good() {
        let d = format_delta(50.0, 50.0).unwrap();
        assert_eq!(d.percent, 0.0);
        assert_eq!(d.tone, Tone::Bad);
        assert_eq!(d.display, "0.00%");
    }

    #[test]
    fn zero_prior_is_undefined() {
        for current in [0.0, 1.0, -3.5, 1e9] {
            assert!(matches!(
                format_delta(current, 0.0),
                Err(DashboardError::DivisionUndefined { .. })
            ));
        }
    }

    #[test]
    fn large_changes_get_separators() {
        let d = format_delta_with(2_500_000.0, 100.0, 0).unwrap();
        assert_eq!(d.display, "+2,499,900%");
        assert_eq!(d.sign.to_string(), "+");
    }
}
