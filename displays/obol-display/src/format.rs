//! Number formatting for the layouts

use core::fmt::Write;

use crate::draw_list::TextLine;

/// Below this the change line shows as flat
const FLAT_PERCENT: f64 = 0.001;

/// `<symbol><price>` with a fixed number of decimals
pub fn price(symbol: &str, value: f64, decimals: u8) -> TextLine {
    let mut out = TextLine::new();
    let _ = write!(out, "{}{:.*}", symbol, decimals as usize, value);
    out
}

/// Bare amount, or `--` when unknown
pub fn amount(value: Option<f64>, decimals: u8) -> TextLine {
    let mut out = TextLine::new();
    let _ = match value {
        Some(v) => write!(out, "{:.*}", decimals as usize, v),
        None => write!(out, "--"),
    };
    out
}

/// `^ 1.050%`, `v 0.250%` or `-- 0.00%`
pub fn change(percent: f64) -> TextLine {
    let mut out = TextLine::new();
    let _ = if percent.abs() < FLAT_PERCENT {
        write!(out, "-- 0.00%")
    } else {
        let arrow = if percent >= 0.0 { '^' } else { 'v' };
        write!(out, "{} {:.3}%", arrow, percent.abs())
    };
    out
}

/// Holdings in XRP, two decimals
pub fn xrp(total: f64) -> TextLine {
    let mut out = TextLine::new();
    let _ = write!(out, "{:.2} XRP", total);
    out
}

/// Fiat value, thousands shortened with `K`
pub fn fiat(symbol: &str, value: f64) -> TextLine {
    let mut out = TextLine::new();
    let _ = if value >= 1000.0 {
        write!(out, "{}{:.2}K", symbol, value / 1000.0)
    } else {
        write!(out, "{}{:.2}", symbol, value)
    };
    out
}

/// `@ <symbol><price>` footer, four decimals
pub fn at_price(symbol: &str, value: f64) -> TextLine {
    let mut out = TextLine::new();
    let _ = write!(out, "@ {}{:.4}", symbol, value);
    out
}
