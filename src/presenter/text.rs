//! Plain-text rendering of symbol views.

use std::fmt::Write;

use crate::domain::Side;

use super::{Chart, ChartBar, LevelRow, Panel, SymbolView, source_label};

/// Widest bar drawn in the text chart.
const BAR_WIDTH: u64 = 30;

/// Renders views as a text report, one block per symbol.
pub fn render_text(views: &[SymbolView]) -> String {
    let mut out = String::new();
    for (i, view) in views.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_view(&mut out, view);
    }
    out
}

fn render_view(out: &mut String, view: &SymbolView) {
    let _ = writeln!(out, "== {} ({}) ==", view.symbol, source_label(view.source));

    match &view.panel {
        Panel::NoData { warning } => {
            let _ = writeln!(out, "No data");
            if let Some(w) = warning {
                let _ = writeln!(out, "warning: {}", w);
            }
        }
        Panel::Data {
            bids,
            asks,
            spread,
            chart,
        } => {
            render_tables(out, bids, asks);
            let _ = writeln!(out, "Spread: {}", spread);
            render_chart(out, chart);
        }
    }
}

fn render_tables(out: &mut String, bids: &[LevelRow], asks: &[LevelRow]) {
    let _ = writeln!(out, "{:<24}{}", "Bids", "Asks");
    let cell = |row: Option<&LevelRow>| match row {
        Some(r) => format!("{:>12} x {:<8}", r.price, r.quantity),
        None => String::new(),
    };
    for i in 0..bids.len().max(asks.len()) {
        let line = format!("{:<24}{}", cell(bids.get(i)), cell(asks.get(i)));
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

fn render_chart(out: &mut String, chart: &Chart) {
    let max = chart.max_quantity();
    let bar = |side: Side, b: &ChartBar| {
        let len = if max == 0 {
            0
        } else {
            (u128::from(b.quantity) * u128::from(BAR_WIDTH)).div_ceil(u128::from(max))
        };
        format!(
            "{} {:>10} |{} {}",
            side,
            b.label,
            "#".repeat(len as usize),
            b.quantity
        )
    };

    for b in &chart.bids {
        let _ = writeln!(out, "{}", bar(Side::Bid, b));
    }
    for b in &chart.asks {
        let _ = writeln!(out, "{}", bar(Side::Ask, b));
    }
}
