//! Terminal widgets for the dashboard.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Table, Wrap},
};

use super::tui::InputState;
use super::{Dashboard, EMPTY_SYMBOLS_PROMPT, StatusLevel};
use crate::presenter::{Chart, LevelRow, Panel, SymbolView, source_label};
use crate::quotes::QuoteSource;

const BID_COLOR: Color = Color::Green;
const ASK_COLOR: Color = Color::Red;

/// Draw the main UI layout
pub fn draw<S: QuoteSource>(frame: &mut Frame, dashboard: &Dashboard<S>, input: &InputState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Ticker input
            Constraint::Min(0),    // Symbol columns
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, dashboard, input.title(), chunks[0]);
    draw_input(frame, dashboard, input, chunks[1]);
    draw_symbols(frame, dashboard, chunks[2]);
    draw_footer(frame, dashboard, input, chunks[3]);
}

fn draw_header<S: QuoteSource>(frame: &mut Frame, dashboard: &Dashboard<S>, title: &str, area: Rect) {
    let last = dashboard
        .last_pass()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let text = format!(
        " Auto-refresh {}s | Last update: {} | Passes: {} | Rows logged: {} to {}",
        dashboard.interval().as_secs(),
        last,
        dashboard.stats().passes,
        dashboard.stats().rows_written,
        dashboard.history().path().display()
    );

    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        );
    frame.render_widget(header, area);
}

fn draw_input<S: QuoteSource>(
    frame: &mut Frame,
    dashboard: &Dashboard<S>,
    input: &InputState,
    area: Rect,
) {
    let (text, style) = match input.buffer() {
        Some(buffer) => (format!("{}_", buffer), Style::default().fg(Color::Yellow)),
        None => (dashboard.symbols().join(", "), Style::default()),
    };

    let widget = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Tickers (comma-separated) "),
    );
    frame.render_widget(widget, area);
}

fn draw_symbols<S: QuoteSource>(frame: &mut Frame, dashboard: &Dashboard<S>, area: Rect) {
    if dashboard.symbols().is_empty() {
        let prompt = Paragraph::new(format!(" {} Press e to edit.", EMPTY_SYMBOLS_PROMPT))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(prompt, area);
        return;
    }

    let views = dashboard.views();
    if views.is_empty() {
        let loading = Paragraph::new(" Loading...").block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    }

    let count = views.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(views.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (view, column) in views.iter().zip(columns.iter()) {
        draw_symbol(frame, view, *column);
    }
}

fn draw_symbol(frame: &mut Frame, view: &SymbolView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", view.symbol, source_label(view.source)))
        .title_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &view.panel {
        Panel::NoData { warning } => {
            let mut lines = vec![Line::styled(
                "No data",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )];
            if let Some(w) = warning {
                lines.push(Line::raw(w.clone()));
            }
            let widget = Paragraph::new(lines).wrap(Wrap { trim: true });
            frame.render_widget(widget, inner);
        }
        Panel::Data {
            bids,
            asks,
            spread,
            chart,
        } => {
            let table_height = bids.len().max(asks.len()) as u16 + 3;
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(table_height),
                    Constraint::Length(1), // Spread line
                    Constraint::Min(6),
                ])
                .split(inner);

            let tables = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[0]);

            frame.render_widget(level_table("Bids", bids, BID_COLOR), tables[0]);
            frame.render_widget(level_table("Asks", asks, ASK_COLOR), tables[1]);

            let spread_line = Paragraph::new(format!(" Spread: {}", spread))
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD));
            frame.render_widget(spread_line, chunks[1]);

            draw_chart(frame, chart, chunks[2]);
        }
    }
}

fn level_table<'a>(title: &'a str, rows: &'a [LevelRow], color: Color) -> Table<'a> {
    let rows = rows
        .iter()
        .map(|r| Row::new(vec![r.price.clone(), r.quantity.clone()]));

    Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
        .header(
            Row::new(vec!["Price", "Qty"]).style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
}

fn draw_chart(frame: &mut Frame, chart: &Chart, area: Rect) {
    let bar = |label: &str, quantity: u64, color: Color| {
        Bar::default()
            .value(quantity)
            .label(Line::from(label.to_string()))
            .style(Style::default().fg(color))
            .value_style(Style::default().fg(Color::Black).bg(color))
    };

    let bars: Vec<Bar> = chart
        .bids
        .iter()
        .map(|b| bar(&b.label, b.quantity, BID_COLOR))
        .chain(chart.asks.iter().map(|b| bar(&b.label, b.quantity, ASK_COLOR)))
        .collect();

    let count = bars.len().max(1) as u16;
    let bar_width = (area.width.saturating_sub(2) / count).saturating_sub(1).clamp(1, 9);

    let widget = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Qty by price (bids green, asks red) "),
        )
        .bar_width(bar_width)
        .bar_gap(1)
        .max(chart.max_quantity().max(1))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(widget, area);
}

fn draw_footer<S: QuoteSource>(
    frame: &mut Frame,
    dashboard: &Dashboard<S>,
    input: &InputState,
    area: Rect,
) {
    let help = if input.is_editing() {
        "Enter=apply Esc=cancel"
    } else {
        "q=quit r=refresh e=edit tickers d=download CSV"
    };

    let (status, color) = match dashboard.status() {
        Some(s) => (
            s.message.as_str(),
            match s.level {
                StatusLevel::Info => Color::Gray,
                StatusLevel::Warning => Color::Yellow,
                StatusLevel::Error => Color::Red,
            },
        ),
        None => ("", Color::Gray),
    };

    let text = if status.is_empty() {
        format!(" {}", help)
    } else {
        format!(" {} | {}", help, status)
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
