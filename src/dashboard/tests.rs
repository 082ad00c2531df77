//! Tests for the refresh driver.

use super::tui::{InputState, KeyOutcome, handle_key};
use super::*;
use crate::domain::Side;
use crate::presenter::Panel;
use crate::quotes::{BookSnapshot, BookSource, QuoteError, TopOfBook};
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;
use std::sync::Mutex;
use tempfile::TempDir;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ds(values: &[&str]) -> Vec<Decimal> {
    values.iter().map(|v| d(v)).collect()
}

/// Per-symbol behaviour of the scripted source.
#[derive(Clone)]
enum Script {
    Snapshot(BookSnapshot),
    QuoteOnly(TopOfBook),
    Down,
}

/// Quote source answering from a per-symbol script and recording calls.
#[derive(Default)]
struct ScriptedSource {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    fn with(mut self, symbol: &str, script: Script) -> Self {
        self.scripts.insert(symbol.to_string(), script);
        self
    }

    fn script(&self, symbol: &str) -> Script {
        self.calls.lock().unwrap().push(symbol.to_string());
        self.scripts.get(symbol).cloned().unwrap_or(Script::Down)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn book(&self, symbol: &str) -> crate::quotes::Result<Option<BookSnapshot>> {
        match self.script(symbol) {
            Script::Snapshot(s) => Ok(Some(s)),
            Script::QuoteOnly(_) => Ok(None),
            Script::Down => Err(QuoteError::Status {
                status: 404,
                body: "not found".to_string(),
            }),
        }
    }

    async fn quote(&self, symbol: &str) -> crate::quotes::Result<TopOfBook> {
        match self.scripts.get(symbol).cloned() {
            Some(Script::QuoteOnly(q)) => Ok(q),
            _ => Err(QuoteError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            }),
        }
    }
}

fn aapl_snapshot() -> Script {
    Script::Snapshot(BookSnapshot {
        bp: ds(&["100.0", "99.9"]),
        bs: ds(&["10", "20"]),
        ap: ds(&["100.2", "100.3"]),
        as_: ds(&["5", "8"]),
    })
}

fn msft_quote() -> Script {
    Script::QuoteOnly(TopOfBook {
        bp: d("50.0"),
        bs: d("3"),
        ap: d("50.5"),
        as_: d("4"),
    })
}

fn source() -> ScriptedSource {
    ScriptedSource::default()
        .with("AAPL", aapl_snapshot())
        .with("MSFT", msft_quote())
}

fn dashboard(dir: &TempDir, symbols: &[&str]) -> Dashboard<ScriptedSource> {
    let history = CsvHistory::open(dir.path().join("history.csv")).unwrap();
    Dashboard::new(
        QuoteFetcher::new(source(), 5, Duration::from_secs(5)),
        history,
        dir.path().join("export.csv"),
        Duration::from_secs(5),
        symbols.iter().map(|s| s.to_string()).collect(),
    )
}

fn csv_lines(dash: &Dashboard<ScriptedSource>) -> Vec<String> {
    fs::read_to_string(dash.history().path())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

// ==================== Refresh passes ====================

#[tokio::test]
async fn test_pass_fetches_logs_and_presents_each_symbol() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL", "MSFT"]);

    dash.run_pass().await;

    let views = dash.views();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].symbol, "AAPL");
    assert_eq!(views[0].source, BookSource::Book);
    assert_eq!(views[1].symbol, "MSFT");
    assert_eq!(views[1].source, BookSource::Quote);

    let rows = dash.history().read_all().unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows[..4].iter().all(|r| r.symbol == "AAPL"));
    assert!(rows[4..].iter().all(|r| r.symbol == "MSFT"));
    assert_eq!(rows[4].side, Side::Bid);
    assert_eq!(rows[5].side, Side::Ask);

    assert_eq!(dash.stats().passes, 1);
    assert_eq!(dash.stats().fetches, 2);
    assert_eq!(dash.stats().rows_written, 6);
    assert_eq!(dash.status().unwrap().level, StatusLevel::Info);
    assert!(dash.last_pass().is_some());
}

#[tokio::test]
async fn test_pass_fetches_in_symbol_order() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["MSFT", "AAPL"]);

    dash.run_pass().await;

    let calls = dash.fetcher.source().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["MSFT", "AAPL"]);
}

#[tokio::test]
async fn test_failed_symbol_writes_nothing_and_warns() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["TSLA"]);

    dash.run_pass().await;

    assert_eq!(csv_lines(&dash), vec!["timestamp,symbol,type,price,quantity".to_string()]);
    assert_eq!(dash.stats().empty_results, 1);
    assert_eq!(dash.stats().rows_written, 0);

    let status = dash.status().unwrap();
    assert_eq!(status.level, StatusLevel::Warning);
    assert!(status.message.contains("TSLA"));
    assert!(status.message.contains("HTTP 503"));

    match &dash.views()[0].panel {
        Panel::NoData { warning } => assert!(warning.is_some()),
        Panel::Data { .. } => panic!("expected no data"),
    }
}

#[tokio::test]
async fn test_failed_symbol_does_not_block_others() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["TSLA", "AAPL"]);

    dash.run_pass().await;

    assert!(matches!(dash.views()[0].panel, Panel::NoData { .. }));
    assert!(matches!(dash.views()[1].panel, Panel::Data { .. }));
    assert_eq!(dash.stats().rows_written, 4);
}

#[tokio::test]
async fn test_write_failure_is_reported_and_display_continues() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL", "MSFT"]);
    fs::remove_file(dash.history().path()).unwrap();
    fs::create_dir(dash.history().path()).unwrap();

    dash.run_pass().await;

    assert_eq!(dash.views().len(), 2);
    assert!(dash.views().iter().all(|v| matches!(v.panel, Panel::Data { .. })));
    assert_eq!(dash.stats().write_failures, 2);
    let status = dash.status().unwrap();
    assert_eq!(status.level, StatusLevel::Warning);
    assert!(status.message.contains("failed to log AAPL"));
}

#[tokio::test]
async fn test_empty_symbol_list_prompts_without_fetching() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &[]);

    dash.run_pass().await;

    assert!(dash.views().is_empty());
    assert_eq!(dash.stats().fetches, 0);
    assert!(dash.fetcher.source().calls.lock().unwrap().is_empty());
    assert_eq!(dash.status().unwrap().message, EMPTY_SYMBOLS_PROMPT);
}

#[tokio::test]
async fn test_cached_result_is_logged_again_on_next_pass() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);

    dash.run_pass().await;
    dash.run_pass().await;

    // Second pass is inside the cache window: no new request, new rows.
    assert_eq!(dash.fetcher.source().calls.lock().unwrap().len(), 1);
    assert_eq!(dash.stats().rows_written, 8);
}

// ==================== Scheduling ====================

#[tokio::test]
async fn test_first_pass_due_immediately_then_after_interval() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    assert!(dash.is_due(Instant::now()));

    dash.run_pass().await;

    let now = Instant::now();
    assert!(!dash.is_due(now));
    assert!(dash.time_until_due(now) <= Duration::from_secs(5));
    assert!(dash.is_due(now + Duration::from_secs(5)));
}

#[tokio::test]
async fn test_manual_refresh_makes_pass_due() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    dash.run_pass().await;

    dash.request_refresh();

    assert!(dash.is_due(Instant::now()));
    assert_eq!(dash.time_until_due(Instant::now()), Duration::ZERO);
}

// ==================== Symbol changes ====================

#[tokio::test]
async fn test_set_symbols_discards_removed_state() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL", "MSFT"]);
    dash.run_pass().await;

    let symbols = dash.set_symbols(" msft , tsla ").to_vec();

    assert_eq!(symbols, vec!["MSFT", "TSLA"]);
    assert_eq!(dash.views().len(), 1);
    assert_eq!(dash.views()[0].symbol, "MSFT");
    assert!(dash.is_due(Instant::now()));

    dash.run_pass().await;
    let views: Vec<&str> = dash.views().iter().map(|v| v.symbol.as_str()).collect();
    assert_eq!(views, vec!["MSFT", "TSLA"]);
}

#[tokio::test]
async fn test_set_symbols_refetches_readded_symbol() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    dash.run_pass().await;

    dash.set_symbols("MSFT");
    dash.set_symbols("AAPL");
    dash.run_pass().await;

    let calls = dash.fetcher.source().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["AAPL", "AAPL"]);
}

#[test]
fn test_set_symbols_empty_prompts() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);

    dash.set_symbols(" , ");

    assert!(dash.symbols().is_empty());
    assert_eq!(dash.status().unwrap().level, StatusLevel::Warning);
}

// ==================== Export ====================

#[tokio::test]
async fn test_export_history_copies_log() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    dash.run_pass().await;

    let bytes = dash.export_history().unwrap();

    let exported = fs::read(dir.path().join("export.csv")).unwrap();
    assert_eq!(exported.len() as u64, bytes);
    assert_eq!(exported, fs::read(dash.history().path()).unwrap());
    assert!(dash.status().unwrap().message.contains("Saved full history"));
}

#[test]
fn test_export_failure_sets_error_status() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    fs::remove_file(dash.history().path()).unwrap();

    assert!(dash.export_history().is_err());
    assert_eq!(dash.status().unwrap().level, StatusLevel::Error);
}

// ==================== Key handling ====================

#[test]
fn test_quit_keys() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    let mut input = InputState::new("t");

    assert_eq!(handle_key(&mut dash, &mut input, key(KeyCode::Char('q'))), KeyOutcome::Quit);
    assert_eq!(handle_key(&mut dash, &mut input, key(KeyCode::Esc)), KeyOutcome::Quit);
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(handle_key(&mut dash, &mut input, ctrl_c), KeyOutcome::Quit);
}

#[tokio::test]
async fn test_refresh_key_triggers_pass() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    let mut input = InputState::new("t");
    dash.run_pass().await;

    handle_key(&mut dash, &mut input, key(KeyCode::Char('r')));

    assert!(dash.is_due(Instant::now()));
}

#[test]
fn test_edit_tickers_flow() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    let mut input = InputState::new("t");

    handle_key(&mut dash, &mut input, key(KeyCode::Char('e')));
    assert_eq!(input.buffer(), Some("AAPL"));

    // While editing, 'q' is text, not quit.
    for c in ", qqq".chars() {
        assert_eq!(
            handle_key(&mut dash, &mut input, key(KeyCode::Char(c))),
            KeyOutcome::Continue
        );
    }
    handle_key(&mut dash, &mut input, key(KeyCode::Backspace));
    handle_key(&mut dash, &mut input, key(KeyCode::Enter));

    assert!(!input.is_editing());
    assert_eq!(dash.symbols(), &["AAPL".to_string(), "QQ".to_string()]);
}

#[test]
fn test_edit_cancel_keeps_symbols() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    let mut input = InputState::new("t");

    handle_key(&mut dash, &mut input, key(KeyCode::Char('e')));
    handle_key(&mut dash, &mut input, key(KeyCode::Char('X')));
    handle_key(&mut dash, &mut input, key(KeyCode::Esc));

    assert!(!input.is_editing());
    assert_eq!(dash.symbols(), &["AAPL".to_string()]);
}

#[tokio::test]
async fn test_download_key_exports() {
    let dir = TempDir::new().unwrap();
    let mut dash = dashboard(&dir, &["AAPL"]);
    let mut input = InputState::new("t");
    dash.run_pass().await;

    handle_key(&mut dash, &mut input, key(KeyCode::Char('d')));

    assert!(dir.path().join("export.csv").exists());
}
