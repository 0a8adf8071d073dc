//! Session loop integration tests
//!
//! Drives whole sessions through in-memory input against a model backed by
//! a temporary data directory.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use folio::cli::{LineSource, MemoryReporter, Report, Session};
use folio::portfolio::{InvestmentModel, PortfolioModel, PriceBook, Store};
use folio::{FolioError, SessionEnd};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Helper to create a model over a data directory with a small price book
fn create_model(dir: &Path) -> InvestmentModel {
    let prices = PriceBook::new()
        .with_price("AAPL", date("2024-01-02"), 100.0)
        .with_price("AAPL", date("2024-01-09"), 120.0)
        .with_price("MSFT", date("2024-01-02"), 200.0)
        .with_price("MSFT", date("2024-01-09"), 210.0);
    InvestmentModel::new(
        prices,
        Store::new(dir.join("portfolios"), dir.join("strategies")),
    )
}

fn run_session(
    input: &str,
    model: &mut InvestmentModel,
    reporter: &MemoryReporter,
) -> (Result<SessionEnd, FolioError>, usize) {
    let mut session = Session::new(LineSource::from_text(input), reporter);
    let result = session.run(model);
    (result, session.lines_consumed())
}

#[test]
fn test_quit_as_first_line_ends_gracefully() {
    for quit in ["quit", "q", "QUIT", "Q", "  Quit  "] {
        let dir = tempfile::tempdir().unwrap();
        let mut model = create_model(dir.path());
        let reporter = MemoryReporter::new();

        let (result, consumed) = run_session(&format!("{}\nCREATE_PORTFOLIO\nx\n", quit), &mut model, &reporter);

        assert_eq!(result.unwrap(), SessionEnd::Quit);
        assert_eq!(consumed, 1);
        assert!(reporter.contains("Goodbye"));
        assert!(model.portfolio_names().is_empty());
    }
}

#[test]
fn test_empty_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let (result, _) = run_session("", &mut model, &reporter);

    let err = result.unwrap_err();
    assert!(matches!(err, FolioError::InvalidState(_)));
    assert!(err.to_string().contains("quit token"));
}

#[test]
fn test_input_running_out_without_quit_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let (result, consumed) = run_session("create_portfolio\ntech\nhello\n", &mut model, &reporter);

    assert!(matches!(result, Err(FolioError::InvalidState(_))));
    assert_eq!(consumed, 3);
    // Work done before the input ran out still happened
    assert_eq!(model.portfolio_names(), vec!["tech".to_string()]);
}

#[test]
fn test_unknown_commands_do_not_end_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let (result, _) = run_session("sell_stock\n\nhelp\ncreate_portfolio\ntech\nq\n", &mut model, &reporter);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    let invalid = reporter
        .messages()
        .iter()
        .filter(|m| m.starts_with("Invalid command"))
        .count();
    assert_eq!(invalid, 3);
    assert_eq!(model.portfolio_names(), vec!["tech".to_string()]);
}

#[test]
fn test_command_tokens_ignore_case() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let input = "create_portfolio\nA\nCREATE_PORTFOLIO\nB\nCreate_Portfolio\nC\nquit\n";
    let (result, _) = run_session(input, &mut model, &reporter);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert_eq!(model.portfolio_names(), vec!["A", "B", "C"]);
    assert!(!reporter.contains("Invalid command"));
}

#[test]
fn test_command_listing_shown_before_every_read() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let (result, _) = run_session("display_all_portfolios\nbogus\nq\n", &mut model, &reporter);

    assert!(result.is_ok());
    assert_eq!(reporter.listings(), 3);
    let first_listing = reporter
        .reports()
        .into_iter()
        .find_map(|r| match r {
            Report::Commands(names) => Some(names),
            _ => None,
        })
        .unwrap();
    assert_eq!(first_listing.len(), 15);
    assert_eq!(first_listing[0], "CREATE_PORTFOLIO");
}

#[test]
fn test_bootstrap_failure_reads_no_commands() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("strategies")).unwrap();
    fs::write(dir.path().join("strategies/broken.json"), "{ nope").unwrap();
    fs::create_dir_all(dir.path().join("portfolios")).unwrap();
    fs::write(
        dir.path().join("portfolios/tech.json"),
        r#"{"name": "tech", "stocks": ["AAPL"], "transactions": []}"#,
    )
    .unwrap();

    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let (result, consumed) = run_session("create_portfolio\nx\nq\n", &mut model, &reporter);

    assert!(matches!(result, Err(FolioError::InvalidState(_))));
    assert_eq!(consumed, 0);
    assert_eq!(reporter.listings(), 0);
    assert!(reporter.contains("Corrupt strategy file"));
    // Portfolios are never reloaded once strategies fail
    assert!(model.portfolio_names().is_empty());
}

#[test]
fn test_portfolio_reload_failure_reads_no_commands() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("strategies")).unwrap();
    fs::write(
        dir.path().join("strategies/weekly.json"),
        r#"{"name": "weekly", "amount": 100.0, "start": "2024-01-02", "end": null,
            "interval_days": 7, "commission": 0.0, "weights": {"AAPL": 100.0}}"#,
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("portfolios")).unwrap();
    fs::write(dir.path().join("portfolios/tech.json"), "[1, 2").unwrap();

    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let (result, consumed) = run_session("create_portfolio\nx\nq\n", &mut model, &reporter);

    assert!(matches!(result, Err(FolioError::InvalidState(_))));
    assert_eq!(consumed, 0);
    assert_eq!(reporter.listings(), 0);
    assert!(reporter.contains("Corrupt portfolio file"));
    assert!(!reporter.contains("Loaded"));
}

#[test]
fn test_saved_strategy_with_zero_interval_fails_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("strategies")).unwrap();
    fs::write(
        dir.path().join("strategies/bad.json"),
        r#"{"name": "bad", "amount": 100.0, "start": "2024-01-02", "end": null,
            "interval_days": 0, "commission": 0.0, "weights": {"AAPL": 100.0}}"#,
    )
    .unwrap();

    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let input = "create_portfolio\nt\napply_strategy\nbad\nt\nq\n";
    let (result, consumed) = run_session(input, &mut model, &reporter);

    assert!(matches!(result, Err(FolioError::InvalidState(_))));
    assert_eq!(consumed, 0);
    assert!(reporter.contains("Invalid strategy file"));
}

#[test]
fn test_saved_portfolio_outside_data_dir_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("portfolios")).unwrap();
    fs::write(
        data.join("portfolios/tech.json"),
        r#"{"name": "../../x", "stocks": [], "transactions": []}"#,
    )
    .unwrap();

    let mut model = create_model(&data);
    let reporter = MemoryReporter::new();

    let (result, consumed) = run_session("save_session\nq\n", &mut model, &reporter);

    assert!(matches!(result, Err(FolioError::InvalidState(_))));
    assert_eq!(consumed, 0);
    assert!(!dir.path().join("x.json").exists());
}

#[test]
fn test_zero_close_is_reported_not_priced() {
    let dir = tempfile::tempdir().unwrap();
    let prices = PriceBook::new().with_price("AAPL", date("2024-01-02"), 0.0);
    let mut model = InvestmentModel::new(
        prices,
        Store::new(dir.path().join("portfolios"), dir.path().join("strategies")),
    );
    let reporter = MemoryReporter::new();

    let input = "create_portfolio\nt\ninvest\nt\n100\n2024-01-02\n0\nAAPL=100\nget_total_value\nt\n2024-01-02\nq\n";
    let (result, _) = run_session(input, &mut model, &reporter);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(reporter.contains("not usable"));
    assert!(!reporter.contains("NaN"));
    assert!(!reporter.contains("$inf"));
    assert!(model.portfolio("t").unwrap().transactions().is_empty());
}

#[test]
fn test_bootstrap_loads_saved_state() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = create_model(dir.path());
    let reporter = MemoryReporter::new();
    let input = "create_portfolio\ntech\nbuy_stock\ntech\nAAPL\n10\n2024-01-02\n0\nsave_session\nq\n";
    let (result, _) = run_session(input, &mut first, &reporter);
    assert_eq!(result.unwrap(), SessionEnd::Quit);

    let mut second = create_model(dir.path());
    let reporter = MemoryReporter::new();
    let input = "get_total_value\ntech\n2024-01-09\nq\n";
    let (result, _) = run_session(input, &mut second, &reporter);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(reporter.contains("Loaded 0 strategy(ies) and 1 portfolio(s)"));
    assert!(reporter.contains("Total value of 'tech' on 2024-01-09: $1200.00"));
}

#[test]
fn test_handler_failure_stops_after_one_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    model.create_portfolio("tech").unwrap();
    // Saving needs a directory where this file sits
    fs::write(dir.path().join("portfolios"), "").unwrap();
    let reporter = MemoryReporter::new();

    let input = "save_portfolio\ntech\ncreate_portfolio\nother\nq\n";
    let (result, consumed) = run_session(input, &mut model, &reporter);

    assert_eq!(
        result.unwrap(),
        SessionEnd::HandlerFailed("SAVE_PORTFOLIO".to_string())
    );
    assert_eq!(consumed, 2);
    assert_eq!(model.portfolio_names(), vec!["tech".to_string()]);
    assert!(!reporter.contains("Goodbye"));
}

#[test]
fn test_rejected_arguments_keep_the_stream_in_sync() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    // Bad date on INVEST: all five argument lines are still consumed
    let input = "create_portfolio\ntech\ninvest\ntech\n1000\nJan 2\n0\nAAPL=100\ndisplay_all_portfolios\nq\n";
    let (result, consumed) = run_session(input, &mut model, &reporter);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert_eq!(consumed, 10);
    assert!(reporter.contains("not a date"));
    assert!(reporter.contains("Portfolios:\n  tech"));
    assert!(!reporter.contains("Invalid command"));
}

#[test]
fn test_back_to_back_sessions_resolve_identically() {
    let input = "Display_All_Portfolios\nnot_a_command\nq\n";

    let transcripts: Vec<Vec<String>> = (0..2)
        .map(|_| {
            let dir = tempfile::tempdir().unwrap();
            let mut model = create_model(dir.path());
            let reporter = MemoryReporter::new();
            let (result, _) = run_session(input, &mut model, &reporter);
            assert_eq!(result.unwrap(), SessionEnd::Quit);
            reporter.messages()
        })
        .collect();

    assert_eq!(transcripts[0], transcripts[1]);
}

#[test]
fn test_dollar_cost_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = create_model(dir.path());
    let reporter = MemoryReporter::new();

    let input = "\
CREATE_PORTFOLIO
retire
CREATE_STRATEGY
weekly
1000
2024-01-02
-
7
0
AAPL=50,MSFT=50
APPLY_STRATEGY
weekly
retire
SAVE_STRATEGY
weekly
GET_TOTAL_COST_BASIS
retire
2024-01-09
quit
";
    let (result, _) = run_session(input, &mut model, &reporter);

    assert_eq!(result.unwrap(), SessionEnd::Quit);
    assert!(reporter.contains("Total cost basis of 'retire' on 2024-01-09: $2000.00"));
    assert!(dir.path().join("strategies/weekly.json").exists());
    assert!(!reporter.contains("Error"));
}
