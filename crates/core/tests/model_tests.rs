// ═══════════════════════════════════════════════════════════════════
// Model Tests: tickers, transactions, holdings, backend payloads
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};
use stock_lookup_core::errors::CoreError;
use stock_lookup_core::models::market::{
    BetaResponse, ChartPeriod, HistoricalPoint, ReturnPoint, SeriesResponse,
};
use stock_lookup_core::models::note::Note;
use stock_lookup_core::models::quote::{
    strip_share_class, PriceDirection, RawSearchResponse, RawStock, SearchResult, StockQuote,
};
use stock_lookup_core::models::ticker::{normalize_ticker, same_ticker};
use stock_lookup_core::models::transaction::{Holding, Transaction, TransactionType};

// ═══════════════════════════════════════════════════════════════════
// Tickers
// ═══════════════════════════════════════════════════════════════════

mod ticker {
    use super::*;

    #[test]
    fn trims_and_uppercases() {
        assert_eq!(normalize_ticker("  aapl ").unwrap(), "AAPL");
    }

    #[test]
    fn keeps_class_and_index_symbols() {
        assert_eq!(normalize_ticker("brk.b").unwrap(), "BRK.B");
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert_eq!(normalize_ticker("rds-a").unwrap(), "RDS-A");
    }

    #[test]
    fn empty_is_required_error() {
        let err = normalize_ticker("   ").unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref m) if m == "Ticker is required"));
    }

    #[test]
    fn rejects_spaces_and_symbols() {
        assert!(normalize_ticker("AA PL").is_err());
        assert!(normalize_ticker("AAPL;").is_err());
    }

    #[test]
    fn same_ticker_ignores_case_and_padding() {
        assert!(same_ticker("msft", " MSFT"));
        assert!(!same_ticker("MSFT", "MSFTX"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Transactions & Holdings
// ═══════════════════════════════════════════════════════════════════

mod transaction {
    use super::*;

    #[test]
    fn serializes_kind_as_type_field() {
        let tx = Transaction {
            kind: TransactionType::Sell,
            ticker: "AAPL".into(),
            shares: 2.0,
            price: 150.0,
            date: None,
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "sell");
        assert_eq!(json["ticker"], "AAPL");
    }

    #[test]
    fn deserializes_without_date() {
        let tx: Transaction =
            serde_json::from_str(r#"{"type":"buy","ticker":"X","shares":10,"price":5}"#).unwrap();
        assert_eq!(tx.kind, TransactionType::Buy);
        assert_eq!(tx.date, None);
        assert_eq!(tx.total(), 50.0);
    }

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!("BUY".parse::<TransactionType>(), Ok(TransactionType::Buy));
        assert_eq!(" sell ".parse::<TransactionType>(), Ok(TransactionType::Sell));
        assert!("hold".parse::<TransactionType>().is_err());
    }

    #[test]
    fn average_cost_only_for_open_positions() {
        let mut h = Holding::new("X");
        h.shares = 5.0;
        h.cost = 25.0;
        assert_eq!(h.average_cost(), Some(5.0));

        h.shares = 0.0;
        assert!(!h.is_open());
        assert_eq!(h.average_cost(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Notes
// ═══════════════════════════════════════════════════════════════════

mod note {
    use super::*;

    #[test]
    fn timestamp_round_trips_as_iso_string() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let note = Note::new("Thesis", "Buy the dip", ts);
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T09:30:00Z");
        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn missing_title_defaults_to_empty() {
        let note: Note =
            serde_json::from_str(r#"{"content":"hi","timestamp":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(note.title, "");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Search payload normalization
// ═══════════════════════════════════════════════════════════════════

mod search_payload {
    use super::*;

    fn parse(json: &str) -> SearchResult {
        let raw: RawSearchResponse = serde_json::from_str(json).unwrap();
        SearchResult::from_raw(raw.company.unwrap(), raw.stock.unwrap_or_default(), "REQ")
    }

    #[test]
    fn full_payload() {
        let result = parse(
            r#"{
                "company": {"name": "Alphabet Inc. - Class A", "ticker": "googl",
                            "exchangeCode": "NASDAQ", "startDate": "2004-08-19",
                            "description": "Search.", "industry": "Internet"},
                "stock": {"ticker": "GOOGL", "last": 140.5, "prevClose": 138.0,
                          "open": 139, "high": 141, "low": 137.5, "volume": 25000000,
                          "timestamp": "2024-03-01T21:00:00+00:00"}
            }"#,
        );
        assert_eq!(result.company.name, "Alphabet Inc.");
        assert_eq!(result.company.ticker, "GOOGL");
        assert_eq!(result.company.exchange_code.as_deref(), Some("NASDAQ"));
        assert_eq!(result.quote.trading_day.as_deref(), Some("2024-03-01"));
        assert_eq!(result.quote.change, Some(2.5));
        assert_eq!(result.quote.change_percent, Some(1.81));
        assert_eq!(result.quote.direction(), Some(PriceDirection::Up));
    }

    #[test]
    fn numbers_as_strings_and_placeholders() {
        let raw: RawStock = serde_json::from_str(
            r#"{"last": "12.50", "prevClose": "N/A", "open": null, "volume": "1000"}"#,
        )
        .unwrap();
        assert_eq!(raw.last, Some(12.5));
        assert_eq!(raw.prev_close, None);
        assert_eq!(raw.open, None);
        assert_eq!(raw.volume, Some(1000.0));
    }

    #[test]
    fn last_falls_back_to_last_close() {
        let raw: RawStock = serde_json::from_str(r#"{"last_close": 99.0, "prevClose": 100.0}"#).unwrap();
        let quote = StockQuote::from_raw(raw, "X");
        assert_eq!(quote.last, Some(99.0));
        assert_eq!(quote.change, Some(-1.0));
        assert_eq!(quote.direction(), Some(PriceDirection::Down));
    }

    #[test]
    fn reference_price_uses_prev_close_without_last() {
        let raw: RawStock = serde_json::from_str(r#"{"prevClose": 42.0}"#).unwrap();
        let quote = StockQuote::from_raw(raw, "X");
        assert_eq!(quote.reference_price(), Some(42.0));
        assert_eq!(quote.change, None);
        assert_eq!(quote.direction(), None);
    }

    #[test]
    fn industry_code_fills_missing_industry() {
        let result = parse(r#"{"company": {"name": "Acme", "industryCode": "3571"}}"#);
        assert_eq!(result.company.industry.as_deref(), Some("3571"));
        assert_eq!(result.company.ticker, "REQ");
        assert_eq!(result.quote.ticker, "REQ");
    }

    #[test]
    fn blank_fields_become_none() {
        let result = parse(r#"{"company": {"name": " ", "description": ""}}"#);
        assert_eq!(result.company.name, "REQ");
        assert_eq!(result.company.description, None);
    }

    #[test]
    fn share_class_suffix() {
        assert_eq!(strip_share_class("Berkshire Hathaway Inc. - Class B"), "Berkshire Hathaway Inc.");
        assert_eq!(strip_share_class("Class Act - Classic"), "Class Act - Classic");
        assert_eq!(strip_share_class("Plain Co"), "Plain Co");
    }

    #[test]
    fn error_field_is_kept() {
        let raw: RawSearchResponse = serde_json::from_str(r#"{"error": "Ticker not found"}"#).unwrap();
        assert_eq!(raw.error.as_deref(), Some("Ticker not found"));
        assert!(raw.company.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Chart series payloads
// ═══════════════════════════════════════════════════════════════════

mod market {
    use super::*;

    #[test]
    fn period_params() {
        let params: Vec<&str> = ChartPeriod::ALL.iter().map(|p| p.as_param()).collect();
        assert_eq!(params, vec!["1m", "3m", "6m", "1y", "5y"]);
        assert_eq!(ChartPeriod::default(), ChartPeriod::SixMonths);
        assert_eq!("1Y".parse::<ChartPeriod>(), Ok(ChartPeriod::OneYear));
        assert!("2w".parse::<ChartPeriod>().is_err());
    }

    #[test]
    fn historical_series_tolerates_bad_numbers() {
        let resp: SeriesResponse<HistoricalPoint> = serde_json::from_str(
            r#"{"data": [{"date": "2024-01-02", "close": "185.2", "volume": 100},
                         {"date": "2024-01-03", "close": "N/A"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].close, Some(185.2));
        assert_eq!(resp.data[1].close, None);
        assert_eq!(resp.data[1].volume, None);
    }

    #[test]
    fn return_point_uses_return_field() {
        let p: ReturnPoint = serde_json::from_str(r#"{"date": "2024-01", "return": 0.015}"#).unwrap();
        assert_eq!(p.value, Some(0.015));
    }

    #[test]
    fn series_error_without_data() {
        let resp: SeriesResponse<ReturnPoint> =
            serde_json::from_str(r#"{"error": "No data"}"#).unwrap();
        assert!(resp.data.is_empty());
        assert_eq!(resp.error.as_deref(), Some("No data"));
    }

    #[test]
    fn beta_report_is_flattened() {
        let resp: BetaResponse = serde_json::from_str(
            r#"{"beta": 1.23, "risk_level": "High", "annualized_volatility": 0.31}"#,
        )
        .unwrap();
        assert_eq!(resp.report.beta, Some(1.23));
        assert_eq!(resp.report.risk_level.as_deref(), Some("High"));
        assert_eq!(resp.report.annualized_volatility, Some(0.31));
        assert!(resp.error.is_none());
    }
}
