use crate::models::market::{ChartData, HistoryEntry};
use crate::models::quote::SearchResult;

/// UI regions, each driven by one logical data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Panel {
    Outlook,
    Summary,
    Charts,
    History,
    Watchlist,
    Notes,
    Portfolio,
}

impl Panel {
    pub fn title(&self) -> &'static str {
        match self {
            Panel::Outlook => "Company Outlook",
            Panel::Summary => "Stock Summary",
            Panel::Charts => "Charts",
            Panel::History => "Search History",
            Panel::Watchlist => "Watchlist",
            Panel::Notes => "Notes",
            Panel::Portfolio => "Portfolio",
        }
    }

    /// Panels whose content comes from the last search rather than the store.
    pub fn is_search_bound(&self) -> bool {
        matches!(self, Panel::Outlook | Panel::Summary | Panel::Charts | Panel::History)
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Proof that a search was started; handed back to finish it.
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct SearchTicket {
    pub ticker: String,
}

/// All non-persisted view state of one session.
///
/// Owned by the [`StockLookup`](crate::StockLookup) facade and read by the
/// panel builders; nothing else mutates it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// A search request is outstanding; the search control is disabled.
    pub loading: bool,

    /// Ticker of the last successful search (notes and charts follow it).
    pub active_ticker: Option<String>,

    /// Normalized response of the last successful search.
    pub result: Option<SearchResult>,

    /// Backend search history as of the last successful search.
    pub history: Vec<HistoryEntry>,

    /// Chart series for the active ticker, once loaded.
    pub charts: Option<ChartData>,

    /// Tab currently shown.
    pub active_panel: Option<Panel>,

    /// Message of the last failed operation, cleared by the next success.
    pub last_error: Option<String>,
}

impl AppState {
    /// Whether the result area (outlook/summary/history/charts) is visible.
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    /// Reset everything the search populated; stored data is untouched.
    pub fn clear_result(&mut self) {
        self.active_ticker = None;
        self.result = None;
        self.history.clear();
        self.charts = None;
        self.last_error = None;
        if self.active_panel.is_some_and(|p| p.is_search_bound()) {
            self.active_panel = None;
        }
    }
}
