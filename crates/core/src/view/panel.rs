use crate::models::quote::PriceDirection;
use crate::services::analytics_service::AnalyticsService;
use crate::services::notes_service::NotesService;
use crate::services::portfolio_service::PortfolioService;
use crate::services::price_cache_service::PriceCacheService;
use crate::services::watchlist_service::WatchlistService;
use crate::storage::store::PersistentStore;

use super::format::{
    format_money, format_money_opt, format_number_opt, format_percent_opt,
    format_shares, format_volume_opt, NOT_AVAILABLE, PRICE_PENDING,
};
use super::state::{AppState, Panel};

// ── View models ─────────────────────────────────────────────────────
//
// Display-ready content of each panel. A sink only has to lay these out.

#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    Outlook(Option<OutlookView>),
    Summary(Option<SummaryView>),
    Charts(Option<ChartsView>),
    History(Vec<HistoryRow>),
    Watchlist(WatchlistView),
    Notes(NotesView),
    Portfolio(PortfolioView),
}

impl PanelView {
    pub fn panel(&self) -> Panel {
        match self {
            PanelView::Outlook(_) => Panel::Outlook,
            PanelView::Summary(_) => Panel::Summary,
            PanelView::Charts(_) => Panel::Charts,
            PanelView::History(_) => Panel::History,
            PanelView::Watchlist(_) => Panel::Watchlist,
            PanelView::Notes(_) => Panel::Notes,
            PanelView::Portfolio(_) => Panel::Portfolio,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlookView {
    pub name: String,
    pub ticker: String,
    pub exchange_code: String,
    pub start_date: String,
    pub industry: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub ticker: String,
    pub trading_day: String,
    pub prev_close: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub last: String,
    pub change: String,
    pub change_percent: String,
    pub volume: String,
    pub direction: Option<PriceDirection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartsView {
    pub ticker: String,
    pub period: String,
    /// `(date, close)` for the price line
    pub closes: Vec<(String, f64)>,
    /// `(date, volume)` for the volume bars
    pub volumes: Vec<(String, f64)>,
    /// `(date, return)` as fractions
    pub returns: Vec<(String, f64)>,
    pub beta: String,
    pub risk_level: String,
    pub annualized_volatility: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub ticker: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistRow {
    pub ticker: String,
    /// Cached price, or a pending placeholder when never looked up
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchlistView {
    pub rows: Vec<WatchlistRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub index: usize,
    pub title: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesView {
    /// Ticker the notes belong to; `None` before the first search
    pub ticker: Option<String>,
    pub notes: Vec<NoteRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub index: usize,
    pub kind: String,
    pub ticker: String,
    pub shares: String,
    pub price: String,
    pub total: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRow {
    pub ticker: String,
    pub shares: String,
    pub average_cost: String,
    pub price: String,
    pub market_value: String,
    pub gain_loss: String,
    pub gain_loss_pct: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioView {
    pub transactions: Vec<TransactionRow>,
    pub holdings: Vec<HoldingRow>,
    pub total_value: String,
    pub total_cost: String,
    /// e.g. "2 of 3 holdings priced"
    pub coverage: String,
}

// ── Builders ────────────────────────────────────────────────────────

/// Build the current view of `panel` from the store and session state.
pub fn build_view(panel: Panel, store: &PersistentStore, state: &AppState) -> PanelView {
    match panel {
        Panel::Outlook => PanelView::Outlook(outlook_view(state)),
        Panel::Summary => PanelView::Summary(summary_view(state)),
        Panel::Charts => PanelView::Charts(charts_view(state)),
        Panel::History => PanelView::History(history_rows(state)),
        Panel::Watchlist => PanelView::Watchlist(watchlist_view(store)),
        Panel::Notes => PanelView::Notes(notes_view(store, state)),
        Panel::Portfolio => PanelView::Portfolio(portfolio_view(store)),
    }
}

fn text_or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn outlook_view(state: &AppState) -> Option<OutlookView> {
    let company = &state.result.as_ref()?.company;
    Some(OutlookView {
        name: company.name.clone(),
        ticker: company.ticker.clone(),
        exchange_code: text_or_na(&company.exchange_code),
        start_date: text_or_na(&company.start_date),
        industry: text_or_na(&company.industry),
        description: text_or_na(&company.description),
    })
}

fn summary_view(state: &AppState) -> Option<SummaryView> {
    let quote = &state.result.as_ref()?.quote;
    Some(SummaryView {
        ticker: quote.ticker.clone(),
        trading_day: text_or_na(&quote.trading_day),
        prev_close: format_number_opt(quote.prev_close),
        open: format_number_opt(quote.open),
        high: format_number_opt(quote.high),
        low: format_number_opt(quote.low),
        last: format_number_opt(quote.last),
        change: format_number_opt(quote.change),
        change_percent: format_percent_opt(quote.change_percent),
        volume: format_volume_opt(quote.volume),
        direction: quote.direction(),
    })
}

fn charts_view(state: &AppState) -> Option<ChartsView> {
    let charts = state.charts.as_ref()?;
    let beta = charts
        .beta
        .as_ref()
        .map(|b| AnalyticsService::new().beta_summary(b));
    let (beta, risk_level, annualized_volatility) = match beta {
        Some(b) => (b.beta, b.risk_level, b.annualized_volatility),
        None => (
            NOT_AVAILABLE.to_string(),
            NOT_AVAILABLE.to_string(),
            NOT_AVAILABLE.to_string(),
        ),
    };

    Some(ChartsView {
        ticker: charts.ticker.clone(),
        period: charts.period.to_string(),
        closes: charts
            .prices
            .iter()
            .filter_map(|p| p.close.map(|c| (p.date.clone(), c)))
            .collect(),
        volumes: charts
            .prices
            .iter()
            .filter_map(|p| p.volume.map(|v| (p.date.clone(), v)))
            .collect(),
        returns: charts
            .returns
            .iter()
            .filter_map(|r| r.value.map(|v| (r.date.clone(), v)))
            .collect(),
        beta,
        risk_level,
        annualized_volatility,
    })
}

fn history_rows(state: &AppState) -> Vec<HistoryRow> {
    state
        .history
        .iter()
        .map(|h| HistoryRow {
            ticker: h.ticker.clone(),
            timestamp: h.timestamp.clone(),
        })
        .collect()
}

fn watchlist_view(store: &PersistentStore) -> WatchlistView {
    let prices = PriceCacheService::new().all(store);
    let rows = WatchlistService::new()
        .list(store)
        .into_iter()
        .map(|ticker| {
            let price = prices
                .get(&ticker.to_uppercase())
                .map(|p| format_money(*p))
                .unwrap_or_else(|| PRICE_PENDING.to_string());
            WatchlistRow { ticker, price }
        })
        .collect();
    WatchlistView { rows }
}

fn notes_view(store: &PersistentStore, state: &AppState) -> NotesView {
    match state.active_ticker.as_deref() {
        Some(ticker) => build_notes_view(store, ticker),
        None => NotesView::default(),
    }
}

/// Notes of any ticker, independent of the active search.
pub fn build_notes_view(store: &PersistentStore, ticker: &str) -> NotesView {
    let ticker = ticker.trim().to_uppercase();
    let notes = NotesService::new()
        .list_for(store, &ticker)
        .into_iter()
        .enumerate()
        .map(|(index, note)| NoteRow {
            index,
            title: note.title,
            content: note.content,
            timestamp: note.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();
    NotesView {
        ticker: Some(ticker),
        notes,
    }
}

fn portfolio_view(store: &PersistentStore) -> PortfolioView {
    let service = PortfolioService::new();
    let ledger = service.transactions(store);
    let valuation = service.valuation(store);

    let transactions = ledger
        .iter()
        .enumerate()
        .map(|(index, tx)| TransactionRow {
            index,
            kind: tx.kind.to_string(),
            ticker: tx.ticker.clone(),
            shares: format_shares(tx.shares),
            price: format_money(tx.price),
            total: format_money(tx.total()),
            date: tx.date.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let holdings = valuation
        .rows
        .iter()
        .map(|row| HoldingRow {
            ticker: row.ticker.clone(),
            shares: format_shares(row.shares),
            average_cost: format_money_opt(row.average_cost),
            price: format_money_opt(row.price),
            market_value: format_money_opt(row.market_value),
            gain_loss: format_money_opt(row.gain_loss),
            gain_loss_pct: format_percent_opt(row.gain_loss_pct),
        })
        .collect();

    PortfolioView {
        transactions,
        holdings,
        total_value: format_money(valuation.total_value),
        total_cost: format_money(valuation.total_cost),
        coverage: format!(
            "{} of {} holdings priced",
            valuation.priced_holdings,
            valuation.rows.len()
        ),
    }
}
