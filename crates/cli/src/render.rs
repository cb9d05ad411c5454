use std::collections::BTreeSet;

use stock_lookup_core::models::analytics::{Comparison, PerformanceResult};
use stock_lookup_core::models::quote::PriceDirection;
use stock_lookup_core::view::format::{format_money, format_number, format_percent, format_percent_opt};
use stock_lookup_core::view::notifications::{Notification, NotificationKind};
use stock_lookup_core::view::panel::PanelView;
use stock_lookup_core::view::state::Panel;
use stock_lookup_core::view::sync::ViewSink;

/// Chart series are long; the terminal only gets the most recent rows.
const SERIES_TAIL: usize = 10;

/// Prints the panels a command cares about to stdout.
///
/// Error notifications are left to the caller, which reports the returned
/// error itself.
#[derive(Debug, Clone, Default)]
pub struct TextSink {
    shown: BTreeSet<Panel>,
}

impl TextSink {
    pub fn showing(panels: impl IntoIterator<Item = Panel>) -> Self {
        Self {
            shown: panels.into_iter().collect(),
        }
    }
}

impl ViewSink for TextSink {
    fn render(&mut self, view: &PanelView) {
        if !self.shown.contains(&view.panel()) {
            return;
        }
        if let Some(text) = render_panel(view) {
            println!("{text}");
        }
    }

    fn notify(&mut self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Error => {}
            NotificationKind::Info => println!("[info] {}", notification.message),
            NotificationKind::Success => println!("[ok] {}", notification.message),
        }
    }
}

/// Lay out rows as left-aligned columns.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(headers.to_vec())];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

fn heading(title: &str) -> String {
    format!("== {title} ==")
}

fn key_values<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    let width = pairs
        .iter()
        .map(|(k, _)| k.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{:<width$}  {}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tail<T>(items: &[T]) -> &[T] {
    &items[items.len().saturating_sub(SERIES_TAIL)..]
}

/// Text for one panel, or `None` when the panel has nothing to show yet.
pub fn render_panel(view: &PanelView) -> Option<String> {
    let title = view.panel().title();
    let body = match view {
        PanelView::Outlook(outlook) => {
            let o = outlook.as_ref()?;
            key_values(&[
                ("Company Name", &o.name),
                ("Stock Ticker Symbol", &o.ticker),
                ("Stock Exchange Code", &o.exchange_code),
                ("Company Start Date", &o.start_date),
                ("Industry", &o.industry),
                ("Description", &o.description),
            ])
        }
        PanelView::Summary(summary) => {
            let s = summary.as_ref()?;
            let arrow = match s.direction {
                Some(PriceDirection::Up) => " ▲",
                Some(PriceDirection::Down) => " ▼",
                _ => "",
            };
            let change = format!("{}{arrow}", s.change);
            let change_percent = format!("{}{arrow}", s.change_percent);
            key_values(&[
                ("Stock Ticker Symbol", &s.ticker),
                ("Trading Day", &s.trading_day),
                ("Previous Closing Price", &s.prev_close),
                ("Opening Price", &s.open),
                ("High Price", &s.high),
                ("Low Price", &s.low),
                ("Last Price", &s.last),
                ("Change", &change),
                ("Change Percent", &change_percent),
                ("Number of Shares Traded", &s.volume),
            ])
        }
        PanelView::Charts(charts) => {
            let c = charts.as_ref()?;
            let prices: Vec<Vec<String>> = tail(&c.closes)
                .iter()
                .map(|(date, close)| vec![date.clone(), format!("{close:.2}")])
                .collect();
            let returns: Vec<Vec<String>> = tail(&c.returns)
                .iter()
                .map(|(date, r)| vec![date.clone(), format_percent(r * 100.0)])
                .collect();
            format!(
                "{} ({})\n{}\n\n{}\n\n{}",
                c.ticker,
                c.period,
                key_values(&[
                    ("Beta", &c.beta),
                    ("Risk Level", &c.risk_level),
                    ("Annualized Volatility", &c.annualized_volatility),
                ]),
                table(&["Date", "Close"], &prices),
                table(&["Date", "Return"], &returns),
            )
        }
        PanelView::History(rows) => {
            if rows.is_empty() {
                return None;
            }
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|r| vec![r.ticker.clone(), r.timestamp.clone()])
                .collect();
            table(&["Ticker", "Searched At"], &rows)
        }
        PanelView::Watchlist(watchlist) => {
            if watchlist.rows.is_empty() {
                "Your watchlist is empty.".to_string()
            } else {
                let rows: Vec<Vec<String>> = watchlist
                    .rows
                    .iter()
                    .map(|r| vec![r.ticker.clone(), r.price.clone()])
                    .collect();
                table(&["Ticker", "Price"], &rows)
            }
        }
        PanelView::Notes(notes) => {
            let ticker = notes.ticker.as_ref()?;
            if notes.notes.is_empty() {
                format!("No notes for {ticker}.")
            } else {
                let rows: Vec<Vec<String>> = notes
                    .notes
                    .iter()
                    .map(|n| {
                        vec![
                            n.index.to_string(),
                            n.timestamp.clone(),
                            n.title.clone(),
                            n.content.clone(),
                        ]
                    })
                    .collect();
                format!("{ticker}\n{}", table(&["#", "Saved", "Title", "Note"], &rows))
            }
        }
        PanelView::Portfolio(p) => {
            let transactions: Vec<Vec<String>> = p
                .transactions
                .iter()
                .map(|t| {
                    vec![
                        t.index.to_string(),
                        t.kind.clone(),
                        t.ticker.clone(),
                        t.shares.clone(),
                        t.price.clone(),
                        t.total.clone(),
                        t.date.clone(),
                    ]
                })
                .collect();
            let holdings: Vec<Vec<String>> = p
                .holdings
                .iter()
                .map(|h| {
                    vec![
                        h.ticker.clone(),
                        h.shares.clone(),
                        h.average_cost.clone(),
                        h.price.clone(),
                        h.market_value.clone(),
                        h.gain_loss.clone(),
                        h.gain_loss_pct.clone(),
                    ]
                })
                .collect();
            format!(
                "{}\n\n{}\n\n{}",
                table(
                    &["#", "Type", "Ticker", "Shares", "Price", "Total", "Date"],
                    &transactions
                ),
                table(
                    &["Ticker", "Shares", "Avg Cost", "Price", "Value", "Gain/Loss", "Gain/Loss %"],
                    &holdings
                ),
                key_values(&[
                    ("Total Value", &p.total_value),
                    ("Total Cost", &p.total_cost),
                    ("Priced", &p.coverage),
                ]),
            )
        }
    };
    Some(format!("{}\n{body}\n", heading(title)))
}

pub fn render_prices(prices: &[(String, f64)]) -> String {
    if prices.is_empty() {
        return "No prices cached yet.".to_string();
    }
    let rows: Vec<Vec<String>> = prices
        .iter()
        .map(|(ticker, price)| vec![ticker.clone(), format_money(*price)])
        .collect();
    table(&["Ticker", "Latest Price"], &rows)
}

pub fn render_comparison(comparison: &Comparison) -> String {
    let rows: Vec<Vec<String>> = tail(&comparison.rows)
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                format_percent(r.first * 100.0),
                format_percent(r.second * 100.0),
                format_percent(r.spread * 100.0),
            ]
        })
        .collect();
    let spread = format!("{} - {}", comparison.first_ticker, comparison.second_ticker);
    format!(
        "{}\n\n{}",
        table(
            &[
                "Date",
                comparison.first_ticker.as_str(),
                comparison.second_ticker.as_str(),
                spread.as_str(),
            ],
            &rows
        ),
        key_values(&[
            ("Aligned periods".to_string(), comparison.rows.len().to_string()),
            (
                format!("{} cumulative", comparison.first_ticker),
                format_percent(comparison.first_cumulative * 100.0),
            ),
            (
                format!("{} cumulative", comparison.second_ticker),
                format_percent(comparison.second_cumulative * 100.0),
            ),
        ]),
    )
}

pub fn render_performance(result: &PerformanceResult) -> String {
    key_values(&[
        ("Initial Value", &format_money(result.initial_value)),
        ("Final Value", &format_money(result.final_value)),
        ("Years", &format_number(result.years)),
        ("Gain", &format_money(result.gain)),
        ("Total Return", &format_percent_opt(result.total_return_pct)),
        ("Annualized Return", &format_percent_opt(result.annualized_return_pct)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_lookup_core::view::panel::{NotesView, WatchlistRow, WatchlistView};

    #[test]
    fn table_pads_columns_to_widest_cell() {
        let text = table(
            &["Ticker", "Price"],
            &[vec!["BRK.B".into(), "$412.10".into()], vec!["F".into(), "$12.00".into()]],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Ticker  Price");
        assert_eq!(lines[1], "------  -------");
        assert_eq!(lines[2], "BRK.B   $412.10");
        assert_eq!(lines[3], "F       $12.00");
    }

    #[test]
    fn empty_search_panels_render_nothing() {
        assert_eq!(render_panel(&PanelView::Outlook(None)), None);
        assert_eq!(render_panel(&PanelView::History(Vec::new())), None);
        assert_eq!(render_panel(&PanelView::Notes(NotesView::default())), None);
    }

    #[test]
    fn watchlist_panel_lists_prices() {
        let view = PanelView::Watchlist(WatchlistView {
            rows: vec![WatchlistRow {
                ticker: "AAPL".into(),
                price: "Loading...".into(),
            }],
        });
        let text = render_panel(&view).unwrap();
        assert!(text.starts_with("== Watchlist =="));
        assert!(text.contains("AAPL    Loading..."));
    }

    #[test]
    fn empty_watchlist_says_so() {
        let text = render_panel(&PanelView::Watchlist(WatchlistView::default())).unwrap();
        assert!(text.contains("Your watchlist is empty."));
    }
}
