// ═══════════════════════════════════════════════════════════════════
// View Tests: formatting, notifications, panel views, synchronizer
// ═══════════════════════════════════════════════════════════════════

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use stock_lookup_core::models::transaction::TransactionDraft;
use stock_lookup_core::services::notes_service::NotesService;
use stock_lookup_core::services::portfolio_service::PortfolioService;
use stock_lookup_core::services::price_cache_service::PriceCacheService;
use stock_lookup_core::services::watchlist_service::WatchlistService;
use stock_lookup_core::storage::backend::MemoryBackend;
use stock_lookup_core::storage::store::{PersistentStore, StoreKey};
use stock_lookup_core::view::format::{
    format_money, format_money_opt, format_number, format_percent, format_shares,
    format_volume_opt,
};
use stock_lookup_core::view::notifications::{NotificationKind, Notifier};
use stock_lookup_core::view::panel::{build_notes_view, build_view, PanelView};
use stock_lookup_core::view::state::{AppState, Panel};
use stock_lookup_core::view::sync::{panels_for, ViewSink, ViewSynchronizer};

fn store() -> PersistentStore {
    PersistentStore::new(Box::new(MemoryBackend::new()), "test")
}

/// Records every callback so tests can assert on render order.
#[derive(Clone, Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<String>>>,
    views: Arc<Mutex<Vec<PanelView>>>,
}

impl RecordingSink {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn rendered_panels(&self) -> Vec<Panel> {
        self.views.lock().unwrap().iter().map(|v| v.panel()).collect()
    }

    fn last_view(&self, panel: Panel) -> Option<PanelView> {
        self.views
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|v| v.panel() == panel)
            .cloned()
    }

    fn reset(&self) {
        self.events.lock().unwrap().clear();
        self.views.lock().unwrap().clear();
    }
}

impl ViewSink for RecordingSink {
    fn render(&mut self, view: &PanelView) {
        self.events.lock().unwrap().push(format!("render {:?}", view.panel()));
        self.views.lock().unwrap().push(view.clone());
    }

    fn rendered(&mut self, panel: Panel) {
        self.events.lock().unwrap().push(format!("rendered {panel:?}"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Formatting
// ═══════════════════════════════════════════════════════════════════

mod format {
    use super::*;

    #[test]
    fn money() {
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(-987654.321), "-$987,654.32");
        assert_eq!(format_money(-0.001), "$0.00");
        assert_eq!(format_money(f64::NAN), "N/A");
        assert_eq!(format_money_opt(None), "N/A");
    }

    #[test]
    fn formatting_is_reproducible() {
        let stored = 10.0 * 7.0 / 3.0;
        assert_eq!(format_money(stored), format_money(stored));
        assert_eq!(format_money(stored), "$23.33");
    }

    #[test]
    fn numbers_and_percents() {
        assert_eq!(format_number(138.0), "138.00");
        assert_eq!(format_percent(-1.8149), "-1.81%");
        assert_eq!(format_percent(f64::INFINITY), "N/A");
    }

    #[test]
    fn shares() {
        assert_eq!(format_shares(15.0), "15");
        assert_eq!(format_shares(2.5), "2.5");
        assert_eq!(format_shares(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn volume() {
        assert_eq!(format_volume_opt(Some(25_000_000.0)), "25,000,000");
        assert_eq!(format_volume_opt(Some(999.0)), "999");
        assert_eq!(format_volume_opt(None), "N/A");
    }

    #[test]
    fn negative_values_keep_sign_before_groups() {
        assert_eq!(format_volume_opt(Some(-123.0)), "-123");
        assert_eq!(format_volume_opt(Some(-123_456.0)), "-123,456");
        assert_eq!(format_volume_opt(Some(-1_234_567.0)), "-1,234,567");
        assert_eq!(format_money(-123.0), "-$123.00");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Notifications
// ═══════════════════════════════════════════════════════════════════

mod notifications {
    use super::*;

    #[test]
    fn expire_after_ttl() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut n = Notifier::new(Duration::seconds(3));
        n.push(NotificationKind::Success, "AAPL added to watchlist", t0);

        assert_eq!(n.active(t0 + Duration::seconds(2)).len(), 1);
        assert!(n.active(t0 + Duration::seconds(3)).is_empty());
        assert_eq!(n.prune(t0 + Duration::seconds(3)), 1);
    }

    #[test]
    fn push_prunes_expired_and_assigns_ids() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut n = Notifier::new(Duration::seconds(3));
        let first = n.push(NotificationKind::Info, "one", t0).id;
        let second = n.push(NotificationKind::Error, "two", t0 + Duration::seconds(5)).id;
        assert_ne!(first, second);

        let active = n.active(t0 + Duration::seconds(5));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "two");
    }

    #[test]
    fn dismiss_early() {
        let t0 = Utc::now();
        let mut n = Notifier::default();
        assert_eq!(n.ttl(), Duration::seconds(3));
        let id = n.push(NotificationKind::Info, "bye", t0).id;
        assert!(n.dismiss(id));
        assert!(!n.dismiss(id));
        assert!(n.active(t0).is_empty());
    }

    #[test]
    fn huge_ttl_saturates_expiry() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut n = Notifier::new(Duration::MAX);
        let expires_at = n.push(NotificationKind::Info, "forever", t0).expires_at;
        assert_eq!(expires_at, DateTime::<Utc>::MAX_UTC);
        assert_eq!(n.active(t0 + Duration::days(365)).len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Panel views
// ═══════════════════════════════════════════════════════════════════

mod panel_views {
    use super::*;

    #[test]
    fn watchlist_shows_cached_or_pending_price() {
        let mut s = store();
        WatchlistService::new().add(&mut s, "AAPL").unwrap();
        WatchlistService::new().add(&mut s, "MSFT").unwrap();
        PriceCacheService::new().set(&mut s, "MSFT", 410.0).unwrap();

        let PanelView::Watchlist(view) = build_view(Panel::Watchlist, &s, &AppState::default()) else {
            panic!("wrong panel");
        };
        assert_eq!(view.rows[0].ticker, "AAPL");
        assert_eq!(view.rows[0].price, "Loading...");
        assert_eq!(view.rows[1].price, "$410.00");
    }

    #[test]
    fn portfolio_shows_na_for_unpriced_holdings() {
        let mut s = store();
        PortfolioService::new()
            .add_transaction(&mut s, TransactionDraft::buy("Y", 10.0, 2.0))
            .unwrap();
        PortfolioService::new()
            .add_transaction(&mut s, TransactionDraft::buy("Z", 4.0, 15.0).on("2024-01-02"))
            .unwrap();
        PriceCacheService::new().set(&mut s, "Z", 20.0).unwrap();

        let PanelView::Portfolio(view) = build_view(Panel::Portfolio, &s, &AppState::default()) else {
            panic!("wrong panel");
        };
        assert_eq!(view.transactions.len(), 2);
        assert_eq!(view.transactions[0].date, "-");
        assert_eq!(view.transactions[1].total, "$60.00");
        assert_eq!(view.holdings[0].ticker, "Y");
        assert_eq!(view.holdings[0].price, "N/A");
        assert_eq!(view.holdings[0].market_value, "N/A");
        assert_eq!(view.holdings[1].market_value, "$80.00");
        assert_eq!(view.total_value, "$80.00");
        assert_eq!(view.total_cost, "$80.00");
        assert_eq!(view.coverage, "1 of 2 holdings priced");
    }

    #[test]
    fn notes_follow_active_ticker() {
        let mut s = store();
        NotesService::new().add(&mut s, "X", "T", "body", Utc::now()).unwrap();

        let PanelView::Notes(none) = build_view(Panel::Notes, &s, &AppState::default()) else {
            panic!("wrong panel");
        };
        assert_eq!(none.ticker, None);

        let state = AppState {
            active_ticker: Some("X".into()),
            ..AppState::default()
        };
        let PanelView::Notes(view) = build_view(Panel::Notes, &s, &state) else {
            panic!("wrong panel");
        };
        assert_eq!(view.ticker.as_deref(), Some("X"));
        assert_eq!(view.notes.len(), 1);
        assert_eq!(view.notes[0].content, "body");
    }

    #[test]
    fn notes_view_for_any_ticker() {
        let mut s = store();
        NotesService::new().add(&mut s, "X", "T", "body", Utc::now()).unwrap();

        let view = build_notes_view(&s, " x ");
        assert_eq!(view.ticker.as_deref(), Some("X"));
        assert_eq!(view.notes.len(), 1);
        assert_eq!(view.notes[0].index, 0);
        assert_eq!(view.notes[0].title, "T");

        let state = AppState {
            active_ticker: Some("X".into()),
            ..AppState::default()
        };
        assert_eq!(build_view(Panel::Notes, &s, &state), PanelView::Notes(view));
    }

    #[test]
    fn search_panels_are_empty_without_result() {
        let s = store();
        let state = AppState::default();
        assert_eq!(build_view(Panel::Outlook, &s, &state), PanelView::Outlook(None));
        assert_eq!(build_view(Panel::Summary, &s, &state), PanelView::Summary(None));
        assert_eq!(build_view(Panel::Charts, &s, &state), PanelView::Charts(None));
        assert_eq!(build_view(Panel::History, &s, &state), PanelView::History(Vec::new()));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Synchronizer
// ═══════════════════════════════════════════════════════════════════

mod synchronizer {
    use super::*;

    #[test]
    fn key_to_panel_bindings() {
        assert_eq!(panels_for(StoreKey::Watchlist), &[Panel::Watchlist]);
        assert_eq!(panels_for(StoreKey::Notes), &[Panel::Notes]);
        assert_eq!(panels_for(StoreKey::Portfolio), &[Panel::Portfolio]);
        assert_eq!(
            panels_for(StoreKey::LatestPrices),
            &[Panel::Watchlist, Panel::Portfolio]
        );
    }

    #[test]
    fn renders_only_changed_panels() {
        let sink = RecordingSink::default();
        let mut sync = ViewSynchronizer::new(Box::new(sink.clone()));
        let mut s = store();
        let state = AppState::default();

        WatchlistService::new().add(&mut s, "AAPL").unwrap();
        let rendered = sync.sync(&mut s, &state);

        assert_eq!(rendered.into_iter().collect::<Vec<_>>(), vec![Panel::Watchlist]);
        assert_eq!(sink.rendered_panels(), vec![Panel::Watchlist]);
    }

    #[test]
    fn nothing_changed_renders_nothing() {
        let sink = RecordingSink::default();
        let mut sync = ViewSynchronizer::new(Box::new(sink.clone()));
        let mut s = store();
        assert!(sync.sync(&mut s, &AppState::default()).is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn price_change_refreshes_watchlist_and_portfolio() {
        let sink = RecordingSink::default();
        let mut sync = ViewSynchronizer::new(Box::new(sink.clone()));
        let mut s = store();
        PriceCacheService::new().set(&mut s, "AAPL", 1.0).unwrap();
        sync.sync(&mut s, &AppState::default());
        assert_eq!(sink.rendered_panels(), vec![Panel::Watchlist, Panel::Portfolio]);
    }

    #[test]
    fn each_panel_renders_once_then_completion_callbacks() {
        let sink = RecordingSink::default();
        let mut sync = ViewSynchronizer::new(Box::new(sink.clone()));
        let mut s = store();
        WatchlistService::new().add(&mut s, "AAPL").unwrap();
        PriceCacheService::new().set(&mut s, "AAPL", 1.0).unwrap();

        sync.refresh([Panel::Watchlist, Panel::Outlook], &mut s, &AppState::default());
        assert_eq!(
            sink.events(),
            vec![
                "render Outlook",
                "render Watchlist",
                "render Portfolio",
                "rendered Outlook",
                "rendered Watchlist",
                "rendered Portfolio",
            ]
        );
    }

    #[test]
    fn rendered_view_reflects_store_after_write() {
        let sink = RecordingSink::default();
        let mut sync = ViewSynchronizer::new(Box::new(sink.clone()));
        let mut s = store();

        WatchlistService::new().add(&mut s, "AAPL").unwrap();
        sync.sync(&mut s, &AppState::default());
        sink.reset();

        PriceCacheService::new().set(&mut s, "AAPL", 189.5).unwrap();
        sync.sync(&mut s, &AppState::default());

        let Some(PanelView::Watchlist(view)) = sink.last_view(Panel::Watchlist) else {
            panic!("watchlist not rendered");
        };
        assert_eq!(view.rows[0].price, "$189.50");
    }
}
