use std::collections::BTreeSet;

use tracing::debug;

use crate::storage::store::{PersistentStore, StoreKey};

use super::notifications::Notification;
use super::panel::{build_view, PanelView};
use super::state::{AppState, Panel};

/// Receiver of rendered panels: the actual UI.
pub trait ViewSink: Send {
    /// Replace the content of one panel.
    fn render(&mut self, view: &PanelView);

    /// Called once every panel of a refresh pass has been rendered.
    /// Work that needs the panel on screen (chart setup) belongs here.
    fn rendered(&mut self, _panel: Panel) {}

    /// Show a transient notification.
    fn notify(&mut self, _notification: &Notification) {}
}

/// Sink that drops everything (headless use).
#[derive(Debug, Default)]
pub struct NullSink;

impl ViewSink for NullSink {
    fn render(&mut self, _view: &PanelView) {}
}

/// Panels whose content is derived from a stored document.
pub fn panels_for(key: StoreKey) -> &'static [Panel] {
    match key {
        StoreKey::Watchlist => &[Panel::Watchlist],
        StoreKey::Notes => &[Panel::Notes],
        StoreKey::Portfolio => &[Panel::Portfolio],
        StoreKey::LatestPrices => &[Panel::Watchlist, Panel::Portfolio],
    }
}

/// Keeps panels in step with the store.
///
/// Mutations never touch a panel directly: they write the store, and the
/// synchronizer re-renders exactly the panels bound to the written documents
/// (plus any panel the caller names explicitly, for session-state changes).
pub struct ViewSynchronizer {
    sink: Box<dyn ViewSink>,
}

impl ViewSynchronizer {
    pub fn new(sink: Box<dyn ViewSink>) -> Self {
        Self { sink }
    }

    /// Re-render the panels bound to every document written since the last pass.
    pub fn sync(&mut self, store: &mut PersistentStore, state: &AppState) -> BTreeSet<Panel> {
        self.refresh(std::iter::empty(), store, state)
    }

    /// Re-render `panels` together with the panels of pending store changes.
    /// Each panel renders once per pass, in [`Panel`] order.
    pub fn refresh(
        &mut self,
        panels: impl IntoIterator<Item = Panel>,
        store: &mut PersistentStore,
        state: &AppState,
    ) -> BTreeSet<Panel> {
        let mut dirty: BTreeSet<Panel> = panels.into_iter().collect();
        for key in store.take_changes() {
            dirty.extend(panels_for(key).iter().copied());
        }
        if dirty.is_empty() {
            return dirty;
        }

        debug!(panels = ?dirty, "rendering panels");
        for panel in &dirty {
            let view = build_view(*panel, store, state);
            self.sink.render(&view);
        }
        for panel in &dirty {
            self.sink.rendered(*panel);
        }
        dirty
    }

    pub fn notify(&mut self, notification: &Notification) {
        self.sink.notify(notification);
    }
}

impl std::fmt::Debug for ViewSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewSynchronizer").finish_non_exhaustive()
    }
}
