use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A transient message; disappears on its own once `expires_at` passes.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Queue of transient notifications with a fixed time-to-live.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            items: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Queue a message and return it. Expired entries are dropped first.
    /// An expiry past the representable range is clamped to the maximum.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &Notification {
        self.prune(now);
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            kind,
            message: message.into(),
            created_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        });
        &self.items[self.items.len() - 1]
    }

    /// Messages still visible at `now`, oldest first.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.is_active(now)).collect()
    }

    /// Drop expired messages; returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.is_active(now));
        before - self.items.len()
    }

    /// Dismiss one message early.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        before != self.items.len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Duration::seconds(crate::config::DEFAULT_NOTIFICATION_TTL_SECS))
    }
}
