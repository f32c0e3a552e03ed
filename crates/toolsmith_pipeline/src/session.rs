//! Per-session state persisted through an injected store.

use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;
use toolsmith_error::{CreditError, CreditErrorKind, StoreError};
use toolsmith_interface::KeyValueStore;
use tracing::{debug, instrument, warn};

const WELCOME_SEEN_KEY: &str = "welcome_seen";
const USAGE_KEY_PREFIX: &str = "daily_usage:";

fn usage_key(date: NaiveDate) -> String {
    format!("{}{}", USAGE_KEY_PREFIX, date.format("%Y-%m-%d"))
}

/// Source of the current calendar day.
pub trait DayClock: Send + Sync {
    /// Today's date.
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl DayClock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Settable date for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    date: Mutex<NaiveDate>,
}

impl FixedClock {
    /// Clock stuck at `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Moves the clock to `date`.
    pub fn set(&self, date: NaiveDate) {
        *self.date.lock() = date;
    }
}

impl DayClock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.date.lock()
    }
}

/// One generation slot taken from the daily quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSlot {
    /// Day the slot counts against
    pub day: NaiveDate,
    /// Count for that day including this slot
    pub used: u32,
}

#[derive(Debug, Clone, Copy)]
struct Counters {
    date: NaiveDate,
    used_today: u32,
    welcome_seen: bool,
}

impl Counters {
    fn roll_over(&mut self, today: NaiveDate) {
        if today > self.date {
            debug!(from = %self.date, to = %today, "Daily usage reset");
            self.date = today;
            self.used_today = 0;
        }
    }
}

/// Daily usage quota and UI flags for one session.
///
/// Loaded once with [`SessionState::init`] and written back on every change.
/// Quota slots are taken with [`SessionState::reserve_use`] before a
/// generation runs and handed back with [`SessionState::release_use`] if it
/// fails.
pub struct SessionState {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn DayClock>,
    daily_limit: Option<u32>,
    counters: Mutex<Counters>,
    write_lock: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("daily_limit", &self.daily_limit)
            .field("counters", &*self.counters.lock())
            .finish_non_exhaustive()
    }
}

impl SessionState {
    /// Loads today's state from the store and drops counters of past days.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or pruned.
    #[instrument(skip(store, clock))]
    pub async fn init(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn DayClock>,
        daily_limit: Option<u32>,
    ) -> Result<Self, StoreError> {
        let today = clock.today();
        let current = usage_key(today);
        let used_today = store
            .get(&current)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let stale: Vec<String> = store
            .keys(USAGE_KEY_PREFIX)
            .await?
            .into_iter()
            .filter(|k| *k != current)
            .collect();
        if !stale.is_empty() {
            let pruned = store.remove(&stale).await?;
            debug!(pruned, "Pruned past daily usage");
        }

        let welcome_seen = store.get(WELCOME_SEEN_KEY).await?.as_deref() == Some("true");
        debug!(%today, used_today, welcome_seen, "Session state loaded");
        Ok(Self {
            store,
            clock,
            daily_limit,
            counters: Mutex::new(Counters {
                date: today,
                used_today,
                welcome_seen,
            }),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Generations used on the current day.
    pub fn used_today(&self) -> u32 {
        let mut counters = self.counters.lock();
        counters.roll_over(self.clock.today());
        counters.used_today
    }

    /// Configured daily limit.
    pub fn daily_limit(&self) -> Option<u32> {
        self.daily_limit
    }

    /// Whether the welcome message was dismissed.
    pub fn welcome_seen(&self) -> bool {
        self.counters.lock().welcome_seen
    }

    /// Persists the welcome flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn mark_welcome_seen(&self) -> Result<(), StoreError> {
        self.store.set(WELCOME_SEEN_KEY, "true").await?;
        self.counters.lock().welcome_seen = true;
        Ok(())
    }

    /// Takes one generation slot for today.
    ///
    /// The limit check and the increment happen under one lock, so
    /// concurrent callers can never exceed the limit together.
    ///
    /// # Errors
    ///
    /// Returns [`CreditErrorKind::DailyLimitReached`] once the limit is used up.
    pub async fn reserve_use(&self) -> Result<QuotaSlot, CreditError> {
        let slot = {
            let mut counters = self.counters.lock();
            counters.roll_over(self.clock.today());
            if let Some(limit) = self.daily_limit {
                if counters.used_today >= limit {
                    return Err(CreditError::new(CreditErrorKind::DailyLimitReached(limit)));
                }
            }
            counters.used_today += 1;
            QuotaSlot {
                day: counters.date,
                used: counters.used_today,
            }
        };
        self.persist().await;
        Ok(slot)
    }

    /// Returns a slot taken by [`SessionState::reserve_use`].
    ///
    /// A slot taken before midnight is not returned to the new day.
    pub async fn release_use(&self, slot: QuotaSlot) {
        {
            let mut counters = self.counters.lock();
            counters.roll_over(self.clock.today());
            if counters.date != slot.day {
                return;
            }
            counters.used_today = counters.used_today.saturating_sub(1);
        }
        self.persist().await;
    }

    /// Date slots are currently counted against.
    pub fn current_day(&self) -> NaiveDate {
        let mut counters = self.counters.lock();
        counters.roll_over(self.clock.today());
        counters.date
    }

    async fn persist(&self) {
        let _guard = self.write_lock.lock().await;
        let (date, used) = {
            let counters = self.counters.lock();
            (counters.date, counters.used_today)
        };
        if let Err(e) = self.store.set(&usage_key(date), &used.to_string()).await {
            warn!(%date, used, error = %e, "Failed to persist daily usage");
        }
    }
}

/// Identity of a submitter plus its optional quota state.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    account: String,
    state: Option<Arc<SessionState>>,
}

impl Session {
    /// Session without quota tracking.
    pub fn new(id: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account: account.into(),
            state: None,
        }
    }

    /// Attaches quota state.
    pub fn with_state(mut self, state: Arc<SessionState>) -> Self {
        self.state = Some(state);
        self
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Account charged for generations.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Quota state, if tracked.
    pub fn state(&self) -> Option<&Arc<SessionState>> {
        self.state.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_quota_persists_across_loads() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(day(1)));
        let state = SessionState::init(store.clone(), clock.clone(), Some(2))
            .await
            .unwrap();
        assert_eq!(state.reserve_use().await.unwrap().used, 1);
        assert_eq!(state.reserve_use().await.unwrap().used, 2);
        let err = state.reserve_use().await.unwrap_err();
        assert_eq!(err.kind(), &CreditErrorKind::DailyLimitReached(2));
        assert_eq!(state.used_today(), 2);

        let reloaded = SessionState::init(store, clock, Some(2)).await.unwrap();
        assert_eq!(reloaded.used_today(), 2);
        assert!(reloaded.reserve_use().await.is_err());
    }

    #[tokio::test]
    async fn test_release_returns_slot() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let state = SessionState::init(store.clone(), Arc::new(FixedClock::new(day(1))), Some(1))
            .await
            .unwrap();
        let slot = state.reserve_use().await.unwrap();
        state.release_use(slot).await;
        assert_eq!(state.used_today(), 0);
        assert_eq!(store.get("daily_usage:2026-03-01").await.unwrap().as_deref(), Some("0"));
        assert!(state.reserve_use().await.is_ok());
    }

    #[tokio::test]
    async fn test_long_lived_session_rolls_over_at_midnight() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(day(1)));
        let state = SessionState::init(store.clone(), clock.clone(), Some(1))
            .await
            .unwrap();
        let yesterday = state.reserve_use().await.unwrap();
        assert!(state.reserve_use().await.is_err());

        clock.set(day(2));
        assert_eq!(state.used_today(), 0);
        assert_eq!(state.current_day(), day(2));
        assert_eq!(state.reserve_use().await.unwrap().used, 1);

        // a slot from yesterday does not free one today
        state.release_use(yesterday).await;
        assert_eq!(state.used_today(), 1);
    }

    #[tokio::test]
    async fn test_init_prunes_past_days() {
        let store = Arc::new(InMemoryStore::new());
        store.set("daily_usage:2026-02-27", "4").await.unwrap();
        store.set("daily_usage:2026-02-28", "9").await.unwrap();
        store.set("daily_usage:2026-03-01", "1").await.unwrap();

        let state = SessionState::init(store.clone(), Arc::new(FixedClock::new(day(1))), None)
            .await
            .unwrap();
        assert_eq!(state.used_today(), 1);
        let mut keys = store.keys("daily_usage:").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["daily_usage:2026-03-01".to_string()]);
    }

    #[tokio::test]
    async fn test_welcome_flag() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(day(1)));
        let state = SessionState::init(store.clone(), clock.clone(), None)
            .await
            .unwrap();
        assert!(!state.welcome_seen());
        state.mark_welcome_seen().await.unwrap();
        let reloaded = SessionState::init(store, clock, None).await.unwrap();
        assert!(reloaded.welcome_seen());
        assert!(reloaded.reserve_use().await.is_ok());
    }
}
