//! Calendar state store
//!
//! Holds the month being viewed, the last fetched month data, the event list
//! and the loading/error flags, and runs every backend call through the
//! [`CalendarApiPort`].
//!
//! Calendar fetches are tagged with the month they were issued for and a
//! sequence number. A response is applied only if that month is still the
//! current one and no newer fetch was issued after it, so a slow response for
//! a month the user already navigated away from never overwrites newer data.
//! The loading flag counts in-flight fetches and is released by a drop guard
//! on every exit path.

use std::{fmt, sync::Arc};

use domain::{Clock, DateNavigator, Event, EventId, EventPayload, Holiday, MonthData, MonthKey};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::CalendarApiPort,
    services::grid_builder::{CalendarGrid, GridBuilder},
};

/// Point-in-time copy of the store's state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarViewState {
    pub current: MonthKey,
    pub month_data: Option<MonthData>,
    pub events: Vec<Event>,
    pub loading: bool,
    pub error: Option<String>,
}

/// What happened to a calendar fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The month data was stored
    Loaded,
    /// The fetch failed and the error message was stored
    Failed,
    /// The store moved to another month or a newer fetch was issued
    /// meanwhile; the result was dropped
    Superseded,
}

#[derive(Debug)]
struct StoreState {
    current: MonthKey,
    month_data: Option<MonthData>,
    events: Vec<Event>,
    error: Option<String>,
    in_flight: usize,
    latest_ticket: u64,
}

/// Decrements the in-flight count when dropped
struct LoadingGuard<'a> {
    state: &'a RwLock<StoreState>,
}

impl<'a> LoadingGuard<'a> {
    fn begin(state: &'a RwLock<StoreState>) -> (Self, u64) {
        let ticket = {
            let mut s = state.write();
            s.in_flight += 1;
            s.latest_ticket += 1;
            s.error = None;
            s.latest_ticket
        };
        (Self { state }, ticket)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut s = self.state.write();
        s.in_flight = s.in_flight.saturating_sub(1);
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn failure(self, reason: String) -> ApplicationError {
        match self {
            Self::Create => ApplicationError::EventCreateFailed(reason),
            Self::Update => ApplicationError::EventUpdateFailed(reason),
            Self::Delete => ApplicationError::EventDeleteFailed(reason),
        }
    }

    /// Keep port errors that already name the mutation, wrap everything else
    fn normalize(self, err: ApplicationError) -> ApplicationError {
        if err.is_mutation_failure() {
            err
        } else {
            self.failure(err.to_string())
        }
    }
}

/// Calendar state store
pub struct CalendarStore {
    api: Arc<dyn CalendarApiPort>,
    navigator: DateNavigator,
    grid_builder: GridBuilder,
    state: RwLock<StoreState>,
}

impl fmt::Debug for CalendarStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarStore")
            .field("navigator", &self.navigator)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl CalendarStore {
    pub fn builder() -> CalendarStoreBuilder {
        CalendarStoreBuilder::default()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> CalendarViewState {
        let s = self.state.read();
        CalendarViewState {
            current: s.current,
            month_data: s.month_data.clone(),
            events: s.events.clone(),
            loading: s.in_flight > 0,
            error: s.error.clone(),
        }
    }

    pub fn current(&self) -> MonthKey {
        self.state.read().current
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Lay out the loaded month, or an empty grid for the current month if
    /// nothing was loaded yet
    pub fn grid(&self) -> CalendarGrid {
        let s = self.state.read();
        s.month_data.as_ref().map_or_else(
            || self.grid_builder.empty(s.current),
            |data| self.grid_builder.build(data),
        )
    }

    /// Point the store at another month without fetching it
    ///
    /// # Errors
    ///
    /// Returns an error if the month or year is out of range.
    pub fn set_current_date(&self, year: i32, month: u32) -> Result<MonthKey, ApplicationError> {
        let key = MonthKey::new(year, month)?;
        self.state.write().current = key;
        Ok(key)
    }

    pub fn next_month(&self) -> MonthKey {
        let mut s = self.state.write();
        s.current = DateNavigator::next_month(s.current);
        s.current
    }

    pub fn previous_month(&self) -> MonthKey {
        let mut s = self.state.write();
        s.current = DateNavigator::previous_month(s.current);
        s.current
    }

    pub fn go_to_today(&self) -> MonthKey {
        let today = self.navigator.today();
        self.state.write().current = today;
        today
    }

    /// Fetch one month and store it
    ///
    /// A fetch failure is not returned; its message is stored as the error
    /// and the previously loaded data is kept. The result is only applied if
    /// the requested month is the current month when the response arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the month or year is out of range.
    pub async fn fetch_calendar(
        &self,
        year: i32,
        month: u32,
    ) -> Result<FetchOutcome, ApplicationError> {
        let key = MonthKey::new(year, month)?;
        Ok(self.fetch_month(key).await)
    }

    #[instrument(skip(self), fields(month = %key))]
    async fn fetch_month(&self, key: MonthKey) -> FetchOutcome {
        let (_loading, ticket) = LoadingGuard::begin(&self.state);

        let result = self.api.get_calendar(key).await;

        let mut s = self.state.write();
        if s.current != key || s.latest_ticket != ticket {
            debug!(
                current = %s.current,
                ticket,
                latest = s.latest_ticket,
                "Discarding superseded calendar response"
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(data) => {
                debug!(days = data.days.len(), "Calendar month loaded");
                s.month_data = Some(data);
                s.error = None;
                FetchOutcome::Loaded
            },
            Err(e) => {
                warn!(error = %e, "Calendar fetch failed");
                s.error = Some(e.to_string());
                FetchOutcome::Failed
            },
        }
    }

    /// Refresh the event list; a failure is only logged
    #[instrument(skip(self))]
    pub async fn fetch_events(&self) {
        match self.api.get_events().await {
            Ok(events) => {
                debug!(count = events.len(), "Events loaded");
                self.state.write().events = events;
            },
            Err(e) => warn!(error = %e, "Failed to fetch events"),
        }
    }

    /// Fetch the current month, then the event list
    pub async fn refresh(&self) -> FetchOutcome {
        let outcome = self.fetch_month(self.current()).await;
        self.fetch_events().await;
        outcome
    }

    /// Public holidays of `year`; not kept in the store
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::FetchFailed`] if the backend call fails.
    #[instrument(skip(self))]
    pub async fn fetch_holidays(&self, year: i32) -> Result<Vec<Holiday>, ApplicationError> {
        self.api.get_holidays(year).await
    }

    /// Create an event, then refetch the events and the current month
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EventCreateFailed`] if the payload is
    /// invalid or the backend rejects it. Nothing is refetched in that case.
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create_event(&self, payload: &EventPayload) -> Result<Event, ApplicationError> {
        payload
            .ensure_valid()
            .map_err(|e| Mutation::Create.failure(e.to_string()))?;

        let event = self
            .api
            .create_event(payload)
            .await
            .map_err(|e| Mutation::Create.normalize(e))?;
        info!(id = %event.id, "Event created");

        self.refetch_after_mutation().await;
        Ok(event)
    }

    /// Update an event, then refetch the events and the current month
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EventUpdateFailed`] if the payload is
    /// invalid or the backend rejects it. Nothing is refetched in that case.
    #[instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn update_event(
        &self,
        id: EventId,
        payload: &EventPayload,
    ) -> Result<Event, ApplicationError> {
        payload
            .ensure_valid()
            .map_err(|e| Mutation::Update.failure(e.to_string()))?;

        let event = self
            .api
            .update_event(id, payload)
            .await
            .map_err(|e| Mutation::Update.normalize(e))?;
        info!(%id, "Event updated");

        self.refetch_after_mutation().await;
        Ok(event)
    }

    /// Delete an event, then refetch the events and the current month
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EventDeleteFailed`] if the backend call
    /// fails. Nothing is refetched in that case.
    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: EventId) -> Result<(), ApplicationError> {
        self.api
            .delete_event(id)
            .await
            .map_err(|e| Mutation::Delete.normalize(e))?;
        info!(%id, "Event deleted");

        self.refetch_after_mutation().await;
        Ok(())
    }

    async fn refetch_after_mutation(&self) {
        self.fetch_events().await;
        let current = self.current();
        self.fetch_month(current).await;
    }
}

/// Builder for [`CalendarStore`]
#[derive(Default)]
pub struct CalendarStoreBuilder {
    api: Option<Arc<dyn CalendarApiPort>>,
    clock: Option<Arc<dyn Clock>>,
    initial: Option<MonthKey>,
}

impl fmt::Debug for CalendarStoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarStoreBuilder")
            .field("has_api", &self.api.is_some())
            .field("clock", &self.clock)
            .field("initial", &self.initial)
            .finish()
    }
}

impl CalendarStoreBuilder {
    #[must_use]
    pub fn api(mut self, api: Arc<dyn CalendarApiPort>) -> Self {
        self.api = Some(api);
        self
    }

    /// Clock for today-detection and [`CalendarStore::go_to_today`]
    /// (default: the local wall clock)
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Month to start on (default: the clock's current month)
    #[must_use]
    pub const fn initial_month(mut self, key: MonthKey) -> Self {
        self.initial = Some(key);
        self
    }

    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] if no API port was set.
    pub fn build(self) -> Result<CalendarStore, ApplicationError> {
        let api = self.api.ok_or_else(|| {
            ApplicationError::Configuration("calendar store requires an API port".into())
        })?;

        let navigator = self
            .clock
            .map_or_else(DateNavigator::system, DateNavigator::new);
        let current = self.initial.unwrap_or_else(|| navigator.today());

        Ok(CalendarStore {
            api,
            grid_builder: GridBuilder::new(navigator.clone()),
            navigator,
            state: RwLock::new(StoreState {
                current,
                month_data: None,
                events: Vec::new(),
                error: None,
                in_flight: 0,
                latest_ticket: 0,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use domain::FixedClock;
    use tokio::sync::oneshot;

    use super::*;
    use crate::ports::MockCalendarApiPort;

    fn key(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn clock_on(y: i32, m: u32, d: u32) -> Arc<FixedClock> {
        Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
    }

    fn sample_event(id: i64) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 3, 20, 10, 0, 0).unwrap();
        Event {
            id: EventId::new(id),
            title: "Hanami".to_string(),
            description: String::new(),
            start_date: start,
            end_date: start + chrono::Duration::hours(2),
            all_day: false,
            created_at: start,
            updated_at: start,
        }
    }

    fn sample_payload() -> EventPayload {
        sample_event(0).to_payload()
    }

    fn store_with(mock: MockCalendarApiPort) -> CalendarStore {
        CalendarStore::builder()
            .api(Arc::new(mock))
            .clock(clock_on(2024, 3, 15))
            .build()
            .unwrap()
    }

    // ============================================================================
    // Construction and navigation
    // ============================================================================

    #[test]
    fn build_without_api_is_configuration_error() {
        let result = CalendarStore::builder().clock(clock_on(2024, 3, 15)).build();
        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
    }

    #[test]
    fn starts_on_clock_month_and_idle() {
        let store = store_with(MockCalendarApiPort::new());
        let state = store.snapshot();

        assert_eq!(state.current, key(2024, 3));
        assert!(state.month_data.is_none());
        assert!(state.events.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn initial_month_overrides_clock() {
        let store = CalendarStore::builder()
            .api(Arc::new(MockCalendarApiPort::new()))
            .clock(clock_on(2024, 3, 15))
            .initial_month(key(1999, 12))
            .build()
            .unwrap();

        assert_eq!(store.current(), key(1999, 12));
    }

    #[test]
    fn navigation_wraps_years() {
        let store = store_with(MockCalendarApiPort::new());
        store.set_current_date(2024, 12).unwrap();

        assert_eq!(store.next_month(), key(2025, 1));
        assert_eq!(store.previous_month(), key(2024, 12));

        store.set_current_date(2024, 1).unwrap();
        assert_eq!(store.previous_month(), key(2023, 12));
    }

    #[test]
    fn go_to_today_uses_clock() {
        let clock = clock_on(2024, 3, 15);
        let store = CalendarStore::builder()
            .api(Arc::new(MockCalendarApiPort::new()))
            .clock(clock.clone())
            .initial_month(key(2020, 6))
            .build()
            .unwrap();

        clock.set(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(store.go_to_today(), key(2025, 7));
        assert_eq!(store.current(), key(2025, 7));
    }

    #[test]
    fn set_current_date_rejects_bad_month() {
        let store = store_with(MockCalendarApiPort::new());

        let result = store.set_current_date(2024, 13);
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
        assert_eq!(store.current(), key(2024, 3));
    }

    #[test]
    fn grid_before_loading_is_empty_with_title() {
        let store = store_with(MockCalendarApiPort::new());
        let grid = store.grid();

        assert!(grid.is_empty());
        assert_eq!(grid.title, "2024年 3月");
    }

    // ============================================================================
    // Fetching
    // ============================================================================

    #[tokio::test]
    async fn fetch_calendar_success_stores_data() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_get_calendar()
            .withf(|k| *k == MonthKey::new(2024, 3).unwrap())
            .times(1)
            .returning(|k| Ok(MonthData::blank(k)));

        let store = store_with(mock);
        let outcome = store.fetch_calendar(2024, 3).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Loaded);
        let state = store.snapshot();
        assert_eq!(state.month_data.map(|d| d.days.len()), Some(31));
        assert!(!state.loading);
        assert!(state.error.is_none());

        let grid = store.grid();
        assert_eq!(grid.leading_blanks(), 5);
        assert_eq!(grid.today().map(|d| d.cell.day_of_month), Some(15));
    }

    #[tokio::test]
    async fn fetch_failure_keeps_prior_data_and_sets_error() {
        let mut mock = MockCalendarApiPort::new();
        let mut calls = 0;
        mock.expect_get_calendar().times(2).returning(move |k| {
            calls += 1;
            if calls == 1 {
                Ok(MonthData::blank(k))
            } else {
                Err(ApplicationError::fetch_failed("calendar", "HTTP 500"))
            }
        });

        let store = store_with(mock);
        store.fetch_calendar(2024, 3).await.unwrap();
        store.next_month();
        let outcome = store.fetch_calendar(2024, 4).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Failed);
        let state = store.snapshot();
        assert_eq!(state.month_data.map(|d| d.month), Some(3));
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to fetch calendar: HTTP 500")
        );
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let mut mock = MockCalendarApiPort::new();
        let mut calls = 0;
        mock.expect_get_calendar().times(2).returning(move |k| {
            calls += 1;
            if calls == 1 {
                Err(ApplicationError::fetch_failed("calendar", "HTTP 502"))
            } else {
                Ok(MonthData::blank(k))
            }
        });

        let store = store_with(mock);
        store.fetch_calendar(2024, 3).await.unwrap();
        assert!(store.error().is_some());

        store.fetch_calendar(2024, 3).await.unwrap();
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn fetch_calendar_rejects_bad_month_without_calling_api() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_get_calendar().times(0);

        let store = store_with(mock);
        let result = store.fetch_calendar(2024, 0).await;

        assert!(matches!(result, Err(ApplicationError::Domain(_))));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn fetch_events_failure_is_only_logged() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_get_events()
            .times(1)
            .returning(|| Err(ApplicationError::fetch_failed("events", "HTTP 500")));

        let store = store_with(mock);
        store.fetch_events().await;

        let state = store.snapshot();
        assert!(state.events.is_empty());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn refresh_fetches_current_month_then_events() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_get_calendar()
            .withf(|k| *k == MonthKey::new(2024, 4).unwrap())
            .times(1)
            .returning(|k| Ok(MonthData::blank(k)));
        mock.expect_get_events()
            .times(1)
            .returning(|| Ok(vec![sample_event(1)]));

        let store = store_with(mock);
        store.next_month();
        let outcome = store.refresh().await;

        assert_eq!(outcome, FetchOutcome::Loaded);
        let state = store.snapshot();
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.month_data.map(|d| d.month), Some(4));
    }

    #[tokio::test]
    async fn fetch_holidays_passes_through() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_get_holidays()
            .withf(|y| *y == 2024)
            .returning(|_| {
                Ok(vec![Holiday::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    "元日",
                )])
            });

        let store = store_with(mock);
        let holidays = store.fetch_holidays(2024).await.unwrap();

        assert_eq!(holidays.len(), 1);
        assert_eq!(holidays[0].name, "元日");
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    #[tokio::test]
    async fn create_event_refetches_events_and_current_month_once() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_create_event()
            .times(1)
            .returning(|_| Ok(sample_event(42)));
        mock.expect_get_events()
            .times(1)
            .returning(|| Ok(vec![sample_event(42)]));
        mock.expect_get_calendar()
            .withf(|k| *k == MonthKey::new(2024, 3).unwrap())
            .times(1)
            .returning(|k| Ok(MonthData::blank(k)));

        let store = store_with(mock);
        let event = store.create_event(&sample_payload()).await.unwrap();

        assert_eq!(event.id, EventId::new(42));
        let state = store.snapshot();
        assert_eq!(state.events.len(), 1);
        assert!(state.month_data.is_some());
    }

    #[tokio::test]
    async fn create_event_failure_does_not_refetch() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_create_event()
            .times(1)
            .returning(|_| Err(ApplicationError::EventCreateFailed("HTTP 400".into())));
        mock.expect_get_events().times(0);
        mock.expect_get_calendar().times(0);

        let store = store_with(mock);
        let result = store.create_event(&sample_payload()).await;

        assert!(matches!(result, Err(ApplicationError::EventCreateFailed(_))));
    }

    #[tokio::test]
    async fn invalid_payload_never_reaches_backend() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_create_event().times(0);
        mock.expect_update_event().times(0);
        mock.expect_get_events().times(0);
        mock.expect_get_calendar().times(0);

        let store = store_with(mock);
        let mut payload = sample_payload();
        payload.end_date = payload.start_date - chrono::Duration::hours(1);

        let created = store.create_event(&payload).await;
        assert!(matches!(created, Err(ApplicationError::EventCreateFailed(_))));

        payload = sample_payload();
        payload.title = "   ".to_string();
        let updated = store.update_event(EventId::new(1), &payload).await;
        assert!(matches!(updated, Err(ApplicationError::EventUpdateFailed(_))));
    }

    #[tokio::test]
    async fn update_event_refetches_after_success() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_update_event()
            .withf(|id, _| *id == EventId::new(7))
            .times(1)
            .returning(|id, _| Ok(sample_event(id.as_i64())));
        mock.expect_get_events().times(1).returning(|| Ok(vec![]));
        mock.expect_get_calendar()
            .times(1)
            .returning(|k| Ok(MonthData::blank(k)));

        let store = store_with(mock);
        let event = store
            .update_event(EventId::new(7), &sample_payload())
            .await
            .unwrap();

        assert_eq!(event.id, EventId::new(7));
    }

    #[tokio::test]
    async fn update_failure_is_wrapped() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_update_event()
            .returning(|_, _| Err(ApplicationError::Internal("boom".into())));
        mock.expect_get_events().times(0);
        mock.expect_get_calendar().times(0);

        let store = store_with(mock);
        let result = store.update_event(EventId::new(7), &sample_payload()).await;

        assert!(matches!(result, Err(ApplicationError::EventUpdateFailed(_))));
    }

    #[tokio::test]
    async fn delete_event_refetches_current_month() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_delete_event()
            .withf(|id| *id == EventId::new(3))
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_get_events().times(1).returning(|| Ok(vec![]));
        mock.expect_get_calendar()
            .withf(|k| *k == MonthKey::new(2024, 5).unwrap())
            .times(1)
            .returning(|k| Ok(MonthData::blank(k)));

        let store = store_with(mock);
        store.set_current_date(2024, 5).unwrap();
        store.delete_event(EventId::new(3)).await.unwrap();

        assert_eq!(store.snapshot().month_data.map(|d| d.month), Some(5));
    }

    #[tokio::test]
    async fn delete_event_failure_does_not_refetch() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_delete_event()
            .times(1)
            .returning(|_| Err(ApplicationError::EventDeleteFailed("HTTP 404".into())));
        mock.expect_get_events().times(0);
        mock.expect_get_calendar().times(0);

        let store = store_with(mock);
        let result = store.delete_event(EventId::new(3)).await;

        assert!(matches!(result, Err(ApplicationError::EventDeleteFailed(_))));
    }

    // ============================================================================
    // Out-of-order responses
    // ============================================================================

    /// Port whose calendar responses are released by the test, one gate per
    /// month; `true` releases data, `false` an error
    #[derive(Default)]
    struct GatedApi {
        gates: parking_lot::Mutex<HashMap<u32, oneshot::Receiver<bool>>>,
        started: AtomicUsize,
    }

    impl GatedApi {
        fn gate(&self, month: u32) -> oneshot::Sender<bool> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(month, rx);
            tx
        }

        async fn wait_started(&self, count: usize) {
            while self.started.load(Ordering::SeqCst) < count {
                tokio::task::yield_now().await;
            }
        }
    }

    #[async_trait]
    impl CalendarApiPort for GatedApi {
        async fn get_calendar(&self, key: MonthKey) -> Result<MonthData, ApplicationError> {
            let gate = self.gates.lock().remove(&key.month());
            self.started.fetch_add(1, Ordering::SeqCst);
            let released = match gate {
                Some(rx) => rx.await.unwrap_or(false),
                None => false,
            };
            if released {
                Ok(MonthData::blank(key))
            } else {
                Err(ApplicationError::fetch_failed("calendar", "HTTP 500"))
            }
        }

        async fn get_holidays(&self, _year: i32) -> Result<Vec<Holiday>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn get_events(&self) -> Result<Vec<Event>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn create_event(&self, _payload: &EventPayload) -> Result<Event, ApplicationError> {
            Err(ApplicationError::Internal("unused".into()))
        }

        async fn update_event(
            &self,
            _id: EventId,
            _payload: &EventPayload,
        ) -> Result<Event, ApplicationError> {
            Err(ApplicationError::Internal("unused".into()))
        }

        async fn delete_event(&self, _id: EventId) -> Result<(), ApplicationError> {
            Err(ApplicationError::Internal("unused".into()))
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    fn gated_store(api: Arc<GatedApi>) -> Arc<CalendarStore> {
        Arc::new(
            CalendarStore::builder()
                .api(api)
                .clock(clock_on(2024, 3, 15))
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let api = Arc::new(GatedApi::default());
        let march = api.gate(3);
        let april = api.gate(4);
        let store = gated_store(api.clone());

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_calendar(2024, 3).await }
        });
        api.wait_started(1).await;

        store.next_month();
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_calendar(2024, 4).await }
        });
        api.wait_started(2).await;
        assert!(store.is_loading());

        april.send(true).unwrap();
        assert_eq!(second.await.unwrap().unwrap(), FetchOutcome::Loaded);
        assert!(store.is_loading());

        march.send(true).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Superseded);

        let state = store.snapshot();
        assert_eq!(state.month_data.map(|d| d.month), Some(4));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn stale_error_is_discarded() {
        let api = Arc::new(GatedApi::default());
        let march = api.gate(3);
        let april = api.gate(4);
        let store = gated_store(api.clone());

        let first = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_calendar(2024, 3).await }
        });
        api.wait_started(1).await;

        store.next_month();
        let second = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_calendar(2024, 4).await }
        });
        api.wait_started(2).await;

        april.send(true).unwrap();
        second.await.unwrap().unwrap();
        march.send(false).unwrap();
        assert_eq!(first.await.unwrap().unwrap(), FetchOutcome::Superseded);

        let state = store.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.month_data.map(|d| d.month), Some(4));
    }

    #[tokio::test]
    async fn response_for_month_navigated_away_from_is_discarded() {
        let api = Arc::new(GatedApi::default());
        let march = api.gate(3);
        let store = gated_store(api.clone());

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        api.wait_started(1).await;

        assert_eq!(store.next_month(), key(2024, 4));
        march.send(true).unwrap();
        assert_eq!(pending.await.unwrap(), FetchOutcome::Superseded);

        let state = store.snapshot();
        assert_eq!(state.current, key(2024, 4));
        assert!(state.month_data.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn fetch_for_other_than_current_month_is_not_applied() {
        let mut mock = MockCalendarApiPort::new();
        mock.expect_get_calendar()
            .times(1)
            .returning(|k| Ok(MonthData::blank(k)));

        let store = store_with(mock);
        let outcome = store.fetch_calendar(2024, 7).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Superseded);
        assert!(store.snapshot().month_data.is_none());
    }

    #[tokio::test]
    async fn cancelled_fetch_releases_loading() {
        let api = Arc::new(GatedApi::default());
        let _march = api.gate(3);
        let store = gated_store(api.clone());

        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_calendar(2024, 3).await }
        });
        api.wait_started(1).await;
        assert!(store.is_loading());

        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        let state = store.snapshot();
        assert!(!state.loading);
        assert!(state.month_data.is_none());
        assert!(state.error.is_none());
    }
}
