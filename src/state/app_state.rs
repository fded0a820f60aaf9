//! Main application state management

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Instant,
};

use chrono::{DateTime, Local, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{ClockState, Phase, Settings, TimerState};
use crate::{
    error::{SettingsError, TimerError},
    services::{AlertNotifier, ClockSource},
    settings::SettingsController,
    tasks::{clock_ticker_task, countdown_task, TaskHandle},
    timer::{ProgressAnimator, ProgressView, RunId, TickOutcome, TimerEngine},
};

/// Engine plus the bits that must change together with it
struct TimerSlot {
    engine: TimerEngine,
    /// Change feed from the settings controller
    settings_rx: watch::Receiver<Settings>,
    animator: ProgressAnimator,
}

impl TimerSlot {
    /// Apply any settings published since the last look
    fn sync_settings(&mut self) {
        if !self.settings_rx.has_changed().unwrap_or(false) {
            return;
        }
        let settings = *self.settings_rx.borrow_and_update();
        if self.engine.apply_settings(settings) {
            self.animator.snap(0.0, tokio::time::Instant::now());
        }
    }

    fn view(&self) -> ProgressView {
        ProgressView::from_engine(&self.engine)
    }
}

/// Main application state shared by the API handlers and background tasks
pub struct AppState {
    /// Sole owner of the canonical settings value
    pub settings: Arc<SettingsController>,
    timer: Mutex<TimerSlot>,
    clock: Mutex<ClockState>,
    notifier: Arc<dyn AlertNotifier>,
    /// Ticker of the current run, if any
    countdown_task: Mutex<Option<TaskHandle>>,
    background_tasks: Mutex<Vec<TaskHandle>>,
    /// Number of countdowns that ran to zero
    completed_countdowns: AtomicU64,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create the state from an already loaded settings controller
    pub fn new(
        settings: Arc<SettingsController>,
        notifier: Arc<dyn AlertNotifier>,
        port: u16,
        host: String,
    ) -> Result<Self, SettingsError> {
        let current = settings.current()?;
        let settings_rx = settings.subscribe();

        Ok(Self {
            timer: Mutex::new(TimerSlot {
                engine: TimerEngine::new(current),
                settings_rx,
                animator: ProgressAnimator::new(0.0, tokio::time::Instant::now()),
            }),
            settings,
            clock: Mutex::new(ClockState::default()),
            notifier,
            countdown_task: Mutex::new(None),
            background_tasks: Mutex::new(Vec::new()),
            completed_countdowns: AtomicU64::new(0),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        })
    }

    /// Spawn the wall-clock ticker; it lives until `shutdown`
    pub fn spawn_background_tasks(self: &Arc<Self>, clock: ClockSource) {
        let state = Arc::clone(self);
        let handle = TaskHandle::spawn("clock", clock_ticker_task(state, clock));
        lock(&self.background_tasks).push(handle);
    }

    /// Cancel every task this state owns
    pub fn shutdown(&self) {
        if let Some(handle) = lock(&self.countdown_task).take() {
            handle.cancel();
        }
        for handle in lock(&self.background_tasks).drain(..) {
            handle.cancel();
        }
        info!("Background tasks cancelled");
    }

    fn timer(&self) -> MutexGuard<'_, TimerSlot> {
        let mut slot = lock(&self.timer);
        slot.sync_settings();
        slot
    }

    /// Start a countdown and schedule its ticker.
    ///
    /// The ticker slot is locked before the engine, and held until the new
    /// ticker is installed, so a concurrent `stop`/`start` can never leave a
    /// running engine without its ticker.
    pub fn start(self: &Arc<Self>) -> Result<TimerState, TimerError> {
        let mut ticker_slot = lock(&self.countdown_task);
        let (run, state) = {
            let mut slot = self.timer();
            let run = slot.engine.start()?;
            (run, slot.engine.state())
        };

        let ticker = TaskHandle::spawn("countdown", countdown_task(Arc::clone(self), run));
        if let Some(previous) = ticker_slot.replace(ticker) {
            previous.cancel();
        }
        drop(ticker_slot);

        self.record_action("start");
        Ok(state)
    }

    /// Stop the countdown, reset it and cancel its ticker
    pub fn stop(&self) -> Result<TimerState, TimerError> {
        let mut ticker_slot = lock(&self.countdown_task);
        let state = {
            let mut slot = self.timer();
            slot.engine.stop()?;
            slot.animator.snap(0.0, tokio::time::Instant::now());
            slot.engine.state()
        };

        if let Some(ticker) = ticker_slot.take() {
            ticker.cancel();
        }
        drop(ticker_slot);

        self.record_action("stop");
        Ok(state)
    }

    /// Toggle between running and idle
    pub fn start_stop(self: &Arc<Self>) -> Result<TimerState, TimerError> {
        match self.current_phase() {
            Phase::Idle => self.start(),
            Phase::Running => self.stop(),
        }
    }

    /// One second of countdown for `run`; raises the alert on expiry
    pub fn countdown_tick(&self, run: RunId) -> TickOutcome {
        let outcome = {
            let mut slot = self.timer();
            let outcome = slot.engine.tick(run);
            let now = tokio::time::Instant::now();
            match outcome {
                TickOutcome::Advanced { .. } => {
                    let target = slot.view().progress;
                    slot.animator.retarget(target, now);
                }
                TickOutcome::Expired => slot.animator.snap(0.0, now),
                TickOutcome::Ignored => {}
            }
            outcome
        };

        if outcome == TickOutcome::Expired {
            self.completed_countdowns.fetch_add(1, Ordering::Relaxed);
            self.notifier.notify();
        }
        outcome
    }

    /// Validate and persist a new duration. The timer picks it up right
    /// away when idle, otherwise the next time it becomes idle.
    pub async fn update_duration(&self, minutes: i64) -> Result<Settings, SettingsError> {
        let settings = Settings::new(minutes)?;
        self.settings.update(settings).await?;
        self.record_action("update-duration");
        Ok(settings)
    }

    pub fn current_phase(&self) -> Phase {
        self.timer().engine.phase()
    }

    pub fn current_remaining(&self) -> u32 {
        self.timer().engine.remaining_seconds()
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer().engine.state()
    }

    pub fn progress_view(&self) -> ProgressView {
        self.timer().view()
    }

    /// Smoothed progress for display only
    pub fn animated_progress(&self) -> f64 {
        self.timer().animator.value_at(tokio::time::Instant::now())
    }

    pub fn current_clock_time(&self) -> ClockState {
        *lock(&self.clock)
    }

    pub fn set_clock_time(&self, now: DateTime<Local>) {
        *lock(&self.clock) = ClockState::new(now);
    }

    pub fn completed_countdowns(&self) -> u64 {
        self.completed_countdowns.load(Ordering::Relaxed)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match lock(&self.last_action).clone() {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }

    fn record_action(&self, action: &str) {
        *lock(&self.last_action) = Some((action.to_string(), Utc::now()));
    }
}

/// Every critical section leaves its data consistent, so a poisoned lock is
/// still safe to use
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| {
        warn!("Recovering poisoned lock");
        PoisonError::into_inner(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::StoreError,
        settings::{MemoryStore, SettingsStore},
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::{sync::atomic::AtomicUsize, time::Duration};

    #[derive(Default)]
    struct RecordingNotifier {
        calls: AtomicUsize,
    }

    impl AlertNotifier for RecordingNotifier {
        fn notify(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct ReadOnlyStore;

    #[async_trait]
    impl SettingsStore for ReadOnlyStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read-only".to_string()))
        }
    }

    async fn app_with(
        store: Arc<dyn SettingsStore>,
        minutes: Option<i64>,
    ) -> (Arc<AppState>, Arc<RecordingNotifier>) {
        let controller = Arc::new(SettingsController::new(store));
        controller.load().await;
        if let Some(minutes) = minutes {
            controller.update(Settings::new(minutes).unwrap()).await.unwrap();
        }
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::new(controller, notifier.clone(), 0, "127.0.0.1".to_string()).unwrap();
        (Arc::new(state), notifier)
    }

    async fn app(minutes: Option<i64>) -> (Arc<AppState>, Arc<RecordingNotifier>) {
        app_with(Arc::new(MemoryStore::new()), minutes).await
    }

    async fn advance(seconds: u64) {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }

    /// Start and move half a tick in, so later whole-second advances never
    /// land on the same instant as a countdown tick
    async fn start(state: &Arc<AppState>) {
        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    #[tokio::test]
    async fn refuses_uninitialized_settings() {
        let controller = Arc::new(SettingsController::new(Arc::new(MemoryStore::new())));
        let result = AppState::new(
            controller,
            Arc::new(RecordingNotifier::default()),
            0,
            String::new(),
        );
        assert!(matches!(result, Err(SettingsError::NotInitialized)));
    }

    #[tokio::test(start_paused = true)]
    async fn full_countdown_alerts_once_and_resets() {
        let (state, notifier) = app(Some(1)).await;
        start(&state).await;

        advance(59).await;
        assert_eq!(state.current_remaining(), 1);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);

        advance(1).await;
        assert_eq!(state.current_phase(), Phase::Idle);
        assert_eq!(state.current_remaining(), 60);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);

        advance(120).await;
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.completed_countdowns(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn default_duration_expires_after_forty_five_minutes() {
        let (state, notifier) = app(None).await;
        start(&state).await;

        advance(45 * 60).await;

        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.current_phase(), Phase::Idle);
        assert_eq!(state.current_remaining(), 2700);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_ticks() {
        let (state, notifier) = app(None).await;
        start(&state).await;
        advance(5).await;
        assert_eq!(state.current_remaining(), 2695);

        state.stop().unwrap();
        advance(10).await;

        assert_eq!(state.current_phase(), Phase::Idle);
        assert_eq!(state.current_remaining(), 2700);
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_does_not_double_tick() {
        let (state, _) = app(None).await;
        for _ in 0..3 {
            start(&state).await;
            advance(3).await;
            state.stop().unwrap();
            assert_eq!(state.current_remaining(), 2700);
        }

        start(&state).await;
        advance(4).await;
        assert_eq!(state.current_remaining(), 2696);
    }

    #[tokio::test(start_paused = true)]
    async fn start_stop_toggles() {
        let (state, _) = app(None).await;
        assert_eq!(state.start_stop().unwrap().phase, Phase::Running);
        assert_eq!(state.start_stop().unwrap().phase, Phase::Idle);
        assert_eq!(state.get_last_action().0.as_deref(), Some("stop"));
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_state_transitions_are_rejected() {
        let (state, _) = app(None).await;
        assert!(state.stop().is_err());
        state.start().unwrap();
        assert!(state.start().is_err());
        assert_eq!(state.current_phase(), Phase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_change_mid_run_waits_for_stop() {
        let (state, _) = app(None).await;
        start(&state).await;
        advance(10).await;

        state.update_duration(30).await.unwrap();
        advance(1).await;
        assert_eq!(state.current_remaining(), 2689);

        state.stop().unwrap();
        assert_eq!(state.current_remaining(), 1800);
    }

    #[tokio::test(start_paused = true)]
    async fn duration_change_while_idle_applies_immediately() {
        let (state, _) = app(None).await;
        state.update_duration(20).await.unwrap();
        assert_eq!(state.current_remaining(), 1200);
        assert_eq!(state.progress_view().label, "20:00");
    }

    #[tokio::test]
    async fn invalid_duration_changes_nothing() {
        let (state, _) = app(None).await;
        let err = state.update_duration(-5).await.unwrap_err();

        assert!(matches!(err, SettingsError::Validation(_)));
        assert_eq!(state.settings.current().unwrap().timer_duration, 45);
        assert_eq!(state.current_remaining(), 2700);
    }

    #[tokio::test]
    async fn failed_save_keeps_previous_duration() {
        let (state, _) = app_with(Arc::new(ReadOnlyStore), None).await;
        let err = state.update_duration(10).await.unwrap_err();

        assert!(matches!(err, SettingsError::Persistence(_)));
        assert_eq!(state.current_remaining(), 2700);
    }

    #[tokio::test(start_paused = true)]
    async fn animated_progress_follows_countdown() {
        let (state, _) = app(Some(1)).await;
        start(&state).await;
        advance(30).await;

        assert!((state.progress_view().progress - 0.5).abs() < 1e-9);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!((state.animated_progress() - 0.5).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_ticker_refreshes_until_shutdown() {
        let (state, _) = app(None).await;
        let stale = Local.with_ymd_and_hms(2000, 1, 1, 9, 0, 0).unwrap();
        state.set_clock_time(stale);
        assert_eq!(state.current_clock_time().now, stale);

        state.spawn_background_tasks(ClockSource::new());
        advance(2).await;
        assert_ne!(state.current_clock_time().now, stale);

        state.start().unwrap();
        state.shutdown();
        state.set_clock_time(stale);
        advance(5).await;
        assert_eq!(state.current_clock_time().now, stale);
        assert_eq!(state.current_phase(), Phase::Running);
        assert_eq!(state.current_remaining(), 2700);
    }

    fn has_live_ticker(state: &AppState) -> bool {
        lock(&state.countdown_task)
            .as_ref()
            .map_or(false, |ticker| !ticker.is_finished())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_toggles_keep_ticker_with_running_engine() {
        let (state, _) = app(None).await;

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let _ = state.start();
                        let _ = state.stop();
                        let _ = state.start_stop();
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.await.unwrap();
        }

        match state.current_phase() {
            Phase::Running => assert!(has_live_ticker(&state)),
            Phase::Idle => {
                assert!(lock(&state.countdown_task).is_none());
                assert_eq!(state.current_remaining(), 2700);
            }
        }
        state.shutdown();
    }
}
