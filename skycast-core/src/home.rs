use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::{
    client::WeatherClient,
    config::Config,
    debounce::Debouncer,
    model::{LocationCandidate, WeatherQuery, WeatherReport},
    store::CityStore,
};

/// Everything the home screen renders, published as one snapshot.
///
/// Only the controller mutates this; the presentation layer observes it
/// through the watch channel returned by [`HomeController::subscribe`].
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    /// A forecast fetch is in flight; any shown report is stale.
    pub loading: bool,
    /// The search panel is open. Candidates are only held while it is.
    pub search_visible: bool,
    /// Location search results, in provider order.
    pub candidates: Vec<LocationCandidate>,
    /// Last applied forecast, if any fetch has succeeded yet.
    pub report: Option<WeatherReport>,
    /// Message from the last failed fetch; cleared when a new one starts.
    pub error: Option<String>,
}

/// Screen-level orchestration for the weather home screen.
///
/// Owns the [`ScreenState`], sequences calls to the weather client and the
/// city store in response to user events and startup, and keeps overlapping
/// forecast fetches from clobbering each other.
#[derive(Debug)]
pub struct HomeController {
    shared: Arc<Shared>,
    search_debounce: Debouncer<String>,
}

#[derive(Debug)]
struct Shared {
    client: Arc<dyn WeatherClient>,
    store: Arc<dyn CityStore>,
    state: watch::Sender<ScreenState>,
    default_city: String,
    /// Issued on every forecast fetch; responses carry their own value.
    fetch_seq: AtomicU64,
    /// Highest sequence whose response has been applied. A response is
    /// applied only if it is newer than this AND no newer fetch has been
    /// issued, so a slow fetch for a previously selected city can neither
    /// overwrite a newer report nor clear the spinner while a newer fetch
    /// is still in flight.
    applied_seq: AtomicU64,
    /// City of the most recently issued fetch, for retry.
    last_city: Mutex<String>,
}

impl HomeController {
    /// The controller spawns tasks for debounced lookups, so it must be
    /// created inside a tokio runtime.
    pub fn new(client: Arc<dyn WeatherClient>, store: Arc<dyn CityStore>, config: &Config) -> Self {
        let (state, _) = watch::channel(ScreenState::default());

        let shared = Arc::new(Shared {
            client,
            store,
            state,
            default_city: config.default_city.clone(),
            fetch_seq: AtomicU64::new(0),
            applied_seq: AtomicU64::new(0),
            last_city: Mutex::new(config.default_city.clone()),
        });

        let lookup_target = Arc::clone(&shared);
        let search_debounce = Debouncer::new(config.debounce_interval(), move |text: String| {
            let shared = Arc::clone(&lookup_target);
            tokio::spawn(async move {
                shared.run_lookup(&text).await;
            });
        });

        Self {
            shared,
            search_debounce,
        }
    }

    /// Watch the screen state. The receiver sees every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ScreenState> {
        self.shared.state.subscribe()
    }

    /// Current snapshot of the screen state.
    pub fn state(&self) -> ScreenState {
        self.shared.state.borrow().clone()
    }

    /// Startup: restore the last viewed city (falling back to the configured
    /// default) and fetch its forecast. A storage read failure is logged and
    /// treated the same as no stored city.
    pub async fn initialize(&self) {
        let city = match self.shared.store.load_city().await {
            Ok(Some(city)) => city,
            Ok(None) => self.shared.default_city.clone(),
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored city, using default");
                self.shared.default_city.clone()
            }
        };

        self.shared.run_forecast_fetch(city, false).await;
    }

    /// Keystroke handler. Input is debounced; only the trailing call of a
    /// burst triggers a location lookup. Empty text is forwarded unchanged
    /// (WeatherAPI answers it with an empty candidate list).
    pub fn on_search_input(&self, text: impl Into<String>) {
        self.search_debounce.call(text.into());
    }

    /// The user picked a candidate: the list is cleared and the search panel
    /// closed before the fetch starts, so no stale list lingers while it is
    /// in flight. On success the city is persisted as the new last-viewed
    /// city; a write failure is logged and never blocks the report.
    pub async fn select_candidate(&self, candidate: &LocationCandidate) {
        self.shared.state.send_modify(|state| {
            state.candidates.clear();
            state.search_visible = false;
        });

        self.shared
            .run_forecast_fetch(candidate.name.clone(), true)
            .await;
    }

    /// Open or close the search panel. Closing drops any shown candidates.
    /// Never touches the network.
    pub fn toggle_search(&self) {
        self.shared.state.send_modify(|state| {
            state.search_visible = !state.search_visible;
            if !state.search_visible {
                state.candidates.clear();
            }
        });
    }

    /// Re-issue the forecast for the most recently requested city, e.g.
    /// after a failed fetch.
    pub async fn retry(&self) {
        let city = self.shared.lock_last_city().clone();
        self.shared.run_forecast_fetch(city, false).await;
    }
}

impl Shared {
    async fn run_lookup(&self, text: &str) {
        match self.client.lookup_locations(text).await {
            Ok(candidates) => {
                tracing::debug!(query = text, count = candidates.len(), "lookup finished");
                self.state.send_modify(|state| {
                    // Candidates are only held while the panel is open; a
                    // late lookup result must not resurrect a closed list.
                    if state.search_visible {
                        state.candidates = candidates;
                    }
                });
            }
            Err(err) => {
                tracing::warn!(query = text, error = %err, "location lookup failed");
                // The candidate list stays as it was, but watchers waiting
                // on the lookup still need to see it settle.
                self.state.send_modify(|_| {});
            }
        }
    }

    async fn run_forecast_fetch(&self, city: String, persist_on_success: bool) {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock_last_city() = city.clone();

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        tracing::info!(city = %city, seq, "requesting forecast");
        let result = self
            .client
            .fetch_forecast(&WeatherQuery::for_city(city.clone()))
            .await;

        if !self.try_apply(seq) {
            tracing::debug!(city = %city, seq, "discarding superseded forecast response");
            return;
        }

        match result {
            Ok(report) => {
                if persist_on_success {
                    if let Err(err) = self.store.save_city(&city).await {
                        // The report still shows; the city just won't be
                        // remembered next launch.
                        tracing::warn!(city = %city, error = %err, "could not persist selected city");
                    }
                }
                self.publish_report(report);
            }
            Err(err) => {
                tracing::warn!(city = %city, error = %err, "forecast fetch failed");
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(err.to_string());
                });
            }
        }
    }

    /// Claim `seq` as the newest applied response. Returns false when a
    /// newer fetch has already been issued or a response with a higher
    /// sequence already landed; the superseded fetch then leaves the state
    /// to its successor.
    fn try_apply(&self, seq: u64) -> bool {
        if seq < self.fetch_seq.load(Ordering::SeqCst) {
            return false;
        }
        let mut applied = self.applied_seq.load(Ordering::SeqCst);
        loop {
            if seq <= applied {
                return false;
            }
            match self.applied_seq.compare_exchange(
                applied,
                seq,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(current) => applied = current,
            }
        }
    }

    fn publish_report(&self, report: WeatherReport) {
        self.state.send_modify(|state| {
            state.loading = false;
            state.report = Some(report);
            state.error = None;
        });
    }

    fn lock_last_city(&self) -> MutexGuard<'_, String> {
        self.last_city
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
