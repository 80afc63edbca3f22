//! Background refresh of route data and traffic/weather conditions.
//!
//! Two tasks run side by side. Each publishes whole snapshots through a
//! `watch` channel, so readers always see one consistent state. Route
//! refreshes, whether timed or manual, run one at a time inside the route task.

use crate::config::RefreshIntervals;
use crate::normalizer::project_vehicles;
use crate::source::{LoadOutcome, RouteSource};
use crate::types::{ConditionsSnapshot, NormalizedDataset, VehicleProjection};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use xxhash_rust::xxh64::xxh64;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
// `tokio::time::interval` panics on a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSnapshot {
    pub dataset: NormalizedDataset,
    pub vehicles: Vec<VehicleProjection>,
    pub error: Option<String>,
    pub is_fallback: bool,
    #[serde(serialize_with = "as_hex")]
    pub fingerprint: u64,
    pub updated_at: DateTime<Utc>,
}

impl RouteSnapshot {
    pub fn from_outcome(outcome: LoadOutcome) -> Self {
        let is_fallback = outcome.is_fallback();
        let vehicles = project_vehicles(&outcome.dataset.routes);
        let fingerprint = dataset_fingerprint(&outcome.dataset);

        Self {
            dataset: outcome.dataset,
            vehicles,
            error: outcome.error,
            is_fallback,
            fingerprint,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConditionsState {
    #[serde(flatten)]
    pub conditions: ConditionsSnapshot,
    pub updated_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

fn as_hex<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{value:016x}"))
}

/// Content hash of a dataset, used to tell whether a refresh changed anything.
pub fn dataset_fingerprint(dataset: &NormalizedDataset) -> u64 {
    serde_json::to_vec(dataset).map_or(0, |bytes| xxh64(&bytes, 0))
}

/// Read side of the scheduler: latest snapshots and the manual-retry trigger.
#[derive(Clone)]
pub struct Snapshots {
    routes: watch::Receiver<Option<Arc<RouteSnapshot>>>,
    conditions: watch::Receiver<Arc<ConditionsState>>,
    retry: Arc<Notify>,
}

impl Snapshots {
    /// `None` until the first route refresh has finished.
    pub fn routes(&self) -> Option<Arc<RouteSnapshot>> {
        self.routes.borrow().clone()
    }

    pub fn conditions(&self) -> Arc<ConditionsState> {
        Arc::clone(&self.conditions.borrow())
    }

    /// Asks the route task to refresh now and restart its interval.
    /// Requests made while a refresh is running collapse into one follow-up.
    pub fn request_refresh(&self) {
        self.retry.notify_one();
    }

    /// Waits until a published route snapshot satisfies `predicate`.
    /// Returns `None` if the scheduler stopped first.
    pub async fn wait_for_routes<F>(&self, mut predicate: F) -> Option<Arc<RouteSnapshot>>
    where
        F: FnMut(&RouteSnapshot) -> bool,
    {
        let mut rx = self.routes.clone();
        let snapshot = rx
            .wait_for(|s| s.as_deref().is_some_and(&mut predicate))
            .await
            .ok()?;
        (*snapshot).clone()
    }

    pub async fn wait_for_conditions<F>(&self, mut predicate: F) -> Option<Arc<ConditionsState>>
    where
        F: FnMut(&ConditionsState) -> bool,
    {
        let mut rx = self.conditions.clone();
        let state = rx.wait_for(|s| predicate(s)).await.ok()?;
        Some(Arc::clone(&state))
    }
}

pub struct RefreshScheduler {
    snapshots: Snapshots,
    shutdown_tx: broadcast::Sender<()>,
    handles: Vec<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Spawns the route and conditions tasks. Both run their first refresh
    /// immediately. Must be called from within a Tokio runtime.
    pub fn start(source: Arc<RouteSource>, intervals: RefreshIntervals) -> Self {
        let (routes_tx, routes_rx) = watch::channel(None);
        let (conditions_tx, conditions_rx) = watch::channel(Arc::new(ConditionsState::default()));
        let retry = Arc::new(Notify::new());
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        info!(
            "Starting refresh scheduler (routes every {}s, conditions every {}s)",
            intervals.routes.as_secs(),
            intervals.conditions.as_secs()
        );

        let route_task = RouteTask {
            source: Arc::clone(&source),
            period: intervals.routes,
            tx: routes_tx,
            retry: Arc::clone(&retry),
        };
        let conditions_task = ConditionsTask {
            source,
            period: intervals.conditions,
            tx: conditions_tx,
        };

        let handles = vec![
            tokio::spawn(route_task.run(shutdown_tx.subscribe())),
            tokio::spawn(conditions_task.run(shutdown_tx.subscribe())),
        ];

        Self {
            snapshots: Snapshots {
                routes: routes_rx,
                conditions: conditions_rx,
                retry,
            },
            shutdown_tx,
            handles,
        }
    }

    pub fn snapshots(&self) -> Snapshots {
        self.snapshots.clone()
    }

    /// Signals both tasks and waits for them to finish.
    pub async fn stop(self) {
        info!("Stopping refresh scheduler...");
        drop(self.shutdown_tx);

        if tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
            for handle in self.handles {
                let _ = handle.await;
            }
        })
        .await
        .is_err()
        {
            warn!("Shutdown timeout reached, some refresh tasks may not have completed");
        }
    }
}

struct RouteTask {
    source: Arc<RouteSource>,
    period: Duration,
    tx: watch::Sender<Option<Arc<RouteSnapshot>>>,
    retry: Arc<Notify>,
}

impl RouteTask {
    async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.period.max(MIN_PERIOD));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                () = self.retry.notified() => {
                    info!("Manual route refresh requested");
                    interval.reset();
                }
                _ = shutdown_rx.recv() => break,
            }

            let outcome = tokio::select! {
                outcome = self.source.load_dataset() => outcome,
                _ = shutdown_rx.recv() => break,
            };

            self.publish(RouteSnapshot::from_outcome(outcome));
        }

        info!("Route refresh task shutting down");
    }

    fn publish(&self, snapshot: RouteSnapshot) {
        let previous = self.tx.borrow().as_ref().map(|s| s.fingerprint);

        if previous == Some(snapshot.fingerprint) {
            debug!("Route data unchanged ({:016x})", snapshot.fingerprint);
        } else if snapshot.is_fallback {
            warn!("Route data replaced by fallback dataset");
        } else {
            info!(
                "Route data updated: {} route(s), fingerprint {:016x}",
                snapshot.dataset.routes.len(),
                snapshot.fingerprint
            );
        }

        self.tx.send_replace(Some(Arc::new(snapshot)));
    }
}

struct ConditionsTask {
    source: Arc<RouteSource>,
    period: Duration,
    tx: watch::Sender<Arc<ConditionsState>>,
}

impl ConditionsTask {
    async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut interval = tokio::time::interval(self.period.max(MIN_PERIOD));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown_rx.recv() => break,
            }

            let result = tokio::select! {
                result = self.source.fetch_conditions() => result,
                _ = shutdown_rx.recv() => break,
            };

            let next = match result {
                Ok(conditions) => ConditionsState {
                    conditions,
                    updated_at: Some(Utc::now()),
                    error: None,
                },
                Err(e) => {
                    error!("Error refreshing traffic/weather conditions: {}", e);
                    let previous = Arc::clone(&self.tx.borrow());
                    ConditionsState {
                        error: Some(e.to_string()),
                        ..(*previous).clone()
                    }
                }
            };

            self.tx.send_replace(Arc::new(next));
        }

        info!("Conditions refresh task shutting down");
    }
}
