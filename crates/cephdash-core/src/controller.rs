// ── Selection-driven refresh controller ──
//
// Keeps exactly one polling subscription alive for the selected
// filesystem. A selection change to a new identity resets the published
// data to defaults and renews the subscription; re-selecting the same
// identity is a no-op.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::RefreshConfig;
use crate::identity::{self, Identity};
use crate::model::{ClientsView, SelectionRow, TabBundle, TabsPayload};
use crate::source::TabsSource;
use crate::store::TabDataStore;
use crate::stream::ViewStream;
use crate::subscription::{HandleId, SubscriptionHandle, SubscriptionSlot};

// ── Transition ───────────────────────────────────────────────────

/// What a selection change did to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Same identity as before (or still nothing selected).
    Unchanged,
    /// A new subscription was started for `identity`.
    Subscribed { identity: Identity, handle: HandleId },
    /// The selection was cleared.
    Deselected,
}

// ── Shared state ─────────────────────────────────────────────────

/// State the controller shares with its polling task.
struct Shared {
    identity: watch::Sender<Option<Identity>>,
    store: TabDataStore,
}

impl Shared {
    /// Publish `payload` only if it was fetched for the current identity by
    /// a subscription that is still live.
    ///
    /// The identity borrow is held across check and publish, so a
    /// concurrent selection change waits for the publish to finish and
    /// then resets the store.
    fn apply_if_current(
        &self,
        issued_for: &Identity,
        cancel: &CancellationToken,
        payload: TabsPayload,
    ) -> bool {
        let current = self.identity.borrow();
        if cancel.is_cancelled() || current.as_ref() != Some(issued_for) {
            trace!(fs_id = issued_for.id, "discarding stale tab payload");
            return false;
        }
        self.store.apply(payload);
        true
    }
}

// ── RefreshController ────────────────────────────────────────────

/// Drives tab polling for whichever filesystem is currently selected.
///
/// States are *unselected* and *subscribed(identity)*. Feed it selection
/// changes with [`on_selection_changed`](Self::on_selection_changed) and
/// read the published views through [`details`](Self::details) and
/// [`clients`](Self::clients) or their streams. Dropping the controller
/// cancels its subscription.
pub struct RefreshController<S: TabsSource> {
    source: Arc<S>,
    shared: Arc<Shared>,
    slot: SubscriptionSlot,
    config: RefreshConfig,
}

impl<S: TabsSource> RefreshController<S> {
    /// Create an unselected controller with default data published.
    pub fn new(source: S, config: RefreshConfig) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            source: Arc::new(source),
            shared: Arc::new(Shared {
                identity,
                store: TabDataStore::new(),
            }),
            slot: SubscriptionSlot::new(),
            config,
        }
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    // ── Selection lifecycle ──────────────────────────────────────

    /// React to the selection source emitting `selection`.
    ///
    /// Must be called from within a tokio runtime: a new identity spawns
    /// the polling task.
    pub fn on_selection_changed(&mut self, selection: &[SelectionRow]) -> Transition {
        let next = identity::resolve(selection);
        if *self.shared.identity.borrow() == next {
            return Transition::Unchanged;
        }

        match next {
            Some(identity) => self.subscribe(identity),
            None => {
                self.deselect();
                Transition::Deselected
            }
        }
    }

    fn subscribe(&mut self, identity: Identity) -> Transition {
        debug!(%identity, "selection changed, renewing tab subscription");

        // Stop the old poller before it can observe the new identity.
        self.slot.cancel();
        self.shared.identity.send_replace(Some(identity.clone()));
        self.shared.store.reset();

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let period = self.config.interval();
        let handle = self
            .slot
            .replace(|| SubscriptionHandle::spawn(|cancel| poll_task(source, shared, period, cancel)));

        Transition::Subscribed { identity, handle }
    }

    fn deselect(&mut self) {
        debug!("selection cleared");
        self.slot.cancel();
        self.shared.identity.send_replace(None);
        self.shared.store.reset();
    }

    /// Republish the last known data under new `Arc`s without fetching.
    ///
    /// Never touches the identity or the subscription.
    pub fn soft_refresh(&self) {
        self.shared.store.soft_refresh();
    }

    /// Cancel the live subscription, if any, and forget the identity.
    ///
    /// Idempotent; safe when nothing was ever selected. The last
    /// published data stays readable.
    pub fn dispose(&mut self) {
        if self.slot.cancel() {
            debug!("tab subscription disposed");
        }
        self.shared.identity.send_replace(None);
    }

    // ── Observation ──────────────────────────────────────────────

    pub fn identity(&self) -> Option<Identity> {
        self.shared.identity.borrow().clone()
    }

    pub fn subscribe_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.shared.identity.subscribe()
    }

    /// Name of the selected filesystem's first MDS daemon.
    pub fn display_name(&self) -> Option<String> {
        self.shared
            .identity
            .borrow()
            .as_ref()
            .and_then(|identity| identity.display_name.clone())
    }

    /// The live subscription handle, if a filesystem is selected.
    pub fn subscription(&self) -> Option<&SubscriptionHandle> {
        self.slot.current()
    }

    pub fn store(&self) -> &TabDataStore {
        &self.shared.store
    }

    pub fn details(&self) -> Arc<TabBundle> {
        self.shared.store.details()
    }

    pub fn clients(&self) -> Arc<ClientsView> {
        self.shared.store.clients()
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.shared.store.last_update()
    }

    pub fn details_stream(&self) -> ViewStream<TabBundle> {
        self.shared.store.details_stream()
    }

    pub fn clients_stream(&self) -> ViewStream<ClientsView> {
        self.shared.store.clients_stream()
    }
}

impl<S: TabsSource> Drop for RefreshController<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ── Background task ──────────────────────────────────────────────

/// Fetch immediately, then once per `period`, for the identity current at
/// each tick. Failures are logged and the next tick tries again.
async fn poll_task<S: TabsSource>(
    source: Arc<S>,
    shared: Arc<Shared>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let Some(identity) = shared.identity.borrow().clone() else {
            break;
        };

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = source.fetch_tabs(identity.id) => result,
        };

        match result {
            Ok(payload) => {
                if shared.apply_if_current(&identity, &cancel, payload) {
                    trace!(fs_id = identity.id, "tab data refreshed");
                }
            }
            Err(e) => warn!(fs_id = identity.id, error = %e, "tab refresh failed"),
        }
    }
}
