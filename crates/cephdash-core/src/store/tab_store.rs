// ── Tab data store ──
//
// Holds the published `details` and `clients` view models. Every write
// allocates new `Arc`s, so `Arc::ptr_eq` on two reads is a valid
// "has anything been published since" check.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::trace;

use crate::model::{ClientsView, TabBundle, TabsPayload};
use crate::stream::ViewStream;

/// Copy-on-publish store for one filesystem's tab data.
///
/// Values are never mutated in place. Writes go through `send_replace`,
/// which updates even when nobody is subscribed.
///
/// Writers are serialized by the `staged` lock, held from reading the
/// staged payload until both views are published. `details()` followed
/// by `clients()` may still straddle a write; use
/// [`snapshot`](Self::snapshot) when the pair must match.
pub struct TabDataStore {
    details: watch::Sender<Arc<TabBundle>>,
    clients: watch::Sender<Arc<ClientsView>>,
    /// Last applied payload, the source for `soft_refresh`.
    staged: Mutex<Option<Arc<TabsPayload>>>,
    last_update: watch::Sender<Option<DateTime<Utc>>>,
}

impl TabDataStore {
    pub fn new() -> Self {
        let (details, _) = watch::channel(Arc::new(TabBundle::default()));
        let (clients, _) = watch::channel(Arc::new(ClientsView::default()));
        let (last_update, _) = watch::channel(None);

        Self {
            details,
            clients,
            staged: Mutex::new(None),
            last_update,
        }
    }

    fn lock_staged(&self) -> MutexGuard<'_, Option<Arc<TabsPayload>>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Publish fresh defaults and forget the staged payload.
    pub fn reset(&self) {
        let mut staged = self.lock_staged();
        *staged = None;
        self.last_update.send_replace(None);
        self.publish(TabBundle::default(), ClientsView::default());
        trace!("tab data reset to defaults");
    }

    /// Stage `payload` and publish views derived from it.
    pub fn apply(&self, payload: TabsPayload) {
        let mut staged = self.lock_staged();
        let details = payload.details.clone();
        let clients = payload.clients.clone();
        *staged = Some(Arc::new(payload));
        self.publish(details, clients);
        self.last_update.send_replace(Some(Utc::now()));
    }

    /// Republish deep copies of the staged payload under new `Arc`s.
    ///
    /// With nothing staged, the currently published values are copied
    /// instead. No I/O happens here.
    pub fn soft_refresh(&self) {
        let staged = self.lock_staged();
        let (details, clients) = match staged.as_deref() {
            Some(payload) => (payload.details.clone(), payload.clients.clone()),
            None => (
                TabBundle::clone(&self.details.borrow()),
                ClientsView::clone(&self.clients.borrow()),
            ),
        };
        self.publish(details, clients);
        trace!("tab data soft-refreshed");
    }

    /// Caller must hold the `staged` lock.
    fn publish(&self, details: TabBundle, clients: ClientsView) {
        self.details.send_replace(Arc::new(details));
        self.clients.send_replace(Arc::new(clients));
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn details(&self) -> Arc<TabBundle> {
        self.details.borrow().clone()
    }

    pub fn clients(&self) -> Arc<ClientsView> {
        self.clients.borrow().clone()
    }

    /// `details` and `clients` from the same write.
    pub fn snapshot(&self) -> (Arc<TabBundle>, Arc<ClientsView>) {
        let _staged = self.lock_staged();
        (self.details(), self.clients())
    }

    /// The payload `soft_refresh` would republish, if one was applied.
    pub fn staged(&self) -> Option<Arc<TabsPayload>> {
        self.lock_staged().clone()
    }

    /// When the last payload was applied; `None` after a reset.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        *self.last_update.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_details(&self) -> watch::Receiver<Arc<TabBundle>> {
        self.details.subscribe()
    }

    pub fn subscribe_clients(&self) -> watch::Receiver<Arc<ClientsView>> {
        self.clients.subscribe()
    }

    pub fn details_stream(&self) -> ViewStream<TabBundle> {
        ViewStream::new(self.subscribe_details())
    }

    pub fn clients_stream(&self) -> ViewStream<ClientsView> {
        ViewStream::new(self.subscribe_clients())
    }
}

impl Default for TabDataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::model::{CacheStatus, Client, Pool};
    use pretty_assertions::assert_eq;

    fn payload(name: &str) -> TabsPayload {
        TabsPayload {
            details: TabBundle {
                standbys: "mds-b".into(),
                pools: vec![Pool {
                    name: "cephfs_data".into(),
                    pool_type: "data".into(),
                    used: 10,
                    avail: 90,
                }],
                name: name.into(),
                ..TabBundle::default()
            },
            clients: ClientsView {
                status: CacheStatus::ValueOk,
                data: vec![Client {
                    id: 4305,
                    ..Client::default()
                }],
            },
        }
    }

    #[test]
    fn starts_at_defaults() {
        let store = TabDataStore::new();
        assert_eq!(*store.details(), TabBundle::default());
        assert_eq!(*store.clients(), ClientsView::default());
        assert_eq!(store.clients().status, CacheStatus::ValueNone);
        assert!(store.staged().is_none());
        assert!(store.last_update().is_none());
    }

    #[test]
    fn apply_publishes_payload() {
        let store = TabDataStore::new();
        store.apply(payload("cephfs"));

        assert_eq!(store.details().name, "cephfs");
        assert_eq!(store.clients().data[0].id, 4305);
        assert!(store.staged().is_some());
        assert!(store.last_update().is_some());
    }

    #[test]
    fn reset_publishes_new_default_arcs() {
        let store = TabDataStore::new();
        let before = store.details();
        store.apply(payload("cephfs"));
        store.reset();

        let after = store.details();
        assert_eq!(*after, TabBundle::default());
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(store.staged().is_none());
        assert!(store.last_update().is_none());
    }

    #[test]
    fn soft_refresh_copies_staged_payload() {
        let store = TabDataStore::new();
        store.apply(payload("cephfs"));
        let details = store.details();
        let clients = store.clients();

        store.soft_refresh();

        assert!(!Arc::ptr_eq(&details, &store.details()));
        assert!(!Arc::ptr_eq(&clients, &store.clients()));
        assert_eq!(*details, *store.details());
        assert_eq!(*clients, *store.clients());
    }

    #[test]
    fn soft_refresh_without_staged_republishes_current() {
        let store = TabDataStore::new();
        let details = store.details();

        store.soft_refresh();

        assert!(!Arc::ptr_eq(&details, &store.details()));
        assert_eq!(*store.details(), TabBundle::default());
    }

    fn numbered(n: u64) -> TabsPayload {
        let mut payload = payload(&format!("{n:08}"));
        payload.clients.data[0].id = n;
        payload
    }

    fn number(details: &TabBundle) -> u64 {
        details.name.parse().unwrap_or(0)
    }

    #[test]
    fn soft_refresh_never_republishes_older_payload() {
        const WRITES: u64 = 20_000;
        let store = TabDataStore::new();
        let done = AtomicBool::new(false);

        let regressions = std::thread::scope(|s| {
            s.spawn(|| {
                for n in 1..=WRITES {
                    store.apply(numbered(n));
                }
                done.store(true, Ordering::Release);
            });

            let refresher = s.spawn(|| {
                let mut regressions = 0_u32;
                while !done.load(Ordering::Acquire) {
                    let seen = number(&store.details());
                    store.soft_refresh();
                    if number(&store.details()) < seen {
                        regressions += 1;
                    }
                }
                regressions
            });
            refresher.join().unwrap()
        });

        assert_eq!(regressions, 0);
        assert_eq!(number(&store.details()), WRITES);
    }

    #[test]
    fn snapshot_pairs_come_from_one_write() {
        const WRITES: u64 = 20_000;
        let store = TabDataStore::new();
        let done = AtomicBool::new(false);

        std::thread::scope(|s| {
            s.spawn(|| {
                for n in 1..=WRITES {
                    store.apply(numbered(n));
                    if n % 3 == 0 {
                        store.soft_refresh();
                    }
                }
                done.store(true, Ordering::Release);
            });

            while !done.load(Ordering::Acquire) {
                let (details, clients) = store.snapshot();
                if let Some(client) = clients.data.first() {
                    assert_eq!(number(&details), client.id);
                }
            }
        });
    }

    #[tokio::test]
    async fn subscribers_see_each_publish() {
        let store = TabDataStore::new();
        let mut rx = store.subscribe_details();
        assert!(!rx.has_changed().unwrap());

        store.apply(payload("first"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().name, "first");

        store.soft_refresh();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().name, "first");
    }
}
