// ── Single-slot subscription management ──
//
// A `SubscriptionSlot` owns at most one live periodic task. Replacing or
// cancelling goes through the slot, so a handle can never be leaked or
// cancelled twice.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Process-unique identifier of a subscription handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    /// Allocate the next identifier.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Anything a [`SubscriptionSlot`] can hold.
///
/// `cancel` consumes the handle, so it runs at most once per handle.
pub trait Subscription {
    fn id(&self) -> HandleId;
    fn cancel(self);
}

/// A spawned periodic task plus the token that stops it.
#[derive(Debug)]
pub struct SubscriptionHandle {
    id: HandleId,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    /// Spawn `task` on the current tokio runtime. The task receives the
    /// handle's cancellation token and must stop once it fires.
    pub fn spawn<F, Fut>(task: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let task = tokio::spawn(task(token.clone()));
        Self {
            id: HandleId::next(),
            token,
            task,
        }
    }

    /// A clone of the cancellation token, for observing cancellation from
    /// outside the slot.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_canceled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Subscription for SubscriptionHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn cancel(self) {
        self.token.cancel();
        self.task.abort();
    }
}

/// Holds zero or one live subscription.
pub struct SubscriptionSlot<H: Subscription = SubscriptionHandle> {
    current: Option<H>,
}

impl<H: Subscription> SubscriptionSlot<H> {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Cancel the live handle, if any. Returns whether one was cancelled;
    /// an empty slot is a no-op.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel the live handle, then store the one `factory` produces.
    pub fn replace(&mut self, factory: impl FnOnce() -> H) -> HandleId {
        self.cancel();
        let handle = factory();
        let id = handle.id();
        self.current = Some(handle);
        id
    }

    pub fn current(&self) -> Option<&H> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<HandleId> {
        self.current.as_ref().map(Subscription::id)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}

impl<H: Subscription> Default for SubscriptionSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Subscription> Drop for SubscriptionSlot<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}
