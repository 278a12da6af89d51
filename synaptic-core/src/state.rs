//! System state and its overwatch
//!
//! Two orthogonal lifecycle axes plus a pub/sub broadcaster. A state
//! mutation and the notification of its observers form one atomic unit:
//! observers are invoked synchronously, in subscription order, while the
//! state lock is still held, so no two mutations' notifications interleave
//! and no observer sees a stale state after its notification.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::debug;

/// Lifecycle of the execution machinery (tasking, pipeline stages)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeState {
    #[default]
    Idle,
    Running,
    Error,
    Shutdown,
}

/// Lifecycle of the application as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplicationState {
    #[default]
    Idle,
    Running,
    Error,
    Shutdown,
}

/// The two lifecycle axes, mutated independently of each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemState {
    pub runtime: RuntimeState,
    pub application: ApplicationState,
}

type Observer = Box<dyn Fn(SystemState) + Send + Sync>;

struct Registered {
    id: u64,
    observer: Observer,
}

/// State holder and change broadcaster
///
/// Observers run on the caller's thread; a slow observer blocks the
/// updating caller. Observers must not call [`StateOverwatch::update`]
/// from inside a notification.
pub struct StateOverwatch {
    state: Mutex<SystemState>,
    observers: Mutex<Vec<Arc<Registered>>>,
    next_id: AtomicU64,
}

impl StateOverwatch {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SystemState::default()),
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    //  poisoning carries no invariant here, recover the guard
    fn state_lock(&self) -> MutexGuard<'_, SystemState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn observers_lock(&self) -> MutexGuard<'_, Vec<Arc<Registered>>> {
        self.observers.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Current state snapshot
    pub fn read(&self) -> SystemState {
        *self.state_lock()
    }

    pub fn runtime(&self) -> RuntimeState {
        self.read().runtime
    }

    pub fn application(&self) -> ApplicationState {
        self.read().application
    }

    /// Mutate the state and notify every observer as one atomic unit
    pub fn update(&self, mutator: impl FnOnce(&mut SystemState)) {
        let mut state = self.state_lock();
        mutator(&mut state);
        let snapshot = *state;
        debug!(
            target: "synaptic::hub",
            runtime = ?snapshot.runtime,
            application = ?snapshot.application,
            "state updated"
        );
        self.notify_locked(snapshot);
    }

    /// Set only the runtime axis
    pub fn set_runtime(&self, value: RuntimeState) {
        self.update(|s| s.runtime = value);
    }

    /// Set only the application axis
    pub fn set_application(&self, value: ApplicationState) {
        self.update(|s| s.application = value);
    }

    /// Re-broadcast the current state without mutating it
    pub fn notify(&self) {
        let state = self.state_lock();
        let snapshot = *state;
        self.notify_locked(snapshot);
    }

    //  caller holds the state lock; snapshot the observer list so an
    //  observer may dispose its own subscription mid-notification
    fn notify_locked(&self, snapshot: SystemState) {
        let current: Vec<Arc<Registered>> = self.observers_lock().clone();
        for registered in current {
            (registered.observer)(snapshot);
        }
    }

    /// Register an observer, returning its unsubscribe handle
    pub fn subscribe(
        self: &Arc<Self>,
        observer: impl Fn(SystemState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers_lock().push(Arc::new(Registered {
            id,
            observer: Box::new(observer),
        }));
        Subscription {
            id,
            overwatch: Arc::downgrade(self),
            disposed: AtomicBool::new(false),
        }
    }

    fn unsubscribe(&self, id: u64) {
        self.observers_lock().retain(|r| r.id != id);
    }
}

impl Default for StateOverwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Unsubscribe handle returned by [`StateOverwatch::subscribe`]
///
/// `dispose` is idempotent and safe under concurrent disposal; dropping
/// the handle without disposing leaves the observer registered.
pub struct Subscription {
    id: u64,
    overwatch: Weak<StateOverwatch>,
    disposed: AtomicBool,
}

impl Subscription {
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(overwatch) = self.overwatch.upgrade() {
            overwatch.unsubscribe(self.id);
        }
    }
}
