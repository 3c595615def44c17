//! Cancellation signals for long-running walks.
//!
//! A [`CancelSignal`] is the read side: it can be polled with
//! [`CancelSignal::is_cancelled`] or observed through callbacks. The paired
//! [`Canceller`] is the write side. Both are cheap to clone and can be moved
//! across threads.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle, Thread};
use std::time::{Duration, Instant};

type Callback = Box<dyn FnOnce() + Send>;

/// Handle returned by [`CancelSignal::on_cancelled`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    subscribers: Mutex<Subscribers>,
    timers: Mutex<Vec<Thread>>,
}

impl Inner {
    fn subscribers(&self) -> MutexGuard<'_, Subscribers> {
        // A panicking subscriber never runs while the lock is held
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn add_timer(&self, timer: Thread) {
        self.timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(timer);
    }

    fn wake_timers(&self) {
        let timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);
        for timer in timers.iter() {
            timer.unpark();
        }
    }
}

impl Drop for Inner {
    // Pending timers exit once nobody can observe the signal
    fn drop(&mut self) {
        let timers = self.timers.get_mut().unwrap_or_else(PoisonError::into_inner);
        for timer in timers.drain(..) {
            timer.unpark();
        }
    }
}

/// Read side of a cancellation pair.
#[derive(Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

/// Write side of a cancellation pair.
#[derive(Clone)]
pub struct Canceller {
    inner: Arc<Inner>,
}

impl CancelSignal {
    /// Creates a fresh, uncancelled signal and its canceller.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (CancelSignal, Canceller) {
        let inner = Arc::new(Inner::default());
        (
            CancelSignal {
                inner: Arc::clone(&inner),
            },
            Canceller { inner },
        )
    }

    /// Creates a signal that cancels itself once `timeout` has elapsed.
    ///
    /// The timer thread exits as soon as every handle to the signal is dropped.
    pub fn with_timeout(timeout: Duration) -> CancelSignal {
        let (signal, canceller) = CancelSignal::new();
        canceller.cancel_after(timeout);
        signal
    }

    /// Returns true once the paired canceller has fired.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Registers a callback to run on cancellation.
    ///
    /// If the signal is already cancelled the callback runs immediately on the
    /// calling thread.
    pub fn on_cancelled<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnOnce() + Send + 'static,
    {
        let mut subscribers = self.inner.subscribers();
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        if self.is_cancelled() {
            drop(subscribers);
            callback();
        } else {
            subscribers.callbacks.push((id, Box::new(callback)));
        }
        id
    }

    /// Removes a callback registered with [`CancelSignal::on_cancelled`].
    pub fn clear_on_cancelled(&self, id: SubscriptionId) {
        self.inner
            .subscribers()
            .callbacks
            .retain(|(existing, _)| *existing != id);
    }
}

impl Canceller {
    /// Cancels the signal and runs every registered callback once.
    ///
    /// Calling it again is a no-op. A panicking callback does not prevent the
    /// remaining callbacks from running.
    pub fn cancel(&self) {
        let callbacks = {
            let mut subscribers = self.inner.subscribers();
            if self.inner.cancelled.swap(true, Ordering::AcqRel) {
                return;
            }
            std::mem::take(&mut subscribers.callbacks)
        };
        self.inner.wake_timers();

        log::debug!("cancelling signal with {} subscriber(s)", callbacks.len());
        for (_, callback) in callbacks {
            if panic::catch_unwind(AssertUnwindSafe(callback)).is_err() {
                log::warn!("cancel subscriber panicked");
            }
        }
    }

    /// Cancels the signal once `timeout` has elapsed.
    ///
    /// The timer thread only holds a weak reference. It returns early when the
    /// signal is cancelled by other means or when every handle is dropped.
    pub fn cancel_after(&self, timeout: Duration) -> JoinHandle<()> {
        let deadline = Instant::now() + timeout;
        let weak = Arc::downgrade(&self.inner);
        thread::spawn(move || run_timer(weak, deadline))
    }

    /// The signal this canceller controls.
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn run_timer(weak: Weak<Inner>, deadline: Instant) {
    match weak.upgrade() {
        Some(inner) => inner.add_timer(thread::current()),
        None => return,
    }
    loop {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        if inner.cancelled.load(Ordering::Acquire) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            Canceller { inner }.cancel();
            return;
        }
        drop(inner);
        thread::park_timeout(deadline - now);
    }
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
