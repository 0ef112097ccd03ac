use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

type Callback<T> = Arc<dyn Fn(T) + Send + Sync>;

struct State<T> {
    value: Option<T>,
    timer: Option<JoinHandle<()>>,
    epoch: u64,
}

struct Inner<T> {
    delay: Duration,
    callback: Callback<T>,
    state: Mutex<State<T>>,
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Trailing-edge debounced callback
///
/// Each [`Debounced::call`] restarts the quiet-period timer. When `delay`
/// elapses without another call, the callback runs once with the most
/// recent value. Clones share the same timer.
///
/// Timers are tokio tasks, so calls must happen inside a runtime.
pub struct Debounced<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Debounced<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Wrap `callback` so it only fires after `delay` of quiet
pub fn debounce<T, F>(delay: Duration, callback: F) -> Debounced<T>
where
    T: Send + 'static,
    F: Fn(T) + Send + Sync + 'static,
{
    Debounced {
        inner: Arc::new(Inner {
            delay,
            callback: Arc::new(callback),
            state: Mutex::new(State {
                value: None,
                timer: None,
                epoch: 0,
            }),
        }),
    }
}

impl<T: Send + 'static> Debounced<T> {
    /// Record `value` and restart the timer
    pub fn call(&self, value: T) {
        let mut state = self.inner.lock();
        state.value = Some(value);
        state.epoch = state.epoch.wrapping_add(1);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        let epoch = state.epoch;
        let inner = Arc::clone(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            let value = {
                let mut state = inner.lock();
                // A newer call may have landed between wake-up and lock
                if state.epoch != epoch {
                    return;
                }
                state.timer = None;
                state.value.take()
            };
            if let Some(value) = value {
                (inner.callback)(value);
            }
        }));
    }

    /// Run the pending call immediately, if any
    pub fn flush(&self) {
        let value = {
            let mut state = self.inner.lock();
            state.epoch = state.epoch.wrapping_add(1);
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            state.value.take()
        };
        if let Some(value) = value {
            (self.inner.callback)(value);
        }
    }

    /// Drop the pending call without running it
    pub fn cancel(&self) {
        let mut state = self.inner.lock();
        state.epoch = state.epoch.wrapping_add(1);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.value = None;
    }

    pub fn is_pending(&self) -> bool {
        self.inner.lock().value.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}
