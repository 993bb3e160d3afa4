//! Input-settling debouncer for text filters.
//!
//! Collapses a burst of rapidly changing values into one callback fired
//! after the input has been idle for the configured window. Only the
//! most recent value survives a burst; earlier pending values are
//! discarded, not queued.

use std::time::Duration;

use tokio::sync::mpsc;

/// Default settling window for filter text input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Latest-value-wins settling timer.
///
/// Dropping the debouncer cancels any pending value.
#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the settling task. `on_settled` fires once per idle window
    /// with the most recent submitted value.
    pub fn new<F>(delay: Duration, on_settled: F) -> Self
    where
        F: Fn(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut latest = first;
                loop {
                    let timer = tokio::time::sleep(delay);
                    tokio::pin!(timer);
                    tokio::select! {
                        next = rx.recv() => match next {
                            // A newer value restarts the window; the
                            // earlier pending value is discarded.
                            Some(newer) => latest = newer,
                            None => return,
                        },
                        _ = &mut timer => {
                            on_settled(latest);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx }
    }

    /// Submit a new input value, restarting the settling window.
    pub fn submit(&self, value: T) {
        // Send only fails when the task is gone, which means the
        // debouncer owner no longer cares about the value.
        let _ = self.tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn only_the_latest_value_of_a_burst_settles() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer =
            Debouncer::new(DEFAULT_DEBOUNCE, move |value: String| {
                sink.lock().push(value);
            });

        debouncer.submit("A".to_string());
        debouncer.submit("Ah".to_string());
        debouncer.submit("Ahmet".to_string());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*seen.lock(), vec!["Ahmet".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_idle_windows_each_settle() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer =
            Debouncer::new(DEFAULT_DEBOUNCE, move |value: &str| {
                sink.lock().push(value.to_string());
            });

        debouncer.submit("12");
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.submit("123");
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(*seen.lock(), vec!["12".to_string(), "123".to_string()]);
    }
}
