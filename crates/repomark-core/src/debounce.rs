//! Debounced value propagation.
//!
//! [`debounce`] turns a rapidly changing input into an output that only
//! updates once the input has been stable for a configured delay. The
//! output side is a [`watch`] channel, so consumers always observe the
//! latest settled value and intermediate values are never emitted.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, sleep_until};

/// Input handle of a debounced channel.
///
/// Dropping every handle tears the worker down; a value still waiting out
/// its delay is discarded, never emitted.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Debouncer<T> {
    /// Push a new input value, restarting the delay window.
    pub fn push(&self, value: T) {
        // Fails only when the worker is gone, in which case nobody is
        // listening for the value either.
        let _ = self.tx.send(value);
    }
}

/// Create a debounced channel seeded with `initial`.
///
/// The returned receiver observes `initial` immediately, then the most
/// recent pushed value once the input has been quiet for `delay`. Pushing
/// a value equal to the one already pending or emitted does not restart
/// the window.
#[must_use]
pub fn debounce<T>(initial: T, delay: Duration) -> (Debouncer<T>, watch::Receiver<T>)
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let (in_tx, mut in_rx) = mpsc::unbounded_channel::<T>();
    let (out_tx, out_rx) = watch::channel(initial);

    tokio::spawn(async move {
        let mut pending: Option<(T, Instant)> = None;
        loop {
            match pending.take() {
                None => match in_rx.recv().await {
                    Some(value) => {
                        let changed = *out_tx.borrow() != value;
                        if changed {
                            pending = Some((value, Instant::now() + delay));
                        }
                    }
                    None => break,
                },
                Some((value, deadline)) => {
                    tokio::select! {
                        () = sleep_until(deadline) => {
                            let changed = *out_tx.borrow() != value;
                            if changed && out_tx.send(value).is_err() {
                                break;
                            }
                        }
                        next = in_rx.recv() => match next {
                            Some(next) => {
                                if next == value {
                                    pending = Some((value, deadline));
                                } else {
                                    pending = Some((next, Instant::now() + delay));
                                }
                            }
                            // Input dropped: the pending value is discarded.
                            None => break,
                        },
                    }
                }
            }
        }
    });

    (Debouncer { tx: in_tx }, out_rx)
}
