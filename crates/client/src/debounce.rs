//! Trailing-edge debouncer for search boxes.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Emits the last pushed value once no new value arrived for `delay`.
///
/// Must be created inside a Tokio runtime. Dropping it stops the timer task;
/// a pending value is discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: watch::Receiver<Option<T>>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(delay: Duration) -> Self {
        let (input, mut rx) = mpsc::unbounded_channel::<T>();
        let (tx, output) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => return,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => return,
                            },
                            _ = tokio::time::sleep(delay) => {
                                if tx.send(Some(value)).is_err() {
                                    return;
                                }
                            }
                        }
                    }
                }
            }
        });

        Self {
            input,
            output,
            task,
        }
    }

    pub fn push(&self, value: T) {
        // Only fails once the task is gone, i.e. during drop.
        let _ = self.input.send(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.output.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
