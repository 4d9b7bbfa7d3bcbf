//! Async-operation runner: loading/error bookkeeping around one API call.
//!
//! A screen owns one [`AsyncOperation`] and routes its calls through
//! [`AsyncOperation::execute`]:
//!
//! - loading is raised before the call and always lowered afterwards
//!   (an RAII guard, so early returns and cancellation can't leave it stuck)
//! - a 401 triggers the process-wide [`LogoutHook`] and is *not* surfaced as
//!   an inline error; the caller gets [`Outcome::SessionExpired`]
//! - any other failure is recorded, passed to `on_error`, and returned
//! - tearing the screen down (`cancel`) drops the in-flight call; late
//!   results never reach state or callbacks
//!
//! Calls sharing one runner are not queued. Overlapping calls race on the
//! shared state and the last one to finish wins; screens that need ordering
//! must debounce their triggers.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use bloodbank_core::{ApiError, ApiResult};

/// Process-wide reaction to "the server no longer accepts our credentials".
pub trait LogoutHook: Send + Sync {
    fn force_logout(&self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationState {
    pub loading: bool,
    pub error: Option<String>,
}

/// How an `execute` call ended, when it didn't fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    /// The server answered 401; the session has been torn down.
    SessionExpired,
    /// The runner was cancelled before the call finished.
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::SessionExpired => Outcome::SessionExpired,
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}

type SuccessCallback<T> = Box<dyn FnOnce(&T) + Send>;
type ErrorCallback = Box<dyn FnOnce(&ApiError) + Send>;

pub struct ExecuteOptions<T> {
    show_loading: bool,
    show_error: bool,
    on_success: Option<SuccessCallback<T>>,
    on_error: Option<ErrorCallback>,
}

impl<T> Default for ExecuteOptions<T> {
    fn default() -> Self {
        Self {
            show_loading: true,
            show_error: true,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> ExecuteOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Background refresh: touch neither loading nor error state.
    pub fn silent() -> Self {
        Self {
            show_loading: false,
            show_error: false,
            ..Self::default()
        }
    }

    pub fn show_loading(mut self, show: bool) -> Self {
        self.show_loading = show;
        self
    }

    pub fn show_error(mut self, show: bool) -> Self {
        self.show_error = show;
        self
    }

    pub fn on_success(mut self, f: impl FnOnce(&T) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(&ApiError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// Lowers `loading` when dropped.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<OperationState>,
}

impl<'a> LoadingGuard<'a> {
    fn engage(state: &'a watch::Sender<OperationState>) -> Self {
        state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.loading = false);
    }
}

#[derive(Clone)]
pub struct AsyncOperation {
    state: Arc<watch::Sender<OperationState>>,
    logout: Arc<dyn LogoutHook>,
    cancel: CancellationToken,
}

impl core::fmt::Debug for AsyncOperation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AsyncOperation")
            .field("state", &*self.state.borrow())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl AsyncOperation {
    pub fn new(logout: Arc<dyn LogoutHook>) -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self {
            state: Arc::new(state),
            logout,
            cancel: CancellationToken::new(),
        }
    }

    /// A runner with its own state whose cancellation follows this one.
    pub fn child(&self) -> Self {
        let (state, _) = watch::channel(OperationState::default());
        Self {
            state: Arc::new(state),
            logout: self.logout.clone(),
            cancel: self.cancel.child_token(),
        }
    }

    pub fn state(&self) -> OperationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Signal teardown. In-flight and future calls resolve as `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub async fn execute<T, F, Fut>(
        &self,
        operation: F,
        options: ExecuteOptions<T>,
    ) -> ApiResult<Outcome<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        if self.cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        let ExecuteOptions {
            show_loading,
            show_error,
            on_success,
            on_error,
        } = options;

        let _loading = show_loading.then(|| LoadingGuard::engage(&self.state));

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::debug!("operation cancelled while in flight");
                return Ok(Outcome::Cancelled);
            }
            result = operation() => result,
        };

        match result {
            Ok(value) => {
                if let Some(on_success) = on_success {
                    on_success(&value);
                }
                Ok(Outcome::Completed(value))
            }
            Err(err) if err.is_unauthorized() => {
                self.logout.force_logout();
                Ok(Outcome::SessionExpired)
            }
            Err(err) => {
                tracing::debug!(status = ?err.status(), "operation failed: {err}");
                if show_error {
                    self.state.send_modify(|s| s.error = Some(err.message().to_string()));
                }
                if let Some(on_error) = on_error {
                    on_error(&err);
                }
                Err(err)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct CountingLogout(AtomicUsize);

    impl LogoutHook for CountingLogout {
        fn force_logout(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn runner() -> (AsyncOperation, Arc<CountingLogout>) {
        let hook = Arc::new(CountingLogout::default());
        (AsyncOperation::new(hook.clone()), hook)
    }

    #[tokio::test]
    async fn success_returns_value_and_calls_back() {
        let (op, _) = runner();
        let seen = Arc::new(Mutex::new(None));
        let seen_cb = seen.clone();

        let outcome = op
            .execute(
                || async { Ok::<_, ApiError>(42) },
                ExecuteOptions::new().on_success(move |v| *seen_cb.lock().unwrap() = Some(*v)),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Completed(42));
        assert_eq!(*seen.lock().unwrap(), Some(42));
        assert_eq!(op.state(), OperationState::default());
    }

    #[tokio::test]
    async fn loading_is_raised_during_the_call() {
        let (op, _) = runner();
        let rx = op.subscribe();

        let outcome = op
            .execute(
                || async move {
                    assert!(rx.borrow().loading);
                    Ok::<_, ApiError>(())
                },
                ExecuteOptions::new(),
            )
            .await
            .unwrap();

        assert!(outcome.is_completed());
        assert!(!op.state().loading);
    }

    #[tokio::test]
    async fn unauthorized_logs_out_without_error_state() {
        let (op, hook) = runner();
        let on_error_called = Arc::new(AtomicUsize::new(0));
        let counter = on_error_called.clone();

        let outcome = op
            .execute(
                || async { Err::<(), _>(ApiError::from_status(401, None)) },
                ExecuteOptions::new().on_error(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::SessionExpired);
        assert_eq!(hook.0.load(Ordering::SeqCst), 1);
        assert_eq!(on_error_called.load(Ordering::SeqCst), 0);
        assert_eq!(op.state().error, None);
        assert!(!op.state().loading);
    }

    #[tokio::test]
    async fn other_errors_are_recorded_and_returned() {
        let (op, hook) = runner();
        let seen = Arc::new(Mutex::new(None));
        let seen_cb = seen.clone();

        let err = op
            .execute(
                || async { Err::<(), _>(ApiError::rejected(422, "Donor is not eligible yet")) },
                ExecuteOptions::new().on_error(move |e| *seen_cb.lock().unwrap() = Some(e.clone())),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(op.state().error.as_deref(), Some("Donor is not eligible yet"));
        assert_eq!(seen.lock().unwrap().as_ref(), Some(&err));
        assert_eq!(hook.0.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn show_error_false_keeps_state_clean() {
        let (op, _) = runner();
        let result = op
            .execute(
                || async { Err::<(), _>(ApiError::network("")) },
                ExecuteOptions::new().show_error(false),
            )
            .await;

        assert_eq!(result.unwrap_err().message(), bloodbank_core::DEFAULT_ERROR_MESSAGE);
        assert_eq!(op.state().error, None);
    }

    #[tokio::test]
    async fn new_call_clears_previous_error() {
        let (op, _) = runner();
        let _ = op
            .execute(
                || async { Err::<(), _>(ApiError::rejected(400, "bad")) },
                ExecuteOptions::new(),
            )
            .await;
        assert!(op.state().error.is_some());

        op.execute(|| async { Ok::<_, ApiError>(()) }, ExecuteOptions::new())
            .await
            .unwrap();
        assert_eq!(op.state().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_in_flight_result() {
        let (op, _) = runner();
        let callback_ran = Arc::new(AtomicUsize::new(0));
        let counter = callback_ran.clone();

        let canceller = op.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let outcome = op
            .execute(
                || async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok::<_, ApiError>("late")
                },
                ExecuteOptions::new().on_success(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(callback_ran.load(Ordering::SeqCst), 0);
        assert!(!op.state().loading);

        let again = op
            .execute(|| async { Ok::<_, ApiError>("fresh") }, ExecuteOptions::new())
            .await
            .unwrap();
        assert_eq!(again, Outcome::Cancelled);
    }

    #[tokio::test]
    async fn cancelling_parent_cancels_children_only_downwards() {
        let (root, _) = runner();
        let screen = root.child();

        screen.cancel();
        assert!(screen.is_cancelled());
        assert!(!root.is_cancelled());

        let other = root.child();
        root.cancel();
        assert!(other.is_cancelled());
    }
}
