//! Display lifecycle for the news page.
//!
//! [`ViewController::mount`] enters [`ViewState::Loading`] and starts the one
//! and only fetch. When it settles the state moves to `Ready` or `Failed`
//! exactly once; nothing ever moves it back.
//!
//! The fetch task only holds a weak handle to the state, so dropping the
//! controller before the fetch settles simply discards the late result.

use crate::api::FetchNews;
use crate::error::NewsError;
use crate::models::NewsData;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Shown when the failure carries no recognizable error.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Failed { message: String },
    Ready(NewsData),
}

impl ViewState {
    fn settle(outcome: Result<NewsData, NewsError>) -> Self {
        match outcome {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed {
                message: e.to_string(),
            },
        }
    }
}

pub struct ViewController {
    state: Arc<Mutex<ViewState>>,
    task: Option<JoinHandle<()>>,
}

impl ViewController {
    /// Enter `Loading` and spawn the single fetch on the current runtime.
    pub fn mount<F>(fetcher: Arc<F>) -> Self
    where
        F: FetchNews + ?Sized + 'static,
    {
        let state = Arc::new(Mutex::new(ViewState::Loading));
        let weak = Arc::downgrade(&state);

        let task = tokio::spawn(async move {
            let outcome = fetcher.fetch().await;
            let Some(state) = weak.upgrade() else {
                debug!("View unmounted before fetch settled; discarding result");
                return;
            };
            let next = ViewState::settle(outcome);
            match &next {
                ViewState::Ready(data) => info!(
                    items = data.news_items.len(),
                    sources = data.sources.len(),
                    "View ready"
                ),
                ViewState::Failed { message } => error!(%message, "View failed"),
                ViewState::Loading => {}
            }
            *lock(&state) = next;
        });

        Self {
            state,
            task: Some(task),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        lock(&self.state).clone()
    }

    /// Wait for the fetch to settle and return the terminal state.
    ///
    /// If the fetch task itself died the view fails with
    /// [`UNKNOWN_ERROR_MESSAGE`], so `Loading` never outlives the fetch.
    pub async fn settled(&mut self) -> ViewState {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Fetch task did not complete");
                *lock(&self.state) = ViewState::Failed {
                    message: UNKNOWN_ERROR_MESSAGE.to_string(),
                };
            }
        }
        self.state()
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsItem;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    struct StubFetcher {
        outcome: Result<NewsData, NewsError>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubFetcher {
        fn new(outcome: Result<NewsData, NewsError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl FetchNews for StubFetcher {
        async fn fetch(&self) -> Result<NewsData, NewsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcome.clone()
        }
    }

    struct PanickingFetcher;

    #[async_trait]
    impl FetchNews for PanickingFetcher {
        async fn fetch(&self) -> Result<NewsData, NewsError> {
            panic!("fetch blew up");
        }
    }

    fn ready_data() -> NewsData {
        NewsData {
            news_items: vec![NewsItem {
                title: "T".to_string(),
                summary: "S".to_string(),
            }],
            sources: vec![],
        }
    }

    #[tokio::test]
    async fn test_starts_loading_and_becomes_ready() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(StubFetcher {
            gate: Some(gate.clone()),
            ..StubFetcher::new(Ok(ready_data()))
        });
        let mut view = ViewController::mount(fetcher.clone());
        assert_eq!(view.state(), ViewState::Loading);

        gate.notify_one();
        assert_eq!(view.settled().await, ViewState::Ready(ready_data()));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_carries_error_message() {
        let fetcher = Arc::new(StubFetcher::new(Err(NewsError::Upstream("boom".to_string()))));
        let mut view = ViewController::mount(fetcher);
        let state = view.settled().await;
        assert_eq!(
            state,
            ViewState::Failed {
                message: "Failed to fetch news: boom".to_string()
            }
        );
        assert!(!matches!(state, ViewState::Loading));
    }

    #[tokio::test]
    async fn test_panicking_fetch_fails_with_unknown_message() {
        let mut view = ViewController::mount(Arc::new(PanickingFetcher));
        assert_eq!(
            view.settled().await,
            ViewState::Failed {
                message: UNKNOWN_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_settled_is_idempotent() {
        let mut view = ViewController::mount(Arc::new(StubFetcher::new(Err(NewsError::Config))));
        let first = view.settled().await;
        let second = view.settled().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unmount_before_settle_discards_result() {
        let gate = Arc::new(Notify::new());
        let fetcher = Arc::new(StubFetcher {
            gate: Some(gate.clone()),
            ..StubFetcher::new(Ok(ready_data()))
        });
        let mut view = ViewController::mount(fetcher.clone());
        let task = view.task.take().unwrap();
        drop(view);

        gate.notify_one();
        task.await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }
}
