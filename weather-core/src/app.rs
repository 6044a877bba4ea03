//! Runtime around the reducer.
//!
//! `WeatherApp` owns the state, executes effects and feeds their outcomes
//! back in. Lookups run as spawned tasks and report through an action
//! channel, so several may be in flight at once; the generation check in
//! [`reduce`] keeps only the newest.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    history::HistoryStore,
    provider::{WeatherProvider, fetch_report},
    state::{Action, Effect, UiState, reduce},
};

#[derive(Debug)]
pub struct WeatherApp {
    state: UiState,
    provider: Arc<dyn WeatherProvider>,
    history: Box<dyn HistoryStore>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl WeatherApp {
    pub fn new(provider: Arc<dyn WeatherProvider>, history: Box<dyn HistoryStore>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            state: UiState::default(),
            provider,
            history,
            action_tx,
            action_rx,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Restore persisted history. If there is any, the most recent city is
    /// put in the search box and looked up; call [`Self::settle`] to wait.
    pub fn start(&mut self) {
        let history = self.history.load();
        tracing::debug!(entries = history.len(), "restored search history");
        self.dispatch(Action::HistoryDidLoad(history));
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(Action::QueryChange(query.into()));
    }

    /// Start a lookup for `city`, or for the current query when `None`.
    /// Blank input does nothing.
    pub fn submit(&mut self, city: Option<String>) {
        self.dispatch(Action::SearchSubmit(city));
    }

    /// Submit and wait for the outcome.
    pub async fn search(&mut self, city: Option<String>) -> &UiState {
        self.submit(city);
        self.settle().await;
        &self.state
    }

    /// Process lookup results until no lookup is pending.
    ///
    /// Every spawned lookup answers exactly once, even if the provider
    /// panics, so this always returns once the newest lookup has resolved.
    pub async fn settle(&mut self) {
        while self.state.is_loading {
            // `self` holds a sender, so the channel never closes here.
            let Some(action) = self.action_rx.recv().await else {
                break;
            };
            self.dispatch(action);
        }
    }

    /// Process results that have already arrived without waiting for more.
    ///
    /// Non-blocking counterpart of [`Self::settle`] for front ends that run
    /// their own event loop and poll between frames.
    pub fn pump(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(action = %action.summary(), "dispatch");

        let (state, effects) = reduce(std::mem::take(&mut self.state), action);
        self.state = state;

        for effect in effects {
            self.handle_effect(effect);
        }
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchWeather { city, generation } => {
                let provider = Arc::clone(&self.provider);
                let action_tx = self.action_tx.clone();

                tokio::spawn(async move {
                    // The lookup runs in its own task so a panic inside the
                    // provider still ends in a result action.
                    let lookup = tokio::spawn({
                        let city = city.clone();
                        async move { fetch_report(provider.as_ref(), &city).await }
                    });

                    let action = match lookup.await {
                        Ok(Ok(report)) => Action::WeatherDidLoad {
                            generation,
                            city,
                            report,
                        },
                        Ok(Err(err)) => {
                            tracing::warn!(%city, error = %err, "weather lookup failed");
                            Action::WeatherDidError { generation, city }
                        }
                        Err(err) => {
                            tracing::error!(%city, error = %err, "weather lookup aborted");
                            Action::WeatherDidError { generation, city }
                        }
                    };

                    // Receiver only goes away with the app itself.
                    let _ = action_tx.send(action);
                });
            }
            Effect::PersistHistory(history) => {
                if let Err(err) = self.history.save(&history) {
                    tracing::warn!(error = %err, "failed to persist search history");
                }
            }
        }
    }
}
