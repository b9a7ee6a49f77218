//! # Mock Provider
//!
//! A scriptable in-memory implementation of the injected-provider port.
//! Responses are queued per method; unscripted methods fall back to sensible
//! defaults (no accounts, Sepolia chain, successful switches) so happy-path
//! tests only script what they care about.

use crate::errors::RpcError;
use crate::provider::{methods, InjectedProvider, ProviderEvent};
use crate::EVENT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::debug;

type ScriptedResponse = Result<Value, RpcError>;

/// Scriptable injected provider for tests and demos.
pub struct MockProvider {
    responses: Mutex<HashMap<String, VecDeque<ScriptedResponse>>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl MockProvider {
    /// Creates a provider with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            responses: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Queues the next response for `method`. Queued responses are consumed
    /// in FIFO order before any default applies.
    pub fn enqueue(&self, method: &str, response: ScriptedResponse) {
        lock(&self.responses)
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    /// Delays every response for `method`, for exercising in-flight and
    /// timeout behavior.
    pub fn set_delay(&self, method: &str, delay: Duration) {
        lock(&self.delays).insert(method.to_string(), delay);
    }

    /// Number of requests observed for `method`.
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        lock(&self.calls).iter().filter(|m| *m == method).count()
    }

    /// Emits a provider-side event to every subscriber. Returns the number
    /// of receivers that observed it.
    pub fn emit(&self, event: ProviderEvent) -> usize {
        self.events.send(event).unwrap_or(0)
    }

    fn default_response(method: &str) -> ScriptedResponse {
        match method {
            methods::ACCOUNTS => Ok(json!([])),
            methods::CHAIN_ID => Ok(json!("0xaa36a7")),
            methods::SWITCH_CHAIN | methods::ADD_CHAIN => Ok(Value::Null),
            other => Err(RpcError::new(
                -32601,
                format!("no scripted response for {other}"),
            )),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InjectedProvider for MockProvider {
    async fn request(&self, method: &str, _params: Value) -> Result<Value, RpcError> {
        lock(&self.calls).push(method.to_string());

        let delay = lock(&self.delays).get(method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.responses)
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        let response = scripted.unwrap_or_else(|| Self::default_response(method));
        debug!(method, ok = response.is_ok(), "Mock provider request");
        response
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

// Poisoned locks only happen after a panicking test; recover the data.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
