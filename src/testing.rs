//! Scripted transports for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::{TransportError, TransportResult};
use crate::protocol::Params;
use crate::protocol::methods::player;
use crate::transport::{DuplexTransport, NotificationHandler, Transport};

type Responder = Box<dyn Fn(&str) -> TransportResult<Value> + Send + Sync>;

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub method: String,
    pub params: Value,
}

/// Records calls and answers them with a responder closure.
pub(crate) struct MockTransport {
    responder: Responder,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new(
        responder: impl Fn(&str) -> TransportResult<Value> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Answers `Player.GetActivePlayers` with `count` audio players and
    /// everything else with `"OK"`.
    pub fn with_players(count: i64) -> Arc<Self> {
        Self::new(move |method| {
            if method == player::GET_ACTIVE_PLAYERS {
                let players: Vec<Value> = (0..count)
                    .map(|id| json!({"playerid": id, "playertype": "internal", "type": "audio"}))
                    .collect();
                Ok(Value::Array(players))
            } else {
                Ok(json!("OK"))
            }
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.method.clone()).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn invoke(&self, method: &str, params: Params) -> TransportResult<Value> {
        let params = serde_json::to_value(&params)?;
        self.calls.lock().push(Call {
            method: method.to_string(),
            params,
        });
        (self.responder)(method)
    }
}

/// Duplex double counting handshakes and closes.
pub(crate) struct MockDuplex {
    inner: Arc<MockTransport>,
    live: AtomicBool,
    fail_open: bool,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub handler: Mutex<Option<NotificationHandler>>,
}

impl MockDuplex {
    pub fn new(inner: Arc<MockTransport>) -> Arc<Self> {
        Self::build(inner, false)
    }

    pub fn failing() -> Arc<Self> {
        Self::build(MockTransport::with_players(0), true)
    }

    fn build(inner: Arc<MockTransport>, fail_open: bool) -> Arc<Self> {
        Arc::new(Self {
            inner,
            live: AtomicBool::new(false),
            fail_open,
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            handler: Mutex::new(None),
        })
    }

    /// Simulates a remote hang-up.
    pub fn drop_link(&self) {
        self.live.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for MockDuplex {
    async fn invoke(&self, method: &str, params: Params) -> TransportResult<Value> {
        if !self.live.load(Ordering::SeqCst) {
            return Err(TransportError::NotConnected);
        }
        self.inner.invoke(method, params).await
    }
}

#[async_trait]
impl DuplexTransport for MockDuplex {
    async fn open(&self) -> TransportResult<()> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            return Err(TransportError::ConnectionClosed);
        }
        self.live.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.live.store(false, Ordering::SeqCst);
    }

    fn set_notification_handler(&self, handler: NotificationHandler) {
        *self.handler.lock() = Some(handler);
    }

    fn clear_notification_handler(&self) {
        *self.handler.lock() = None;
    }
}
