//! WebSocket link and event loop.
//!
//! Handles the persistent connection to Kodi's WebSocket endpoint, including
//! request/response correlation and notification routing.
//!
//! # Event Loop
//!
//! Opening the link spawns a tokio task that handles:
//!
//! - Incoming messages from Kodi (responses, notifications)
//! - Outgoing requests from the Rust API
//! - Request/response correlation by UUID
//! - Notification handler callbacks
//!
//! When the task ends (remote close, socket error, shutdown) the link is
//! marked dead and every pending request fails with
//! [`TransportError::ConnectionClosed`].

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, from_str, to_string};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request as HandshakeRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, trace, warn};

use crate::error::{TransportError, TransportResult};
use crate::identifiers::RequestId;
use crate::protocol::{Notification, Params, Request, Response};

use super::{Credentials, DuplexTransport, NotificationHandler, Transport};

// ============================================================================
// Constants
// ============================================================================

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

// ============================================================================
// Types
// ============================================================================

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Map of request IDs to response channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<TransportResult<Response>>>;

/// Notification callback as held by the event loop.
type HandlerFn = Arc<dyn Fn(Notification) + Send + Sync>;

/// Shared, replaceable notification callback.
type SharedHandler = Arc<Mutex<Option<HandlerFn>>>;

// ============================================================================
// LinkCommand
// ============================================================================

/// Internal commands for the event loop.
enum LinkCommand {
    /// Send a request and wait for response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<TransportResult<Response>>,
    },
    /// Remove a timed-out correlation entry.
    RemoveCorrelation(RequestId),
    /// Close the socket and stop the loop.
    Shutdown,
}

// ============================================================================
// Link
// ============================================================================

/// Handle to one established socket and its event loop.
#[derive(Clone)]
struct Link {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<LinkCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Cleared by the event loop when it terminates.
    alive: Arc<AtomicBool>,
}

impl Link {
    /// Spawns the event loop for an established socket.
    fn spawn(ws_stream: WsStream, handler: SharedHandler) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let alive = Arc::new(AtomicBool::new(true));

        tokio::spawn(run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
            handler,
            Arc::clone(&alive),
        ));

        Self {
            command_tx,
            correlation,
            alive,
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire) && !self.command_tx.is_closed()
    }

    fn shutdown(&self) {
        let _ = self.command_tx.send(LinkCommand::Shutdown);
    }
}

// ============================================================================
// WsTransport
// ============================================================================

/// JSON-RPC over a persistent WebSocket.
///
/// # Thread Safety
///
/// `WsTransport` is `Send + Sync`; once open, calls may be issued
/// concurrently and are correlated by request id.
pub struct WsTransport {
    /// `ws://` or `wss://` endpoint URL.
    url: String,
    /// Basic credentials sent with the upgrade request.
    credentials: Option<Credentials>,
    /// Handshake and per-request timeout.
    timeout: Duration,
    /// Current link, if opened.
    link: Mutex<Option<Link>>,
    /// Notification handler (shared with the event loop).
    handler: SharedHandler,
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport")
            .field("url", &self.url)
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

impl WsTransport {
    /// Creates an unopened transport for `url`.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Self {
        Self {
            url: url.into(),
            credentials,
            timeout,
            link: Mutex::new(None),
            handler: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the endpoint URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the number of requests awaiting a response.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.link
            .lock()
            .as_ref()
            .map_or(0, |link| link.correlation.lock().len())
    }

    #[inline]
    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Builds the upgrade request, with Basic credentials if configured.
    fn handshake_request(&self) -> TransportResult<HandshakeRequest> {
        let mut request = self.url.as_str().into_client_request()?;

        if let Some(credentials) = &self.credentials {
            let value = HeaderValue::from_str(&credentials.basic_header())
                .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        Ok(request)
    }

    /// Returns the current link if it is still alive.
    fn live_link(&self) -> TransportResult<Link> {
        let link = self.link.lock().clone();
        match link {
            Some(link) if link.is_alive() => Ok(link),
            Some(_) => Err(TransportError::ConnectionClosed),
            None => Err(TransportError::NotConnected),
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn invoke(&self, method: &str, params: Params) -> TransportResult<Value> {
        let link = self.live_link()?;

        {
            let pending = link.correlation.lock().len();
            if pending >= MAX_PENDING_REQUESTS {
                warn!(pending, max = MAX_PENDING_REQUESTS, "Too many pending requests");
                return Err(TransportError::TooManyPending {
                    pending,
                    max: MAX_PENDING_REQUESTS,
                });
            }
        }

        let request = Request::new(method, params);
        let request_id = request.id;
        let (response_tx, response_rx) = oneshot::channel();

        link.command_tx
            .send(LinkCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| TransportError::ConnectionClosed)?;

        match timeout(self.timeout, response_rx).await {
            Ok(Ok(result)) => result?.into_result(),
            Ok(Err(_)) => Err(TransportError::ConnectionClosed),
            Err(_) => {
                let _ = link
                    .command_tx
                    .send(LinkCommand::RemoveCorrelation(request_id));
                Err(TransportError::timeout(method, self.timeout_ms()))
            }
        }
    }
}

#[async_trait]
impl DuplexTransport for WsTransport {
    async fn open(&self) -> TransportResult<()> {
        if self.is_live() {
            return Ok(());
        }

        let request = self.handshake_request()?;
        debug!(url = %self.url, "Opening WebSocket");

        let (ws_stream, _) = timeout(self.timeout, connect_async(request))
            .await
            .map_err(|_| TransportError::timeout("handshake", self.timeout_ms()))??;

        info!(url = %self.url, "WebSocket connection established");

        let link = Link::spawn(ws_stream, Arc::clone(&self.handler));
        let previous = self.link.lock().replace(link);
        if let Some(previous) = previous {
            previous.shutdown();
        }

        Ok(())
    }

    fn is_live(&self) -> bool {
        self.link.lock().as_ref().is_some_and(Link::is_alive)
    }

    async fn close(&self) {
        let link = self.link.lock().take();
        if let Some(link) = link {
            link.shutdown();
            debug!(url = %self.url, "WebSocket close requested");
        }
    }

    fn set_notification_handler(&self, handler: NotificationHandler) {
        *self.handler.lock() = Some(Arc::from(handler));
    }

    fn clear_notification_handler(&self) {
        *self.handler.lock() = None;
    }
}

// ============================================================================
// Event Loop
// ============================================================================

/// Event loop that handles WebSocket I/O.
async fn run_event_loop(
    ws_stream: WsStream,
    mut command_rx: mpsc::UnboundedReceiver<LinkCommand>,
    correlation: Arc<Mutex<CorrelationMap>>,
    handler: SharedHandler,
    alive: Arc<AtomicBool>,
) {
    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            // Incoming messages from Kodi
            message = ws_read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        handle_incoming_message(&text, &correlation, &handler);
                    }

                    Some(Ok(Message::Close(_))) => {
                        debug!("WebSocket closed by remote");
                        break;
                    }

                    Some(Err(e)) => {
                        error!(error = %e, "WebSocket error");
                        break;
                    }

                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }

                    // Ignore Binary, Ping, Pong, Frame
                    _ => {}
                }
            }

            // Commands from Rust API
            command = command_rx.recv() => {
                match command {
                    Some(LinkCommand::Send { request, response_tx }) => {
                        handle_send_command(request, response_tx, &mut ws_write, &correlation)
                            .await;
                    }

                    Some(LinkCommand::RemoveCorrelation(request_id)) => {
                        correlation.lock().remove(&request_id);
                        debug!(%request_id, "Removed timed-out correlation");
                    }

                    Some(LinkCommand::Shutdown) => {
                        debug!("Shutdown command received");
                        let _ = ws_write.close().await;
                        break;
                    }

                    None => {
                        debug!("Command channel closed");
                        let _ = ws_write.close().await;
                        break;
                    }
                }
            }
        }
    }

    alive.store(false, Ordering::Release);
    fail_pending_requests(&correlation);

    debug!("Event loop terminated");
}

/// Routes an incoming text frame to its waiter or the notification handler.
fn handle_incoming_message(
    text: &str,
    correlation: &Arc<Mutex<CorrelationMap>>,
    handler: &SharedHandler,
) {
    if let Ok(response) = from_str::<Response>(text) {
        let tx = correlation.lock().remove(&response.id);

        match tx {
            Some(tx) => {
                let _ = tx.send(Ok(response));
            }
            None => warn!(id = %response.id, "Response for unknown request"),
        }
        return;
    }

    if let Ok(notification) = from_str::<Notification>(text) {
        trace!(method = %notification.method, "Notification received");
        // Cloned out so the callback may replace or clear itself.
        let callback = handler.lock().clone();
        if let Some(callback) = callback {
            callback(notification);
        }
        return;
    }

    warn!(text = %text, "Failed to parse incoming message");
}

/// Serializes and writes one request, registering its correlation first.
async fn handle_send_command(
    request: Request,
    response_tx: oneshot::Sender<TransportResult<Response>>,
    ws_write: &mut SplitSink<WsStream, Message>,
    correlation: &Arc<Mutex<CorrelationMap>>,
) {
    let request_id = request.id;

    let json = match to_string(&request) {
        Ok(j) => j,
        Err(e) => {
            let _ = response_tx.send(Err(TransportError::Json(e)));
            return;
        }
    };

    correlation.lock().insert(request_id, response_tx);

    if let Err(e) = ws_write.send(Message::Text(json.into())).await
        && let Some(tx) = correlation.lock().remove(&request_id)
    {
        let _ = tx.send(Err(TransportError::WebSocket(e)));
        return;
    }

    trace!(%request_id, method = %request.method, "Request sent");
}

/// Fails all pending requests with `ConnectionClosed`.
fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
    let pending: Vec<_> = correlation.lock().drain().collect();
    let count = pending.len();

    for (_, tx) in pending {
        let _ = tx.send(Err(TransportError::ConnectionClosed));
    }

    if count > 0 {
        debug!(count, "Failed pending requests on shutdown");
    }
}

// ============================================================================
// Tests
// ============================================================================
