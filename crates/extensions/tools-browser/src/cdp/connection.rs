//! WebSocket transport shared by the browser client and its page sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{CdpRequest, CdpResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, CdpError>>>>>;

/// Per-command response timeout.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Request/response multiplexer over one browser WebSocket.
#[derive(Clone)]
pub(crate) struct Connection {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: PendingMap,
    request_id: Arc<AtomicU64>,
}

impl Connection {
    /// Connect and start the receive loop.
    pub(crate) async fn open(ws_url: &str) -> Result<(Self, JoinHandle<()>), CdpError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                receive_loop(ws_source, pending).await;
            })
        };

        Ok((
            Self {
                ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
                pending,
                request_id: Arc::new(AtomicU64::new(1)),
            },
            recv_task,
        ))
    }

    /// Send a command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(e.into());
            }
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }
}

/// Route responses to their waiting callers until the socket closes.
///
/// Events are not subscribed to and are dropped. Pending callers are
/// released with `SessionClosed` when the loop ends.
async fn receive_loop(mut ws_source: WsSource, pending: PendingMap) {
    while let Some(msg) = ws_source.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                trace!("CDP recv: {}", text);
                match serde_json::from_str::<CdpResponse>(&text) {
                    Ok(resp) => dispatch(resp, &pending),
                    Err(e) => warn!("Failed to parse CDP message: {}", e),
                }
            }
            Ok(Message::Close(_)) => {
                debug!("WebSocket closed");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }
    pending.lock().clear();
}

fn dispatch(resp: CdpResponse, pending: &PendingMap) {
    let Some(id) = resp.id else {
        trace!(method = ?resp.method, "Ignoring CDP event");
        return;
    };
    let Some(tx) = pending.lock().remove(&id) else {
        return;
    };
    let result = match resp.error {
        Some(error) => Err(CdpError::Protocol {
            code: error.code,
            message: error.message,
        }),
        None => Ok(resp.result.unwrap_or(Value::Null)),
    };
    let _ = tx.send(result);
}
