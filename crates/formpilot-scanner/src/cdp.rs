//! CDP-backed page driver.
//!
//! Connects straight to one tab's DevTools WebSocket endpoint and drives
//! the page through `Runtime.evaluate`. The element walk serializes the
//! page into the snapshot shape [`crate::dom`] parses, stamping each
//! element with a marker attribute so it can be addressed before it has
//! an id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use formpilot_protocols::error::ScannerError;

use crate::dom::{NodeIndex, PageDocument};
use crate::page::{ControlKind, PageDriver, SelectOption};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Marker attribute stamped on every element during the snapshot walk.
const MARKER_ATTR: &str = "data-fpm";

/// Walk the element tree into the snapshot shape, stamping markers in the
/// same preorder sequence the nodes are emitted in.
const SNAPSHOT_JS: &str = r#"
(() => {
  const SKIP = new Set(['SCRIPT', 'STYLE', 'NOSCRIPT', 'TEMPLATE', 'SVG']);
  let marker = 0;
  function build(el) {
    if (SKIP.has(el.tagName)) return null;
    el.setAttribute('data-fpm', String(marker++));
    const attrs = {};
    for (const a of el.attributes) attrs[a.name] = a.value;
    let text = '';
    for (const n of el.childNodes) {
      if (n.nodeType === Node.TEXT_NODE) text += n.textContent;
    }
    const children = [];
    for (const c of el.children) {
      const built = build(c);
      if (built) children.push(built);
    }
    return {
      tag: el.tagName.toLowerCase(),
      attrs,
      text: text.trim(),
      rendered: el.getClientRects().length > 0,
      children,
    };
  }
  return build(document.documentElement);
})()
"#;

/// Page driver over one tab's DevTools WebSocket.
pub struct CdpPage {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, ScannerError>>>>>,
    request_id: AtomicU64,
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpPage {
    /// Connect to a tab's `webSocketDebuggerUrl`.
    pub async fn connect(ws_url: &str) -> Result<Self, ScannerError> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(ws_url)
            .await
            .map_err(|e| ScannerError::Page(format!("websocket connect failed: {e}")))?;
        debug!(ws_url, "connected to tab");

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, ScannerError>>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending).await;
            })
        };

        Ok(Self {
            ws_tx: Arc::new(tokio::sync::Mutex::new(ws_sink)),
            pending,
            request_id: AtomicU64::new(1),
            recv_task,
        })
    }

    async fn receive_loop(
        mut ws_source: WsSource,
        pending: Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, ScannerError>>>>>,
    ) {
        while let Some(message) = ws_source.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    trace!(payload = %text, "cdp recv");
                    let Ok(value) = serde_json::from_str::<Value>(text.as_str()) else {
                        warn!("unparsable CDP frame");
                        continue;
                    };
                    let Some(id) = value["id"].as_u64() else {
                        // Unsolicited event; the scanner subscribes to none.
                        continue;
                    };
                    let Some(tx) = pending.lock().remove(&id) else {
                        continue;
                    };
                    let result = if let Some(error) = value.get("error") {
                        Err(ScannerError::Page(format!(
                            "protocol error {}: {}",
                            error["code"].as_i64().unwrap_or_default(),
                            error["message"].as_str().unwrap_or("unknown")
                        )))
                    } else {
                        Ok(value.get("result").cloned().unwrap_or(Value::Null))
                    };
                    let _ = tx.send(result);
                }
                Ok(Message::Close(_)) => {
                    debug!("tab websocket closed");
                    break;
                }
                Err(e) => {
                    warn!(%e, "tab websocket error");
                    break;
                }
                _ => {}
            }
        }
    }

    /// Send a protocol command and await its response.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ScannerError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = json!({"id": id, "method": method, "params": params});
        let payload = request.to_string();
        trace!(payload = %payload, "cdp send");

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        {
            let mut ws = self.ws_tx.lock().await;
            ws.send(Message::Text(payload.into()))
                .await
                .map_err(|e| ScannerError::Page(format!("websocket send failed: {e}")))?;
        }

        match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ScannerError::Page("tab connection closed".to_string())),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(ScannerError::Page(format!("{method} timed out")))
            }
        }
    }

    /// Evaluate a JavaScript expression in the page, returning its value.
    async fn evaluate(&self, expression: &str) -> Result<Value, ScannerError> {
        let result = self
            .call(
                "Runtime.evaluate",
                json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                }),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("unknown error");
            return Err(ScannerError::Script(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }
}

impl Drop for CdpPage {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}

/// A string as a JavaScript literal (JSON string syntax is valid JS).
fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

#[async_trait]
impl PageDriver for CdpPage {
    async fn snapshot(&self) -> Result<PageDocument, ScannerError> {
        let value = self.evaluate(SNAPSHOT_JS).await?;
        PageDocument::from_snapshot_value(value)
    }

    async fn assign_id(&self, node: NodeIndex, id: &str) -> Result<(), ScannerError> {
        let script = format!(
            r#"(() => {{
  const el = document.querySelector('[{MARKER_ATTR}="{node}"]');
  if (el) el.id = {id};
}})()"#,
            id = js_string(id),
        );
        self.evaluate(&script).await?;
        Ok(())
    }

    async fn lookup(&self, id: &str) -> Result<Option<ControlKind>, ScannerError> {
        let script = format!(
            r#"(() => {{
  const el = document.getElementById({id});
  return el ? el.tagName.toLowerCase() : null;
}})()"#,
            id = js_string(id),
        );
        let value = self.evaluate(&script).await?;
        Ok(match value.as_str() {
            Some("select") => Some(ControlKind::Select),
            Some("input") | Some("textarea") => Some(ControlKind::Text),
            _ => None,
        })
    }

    async fn select_options(&self, id: &str) -> Result<Vec<SelectOption>, ScannerError> {
        let script = format!(
            r#"(() => {{
  const el = document.getElementById({id});
  if (!el || el.tagName !== 'SELECT') return [];
  return Array.from(el.options).map((o) => ({{ value: o.value, text: o.text }}));
}})()"#,
            id = js_string(id),
        );
        let value = self.evaluate(&script).await?;
        serde_json::from_value(value)
            .map_err(|e| ScannerError::Page(format!("malformed option list: {e}")))
    }

    async fn set_select_value(&self, id: &str, value: &str) -> Result<(), ScannerError> {
        let script = format!(
            r#"(() => {{
  const el = document.getElementById({id});
  if (!el) return false;
  el.value = {value};
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  return true;
}})()"#,
            id = js_string(id),
            value = js_string(value),
        );
        self.evaluate(&script).await?;
        Ok(())
    }

    async fn set_text_value(&self, id: &str, value: &str) -> Result<(), ScannerError> {
        // The native setter bypasses accessors installed by reactive
        // front-ends; the synthetic events hand the change to their
        // listeners afterwards.
        let script = format!(
            r#"(() => {{
  const el = document.getElementById({id});
  if (!el) return false;
  const proto = el instanceof HTMLTextAreaElement
    ? HTMLTextAreaElement.prototype
    : HTMLInputElement.prototype;
  const setter = Object.getOwnPropertyDescriptor(proto, 'value').set;
  if (setter) {{
    setter.call(el, {value});
  }} else {{
    el.value = {value};
  }}
  el.dispatchEvent(new Event('input', {{ bubbles: true }}));
  el.dispatchEvent(new Event('change', {{ bubbles: true }}));
  el.dispatchEvent(new Event('blur', {{ bubbles: true }}));
  return true;
}})()"#,
            id = js_string(id),
            value = js_string(value),
        );
        self.evaluate(&script).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes_and_newlines() {
        assert_eq!(js_string("plain"), r#""plain""#);
        assert_eq!(js_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(js_string("a\nb"), r#""a\nb""#);
    }

    #[test]
    fn test_snapshot_shape_matches_dom_parser() {
        // The shape SNAPSHOT_JS emits must stay parseable by dom.rs.
        let value = serde_json::json!({
            "tag": "html",
            "attrs": {"data-fpm": "0"},
            "text": "",
            "rendered": true,
            "children": [
                {
                    "tag": "input",
                    "attrs": {"type": "text", "data-fpm": "1"},
                    "text": "",
                    "rendered": true,
                    "children": [],
                }
            ],
        });
        let doc = PageDocument::from_snapshot_value(value).unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.node(1).tag, "input");
    }

    #[test]
    fn test_marker_selector_shape() {
        let selector = format!(r#"[{MARKER_ATTR}="{}"]"#, 7);
        assert_eq!(selector, r#"[data-fpm="7"]"#);
    }
}
