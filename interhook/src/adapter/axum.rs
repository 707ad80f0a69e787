//! axum transport.
//!
//! Every request is routed to a single fallback handler, so the gate sees
//! all paths and methods. The interaction is handled on its own task; the
//! HTTP response is released as soon as the sink is ended, even if later
//! handlers are still running.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::gate::{BodyError, GateError, IncomingRequest};
use crate::server::InteractionServer;
use ::axum::Router;
use ::axum::body::{Body, to_bytes};
use ::axum::extract::{Request, State};
use ::axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use ::axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use interhook_core::{ResponseError, ResponseSink};
use interhook_std::dispatch::DispatcherBuilder;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// An axum request viewed through [`IncomingRequest`].
pub struct AxumRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
    limit: usize,
}

impl AxumRequest {
    /// Wrap a request, reading at most `limit` body bytes.
    pub fn new(request: Request, limit: usize) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            limit,
        }
    }
}

impl IncomingRequest for AxumRequest {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn target(&self) -> &str {
        self.uri
            .path_and_query()
            .map_or_else(|| self.uri.path(), |pq| pq.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    async fn into_body(self) -> Result<Vec<u8>, BodyError> {
        match to_bytes(self.body, self.limit).await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => {
                let err = err.into_inner();
                if err.is::<LengthLimitError>() {
                    Err(BodyError::TooLarge { limit: self.limit })
                } else {
                    Err(BodyError::Transport(err))
                }
            }
        }
    }
}

#[derive(Default)]
struct Pending {
    status: Option<StatusCode>,
    headers: HeaderMap,
    sender: Option<oneshot::Sender<Response>>,
}

/// A sink that hands the finished response to the waiting HTTP task.
pub struct OneshotSink {
    state: Mutex<Pending>,
}

impl OneshotSink {
    /// Create a sink and the receiver its response is delivered to.
    pub fn new() -> (Arc<Self>, oneshot::Receiver<Response>) {
        let (sender, receiver) = oneshot::channel();
        let sink = Self {
            state: Mutex::new(Pending {
                sender: Some(sender),
                ..Pending::default()
            }),
        };
        (Arc::new(sink), receiver)
    }

    /// End a response whose head was written but whose body never was.
    ///
    /// Returns whether a response was released.
    pub fn finish(&self) -> bool {
        let pending = self
            .state
            .lock()
            .map(|state| state.status.is_some() && state.sender.is_some())
            .unwrap_or(false);
        pending && self.end(None).is_ok()
    }
}

impl ResponseSink for OneshotSink {
    fn headers_sent(&self) -> bool {
        self.state
            .lock()
            .map(|state| state.status.is_some())
            .unwrap_or(true)
    }

    fn write_head(&self, status: u16, headers: &[(&str, &str)]) -> Result<(), ResponseError> {
        let mut state = self.state.lock().map_err(|_| ResponseError::Closed)?;
        if state.status.is_some() {
            return Err(ResponseError::AlreadySent);
        }
        state.status =
            Some(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    state.headers.append(name, value);
                }
                _ => tracing::warn!(name, "dropping invalid response header"),
            }
        }
        Ok(())
    }

    fn end(&self, body: Option<Vec<u8>>) -> Result<(), ResponseError> {
        let mut state = self.state.lock().map_err(|_| ResponseError::Closed)?;
        let status = state.status.ok_or(ResponseError::Closed)?;
        let sender = state.sender.take().ok_or(ResponseError::Closed)?;

        let mut response = Response::new(Body::from(body.unwrap_or_default()));
        *response.status_mut() = status;
        *response.headers_mut() = std::mem::take(&mut state.headers);
        sender.send(response).map_err(|_| ResponseError::Closed)
    }
}

struct AdapterState<C> {
    server: Arc<InteractionServer<C>>,
    body_limit: usize,
}

impl<C> Clone for AdapterState<C> {
    fn clone(&self) -> Self {
        Self {
            server: Arc::clone(&self.server),
            body_limit: self.body_limit,
        }
    }
}

/// A router sending every request to `server`.
pub fn router<C: Send + Sync + 'static>(
    server: Arc<InteractionServer<C>>,
    body_limit: usize,
) -> Router {
    Router::new()
        .fallback(handle::<C>)
        .with_state(AdapterState { server, body_limit })
}

async fn handle<C: Send + Sync + 'static>(
    State(state): State<AdapterState<C>>,
    request: Request,
) -> Response {
    let (sink, receiver) = OneshotSink::new();
    let request = AxumRequest::new(request, state.body_limit);

    tokio::spawn(async move {
        let fallback = Arc::clone(&sink);
        if let Err(err) = state.server.handle(request, sink).await {
            match &err {
                ServerError::Gate(GateError::Body(_)) => {
                    tracing::warn!(error = %err, "request body unreadable")
                }
                _ => tracing::error!(error = %err, "interaction failed"),
            }
            if !fallback.headers_sent() {
                let _ = fallback.respond(500, &[], None);
            }
        }
        if fallback.finish() {
            tracing::debug!("ended a response left open by a handler");
        }
    });

    match receiver.await {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Serve `server` on `bind` until Ctrl-C.
pub async fn serve<C: Send + Sync + 'static>(
    server: Arc<InteractionServer<C>>,
    bind: &str,
    body_limit: usize,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        endpoint = server.gate().endpoint(),
        "listening for interactions"
    );

    ::axum::serve(listener, router(server, body_limit))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Build a server from `config` and serve it until Ctrl-C.
pub async fn run<C: Send + Sync + 'static>(
    config: &ServerConfig,
    builder: DispatcherBuilder<C>,
    client: Arc<C>,
) -> Result<(), ServerError> {
    let server = InteractionServer::from_config(config, builder, client)?;
    serve(Arc::new(server), &config.bind, config.body_limit).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_without_head_is_rejected() {
        let (sink, mut receiver) = OneshotSink::new();

        assert!(matches!(sink.end(None), Err(ResponseError::Closed)));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn finish_releases_an_open_head() {
        let (sink, mut receiver) = OneshotSink::new();
        sink.write_head(202, &[("x-trace", "abc")]).unwrap();

        assert!(sink.finish());
        let response = receiver.try_recv().unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers()["x-trace"], "abc");
        assert!(!sink.finish());
    }

    #[test]
    fn finish_leaves_untouched_sink_alone() {
        let (sink, _receiver) = OneshotSink::new();
        assert!(!sink.finish());
        assert!(!sink.headers_sent());
    }
}
