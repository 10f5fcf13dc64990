//! Local stand-in for the forecast API, bound to an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Forecast,
    Actions,
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder = dyn Fn(Endpoint, u32) -> Reply + Send + Sync;

#[derive(Clone)]
struct MockState {
    hits: Arc<AtomicUsize>,
    respond: Arc<Responder>,
}

pub struct MockServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(Endpoint, u32) -> Reply + Send + Sync + 'static,
    {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            hits: Arc::clone(&hits),
            respond: Arc::new(respond),
        };

        let app = Router::new()
            .route("/api/1/forecast/{months}", get(forecast))
            .route("/api/1/actions/{count}", get(actions))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, hits }
    }

    pub fn forecast_url(&self) -> String {
        format!("http://{}/api/1/forecast", self.addr)
    }

    pub fn actions_url(&self) -> String {
        format!("http://{}/api/1/actions", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn forecast(State(state): State<MockState>, Path(months): Path<u32>) -> Response {
    reply(&state, Endpoint::Forecast, months).await
}

async fn actions(State(state): State<MockState>, Path(count): Path<u32>) -> Response {
    reply(&state, Endpoint::Actions, count).await
}

async fn reply(state: &MockState, endpoint: Endpoint, n: u32) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let reply = (state.respond)(endpoint, n);
    tokio::time::sleep(reply.delay).await;
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// A forecast body with one historical and one forecast point, dated by horizon.
pub fn single_point_body(months: u32) -> String {
    format!(
        r#"{{"data":{{"dates":["2024-{months:02}"],"predictions":[420.1],"last_16_dates":["2023-12"],"last_16_values":[419.8]}}}}"#
    )
}

/// Address nothing listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("reserve port");
    let addr = listener.local_addr().expect("reserved address");
    drop(listener);
    format!("http://{addr}/api/1/forecast")
}
