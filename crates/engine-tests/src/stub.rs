//! In-process prediction endpoint for end-to-end runs over real HTTP.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Map, Value, json};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::debug;

type Customer = Map<String, Value>;
type Responder = dyn Fn(&Customer) -> StubReply + Send + Sync;

/// What the stub answers for one request.
#[derive(Debug, Clone)]
pub enum StubReply {
    Json(u16, Value),
    Text(u16, String),
}

impl StubReply {
    pub fn prediction(probability: f64, label: &str) -> Self {
        StubReply::Json(
            200,
            json!({ "churn_probability": probability, "churn_prediction": label }),
        )
    }

    pub fn error(status: u16, message: &str) -> Self {
        StubReply::Json(status, json!({ "error": message }))
    }
}

impl IntoResponse for StubReply {
    fn into_response(self) -> Response {
        let (status, mut response) = match self {
            StubReply::Json(status, body) => (status, Json(body).into_response()),
            StubReply::Text(status, body) => (status, body.into_response()),
        };
        *response.status_mut() =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        response
    }
}

#[derive(Clone)]
struct StubState {
    respond: Arc<Responder>,
    seen: Arc<Mutex<Vec<Customer>>>,
}

/// A `POST /predict` server bound to an ephemeral local port. Aborted on drop.
pub struct StubServer {
    addr: SocketAddr,
    seen: Arc<Mutex<Vec<Customer>>>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&Customer) -> StubReply + Send + Sync + 'static,
    {
        let state = StubState {
            respond: Arc::new(respond),
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let seen = state.seen.clone();

        let app = Router::new()
            .route("/predict", post(predict))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub listener");
        let addr = listener.local_addr().expect("stub listener has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server error");
        });
        debug!(%addr, "Stub prediction endpoint listening");

        StubServer { addr, seen, handle }
    }

    /// Always answers with the same fixed prediction.
    pub async fn fixed(probability: f64, label: &'static str) -> Self {
        Self::start(move |_| StubReply::prediction(probability, label)).await
    }

    pub fn url(&self) -> String {
        format!("http://{}/predict", self.addr)
    }

    /// Customer objects received so far, in arrival order.
    pub fn requests(&self) -> Vec<Customer> {
        self.seen.lock().expect("stub state poisoned").clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn predict(State(state): State<StubState>, Json(body): Json<Value>) -> StubReply {
    let customer = body
        .get("customer")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let reply = (state.respond)(&customer);
    state.seen.lock().expect("stub state poisoned").push(customer);
    reply
}

/// An endpoint that accepts connections and never answers. Aborted on drop.
pub struct SilentEndpoint {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SilentEndpoint {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind silent listener");
        let addr = listener.local_addr().expect("silent listener has no address");

        let handle = tokio::spawn(async move {
            // Held open so clients wait on a response that never comes.
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        SilentEndpoint { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}/predict", self.addr)
    }
}

impl Drop for SilentEndpoint {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A URL on which nothing is listening.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind closed listener");
    let addr = listener.local_addr().expect("closed listener has no address");
    drop(listener);
    format!("http://{addr}/predict")
}

/// Writes `contents` as `customers.csv` under `dir`.
pub fn write_input(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("customers.csv");
    std::fs::write(&path, contents).expect("failed to write input fixture");
    path
}
