use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use pingwatch::config::Config;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Responder = Arc<dyn Fn(usize) -> StatusCode + Send + Sync>;

#[derive(Clone)]
struct TargetState {
    hits: Arc<AtomicUsize>,
    seen_headers: Arc<Mutex<Vec<HeaderMap>>>,
    respond: Responder,
    delay: Duration,
}

/// In-process HTTP target that counts requests and records their headers
#[allow(dead_code)]
pub struct TestTarget {
    pub url: String,
    hits: Arc<AtomicUsize>,
    seen_headers: Arc<Mutex<Vec<HeaderMap>>>,
}

#[allow(dead_code)]
impl TestTarget {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn seen_headers(&self) -> Vec<HeaderMap> {
        self.seen_headers.lock().unwrap().clone()
    }
}

async fn target_handler(State(state): State<TargetState>, headers: HeaderMap) -> StatusCode {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen_headers.lock().unwrap().push(headers);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.respond)(hit)
}

/// Spawn a target; `respond` gets the zero-based index of each request
#[allow(dead_code)]
pub async fn spawn_target<F>(respond: F) -> TestTarget
where
    F: Fn(usize) -> StatusCode + Send + Sync + 'static,
{
    spawn_slow_target(Duration::ZERO, respond).await
}

/// Like `spawn_target`, but every response is held back for `delay`
#[allow(dead_code)]
pub async fn spawn_slow_target<F>(delay: Duration, respond: F) -> TestTarget
where
    F: Fn(usize) -> StatusCode + Send + Sync + 'static,
{
    let state = TargetState {
        hits: Arc::new(AtomicUsize::new(0)),
        seen_headers: Arc::new(Mutex::new(Vec::new())),
        respond: Arc::new(respond),
        delay,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/health", get(target_handler))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestTarget {
        url: format!("http://{}/health", addr),
        hits: state.hits,
        seen_headers: state.seen_headers,
    }
}

#[allow(dead_code)]
pub async fn always(status: StatusCode) -> TestTarget {
    spawn_target(move |_| status).await
}

/// Fails the first `failures` requests with 500, then returns 200
#[allow(dead_code)]
pub async fn fail_first(failures: usize) -> TestTarget {
    spawn_target(move |hit| {
        if hit < failures {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    })
    .await
}

/// Config with short timings, bound to an ephemeral port
#[allow(dead_code)]
pub fn test_config(target_url: &str) -> Config {
    let mut config = Config::new(target_url).expect("valid target URL");
    config.interval = Duration::from_millis(100);
    config.retry_backoff = Duration::from_millis(20);
    config.request_timeout = Duration::from_secs(2);
    config.shutdown_grace = Duration::from_secs(2);
    config.port = 0;
    config
}

#[derive(Clone)]
struct ForwardState {
    upstream: String,
    client: reqwest::Client,
    statuses: Arc<Mutex<Vec<StatusCode>>>,
}

/// Pass-through to another server's endpoint, recording what it answered
#[derive(Clone)]
#[allow(dead_code)]
pub struct Forwarder {
    pub url: String,
    statuses: Arc<Mutex<Vec<StatusCode>>>,
}

#[allow(dead_code)]
impl Forwarder {
    pub fn statuses(&self) -> Vec<StatusCode> {
        self.statuses.lock().unwrap().clone()
    }
}

async fn forward_handler(State(state): State<ForwardState>) -> StatusCode {
    let status = match state.client.get(&state.upstream).send().await {
        Ok(response) => response.status(),
        Err(_) => StatusCode::BAD_GATEWAY,
    };
    state.statuses.lock().unwrap().push(status);
    status
}

#[allow(dead_code)]
pub async fn spawn_forwarder(upstream: String) -> Forwarder {
    let state = ForwardState {
        upstream,
        client: reqwest::Client::new(),
        statuses: Arc::new(Mutex::new(Vec::new())),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/health", get(forward_handler))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Forwarder {
        url: format!("http://{}/health", addr),
        statuses: state.statuses,
    }
}

/// Free port for a listener the test binds later
#[allow(dead_code)]
pub async fn reserve_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Poll `condition` until it holds or `timeout` passes
#[allow(dead_code)]
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
