use chrono::{Datelike, NaiveDate, Weekday};
use merge_grass::calendar::WINDOW_LEN;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const ORIGIN: &str = "https://grass.test";

#[derive(Debug, Deserialize)]
struct WindowResponse {
    start: NaiveDate,
    end: NaiveDate,
    dates: Vec<NaiveDate>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/window")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    // Nothing listens on a just-released port, so upstream calls fail fast.
    let dead_upstream = format!("http://127.0.0.1:{}", pick_free_port());
    let child = Command::new(env!("CARGO_BIN_EXE_merge_grass"))
        .env("PORT", port.to_string())
        .env("GITHUB_GRAPHQL_URL", format!("{dead_upstream}/graphql"))
        .env("ATCODER_API_URL", format!("{dead_upstream}/results"))
        .env("ALLOWED_ORIGIN", ORIGIN)
        .env_remove("GITHUB_CLIENT_ID")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_window_spans_53_weeks() {
    let server = shared_server().await;
    let window: WindowResponse = Client::new()
        .get(format!("{}/api/window", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(window.dates.len(), WINDOW_LEN);
    assert_eq!(window.start.weekday(), Weekday::Sun);
    assert_eq!(window.end.weekday(), Weekday::Sat);
    assert_eq!(window.dates.first(), Some(&window.start));
    assert_eq!(window.dates.last(), Some(&window.end));
}

#[tokio::test]
async fn http_user_without_cookie_is_unauthorized() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/user", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn http_merge_without_login_is_rejected() {
    let server = shared_server().await;
    let response = Client::new()
        .post(format!("{}/api/merge", server.base_url))
        .json(&serde_json::json!({ "uid": "tourist", "show_mode": "AC" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn http_atcoder_data_requires_uid() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!(
            "{}/data/atcoderproblems?uid=&show_mode=UniqueAC",
            server.base_url
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_unreachable_github_is_bad_gateway() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/data/github", server.base_url))
        .header("cookie", "token=gho_test")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn http_login_is_disabled_without_client_id() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/login", server.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
