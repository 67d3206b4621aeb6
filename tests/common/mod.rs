use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Integration tests need a reachable Postgres; without one they skip
/// instead of failing the suite.
pub fn database_available() -> bool {
    if std::env::var("DATABASE_URL").is_ok() {
        true
    } else {
        eprintln!("skipping: DATABASE_URL not set");
        false
    }
}

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/shift-scheduler-api");
        cmd.env("SHIFT_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL and friends
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// A registered employee with a live session token
pub struct TestEmployee {
    pub token: String,
    pub email: String,
    pub id: String,
}

pub fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}

pub async fn register_employee(
    client: &reqwest::Client,
    base_url: &str,
    prefix: &str,
) -> Result<TestEmployee> {
    let email = unique_email(prefix);
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({
            "email": email,
            "password": "integration-pass-123",
            "display_name": "Integration Test"
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed with {}",
        res.status()
    );

    let body: Value = res.json().await?;
    let token = body["data"]["token"]
        .as_str()
        .context("registration response missing token")?
        .to_string();
    let id = body["data"]["employee"]["id"]
        .as_str()
        .context("registration response missing employee id")?
        .to_string();

    Ok(TestEmployee { token, email, id })
}
