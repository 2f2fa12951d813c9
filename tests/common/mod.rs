#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

// Used when the environment does not provide DATABASE_URL; the pool is lazy,
// so the server starts and reports 503 from /health when nothing listens here.
const FALLBACK_DATABASE_URL: &str = "postgres://postgres@127.0.0.1:5432/catalog_test";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog-api-rust"));
        cmd.env("CATALOG_API_PORT", port.to_string())
            .env("CATALOG_API_HOST", "127.0.0.1")
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if std::env::var("DATABASE_URL").is_err() {
            cmd.env("DATABASE_URL", FALLBACK_DATABASE_URL);
        }

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
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
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// True when the server can reach its database; catalog data assertions are skipped otherwise
pub async fn database_available(server: &TestServer) -> Result<bool> {
    let res = reqwest::Client::new().get(server.url("/health")).send().await?;
    if res.status() != StatusCode::OK {
        eprintln!("skipping database assertions: /health returned {}", res.status());
        return Ok(false);
    }
    Ok(true)
}
