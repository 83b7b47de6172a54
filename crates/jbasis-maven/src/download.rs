//! HTTP retrieval from Maven repository endpoints.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use jbasis_util::errors::BasisError;
use jbasis_util::progress;

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Payloads above this size get a progress bar.
const PROGRESS_THRESHOLD: u64 = 100_000;

/// Build a shared reqwest client for repository downloads.
pub fn build_client() -> miette::Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("jbasis/0.3")
        .build()
        .map_err(|e| network(format!("Failed to create HTTP client: {e}")))
}

/// Outcome of a GET that either reached the file or proved its absence.
enum Fetched {
    Hit(Response),
    Absent,
}

/// Issue a GET, retrying transient failures (5xx, connect, timeout)
/// with a growing delay. 404 is a definitive answer, not a failure.
async fn get_with_retries(client: &Client, url: &str) -> miette::Result<Fetched> {
    let mut last_failure = String::new();

    for attempt in 0..MAX_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(RETRY_DELAY * attempt).await;
        }

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                last_failure = e.to_string();
                continue;
            }
            Err(e) => return Err(network(format!("Request to {url} failed: {e}"))),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Fetched::Absent);
        }
        if status.is_server_error() {
            last_failure = format!("HTTP {status} from {url}");
            continue;
        }
        if !status.is_success() {
            return Err(network(format!("HTTP {status} fetching {url}")));
        }
        return Ok(Fetched::Hit(response));
    }

    Err(network(format!(
        "Gave up on {url} after {MAX_ATTEMPTS} attempts: {last_failure}"
    )))
}

/// Download raw bytes from a URL.
///
/// `Ok(None)` means the file is absent in this repository (404).
pub async fn download_bytes(client: &Client, url: &str) -> miette::Result<Option<Vec<u8>>> {
    match get_with_retries(client, url).await? {
        Fetched::Absent => Ok(None),
        Fetched::Hit(response) => read_body(response, url).await.map(Some),
    }
}

/// Download a text file (POM, checksum sidecar).
pub async fn download_text(client: &Client, url: &str) -> miette::Result<Option<String>> {
    let bytes = download_bytes(client, url).await?;
    Ok(bytes.map(|b| String::from_utf8_lossy(&b).to_string()))
}

/// Download a binary artifact, showing a progress bar for large payloads.
pub async fn download_artifact(
    client: &Client,
    url: &str,
    label: &str,
) -> miette::Result<Option<Vec<u8>>> {
    let response = match get_with_retries(client, url).await? {
        Fetched::Absent => return Ok(None),
        Fetched::Hit(response) => response,
    };

    let total = response.content_length().unwrap_or(0);
    let bar = (total > PROGRESS_THRESHOLD).then(|| progress::download_bar(total, label));

    let bytes = read_body(response, url).await?;
    if let Some(bar) = bar {
        bar.set_position(bytes.len() as u64);
        bar.finish_and_clear();
    }
    Ok(Some(bytes))
}

async fn read_body(response: Response, url: &str) -> miette::Result<Vec<u8>> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| network(format!("Failed to read response from {url}: {e}")))?;
    Ok(bytes.to_vec())
}

fn network(message: String) -> miette::Report {
    BasisError::Network { message }.into()
}
