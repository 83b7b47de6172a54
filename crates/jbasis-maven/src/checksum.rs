//! Artifact checksum verification against repository sidecar files.

use md5::Md5;
use reqwest::Client;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use jbasis_util::errors::BasisError;

use crate::download;

/// Sidecar algorithms in preference order: strongest first.
const SIDECARS: [(&str, fn(&[u8]) -> String); 3] = [
    ("sha256", digest_hex::<Sha256>),
    ("sha1", digest_hex::<Sha1>),
    ("md5", digest_hex::<Md5>),
];

/// Verify downloaded data against the checksum sidecar published next
/// to it, using the strongest algorithm the repository offers.
///
/// A repository with no sidecar at all gets a warning, not an error:
/// older repositories publish none.
pub async fn verify(client: &Client, file_url: &str, data: &[u8]) -> miette::Result<()> {
    for (extension, digest) in SIDECARS {
        let sidecar_url = format!("{file_url}.{extension}");
        let Some(content) = download::download_text(client, &sidecar_url).await? else {
            continue;
        };

        let expected = first_token(&content);
        let actual = digest(data);
        if actual.eq_ignore_ascii_case(expected) {
            tracing::debug!("{extension} checksum ok for {file_url}");
            return Ok(());
        }
        return Err(BasisError::Network {
            message: format!(
                "{extension} mismatch for {file_url}: expected {expected}, got {actual}"
            ),
        }
        .into());
    }

    tracing::warn!("No checksum sidecar published for {file_url}");
    Ok(())
}

fn digest_hex<D: Digest>(data: &[u8]) -> String {
    D::digest(data).iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Sidecar files contain either the bare hash or `hash  filename`.
fn first_token(content: &str) -> &str {
    content.split_whitespace().next().unwrap_or("")
}
