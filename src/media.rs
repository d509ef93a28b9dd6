//! # Menu Header Image
//!
//! Downloads the configured header image from the Drive download endpoint
//! into a temp file for a single send. Large files answer the first
//! request with a scan-warning page whose final URL carries a `confirm`
//! token; the request is then reissued with that token attached.

use std::io::Write;

use anyhow::{Context, Result};
use reqwest::Url;
use tempfile::{NamedTempFile, TempPath};
use tracing::debug;

const DRIVE_DOWNLOAD_URL: &str = "https://drive.google.com/uc";

/// Downloader for the main menu's header image.
pub struct MenuImage {
    client: reqwest::Client,
    file_id: Option<String>,
}

impl MenuImage {
    /// A `None` file id means no image is configured; [`MenuImage::download`]
    /// then always answers `Ok(None)` and the menu stays text-only.
    pub fn new(client: reqwest::Client, file_id: Option<String>) -> Self {
        Self { client, file_id }
    }

    /// Fetch the image into a temp file. The returned path removes the
    /// file on drop, so it lives exactly as long as the send that uses it.
    pub async fn download(&self) -> Result<Option<TempPath>> {
        let Some(file_id) = self.file_id.as_deref() else {
            return Ok(None);
        };

        let response = self
            .client
            .get(DRIVE_DOWNLOAD_URL)
            .query(&[("export", "download"), ("id", file_id)])
            .send()
            .await
            .context("menu image request failed")?
            .error_for_status()
            .context("menu image request rejected")?;

        // The warning page redirect puts the token on the final URL.
        let response = match confirm_token(response.url()) {
            Some(token) => self
                .client
                .get(DRIVE_DOWNLOAD_URL)
                .query(&[
                    ("export", "download"),
                    ("id", file_id),
                    ("confirm", token.as_str()),
                ])
                .send()
                .await
                .context("confirmed menu image request failed")?
                .error_for_status()
                .context("confirmed menu image request rejected")?,
            None => response,
        };

        let bytes = response
            .bytes()
            .await
            .context("reading menu image body")?;

        let mut temp_file = NamedTempFile::new().context("creating temp file for menu image")?;
        temp_file
            .as_file_mut()
            .write_all(&bytes)
            .context("writing menu image to temp file")?;

        debug!(bytes = bytes.len(), "Menu image downloaded");
        Ok(Some(temp_file.into_temp_path()))
    }
}

/// Extract the Drive `confirm` token from a response URL, if present.
fn confirm_token(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == "confirm")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test the confirm token is picked out of a warning redirect URL
    #[test]
    fn test_confirm_token_present() {
        let url =
            Url::parse("https://drive.google.com/uc?export=download&confirm=t0k3n&id=abc").unwrap();
        assert_eq!(confirm_token(&url), Some("t0k3n".to_string()));
    }

    /// Test a direct download URL yields no token
    #[test]
    fn test_confirm_token_absent() {
        let url = Url::parse("https://drive.google.com/uc?export=download&id=abc").unwrap();
        assert_eq!(confirm_token(&url), None);
    }

    /// Test the token is matched by key, not by substring
    #[test]
    fn test_confirm_token_ignores_lookalike_keys() {
        let url = Url::parse("https://drive.google.com/uc?confirmed=yes&id=abc").unwrap();
        assert_eq!(confirm_token(&url), None);
    }

    /// Test an unconfigured image downloads to nothing
    #[tokio::test]
    async fn test_download_unconfigured() {
        let image = MenuImage::new(reqwest::Client::new(), None);
        let result = image.download().await.unwrap();
        assert!(result.is_none());
    }
}
