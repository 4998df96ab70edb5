//! Cover image fallback: CDN, then the static mirror, then a fixed placeholder.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::config::ImageConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSource {
    Primary,
    Secondary,
    Placeholder,
}

impl CoverSource {
    /// Next source after a load failure. The placeholder is terminal.
    pub fn on_failure(self) -> Option<CoverSource> {
        match self {
            CoverSource::Primary => Some(CoverSource::Secondary),
            CoverSource::Secondary => Some(CoverSource::Placeholder),
            CoverSource::Placeholder => None,
        }
    }
}

/// The three candidate URLs for one app id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverUrls {
    pub primary: String,
    pub secondary: String,
    pub placeholder: String,
}

impl CoverUrls {
    pub fn for_appid(images: &ImageConfig, appid: &str) -> Self {
        Self {
            primary: images.primary_template.replace("{appid}", appid),
            secondary: images.secondary_template.replace("{appid}", appid),
            placeholder: images.placeholder_url.clone(),
        }
    }

    pub fn url(&self, source: CoverSource) -> &str {
        match source {
            CoverSource::Primary => &self.primary,
            CoverSource::Secondary => &self.secondary,
            CoverSource::Placeholder => &self.placeholder,
        }
    }
}

/// Fallback position of one card's cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverState {
    urls: CoverUrls,
    source: CoverSource,
}

impl CoverState {
    pub fn new(urls: CoverUrls) -> Self {
        Self {
            urls,
            source: CoverSource::Primary,
        }
    }

    pub fn source(&self) -> CoverSource {
        self.source
    }

    pub fn current_url(&self) -> &str {
        self.urls.url(self.source)
    }

    /// Report that the current URL failed to load. Returns the URL to try
    /// next, or `None` once the placeholder has been reached.
    pub fn on_failure(&mut self) -> Option<&str> {
        let next = self.source.on_failure()?;
        self.source = next;
        Some(self.urls.url(next))
    }
}

/// Outcome of walking the chain for one app id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverResolution {
    pub source: CoverSource,
    pub url: String,
    /// HTTP requests issued, at most two
    pub probes: usize,
}

/// Walks the fallback chain with HTTP probes for front-ends that cannot
/// observe an image load.
#[derive(Debug, Clone)]
pub struct CoverResolver {
    client: Client,
    images: ImageConfig,
}

impl CoverResolver {
    pub fn new(images: &ImageConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(images.probe_timeout_seconds.max(1)))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            images: images.clone(),
        }
    }

    pub async fn resolve(&self, appid: &str) -> CoverResolution {
        let mut state = CoverState::new(CoverUrls::for_appid(&self.images, appid));
        let mut probes = 0;

        while state.source() != CoverSource::Placeholder {
            probes += 1;
            if self.probe(state.current_url()).await {
                break;
            }
            tracing::debug!(appid, source = ?state.source(), "cover unavailable");
            if state.on_failure().is_none() {
                break;
            }
        }

        CoverResolution {
            source: state.source(),
            url: state.current_url().to_string(),
            probes,
        }
    }

    /// An image loads when the host answers 2xx with an image content type.
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                let is_image = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok())
                    .is_some_and(|value| value.starts_with("image/"));
                response.status().is_success() && is_image
            }
            Err(err) => {
                tracing::debug!(url, error = %err, "cover probe failed");
                false
            }
        }
    }
}
