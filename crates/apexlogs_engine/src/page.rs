use std::time::Duration;

use async_trait::async_trait;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

/// Settings for background page polling fetches. Unlike query calls these
/// run on a timer, so they keep timeouts and a size cap.
#[derive(Debug, Clone)]
pub struct PageSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PageFetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("page too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to decode page as {encoding}")]
    Decode { encoding: String },
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, PageFetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPageFetcher {
    settings: PageSettings,
}

impl ReqwestPageFetcher {
    pub fn new(settings: PageSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, PageFetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| PageFetchError::Network(err.to_string()))
    }
}

#[async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, PageFetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| PageFetchError::InvalidUrl(err.to_string()))?;
        let client = self.build_client()?;

        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(|err| PageFetchError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageFetchError::HttpStatus(status.as_u16()));
        }
        if let Some(len) = response.content_length() {
            if len > self.settings.max_bytes {
                return Err(PageFetchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                });
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| PageFetchError::Network(err.to_string()))?;
            if bytes.len() as u64 + chunk.len() as u64 > self.settings.max_bytes {
                return Err(PageFetchError::TooLarge {
                    max_bytes: self.settings.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        let html = decode_page(&bytes, content_type.as_deref())?;
        Ok(FetchedPage { html, final_url })
    }
}

/// Decode fetched bytes to UTF-8: BOM, then Content-Type charset, then
/// statistical detection.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> Result<String, PageFetchError> {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(header_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(PageFetchError::Decode {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(text.into_owned())
}

fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        match part.get(..8) {
            Some(prefix) if prefix.eq_ignore_ascii_case("charset=") => Some(
                part[8..]
                    .trim_matches(|c| c == '"' || c == '\'' || c == ' ')
                    .to_string(),
            ),
            _ => None,
        }
    })
}
