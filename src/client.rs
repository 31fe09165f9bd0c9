use std::time::Duration;

use url::Url;

use crate::errors::SqsReceiveError;

/// AWS credentials used to sign `ReceiveMessage` requests.
///
/// Both fields are opaque strings supplied by the caller at construction and
/// never mutated afterwards. The crate does not read credentials from the
/// environment or from configuration files; loading them is the caller's
/// concern.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Credentials {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

// Keep the secret out of Debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// A queue URL split into the pieces needed for request signing.
///
/// The string-to-sign covers the host (including any explicit port) and the
/// path separately from the full URL, so both are extracted once at
/// construction. Immutable after parsing; no further normalization is applied.
#[derive(Debug, Clone)]
pub struct QueueEndpoint {
    url: String,
    host: String,
    path: String,
}

impl QueueEndpoint {
    /// Parses an absolute HTTP(S) queue URL, e.g.
    /// `https://sqs.us-east-1.amazonaws.com/123456789012/my-queue`.
    pub fn parse(queue_url: &str) -> Result<Self, SqsReceiveError> {
        let parsed = Url::parse(queue_url)
            .map_err(|e| SqsReceiveError::InvalidQueueUrl(format!("{queue_url}: {e}")))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SqsReceiveError::InvalidQueueUrl(format!(
                "{queue_url}: scheme must be http or https"
            )));
        }

        let host_str = parsed.host_str().ok_or_else(|| {
            SqsReceiveError::InvalidQueueUrl(format!("{queue_url}: missing host"))
        })?;

        // Non-default ports are part of the signed host component.
        let host = match parsed.port() {
            Some(port) => format!("{host_str}:{port}"),
            None => host_str.to_string(),
        };

        Ok(QueueEndpoint {
            url: queue_url.to_string(),
            host,
            path: parsed.path().to_string(),
        })
    }

    /// The queue URL exactly as supplied by the caller.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Host component used in the string-to-sign, `host[:port]`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path component used in the string-to-sign.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Builds the HTTP client used for receive calls.
///
/// The reference implementation performed requests without any timeout; this
/// client always carries one so a stalled connection surfaces as a transport
/// error instead of hanging the caller.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SqsReceiveError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(SqsReceiveError::Transport)
}
