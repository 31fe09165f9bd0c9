use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::client::{Credentials, QueueEndpoint, build_http_client};
use crate::errors::SqsReceiveError;
use crate::response::{BodyEncoding, ResponseMessage, parse_messages};
use crate::signing::{canonical_query_string, sign};

mod config;

pub use config::ReceiverConfig;

const METHOD: &str = "GET";
const ACTION: &str = "ReceiveMessage";
const API_VERSION: &str = "2011-10-01";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A `ReceiveMessage` operation bound to one queue and one set of credentials.
///
/// Construct once, then call [`ReceiveMessage::call`] as often as needed.
/// Every call is an independent round trip with a fresh timestamp and
/// signature; nothing is cached between calls. All fields are immutable after
/// construction, so an instance is safe to share across tasks and threads.
pub struct ReceiveMessage {
    endpoint: QueueEndpoint,
    credentials: Credentials,
    http: reqwest::Client,
}

impl ReceiveMessage {
    /// Creates a receiver for the given queue URL with the default
    /// configuration.
    pub fn new(
        queue_url: &str,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self, SqsReceiveError> {
        Self::with_config(
            queue_url,
            access_key_id,
            secret_access_key,
            ReceiverConfig::default(),
        )
    }

    /// Creates a receiver with an explicit [`ReceiverConfig`].
    pub fn with_config(
        queue_url: &str,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        config: ReceiverConfig,
    ) -> Result<Self, SqsReceiveError> {
        let endpoint = QueueEndpoint::parse(queue_url)?;
        let http = build_http_client(config.request_timeout)?;

        Ok(ReceiveMessage {
            endpoint,
            credentials: Credentials::new(access_key_id, secret_access_key),
            http,
        })
    }

    /// Performs one receive attempt against the queue.
    ///
    /// Returns `Ok(None)` when the queue had no available message; that is a
    /// normal outcome, not an error. When the service returns several
    /// messages in one response only the first is surfaced, with its body
    /// base64-decoded. Callers wanting the full batch can fetch the response
    /// themselves and run it through [`parse_messages`].
    ///
    /// There is no retry and no long-poll wait: exactly one HTTP GET per
    /// call. Transport failures, non-2xx statuses, and parse errors all
    /// propagate to the caller.
    pub async fn call(&self) -> Result<Option<ResponseMessage>, SqsReceiveError> {
        let request_url = self.signed_request_url(Utc::now());

        debug!(queue = %self.endpoint.url(), "sending ReceiveMessage request");
        let response = self.http.get(&request_url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SqsReceiveError::Status {
                status: status.as_u16(),
                body,
            });
        }
        trace!(bytes = body.len(), "received ReceiveMessage response");

        let messages = parse_messages(&body, BodyEncoding::Base64)?;
        debug!(count = messages.len(), "extracted messages from response");

        Ok(messages.into_iter().next())
    }

    /// Builds the fully signed request URL for the given timestamp.
    ///
    /// Base parameters are sorted by (name, value) before signing; the
    /// `Signature` pair is appended after signing and is never sorted.
    fn signed_request_url(&self, timestamp: DateTime<Utc>) -> String {
        let mut params: Vec<(String, String)> = [
            ("Action", ACTION.to_string()),
            ("AWSAccessKeyId", self.credentials.access_key_id().to_string()),
            ("Version", API_VERSION.to_string()),
            ("SignatureVersion", "2".to_string()),
            ("SignatureMethod", "HmacSHA256".to_string()),
            ("Timestamp", timestamp.format(TIMESTAMP_FORMAT).to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
        params.sort();

        let canonical = canonical_query_string(&params);
        let signature = sign(
            METHOD,
            self.endpoint.host(),
            self.endpoint.path(),
            &canonical,
            self.credentials.secret_access_key(),
        );
        params.push(("Signature".to_string(), signature));

        format!("{}?{}", self.endpoint.url(), canonical_query_string(&params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/test-queue";
    const ACCESS_KEY: &str = "AKIDEXAMPLE";
    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";

    fn fixed_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2012, 2, 9, 12, 0, 0).unwrap()
    }

    #[test]
    fn signed_url_matches_reference_signing() {
        let receiver = ReceiveMessage::new(QUEUE_URL, ACCESS_KEY, SECRET).unwrap();
        let url = receiver.signed_request_url(fixed_timestamp());

        assert_eq!(
            url,
            format!(
                "{QUEUE_URL}?AWSAccessKeyId=AKIDEXAMPLE&Action=ReceiveMessage\
                 &SignatureMethod=HmacSHA256&SignatureVersion=2\
                 &Timestamp=2012-02-09T12%3A00%3A00Z&Version=2011-10-01\
                 &Signature=lAdHhMkoKPXL02GNp8tnBGNR8C9oVANoqbG3NFblO1M%3D"
            )
        );
    }

    #[test]
    fn signature_is_the_last_parameter() {
        let receiver = ReceiveMessage::new(QUEUE_URL, ACCESS_KEY, SECRET).unwrap();
        let url = receiver.signed_request_url(fixed_timestamp());

        let last = url.rsplit('&').next().unwrap();
        assert!(last.starts_with("Signature="));
    }

    #[test]
    fn different_timestamps_produce_different_signatures() {
        let receiver = ReceiveMessage::new(QUEUE_URL, ACCESS_KEY, SECRET).unwrap();
        let first = receiver.signed_request_url(fixed_timestamp());
        let second =
            receiver.signed_request_url(Utc.with_ymd_and_hms(2012, 2, 9, 12, 0, 1).unwrap());

        assert_ne!(first, second);
    }

    #[test]
    fn construction_rejects_invalid_queue_urls() {
        assert!(matches!(
            ReceiveMessage::new("not a url", ACCESS_KEY, SECRET),
            Err(SqsReceiveError::InvalidQueueUrl(_))
        ));
    }
}
