use thiserror::Error;

/// Error types for SQS receive operations.
///
/// This enum represents all possible errors that can occur while building,
/// sending, and decoding a `ReceiveMessage` request. Every failure is
/// propagated to the caller; the crate performs no retries and maps no
/// errors beyond what is needed to classify them. An empty queue is not an
/// error and is represented as `Ok(None)` by the receive operation.
#[derive(Debug, Error)]
pub enum SqsReceiveError {
    /// The HTTP request failed before a response was obtained (DNS,
    /// connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status code. The response body is
    /// kept verbatim since SQS reports the error cause there.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not well-formed XML.
    #[error("failed to parse XML response: {0}")]
    Parse(#[from] quick_xml::Error),

    /// A matched `Message` element lacks one of the expected child elements.
    #[error("message is missing required element <{0}>")]
    MissingField(&'static str),

    /// The message body is not valid base64.
    #[error("failed to base64-decode message body: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The base64-decoded message body is not valid UTF-8.
    #[error("decoded message body is not valid UTF-8: {0}")]
    BodyNotUtf8(#[from] std::string::FromUtf8Error),

    /// The queue URL given at construction could not be used.
    #[error("invalid queue URL: {0}")]
    InvalidQueueUrl(String),
}
