//! Namespace-aware parsing of `ReceiveMessage` XML responses.
//!
//! SQS scopes every element of the response document to a versioned
//! namespace, so extraction matches on the resolved namespace rather than on
//! raw tag names. Elements outside [`SQS_NAMESPACE`] are ignored.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::errors::SqsReceiveError;

/// Namespace URI the SQS 2011-10-01 API binds its response elements to.
pub const SQS_NAMESPACE: &str = "http://queue.amazonaws.com/doc/2011-10-01/";

/// How [`ResponseMessage::body`] interprets the raw body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Body text is returned verbatim.
    Raw,
    /// Body text is standard base64 and is decoded on access.
    Base64,
}

/// One message extracted from a `ReceiveMessage` response.
///
/// Accessors fail with [`SqsReceiveError::MissingField`] when the response
/// omitted the corresponding child element; there are no defaults. The MD5
/// checksum always refers to the body as transmitted, before any decoding.
#[derive(Debug, Clone)]
pub struct ResponseMessage {
    encoding: BodyEncoding,
    id: Option<String>,
    body: Option<String>,
    body_md5: Option<String>,
}

impl ResponseMessage {
    /// Text of the `MessageId` child element.
    pub fn id(&self) -> Result<&str, SqsReceiveError> {
        self.id
            .as_deref()
            .ok_or(SqsReceiveError::MissingField("MessageId"))
    }

    /// The message body, decoded according to the message's [`BodyEncoding`].
    pub fn body(&self) -> Result<String, SqsReceiveError> {
        let raw = self
            .body
            .as_deref()
            .ok_or(SqsReceiveError::MissingField("Body"))?;

        match self.encoding {
            BodyEncoding::Raw => Ok(raw.to_string()),
            BodyEncoding::Base64 => {
                let bytes = BASE64.decode(raw)?;
                Ok(String::from_utf8(bytes)?)
            }
        }
    }

    /// MD5 checksum of the raw (pre-decode) body, as reported by SQS.
    pub fn body_md5sum(&self) -> Result<&str, SqsReceiveError> {
        self.body_md5
            .as_deref()
            .ok_or(SqsReceiveError::MissingField("MD5OfBody"))
    }
}

/// The child elements captured from a `Message` element.
#[derive(Clone, Copy)]
enum MessageField {
    Id,
    Body,
    Md5OfBody,
}

impl MessageField {
    fn from_name(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"MessageId" => Some(MessageField::Id),
            b"Body" => Some(MessageField::Body),
            b"MD5OfBody" => Some(MessageField::Md5OfBody),
            _ => None,
        }
    }
}

fn in_sqs_namespace(resolution: &ResolveResult<'_>) -> bool {
    matches!(resolution, ResolveResult::Bound(Namespace(uri)) if *uri == SQS_NAMESPACE.as_bytes())
}

/// Extracts every `Message` element from a `ReceiveMessage` response body.
///
/// Messages are returned in document order, tagged with the given
/// [`BodyEncoding`]. Zero messages is a valid outcome and yields an empty
/// vector; malformed XML is a parse error.
pub fn parse_messages(
    xml: &str,
    encoding: BodyEncoding,
) -> Result<Vec<ResponseMessage>, SqsReceiveError> {
    let mut reader = NsReader::from_str(xml);

    let mut messages = Vec::new();
    let mut current: Option<ResponseMessage> = None;
    let mut field: Option<MessageField> = None;

    loop {
        let (resolution, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(e) if in_sqs_namespace(&resolution) => {
                let name = e.local_name();
                if name.as_ref() == b"Message" {
                    current = Some(ResponseMessage {
                        encoding,
                        id: None,
                        body: None,
                        body_md5: None,
                    });
                    field = None;
                } else if current.is_some() {
                    field = MessageField::from_name(name.as_ref());
                }
            }
            Event::Text(e) => {
                if let (Some(message), Some(slot)) = (current.as_mut(), field) {
                    let text = e.unescape()?.into_owned();
                    match slot {
                        MessageField::Id => message.id = Some(text),
                        MessageField::Body => message.body = Some(text),
                        MessageField::Md5OfBody => message.body_md5 = Some(text),
                    }
                }
            }
            Event::End(e) => {
                if field.is_some() && MessageField::from_name(e.local_name().as_ref()).is_some() {
                    field = None;
                } else if e.local_name().as_ref() == b"Message" {
                    if let Some(message) = current.take() {
                        messages.push(message);
                    }
                    field = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(messages)
}
