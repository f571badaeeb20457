//! Event payload parsing.
//!
//! Payloads are JSON objects with a required `event` discriminator; the
//! remaining key/value pairs become the attribute map, passed through
//! unmodified. Discriminators outside the closed [`SleepEvent`] enumeration
//! are rejected (strict policy — callers log a warning and drop the
//! message), with one exception: the literal `"Unknown"` is the
//! application's test signal and parses to [`ParsedPayload::Test`].

use sleepbridge_domain::attribute::{AttributeMap, attribute_map_from};
use sleepbridge_domain::event::{SleepEvent, UnknownEvent};

/// The discriminator the application sends for its "test configuration"
/// button. Valid input, but triggers no sensor update.
pub const TEST_EVENT: &str = "Unknown";

/// A successfully decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload {
    /// A recognised sleep event plus its auxiliary attributes.
    Event {
        event: SleepEvent,
        attributes: AttributeMap,
    },
    /// The no-op test signal.
    Test,
}

/// Why a payload was dropped.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// The body is not valid JSON.
    #[error("payload is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    /// The body is valid JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// The object has no `event` key.
    #[error("payload has no `event` field")]
    MissingEvent,

    /// The `event` value is not a string.
    #[error("`event` field is not a string")]
    EventNotAString,

    /// The discriminator is outside the closed enumeration.
    #[error(transparent)]
    UnknownEvent(#[from] UnknownEvent),
}

/// Decode a raw message body.
///
/// # Errors
///
/// Returns a [`PayloadError`] describing why the message must be dropped;
/// all variants are handled, logged conditions — never fatal.
pub fn parse(payload: &[u8]) -> Result<ParsedPayload, PayloadError> {
    let decoded: serde_json::Value =
        serde_json::from_slice(payload).map_err(PayloadError::InvalidJson)?;
    let serde_json::Value::Object(mut object) = decoded else {
        return Err(PayloadError::NotAnObject);
    };
    let event = object.remove("event").ok_or(PayloadError::MissingEvent)?;
    let serde_json::Value::String(event) = event else {
        return Err(PayloadError::EventNotAString);
    };
    if event == TEST_EVENT {
        return Ok(ParsedPayload::Test);
    }
    let event: SleepEvent = event.parse()?;
    Ok(ParsedPayload::Event {
        event,
        attributes: attribute_map_from(object),
    })
}
