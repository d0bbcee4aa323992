//! Wire format of the login queue service.
//!
//! Requests are url-encoded form bodies, replies are small XML documents with
//! `HResult`, `QueueNumber`, `NowServingNumber`, and `ContextNumber` fields.
//! Bodies must match the service byte for byte: field order is fixed, the
//! subscription name travels unencoded, ticket/context and the queue URL are
//! percent-encoded.

use crate::gls::xml::{strip_namespaces, text_of};

use super::QueueError;

/// A "take a number" request.
#[derive(Debug, Clone)]
pub struct TakeANumberRequest {
    pub subscription: String,
    /// GLS authentication ticket of the login.
    pub ticket: String,
    pub queue_url: String,
}

/// A "leave queue" request.
#[derive(Debug, Clone)]
pub struct LeaveQueueRequest {
    pub subscription: String,
    /// Context token from the last successful poll.
    pub context: String,
    pub queue_url: String,
}

/// Parsed fields of a successful TakeANumber reply.
#[derive(Debug, Clone)]
pub struct QueueReply {
    pub queue_number: u64,
    pub now_serving: u64,
    pub context: String,
}

/// Form body for a TakeANumber request.
pub fn take_a_number_body(request: &TakeANumberRequest) -> String {
    format!(
        "command=TakeANumber&subscription={}&ticket={}&ticket_type=GLS&queue_url={}",
        request.subscription,
        urlencoding::encode(&request.ticket),
        urlencoding::encode(&request.queue_url)
    )
}

/// Form body for a LeaveQueue request.
pub fn leave_queue_body(request: &LeaveQueueRequest) -> String {
    format!(
        "command=LeaveQueue&subscription={}&context={}&ticket_type=GLS&queue_url={}",
        request.subscription,
        urlencoding::encode(&request.context),
        urlencoding::encode(&request.queue_url)
    )
}

/// Parse a TakeANumber reply document.
///
/// A non-zero `HResult` is a server-reported failure and short-circuits field
/// extraction, since failed replies routinely omit the other fields.
pub fn parse_queue_reply(raw: &str) -> Result<QueueReply, QueueError> {
    let doc = strip_namespaces(raw);

    let hresult = required_field(&doc, "HResult")?;
    let code = parse_integer("HResult", &hresult)?;
    if code > 0 {
        return Err(QueueError::ServerError { code });
    }

    let queue_number = parse_unsigned("QueueNumber", &required_field(&doc, "QueueNumber")?)?;
    let now_serving = parse_unsigned(
        "NowServingNumber",
        &required_field(&doc, "NowServingNumber")?,
    )?;
    let context = required_field(&doc, "ContextNumber")?;

    Ok(QueueReply {
        queue_number,
        now_serving,
        context,
    })
}

/// Check a LeaveQueue reply for a server-reported failure.
///
/// The service is not consistent about echoing fields back on leave, so only
/// an HResult that is present and non-zero is treated as an error.
pub fn check_leave_reply(raw: &str) -> Result<(), QueueError> {
    let doc = strip_namespaces(raw);
    if let Some(hresult) = text_of(&doc, "HResult") {
        let code = parse_integer("HResult", &hresult)?;
        if code > 0 {
            return Err(QueueError::ServerError { code });
        }
    }
    Ok(())
}

fn required_field(doc: &str, field: &'static str) -> Result<String, QueueError> {
    text_of(doc, field).ok_or(QueueError::MissingField(field))
}

/// Parse an integer field, accepting the service's `0x...` hex spelling.
fn parse_integer(field: &'static str, value: &str) -> Result<i64, QueueError> {
    let trimmed = value.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse::<i64>().ok()
    };

    parsed.ok_or_else(|| QueueError::InvalidField {
        field,
        value: value.to_string(),
    })
}

fn parse_unsigned(field: &'static str, value: &str) -> Result<u64, QueueError> {
    let parsed = parse_integer(field, value)?;
    u64::try_from(parsed).map_err(|_| QueueError::InvalidField {
        field,
        value: value.to_string(),
    })
}
