//! Envelope normalization (Envelope -> payload or raw error).

use crate::types::Envelope;
use crate::{Error, Result};

/// Unwrap an envelope.
///
/// - success (`code == "1"`): the payload, which may be `None`
/// - `code == session_code`: [`Error::Session`]
/// - any other code: [`Error::Business`] with the server's code and message verbatim
pub fn normalize<T>(envelope: Envelope<T>, session_code: &str) -> Result<Option<T>> {
    if envelope.is_success() {
        return Ok(envelope.payload);
    }
    if envelope.status_code == session_code {
        return Err(Error::Session {
            code: envelope.status_code,
            message: envelope.message,
        });
    }
    Err(Error::Business {
        code: envelope.status_code,
        message: envelope.message,
    })
}
