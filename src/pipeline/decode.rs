//! Body decoding (bytes -> Envelope).

use crate::types::Envelope;
use crate::Result;
use serde::de::DeserializeOwned;

/// Decode a fully received body into an envelope.
///
/// Malformed JSON and payloads of the wrong shape both surface as
/// [`crate::Error::Serialization`], which classifies as a parse failure.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<Envelope<T>> {
    Ok(serde_json::from_slice(body)?)
}
