//! String transport encoding for messages exchanged with the account store and the
//! paired device: serialized bytes, then standard base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

use crate::Result;

/// Encode a message into a string that can be decoded with [`decode_from_string`].
pub fn encode_to_string<T: Serialize>(message: &T) -> Result<String> {
    let bytes = serde_json::to_vec(message)?;
    Ok(STANDARD.encode(bytes))
}

/// Decode a string created with [`encode_to_string`].
///
/// Returns `None` if the string can't be decoded as `T`.
pub fn decode_from_string<T: DeserializeOwned>(s: &str) -> Option<T> {
    let bytes = match STANDARD.decode(s.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, type_name = std::any::type_name::<T>(), "Error decoding base64");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(message) => Some(message),
        Err(e) => {
            error!(error = %e, type_name = std::any::type_name::<T>(), "Error decoding message");
            None
        }
    }
}
