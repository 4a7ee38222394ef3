use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::GatewayError;

/// Successful response, fully buffered.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    /// Whether this response came from the replay after a renewal.
    pub replayed: bool,
}

impl GatewayResponse {
    /// Deserialize the body.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Parse` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
