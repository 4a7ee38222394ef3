//! Uploaded images (guild logos, stream previews and media files).

use tracing::instrument;

use super::AdminApi;
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

/// Public URL of an uploaded file, or an empty string when there is none.
#[must_use]
pub fn image_url(base_url: &str, category: &str, file_name: &str) -> String {
    if file_name.is_empty() {
        return String::new();
    }
    format!("{}/image/photo/{category}/{file_name}", base_url.trim_end_matches('/'))
}

impl AdminApi {
    #[must_use]
    pub fn image_url(&self, category: &str, file_name: &str) -> String {
        image_url(self.gateway.base_url(), category, file_name)
    }

    /// Download an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidRequest` for an empty file name, else a
    /// gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_image(&self, category: &str, file_name: &str) -> Result<Vec<u8>, GatewayError> {
        if file_name.is_empty() {
            return Err(GatewayError::InvalidRequest("empty file name".to_string()));
        }
        let response = self
            .gateway
            .execute(RequestDescriptor::get(format!(
                "/image/photo/{category}/{file_name}"
            )))
            .await?;
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("https://api.meract.app/", "guild", "owl.png"),
            "https://api.meract.app/image/photo/guild/owl.png"
        );
        assert_eq!(image_url("https://api.meract.app", "stream", ""), "");
    }
}
