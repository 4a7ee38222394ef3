//! Walking route between a stream's start and destination.
//!
//! Talks to an OSRM-compatible service directly; the backend is not involved.

use std::time::Duration;

use meract_core::GeoPoint;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("routing service returned no route")]
    NoRoute,
}

#[derive(Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Deserialize)]
struct Route {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct RouteClient {
    client: reqwest::Client,
    base_url: String,
}

impl RouteClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RoutingError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn route_url(&self, start: GeoPoint, destination: GeoPoint) -> String {
        format!(
            "{}/route/v1/foot/{},{};{},{}",
            self.base_url,
            start.longitude,
            start.latitude,
            destination.longitude,
            destination.latitude
        )
    }

    /// Points of the first route, latitude first.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::NoRoute` when the service finds none, else the
    /// transport or decode error.
    #[tracing::instrument(skip(self))]
    pub async fn walking_route(
        &self,
        start: GeoPoint,
        destination: GeoPoint,
    ) -> Result<Vec<GeoPoint>, RoutingError> {
        let response: RouteResponse = self
            .client
            .get(self.route_url(start, destination))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let route = response.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;
        Ok(route
            .geometry
            .coordinates
            .into_iter()
            .map(GeoPoint::from_lon_lat)
            .collect())
    }

    /// Route when both ends are known. Failures are logged, not returned.
    pub async fn route_between(
        &self,
        start: Option<GeoPoint>,
        destination: Option<GeoPoint>,
    ) -> Option<Vec<GeoPoint>> {
        let (start, destination) = (start?, destination?);
        match self.walking_route(start, destination).await {
            Ok(points) => Some(points),
            Err(err) => {
                tracing::error!(error = %err, "Error fetching route");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;

    #[tokio::test]
    async fn test_route_coordinates_are_swapped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                Matcher::Regex(r"^/route/v1/foot/30\.5,50\.4;30\.6,50\.5(\?.*)?$".to_string()),
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("overview".into(), "full".into()),
                Matcher::UrlEncoded("geometries".into(), "geojson".into()),
            ]))
            .with_body(r#"{"routes":[{"geometry":{"coordinates":[[30.5,50.4],[30.6,50.5]]}}]}"#)
            .create_async()
            .await;

        let client = RouteClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let points = client
            .walking_route(GeoPoint::new(50.4, 30.5), GeoPoint::new(50.5, 30.6))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(points, [GeoPoint::new(50.4, 30.5), GeoPoint::new(50.5, 30.6)]);
    }

    #[tokio::test]
    async fn test_missing_end_or_failure_yields_none() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_body(r#"{"code":"NoRoute","routes":[]}"#)
            .create_async()
            .await;

        let client = RouteClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let start = Some(GeoPoint::new(50.4, 30.5));
        assert!(client.route_between(start, None).await.is_none());
        assert!(
            client
                .route_between(start, Some(GeoPoint::new(50.5, 30.6)))
                .await
                .is_none()
        );
    }
}
