//! Shared HTTP plumbing for OpenStack service endpoints
//!
//! Token authentication, error body decoding and `*_links` pagination.

use crate::error::{OpenStackError, Result};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const AUTH_HEADER: &str = "X-Auth-Token";

/// A single service endpoint with its token
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: reqwest::Client,
    service: &'static str,
    base: Url,
    endpoint: String,
    token: String,
}

impl ApiClient {
    pub(crate) fn new(
        client: reqwest::Client,
        service: &'static str,
        endpoint: &str,
        token: &str,
    ) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/');
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(OpenStackError::InvalidEndpoint(endpoint.to_string()));
        }
        let base = Url::parse(endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| OpenStackError::InvalidEndpoint(endpoint.to_string()))?;

        Ok(Self {
            client,
            service,
            base,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Endpoint URL with `segments` appended, each one percent-encoded
    ///
    /// A `/` inside a segment becomes `%2F`, so an id cannot reach another
    /// resource path.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET a resource, mapping 404 to `None`
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>> {
        let response = self.send_get(self.url(segments), &[]).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.decode(response).await.map(Some)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let response = self.send_get(self.url(segments), &[]).await?;
        self.decode(response).await
    }

    pub(crate) async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T> {
        let response = self
            .client
            .put(self.url(segments))
            .header(AUTH_HEADER, &self.token)
            .json(body)
            .send()
            .await?;

        self.decode(response).await
    }

    /// GET every page of a collection stored under `key`
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        key: &str,
    ) -> Result<Vec<T>> {
        let links_key = format!("{}_links", key);
        let mut items = Vec::new();

        let first = self.send_get(self.url(segments), query).await?;
        let mut page: serde_json::Value = self.decode(first).await?;

        loop {
            if let Some(values) = page.get_mut(key).map(serde_json::Value::take) {
                let batch: Vec<T> = serde_json::from_value(values)?;
                items.extend(batch);
            }

            let links: Vec<Link> = match page.get_mut(&links_key).map(serde_json::Value::take) {
                Some(links) => serde_json::from_value(links)?,
                None => Vec::new(),
            };
            let Some(next) = links.into_iter().find(|l| l.rel == "next") else {
                break;
            };

            tracing::debug!(service = self.service, next = %next.href, "Following next page");
            // next links are absolute and already carry the query
            let next = Url::parse(&next.href)
                .map_err(|_| OpenStackError::InvalidEndpoint(next.href.clone()))?;
            let response = self.send_get(next, &[]).await?;
            page = self.decode(response).await?;
        }

        Ok(items)
    }

    async fn send_get(&self, url: Url, query: &[(&str, &str)]) -> Result<Response> {
        Ok(self
            .client
            .get(url)
            .header(AUTH_HEADER, &self.token)
            .query(query)
            .send()
            .await?)
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OpenStackError::Api {
                service: self.service,
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    href: String,
}

/// Best-effort message from Neutron, Octavia or plain error bodies
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.pointer("/NeutronError/message"),
            value.get("faultstring"),
            value.get("description"),
            value.pointer("/error/message"),
            value.get("message"),
        ];
        if let Some(msg) = candidates.into_iter().flatten().find_map(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_neutron() {
        let body = r#"{"NeutronError": {"type": "PortNotFound", "message": "Port p9 could not be found.", "detail": ""}}"#;
        assert_eq!(error_message(body), "Port p9 could not be found.");
    }

    #[test]
    fn test_error_message_octavia() {
        let body = r#"{"faultcode": "Client", "faultstring": "Invalid state", "debuginfo": null}"#;
        assert_eq!(error_message(body), "Invalid state");
    }

    #[test]
    fn test_error_message_plain() {
        assert_eq!(error_message("  401 Unauthorized  "), "401 Unauthorized");
        assert_eq!(error_message(""), "Unknown error");
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let result = ApiClient::new(reqwest::Client::new(), "neutron", "neutron:9696", "t");
        assert!(matches!(result, Err(OpenStackError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client =
            ApiClient::new(reqwest::Client::new(), "neutron", "https://n.example/", "t").unwrap();
        assert_eq!(client.endpoint(), "https://n.example");
        assert_eq!(
            client.url(&["v2.0", "ports", "p1"]).as_str(),
            "https://n.example/v2.0/ports/p1"
        );
    }

    #[test]
    fn test_url_keeps_endpoint_prefix() {
        let client =
            ApiClient::new(reqwest::Client::new(), "octavia", "https://api.example/lb/", "t")
                .unwrap();
        assert_eq!(
            client.url(&["v2", "lbaas", "loadbalancers"]).as_str(),
            "https://api.example/lb/v2/lbaas/loadbalancers"
        );
    }

    #[test]
    fn test_url_encodes_each_segment() {
        let client =
            ApiClient::new(reqwest::Client::new(), "neutron", "https://n.example", "t").unwrap();

        let url = client.url(&["v2.0", "ports", "../floatingips/x"]);
        assert_eq!(url.as_str(), "https://n.example/v2.0/ports/..%2Ffloatingips%2Fx");

        let url = client.url(&["v2.0", "floatingips", "a?b#c%d"]);
        assert_eq!(url.path(), "/v2.0/floatingips/a%3Fb%23c%25d");
        assert_eq!(url.query(), None);
    }
}
