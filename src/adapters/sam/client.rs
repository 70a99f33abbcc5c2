//! Opportunities search API client
//!
//! Issues `GET <base_url>?api_key=..&organizationCode=..&postedFrom=..&postedTo=..&active=true&limit=..`
//! and maps every failure mode to an [`ApiError`]. The API key travels in the
//! query string, so URLs are stripped from transport errors before they are
//! logged or returned.

use super::models::SearchResponse;
use super::source::{OpportunitySource, SearchQuery};
use crate::adapters::http::{build_client, error_body};
use crate::config::{SamConfig, SecretString};
use crate::domain::{ApiError, RawOpportunity, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;

/// HTTP client for the opportunities search endpoint
pub struct SamClient {
    base_url: String,
    client: Client,
}

impl SamClient {
    /// Creates a client for the configured endpoint
    ///
    /// # Arguments
    ///
    /// * `config` - Opportunities API configuration
    /// * `timeout_seconds` - Hard timeout for each request
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SamConfig, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url.clone(),
            client: build_client(timeout_seconds)?,
        })
    }

    /// The search endpoint this client calls
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl OpportunitySource for SamClient {
    async fn search(
        &self,
        api_key: &SecretString,
        query: SearchQuery<'_>,
    ) -> Result<Vec<RawOpportunity>> {
        tracing::debug!(
            url = %self.base_url,
            org_code = %query.org_code,
            posted_from = %query.range.posted_from,
            posted_to = %query.range.posted_to,
            limit = query.limit,
            "Searching opportunities"
        );

        let limit = query.limit.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api_key", api_key.expose_secret().as_ref()),
                ("organizationCode", query.org_code.as_str()),
                ("postedFrom", query.range.posted_from.as_str()),
                ("postedTo", query.range.posted_to.as_str()),
                ("active", "true"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(ApiError::from_status(status.as_u16(), body).into());
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.without_url().to_string()))?;

        if let Some(total) = body.total_records {
            tracing::debug!(
                org_code = %query.org_code,
                total_records = total,
                "Search response received"
            );
        }

        Ok(body.into_opportunities())
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    let error = error.without_url();
    if error.is_timeout() {
        ApiError::Timeout(error.to_string())
    } else {
        ApiError::ConnectionFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::unresponsive_endpoint;
    use crate::config::secret_string;
    use crate::core::fetch::FetchCoordinator;
    use crate::domain::{DateRange, FetcherError, OrgCode};
    use chrono::NaiveDate;
    use mockito::Matcher;
    use std::sync::Arc;

    fn client_for(server: &mockito::ServerGuard) -> SamClient {
        let config = SamConfig {
            base_url: format!("{}/opportunities/v2/search", server.url()),
            ..SamConfig::default()
        };
        SamClient::new(&config, 5).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_expected_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/opportunities/v2/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "key-123".into()),
                Matcher::UrlEncoded("organizationCode".into(), "070".into()),
                Matcher::UrlEncoded("postedFrom".into(), "01/15/2025".into()),
                Matcher::UrlEncoded("postedTo".into(), "01/16/2025".into()),
                Matcher::UrlEncoded("active".into(), "true".into()),
                Matcher::UrlEncoded("limit".into(), "200".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"totalRecords":2,"opportunitiesData":[{"noticeId":"A"},{"noticeId":"B"}]}"#,
            )
            .create_async()
            .await;

        let org = OrgCode::new("070").unwrap();
        let range = DateRange::new("01/15/2025", "01/16/2025");
        let query = SearchQuery {
            org_code: &org,
            range: &range,
            limit: 200,
        };

        let records = client_for(&server)
            .search(&secret_string("key-123"), query)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].notice_id(), Some("A"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_missing_data_key_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opportunities/v2/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"totalRecords":0}"#)
            .create_async()
            .await;

        let org = OrgCode::new("070").unwrap();
        let range = DateRange::new("01/15/2025", "01/15/2025");
        let records = client_for(&server)
            .search(
                &secret_string("key-123"),
                SearchQuery {
                    org_code: &org,
                    range: &range,
                    limit: 200,
                },
            )
            .await
            .unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_search_client_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opportunities/v2/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("API_KEY_INVALID")
            .create_async()
            .await;

        let org = OrgCode::new("070").unwrap();
        let range = DateRange::new("01/15/2025", "01/15/2025");
        let err = client_for(&server)
            .search(
                &secret_string("key-123"),
                SearchQuery {
                    org_code: &org,
                    range: &range,
                    limit: 200,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetcherError::Api(ApiError::ClientError { status: 403, .. })
        ));
        assert!(!err.to_string().contains("key-123"));
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opportunities/v2/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let org = OrgCode::new("070").unwrap();
        let range = DateRange::new("01/15/2025", "01/15/2025");
        let err = client_for(&server)
            .search(
                &secret_string("key-123"),
                SearchQuery {
                    org_code: &org,
                    range: &range,
                    limit: 200,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetcherError::Api(ApiError::ServerError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_search_invalid_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/opportunities/v2/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let org = OrgCode::new("070").unwrap();
        let range = DateRange::new("01/15/2025", "01/15/2025");
        let err = client_for(&server)
            .search(
                &secret_string("key-123"),
                SearchQuery {
                    org_code: &org,
                    range: &range,
                    limit: 200,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FetcherError::Api(ApiError::InvalidResponse(_))));
    }

    async fn stalled_client() -> SamClient {
        let config = SamConfig {
            base_url: format!("{}/opportunities/v2/search", unresponsive_endpoint().await),
            ..SamConfig::default()
        };
        SamClient::new(&config, 1).unwrap()
    }

    #[tokio::test]
    async fn test_search_timeout() {
        let org = OrgCode::new("070").unwrap();
        let range = DateRange::new("01/15/2025", "01/15/2025");
        let err = stalled_client()
            .await
            .search(
                &secret_string("key-123"),
                SearchQuery {
                    org_code: &org,
                    range: &range,
                    limit: 200,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FetcherError::Api(ApiError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_timed_out_organization_is_a_failure_not_an_error() {
        let coordinator = FetchCoordinator::new(Arc::new(stalled_client().await), 200);
        let today = NaiveDate::from_ymd_opt(2025, 1, 16).unwrap();

        let outcome = coordinator
            .fetch(
                &secret_string("key-123"),
                &[OrgCode::new("070").unwrap()],
                Some("01/15/2025"),
                Some("01/15/2025"),
                today,
            )
            .await
            .unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].org_code.as_str(), "070");
    }
}
