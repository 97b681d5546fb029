//! Async review-me API: one network round-trip per call.
//!
//! # Design
//! `ReviewApi` pairs a `ReviewClient` with a `Transport`. Every operation
//! builds its request, executes it once, and parses the response. There is no
//! retry, caching, or ordering between calls; concurrent calls share only
//! immutable state.

use serde::Serialize;
use tracing::debug;

use crate::client::ReviewClient;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    DetailedReview, GroupAccess, GroupAccessCheck, ReviewGroup, ReviewGroupCreated, ReviewGroupCreation,
    ReviewList, ReviewListQuery, WritingReviewInfo,
};

#[derive(Debug, Clone)]
pub struct ReviewApi<T = ReqwestTransport> {
    client: ReviewClient,
    transport: T,
}

impl ReviewApi<ReqwestTransport> {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_transport(ReviewClient::new(config), ReqwestTransport::new())
    }
}

impl<T: Transport> ReviewApi<T> {
    pub fn with_transport(client: ReviewClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ReviewClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    pub async fn post_review<R>(&self, review: &R) -> Result<serde_json::Value>
    where
        R: Serialize + Sync + ?Sized,
    {
        let request = self.client.build_post_review(review)?;
        let response = self.send(request).await?;
        self.client.parse_post_review(response)
    }

    pub async fn get_data_to_write_review(&self, review_request_code: &str) -> Result<WritingReviewInfo> {
        let request = self.client.build_get_data_to_write_review(review_request_code);
        let response = self.send(request).await?;
        self.client.parse_get_data_to_write_review(response)
    }

    pub async fn get_detailed_review(
        &self,
        review_id: u64,
        member_id: u64,
        group_access_code: Option<&str>,
    ) -> Result<DetailedReview> {
        let request = self
            .client
            .build_get_detailed_review(review_id, member_id, group_access_code);
        let response = self.send(request).await?;
        self.client.parse_get_detailed_review(response)
    }

    pub async fn get_review_list(
        &self,
        query: &ReviewListQuery,
        group_access_code: Option<&str>,
    ) -> Result<ReviewList> {
        let request = self.client.build_get_review_list(query, group_access_code);
        let response = self.send(request).await?;
        self.client.parse_get_review_list(response)
    }

    pub async fn create_review_group(&self, input: &ReviewGroupCreation) -> Result<ReviewGroupCreated> {
        let request = self.client.build_create_review_group(input)?;
        let response = self.send(request).await?;
        self.client.parse_create_review_group(response)
    }

    pub async fn check_group_access_code(&self, input: &GroupAccessCheck) -> Result<GroupAccess> {
        let request = self.client.build_check_group_access_code(input)?;
        let response = self.send(request).await?;
        self.client.parse_check_group_access_code(response)
    }

    pub async fn get_review_group(&self, review_request_code: &str) -> Result<ReviewGroup> {
        let request = self.client.build_get_review_group(review_request_code);
        let response = self.send(request).await?;
        self.client.parse_get_review_group(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ClientError;
    use crate::http::HttpMethod;

    /// Returns one canned response and records every request it sees.
    struct StubTransport {
        response: Option<HttpResponse>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl StubTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                response: Some(HttpResponse::new(status, body)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                response: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request);
            self.response
                .clone()
                .ok_or_else(|| ClientError::Transport("connection refused".to_string()))
        }
    }

    fn api(transport: StubTransport) -> ReviewApi<StubTransport> {
        ReviewApi::with_transport(ReviewClient::with_base_url("https://api.x.com"), transport)
    }

    #[tokio::test]
    async fn create_review_resolves_to_server_confirmation() {
        let api = api(StubTransport::replying(201, r#"{"id":42}"#));
        let created = api.post_review(&serde_json::json!({ "title": "x" })).await.unwrap();
        assert_eq!(created, serde_json::json!({ "id": 42 }));

        let requests = api.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"title":"x"}"#));
    }

    #[tokio::test]
    async fn detailed_review_not_found() {
        let api = api(StubTransport::replying(404, ""));
        let err = api.get_detailed_review(7, 3, None).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("not found"));
        assert_eq!(
            api.transport.requests()[0].url,
            "https://api.x.com/v2/reviews/7?reviewRequestCode=3"
        );
    }

    #[tokio::test]
    async fn server_error_surfaces_as_api_error() {
        let api = api(StubTransport::replying(500, "boom"));
        let err = api.get_review_group("ABCD1234").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
        assert!(err.to_string().contains("server error"));
    }

    #[tokio::test]
    async fn review_list_is_decoded() {
        let body = r#"{
            "revieweeName": "aru",
            "projectName": "reviewme",
            "reviews": [
                {"reviewId": 2, "createdAt": "2024-08-02", "contentPreview": "(preview 2)",
                 "categories": [{"optionId": 2, "content": "category 2"}]},
                {"reviewId": 1, "createdAt": "2024-08-01", "contentPreview": "(preview 1)",
                 "categories": [{"optionId": 1, "content": "category 1"}]}
            ]
        }"#;
        let api = api(StubTransport::replying(200, body));
        let query = ReviewListQuery {
            reviewee_id: 1,
            last_review_id: 0,
            member_id: 9,
        };
        let list = api.get_review_list(&query, Some("12341234")).await.unwrap();
        assert_eq!(list.reviewee_name, "aru");
        assert_eq!(list.reviews.len(), 2);
        assert_eq!(list.reviews[0].review_id, 2);
        assert_eq!(list.reviews[1].categories[0].content, "category 1");

        let sent = &api.transport.requests()[0];
        assert_eq!(sent.url, "https://api.x.com/v2/reviews?reviewRequestCode=1");
        assert!(sent
            .headers
            .contains(&("groupAccessCode".to_string(), "12341234".to_string())));
    }

    #[tokio::test]
    async fn wrong_access_code_is_a_bad_request() {
        let api = api(StubTransport::replying(400, ""));
        let err = api.get_detailed_review(1, 3, Some("wrong")).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 400, .. }));
        assert!(err.to_string().contains("bad request"));
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through() {
        let api = api(StubTransport::unreachable());
        let err = api.get_data_to_write_review("ABCD1234").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn mismatched_shape_is_a_decode_error() {
        let api = api(StubTransport::replying(200, r#"{"hasAccess":"yes"}"#));
        let input = GroupAccessCheck {
            review_request_code: "ABCD1234".to_string(),
            group_access_code: "1234".to_string(),
        };
        let err = api.check_group_access_code(&input).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn each_call_is_one_request() {
        let api = api(StubTransport::replying(200, r#"{"reviewRequestCode":"1"}"#));
        let input = ReviewGroupCreation {
            reviewee_name: "sancho".to_string(),
            project_name: "reviewme".to_string(),
            group_access_code: "1234".to_string(),
        };
        api.create_review_group(&input).await.unwrap();
        api.create_review_group(&input).await.unwrap();
        assert_eq!(api.transport.requests().len(), 2);
    }
}
