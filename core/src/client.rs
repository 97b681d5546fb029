//! Stateless HTTP request builder and response parser for the review-me API.
//!
//! # Design
//! `ReviewClient` holds only the resolved `Endpoints` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. `ReviewApi` glues the two halves to a `Transport`; callers
//! with their own HTTP stack can drive them directly.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::ServerConfig;
use crate::endpoints::Endpoints;
use crate::error::{ClientError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    DetailedReview, GroupAccess, GroupAccessCheck, ReviewGroup, ReviewGroupCreated, ReviewGroupCreation,
    ReviewList, ReviewListQuery, WritingReviewInfo,
};

/// Header carrying the group password on received-review reads.
pub const GROUP_ACCESS_CODE_HEADER: &str = "groupAccessCode";

/// Synchronous, stateless client for the review-me API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewClient {
    endpoints: Endpoints,
}

impl ReviewClient {
    /// Resolve the base URL from `config` once; it is never re-resolved.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            endpoints: Endpoints::new(config),
        }
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            endpoints: Endpoints::with_base_url(base_url),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// The payload is serialized as-is, so any `Serialize` value works;
    /// `ReviewData` is the shape the backend expects.
    pub fn build_post_review<T: Serialize + ?Sized>(&self, review: &T) -> Result<HttpRequest> {
        json_post(self.endpoints.posting_review(), review)
    }

    pub fn build_get_data_to_write_review(&self, review_request_code: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoints.getting_data_to_write_review(review_request_code),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `group_access_code` goes out as the `groupAccessCode` header; the URL
    /// does not change with it.
    pub fn build_get_detailed_review(
        &self,
        review_id: u64,
        member_id: u64,
        group_access_code: Option<&str>,
    ) -> HttpRequest {
        with_access_code(
            json_get(self.endpoints.getting_detailed_review(review_id, member_id)),
            group_access_code,
        )
    }

    pub fn build_get_review_list(&self, query: &ReviewListQuery, group_access_code: Option<&str>) -> HttpRequest {
        with_access_code(json_get(self.endpoints.getting_review_list(query)), group_access_code)
    }

    pub fn build_create_review_group(&self, input: &ReviewGroupCreation) -> Result<HttpRequest> {
        json_post(self.endpoints.posting_data_for_review_request_code(), input)
    }

    pub fn build_check_group_access_code(&self, input: &GroupAccessCheck) -> Result<HttpRequest> {
        json_post(self.endpoints.checking_password(), input)
    }

    pub fn build_get_review_group(&self, review_request_code: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoints.getting_review_group_data(review_request_code),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The confirmation object is returned untyped.
    pub fn parse_post_review(&self, response: HttpResponse) -> Result<serde_json::Value> {
        decode(response)
    }

    pub fn parse_get_data_to_write_review(&self, response: HttpResponse) -> Result<WritingReviewInfo> {
        decode(response)
    }

    pub fn parse_get_detailed_review(&self, response: HttpResponse) -> Result<DetailedReview> {
        decode(response)
    }

    pub fn parse_get_review_list(&self, response: HttpResponse) -> Result<ReviewList> {
        decode(response)
    }

    pub fn parse_create_review_group(&self, response: HttpResponse) -> Result<ReviewGroupCreated> {
        decode(response)
    }

    pub fn parse_check_group_access_code(&self, response: HttpResponse) -> Result<GroupAccess> {
        decode(response)
    }

    pub fn parse_get_review_group(&self, response: HttpResponse) -> Result<ReviewGroup> {
        decode(response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn json_get(url: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        url,
        headers: json_headers(),
        body: None,
    }
}

fn with_access_code(mut request: HttpRequest, group_access_code: Option<&str>) -> HttpRequest {
    if let Some(code) = group_access_code {
        request
            .headers
            .push((GROUP_ACCESS_CODE_HEADER.to_string(), code.to_string()));
    }
    request
}

fn json_post<T: Serialize + ?Sized>(url: String, input: &T) -> Result<HttpRequest> {
    let body = serde_json::to_string(input).map_err(|e| ClientError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        url,
        headers: json_headers(),
        body: Some(body),
    })
}

/// Any non-2xx status becomes `ClientError::Api`.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request failed");
    Err(ClientError::from_status(response.status))
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ClientError::Decode(e.to_string()))
}
