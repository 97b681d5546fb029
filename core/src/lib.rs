//! API client core for the review-me peer review service.
//!
//! # Overview
//! Resolves the backend base URL from an explicit `ServerConfig`, builds
//! `/v2` request URLs from endpoint descriptors, and wraps each backend
//! operation (write a review, load the writing form, read one review, list
//! received reviews, manage review groups) as a single request/response call.
//!
//! # Design
//! - `ReviewClient` is sans-IO: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`.
//! - `ReviewApi` drives those halves over a `Transport` (`reqwest` by default).
//! - Responses are decoded into typed DTOs; shape mismatches are
//!   `ClientError::Decode`, non-2xx statuses are `ClientError::Api`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::ReviewApi;
pub use client::{ReviewClient, GROUP_ACCESS_CODE_HEADER};
pub use config::{ServerConfig, PRODUCTION_HOSTNAME};
pub use endpoints::{EndpointDescriptor, Endpoints};
pub use error::{api_error_message, ClientError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    AnswerData, DetailedReview, GroupAccess, GroupAccessCheck, QuestionType, ReviewData, ReviewGroup,
    ReviewGroupCreated, ReviewGroupCreation, ReviewList, ReviewListQuery, ReviewSummary, WritingReviewInfo,
};
