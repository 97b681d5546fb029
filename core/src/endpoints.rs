//! Endpoint descriptors and URL construction for the review-me `/v2` API.
//!
//! # Design
//! Each resource is described by a `'static` `EndpointDescriptor`: the
//! resource path and the wire names of the query parameters it accepts.
//! `Endpoints` resolves the base URL once at construction and derives every
//! request URL from it. URL building never fails; a missing base URL yields a
//! relative URL that the transport will reject.

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::config::ServerConfig;
use crate::types::ReviewListQuery;

/// API version segment placed between the base URL and the resource.
pub const API_VERSION: &str = "v2";

/// A resource path plus the mapping from logical query-parameter names to
/// the names sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub resource: &'static str,
    pub query_string: &'static [(&'static str, &'static str)],
}

impl EndpointDescriptor {
    /// Wire name for a logical query-parameter name, if the resource declares it.
    pub fn wire_name(&self, logical: &str) -> Option<&'static str> {
        self.query_string
            .iter()
            .find(|(name, _)| *name == logical)
            .map(|(_, wire)| *wire)
    }

    fn key(&self, logical: &'static str) -> &'static str {
        self.wire_name(logical).unwrap_or(logical)
    }
}

pub const DETAILED_REVIEW_API_PARAMS: EndpointDescriptor = EndpointDescriptor {
    resource: "reviews",
    query_string: &[
        ("memberId", "memberId"),
        ("reviewRequestCode", "reviewRequestCode"),
    ],
};

pub const REVIEW_LIST_API_PARAMS: EndpointDescriptor = EndpointDescriptor {
    resource: "reviews",
    query_string: &[("reviewRequestCode", "reviewRequestCode")],
};

pub const REVIEW_WRITING_API_PARAMS: EndpointDescriptor = EndpointDescriptor {
    resource: "reviews",
    query_string: &[
        ("write", "write"),
        ("reviewRequestCode", "reviewRequestCode"),
    ],
};

pub const REVIEW_PASSWORD_API_PARAMS: EndpointDescriptor = EndpointDescriptor {
    resource: "groups",
    query_string: &[("check", "check")],
};

pub const REVIEW_GROUP_DATA_API_PARAMS: EndpointDescriptor = EndpointDescriptor {
    resource: "groups",
    query_string: &[("reviewRequestCode", "reviewRequestCode")],
};

/// URL builders bound to one resolved base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_base_url(&config.resolve_base_url())
    }

    /// Trailing `/` is dropped so `{base}/v2` never doubles the slash.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/v2/{resource}`
    pub fn resource_url(&self, descriptor: &EndpointDescriptor) -> String {
        format!("{}/{API_VERSION}/{}", self.base_url, descriptor.resource)
    }

    /// Build `{base}/v2/{resource}[/{segment}...][?wire=value&...]`.
    ///
    /// `query` pairs are given by logical name and written under the
    /// descriptor's wire name, in the order supplied. Names the descriptor
    /// does not declare are dropped.
    pub fn build_url(
        &self,
        descriptor: &EndpointDescriptor,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> String {
        let mut url = self.resource_url(descriptor);
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }

        let pairs: Vec<String> = query
            .iter()
            .filter_map(|(name, value)| match descriptor.wire_name(name) {
                Some(wire) => Some(format!("{wire}={}", encode(value))),
                None => {
                    warn!(resource = descriptor.resource, param = *name, "undeclared query parameter dropped");
                    None
                }
            })
            .collect();
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }

    pub fn posting_review(&self) -> String {
        self.resource_url(&REVIEW_WRITING_API_PARAMS)
    }

    pub fn getting_data_to_write_review(&self, review_request_code: &str) -> String {
        let d = &REVIEW_WRITING_API_PARAMS;
        self.build_url(
            d,
            &[d.key("write")],
            &[("reviewRequestCode", review_request_code)],
        )
    }

    /// The member id travels under the `reviewRequestCode` key; the backend
    /// contract has always wired it that way.
    pub fn getting_detailed_review(&self, review_id: u64, member_id: u64) -> String {
        let review_id = review_id.to_string();
        let member_id = member_id.to_string();
        self.build_url(
            &DETAILED_REVIEW_API_PARAMS,
            &[review_id.as_str()],
            &[("reviewRequestCode", member_id.as_str())],
        )
    }

    /// Only the reviewee id is sent, under `reviewRequestCode`.
    pub fn getting_review_list(&self, query: &ReviewListQuery) -> String {
        debug!(
            last_review_id = query.last_review_id,
            member_id = query.member_id,
            "review list URL carries only the reviewee id"
        );
        let reviewee_id = query.reviewee_id.to_string();
        self.build_url(
            &REVIEW_LIST_API_PARAMS,
            &[],
            &[("reviewRequestCode", reviewee_id.as_str())],
        )
    }

    pub fn posting_data_for_review_request_code(&self) -> String {
        self.resource_url(&REVIEW_GROUP_DATA_API_PARAMS)
    }

    pub fn checking_password(&self) -> String {
        let d = &REVIEW_PASSWORD_API_PARAMS;
        self.build_url(d, &[d.key("check")], &[])
    }

    pub fn getting_review_group_data(&self, review_request_code: &str) -> String {
        self.build_url(
            &REVIEW_GROUP_DATA_API_PARAMS,
            &[],
            &[("reviewRequestCode", review_request_code)],
        )
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
