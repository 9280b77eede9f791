//! Request parameters for the tunnel route endpoints
//!
//! Every optional field is an `Option`: `None` is left out of the query string
//! or body, while `Some("")` and `Some(false)` are sent as given.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use url::form_urlencoded;

/// Characters left unescaped in a path segment (RFC 3986 unreserved plus sub-delims
/// that are safe inside a segment). `/`, `?`, `%` and `#` are always escaped.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Percent-escape a user supplied value for use as a single path segment
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Page selection shared by list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Filters for listing tunnel routes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelRoutesListParams {
    pub account_id: String,
    pub tunnel_id: Option<String>,
    /// Matches routes whose comment contains this text
    pub comment: Option<String>,
    pub is_deleted: Option<bool>,
    /// Only routes that are subnets of this network
    pub network_subset: Option<String>,
    /// Only routes that are supernets of this network
    pub network_superset: Option<String>,
    /// Only routes that existed at this instant
    pub existed_at: Option<DateTime<Utc>>,
    pub pagination: PaginationOptions,
}

impl TunnelRoutesListParams {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Default::default()
        }
    }

    pub fn with_tunnel_id(mut self, tunnel_id: impl Into<String>) -> Self {
        self.tunnel_id = Some(tunnel_id.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_is_deleted(mut self, is_deleted: bool) -> Self {
        self.is_deleted = Some(is_deleted);
        self
    }

    pub fn with_network_subset(mut self, network: impl Into<String>) -> Self {
        self.network_subset = Some(network.into());
        self
    }

    pub fn with_network_superset(mut self, network: impl Into<String>) -> Self {
        self.network_superset = Some(network.into());
        self
    }

    pub fn with_existed_at(mut self, existed_at: DateTime<Utc>) -> Self {
        self.existed_at = Some(existed_at);
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.pagination = PaginationOptions {
            page: Some(page),
            per_page: Some(per_page),
        };
        self
    }

    /// Form-encode the set filters, keys in sorted order
    pub fn encode(&self) -> String {
        let mut values: BTreeMap<&'static str, String> = BTreeMap::new();

        if let Some(tunnel_id) = &self.tunnel_id {
            values.insert("tunnel_id", tunnel_id.clone());
        }
        if let Some(comment) = &self.comment {
            values.insert("comment", comment.clone());
        }
        if let Some(is_deleted) = self.is_deleted {
            values.insert("is_deleted", is_deleted.to_string());
        }
        if let Some(network) = &self.network_subset {
            values.insert("network_subset", network.clone());
        }
        if let Some(network) = &self.network_superset {
            values.insert("network_superset", network.clone());
        }
        if let Some(existed_at) = &self.existed_at {
            values.insert(
                "existed_at",
                existed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        if let Some(page) = self.pagination.page {
            values.insert("page", page.to_string());
        }
        if let Some(per_page) = self.pagination.per_page {
            values.insert("per_page", per_page.to_string());
        }

        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(values)
            .finish()
    }
}

/// Parameters for adding a route. Only `tunnel_id` and `comment` are sent in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TunnelRoutesCreateParams {
    #[serde(skip)]
    pub account_id: String,
    #[serde(skip)]
    pub network: String,
    pub tunnel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TunnelRoutesCreateParams {
    pub fn new(
        account_id: impl Into<String>,
        network: impl Into<String>,
        tunnel_id: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            network: network.into(),
            tunnel_id: tunnel_id.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Parameters for replacing a route. The network travels in both the path and the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TunnelRoutesUpdateParams {
    #[serde(skip)]
    pub account_id: String,
    pub network: String,
    pub tunnel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl TunnelRoutesUpdateParams {
    pub fn new(
        account_id: impl Into<String>,
        network: impl Into<String>,
        tunnel_id: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            network: network.into(),
            tunnel_id: tunnel_id.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Parameters for looking up the route that covers an IP
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelRoutesForIpParams {
    pub account_id: String,
    /// IP address (or network) to look up
    pub network: String,
}

impl TunnelRoutesForIpParams {
    pub fn new(account_id: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            network: network.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunnelRoutesDeleteParams {
    pub account_id: String,
    pub network: String,
}

impl TunnelRoutesDeleteParams {
    pub fn new(account_id: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            network: network.into(),
        }
    }
}
