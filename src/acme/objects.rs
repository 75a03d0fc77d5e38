// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::jose::{JsonWebSignature, Jwk};

/// Absolute URL as used for contacts, terms of service and challenge
/// resources.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcmeUrl(Url);

impl AcmeUrl {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Url> for AcmeUrl {
    fn from(url: Url) -> Self {
        Self(url)
    }
}

impl FromStr for AcmeUrl {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AcmeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown ACME status {0:?}")]
pub struct UnknownStatusError(pub String);

/// Lifecycle state shared by authorizations and challenges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcmeStatus {
    #[default]
    Unknown,
    Pending,
    Processing,
    Valid,
    Invalid,
    Revoked,
}

impl AcmeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcmeStatus::Unknown => "unknown",
            AcmeStatus::Pending => "pending",
            AcmeStatus::Processing => "processing",
            AcmeStatus::Valid => "valid",
            AcmeStatus::Invalid => "invalid",
            AcmeStatus::Revoked => "revoked",
        }
    }
}

impl FromStr for AcmeStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(AcmeStatus::Unknown),
            "pending" => Ok(AcmeStatus::Pending),
            "processing" => Ok(AcmeStatus::Processing),
            "valid" => Ok(AcmeStatus::Valid),
            "invalid" => Ok(AcmeStatus::Invalid),
            "revoked" => Ok(AcmeStatus::Revoked),
            other => Err(UnknownStatusError(other.to_owned())),
        }
    }
}

impl fmt::Display for AcmeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `urn:acme:error:*` identifier of a problem document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemType(Cow<'static, str>);

impl ProblemType {
    pub const MALFORMED: ProblemType = ProblemType(Cow::Borrowed("urn:acme:error:malformed"));
    pub const UNAUTHORIZED: ProblemType =
        ProblemType(Cow::Borrowed("urn:acme:error:unauthorized"));
    pub const SERVER_INTERNAL: ProblemType =
        ProblemType(Cow::Borrowed("urn:acme:error:serverInternal"));
    pub const BAD_NONCE: ProblemType = ProblemType(Cow::Borrowed("urn:acme:error:badNonce"));
    pub const UNKNOWN_HOST: ProblemType =
        ProblemType(Cow::Borrowed("urn:acme:error:unknownHost"));
    pub const RATE_LIMITED: ProblemType =
        ProblemType(Cow::Borrowed("urn:acme:error:rateLimited"));
    pub const CONNECTION: ProblemType = ProblemType(Cow::Borrowed("urn:acme:error:connection"));
    pub const TLS: ProblemType = ProblemType(Cow::Borrowed("urn:acme:error:tls"));

    pub fn new(urn: impl Into<String>) -> Self {
        Self(Cow::Owned(urn.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Problem document (RFC 7807) explaining why a validation failed. The zero
/// value serializes to `{}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "ProblemType::is_empty")]
    pub problem_type: ProblemType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(rename = "status", default, skip_serializing_if = "is_zero")]
    pub http_status: u16,
}

fn is_zero(status: &u16) -> bool {
    *status == 0
}

impl ProblemDetails {
    pub fn new(problem_type: ProblemType, detail: impl Into<String>) -> Self {
        Self {
            problem_type,
            detail: detail.into(),
            http_status: 0,
        }
    }

    pub fn with_status(mut self, http_status: u16) -> Self {
        self.http_status = http_status;
        self
    }
}

/// ACME account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub key: Jwk,
    #[serde(default)]
    pub contact: Vec<AcmeUrl>,
    #[serde(default)]
    pub agreement: String,
}

/// One proof-of-control task of an authorization. The owning authorization
/// is not part of the value, the storage layer receives it alongside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub status: AcmeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<AcmeUrl>,
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<JsonWebSignature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProblemDetails>,
}
