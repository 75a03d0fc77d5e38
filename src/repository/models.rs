// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_pg_mapper_derive::PostgresMapper;

use crate::acme::objects::{AcmeStatus, AcmeUrl};

/// Capacity of the `validation` column (MEDIUMBLOB sized).
pub const MAX_VALIDATION_BYTES: usize = 1 << 24;
/// Capacity of the `uri` column, a VARCHAR(255).
pub const MAX_URI_LENGTH: usize = 255;

/// A `Registration` as stored in the `registrations` table.
#[derive(Deserialize, PostgresMapper, Serialize, Clone, Debug, PartialEq)]
#[pg_mapper(table = "registrations")]
pub struct RegistrationModel {
    pub id: i64,
    pub jwk: Vec<u8>,
    pub jwk_sha256: String,
    /// NULL in rows written before contacts were recorded.
    pub contact: Option<Vec<AcmeUrl>>,
    pub agreement: String,
}

/// A `Challenge` as stored in the `challenges` table. The `type` column is
/// selected as `challenge_type`.
#[derive(Deserialize, PostgresMapper, Serialize, Clone, Debug, PartialEq)]
#[pg_mapper(table = "challenges")]
pub struct ChallengeModel {
    pub id: i64,
    pub authorization_id: String,
    pub challenge_type: String,
    pub status: AcmeStatus,
    pub error: Option<Vec<u8>>,
    pub validated: Option<DateTime<Utc>>,
    pub uri: Option<AcmeUrl>,
    pub token: String,
    pub tls: Option<bool>,
    pub validation: Option<Vec<u8>>,
}
