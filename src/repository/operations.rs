// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use async_trait::async_trait;
use deadpool_postgres::Client as PostgresClient;
use tokio_pg_mapper::FromTokioPostgresRow;

use crate::acme::jose::{Jwk, KeyDigest};
use crate::acme::objects::{Challenge, Registration};
use crate::errors::SaError;

use super::challenges_mapper::{challenge_to_model, model_to_challenge};
use super::models::{ChallengeModel, RegistrationModel};
use super::registrations_mapper::{model_to_registration, registration_to_model};

#[async_trait]
pub trait RegistrationsExt {
    async fn get_registration(&self, id: i64) -> Result<Registration, SaError>;
    async fn get_registration_by_key(&self, key: &Jwk) -> Result<Registration, SaError>;
    async fn new_registration(&self, registration: &Registration) -> Result<Registration, SaError>;
    async fn update_registration(&self, registration: &Registration) -> Result<(), SaError>;
}

#[async_trait]
pub trait ChallengesExt {
    async fn get_challenges(&self, authorization_id: &str) -> Result<Vec<Challenge>, SaError>;
    async fn add_challenge(&self, challenge: &Challenge, authorization_id: &str) -> Result<Challenge, SaError>;
    async fn update_challenge(&self, challenge: &Challenge, authorization_id: &str) -> Result<(), SaError>;
}

fn registration_statement(template: &str) -> String {
    template.replace("$table_fields", &RegistrationModel::sql_table_fields())
}

#[async_trait]
impl RegistrationsExt for PostgresClient {
    async fn get_registration(&self, id: i64) -> Result<Registration, SaError> {
        let stmt = registration_statement(include_str!("./sql/registrations_get.sql"));
        let stmt = self.prepare(&stmt).await?;

        let row = self.query_opt(&stmt, &[&id]).await?.ok_or(SaError::RowNotFound)?;
        model_to_registration(RegistrationModel::from_row_ref(&row)?)
    }

    async fn get_registration_by_key(&self, key: &Jwk) -> Result<Registration, SaError> {
        let jwk_sha256 = key.key_digest().map_err(SaError::DigestError)?;
        let stmt = registration_statement(include_str!("./sql/registrations_get_by_key.sql"));
        let stmt = self.prepare(&stmt).await?;

        let row = self.query_opt(&stmt, &[&jwk_sha256]).await?.ok_or(SaError::RowNotFound)?;
        model_to_registration(RegistrationModel::from_row_ref(&row)?)
    }

    async fn new_registration(&self, registration: &Registration) -> Result<Registration, SaError> {
        let model = registration_to_model(registration)?;
        let stmt = registration_statement(include_str!("./sql/registrations_insert.sql"));
        let stmt = self.prepare(&stmt).await?;

        let row = self
            .query_opt(
                &stmt,
                &[&model.jwk, &model.jwk_sha256, &model.contact, &model.agreement],
            )
            .await?
            .ok_or(SaError::RowNotFound)?;
        let stored = model_to_registration(RegistrationModel::from_row_ref(&row)?)?;
        log::info!("registration {} created", stored.id);
        Ok(stored)
    }

    async fn update_registration(&self, registration: &Registration) -> Result<(), SaError> {
        let model = registration_to_model(registration)?;
        let stmt = self.prepare(include_str!("./sql/registrations_update.sql")).await?;

        let updated = self
            .execute(
                &stmt,
                &[&model.id, &model.jwk, &model.jwk_sha256, &model.contact, &model.agreement],
            )
            .await?;
        match updated {
            0 => Err(SaError::RowNotFound),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ChallengesExt for PostgresClient {
    async fn get_challenges(&self, authorization_id: &str) -> Result<Vec<Challenge>, SaError> {
        let stmt = self.prepare(include_str!("./sql/challenges_get_by_authorization.sql")).await?;

        self.query(&stmt, &[&authorization_id])
            .await?
            .iter()
            .map(|row| model_to_challenge(ChallengeModel::from_row_ref(row)?))
            .collect()
    }

    async fn add_challenge(&self, challenge: &Challenge, authorization_id: &str) -> Result<Challenge, SaError> {
        let model = challenge_to_model(challenge, authorization_id)?;
        let stmt = self.prepare(include_str!("./sql/challenges_insert.sql")).await?;

        let row = self
            .query_opt(
                &stmt,
                &[
                    &model.authorization_id,
                    &model.challenge_type,
                    &model.status,
                    &model.error,
                    &model.validated,
                    &model.uri,
                    &model.token,
                    &model.tls,
                    &model.validation,
                ],
            )
            .await?
            .ok_or(SaError::RowNotFound)?;
        let stored = model_to_challenge(ChallengeModel::from_row_ref(&row)?)?;
        log::info!("challenge {} added to authorization {}", stored.id, authorization_id);
        Ok(stored)
    }

    async fn update_challenge(&self, challenge: &Challenge, authorization_id: &str) -> Result<(), SaError> {
        let model = challenge_to_model(challenge, authorization_id)?;
        let stmt = self.prepare(include_str!("./sql/challenges_update.sql")).await?;

        let updated = self
            .execute(
                &stmt,
                &[
                    &model.id,
                    &model.authorization_id,
                    &model.challenge_type,
                    &model.status,
                    &model.error,
                    &model.validated,
                    &model.uri,
                    &model.token,
                    &model.tls,
                    &model.validation,
                ],
            )
            .await?;
        match updated {
            0 => Err(SaError::RowNotFound),
            _ => Ok(()),
        }
    }
}
