// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

use std::{convert::Infallible, fmt, path::PathBuf, str::FromStr};

use clap::{Args, Subcommand};
use zeroize::ZeroizeOnDrop;

/// Simple configuration of a generic secret read from Args.
/// Must be deleted when it is not needed anymore
#[derive(Clone, ZeroizeOnDrop)]
pub struct ConfigSecret(String);

impl FromStr for ConfigSecret {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl ConfigSecret {
    pub fn value(&self) -> String {
        self.0.clone()
    }
}

impl fmt::Debug for ConfigSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConfigSecret(***)")
    }
}

/// Configuration parameters for the storage authority database
#[derive(Args, Debug)]
pub struct DatabaseConfig {
    /// Postgres host address
    #[arg(long, env, required = true)]
    pub db_host: String,
    /// Postgres db port
    #[arg(long, env, default_value_t = 5432)]
    pub db_port: u16,
    /// Postgres db name
    #[arg(long, env, required = true)]
    pub db_name: String,
    /// Postgres username
    #[arg(long, env, required = true)]
    pub db_user: String,
    /// Postgres password
    #[arg(long, env, required = true)]
    pub db_password: ConfigSecret,
    /// Postgres max pool size
    #[arg(long, env, default_value_t = 16)]
    pub db_max_pool_size: usize,
}

/// Logging configuration
#[derive(Args, Debug)]
pub struct LogConfig {
    /// env_logger filter, e.g. `info` or `acme_sa=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the registration with the given id
    Registration {
        #[arg(long)]
        id: i64,
    },
    /// Print the registration owning the public key stored as JWK in a file
    RegistrationByKey {
        #[arg(long)]
        jwk: PathBuf,
    },
    /// Print the challenges of an authorization
    Challenges {
        #[arg(long)]
        authorization_id: String,
    },
}
