//! Environment-driven configuration.
//!
//! | Variable        | Default          | Meaning                         |
//! |-----------------|------------------|---------------------------------|
//! | `PORT`          | `8787`           | Listen port                     |
//! | `JWT_SECRET`    | (required)       | HMAC secret for bearer tokens   |
//! | `DATABASE_PATH` | `./stockbook.db` | SQLite database file            |

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub database_path: PathBuf,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidVar {
                    name: "PORT",
                    value: raw,
                })?,
            Err(_) => 8787,
        };

        // No default on purpose; a guessable secret would let anyone
        // delete any account.
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?;

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./stockbook.db"));

        Ok(ApiConfig {
            port,
            jwt_secret,
            database_path,
        })
    }
}
