use std::env;

use crate::generator::Alphabet;

/// Runtime configuration, read from the environment with defaults
/// suitable for local development.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub alphabet: Alphabet,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:codebatch.db".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let alphabet = match env::var("ALPHABET").ok().as_deref() {
            None | Some("alphanumeric") => Alphabet::alphanumeric(),
            Some("digits") => Alphabet::digits(),
            Some(other) => anyhow::bail!(
                "unknown ALPHABET {other:?}, expected \"digits\" or \"alphanumeric\""
            ),
        };

        Ok(Self {
            database_url,
            bind_addr,
            alphabet,
        })
    }
}
