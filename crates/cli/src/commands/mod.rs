//! CLI subcommands.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;

/// Read the database URL, preferring `ROYA_DATABASE_URL` over `DATABASE_URL`.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("ROYA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
