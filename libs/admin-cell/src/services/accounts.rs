use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::AdminRecord;

/// Verified admin identity after a successful login.
#[derive(Debug, Clone)]
pub struct VerifiedAdmin {
    pub id: Uuid,
    pub email: String,
}

/// Admin credential checks against the env-configured admin and the
/// `admins` table.
pub struct AdminAccountService {
    supabase: SupabaseClient,
    env_email: String,
    env_password: String,
}

impl AdminAccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            env_email: config.admin_email.clone(),
            env_password: config.admin_password.clone(),
        }
    }

    /// Check credentials; `None` means invalid email or password. The env
    /// admin short-circuits the table lookup when its email matches, so a
    /// wrong password there never falls through to the database.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<VerifiedAdmin>> {
        let email = email.trim().to_lowercase();

        if !self.env_email.is_empty() && !self.env_password.is_empty() && email == self.env_email {
            if password == self.env_password {
                debug!("Env-configured admin logged in");
                return Ok(Some(VerifiedAdmin {
                    id: Uuid::nil(),
                    email,
                }));
            }
            return Ok(None);
        }

        let Some(record) = self.fetch_admin(&email).await? else {
            return Ok(None);
        };

        match verify_password(password, &record.password_hash) {
            Ok(true) => Ok(Some(VerifiedAdmin {
                id: record.id,
                email: record.email,
            })),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Stored password hash for {} is unreadable: {}", email, e);
                Ok(None)
            }
        }
    }

    async fn fetch_admin(&self, email: &str) -> Result<Option<AdminRecord>> {
        let path = format!(
            "/rest/v1/admins?select=id,email,password_hash&email=eq.{}&limit=1",
            urlencoding::encode(email)
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;

        rows.into_iter()
            .next()
            .map(|row| serde_json::from_value(row).map_err(Into::into))
            .transpose()
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
