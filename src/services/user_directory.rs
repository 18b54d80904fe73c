//! Directorio de usuarios
//!
//! Los pases guardan un id de identidad externa opaco; para enviar
//! recordatorios hay que resolverlo a un email.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct UserContact {
    pub email: String,
    pub first_name: Option<String>,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `None` si el usuario no existe o no tiene email
    async fn lookup(&self, user_id: &str) -> AppResult<Option<UserContact>>;
}

/// Directorio respaldado por la API de usuarios de Clerk.
///
/// Sin clave configurada solo resuelve ids que ya son direcciones de email.
pub struct ClerkUserDirectory {
    secret_key: Option<String>,
    api_base: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ClerkUser {
    first_name: Option<String>,
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ClerkEmailAddress>,
}

#[derive(Debug, Deserialize)]
struct ClerkEmailAddress {
    id: String,
    email_address: String,
}

impl ClerkUser {
    fn into_contact(self) -> Option<UserContact> {
        let primary = self.primary_email_address_id.as_deref();
        let email = self
            .email_addresses
            .iter()
            .find(|e| Some(e.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())?
            .email_address
            .clone();

        Some(UserContact {
            email,
            first_name: self.first_name.filter(|n| !n.trim().is_empty()),
        })
    }
}

impl ClerkUserDirectory {
    pub fn new(secret_key: Option<String>, api_base: String, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

#[async_trait]
impl UserDirectory for ClerkUserDirectory {
    async fn lookup(&self, user_id: &str) -> AppResult<Option<UserContact>> {
        let Some(secret_key) = self.secret_key.as_deref() else {
            return Ok(looks_like_email(user_id).then(|| UserContact {
                email: user_id.to_string(),
                first_name: None,
            }));
        };

        let response = self
            .client
            .get(format!("{}/v1/users/{}", self.api_base, urlencoding::encode(user_id)))
            .bearer_auth(secret_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("User lookup failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!("User directory responded {}", status)));
        }

        let user: ClerkUser = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid user payload: {}", e)))?;

        Ok(user.into_contact())
    }
}

/// Directorio fijo en memoria
#[derive(Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserContact>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: &str, email: &str, first_name: Option<&str>) -> Self {
        self.users.insert(
            user_id.to_string(),
            UserContact {
                email: email.to_string(),
                first_name: first_name.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn lookup(&self, user_id: &str) -> AppResult<Option<UserContact>> {
        Ok(self.users.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clerk_user_prefers_primary_email() {
        let user: ClerkUser = serde_json::from_value(serde_json::json!({
            "first_name": "Asha",
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                { "id": "idn_1", "email_address": "old@example.com" },
                { "id": "idn_2", "email_address": "asha@example.com" }
            ]
        }))
        .unwrap();

        let contact = user.into_contact().unwrap();
        assert_eq!(contact.email, "asha@example.com");
        assert_eq!(contact.first_name.as_deref(), Some("Asha"));
    }

    #[test]
    fn test_clerk_user_without_email() {
        let user: ClerkUser = serde_json::from_value(serde_json::json!({
            "first_name": "",
            "primary_email_address_id": null,
            "email_addresses": []
        }))
        .unwrap();
        assert!(user.into_contact().is_none());
    }

    #[tokio::test]
    async fn test_directory_without_key_accepts_email_ids() {
        let directory =
            ClerkUserDirectory::new(None, "https://api.clerk.com".into(), Duration::from_secs(5)).unwrap();

        let contact = directory.lookup("rider@example.com").await.unwrap().unwrap();
        assert_eq!(contact.email, "rider@example.com");
        assert!(directory.lookup("user_2abc").await.unwrap().is_none());
    }
}
