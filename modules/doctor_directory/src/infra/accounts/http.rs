use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{Account, AccountsPort, NewAccount};
use modkit::TracedClient;

/// Adapter for a hosted auth service (`/auth/v1/...` endpoints).
pub struct HttpAccountsClient {
    client: TracedClient,
    base: Url,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: SignupMetadata<'a>,
}

#[derive(Serialize)]
struct SignupMetadata<'a> {
    role: &'a str,
    full_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

#[derive(Deserialize)]
struct HostedUser {
    id: Uuid,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl HttpAccountsClient {
    pub fn new(client: TracedClient, base: Url, api_key: Option<String>) -> Self {
        Self {
            client,
            base,
            api_key,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| DomainError::account_service("invalid accounts base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url.as_str());
        match &self.api_key {
            Some(key) => builder.header("apikey", key).bearer_auth(key),
            None => builder,
        }
    }
}

/// The signup answer is either the user object itself or `{ "user": {...}, ... }`.
fn parse_signup(body: serde_json::Value) -> anyhow::Result<HostedUser> {
    let user = match body.get("user") {
        Some(u) if u.is_object() => u.clone(),
        _ => body,
    };
    serde_json::from_value(user).context("unexpected signup response")
}

#[async_trait]
impl AccountsPort for HttpAccountsClient {
    #[instrument(
        name = "doctor_directory.http.accounts.create",
        skip_all,
        fields(base = %self.base, email = %new_account.email)
    )]
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        let url = self.endpoint(&["auth", "v1", "signup"])?;
        let body = SignupRequest {
            email: &new_account.email,
            password: &new_account.password,
            data: SignupMetadata {
                role: new_account.role.as_str(),
                full_name: &new_account.full_name,
                phone: new_account.phone.as_deref(),
            },
        };
        let req = self
            .request(Method::POST, &url)
            .json(&body)
            .build()
            .context("build signup request")
            .map_err(|e| DomainError::account_service(e.to_string()))?;

        let response = self
            .client
            .execute(req)
            .await
            .with_context(|| "POST /auth/v1/signup")
            .map_err(|e| DomainError::account_service(format!("{e:#}")))?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                return Err(DomainError::email_already_exists(new_account.email));
            }
            s => return Err(DomainError::account_service(format!("HTTP {s}"))),
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DomainError::account_service(e.to_string()))?;
        let user = parse_signup(json).map_err(|e| DomainError::account_service(format!("{e:#}")))?;

        Ok(Account {
            id: user.id,
            email: new_account.email,
            role: new_account.role,
            full_name: new_account.full_name,
            phone: new_account.phone,
            created_at: user.created_at.unwrap_or_else(Utc::now),
        })
    }

    #[instrument(
        name = "doctor_directory.http.accounts.delete",
        skip(self),
        fields(base = %self.base)
    )]
    async fn delete_account(&self, id: Uuid) -> Result<(), DomainError> {
        let url = self.endpoint(&["auth", "v1", "admin", "users", &id.to_string()])?;
        let req = self
            .request(Method::DELETE, &url)
            .build()
            .map_err(|e| DomainError::account_service(e.to_string()))?;
        let response = self
            .client
            .execute(req)
            .await
            .with_context(|| format!("DELETE /auth/v1/admin/users/{id}"))
            .map_err(|e| DomainError::account_service(format!("{e:#}")))?;

        // Already gone is fine.
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(DomainError::account_service(format!(
                "HTTP {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_body_may_wrap_user() {
        let id = Uuid::new_v4();
        let wrapped = serde_json::json!({ "user": { "id": id }, "session": null });
        assert_eq!(parse_signup(wrapped).unwrap().id, id);

        let bare = serde_json::json!({ "id": id, "created_at": "2024-03-01T10:00:00Z" });
        let u = parse_signup(bare).unwrap();
        assert_eq!(u.id, id);
        assert!(u.created_at.is_some());

        assert!(parse_signup(serde_json::json!({ "msg": "nope" })).is_err());
    }

    #[test]
    fn endpoint_joins_under_base_path() {
        let c = HttpAccountsClient::new(
            TracedClient::default(),
            Url::parse("http://auth.local/project/").unwrap(),
            None,
        );
        let url = c.endpoint(&["auth", "v1", "signup"]).unwrap();
        assert_eq!(url.as_str(), "http://auth.local/project/auth/v1/signup");
    }
}
