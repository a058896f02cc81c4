// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the `/v1` API.

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::session::ClientSession;
use super::ClientError;
use crate::auth::ErrorCategory;
use crate::models::{AuthPayload, BookInput, LoginRequest, RegisterRequest, UserProfile};

/// Error body shape shared by every failing endpoint.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_code: Option<ErrorCategory>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: ClientSession,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3001`.
    pub fn new(base_url: &str, session: ClientSession) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    /// Create an account and keep its session token.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ClientError> {
        let url = self.endpoint(&["v1", "auth", "register"])?;
        let response = self.http.post(url).json(request).send().await?;
        let payload: AuthPayload = parse(response).await?;
        self.session.store(&payload.token)?;
        Ok(payload)
    }

    /// Log in and keep the session token.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthPayload, ClientError> {
        let url = self.endpoint(&["v1", "auth", "login"])?;
        let response = self.http.post(url).json(request).send().await?;
        let payload: AuthPayload = parse(response).await?;
        self.session.store(&payload.token)?;
        Ok(payload)
    }

    /// Forget the session token. There is no server-side logout.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.session.clear()
    }

    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let url = self.endpoint(&["v1", "users", "me"])?;
        let response = self.session.attach(self.http.get(url)).send().await?;
        parse(response).await
    }

    pub async fn save_book(&self, book: &BookInput) -> Result<UserProfile, ClientError> {
        let url = self.endpoint(&["v1", "users", "me", "books"])?;
        let response = self
            .session
            .attach(self.http.post(url).json(book))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn remove_book(&self, book_id: &str) -> Result<UserProfile, ClientError> {
        let url = self.endpoint(&["v1", "users", "me", "books", book_id])?;
        let response = self.session.attach(self.http.delete(url)).send().await?;
        parse(response).await
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.bytes().await?;
    let error: Option<ErrorResponse> = serde_json::from_slice(&body).ok();
    match error {
        Some(ErrorResponse {
            error,
            error_code: Some(ErrorCategory::Unauthenticated),
        }) => Err(ClientError::Unauthenticated(error)),
        Some(ErrorResponse { error, .. }) if !error.is_empty() => Err(ClientError::Api {
            status: status.as_u16(),
            message: error,
        }),
        _ => Err(ClientError::Api {
            status: status.as_u16(),
            message: String::from_utf8_lossy(&body).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let client = ApiClient::new("http://localhost:3001", ClientSession::in_memory()).unwrap();
        let url = client.endpoint(&["v1", "users", "me", "books", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/v1/users/me/books/a%20b%2Fc");
    }

    #[test]
    fn endpoint_respects_base_path() {
        let client = ApiClient::new("http://localhost:3001/api/", ClientSession::in_memory()).unwrap();
        let url = client.endpoint(&["v1", "auth", "login"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/v1/auth/login");
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", ClientSession::in_memory()),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:a@x.com", ClientSession::in_memory()),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn logout_clears_session() {
        let client = ApiClient::new("http://localhost:3001", ClientSession::in_memory()).unwrap();
        client.session().store("abc").unwrap();
        client.logout().unwrap();
        assert_eq!(client.session().current(), None);
    }
}
