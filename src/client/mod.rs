//! 사용자 서비스 HTTP API 클라이언트
//!
//! 다른 서비스나 운영 스크립트에서 사용자 API를 호출할 때 사용합니다.
//! 모든 호출은 고정된 타임아웃(기본 5초)을 가지며 재시도하지 않습니다.
//!
//! ```rust,ignore
//! let client = UsersApiClient::new("http://localhost:8080")?;
//! let login = client.login(&LoginRequest { email, password }).await?;
//! let me = client.me(&login.access_token).await?;
//! ```

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::dto::users::request::{
    CreateUserRequest, LoginRequest, PatchUserRequest, RegisterRequest, ReplaceUserRequest,
};
use crate::domain::dto::users::response::{LoginResponse, ReadyResponse};
use crate::domain::entities::users::User;

/// 호출당 기본 타임아웃
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("요청 시간 초과: {0}")]
    Timeout(String),

    #[error("HTTP 요청 실패: {0}")]
    Transport(String),

    #[error("예상하지 못한 응답 상태 {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("응답 디코딩 실패: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct UsersApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl UsersApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn ready(&self) -> Result<ReadyResponse, ClientError> {
        let request = self.http.get(self.url("/ready"));
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let request = self.http.get(self.url("/users"));
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, ClientError> {
        let request = self.http.get(self.url(&format!("/users/{}", id)));
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn me(&self, access_token: &str) -> Result<User, ClientError> {
        let request = self.http.get(self.url("/me")).bearer_auth(access_token);
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn register(&self, payload: &RegisterRequest) -> Result<User, ClientError> {
        let request = self.http.post(self.url("/register")).json(payload);
        self.send_json(request, StatusCode::CREATED).await
    }

    /// 로그인 후 본문의 액세스 토큰을 반환합니다. 리프레시 토큰 쿠키는 보관하지 않습니다.
    pub async fn login(&self, payload: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let request = self.http.post(self.url("/login")).json(payload);
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn create_user(
        &self,
        access_token: &str,
        payload: &CreateUserRequest,
    ) -> Result<User, ClientError> {
        let request = self
            .http
            .post(self.url("/users"))
            .bearer_auth(access_token)
            .json(payload);
        self.send_json(request, StatusCode::CREATED).await
    }

    pub async fn replace_user(
        &self,
        access_token: &str,
        payload: &ReplaceUserRequest,
    ) -> Result<User, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/users/{}", payload.id)))
            .bearer_auth(access_token)
            .json(payload);
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn patch_user(
        &self,
        access_token: &str,
        payload: &PatchUserRequest,
    ) -> Result<User, ClientError> {
        let request = self
            .http
            .patch(self.url(&format!("/users/{}", payload.id)))
            .bearer_auth(access_token)
            .json(payload);
        self.send_json(request, StatusCode::OK).await
    }

    pub async fn delete_user(&self, access_token: &str, id: i64) -> Result<(), ClientError> {
        let request = self
            .http
            .delete(self.url(&format!("/users/{}", id)))
            .bearer_auth(access_token);
        self.send(request, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    async fn send(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<reqwest::Response, ClientError> {
        let response = request.send().await?;

        let status = response.status();
        if status != expected {
            let body = response.text().await.unwrap_or_default();
            log::debug!("사용자 API 응답 상태 불일치: expected={} actual={}", expected, status);
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<T, ClientError> {
        let response = self.send(request, expected).await?;
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
