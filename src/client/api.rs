use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    auth::{
        dto::{ErrorBody, LoginData, LoginResponse, MessageResponse, RegisterResponse},
        repo_types::PublicUser,
    },
    client::forms::{first_message, LoginForm, RegisterForm, Submission},
    validation::Issue,
};

/// Failures surfaced to the form, each with a user-facing message.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", first_message(.0))]
    Validation(Vec<Issue>),
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the auth endpoints. Keeps the session cookie between calls.
#[derive(Clone)]
pub struct AuthClient {
    base_url: String,
    http: reqwest::Client,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: &Submission) -> Result<Response, ClientError> {
        Ok(self.http.post(self.url(path)).json(body).send().await?)
    }

    #[instrument(skip_all)]
    pub async fn register(&self, form: &RegisterForm) -> Result<PublicUser, ClientError> {
        let submission = form.validate().map_err(ClientError::Validation)?;
        let res = self.post("/auth/register", &submission).await?;
        match res.status() {
            s if s.is_success() => Ok(res.json::<RegisterResponse>().await?.data),
            StatusCode::CONFLICT => Err(ClientError::UserExists),
            _ => Err(status_error(res).await),
        }
    }

    #[instrument(skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<LoginData, ClientError> {
        let submission = form.validate().map_err(ClientError::Validation)?;
        let res = self.post("/auth/login", &submission).await?;
        match res.status() {
            s if s.is_success() => {
                let body = res.json::<LoginResponse>().await?;
                debug!(user_id = %body.data.user_id, "logged in");
                Ok(body.data)
            }
            StatusCode::UNAUTHORIZED => Err(ClientError::InvalidCredentials),
            _ => Err(status_error(res).await),
        }
    }

    pub async fn me(&self) -> Result<PublicUser, ClientError> {
        let res = self.http.get(self.url("/auth/me")).send().await?;
        if res.status().is_success() {
            Ok(res.json::<PublicUser>().await?)
        } else {
            Err(status_error(res).await)
        }
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let res = self.http.post(self.url("/auth/logout")).send().await?;
        if res.status().is_success() {
            res.json::<MessageResponse>().await?;
            Ok(())
        } else {
            Err(status_error(res).await)
        }
    }
}

async fn status_error(res: Response) -> ClientError {
    let status = res.status();
    let message = match res.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    ClientError::Status {
        status: status.as_u16(),
        message,
    }
}
