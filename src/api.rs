//! HTTP wrappers for the KeyHub admin API.
//!
//! The backend signals failure in two shapes depending on the endpoint: an
//! `error` field, or `success: false` with a `message`. Both are normalized
//! here into [`ApiError::Rejected`] so nothing past this module has to know
//! which endpoint it is talking to.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ApiError, Result};
use crate::models::{AdminUser, Binding, CreateAdmin, CreateKey, LicenseKey, Project, ProjectInput};
use crate::session::SessionStore;

/// Header carrying the admin session token.
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// Client-side view of the admin API. [`ApiClient`] implements this over
/// HTTP; tests implement it in memory.
#[allow(async_fn_in_trait)]
pub trait AdminApi {
    async fn login(&self, username: &str, password: &str) -> Result<String>;

    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn create_project(&self, input: &ProjectInput) -> Result<()>;
    async fn update_project(&self, id: i64, input: &ProjectInput) -> Result<()>;
    async fn delete_project(&self, id: i64) -> Result<()>;

    async fn list_keys(&self, project_id: i64) -> Result<Vec<LicenseKey>>;
    /// Returns the created key value (server-generated unless the input
    /// carried a custom one).
    async fn create_key(&self, input: &CreateKey) -> Result<String>;
    async fn delete_key(&self, key: &str, project_id: Option<i64>) -> Result<()>;
    async fn set_key_status(&self, key: &str, active: bool, project_id: Option<i64>)
    -> Result<()>;
    async fn update_key_remarks(
        &self,
        key: &str,
        remarks: &str,
        project_id: Option<i64>,
    ) -> Result<()>;

    async fn list_bindings(&self, key: &str) -> Result<Vec<Binding>>;
    async fn delete_binding(&self, id: i64) -> Result<()>;

    async fn list_admins(&self) -> Result<Vec<AdminUser>>;
    async fn create_admin(&self, input: &CreateAdmin) -> Result<()>;
    async fn rename_admin(&self, username: &str, new_username: &str) -> Result<()>;
    async fn change_password(&self, username: &str, new_password: &str) -> Result<()>;
    async fn delete_admin(&self, username: &str) -> Result<()>;
}

/// Response body shared by every mutating endpoint. Individual fields are
/// optional because the two backend variants disagree on which are present.
#[derive(Debug, Default, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Created key value, on key creation.
    #[serde(default)]
    pub key: Option<String>,
    /// Session token, on login.
    #[serde(default)]
    pub token: Option<String>,
}

impl Outcome {
    /// Normalize the body into a single failure indicator.
    pub fn into_result(self, http_ok: bool) -> Result<Outcome> {
        if let Some(error) = self.error {
            return Err(ApiError::Rejected(error));
        }
        if self.success == Some(false) || !http_ok {
            return Err(ApiError::rejected(self.message));
        }
        Ok(self)
    }
}

/// HTTP implementation of [`AdminApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: Url, session: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid url {path}: {e}")))
    }

    /// Build a request with the stored token attached, when present.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "api request");
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            builder = builder.header(ADMIN_TOKEN_HEADER, token);
        }
        Ok(builder)
    }

    /// Send a request. Any 401 clears the stored session before surfacing
    /// as [`ApiError::Unauthorized`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("session rejected by backend, clearing stored token");
            self.session.clear();
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }

    /// Read a list response body, surfacing backend rejections on non-2xx.
    async fn read_list<T: DeserializeOwned>(&self, response: Response) -> Result<Vec<T>> {
        if !response.status().is_success() {
            let body: Outcome = response.json().await.unwrap_or_default();
            return body.into_result(false).map(|_| Vec::new());
        }
        Ok(response.json().await?)
    }

    /// Read a mutation response body and normalize its failure shape.
    async fn read_outcome(&self, response: Response) -> Result<Outcome> {
        let http_ok = response.status().is_success();
        let body: Outcome = response.json().await.unwrap_or_default();
        body.into_result(http_ok)
    }

    fn key_path(key: &str, suffix: &str) -> String {
        format!("/api/keys/{}{}", urlencoding::encode(key), suffix)
    }

    fn scope(project_id: Option<i64>) -> Vec<(&'static str, i64)> {
        project_id.map(|id| ("project_id", id)).into_iter().collect()
    }
}

impl AdminApi for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<String> {
        // Login bypasses send(): a 401 here means bad credentials, not an
        // expired session, and the body carries the reason.
        let response = self
            .http
            .post(self.endpoint("/api/login")?)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        let http_ok = response.status().is_success();
        let body: Outcome = response.json().await.unwrap_or_default();
        let outcome = body.into_result(http_ok)?;
        let token = outcome
            .token
            .ok_or_else(|| ApiError::Transport("login response missing token".into()))?;
        self.session.set_token(&token);
        Ok(token)
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        let response = self.send(self.request(Method::GET, "/api/projects")?).await?;
        self.read_list(response).await
    }

    async fn create_project(&self, input: &ProjectInput) -> Result<()> {
        let builder = self.request(Method::POST, "/api/projects")?.json(input);
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn update_project(&self, id: i64, input: &ProjectInput) -> Result<()> {
        let builder = self
            .request(Method::PUT, &format!("/api/projects/{id}"))?
            .json(input);
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn delete_project(&self, id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("/api/projects/{id}"))?;
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn list_keys(&self, project_id: i64) -> Result<Vec<LicenseKey>> {
        let builder = self
            .request(Method::GET, "/api/keys")?
            .query(&[("project_id", project_id)]);
        let response = self.send(builder).await?;
        self.read_list(response).await
    }

    async fn create_key(&self, input: &CreateKey) -> Result<String> {
        let builder = self.request(Method::POST, "/api/keys")?.json(input);
        let response = self.send(builder).await?;
        let outcome = self.read_outcome(response).await?;
        outcome
            .key
            .ok_or_else(|| ApiError::Transport("create response missing key".into()))
    }

    async fn delete_key(&self, key: &str, project_id: Option<i64>) -> Result<()> {
        let builder = self
            .request(Method::DELETE, &Self::key_path(key, ""))?
            .query(&Self::scope(project_id));
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn set_key_status(
        &self,
        key: &str,
        active: bool,
        project_id: Option<i64>,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &Self::key_path(key, "/status"))?
            .query(&Self::scope(project_id))
            .json(&serde_json::json!({ "is_active": active }));
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn update_key_remarks(
        &self,
        key: &str,
        remarks: &str,
        project_id: Option<i64>,
    ) -> Result<()> {
        let builder = self
            .request(Method::PUT, &Self::key_path(key, "/remarks"))?
            .query(&Self::scope(project_id))
            .json(&serde_json::json!({ "remarks": remarks }));
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn list_bindings(&self, key: &str) -> Result<Vec<Binding>> {
        let builder = self.request(Method::GET, &Self::key_path(key, "/bindings"))?;
        let response = self.send(builder).await?;
        self.read_list(response).await
    }

    async fn delete_binding(&self, id: i64) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("/api/bindings/{id}"))?;
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn list_admins(&self) -> Result<Vec<AdminUser>> {
        let response = self
            .send(self.request(Method::GET, "/api/admin/users")?)
            .await?;
        self.read_list(response).await
    }

    async fn create_admin(&self, input: &CreateAdmin) -> Result<()> {
        let builder = self.request(Method::POST, "/api/admin/users")?.json(input);
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn rename_admin(&self, username: &str, new_username: &str) -> Result<()> {
        let builder = self
            .request(
                Method::PUT,
                &format!("/api/admin/users/{}", urlencoding::encode(username)),
            )?
            .json(&serde_json::json!({ "new_username": new_username }));
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn change_password(&self, username: &str, new_password: &str) -> Result<()> {
        let builder = self
            .request(
                Method::PUT,
                &format!("/api/admin/users/{}/password", urlencoding::encode(username)),
            )?
            .json(&serde_json::json!({ "new_password": new_password }));
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }

    async fn delete_admin(&self, username: &str) -> Result<()> {
        let builder = self.request(
            Method::DELETE,
            &format!("/api/admin/users/{}", urlencoding::encode(username)),
        )?;
        let response = self.send(builder).await?;
        self.read_outcome(response).await.map(|_| ())
    }
}
