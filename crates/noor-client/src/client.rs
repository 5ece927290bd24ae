use reqwest::header::USER_AGENT;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, info};
use uuid::Uuid;

use noor_types::api::{DuaMessage, GetDuaRequest, LoginRequest, RegisterRequest, SaveDuaRequest, SessionResponse};
use noor_types::models::SavedDua;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{Principal, SessionProvider};

/// HTTP handle to a NoorAI server plus the session it signs in to.
/// Cloning shares both the connection pool and the session.
#[derive(Clone)]
pub struct NoorClient {
    http: Client,
    base_url: String,
    app_name: String,
    session: SessionProvider,
}

impl NoorClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.clone(),
            app_name: config.app_name.clone(),
            session: SessionProvider::new(),
        }
    }

    pub fn session(&self) -> &SessionProvider {
        &self.session
    }

    // -- Identity --

    /// Create an account and sign it in.
    pub async fn register(
        &self,
        username: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Principal, ClientError> {
        let res = self
            .request(Method::POST, "/auth/register")
            .json(&RegisterRequest {
                username: username.into(),
                display_name: display_name.into(),
                password: password.into(),
            })
            .send()
            .await?;

        let session: SessionResponse = check(res).await?.json().await?;
        Ok(self.start_session(session))
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Principal, ClientError> {
        let res = self
            .request(Method::POST, "/auth/login")
            .json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .send()
            .await?;

        let session: SessionResponse = check(res).await?.json().await?;
        Ok(self.start_session(session))
    }

    /// Tokens are stateless, so signing out only forgets the session locally.
    pub fn sign_out(&self) {
        if let Some(principal) = self.session.current() {
            info!("Signing out {}", principal.username);
        }
        self.session.publish(None);
    }

    fn start_session(&self, session: SessionResponse) -> Principal {
        let principal = Principal::from(session);
        info!("Signed in as {}", principal.username);
        self.session.publish(Some(principal.clone()));
        principal
    }

    // -- Completion proxy --

    pub async fn get_dua(&self, feeling: &str) -> Result<String, ClientError> {
        let res = self
            .request(Method::POST, "/api/getDua")
            .json(&GetDuaRequest {
                feeling: Some(feeling.into()),
            })
            .send()
            .await?;

        let reply: DuaMessage = check(res).await?.json().await?;
        Ok(reply.message)
    }

    // -- Saved duas --

    pub async fn save_dua(&self, principal: &Principal, content: &str) -> Result<SavedDua, ClientError> {
        let res = self
            .request(Method::POST, "/api/duas")
            .bearer_auth(&principal.token)
            .json(&SaveDuaRequest {
                content: content.into(),
            })
            .send()
            .await?;

        Ok(check(res).await?.json().await?)
    }

    /// The principal's duas, newest first.
    pub async fn list_duas(&self, principal: &Principal) -> Result<Vec<SavedDua>, ClientError> {
        let res = self
            .request(Method::GET, "/api/duas")
            .bearer_auth(&principal.token)
            .send()
            .await?;

        let duas: Vec<SavedDua> = check(res).await?.json().await?;
        debug!("Loaded {} saved duas", duas.len());
        Ok(duas)
    }

    pub async fn fetch_dua(&self, principal: &Principal, id: Uuid) -> Result<SavedDua, ClientError> {
        let res = self
            .request(Method::GET, &format!("/api/duas/{}", id))
            .bearer_auth(&principal.token)
            .send()
            .await?;

        Ok(check(res).await?.json().await?)
    }

    pub async fn delete_dua(&self, principal: &Principal, id: Uuid) -> Result<(), ClientError> {
        let res = self
            .request(Method::DELETE, &format!("/api/duas/{}", id))
            .bearer_auth(&principal.token)
            .send()
            .await?;

        check(res).await?;
        Ok(())
    }

    /// Every request names the app it comes from.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header(USER_AGENT, &self.app_name)
    }
}

/// Turn a non-2xx response into [`ClientError::Status`], keeping the
/// server's `message` when it sent one.
async fn check(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<DuaMessage>(&body)
        .map(|m| m.message)
        .unwrap_or(body);

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
