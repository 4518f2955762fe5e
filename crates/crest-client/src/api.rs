//! Endpoint resolver for heterogeneous backend deployments.
//!
//! Backend deployments vary in route naming. Each logical operation here
//! has one primary endpoint and at most one fallback, tried only when the
//! primary reports that the route or method does not exist (404/405 —
//! `CrestError::is_route_missing`). Any other failure propagates
//! unchanged: the fallback is a one-shot linear attempt, not a retry loop.
//! Whatever endpoint answers, the response is normalized to the canonical
//! shapes from `crest-core` before it leaves this module.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info, warn};

use crest_core::Result;
use crest_core::backend::{ChatBackend, LoginOutcome};
use crest_core::canonical;
use crest_core::conversation::{Conversation, Message};
use crest_core::knowledge::KnowledgeItem;
use crest_core::user::User;

use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::transport::ApiClient;

/// Title given to conversations synthesized from a flat message list.
const SYNTHESIZED_TITLE: &str = "Chat";

/// The concrete [`ChatBackend`] over HTTP.
pub struct CrestApi {
    transport: ApiClient,
    credentials: CredentialStore,
    site_url: Option<String>,
}

impl CrestApi {
    /// Creates a resolver for the configured backend.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let credentials = CredentialStore::new();
        let transport = ApiClient::new(&config.backend_url, credentials.clone())?;
        Ok(Self {
            transport,
            credentials,
            site_url: config.site_url.clone(),
        })
    }

    /// Creates a resolver from config.toml / environment configuration.
    pub fn try_from_env() -> Result<Self> {
        Self::new(&ClientConfig::load())
    }

    /// The credential store shared with the transport.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Login fallback: OAuth2-style password grant against the token path,
    /// followed by a best-effort profile fetch to fill in the user.
    async fn login_via_token_grant(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        info!("login route missing, falling back to token grant");
        let form = [("username", email), ("password", password)];
        let payload = self.transport.send_form("/auth/token", &form).await?;
        let outcome: LoginOutcome = serde_json::from_value(payload)?;
        self.credentials
            .set(Some(outcome.access_token.clone()))
            .await;

        let user = match self.profile().await {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "profile fetch after token grant failed");
                None
            }
        };
        Ok(LoginOutcome {
            access_token: outcome.access_token,
            user,
        })
    }
}

#[async_trait]
impl ChatBackend for CrestApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let body = json!({ "email": email, "password": password });
        match self
            .transport
            .send(Method::POST, "/auth/login", &[], Some(&body))
            .await
        {
            Ok(payload) => {
                let outcome: LoginOutcome = serde_json::from_value(payload)?;
                self.credentials
                    .set(Some(outcome.access_token.clone()))
                    .await;
                Ok(outcome)
            }
            Err(err) if err.is_route_missing() => self.login_via_token_grant(email, password).await,
            Err(err) => Err(err),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<()> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(site_url) = &self.site_url {
            body["emailRedirectTo"] = json!(site_url);
        }
        match self
            .transport
            .send(Method::POST, "/auth/register", &[], Some(&body))
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if err.is_route_missing() => {
                info!("register route missing, falling back to signup");
                let body = json!({ "email": email, "password": password });
                self.transport
                    .send(Method::POST, "/auth/signup", &[], Some(&body))
                    .await?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn profile(&self) -> Result<User> {
        let payload = self
            .transport
            .send(Method::GET, "/auth/me", &[], None)
            .await?;
        Ok(serde_json::from_value(payload)?)
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let payload = match self
            .transport
            .send(Method::GET, "/conversations", &[], None)
            .await
        {
            Err(err) if err.is_route_missing() => {
                debug!("conversation list route missing, trying chat namespace");
                self.transport
                    .send(Method::GET, "/chat/conversations", &[], None)
                    .await?
            }
            other => other?,
        };
        Ok(payload
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(canonical::conversation_from_value)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_conversation(&self, title: &str) -> Result<Option<Conversation>> {
        let body = json!({ "title": title });
        let payload = match self
            .transport
            .send(Method::POST, "/conversations", &[], Some(&body))
            .await
        {
            Err(err) if err.is_route_missing() => {
                debug!("conversation create route missing, trying chat namespace");
                self.transport
                    .send(Method::POST, "/chat/conversations", &[], Some(&body))
                    .await?
            }
            other => other?,
        };
        Ok(canonical::conversation_from_value(&payload))
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation> {
        match self
            .transport
            .send(Method::GET, &format!("/conversations/{id}"), &[], None)
            .await
        {
            Ok(payload) => Ok(canonical::conversation_detail(id, &payload)),
            Err(err) if err.is_route_missing() => {
                debug!(id, "conversation detail route missing, fetching flat message list");
                let payload = self
                    .transport
                    .send(
                        Method::GET,
                        &format!("/chat/conversations/{id}/messages"),
                        &[],
                        None,
                    )
                    .await?;
                Ok(Conversation {
                    id: id.to_string(),
                    title: SYNTHESIZED_TITLE.to_string(),
                    messages: canonical::message_list(&payload),
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn send_message(&self, conversation_id: &str, content: &str) -> Result<Option<Message>> {
        let payload = match self
            .transport
            .send(
                Method::POST,
                &format!("/conversations/{conversation_id}/messages"),
                &[],
                Some(&json!({ "content": content })),
            )
            .await
        {
            Err(err) if err.is_route_missing() => {
                debug!(conversation_id, "message route missing, posting to flat endpoint");
                let body = json!({ "content": content, "session_id": conversation_id });
                let payload = self
                    .transport
                    .send(Method::POST, "/chat/messages", &[], Some(&body))
                    .await?;
                // A bare array from the flat endpoint is the message list.
                if payload.is_array() {
                    json!({ "messages": payload })
                } else {
                    payload
                }
            }
            other => other?,
        };
        Ok(canonical::assistant_reply(&payload))
    }

    async fn search_knowledge(&self, query: &str) -> Result<Vec<KnowledgeItem>> {
        let payload = match self
            .transport
            .send(Method::GET, "/rag/search", &[("q", query)], None)
            .await
        {
            Err(err) if err.is_route_missing() => {
                debug!("search route rejected GET, falling back to POST");
                let body = json!({ "query": query, "top_k": 3 });
                self.transport
                    .send(Method::POST, "/rag/search", &[], Some(&body))
                    .await?
            }
            other => other?,
        };
        Ok(canonical::knowledge_list(&payload))
    }

    async fn set_credential(&self, token: Option<String>) {
        self.credentials.set(token).await;
    }

    async fn credential(&self) -> Option<String> {
        self.credentials.get().await
    }
}
