//! The session authority: who is signed in, what they may do, and how
//! outbound requests carry that session.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

use super::capability::Capability;
use super::navigator::Navigator;
use super::profile::{ProfileRead, UserProfile};
use super::request::RequestOptions;
use super::store::{SessionStore, StorageKey};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

pub struct SessionAuthority {
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    client: reqwest::Client,
    login_path: String,
}

impl SessionAuthority {
    pub fn new(store: Arc<dyn SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator, client: reqwest::Client::new(), login_path: DEFAULT_LOGIN_PATH.to_string() }
    }

    pub fn with_login_path<S: Into<String>>(mut self, path: S) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn login_path(&self) -> &str { &self.login_path }

    fn read_key(&self, key: StorageKey) -> Option<String> {
        match self.store.read(key) {
            Ok(v) => v,
            Err(e) => {
                debug!(target: "stockdash::session", key = key.as_str(), error = %e, "session storage unreadable; treating as absent");
                None
            }
        }
    }

    /// Stored bearer token, exactly as persisted.
    pub fn get_token(&self) -> Option<String> {
        self.read_key(StorageKey::Token)
    }

    /// Stored profile, keeping the distinction between missing and unparsable.
    pub fn read_profile(&self) -> ProfileRead {
        ProfileRead::parse(self.read_key(StorageKey::User).as_deref())
    }

    pub fn get_user(&self) -> Option<UserProfile> {
        let read = self.read_profile();
        if let ProfileRead::Malformed(reason) = &read {
            debug!(target: "stockdash::session", %reason, "stored user profile is malformed; treating as absent");
        }
        read.into_option()
    }

    pub fn is_authenticated(&self) -> bool { self.get_token().is_some() }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() { SessionState::Authenticated } else { SessionState::Unauthenticated }
    }

    /// Persist a session handed over by a login flow. The profile goes in
    /// first so a failed write never leaves a token without its user.
    pub fn store_session(&self, token: &str, profile: &UserProfile) -> AppResult<()> {
        let user = serde_json::to_string(profile)?;
        self.store.write(StorageKey::User, &user)?;
        if let Err(e) = self.store.write(StorageKey::Token, token) {
            if let Err(cleanup) = self.store.remove(StorageKey::User) {
                warn!(target: "stockdash::session", error = %cleanup, "failed to roll back user after token write failure");
            }
            return Err(e.into());
        }
        info!(target: "stockdash::session", user = %profile.username, role = %profile.role, "session stored");
        Ok(())
    }

    /// Clear the session and navigate to the login entry point. Safe to call
    /// with no session present.
    pub fn logout(&self) {
        for key in [StorageKey::Token, StorageKey::User] {
            if let Err(e) = self.store.remove(key) {
                warn!(target: "stockdash::session", key = key.as_str(), error = %e, "failed to clear session key");
            }
        }
        info!(target: "stockdash::session", "session cleared");
        self.navigator.redirect(&self.login_path);
    }

    pub fn has_role<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        match self.get_user() {
            Some(user) => allowed.iter().any(|r| r.as_ref() == user.role),
            None => false,
        }
    }

    pub fn can(&self, capability: Capability) -> bool { self.has_role(capability.allowed_roles()) }

    pub fn can_add_edit(&self) -> bool { self.can(Capability::AddEdit) }

    pub fn can_delete(&self) -> bool { self.can(Capability::Delete) }

    pub fn can_manage_users(&self) -> bool { self.can(Capability::ManageUsers) }

    /// Headers every authenticated request starts from.
    pub fn build_auth_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        // an empty token still counts as signed in but is never sent
        if let Some(token) = self.get_token().filter(|t| !t.is_empty()) {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Send a request carrying the session. A 401 ends the session and fails
    /// with `authentication_required`; every other status is handed back as is.
    pub async fn authenticated_fetch(&self, url: &str, options: RequestOptions) -> AppResult<reqwest::Response> {
        let url = Url::parse(url).map_err(|e| AppError::user("invalid_url".to_string(), format!("{}: {}", url, e)))?;
        let headers = merge_headers(&self.build_auth_headers(), &options.headers)?;
        debug!(
            target: "stockdash::http",
            method = %options.method, %url,
            bearer = headers.contains_key(AUTHORIZATION),
            "authenticated request"
        );
        let mut builder = self.client.request(options.method, url.clone()).headers(headers);
        if let Some(body) = options.body {
            builder = builder.body(body);
        }
        let resp = builder.send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            warn!(target: "stockdash::http", %url, "backend rejected session (401); logging out");
            self.logout();
            return Err(AppError::authentication_required());
        }
        Ok(resp)
    }
}

/// Overlay caller headers on the authority's. Names compare case-insensitively.
pub fn merge_headers(base: &BTreeMap<String, String>, overrides: &[(String, String)]) -> AppResult<HeaderMap> {
    let mut out = HeaderMap::new();
    for (name, value) in base.iter().map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(overrides.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    {
        let hn = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| AppError::user("invalid_header".to_string(), format!("invalid header name '{}'", name)))?;
        let hv = HeaderValue::from_str(value)
            .map_err(|_| AppError::user("invalid_header".to_string(), format!("invalid value for header '{}'", name)))?;
        out.insert(hn, hv);
    }
    Ok(out)
}
