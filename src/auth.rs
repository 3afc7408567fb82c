//! Sign-in against the provider's auth service (Supabase GoTrue).
//!
//! The only local logic is the two field checks done before any request and
//! caching the resulting session so later commands can reuse its token.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::config::config_dir;
use crate::error::{Error, Result};
use crate::store::rest::check;

pub const MIN_PASSWORD_LEN: usize = 6;

/// A signed-in user as cached on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<AuthUser>,
}

#[derive(Serialize, Debug)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Trims the email and checks both fields.
    pub fn new(email: &str, password: &str) -> Result<Self> {
        let email = email.trim();
        if !looks_like_email(email) {
            return Err(Error::validation("Please enter a valid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(Self { email: email.to_string(), password: password.to_string() })
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !s.contains(char::is_whitespace)
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Rewrites the provider's two well-known failures into friendlier text.
fn friendly(err: Error) -> Error {
    match err {
        Error::Api { message, .. } if message.contains("Invalid login credentials") => {
            Error::validation("Email or password is incorrect, please try again")
        }
        Error::Api { message, .. } if message.contains("User already registered") => {
            Error::validation("This email is already registered, sign in instead")
        }
        other => other,
    }
}

pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn post(&self, path: &str, body: serde_json::Value) -> Result<TokenResponse> {
        let response = self
            .client
            .post(format!("{}/auth/v1/{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;
        Ok(check(response).map_err(friendly)?.json()?)
    }

    pub fn sign_in(&self, creds: &Credentials) -> Result<Session> {
        log::info!("signing in {}", creds.email);
        let token = self.post(
            "token?grant_type=password",
            json!({ "email": creds.email, "password": creds.password }),
        )?;
        into_session(token)
    }

    /// Registers a new account. Projects with email confirmation enabled
    /// return no session yet; that surfaces as `Ok(None)`.
    pub fn sign_up(&self, creds: &Credentials, display_name: Option<&str>) -> Result<Option<Session>> {
        log::info!("signing up {}", creds.email);
        let mut body = json!({ "email": creds.email, "password": creds.password });
        if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) {
            body["data"] = json!({ "display_name": name });
        }
        let token = self.post("signup", body)?;
        if token.access_token.is_none() {
            return Ok(None);
        }
        into_session(token).map(Some)
    }
}

fn into_session(token: TokenResponse) -> Result<Session> {
    match (token.access_token, token.user) {
        (Some(access_token), Some(user)) => Ok(Session {
            access_token,
            refresh_token: token.refresh_token,
            user_id: user.id,
            email: user.email,
        }),
        _ => Err(Error::Api { status: 200, message: "auth response carried no session".into() }),
    }
}

fn session_path() -> PathBuf {
    config_dir().join("session.json")
}

/// Cached session, if a previous `login` stored one.
pub fn load_session() -> Result<Option<Session>> {
    let path = session_path();
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&s)?))
}

pub fn save_session(session: &Session) -> Result<()> {
    write_session(&session_path(), session)
}

/// Writes the session readable by the owner only, since it holds a bearer token.
fn write_session(path: &Path, session: &Session) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    let mut file = options.open(path)?;
    file.write_all(serde_json::to_string_pretty(session)?.as_bytes())?;
    Ok(())
}

/// Forgets the cached session. Returns whether one existed.
pub fn clear_session() -> Result<bool> {
    let path = session_path();
    if path.exists() {
        fs::remove_file(path)?;
        return Ok(true);
    }
    Ok(false)
}
