//! Session lifecycle: bootstrap, login, register, logout.
//!
//! The session is an explicit object handed to whatever needs auth
//! context — there is no ambient singleton. Two durable keys (`token`,
//! `user.json`) back it; every operation keeps the persisted pair and
//! the in-memory pair consistent: both present or both absent, never
//! one without the other. There is no token refresh and no automatic
//! logout on 401.

use anyhow::{bail, Result};

use crate::client::{Backend, HttpBackend};
use crate::config::Config;
use crate::models::User;
use crate::store::{StateDir, TOKEN_KEY, USER_KEY};

pub struct SessionStore {
    state: StateDir,
    token: Option<String>,
    user: Option<User>,
}

impl SessionStore {
    /// Restore the persisted session.
    ///
    /// When either key is missing, or the user record fails to parse,
    /// both keys are cleared and the session starts unauthenticated —
    /// corruption reads as "never logged in".
    pub fn bootstrap(state: StateDir) -> Self {
        let token = state.read(TOKEN_KEY);
        let user_raw = state.read(USER_KEY);
        let had_any = token.is_some() || user_raw.is_some();

        let restored = match (token, user_raw) {
            (Some(token), Some(raw)) => serde_json::from_str::<User>(&raw)
                .ok()
                .map(|user| (token, user)),
            _ => None,
        };

        match restored {
            Some((token, user)) => Self {
                state,
                token: Some(token),
                user: Some(user),
            },
            None => {
                if had_any {
                    let _ = state.remove(TOKEN_KEY);
                    let _ = state.remove(USER_KEY);
                }
                Self {
                    state,
                    token: None,
                    user: None,
                }
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Exchange credentials for a session. Returns whether login
    /// succeeded; a backend failure prints a notification and leaves the
    /// session untouched rather than raising.
    pub async fn login(
        &mut self,
        backend: &dyn Backend,
        email: &str,
        password: &str,
    ) -> Result<bool> {
        match backend.login(email, password).await {
            Ok(resp) => {
                self.state.write(TOKEN_KEY, &resp.token)?;
                if let Err(err) = self.state.save_json(USER_KEY, &resp.user) {
                    // Half-written sessions violate the pair invariant.
                    let _ = self.state.remove(TOKEN_KEY);
                    return Err(err);
                }
                self.token = Some(resp.token);
                self.user = Some(resp.user);
                Ok(true)
            }
            Err(err) => {
                eprintln!("Login failed: {}", err);
                Ok(false)
            }
        }
    }

    /// Create an account. Does not authenticate — the user logs in
    /// separately afterwards. Same boolean-plus-notification shape as
    /// [`SessionStore::login`].
    pub async fn register(
        &self,
        backend: &dyn Backend,
        email: &str,
        password: &str,
    ) -> Result<bool> {
        match backend.register(email, password).await {
            Ok(message) => {
                println!(
                    "{}",
                    message.unwrap_or_else(|| {
                        "Account created. Log in with `kb login`.".to_string()
                    })
                );
                Ok(true)
            }
            Err(err) => {
                eprintln!("Registration failed: {}", err);
                Ok(false)
            }
        }
    }

    /// Clear the persisted and in-memory session unconditionally.
    pub fn logout(&mut self) {
        let _ = self.state.remove(TOKEN_KEY);
        let _ = self.state.remove(USER_KEY);
        self.token = None;
        self.user = None;
    }
}

/// Bootstrap the session from the configured state directory.
pub fn open_session(config: &Config) -> SessionStore {
    SessionStore::bootstrap(StateDir::new(&config.storage.dir))
}

/// An authenticated HTTP backend, or an error telling the user to log in.
/// Every command that talks to the backend goes through this gate.
pub fn require_backend(config: &Config) -> Result<HttpBackend> {
    let session = open_session(config);
    match session.token() {
        Some(token) => Ok(HttpBackend::new(&config.api, Some(token.to_string()))?),
        None => bail!("not logged in — run `kb login` first"),
    }
}

// ============ CLI entry points ============

pub async fn run_login(config: &Config, email: &str, password: &str) -> Result<()> {
    let backend = HttpBackend::new(&config.api, None)?;
    let mut session = open_session(config);

    if session.login(&backend, email, password).await? {
        // login() leaves user set on success
        if let Some(user) = session.user() {
            println!("Logged in as {} ({})", user.email, user.role);
        }
        Ok(())
    } else {
        std::process::exit(1);
    }
}

pub async fn run_register(config: &Config, email: &str, password: &str) -> Result<()> {
    let backend = HttpBackend::new(&config.api, None)?;
    let session = open_session(config);

    if session.register(&backend, email, password).await? {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

pub fn run_logout(config: &Config) -> Result<()> {
    let mut session = open_session(config);
    session.logout();
    println!("Logged out.");
    Ok(())
}

pub fn run_whoami(config: &Config) -> Result<()> {
    let session = open_session(config);
    match session.user() {
        Some(user) => println!("{} ({})", user.email, user.role),
        None => println!("Not logged in."),
    }
    Ok(())
}
