//! Process-wide session: who is signed in and whether that answer can be
//! trusted yet.
//!
//! A `SessionManager` is created once per process with [`SessionManager::init`],
//! which restores the persisted identity. `login` and `signup` hold the
//! loading flag for their whole duration through a scope guard, so every exit
//! path (success, rejection, cancellation) releases it.

use crate::credentials::CredentialStore;
use crate::errors::AuthError;
use crate::models::{Identity, Role, looks_like_email};
use crate::storage::{KeyValueStore, read_json, write_json};
use crate::timer::cancellable_delay;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Storage key holding the serialized [`Identity`].
pub const SESSION_KEY: &str = "micromood-user";

const MIN_SECRET_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    restored: bool,
    in_flight: usize,
}

pub struct SessionManager {
    credentials: Arc<CredentialStore>,
    store: Arc<dyn KeyValueStore>,
    latency: Duration,
    state: Mutex<SessionState>,
    shutdown: CancellationToken,
}

impl SessionManager {
    /// Builds a manager that has not restored yet; it reports `loading` until
    /// [`restore`](Self::restore) runs.
    pub fn new(
        credentials: Arc<CredentialStore>,
        store: Arc<dyn KeyValueStore>,
        latency: Duration,
    ) -> Self {
        Self {
            credentials,
            store,
            latency,
            state: Mutex::new(SessionState::default()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn init(
        credentials: Arc<CredentialStore>,
        store: Arc<dyn KeyValueStore>,
        latency: Duration,
    ) -> Self {
        let manager = Self::new(credentials, store, latency);
        manager.restore();
        manager
    }

    /// Rehydrates the persisted identity. Only the first call has an effect.
    pub fn restore(&self) {
        if self.lock().restored {
            debug!("session already restored");
            return;
        }

        let _loading = self.begin();
        let identity: Option<Identity> = read_json(self.store.as_ref(), SESSION_KEY);
        match &identity {
            Some(identity) => info!(email = %identity.email, role = %identity.role, "session restored"),
            None => debug!("no stored session"),
        }

        let mut state = self.lock();
        state.identity = identity;
        state.restored = true;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            identity: state.identity.clone(),
            loading: !state.restored || state.in_flight > 0,
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.lock().identity.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().loading
    }

    pub async fn login(&self, email: &str, secret: &str) -> Result<Identity, AuthError> {
        let _loading = self.begin();
        self.simulate_latency().await?;

        let credentials = Arc::clone(&self.credentials);
        let (lookup_email, lookup_secret) = (email.to_string(), secret.to_string());
        let found = tokio::task::spawn_blocking(move || {
            credentials
                .find_account(&lookup_email, &lookup_secret)
                .map(|account| account.identity())
        })
        .await
        .map_err(|err| AuthError::Hash(err.to_string()))?;

        let Some(identity) = found else {
            warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        self.adopt(identity.clone());
        info!(email, role = %identity.role, "logged in");
        Ok(identity)
    }

    pub async fn signup(&self, name: &str, email: &str, secret: &str) -> Result<(), AuthError> {
        let _loading = self.begin();
        self.simulate_latency().await?;

        if self.credentials.contains_email(email) {
            warn!(email, "signup rejected: account exists");
            return Err(AuthError::AccountExists);
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidSignup("name is required".into()));
        }
        if !looks_like_email(email) {
            return Err(AuthError::InvalidSignup("please enter a valid email".into()));
        }
        if secret.chars().count() < MIN_SECRET_LEN {
            return Err(AuthError::InvalidSignup(format!(
                "password must be at least {MIN_SECRET_LEN} characters"
            )));
        }

        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: Role::User,
        };
        self.adopt(identity);
        info!(email, "signed up");
        Ok(())
    }

    pub fn logout(&self) {
        let previous = self.lock().identity.take();
        if let Err(err) = self.store.remove_item(SESSION_KEY) {
            error!("failed to clear stored session: {err}");
        }
        if let Some(identity) = previous {
            info!(email = %identity.email, "logged out");
        }
    }

    /// Replaces the signed-in identity after a profile edit. Does nothing
    /// when someone else is signed in.
    pub fn update_identity(&self, identity: Identity) -> bool {
        let current = self.lock().identity.as_ref().map(|current| current.id.clone());
        if current.as_deref() != Some(identity.id.as_str()) {
            debug!(id = %identity.id, "identity update ignored: not signed in");
            return false;
        }
        info!(email = %identity.email, "session identity updated");
        self.adopt(identity);
        true
    }

    /// Cancels pending latency waits. Cancelled operations leave the session as it was.
    pub fn teardown(&self) {
        self.shutdown.cancel();
        debug!("session manager torn down");
    }

    async fn simulate_latency(&self) -> Result<(), AuthError> {
        cancellable_delay(self.latency, &self.shutdown)
            .await
            .map_err(|_| AuthError::Cancelled)
    }

    fn adopt(&self, identity: Identity) {
        if let Err(err) = write_json(self.store.as_ref(), SESSION_KEY, &identity) {
            error!("failed to persist session: {err}");
        }
        self.lock().identity = Some(identity);
    }

    fn begin(&self) -> LoadingGuard<'_> {
        self.lock().in_flight += 1;
        LoadingGuard { manager: self }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LoadingGuard<'a> {
    manager: &'a SessionManager,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.manager.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use once_cell::sync::Lazy;

    static CREDENTIALS: Lazy<Arc<CredentialStore>> =
        Lazy::new(|| Arc::new(CredentialStore::seeded().expect("seed credentials")));

    fn manager_with(store: Arc<dyn KeyValueStore>) -> SessionManager {
        SessionManager::init(Arc::clone(&CREDENTIALS), store, Duration::from_millis(1000))
    }

    fn fresh_manager() -> (SessionManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (manager_with(store.clone()), store)
    }

    #[test]
    fn loading_until_restored() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(Arc::clone(&CREDENTIALS), store, Duration::ZERO);
        assert!(manager.is_loading());

        manager.restore();
        assert_eq!(manager.snapshot(), SessionSnapshot::signed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn admin_login_strips_secret_and_persists() {
        let (manager, store) = fresh_manager();

        let identity = manager
            .login("admin@micromood.com", "admin123")
            .await
            .expect("admin login");
        assert_eq!(identity.name, "Admin User");
        assert_eq!(identity.email, "admin@micromood.com");
        assert_eq!(identity.role, Role::Admin);
        assert!(!manager.is_loading());

        let stored = store.get_item(SESSION_KEY).expect("persisted identity");
        assert!(!stored.contains("admin123"));
        assert!(!stored.contains("password"));
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_secret_is_rejected_and_releases_loading() {
        let (manager, store) = fresh_manager();

        let err = manager
            .login("admin@micromood.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
        assert_eq!(manager.snapshot(), SessionSnapshot::signed_out());
        assert_eq!(store.get_item(SESSION_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn login_reports_loading_while_waiting() {
        let (manager, _store) = fresh_manager();
        let manager = Arc::new(manager);

        let pending = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.login("user@micromood.com", "user123").await })
        };
        tokio::task::yield_now().await;
        assert!(manager.is_loading());
        assert_eq!(manager.identity(), None);

        let identity = pending.await.unwrap().expect("user login");
        assert_eq!(identity.role, Role::User);
        assert!(!manager.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn restore_in_fresh_manager_yields_same_identity() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = manager_with(Arc::clone(&store));
        let identity = first.login("user@micromood.com", "user123").await.unwrap();

        let second = manager_with(store);
        assert_eq!(second.snapshot(), SessionSnapshot::signed_in(identity));
    }

    #[test]
    fn malformed_stored_session_means_signed_out() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(SESSION_KEY, "{\"id\":\"1\",\"role\":\"root\"}".into())
            .unwrap();

        let manager = manager_with(store);
        assert_eq!(manager.snapshot(), SessionSnapshot::signed_out());
    }

    #[test]
    fn restore_only_runs_once() {
        let (manager, store) = fresh_manager();
        let identity = Identity {
            id: "9".into(),
            email: "late@micromood.com".into(),
            name: "Late".into(),
            role: Role::User,
        };
        write_json(store.as_ref(), SESSION_KEY, &identity).unwrap();

        manager.restore();
        assert_eq!(manager.identity(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn signup_with_existing_email_changes_nothing() {
        let (manager, store) = fresh_manager();

        let err = manager
            .signup("Someone", "user@micromood.com", "whatever")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::AccountExists);
        assert_eq!(manager.snapshot(), SessionSnapshot::signed_out());
        assert_eq!(store.get_item(SESSION_KEY), None);
        assert_eq!(CREDENTIALS.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn signup_adopts_new_user_identity() {
        let (manager, store) = fresh_manager();

        manager
            .signup("Alex Johnson", "alex@example.com", "secret1")
            .await
            .expect("signup");

        let identity = manager.identity().expect("signed in");
        assert_eq!(identity.name, "Alex Johnson");
        assert_eq!(identity.role, Role::User);
        assert!(Uuid::parse_str(&identity.id).is_ok());
        assert!(!store.get_item(SESSION_KEY).unwrap().contains("secret1"));
        assert!(!manager.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn signup_validates_fields() {
        let (manager, _store) = fresh_manager();

        let short = manager.signup("Alex", "alex@example.com", "abc").await;
        assert!(matches!(short, Err(AuthError::InvalidSignup(_))));
        let bad_email = manager.signup("Alex", "alex", "secret1").await;
        assert!(matches!(bad_email, Err(AuthError::InvalidSignup(_))));
        let no_name = manager.signup("  ", "alex@example.com", "secret1").await;
        assert!(matches!(no_name, Err(AuthError::InvalidSignup(_))));
        assert_eq!(manager.snapshot(), SessionSnapshot::signed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_login() {
        let (manager, store) = fresh_manager();
        let manager = Arc::new(manager);

        let pending = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.login("admin@micromood.com", "admin123").await })
        };
        tokio::task::yield_now().await;
        manager.teardown();

        assert_eq!(pending.await.unwrap(), Err(AuthError::Cancelled));
        assert_eq!(manager.snapshot(), SessionSnapshot::signed_out());
        assert_eq!(store.get_item(SESSION_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_clears_identity_and_storage() {
        let (manager, store) = fresh_manager();
        manager.login("user@micromood.com", "user123").await.unwrap();

        manager.logout();
        assert_eq!(manager.identity(), None);
        assert_eq!(store.get_item(SESSION_KEY), None);

        manager.logout();
        assert_eq!(manager.identity(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn identity_updates_only_apply_to_the_signed_in_account() {
        let (manager, store) = fresh_manager();
        let mut identity = manager.login("admin@micromood.com", "admin123").await.unwrap();

        identity.name = "Admin Renamed".into();
        assert!(manager.update_identity(identity.clone()));
        assert_eq!(manager.identity(), Some(identity.clone()));
        assert!(store.get_item(SESSION_KEY).unwrap().contains("Admin Renamed"));

        let stranger = Identity {
            id: "42".into(),
            ..identity.clone()
        };
        assert!(!manager.update_identity(stranger));
        assert_eq!(manager.identity(), Some(identity.clone()));

        manager.logout();
        identity.name = "Ghost".into();
        assert!(!manager.update_identity(identity));
        assert_eq!(store.get_item(SESSION_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_login_keeps_previous_identity() {
        let (manager, _store) = fresh_manager();
        let identity = manager.login("user@micromood.com", "user123").await.unwrap();

        let _ = manager.login("admin@micromood.com", "nope").await;
        assert_eq!(manager.identity(), Some(identity));
    }
}
