use crate::errors::{AuthError, EntryError};
use crate::models::{Identity, Role};
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Accounts available at startup as `(id, email, name, secret, role)`.
pub const DEFAULT_ACCOUNTS: &[(&str, &str, &str, &str, Role)] = &[
    ("1", "admin@micromood.com", "Admin User", "admin123", Role::Admin),
    ("2", "user@micromood.com", "Regular User", "user123", Role::User),
];

#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    secret_hash: String,
}

impl Account {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

/// Accounts seeded at startup. Only the admin profile editor changes them.
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: RwLock<Vec<Account>>,
    /// Verified against when no account matches, so misses cost a full hash check.
    decoy_hash: String,
}

impl CredentialStore {
    pub fn seeded() -> Result<Self, AuthError> {
        Self::from_seeds(DEFAULT_ACCOUNTS)
    }

    pub fn from_seeds(seeds: &[(&str, &str, &str, &str, Role)]) -> Result<Self, AuthError> {
        let mut accounts = Vec::with_capacity(seeds.len());
        for &(id, email, name, secret, role) in seeds {
            accounts.push(Account {
                id: id.to_string(),
                email: email.to_string(),
                name: name.to_string(),
                role,
                secret_hash: hash_secret(secret)?,
            });
        }
        Ok(Self {
            accounts: RwLock::new(accounts),
            decoy_hash: hash_secret(&Uuid::new_v4().to_string())?,
        })
    }

    /// Exact, case-sensitive lookup on email followed by hash verification.
    pub fn find_account(&self, email: &str, secret: &str) -> Option<Account> {
        let found = self
            .read()
            .iter()
            .find(|account| account.email == email)
            .cloned();
        match found {
            Some(account) => verify_secret(secret, &account.secret_hash).then_some(account),
            None => {
                verify_secret(secret, &self.decoy_hash);
                None
            }
        }
    }

    pub fn contains_email(&self, email: &str) -> bool {
        self.read().iter().any(|account| account.email == email)
    }

    /// Renames an account and optionally replaces its secret hash.
    pub fn update_account(
        &self,
        id: &str,
        name: &str,
        email: &str,
        secret_hash: Option<String>,
    ) -> Result<Identity, EntryError> {
        let mut accounts = self.write();
        if accounts
            .iter()
            .any(|account| account.email == email && account.id != id)
        {
            return Err(EntryError::Duplicate(email.to_string()));
        }
        let account = accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
        account.name = name.to_string();
        account.email = email.to_string();
        if let Some(hash) = secret_hash {
            account.secret_hash = hash;
        }
        Ok(account.identity())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Account>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Account>> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hashes a secret with Argon2id and a fresh salt, returning the PHC string.
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

pub fn verify_secret(secret: &str, phc: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(phc) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}
