//! Credential validation and the participant directory.
//!
//! Real deployments validate tokens against the hospital's user service; the
//! server only needs the [`AccountDirectory`] seam. [`StaticAccounts`] backs
//! it with the accounts listed in the configuration file.

use std::collections::HashMap;

use hms_chat::{ChatError, Participant, Result, Role};

use crate::config::AccountConfig;

/// Identity resolved from a validated credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Account {
    pub fn participant(&self) -> Participant {
        Participant {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

pub trait AccountDirectory: Send + Sync {
    /// Resolve `token` to an account of the given role.
    fn authenticate(&self, role: Role, token: &str) -> Result<Account>;

    /// Every known participant with the given role, ordered by name.
    fn list(&self, role: Role) -> Vec<Participant>;

    fn contains(&self, role: Role, id: &str) -> bool;
}

pub struct StaticAccounts {
    by_token: HashMap<String, Account>,
}

impl StaticAccounts {
    pub fn new(accounts: &[AccountConfig]) -> Self {
        let mut by_token = HashMap::new();
        for entry in accounts {
            let account = Account {
                id: entry.id.clone(),
                name: entry.name.clone(),
                role: entry.role,
            };
            if by_token.insert(entry.token.clone(), account).is_some() {
                log::warn!("Duplicate token configured for account {}", entry.id);
            }
        }
        Self { by_token }
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

impl AccountDirectory for StaticAccounts {
    fn authenticate(&self, role: Role, token: &str) -> Result<Account> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ChatError::unauthorized("Not Authorized Login Again"));
        }
        match self.by_token.get(token) {
            Some(account) if account.role == role => Ok(account.clone()),
            Some(account) => Err(ChatError::unauthorized(format!(
                "Credential belongs to a {}, {} access required",
                account.role, role
            ))),
            None => Err(ChatError::unauthorized("Not Authorized Login Again")),
        }
    }

    fn list(&self, role: Role) -> Vec<Participant> {
        let mut participants: Vec<_> = self
            .by_token
            .values()
            .filter(|account| account.role == role)
            .map(Account::participant)
            .collect();
        participants.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        participants.dedup_by(|a, b| a.id == b.id);
        participants
    }

    fn contains(&self, role: Role, id: &str) -> bool {
        self.by_token
            .values()
            .any(|account| account.role == role && account.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> StaticAccounts {
        StaticAccounts::new(&[
            AccountConfig {
                id: "doc1".into(),
                name: "Dr. Grey".into(),
                role: Role::Doctor,
                token: "doc-token".into(),
            },
            AccountConfig {
                id: "pat2".into(),
                name: "Zoe".into(),
                role: Role::Patient,
                token: "zoe-token".into(),
            },
            AccountConfig {
                id: "pat1".into(),
                name: "Adam".into(),
                role: Role::Patient,
                token: "adam-token".into(),
            },
        ])
    }

    #[test]
    fn token_resolves_to_its_account() {
        let account = accounts().authenticate(Role::Doctor, "doc-token").unwrap();
        assert_eq!(account.id, "doc1");
        assert_eq!(account.role, Role::Doctor);
    }

    #[test]
    fn wrong_role_unknown_and_blank_tokens_are_rejected() {
        let accounts = accounts();
        for (role, token) in [
            (Role::Patient, "doc-token"),
            (Role::Doctor, "nope"),
            (Role::Doctor, "  "),
        ] {
            assert!(matches!(
                accounts.authenticate(role, token),
                Err(ChatError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn membership_is_checked_per_role() {
        let accounts = accounts();
        assert!(accounts.contains(Role::Patient, "pat1"));
        assert!(accounts.contains(Role::Doctor, "doc1"));
        assert!(!accounts.contains(Role::Doctor, "pat1"));
        assert!(!accounts.contains(Role::Patient, "ghost"));
    }

    #[test]
    fn patients_are_listed_by_name() {
        let names: Vec<_> = accounts()
            .list(Role::Patient)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Adam", "Zoe"]);
    }
}
