use serde::{Deserialize, Serialize};

use civicdesk_core::{AdminId, DomainError, DomainResult};

use crate::Role;

/// The authenticated administrator.
///
/// Construction validates every field, so an `Identity` is always complete.
/// There is no partially-populated form: absence is modeled as `Option<Identity>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IdentityRecord")]
pub struct Identity {
    id: AdminId,
    email: String,
    role: Role,
}

impl Identity {
    pub fn new(id: AdminId, email: impl Into<String>, role: Role) -> DomainResult<Self> {
        let email = email.into().trim().to_string();
        validate_email(&email)?;
        Ok(Self { id, email, role })
    }

    pub fn id(&self) -> AdminId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Wire form of [`Identity`]; only reachable through [`Identity::new`].
#[derive(Deserialize)]
struct IdentityRecord {
    id: AdminId,
    email: String,
    role: Role,
}

impl TryFrom<IdentityRecord> for Identity {
    type Error = DomainError;

    fn try_from(record: IdentityRecord) -> DomainResult<Self> {
        Identity::new(record.id, record.email, record.role)
    }
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.is_empty() {
        return Err(DomainError::validation("email cannot be empty"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::validation("invalid email format")),
    }
}

/// Access token held in memory for the lifetime of a session.
///
/// Never persisted; `Debug` is redacted so tokens do not end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_identity_trims_email() {
        let identity =
            Identity::new(AdminId::new(), "  root@citizen.gov ", Role::SuperAdmin).unwrap();
        assert_eq!(identity.email(), "root@citizen.gov");
        assert_eq!(identity.role(), Role::SuperAdmin);
    }

    #[test]
    fn new_identity_rejects_bad_email() {
        for email in ["", "   ", "no-at-sign", "@citizen.gov", "admin@"] {
            let err = Identity::new(AdminId::new(), email, Role::Admin).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{email:?} accepted");
        }
    }

    #[test]
    fn deserializing_validates_like_new() {
        let id = AdminId::new();
        let json = format!(r#"{{"id":"{id}","email":"","role":"Admin"}}"#);
        assert!(serde_json::from_str::<Identity>(&json).is_err());

        let json = format!(r#"{{"id":"{id}","email":" ops@citizen.gov ","role":"Support Admin"}}"#);
        let identity: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(identity.id(), id);
        assert_eq!(identity.email(), "ops@citizen.gov");
        assert_eq!(identity.role(), Role::SupportAdmin);
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-value");
        assert!(!format!("{token:?}").contains("secret-value"));
        assert_eq!(token.expose(), "secret-value");
    }
}
