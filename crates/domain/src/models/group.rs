//! Group domain models for family caregiving groups.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Alphabet used for invite codes: uppercase letters and digits.
const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of a generated invite code.
pub const INVITE_CODE_LEN: usize = 6;

lazy_static! {
    static ref INVITE_CODE_REGEX: Regex =
        Regex::new("^[A-Za-z0-9]{6}$").expect("invite code regex must compile");
}

/// Represents a caregiving group.
///
/// `member_ids` is ordered and append-only; the first element is the owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub member_ids: Vec<Uuid>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// The group's owner: the first member at creation time.
    pub fn owner_id(&self) -> Option<Uuid> {
        self.member_ids.first().copied()
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id() == Some(user_id)
    }
}

/// Request to join a group using an invite code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinGroupRequest {
    #[validate(regex(
        path = *INVITE_CODE_REGEX,
        message = "Invite code must be 6 letters or digits"
    ))]
    pub invite_code: String,
}

impl JoinGroupRequest {
    /// Invite codes are stored uppercase; lookups are case-insensitive.
    pub fn normalized_code(&self) -> String {
        self.invite_code.to_uppercase()
    }
}

/// Public view of a group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub member_ids: Vec<Uuid>,
    pub invite_code: String,
    pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            member_ids: group.member_ids,
            invite_code: group.invite_code,
            created_at: group.created_at,
        }
    }
}

/// Generates a random 6-character invite code from `A-Z0-9`.
///
/// Uniqueness is enforced at the persistence layer, which retries on
/// collision.
pub fn generate_invite_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    (0..INVITE_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..INVITE_CODE_ALPHABET.len());
            INVITE_CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Default group name derived from the creator's identity.
pub fn default_group_name(username: &str) -> String {
    format!("{}'s Family Group", username)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with_members(member_ids: Vec<Uuid>) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: "Test Family".to_string(),
            member_ids,
            invite_code: "ABC123".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_invite_code_format() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), INVITE_CODE_LEN);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_owner_is_first_member() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let group = group_with_members(vec![owner, other]);

        assert_eq!(group.owner_id(), Some(owner));
        assert!(group.is_owner(owner));
        assert!(!group.is_owner(other));
    }

    #[test]
    fn test_owner_of_empty_member_list() {
        let group = group_with_members(vec![]);
        assert_eq!(group.owner_id(), None);
        assert!(!group.is_owner(Uuid::new_v4()));
    }

    #[test]
    fn test_join_request_normalizes_code() {
        let request = JoinGroupRequest {
            invite_code: "abc123".to_string(),
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.normalized_code(), "ABC123");
    }

    #[test]
    fn test_join_request_rejects_bad_codes() {
        for code in ["", "ABC12", "ABC1234", "ABC-12", "ABC 12"] {
            let request = JoinGroupRequest {
                invite_code: code.to_string(),
            };
            assert!(request.validate().is_err(), "accepted: {:?}", code);
        }
    }

    #[test]
    fn test_default_group_name() {
        assert_eq!(default_group_name("alice"), "alice's Family Group");
    }
}
