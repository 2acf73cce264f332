//! The user record.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user record as served by the directory API.
///
/// Records are mutable only through an explicit update call; the avatar is
/// never edited by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Avatar image URI.
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// "First Last", as shown in listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match against first name, last name or email.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.first_name.to_lowercase().contains(needle)
            || self.last_name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn george() -> User {
        User {
            id: UserId::new(1),
            first_name: "George".into(),
            last_name: "Bluth".into(),
            email: "george.bluth@reqres.in".into(),
            avatar: "https://reqres.in/img/faces/1-image.jpg".into(),
        }
    }

    #[test]
    fn deserializes_api_shape() {
        let json = r#"{
            "id": 1,
            "email": "george.bluth@reqres.in",
            "first_name": "George",
            "last_name": "Bluth",
            "avatar": "https://reqres.in/img/faces/1-image.jpg"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user, george());
    }

    #[test]
    fn missing_avatar_defaults_to_empty() {
        let json = r#"{"id": 3, "email": "a@b.c", "first_name": "A", "last_name": "B"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.avatar.is_empty());
    }

    #[test]
    fn full_name_joins_names() {
        assert_eq!(george().full_name(), "George Bluth");
    }

    #[test]
    fn matches_any_searchable_field() {
        let user = george();
        assert!(user.matches_lowercase("geo"));
        assert!(user.matches_lowercase("bluth"));
        assert!(user.matches_lowercase("@reqres"));
        assert!(!user.matches_lowercase("smith"));
    }
}
