//! Search filtering over the displayed collection.
//!
//! Filtering is a view: it never touches the collection, the overlay or the
//! pagination state.

use roster_types::User;

/// A free-text query matched case-insensitively against first name, last
/// name and email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    /// Build a query. Surrounding whitespace is ignored.
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
        }
    }

    /// Whether the query matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The normalized query text.
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Whether `user` matches.
    pub fn matches(&self, user: &User) -> bool {
        self.is_empty() || user.matches_lowercase(&self.needle)
    }

    /// The matching users, in display order.
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|user| self.matches(user)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_types::UserId;

    fn users() -> Vec<User> {
        vec![
            User {
                id: UserId::new(1),
                first_name: "George".into(),
                last_name: "Bluth".into(),
                email: "george.bluth@reqres.in".into(),
                avatar: String::new(),
            },
            User {
                id: UserId::new(2),
                first_name: "Janet".into(),
                last_name: "Weaver".into(),
                email: "janet.weaver@reqres.in".into(),
                avatar: String::new(),
            },
        ]
    }

    #[test]
    fn empty_query_matches_everything() {
        let users = users();
        assert_eq!(SearchQuery::new("   ").apply(&users).len(), 2);
    }

    #[test]
    fn match_is_case_insensitive() {
        let users = users();
        let hits = SearchQuery::new("JANET").apply(&users);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, UserId::new(2));
    }

    #[test]
    fn matches_last_name_and_email() {
        let users = users();
        assert_eq!(SearchQuery::new("bluth").apply(&users)[0].id, UserId::new(1));
        assert_eq!(SearchQuery::new("weaver@").apply(&users)[0].id, UserId::new(2));
        assert_eq!(SearchQuery::new("reqres.in").apply(&users).len(), 2);
    }

    #[test]
    fn no_match_yields_empty_view_and_leaves_input_alone() {
        let users = users();
        let before = users.clone();

        assert!(SearchQuery::new("smith").apply(&users).is_empty());
        assert_eq!(users, before);
    }
}
