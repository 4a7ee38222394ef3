//! User picker of the award dialogs.

use super::ViewContext;
use crate::api::User;
use crate::error::GatewayError;

/// Most matches the picker shows.
pub const MAX_MATCHES: usize = 10;

#[derive(Debug, Default)]
pub struct AwardPicker {
    users: Vec<User>,
}

impl AwardPicker {
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn load(ctx: &ViewContext) -> Result<Self, GatewayError> {
        Ok(Self::from_users(ctx.api().list_users().await?))
    }

    #[must_use]
    pub const fn from_users(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Users whose login or email contains `term`, ignoring case.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&User> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.users
            .iter()
            .filter(|user| {
                [user.login.as_deref(), user.email.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&term))
            })
            .take(MAX_MATCHES)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_caps_and_matches_login_or_email() {
        let users: Vec<User> = (1..=15)
            .map(|i| {
                serde_json::from_value(serde_json::json!({
                    "id": i,
                    "email": format!("walker{i}@meract.app"),
                    "login": if i == 3 { "Trailblazer" } else { "" }
                }))
                .unwrap()
            })
            .collect();
        let picker = AwardPicker::from_users(users);

        assert_eq!(picker.search("WALKER").len(), MAX_MATCHES);
        let found = picker.search("blazer");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].display_name(), "Trailblazer");
        assert!(picker.search("  ").is_empty());
    }
}
