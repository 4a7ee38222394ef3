use crate::session::UserProfile;

/// Sections of the console shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSection {
    Dashboard,
    Users,
    Streams,
    Guilds,
    Admins,
}

impl MenuSection {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "User Management",
            Self::Streams => "Streams",
            Self::Guilds => "Guilds",
            Self::Admins => "Admins",
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Users => "/users",
            Self::Streams => "/streams",
            Self::Guilds => "/guilds",
            Self::Admins => "/admins",
        }
    }
}

/// Sections visible to `profile`. Admin management is for the main admin only.
#[must_use]
pub fn menu_for(profile: Option<&UserProfile>) -> Vec<MenuSection> {
    let mut sections = vec![
        MenuSection::Dashboard,
        MenuSection::Users,
        MenuSection::Streams,
        MenuSection::Guilds,
    ];
    if profile.is_some_and(|p| p.admin_role().can_manage_admins()) {
        sections.push(MenuSection::Admins);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RoleInfo;

    fn with_role(name: &str) -> UserProfile {
        UserProfile {
            role: Some(RoleInfo {
                name: name.to_string(),
            }),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_admins_only_for_main_admin() {
        assert!(menu_for(Some(&with_role("main admin"))).contains(&MenuSection::Admins));
        assert!(!menu_for(Some(&with_role("admin"))).contains(&MenuSection::Admins));
        assert_eq!(menu_for(None).len(), 4);
    }
}
