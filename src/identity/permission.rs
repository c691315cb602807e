use super::UserProfile;

/// Coarse role gating whole screens. Closed set: unknown tags collapse to
/// `User` rather than failing, matching how the backend treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Editor,
    Admin,
}

impl Role {
    pub fn from_tag(tag: &str) -> Role {
        match tag {
            "Admin" => Role::Admin,
            "Editor" => Role::Editor,
            _ => Role::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Editor => "Editor",
            Role::Admin => "Admin",
        }
    }
}

/// Pure derivation of the gating surface from a profile snapshot. Holds no
/// storage of its own; callers re-derive from the current session user at
/// each point of use because the profile can change under them after a
/// background refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    pub role: Role,
    pub can_view: bool,
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Permissions {
    pub fn of(user: &UserProfile) -> Self {
        Self {
            role: Role::from_tag(&user.role_tag),
            // The flags are independent grants; Admin does not imply them.
            can_view: user.can_view,
            can_create: user.can_create,
            can_edit: user.can_edit,
            can_delete: user.can_delete,
        }
    }

    /// Screens restricted to administrators (employee management).
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}
