use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::UserId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("email cannot be empty")]
    EmptyEmail,

    #[error("enter a valid email address")]
    InvalidEmail,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("passwords don't match")]
    PasswordMismatch,

    #[error("unknown user status action: {0}")]
    UnknownAction(String),
}

//
// ─── ROLE & STATUS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Suspended,
    Banned,
    Pending,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Role::Admin => "admin",
            Role::User => "user",
        })
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Banned => "banned",
            UserStatus::Pending => "pending",
        })
    }
}

/// Admin action that changes a user's account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Activate,
    Suspend,
    Ban,
}

impl StatusAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatusAction::Activate => "activate",
            StatusAction::Suspend => "suspend",
            StatusAction::Ban => "ban",
        }
    }

    #[must_use]
    pub fn resulting_status(self) -> UserStatus {
        match self {
            StatusAction::Activate => UserStatus::Active,
            StatusAction::Suspend => UserStatus::Suspended,
            StatusAction::Ban => UserStatus::Banned,
        }
    }
}

impl FromStr for StatusAction {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "activate" => Ok(Self::Activate),
            "suspend" => Ok(Self::Suspend),
            "ban" => Ok(Self::Ban),
            _ => Err(AccountError::UnknownAction(s.to_owned())),
        }
    }
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// An account as returned by the backend's profile and user endpoints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Full name, falling back to the username when blank.
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub avatar: Option<String>,
    pub bio: String,
    pub location: String,
    pub website: String,
    pub language: String,
    pub timezone: String,
    pub total_quizzes: u32,
    pub words_learned: u32,
    pub average_score: f64,
    pub date_joined: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// Editable profile fields. `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl ProfileUpdate {
    /// Copy the set fields onto `user`.
    pub fn apply_to(&self, user: &mut User) {
        let set = |slot: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                slot.clone_from(v);
            }
        };
        set(&mut user.first_name, &self.first_name);
        set(&mut user.last_name, &self.last_name);
        set(&mut user.bio, &self.bio);
        set(&mut user.location, &self.location);
        set(&mut user.website, &self.website);
        set(&mut user.language, &self.language);
        set(&mut user.timezone, &self.timezone);
        let full = format!("{} {}", user.first_name, user.last_name);
        user.name = full.trim().to_owned();
    }
}

//
// ─── REGISTRATION ──────────────────────────────────────────────────────────────
//

/// Sign-up form data in the shape the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

impl Registration {
    /// Build a registration from the sign-up form.
    ///
    /// The name is split at the first space into first and last name, and
    /// the username is the local part of the email.
    ///
    /// # Errors
    ///
    /// Returns `AccountError` for blank fields, a malformed email, or a
    /// confirmation that differs from the password.
    pub fn from_form(
        name: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Self, AccountError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountError::EmptyName);
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::EmptyEmail);
        }
        let Some((local, domain)) = email.split_once('@') else {
            return Err(AccountError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(AccountError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if password != password_confirm {
            return Err(AccountError::PasswordMismatch);
        }

        let (first_name, last_name) = name.split_once(' ').unwrap_or((name, ""));
        Ok(Self {
            email: email.to_owned(),
            username: local.to_owned(),
            first_name: first_name.to_owned(),
            last_name: last_name.trim().to_owned(),
            password: password.to_owned(),
            password_confirm: password_confirm.to_owned(),
        })
    }
}

/// Password change form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    /// # Errors
    ///
    /// Returns `AccountError::EmptyPassword` or `AccountError::PasswordMismatch`.
    pub fn new(current: &str, new: &str, confirm: &str) -> Result<Self, AccountError> {
        if current.is_empty() || new.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if new != confirm {
            return Err(AccountError::PasswordMismatch);
        }
        Ok(Self {
            current_password: current.to_owned(),
            new_password: new.to_owned(),
            confirm_password: confirm.to_owned(),
        })
    }
}

//
// ─── ADMIN VIEWS ───────────────────────────────────────────────────────────────
//

/// Account counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub active_users: u32,
    #[serde(default)]
    pub suspended_users: u32,
    #[serde(default)]
    pub banned_users: u32,
    #[serde(default)]
    pub admin_users: u32,
    #[serde(default)]
    pub regular_users: u32,
}

impl UserStats {
    #[must_use]
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(Self::default(), |mut acc, user| {
            acc.total_users += 1;
            match user.status {
                UserStatus::Active => acc.active_users += 1,
                UserStatus::Suspended => acc.suspended_users += 1,
                UserStatus::Banned => acc.banned_users += 1,
                UserStatus::Pending => {}
            }
            match user.role {
                Role::Admin => acc.admin_users += 1,
                Role::User => acc.regular_users += 1,
            }
            acc
        })
    }
}

/// Client-side filter for the admin user list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserQuery {
    /// Case-insensitive substring of name or email.
    pub search: String,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserQuery {
    #[must_use]
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || user.display_name().to_lowercase().contains(&needle)
            || user.email.to_lowercase().contains(&needle);
        text_ok
            && self.role.is_none_or(|r| r == user.role)
            && self.status.is_none_or(|s| s == user.status)
    }

    #[must_use]
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str, email: &str, role: Role, status: UserStatus) -> User {
        User {
            id: UserId::new(id),
            email: email.into(),
            username: email.split('@').next().unwrap_or_default().into(),
            name: name.into(),
            role,
            status,
            ..User::default()
        }
    }

    #[test]
    fn registration_splits_name_and_derives_username() {
        let reg = Registration::from_form("Ada King Lovelace", "ada@example.com", "pw", "pw").unwrap();
        assert_eq!(reg.first_name, "Ada");
        assert_eq!(reg.last_name, "King Lovelace");
        assert_eq!(reg.username, "ada");
    }

    #[test]
    fn registration_rejects_mismatched_passwords() {
        assert_eq!(
            Registration::from_form("Ada", "ada@example.com", "a", "b").unwrap_err(),
            AccountError::PasswordMismatch
        );
        assert_eq!(
            Registration::from_form("Ada", "not-an-email", "a", "a").unwrap_err(),
            AccountError::InvalidEmail
        );
    }

    #[test]
    fn password_change_requires_matching_confirmation() {
        assert!(PasswordChange::new("old", "new", "new").is_ok());
        assert_eq!(
            PasswordChange::new("old", "new", "neu").unwrap_err(),
            AccountError::PasswordMismatch
        );
    }

    #[test]
    fn profile_update_only_touches_set_fields() {
        let mut u = user("1", "Ada Lovelace", "ada@example.com", Role::User, UserStatus::Active);
        u.first_name = "Ada".into();
        u.last_name = "Lovelace".into();
        u.bio = "math".into();
        ProfileUpdate {
            last_name: Some("Byron".into()),
            ..ProfileUpdate::default()
        }
        .apply_to(&mut u);
        assert_eq!(u.name, "Ada Byron");
        assert_eq!(u.bio, "math");
    }

    #[test]
    fn stats_count_roles_and_statuses() {
        let users = vec![
            user("1", "A", "a@x.io", Role::Admin, UserStatus::Active),
            user("2", "B", "b@x.io", Role::User, UserStatus::Banned),
            user("3", "C", "c@x.io", Role::User, UserStatus::Pending),
        ];
        let stats = UserStats::from_users(&users);
        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.active_users, 1);
        assert_eq!(stats.banned_users, 1);
        assert_eq!(stats.admin_users, 1);
        assert_eq!(stats.regular_users, 2);
    }

    #[test]
    fn user_query_filters_by_text_role_and_status() {
        let users = vec![
            user("1", "Grace Hopper", "grace@navy.mil", Role::Admin, UserStatus::Active),
            user("2", "Alan Turing", "alan@bletchley.uk", Role::User, UserStatus::Suspended),
        ];
        let query = UserQuery {
            search: "NAVY".into(),
            ..UserQuery::default()
        };
        assert_eq!(query.apply(&users).len(), 1);

        let query = UserQuery {
            status: Some(UserStatus::Suspended),
            ..UserQuery::default()
        };
        assert_eq!(query.apply(&users)[0].name, "Alan Turing");
    }

    #[test]
    fn stats_use_camel_case_keys() {
        let stats: UserStats =
            serde_json::from_str(r#"{"totalUsers": 4, "activeUsers": 3, "bannedUsers": 1}"#).unwrap();
        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.suspended_users, 0);
    }

    #[test]
    fn status_action_maps_to_status() {
        assert_eq!("Suspend".parse::<StatusAction>().unwrap().resulting_status(), UserStatus::Suspended);
        assert!("promote".parse::<StatusAction>().is_err());
    }
}
