use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// The authenticated caller, as remembered by the session cookie.
///
/// Handlers receive this explicitly instead of reading ambient state. Role
/// flags are a snapshot taken at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub is_admin: bool,
    pub is_superadmin: bool,
}

impl SessionUser {
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        self.is_admin || self.is_superadmin
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub username: String,
    pub is_admin: bool,
    pub is_superadmin: bool,
    pub role: &'static str,
}

impl From<crate::services::UserSummary> for UserDto {
    fn from(user: crate::services::UserSummary) -> Self {
        let role = user.role();

        Self {
            username: user.username,
            is_admin: user.is_admin,
            is_superadmin: user.is_superadmin,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::UserSummary;

    #[test]
    fn role_label_prefers_superadmin() {
        let dto = UserDto::from(UserSummary {
            username: "root".to_string(),
            is_admin: false,
            is_superadmin: true,
        });
        assert_eq!(dto.role, "Super Admin");

        let dto = UserDto::from(UserSummary {
            username: "plain".to_string(),
            is_admin: false,
            is_superadmin: false,
        });
        assert_eq!(dto.role, "Regular User");
    }

    #[test]
    fn superadmin_without_admin_flag_can_manage_users() {
        let user = SessionUser {
            username: "root".to_string(),
            is_admin: false,
            is_superadmin: true,
        };
        assert!(user.can_manage_users());
    }
}
