//! Caller claims forwarded by the authenticating gateway, and the edit check.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;

pub const CALLER_EMAIL_HEADER: &str = "x-caller-email";
pub const CALLER_GROUPS_HEADER: &str = "x-caller-groups";

/// Group allowed to edit every user's entries.
pub const EDIT_ANY_GROUP: &str = "entry/edit/any";

/// Identity of the caller as verified upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerClaims {
    pub email: String,
    pub groups: Vec<String>,
}

impl CallerClaims {
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CallerClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let email = header_value(parts, CALLER_EMAIL_HEADER)
            .ok_or_else(|| AppError::AccessDenied("Caller identity is missing".to_string()))?
            .to_string();
        let groups: Vec<String> = header_value(parts, CALLER_GROUPS_HEADER)
            .map(|groups| {
                groups
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(CallerClaims { email, groups })
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Allows the write when the caller may edit any user's entries, or holds the
/// group scoped to `target_user` (`entry/edit/{user}`).
pub fn authorize_edit(claims: &CallerClaims, target_user: &str) -> Result<(), AppError> {
    if claims.in_group(EDIT_ANY_GROUP) || claims.in_group(&format!("entry/edit/{target_user}")) {
        return Ok(());
    }
    Err(AppError::AccessDenied(format!(
        "Requesting user \"{}\" does not have permission to edit entries belonging to \"{}\"",
        claims.email, target_user
    )))
}
