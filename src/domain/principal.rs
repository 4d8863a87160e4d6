//! Authenticated caller and role policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{ROLE_ADMINISTRATOR, ROLE_CUSTOMER, ROLE_EMPLOYEE, ROLE_SUPER_USER};
use crate::errors::{AppError, AppResult};

/// Caller roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    SuperUser,
    Administrator,
    Employee,
    Customer,
}

/// Roles allowed to change customers and products
pub const WRITER_ROLES: &[Role] = &[Role::SuperUser, Role::Administrator];

/// Roles allowed to read customers and products
pub const READER_ROLES: &[Role] = &[Role::SuperUser, Role::Administrator, Role::Employee];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperUser => ROLE_SUPER_USER,
            Role::Administrator => ROLE_ADMINISTRATOR,
            Role::Employee => ROLE_EMPLOYEE,
            Role::Customer => ROLE_CUSTOMER,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_SUPER_USER => Ok(Role::SuperUser),
            ROLE_ADMINISTRATOR => Ok(Role::Administrator),
            ROLE_EMPLOYEE => Ok(Role::Employee),
            ROLE_CUSTOMER => Ok(Role::Customer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user a use case runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

/// Auth gate: every use case starts here.
pub fn authenticated(principal: Option<&Principal>) -> AppResult<&Principal> {
    principal.ok_or(AppError::Unauthenticated)
}

/// Role policy: authenticated and holding one of `roles`.
pub fn authorize<'a>(principal: Option<&'a Principal>, roles: &[Role]) -> AppResult<&'a Principal> {
    let principal = authenticated(principal)?;
    if principal.has_any_role(roles) {
        Ok(principal)
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_text() {
        for role in [Role::SuperUser, Role::Administrator, Role::Employee, Role::Customer] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_authorize_policies() {
        let employee = Principal::new("e-1", "Nancy", Role::Employee);

        assert!(authorize(Some(&employee), READER_ROLES).is_ok());
        assert!(matches!(
            authorize(Some(&employee), WRITER_ROLES),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            authorize(None, READER_ROLES),
            Err(AppError::Unauthenticated)
        ));
    }
}
