use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{trimmed, FieldErrors};
use crate::database::models::Admin;

fn valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Default, Deserialize)]
pub struct AdminCreateRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminCreate {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl AdminCreateRequest {
    pub fn validate(self) -> Result<AdminCreate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let email = match trimmed(&self.email) {
            None => {
                errors.insert("email".into(), "Email is required".into());
                None
            }
            Some(e) if !valid_email(e) => {
                errors.insert("email".into(), "Invalid email".into());
                None
            }
            Some(e) => Some(e.to_lowercase()),
        };

        let name = match trimmed(&self.name) {
            None => {
                errors.insert("name".into(), "Name is required".into());
                None
            }
            Some(n) if n.chars().count() < 2 => {
                errors.insert("name".into(), "Name must be at least 2 characters".into());
                None
            }
            Some(n) => Some(n.to_string()),
        };

        let password = match trimmed(&self.password) {
            None => {
                errors.insert("password".into(), "Password is required".into());
                None
            }
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                errors.insert(
                    "password".into(),
                    format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                );
                None
            }
            Some(p) => Some(p.to_string()),
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(AdminCreate {
            email: email.unwrap(),
            name: name.unwrap(),
            password: password.unwrap(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdateRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl AdminUpdateRequest {
    pub fn validate(self) -> Result<AdminUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut update = AdminUpdate { email: None, name: None };

        if self.email.is_some() {
            match trimmed(&self.email) {
                None => {
                    errors.insert("email".into(), "Email cannot be empty".into());
                }
                Some(e) if !valid_email(e) => {
                    errors.insert("email".into(), "Invalid email".into());
                }
                Some(e) => update.email = Some(e.to_lowercase()),
            }
        }

        if self.name.is_some() {
            match trimmed(&self.name) {
                None => {
                    errors.insert("name".into(), "Name cannot be empty".into());
                }
                Some(n) if n.chars().count() < 2 => {
                    errors.insert("name".into(), "Name must be at least 2 characters".into());
                }
                Some(n) => update.name = Some(n.to_string()),
            }
        }

        if errors.is_empty() && update.email.is_none() && update.name.is_none() {
            errors.insert(
                "general".into(),
                "At least one field must be provided".into(),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminPasswordRequest {
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AdminPassword {
    pub password: String,
}

impl AdminPasswordRequest {
    pub fn validate(self) -> Result<AdminPassword, FieldErrors> {
        let mut errors = FieldErrors::new();
        match trimmed(&self.password) {
            None => {
                errors.insert("password".into(), "Password is required".into());
            }
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                errors.insert(
                    "password".into(),
                    format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                );
            }
            Some(p) => return Ok(AdminPassword { password: p.to_string() }),
        }
        Err(errors)
    }
}

/// Admin view without the password hash.
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
            is_active: admin.is_active,
            created_at: admin.created_at,
        }
    }
}
