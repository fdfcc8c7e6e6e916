use serde::Deserialize;

use super::{trimmed, FieldErrors};

const MAX_NAME_LEN: usize = 200;
const MAX_CONTACT_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct ProviderCreateRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProviderCreate {
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl ProviderCreateRequest {
    pub fn validate(self) -> Result<ProviderCreate, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = match trimmed(&self.name) {
            None => {
                errors.insert("name".into(), "Name is required".into());
                None
            }
            Some(n) if n.chars().count() > MAX_NAME_LEN => {
                errors.insert(
                    "name".into(),
                    format!("Name cannot exceed {MAX_NAME_LEN} characters"),
                );
                None
            }
            Some(n) => Some(n.to_string()),
        };

        let contact = trimmed(&self.contact).map(str::to_string);
        if contact.as_ref().is_some_and(|c| c.chars().count() > MAX_CONTACT_LEN) {
            errors.insert(
                "contact".into(),
                format!("Contact cannot exceed {MAX_CONTACT_LEN} characters"),
            );
        }

        let phone = trimmed(&self.phone).map(str::to_string);
        if phone.as_ref().is_some_and(|p| p.chars().count() > MAX_PHONE_LEN) {
            errors.insert(
                "phone".into(),
                format!("Phone cannot exceed {MAX_PHONE_LEN} characters"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ProviderCreate {
            name: name.unwrap(),
            contact,
            phone,
            description: trimmed(&self.description).map(str::to_string),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderUpdateRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// Allow-listed provider update. Absent fields stay unchanged; a provided
/// empty string clears the optional field.
#[derive(Debug, Clone, Default)]
pub struct ProviderUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl ProviderUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact.is_none()
            && self.phone.is_none()
            && self.description.is_none()
    }
}

impl ProviderUpdateRequest {
    pub fn validate(self) -> Result<ProviderUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut update = ProviderUpdate::default();

        if self.name.is_some() {
            match trimmed(&self.name) {
                None => {
                    errors.insert("name".into(), "Name cannot be empty".into());
                }
                Some(n) if n.chars().count() > MAX_NAME_LEN => {
                    errors.insert(
                        "name".into(),
                        format!("Name cannot exceed {MAX_NAME_LEN} characters"),
                    );
                }
                Some(n) => update.name = Some(n.to_string()),
            }
        }

        if let Some(contact) = &self.contact {
            let contact = contact.trim();
            if contact.chars().count() > MAX_CONTACT_LEN {
                errors.insert(
                    "contact".into(),
                    format!("Contact cannot exceed {MAX_CONTACT_LEN} characters"),
                );
            } else {
                update.contact = Some(contact.to_string());
            }
        }

        if let Some(phone) = &self.phone {
            let phone = phone.trim();
            if phone.chars().count() > MAX_PHONE_LEN {
                errors.insert(
                    "phone".into(),
                    format!("Phone cannot exceed {MAX_PHONE_LEN} characters"),
                );
            } else {
                update.phone = Some(phone.to_string());
            }
        }

        if let Some(description) = &self.description {
            update.description = Some(description.trim().to_string());
        }

        if errors.is_empty() && update.is_empty() {
            errors.insert("general".into(), "At least one field must be provided".into());
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_only() {
        let out = ProviderCreateRequest {
            name: Some("Acme".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(out.name, "Acme");
        assert!(out.contact.is_none());
        assert!(out.phone.is_none());
    }

    #[test]
    fn create_enforces_length_limits() {
        let errors = ProviderCreateRequest {
            name: Some("Acme".into()),
            contact: Some("c".repeat(201)),
            phone: Some("9".repeat(51)),
            description: None,
        }
        .validate()
        .unwrap_err();
        assert!(errors.contains_key("contact"));
        assert!(errors.contains_key("phone"));
    }

    #[test]
    fn update_rejects_empty_payload() {
        let errors = ProviderUpdateRequest::default().validate().unwrap_err();
        assert!(errors.contains_key("general"));
    }

    #[test]
    fn update_empty_string_clears_optional_field() {
        let out = ProviderUpdateRequest {
            contact: Some("".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(out.contact.as_deref(), Some(""));
        assert!(out.name.is_none());
    }
}
