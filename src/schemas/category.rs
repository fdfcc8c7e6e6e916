use serde::Deserialize;

use super::{trimmed, FieldErrors};

const MAX_NAME_LEN: usize = 100;

/// Shared payload for category create and rename; both require a name.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryPayload {
    pub fn validate(self) -> Result<CategoryInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        match trimmed(&self.name) {
            None => {
                errors.insert("name".into(), "Name is required".into());
            }
            Some(n) if n.chars().count() > MAX_NAME_LEN => {
                errors.insert(
                    "name".into(),
                    format!("Name cannot exceed {MAX_NAME_LEN} characters"),
                );
            }
            Some(n) => return Ok(CategoryInput { name: n.to_string() }),
        }
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts() {
        let out = CategoryPayload { name: Some("  Flooring ".into()) }.validate().unwrap();
        assert_eq!(out.name, "Flooring");
    }

    #[test]
    fn rejects_missing_or_blank() {
        assert!(CategoryPayload::default().validate().is_err());
        assert!(CategoryPayload { name: Some("   ".into()) }.validate().is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        let errors = CategoryPayload { name: Some("x".repeat(101)) }.validate().unwrap_err();
        assert!(errors.get("name").unwrap().contains("100"));
    }
}
