use serde::Deserialize;

use super::{trimmed, FieldErrors};

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct TagPayload {
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TagInput {
    pub name: String,
}

impl TagPayload {
    pub fn validate(self) -> Result<TagInput, FieldErrors> {
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
            Some(n) => return Ok(TagInput { name: n.to_string() }),
        }
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_like_categories() {
        assert!(TagPayload::default().validate().is_err());
        let out = TagPayload { name: Some(" Outdoor ".into()) }.validate().unwrap();
        assert_eq!(out.name, "Outdoor");
    }
}
