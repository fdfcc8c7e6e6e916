use serde::Deserialize;

use super::FieldErrors;

const MAX_TITLE_LEN: usize = 200;

#[derive(Debug, Default, Deserialize)]
pub struct SiteContentUpdateRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Absent fields stay unchanged; a provided empty string clears the field.
#[derive(Debug, Clone, Default)]
pub struct SiteContentUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl SiteContentUpdateRequest {
    pub fn validate(self) -> Result<SiteContentUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut update = SiteContentUpdate::default();

        if let Some(title) = &self.title {
            let title = title.trim();
            if title.chars().count() > MAX_TITLE_LEN {
                errors.insert(
                    "title".into(),
                    format!("Title cannot exceed {MAX_TITLE_LEN} characters"),
                );
            } else {
                update.title = Some(title.to_string());
            }
        }

        if let Some(content) = &self.content {
            update.content = Some(content.trim().to_string());
        }

        if errors.is_empty() && update.title.is_none() && update.content.is_none() {
            errors.insert("general".into(), "At least one field must be provided".into());
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}
