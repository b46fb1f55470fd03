use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::group::Group;

pub const POST_TEXT_REQUIRED: &str = "Post text must not be empty";
pub const COMMENT_TEXT_REQUIRED: &str = "Comment text must not be empty";
pub const INVALID_GROUP: &str = "Select a valid group";
pub const INVALID_IMAGE: &str = "Upload a valid image";

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Field name to messages, in the shape forms are re-rendered with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form_errors = FormErrors::default();
        for (field, list) in errors.field_errors() {
            for error in list.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form_errors.add(&field.to_string(), message);
            }
        }
        form_errors
    }
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Letters, digits and `@.+-_`, the same alphabet login names have always used.
pub fn valid_username(value: &str) -> Result<(), ValidationError> {
    let ok = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("username"))
    }
}

/// Returns the normalized extension when the upload looks like an image.
pub fn image_extension(file_name: &str, content_type: Option<&str>) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    match content_type {
        Some(ct) if !ct.starts_with("image/") => None,
        _ => Some(ext),
    }
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidImage {
    pub path: PathBuf,
    pub extension: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank", message = "Post text must not be empty"))]
    pub text: String,
    pub group: Option<String>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<ValidImage>,
}

impl PostForm {
    /// Checks every field against the known groups and reports all failures at once.
    pub fn clean(&self, groups: &[Group]) -> Result<CleanedPost, FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let found = Uuid::parse_str(raw)
                    .ok()
                    .filter(|id| groups.iter().any(|g| g.id == *id));
                if found.is_none() {
                    errors.add("group", INVALID_GROUP);
                }
                found
            }
        };

        let image = match &self.image {
            None => None,
            Some(upload) => {
                match image_extension(&upload.file_name, upload.content_type.as_deref()) {
                    Some(extension) => Some(ValidImage {
                        path: upload.path.clone(),
                        extension,
                    }),
                    None => {
                        errors.add("image", INVALID_IMAGE);
                        None
                    }
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanedPost {
            text: self.text.trim().to_string(),
            group_id,
            image,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Comment text must not be empty"))]
    pub text: String,
}

impl CommentForm {
    pub fn clean(&self) -> Result<String, FormErrors> {
        self.validate().map_err(FormErrors::from)?;
        Ok(self.text.trim().to_string())
    }
}
