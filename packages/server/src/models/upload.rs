use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, FieldErrors};

/// Upload body. Both fields are required non-blank strings.
///
/// Fields are taken as raw JSON so that a missing, null or non-string value
/// produces a per-field error rather than a generic parse failure.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UploadFileRequest {
    /// Name to store the file under.
    #[schema(value_type = String, example = "brake.txt")]
    #[serde(default, deserialize_with = "present")]
    pub file_name: Option<Value>,
    /// Text content of the file.
    #[schema(value_type = String, example = "Brake pad specification")]
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only an absent field is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A validated upload with surrounding whitespace trimmed.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidUpload {
    pub file_name: String,
    pub content: String,
}

impl UploadFileRequest {
    pub fn validate(self) -> Result<ValidUpload, AppError> {
        let mut errors = FieldErrors::new();
        let file_name = required_text("file_name", self.file_name, &mut errors);
        let content = required_text("content", self.content, &mut errors);

        match (file_name, content) {
            (Some(file_name), Some(content)) if errors.is_empty() => {
                Ok(ValidUpload { file_name, content })
            }
            _ => Err(AppError::InvalidFields(errors)),
        }
    }
}

fn required_text(field: &str, value: Option<Value>, errors: &mut FieldErrors) -> Option<String> {
    let message = match value {
        None => "This field is required.",
        Some(Value::Null) => "This field may not be null.",
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
            "This field may not be blank."
        }
        Some(_) => "Not a valid string.",
    };
    errors.insert(field.to_string(), vec![message.to_string()]);
    None
}

/// Shape of the upload form, returned by `GET` on the upload route.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadFormResponse {
    #[schema(example = "")]
    pub file_name: String,
    #[schema(example = "")]
    pub content: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadFileResponse {
    #[schema(example = "File uploaded successfully.")]
    pub message: String,
    #[schema(example = 1)]
    pub file_id: i32,
}
