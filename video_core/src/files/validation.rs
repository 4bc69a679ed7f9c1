use mime::Mime;
use thiserror::Error;

use crate::error::AppError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid file type: {content_type} (allowed: {allowed})")]
    InvalidFileType { content_type: String, allowed: String },

    #[error("Filename cannot be empty")]
    EmptyFilename,

    #[error("Invalid filename: {filename:?}")]
    InvalidFilename { filename: String },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidFileType { .. } => AppError::InvalidFormat(err.to_string()),
            ValidationError::EmptyFilename | ValidationError::InvalidFilename { .. } => {
                AppError::InvalidFilename(err.to_string())
            }
        }
    }
}

/// Checks uploads against the single accepted video type.
///
/// Only the declared type is looked at; file contents are never sniffed.
#[derive(Debug, Clone)]
pub struct VideoValidator {
    accepted_essence: String,
}

impl VideoValidator {
    pub fn new(accepted_content_type: &str) -> Self {
        let accepted_essence = match accepted_content_type.trim().parse::<Mime>() {
            Ok(mime) => mime.essence_str().to_ascii_lowercase(),
            Err(_) => accepted_content_type.trim().to_ascii_lowercase(),
        };

        Self { accepted_essence }
    }

    pub fn accepted_content_type(&self) -> &str {
        &self.accepted_essence
    }

    /// Validates an upload and returns the filename it should be stored under
    /// (before the timestamp prefix is added).
    pub fn validate_upload<'a>(
        &self,
        filename: &'a str,
        content_type: &str,
    ) -> Result<&'a str, ValidationError> {
        self.validate_content_type(content_type)?;
        validate_original_filename(filename)
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let matches = content_type
            .trim()
            .parse::<Mime>()
            .map(|mime| mime.essence_str().eq_ignore_ascii_case(&self.accepted_essence))
            .unwrap_or(false);

        if !matches {
            return Err(ValidationError::InvalidFileType {
                content_type: content_type.to_string(),
                allowed: self.accepted_essence.clone(),
            });
        }

        Ok(())
    }
}

/// Last path component of `name`, treating both `/` and `\` as separators.
pub fn final_component(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Reduces a client-supplied upload name to something safe to embed in a
/// stored filename.
pub fn validate_original_filename(filename: &str) -> Result<&str, ValidationError> {
    let name = final_component(filename);

    if name.is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    // NUL is a control character too.
    if name == "." || name == ".." || name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFilename {
            filename: filename.to_string(),
        });
    }

    Ok(name)
}

/// Maps an untrusted delete target onto a direct child name of the upload
/// directory. `None` means nothing inside the directory can match.
pub fn sanitize_requested_name(name: &str) -> Option<&str> {
    let name = final_component(name);

    if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
        return None;
    }

    Some(name)
}
