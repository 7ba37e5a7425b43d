//! Form validation - field-level checks run before anything is persisted.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{Group, Id};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD: &str = "__all__";

/// Field name to error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str) -> bool {
        !self.field(field).is_empty()
    }

    /// `Ok(())` when nothing was recorded, the errors otherwise.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Raw post form submission.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub text: String,
    /// Raw `group` value; empty means "no group".
    pub group: Option<String>,
    pub image: Option<Upload>,
}

/// A post submission that passed validation.
#[derive(Debug, Clone)]
pub struct ValidPost {
    pub text: String,
    pub group_id: Option<Id>,
    pub image: Option<Upload>,
}

/// Validate a post submission against the groups that currently exist.
pub fn validate_post(
    submission: PostSubmission,
    groups: &[Group],
) -> Result<ValidPost, FormErrors> {
    let mut errors = FormErrors::new();

    let text = submission.text.trim().to_string();
    if text.is_empty() {
        errors.add("text", REQUIRED);
    }

    let group_id = match submission.group.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<Id>() {
            Ok(id) if groups.iter().any(|group| group.id == id) => Some(id),
            _ => {
                errors.add("group", INVALID_CHOICE);
                None
            }
        },
    };

    let image = match submission.image {
        // Browsers send an empty part when no file is chosen.
        Some(upload) if upload.filename.is_empty() && upload.content.is_empty() => None,
        Some(upload) => {
            if is_image(&upload.content) {
                Some(upload)
            } else {
                errors.add("image", INVALID_IMAGE);
                None
            }
        }
        None => None,
    };

    errors.into_result()?;
    Ok(ValidPost {
        text,
        group_id,
        image,
    })
}

/// Validate comment text, returning it trimmed.
pub fn validate_comment(text: &str) -> Result<String, FormErrors> {
    let text = text.trim();
    if text.is_empty() {
        let mut errors = FormErrors::new();
        errors.add("text", REQUIRED);
        return Err(errors);
    }
    Ok(text.to_string())
}

/// Validate a username: 1-150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str, errors: &mut FormErrors) {
    if username.is_empty() {
        errors.add("username", REQUIRED);
    } else if username.chars().count() > 150
        || !username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

/// An upload is an image when its header parses as a known image format.
fn is_image(content: &[u8]) -> bool {
    imagesize::blob_size(content).is_ok()
}
