//! Contact form input, checked before it is handed to the submission
//! controller.

use anyhow::{anyhow, Result};
use architect_core::ContactForm;
use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Project types offered by the site form.
pub const PROJECT_TYPES: &[&str] = &["house", "apartment", "office", "other"];

#[derive(Debug, Clone, Default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub project_type: Option<String>,
    pub message: String,
    pub extra: Vec<(String, String)>,
}

/// Parse a `--field key=value` argument.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Check required fields and build the form in site order.
pub fn build_form(request: &ContactRequest) -> Result<ContactForm> {
    for (label, value) in [
        ("name", &request.name),
        ("email", &request.email),
        ("message", &request.message),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!("Field '{}' is required", label));
        }
    }

    let email = Regex::new(EMAIL_PATTERN)?;
    if !email.is_match(request.email.trim()) {
        return Err(anyhow!("'{}' is not a valid email address", request.email));
    }

    if let Some(project_type) = &request.project_type {
        if !PROJECT_TYPES.contains(&project_type.as_str()) {
            return Err(anyhow!(
                "Unknown project type '{}', expected one of: {}",
                project_type,
                PROJECT_TYPES.join(", ")
            ));
        }
    }

    let mut form = ContactForm::new();
    form.set("name", request.name.trim());
    form.set("email", request.email.trim());
    if let Some(project_type) = &request.project_type {
        form.set("project_type", project_type);
    }
    form.set("message", &request.message);
    for (key, value) in &request.extra {
        form.set(key, value);
    }
    Ok(form)
}
