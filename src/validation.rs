// Request field validation shared by the auth and employee handlers
use serde::ser::{Serialize, SerializeMap, Serializer};
use uuid::Uuid;

use crate::error::ApiError;

/// Per-field validation messages, serialized as `{field: [messages]}`.
/// Fields keep the order their rules ran in, so the summary names the first failing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        match self.0.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.0.push((field.to_string(), vec![message.into()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn count(&self) -> usize {
        self.0.iter().map(|(_, messages)| messages.len()).sum()
    }

    /// Summary line: the first message, plus how many others were collected
    pub fn summary(&self) -> String {
        let first = self
            .0
            .iter()
            .flat_map(|(_, messages)| messages.iter())
            .next()
            .cloned()
            .unwrap_or_else(|| "The given data was invalid.".to_string());

        match self.count().saturating_sub(1) {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(self))
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in &self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// `required`: present and non-blank. Returns the value when it passes.
pub fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.add(field, format!("The {} field is required.", label(field)));
            None
        }
    }
}

/// `max:N` on character count
pub fn max_chars(errors: &mut FieldErrors, field: &str, value: &str, max: usize) -> bool {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("The {} field must not be greater than {} characters.", label(field), max),
        );
        return false;
    }
    true
}

pub fn uuid(errors: &mut FieldErrors, field: &str, value: &str) -> Option<Uuid> {
    match Uuid::parse_str(value.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, format!("The {} field must be a valid UUID.", label(field)));
            None
        }
    }
}

pub fn email(errors: &mut FieldErrors, field: &str, value: &str) -> bool {
    if !is_email(value) {
        errors.add(field, format!("The {} field must be a valid email address.", label(field)));
        return false;
    }
    true
}

/// Local part, one `@`, dotted domain with no empty labels; no whitespace anywhere
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}
