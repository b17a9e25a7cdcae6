//! 字段级校验错误

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 校验失败集合
///
/// 内部按 (field, message) 排序去重，因此多个校验器的执行顺序不会影响结果。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        if let Err(pos) = self.errors.binary_search(&error) {
            self.errors.insert(pos, error);
        }
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn contains(&self, field: &str, message: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field && e.message == message)
    }

    /// 按字段分组
    pub fn by_field(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            grouped
                .entry(error.field.clone())
                .or_default()
                .push(error.message.clone());
        }
        grouped
    }
}

impl Extend<FieldError> for ValidationErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        for error in iter {
            self.push(error);
        }
    }
}

impl FromIterator<FieldError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut errors = Self::new();
        errors.extend(iter);
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_independent() {
        let a: ValidationErrors = vec![
            FieldError::new("Title", "Title is required"),
            FieldError::new("Email", "Email is required"),
        ]
        .into_iter()
        .collect();
        let b: ValidationErrors = vec![
            FieldError::new("Email", "Email is required"),
            FieldError::new("Title", "Title is required"),
        ]
        .into_iter()
        .collect();

        assert_eq!(a, b);
    }

    #[test]
    fn test_group_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("Email", "Email is required");
        errors.add("Email", "Email must be a valid email address");
        errors.add("Password", "Password is required");
        // 重复项只保留一条
        errors.add("Password", "Password is required");

        let grouped = errors.by_field();
        assert_eq!(errors.len(), 3);
        assert_eq!(grouped["Email"].len(), 2);
        assert_eq!(grouped["Password"], vec!["Password is required".to_string()]);
    }
}
