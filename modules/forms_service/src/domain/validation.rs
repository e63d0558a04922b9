//! Handle and field validation for form definitions

use crate::contract::{ContentMap, FormFields, FormsError};
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random suffix appended to colliding handles
pub const HANDLE_SUFFIX_LEN: usize = 4;

/// Suffixed handles tried before giving up
pub const MAX_HANDLE_ATTEMPTS: usize = 5;

/// Lowercase ASCII slug; other characters collapse into single hyphens
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Random lowercase alphanumeric suffix
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// `handle` with a random suffix appended
pub fn with_random_suffix(handle: &str) -> String {
    format!("{}-{}", handle, random_suffix(HANDLE_SUFFIX_LEN))
}

/// Reject field lists that repeat a key
pub fn validate_form_fields(fields: &FormFields) -> Result<(), FormsError> {
    if let FormFields::Keys(keys) = fields {
        let mut seen = ContentMap::new();
        for key in keys {
            seen.insert(key.as_str(), "")?;
        }
    }
    Ok(())
}

/// Page size must be positive
pub fn validate_limit(limit: i64) -> Result<(), FormsError> {
    if limit <= 0 {
        return Err(FormsError::Validation {
            message: format!("limit must be greater than zero, got {}", limit),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Contact Us"), "contact-us");
        assert_eq!(slugify("  Hello,   World! "), "hello-world");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("snake_case_name"), "snake-case-name");
        assert_eq!(slugify("Café 2024"), "caf-2024");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_random_suffix_shape() {
        let handle = with_random_suffix("contact-us");
        let suffix = handle.strip_prefix("contact-us-").unwrap();
        assert_eq!(suffix.len(), HANDLE_SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_duplicate_field_keys() {
        let fields = FormFields::Keys(vec![
            "name".to_string(),
            "email".to_string(),
            "name".to_string(),
        ]);
        assert_eq!(
            validate_form_fields(&fields).unwrap_err(),
            FormsError::DuplicateFieldKey {
                key: "name".to_string()
            }
        );
        assert!(validate_form_fields(&FormFields::Layout(uuid::Uuid::new_v4())).is_ok());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(25).is_ok());
        assert_eq!(validate_limit(0).unwrap_err().code(), 5005);
        assert!(validate_limit(-1).is_err());
    }
}
