use super::ApiError;
use crate::constants::limits::MAX_REFERENCE_LEN;

pub fn validate_anime_id(id: &str) -> Result<&str, ApiError> {
    if id.is_empty() {
        return Err(ApiError::validation("Anime ID cannot be empty"));
    }

    if !id
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(ApiError::validation(format!(
            "Invalid anime ID: '{}'. IDs only contain lowercase letters, digits and hyphens",
            id
        )));
    }

    Ok(id)
}

pub fn validate_reference(reference: &str) -> Result<&str, ApiError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Episode reference is required"));
    }

    if trimmed.len() > MAX_REFERENCE_LEN {
        return Err(ApiError::validation(format!(
            "Episode reference must be {} characters or less",
            MAX_REFERENCE_LEN
        )));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_anime_id() {
        assert!(validate_anime_id("naruto").is_ok());
        assert!(validate_anime_id("mob-psycho-100").is_ok());
        assert!(validate_anime_id("").is_err());
        assert!(validate_anime_id("Naruto").is_err());
        assert!(validate_anime_id("naruto/../x").is_err());
    }

    #[test]
    fn test_validate_reference() {
        assert_eq!(validate_reference("  naruto-1-1 ").unwrap(), "naruto-1-1");
        assert!(validate_reference("").is_err());
        assert!(validate_reference("   ").is_err());
        assert!(validate_reference(&"a".repeat(MAX_REFERENCE_LEN + 1)).is_err());
    }
}
