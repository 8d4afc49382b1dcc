use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Regex for caller-supplied slugs
    /// Lowercase ASCII word characters and hyphens only. Runs of hyphens are allowed
    /// because generated slugs keep one hyphen per whitespace character.
    /// - Valid: "vong-tay", "tram_toc", "a---b", "2024"
    /// - Invalid: "Vong-Tay", "vòng-tay", "vong tay", ""
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9_-]+$").unwrap();
}

/// Rejects strings made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
