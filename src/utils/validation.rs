use log::{debug, warn};

use crate::utils::errors::UtilsError;

/// # Errors
///
/// Returns an error if the name is empty, does not start with an ASCII letter
/// or underscore, or contains characters other than ASCII alphanumerics,
/// underscores and primes.
pub fn validate_symbol_name(name: &str) -> Result<(), UtilsError> {
    debug!("Validating symbol name: '{}'", name);

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        warn!("Symbol name is empty");
        return Err(UtilsError::EmptySymbolName);
    };

    let valid_start = first.is_ascii_alphabetic() || first == '_';
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '\'') {
        warn!("Symbol name is not an identifier: '{}'", name);
        return Err(UtilsError::InvalidSymbolName(name.to_string()));
    }

    debug!("Symbol name validation successful");
    Ok(())
}
