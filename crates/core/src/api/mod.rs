pub mod client;
pub mod traits;

use crate::errors::CoreError;

/// Longest ticker the backend accepts (e.g. "BRK.B", "RDS-A").
const MAX_SYMBOL_LEN: usize = 10;

/// Trim and uppercase a ticker, rejecting anything that could not be one.
/// Runs before a symbol is interpolated into a request path.
pub fn normalize_symbol(symbol: &str) -> Result<String, CoreError> {
    let upper = symbol.trim().to_uppercase();
    if upper.is_empty() || upper.len() > MAX_SYMBOL_LEN {
        return Err(CoreError::ValidationError(format!(
            "Invalid symbol '{symbol}': must be 1-{MAX_SYMBOL_LEN} characters"
        )));
    }
    if !upper
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err(CoreError::ValidationError(format!(
            "Invalid symbol '{symbol}': only letters, digits, '.' and '-' are allowed"
        )));
    }
    Ok(upper)
}
