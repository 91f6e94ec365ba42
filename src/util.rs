//! Utility functions for command line style arguments.
use crate::error::{ReadError, Result};

/// Parse a comma separated triple of non-negative integers, such as
/// `"10,20,30"`. Whitespace around each element is ignored.
///
/// # Errors
///
/// - `ReadError::InvalidArgument` if the text does not hold exactly three
/// integers.
///
/// # Example
///
/// ```
/// # use smallvol::util::parse_triple;
/// assert_eq!(parse_triple(" 1 , 2 , 3 ").unwrap(), [1, 2, 3]);
/// assert!(parse_triple("1,2").is_err());
/// ```
pub fn parse_triple(text: &str) -> Result<[usize; 3]> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ReadError::InvalidArgument(format!(
            "expected 3 comma separated integers, got {} in `{}`",
            parts.len(),
            text
        )));
    }
    let mut out = [0; 3];
    for (o, part) in out.iter_mut().zip(&parts) {
        *o = part.parse().map_err(|e| {
            ReadError::InvalidArgument(format!("`{}` is not a non-negative integer: {}", part, e))
        })?;
    }
    Ok(out)
}
