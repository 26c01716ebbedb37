//! Placeholder dispatch for multi-valued cells
//!
//! Mapping fragments mark insertion points with `?`. A cell may carry
//! several values separated by `|`; they are dealt out to the
//! placeholders left to right, one substitution per placeholder.

/// Substitute the pipe-separated pieces of `raw` into the `?`
/// placeholders of `fragment`.
///
/// Surplus pieces are re-joined with `|` into the last placeholder so no
/// value is dropped; if there are fewer pieces than placeholders, the
/// trailing placeholders stay literal.
pub fn dispatch_values(fragment: &str, raw: &str) -> String {
    let pieces: Vec<&str> = raw.split('|').collect();
    let slots = fragment.matches('?').count();

    let mut result = fragment.to_string();
    for (index, piece) in pieces.iter().enumerate().take(slots) {
        let value = if index + 1 == slots && pieces.len() > slots {
            // Last slot absorbs the overflow.
            pieces.get(index..).unwrap_or_default().join("|")
        } else {
            (*piece).to_string()
        };
        result = result.replacen('?', &value, 1);
    }

    result
}
