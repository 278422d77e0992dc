//! Line normalization of raw OCR output.

/// Split raw text into trimmed, non-empty lines, preserving order.
///
/// Handles `\n`, `\r\n` and lone `\r` line breaks.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_lines() {
        let text = "  INVOICE #1024  \n\n\tBilled To: Acme Co\r\n   \r\nTOTAL: $250.00\n";
        assert_eq!(
            normalize_lines(text),
            vec!["INVOICE #1024", "Billed To: Acme Co", "TOTAL: $250.00"]
        );
    }

    #[test]
    fn test_blank_input() {
        assert!(normalize_lines("").is_empty());
        assert!(normalize_lines(" \n\t\n \r\n").is_empty());
    }

    #[test]
    fn test_lone_carriage_returns() {
        assert_eq!(normalize_lines("a\rb\r\rc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_no_empty_lines_and_order_kept() {
        let text = "z\n\n y \n x\n\n\n w ";
        let lines = normalize_lines(text);

        assert!(lines.iter().all(|l| !l.is_empty()));
        assert_eq!(lines, vec!["z", "y", "x", "w"]);
    }
}
