/// Canonicalizes a spreadsheet header cell for synonym lookup: strips BOM and
/// zero-width characters, trims, lowercases.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}'))
        .collect();
    cleaned.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_and_whitespace() {
        assert_eq!(normalize_header("\u{feff}  SEMESTRE "), "semestre");
        assert_eq!(normalize_header("Curso"), "curso");
    }

    #[test]
    fn lowercases_accented_headers() {
        assert_eq!(normalize_header("MATRÍCULA"), "matrícula");
    }
}
