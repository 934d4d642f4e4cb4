//! Account category classification
//!
//! The single source of truth for mapping an account code to a [`Category`].
//! Both functions are total: every input, including the empty string, maps to
//! exactly one category.

use crate::types::Category;

/// Classify by the first character of the account code.
///
/// `A` Assets, `E` Expenditure, `L` Liabilities, `R` Revenue (case
/// insensitive); anything else, including an empty code, is `Other`.
pub fn classify(account_code: &str) -> Category {
    match account_code.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('A') => Category::Assets,
        Some('E') => Category::Expenditure,
        Some('L') => Category::Liabilities,
        Some('R') => Category::Revenue,
        _ => Category::Other,
    }
}

/// Classify for the cost center pivot.
///
/// An explicit title flag of `A` or `E` wins. Otherwise numeric codes are
/// used: `1...` is Assets, `4...` and `5...` are Expenditure. Everything else
/// falls into `Other`.
pub fn classify_with_flag(account_code: &str, title_flag: Option<&str>) -> Category {
    match title_flag.map(|flag| flag.trim().to_ascii_uppercase()).as_deref() {
        Some("A") => return Category::Assets,
        Some("E") => return Category::Expenditure,
        _ => {}
    }

    match account_code.chars().next() {
        Some('1') => Category::Assets,
        Some('4') | Some('5') => Category::Expenditure,
        _ => Category::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(classify("A100"), Category::Assets);
        assert_eq!(classify("E1"), Category::Expenditure);
        assert_eq!(classify("L300"), Category::Liabilities);
        assert_eq!(classify("R400"), Category::Revenue);
        assert_eq!(classify("X9"), Category::Other);
        assert_eq!(classify("Z9"), Category::Other);
        assert_eq!(classify("1001"), Category::Other);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("a100"), Category::Assets);
        assert_eq!(classify("eXYZ"), Category::Expenditure);
        assert_eq!(classify("l"), Category::Liabilities);
        assert_eq!(classify("rEVENUE"), Category::Revenue);
    }

    #[test]
    fn test_classify_total_on_odd_input() {
        for code in ["", " ", "  A1", "ÄÖ", "🙂", "\n", "-", "Assets:Cash"] {
            let category = classify(code);
            assert!(matches!(
                category,
                Category::Assets
                    | Category::Expenditure
                    | Category::Liabilities
                    | Category::Revenue
                    | Category::Other
            ));
        }
        assert_eq!(classify(""), Category::Other);
        assert_eq!(classify("  A1"), Category::Other);
    }

    #[test]
    fn test_classify_with_flag_prefers_flag() {
        assert_eq!(classify_with_flag("9999", Some("A")), Category::Assets);
        assert_eq!(classify_with_flag("1000", Some("E")), Category::Expenditure);
        assert_eq!(classify_with_flag("9999", Some(" e ")), Category::Expenditure);
    }

    #[test]
    fn test_classify_with_flag_falls_back_to_code() {
        assert_eq!(classify_with_flag("1001", None), Category::Assets);
        assert_eq!(classify_with_flag("4100", Some("")), Category::Expenditure);
        assert_eq!(classify_with_flag("5200", Some("L")), Category::Expenditure);
        assert_eq!(classify_with_flag("2000", Some("L")), Category::Other);
        assert_eq!(classify_with_flag("3000", None), Category::Other);
        assert_eq!(classify_with_flag("", None), Category::Other);
        assert_eq!(classify_with_flag("A100", None), Category::Other);
    }
}
