//! Person-name normalization.

use unicode_normalization::UnicodeNormalization;

/// Normalize a person's name for comparison.
///
/// Trims, lowercases, strips accents and removes every period, hyphen and
/// whitespace character, so `"  Mary-Jo  O. Núñez "` becomes `"maryjoonunez"`.
/// Applying it twice yields the same string as applying it once.
pub fn normalize_name(name: &str) -> String {
    deburr(&name.trim().to_lowercase())
        .chars()
        .filter(|c| !is_separator(*c))
        .collect()
}

/// Strip diacritics from Latin-1 Supplement and Latin Extended-A letters.
///
/// Letters outside those blocks are kept as written, so `が` or `김` are not
/// decomposed. Standalone combining marks are dropped only in the
/// diacritical, half-mark and symbol-mark blocks.
pub fn deburr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if !is_latin_letter(c) {
            if !is_removable_mark(c) {
                out.push(c);
            }
            continue;
        }
        match fold_latin(c) {
            Some(folded) => out.push_str(folded),
            None => out.extend(c.nfd().filter(|d| !is_removable_mark(*d))),
        }
    }
    out
}

// Latin-1 Supplement letters (without × and ÷) and Latin Extended-A.
fn is_latin_letter(c: char) -> bool {
    matches!(c, '\u{c0}'..='\u{d6}' | '\u{d8}'..='\u{f6}' | '\u{f8}'..='\u{ff}' | '\u{100}'..='\u{17f}')
}

fn is_removable_mark(c: char) -> bool {
    matches!(c, '\u{300}'..='\u{36f}' | '\u{fe20}'..='\u{fe2f}' | '\u{20d0}'..='\u{20ff}')
}

fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'Æ' => "Ae",
        'æ' => "ae",
        'Ð' => "D",
        'ð' | 'đ' => "d",
        'Đ' => "D",
        'Ø' => "O",
        'ø' => "o",
        'Œ' => "Oe",
        'œ' => "oe",
        'Þ' => "Th",
        'þ' => "th",
        'ß' => "ss",
        'Ł' => "L",
        'ł' => "l",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ĳ' => "IJ",
        'ĳ' => "ij",
        'ĸ' => "k",
        'Ŋ' => "N",
        'ŋ' => "n",
        'Ŧ' => "T",
        'ŧ' => "t",
        'Ŀ' => "L",
        'ŀ' => "l",
        'ŉ' => "'n",
        'ſ' => "s",
        _ => return None,
    };
    Some(folded)
}

fn is_separator(c: char) -> bool {
    c == '.' || c == '-' || c.is_whitespace() || c == '\u{feff}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_case_accents_and_separators() {
        assert_eq!(normalize_name("  Mary-Jo  O. Núñez "), "maryjoonunez");
        assert_eq!(normalize_name("ZOË LÖFGREN"), "zoelofgren");
        assert_eq!(normalize_name("Jr."), "jr");
    }

    #[test]
    fn test_normalize_folds_latin_letters() {
        assert_eq!(normalize_name("Søren Strauß"), "sorenstrauss");
        assert_eq!(normalize_name("Łukasz"), "lukasz");
    }

    #[test]
    fn test_normalize_folds_latin_extended_a() {
        assert_eq!(normalize_name("Ŧŧ"), "tt");
        assert_eq!(normalize_name("Ŋguyen"), "nguyen");
        assert_eq!(normalize_name("ĸ"), "k");
        assert_eq!(normalize_name("Ĳssel"), "ijssel");
    }

    #[test]
    fn test_normalize_keeps_non_latin_letters_whole() {
        assert_eq!(normalize_name("が"), "が");
        assert_eq!(normalize_name("김"), "김");
        assert_eq!(
            crate::distance::levenshtein(&normalize_name("김"), &normalize_name("이")),
            1
        );
    }

    #[test]
    fn test_normalize_drops_only_diacritical_mark_blocks() {
        assert_eq!(normalize_name("e\u{301}"), "e");
        assert_eq!(normalize_name("a\u{20d0}"), "a");
        assert_eq!(normalize_name("a\u{fe20}"), "a");
        assert_eq!(normalize_name("क\u{93f}"), "क\u{93f}");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for name in ["Ruben Gallego", "Ángel  De-La Cruz", "Æthelred Ø.", "", "   "] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name(" \t\n "), "");
    }
}
