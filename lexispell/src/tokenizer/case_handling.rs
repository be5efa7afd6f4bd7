use smol_str::SmolStr;

#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

pub fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && upper_case(word) == word
}

pub fn is_first_caps(word: &str) -> bool {
    word.chars().next().map_or(false, char::is_uppercase)
}

/// Applies the casing of `template` to `word`.
///
/// An all-caps template of more than one letter gives an all-caps result, a
/// capitalised template a capitalised result, anything else is returned as is.
pub fn match_case(template: &str, word: &str) -> SmolStr {
    if template.chars().count() > 1 && is_all_caps(template) {
        upper_case(word)
    } else if is_first_caps(template) {
        upper_first(word)
    } else {
        SmolStr::new(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps() {
        assert_eq!(is_all_caps("IDENTITETE"), true);
        assert_eq!(is_all_caps("Identitete"), false);
        assert_eq!(is_all_caps("42"), false);
        assert_eq!(is_first_caps("Identitete"), true);
        assert_eq!(is_first_caps("identitete"), false);
        assert_eq!(is_first_caps(""), false);
    }

    #[test]
    fn matching_case() {
        assert_eq!(match_case("Teh", "the"), "The");
        assert_eq!(match_case("TEH", "the"), "THE");
        assert_eq!(match_case("teh", "the"), "the");
        assert_eq!(match_case("I", "it"), "It");
    }

    #[test]
    fn lower() {
        assert_eq!(lower_case("DavveVássján"), "davvevássján");
    }
}
