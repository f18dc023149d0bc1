use chrono::Utc;

/// Derives a URL-safe slug from a prompt title.
///
/// Lowercases the title, collapses whitespace runs into single hyphens and
/// strips everything outside `a-z`, `0-9` and `-`.
/// - "Cinematic Fire!!" becomes "cinematic-fire"
/// - "  Neon   City " becomes "neon-city"
///
/// Titles that yield no usable characters fall back to a timestamped
/// `prompt-{millis}` slug so the record can still be addressed.
pub fn slug_from_title(title: &str) -> String {
    let hyphenated = title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    let slug: String = hyphenated
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    if slug.is_empty() {
        format!("prompt-{}", Utc::now().timestamp_millis())
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};
    use lazy_static::lazy_static;
    use regex::Regex;

    lazy_static! {
        static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
    }

    #[test]
    fn test_slug_from_simple_title() {
        assert_eq!(slug_from_title("Cinematic Fire!!"), "cinematic-fire");
        assert_eq!(slug_from_title("Neon City"), "neon-city");
        assert_eq!(slug_from_title("kling 2.1 master shot"), "kling-21-master-shot");
    }

    #[test]
    fn test_slug_collapses_whitespace() {
        assert_eq!(
            slug_from_title("  Cinematic   fire  sequence "),
            "cinematic-fire-sequence"
        );
        assert_eq!(slug_from_title("a\t\nb"), "a-b");
    }

    #[test]
    fn test_slug_keeps_hyphens() {
        assert_eq!(slug_from_title("pre-lit scene"), "pre-lit-scene");
        // whitespace around a literal hyphen collapses into hyphen runs
        assert_eq!(slug_from_title("multi - shot"), "multi---shot");
    }

    #[test]
    fn test_slug_strips_non_ascii() {
        assert_eq!(slug_from_title("Café Nights"), "caf-nights");
        assert_eq!(slug_from_title("火 prompt"), "-prompt");
    }

    #[test]
    fn test_empty_or_symbol_titles_fall_back() {
        let slug = slug_from_title("");
        assert!(slug.starts_with("prompt-"));

        let slug = slug_from_title("!!!");
        assert!(slug.starts_with("prompt-"));
        assert!(SLUG_REGEX.is_match(&slug));
    }

    #[test]
    fn test_generated_slugs_stay_in_charset() {
        for _ in 0..200 {
            let title: String = Faker.fake();
            let slug = slug_from_title(&title);
            assert!(!slug.is_empty());
            assert!(
                SLUG_REGEX.is_match(&slug),
                "slug {:?} from title {:?} escaped the charset",
                slug,
                title
            );
        }
    }
}
