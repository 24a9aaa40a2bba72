/// URL-safe lowercase identifier: runs of anything that is not alphanumeric
/// collapse into a single `-`, with none leading or trailing.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(slugify("Gadgets Updated"), "gadgets-updated");
        assert_eq!(slugify("  Smart   Speaker! "), "smart-speaker");
        assert_eq!(slugify("T-shirt"), "t-shirt");
    }

    #[test]
    fn empty_and_symbol_only_names_give_empty_slugs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("***"), "");
    }
}
