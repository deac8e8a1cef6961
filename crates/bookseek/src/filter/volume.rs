/// Placeholder replaced by the volume token in a template.
pub const TOKEN: &str = "{}";

/// The volume notations recognised by default.
pub const DEFAULT_TEMPLATES: &[&str] = &[
    "{}",
    "{}巻",
    "{}話",
    "第{}巻",
    "({})",
    "（{}）",
    " {} ",
    "vol.{}",
    "Vol.{}",
    "VOL.{}",
];

/// Decides whether a book title mentions a volume.
///
/// Each template is instantiated with the volume token and the title matches when any of the
/// instantiated patterns appears in it verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeMatcher {
    templates: Vec<String>,
}

impl VolumeMatcher {
    /// A matcher over custom templates, each should contain [`TOKEN`] once.
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
        }
    }

    /// Plain substring matching of the bare token.
    #[must_use]
    pub fn substring() -> Self {
        Self::new([TOKEN])
    }

    /// The templates in use.
    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Whether `title` contains any notation of `token`.
    #[must_use]
    pub fn matches(&self, title: &str, token: &str) -> bool {
        self.templates
            .iter()
            .map(|template| template.replace(TOKEN, token))
            .any(|pattern| title.contains(&pattern))
    }
}

impl Default for VolumeMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::VolumeMatcher;

    #[test]
    fn default_notations_match() {
        let matcher = VolumeMatcher::default();

        assert!(matcher.matches("ONE PIECE 108", "108"));
        assert!(matcher.matches("ワンピース 108巻", "108"));
        assert!(matcher.matches("ワンピース 第108巻", "108"));
        assert!(matcher.matches("ワンピース（108）", "108"));
        assert!(matcher.matches("One Piece Vol.108", "108"));
        assert!(!matcher.matches("ワンピース 107", "108"));
    }

    #[test]
    fn strict_templates_need_a_notation() {
        let matcher = VolumeMatcher::new(["第{}巻", "vol.{}"]);

        assert!(matcher.matches("ワンピース 第1巻", "1"));
        assert!(matcher.matches("one piece vol.1", "1"));
        // a bare substring is not enough once the bare template is left out
        assert!(!matcher.matches("ワンピース 第10巻", "1"));
        assert!(!matcher.matches("ワンピース 1", "1"));
    }

    #[test]
    fn substring_matcher_only_uses_the_token() {
        let matcher = VolumeMatcher::substring();

        assert_eq!(&["{}".to_owned()], matcher.templates());
        assert!(matcher.matches("ワンピース 108", "108"));
        assert!(matcher.matches("ワンピース 1080", "108"));
    }
}
