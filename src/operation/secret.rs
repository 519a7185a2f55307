//! Keyword filter used to spot a disclosed secret in conversation content.

/// Phrases that mark a message as carrying the secret during live operations.
pub const DEFAULT_KEYWORDS: &[&str] = &["password is", "password:", "the password"];

/// Case-insensitive substring matcher over a fixed keyword set.
#[derive(Debug, Clone)]
pub struct SecretFilter {
    keywords: Vec<String>,
}

impl SecretFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn matches(&self, content: &str) -> bool {
        let lowered = content.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

impl Default for SecretFilter {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}
