//! Search state for one browsing session

/// Free-text query plus the two category toggles.
///
/// Never persisted; each session starts from the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    show_text: bool,
    show_images: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            show_text: true,
            show_images: true,
        }
    }
}

impl SearchState {
    /// Create the default "show everything" state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn show_text(&self) -> bool {
        self.show_text
    }

    pub fn show_images(&self) -> bool {
        self.show_images
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn toggle_show_text(&mut self) {
        self.show_text = !self.show_text;
    }

    pub fn toggle_show_images(&mut self) {
        self.show_images = !self.show_images;
    }

    /// Builder-style query setter
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.set_query(query);
        self
    }

    /// Builder-style category setter
    pub fn with_categories(mut self, show_text: bool, show_images: bool) -> Self {
        self.show_text = show_text;
        self.show_images = show_images;
        self
    }

    /// The query as matched: trimmed and lower-cased
    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }

    /// Whether the trimmed query is non-empty
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_everything() {
        let state = SearchState::new();
        assert_eq!(state.query(), "");
        assert!(state.show_text());
        assert!(state.show_images());
        assert!(!state.has_query());
    }

    #[test]
    fn toggles_flip() {
        let mut state = SearchState::new();
        state.toggle_show_text();
        state.toggle_show_images();
        assert!(!state.show_text());
        assert!(!state.show_images());
        state.toggle_show_images();
        assert!(state.show_images());
    }

    #[test]
    fn normalized_query_trims_and_lowercases() {
        let state = SearchState::new().with_query("  HeLLo ");
        assert_eq!(state.normalized_query(), "hello");
        assert!(state.has_query());
    }

    #[test]
    fn whitespace_query_is_not_a_query() {
        let state = SearchState::new().with_query("   ");
        assert!(!state.has_query());
    }
}
