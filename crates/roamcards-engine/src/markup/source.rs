/// The exact text a node was parsed from, if it was parsed at all.
///
/// Never takes part in equality: `[[a]]` typed by hand and `PageReference::new("a")`
/// are the same node.
#[derive(Debug, Clone, Default)]
pub struct SourceText(Option<String>);

impl SourceText {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn captured(s: impl Into<String>) -> Self {
        Self(Some(s.into()))
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Captured text, or `canonical()` for nodes built in code.
    pub fn or_else(&self, canonical: impl FnOnce() -> String) -> String {
        match &self.0 {
            Some(s) => s.clone(),
            None => canonical(),
        }
    }
}

impl PartialEq for SourceText {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for SourceText {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_text() {
        assert_eq!(SourceText::captured("[[a]]"), SourceText::none());
    }

    #[test]
    fn falls_back_to_canonical() {
        assert_eq!(SourceText::none().or_else(|| "x".into()), "x");
        assert_eq!(SourceText::captured("y").or_else(|| "x".into()), "y");
    }
}
