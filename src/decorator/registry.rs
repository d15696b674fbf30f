use std::collections::HashSet;

/// Error codes the composite service can produce fixes for.
///
/// Built once from the host's codes followed by the template service's codes.
/// Duplicates are dropped, first occurrence wins. Read-only after construction,
/// so every read returns the same list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixRegistry {
    codes: Vec<String>,
}

impl FixRegistry {
    pub fn new<I>(sources: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut seen = HashSet::new();
        let codes = sources
            .into_iter()
            .flatten()
            .filter(|code| seen.insert(code.clone()))
            .collect();
        Self { codes }
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Whether fixes exist for a numeric diagnostic code.
    pub fn supports(&self, code: u32) -> bool {
        let code = code.to_string();
        self.codes.iter().any(|c| *c == code)
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn host_codes_come_first_without_duplicates() {
        let registry = FixRegistry::new([codes(&["2304", "2552"]), codes(&["9001", "2304"])]);
        assert_eq!(registry.codes(), codes(&["2304", "2552", "9001"]).as_slice());
        assert!(registry.supports(9001));
        assert!(!registry.supports(9002));
    }

    #[test]
    fn empty_sources() {
        let registry = FixRegistry::new([Vec::new(), Vec::new()]);
        assert!(registry.is_empty());
        assert!(!registry.supports(0));
    }
}
