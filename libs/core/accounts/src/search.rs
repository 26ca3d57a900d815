use mongodb::bson::oid::ObjectId;
use regex::{Regex, RegexBuilder};

/// A user-supplied free-text search term.
///
/// The raw text is regex-escaped before use so that input like `a.b(` is matched
/// literally, both by MongoDB `$regex` filters and by the in-memory matcher.
#[derive(Debug, Clone)]
pub struct SearchText {
    raw: String,
    matcher: Option<Regex>,
}

impl SearchText {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim().to_string();
        let matcher = if raw.is_empty() {
            None
        } else {
            RegexBuilder::new(&regex::escape(&raw))
                .case_insensitive(true)
                .build()
                .ok()
        };
        Self { raw, matcher }
    }

    /// Build from an optional query parameter. Blank input yields `None`.
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        raw.map(Self::new).filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Escaped pattern for a MongoDB `$regex` clause.
    pub fn pattern(&self) -> String {
        regex::escape(&self.raw)
    }

    /// The term parsed as an ObjectId, when it is one.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        ObjectId::parse_str(&self.raw).ok()
    }

    /// Case-insensitive substring match, mirroring the `$regex`/`$options: "i"` filter.
    pub fn matches(&self, value: &str) -> bool {
        match &self.matcher {
            Some(re) => re.is_match(value),
            None => true,
        }
    }

    /// True when any of `values` matches, or when `id` equals the term parsed as an id.
    pub fn matches_any<'a>(
        &self,
        id: Option<&ObjectId>,
        values: impl IntoIterator<Item = &'a str>,
    ) -> bool {
        if let (Some(id), Some(wanted)) = (id, self.as_object_id())
            && *id == wanted
        {
            return true;
        }
        values.into_iter().any(|v| self.matches(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_none() {
        assert!(SearchText::from_query(Some("   ")).is_none());
        assert!(SearchText::from_query(None).is_none());
        assert!(SearchText::from_query(Some("ali")).is_some());
    }

    #[test]
    fn test_matches_case_insensitive() {
        let term = SearchText::new("AhMeD");
        assert!(term.matches("ahmed ali"));
        assert!(term.matches("Mr. AHMED"));
        assert!(!term.matches("mohamed"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        let term = SearchText::new("a.b(");
        assert_eq!(term.pattern(), r"a\.b\(");
        assert!(term.matches("xa.b(y"));
        assert!(!term.matches("axb("));
    }

    #[test]
    fn test_object_id_match() {
        let id = ObjectId::new();
        let term = SearchText::new(id.to_hex());
        assert_eq!(term.as_object_id(), Some(id));
        assert!(term.matches_any(Some(&id), ["nothing"]));
        assert!(!term.matches_any(Some(&ObjectId::new()), ["nothing"]));
        assert!(SearchText::new("not-an-id").as_object_id().is_none());
    }
}
