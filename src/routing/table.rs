//! Route tables and merging.
//!
//! # Responsibilities
//! - Hold ordered (pattern, handler, options) entries
//! - Keep patterns unique: re-adding a pattern rebinds it in place
//! - Merge several tables into one, later tables overriding earlier ones
//!
//! # Design Decisions
//! - Update-in-place keeps the position of the first registration, so the
//!   dispatch order is the order in which patterns were first declared
//! - Patterns are opaque strings; their syntax belongs to the HTTP layer
//! - No error conditions: any (pattern, handler) pair is accepted

use serde_json::{Map, Value};

use crate::handlers::types::TypeRef;

/// Extra options passed through to the mounted handler.
pub type RouteOptions = Map<String, Value>;

/// A single dispatch entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pattern: String,
    handler: TypeRef,
    options: Option<RouteOptions>,
}

impl RouteEntry {
    /// Create an entry without options.
    pub fn new(pattern: impl Into<String>, handler: TypeRef) -> Self {
        Self {
            pattern: pattern.into(),
            handler,
            options: None,
        }
    }

    /// Create an entry carrying options. Empty options are dropped.
    pub fn with_options(pattern: impl Into<String>, handler: TypeRef, options: RouteOptions) -> Self {
        Self {
            pattern: pattern.into(),
            handler,
            options: if options.is_empty() { None } else { Some(options) },
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn handler(&self) -> TypeRef {
        self.handler
    }

    pub fn options(&self) -> Option<&RouteOptions> {
        self.options.as_ref()
    }
}

/// Ordered collection of route entries with unique patterns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge tables in the order given; a later table overrides patterns
    /// already present from an earlier one.
    pub fn collect<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = &'a RouteTable>,
    {
        let mut collected = RouteTable::new();
        for table in tables {
            collected.add(table.entries.iter().cloned());
        }
        collected
    }

    /// Insert entries, replacing any entry with the same pattern at its
    /// original index and appending the rest.
    pub fn add<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = RouteEntry>,
    {
        for entry in entries {
            match self.position(&entry.pattern) {
                Some(index) => {
                    tracing::debug!(
                        pattern = %entry.pattern,
                        previous = %self.entries[index].handler,
                        handler = %entry.handler,
                        "Rebinding route"
                    );
                    self.entries[index] = entry;
                }
                None => self.entries.push(entry),
            }
        }
        self
    }

    /// Insert a single entry with `add` semantics.
    pub fn push(&mut self, entry: RouteEntry) -> &mut Self {
        self.add(std::iter::once(entry))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Patterns in table order.
    pub fn urls(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.pattern.as_str()).collect()
    }

    /// Handlers in table order.
    pub fn handlers(&self) -> Vec<TypeRef> {
        self.entries.iter().map(|e| e.handler).collect()
    }

    /// Options of the entries that carry any, in table order.
    pub fn kwargs(&self) -> Vec<&RouteOptions> {
        self.entries.iter().filter_map(|e| e.options.as_ref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Look up the entry bound to `pattern`.
    pub fn get(&self, pattern: &str) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.pattern == pattern)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry> {
        self.entries.iter()
    }

    fn position(&self, pattern: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.pattern == pattern)
    }
}

impl FromIterator<RouteEntry> for RouteTable {
    fn from_iter<I: IntoIterator<Item = RouteEntry>>(iter: I) -> Self {
        let mut table = RouteTable::new();
        table.add(iter);
        table
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::types::Declared;
    use serde_json::json;

    struct RootHandler;
    impl Declared for RootHandler {
        const IDENT: &'static str = "RootHandler";
    }

    struct OtherHandler;
    impl Declared for OtherHandler {
        const IDENT: &'static str = "OtherHandler";
    }

    fn root() -> TypeRef {
        TypeRef::of::<RootHandler>()
    }

    fn other() -> TypeRef {
        TypeRef::of::<OtherHandler>()
    }

    #[test]
    fn test_basic_add() {
        let mut table: RouteTable = vec![RouteEntry::new("/", root())].into_iter().collect();
        table.push(RouteEntry::new("/", other()));

        assert!(table.handlers().contains(&other()));
        assert!(!table.handlers().contains(&root()));
    }

    #[test]
    fn test_duplicate_pattern_replaced_in_place() {
        let mut table = RouteTable::new();
        table.add(vec![
            RouteEntry::new("/a", root()),
            RouteEntry::new("/b", root()),
            RouteEntry::new("/c", root()),
        ]);

        table.push(RouteEntry::new("/b", other()));

        assert_eq!(table.len(), 3);
        assert_eq!(table.urls(), vec!["/a", "/b", "/c"]);
        assert_eq!(table.handlers(), vec![root(), other(), root()]);
    }

    #[test]
    fn test_duplicates_within_one_add_call() {
        let mut table = RouteTable::new();
        table.add(vec![
            RouteEntry::new("/x", root()),
            RouteEntry::new("/y", root()),
            RouteEntry::new("/x", other()),
        ]);

        assert_eq!(table.urls(), vec!["/x", "/y"]);
        assert_eq!(table.get("/x").map(RouteEntry::handler), Some(other()));
    }

    #[test]
    fn test_add_is_chainable() {
        let mut table = RouteTable::new();
        table
            .push(RouteEntry::new("/one", root()))
            .push(RouteEntry::new("/two", other()));

        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_collect() {
        let first: RouteTable = vec![RouteEntry::new("/", root())].into_iter().collect();
        let second: RouteTable = vec![
            RouteEntry::new("/", other()),
            RouteEntry::new("/home", root()),
        ]
        .into_iter()
        .collect();

        let table = RouteTable::collect([&first, &second]);

        assert!(table.handlers().contains(&other()));
        assert!(table.handlers().contains(&root()));
        assert!(table.urls().contains(&"/"));
        assert!(table.urls().contains(&"/home"));
    }

    #[test]
    fn test_collect_later_table_wins_both_ways() {
        let a: RouteTable = vec![RouteEntry::new("/shared", root())].into_iter().collect();
        let b: RouteTable = vec![RouteEntry::new("/shared", other())].into_iter().collect();

        let ab = RouteTable::collect([&a, &b]);
        assert_eq!(ab.get("/shared").map(RouteEntry::handler), Some(other()));

        let ba = RouteTable::collect([&b, &a]);
        assert_eq!(ba.get("/shared").map(RouteEntry::handler), Some(root()));
    }

    #[test]
    fn test_collect_leaves_inputs_untouched() {
        let a: RouteTable = vec![RouteEntry::new("/a", root())].into_iter().collect();
        let b: RouteTable = vec![RouteEntry::new("/b", other())].into_iter().collect();

        let mut merged = RouteTable::collect([&a, &b]);
        merged.clear();

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_kwargs_only_for_entries_with_options() {
        let mut options = RouteOptions::new();
        options.insert("custom".into(), json!("settings"));

        let table: RouteTable = vec![
            RouteEntry::new("/plain", root()),
            RouteEntry::with_options("/custom", other(), options.clone()),
            RouteEntry::with_options("/empty", other(), RouteOptions::new()),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.kwargs(), vec![&options]);
    }

    #[test]
    fn test_clear() {
        let mut table: RouteTable = vec![RouteEntry::new("/", root())].into_iter().collect();
        table.clear();

        assert!(table.is_empty());
    }
}
