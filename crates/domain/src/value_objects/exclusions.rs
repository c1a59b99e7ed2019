//! Exclusion rules that carve call sites out of chaos consideration

use serde::{Deserialize, Serialize};

use crate::value_objects::CallSite;

/// The three exclusion lists evaluated against every candidate call site
///
/// A call is excluded when any entry in any list matches; the lists carry no
/// priority among themselves. Empty lists exclude nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionList {
    /// Namespace patterns matched on whole segments: `com.foo` covers
    /// `com.foo` and `com.foo.bar` but never `com.foobar`
    #[serde(default)]
    packages: Vec<String>,
    /// Fully qualified type names, matched exactly
    #[serde(default, alias = "classes")]
    types: Vec<String>,
    /// Bare method names, matched wherever they occur regardless of the
    /// declaring type. Intentionally broad: two unrelated types sharing a
    /// method name are both excluded.
    #[serde(default)]
    methods: Vec<String>,
}

impl ExclusionList {
    /// An empty list that excludes nothing
    #[must_use]
    pub const fn new() -> Self {
        Self {
            packages: Vec::new(),
            types: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Replace the package patterns
    #[must_use]
    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.packages = packages;
        self
    }

    /// Replace the fully qualified type names
    #[must_use]
    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = types;
        self
    }

    /// Replace the bare method names
    #[must_use]
    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }

    /// Configured package patterns
    #[must_use]
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Configured fully qualified type names
    #[must_use]
    pub fn types(&self) -> &[String] {
        &self.types
    }

    /// Configured bare method names
    #[must_use]
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Whether all three lists are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.types.is_empty() && self.methods.is_empty()
    }

    /// Whether any rule removes `site` from chaos consideration
    ///
    /// The first matching list short-circuits; the result is the same as
    /// evaluating all three.
    #[must_use]
    pub fn excludes(&self, site: &CallSite) -> bool {
        self.excludes_package(site.package())
            || self.excludes_type(&site.qualified_type())
            || self.methods.iter().any(|m| m == site.method_name())
    }

    fn excludes_package(&self, package: &str) -> bool {
        let site_segments: Vec<&str> = segments(package).collect();
        self.packages.iter().any(|pattern| {
            let pattern_segments: Vec<&str> = segments(pattern).collect();
            !pattern_segments.is_empty()
                && pattern_segments.len() <= site_segments.len()
                && site_segments[..pattern_segments.len()] == pattern_segments[..]
        })
    }

    fn excludes_type(&self, qualified_type: &str) -> bool {
        self.types.iter().any(|t| t.replace("::", ".") == qualified_type)
    }
}

/// Split a namespace path into segments, accepting `.` and `::` separators
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['.', ':']).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Layer;

    fn controller(package: &str, type_name: &str, method: &str) -> CallSite {
        CallSite::new(Layer::Controller, package, type_name, method)
    }

    #[test]
    fn empty_list_excludes_nothing() {
        let list = ExclusionList::new();
        assert!(list.is_empty());
        assert!(!list.excludes(&controller("com.example", "HelloController", "hello")));
    }

    #[test]
    fn package_match_is_exact_or_sub_package() {
        let list = ExclusionList::new().with_packages(vec!["com.foo".to_string()]);
        assert!(list.excludes(&controller("com.foo", "Anything", "m")));
        assert!(list.excludes(&controller("com.foo.bar", "Anything", "m")));
        assert!(list.excludes(&controller("com.foo.bar.baz", "Anything", "m")));
    }

    #[test]
    fn package_match_respects_segment_boundaries() {
        let list = ExclusionList::new().with_packages(vec!["com.foo".to_string()]);
        assert!(!list.excludes(&controller("com.foobar", "Anything", "m")));
        assert!(!list.excludes(&controller("com", "Anything", "m")));
    }

    #[test]
    fn package_match_accepts_rust_path_separators() {
        let list = ExclusionList::new().with_packages(vec!["com::foo".to_string()]);
        assert!(list.excludes(&controller("com.foo.bar", "Anything", "m")));

        let dotted = ExclusionList::new().with_packages(vec!["com.foo".to_string()]);
        assert!(dotted.excludes(&controller("com::foo::bar", "Anything", "m")));
    }

    #[test]
    fn empty_package_pattern_matches_nothing() {
        let list = ExclusionList::new().with_packages(vec![String::new()]);
        assert!(!list.excludes(&controller("com.foo", "Anything", "m")));
        assert!(!list.excludes(&controller("", "Anything", "m")));
    }

    #[test]
    fn type_match_requires_full_qualification() {
        let list = ExclusionList::new().with_types(vec!["x.y.HelloController".to_string()]);
        assert!(list.excludes(&controller("x.y", "HelloController", "hello")));
        assert!(!list.excludes(&controller("x.z", "HelloController", "hello")));
        assert!(!list.excludes(&controller("x.y", "OtherController", "hello")));
    }

    #[test]
    fn type_match_normalizes_separators() {
        let list = ExclusionList::new().with_types(vec!["x::y::HelloController".to_string()]);
        assert!(list.excludes(&controller("x.y", "HelloController", "hello")));
    }

    #[test]
    fn method_match_ignores_declaring_type() {
        let list = ExclusionList::new().with_methods(vec!["health".to_string()]);
        assert!(list.excludes(&controller("a.b", "StatusController", "health")));
        assert!(list.excludes(&controller("c.d", "ProbeService", "health")));
        assert!(!list.excludes(&controller("a.b", "StatusController", "healthcheck")));
    }

    #[test]
    fn any_list_match_excludes() {
        let list = ExclusionList::new()
            .with_packages(vec!["noise".to_string()])
            .with_types(vec!["x.y.HelloController".to_string()])
            .with_methods(vec!["shutdown".to_string()]);

        assert!(list.excludes(&controller("noise.inner", "Whatever", "m")));
        assert!(list.excludes(&controller("x.y", "HelloController", "hello")));
        assert!(list.excludes(&controller("other", "Other", "shutdown")));
        assert!(!list.excludes(&controller("clean", "Clean", "run")));
    }

    #[test]
    fn deserializes_legacy_classes_key() {
        let json = r#"{"packages":[],"classes":["x.y.HelloController"],"methods":[]}"#;
        let list: ExclusionList = serde_json::from_str(json).expect("deserialize");
        assert_eq!(list.types(), ["x.y.HelloController".to_string()]);
    }

    #[test]
    fn deserializes_with_missing_lists() {
        let list: ExclusionList = serde_json::from_str("{}").expect("deserialize");
        assert!(list.is_empty());
    }
}
