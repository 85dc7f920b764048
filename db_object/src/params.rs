//! Parameter sets
//!
//! A `ParameterSet` is the ordered argument contract of one stored procedure.
//! Its order is the binding order of the call, and its version selects the
//! procedure revision (`A_load` vs `A_load_v2`).

use std::fmt;

/// The standard actions an entity can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Load,
    Create,
    Save,
    Delete,
    List,
}

impl Verb {
    pub const ALL: [Verb; 5] = [Verb::Load, Verb::Create, Verb::Save, Verb::Delete, Verb::List];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Load => "load",
            Verb::Create => "create",
            Verb::Save => "save",
            Verb::Delete => "delete",
            Verb::List => "list",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, optionally versioned list of field names
///
/// ```
/// use db_object::{ParameterSet, Verb};
///
/// let params = ParameterSet::new(["id"]).with_version(2);
/// assert_eq!(params.procedure_name("A", Verb::Load), "A_load_v2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSet {
    names: Vec<String>,
    version: Option<u32>,
}

impl ParameterSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// `""` when unversioned, `"_v<version>"` otherwise
    pub fn version_suffix(&self) -> String {
        match self.version {
            Some(version) => format!("_v{}", version),
            None => String::new(),
        }
    }

    pub fn procedure_name(&self, entity: &str, verb: Verb) -> String {
        format!("{}_{}{}", entity, verb.as_str(), self.version_suffix())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First name that appears more than once, if any
    pub fn first_duplicate(&self) -> Option<&str> {
        self.names
            .iter()
            .enumerate()
            .find(|(i, name)| self.names[..*i].contains(name))
            .map(|(_, name)| name.as_str())
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl<const N: usize> From<[&str; N]> for ParameterSet {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}

impl From<&[&str]> for ParameterSet {
    fn from(names: &[&str]) -> Self {
        Self::new(names.iter().copied())
    }
}

impl From<Vec<&str>> for ParameterSet {
    fn from(names: Vec<&str>) -> Self {
        Self::new(names)
    }
}

impl From<Vec<String>> for ParameterSet {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_suffix() {
        assert_eq!(ParameterSet::new(["id"]).version_suffix(), "");
        assert_eq!(ParameterSet::new(["id"]).with_version(2).version_suffix(), "_v2");
        assert_eq!(ParameterSet::default().with_version(123).version_suffix(), "_v123");
    }

    #[test]
    fn test_procedure_name() {
        let params = ParameterSet::new(["id"]);
        assert_eq!(params.procedure_name("A", Verb::Load), "A_load");
        assert_eq!(params.procedure_name("A", Verb::Delete), "A_delete");

        let versioned = ParameterSet::new(["x", "y"]).with_version(3);
        assert_eq!(versioned.procedure_name("B", Verb::Create), "B_create_v3");
    }

    #[test]
    fn test_raw_list_promotion_keeps_order() {
        let params: ParameterSet = ["x", "y"].into();
        assert_eq!(params.names(), &["x".to_string(), "y".to_string()]);
        assert_eq!(params.version(), None);

        let params: ParameterSet = vec!["b", "a"].into();
        let names: Vec<&str> = params.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_first_duplicate() {
        assert_eq!(ParameterSet::new(["x", "y"]).first_duplicate(), None);
        assert_eq!(ParameterSet::new(["x", "y", "x"]).first_duplicate(), Some("x"));
    }
}
