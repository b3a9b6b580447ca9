// SPDX: CC0-1.0

use crate::function::Function;
use std::collections::{btree_map, BTreeMap};

/// Named collection of functions; the unit that gets saved and loaded.
///
/// Kept sorted by name, so listings and saved documents come out in a stable
/// order. Lookups and insertions are O(log n).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workspace {
    functions: BTreeMap<String, Function>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `function` under `name`, returning the function it replaced.
    pub fn add(&mut self, function: Function, name: impl Into<String>) -> Option<Function> {
        let name = name.into();
        let old = self.functions.insert(name, function);
        if old.is_some() {
            log::debug!("replaced existing function in workspace");
        }
        old
    }

    /// Removes `name` if present; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Function> {
        self.functions.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Entries ordered by name.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.functions.iter(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, Function>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Function);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Workspace {
    type Item = (&'a str, &'a Function);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, Function)> for Workspace {
    fn from_iter<I: IntoIterator<Item = (S, Function)>>(iter: I) -> Self {
        let mut ret = Self::new();
        for (name, function) in iter {
            ret.add(function, name);
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{ordered_constants, FunctionKind},
        function::Domain,
    };

    fn line(slope: f64) -> Function {
        Function::new(
            FunctionKind::Linear,
            ordered_constants([slope, 0.0]),
            Domain::new(-1.0, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut ws = Workspace::new();
        assert!(ws.is_empty());
        assert_eq!(ws.add(line(1.0), "f"), None);
        assert_eq!(ws.add(line(2.0), "g"), None);
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.get("f"), Some(&line(1.0)));
        assert_eq!(ws.get("h"), None);
    }

    #[test]
    fn test_add_overwrites() {
        let mut ws = Workspace::new();
        ws.add(line(1.0), "f");
        assert_eq!(ws.add(line(3.0), "f"), Some(line(1.0)));
        assert_eq!(ws.len(), 1);
        assert_eq!(ws.get("f"), Some(&line(3.0)));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut ws: Workspace = [("f", line(1.0)), ("g", line(2.0))].into_iter().collect();
        let before = ws.clone();
        assert_eq!(ws.remove("nope"), None);
        assert_eq!(ws, before);

        assert_eq!(ws.remove("f"), Some(line(1.0)));
        assert_eq!(ws.len(), 1);
        assert!(!ws.contains("f"));
    }

    #[test]
    fn test_iteration_is_by_name() {
        let ws: Workspace = [("zeta", line(1.0)), ("alpha", line(2.0))].into_iter().collect();
        assert_eq!(ws.names().collect::<Vec<_>>(), ["alpha", "zeta"]);
        assert_eq!(ws.iter().len(), 2);
        let (name, f) = (&ws).into_iter().next().unwrap();
        assert_eq!(name, "alpha");
        assert_eq!(f, &line(2.0));
    }

    #[test]
    fn test_equality() {
        let a: Workspace = [("f", line(1.0))].into_iter().collect();
        let b: Workspace = [("f", line(1.0))].into_iter().collect();
        let c: Workspace = [("g", line(1.0))].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
