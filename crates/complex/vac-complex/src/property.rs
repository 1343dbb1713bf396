//! Authored cell properties: an open extension point for hosts.
//!
//! A property (a custom style, a host annotation, ...) rides on a cell and
//! must react to the structural operations without the core knowing its
//! concrete type. The capability surface is intentionally small: clone,
//! geometry change, merge (glue) and split (cut).

use hashbrown::HashMap;
use std::fmt::Debug;

/// Capability interface dispatched per stored property.
pub trait CellProperty: Debug {
    /// Clone into a new box; used by snapshots and by glue/cut rewrites.
    fn clone_box(&self) -> Box<dyn CellProperty>;

    /// The owning cell's geometry was edited (moved, re-stroked, snapped).
    fn on_geometry_change(&mut self) {}

    /// The owning cell is being merged with another carrying the same
    /// property name (glue). `other` is the absorbed cell's property.
    fn on_merge(&mut self, _other: &dyn CellProperty) {}

    /// The owning cell is being split into `piece_count` cells (cut).
    /// Returns one property per piece; the default clones itself.
    fn on_split(&self, piece_count: usize) -> Vec<Box<dyn CellProperty>> {
        (0..piece_count).map(|_| self.clone_box()).collect()
    }
}

/// Named set of properties carried by one cell.
#[derive(Debug, Default)]
pub struct PropertyMap {
    entries: HashMap<String, Box<dyn CellProperty>>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, prop: Box<dyn CellProperty>) {
        self.entries.insert(name.into(), prop);
    }

    pub fn get(&self, name: &str) -> Option<&dyn CellProperty> {
        self.entries.get(name).map(|b| b.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Notify every property of a geometry edit on the owning cell.
    pub fn notify_geometry_change(&mut self) {
        for prop in self.entries.values_mut() {
            prop.on_geometry_change();
        }
    }

    /// Merge `other`'s properties into this map (glue). Same-name entries
    /// are merged via `on_merge`; names only present on `other` are cloned
    /// over.
    pub fn merge_from(&mut self, other: &PropertyMap) {
        for (name, theirs) in &other.entries {
            match self.entries.get_mut(name) {
                Some(mine) => mine.on_merge(theirs.as_ref()),
                None => {
                    self.entries.insert(name.clone(), theirs.clone_box());
                }
            }
        }
    }

    /// Split every property into `piece_count` maps (cut).
    pub fn split(&self, piece_count: usize) -> Vec<PropertyMap> {
        let mut out: Vec<PropertyMap> = (0..piece_count).map(|_| PropertyMap::new()).collect();
        for (name, prop) in &self.entries {
            for (map, piece) in out.iter_mut().zip(prop.on_split(piece_count)) {
                map.insert(name.clone(), piece);
            }
        }
        out
    }
}

impl Clone for PropertyMap {
    fn clone(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone_box()))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Counter {
        edits: u32,
        merges: u32,
    }

    impl CellProperty for Counter {
        fn clone_box(&self) -> Box<dyn CellProperty> {
            Box::new(self.clone())
        }
        fn on_geometry_change(&mut self) {
            self.edits += 1;
        }
        fn on_merge(&mut self, _other: &dyn CellProperty) {
            self.merges += 1;
        }
    }

    #[test]
    fn clone_is_deep() {
        let mut map = PropertyMap::new();
        map.insert("style", Box::new(Counter { edits: 0, merges: 0 }));
        let copy = map.clone();
        map.notify_geometry_change();
        // The clone did not observe the edit.
        assert!(copy.get("style").is_some());
        assert_eq!(copy.names().count(), 1);
    }

    #[test]
    fn merge_brings_missing_names() {
        let mut a = PropertyMap::new();
        let mut b = PropertyMap::new();
        b.insert("style", Box::new(Counter { edits: 0, merges: 0 }));
        a.merge_from(&b);
        assert!(a.get("style").is_some());
    }

    #[test]
    fn split_fans_out() {
        let mut map = PropertyMap::new();
        map.insert("style", Box::new(Counter { edits: 0, merges: 0 }));
        let pieces = map.split(3);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|p| p.get("style").is_some()));
    }
}
