//! Exposure groups.
//!
//! A property takes part in a mapping only when its declared groups intersect
//! the groups requested for that mapping. Properties declared with no groups
//! are never mapped.

use std::collections::BTreeSet;
use std::fmt;

/// Name of the implicit group used when a mapping requests none.
pub const DEFAULT_GROUP: &str = "default";

/// A named exposure tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExposureGroup(String);

impl ExposureGroup {
    /// Creates a group tag.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The `"default"` group.
    pub fn default_group() -> Self {
        Self::new(DEFAULT_GROUP)
    }

    /// Returns the group name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExposureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered set of exposure groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSet {
    groups: BTreeSet<ExposureGroup>,
}

impl GroupSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding only the default group.
    pub fn default_only() -> Self {
        Self::of([DEFAULT_GROUP])
    }

    /// A set holding exactly `names`.
    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: names.into_iter().map(ExposureGroup::new).collect(),
        }
    }

    /// Adds a group.
    pub fn insert(&mut self, group: ExposureGroup) {
        self.groups.insert(group);
    }

    /// Returns true if a group named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.groups.iter().any(|g| g.as_str() == name)
    }

    /// Returns true if the sets share at least one group.
    pub fn intersects(&self, other: &GroupSet) -> bool {
        !self.groups.is_disjoint(&other.groups)
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates the groups in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ExposureGroup> {
        self.groups.iter()
    }

    /// Returns this set, or the default group when empty.
    pub(crate) fn or_default(&self) -> GroupSet {
        if self.is_empty() {
            Self::default_only()
        } else {
            self.clone()
        }
    }
}

impl FromIterator<ExposureGroup> for GroupSet {
    fn from_iter<I: IntoIterator<Item = ExposureGroup>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// Exposure that always includes the default group plus `extra`.
///
/// Properties declared with this remain visible to plain default mappings as
/// well as to mappings requesting any of the extra groups.
///
/// # Examples
///
/// ```
/// use case_pipeline::{default_exposure, GroupSet};
///
/// let groups = default_exposure(["reschedule"]);
/// assert!(groups.contains("default"));
/// assert!(groups.intersects(&GroupSet::of(["reschedule"])));
/// ```
pub fn default_exposure<I, S>(extra: I) -> GroupSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut groups = GroupSet::of(extra);
    groups.insert(ExposureGroup::default_group());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_exposure_always_includes_default() {
        let groups = default_exposure(["edit", "review"]);
        assert!(groups.contains(DEFAULT_GROUP));
        assert!(groups.contains("edit"));
        assert!(groups.contains("review"));
        assert_eq!(groups.iter().count(), 3);
    }

    #[test]
    fn default_exposure_deduplicates() {
        let groups = default_exposure(["default"]);
        assert_eq!(groups, GroupSet::default_only());
    }

    #[test]
    fn empty_sets_never_intersect() {
        let empty = GroupSet::new();
        assert!(!empty.intersects(&GroupSet::default_only()));
        assert!(!GroupSet::default_only().intersects(&empty));
    }

    #[test]
    fn or_default_fills_empty_sets() {
        assert_eq!(GroupSet::new().or_default(), GroupSet::default_only());
        let named = GroupSet::of(["edit"]);
        assert_eq!(named.or_default(), named);
    }
}
