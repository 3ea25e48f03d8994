/// Shader permutation key
///
/// A sorted set of feature flags. Flag names are derived from scene data:
/// `HAS_` followed by the upper-cased attribute or texture name
/// (`texcoord0` -> `HAS_TEXCOORD0`, `baseColor` -> `HAS_BASECOLOR`).

use std::collections::BTreeSet;
use std::fmt;

/// Set of feature flags selecting one shader variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermutationKey {
    flags: BTreeSet<String>,
}

impl PermutationKey {
    /// Prefix of every derived flag
    pub const FLAG_PREFIX: &'static str = "HAS_";

    pub fn new() -> Self {
        Self::default()
    }

    /// Flag name for a piece of scene data
    pub fn flag_for(name: &str) -> String {
        format!("{}{}", Self::FLAG_PREFIX, name.to_uppercase())
    }

    /// Record that the scene data called `name` is present
    pub fn insert_feature(&mut self, name: &str) {
        self.flags.insert(Self::flag_for(name));
    }

    /// Whether the scene data called `name` was recorded
    pub fn has_feature(&self, name: &str) -> bool {
        self.flags.contains(&Self::flag_for(name))
    }

    /// Flags in sorted order
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl fmt::Display for PermutationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<&str> = self.flags().collect();
        write!(f, "[{}]", flags.join(", "))
    }
}
