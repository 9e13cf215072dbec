//! # Address Sets
//!
//! Addresses are kept as the literal strings the cluster API, DNS or the kernel
//! route table handed us. They are **not** parsed into [`std::net::IpAddr`]:
//! the very same literal has to be used when adding, listing and deleting a
//! blackhole route, and a normalized form (`::ffff:1.2.3.4` vs `1.2.3.4`,
//! compressed vs expanded IPv6) would make a present route look absent.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A sorted, deduplicated set of address literals.
///
/// Entries are trimmed on insert and blank entries are dropped. Iteration is
/// lexicographic so every report built from a set is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressSet(BTreeSet<String>);

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address, returning `true` if it was not present yet.
    pub fn insert(&mut self, address: impl AsRef<str>) -> bool {
        let address = address.as_ref().trim();
        if address.is_empty() {
            return false;
        }
        self.0.insert(address.to_string())
    }

    pub fn extend<I, S>(&mut self, addresses: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for address in addresses {
            self.insert(address);
        }
    }

    pub fn contains(&self, address: &str) -> bool {
        self.0.contains(address.trim())
    }

    /// `true` when every address of `other` is in `self`.
    pub fn contains_all(&self, other: &AddressSet) -> bool {
        other.0.is_subset(&self.0)
    }

    /// `true` when at least one address of `other` is in `self`.
    pub fn contains_any(&self, other: &AddressSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    pub fn union(&self, other: &AddressSet) -> AddressSet {
        AddressSet(self.0.union(&other.0).cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted addresses, the form handed to the route agent.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for AddressSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = AddressSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for AddressSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for AddressSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", joined.join(", "))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
