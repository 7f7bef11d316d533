use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;
use serde::Serialize;

/// Largest input the generator enumerates unless configured otherwise.
pub const DEFAULT_CEILING: usize = 20;

/// No configuration may raise the ceiling past this.
pub const HARD_LIMIT: usize = 24;

// ---------------------------------------------------------------------------
// CapacityWarning – reported degradation, not an error
// ---------------------------------------------------------------------------

/// The input was larger than the ceiling and only its first `enumerated`
/// elements were used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityWarning {
    /// Size of the set that was asked for.
    pub requested: usize,
    /// Size of the prefix actually enumerated.
    pub enumerated: usize,
}

impl CapacityWarning {
    /// `2^requested`, or `None` when that does not fit in a `u128`.
    pub fn theoretical_subsets(&self) -> Option<u128> {
        u32::try_from(self.requested)
            .ok()
            .and_then(|n| 1u128.checked_shl(n))
    }

    pub fn enumerated_subsets(&self) -> u128 {
        1u128 << self.enumerated
    }
}

impl fmt::Display for CapacityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input has {} elements, enumerating subsets of the first {} only ({} of ",
            self.requested,
            self.enumerated,
            self.enumerated_subsets()
        )?;
        match self.theoretical_subsets() {
            Some(n) => write!(f, "{n} subsets)"),
            None => write!(f, "2^{} subsets)", self.requested),
        }
    }
}

// ---------------------------------------------------------------------------
// PowerSet
// ---------------------------------------------------------------------------

/// Every subset of a (possibly truncated) base set.
///
/// Subset `i` holds base element `k` iff bit `k` of `i` is set, so subset 0
/// is the empty set and the last subset is the whole (truncated) base.
#[derive(Debug, Clone, Serialize)]
pub struct PowerSet<T> {
    pub subsets: Vec<IndexSet<T>>,
    pub truncation: Option<CapacityWarning>,
}

impl<T> PowerSet<T> {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.subsets.len()
    }
}

/// Enumerate the power set of `base` by repeated doubling.
///
/// Starting from `[{}]`, each element in iteration order appends a copy of
/// every subset so far with that element added. When `base` is larger than
/// `ceiling` (itself capped at [`HARD_LIMIT`]) only its first `ceiling`
/// elements take part and the returned [`PowerSet::truncation`] says so.
pub fn power_set<T: Clone + Eq + Hash>(base: &IndexSet<T>, ceiling: usize) -> PowerSet<T> {
    let ceiling = ceiling.min(HARD_LIMIT);

    let truncation = (base.len() > ceiling).then(|| {
        let warning = CapacityWarning {
            requested: base.len(),
            enumerated: ceiling,
        };
        log::warn!("power set truncated: {warning}");
        warning
    });

    let kept = base.len().min(ceiling);
    let mut subsets: Vec<IndexSet<T>> = Vec::with_capacity(1 << kept);
    subsets.push(IndexSet::new());

    for element in base.iter().take(kept) {
        let existing = subsets.len();
        for i in 0..existing {
            let mut subset = subsets[i].clone();
            subset.insert(element.clone());
            subsets.push(subset);
        }
    }

    log::debug!("enumerated {} subsets of {} elements", subsets.len(), kept);
    PowerSet { subsets, truncation }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
