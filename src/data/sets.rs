use std::hash::Hash;

use indexmap::IndexSet;
use serde::Serialize;

use super::model::{DateIndex, KeySet, SeriesIndex, StationIndex, TemperatureKey};

// ---------------------------------------------------------------------------
// Ordered set operations
// ---------------------------------------------------------------------------
//
// All operations are linear: membership goes through the hash side of
// `IndexSet`, output order follows the insertion order of the operands.

/// `A ∪ B`: all of `a` in order, then the members of `b` not in `a`.
pub fn union<T: Clone + Eq + Hash>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    a.iter().chain(b.iter()).cloned().collect()
}

/// `A ∩ B` in the order of `a`.
pub fn intersection<T: Clone + Eq + Hash>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    a.iter().filter(|v| b.contains(*v)).cloned().collect()
}

/// `A \ B` in the order of `a`.
pub fn difference<T: Clone + Eq + Hash>(a: &IndexSet<T>, b: &IndexSet<T>) -> IndexSet<T> {
    a.iter().filter(|v| !b.contains(*v)).cloned().collect()
}

/// Members of `union` strictly above `threshold`.
pub fn universe(union: &KeySet, threshold: &TemperatureKey) -> KeySet {
    union.iter().filter(|v| *v > threshold).cloned().collect()
}

/// `U \ A`.
pub fn complement(universe: &KeySet, a: &KeySet) -> KeySet {
    difference(universe, a)
}

/// For every key, `a`'s dates followed by `b`'s dates (not deduplicated).
pub fn combined_dates(keys: &KeySet, a: &StationIndex, b: &StationIndex) -> DateIndex {
    keys.iter()
        .map(|key| {
            let dates: Vec<String> = a.dates_for(key).iter().chain(b.dates_for(key)).cloned().collect();
            (key.clone(), dates)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SetRelations – every derived set for one series
// ---------------------------------------------------------------------------

/// The set algebra between the North (`A`) and Northeast (`B`) value sets.
#[derive(Debug, Clone, Serialize)]
pub struct SetRelations {
    pub threshold: TemperatureKey,
    pub union: KeySet,
    pub intersection: KeySet,
    pub difference: KeySet,
    pub universe: KeySet,
    pub complement: KeySet,
    /// Combined North ++ Northeast dates for every universe member.
    pub universe_dates: DateIndex,
}

impl SetRelations {
    pub fn compute(index: &SeriesIndex, threshold: &TemperatureKey) -> Self {
        let a = &index.north.values;
        let b = &index.northeast.values;

        let union = union(a, b);
        let universe = universe(&union, threshold);
        let universe_dates = combined_dates(&universe, &index.north, &index.northeast);

        SetRelations {
            threshold: threshold.clone(),
            intersection: intersection(a, b),
            difference: difference(a, b),
            complement: complement(&universe, a),
            union,
            universe,
            universe_dates,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Reading, RowOutcome};

    fn k(s: &str) -> TemperatureKey {
        s.parse().unwrap()
    }

    fn keys(values: &[&str]) -> KeySet {
        values.iter().map(|v| k(v)).collect()
    }

    fn rendered(set: &KeySet) -> Vec<&str> {
        set.iter().map(TemperatureKey::as_str).collect()
    }

    fn series(rows: &[(&str, &str, &str)]) -> SeriesIndex {
        SeriesIndex::build(rows.iter().enumerate().map(|(i, (date, n, ne))| {
            RowOutcome::Accepted(Reading {
                line: i as u64 + 1,
                date: date.to_string(),
                north: k(n),
                northeast: k(ne),
            })
        }))
    }

    #[test]
    fn union_keeps_a_order_then_new_b_members() {
        let a = keys(&["3", "1", "2"]);
        let b = keys(&["4", "2", "5"]);
        assert_eq!(rendered(&union(&a, &b)), ["3.00", "1.00", "2.00", "4.00", "5.00"]);
    }

    #[test]
    fn intersection_and_difference_follow_a_order() {
        let a = keys(&["3", "1", "2", "7"]);
        let b = keys(&["2", "9", "3"]);
        assert_eq!(rendered(&intersection(&a, &b)), ["3.00", "2.00"]);
        assert_eq!(rendered(&difference(&a, &b)), ["1.00", "7.00"]);
    }

    #[test]
    fn set_laws_hold() {
        let a = keys(&["10", "11.5", "12", "13", "-1"]);
        let b = keys(&["12", "14", "10", "0"]);
        let i = intersection(&a, &b);

        assert_eq!(union(&a, &b).len(), a.len() + b.len() - i.len());
        assert_eq!(difference(&a, &b), difference(&a, &i));

        let reversed = intersection(&b, &a);
        assert_eq!(i.len(), reversed.len());
        assert!(i.iter().all(|v| reversed.contains(v)));
        assert_eq!(rendered(&reversed), ["12.00", "10.00"]);
    }

    #[test]
    fn operations_do_not_mutate_inputs() {
        let a = keys(&["1", "2"]);
        let b = keys(&["2", "3"]);
        let before = (a.clone(), b.clone());
        let _ = (union(&a, &b), intersection(&a, &b), difference(&a, &b));
        assert_eq!((a, b), before);
    }

    #[test]
    fn universe_is_strictly_above_threshold() {
        let u = keys(&["33", "33.01", "40", "-35", "32.99", "100"]);
        assert_eq!(rendered(&universe(&u, &k("33"))), ["33.01", "40.00", "100.00"]);
    }

    #[test]
    fn relations_for_a_small_series() {
        let index = series(&[
            ("2024-07-01", "34.0", "35.5"),
            ("2024-07-02", "35.5", "33"),
            ("2024-07-03", "30", "36"),
            ("2024-07-04", "36", "34"),
        ]);
        let rel = SetRelations::compute(&index, &k("33"));

        assert_eq!(rendered(&rel.union), ["34.00", "35.50", "30.00", "36.00", "33.00"]);
        assert_eq!(rendered(&rel.intersection), ["34.00", "35.50", "36.00"]);
        assert_eq!(rendered(&rel.difference), ["30.00"]);
        assert_eq!(rendered(&rel.universe), ["34.00", "35.50", "36.00"]);
        assert!(rel.complement.is_empty());

        assert_eq!(rel.universe_dates[&k("34")], ["2024-07-01", "2024-07-04"]);
        assert_eq!(rel.universe_dates[&k("36")], ["2024-07-04", "2024-07-03"]);
    }

    #[test]
    fn complement_holds_northeast_only_hot_values() {
        let index = series(&[("d1", "20", "40"), ("d2", "34", "34"), ("d3", "21", "40")]);
        let rel = SetRelations::compute(&index, &k("33"));
        assert_eq!(rendered(&rel.universe), ["34.00", "40.00"]);
        assert_eq!(rendered(&rel.complement), ["40.00"]);
        assert_eq!(rel.universe_dates[&k("40")], ["d1", "d3"]);
        assert_eq!(rel.universe_dates[&k("34")], ["d2", "d2"]);
    }
}
