//! Merges unit and case tuples into one record per `(user, hour)`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use pivot_core::models::{PivotTuple, RecordKey, UnifiedRecord};
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Merge the two pivot outputs.
///
/// Unit tuples seed records with `cases = 0`; case tuples then set `cases` on
/// the matching record or create one with `units = 0`. When one side repeats
/// a key, the later tuple wins. Records come back ordered by user (see
/// [`compare_users`]) and then by hour.
pub fn merge(units: &[PivotTuple], cases: &[PivotTuple]) -> Vec<UnifiedRecord> {
    let seeded = units
        .iter()
        .fold(BTreeMap::new(), |mut acc: BTreeMap<RecordKey, UnifiedRecord>, t| {
            acc.insert(
                t.key(),
                UnifiedRecord {
                    user: t.user.clone(),
                    hour: t.hour,
                    units: or_zero(t.value),
                    cases: 0.0,
                },
            );
            acc
        });

    let merged = cases.iter().fold(seeded, |mut acc, t| {
        acc.entry(t.key())
            .and_modify(|record| record.cases = or_zero(t.value))
            .or_insert_with(|| UnifiedRecord {
                user: t.user.clone(),
                hour: t.hour,
                units: 0.0,
                cases: or_zero(t.value),
            });
        acc
    });

    let mut records: Vec<UnifiedRecord> = merged.into_values().collect();
    records.sort_by(|a, b| compare_users(&a.user, &b.user).then(a.hour.cmp(&b.hour)));

    debug!(
        "Merged {} unit and {} case tuples into {} records",
        units.len(),
        cases.len(),
        records.len()
    );
    records
}

/// Human ordering for user names.
///
/// Base letters are compared first with accents and case ignored, and with
/// punctuation and symbols ranked below digits and digits below letters
/// ("~ana" < "ana" < "bia"). Remaining ties go to accents (unaccented first),
/// then case (lowercase first), then the raw text.
pub fn compare_users(a: &str, b: &str) -> Ordering {
    CollationKey::new(a)
        .cmp(&CollationKey::new(b))
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Space,
    Symbol,
    Digit,
    Letter,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            CharClass::Space
        } else if c.is_numeric() {
            CharClass::Digit
        } else if c.is_alphabetic() {
            CharClass::Letter
        } else {
            CharClass::Symbol
        }
    }
}

/// Field order is comparison order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct CollationKey {
    primary: Vec<(CharClass, char)>,
    accents: Vec<Vec<char>>,
    uppercase: Vec<bool>,
}

impl CollationKey {
    fn new(s: &str) -> Self {
        let mut key = CollationKey {
            primary: Vec::new(),
            accents: Vec::new(),
            uppercase: Vec::new(),
        };
        for c in s.nfd() {
            if is_combining_mark(c) {
                if let Some(marks) = key.accents.last_mut() {
                    marks.push(c);
                }
                continue;
            }
            let class = CharClass::of(c);
            let upper = c.is_uppercase();
            for folded in c.to_lowercase() {
                key.primary.push((class, folded));
                key.accents.push(Vec::new());
                key.uppercase.push(upper);
            }
        }
        key
    }
}

/// Zero-like values (including `-0.0`) collapse to `0.0`.
fn or_zero(value: f64) -> f64 {
    if value == 0.0 || value.is_nan() {
        0.0
    } else {
        value
    }
}
