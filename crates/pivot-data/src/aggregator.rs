//! Descriptive aggregates over reconciled records.
//!
//! Everything here is a pure function of its input; the report layer renders
//! the results as tables and chart series.

use std::collections::{BTreeMap, HashMap};

use pivot_core::models::{HourAggregate, Totals, UnifiedRecord, UserAggregate};
use serde::Serialize;

/// Share of the grand total the Pareto cut-off must pass.
pub const PARETO_SHARE: f64 = 0.8;

// ── Grouping ──────────────────────────────────────────────────────────────────

/// Sum units and cases per user, largest total first.
///
/// Ties keep the order in which users first appear in `records`.
pub fn per_user(records: &[UnifiedRecord]) -> Vec<UserAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Totals)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.user.as_str()).or_insert_with(|| {
            groups.push((record.user.as_str(), Totals::default()));
            groups.len() - 1
        });
        groups[slot].1.add_record(record);
    }

    let mut users: Vec<UserAggregate> = groups
        .into_iter()
        .map(|(user, t)| UserAggregate {
            user: user.to_string(),
            units: t.units,
            cases: t.cases,
            total: t.total,
        })
        .collect();
    users.sort_by(|a, b| b.total.total_cmp(&a.total));
    users
}

/// Sum units and cases per hour, in ascending hour order.
pub fn per_hour(records: &[UnifiedRecord]) -> Vec<HourAggregate> {
    let mut map: BTreeMap<u8, Totals> = BTreeMap::new();
    for record in records {
        map.entry(record.hour).or_default().add_record(record);
    }
    map.into_iter()
        .map(|(hour, t)| HourAggregate {
            hour,
            units: t.units,
            cases: t.cases,
            total: t.total,
        })
        .collect()
}

/// Units, cases and combined total over the whole record set.
pub fn grand_totals(records: &[UnifiedRecord]) -> Totals {
    records.iter().fold(Totals::default(), |mut acc, r| {
        acc.add_record(r);
        acc
    })
}

/// The busiest hour, or `None` when there are no hours. The earliest hour
/// wins a tie.
pub fn peak_hour(hours: &[HourAggregate]) -> Option<&HourAggregate> {
    hours
        .iter()
        .reduce(|best, h| if h.total > best.total { h } else { best })
}

// ── Series helpers ────────────────────────────────────────────────────────────

/// Number of top values whose running sum passes 80% of the total.
///
/// Values are ranked largest first and counted until the running sum exceeds
/// [`PARETO_SHARE`] of the total (a zero total counts as 1). If the threshold
/// is never passed, every value is counted; an empty input yields 1.
pub fn pareto_cutoff(values: &[f64]) -> usize {
    let sorted = sorted_descending(values);
    let threshold = guarded_total(&sorted) * PARETO_SHARE;

    let mut cumulative = 0.0;
    for (i, value) in sorted.iter().enumerate() {
        cumulative += value;
        if cumulative > threshold {
            return i + 1;
        }
    }
    sorted.len().max(1)
}

/// Running share of the total, in percent, for values ranked largest first.
pub fn pareto_curve(values: &[f64]) -> Vec<f64> {
    let sorted = sorted_descending(values);
    let total = guarded_total(&sorted);
    cumulative_sum(&sorted)
        .into_iter()
        .map(|c| c * 100.0 / total)
        .collect()
}

/// Trailing average: point `i` averages `values[i + 1 - window ..= i]`,
/// using fewer points near the start instead of padding. A zero window is
/// treated as 1.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Running totals, same length as `values`.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

fn sorted_descending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted
}

fn guarded_total(values: &[f64]) -> f64 {
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        1.0
    } else {
        sum
    }
}

// ── Pareto table ──────────────────────────────────────────────────────────────

/// A per-user aggregate with its share of the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserShare {
    pub user: String,
    pub total: f64,
    /// Percent of the grand total.
    pub share: f64,
    /// Percent of the grand total covered by this user and everyone above.
    pub cumulative_share: f64,
}

/// Pair each user (already ranked by [`per_user`]) with its share.
pub fn user_shares(users: &[UserAggregate]) -> Vec<UserShare> {
    let totals: Vec<f64> = users.iter().map(|u| u.total).collect();
    let grand = guarded_total(&totals);
    users
        .iter()
        .zip(cumulative_sum(&totals))
        .map(|(u, running)| UserShare {
            user: u.user.clone(),
            total: u.total,
            share: u.total * 100.0 / grand,
            cumulative_share: running * 100.0 / grand,
        })
        .collect()
}

// ── Summary ───────────────────────────────────────────────────────────────────

/// Headline figures for one record set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub totals: Totals,
    pub users: usize,
    pub active_hours: usize,
    /// How many users account for 80% of the combined total.
    pub pareto_cutoff: usize,
    pub peak_hour: Option<u8>,
    /// Combined total divided by the number of active hours.
    pub average_per_hour: f64,
}

impl Summary {
    pub fn from_parts(
        records: &[UnifiedRecord],
        users: &[UserAggregate],
        hours: &[HourAggregate],
    ) -> Self {
        let totals = grand_totals(records);
        let user_totals: Vec<f64> = users.iter().map(|u| u.total).collect();
        let average_per_hour = if hours.is_empty() {
            0.0
        } else {
            totals.total / hours.len() as f64
        };
        Self {
            totals,
            users: users.len(),
            active_hours: hours.len(),
            pareto_cutoff: pareto_cutoff(&user_totals),
            peak_hour: peak_hour(hours).map(|h| h.hour),
            average_per_hour,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(user: &str, hour: u8, units: f64, cases: f64) -> UnifiedRecord {
        UnifiedRecord {
            user: user.to_string(),
            hour,
            units,
            cases,
        }
    }

    fn sample() -> Vec<UnifiedRecord> {
        vec![
            rec("Ana", 8, 10.0, 2.0),
            rec("Ana", 9, 5.0, 0.0),
            rec("Bruno", 8, 30.0, 4.0),
            rec("Carla", 10, 1.0, 1.0),
        ]
    }

    // ── per_user ──────────────────────────────────────────────────────────────

    #[test]
    fn test_per_user_sums_and_ranks() {
        let users = per_user(&sample());
        let names: Vec<&str> = users.iter().map(|u| u.user.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Ana", "Carla"]);
        assert_eq!(users[1].units, 15.0);
        assert_eq!(users[1].cases, 2.0);
        assert_eq!(users[1].total, 17.0);
    }

    #[test]
    fn test_per_user_ties_keep_input_order() {
        let records = vec![rec("Ana", 8, 1.0, 0.0), rec("Bia", 8, 1.0, 0.0)];
        let users = per_user(&records);
        assert_eq!(users[0].user, "Ana");
        assert_eq!(users[1].user, "Bia");
    }

    // ── per_hour ──────────────────────────────────────────────────────────────

    #[test]
    fn test_per_hour_ascending() {
        let hours = per_hour(&sample());
        let keys: Vec<u8> = hours.iter().map(|h| h.hour).collect();
        assert_eq!(keys, vec![8, 9, 10]);
        assert_eq!(hours[0].units, 40.0);
        assert_eq!(hours[0].cases, 6.0);
        assert_eq!(hours[0].total, 46.0);
    }

    #[test]
    fn test_empty_records() {
        assert!(per_user(&[]).is_empty());
        assert!(per_hour(&[]).is_empty());
        assert_eq!(grand_totals(&[]), Totals::default());
    }

    // ── conservation ──────────────────────────────────────────────────────────

    #[test]
    fn test_aggregation_conserves_totals() {
        let records = sample();
        let users = per_user(&records);
        let hours = per_hour(&records);
        let grand = grand_totals(&records);

        let user_total: f64 = users.iter().map(|u| u.total).sum();
        let hour_total: f64 = hours.iter().map(|h| h.total).sum();
        let record_total: f64 = records.iter().map(|r| r.units + r.cases).sum();
        assert_eq!(user_total, record_total);
        assert_eq!(hour_total, record_total);
        assert_eq!(grand.total, record_total);

        let user_units: f64 = users.iter().map(|u| u.units).sum();
        let hour_cases: f64 = hours.iter().map(|h| h.cases).sum();
        assert_eq!(user_units, grand.units);
        assert_eq!(hour_cases, grand.cases);
    }

    // ── peak_hour ─────────────────────────────────────────────────────────────

    #[test]
    fn test_peak_hour_first_on_tie() {
        let records = vec![rec("A", 9, 5.0, 0.0), rec("A", 7, 5.0, 0.0)];
        let hours = per_hour(&records);
        assert_eq!(peak_hour(&hours).map(|h| h.hour), Some(7));
        assert!(peak_hour(&[]).is_none());
    }

    // ── pareto ────────────────────────────────────────────────────────────────

    #[test]
    fn test_pareto_cutoff_example() {
        assert_eq!(pareto_cutoff(&[50.0, 30.0, 10.0, 10.0]), 3);
    }

    #[test]
    fn test_pareto_cutoff_unsorted_input() {
        assert_eq!(pareto_cutoff(&[10.0, 10.0, 30.0, 50.0]), 3);
        assert_eq!(pareto_cutoff(&[1.0, 90.0, 9.0]), 1);
    }

    #[test]
    fn test_pareto_cutoff_edge_cases() {
        assert_eq!(pareto_cutoff(&[]), 1);
        assert_eq!(pareto_cutoff(&[0.0, 0.0, 0.0]), 3);
        assert_eq!(pareto_cutoff(&[5.0]), 1);
    }

    #[test]
    fn test_pareto_curve() {
        let curve = pareto_curve(&[10.0, 50.0, 30.0, 10.0]);
        assert_eq!(curve, vec![50.0, 80.0, 90.0, 100.0]);
        assert!(pareto_curve(&[]).is_empty());
    }

    #[test]
    fn test_user_shares() {
        let users = per_user(&sample());
        let shares = user_shares(&users);
        let grand: f64 = users.iter().map(|u| u.total).sum();
        assert_eq!(shares[0].user, "Bruno");
        assert!((shares[0].share - 34.0 / grand * 100.0).abs() < 1e-9);
        assert!((shares.last().unwrap().cumulative_share - 100.0).abs() < 1e-9);
    }

    // ── moving_average / cumulative_sum ───────────────────────────────────────

    #[test]
    fn test_moving_average_shrinks_at_start() {
        let avg = moving_average(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(avg, vec![10.0, 15.0, 20.0, 30.0]);
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let values = [3.0, 1.0, 4.0];
        assert_eq!(moving_average(&values, 1), values.to_vec());
        assert_eq!(moving_average(&values, 0), values.to_vec());
    }

    #[test]
    fn test_moving_average_window_larger_than_input() {
        assert_eq!(moving_average(&[2.0, 4.0], 10), vec![2.0, 3.0]);
        assert!(moving_average(&[], 3).is_empty());
    }

    #[test]
    fn test_cumulative_sum() {
        assert_eq!(cumulative_sum(&[1.0, 2.0, 3.0]), vec![1.0, 3.0, 6.0]);
        assert!(cumulative_sum(&[]).is_empty());
    }

    // ── Summary ───────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_from_parts() {
        let records = sample();
        let users = per_user(&records);
        let hours = per_hour(&records);
        let summary = Summary::from_parts(&records, &users, &hours);

        assert_eq!(summary.users, 3);
        assert_eq!(summary.active_hours, 3);
        assert_eq!(summary.totals.total, 53.0);
        assert_eq!(summary.peak_hour, Some(8));
        // Bruno 34 + Ana 17 = 51 of 53.
        assert_eq!(summary.pareto_cutoff, 2);
        assert!((summary.average_per_hour - 53.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = Summary::from_parts(&[], &[], &[]);
        assert_eq!(summary.users, 0);
        assert_eq!(summary.peak_hour, None);
        assert_eq!(summary.average_per_hour, 0.0);
    }
}
