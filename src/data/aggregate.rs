use std::collections::BTreeMap;

use super::filter::{filtered_indices, FilterCriteria};
use super::model::{Day, MealTime, Record, Smoker, TipsDataset};

// ---------------------------------------------------------------------------
// Summary metrics (KPI row)
// ---------------------------------------------------------------------------

/// Arithmetic means over a filtered record set. Values are unrounded;
/// display formatting happens in the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean_total_bill: f64,
    pub mean_tip: f64,
    pub mean_size: f64,
}

/// Compute the three KPI means in one pass.
///
/// Returns `None` on empty input: the mean is undefined there, and `None`
/// is the uniform empty-input sentinel for all three metrics.
pub fn compute_summary<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Option<Summary> {
    let mut n = 0usize;
    let mut sum_bill = 0.0;
    let mut sum_tip = 0.0;
    let mut sum_size = 0.0;

    for r in rows {
        n += 1;
        sum_bill += r.total_bill;
        sum_tip += r.tip;
        sum_size += f64::from(r.size);
    }

    if n == 0 {
        return None;
    }
    let n = n as f64;
    Some(Summary {
        mean_total_bill: sum_bill / n,
        mean_tip: sum_tip / n,
        mean_size: sum_size / n,
    })
}

// ---------------------------------------------------------------------------
// Derived tip-percent column
// ---------------------------------------------------------------------------

/// Tip as a percentage of the bill, or `None` when the bill is zero and the
/// ratio is undefined. Consumers skip `None` rows uniformly.
pub fn tip_percent(record: &Record) -> Option<f64> {
    if record.total_bill == 0.0 {
        None
    } else {
        Some(record.tip / record.total_bill * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Groupings
// ---------------------------------------------------------------------------

/// One row of the day/time aggregation table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTimeRow {
    pub day: Day,
    pub time: MealTime,
    pub mean_tip: f64,
    pub mean_total_bill: f64,
    pub count: usize,
}

#[derive(Default)]
struct Acc {
    sum_tip: f64,
    sum_bill: f64,
    count: usize,
}

impl Acc {
    fn push(&mut self, r: &Record) {
        self.sum_tip += r.tip;
        self.sum_bill += r.total_bill;
        self.count += 1;
    }
}

/// Partition rows by (day, time) and emit per-group means and counts.
///
/// Groups with zero records are omitted. Output is ascending by (day, time)
/// in categorical order, via the `BTreeMap` key order, so it is reproducible
/// regardless of arrival order.
pub fn group_by_day_time<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Vec<DayTimeRow> {
    let mut groups: BTreeMap<(Day, MealTime), Acc> = BTreeMap::new();
    for r in rows {
        groups.entry((r.day, r.time)).or_default().push(r);
    }

    groups
        .into_iter()
        .map(|((day, time), acc)| DayTimeRow {
            day,
            time,
            mean_tip: acc.sum_tip / acc.count as f64,
            mean_total_bill: acc.sum_bill / acc.count as f64,
            count: acc.count,
        })
        .collect()
}

/// Mean tip per smoker status present in the input. Absent categories are
/// omitted, not zero-filled.
pub fn group_by_smoker<'a>(rows: impl IntoIterator<Item = &'a Record>) -> BTreeMap<Smoker, f64> {
    let mut groups: BTreeMap<Smoker, Acc> = BTreeMap::new();
    for r in rows {
        groups.entry(r.smoker).or_default().push(r);
    }

    groups
        .into_iter()
        .map(|(smoker, acc)| (smoker, acc.sum_tip / acc.count as f64))
        .collect()
}

// ---------------------------------------------------------------------------
// DerivedView: everything the dashboard renders for one filter selection
// ---------------------------------------------------------------------------

/// All computed outputs for one [`FilterCriteria`]: filtered indices, KPI
/// summary, tip-percent column, day/time table and smoker grouping.
///
/// Rebuilt from scratch on every filter change; nothing is cached between
/// invocations.
#[derive(Debug, Clone, Default)]
pub struct DerivedView {
    /// Indices into the dataset passing the current filters, in dataset order.
    pub indices: Vec<usize>,
    /// `None` when the filtered set is empty.
    pub summary: Option<Summary>,
    /// Tip percent per filtered row, parallel to `indices`.
    pub tip_percent: Vec<Option<f64>>,
    pub by_day_time: Vec<DayTimeRow>,
    pub mean_tip_by_smoker: BTreeMap<Smoker, f64>,
}

impl DerivedView {
    pub fn compute(dataset: &TipsDataset, criteria: &FilterCriteria) -> Self {
        let indices = filtered_indices(dataset, criteria);
        let rows: Vec<&Record> = indices.iter().map(|&i| &dataset.records()[i]).collect();

        DerivedView {
            summary: compute_summary(rows.iter().copied()),
            tip_percent: rows.iter().map(|r| tip_percent(r)).collect(),
            by_day_time: group_by_day_time(rows.iter().copied()),
            mean_tip_by_smoker: group_by_smoker(rows.iter().copied()),
            indices,
        }
    }

    /// Number of records passing the current filters.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sex;

    fn record(bill: f64, tip: f64, smoker: Smoker, day: Day, time: MealTime) -> Record {
        Record {
            total_bill: bill,
            tip,
            sex: Sex::Male,
            smoker,
            day,
            time,
            size: 2,
        }
    }

    #[test]
    fn summary_of_empty_input_is_none() {
        let rows: [&Record; 0] = [];
        assert_eq!(compute_summary(rows), None);
    }

    #[test]
    fn summary_means_are_exact_on_known_rows() {
        let rows = [
            record(10.0, 2.0, Smoker::No, Day::Sun, MealTime::Dinner),
            record(20.0, 4.0, Smoker::Yes, Day::Sun, MealTime::Dinner),
        ];
        let s = compute_summary(rows.iter()).unwrap();
        assert_eq!(s.mean_total_bill, 15.0);
        assert_eq!(s.mean_tip, 3.0);
        assert_eq!(s.mean_size, 2.0);
    }

    #[test]
    fn tip_percent_is_none_for_zero_bill() {
        let mut r = record(0.0, 1.0, Smoker::No, Day::Fri, MealTime::Lunch);
        assert_eq!(tip_percent(&r), None);
        r.total_bill = 10.0;
        r.tip = 2.0;
        assert_eq!(tip_percent(&r), Some(20.0));
    }

    #[test]
    fn day_time_groups_are_ordered_and_counts_sum_to_input() {
        let rows = [
            record(10.0, 1.0, Smoker::No, Day::Sun, MealTime::Dinner),
            record(20.0, 2.0, Smoker::No, Day::Thur, MealTime::Lunch),
            record(30.0, 3.0, Smoker::No, Day::Sun, MealTime::Dinner),
            record(40.0, 4.0, Smoker::No, Day::Sat, MealTime::Dinner),
        ];
        let table = group_by_day_time(rows.iter());

        // Categorical order, not arrival order.
        let keys: Vec<(Day, MealTime)> = table.iter().map(|g| (g.day, g.time)).collect();
        assert_eq!(
            keys,
            vec![
                (Day::Thur, MealTime::Lunch),
                (Day::Sat, MealTime::Dinner),
                (Day::Sun, MealTime::Dinner),
            ]
        );

        assert!(table.iter().all(|g| g.count > 0));
        assert_eq!(table.iter().map(|g| g.count).sum::<usize>(), rows.len());

        let sun = table.last().unwrap();
        assert_eq!(sun.count, 2);
        assert_eq!(sun.mean_tip, 2.0);
        assert_eq!(sun.mean_total_bill, 20.0);
    }

    #[test]
    fn smoker_grouping_omits_absent_categories() {
        let rows = [
            record(10.0, 1.0, Smoker::No, Day::Sun, MealTime::Dinner),
            record(20.0, 3.0, Smoker::No, Day::Sun, MealTime::Dinner),
        ];
        let by_smoker = group_by_smoker(rows.iter());
        assert_eq!(by_smoker.len(), 1);
        assert_eq!(by_smoker[&Smoker::No], 2.0);
        assert!(!by_smoker.contains_key(&Smoker::Yes));
    }

    #[test]
    fn derived_view_end_to_end_scenario() {
        let dataset = TipsDataset::from_records(vec![
            Record {
                total_bill: 10.0,
                tip: 2.0,
                sex: Sex::Male,
                smoker: Smoker::No,
                day: Day::Sun,
                time: MealTime::Dinner,
                size: 2,
            },
            Record {
                total_bill: 20.0,
                tip: 4.0,
                sex: Sex::Female,
                smoker: Smoker::Yes,
                day: Day::Sun,
                time: MealTime::Dinner,
                size: 3,
            },
        ]);
        let criteria = FilterCriteria {
            smoker: Some(Smoker::No),
            ..Default::default()
        };

        let view = DerivedView::compute(&dataset, &criteria);
        assert_eq!(view.indices, vec![0]);

        let s = view.summary.unwrap();
        assert_eq!(s.mean_total_bill, 10.0);
        assert_eq!(s.mean_tip, 2.0);
        assert_eq!(s.mean_size, 2.0);

        assert_eq!(view.tip_percent, vec![Some(20.0)]);
        assert_eq!(view.by_day_time.len(), 1);
        assert_eq!(view.by_day_time[0].count, 1);
        assert_eq!(view.mean_tip_by_smoker[&Smoker::No], 2.0);
    }

    #[test]
    fn derived_view_on_empty_intersection_is_well_defined() {
        let dataset = TipsDataset::from_records(vec![record(
            10.0,
            2.0,
            Smoker::No,
            Day::Sun,
            MealTime::Dinner,
        )]);
        let criteria = FilterCriteria {
            day: Some(Day::Fri),
            ..Default::default()
        };

        let view = DerivedView::compute(&dataset, &criteria);
        assert!(view.is_empty());
        assert_eq!(view.summary, None);
        assert!(view.tip_percent.is_empty());
        assert!(view.by_day_time.is_empty());
        assert!(view.mean_tip_by_smoker.is_empty());
    }
}
