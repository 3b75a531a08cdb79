use super::model::{Day, MealTime, Record, Sex, Smoker, TipsDataset};

// ---------------------------------------------------------------------------
// Filter criteria: one optional equality constraint per categorical field
// ---------------------------------------------------------------------------

/// The sidebar selection for one rendering pass. `None` means "All" for that
/// field (no constraint); only the four categorical fields can be filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub sex: Option<Sex>,
    pub smoker: Option<Smoker>,
    pub day: Option<Day>,
    pub time: Option<MealTime>,
}

impl FilterCriteria {
    /// Number of active constraints, shown in the panel header.
    pub fn active_count(&self) -> usize {
        usize::from(self.sex.is_some())
            + usize::from(self.smoker.is_some())
            + usize::from(self.day.is_some())
            + usize::from(self.time.is_some())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.active_count() == 0
    }

    /// Whether a record passes every active constraint. Vacuously true when
    /// no constraint is active.
    pub fn matches(&self, record: &Record) -> bool {
        self.sex.map_or(true, |v| record.sex == v)
            && self.smoker.map_or(true, |v| record.smoker == v)
            && self.day.map_or(true, |v| record.day == v)
            && self.time.map_or(true, |v| record.time == v)
    }
}

/// Return indices of records that pass all active filters.
///
/// Stable: output preserves dataset order. An empty intersection yields an
/// empty vector, never an error.
pub fn filtered_indices(dataset: &TipsDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sex: Sex, smoker: Smoker, day: Day, time: MealTime) -> Record {
        Record {
            total_bill: 10.0,
            tip: 2.0,
            sex,
            smoker,
            day,
            time,
            size: 2,
        }
    }

    fn sample_dataset() -> TipsDataset {
        TipsDataset::from_records(vec![
            record(Sex::Male, Smoker::No, Day::Sun, MealTime::Dinner),
            record(Sex::Female, Smoker::Yes, Day::Sun, MealTime::Dinner),
            record(Sex::Female, Smoker::No, Day::Fri, MealTime::Lunch),
            record(Sex::Male, Smoker::Yes, Day::Sat, MealTime::Dinner),
        ])
    }

    #[test]
    fn no_constraints_returns_everything_in_order() {
        let ds = sample_dataset();
        let idx = filtered_indices(&ds, &FilterCriteria::default());
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn single_constraint_is_exact_and_complete() {
        let ds = sample_dataset();
        let criteria = FilterCriteria {
            smoker: Some(Smoker::No),
            ..Default::default()
        };
        let idx = filtered_indices(&ds, &criteria);
        assert_eq!(idx, vec![0, 2]);
        for &i in &idx {
            assert_eq!(ds.records()[i].smoker, Smoker::No);
        }
        // No false negatives: every matching record is present.
        let expected: Vec<usize> = ds
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.smoker == Smoker::No)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(idx, expected);
    }

    #[test]
    fn constraints_combine_as_conjunction() {
        let ds = sample_dataset();
        let criteria = FilterCriteria {
            sex: Some(Sex::Female),
            day: Some(Day::Sun),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&ds, &criteria), vec![1]);
    }

    #[test]
    fn empty_intersection_yields_empty_vec() {
        let ds = sample_dataset();
        let criteria = FilterCriteria {
            day: Some(Day::Thur),
            ..Default::default()
        };
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }
}
