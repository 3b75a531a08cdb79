use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Categorical fields
// ---------------------------------------------------------------------------

/// A category label that none of the closed enums below recognises.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognized value '{value}' for field '{field}'")]
pub struct CategoryParseError {
    pub field: &'static str,
    pub value: String,
}

impl CategoryParseError {
    fn new(field: &'static str, value: &str) -> Self {
        CategoryParseError {
            field,
            value: value.to_string(),
        }
    }
}

/// Guest's recorded sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Male,
    Female,
}

/// Whether the party included smokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Smoker {
    Yes,
    No,
}

/// Day of service. Variant order is the categorical order used by all
/// grouped output, so `Ord` must follow the declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Thur,
    Fri,
    Sat,
    Sun,
}

/// Meal service period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MealTime {
    Lunch,
    Dinner,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];
}

impl Smoker {
    pub const ALL: [Smoker; 2] = [Smoker::Yes, Smoker::No];
}

impl Day {
    pub const ALL: [Day; 4] = [Day::Thur, Day::Fri, Day::Sat, Day::Sun];
}

impl MealTime {
    pub const ALL: [MealTime; 2] = [MealTime::Lunch, MealTime::Dinner];
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        })
    }
}

impl fmt::Display for Smoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Smoker::Yes => "Yes",
            Smoker::No => "No",
        })
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Day::Thur => "Thur",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        })
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MealTime::Lunch => "Lunch",
            MealTime::Dinner => "Dinner",
        })
    }
}

// Parsing is case-insensitive and accepts the common long spellings so that
// CSV exports from different tools all load.

impl FromStr for Sex {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(CategoryParseError::new("sex", s)),
        }
    }
}

impl FromStr for Smoker {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Smoker::Yes),
            "no" | "n" => Ok(Smoker::No),
            _ => Err(CategoryParseError::new("smoker", s)),
        }
    }
}

impl FromStr for Day {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thur" | "thu" | "thursday" => Ok(Day::Thur),
            "fri" | "friday" => Ok(Day::Fri),
            "sat" | "saturday" => Ok(Day::Sat),
            "sun" | "sunday" => Ok(Day::Sun),
            _ => Err(CategoryParseError::new("day", s)),
        }
    }
}

impl FromStr for MealTime {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lunch" => Ok(MealTime::Lunch),
            "dinner" => Ok(MealTime::Dinner),
            _ => Err(CategoryParseError::new("time", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one observed transaction (one row of the source table)
// ---------------------------------------------------------------------------

/// A single restaurant transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Total bill in currency units. Expected to be positive.
    pub total_bill: f64,
    /// Tip in currency units. Non-negative.
    pub tip: f64,
    pub sex: Sex,
    pub smoker: Smoker,
    pub day: Day,
    pub time: MealTime,
    /// Party size.
    pub size: u32,
}

// ---------------------------------------------------------------------------
// TipsDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full loaded dataset. Built once by a loader and immutable afterwards;
/// every derived view is recomputed from this handle.
#[derive(Debug, Clone, Default)]
pub struct TipsDataset {
    records: Vec<Record>,
}

impl TipsDataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        TipsDataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_categorical_order_matches_service_week() {
        assert!(Day::Thur < Day::Fri);
        assert!(Day::Fri < Day::Sat);
        assert!(Day::Sat < Day::Sun);
        assert!(MealTime::Lunch < MealTime::Dinner);
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!("FEMALE".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" no ".parse::<Smoker>().unwrap(), Smoker::No);
        assert_eq!("thursday".parse::<Day>().unwrap(), Day::Thur);
        assert_eq!("Dinner".parse::<MealTime>().unwrap(), MealTime::Dinner);
    }

    #[test]
    fn unknown_category_reports_field_and_value() {
        let err = "Brunch".parse::<MealTime>().unwrap_err();
        assert_eq!(err.field, "time");
        assert_eq!(err.value, "Brunch");
    }
}
