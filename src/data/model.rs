use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Column – the categorical columns a user can filter on
// ---------------------------------------------------------------------------

/// The filterable categorical columns of the passenger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Sex,
    Pclass,
    EmbarkTown,
}

impl Column {
    /// All filterable columns in sidebar order.
    pub const ALL: [Column; 3] = [Column::Sex, Column::Pclass, Column::EmbarkTown];

    /// Header name in the source file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Sex => "sex",
            Column::Pclass => "pclass",
            Column::EmbarkTown => "embark_town",
        }
    }

    /// Label shown next to the multi-select widget.
    pub fn label(self) -> &'static str {
        match self {
            Column::Sex => "Gender:",
            Column::Pclass => "Passenger Class:",
            Column::EmbarkTown => "Embarkation Port:",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// CategoryValue – a single cell in a categorical column
// ---------------------------------------------------------------------------

/// A categorical cell. Kept `Ord` so it can live in `BTreeSet`s.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryValue {
    Missing,
    Integer(i64),
    Text(String),
}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryValue::Missing => write!(f, "<missing>"),
            CategoryValue::Integer(i) => write!(f, "{i}"),
            CategoryValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CategoryValue {
    fn from(s: &str) -> Self {
        CategoryValue::Text(s.to_string())
    }
}

impl From<i64> for CategoryValue {
    fn from(i: i64) -> Self {
        CategoryValue::Integer(i)
    }
}

// ---------------------------------------------------------------------------
// PassengerRecord – one row of the processed CSV
// ---------------------------------------------------------------------------

/// One passenger. Empty numeric cells load as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PassengerRecord {
    pub sex: String,
    pub pclass: i64,
    #[serde(default)]
    pub embark_town: Option<String>,
    #[serde(default)]
    pub age: Option<f64>,
    #[serde(default)]
    pub fare: Option<f64>,
    pub family_size: i64,
    #[serde(deserialize_with = "flag_from_number")]
    pub survived: bool,
}

impl PassengerRecord {
    /// Value of a categorical column for this row.
    pub fn category(&self, column: Column) -> CategoryValue {
        match column {
            Column::Sex => CategoryValue::Text(self.sex.clone()),
            Column::Pclass => CategoryValue::Integer(self.pclass),
            Column::EmbarkTown => match &self.embark_town {
                Some(town) => CategoryValue::Text(town.clone()),
                None => CategoryValue::Missing,
            },
        }
    }
}

/// `survived` is stored as 0/1 (sometimes 0.0/1.0).
fn flag_from_number<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    Ok(v != 0.0)
}

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "sex",
    "pclass",
    "embark_town",
    "age",
    "fare",
    "family_size",
    "survived",
];

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed distinct values per column.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All passengers, in file order.
    pub records: Vec<PassengerRecord>,
    /// For each filterable column the sorted set of distinct values.
    pub unique_values: BTreeMap<Column, BTreeSet<CategoryValue>>,
}

impl Dataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<PassengerRecord>) -> Self {
        let mut unique_values: BTreeMap<Column, BTreeSet<CategoryValue>> = Column::ALL
            .iter()
            .map(|&col| (col, BTreeSet::new()))
            .collect();

        for rec in &records {
            for col in Column::ALL {
                unique_values
                    .entry(col)
                    .or_default()
                    .insert(rec.category(col));
            }
        }

        Dataset {
            records,
            unique_values,
        }
    }

    /// Number of passengers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
