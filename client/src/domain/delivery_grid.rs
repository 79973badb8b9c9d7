//! Household × day delivery grid for the monthly ledger.
//!
//! The grid is derived purely from three flat collections: the households,
//! the month's delivery entries and the holiday dates. A holiday always wins
//! over whatever entry may be stored for that day.

use std::collections::{HashMap, HashSet};

use shared::{DeliveryEntry, DeliveryStatus, HolidayDate, Household, HouseholdId};

/// What the ledger shows for one household on one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    /// Liters delivered
    Quantity(f64),
    /// No delivery because of a holiday
    Holiday,
    /// Nothing delivered (no entry, or the delivery was skipped)
    Empty,
}

impl GridCell {
    pub fn label(&self) -> String {
        match self {
            GridCell::Quantity(liters) => format_liters(*liters),
            GridCell::Holiday => "H".to_string(),
            GridCell::Empty => "–".to_string(),
        }
    }

    pub fn is_holiday(&self) -> bool {
        matches!(self, GridCell::Holiday)
    }
}

/// Liters without a trailing ".0" for whole numbers, one decimal otherwise
pub fn format_liters(liters: f64) -> String {
    if liters.fract() == 0.0 {
        format!("{:.0}", liters)
    } else {
        format!("{:.1}", liters)
    }
}

/// Liters with exactly one decimal, as used for totals
pub fn format_total(liters: f64) -> String {
    format!("{:.1}", liters)
}

/// Set of holiday day strings for quick lookups
pub fn holiday_set(holidays: &[HolidayDate]) -> HashSet<String> {
    holidays.iter().map(|h| h.date.clone()).collect()
}

/// First entry recorded for `household_id` on `day`.
///
/// The gateway does not enforce one entry per household and day, so this is a
/// plain linear scan that takes whichever match comes first.
pub fn find_entry<'a>(
    entries: &'a [DeliveryEntry],
    household_id: HouseholdId,
    day: &str,
) -> Option<&'a DeliveryEntry> {
    entries
        .iter()
        .find(|e| e.household_id == household_id && e.date == day)
}

/// Cell for a single household/day given its entry (if any)
pub fn cell_for(entry: Option<&DeliveryEntry>, is_holiday: bool) -> GridCell {
    if is_holiday {
        return GridCell::Holiday;
    }
    match entry {
        None => GridCell::Empty,
        Some(entry) => match entry.status {
            DeliveryStatus::Skipped => GridCell::Empty,
            DeliveryStatus::Holiday => GridCell::Holiday,
            DeliveryStatus::Delivered => GridCell::Quantity(entry.quantity_liters),
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryGrid {
    days: Vec<String>,
    household_ids: Vec<HouseholdId>,
    cells: HashMap<HouseholdId, HashMap<String, GridCell>>,
}

impl DeliveryGrid {
    pub fn build(
        households: &[Household],
        entries: &[DeliveryEntry],
        holidays: &HashSet<String>,
        days: &[String],
    ) -> Self {
        let mut cells = HashMap::with_capacity(households.len());

        for household in households {
            let row: HashMap<String, GridCell> = days
                .iter()
                .map(|day| {
                    let cell = cell_for(find_entry(entries, household.id, day), holidays.contains(day));
                    (day.clone(), cell)
                })
                .collect();
            cells.insert(household.id, row);
        }

        Self {
            days: days.to_vec(),
            household_ids: households.iter().map(|h| h.id).collect(),
            cells,
        }
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Households in the order they were supplied
    pub fn household_ids(&self) -> &[HouseholdId] {
        &self.household_ids
    }

    pub fn is_empty(&self) -> bool {
        self.household_ids.is_empty()
    }

    pub fn row(&self, household_id: HouseholdId) -> Option<&HashMap<String, GridCell>> {
        self.cells.get(&household_id)
    }

    /// Cell for a household/day; anything outside the grid reads as empty
    pub fn cell(&self, household_id: HouseholdId, day: &str) -> GridCell {
        self.cells
            .get(&household_id)
            .and_then(|row| row.get(day))
            .copied()
            .unwrap_or(GridCell::Empty)
    }
}

/// Footer value for one day of the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub day: String,
    pub liters: f64,
    pub holiday: bool,
}

impl DailyTotal {
    /// "H" on holidays, blank when nothing was delivered
    pub fn label(&self) -> String {
        if self.holiday {
            "H".to_string()
        } else if self.liters > 0.0 {
            format_liters(self.liters)
        } else {
            String::new()
        }
    }
}

/// Sum of delivered liters per day across `households`; holidays total zero
pub fn daily_totals(
    households: &[Household],
    entries: &[DeliveryEntry],
    holidays: &HashSet<String>,
    days: &[String],
) -> Vec<DailyTotal> {
    days.iter()
        .map(|day| {
            let holiday = holidays.contains(day);
            let liters = if holiday {
                0.0
            } else {
                households
                    .iter()
                    .filter_map(|household| {
                        entries.iter().find(|e| {
                            e.household_id == household.id
                                && e.date == *day
                                && e.status == DeliveryStatus::Delivered
                        })
                    })
                    .map(|e| e.quantity_liters)
                    .sum()
            };
            DailyTotal {
                day: day.clone(),
                liters,
                holiday,
            }
        })
        .collect()
}
