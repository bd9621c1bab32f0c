use chrono::{DateTime, Utc};

use crate::task::{Shift, Task};

/// Parameters of a task listing, built per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// `None` lists every task that still has a shift, whatever its dates.
    pub status: Option<StatusFilter>,
    pub limit: u16,
    pub page: u16,
}

impl SearchParams {
    pub fn new(status: &str, limit: u16, page: u16) -> Self {
        Self {
            status: StatusFilter::from_keyword(status),
            limit,
            page,
        }
    }
}

/// Date-based status a task's shifts must all satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Upcoming,
    Done,
}

impl StatusFilter {
    /// Unknown keywords, including "ongoing" and the empty string, mean no filter.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Some(StatusFilter::Upcoming),
            "done" => Some(StatusFilter::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Upcoming => "upcoming",
            StatusFilter::Done => "done",
        }
    }

    pub fn predicate(&self) -> DatePredicate {
        match self {
            StatusFilter::Upcoming => DatePredicate {
                field: ShiftDateField::StartDate,
                comparator: Comparator::GreaterOrEqual,
            },
            StatusFilter::Done => DatePredicate {
                field: ShiftDateField::EndDate,
                comparator: Comparator::LessOrEqual,
            },
        }
    }
}

/// Date fields of a projected shift. `path` is the field name the shift
/// projection writes, so filters and projection cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDateField {
    StartDate,
    EndDate,
}

impl ShiftDateField {
    pub const ALL: [ShiftDateField; 2] = [ShiftDateField::StartDate, ShiftDateField::EndDate];

    pub const fn path(self) -> &'static str {
        match self {
            ShiftDateField::StartDate => "startDate",
            ShiftDateField::EndDate => "endDate",
        }
    }

    /// The date this field names on an already decoded shift.
    pub fn value(self, shift: &Shift) -> Option<DateTime<Utc>> {
        match self {
            ShiftDateField::StartDate => shift.start_date,
            ShiftDateField::EndDate => shift.end_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparator {
    /// A missing date orders before every date, as null does in the store.
    pub fn compare(self, lhs: Option<DateTime<Utc>>, rhs: DateTime<Utc>) -> bool {
        match (self, lhs) {
            (Comparator::GreaterOrEqual, Some(lhs)) => lhs >= rhs,
            (Comparator::GreaterOrEqual, None) => false,
            (Comparator::LessOrEqual, Some(lhs)) => lhs <= rhs,
            (Comparator::LessOrEqual, None) => true,
        }
    }
}

/// Date condition applied to each shift of a task.
///
/// The database evaluates it through the `$match` stage built from `field`
/// and `comparator`. `holds` and `matches` evaluate the same condition in
/// memory on decoded tasks, for stores that do not run the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePredicate {
    pub field: ShiftDateField,
    pub comparator: Comparator,
}

impl DatePredicate {
    pub fn holds(&self, shift: &Shift, now: DateTime<Utc>) -> bool {
        self.comparator.compare(self.field.value(shift), now)
    }

    /// True when every shift satisfies the predicate. Vacuously true for a
    /// task without shifts; the listing never returns such tasks.
    pub fn matches(&self, task: &Task, now: DateTime<Utc>) -> bool {
        task.shifts.iter().all(|shift| self.holds(shift, now))
    }
}
