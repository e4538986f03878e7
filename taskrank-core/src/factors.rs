//! Factor scorers. Each maps one sanitized field to a sub-score in [0, 10].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::task::{FactorBreakdown, Task};

/// Urgency sub-scores per days-left band.
///
/// The 15-29 day band and the no-due-date value are tunable; the defaults
/// keep the scale monotone between the fixed neighbours (4 and 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrgencyScale {
    pub no_due_date: f64,
    pub overdue: f64,
    pub today: f64,
    pub one_day: f64,
    pub two_to_three_days: f64,
    pub four_to_seven_days: f64,
    pub eight_to_fourteen_days: f64,
    pub fifteen_to_twenty_nine_days: f64,
    pub thirty_plus_days: f64,
}

impl Default for UrgencyScale {
    fn default() -> Self {
        Self {
            no_due_date: 2.0,
            overdue: 10.0,
            today: 10.0,
            one_day: 9.0,
            two_to_three_days: 8.0,
            four_to_seven_days: 6.0,
            eight_to_fourteen_days: 4.0,
            fifteen_to_twenty_nine_days: 2.0,
            thirty_plus_days: 1.0,
        }
    }
}

impl UrgencyScale {
    /// Check every value is in [0, 10] and dated bands never increase as
    /// the deadline moves further out.
    pub fn validate(&self) -> Result<()> {
        let dated = [
            ("overdue", self.overdue),
            ("today", self.today),
            ("one_day", self.one_day),
            ("two_to_three_days", self.two_to_three_days),
            ("four_to_seven_days", self.four_to_seven_days),
            ("eight_to_fourteen_days", self.eight_to_fourteen_days),
            ("fifteen_to_twenty_nine_days", self.fifteen_to_twenty_nine_days),
            ("thirty_plus_days", self.thirty_plus_days),
        ];

        for (name, v) in dated.iter().chain([("no_due_date", self.no_due_date)].iter()) {
            if !(0.0..=10.0).contains(v) {
                return Err(CoreError::InvalidUrgencyScale {
                    message: format!("{name} = {v} is outside [0, 10]"),
                });
            }
        }

        for pair in dated.windows(2) {
            let (near_name, near) = pair[0];
            let (far_name, far) = pair[1];
            if far > near {
                return Err(CoreError::InvalidUrgencyScale {
                    message: format!("{far_name} ({far}) exceeds {near_name} ({near})"),
                });
            }
        }

        Ok(())
    }

    /// Sub-score for a given number of days left (negative = overdue).
    pub fn for_days_left(&self, days_left: i64) -> f64 {
        match days_left {
            d if d < 0 => self.overdue,
            0 => self.today,
            1 => self.one_day,
            2..=3 => self.two_to_three_days,
            4..=7 => self.four_to_seven_days,
            8..=14 => self.eight_to_fourteen_days,
            15..=29 => self.fifteen_to_twenty_nine_days,
            _ => self.thirty_plus_days,
        }
    }
}

/// Whole days from `today` until `due` (negative when overdue).
pub fn days_left(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

pub fn urgency_score(due: Option<NaiveDate>, today: NaiveDate, scale: &UrgencyScale) -> f64 {
    match due {
        None => scale.no_due_date,
        Some(d) => scale.for_days_left(days_left(d, today)),
    }
}

pub fn importance_score(importance: i64) -> f64 {
    importance as f64
}

/// Fewer hours score higher.
pub fn effort_score(hours: f64) -> f64 {
    if hours <= 1.0 {
        10.0
    } else if hours <= 3.0 {
        8.0
    } else if hours <= 6.0 {
        6.0
    } else if hours <= 12.0 {
        4.0
    } else {
        2.0
    }
}

/// Counts outgoing references: the tasks this one depends on.
pub fn dependency_score(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 => 3.0,
        2 => 6.0,
        3 => 8.0,
        _ => 10.0,
    }
}

/// All four sub-scores for one task.
pub fn breakdown(task: &Task, today: NaiveDate, scale: &UrgencyScale) -> FactorBreakdown {
    FactorBreakdown {
        urgency: urgency_score(task.due_date, today, scale),
        importance: importance_score(task.importance),
        effort: effort_score(task.estimated_hours),
        dependencies: dependency_score(task.dependency_count()),
    }
}
