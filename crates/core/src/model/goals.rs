use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GoalsError {
    #[error("daily goal must be a non-negative number of hours, got {0}")]
    InvalidDaily(f64),

    #[error("weekly goal must be a non-negative number of hours, got {0}")]
    InvalidWeekly(f64),
}

/// Personal daily and weekly hour goals, independent of the program schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    daily_hours: f64,
    weekly_hours: f64,
}

impl Goals {
    /// # Errors
    ///
    /// Returns `GoalsError` if either value is negative or not finite.
    pub fn new(daily_hours: f64, weekly_hours: f64) -> Result<Self, GoalsError> {
        if !daily_hours.is_finite() || daily_hours < 0.0 {
            return Err(GoalsError::InvalidDaily(daily_hours));
        }
        if !weekly_hours.is_finite() || weekly_hours < 0.0 {
            return Err(GoalsError::InvalidWeekly(weekly_hours));
        }
        Ok(Self {
            daily_hours,
            weekly_hours,
        })
    }

    #[must_use]
    pub fn daily_hours(&self) -> f64 {
        self.daily_hours
    }

    #[must_use]
    pub fn weekly_hours(&self) -> f64 {
        self.weekly_hours
    }
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            daily_hours: 2.0,
            weekly_hours: 12.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_nan() {
        assert_eq!(Goals::new(-1.0, 5.0).unwrap_err(), GoalsError::InvalidDaily(-1.0));
        assert!(matches!(
            Goals::new(1.0, f64::NAN).unwrap_err(),
            GoalsError::InvalidWeekly(_)
        ));
    }

    #[test]
    fn accepts_zero() {
        let goals = Goals::new(0.0, 0.0).unwrap();
        assert!(goals.daily_hours().abs() < f64::EPSILON);
    }
}
