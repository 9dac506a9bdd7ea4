use time::{util::days_in_year_month, Date, Duration, Month, Weekday};

use crate::model::EntryDate;

/// Calendar overlay for choosing a day no later than `max`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePicker {
    cursor: Date,
    max: Date,
}

impl DatePicker {
    pub fn new(selected: EntryDate, max: EntryDate) -> Self {
        let max = max.as_date();
        Self {
            cursor: selected.as_date().min(max),
            max,
        }
    }

    pub fn cursor(&self) -> EntryDate {
        EntryDate::new(self.cursor)
    }

    pub fn max(&self) -> EntryDate {
        EntryDate::new(self.max)
    }

    pub fn move_days(&mut self, days: i64) {
        if let Some(next) = self.cursor.checked_add(Duration::days(days)) {
            self.cursor = next.min(self.max);
        }
    }

    /// Moves by whole months, clamping the day to the target month length.
    pub fn move_months(&mut self, months: i32) {
        let index = self.cursor.year() * 12 + i32::from(u8::from(self.cursor.month())) - 1 + months;
        let year = index.div_euclid(12);
        let Ok(month) = Month::try_from((index.rem_euclid(12) + 1) as u8) else {
            return;
        };
        let day = self.cursor.day().min(days_in_year_month(year, month));
        if let Ok(next) = Date::from_calendar_date(year, month, day) {
            self.cursor = next.min(self.max);
        }
    }

    pub fn jump_to_max(&mut self) {
        self.cursor = self.max;
    }

    pub fn confirm(&self) -> EntryDate {
        EntryDate::new(self.cursor)
    }

    pub fn is_selectable(&self, date: EntryDate) -> bool {
        date.as_date() <= self.max
    }

    /// Weeks (Monday first) of the month under the cursor.
    pub fn month_grid(&self) -> Vec<[Option<EntryDate>; 7]> {
        let year = self.cursor.year();
        let month = self.cursor.month();
        let mut weeks = Vec::with_capacity(6);
        let mut week = [None; 7];
        for day in 1..=days_in_year_month(year, month) {
            let Ok(date) = Date::from_calendar_date(year, month, day) else {
                continue;
            };
            let column = date.weekday().number_days_from_monday() as usize;
            week[column] = Some(EntryDate::new(date));
            if date.weekday() == Weekday::Sunday {
                weeks.push(week);
                week = [None; 7];
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> EntryDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn never_moves_past_max() {
        let mut picker = DatePicker::new(date("2024-06-20"), date("2024-06-25"));
        picker.move_days(3);
        assert_eq!(picker.cursor(), date("2024-06-23"));
        picker.move_days(7);
        assert_eq!(picker.cursor(), date("2024-06-25"));
        picker.move_months(1);
        assert_eq!(picker.cursor(), date("2024-06-25"));
    }

    #[test]
    fn future_selection_is_clamped_on_open() {
        let picker = DatePicker::new(date("2024-07-01"), date("2024-06-25"));
        assert_eq!(picker.cursor(), date("2024-06-25"));
        assert!(!picker.is_selectable(date("2024-06-26")));
    }

    #[test]
    fn month_moves_clamp_day_of_month() {
        let mut picker = DatePicker::new(date("2024-03-31"), date("2024-12-31"));
        picker.move_months(-1);
        assert_eq!(picker.cursor(), date("2024-02-29"));
        picker.move_months(-2);
        assert_eq!(picker.cursor(), date("2023-12-29"));
        picker.move_months(12);
        assert_eq!(picker.cursor(), date("2024-12-29"));
    }

    #[test]
    fn grid_starts_on_monday() {
        let picker = DatePicker::new(date("2024-06-25"), date("2024-06-25"));
        let grid = picker.month_grid();
        // June 2024 starts on a Saturday and ends on a Sunday
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0][5], Some(date("2024-06-01")));
        assert!(grid[0][..5].iter().all(Option::is_none));
        assert_eq!(grid[4][6], Some(date("2024-06-30")));
    }

    #[test]
    fn confirm_returns_cursor() {
        let mut picker = DatePicker::new(date("2024-06-25"), date("2024-06-25"));
        picker.move_days(-30);
        assert_eq!(picker.confirm(), date("2024-05-26"));
        picker.jump_to_max();
        assert_eq!(picker.confirm(), date("2024-06-25"));
    }
}
