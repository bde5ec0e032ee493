//! Mood and period tracker use-case service.
//!
//! # Responsibility
//! - Toggle period days and mood colors for one user.
//! - Edit the mood palette and answer label lookups.
//! - Expose the period history view and cycle estimates.
//!
//! # Invariants
//! - Days are validated against the month before anything is written.
//! - Setting a day's mood to the color it already has clears that day.
//! - Months left without entries are removed from the stored logs.

use crate::model::tracker::{check_color, MonthKey, MoodLog, MoodPalette, PeriodLog};
use crate::service::ServiceResult;
use crate::stats::cycle::{average_cycle_length, next_period_start, period_history, PeriodMonth};
use crate::store::{KvStore, StorageKey, UserScope};
use chrono::NaiveDate;
use log::info;
use std::collections::BTreeMap;

/// Tracker service facade over a store implementation.
pub struct TrackerService<S: KvStore> {
    store: S,
    scope: UserScope,
}

impl<S: KvStore> TrackerService<S> {
    pub fn new(store: S, scope: UserScope) -> Self {
        Self { store, scope }
    }

    pub fn periods(&self) -> ServiceResult<PeriodLog> {
        Ok(self.store.load_or_default(&self.scope, StorageKey::Periods)?)
    }

    pub fn moods(&self) -> ServiceResult<MoodLog> {
        Ok(self.store.load_or_default(&self.scope, StorageKey::Moods)?)
    }

    pub fn palette(&self) -> ServiceResult<MoodPalette> {
        Ok(self
            .store
            .load_or_default(&self.scope, StorageKey::MoodPalette)?)
    }

    /// Marks or unmarks one period day; returns whether it is now marked.
    pub fn toggle_period(&self, key: MonthKey, day: u32) -> ServiceResult<bool> {
        key.check_day(day)?;
        let mut periods = self.periods()?;
        let days = periods.entry(key).or_default();
        let marked = if days.remove(&day) {
            false
        } else {
            days.insert(day);
            true
        };
        if days.is_empty() {
            periods.remove(&key);
        }
        self.store.save(&self.scope, StorageKey::Periods, &periods)?;
        info!(
            "event=period_toggle module=service status=ok month={} marked={}",
            key, marked
        );
        Ok(marked)
    }

    /// Sets one day's mood color, or clears it when `color` is already set.
    ///
    /// Returns the color now recorded for the day.
    pub fn toggle_mood(
        &self,
        key: MonthKey,
        day: u32,
        color: &str,
    ) -> ServiceResult<Option<String>> {
        key.check_day(day)?;
        let color = check_color(color)?;
        let mut moods = self.moods()?;
        let days = moods.entry(key).or_insert_with(BTreeMap::new);
        let recorded = match days.get(&day) {
            Some(existing) if existing.eq_ignore_ascii_case(color) => {
                days.remove(&day);
                None
            }
            _ => {
                days.insert(day, color.to_string());
                Some(color.to_string())
            }
        };
        if days.is_empty() {
            moods.remove(&key);
        }
        self.store.save(&self.scope, StorageKey::Moods, &moods)?;
        Ok(recorded)
    }

    /// Replaces one palette slot's color.
    pub fn set_palette_color(&self, index: usize, color: &str) -> ServiceResult<MoodPalette> {
        let mut palette = self.palette()?;
        palette.set_color(index, color)?;
        self.store
            .save(&self.scope, StorageKey::MoodPalette, &palette)?;
        Ok(palette)
    }

    /// Replaces one palette slot's label.
    pub fn set_palette_label(&self, index: usize, label: &str) -> ServiceResult<MoodPalette> {
        let mut palette = self.palette()?;
        palette.set_label(index, label)?;
        self.store
            .save(&self.scope, StorageKey::MoodPalette, &palette)?;
        Ok(palette)
    }

    /// Palette label for the mood recorded on one day, if any.
    pub fn mood_label(&self, key: MonthKey, day: u32) -> ServiceResult<Option<String>> {
        let moods = self.moods()?;
        let Some(color) = moods.get(&key).and_then(|days| days.get(&day)) else {
            return Ok(None);
        };
        Ok(self.palette()?.label_for(color).map(str::to_string))
    }

    pub fn period_history(&self) -> ServiceResult<Vec<PeriodMonth>> {
        Ok(period_history(&self.periods()?))
    }

    pub fn average_cycle(&self) -> ServiceResult<Option<u32>> {
        Ok(average_cycle_length(&self.periods()?))
    }

    pub fn next_period_start(&self) -> ServiceResult<Option<NaiveDate>> {
        Ok(next_period_start(&self.periods()?))
    }
}

#[cfg(test)]
mod tests {
    use super::TrackerService;
    use crate::model::tracker::{MonthKey, TrackerValidationError};
    use crate::service::ServiceError;
    use crate::store::{MemoryStore, UserScope};

    fn service() -> TrackerService<MemoryStore> {
        TrackerService::new(MemoryStore::new(), UserScope::new(Some("mama@example.com")))
    }

    #[test]
    fn toggling_a_period_day_twice_unmarks_it() {
        let service = service();
        let jan = MonthKey::new(2026, 0).unwrap();
        assert!(service.toggle_period(jan, 5).unwrap());
        assert!(!service.toggle_period(jan, 5).unwrap());
        assert!(service.periods().unwrap().is_empty());
    }

    #[test]
    fn rejects_days_outside_the_month() {
        let service = service();
        let feb = MonthKey::new(2026, 1).unwrap();
        let err = service.toggle_period(feb, 29).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Tracker(TrackerValidationError::DayOutOfRange { day: 29, .. })
        ));
    }

    #[test]
    fn same_mood_color_clears_the_day() {
        let service = service();
        let jan = MonthKey::new(2026, 0).unwrap();
        assert_eq!(
            service.toggle_mood(jan, 3, "#D6A5A5").unwrap().as_deref(),
            Some("#D6A5A5")
        );
        assert_eq!(
            service.mood_label(jan, 3).unwrap().as_deref(),
            Some("Happy")
        );
        assert_eq!(service.toggle_mood(jan, 3, "#d6a5a5").unwrap(), None);
        assert_eq!(service.mood_label(jan, 3).unwrap(), None);
    }

    #[test]
    fn recoloring_a_slot_orphans_old_records() {
        let service = service();
        let jan = MonthKey::new(2026, 0).unwrap();
        service.toggle_mood(jan, 9, "#9CAF88").unwrap();
        service.set_palette_color(1, "#00ff00").unwrap();
        assert_eq!(service.mood_label(jan, 9).unwrap(), None);
    }

    #[test]
    fn mood_colors_must_be_hex() {
        let service = service();
        let jan = MonthKey::new(2026, 0).unwrap();
        for color in ["", "   ", "blue", "#12345"] {
            let err = service.toggle_mood(jan, 4, color).unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Tracker(TrackerValidationError::InvalidColor(_))
            ));
        }
        assert!(service.moods().unwrap().is_empty());
        assert_eq!(
            service.toggle_mood(jan, 4, " #abc ").unwrap().as_deref(),
            Some("#abc")
        );
    }
}
