use chrono::{Datelike, NaiveDate};

use crate::error::{LifefloodError, LifefloodResult};

/// The sole durable record: a birth month and year. The day-of-month is fixed
/// to the 1st everywhere downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BirthDate {
    pub month: u32, // 1-12
    pub year: i32,
}

impl BirthDate {
    pub fn new(month: u32, year: i32) -> LifefloodResult<Self> {
        let b = Self { month, year };
        b.validate()?;
        Ok(b)
    }

    pub fn validate(&self) -> LifefloodResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(LifefloodError::validation(format!(
                "birth month must be 1-12, got {}",
                self.month
            )));
        }
        if !(1..=9999).contains(&self.year) {
            return Err(LifefloodError::validation(format!(
                "birth year must be 1-9999, got {}",
                self.year
            )));
        }
        Ok(())
    }

    /// First day of the birth month. Out-of-range input is clamped so the
    /// arithmetic stays total; callers validate at the edges.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month.clamp(1, 12), 1).unwrap_or_default()
    }
}

/// Raw candidate pair from the input collaborator. Either field may be absent
/// or unparseable; `parse` is the submit guard.
#[derive(Clone, Debug, Default)]
pub struct BirthInput {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl BirthInput {
    pub fn parse(&self) -> Option<BirthDate> {
        let month = self.month.as_deref()?.trim().parse::<u32>().ok()?;
        let year = self.year.as_deref()?.trim().parse::<i32>().ok()?;
        BirthDate::new(month, year).ok()
    }
}

#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct LifeConfig {
    /// Fixed maximum lifespan in years; the denominator of the age ratio.
    pub max_age: u32,
    /// Saturation floor reached at `max_age`, percent.
    pub min_saturation: f64,
    /// Flood/glow transition duration in milliseconds.
    pub transition_ms: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            max_age: 75,
            min_saturation: 33.0,
            transition_ms: 2000.0,
        }
    }
}

impl LifeConfig {
    pub fn validate(&self) -> LifefloodResult<()> {
        if self.max_age == 0 {
            return Err(LifefloodError::validation("max_age must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.min_saturation) {
            return Err(LifefloodError::validation(
                "min_saturation must be within 0-100",
            ));
        }
        if !self.transition_ms.is_finite() || self.transition_ms < 0.0 {
            return Err(LifefloodError::validation(
                "transition_ms must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Completed calendar years between `today` and the first day of the birth
/// month, decremented when this year's anniversary has not yet passed.
pub fn age_years(birth: &BirthDate, today: NaiveDate) -> i32 {
    let birth_day = birth.first_day();
    let mut age = today.year() - birth_day.year();
    let anniversary =
        NaiveDate::from_ymd_opt(today.year(), birth_day.month(), 1).unwrap_or(today);
    if today < anniversary {
        age -= 1;
    }
    age
}

/// Age divided by `max_age`, clamped to [0,1]. Ages before birth clamp to 0.
pub fn age_ratio(cfg: &LifeConfig, birth: &BirthDate, today: NaiveDate) -> f64 {
    (f64::from(age_years(birth, today)) / f64::from(cfg.max_age)).clamp(0.0, 1.0)
}

/// Linear fade from 100% at ratio 0 down to `min_saturation` at ratio 1.
pub fn saturation_pct(cfg: &LifeConfig, birth: &BirthDate, today: NaiveDate) -> f64 {
    let ratio = age_ratio(cfg, birth, today);
    (100.0 - ratio * (100.0 - cfg.min_saturation)).max(cfg.min_saturation)
}

/// Derived scalars consumed by the transition controller and streak generator.
/// Recomputed on demand, never cached across render passes.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct AgeParams {
    pub age_years: i32,
    pub ratio: f64,
    pub saturation_pct: f64,
}

impl AgeParams {
    pub fn derive(cfg: &LifeConfig, birth: &BirthDate, today: NaiveDate) -> Self {
        Self {
            age_years: age_years(birth, today),
            ratio: age_ratio(cfg, birth, today),
            saturation_pct: saturation_pct(cfg, birth, today),
        }
    }
}

/// Days/weeks lived and remaining against the fixed lifespan.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct LifeStats {
    pub age_years: i32,
    pub days_lived: i64,
    pub weeks_lived: i64,
    pub days_remaining: i64,
    pub weeks_remaining: i64,
}

impl LifeStats {
    pub fn derive(cfg: &LifeConfig, birth: &BirthDate, today: NaiveDate) -> Self {
        let days_lived = (today - birth.first_day()).num_days().max(0);
        let weeks_lived = days_lived / 7;
        let total_days = i64::from(cfg.max_age) * 365;
        let total_weeks = i64::from(cfg.max_age) * 52;
        Self {
            age_years: age_years(birth, today),
            days_lived,
            weeks_lived,
            days_remaining: (total_days - days_lived).max(0),
            weeks_remaining: (total_weeks - weeks_lived).max(0),
        }
    }
}
