use chrono::Weekday;
use contracts::dashboards::d402_daily_pacing::TimeSlot;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

/// Shares that sum further than this from 1.0 are logged at load time
const SHARE_SUM_TOLERANCE: f64 = 0.05;

/// `[distribution]` section: weekday -> ordered list of `["HH:MM–HH:MM", share]`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DistributionConfig {
    #[serde(default)]
    pub monday: Option<Vec<(TimeSlot, f64)>>,
    #[serde(default)]
    pub tuesday: Option<Vec<(TimeSlot, f64)>>,
    #[serde(default)]
    pub wednesday: Option<Vec<(TimeSlot, f64)>>,
    #[serde(default)]
    pub thursday: Option<Vec<(TimeSlot, f64)>>,
    #[serde(default)]
    pub friday: Option<Vec<(TimeSlot, f64)>>,
    #[serde(default)]
    pub saturday: Option<Vec<(TimeSlot, f64)>>,
    #[serde(default)]
    pub sunday: Option<Vec<(TimeSlot, f64)>>,
}

impl DistributionConfig {
    pub fn slots(&self, weekday: Weekday) -> Option<&[(TimeSlot, f64)]> {
        let day = match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        };
        day.as_deref()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    #[error("{weekday}: share {share} of slot {slot} must be within (0, 1)")]
    InvalidShare {
        weekday: Weekday,
        slot: TimeSlot,
        share: f64,
    },

    #[error("{weekday}: slots {first} and {second} overlap")]
    Overlap {
        weekday: Weekday,
        first: TimeSlot,
        second: TimeSlot,
    },
}

/// Portion of a weekday's revenue historically earned within one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotShare {
    pub slot: TimeSlot,
    pub share: f64,
}

/// Weekday-indexed intraday revenue curve.
///
/// Slot order is kept exactly as configured. Shares are not normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntradayDistribution {
    days: [Option<Vec<SlotShare>>; 7],
}

impl IntradayDistribution {
    pub fn from_config(config: &DistributionConfig) -> Result<Self, DistributionError> {
        let mut distribution = Self::default();
        for weekday in WEEK {
            if let Some(slots) = config.slots(weekday) {
                let slots = slots
                    .iter()
                    .map(|&(slot, share)| SlotShare { slot, share })
                    .collect();
                distribution.insert(weekday, slots)?;
            } else {
                tracing::warn!("Intraday distribution has no entry for {}", weekday);
            }
        }
        Ok(distribution)
    }

    /// Set the slots of one weekday, replacing what was there.
    pub fn insert(
        &mut self,
        weekday: Weekday,
        slots: Vec<SlotShare>,
    ) -> Result<(), DistributionError> {
        for (i, current) in slots.iter().enumerate() {
            if !(current.share > 0.0 && current.share < 1.0) {
                return Err(DistributionError::InvalidShare {
                    weekday,
                    slot: current.slot,
                    share: current.share,
                });
            }
            if let Some(other) = slots[..i].iter().find(|s| s.slot.overlaps(&current.slot)) {
                return Err(DistributionError::Overlap {
                    weekday,
                    first: other.slot,
                    second: current.slot,
                });
            }
        }

        let total: f64 = slots.iter().map(|s| s.share).sum();
        if (total - 1.0).abs() > SHARE_SUM_TOLERANCE {
            tracing::warn!(
                "Intraday shares for {} sum to {:.3}, expected about 1.0",
                weekday,
                total
            );
        }

        self.days[weekday.num_days_from_monday() as usize] = Some(slots);
        Ok(())
    }

    pub fn get(&self, weekday: Weekday) -> Option<&[SlotShare]> {
        self.days[weekday.num_days_from_monday() as usize].as_deref()
    }
}

static DISTRIBUTION: OnceCell<IntradayDistribution> = OnceCell::new();

/// Validate the configured table once at startup
pub fn initialize_distribution(config: &DistributionConfig) -> Result<(), DistributionError> {
    let distribution = IntradayDistribution::from_config(config)?;
    let _ = DISTRIBUTION.set(distribution);
    Ok(())
}

pub fn get_distribution() -> &'static IntradayDistribution {
    DISTRIBUTION
        .get()
        .expect("Intraday distribution has not been initialized")
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];
