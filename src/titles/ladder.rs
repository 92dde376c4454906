use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::TitleError;
use crate::numbers::{power_of_thousand, Magnitude};

const TIER_PREFIXES: &[&str] = &[
    "Farmer",
    "Kilofarmer",
    "Megafarmer",
    "Gigafarmer",
    "Terafarmer",
    "Petafarmer",
    "Exafarmer",
    "Zettafarmer",
    "Yottafarmer",
    "Xennafarmer",
    "Weccafarmer",
    "Vendafarmer",
    "Uadafarmer",
];

const TIER_GRADES: &[&str] = &["I", "II", "III"];

const FINAL_TIER: &str = "Infinifarmer";

/// Upper bound of a named tier: the tier covers `[previous threshold, threshold)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleThreshold {
    pub threshold: Magnitude,
    pub name: String,
}

impl TitleThreshold {
    pub fn new(threshold: Magnitude, name: impl Into<String>) -> Self {
        Self {
            threshold,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextTier {
    Tier(String),
    /// Already past the last threshold
    Beyond,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleProgress {
    pub current_tier: String,
    pub next_tier: NextTier,
    /// Progress through the current band, 0..=100 with two decimals
    pub progress_percent: f64,
}

/// Ordered list of title thresholds, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLadder {
    tiers: Vec<TitleThreshold>,
}

impl TitleLadder {
    pub fn new(tiers: Vec<TitleThreshold>) -> Result<Self, TitleError> {
        if tiers.is_empty() {
            return Err(TitleError::Empty);
        }

        for pair in tiers.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(TitleError::NotIncreasing(pair[1].name.clone()));
            }
        }

        Ok(Self { tiers })
    }

    /// Earnings-bonus titles, one band per power of 1000 from 10^3 to 10^120.
    pub fn standard() -> &'static TitleLadder {
        static LADDER: OnceLock<TitleLadder> = OnceLock::new();
        LADDER.get_or_init(|| {
            let names = TIER_PREFIXES
                .iter()
                .flat_map(|prefix| {
                    TIER_GRADES
                        .iter()
                        .map(move |grade| format!("{} {}", prefix, grade))
                })
                .chain(std::iter::once(FINAL_TIER.to_string()));

            let tiers = names
                .zip(1u32..)
                .map(|(name, rank)| TitleThreshold::new(Magnitude::new(power_of_thousand(rank)), name))
                .collect();

            Self::new(tiers)
                .unwrap_or_else(|err| unreachable!("standard title ladder is valid: {err}"))
        })
    }

    pub fn tiers(&self) -> &[TitleThreshold] {
        &self.tiers
    }

    /// Smallest threshold strictly greater than `magnitude`.
    pub fn next_threshold(&self, magnitude: &Magnitude) -> Option<&TitleThreshold> {
        self.tiers.iter().find(|tier| &tier.threshold > magnitude)
    }

    /// How much is still missing to reach the next threshold.
    pub fn amount_needed(&self, magnitude: &Magnitude) -> Option<Magnitude> {
        self.next_threshold(magnitude)
            .map(|tier| tier.threshold.saturating_sub(magnitude))
    }

    /// Tier held at `magnitude` and progress towards the next one.
    ///
    /// A magnitude equal to a threshold is in the following band at 0%.
    pub fn progress(&self, magnitude: &Magnitude) -> TitleProgress {
        let Some(index) = self
            .tiers
            .iter()
            .position(|tier| &tier.threshold > magnitude)
        else {
            return TitleProgress {
                current_tier: self.tiers[self.tiers.len() - 1].name.clone(),
                next_tier: NextTier::Beyond,
                progress_percent: 100.0,
            };
        };

        let tier = &self.tiers[index];
        let floor = match index {
            0 => BigUint::default(),
            _ => self.tiers[index - 1].threshold.as_biguint().clone(),
        };
        let next_tier = match self.tiers.get(index + 1) {
            Some(next) => NextTier::Tier(next.name.clone()),
            None => NextTier::Beyond,
        };

        let covered = magnitude.as_biguint() - &floor;
        let band = tier.threshold.as_biguint() - &floor;
        let basis_points = covered * BigUint::from(10_000u32) / band;

        TitleProgress {
            current_tier: tier.name.clone(),
            next_tier,
            progress_percent: basis_points.to_f64().unwrap_or_default() / 100.0,
        }
    }
}
