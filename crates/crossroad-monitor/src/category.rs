//! Vehicle categories observed at the crossroad.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MonitorError;

/// Number of vehicle categories.
pub const CATEGORY_COUNT: usize = 3;

/// Kind of vehicle carried by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum VehicleCategory {
    /// Bicycle lane detections.
    #[default]
    Bicycle,
    /// Passenger cars.
    Car,
    /// E-scooters and mopeds.
    Scooter,
}

impl VehicleCategory {
    /// All categories in declaration order.
    pub const ALL: [VehicleCategory; CATEGORY_COUNT] = [
        VehicleCategory::Bicycle,
        VehicleCategory::Car,
        VehicleCategory::Scooter,
    ];

    /// Display name used in statistics lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VehicleCategory::Bicycle => "Bicycle",
            VehicleCategory::Car => "Car",
            VehicleCategory::Scooter => "Scooter",
        }
    }

    /// Position of this category in [`VehicleCategory::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            VehicleCategory::Bicycle => 0,
            VehicleCategory::Car => 1,
            VehicleCategory::Scooter => 2,
        }
    }

    /// Iterate over all categories.
    pub fn all() -> impl Iterator<Item = VehicleCategory> {
        Self::ALL.into_iter()
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VehicleCategory {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .find(|category| category.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| MonitorError::unknown_category(trimmed))
    }
}
