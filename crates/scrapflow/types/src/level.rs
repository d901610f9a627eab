//! The seven operational levels of the delivery pipeline.

use serde::{Deserialize, Serialize};

/// A fixed stage in the delivery pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OperationalLevel {
    VendorDispatch = 1,
    GateEntry = 2,
    GrossWeigh = 3,
    MaterialInspection = 4,
    TareWeigh = 5,
    GrnGeneration = 6,
    GatePassExit = 7,
}

impl OperationalLevel {
    pub const ALL: [OperationalLevel; 7] = [
        OperationalLevel::VendorDispatch,
        OperationalLevel::GateEntry,
        OperationalLevel::GrossWeigh,
        OperationalLevel::MaterialInspection,
        OperationalLevel::TareWeigh,
        OperationalLevel::GrnGeneration,
        OperationalLevel::GatePassExit,
    ];

    /// Parse a level number; `None` outside 1..=7.
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::VendorDispatch),
            2 => Some(Self::GateEntry),
            3 => Some(Self::GrossWeigh),
            4 => Some(Self::MaterialInspection),
            5 => Some(Self::TareWeigh),
            6 => Some(Self::GrnGeneration),
            7 => Some(Self::GatePassExit),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::VendorDispatch => "Vendor Dispatch",
            Self::GateEntry => "Gate Entry",
            Self::GrossWeigh => "Gross Weigh",
            Self::MaterialInspection => "Material Inspection",
            Self::TareWeigh => "Tare Weigh",
            Self::GrnGeneration => "GRN Generation",
            Self::GatePassExit => "Gate Pass Exit",
        }
    }

    /// The level a transaction moves to next, if any.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn is_final(self) -> bool {
        self == Self::GatePassExit
    }
}

impl std::fmt::Display for OperationalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.name())
    }
}

/// Rejection for a level number outside 1..=7
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid operational level: {0} (expected 1..=7)")]
pub struct InvalidLevel(pub u8);

impl TryFrom<u8> for OperationalLevel {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(InvalidLevel(value))
    }
}

impl From<OperationalLevel> for u8 {
    fn from(level: OperationalLevel) -> Self {
        level.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_numbers_round_trip() {
        for (i, level) in OperationalLevel::ALL.iter().enumerate() {
            assert_eq!(level.number() as usize, i + 1);
            assert_eq!(OperationalLevel::from_number(level.number()), Some(*level));
        }
    }

    #[test]
    fn test_out_of_range_levels() {
        assert_eq!(OperationalLevel::from_number(0), None);
        assert_eq!(OperationalLevel::from_number(8), None);
        assert_eq!(OperationalLevel::try_from(9), Err(InvalidLevel(9)));
    }

    #[test]
    fn test_next_stops_at_gate_pass() {
        assert_eq!(
            OperationalLevel::TareWeigh.next(),
            Some(OperationalLevel::GrnGeneration)
        );
        assert_eq!(OperationalLevel::GatePassExit.next(), None);
        assert!(OperationalLevel::GatePassExit.is_final());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&OperationalLevel::MaterialInspection).unwrap();
        assert_eq!(json, "4");
        let parsed: OperationalLevel = serde_json::from_str("6").unwrap();
        assert_eq!(parsed, OperationalLevel::GrnGeneration);
        assert!(serde_json::from_str::<OperationalLevel>("11").is_err());
    }
}
