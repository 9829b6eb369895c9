use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MIN_DIMENSION: u32 = 2;
pub const MAX_DIMENSION: u32 = 6;
pub const STANDARD_DIMENSION: u32 = 4;
pub const DEFAULT_TOTAL_TIME_SECS: u32 = 120;

/// Art set a round draws its card faces from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Category {
    #[default]
    Animals,
    Fruits,
    Sports,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Animals, Category::Fruits, Category::Sports];

    pub fn name(self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Fruits => "Fruits",
            Category::Sports => "Sports",
        }
    }

    pub fn folder(self) -> &'static str {
        match self {
            Category::Animals => "animals",
            Category::Fruits => "fruits",
            Category::Sports => "sports",
        }
    }
}

impl From<Category> for u8 {
    fn from(category: Category) -> Self {
        match category {
            Category::Animals => 0,
            Category::Fruits => 1,
            Category::Sports => 2,
        }
    }
}

impl TryFrom<u8> for Category {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Category::Animals),
            1 => Ok(Category::Fruits),
            2 => Ok(Category::Sports),
            other => Err(format!("unknown category {other}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mode {
    #[default]
    Standard,
    Custom,
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Standard => 0,
            Mode::Custom => 1,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Standard),
            1 => Ok(Mode::Custom),
            other => Err(format!("unknown mode {other}")),
        }
    }
}

/// Board shape and time budget for one round. Frozen once the round starts
/// except for `elapsed_time`, which the countdown advances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundConfig {
    pub category: Category,
    pub mode: Mode,
    pub rows: u32,
    pub columns: u32,
    pub total_time: u32,
    pub elapsed_time: u32,
}

impl RoundConfig {
    /// The classic 4x4 board with the default two-minute budget.
    pub fn standard(category: Category) -> Self {
        RoundConfig {
            category,
            mode: Mode::Standard,
            rows: STANDARD_DIMENSION,
            columns: STANDARD_DIMENSION,
            total_time: DEFAULT_TOTAL_TIME_SECS,
            elapsed_time: 0,
        }
    }

    pub fn custom(category: Category, rows: u32, columns: u32, total_time: u32) -> Result<Self> {
        let config = RoundConfig {
            category,
            mode: Mode::Custom,
            rows,
            columns,
            total_time,
            elapsed_time: 0,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let dimensions = MIN_DIMENSION..=MAX_DIMENSION;
        if !dimensions.contains(&self.rows) || !dimensions.contains(&self.columns) {
            return Err(Error::InvalidDimensions {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if (self.rows * self.columns) % 2 != 0 {
            return Err(Error::OddCardCount {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.total_time == 0 {
            return Err(Error::InvalidDuration);
        }
        if self.elapsed_time > self.total_time {
            return Err(Error::ElapsedBeyondTotal {
                elapsed: self.elapsed_time,
                total: self.total_time,
            });
        }
        Ok(())
    }

    pub fn card_count(&self) -> usize {
        (self.rows * self.columns) as usize
    }

    pub fn pair_count(&self) -> usize {
        self.card_count() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_valid() {
        let config = RoundConfig::standard(Category::Animals);
        assert_eq!(config.rows, 4);
        assert_eq!(config.columns, 4);
        assert_eq!(config.total_time, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_rejects_odd_card_count() {
        let result = RoundConfig::custom(Category::Fruits, 3, 3, 60);
        assert!(matches!(
            result,
            Err(Error::OddCardCount { rows: 3, columns: 3 })
        ));
    }

    #[test]
    fn custom_rejects_out_of_range_dimensions() {
        assert!(matches!(
            RoundConfig::custom(Category::Fruits, 1, 4, 60),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            RoundConfig::custom(Category::Fruits, 4, 7, 60),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn custom_rejects_zero_duration() {
        assert!(matches!(
            RoundConfig::custom(Category::Sports, 4, 4, 0),
            Err(Error::InvalidDuration)
        ));
    }

    #[test]
    fn category_survives_the_wire_as_an_integer() {
        let json = serde_json::to_string(&Category::Sports).unwrap();
        assert_eq!(json, "2");
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Category::Sports);
        assert!(serde_json::from_str::<Category>("9").is_err());
    }
}
