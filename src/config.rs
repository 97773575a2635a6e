use crate::error::{BudgetError, Result};
use crate::month::{MonthKey, MonthRange};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Start-up settings for a [`crate::BudgetSession`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BudgetConfig {
    #[schemars(
        description = "First month of the grid as YYYY-MM. Defaults to January of the current year."
    )]
    pub start: Option<MonthKey>,

    #[schemars(
        description = "Last month of the grid as YYYY-MM. Defaults to December of the current year."
    )]
    pub end: Option<MonthKey>,

    #[schemars(description = "Number of empty income parents created up front.")]
    pub initial_income_parents: usize,

    #[schemars(description = "Number of empty expense parents created up front.")]
    pub initial_expense_parents: usize,

    #[schemars(
        description = "Seed example figures into a blank budget after every range change."
    )]
    pub seed_demo_values: bool,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            initial_income_parents: 1,
            initial_expense_parents: 0,
            seed_demo_values: false,
        }
    }
}

impl BudgetConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BudgetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects an explicitly configured range whose end precedes its start.
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end < start {
                return Err(BudgetError::InvalidConfig(format!(
                    "end month {} is before start month {}",
                    end, start
                )));
            }
        }
        Ok(())
    }

    /// The configured range, filling unset bounds from the current year.
    pub fn range(&self) -> MonthRange {
        let current = MonthRange::current_year();
        MonthRange::new(
            self.start.unwrap_or(current.start),
            self.end.unwrap_or(current.end),
        )
    }
}
