use crate::error::{Error, Result};
use std::time::Duration;

/// Records evaluated per scheduling step
pub const DEFAULT_SLICE_SIZE: usize = 100;

/// Minimum pause between two slices
pub const DEFAULT_INTER_SLICE_DELAY: Duration = Duration::from_millis(50);

/// How the stage clause of the filter treats `BA`.
///
/// `Observed` keeps the behavior where `BA` and `ballot` both require the
/// idea to be on the final ballot. `Narrative` requires only that the idea
/// advanced past submission. The stage classifier ignores this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageRule {
    #[default]
    Observed,
    Narrative,
}

impl From<&str> for StageRule {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "narrative" => StageRule::Narrative,
            "observed" | _ => StageRule::Observed,
        }
    }
}

/// Configuration for the incremental filter scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub slice_size: usize,
    pub inter_slice_delay: Duration,
    pub stage_rule: StageRule,
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self {
            slice_size: DEFAULT_SLICE_SIZE,
            inter_slice_delay: DEFAULT_INTER_SLICE_DELAY,
            stage_rule: StageRule::Observed,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.slice_size == 0 {
            return Err(Error::Config(
                "Slice size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating scheduler configurations
#[derive(Debug, Clone, Default)]
pub struct SchedulerConfigBuilder {
    config: SchedulerConfig,
}

impl SchedulerConfigBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::new(),
        }
    }

    pub fn slice_size(mut self, size: usize) -> Self {
        self.config.slice_size = size;
        self
    }

    pub fn inter_slice_delay(mut self, delay: Duration) -> Self {
        self.config.inter_slice_delay = delay;
        self
    }

    pub fn delay_ms(self, ms: u64) -> Self {
        self.inter_slice_delay(Duration::from_millis(ms))
    }

    pub fn stage_rule(mut self, rule: StageRule) -> Self {
        self.config.stage_rule = rule;
        self
    }

    /// Set the stage rule from string, rejecting unknown values
    pub fn stage_rule_str(mut self, rule: &str) -> Result<Self> {
        match rule.trim().to_lowercase().as_str() {
            "observed" | "narrative" => {
                self.config.stage_rule = StageRule::from(rule.trim());
                Ok(self)
            }
            other => Err(Error::Config(format!(
                "Invalid stage rule '{}'. Allowed values are: observed, narrative",
                other
            ))),
        }
    }

    /// Build the final configuration
    pub fn build(self) -> Result<SchedulerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
