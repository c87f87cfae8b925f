//! Tariff configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Tariffs can be loaded from environment variables and config files; every
//! value falls back to the constants in [`crate::constants`].

use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;
use tracing::{debug, warn};
use validator::Validate;

use crate::constants::{
    MTM_MINS_COST, MTM_MONTHLY_FEE, PREPAID_MINS_COST, PREPAID_TOP_UP_AMOUNT,
    PREPAID_TOP_UP_THRESHOLD, TERM_DEPOSIT, TERM_MINS, TERM_MINS_COST, TERM_MONTHLY_FEE,
};
use crate::BillingResult;

/// Main tariff configuration
#[derive(Debug, Deserialize, Clone, Default, Validate)]
pub struct BillingConfig {
    #[serde(default)]
    #[validate(nested)]
    pub term: TermPlan,

    #[serde(default)]
    #[validate(nested)]
    pub mtm: MtmPlan,

    #[serde(default)]
    #[validate(nested)]
    pub prepaid: PrepaidPlan,
}

/// Term contract tariff
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Validate)]
pub struct TermPlan {
    /// Fee charged every month
    #[serde(default = "default_term_monthly_fee")]
    #[validate(range(min = 0.0))]
    pub monthly_fee: f64,

    /// One-time deposit charged in the start month
    #[serde(default = "default_term_deposit")]
    #[validate(range(min = 0.0))]
    pub deposit: f64,

    /// Free minutes granted every month
    #[serde(default = "default_term_free_minutes")]
    pub free_minutes: u32,

    /// Rate for minutes beyond the free allotment
    #[serde(default = "default_term_minute_rate")]
    #[validate(range(min = 0.0))]
    pub minute_rate: f64,
}

fn default_term_monthly_fee() -> f64 {
    TERM_MONTHLY_FEE
}

fn default_term_deposit() -> f64 {
    TERM_DEPOSIT
}

fn default_term_free_minutes() -> u32 {
    TERM_MINS
}

fn default_term_minute_rate() -> f64 {
    TERM_MINS_COST
}

/// Month-to-month contract tariff
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Validate)]
pub struct MtmPlan {
    /// Fee charged every month
    #[serde(default = "default_mtm_monthly_fee")]
    #[validate(range(min = 0.0))]
    pub monthly_fee: f64,

    /// Rate for every minute
    #[serde(default = "default_mtm_minute_rate")]
    #[validate(range(min = 0.0))]
    pub minute_rate: f64,
}

fn default_mtm_monthly_fee() -> f64 {
    MTM_MONTHLY_FEE
}

fn default_mtm_minute_rate() -> f64 {
    MTM_MINS_COST
}

/// Prepaid contract tariff
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Validate)]
pub struct PrepaidPlan {
    /// Rate for every minute, also debited from the prepaid balance
    #[serde(default = "default_prepaid_minute_rate")]
    #[validate(range(min = 0.0))]
    pub minute_rate: f64,

    /// A month starts with a top-up when less credit than this remains
    #[serde(default = "default_top_up_threshold")]
    #[validate(range(min = 0.0))]
    pub top_up_threshold: f64,

    /// Credit added by one top-up
    #[serde(default = "default_top_up_amount")]
    #[validate(range(exclusive_min = 0.0))]
    pub top_up_amount: f64,
}

fn default_prepaid_minute_rate() -> f64 {
    PREPAID_MINS_COST
}

fn default_top_up_threshold() -> f64 {
    PREPAID_TOP_UP_THRESHOLD
}

fn default_top_up_amount() -> f64 {
    PREPAID_TOP_UP_AMOUNT
}

impl Default for TermPlan {
    fn default() -> Self {
        Self {
            monthly_fee: TERM_MONTHLY_FEE,
            deposit: TERM_DEPOSIT,
            free_minutes: TERM_MINS,
            minute_rate: TERM_MINS_COST,
        }
    }
}

impl Default for MtmPlan {
    fn default() -> Self {
        Self {
            monthly_fee: MTM_MONTHLY_FEE,
            minute_rate: MTM_MINS_COST,
        }
    }
}

impl Default for PrepaidPlan {
    fn default() -> Self {
        Self {
            minute_rate: PREPAID_MINS_COST,
            top_up_threshold: PREPAID_TOP_UP_THRESHOLD,
            top_up_amount: PREPAID_TOP_UP_AMOUNT,
        }
    }
}

impl BillingConfig {
    /// Load configuration from environment and optional config files
    pub fn load() -> BillingResult<Self> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Self::with_defaults()?
            // Load config files if they exist
            .add_source(File::with_name("config/billing").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with LINEBILL prefix
            .add_source(Self::environment())
            .build()?;

        let parsed = Self::finish(config)?;
        debug!("Loaded billing configuration for run mode {}", run_mode);
        Ok(parsed)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> BillingResult<Self> {
        let config = Self::with_defaults()?
            .add_source(File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        Self::finish(config)
    }

    /// Parse configuration from TOML text layered over the defaults
    pub fn parse(contents: &str) -> BillingResult<Self> {
        let config = Self::with_defaults()?
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Self::finish(config)
    }

    fn with_defaults() -> BillingResult<ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder()
            .set_default("term.monthly_fee", TERM_MONTHLY_FEE)?
            .set_default("term.deposit", TERM_DEPOSIT)?
            .set_default("term.free_minutes", i64::from(TERM_MINS))?
            .set_default("term.minute_rate", TERM_MINS_COST)?
            .set_default("mtm.monthly_fee", MTM_MONTHLY_FEE)?
            .set_default("mtm.minute_rate", MTM_MINS_COST)?
            .set_default("prepaid.minute_rate", PREPAID_MINS_COST)?
            .set_default("prepaid.top_up_threshold", PREPAID_TOP_UP_THRESHOLD)?
            .set_default("prepaid.top_up_amount", PREPAID_TOP_UP_AMOUNT)?;

        Ok(builder)
    }

    /// `LINEBILL__TERM__DEPOSIT=250` overrides `term.deposit`
    fn environment() -> Environment {
        Environment::with_prefix("LINEBILL")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(config: Config) -> BillingResult<Self> {
        let parsed: Self = config.try_deserialize()?;
        if let Err(e) = parsed.validate() {
            warn!("Rejected billing configuration: {}", e);
            return Err(e.into());
        }
        Ok(parsed)
    }
}
