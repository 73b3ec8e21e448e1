use serde::Deserialize;

use lectern_core::config::Config;

use crate::domain::types::{PlanCatalog, SubscriptionPlan};

/// Library service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `LIBRARY_PORT`.
    #[serde(default = "default_port")]
    pub library_port: u16,
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,
    /// Seconds to wait for a new database connection to open.
    #[serde(default = "default_connect_timeout")]
    pub db_connect_timeout_secs: u64,
    /// Seconds to wait for a free pooled connection.
    #[serde(default = "default_acquire_timeout")]
    pub db_acquire_timeout_secs: u64,
    /// Log every SQL statement through sea-orm.
    #[serde(default)]
    pub db_sql_logging: bool,
    /// Payment gateway server key, used to verify notification signatures.
    pub payment_server_key: String,
    /// `name:days:amount` entries separated by commas.
    #[serde(default = "default_plans")]
    pub subscription_plans: String,
    /// Seconds between expiry sweeps; 0 disables the sweeper.
    #[serde(default = "default_sweep_interval")]
    pub expiry_sweep_interval_secs: u64,
}

fn default_port() -> u16 {
    3114
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_plans() -> String {
    "monthly:30:49000,yearly:365:399000".to_owned()
}

fn default_sweep_interval() -> u64 {
    300
}

impl Config for LibraryConfig {}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid subscription plan `{0}`, expected name:days:amount")]
pub struct InvalidPlan(String);

impl LibraryConfig {
    pub fn plans(&self) -> Result<PlanCatalog, InvalidPlan> {
        parse_plans(&self.subscription_plans)
    }
}

fn parse_plans(raw: &str) -> Result<PlanCatalog, InvalidPlan> {
    let mut plans = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let invalid = || InvalidPlan(entry.to_owned());
        let mut parts = entry.split(':');
        let (Some(name), Some(days), Some(amount), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let name = name.trim();
        let duration_days: u32 = days.trim().parse().map_err(|_| invalid())?;
        let amount: i64 = amount.trim().parse().map_err(|_| invalid())?;
        if name.is_empty() || duration_days == 0 || amount <= 0 {
            return Err(invalid());
        }
        if plans.iter().any(|p: &SubscriptionPlan| p.name == name) {
            return Err(invalid());
        }
        plans.push(SubscriptionPlan {
            name: name.to_owned(),
            duration_days,
            amount,
        });
    }
    Ok(PlanCatalog::new(plans))
}
