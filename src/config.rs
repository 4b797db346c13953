// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_ERROR_REQUEUE_SECS: u64 = 60;

/// Controller configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Restrict the Run and BuildRun watches to this namespace; all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Delay before a failed reconciliation is retried
    pub error_requeue: Duration,
    /// Instance name reported on published events
    pub instance: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_namespace: None,
            error_requeue: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
            instance: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty());
        let error_requeue_secs = match lookup("ERROR_REQUEUE_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("ERROR_REQUEUE_SECS is not a number: {}", v))?,
            None => DEFAULT_ERROR_REQUEUE_SECS,
        };
        let instance = lookup("POD_NAME").filter(|name| !name.is_empty());

        Ok(Config {
            watch_namespace,
            error_requeue: Duration::from_secs(error_requeue_secs),
            instance,
        })
    }
}
