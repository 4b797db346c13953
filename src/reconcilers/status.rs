// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Mapping of BuildRun status onto Run status.

use crate::constants::conditions;
use crate::types::{BuildRun, BuildRunCondition, Condition, RunStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

impl From<&BuildRunCondition> for Condition {
    fn from(c: &BuildRunCondition) -> Self {
        Condition {
            condition_type: c.condition_type.clone(),
            status: c.status.clone(),
            severity: None,
            last_transition_time: c.last_transition_time.clone(),
            reason: c.reason.clone(),
            message: c.message.clone(),
        }
    }
}

/// Compute the Run status mirroring `buildrun`, starting from the Run's `current` status.
///
/// The completion time is copied verbatim and the conditions are replaced by the
/// BuildRun's. Without BuildRun conditions the Run reports `Succeeded = Unknown`;
/// an existing condition of that shape is kept so that its transition time is stable.
pub fn mirror_buildrun_status(current: &RunStatus, buildrun: &BuildRun, now: Time) -> RunStatus {
    let mut status = current.clone();

    status.completion_time = buildrun
        .status
        .as_ref()
        .and_then(|s| s.completion_time.clone());

    let mirrored: Vec<Condition> = buildrun.conditions().iter().map(Condition::from).collect();

    status.conditions = if mirrored.is_empty() {
        let pending = current
            .succeeded()
            .filter(|c| c.status == conditions::STATUS_UNKNOWN)
            .cloned()
            .unwrap_or_else(|| Condition::unknown_succeeded(now));
        vec![pending]
    } else {
        mirrored
    };

    status
}
