// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::tekton;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Shipwright build invocation.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "shipwright.io", version = "v1alpha1", kind = "BuildRun")]
#[kube(namespaced)]
#[kube(status = "BuildRunStatus")]
#[serde(rename_all = "camelCase")]
pub struct BuildRunSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_ref: Option<BuildRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl BuildRun {
    /// Name of the Tekton Run that owns this BuildRun, if any
    pub fn owning_run_name(&self) -> Option<&str> {
        self.metadata
            .owner_references
            .as_ref()?
            .iter()
            .find(|or| or.api_version == tekton::API_VERSION && or.kind == tekton::RUN_KIND)
            .map(|or| or.name.as_str())
    }

    /// Whether a Tekton Run with the given UID owns this BuildRun
    pub fn is_owned_by_run_uid(&self, uid: &str) -> bool {
        self.metadata.owner_references.as_ref().is_some_and(|owners| {
            owners.iter().any(|or| {
                or.api_version == tekton::API_VERSION
                    && or.kind == tekton::RUN_KIND
                    && or.uid == uid
            })
        })
    }

    pub fn conditions(&self) -> &[BuildRunCondition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildRunStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<BuildRunCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<Time>,
}

/// BuildRun conditions carry no severity.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildRunCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
