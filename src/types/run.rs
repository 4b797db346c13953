// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{conditions, shipwright};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Tekton's generic custom task invocation. Only the fields this controller
/// reads or writes are modelled.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "tekton.dev", version = "v1alpha1", kind = "Run")]
#[kube(namespaced)]
#[kube(status = "RunStatus")]
#[serde(rename_all = "camelCase")]
pub struct RunSpec {
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<TaskRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct Param {
    pub name: String,
    pub value: serde_json::Value,
}

impl Run {
    /// A Run is done once its Succeeded condition leaves Unknown.
    pub fn is_done(&self) -> bool {
        self.status
            .as_ref()
            .and_then(RunStatus::succeeded)
            .is_some_and(|c| c.status != conditions::STATUS_UNKNOWN)
    }

    /// Check whether this Run references a Shipwright Build
    pub fn references_build(&self) -> bool {
        self.spec.task_ref.as_ref().is_some_and(|r| {
            r.api_version.as_deref() == Some(shipwright::API_VERSION)
                && r.kind.as_deref() == Some(shipwright::BUILD_KIND)
        })
    }

    /// Name of the BuildRun recorded in the status extension fields, if any
    pub fn build_run_name(&self) -> Result<Option<String>, serde_json::Error> {
        let extra = match self.status.as_ref() {
            Some(status) => status.decode_extra_fields()?,
            None => ExtraFields::default(),
        };
        Ok(extra.build_run_name.filter(|name| !name.is_empty()))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    /// Serialized as `null` when unset so a merge patch clears it
    #[serde(default)]
    pub completion_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RunResult>>,
    /// Free-form per custom task controller; decode with `RunStatus::decode_extra_fields`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_fields: Option<serde_json::Value>,
}

impl RunStatus {
    pub fn succeeded(&self) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == conditions::SUCCEEDED)
    }

    /// Decode this controller's payload from `extraFields`
    pub fn decode_extra_fields(&self) -> Result<ExtraFields, serde_json::Error> {
        match &self.extra_fields {
            None | Some(serde_json::Value::Null) => Ok(ExtraFields::default()),
            Some(value) => serde_json::from_value(value.clone()),
        }
    }

    /// Encode `fields` into `extraFields`, keeping keys owned by others
    pub fn set_extra_fields(&mut self, fields: &ExtraFields) -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_value(fields)?;
        let mut merged = match self.extra_fields.take() {
            Some(serde_json::Value::Object(existing)) => existing,
            _ => serde_json::Map::new(),
        };
        if let serde_json::Value::Object(encoded) = encoded {
            merged.extend(encoded);
        }
        self.extra_fields = Some(serde_json::Value::Object(merged));
        Ok(())
    }
}

/// Controller-owned payload stored under `status.extraFields`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtraFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_run_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct RunResult {
    pub name: String,
    pub value: String,
}

/// Knative-style condition as carried by Tekton resources.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Time>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// `Succeeded = Unknown`, used while the BuildRun reports nothing yet
    pub fn unknown_succeeded(now: Time) -> Self {
        Self {
            condition_type: conditions::SUCCEEDED.to_string(),
            status: conditions::STATUS_UNKNOWN.to_string(),
            severity: None,
            last_transition_time: Some(now),
            reason: None,
            message: None,
        }
    }
}
