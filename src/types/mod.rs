// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tekton and Shipwright resource types, as far as this controller needs them.

pub mod buildrun;
pub mod run;

pub use buildrun::{BuildRef, BuildRun, BuildRunCondition, BuildRunSpec, BuildRunStatus};
pub use run::{Condition, ExtraFields, Run, RunSpec, RunStatus, TaskRef};
