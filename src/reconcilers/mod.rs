// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Run reconciler and the BuildRun watcher that feeds it requeues.

pub mod buildrun;
pub mod queue;
pub mod run;
pub mod status;

pub use buildrun::{BuildRunEvent, BuildRunWatcher, OwnerRequeue};
pub use queue::{requeue_stream, RunQueue};
pub use run::RunReconciler;
pub use status::mirror_buildrun_status;
