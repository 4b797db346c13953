// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// The controller name, used as field manager and event reporter
pub const CONTROLLER_NAME: &str = "build-task-controller";

/// Infix between the Run name and the random suffix of a generated BuildRun name
pub const BUILDRUN_NAME_INFIX: &str = "-buildrun-";

/// Tekton API coordinates
pub mod tekton {
    pub const API_VERSION: &str = "tekton.dev/v1alpha1";
    pub const RUN_KIND: &str = "Run";
}

/// Shipwright API coordinates
pub mod shipwright {
    pub const API_VERSION: &str = "shipwright.io/v1alpha1";
    pub const BUILD_KIND: &str = "Build";
}

/// Condition types and statuses shared by Run and BuildRun
pub mod conditions {
    pub const SUCCEEDED: &str = "Succeeded";
    pub const STATUS_UNKNOWN: &str = "Unknown";
}

/// Kubernetes event reasons
pub mod reasons {
    pub const RUN_RECONCILED: &str = "RunReconciled";
}

/// CRD polling configuration
pub mod crd {
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

/// Capacity of the Run requeue channel
pub const REQUEUE_CHANNEL_CAPACITY: usize = 256;
