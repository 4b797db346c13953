// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to encode Run status: {0}")]
    StatusEncodeError(#[from] serde_json::Error),

    #[error("Failed to decode Run extension fields: {0}")]
    ExtraFieldsDecode(#[source] serde_json::Error),

    #[error("Failed to encode Run extension fields: {0}")]
    ExtraFieldsEncode(#[source] serde_json::Error),

    #[error("Object is missing {0}")]
    MissingObjectKey(&'static str),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
