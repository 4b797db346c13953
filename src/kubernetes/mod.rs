// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for CRD discovery and scoped Api construction.

pub mod api;
pub mod crd;

pub use api::scoped_api;
pub use crd::wait_for_crd;
