// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::runtime::reflector;
use kube::Client;
use tracing::{info, warn};

use buildrun_bridge::config::Config;
use buildrun_bridge::constants::REQUEUE_CHANNEL_CAPACITY;
use buildrun_bridge::kubernetes::wait_for_crd;
use buildrun_bridge::reconcilers::{
    requeue_stream, BuildRunWatcher, OwnerRequeue, RunQueue, RunReconciler,
};
use buildrun_bridge::types::{BuildRun, Run};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting build-task-controller");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={}, error_requeue={:?}",
        config.watch_namespace.as_deref().unwrap_or("<all>"),
        config.error_requeue
    );

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // Both CRDs must be served before the watches can start
    info!("Waiting for Run and BuildRun CRDs to become available...");
    wait_for_crd::<Run>(&client).await?;
    wait_for_crd::<BuildRun>(&client).await?;

    // Caches shared between the Run controller and the BuildRun watcher
    let (runs, run_writer) = reflector::store::<Run>();
    let (buildruns, buildrun_writer) = reflector::store::<BuildRun>();
    let (queue, requeues) = RunQueue::new(REQUEUE_CHANNEL_CAPACITY);

    let run_reconciler = RunReconciler::new(client.clone(), config.clone(), buildruns);
    let buildrun_watcher =
        BuildRunWatcher::new(client, config, OwnerRequeue::new(runs.clone(), queue));

    info!("Starting reconcilers...");

    // The Run controller stops on SIGTERM/SIGINT; take the watcher down with it
    tokio::select! {
        res = run_reconciler.run(runs, run_writer, requeue_stream(requeues)) => res?,
        res = buildrun_watcher.run(buildrun_writer) => res?,
    }

    warn!("Reconcilers stopped");
    Ok(())
}
