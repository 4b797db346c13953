// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Requeue channel between the BuildRun watcher and the Run controller.

use crate::types::Run;
use futures::Stream;
use kube::runtime::reflector::ObjectRef;
use tokio::sync::mpsc;
use tracing::error;

/// Handle to request reconciliation of a Run
#[derive(Clone)]
pub struct RunQueue {
    tx: mpsc::Sender<ObjectRef<Run>>,
}

impl RunQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ObjectRef<Run>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub async fn enqueue(&self, run: ObjectRef<Run>) {
        if let Err(e) = self.tx.send(run).await {
            error!("Failed to enqueue Run {}: controller is gone", e.0);
        }
    }
}

/// Turn the receiving half into the trigger stream consumed by `Controller::reconcile_on`
pub fn requeue_stream(rx: mpsc::Receiver<ObjectRef<Run>>) -> impl Stream<Item = ObjectRef<Run>> {
    futures::stream::unfold(rx, |mut rx| async move { rx.recv().await.map(|run| (run, rx)) })
}
