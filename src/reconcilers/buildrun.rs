// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! BuildRun watcher - requeues the owning Run whenever a BuildRun changes.

use crate::config::Config;
use crate::kubernetes::scoped_api;
use crate::reconcilers::queue::RunQueue;
use crate::types::{BuildRun, Run};
use futures::StreamExt;
use kube::{
    runtime::{
        reflector::{ObjectRef, Store},
        watcher, WatchStreamExt,
    },
    Client, ResourceExt,
};
use kube_runtime::reflector::store::Writer;
use tracing::{info, instrument, warn};

/// A BuildRun watch event, resolved once at the watch boundary
#[derive(Debug, Clone)]
pub enum BuildRunEvent {
    /// Created, updated, or listed during the initial sync
    Applied(BuildRun),
    Deleted(BuildRun),
}

impl BuildRunEvent {
    /// Map a raw watcher event; list bookkeeping events carry no object and are dropped
    pub fn from_watch_event(event: watcher::Event<BuildRun>) -> Option<Self> {
        match event {
            watcher::Event::Apply(br) | watcher::Event::InitApply(br) => Some(Self::Applied(br)),
            watcher::Event::Delete(br) => Some(Self::Deleted(br)),
            watcher::Event::Init | watcher::Event::InitDone => None,
        }
    }

    pub fn buildrun(&self) -> &BuildRun {
        match self {
            Self::Applied(br) | Self::Deleted(br) => br,
        }
    }
}

/// Looks up the Run owning a BuildRun and asks the Run controller to reconcile it.
pub struct OwnerRequeue {
    runs: Store<Run>,
    queue: RunQueue,
}

impl OwnerRequeue {
    pub fn new(runs: Store<Run>, queue: RunQueue) -> Self {
        Self { runs, queue }
    }

    /// Resolve the owning Run from the Run cache
    pub fn owning_run(&self, buildrun: &BuildRun) -> Option<ObjectRef<Run>> {
        let br_name = buildrun.name_any();

        let Some(run_name) = buildrun.owning_run_name() else {
            info!("BuildRun {:?} had no owning Run", br_name);
            return None;
        };
        info!("BuildRun {} is owned by Run {}", br_name, run_name);

        let key = ObjectRef::new(run_name).within(&buildrun.namespace().unwrap_or_default());
        match self.runs.get(&key) {
            Some(run) => Some(ObjectRef::from_obj(&*run)),
            None => {
                warn!("Failed to get Run {:?}: not found", run_name);
                None
            }
        }
    }

    #[instrument(skip(self, event), fields(buildrun = %event.buildrun().name_any()))]
    pub async fn handle(&self, event: &BuildRunEvent) {
        if let Some(run) = self.owning_run(event.buildrun()) {
            info!("Found Run that owns the BuildRun ({}), enqueueing reconcile", run.name);
            self.queue.enqueue(run).await;
        }
    }
}

pub struct BuildRunWatcher {
    client: Client,
    config: Config,
    requeue: OwnerRequeue,
}

impl BuildRunWatcher {
    pub fn new(client: Client, config: Config, requeue: OwnerRequeue) -> Self {
        Self {
            client,
            config,
            requeue,
        }
    }

    /// Watch BuildRuns, feeding `writer` and requeueing owning Runs until the watch ends
    pub async fn run(self, writer: Writer<BuildRun>) -> anyhow::Result<()> {
        let buildruns =
            scoped_api::<BuildRun>(self.client.clone(), self.config.watch_namespace.as_deref());

        info!("Waiting for Run cache to sync...");
        self.requeue.runs.wait_until_ready().await?;

        let requeue = &self.requeue;
        watcher(buildruns, watcher::Config::default())
            .default_backoff()
            .reflect(writer)
            .for_each(|res| async move {
                match res {
                    Ok(event) => {
                        if let Some(event) = BuildRunEvent::from_watch_event(event) {
                            requeue.handle(&event).await;
                        }
                    }
                    Err(e) => warn!("BuildRun watch error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}
