// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Run reconciler - creates the BuildRun for a Run and mirrors its status back.

use crate::config::Config;
use crate::constants::{reasons, tekton, BUILDRUN_NAME_INFIX, CONTROLLER_NAME};
use crate::error::{BridgeError, Result};
use crate::kubernetes::scoped_api;
use crate::reconcilers::status::mirror_buildrun_status;
use crate::types::{BuildRef, BuildRun, BuildRunSpec, ExtraFields, Run, RunStatus};
use futures::{Stream, StreamExt};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{OwnerReference, Time};
use k8s_openapi::chrono::Utc;
use kube::{
    api::{ObjectMeta, Patch, PatchParams, PostParams},
    runtime::{
        controller::Action,
        events::{Event, EventType, Recorder, Reporter},
        reflector::{ObjectRef, Store},
        watcher, Controller, WatchStreamExt,
    },
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::reflector::store::Writer;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub struct RunReconciler {
    client: Client,
    config: Config,
    buildruns: Store<BuildRun>,
    recorder: Recorder,
}

impl RunReconciler {
    pub fn new(client: Client, config: Config, buildruns: Store<BuildRun>) -> Self {
        let reporter = Reporter {
            controller: CONTROLLER_NAME.to_string(),
            instance: config.instance.clone(),
        };
        let recorder = Recorder::new(client.clone(), reporter);
        Self {
            client,
            config,
            buildruns,
            recorder,
        }
    }

    /// Run the controller over Runs, also reconciling every Run received on `requeues`
    pub async fn run(
        self,
        runs: Store<Run>,
        writer: Writer<Run>,
        requeues: impl Stream<Item = ObjectRef<Run>> + Send + 'static,
    ) -> anyhow::Result<()> {
        let api = scoped_api::<Run>(self.client.clone(), self.config.watch_namespace.as_deref());
        let run_stream = watcher(api, watcher::Config::default())
            .default_backoff()
            .reflect(writer)
            .applied_objects();
        let context = Arc::new(self);

        Controller::for_stream(run_stream, runs)
            .reconcile_on(requeues)
            .shutdown_on_signal()
            .run(reconcile, error_policy, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled run: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    /// Fetch the BuildRun recorded for a Run, preferring the watch cache
    #[instrument(skip(self, buildruns))]
    async fn get_buildrun(
        &self,
        buildruns: &Api<BuildRun>,
        namespace: &str,
        name: &str,
    ) -> Result<BuildRun> {
        if let Some(br) = self.buildruns.get(&ObjectRef::new(name).within(namespace)) {
            return Ok((*br).clone());
        }
        debug!("BuildRun not cached yet, reading it from the API server");
        Ok(buildruns.get(name).await?)
    }

    /// A cached BuildRun owned by the Run with `uid`, left behind by a pass whose
    /// status write never landed. The oldest one wins when there are several.
    fn find_owned_buildrun(&self, namespace: &str, uid: &str) -> Option<BuildRun> {
        self.buildruns
            .state()
            .into_iter()
            .filter(|br| {
                br.namespace().as_deref() == Some(namespace) && br.is_owned_by_run_uid(uid)
            })
            .min_by_key(|br| (br.metadata.creation_timestamp.clone(), br.name_any()))
            .map(|br| (*br).clone())
    }

    async fn publish_reconciled(&self, run: &Run) {
        let event = Event {
            type_: EventType::Normal,
            reason: reasons::RUN_RECONCILED.to_string(),
            note: Some(format!(
                "Run reconciled: \"{}/{}\"",
                run.namespace().unwrap_or_default(),
                run.name_any()
            )),
            action: "Reconcile".to_string(),
            secondary: None,
        };
        if let Err(e) = self.recorder.publish(&event, &run.object_ref(&())).await {
            warn!("Failed to publish event for Run {}: {}", run.name_any(), e);
        }
    }
}

/// Build the BuildRun to create for `run`, owned by it
pub fn new_buildrun_for(run: &Run) -> Result<BuildRun> {
    let name = run.name_any();
    let uid = run.uid().ok_or(BridgeError::MissingObjectKey(".metadata.uid"))?;
    let task_ref = run.spec.task_ref.clone().unwrap_or_default();

    Ok(BuildRun {
        metadata: ObjectMeta {
            generate_name: Some(format!("{}{}", name, BUILDRUN_NAME_INFIX)),
            namespace: run.namespace(),
            owner_references: Some(vec![OwnerReference {
                api_version: tekton::API_VERSION.to_string(),
                kind: tekton::RUN_KIND.to_string(),
                name,
                uid,
                ..Default::default()
            }]),
            ..Default::default()
        },
        spec: BuildRunSpec {
            build_ref: Some(BuildRef {
                name: task_ref.name,
                api_version: task_ref.api_version,
            }),
        },
        status: None,
    })
}

#[instrument(
    skip(run, ctx),
    fields(run = %format!("{}/{}", run.namespace().unwrap_or_default(), run.name_any()))
)]
async fn reconcile(run: Arc<Run>, ctx: Arc<RunReconciler>) -> Result<Action> {
    if run.is_done() {
        info!("Run is finished, done reconciling");
        return Ok(Action::await_change());
    }
    if !run.references_build() {
        debug!("Run does not reference a Shipwright Build, skipping");
        return Ok(Action::await_change());
    }

    let namespace = run
        .namespace()
        .ok_or(BridgeError::MissingObjectKey(".metadata.namespace"))?;
    let buildruns: Api<BuildRun> = Api::namespaced(ctx.client.clone(), &namespace);
    let current = run.status.clone().unwrap_or_default();
    let mut status = current.clone();

    let recorded = run.build_run_name().map_err(BridgeError::ExtraFieldsDecode)?;
    let buildrun = match recorded {
        Some(br_name) => {
            info!("BuildRun associated with Run is {:?}", br_name);
            ctx.get_buildrun(&buildruns, &namespace, &br_name).await?
        }
        None => {
            let uid = run.uid().ok_or(BridgeError::MissingObjectKey(".metadata.uid"))?;
            let br = match ctx.find_owned_buildrun(&namespace, &uid) {
                Some(br) => {
                    info!("Run already owns BuildRun {:?}, recording it", br.name_any());
                    br
                }
                None => {
                    info!("Run has no BuildRun associated, creating one");
                    let br = buildruns
                        .create(&PostParams::default(), &new_buildrun_for(&run)?)
                        .await?;
                    info!("Created BuildRun {:?}", br.name_any());
                    br
                }
            };

            status
                .set_extra_fields(&ExtraFields {
                    build_run_name: Some(br.name_any()),
                })
                .map_err(BridgeError::ExtraFieldsEncode)?;
            status.start_time.get_or_insert_with(|| Time(Utc::now()));
            br
        }
    };

    let status = mirror_buildrun_status(&status, &buildrun, Time(Utc::now()));
    if status == current {
        debug!("Run status already up to date");
        return Ok(Action::await_change());
    }

    patch_run_status(&ctx.client, &namespace, &run.name_any(), &status).await?;
    ctx.publish_reconciled(&run).await;

    Ok(Action::await_change())
}

async fn patch_run_status(
    client: &Client,
    namespace: &str,
    name: &str,
    status: &RunStatus,
) -> Result<()> {
    let runs: Api<Run> = Api::namespaced(client.clone(), namespace);
    let patch = json!({ "status": serde_json::to_value(status)? });
    let pp = PatchParams {
        field_manager: Some(CONTROLLER_NAME.to_string()),
        ..Default::default()
    };
    runs.patch_status(name, &pp, &Patch::Merge(&patch)).await?;
    Ok(())
}

fn error_policy(_run: Arc<Run>, error: &BridgeError, ctx: Arc<RunReconciler>) -> Action {
    error!("Reconciliation error: {}", error);
    Action::requeue(ctx.config.error_requeue)
}
