use super::{BuildActor, PipelineReport};
use crate::actor::messages::{WatchKey, WsMsg};
use crate::build::BuildTarget;
use crate::lifecycle::{LifecycleApi, SyncAction, sync_unit};
use crate::logger::{status_error, status_success, status_warning};
use crate::utils::plural_count;
use crate::{debug, log};

impl<A: LifecycleApi> BuildActor<A> {
    /// Build `key`'s target, sync its host unit, then ask clients to reload.
    ///
    /// A failed build stops the pipeline; the previous artifacts stay live
    /// and the host is left alone.
    pub async fn process(&mut self, key: WatchKey) -> PipelineReport {
        let mut report = PipelineReport::new(key.clone());

        let target = match key {
            WatchKey::Mirror => {
                report.reloaded = self.reload("mirror changed".into()).await;
                return report;
            }
            WatchKey::Target(target) => target,
        };

        if target == BuildTarget::SharedFrontEnd && !self.executor.config().frontend.is_enabled() {
            debug!("build"; "frontend changed but no bundler configured");
            return report;
        }

        let result = self.executor.build(target.clone()).await;
        if let Some(error) = &result.error {
            status_error(&format!("build failed: {target}"), &error.to_string());
            report.build = Some(result);
            return report;
        }
        status_success(&format!(
            "built {target} ({})",
            plural_count(result.artifacts.len(), "file")
        ));
        report.build = Some(result);

        report.lifecycle = self.sync(&target).await;

        if let BuildTarget::Module(id) = &target
            && self.executor.config().frontend.is_enabled()
            && self.executor.has_ui(id)
        {
            debug!("build"; "{} has a ui entry, frontend queued", id);
            self.enqueue(WatchKey::Target(BuildTarget::SharedFrontEnd));
        }

        report.reloaded = self.reload(format!("{target} rebuilt")).await;
        report
    }

    /// Restart or start the unit loaded from `target`. Failures are reported
    /// as warnings only.
    async fn sync(&self, target: &BuildTarget) -> Option<Result<SyncAction, String>> {
        let api = self.lifecycle.as_ref()?;
        let unit = self.executor.unit_name(target);

        let outcome = match sync_unit(api, &unit).await {
            Ok((action, outcome)) if outcome.success => {
                log!("lifecycle"; "{} {}", action.as_str(), unit);
                Ok(action)
            }
            Ok((action, outcome)) => Err(format!(
                "{unit} not {}: {}",
                action.as_str(),
                outcome.message
            )),
            Err(e) => Err(format!("{unit}: {e}")),
        };

        if let Err(message) = &outcome {
            status_warning(message);
        }
        Some(outcome)
    }

    async fn reload(&self, reason: String) -> bool {
        let Some(ws_tx) = &self.ws_tx else {
            return false;
        };
        ws_tx.send(WsMsg::Reload { reason }).await.is_ok()
    }
}
