//! Full build pass in tier order.

use super::{BuildResult, BuildTarget, Executor, Tier};
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::plural_count;

/// Results of a full pass.
#[derive(Debug, Default)]
pub struct GraphReport {
    pub results: Vec<BuildResult>,
    /// The foundation failed and dependents were not started.
    pub aborted: bool,
}

impl GraphReport {
    pub fn failures(&self) -> impl Iterator<Item = &BuildResult> {
        self.results.iter().filter(|r| !r.succeeded)
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.results.iter().all(|r| r.succeeded)
    }

    /// Log every failure, then a one-line summary.
    pub fn log_summary(&self) {
        for result in self.failures() {
            if let Some(error) = &result.error {
                log!("error"; "{}: {}", result.target, error);
            }
        }
        if self.aborted {
            log!("build"; "foundation failed, dependents not built");
        }

        let failed = self.failures().count();
        let built = plural_count(self.results.len() - failed, "target");
        if failed == 0 {
            log!("build"; "built {}", built);
        } else {
            log!("build"; "built {}, {} failed", built, failed);
        }
    }
}

/// Every target of a full pass, ordered by tier then id.
pub fn plan(executor: &Executor) -> Vec<BuildTarget> {
    let config = executor.config();
    let mut targets = Vec::with_capacity(executor.modules().len() + 2);

    if config.paths.foundation.is_dir() {
        targets.push(BuildTarget::Foundation);
    }
    targets.extend(
        executor
            .modules()
            .iter()
            .map(|m| BuildTarget::Module(m.id.clone())),
    );
    if config.frontend.is_enabled() {
        targets.push(BuildTarget::SharedFrontEnd);
    }

    targets.sort();
    targets
}

/// Build foundation, then every module, then the shared front-end.
///
/// A foundation failure aborts the pass. Module failures are collected and
/// the pass continues.
pub async fn build_all(executor: &Executor) -> GraphReport {
    let targets = plan(executor);
    let count = |tier: Tier| targets.iter().filter(|t| t.tier() == tier).count();
    let progress = ProgressLine::new(&[
        (Tier::Foundation.as_str(), count(Tier::Foundation)),
        (Tier::Module.as_str(), count(Tier::Module)),
        (Tier::SharedFrontEnd.as_str(), count(Tier::SharedFrontEnd)),
    ]);

    let mut report = GraphReport::default();
    for target in targets {
        let tier = target.tier();
        let result = executor.build(target).await;
        progress.inc(tier.as_str());

        let foundation_failed = tier == Tier::Foundation && !result.succeeded;
        report.results.push(result);
        if foundation_failed {
            report.aborted = true;
            break;
        }
    }

    progress.finish();
    report
}
