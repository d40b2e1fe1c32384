use crate::domain::model::{LoadReport, Snapshot};
use crate::domain::ports::Pipeline;
use crate::utils::monitor::RunMonitor;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    PartialWrite,
    AllWritesFailed,
    /// The API answered with an empty country list.
    NoCountries,
    PrimaryFetchFailed,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::NoCountries => 2,
            RunOutcome::PrimaryFetchFailed => 3,
            RunOutcome::PartialWrite => 4,
            RunOutcome::AllWritesFailed => 5,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub countries: usize,
    pub translations: usize,
    pub load: LoadReport,
}

impl RunReport {
    fn aborted(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            countries: 0,
            translations: 0,
            load: LoadReport::default(),
        }
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Runs extract, transform and load. Never fails; the outcome says how
    /// far the run got.
    pub async fn run(&self) -> RunReport {
        tracing::info!("Starting countries extraction");

        // Extract
        let countries = match self.pipeline.extract().await {
            Ok(countries) => countries,
            Err(e) => {
                tracing::error!(
                    "Failed to fetch countries ({:?}, {:?} severity): {}",
                    e.category(),
                    e.severity(),
                    e
                );
                tracing::error!("💡 {}", e.recovery_suggestion());
                return RunReport::aborted(RunOutcome::PrimaryFetchFailed);
            }
        };
        if countries.is_empty() {
            tracing::error!("No countries data fetched.");
            return RunReport::aborted(RunOutcome::NoCountries);
        }
        self.monitor.log_phase("Extract");

        // Transform
        let translations = match self.pipeline.transform(&countries).await {
            Ok(translations) => translations,
            Err(e) => {
                tracing::error!("Translation step failed, writing countries only: {}", e);
                Vec::new()
            }
        };
        self.monitor.log_phase("Transform");

        // Load
        let snapshot = Snapshot {
            countries,
            translations,
        };
        let load = match self.pipeline.load(&snapshot).await {
            Ok(load) => load,
            Err(e) => {
                tracing::error!("Load step failed: {}", e);
                LoadReport::default()
            }
        };
        self.monitor.log_phase("Load");
        self.monitor.log_final();

        let outcome = if load.failed.is_empty() && !load.written.is_empty() {
            RunOutcome::Completed
        } else if load.written.is_empty() {
            RunOutcome::AllWritesFailed
        } else {
            RunOutcome::PartialWrite
        };

        tracing::info!(
            "Run finished ({:?}): {} countries, {} translations, {} of {} files written",
            outcome,
            snapshot.countries.len(),
            snapshot.translations.len(),
            load.written.len(),
            load.written.len() + load.failed.len()
        );

        RunReport {
            outcome,
            countries: snapshot.countries.len(),
            translations: snapshot.translations.len(),
            load,
        }
    }
}
