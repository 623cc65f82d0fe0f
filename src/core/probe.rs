use crate::core::stager::FixtureStager;
use crate::core::{AssetSource, Backend, ProbeKind, ProbeReport};
use crate::utils::error::Result;
use crate::utils::monitor::{open_fd_count, SystemMonitor};
use chrono::Utc;
use std::time::Instant;

pub const DEFAULT_ASSET: &str = "initial_version_2_12_1.anki2";
pub const DEFAULT_QUERY: &str = "select count(*) from revlog";
pub const DEFAULT_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub asset: String,
    pub iterations: usize,
    pub query: String,
    /// Resource statistics are logged every this many iterations.
    pub sample_every: usize,
    /// Descriptor growth above this is logged as a warning.
    pub fd_growth_warn: usize,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            asset: DEFAULT_ASSET.to_string(),
            iterations: DEFAULT_ITERATIONS,
            query: DEFAULT_QUERY.to_string(),
            sample_every: 1_000,
            fd_growth_warn: 32,
        }
    }
}

/// Repeats staging (and optionally backend open/query/close) so that a
/// profiler attached to the process can spot leaked handles.
pub struct LeakProbe<'a, A: AssetSource> {
    stager: &'a FixtureStager<A>,
    settings: ProbeSettings,
    monitor: SystemMonitor,
}

impl<'a, A: AssetSource> LeakProbe<'a, A> {
    pub fn new(stager: &'a FixtureStager<A>, settings: ProbeSettings) -> Self {
        Self {
            stager,
            settings,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Opens, queries and closes a backend on a freshly staged copy of the
    /// asset, once per iteration.
    pub fn run_disposal<B: Backend>(&self) -> Result<ProbeReport> {
        self.run(ProbeKind::Disposal, |_| self.disposal_iteration::<B>().map(Some))
    }

    /// Only stages the asset each iteration. If this run leaks descriptors
    /// the problem is in file handling rather than in the backend.
    pub fn run_staging(&self) -> Result<ProbeReport> {
        self.run(ProbeKind::Staging, |_| {
            let _path = self.stager.test_file_path(&self.settings.asset)?;
            Ok(None)
        })
    }

    fn disposal_iteration<B: Backend>(&self) -> Result<i64> {
        let path = self.stager.test_file_path(&self.settings.asset)?;

        // dropped on any early return, which releases it
        let backend = B::open(&path)?;
        let count = {
            let db = backend.writable_database()?;
            db.query_scalar(&self.settings.query)?
        };
        backend.close()?;

        Ok(count)
    }

    fn run<F>(&self, kind: ProbeKind, mut iteration: F) -> Result<ProbeReport>
    where
        F: FnMut(usize) -> Result<Option<i64>>,
    {
        let started_at = Utc::now();
        let start = Instant::now();
        let fds_before = open_fd_count();
        let mut last_scalar = None;

        tracing::info!(
            "Starting {:?} probe: {} iterations of {}",
            kind,
            self.settings.iterations,
            self.settings.asset
        );
        self.monitor.log_stats("Probe start");

        for i in 0..self.settings.iterations {
            tracing::debug!("Iteration {}", i);

            match iteration(i) {
                Ok(Some(value)) => last_scalar = Some(value),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("❌ {:?} probe failed at iteration {}: {}", kind, i, e);
                    return Err(e);
                }
            }

            if self.settings.sample_every > 0 && (i + 1) % self.settings.sample_every == 0 {
                tracing::info!(
                    "Iteration {}/{}, open descriptors: {:?}",
                    i + 1,
                    self.settings.iterations,
                    open_fd_count()
                );
                self.monitor.log_stats("Probe");
            }
        }

        // refreshes the monitor's peak before it is read into the report
        self.monitor.log_final_stats();

        let report = ProbeReport {
            kind,
            asset: self.settings.asset.clone(),
            iterations_requested: self.settings.iterations,
            iterations_completed: self.settings.iterations,
            last_scalar,
            fds_before,
            fds_after: open_fd_count(),
            peak_memory_mb: self.monitor.peak_memory_mb(),
            started_at,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        if let Some(growth) = report.fd_growth() {
            if growth > self.settings.fd_growth_warn as i64 {
                tracing::warn!(
                    "⚠️ Open descriptors grew by {} over {} iterations",
                    growth,
                    report.iterations_completed
                );
            }
        }
        tracing::info!(
            "✅ {:?} probe finished {} iterations in {}ms",
            kind,
            report.iterations_completed,
            report.elapsed_ms
        );

        Ok(report)
    }
}
