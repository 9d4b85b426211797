//! Background execution of diagnostic jobs
//!
//! One job at a time on a worker thread; the UI thread only submits and
//! repaints.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::actions;
use crate::client::DiagnosticsApi;
use crate::dashboard::{lock, SharedDashboard};
use crate::pipeline::{self, FailurePolicy};
use crate::settings::FullDiagnosticDefaults;

/// Something the user asked for that needs the server
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    SystemInfo,
    Ping,
    PortTest,
    SpeedTest,
    MultiPing,
    FullDiagnostic,
    ExportReport,
}

pub type Notify = Arc<dyn Fn() + Send + Sync>;

pub struct Runner {
    state: SharedDashboard,
    api: Arc<dyn DiagnosticsApi>,
    defaults: FullDiagnosticDefaults,
    report_dir: PathBuf,
    is_running: Arc<Mutex<bool>>,
    notify: Notify,
}

impl Runner {
    pub fn new(
        state: SharedDashboard,
        api: Arc<dyn DiagnosticsApi>,
        defaults: FullDiagnosticDefaults,
        report_dir: PathBuf,
        notify: Notify,
    ) -> Self {
        Self {
            state,
            api,
            defaults,
            report_dir,
            is_running: Arc::new(Mutex::new(false)),
            notify,
        }
    }

    pub fn is_running(&self) -> bool {
        *self.is_running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start `job` on the worker thread.
    ///
    /// Returns `None` and logs a warning when another job is still running.
    pub fn submit(&self, job: Job) -> Option<JoinHandle<()>> {
        {
            let mut running = self.is_running.lock().unwrap_or_else(PoisonError::into_inner);
            if *running {
                lock(&self.state).log.warning("A diagnostic is already running, please wait");
                return None;
            }
            *running = true;
        }

        debug!(?job, "starting job");
        let state = Arc::clone(&self.state);
        let api = Arc::clone(&self.api);
        let is_running = Arc::clone(&self.is_running);
        let notify = Arc::clone(&self.notify);
        let defaults = self.defaults.clone();
        let report_dir = self.report_dir.clone();

        Some(thread::spawn(move || {
            execute(job, &state, api.as_ref(), &defaults, &report_dir);

            *is_running.lock().unwrap_or_else(PoisonError::into_inner) = false;
            notify();
        }))
    }
}

fn execute(
    job: Job,
    state: &SharedDashboard,
    api: &dyn DiagnosticsApi,
    defaults: &FullDiagnosticDefaults,
    report_dir: &std::path::Path,
) {
    match job {
        Job::SystemInfo => {
            actions::refresh_system_info(state, api);
        }
        Job::Ping => {
            actions::run_ping_test(state, api);
        }
        Job::PortTest => {
            actions::run_port_test(state, api);
        }
        Job::SpeedTest => {
            actions::run_speed_test(state, api);
        }
        Job::MultiPing => {
            actions::run_multi_ping_test(state, api);
        }
        Job::FullDiagnostic => {
            let policy = FailurePolicy::from_defaults(defaults);
            pipeline::run_full_diagnostic(state, api, defaults, policy);
        }
        Job::ExportReport => {
            actions::export_report(state, api, report_dir);
        }
    }
}
