//! Full diagnostic: every check, one after another

use std::sync::Mutex;

use tracing::info;

use crate::actions::{self, StepOutcome};
use crate::client::DiagnosticsApi;
use crate::dashboard::{lock, Dashboard, Inputs};
use crate::settings::FullDiagnosticDefaults;

/// What to do when a step does not complete
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip the remaining steps
    Halt,
    Continue,
}

impl FailurePolicy {
    pub fn from_defaults(defaults: &FullDiagnosticDefaults) -> Self {
        if defaults.continue_on_failure {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Halt
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    SystemInfo,
    Ping,
    PortTest,
    MultiPing,
    SpeedTest,
}

/// Execution order of the full diagnostic
pub const FULL_DIAGNOSTIC: [Step; 5] = [
    Step::SystemInfo,
    Step::Ping,
    Step::PortTest,
    Step::MultiPing,
    Step::SpeedTest,
];

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::SystemInfo => "system information",
            Step::Ping => "ping",
            Step::PortTest => "port test",
            Step::MultiPing => "multi-ping",
            Step::SpeedTest => "speed test",
        }
    }

    fn announcement(self, defaults: &FullDiagnosticDefaults) -> String {
        match self {
            Step::SystemInfo => "Fetching system information...".to_string(),
            Step::Ping => format!("Ping test to {}...", defaults.ping_target),
            Step::PortTest => format!(
                "Testing port {} on {}...",
                defaults.port, defaults.port_target
            ),
            Step::MultiPing => "Multiple ping tests...".to_string(),
            Step::SpeedTest => "Internet speed test...".to_string(),
        }
    }

    /// Write this step's default inputs
    fn prepare(self, inputs: &mut Inputs, defaults: &FullDiagnosticDefaults) {
        match self {
            Step::Ping => inputs.ping_target.clone_from(&defaults.ping_target),
            Step::PortTest => {
                inputs.port_target.clone_from(&defaults.port_target);
                inputs.port = defaults.port.to_string();
            }
            Step::MultiPing => inputs
                .multi_ping_targets
                .clone_from(&defaults.multi_ping_targets),
            Step::SystemInfo | Step::SpeedTest => {}
        }
    }

    fn run(self, state: &Mutex<Dashboard>, api: &dyn DiagnosticsApi) -> StepOutcome {
        match self {
            Step::SystemInfo => actions::refresh_system_info(state, api),
            Step::Ping => actions::run_ping_test(state, api),
            Step::PortTest => actions::run_port_test(state, api),
            Step::MultiPing => actions::run_multi_ping_test(state, api),
            Step::SpeedTest => actions::run_speed_test(state, api),
        }
    }
}

/// Per-step outcomes of one full run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineReport {
    pub outcomes: Vec<(Step, StepOutcome)>,
    pub halted: bool,
}

impl PipelineReport {
    pub fn all_completed(&self) -> bool {
        !self.halted
            && self.outcomes.len() == FULL_DIAGNOSTIC.len()
            && self.outcomes.iter().all(|(_, o)| o.is_success())
    }

    pub fn failed_steps(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| !o.is_success()).count()
    }
}

/// Clear the log and run every check in order, awaiting each one.
pub fn run_full_diagnostic(
    state: &Mutex<Dashboard>,
    api: &dyn DiagnosticsApi,
    defaults: &FullDiagnosticDefaults,
    policy: FailurePolicy,
) -> PipelineReport {
    {
        let mut dash = lock(state);
        dash.log.clear();
        dash.log.info("Starting full network diagnostic...");
    }

    let mut report = PipelineReport::default();
    for (index, step) in FULL_DIAGNOSTIC.into_iter().enumerate() {
        {
            let mut dash = lock(state);
            dash.log.info(format!("{}. {}", index + 1, step.announcement(defaults)));
            step.prepare(&mut dash.inputs, defaults);
        }

        let outcome = step.run(state, api);
        report.outcomes.push((step, outcome));

        if !outcome.is_success() && policy == FailurePolicy::Halt {
            report.halted = true;
            lock(state).log.error(format!(
                "Full diagnostic stopped: step {} ({}) did not complete",
                index + 1,
                step.name()
            ));
            info!(step = step.name(), "full diagnostic halted");
            return report;
        }
    }

    let mut dash = lock(state);
    if report.all_completed() {
        dash.log.success("Full network diagnostic completed successfully");
    } else {
        dash.log.warning(format!(
            "Full network diagnostic finished with {} failed step(s)",
            report.failed_steps()
        ));
    }
    info!(failed = report.failed_steps(), "full diagnostic finished");
    report
}
