use std::sync::Arc;

use serde::Serialize;
use tradein_core::config::{AppConfig, LoadOptions};
use tradein_core::dialog::{VEHICLE_MAKE, VEHICLE_MODEL, VEHICLE_YEAR};
use tradein_core::{Clock, DialogAction, Dispatcher, IntentRequest, InvocationPhase};

use super::{CommandResult, EXIT_CHECK_FAILED};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, reason: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CHECK_FAILED };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass("config_validation", "configuration loaded and validated"));
            match config.clock.system_clock() {
                Ok(clock) => {
                    let clock: Arc<dyn Clock> = Arc::new(clock);
                    checks.push(DoctorCheck::pass(
                        "clock",
                        format!(
                            "current year is {} at UTC offset {}",
                            clock.current_year(),
                            config.clock.utc_offset
                        ),
                    ));
                    let dispatcher = Dispatcher::from_config(&config, Arc::clone(&clock));
                    checks.push(check_rejects_stale_year(&config, &dispatcher));
                    checks.push(check_accepts_inventory(
                        &config,
                        &dispatcher,
                        clock.current_year(),
                    ));
                }
                Err(error) => {
                    checks.push(DoctorCheck::fail("clock", error.to_string()));
                    let reason = "the clock did not load";
                    checks.push(DoctorCheck::skipped("dialog_rejects_stale_year", reason));
                    checks.push(DoctorCheck::skipped("dialog_accepts_inventory", reason));
                }
            }
        }
        Err(error) => {
            let reason = "configuration did not load";
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            checks.push(DoctorCheck::skipped("clock", reason));
            checks.push(DoctorCheck::skipped("dialog_rejects_stale_year", reason));
            checks.push(DoctorCheck::skipped("dialog_accepts_inventory", reason));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// The year at the inventory floor is never accepted, whatever the clock says.
fn check_rejects_stale_year(config: &AppConfig, dispatcher: &Dispatcher) -> DoctorCheck {
    const NAME: &str = "dialog_rejects_stale_year";
    let request = collecting_turn(config)
        .with_slot(VEHICLE_YEAR, config.inventory.min_year_exclusive.to_string());

    match dispatcher.dispatch(request) {
        Ok(response) => match response.dialog_action {
            DialogAction::ElicitSlot { slot_to_elicit, .. } if slot_to_elicit == VEHICLE_YEAR => {
                DoctorCheck::pass(NAME, format!("collecting turn re-elicits {VEHICLE_YEAR}"))
            }
            other => DoctorCheck::fail(
                NAME,
                format!("expected ElicitSlot on {VEHICLE_YEAR}, got {}", other.kind()),
            ),
        },
        Err(error) => DoctorCheck::fail(NAME, error.to_string()),
    }
}

fn check_accepts_inventory(
    config: &AppConfig,
    dispatcher: &Dispatcher,
    current_year: i32,
) -> DoctorCheck {
    const NAME: &str = "dialog_accepts_inventory";
    let inventory = &config.inventory;
    let (Some(make), Some(model)) = (inventory.makes.first(), inventory.models.first()) else {
        return DoctorCheck::fail(NAME, "inventory has no makes or models to try");
    };

    let request = collecting_turn(config)
        .with_slot(VEHICLE_YEAR, current_year.to_string())
        .with_slot(VEHICLE_MAKE, make.trim())
        .with_slot(VEHICLE_MODEL, model.trim());

    match dispatcher.dispatch(request) {
        Ok(response) => match response.dialog_action {
            DialogAction::Delegate { .. } => {
                DoctorCheck::pass(NAME, format!("{current_year} {make} {model} is delegated"))
            }
            other => DoctorCheck::fail(NAME, format!("expected Delegate, got {}", other.kind())),
        },
        Err(error) => DoctorCheck::fail(NAME, error.to_string()),
    }
}

fn collecting_turn(config: &AppConfig) -> IntentRequest {
    IntentRequest::new(InvocationPhase::Collecting, config.dialog.intent_name.clone())
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    lines.extend(report.checks.iter().map(|check| {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        format!("- [{marker}] {}: {}", check.name, check.details)
    }));
    lines.join("\n")
}
