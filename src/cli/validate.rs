use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use plugvet::checks::builtin_checks;
use plugvet::config::PolicyFile;
use plugvet::net::HttpRegistryClient;
use plugvet::{CancelFlag, CheckSet, RunConfig, RunReport, Runner, SeverityPolicy};

pub(crate) fn run(
    archive_dir: PathBuf,
    source: Option<PathBuf>,
    policy_path: Option<PathBuf>,
    report_all: bool,
    format: super::Format,
) {
    if !archive_dir.is_dir() {
        eprintln!(
            "error: `{}` is not a directory; pass the extracted archive location",
            archive_dir.display()
        );
        exit(2);
    }

    let checks = match builtin_checks(Arc::new(HttpRegistryClient::new())) {
        Ok(checks) => checks,
        Err(err) => {
            eprintln!("error: {err}");
            exit(2);
        }
    };

    let mut policy = load_policy(policy_path.as_deref(), &checks);
    if report_all {
        policy.set_announce_all(true);
    }

    let config = RunConfig {
        archive_dir,
        source_dir: source,
        policy,
        cancel: CancelFlag::new(),
    };
    let report = match Runner::new(checks).validate(config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            exit(2);
        }
    };

    match format {
        super::Format::Json => print_json(&report),
        super::Format::Text => print_text(&report),
    }
    for failure in &report.failures {
        eprintln!("warning: check `{}` failed: {}", failure.check, failure.error);
    }

    exit(i32::from(report.has_errors()));
}

fn load_policy(path: Option<&std::path::Path>, checks: &CheckSet) -> SeverityPolicy {
    let Some(path) = path else {
        return SeverityPolicy::new();
    };
    match PolicyFile::load(path) {
        Ok(file) => file.seed(checks),
        Err(err) => {
            eprintln!("error: cannot load policy file `{}`: {err}", path.display());
            exit(2);
        }
    }
}

fn print_json(report: &RunReport) {
    match serde_json::to_string_pretty(&report.findings) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("error: cannot serialize findings: {err}");
            exit(2);
        }
    }
}

fn print_text(report: &RunReport) {
    if report.findings.is_empty() {
        println!("No findings.");
        return;
    }
    for finding in &report.findings {
        println!("{finding}");
        if !finding.detail.is_empty() {
            println!("  {}", finding.detail);
        }
    }
}
