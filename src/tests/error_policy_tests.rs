use crate::error::ReweightError;
use crate::{ErrorPolicy, EXIT_FAILED, EXIT_OK, EXIT_REFUSED};
use anyhow::Context;

const QUIET: ErrorPolicy = ErrorPolicy { verbose: false, silent: false };
const SILENT: ErrorPolicy = ErrorPolicy { verbose: false, silent: true };
const SILENT_VERBOSE: ErrorPolicy = ErrorPolicy { verbose: true, silent: true };

fn refusal() -> anyhow::Error {
    ReweightError::InsufficientData("only 1 OSDs (2 needed)".into()).into()
}

#[test]
fn test_refusal_always_exits_refused() {
    for policy in [QUIET, SILENT, SILENT_VERBOSE] {
        assert_eq!(policy.exit_status(&refusal()), EXIT_REFUSED);
    }
}

#[test]
fn test_refusal_behind_context_is_still_a_refusal() {
    let err = Err::<(), _>(ReweightError::InvalidParameter("overload 90".into()))
        .context("planning pass")
        .unwrap_err();
    assert_eq!(QUIET.exit_status(&err), EXIT_REFUSED);
}

#[test]
fn test_silent_suppresses_other_errors() {
    let err = anyhow::Error::from(ReweightError::ExternalCall("ceph exited with 1".into()));
    assert_eq!(SILENT.exit_status(&err), EXIT_OK);
    assert_eq!(SILENT.exit_status(&anyhow::anyhow!("broken pipe")), EXIT_OK);
}

#[test]
fn test_verbose_overrides_silent() {
    assert_eq!(SILENT_VERBOSE.exit_status(&anyhow::anyhow!("broken pipe")), EXIT_FAILED);
}

#[test]
fn test_errors_fail_by_default() {
    assert_eq!(QUIET.exit_status(&anyhow::anyhow!("broken pipe")), EXIT_FAILED);
}
