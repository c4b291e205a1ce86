//! Success policy - decides whether a probe outcome is the one we are waiting for

use crate::domain::ProbeOutcome;

/// Classification of a probe outcome, ordered by how loudly it is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Status equals the configured success status
    Matched,
    /// Endpoint answered, but with a different status
    Unmatched,
    /// Endpoint could not be reached
    TransportFailure,
}

/// True iff the outcome carries no transport error and its status equals `success_status`
pub fn matches(outcome: &ProbeOutcome, success_status: u16) -> bool {
    match outcome {
        ProbeOutcome::Status(code) => *code == success_status,
        ProbeOutcome::TransportError(_) => false,
    }
}

/// Success predicate bound to a configured status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessPolicy {
    success_status: u16,
}

impl SuccessPolicy {
    pub fn new(success_status: u16) -> Self {
        Self { success_status }
    }

    pub fn matches(&self, outcome: &ProbeOutcome) -> bool {
        matches(outcome, self.success_status)
    }

    pub fn evaluate(&self, outcome: &ProbeOutcome) -> Verdict {
        match outcome {
            ProbeOutcome::TransportError(_) => Verdict::TransportFailure,
            _ if self.matches(outcome) => Verdict::Matched,
            ProbeOutcome::Status(_) => Verdict::Unmatched,
        }
    }
}

impl Default for SuccessPolicy {
    fn default() -> Self {
        Self::new(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProbeError;

    #[test]
    fn test_matching_status() {
        assert!(matches(&ProbeOutcome::Status(404), 404));
        assert!(matches(&ProbeOutcome::Status(200), 200));
    }

    #[test]
    fn test_other_status_never_matches() {
        for code in [100, 200, 201, 301, 403, 405, 500, 503] {
            assert!(!matches(&ProbeOutcome::Status(code), 404), "status {} matched", code);
        }
    }

    #[test]
    fn test_transport_error_never_matches() {
        let errors = [
            ProbeError::Timeout,
            ProbeError::Connect("refused".into()),
            ProbeError::Request("reset".into()),
            ProbeError::Cancelled,
        ];
        for err in errors {
            assert!(!matches(&ProbeOutcome::TransportError(err), 404));
        }
    }

    #[test]
    fn test_default_policy_is_404() {
        let policy = SuccessPolicy::default();
        assert!(policy.matches(&ProbeOutcome::Status(404)));
        assert!(!policy.matches(&ProbeOutcome::Status(200)));
    }

    #[test]
    fn test_evaluate_verdicts() {
        let policy = SuccessPolicy::new(404);
        assert_eq!(policy.evaluate(&ProbeOutcome::Status(404)), Verdict::Matched);
        assert_eq!(policy.evaluate(&ProbeOutcome::Status(200)), Verdict::Unmatched);
        assert_eq!(
            policy.evaluate(&ProbeOutcome::TransportError(ProbeError::Timeout)),
            Verdict::TransportFailure
        );
    }

    #[test]
    fn test_policy_matches_delegates() {
        let policy = SuccessPolicy::new(200);
        assert!(policy.matches(&ProbeOutcome::Status(200)));
        assert!(!policy.matches(&ProbeOutcome::Status(404)));
    }
}
