use crate::models::types::{ActionOutcome, ResultReport, TargetOutcome};

/// Classify a finished batch.
///
/// `AlreadyInState` is not a failure; those targets are listed separately so
/// the reply can mention them.
pub fn render(outcomes: &[TargetOutcome]) -> ResultReport {
    if outcomes.is_empty() {
        return ResultReport::NoTargets;
    }

    let failed = names_where(outcomes, ActionOutcome::is_failure);
    let unchanged = names_where(outcomes, |o| *o == ActionOutcome::AlreadyInState);
    let succeeded = outcomes.len() - failed.len();

    if failed.is_empty() {
        ResultReport::AllSucceeded {
            count: succeeded,
            unchanged,
        }
    } else if succeeded == 0 {
        ResultReport::AllFailed { failed }
    } else {
        ResultReport::Partial {
            succeeded,
            failed,
            unchanged,
        }
    }
}

fn names_where(outcomes: &[TargetOutcome], pred: impl Fn(&ActionOutcome) -> bool) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| pred(&o.outcome))
        .map(|o| o.target.name.clone())
        .collect()
}

/// Join names for a sentence: "A", "A and B", "A, B, and C".
pub fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [first, second] => format!("{} and {}", first.as_ref(), second.as_ref()),
        [init @ .., last] => {
            let mut out = String::new();
            for name in init {
                out.push_str(name.as_ref());
                out.push_str(", ");
            }
            out.push_str("and ");
            out.push_str(last.as_ref());
            out
        }
    }
}
