//! Golden-output comparison
//!
//! Comparison is exact string equality. Nothing is normalized: a missing trailing newline or a `\r\n`
//! line ending is a mismatch.

/// Per-case verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    /// No golden output recorded; the case was never executed.
    Skipped,
    Mismatch { expected: String, actual: String },
}

impl CaseOutcome {
    pub fn is_mismatch(&self) -> bool {
        matches!(self, CaseOutcome::Mismatch { .. })
    }
}

/// Compare captured stdout against the golden output.
pub fn compare(expected: &str, actual: &str) -> CaseOutcome {
    if expected == actual {
        CaseOutcome::Passed
    } else {
        CaseOutcome::Mismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// Line-by-line diff of expected vs actual output.
///
/// Only differing lines are listed, `-` for expected and `+` for actual, each with its 1-based line
/// number. Lines are split on `\n` only, so a stray `\r` or a missing final newline still shows up.
pub fn line_diff(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.split('\n').collect();
    let actual_lines: Vec<&str> = actual.split('\n').collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut diff = String::new();

    for i in 0..max_lines {
        let exp = expected_lines.get(i);
        let act = actual_lines.get(i);
        if exp == act {
            continue;
        }
        if let Some(exp) = exp {
            diff.push_str(&format!("-{:4} | {}\n", i + 1, exp.escape_debug()));
        }
        if let Some(act) = act {
            diff.push_str(&format!("+{:4} | {}\n", i + 1, act.escape_debug()));
        }
    }

    diff
}
