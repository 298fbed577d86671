//! # Operation Files
//!
//! Submissions are read from JSON lines, one [`Submission`] per line:
//!
//! ```text
//! # alice pays bob
//! {"caller":"0x…","op":"transfer","to":"0x…","amount":"250"}
//! ```
//!
//! The whole file is parsed before anything is applied; a malformed line
//! aborts the run with its line number. Replay then admits each submission
//! through a [`SharedLedger`] in file order and records one [`Outcome`] per
//! submission.

use anyhow::{Context, Result};
use ledger_contracts::{LedgerEvent, SharedLedger, Submission};
use serde::Serialize;
use std::io::BufRead;
use std::time::Instant;

use crate::metrics::LedgerMetrics;

/// A parsed submission and the 1-based line it came from.
#[derive(Debug, Clone)]
pub struct NumberedSubmission {
    pub line: usize,
    pub submission: Submission,
}

/// Result of one replayed submission, printed as a JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub seq: u64,
    pub line: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<LedgerEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// Totals for one replay run.
#[derive(Debug, Default)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
    pub outcomes: Vec<Outcome>,
}

/// Parses every submission in `reader`.
pub fn parse_submissions<R: BufRead>(reader: R) -> Result<Vec<NumberedSubmission>> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let submission: Submission = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid submission on line {}", line_no))?;
        out.push(NumberedSubmission {
            line: line_no,
            submission,
        });
    }
    Ok(out)
}

/// Applies `submissions` in order, recording metrics when given.
pub fn replay(
    ledger: &SharedLedger,
    submissions: &[NumberedSubmission],
    metrics: Option<&LedgerMetrics>,
) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for entry in submissions {
        let op = entry.submission.call.name();
        let started = Instant::now();
        let admission = ledger.submit_submission(&entry.submission);
        let elapsed = started.elapsed().as_secs_f64();

        let outcome = match admission.result {
            Ok(receipt) => {
                summary.applied += 1;
                if let Some(m) = metrics {
                    m.observe_call(op, "ok", receipt.events.len(), elapsed);
                }
                Outcome {
                    seq: admission.seq,
                    line: entry.line,
                    op,
                    ok: true,
                    events: Some(receipt.events),
                    error: None,
                    code: None,
                }
            }
            Err(e) => {
                summary.rejected += 1;
                if let Some(m) = metrics {
                    m.observe_call(op, e.code(), 0, elapsed);
                }
                Outcome {
                    seq: admission.seq,
                    line: entry.line,
                    op,
                    ok: false,
                    events: None,
                    error: Some(e.to_string()),
                    code: Some(e.code()),
                }
            }
        };
        summary.outcomes.push(outcome);
    }

    if let Some(m) = metrics {
        m.holders
            .set(ledger.read(|l| l.holder_count()) as i64);
    }
    summary
}
