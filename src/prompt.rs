//! Terminal-backed confirmation gate.

use colored::Colorize;
use metadata_validator::dates::{AmbiguousCandidates, DateOrder};
use metadata_validator::gate::{ConfirmationGate, GateDecision};
use std::io::{BufRead, Write};

/// Asks on stderr/stdin which reading of an ambiguous date is meant.
///
/// Enter accepts the default; `1`/`2` pick a reading; `s` skips and leaves
/// the date unresolved. End of input falls back to the default.
pub struct TerminalGate;

impl ConfirmationGate for TerminalGate {
    fn resolve_ambiguous_date(&self, raw: &str, candidates: &AmbiguousCandidates) -> GateDecision {
        let default = candidates.default_order;
        let choices = [default, default.other()];

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{} '{raw}' can be read two ways:", "Ambiguous date".yellow().bold());
        for (i, order) in choices.iter().enumerate() {
            let _ = writeln!(
                stderr,
                "  {}) {}  {}{}",
                i + 1,
                candidates.iso(*order),
                order.to_string().dimmed(),
                if i == 0 { " [default]" } else { "" }
            );
        }
        let _ = write!(stderr, "Choose [1/2, s to skip, Enter for default]: ");
        let _ = stderr.flush();

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => return GateDecision::UseDefault,
            Ok(_) => {}
        }

        parse_answer(&answer, &choices)
    }
}

fn parse_answer(answer: &str, choices: &[DateOrder; 2]) -> GateDecision {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => GateDecision::UseDefault,
        "1" => GateDecision::Chosen(choices[0]),
        "2" => GateDecision::Chosen(choices[1]),
        _ => GateDecision::Unresolved,
    }
}
