use clap::ValueEnum;
use serde::Serialize;

use crate::models::common::AuditResult;

/// Exit code for a clean audit.
pub const EXIT_CLEAN: u8 = 0;
/// Exit code for operational failures (config, network, provider).
pub const EXIT_OPERATIONAL: u8 = 1;
/// Exit code when the audit completed but found unknown topics or
/// missing required events.
pub const EXIT_FINDINGS: u8 = 2;

/// How many unknown topics the human summary prints before eliding.
const UNKNOWN_SAMPLE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text summary
    Human,
    /// Machine-parsable JSON document
    Json,
}

/// The full run report: the audit result plus run-level context that is
/// not part of the result proper.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub rpc: &'a str,
    pub step: u64,
    pub elapsed_seconds: f64,
    #[serde(flatten)]
    pub result: &'a AuditResult,
}

impl Report<'_> {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.render_human(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
        }
    }

    fn render_human(&self) -> String {
        let result = self.result;
        let mut out = String::new();

        out.push_str("event-soundness audit\n");
        out.push_str(&format!("  RPC:      {}\n", self.rpc));
        out.push_str(&format!("  Chain ID: {}\n", result.chain_id));
        out.push_str(&format!("  Address:  {}\n", result.address));
        out.push_str(&format!(
            "  Blocks:   [{}, {}] (step {})\n",
            result.block_range.from, result.block_range.to, self.step
        ));
        out.push_str(&format!("  Logs:     {}\n", result.total_logs));

        if result.tally.is_empty() {
            out.push_str("\nNo events observed in the given range.\n");
        } else {
            out.push_str("\nEvent counts:\n");
            for entry in &result.tally {
                match &entry.matched_name {
                    Some(name) => out.push_str(&format!("  {:>8}  {}\n", entry.count, name)),
                    None => out.push_str(&format!("  {:>8}  UNKNOWN {}\n", entry.count, entry.topic)),
                }
            }
        }

        if result.unknown_topics.is_empty() {
            out.push_str("\nNo unknown event topics detected.\n");
        } else {
            out.push_str(&format!(
                "\nUnknown topics (not in ABI): {}\n",
                result.unknown_topics.len()
            ));
            for topic in result.unknown_topics.iter().take(UNKNOWN_SAMPLE_LIMIT) {
                out.push_str(&format!("  {topic}\n"));
            }
            if result.unknown_topics.len() > UNKNOWN_SAMPLE_LIMIT {
                out.push_str(&format!(
                    "  ... and {} more\n",
                    result.unknown_topics.len() - UNKNOWN_SAMPLE_LIMIT
                ));
            }
        }

        if !result.missing_required.is_empty() {
            out.push_str(&format!(
                "\nMissing required events: {}\n",
                result.missing_required.join(", ")
            ));
        } else if !result.required_events.is_empty() {
            out.push_str("\nAll required events were observed at least once.\n");
        }

        out.push_str(&format!("\nCompleted in {:.2}s\n", self.elapsed_seconds));
        out
    }
}

/// Findings are reported through the exit status, never through errors:
/// 0 only when the observed topics and the required list both check out.
pub fn exit_code(result: &AuditResult) -> u8 {
    if result.is_clean() { EXIT_CLEAN } else { EXIT_FINDINGS }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::{BlockRange, TallyEntry};
    use alloy_primitives::{Address, B256};

    fn result(unknown: Vec<B256>, missing: Vec<String>) -> AuditResult {
        AuditResult {
            chain_id: 1,
            address: Address::ZERO,
            block_range: BlockRange { from: 100, to: 200 },
            total_logs: 3,
            tally: vec![TallyEntry {
                topic: B256::repeat_byte(0x11),
                matched_name: Some("Transfer".to_string()),
                count: 3,
            }],
            unknown_topics: unknown,
            required_events: vec!["Transfer".to_string()],
            missing_required: missing,
        }
    }

    #[test]
    fn clean_audit_exits_zero() {
        assert_eq!(exit_code(&result(vec![], vec![])), EXIT_CLEAN);
    }

    #[test]
    fn unknown_topics_are_findings() {
        let result = result(vec![B256::repeat_byte(0xab)], vec![]);
        assert_eq!(exit_code(&result), EXIT_FINDINGS);
    }

    #[test]
    fn missing_required_is_findings_even_without_unknown_topics() {
        let result = result(vec![], vec!["Approval".to_string()]);
        assert_eq!(exit_code(&result), EXIT_FINDINGS);
    }

    #[test]
    fn json_report_round_trips_key_fields() {
        let result = result(vec![B256::repeat_byte(0xab)], vec![]);
        let report = Report {
            rpc: "http://localhost:8545",
            step: 2_000,
            elapsed_seconds: 1.25,
            result: &result,
        };

        let value: serde_json::Value = serde_json::from_str(&report.render(OutputFormat::Json)).unwrap();
        assert_eq!(value["chain_id"], 1);
        assert_eq!(value["total_logs"], 3);
        assert_eq!(value["step"], 2_000);
        assert_eq!(value["tally"][0]["matched_name"], "Transfer");
        assert_eq!(value["tally"][0]["count"], 3);
        assert_eq!(value["unknown_topics"].as_array().unwrap().len(), 1);
        assert_eq!(value["block_range"]["from"], 100);
    }

    #[test]
    fn human_report_bounds_unknown_topic_sample() {
        let unknown: Vec<B256> = (0..15u8).map(B256::repeat_byte).collect();
        let result = result(unknown, vec![]);
        let report = Report {
            rpc: "http://localhost:8545",
            step: 2_000,
            elapsed_seconds: 0.5,
            result: &result,
        };

        let text = report.render(OutputFormat::Human);
        assert!(text.contains("Unknown topics (not in ABI): 15"));
        assert!(text.contains("... and 5 more"));
    }
}
