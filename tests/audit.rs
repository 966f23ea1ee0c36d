//! End-to-end audit scenarios over the pure pipeline seams: topic map
//! construction, tallying, requirement checking, and exit-status policy.
//! The RPC layer is exercised separately; these tests feed synthetic
//! log records.

use alloy_primitives::{Address, B256, Bytes};

use event_soundness::audit::tally::{EventTallier, missing_required};
use event_soundness::audit::topics::TopicMap;
use event_soundness::models::common::{AuditResult, BlockRange, EventSignature, LogRecord};
use event_soundness::report::{EXIT_CLEAN, EXIT_FINDINGS, exit_code};

fn erc20_events() -> Vec<EventSignature> {
    vec![
        EventSignature {
            name: "Transfer".to_string(),
            inputs: vec![
                "address".to_string(),
                "address".to_string(),
                "uint256".to_string(),
            ],
        },
        EventSignature {
            name: "Approval".to_string(),
            inputs: vec![
                "address".to_string(),
                "address".to_string(),
                "uint256".to_string(),
            ],
        },
    ]
}

fn record(topic: B256, block_number: u64) -> LogRecord {
    LogRecord {
        topic,
        block_number,
        address: Address::repeat_byte(0x42),
        data: Bytes::new(),
    }
}

/// Run the post-fetch half of the pipeline the way `audit::run` does.
fn reconcile(
    events: &[EventSignature],
    records: &[LogRecord],
    required: &[String],
) -> AuditResult {
    let topics = TopicMap::build(events).unwrap();
    let mut tallier = EventTallier::new(&topics);
    tallier.ingest(records);

    let total_logs = tallier.total();
    let (tally, unknown_topics) = tallier.finalize();
    let missing = missing_required(required, &tally);

    AuditResult {
        chain_id: 1,
        address: Address::repeat_byte(0x42),
        block_range: BlockRange {
            from: 20_000_000,
            to: 20_005_000,
        },
        total_logs,
        tally,
        unknown_topics,
        required_events: required.to_vec(),
        missing_required: missing,
    }
}

#[test]
fn unknown_topic_alongside_known_events_is_a_finding() {
    let events = vec![erc20_events().remove(0)]; // Transfer only
    let transfer = events[0].topic();
    let stray = B256::repeat_byte(0xcc);

    let records = vec![
        record(transfer, 20_000_010),
        record(transfer, 20_001_600),
        record(stray, 20_002_000),
        record(transfer, 20_004_900),
    ];

    let result = reconcile(&events, &records, &[]);

    assert_eq!(result.total_logs, 4);
    let transfer_entry = result
        .tally
        .iter()
        .find(|e| e.matched_name.as_deref() == Some("Transfer"))
        .unwrap();
    assert_eq!(transfer_entry.count, 3);
    assert_eq!(result.unknown_topics, vec![stray]);
    assert!(result.missing_required.is_empty());
    assert_eq!(exit_code(&result), EXIT_FINDINGS);
}

#[test]
fn missing_required_event_is_a_finding_even_with_no_unknown_topics() {
    let events = erc20_events();
    let transfer = events[0].topic();
    let required = vec!["Approval".to_string()];

    let records = vec![record(transfer, 20_000_100), record(transfer, 20_003_000)];

    let result = reconcile(&events, &records, &required);

    assert!(result.unknown_topics.is_empty());
    assert_eq!(result.missing_required, vec!["Approval"]);
    assert_eq!(exit_code(&result), EXIT_FINDINGS);
}

#[test]
fn all_known_and_all_required_observed_is_clean() {
    let events = erc20_events();
    let transfer = events[0].topic();
    let approval = events[1].topic();
    let required = vec!["Transfer".to_string(), "Approval".to_string()];

    let records = vec![
        record(transfer, 20_000_100),
        record(approval, 20_001_000),
        record(transfer, 20_004_999),
    ];

    let result = reconcile(&events, &records, &required);

    assert!(result.is_clean());
    assert_eq!(result.total_logs, 3);
    assert!(result.unknown_topics.is_empty());
    assert!(result.missing_required.is_empty());
    assert_eq!(exit_code(&result), EXIT_CLEAN);
}

#[test]
fn empty_range_with_requirements_reports_all_as_missing() {
    let events = erc20_events();
    let required = vec!["Transfer".to_string()];

    let result = reconcile(&events, &[], &required);

    assert_eq!(result.total_logs, 0);
    assert!(result.tally.is_empty());
    assert_eq!(result.missing_required, vec!["Transfer"]);
    assert_eq!(exit_code(&result), EXIT_FINDINGS);
}
