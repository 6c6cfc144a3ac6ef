//! Integration tests for sources, aggregation, ranking, search, detail and export.

use std::collections::HashSet;
use std::path::Path;

use assert_fs::prelude::*;
use chrono::{TimeZone, Utc};
use predicates::prelude::*;

use contactrank::aggregate::ingest;
use contactrank::error::ScanError;
use contactrank::export::csv::export_csv;
use contactrank::model::address::{normalize_address, RecipientRef, RecipientRole};
use contactrank::model::contact::NO_SUBJECT;
use contactrank::model::message::MessageRecord;
use contactrank::query::{detail, filter, rank};
use contactrank::session::Session;
use contactrank::source::{open_source, JsonBatchSource, MboxSource, MessageSource, SourceFormat};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn scanned(name: &str) -> Session {
    let mut source = open_source(&fixture(name), SourceFormat::Auto).unwrap();
    let mut session = Session::default();
    session.scan(source.as_mut()).unwrap();
    session
}

// ─── JSON batch: directory contents ─────────────────────────────────

#[test]
fn test_json_batch_directory() {
    let session = scanned("batch.json");
    let dir = session.directory();

    assert_eq!(session.messages_scanned(), 3);
    assert_eq!(dir.len(), 3, "blank and missing addresses are dropped");

    let a = dir.get("a@x.com").unwrap();
    assert_eq!(a.primary_count(), 2);
    assert_eq!(a.total_count(), 2);
    assert_eq!(a.display_name(), "Alice", "later 'Alice Cooper' must not win");

    let b = dir.get("b@x.com").unwrap();
    assert_eq!(b.copy_count(), 1);
    assert_eq!(b.display_name(), "b@x.com");

    let carol = dir.get("CAROL@y.org").unwrap();
    assert_eq!(carol.blind_copy_count(), 1);
    assert_eq!(carol.copy_count(), 1);
    assert_eq!(carol.address(), "carol@y.org");
}

// ─── Ranking: descending, ties in first-seen order ──────────────────

#[test]
fn test_json_batch_ranking() {
    let session = scanned("batch.json");
    let order: Vec<&str> = session
        .ranked()
        .iter()
        .map(|c| c.normalized_address())
        .collect();
    assert_eq!(order, vec!["a@x.com", "carol@y.org", "b@x.com"]);
}

// ─── Detail: newest first, defaulted subject ───────────────────────

#[test]
fn test_json_batch_detail() {
    let session = scanned("batch.json");
    let d = session.detail("carol@y.org").unwrap();

    assert_eq!(d.recent_history.len(), 2);
    assert_eq!(d.recent_history[0].subject, NO_SUBJECT);
    assert_eq!(d.recent_history[0].role, RecipientRole::Copy);
    assert_eq!(d.recent_history[1].subject, "Re: Hi");
    assert_eq!(d.recent_history[1].role, RecipientRole::BlindCopy);
    assert_eq!(d.overflow_count, 0);
}

// ─── MBOX source gives the same answer as the worked example ───────

#[test]
fn test_mbox_worked_example() {
    let session = scanned("sample.mbox");
    let dir = session.directory();

    assert_eq!(session.messages_scanned(), 2);
    assert_eq!(dir.len(), 2, "the From: header is not a recipient");

    let a = dir.get("a@x.com").unwrap();
    assert_eq!(a.primary_count(), 2);
    assert_eq!(a.display_name(), "Alice");

    let d = detail(a);
    assert_eq!(d.recent_history[0].subject, "Re: Hi");
    assert_eq!(d.recent_history[1].subject, "Hi");
    assert_eq!(
        d.recent_history[0].received_at,
        Some(Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap())
    );

    assert_eq!(session.ranked()[0].normalized_address(), "a@x.com");
}

// ─── Failure at the source leaves the previous scan in place ───────

#[test]
fn test_failed_scan_keeps_previous_results() {
    let mut session = Session::default();
    session
        .scan(&mut JsonBatchSource::new(fixture("batch.json")))
        .unwrap();

    let temp = assert_fs::TempDir::new().unwrap();
    let broken = temp.child("broken.json");
    broken.write_str("{\"messages\": 42}").unwrap();

    let err = session
        .scan(&mut JsonBatchSource::new(broken.path()))
        .unwrap_err();
    assert!(matches!(err, ScanError::InvalidBatch { .. }));
    assert_eq!(session.directory().len(), 3);

    let err = session
        .scan(&mut MboxSource::new(temp.path().join("missing.mbox")))
        .unwrap_err();
    assert!(matches!(err, ScanError::FileNotFound(_)));
    assert_eq!(session.messages_scanned(), 3);
}

#[test]
fn test_non_mbox_file_is_an_error_not_an_empty_scan() {
    let mut session = Session::default();
    session
        .scan(&mut JsonBatchSource::new(fixture("batch.json")))
        .unwrap();

    // `.txt` resolves to MBOX under auto-detection.
    let temp = assert_fs::TempDir::new().unwrap();
    let inbox = temp.child("inbox.txt");
    inbox
        .write_str(&std::fs::read_to_string(fixture("batch.json")).unwrap())
        .unwrap();

    let mut source = open_source(inbox.path(), SourceFormat::Auto).unwrap();
    let err = session.scan(source.as_mut()).unwrap_err();
    assert!(matches!(err, ScanError::InvalidMbox(_)));
    assert_eq!(session.directory().len(), 3);
}

#[test]
fn test_describe_names_the_file() {
    let source = MboxSource::new(fixture("sample.mbox"));
    assert!(source.describe().contains("sample.mbox"));
}

// ─── Properties over a generated batch ──────────────────────────────

fn generated_batch() -> Vec<MessageRecord> {
    let people = [
        "Ann@a.com", "ann@a.com", "bo@b.com", "cy@c.com", "", "DEE@d.com", "eve@e.com",
    ];
    (0..60u32)
        .map(|i| {
            let mut m = MessageRecord::new(
                format!("msg {i}"),
                Utc.with_ymd_and_hms(2024, 1 + i % 12, 1 + i % 28, 8, 0, 0).unwrap(),
            );
            for (j, role) in RecipientRole::ALL.iter().enumerate() {
                let k = (i as usize * (j + 3) + j) % people.len();
                m = m.with_recipient(RecipientRef::new(*role, people[k]));
                if i % 5 == 0 {
                    let k2 = (k + 2) % people.len();
                    m = m.with_recipient(RecipientRef::new(*role, people[k2]));
                }
            }
            m
        })
        .collect()
}

#[test]
fn test_count_conservation_per_role() {
    let batch = generated_batch();
    let dir = ingest(&batch);

    for role in RecipientRole::ALL {
        let expected: HashSet<String> = batch
            .iter()
            .flat_map(|m| m.recipients_in(role))
            .filter_map(|r| r.usable_address())
            .map(normalize_address)
            .collect();
        let with_role = dir.iter().filter(|c| c.count_for(role) > 0).count();
        assert_eq!(with_role, expected.len(), "role {role}");
    }
}

#[test]
fn test_invariants_and_monotonic_ranking() {
    let dir = ingest(&generated_batch());
    for c in &dir {
        assert_eq!(
            c.total_count(),
            c.primary_count() + c.copy_count() + c.blind_copy_count()
        );
        assert_eq!(c.total_count(), c.history().len());
    }

    let ranked = rank(&dir);
    assert_eq!(ranked.len(), dir.len());
    for pair in ranked.windows(2) {
        assert!(pair[0].total_count() >= pair[1].total_count());
    }
}

#[test]
fn test_idempotent_rebuild() {
    let batch = generated_batch();
    let once = ingest(&batch);
    let twice = ingest(&batch);
    assert_eq!(once, twice);
    assert_eq!(rank(&once), rank(&twice));
}

#[test]
fn test_filter_properties() {
    let dir = ingest(&generated_batch());
    let ranked = rank(&dir);
    assert_eq!(filter(&ranked, ""), ranked);
    assert_eq!(filter(&ranked, "ANN"), filter(&ranked, "ann"));
    assert_eq!(filter(&ranked, "ann").len(), 1);
}

#[test]
fn test_detail_bound() {
    let dir = ingest(&generated_batch());
    for c in &dir {
        let d = detail(c);
        assert!(d.recent_history.len() <= 10);
        assert_eq!(d.overflow_count, c.history().len().saturating_sub(10));
        for pair in d.recent_history.windows(2) {
            assert!(pair[0].received_at >= pair[1].received_at);
        }
    }
}

// ─── CSV export ─────────────────────────────────────────────────────

#[test]
fn test_export_csv_file() {
    let session = scanned("batch.json");
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("contacts.csv");

    export_csv(&session.search("x.com"), out.path(), ',').unwrap();

    out.assert(predicate::path::exists());
    out.assert(predicate::str::contains("Address,Name,To,CC,BCC,Total"));
    out.assert(predicate::str::contains("a@x.com,Alice,2,0,0,2"));
    out.assert(predicate::str::contains("b@x.com,b@x.com,0,1,0,1"));

    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.starts_with('\u{feff}'), "UTF-8 BOM expected");
    assert!(!written.contains("carol"));
}
