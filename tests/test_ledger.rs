use std::fs;

use flappy_bird::entities::HighScoreEntry;
use flappy_bird::ledger::*;

fn entry(name: &str, score: f32) -> HighScoreEntry {
    HighScoreEntry {
        name: name.to_string(),
        score,
    }
}

fn scores(ledger: &Ledger) -> Vec<f32> {
    ledger.entries().iter().map(|e| e.score).collect()
}

/// In-memory ledger holding the given (name, score) pairs.
fn ledger_with(rows: &[(&str, f32)]) -> Ledger {
    let mut ledger = Ledger::in_memory(5);
    for (name, score) in rows {
        assert!(ledger.submit(Some(*name), *score));
    }
    ledger
}

fn answer(name: &'static str) -> impl FnMut(&str) -> Option<String> {
    move |_: &str| Some(name.to_string())
}

// ── sanitize_name ─────────────────────────────────────────────────────────────

#[test]
fn sanitize_keeps_plain_names() {
    assert_eq!(sanitize_name("Ana"), Some("Ana".to_string()));
    assert_eq!(sanitize_name("R2_D2"), Some("R2_D2".to_string()));
}

#[test]
fn sanitize_trims_and_flattens_whitespace() {
    assert_eq!(sanitize_name("  Ana\tMaria \n"), Some("Ana Maria".to_string()));
}

#[test]
fn sanitize_drops_punctuation_and_accents() {
    assert_eq!(sanitize_name("José Pérez!"), Some("Jos Prez".to_string()));
    assert_eq!(sanitize_name("ÁLVARO-99"), Some("LVARO99".to_string()));
}

#[test]
fn sanitize_rejects_empty_results() {
    assert_eq!(sanitize_name(""), None);
    assert_eq!(sanitize_name("   "), None);
    assert_eq!(sanitize_name("áéíóú"), None);
    assert_eq!(sanitize_name(" !? "), None);
}

// ── qualification & insertion ────────────────────────────────────────────────

#[test]
fn empty_ledger_accepts_first_score() {
    let mut ledger = Ledger::in_memory(5);
    let accepted = ledger.record_candidate(10.0, &mut answer("Ana"));
    assert!(accepted);
    assert_eq!(ledger.entries(), &[entry("Ana", 10.0)]);
}

#[test]
fn full_ledger_inserts_in_rank_and_evicts_lowest() {
    let mut ledger = ledger_with(&[("a", 50.0), ("b", 40.0), ("c", 30.0), ("d", 20.0), ("e", 10.0)]);
    let accepted = ledger.record_candidate(25.0, &mut answer("new"));
    assert!(accepted);
    assert_eq!(scores(&ledger), vec![50.0, 40.0, 30.0, 25.0, 20.0]);
    assert_eq!(ledger.entries()[3].name, "new");
}

#[test]
fn whitespace_name_is_rejected() {
    let mut ledger = ledger_with(&[("a", 3.0)]);
    let accepted = ledger.record_candidate(10.0, &mut answer("   "));
    assert!(!accepted);
    assert_eq!(ledger.entries(), &[entry("a", 3.0)]);
}

#[test]
fn cancelled_prompt_is_rejected() {
    let mut ledger = Ledger::in_memory(5);
    let accepted = ledger.record_candidate(10.0, &mut |_: &str| -> Option<String> { None });
    assert!(!accepted);
    assert!(ledger.entries().is_empty());
}

#[test]
fn low_score_on_full_ledger_never_prompts() {
    let mut ledger = ledger_with(&[("a", 50.0), ("b", 40.0), ("c", 30.0), ("d", 20.0), ("e", 10.0)]);
    let mut asked = 0;
    let accepted = ledger.record_candidate(10.0, &mut |_: &str| -> Option<String> {
        asked += 1;
        Some("x".to_string())
    });
    assert!(!accepted);
    assert_eq!(asked, 0);
    assert_eq!(scores(&ledger), vec![50.0, 40.0, 30.0, 20.0, 10.0]);
}

#[test]
fn prompt_receives_new_record_message() {
    let mut ledger = Ledger::in_memory(5);
    let mut seen = String::new();
    ledger.record_candidate(1.0, &mut |msg: &str| -> Option<String> {
        seen = msg.to_string();
        None
    });
    assert_eq!(seen, NEW_RECORD_PROMPT);
}

#[test]
fn qualifies_on_room_or_beating_an_entry() {
    let ledger = ledger_with(&[("a", 5.0)]);
    assert!(ledger.qualifies(0.0)); // room left
    let full = ledger_with(&[("a", 5.0), ("b", 4.0), ("c", 3.0), ("d", 2.0), ("e", 1.0)]);
    assert!(full.qualifies(1.5));
    assert!(!full.qualifies(1.0));
}

#[test]
fn ties_keep_insertion_order() {
    let ledger = ledger_with(&[("first", 10.0), ("top", 20.0), ("second", 10.0)]);
    let names: Vec<_> = ledger.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["top", "first", "second"]);
}

#[test]
fn never_more_than_capacity_and_always_descending() {
    let mut ledger = Ledger::in_memory(5);
    for (i, score) in [3.0, 7.5, 1.0, 9.0, 7.5, 2.0, 12.0, 0.5, 8.0].iter().enumerate() {
        ledger.submit(Some(format!("p{}", i).as_str()), *score);
        assert!(ledger.entries().len() <= 5);
        let s = scores(&ledger);
        assert!(s.windows(2).all(|w| w[0] >= w[1]), "{:?}", s);
    }
    assert_eq!(scores(&ledger), vec![12.0, 9.0, 8.0, 7.5, 7.5]);
}

// ── store format ─────────────────────────────────────────────────────────────

#[test]
fn render_writes_one_line_per_entry() {
    let text = render_entries(&[entry("Ana", 10.0), entry("Bo Li", 2.5)]);
    assert_eq!(text, "Ana 10.0\nBo Li 2.5\n");
}

#[test]
fn format_score_matches_store_text() {
    assert_eq!(format_score(10.0), "10.0");
    assert_eq!(format_score(2.5), "2.5");
}

#[test]
fn parse_reads_names_with_spaces() {
    let entries = parse_entries("Ana Maria 12.5\nBo 3.0\n\n").unwrap();
    assert_eq!(entries, vec![entry("Ana Maria", 12.5), entry("Bo", 3.0)]);
}

#[test]
fn parse_rejects_garbage() {
    assert!(parse_entries("Ana ten\n").is_err());
    assert!(parse_entries("lonely\n").is_err());
    assert!(parse_entries(" 4.0\n").is_err());
}

// ── persistence ──────────────────────────────────────────────────────────────

#[test]
fn missing_store_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::load_from(dir.path().join("scores.txt"), 5);
    assert!(ledger.entries().is_empty());
}

#[test]
fn corrupt_store_loads_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "Ana 10.0\n%%% not a score\n").unwrap();

    let mut ledger = Ledger::load_from(&path, 5);
    assert!(ledger.entries().is_empty());

    assert!(ledger.submit(Some("Bo"), 4.0));
    assert_eq!(fs::read_to_string(&path).unwrap(), "Bo 4.0\n");
}

#[test]
fn accepted_entry_rewrites_whole_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "Ana 10.0\nBo 5.0\n").unwrap();

    let mut ledger = Ledger::load_from(&path, 5);
    assert!(ledger.record_candidate(7.5, &mut answer("Cy")));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Ana 10.0\nCy 7.5\nBo 5.0\n"
    );
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");

    let mut ledger = Ledger::load_from(&path, 5);
    for (name, score) in [("Ana", 10.0), ("Bo Li", 22.5), ("Cy", 0.5), ("Di", 10.0)] {
        assert!(ledger.submit(Some(name), score));
    }

    let reloaded = Ledger::load_from(&path, 5);
    assert_eq!(reloaded.entries(), ledger.entries());
}

#[test]
fn oversized_unsorted_store_is_ranked_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "a 1.0\nb 6.0\nc 3.0\nd 5.0\ne 2.0\nf 4.0\n").unwrap();

    let ledger = Ledger::load_from(&path, 5);
    assert_eq!(scores(&ledger), vec![6.0, 5.0, 4.0, 3.0, 2.0]);
}

#[test]
fn failed_save_keeps_entry_in_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("scores.txt");

    let mut ledger = Ledger::load_from(&path, 5);
    assert!(ledger.submit(Some("Ana"), 10.0));
    assert_eq!(ledger.entries(), &[entry("Ana", 10.0)]);
    assert!(ledger.save().is_err());
}

#[test]
fn rejected_candidate_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    fs::write(&path, "Ana 10.0\n").unwrap();

    let mut ledger = Ledger::load_from(&path, 5);
    assert!(!ledger.submit(Some("  "), 12.0));
    assert_eq!(fs::read_to_string(&path).unwrap(), "Ana 10.0\n");
}
