//! Chronometer + rule set: the polling loop the CLI runs, on a fake clock.

use melodic_chrono::event::{format_elapsed, Chrono, PlayState, RuleSet};

/// Tick the chronometer every `tick` ms of wall time from `from` to `to`,
/// returning (elapsed window end, note) for every emitted note.
fn play(
    chrono: &mut Chrono,
    rules: &mut RuleSet,
    from: u64,
    to: u64,
    tick: u64,
) -> Vec<(u64, String)> {
    let mut out = Vec::new();
    let mut now = from;
    while now <= to {
        if let Some(window) = chrono.tick(now) {
            for e in rules.notes_in(window) {
                out.push((window.end_ms, e.note.to_string()));
            }
        }
        now += tick;
    }
    out
}

#[test]
fn plays_on_schedule_from_arbitrary_wall_clock() {
    let mut rules = RuleSet::compile("every 1s play C", 250).unwrap();
    let mut chrono = Chrono::new();
    chrono.start();
    let notes = play(&mut chrono, &mut rules, 1_000_000, 1_003_500, 16);
    let times: Vec<u64> = notes.iter().map(|(t, _)| *t).collect();
    assert_eq!(times.len(), 3);
    assert!(times[0] >= 1_000 && times[0] < 1_016);
}

#[test]
fn pause_does_not_skip_or_replay_notes() {
    let mut rules = RuleSet::compile("every 1s play C,E scale", 250).unwrap();
    let mut chrono = Chrono::new();
    chrono.start();

    let before = play(&mut chrono, &mut rules, 0, 1_500, 10);
    chrono.stop(1_505);
    // Nothing happens while paused, however long.
    assert!(play(&mut chrono, &mut rules, 1_510, 60_000, 10).is_empty());
    assert_eq!(chrono.state(), PlayState::Stopped);

    chrono.start();
    let after = play(&mut chrono, &mut rules, 60_010, 61_010, 10);

    let names: Vec<&str> = before
        .iter()
        .chain(&after)
        .map(|(_, n)| n.as_str())
        .collect();
    assert_eq!(names, vec!["C", "E"]);
    assert!(after[0].0 >= 2_000 && after[0].0 < 2_020);
}

#[test]
fn reset_restarts_both_clock_and_rules() {
    let mut rules =
        RuleSet::compile("every 1s play C,E,G arpeggio\nat 500ds play D", 250).unwrap();
    let mut chrono = Chrono::new();
    chrono.start();
    play(&mut chrono, &mut rules, 0, 2_100, 16);

    chrono.reset();
    rules.reset();
    let replay = play(&mut chrono, &mut rules, 10_000, 11_100, 16);
    assert_eq!(replay.len(), 1);
    assert_eq!(replay[0].1, "C");
}

#[test]
fn display_tracks_elapsed() {
    let mut chrono = Chrono::new();
    chrono.start();
    chrono.tick(500);
    chrono.tick(90_600);
    assert_eq!(format_elapsed(chrono.elapsed(90_600)), "00:01:30.1");
}
