//! Drives the full runner over a scripted engine transcript.

use std::io::Cursor;

use armada_bot::runner::run;
use armada_core::config::Config;
use armada_core::protocol::{parse_moves, Move};

// Two players far apart, each with a planet at hand: no rush, no
// abandonment, plain expansion play.
const SNAPSHOT: &str = "2 \
    0 1 1 10 80 255 0 0 0 -1 0 0 \
    1 1 2 230 80 255 0 0 0 -1 0 0 \
    2 \
    5 30 80 2000 5 3 0 990 0 0 0 \
    6 225 80 2000 5 3 0 990 0 0 0";

#[test]
fn one_turn_game_produces_a_move_line() {
    let transcript = format!("0\n240 160\n{SNAPSHOT}\n{SNAPSHOT}\n");
    let mut input = Cursor::new(transcript.into_bytes());
    let mut output: Vec<u8> = Vec::new();

    let summary = run(&mut input, &mut output, &Config::default(), "testbot").unwrap();
    assert_eq!(summary.player_id, 0);
    assert_eq!(summary.turns, 1);
    assert_eq!(summary.commands_sent, 1);

    let raw = String::from_utf8(output).unwrap();
    let mut lines = raw.lines();
    assert_eq!(lines.next(), Some("testbot"));

    // One open planet 20 units west-to-east: full thrust straight at it.
    let move_line = lines.next().unwrap();
    let moves = parse_moves(move_line).unwrap();
    assert_eq!(
        moves,
        vec![Move::Thrust {
            ship_id: 1,
            magnitude: 7,
            angle: 0
        }]
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn multi_turn_game_emits_one_line_per_snapshot() {
    let transcript = format!("0\n240 160\n{SNAPSHOT}\n{SNAPSHOT}\n{SNAPSHOT}\n{SNAPSHOT}\n");
    let mut input = Cursor::new(transcript.into_bytes());
    let mut output: Vec<u8> = Vec::new();

    let summary = run(&mut input, &mut output, &Config::default(), "testbot").unwrap();
    assert_eq!(summary.turns, 3);

    let raw = String::from_utf8(output).unwrap();
    // Name line plus one move line per turn.
    assert_eq!(raw.lines().count(), 4);
}

#[test]
fn truncated_handshake_is_an_error_not_a_hang() {
    let mut input = Cursor::new(b"0\n240 160\n".to_vec());
    let mut output: Vec<u8> = Vec::new();
    assert!(run(&mut input, &mut output, &Config::default(), "testbot").is_err());
}
