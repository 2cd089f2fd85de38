// Copyright (c) 2024 Mike Tsao

use duetto::prelude::*;

fn sequence(notes: &[(u8, usize, usize)]) -> QuantizedSequence {
    QuantizedSequence::new_with(
        notes
            .iter()
            .map(|(pitch, start, end)| Note::new(*pitch, *start, *end))
            .collect(),
        32,
    )
    .unwrap()
}

#[test]
fn consonant_pairs_are_untouched() {
    let primary = sequence(&[(60, 0, 8), (60, 8, 16)]);
    let secondary = sequence(&[(72, 0, 8), (67, 8, 16)]);
    assert_eq!(correct_discordance(&primary, secondary.clone(), 32), secondary);
}

#[test]
fn tritone_moves_to_a_fifth() {
    let primary = sequence(&[(60, 0, 8)]);
    let secondary = sequence(&[(66, 0, 8)]);
    let corrected = correct_discordance(&primary, secondary, 32);
    assert_eq!(corrected.notes(), &[Note::new(67, 0, 8)]);
}

#[test]
fn steps_past_the_scan_are_left_alone() {
    let primary = sequence(&[(60, 0, 8), (60, 16, 24)]);
    let secondary = sequence(&[(66, 0, 8), (66, 16, 24)]);
    let corrected = correct_discordance(&primary, secondary, 16);
    assert_eq!(corrected.notes()[0].pitch, 67);
    assert_eq!(corrected.notes()[1].pitch, 66);
}

#[test]
fn correcting_aligned_voices_twice_changes_nothing() {
    // Every secondary note lines up with a primary note, so each one is
    // judged against exactly one primary pitch.
    for base in 36..60u8 {
        let primary: Vec<_> = (0..8)
            .map(|i| (60 + (i as u8 * 5) % 12, i * 4, i * 4 + 4))
            .collect();
        let secondary: Vec<_> = (0..8)
            .map(|i| (base + i as u8, i * 4, i * 4 + 4))
            .collect();
        let primary = sequence(&primary);
        let once = correct_discordance(&primary, sequence(&secondary), 32);
        let twice = correct_discordance(&primary, once.clone(), 32);
        assert_eq!(once, twice, "second pass changed things for base {base}");
        assert!(once.notes().len() <= 8);
    }
}

#[test]
fn empty_voices_are_fine() {
    let primary = sequence(&[(60, 0, 8)]);
    assert!(correct_discordance(&primary, QuantizedSequence::empty(), 32).is_empty());
    let secondary = sequence(&[(66, 0, 8)]);
    assert_eq!(
        correct_discordance(&QuantizedSequence::empty(), secondary.clone(), 32),
        secondary
    );
}

#[test]
fn transposition_stops_at_the_bottom_of_the_range() {
    let mut s = sequence(&[(3, 0, 4), (60, 4, 8)]);
    s.transpose(-5);
    let pitches: Vec<u8> = s.notes().iter().map(|n| n.pitch).collect();
    assert_eq!(pitches, vec![0, 55]);
}
