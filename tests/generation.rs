// Copyright (c) 2024 Mike Tsao

use duetto::{
    oracles::{EchoOracle, FailingOracle, ScriptedOracle},
    prelude::*,
};
use midly::{MidiMessage, Smf, TrackEventKind};
use std::{sync::Arc, time::Duration};

const TIMEOUT: Duration = Duration::from_secs(10);

#[test]
fn both_voices_are_extended_each_iteration() {
    let oracle = ScriptedOracle::new_with(|seed, steps, temperature| {
        assert_eq!(temperature, 1.49);
        assert_eq!(steps, 32);
        EchoOracle::default().continue_sequence(seed, steps, temperature)
    });
    let driver = ContinuationDriver::new_with_rng(oracle, Rng::new_with_seed(1));
    let request = GenerationRequestBuilder::default()
        .repeat_count(3)
        .temperature(TemperatureChoice::Wild.temperature())
        .correct_discordance(false)
        .build()
        .unwrap();

    let primary = decode("l4 o5 c e g e");
    let secondary = decode("l2 o3 c g");
    let mut reports = Vec::default();
    let voices = driver
        .generate(&primary, &secondary, &request, &mut |p| reports.push(p))
        .unwrap();

    assert_eq!(driver.oracle().call_count(), 6);
    assert_eq!(reports.len(), 3);
    assert!(reports.windows(2).all(|w| w[0] < w[1]));
    assert!(float_cmp::approx_eq!(f64, reports[2], 0.9, ulps = 2));

    let t = voices.transposition;
    assert!((-5..=5).contains(&t));
    let expected: Vec<u8> = [72u8, 76, 79, 76, 72, 76, 79, 76]
        .iter()
        .map(|p| (*p as i16 + t as i16) as u8)
        .collect();
    let pitches: Vec<u8> = voices.primary.notes().iter().map(|n| n.pitch).collect();
    assert_eq!(pitches, expected);
    assert_eq!(voices.primary_timed.len(), voices.primary.notes().len());
    assert_eq!(voices.secondary_timed.len(), voices.secondary.notes().len());
}

#[test]
fn failed_generation_leaves_seeds_alone() {
    let driver = ContinuationDriver::new_with(FailingOracle::default());
    let primary = decode("l4 o4 cdef");
    let secondary = decode("l4 o3 c");
    let before = (primary.clone(), secondary.clone());
    let r = driver.generate(&primary, &secondary, &GenerationRequest::default(), &mut |_| {});
    assert!(matches!(r, Err(GenerationError::Oracle { .. })));
    assert_eq!((primary, secondary), before);
    assert!(!driver.is_generating());
}

#[test]
fn overlapping_generation_is_refused() {
    let (entered_tx, entered_rx) = crossbeam::channel::unbounded::<()>();
    let (release_tx, release_rx) = crossbeam::channel::unbounded::<()>();
    let oracle = ScriptedOracle::new_with(move |seed, steps, temperature| {
        let _ = entered_tx.send(());
        let _ = release_rx.recv();
        EchoOracle::default().continue_sequence(seed, steps, temperature)
    });
    let driver = Arc::new(ContinuationDriver::new_with(oracle));
    let request = GenerationRequestBuilder::default()
        .repeat_count(1)
        .build()
        .unwrap();

    let worker = {
        let driver = Arc::clone(&driver);
        let request = request.clone();
        std::thread::spawn(move || {
            driver.generate(
                &decode("l4 o4 cdef"),
                &decode("l2 o3 cg"),
                &request,
                &mut |_| {},
            )
        })
    };
    assert!(entered_rx.recv_timeout(TIMEOUT).is_ok());
    assert!(driver.is_generating());

    let mut reports = Vec::default();
    let r = driver.generate(
        &decode("l4 o4 c"),
        &decode("l4 o3 c"),
        &request,
        &mut |p| reports.push(p),
    );
    assert!(matches!(r, Err(GenerationError::Busy)));
    assert!(reports.is_empty());

    let _ = release_tx.send(());
    let _ = release_tx.send(());
    assert!(worker.join().unwrap().is_ok());
    assert!(!driver.is_generating());
    assert_eq!(driver.oracle().call_count(), 2);
}

#[test]
fn session_round_trip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = Session::new_with(ContinuationDriver::new_with_rng(
        EchoOracle::default(),
        Rng::new_with_seed(42),
    ));
    session.origin_mut().set_mml("l8 o5 ceg>c<bgec", "l4 o3 c g f g");
    session.settings_mut().set_repeat_count(RepeatChoice::Once);
    session.generate(&mut |_| {}).unwrap();
    let saved = session.save_json().unwrap();

    let mut restored = Session::new_with(ContinuationDriver::new_with(EchoOracle::default()));
    restored.load_json(&saved).unwrap();
    assert_eq!(restored.snapshot(), session.snapshot());
    assert_eq!(restored.settings(), session.settings());
    assert_eq!(restored.generated().primary(), session.generated().primary());
    assert_eq!(restored.origin().secondary(), session.origin().secondary());

    assert!(restored.load_json("[1, 2, 3]").is_err());
    assert_eq!(restored.snapshot(), session.snapshot());
}

#[test]
fn generated_voices_export_to_midi() {
    let driver = ContinuationDriver::new_with_rng(EchoOracle::default(), Rng::new_with_seed(3));
    let voices = driver
        .generate(
            &decode("l4 o4 cdef"),
            &decode("l2 o3 cg"),
            &GenerationRequest::default(),
            &mut |_| {},
        )
        .unwrap();
    let bytes = MidiUtils::voices_to_smf_bytes(&voices.primary, &voices.secondary).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 3);

    let note_ons = |track: usize| {
        smf.tracks[track]
            .iter()
            .filter(|e| {
                matches!(
                    e.kind,
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { .. },
                        ..
                    }
                )
            })
            .count()
    };
    assert_eq!(note_ons(1), voices.primary.notes().len());
    assert_eq!(note_ons(2), voices.secondary.notes().len());
}
