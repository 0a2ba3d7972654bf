use assert_matches::assert_matches;

use leapling::arithmetic::{ArithmeticPhase, ArithmeticSession, UnitSource, POINTS_PER_SOLVE};
use leapling::problems::{AdditionProblem, Theme};
use leapling::recorder::{MemoryRecorder, SessionRecorder};

fn session_with_problem(a: u32, b: u32) -> (ArithmeticSession, MemoryRecorder) {
    let recorder = MemoryRecorder::new();
    let mut session = ArithmeticSession::new(60, Box::new(recorder.clone()));
    session.start();
    session.phase = ArithmeticPhase::BuildingSum {
        problem: AdditionProblem::new(a, b, Theme::Ducks),
        taken_a: 0,
        taken_b: 0,
        sum: 0,
    };
    (session, recorder)
}

#[test]
fn filling_the_sum_pays_out_once() {
    let (mut session, _recorder) = session_with_problem(2, 3);

    session.add_unit(UnitSource::PileA);
    session.add_unit(UnitSource::PileA);
    session.add_unit(UnitSource::PileB);
    session.add_unit(UnitSource::PileB);
    assert_matches!(session.phase, ArithmeticPhase::BuildingSum { sum: 4, .. });

    session.add_unit(UnitSource::PileB);
    assert_matches!(
        session.phase,
        ArithmeticPhase::Feedback { correct: true, .. }
    );
    assert_eq!(session.score, POINTS_PER_SOLVE);
    assert_eq!(session.attempts, 1);
    assert_eq!(session.correct_attempts, 1);
    assert_eq!(session.current_streak, 1);
    assert!(session.praise.is_some());
}

#[test]
fn units_past_the_target_are_rejected() {
    let (mut session, _recorder) = session_with_problem(2, 3);
    for _ in 0..5 {
        session.add_unit(UnitSource::Tap);
    }
    assert_matches!(session.phase, ArithmeticPhase::Feedback { .. });

    session.add_unit(UnitSource::Tap);
    assert_matches!(session.phase, ArithmeticPhase::Feedback { .. });
    assert!(session.stop_cue);
    assert_eq!(session.score, POINTS_PER_SOLVE);
    assert_eq!(session.attempts, 1);
}

#[test]
fn an_exhausted_pile_gives_nothing() {
    let (mut session, _recorder) = session_with_problem(1, 2);
    session.add_unit(UnitSource::PileA);
    session.add_unit(UnitSource::PileA);

    assert_matches!(
        session.phase,
        ArithmeticPhase::BuildingSum {
            taken_a: 1,
            sum: 1,
            ..
        }
    );
    assert!(!session.stop_cue);
}

#[test]
fn confirm_only_acts_after_the_pause() {
    let (mut session, _recorder) = session_with_problem(1, 1);

    session.confirm();
    assert_matches!(session.phase, ArithmeticPhase::BuildingSum { .. });

    session.add_unit(UnitSource::Tap);
    session.add_unit(UnitSource::Tap);
    assert_matches!(session.phase, ArithmeticPhase::Feedback { .. });

    session.confirm();
    assert_matches!(session.phase, ArithmeticPhase::Feedback { .. });

    for _ in 0..18 {
        session.on_tick();
    }
    assert_matches!(session.phase, ArithmeticPhase::AwaitingConfirmation { .. });

    session.confirm();
    assert_matches!(
        session.phase,
        ArithmeticPhase::BuildingSum {
            taken_a: 0,
            taken_b: 0,
            sum: 0,
            ..
        }
    );
}

#[test]
fn stop_cue_clears_after_its_timer() {
    let (mut session, _recorder) = session_with_problem(1, 1);
    session.add_unit(UnitSource::Tap);
    session.add_unit(UnitSource::Tap);
    session.add_unit(UnitSource::Tap);
    assert!(session.stop_cue);

    for _ in 0..15 {
        session.on_tick();
    }
    assert!(!session.stop_cue);
}

#[test]
fn round_expiry_records_a_summary() {
    let recorder = MemoryRecorder::new();
    let mut session = ArithmeticSession::new(1, Box::new(recorder.clone()));
    session.start();
    session.phase = ArithmeticPhase::BuildingSum {
        problem: AdditionProblem::new(2, 1, Theme::Apples),
        taken_a: 0,
        taken_b: 0,
        sum: 0,
    };
    session.add_unit(UnitSource::Tap);
    session.add_unit(UnitSource::Tap);
    session.add_unit(UnitSource::Tap);

    for _ in 0..10 {
        session.on_tick();
    }

    assert_matches!(session.phase, ArithmeticPhase::RoundOver);
    let summary = session.last_summary.clone().expect("summary");
    assert_eq!(summary.score, POINTS_PER_SOLVE);
    assert_eq!(summary.items_completed, 1);
    assert_eq!(summary.accuracy_percent, 100.0);
    assert_eq!(recorder.load_all().unwrap().len(), 1);
    assert!(!session.stop_cue);
    assert!(session.praise.is_none());
}

#[test]
fn stopping_early_still_records() {
    let recorder = MemoryRecorder::new();
    let mut session = ArithmeticSession::new(60, Box::new(recorder.clone()));
    session.start();
    session.stop();

    assert_matches!(session.phase, ArithmeticPhase::RoundOver);
    let summary = session.last_summary.clone().expect("summary");
    assert_eq!(summary.score, 0);
    assert_eq!(summary.accuracy_percent, 0.0);
    assert_eq!(recorder.load_all().unwrap().len(), 1);
}
