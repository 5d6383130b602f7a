use super::*;
use crate::animation::phase::TimingConfig;
use crate::effects::direction::ChannelSelector;
use crate::effects::filter::{FilterWrite, RecordingFilter};
use crate::schedule::queue::FrameQueue;
use std::cell::Cell;
use std::rc::Rc;

type TestController = DisintegrationController<RecordingFilter, StdRng>;

fn controller() -> TestController {
    DisintegrationController::with_rng(Some(RecordingFilter::new()), StdRng::seed_from_u64(7))
}

fn config(direction: Direction) -> EffectConfig {
    EffectConfig {
        direction,
        timing: TimingConfig::new(200.0, 400.0, 200.0, 1200.0),
        ..EffectConfig::default()
    }
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    (count, move || c.set(c.get() + 1))
}

/// One display refresh: fire frame callbacks, then drain deferred ones.
fn refresh(ctrl: &mut TestController, q: &mut FrameQueue, now: f64) -> Vec<FrameReport> {
    let mut out = Vec::new();
    for h in q.begin_frame() {
        out.extend(ctrl.fire(h, now, q));
    }
    while let Some(h) = q.pop_deferred() {
        out.extend(ctrl.fire(h, now, q));
    }
    out
}

#[test]
fn start_resets_filter_and_seeds() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (_, done) = counter();

    assert!(ctrl.start(&config(Direction::Left), done, 1000.0, &mut q));

    let state = ctrl.run_state();
    assert!(state.active);
    assert_eq!(state.phase, Phase::Initial);
    assert_eq!(state.start_time, Some(1000.0));
    assert!(state.frame_handle.is_some());
    assert_eq!(ctrl.state(), ControllerState::Initial);
    assert_eq!(q.pending(), 1);

    let writes = ctrl.filter().unwrap().writes().to_vec();
    assert_eq!(writes[0], FilterWrite::Scale(0.0));
    assert!(matches!(writes[1], FilterWrite::Noise(_)));
    let FilterWrite::Seed(seed) = writes[2] else {
        panic!("expected seed write, got {:?}", writes[2]);
    };
    assert!(seed < SEED_RANGE);
    assert_eq!(ctrl.seed(), Some(seed));
}

#[test]
fn second_start_is_a_silent_no_op() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (count, done) = counter();
    let (count2, done2) = counter();

    assert!(ctrl.start(&config(Direction::Up), done, 0.0, &mut q));
    let before = *ctrl.run_state();
    let writes_before = ctrl.filter().unwrap().writes().len();

    assert!(!ctrl.start(&config(Direction::Left), done2, 500.0, &mut q));
    assert_eq!(*ctrl.run_state(), before);
    assert_eq!(ctrl.filter().unwrap().writes().len(), writes_before);
    assert_eq!(ctrl.runs_started(), 1);
    assert_eq!(q.pending(), 1);

    let mut now = 0.0;
    while ctrl.is_active() {
        now += 16.0;
        refresh(&mut ctrl, &mut q, now);
    }
    assert_eq!(count.get(), 1);
    assert_eq!(count2.get(), 0);
}

#[test]
fn ticks_follow_the_reference_timeline() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (_, done) = counter();
    ctrl.start(&config(Direction::Random), done, 100.0, &mut q);

    let r = refresh(&mut ctrl, &mut q, 100.0);
    assert_eq!((r[0].phase, r[0].intensity, r[0].scale), (Phase::Initial, 0.0, 0.0));

    let r = refresh(&mut ctrl, &mut q, 300.0);
    assert_eq!((r[0].phase, r[0].progress, r[0].intensity), (Phase::FadeIn, 0.0, 0.0));

    let r = refresh(&mut ctrl, &mut q, 700.0);
    assert_eq!((r[0].phase, r[0].intensity), (Phase::Hold, 0.3));
    assert_eq!(r[0].scale, 0.3 * 1200.0);
    assert_eq!(ctrl.state(), ControllerState::Hold);

    let r = refresh(&mut ctrl, &mut q, 900.0);
    assert_eq!((r[0].phase, r[0].intensity), (Phase::FadeOut, 0.3));

    let r = refresh(&mut ctrl, &mut q, 2099.0);
    assert_eq!(r[0].phase, Phase::FadeOut);
    assert!(r[0].intensity < 1.0);
}

#[test]
fn complete_pushes_zero_scale_and_defers_finalize() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (count, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);

    let h = q.begin_frame()[0];
    let report = ctrl.fire(h, 2000.0, &mut q).unwrap();
    assert_eq!(report.phase, Phase::Complete);
    assert_eq!(report.progress, 1.0);
    assert_eq!(report.scale, 0.0);

    // Completion detected, but not yet finalized inside the same callback.
    assert_eq!(ctrl.state(), ControllerState::Complete);
    assert!(ctrl.is_active());
    assert_eq!(count.get(), 0);
    assert!(q.begin_frame().is_empty());

    let deferred = q.pop_deferred().unwrap();
    assert_eq!(ctrl.fire(deferred, 2000.0, &mut q), None);
    assert_eq!(count.get(), 1);
    assert!(ctrl.run_state().is_idle());
    assert_eq!(ctrl.state(), ControllerState::Idle);
    assert_eq!(ctrl.filter().unwrap().state().scale, 0.0);
    assert!(q.is_idle());
}

#[test]
fn left_pushes_exact_selectors_every_tick() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (_, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);
    refresh(&mut ctrl, &mut q, 10.0);
    refresh(&mut ctrl, &mut q, 700.0);

    let expected = ChannelPair {
        x: ChannelSelector::R,
        y: ChannelSelector::G,
    };
    let channel_writes: Vec<_> = ctrl
        .filter()
        .unwrap()
        .writes()
        .iter()
        .filter(|w| matches!(w, FilterWrite::Channels(_)))
        .copied()
        .collect();
    assert_eq!(
        channel_writes,
        vec![FilterWrite::Channels(expected), FilterWrite::Channels(expected)]
    );
}

#[test]
fn random_pushes_scale_only() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (_, done) = counter();
    ctrl.start(&config(Direction::Random), done, 0.0, &mut q);
    let r = refresh(&mut ctrl, &mut q, 700.0);
    assert_eq!(r[0].channels, None);
    let f = ctrl.filter().unwrap();
    assert!(
        !f.writes()
            .iter()
            .any(|w| matches!(w, FilterWrite::Channels(_)))
    );
    assert_eq!(f.state().scale, 0.3 * 1200.0);
}

#[test]
fn cancel_stops_scheduling_without_completion() {
    for cancel_at in [0.0, 250.0, 650.0, 1000.0, 1999.0] {
        let mut ctrl = controller();
        let mut q = FrameQueue::new();
        let (count, done) = counter();
        ctrl.start(&config(Direction::Up), done, 0.0, &mut q);

        let mut now: f64 = 0.0;
        while now < cancel_at {
            now += 50.0;
            refresh(&mut ctrl, &mut q, now.min(cancel_at));
            if !ctrl.is_active() {
                break;
            }
        }
        ctrl.cancel(&mut q);

        assert!(q.is_idle(), "scheduled work left after cancel at {cancel_at}");
        assert!(ctrl.run_state().is_idle());
        assert!(refresh(&mut ctrl, &mut q, now + 16.0).is_empty());
        assert_eq!(count.get(), 0, "cancel at {cancel_at} notified completion");
        assert_eq!(ctrl.filter().unwrap().state().scale, 0.0);
    }
}

#[test]
fn cancel_while_finalize_is_deferred_drops_completion() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (count, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);

    // Fire the frame callback alone so the deferred finalize stays queued.
    let h = q.begin_frame()[0];
    let r = ctrl.fire(h, 2000.0, &mut q);
    assert_eq!(r.map(|r| r.phase), Some(Phase::Complete));
    assert_eq!(ctrl.state(), ControllerState::Complete);
    assert!(!q.is_idle());

    ctrl.cancel(&mut q);
    assert!(q.is_idle());
    assert_eq!(q.pop_deferred(), None);
    assert_eq!(count.get(), 0);
    assert_eq!(ctrl.state(), ControllerState::Idle);
    assert_eq!(ctrl.filter().unwrap().state().scale, 0.0);
}

#[test]
fn cancel_is_idempotent_and_safe_when_idle() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    ctrl.cancel(&mut q);
    assert!(ctrl.run_state().is_idle());
    assert!(ctrl.filter().unwrap().writes().is_empty());

    let (_, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);
    ctrl.cancel(&mut q);
    ctrl.cancel(&mut q);
    assert!(ctrl.run_state().is_idle());
    assert!(q.is_idle());
}

#[test]
fn stale_handles_are_ignored() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (_, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);
    let first = q.begin_frame()[0];
    ctrl.cancel(&mut q);

    let (_, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);
    assert_eq!(ctrl.fire(first, 10.0, &mut q), None);
    assert_eq!(ctrl.state(), ControllerState::Initial);
    assert_eq!(q.pending(), 1);
}

#[test]
fn missing_filter_skips_pushes_but_keeps_ticking() {
    let mut ctrl: TestController =
        DisintegrationController::with_rng(None, StdRng::seed_from_u64(1));
    let mut q = FrameQueue::new();
    let (count, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);

    let r = refresh(&mut ctrl, &mut q, 700.0);
    assert!(!r[0].pushed);
    assert_eq!(q.pending(), 1);

    // Mount mid-run: the late filter receives the run's noise and seed, then the next scale.
    assert!(ctrl.attach_filter(RecordingFilter::new()).is_none());
    let seed = ctrl.seed();
    assert_eq!(ctrl.filter().unwrap().state().seed, seed);
    let r = refresh(&mut ctrl, &mut q, 900.0);
    assert!(r[0].pushed);
    assert_eq!(r[0].phase, Phase::FadeOut);
    assert_eq!(
        ctrl.filter().unwrap().state().scale,
        (0.3 + 100.0 / 1200.0 * 0.7) * 1200.0
    );

    refresh(&mut ctrl, &mut q, 5000.0);
    assert_eq!(count.get(), 1);
    assert_eq!(ctrl.filter().unwrap().state().scale, 0.0);
}

#[test]
fn zero_duration_timing_completes_on_first_tick() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (count, done) = counter();
    let cfg = EffectConfig {
        timing: TimingConfig::new(0.0, 0.0, 0.0, 0.0),
        ..EffectConfig::default()
    };
    ctrl.start(&cfg, done, 0.0, &mut q);
    let r = refresh(&mut ctrl, &mut q, 0.0);
    assert_eq!(r[0].phase, Phase::Complete);
    assert_eq!(r[0].scale, 0.0);
    assert_eq!(count.get(), 1);
    assert!(ctrl.run_state().is_idle());
}

#[test]
fn phase_never_regresses_when_the_clock_steps_back() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (_, done) = counter();
    ctrl.start(&config(Direction::Up), done, 0.0, &mut q);
    refresh(&mut ctrl, &mut q, 700.0);
    let r = refresh(&mut ctrl, &mut q, 100.0);
    assert_eq!(r[0].phase, Phase::Hold);
    assert_eq!(r[0].elapsed, 700.0);
    assert_eq!(ctrl.run_state().phase, Phase::Hold);
}

#[test]
fn second_run_after_finalize_behaves_like_the_first() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let mut per_run = Vec::new();

    for run in 0..2 {
        let (count, done) = counter();
        let t0 = 10_000.0 * f64::from(run);
        assert!(ctrl.start(&config(Direction::Left), done, t0, &mut q));
        let mut reports = Vec::new();
        let mut now = t0;
        while ctrl.is_active() {
            reports.extend(refresh(&mut ctrl, &mut q, now));
            now += 100.0;
        }
        assert_eq!(count.get(), 1);
        assert!(ctrl.run_state().is_idle());
        assert_eq!(ctrl.filter().unwrap().state().scale, 0.0);
        per_run.push(
            reports
                .iter()
                .map(|r| (r.elapsed, r.phase, r.scale))
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(per_run[0], per_run[1]);
    assert_eq!(ctrl.runs_started(), 2);
}

#[test]
fn explicit_finalize_notifies_once() {
    let mut ctrl = controller();
    let mut q = FrameQueue::new();
    let (count, done) = counter();
    ctrl.start(&config(Direction::Left), done, 0.0, &mut q);
    ctrl.finalize(&mut q);
    ctrl.finalize(&mut q);
    assert_eq!(count.get(), 1);
    assert!(q.is_idle());
    assert!(ctrl.run_state().is_idle());
}
