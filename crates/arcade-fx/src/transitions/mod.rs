//! Full-screen transition state machine.
//!
//! Idle until `start`; Running advances progress from 0 to 1 over the
//! duration, fires the completion callback once, then returns to Idle or
//! continues with the next queued step of a sequence.

mod kind;

pub use kind::{dissolve_blocks, TransitionKind, DISSOLVE_BLOCK};

use std::collections::VecDeque;

use crate::color::Color;
use crate::renderer::Surface;

/// Completion callback, invoked at most once.
pub type Callback = Box<dyn FnOnce()>;

pub const GAME_OVER_RED: Color = Color::rgb(0.35, 0.0, 0.02);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionStep {
    pub kind: TransitionKind,
    /// Length in ms. Zero or negative completes on the next update.
    pub duration: f32,
    pub color: Color,
}

impl TransitionStep {
    pub fn new(kind: TransitionKind, duration: f32) -> Self {
        Self {
            kind,
            duration,
            color: Color::BLACK,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

struct Running {
    step: TransitionStep,
    elapsed: f32,
    progress: f32,
    on_complete: Option<Callback>,
}

enum State {
    Idle,
    Running(Running),
}

pub struct TransitionMachine {
    state: State,
    queue: VecDeque<TransitionStep>,
    on_sequence_complete: Option<Callback>,
}

impl Default for TransitionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionMachine {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            queue: VecDeque::new(),
            on_sequence_complete: None,
        }
    }

    /// Start a single transition. Replaces whatever was running; callbacks of
    /// the replaced transition or sequence are dropped without firing.
    pub fn start(&mut self, kind: TransitionKind, duration: f32, on_complete: Option<Callback>) {
        self.start_step(TransitionStep::new(kind, duration), on_complete);
    }

    pub fn start_step(&mut self, step: TransitionStep, on_complete: Option<Callback>) {
        self.queue.clear();
        self.on_sequence_complete = None;
        self.begin(step, on_complete);
    }

    /// Run `steps` back to back, then call `on_complete`.
    pub fn sequence(
        &mut self,
        steps: impl IntoIterator<Item = TransitionStep>,
        on_complete: Option<Callback>,
    ) {
        self.state = State::Idle;
        self.queue = steps.into_iter().collect();
        self.on_sequence_complete = on_complete;
        self.advance_queue();
    }

    fn begin(&mut self, step: TransitionStep, on_complete: Option<Callback>) {
        log::debug!("transition {} for {}ms", step.kind.name(), step.duration);
        self.state = State::Running(Running {
            step,
            elapsed: 0.0,
            progress: 0.0,
            on_complete,
        });
    }

    fn advance_queue(&mut self) {
        if let Some(next) = self.queue.pop_front() {
            self.begin(next, None);
        } else if let Some(done) = self.on_sequence_complete.take() {
            done();
        }
    }

    pub fn update(&mut self, dt: f32) {
        let State::Running(run) = &mut self.state else {
            return;
        };
        run.elapsed += dt.max(0.0);
        run.progress = if run.step.duration > 0.0 {
            (run.elapsed / run.step.duration).min(1.0)
        } else {
            1.0
        };
        if run.progress < 1.0 {
            return;
        }

        if let State::Running(done) = std::mem::replace(&mut self.state, State::Idle) {
            if let Some(cb) = done.on_complete {
                cb();
            }
        }
        self.advance_queue();
    }

    /// Draw the current frame. Has no effect on state.
    pub fn draw(&self, surface: &mut dyn Surface) {
        if let State::Running(run) = &self.state {
            run.step.kind.draw(surface, run.progress, run.step.color);
        }
    }

    /// Stop immediately without firing any callback.
    pub fn cancel(&mut self) {
        self.state = State::Idle;
        self.queue.clear();
        self.on_sequence_complete = None;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    pub fn kind(&self) -> Option<TransitionKind> {
        match &self.state {
            State::Running(run) => Some(run.step.kind),
            State::Idle => None,
        }
    }

    /// Progress of the running step; 0 when idle.
    pub fn progress(&self) -> f32 {
        match &self.state {
            State::Running(run) => run.progress,
            State::Idle => 0.0,
        }
    }

    /// Steps queued after the running one.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    // Presets

    /// Close over the finished level, then open again.
    pub fn level_complete(&mut self, on_complete: Option<Callback>) {
        self.sequence(
            [
                TransitionStep::new(TransitionKind::CircleWipeIn, 600.0),
                TransitionStep::new(TransitionKind::CircleWipeOut, 600.0),
            ],
            on_complete,
        );
    }

    pub fn level_start(&mut self, on_complete: Option<Callback>) {
        self.start(TransitionKind::CircleWipeOut, 800.0, on_complete);
    }

    pub fn game_over(&mut self, on_complete: Option<Callback>) {
        self.start_step(
            TransitionStep::new(TransitionKind::PixelDissolve, 1200.0).with_color(GAME_OVER_RED),
            on_complete,
        );
    }

    pub fn fever_mode(&mut self) {
        self.start_step(
            TransitionStep::new(TransitionKind::ColorShift, 1000.0).with_color(Color::MAGENTA),
            None,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, Callback) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        (hits, Box::new(move || h.set(h.get() + 1)))
    }

    #[test]
    fn circle_wipe_fires_once_and_goes_idle() {
        let (hits, cb) = counter();
        let mut m = TransitionMachine::new();
        m.start(TransitionKind::CircleWipeIn, 800.0, Some(cb));
        assert!(m.is_active());
        m.update(800.0);
        assert_eq!(hits.get(), 1);
        assert!(!m.is_active());
        m.update(800.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let mut m = TransitionMachine::new();
        m.start(TransitionKind::Curtain, 500.0, None);
        let mut last = 0.0;
        for dt in [16.0, 0.0, -40.0, 33.0, 100.0, 200.0] {
            m.update(dt);
            assert!(m.progress() >= last);
            last = m.progress();
        }
        assert!((last - 349.0 / 500.0).abs() < 1e-4);
        m.update(1000.0);
        assert!(!m.is_active());
    }

    #[test]
    fn zero_duration_completes_on_next_update() {
        let (hits, cb) = counter();
        let mut m = TransitionMachine::new();
        m.start(TransitionKind::ZoomIn, 0.0, Some(cb));
        assert_eq!(hits.get(), 0);
        m.update(0.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn sequence_runs_steps_in_order_then_completes() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (hits, cb) = counter();
        let mut m = TransitionMachine::new();
        m.level_complete(Some(cb));

        for _ in 0..80 {
            if let Some(k) = m.kind() {
                let mut seen = seen.borrow_mut();
                if seen.last() != Some(&k) {
                    seen.push(k);
                }
            }
            m.update(16.0);
        }
        assert_eq!(
            *seen.borrow(),
            vec![TransitionKind::CircleWipeIn, TransitionKind::CircleWipeOut]
        );
        assert_eq!(hits.get(), 1);
        assert!(!m.is_active());
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let (hits, cb) = counter();
        let mut m = TransitionMachine::new();
        m.sequence(Vec::new(), Some(cb));
        assert_eq!(hits.get(), 1);
        assert!(!m.is_active());
    }

    #[test]
    fn restart_and_cancel_drop_callbacks() {
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        let mut m = TransitionMachine::new();
        m.start(TransitionKind::ZoomOut, 100.0, Some(cb1));
        m.start(TransitionKind::ZoomIn, 100.0, Some(cb2));
        m.update(100.0);
        assert_eq!((first.get(), second.get()), (0, 1));

        let (third, cb3) = counter();
        m.game_over(Some(cb3));
        m.cancel();
        m.update(5000.0);
        assert_eq!(third.get(), 0);
        assert_eq!(m.kind(), None);
    }

    #[test]
    fn draw_does_not_mutate() {
        let mut m = TransitionMachine::new();
        m.fever_mode();
        m.update(250.0);
        let before = m.progress();
        let mut list = DrawList::new(100.0, 100.0);
        m.draw(&mut list);
        m.draw(&mut list);
        assert_eq!(m.progress(), before);
        assert_eq!(m.kind(), Some(TransitionKind::ColorShift));
        assert!(!list.is_empty());

        let idle = TransitionMachine::new();
        let mut empty = DrawList::new(100.0, 100.0);
        idle.draw(&mut empty);
        assert!(empty.is_empty());
    }
}
