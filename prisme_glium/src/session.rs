use super::*;

use std::time::Instant;

/// Called once with the final state when the window closes.
pub type ExitCallback = Box<dyn FnMut(&SimulationState)>;

/// What to do with the displayed scene after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Retrace {
    Skip,
    /// A debounced retrace is pending, see [`Session::poll`].
    Scheduled,
    Now,
}

/// The interactive side of a simulation: its state, the light drag and pending retraces.
///
/// Independent of any window, event handlers only forward to it.
pub struct Session {
    state: SimulationState,
    scheduler: RedrawScheduler,
    cursor: Option<Point>,
    dragging: bool,
    on_exit: ExitCallback,
}

impl Session {
    #[must_use]
    pub fn new(state: SimulationState, scheduler: RedrawScheduler, on_exit: ExitCallback) -> Self {
        Self {
            state,
            scheduler,
            cursor: None,
            dragging: false,
            on_exit,
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// When the pending retrace is due, if there is one.
    #[inline]
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// The cursor moved to `cursor`, in canvas space. `None` if it is nowhere on the canvas.
    pub fn cursor_moved(&mut self, cursor: Option<Point>, now: Instant) -> Retrace {
        self.cursor = cursor;

        match (self.dragging, cursor) {
            (true, Some(cursor)) => {
                self.state.move_light(cursor);
                self.scheduler.schedule(now);
                Retrace::Scheduled
            }
            _ => Retrace::Skip,
        }
    }

    /// Left button pressed. Returns whether it grabbed the light.
    pub fn pressed(&mut self) -> bool {
        let handle = LightHandle::new(self.state.light);
        self.dragging = self.cursor.is_some_and(|p| handle.contains(&p));

        if self.dragging {
            log::debug!("dragging the light from {}", self.state.light);
        }

        self.dragging
    }

    /// Left button released. A drag ends with an immediate retrace.
    pub fn released(&mut self) -> Retrace {
        if !core::mem::take(&mut self.dragging) {
            return Retrace::Skip;
        }

        self.scheduler.cancel();
        log::debug!("light dropped at {}", self.state.light);
        Retrace::Now
    }

    pub fn adjust(&mut self, adjustment: Adjustment) -> Retrace {
        match self.state.apply(adjustment) {
            Ok(()) => {
                log::info!("{adjustment:?}: {:?}", self.state.params);
                Retrace::Now
            }
            Err(e) => {
                log::warn!("ignoring {adjustment:?}: {e}");
                Retrace::Skip
            }
        }
    }

    /// [`Retrace::Now`] once, when the debounced retrace is due.
    pub fn poll(&mut self, now: Instant) -> Retrace {
        if self.scheduler.take_due(now) {
            Retrace::Now
        } else {
            Retrace::Skip
        }
    }

    /// Drop any pending retrace and hand the final state to the exit callback.
    pub fn close(&mut self) {
        self.scheduler.cancel();
        (self.on_exit)(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{cell::Cell, rc::Rc};

    const MS: Duration = Duration::from_millis(1);

    fn session() -> Session {
        Session::new(
            SimulationState::default(),
            RedrawScheduler::default(),
            Box::new(|_: &SimulationState| {}),
        )
    }

    fn light() -> Point {
        SimulationState::DEFAULT_LIGHT.into()
    }

    #[test]
    fn moves_without_a_drag_leave_the_light() {
        let t0 = Instant::now();
        let mut session = session();

        assert_eq!(session.cursor_moved(Some(light()), t0), Retrace::Skip);
        assert_eq!(session.cursor_moved(Some(Point::new(90., 90.)), t0), Retrace::Skip);

        assert_eq!(session.state().light, light());
        assert_eq!(session.deadline(), None);
    }

    #[test]
    fn press_off_the_handle_grabs_nothing() {
        let t0 = Instant::now();
        let mut session = session();

        session.cursor_moved(Some(Point::new(200., 124.)), t0);
        assert!(!session.pressed());
        assert!(!session.is_dragging());

        assert_eq!(session.cursor_moved(Some(Point::new(210., 130.)), t0), Retrace::Skip);
        assert_eq!(session.released(), Retrace::Skip);
        assert_eq!(session.state().light, light());

        // no known cursor position either
        let mut session = self::session();
        assert!(!session.pressed());
    }

    #[test]
    fn drag_bursts_retrace_once() {
        let t0 = Instant::now();
        let mut session = session();

        session.cursor_moved(Some(light()), t0);
        assert!(session.pressed());

        for i in 0..5u32 {
            let to = Point::new(60., 124. + f64::from(i));
            assert_eq!(session.cursor_moved(Some(to), t0 + i * 4 * MS), Retrace::Scheduled);
        }

        assert_eq!(session.state().light, Point::new(60., 128.));
        assert_eq!(session.deadline(), Some(t0 + 41 * MS));

        assert_eq!(session.poll(t0 + 40 * MS), Retrace::Skip);
        assert_eq!(session.poll(t0 + 41 * MS), Retrace::Now);
        assert_eq!(session.poll(t0 + 90 * MS), Retrace::Skip);

        // leaving the canvas keeps the drag, not the position
        assert_eq!(session.cursor_moved(None, t0 + 100 * MS), Retrace::Skip);
        assert!(session.is_dragging());
        assert_eq!(session.state().light, Point::new(60., 128.));
    }

    #[test]
    fn release_retraces_at_once() {
        let t0 = Instant::now();
        let mut session = session();

        session.cursor_moved(Some(light()), t0);
        session.pressed();
        session.cursor_moved(Some(Point::new(40., 150.)), t0 + MS);
        assert!(session.deadline().is_some());

        assert_eq!(session.released(), Retrace::Now);
        assert_eq!(session.deadline(), None);
        assert!(!session.is_dragging());
        assert_eq!(session.poll(t0 + 100 * MS), Retrace::Skip);

        assert_eq!(session.released(), Retrace::Skip);
        assert_eq!(session.state().light, Point::new(40., 150.));
    }

    #[test]
    fn adjustments() {
        let mut session = session();

        assert_eq!(session.adjust(Adjustment::MoreRays), Retrace::Now);
        assert_eq!(session.state().params.ray_count(), 81);

        let mut narrow = Session::new(
            SimulationState::new(OpticalParameters::new(1.5, 1.3, 5, 1.).unwrap(), light()),
            RedrawScheduler::default(),
            Box::new(|_: &SimulationState| {}),
        );
        let before = *narrow.state();

        assert_eq!(narrow.adjust(Adjustment::NarrowerFan), Retrace::Skip);
        assert_eq!(*narrow.state(), before);
    }

    #[test]
    fn close_hands_over_the_final_state() {
        let t0 = Instant::now();
        let saved = Rc::new(Cell::new(None));

        let mut session = Session::new(SimulationState::default(), RedrawScheduler::default(), {
            let saved = Rc::clone(&saved);
            Box::new(move |state: &SimulationState| saved.set(Some(*state)))
        });

        session.cursor_moved(Some(light()), t0);
        session.pressed();
        session.cursor_moved(Some(Point::new(30., 160.)), t0);
        session.adjust(Adjustment::FewerRays);

        assert_eq!(saved.get(), None);
        session.close();

        let state = saved.get().unwrap();
        assert_eq!(state.light, Point::new(30., 160.));
        assert_eq!(state.params.ray_count(), 79);
        assert_eq!(session.deadline(), None);
    }
}
