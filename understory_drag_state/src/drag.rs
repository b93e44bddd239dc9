// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag gesture recognition from raw pointer events.
//!
//! [`DragState`] follows one pointer from press to release. A press on a draggable handle
//! only becomes a drag once the pointer travels farther than
//! [`DragConfig::start_threshold`]; releasing before that is a click and produces no drag
//! events at all.
//!
//! While dragging, every move is forwarded to a [`DragHandler`] together with a signed
//! horizontal `shift`: how many times the pointer crossed [`DragConfig::shift_threshold`]
//! away from where it was pressed, truncated toward zero. Outline views use it to indent or
//! outdent the dragged row.
//!
//! ## Usage
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_drag_state::drag::{DragHandler, DragPhase, DragSource, DragState, PointerUp};
//! use understory_drop_target::scene::{ElementId, Scene, SceneElement};
//!
//! struct Handles(ElementId);
//!
//! impl DragSource<ElementId> for Handles {
//!     type Data = &'static str;
//!     fn element_to_data(&mut self, element: ElementId) -> Option<&'static str> {
//!         (element == self.0).then_some("card")
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Log(Vec<String>);
//!
//! impl DragHandler<&'static str> for Log {
//!     fn on_start(&mut self, data: &'static str) {
//!         self.0.push(format!("start {data}"));
//!     }
//!     fn on_move(&mut self, _point: Point) {}
//!     fn on_shift_change(&mut self, shift: i32) {
//!         self.0.push(format!("shift {shift}"));
//!     }
//!     fn on_end(&mut self, is_canceled: bool) {
//!         self.0.push(format!("end {is_canceled}"));
//!     }
//! }
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 400.0, 400.0)));
//! let card = scene.insert(Some(root), SceneElement::new(Rect::new(0.0, 0.0, 100.0, 20.0)));
//!
//! let mut state = DragState::new();
//! state.bind_root(Some(root));
//! let mut log = Log::default();
//!
//! assert!(state.on_pointer_down(None, &mut Handles(card), &scene, card, Point::new(10.0, 10.0)));
//! state.on_pointer_move(None, Point::new(12.0, 10.0), &mut log);
//! assert_eq!(state.phase(), DragPhase::Pending);
//!
//! state.on_pointer_move(None, Point::new(30.0, 10.0), &mut log);
//! assert_eq!(state.phase(), DragPhase::Dragging);
//! assert_eq!(state.shift(), 1);
//!
//! assert_eq!(state.on_pointer_up(None, &mut log), PointerUp::Dropped);
//! assert_eq!(log.0, ["start card", "shift 1", "end false"]);
//! ```

use core::num::NonZeroU64;

use kurbo::{Point, Vec2};
use understory_drop_target::ElementHost;

/// Pointer identifier, as in the click tracker.
pub type PointerId = NonZeroU64;

const DEFAULT_POINTER: PointerId = NonZeroU64::MIN;

/// Drag recognition thresholds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// Distance the pointer must travel from the press before a drag starts.
    pub start_threshold: f64,
    /// Horizontal distance per unit of shift.
    pub shift_threshold: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            start_threshold: 5.0,
            shift_threshold: 16.0,
        }
    }
}

/// Where the gesture currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// No press is being tracked.
    Idle,
    /// A handle is pressed but the pointer has not yet moved past the start threshold.
    Pending,
    /// A drag is in progress.
    Dragging,
}

/// Outcome of [`DragState::on_pointer_up`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerUp {
    /// A drag ended normally; the handler saw `on_end(false)`.
    Dropped,
    /// The press never became a drag.
    Click,
    /// The pointer was not the one being tracked.
    Ignored,
}

/// Maps pressed elements to drag payloads.
pub trait DragSource<E> {
    /// Payload of a drag.
    type Data;

    /// Payload for a press on `element`, or `None` if it is not a drag handle.
    fn element_to_data(&mut self, element: E) -> Option<Self::Data>;
}

/// Receives drag lifecycle events.
///
/// Relayed drags from another surface call these directly, bypassing [`DragState`].
pub trait DragHandler<D> {
    /// The pointer left the start threshold; a drag of `data` begins.
    fn on_start(&mut self, data: D);

    /// The pointer moved while dragging.
    fn on_move(&mut self, point: Point);

    /// The horizontal shift changed.
    fn on_shift_change(&mut self, shift: i32) {
        let _ = shift;
    }

    /// The drag is over. `is_canceled` is `true` for an explicit cancel, which must not commit.
    fn on_end(&mut self, is_canceled: bool);
}

#[derive(Clone, Debug)]
struct Press<E, D> {
    pointer_id: PointerId,
    element: E,
    origin: Point,
    /// Taken when the drag starts.
    data: Option<D>,
}

/// Drag gesture state machine for one pointer at a time.
///
/// `E` is the host's element handle and `D` the payload produced by a [`DragSource`].
#[derive(Clone, Debug)]
pub struct DragState<E, D> {
    config: DragConfig,
    root: Option<E>,
    press: Option<Press<E, D>>,
    dragging: bool,
    shift: i32,
}

impl<E: Copy + PartialEq, D> Default for DragState<E, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Copy + PartialEq, D> DragState<E, D> {
    /// Create a drag state with default thresholds.
    pub fn new() -> Self {
        Self::with_config(DragConfig::default())
    }

    /// Create a drag state with custom thresholds.
    pub fn with_config(config: DragConfig) -> Self {
        Self {
            config,
            root: None,
            press: None,
            dragging: false,
            shift: 0,
        }
    }

    /// Current thresholds.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Only presses inside `root` start drags; `None` disables dragging.
    ///
    /// Does not affect a gesture already in progress.
    pub fn bind_root(&mut self, root: Option<E>) {
        self.root = root;
    }

    /// Current phase.
    pub fn phase(&self) -> DragPhase {
        match (&self.press, self.dragging) {
            (None, _) => DragPhase::Idle,
            (Some(_), false) => DragPhase::Pending,
            (Some(_), true) => DragPhase::Dragging,
        }
    }

    /// Returns `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Current horizontal shift; zero outside a drag.
    pub fn shift(&self) -> i32 {
        self.shift
    }

    /// The pressed element, while pending or dragging.
    pub fn pressed_element(&self) -> Option<E> {
        self.press.as_ref().map(|p| p.element)
    }

    /// Record a press on `element`.
    ///
    /// Returns `true` if the press was accepted and is now pending. Presses are ignored while
    /// another pointer is tracked, outside the bound root, and on elements the source has no
    /// payload for.
    pub fn on_pointer_down<S, H>(
        &mut self,
        pointer_id: Option<PointerId>,
        source: &mut S,
        host: &H,
        element: E,
        position: Point,
    ) -> bool
    where
        S: DragSource<E, Data = D> + ?Sized,
        H: ElementHost<Element = E> + ?Sized,
    {
        if self.press.is_some() {
            return false;
        }
        let Some(root) = self.root else {
            return false;
        };
        if !host.is_within(root, element) {
            return false;
        }
        let Some(data) = source.element_to_data(element) else {
            return false;
        };
        self.press = Some(Press {
            pointer_id: pointer_id.unwrap_or(DEFAULT_POINTER),
            element,
            origin: position,
            data: Some(data),
        });
        true
    }

    /// Process a move of `pointer_id`.
    ///
    /// Starts the drag once the start threshold is exceeded, then forwards the position and
    /// any shift change to `handler`.
    pub fn on_pointer_move<Hd>(
        &mut self,
        pointer_id: Option<PointerId>,
        position: Point,
        handler: &mut Hd,
    ) where
        Hd: DragHandler<D> + ?Sized,
    {
        let pointer_id = pointer_id.unwrap_or(DEFAULT_POINTER);
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if press.pointer_id != pointer_id {
            return;
        }
        if !self.dragging {
            let threshold = self.config.start_threshold;
            if (position - press.origin).hypot2() <= threshold * threshold {
                return;
            }
            let Some(data) = press.data.take() else {
                return;
            };
            self.dragging = true;
            tracing::debug!(?pointer_id, "drag started");
            handler.on_start(data);
        }
        handler.on_move(position);

        let shift = shift_for(position - press.origin, self.config.shift_threshold);
        if shift != self.shift {
            self.shift = shift;
            tracing::trace!(shift, "drag shift changed");
            handler.on_shift_change(shift);
        }
    }

    /// Process a release of `pointer_id`.
    pub fn on_pointer_up<Hd>(&mut self, pointer_id: Option<PointerId>, handler: &mut Hd) -> PointerUp
    where
        Hd: DragHandler<D> + ?Sized,
    {
        let pointer_id = pointer_id.unwrap_or(DEFAULT_POINTER);
        if self.press.as_ref().is_none_or(|p| p.pointer_id != pointer_id) {
            return PointerUp::Ignored;
        }
        if self.reset() {
            tracing::debug!(?pointer_id, "drag ended");
            handler.on_end(false);
            PointerUp::Dropped
        } else {
            PointerUp::Click
        }
    }

    /// Abort the gesture, for example on Escape.
    ///
    /// Returns `true` if a drag was in progress; its handler sees `on_end(true)`.
    pub fn cancel<Hd>(&mut self, handler: &mut Hd) -> bool
    where
        Hd: DragHandler<D> + ?Sized,
    {
        if self.reset() {
            tracing::debug!("drag canceled");
            handler.on_end(true);
            true
        } else {
            false
        }
    }

    /// Back to idle; returns whether a drag was in progress.
    fn reset(&mut self) -> bool {
        self.press = None;
        self.shift = 0;
        core::mem::replace(&mut self.dragging, false)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Truncation toward zero is the shift definition; the cast saturates."
)]
fn shift_for(delta: Vec2, threshold: f64) -> i32 {
    if threshold.is_nan() || threshold <= 0.0 {
        return 0;
    }
    (delta.x / threshold) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::Rect;
    use understory_drop_target::scene::{ElementId, Scene, SceneElement};

    #[derive(Debug, PartialEq)]
    enum Event {
        Start(u32),
        Move(Point),
        Shift(i32),
        End(bool),
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl DragHandler<u32> for Recorder {
        fn on_start(&mut self, data: u32) {
            self.0.push(Event::Start(data));
        }
        fn on_move(&mut self, point: Point) {
            self.0.push(Event::Move(point));
        }
        fn on_shift_change(&mut self, shift: i32) {
            self.0.push(Event::Shift(shift));
        }
        fn on_end(&mut self, is_canceled: bool) {
            self.0.push(Event::End(is_canceled));
        }
    }

    /// Handles map to a payload; everything else is not draggable.
    struct Handles(Vec<(ElementId, u32)>);

    impl DragSource<ElementId> for Handles {
        type Data = u32;
        fn element_to_data(&mut self, element: ElementId) -> Option<u32> {
            self.0.iter().find(|(e, _)| *e == element).map(|&(_, d)| d)
        }
    }

    struct Fixture {
        scene: Scene,
        root: ElementId,
        handle: ElementId,
        plain: ElementId,
        outside: ElementId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let root = scene.insert(None, SceneElement::new(Rect::new(0.0, 0.0, 200.0, 200.0)));
        let handle = scene.insert(Some(root), SceneElement::new(Rect::new(0.0, 0.0, 50.0, 20.0)));
        let plain = scene.insert(Some(root), SceneElement::new(Rect::new(0.0, 20.0, 50.0, 40.0)));
        let other = scene.insert(None, SceneElement::new(Rect::new(300.0, 0.0, 400.0, 100.0)));
        let outside = scene.insert(Some(other), SceneElement::new(Rect::new(0.0, 0.0, 50.0, 20.0)));
        Fixture {
            scene,
            root,
            handle,
            plain,
            outside,
        }
    }

    fn state(f: &Fixture) -> DragState<ElementId, u32> {
        let mut s = DragState::new();
        s.bind_root(Some(f.root));
        s
    }

    fn pid(n: u64) -> Option<PointerId> {
        NonZeroU64::new(n)
    }

    fn down(s: &mut DragState<ElementId, u32>, f: &Fixture, element: ElementId) -> bool {
        let mut source = Handles(vec![(f.handle, 7), (f.outside, 9)]);
        s.on_pointer_down(None, &mut source, &f.scene, element, Point::new(10.0, 10.0))
    }

    #[test]
    fn click_without_movement_fires_nothing() {
        let f = fixture();
        let mut s = state(&f);
        let mut h = Recorder::default();

        assert!(down(&mut s, &f, f.handle));
        s.on_pointer_move(None, Point::new(13.0, 13.0), &mut h);
        assert_eq!(s.phase(), DragPhase::Pending);
        assert_eq!(s.on_pointer_up(None, &mut h), PointerUp::Click);
        assert!(h.0.is_empty());
        assert_eq!(s.phase(), DragPhase::Idle);
    }

    #[test]
    fn drag_lifecycle() {
        let f = fixture();
        let mut s = state(&f);
        let mut h = Recorder::default();

        assert!(down(&mut s, &f, f.handle));
        s.on_pointer_move(None, Point::new(10.0, 20.0), &mut h);
        s.on_pointer_move(None, Point::new(10.0, 30.0), &mut h);
        assert!(s.is_dragging());
        assert_eq!(s.pressed_element(), Some(f.handle));
        assert_eq!(s.on_pointer_up(None, &mut h), PointerUp::Dropped);
        assert_eq!(
            h.0,
            vec![
                Event::Start(7),
                Event::Move(Point::new(10.0, 20.0)),
                Event::Move(Point::new(10.0, 30.0)),
                Event::End(false),
            ]
        );
        assert!(!s.is_dragging());
    }

    #[test]
    fn shift_counts_threshold_crossings() {
        let f = fixture();
        let mut s = state(&f);
        let mut h = Recorder::default();

        down(&mut s, &f, f.handle);
        // Start the drag vertically so no shift is reported yet.
        s.on_pointer_move(None, Point::new(10.0, 30.0), &mut h);
        s.on_pointer_move(None, Point::new(25.0, 30.0), &mut h);
        assert_eq!(s.shift(), 0);
        s.on_pointer_move(None, Point::new(26.0, 30.0), &mut h);
        assert_eq!(s.shift(), 1);
        s.on_pointer_move(None, Point::new(41.0, 30.0), &mut h);
        assert_eq!(s.shift(), 1, "still one crossing");
        s.on_pointer_move(None, Point::new(42.0, 30.0), &mut h);
        assert_eq!(s.shift(), 2);
        // Truncation toward zero: -15 is no crossing, -16 is one.
        s.on_pointer_move(None, Point::new(-5.0, 30.0), &mut h);
        assert_eq!(s.shift(), 0);
        s.on_pointer_move(None, Point::new(-6.0, 30.0), &mut h);
        assert_eq!(s.shift(), -1);

        let shifts: Vec<i32> = h
            .0
            .iter()
            .filter_map(|e| match e {
                Event::Shift(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(shifts, vec![1, 2, 0, -1]);

        s.on_pointer_up(None, &mut h);
        assert_eq!(s.shift(), 0);
    }

    #[test]
    fn cancel_reports_canceled() {
        let f = fixture();
        let mut s = state(&f);
        let mut h = Recorder::default();

        assert!(!s.cancel(&mut h), "nothing to cancel");
        down(&mut s, &f, f.handle);
        assert!(!s.cancel(&mut h), "pending presses cancel silently");
        assert!(h.0.is_empty());

        down(&mut s, &f, f.handle);
        s.on_pointer_move(None, Point::new(40.0, 10.0), &mut h);
        assert!(s.cancel(&mut h));
        assert_eq!(h.0.last(), Some(&Event::End(true)));
        assert_eq!(s.phase(), DragPhase::Idle);

        // A release after the cancel belongs to no gesture.
        assert_eq!(s.on_pointer_up(None, &mut h), PointerUp::Ignored);
    }

    #[test]
    fn presses_that_cannot_drag_are_ignored() {
        let f = fixture();
        let mut s = state(&f);

        assert!(!down(&mut s, &f, f.plain), "no payload");
        assert!(!down(&mut s, &f, f.outside), "outside the root");
        s.bind_root(None);
        assert!(!down(&mut s, &f, f.handle), "no root");
        assert_eq!(s.phase(), DragPhase::Idle);
    }

    #[test]
    fn second_pointer_is_ignored() {
        let f = fixture();
        let mut s = state(&f);
        let mut h = Recorder::default();
        let mut source = Handles(vec![(f.handle, 7)]);

        assert!(s.on_pointer_down(pid(1), &mut source, &f.scene, f.handle, Point::ZERO));
        assert!(!s.on_pointer_down(pid(2), &mut source, &f.scene, f.handle, Point::ZERO));

        s.on_pointer_move(pid(2), Point::new(100.0, 0.0), &mut h);
        assert_eq!(s.phase(), DragPhase::Pending);
        assert_eq!(s.on_pointer_up(pid(2), &mut h), PointerUp::Ignored);

        s.on_pointer_move(pid(1), Point::new(100.0, 0.0), &mut h);
        assert!(s.is_dragging());
        assert_eq!(s.on_pointer_up(pid(1), &mut h), PointerUp::Dropped);
    }

    #[test]
    fn custom_thresholds() {
        let f = fixture();
        let mut s = DragState::with_config(DragConfig {
            start_threshold: 0.0,
            shift_threshold: 0.0,
        });
        s.bind_root(Some(f.root));
        let mut h = Recorder::default();

        down(&mut s, &f, f.handle);
        s.on_pointer_move(None, Point::new(10.5, 10.0), &mut h);
        assert!(s.is_dragging());
        assert_eq!(s.shift(), 0, "a zero shift threshold disables shifting");
    }
}
