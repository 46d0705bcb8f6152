//! Pointer input and the intent mailbox.
//!
//! Input arrives from the host event loop at arbitrary times, but game state is
//! only advanced by the tick. The two meet in the [`IntentMailbox`]: handlers in
//! this module (and in [`crate::game::keys`]) push [`IntentEvent`]s, and the
//! motion controller drains them at the start of each tick. Handlers never touch
//! the player or the collision set directly.
//!
//! # Pointer Mode
//!
//! A right-button press, or a double tap on a touch screen, casts a ray from the
//! camera through the pointer onto the interaction surfaces (the ground by
//! default). The nearest hit becomes the new destination.
//!
//! # Double Tap
//!
//! Touch devices have no right button, so walking needs a qualifying gesture: a
//! second tap within the tap window (300 ms by default) of a first one. A single
//! tap only opens the window. See [`TapDetector`].

use crate::math::Vec3;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::trace;
use winit::event::MouseButton;

/// Default double-tap window.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

/// A movement request written by an input handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntentEvent {
    /// Cancel any pending destination.
    Stop,
    /// Walk to a point.
    MoveTo(Vec3),
    /// Walk along a direction; zero means stop walking.
    Direction(Vec3),
}

/// FIFO of intent events between input handlers and the tick.
#[derive(Debug, Default)]
pub struct IntentMailbox {
    events: VecDeque<IntentEvent>,
}

impl IntentMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: IntentEvent) {
        trace!(?event, "intent queued");
        self.events.push_back(event);
    }

    /// Takes every queued event, oldest first.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, IntentEvent> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to `plane`, if the ray hits it going forward.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<f32> {
        let denom = plane.normal.dot(&self.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (plane.offset - plane.normal.dot(&self.origin)) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// Infinite plane `normal · p = offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    pub fn new(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: normal.normalize(),
            offset,
        }
    }

    /// The floor, `y = 0`.
    pub fn ground() -> Self {
        Self::new(Vec3::Y, 0.0)
    }
}

/// Perspective camera used to turn a pointer position into a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Viewport width divided by height.
    pub aspect: f32,
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3, fov_y: f32, aspect: f32) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y,
            aspect,
        }
    }

    /// Ray from the camera through normalized device coordinates (`-1..=1`, Y up).
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward);

        let half_h = (self.fov_y.to_radians() * 0.5).tan();
        let half_w = half_h * self.aspect;
        let direction = forward + right * (ndc_x * half_w) + up * (ndc_y * half_h);
        Ray::new(self.position, direction)
    }
}

/// Converts a pixel position to normalized device coordinates.
pub fn screen_to_ndc(x: f32, y: f32, viewport_width: f32, viewport_height: f32) -> (f32, f32) {
    (
        (x / viewport_width) * 2.0 - 1.0,
        -(y / viewport_height) * 2.0 + 1.0,
    )
}

/// Time-window double-tap detector.
///
/// The first tap opens a window; a second tap before it closes qualifies and
/// resets the detector. A tap after the window has closed opens a new one.
#[derive(Debug, Clone)]
pub struct TapDetector {
    window: Duration,
    pending: Option<Instant>,
}

impl Default for TapDetector {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_WINDOW)
    }
}

impl TapDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Registers a tap at `now`. Returns `true` when it completes a double tap.
    pub fn register(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(first) if now.saturating_duration_since(first) < self.window => {
                self.pending = None;
                true
            }
            _ => {
                self.pending = Some(now);
                false
            }
        }
    }
}

/// Turns pointer and touch presses into destination intents.
#[derive(Debug, Clone)]
pub struct PointerInput {
    /// Surfaces the pointer can pick destinations on.
    pub surfaces: Vec<Plane>,
    taps: TapDetector,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_WINDOW)
    }
}

impl PointerInput {
    pub fn new(tap_window: Duration) -> Self {
        Self {
            surfaces: vec![Plane::ground()],
            taps: TapDetector::new(tap_window),
        }
    }

    /// Handles a mouse button press at pixel `(x, y)`.
    ///
    /// Only the right button walks. Returns the picked destination, if any.
    pub fn mouse_down(
        &mut self,
        button: MouseButton,
        pointer: (f32, f32),
        viewport: (f32, f32),
        camera: &Camera,
        mailbox: &mut IntentMailbox,
    ) -> Option<Vec3> {
        if button != MouseButton::Right {
            return None;
        }
        self.pick_destination(pointer, viewport, camera, mailbox)
    }

    /// Handles a touch start at pixel `(x, y)`. Only the second tap of a double
    /// tap walks.
    pub fn touch_start(
        &mut self,
        pointer: (f32, f32),
        viewport: (f32, f32),
        camera: &Camera,
        now: Instant,
        mailbox: &mut IntentMailbox,
    ) -> Option<Vec3> {
        if !self.taps.register(now) {
            return None;
        }
        self.pick_destination(pointer, viewport, camera, mailbox)
    }

    /// Stops current travel, then casts onto the surfaces and queues the nearest hit.
    fn pick_destination(
        &self,
        pointer: (f32, f32),
        viewport: (f32, f32),
        camera: &Camera,
        mailbox: &mut IntentMailbox,
    ) -> Option<Vec3> {
        mailbox.push(IntentEvent::Stop);

        let (ndc_x, ndc_y) = screen_to_ndc(pointer.0, pointer.1, viewport.0, viewport.1);
        let ray = camera.ray_through(ndc_x, ndc_y);
        let hit = self
            .surfaces
            .iter()
            .filter_map(|plane| ray.intersect_plane(plane))
            .min_by(|a, b| a.total_cmp(b))
            .map(|t| ray.at(t))?;

        mailbox.push(IntentEvent::MoveTo(hit));
        Some(hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overhead_camera() -> Camera {
        // Looking straight down from above the origin; "up" on screen is +Z.
        let mut camera = Camera::new(
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::ZERO,
            90.0,
            1.0,
        );
        camera.up = Vec3::new(0.0, 0.0, 1.0);
        camera
    }

    #[test]
    fn test_ray_hits_ground() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let t = ray.intersect_plane(&Plane::ground()).expect("hit");
        let p = ray.at(t);
        assert!((p.x() - 10.0).abs() < 1e-4);
        assert!(p.y().abs() < 1e-4);
    }

    #[test]
    fn test_ray_parallel_or_behind_misses() {
        let parallel = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(parallel.intersect_plane(&Plane::ground()).is_none());

        let away = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(away.intersect_plane(&Plane::ground()).is_none());
    }

    #[test]
    fn test_screen_to_ndc() {
        assert_eq!(screen_to_ndc(400.0, 300.0, 800.0, 600.0), (0.0, 0.0));
        assert_eq!(screen_to_ndc(0.0, 0.0, 800.0, 600.0), (-1.0, 1.0));
        assert_eq!(screen_to_ndc(800.0, 600.0, 800.0, 600.0), (1.0, -1.0));
    }

    #[test]
    fn test_center_click_walks_under_camera() {
        let camera = overhead_camera();
        let mut pointer = PointerInput::default();
        let mut mailbox = IntentMailbox::new();

        let hit = pointer
            .mouse_down(
                MouseButton::Right,
                (400.0, 300.0),
                (800.0, 600.0),
                &camera,
                &mut mailbox,
            )
            .expect("ground hit");
        assert!(hit.length() < 1e-3);

        let events: Vec<_> = mailbox.drain().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], IntentEvent::Stop);
        assert!(matches!(events[1], IntentEvent::MoveTo(_)));
    }

    #[test]
    fn test_top_of_screen_is_forward() {
        let camera = overhead_camera();
        let ray = camera.ray_through(0.0, 1.0);
        let p = ray.at(ray.intersect_plane(&Plane::ground()).expect("hit"));
        // 90° fov from 100 units up reaches 100 units out at the screen edge.
        assert!((p.z() - 100.0).abs() < 1e-3);
        assert!(p.x().abs() < 1e-3);
    }

    #[test]
    fn test_left_click_ignored() {
        let camera = overhead_camera();
        let mut pointer = PointerInput::default();
        let mut mailbox = IntentMailbox::new();
        let hit = pointer.mouse_down(
            MouseButton::Left,
            (400.0, 300.0),
            (800.0, 600.0),
            &camera,
            &mut mailbox,
        );
        assert!(hit.is_none());
        assert!(mailbox.is_empty());
    }

    #[test]
    fn test_double_tap_window() {
        let mut taps = TapDetector::default();
        let t0 = Instant::now();

        assert!(!taps.register(t0));
        assert!(taps.register(t0 + Duration::from_millis(200)));
        // The completed pair is consumed; the next tap starts over.
        assert!(!taps.register(t0 + Duration::from_millis(250)));

        // Too slow: the second tap opens a fresh window instead.
        let t1 = t0 + Duration::from_secs(1);
        assert!(!taps.register(t1));
        assert!(!taps.register(t1 + Duration::from_millis(300)));
        assert!(taps.register(t1 + Duration::from_millis(450)));
    }

    #[test]
    fn test_single_tap_does_not_walk() {
        let camera = overhead_camera();
        let mut pointer = PointerInput::default();
        let mut mailbox = IntentMailbox::new();
        let t0 = Instant::now();

        assert!(
            pointer
                .touch_start((400.0, 300.0), (800.0, 600.0), &camera, t0, &mut mailbox)
                .is_none()
        );
        assert!(mailbox.is_empty());

        let hit = pointer.touch_start(
            (400.0, 300.0),
            (800.0, 600.0),
            &camera,
            t0 + Duration::from_millis(150),
            &mut mailbox,
        );
        assert!(hit.is_some());
        assert_eq!(mailbox.len(), 2);
    }
}
