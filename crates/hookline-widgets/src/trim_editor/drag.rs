//! Pointer drag of the fixed-length preview window
//!
//! Pure pointer math, no iced types: the canvas feeds surface-relative x
//! coordinates in and publishes the resulting [`DragOutcome`]s.

use hookline_core::trim::{TrimBounds, TrimRegion};

/// Default distance at which a press grabs the start handle
pub const HANDLE_TOLERANCE_PX: f32 = 10.0;

/// Map a surface x coordinate to track seconds
///
/// `x` is clamped to the surface, so positions past either edge map to
/// `0` or `total`.
pub fn pixel_to_time(x: f32, width: f32, total: f64) -> f64 {
    if !usable(width as f64) || !usable(total) || x.is_nan() {
        return 0.0;
    }
    (x.clamp(0.0, width) / width) as f64 * total
}

/// Map track seconds to a surface x coordinate
pub fn time_to_pixel(seconds: f64, width: f32, total: f64) -> f32 {
    if !usable(width as f64) || !usable(total) {
        return 0.0;
    }
    ((seconds / total).clamp(0.0, 1.0) * width as f64) as f32
}

fn usable(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

/// Result of feeding one pointer event to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Pointer event outside the handle and body, or no drag in progress
    Ignored,
    Started,
    /// Live update: the window now starts here
    Moved(f64),
    /// Pointer released: bounds to commit
    Committed(TrimBounds),
}

#[derive(Debug, Clone, Copy)]
struct ActiveDrag {
    /// Seconds between the pointer and the window start at press time
    grab_offset: f64,
    /// Window start when the press landed
    origin: f64,
    region: TrimRegion,
}

/// Tracks one drag gesture at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Pointer down at `x`; within `tolerance` pixels of the start handle
    /// counts as grabbing it
    pub fn press(
        &mut self,
        x: f32,
        width: f32,
        region: &TrimRegion,
        tolerance: f32,
    ) -> DragOutcome {
        let total = region.total_duration();
        if !usable(width as f64) || !usable(total) {
            return DragOutcome::Ignored;
        }

        let start_x = time_to_pixel(region.start(), width, total);
        let end_x = time_to_pixel(region.end(), width, total);
        let on_handle = (x - start_x).abs() <= tolerance;
        let in_body = x >= start_x && x <= end_x;
        if !on_handle && !in_body {
            return DragOutcome::Ignored;
        }

        self.active = Some(ActiveDrag {
            grab_offset: pixel_to_time(x, width, total) - region.start(),
            origin: region.start(),
            region: *region,
        });
        DragOutcome::Started
    }

    /// Pointer moved to `x`; `x` may lie outside the surface
    pub fn drag(&mut self, x: f32, width: f32) -> DragOutcome {
        let Some(active) = self.active.as_mut() else {
            return DragOutcome::Ignored;
        };

        let total = active.region.total_duration();
        let candidate = pixel_to_time(x, width, total) - active.grab_offset;
        let moved = active.region.set_start(candidate);
        if moved.start() == active.region.start() {
            return DragOutcome::Ignored;
        }
        active.region = moved;
        DragOutcome::Moved(moved.start())
    }

    /// Pointer up: end the drag and hand back the final bounds
    pub fn release(&mut self) -> DragOutcome {
        match self.active.take() {
            Some(active) => DragOutcome::Committed(active.region.to_bounds()),
            None => DragOutcome::Ignored,
        }
    }

    /// Abandon the gesture; returns the start the window had at press time
    /// if anything moved since
    pub fn cancel(&mut self) -> Option<f64> {
        let active = self.active.take()?;
        (active.region.start() != active.origin).then_some(active.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f32 = 1024.0;

    fn region(start: f64) -> TrimRegion {
        // 256 s across 1024 px: 4 px per second
        TrimRegion::init(256.0, start, 20.0)
    }

    #[test]
    fn test_pixel_to_time_clamps() {
        assert_eq!(pixel_to_time(512.0, WIDTH, 256.0), 128.0);
        assert_eq!(pixel_to_time(-30.0, WIDTH, 256.0), 0.0);
        assert_eq!(pixel_to_time(5000.0, WIDTH, 256.0), 256.0);
        assert_eq!(pixel_to_time(10.0, 0.0, 256.0), 0.0);
        assert_eq!(time_to_pixel(128.0, WIDTH, 256.0), 512.0);
    }

    #[test]
    fn test_press_outside_is_ignored() {
        let mut drag = DragController::default();
        // Window covers 200..280 px
        assert_eq!(
            drag.press(100.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX),
            DragOutcome::Ignored
        );
        assert_eq!(
            drag.press(300.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX),
            DragOutcome::Ignored
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.drag(500.0, WIDTH), DragOutcome::Ignored);
        assert_eq!(drag.release(), DragOutcome::Ignored);
    }

    #[test]
    fn test_press_near_start_handle() {
        let mut drag = DragController::default();
        assert_eq!(
            drag.press(192.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX),
            DragOutcome::Started
        );
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_body_drag_keeps_grab_offset() {
        let mut drag = DragController::default();
        // Grab 5 s into the window
        assert_eq!(
            drag.press(220.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX),
            DragOutcome::Started
        );
        assert_eq!(drag.drag(260.0, WIDTH), DragOutcome::Moved(60.0));
        assert_eq!(
            drag.release(),
            DragOutcome::Committed(TrimBounds { start: 60.0, end: 80.0 })
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_past_edges_clamps() {
        let mut drag = DragController::default();
        drag.press(240.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX);
        assert_eq!(drag.drag(-400.0, WIDTH), DragOutcome::Moved(0.0));
        assert_eq!(drag.drag(-800.0, WIDTH), DragOutcome::Ignored);
        assert_eq!(drag.drag(4000.0, WIDTH), DragOutcome::Moved(236.0));
        assert_eq!(
            drag.release(),
            DragOutcome::Committed(TrimBounds { start: 236.0, end: 256.0 })
        );
    }

    #[test]
    fn test_unresolved_region_cannot_be_dragged() {
        let mut drag = DragController::default();
        let region = TrimRegion::unresolved(20.0);
        assert_eq!(drag.press(0.0, WIDTH, &region, HANDLE_TOLERANCE_PX), DragOutcome::Ignored);
    }

    #[test]
    fn test_cancel_reverts_to_press_start() {
        let mut drag = DragController::default();
        drag.press(240.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX);
        assert_eq!(drag.cancel(), None);

        drag.press(240.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX);
        assert_eq!(drag.drag(300.0, WIDTH), DragOutcome::Moved(65.0));
        assert_eq!(drag.cancel(), Some(50.0));
        assert!(!drag.is_dragging());
        assert_eq!(drag.release(), DragOutcome::Ignored);
    }

    #[test]
    fn test_handle_tolerance_is_caller_supplied() {
        let mut drag = DragController::default();
        // Start handle at 200 px
        assert_eq!(
            drag.press(185.0, WIDTH, &region(50.0), HANDLE_TOLERANCE_PX),
            DragOutcome::Ignored
        );
        assert_eq!(drag.press(185.0, WIDTH, &region(50.0), 16.0), DragOutcome::Started);
    }
}
