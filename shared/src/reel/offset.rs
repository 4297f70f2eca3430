use crate::constants::FALLBACK_CELL_WIDTH;

/// Rendered widths the stop offset is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f64,
    pub viewport_width: f64,
}

impl CellMetrics {
    /// `cell_width` should come from an actually rendered cell, margins
    /// included. Missing or non-positive measurements fall back to
    /// `FALLBACK_CELL_WIDTH`.
    pub fn measure(cell_width: Option<f64>, viewport_width: f64) -> Self {
        let cell_width = cell_width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(FALLBACK_CELL_WIDTH);
        let viewport_width = if viewport_width.is_finite() {
            viewport_width.max(0.0)
        } else {
            0.0
        };
        Self {
            cell_width,
            viewport_width,
        }
    }

    /// Whole cells that fit in the viewport, at least one.
    pub fn visible_count(&self) -> usize {
        ((self.viewport_width / self.cell_width).floor() as usize).max(1)
    }

    /// The same metrics with the viewport cut down to the widest odd number of
    /// whole cells that fits. Only then does the midpoint pointer fall on the
    /// center of the cell at `center_index`.
    pub fn framed(&self) -> Self {
        let count = self.visible_count();
        let odd = if count % 2 == 0 { count - 1 } else { count };
        Self {
            cell_width: self.cell_width,
            viewport_width: odd as f64 * self.cell_width,
        }
    }

    /// Cell position (in viewport cells) that sits under the centered pointer.
    pub fn center_index(&self) -> usize {
        (self.viewport_width / self.cell_width / 2.0).floor() as usize
    }

    /// Distance to translate the strip left so `step_index` ends up under the
    /// pointer. Negative when the step is already left of center.
    pub fn offset(&self, step_index: usize) -> f64 {
        (step_index as f64 - self.center_index() as f64) * self.cell_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_centers_step() {
        let metrics = CellMetrics::measure(Some(100.0), 500.0);
        assert_eq!(metrics.visible_count(), 5);
        assert_eq!(metrics.center_index(), 2);
        assert_eq!(metrics.offset(16), 1400.0);
    }

    #[test]
    fn test_offset_grows_by_cell_width() {
        let metrics = CellMetrics::measure(Some(87.5), 390.0);
        for step in 0..40 {
            let delta = metrics.offset(step + 1) - metrics.offset(step);
            assert!((delta - 87.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fallback_width() {
        assert_eq!(CellMetrics::measure(None, 300.0).cell_width, FALLBACK_CELL_WIDTH);
        assert_eq!(CellMetrics::measure(Some(0.0), 300.0).cell_width, FALLBACK_CELL_WIDTH);
        assert_eq!(CellMetrics::measure(Some(f64::NAN), 300.0).cell_width, FALLBACK_CELL_WIDTH);
    }

    #[test]
    fn test_framed_viewport_is_odd() {
        let even = CellMetrics::measure(Some(100.0), 400.0).framed();
        assert_eq!(even.viewport_width, 300.0);
        assert_eq!(even.visible_count(), 3);
        assert_eq!(even.center_index(), 1);
        // Step cell starts at center * w, so its middle is the viewport middle.
        let left = 21.0 * 100.0 - even.offset(21);
        assert_eq!(left + 50.0, even.viewport_width / 2.0);

        let ragged = CellMetrics::measure(Some(87.5), 390.0).framed();
        assert_eq!(ragged.viewport_width, 262.5);
        assert_eq!(ragged.center_index(), 1);

        let odd = CellMetrics::measure(Some(100.0), 500.0);
        assert_eq!(odd.framed(), odd);
    }

    #[test]
    fn test_narrow_viewport() {
        let metrics = CellMetrics::measure(Some(120.0), 50.0);
        assert_eq!(metrics.visible_count(), 1);
        assert_eq!(metrics.center_index(), 0);
        assert_eq!(metrics.offset(3), 360.0);
        assert_eq!(metrics.framed().viewport_width, 120.0);
    }
}
