//! Drag selection math

use capture_gdi::Rect;

/// Calculate the normalized selection rectangle from two drag points
pub fn calc_selection_rect(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Rect {
    let x = start_x.min(end_x);
    let y = start_y.min(end_y);
    let width = (start_x - end_x).unsigned_abs();
    let height = (start_y - end_y).unsigned_abs();

    Rect::new(x, y, width, height)
}

/// Minimum selection size in either dimension
pub const MIN_SELECTION_SIZE: u32 = 10;

/// Check if a selection is large enough to count
pub fn is_valid_selection(rect: &Rect) -> bool {
    rect.width >= MIN_SELECTION_SIZE && rect.height >= MIN_SELECTION_SIZE
}

/// Normalize a drag into a region, or `None` when there is no active drag
/// or the dragged rectangle is under the minimum size.
pub fn selection_from_drag(
    start: Option<(i32, i32)>,
    end: Option<(i32, i32)>,
) -> Option<Rect> {
    let (sx, sy) = start?;
    let (ex, ey) = end?;
    let rect = calc_selection_rect(sx, sy, ex, ey);
    is_valid_selection(&rect).then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_to_min_corner() {
        let r = calc_selection_rect(300, 250, 100, 100);
        assert_eq!(r, Rect::new(100, 100, 200, 150));
    }

    #[test]
    fn symmetric_in_its_points() {
        let a = calc_selection_rect(40, 400, 620, 90);
        let b = calc_selection_rect(620, 90, 40, 400);
        assert_eq!(a, b);
    }

    #[test]
    fn negative_coordinates() {
        let r = calc_selection_rect(-50, -20, 30, 40);
        assert_eq!(r, Rect::new(-50, -20, 80, 60));
    }

    #[test]
    fn too_small_in_either_dimension_is_none() {
        // 9 px wide fails, 10 px passes
        assert_eq!(selection_from_drag(Some((0, 0)), Some((9, 100))), None);
        assert_eq!(selection_from_drag(Some((0, 0)), Some((100, 9))), None);
        assert_eq!(
            selection_from_drag(Some((0, 0)), Some((10, 10))),
            Some(Rect::new(0, 0, 10, 10))
        );
    }

    #[test]
    fn zero_area_click_is_none() {
        assert_eq!(selection_from_drag(Some((5, 5)), Some((5, 5))), None);
    }

    #[test]
    fn missing_points_are_none() {
        assert_eq!(selection_from_drag(None, Some((0, 0))), None);
        assert_eq!(selection_from_drag(Some((0, 0)), None), None);
        assert_eq!(selection_from_drag(None, None), None);
    }
}
