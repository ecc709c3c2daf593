use ratatui::layout::{Rect, Size};

/// Box of `size` centered in `area`, shrunk to fit.
pub fn centered(area: Rect, size: Size) -> Rect {
    let width = size.width.min(area.width);
    let height = size.height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Box of `size` against the right edge of `area`, `top` rows down,
/// leaving one column of margin when there is room.
pub fn top_right(area: Rect, size: Size, top: u16) -> Rect {
    let width = size.width.min(area.width);
    let height = size.height.min(area.height);
    Rect {
        x: area.right().saturating_sub(width + 1).max(area.x),
        y: area
            .y
            .saturating_add(top)
            .min(area.bottom().saturating_sub(height)),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_is_clamped_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, Size::new(10, 4)), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, Size::new(40, 40)), area);
    }

    #[test]
    fn top_right_box_stays_inside_short_areas() {
        let area = Rect::new(0, 0, 30, 5);
        assert_eq!(top_right(area, Size::new(10, 3), 3), Rect::new(19, 2, 10, 3));
    }
}
