//! Shelf packer with power-of-two row heights.
//!
//! Every request is rounded up to a power-of-two height class (at least 2).
//! Each class owns at most one open shelf; rectangles go left to right along
//! it. When the shelf is full, a new one of the same height is opened below
//! all existing shelves and the old one is abandoned.

use crate::basics::IPoint16;
use crate::rectanizer::{check_atlas_size, fill_ratio, Rectanizer};

const MIN_HEIGHT_POW2: i32 = 2;
const MAX_EXPONENT: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
struct Row {
    loc: IPoint16,
    row_height: i32,
}

impl Row {
    fn can_add_width(&self, width: i32, container_width: i32) -> bool {
        self.loc.x as i32 + width <= container_width
    }
}

/// Power-of-two shelf packer.
#[derive(Debug, Clone)]
pub struct RectanizerPow2 {
    width: i32,
    height: i32,
    rows: [Row; MAX_EXPONENT],
    next_strip_y: i32,
    area_so_far: i32,
}

impl RectanizerPow2 {
    pub fn new(width: i32, height: i32) -> Self {
        check_atlas_size(width, height);
        Self {
            width,
            height,
            rows: [Row::default(); MAX_EXPONENT],
            next_strip_y: 0,
            area_so_far: 0,
        }
    }

    /// Shelf slot for a power-of-two `height`.
    #[inline]
    fn height_to_row_index(height: i32) -> usize {
        debug_assert!(height >= MIN_HEIGHT_POW2 && (height as u32).is_power_of_two());
        (32 - (height as u32 - 1).leading_zeros()) as usize
    }

    fn can_add_strip(&self, height: i32) -> bool {
        self.next_strip_y + height <= self.height
    }

    fn init_row(&mut self, index: usize, height: i32) {
        self.rows[index] = Row {
            loc: IPoint16::new(0, self.next_strip_y as i16),
            row_height: height,
        };
        self.next_strip_y += height;
    }
}

impl Rectanizer for RectanizerPow2 {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn add_rect(&mut self, width: i32, height: i32) -> Option<IPoint16> {
        if width <= 0 || height <= 0 {
            return None;
        }
        if width > self.width || height > self.height {
            tracing::trace!(width, height, "rect larger than pow2 atlas");
            return None;
        }

        let area = width * height;
        let class_height = (height as u32).next_power_of_two().max(MIN_HEIGHT_POW2 as u32) as i32;
        let index = Self::height_to_row_index(class_height);

        let row = self.rows[index];
        if row.row_height == 0 || !row.can_add_width(width, self.width) {
            if !self.can_add_strip(class_height) {
                tracing::trace!(width, height, class_height, "no strip left in pow2 atlas");
                return None;
            }
            self.init_row(index, class_height);
        }

        let row = &mut self.rows[index];
        let loc = row.loc;
        row.loc.x += width as i16;
        self.area_so_far += area;
        Some(loc)
    }

    fn percent_full(&self) -> f32 {
        fill_ratio(self.area_so_far, self.width, self.height)
    }

    fn reset(&mut self) {
        tracing::trace!(width = self.width, height = self.height, "reset pow2 rectanizer");
        self.next_strip_y = 0;
        self.area_so_far = 0;
        self.rows = [Row::default(); MAX_EXPONENT];
    }
}
