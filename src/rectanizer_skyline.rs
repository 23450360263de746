//! Skyline packer.
//!
//! The top edge of the packed area is kept as a list of horizontal segments
//! covering the full atlas width, left to right, with no gaps. A rectangle
//! goes where its bottom edge sits lowest; ties go to the narrowest
//! starting segment.

use crate::basics::IPoint16;
use crate::rectanizer::{check_atlas_size, fill_ratio, Rectanizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    x: i32,
    y: i32,
    width: i32,
}

/// Segment-list skyline packer.
#[derive(Debug, Clone)]
pub struct RectanizerSkyline {
    width: i32,
    height: i32,
    skyline: Vec<Segment>,
    area_so_far: i32,
}

impl RectanizerSkyline {
    pub fn new(width: i32, height: i32) -> Self {
        check_atlas_size(width, height);
        let mut r = Self {
            width,
            height,
            skyline: Vec::new(),
            area_so_far: 0,
        };
        r.reset_skyline();
        r
    }

    fn reset_skyline(&mut self) {
        self.skyline.clear();
        self.skyline.push(Segment {
            x: 0,
            y: 0,
            width: self.width,
        });
    }

    /// The y a `width` x `height` rectangle would sit at when its left edge
    /// is at segment `index`, if it fits there.
    fn rectangle_fits(&self, index: usize, width: i32, height: i32) -> Option<i32> {
        let x = self.skyline[index].x;
        if x + width > self.width {
            return None;
        }

        let mut width_left = width;
        let mut i = index;
        let mut y = self.skyline[index].y;
        while width_left > 0 {
            y = y.max(self.skyline[i].y);
            if y + height > self.height {
                return None;
            }
            width_left -= self.skyline[i].width;
            i += 1;
            debug_assert!(i < self.skyline.len() || width_left <= 0);
        }
        Some(y)
    }

    /// Raise the skyline under a rectangle placed at `(x, y)` starting at
    /// segment `index`.
    fn add_skyline_level(&mut self, index: usize, x: i32, y: i32, width: i32, height: i32) {
        self.skyline.insert(
            index,
            Segment {
                x,
                y: y + height,
                width,
            },
        );

        // Trim the segments now covered by the new one.
        let mut i = index + 1;
        while i < self.skyline.len() {
            let prev = self.skyline[i - 1];
            let prev_right = prev.x + prev.width;
            let seg = &mut self.skyline[i];
            if seg.x >= prev_right {
                break;
            }
            let shrink = prev_right - seg.x;
            seg.x += shrink;
            seg.width -= shrink;
            if seg.width > 0 {
                break;
            }
            self.skyline.remove(i);
        }

        // Merge neighbours at the same height.
        let mut i = 0;
        while i + 1 < self.skyline.len() {
            if self.skyline[i].y == self.skyline[i + 1].y {
                self.skyline[i].width += self.skyline[i + 1].width;
                self.skyline.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

impl Rectanizer for RectanizerSkyline {
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
            tracing::trace!(width, height, "rect larger than skyline atlas");
            return None;
        }

        // (index, x, y, segment width)
        let mut best: Option<(usize, i32, i32, i32)> = None;
        for (i, seg) in self.skyline.iter().enumerate() {
            if let Some(y) = self.rectangle_fits(i, width, height) {
                let better = match best {
                    None => true,
                    Some((_, _, best_y, best_width)) => {
                        y < best_y || (y == best_y && seg.width < best_width)
                    }
                };
                if better {
                    best = Some((i, seg.x, y, seg.width));
                }
            }
        }

        let Some((index, x, y, _)) = best else {
            tracing::trace!(width, height, segments = self.skyline.len(), "skyline atlas full");
            return None;
        };
        self.add_skyline_level(index, x, y, width, height);
        self.area_so_far += width * height;
        Some(IPoint16::new(x as i16, y as i16))
    }

    fn percent_full(&self) -> f32 {
        fill_ratio(self.area_so_far, self.width, self.height)
    }

    fn reset(&mut self) {
        tracing::trace!(width = self.width, height = self.height, "reset skyline rectanizer");
        self.area_so_far = 0;
        self.reset_skyline();
    }
}
