//! Column-profile packer.
//!
//! Keeps the height already used in every atlas column. A rectangle of width
//! `w` placed at column `x` rests on the tallest of columns `x..x + w`; the
//! packer takes the lowest such resting height, and the leftmost column among
//! equals. Window maxima come from a monotonic deque, so one request costs a
//! single pass over the profile.
//!
//! The profile carries one sentinel column past the right edge, pinned at the
//! atlas height. A window that runs into it rests at the top of the atlas and
//! never fits.

use std::collections::VecDeque;

use crate::basics::IPoint16;
use crate::rectanizer::{check_atlas_size, fill_ratio, Rectanizer};

/// Height-profile packer.
#[derive(Debug, Clone)]
pub struct RectanizerOptimized {
    width: i32,
    height: i32,
    /// `width + 1` entries; the last is the sentinel.
    profile: Vec<i32>,
    /// Scratch for the sliding window maximum.
    window: VecDeque<usize>,
    area_so_far: i32,
}

impl RectanizerOptimized {
    pub fn new(width: i32, height: i32) -> Self {
        check_atlas_size(width, height);
        Self {
            width,
            height,
            profile: Self::empty_profile(width, height),
            window: VecDeque::with_capacity(width as usize + 1),
            area_so_far: 0,
        }
    }

    fn empty_profile(width: i32, height: i32) -> Vec<i32> {
        let mut profile = vec![0; width as usize + 1];
        profile[width as usize] = height;
        profile
    }

    /// Lowest resting height for a rectangle of `width` columns, with the
    /// leftmost column achieving it.
    fn lowest_fit(&mut self, width: usize) -> (usize, i32) {
        let profile = &self.profile;
        let window = &mut self.window;
        window.clear();

        let mut best = (0, i32::MAX);
        for (i, &h) in profile.iter().enumerate() {
            while window.back().is_some_and(|&j| profile[j] <= h) {
                window.pop_back();
            }
            window.push_back(i);
            if i + 1 < width {
                continue;
            }
            let x = i + 1 - width;
            while window.front().is_some_and(|&j| j < x) {
                window.pop_front();
            }
            let y = window.front().map_or(0, |&j| profile[j]);
            if y < best.1 {
                best = (x, y);
            }
        }
        best
    }
}

impl Rectanizer for RectanizerOptimized {
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
            tracing::trace!(width, height, "rect larger than atlas");
            return None;
        }

        let (x, y) = self.lowest_fit(width as usize);
        if y + height > self.height {
            tracing::trace!(width, height, lowest = y, "atlas full");
            return None;
        }

        self.profile[x..x + width as usize].fill(y + height);
        self.area_so_far += width * height;
        Some(IPoint16::new(x as i16, y as i16))
    }

    fn percent_full(&self) -> f32 {
        fill_ratio(self.area_so_far, self.width, self.height)
    }

    fn reset(&mut self) {
        tracing::trace!(width = self.width, height = self.height, "reset rectanizer");
        let columns = self.width as usize;
        self.profile[..columns].fill(0);
        self.area_so_far = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_then_leftmost() {
        let mut r = RectanizerOptimized::new(100, 100);
        assert_eq!(r.add_rect(50, 10), Some(IPoint16::new(0, 0)));
        assert_eq!(r.add_rect(10, 30), Some(IPoint16::new(50, 0)));
        assert_eq!(r.add_rect(40, 10), Some(IPoint16::new(60, 0)));
        // Equal resting heights at x = 0 and x = 60: the left one wins.
        assert_eq!(r.add_rect(20, 5), Some(IPoint16::new(0, 10)));
    }

    #[test]
    fn test_rests_on_tallest_column() {
        let mut r = RectanizerOptimized::new(10, 10);
        r.add_rect(3, 2).unwrap();
        r.add_rect(3, 6).unwrap();
        r.add_rect(4, 4).unwrap();
        assert_eq!(r.profile, vec![2, 2, 2, 6, 6, 6, 4, 4, 4, 4, 10]);
        // Any window over columns 3..6 rests at 6.
        assert_eq!(r.add_rect(4, 1), Some(IPoint16::new(6, 4)));
        assert_eq!(r.add_rect(5, 1), Some(IPoint16::new(0, 6)));
    }

    #[test]
    fn test_full_width_request() {
        let mut r = RectanizerOptimized::new(8, 8);
        r.add_rect(2, 5).unwrap();
        assert_eq!(r.add_rect(8, 3), Some(IPoint16::new(0, 5)));
        assert_eq!(r.add_rect(8, 1), None);
        assert_eq!(r.add_rect(1, 1), None);
    }

    #[test]
    fn test_failure_is_atomic() {
        let mut r = RectanizerOptimized::new(16, 16);
        r.add_rect(16, 12).unwrap();
        let profile = r.profile.clone();
        let full = r.percent_full();
        assert_eq!(r.add_rect(4, 5), None);
        assert_eq!(r.profile, profile);
        assert_eq!(r.percent_full(), full);
        assert_eq!(r.add_rect(4, 4), Some(IPoint16::new(0, 12)));
    }

    #[test]
    fn test_reset() {
        let mut r = RectanizerOptimized::new(16, 16);
        r.add_rect(5, 9).unwrap();
        r.reset();
        assert!(r.profile[..16].iter().all(|&h| h == 0));
        assert_eq!(r.profile[16], 16);
        assert_eq!(r.add_rect(16, 16), Some(IPoint16::new(0, 0)));
    }

    #[test]
    fn test_sentinel_column_caps_the_right_edge() {
        let mut r = RectanizerOptimized::new(6, 4);
        assert_eq!(r.profile, vec![0, 0, 0, 0, 0, 0, 4]);
        r.add_rect(6, 1).unwrap();
        assert_eq!(r.profile[6], 4);
        // Only the right column is low; the sentinel keeps wider requests off it.
        r.add_rect(5, 3).unwrap();
        assert_eq!(r.add_rect(2, 1), None);
        assert_eq!(r.add_rect(1, 3), Some(IPoint16::new(5, 1)));
        assert_eq!(r.profile[6], 4);
    }
}
