use super::entities::Color;

const HEIGHT_HASH_PRIME: i64 = 7919;

/// One parallax mountain layer. Peak heights are a pure function of the
/// peak index, so the same camera position always yields the same skyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountainRange {
    pub spacing: i64,
    pub parallax_divisor: i64,
    pub base_height: i64,
    pub hash_offset: i64,
    pub height_span: i64,
    pub width: i64,
    /// Distance of the range's base line above the ground line.
    pub base_lift: i64,
    pub color: Color,
}

/// Far to near.
pub const MOUNTAIN_RANGES: [MountainRange; 3] = [
    MountainRange {
        spacing: 150,
        parallax_divisor: 5,
        base_height: 120,
        hash_offset: 0,
        height_span: 100,
        width: 180,
        base_lift: 50,
        color: [82, 113, 199, 255],
    },
    MountainRange {
        spacing: 200,
        parallax_divisor: 3,
        base_height: 180,
        hash_offset: 3541,
        height_span: 70,
        width: 220,
        base_lift: 40,
        color: [62, 88, 180, 255],
    },
    MountainRange {
        spacing: 280,
        parallax_divisor: 2,
        base_height: 220,
        hash_offset: 1123,
        height_span: 80,
        width: 300,
        base_lift: 30,
        color: [42, 58, 140, 255],
    },
];

/// Triangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub index: i64,
    pub apex_x: i32,
    pub apex_y: i32,
    pub base_y: i32,
    pub half_base: i32,
}

impl MountainRange {
    pub fn height_of(&self, index: i64) -> i64 {
        self.base_height + (index * HEIGHT_HASH_PRIME + self.hash_offset).rem_euclid(self.height_span)
    }

    /// Every peak whose base overlaps the screen for a camera at `camera_x`.
    /// The range scrolls one pixel per `parallax_divisor` camera pixels.
    pub fn peaks(&self, camera_x: i32, screen_width: i32, ground_level: i32) -> Vec<Peak> {
        let scroll = i64::from(camera_x).div_euclid(self.parallax_divisor);
        let half_base = self.width / 2;
        let first = (scroll - half_base).div_euclid(self.spacing);
        let last = (scroll + i64::from(screen_width) + half_base).div_euclid(self.spacing);
        let base_y = i64::from(ground_level) - self.base_lift;

        (first..=last)
            .map(|index| Peak {
                index,
                apex_x: saturate(index * self.spacing - scroll),
                apex_y: saturate(base_y - self.height_of(index)),
                base_y: saturate(base_y),
                half_base: saturate(half_base),
            })
            .collect()
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skyline_is_a_pure_function_of_camera() {
        for range in &MOUNTAIN_RANGES {
            assert_eq!(range.peaks(4321, 800, 500), range.peaks(4321, 800, 500));
        }
    }

    #[test]
    fn heights_stay_within_span() {
        for range in &MOUNTAIN_RANGES {
            for index in 0..500 {
                let height = range.height_of(index);
                assert!(height >= range.base_height);
                assert!(height < range.base_height + range.height_span);
            }
        }
    }

    #[test]
    fn far_range_heights_match_hash() {
        let far = MOUNTAIN_RANGES[0];
        assert_eq!(far.height_of(0), 120);
        assert_eq!(far.height_of(1), 120 + 19);
        assert_eq!(far.height_of(3), 120 + 57);
    }

    #[test]
    fn peaks_sit_on_lifted_base_line() {
        let near = MOUNTAIN_RANGES[2];
        let peaks = near.peaks(0, 800, 500);
        assert!(!peaks.is_empty());
        for peak in &peaks {
            assert_eq!(peak.base_y, 470);
            assert!(peak.apex_y < peak.base_y);
            assert_eq!(peak.half_base, 150);
        }
    }

    #[test]
    fn peaks_cover_the_whole_screen() {
        for range in &MOUNTAIN_RANGES {
            for camera in [0, 777, 10_000, 1_000_000] {
                let peaks = range.peaks(camera, 800, 500);
                let left = peaks.iter().map(|peak| peak.apex_x - peak.half_base).min();
                let right = peaks.iter().map(|peak| peak.apex_x + peak.half_base).max();
                assert!(left.expect("peaks") <= 0);
                assert!(right.expect("peaks") >= 800);
            }
        }
    }

    #[test]
    fn ranges_scroll_slower_than_camera() {
        for range in &MOUNTAIN_RANGES {
            let at_rest = range.peaks(0, 800, 500);
            let moved = range.peaks(10 * range.parallax_divisor as i32, 800, 500);
            let find = |peaks: &[Peak]| {
                peaks
                    .iter()
                    .find(|peak| peak.index == 2)
                    .map(|peak| (peak.apex_x, peak.apex_y))
            };
            let (rest_x, rest_y) = find(&at_rest).expect("peak 2 at rest");
            let (moved_x, moved_y) = find(&moved).expect("peak 2 moved");
            assert_eq!(moved_x, rest_x - 10);
            assert_eq!(moved_y, rest_y);
        }
    }
}
