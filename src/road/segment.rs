use crate::math::{vec3, Vec3};

/// A fixed-length slice of the road centerline.
///
/// `(x0, y0, z0)` is the near edge and `(x1, y1, z1)` the far edge. Consecutive segments share
/// an edge: the far edge of segment `i - 1` is the near edge of segment `i`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadSegment {
    pub x0: f64,
    pub y0: f64,
    pub z0: f64,
    pub x1: f64,
    pub y1: f64,
    pub z1: f64,
    /// Selects the light terrain/road colors and enables lane stripes.
    pub is_strip: bool,
}

impl RoadSegment {
    #[inline]
    pub fn near(&self) -> Vec3 {
        vec3(self.x0, self.y0, self.z0)
    }

    #[inline]
    pub fn far(&self) -> Vec3 {
        vec3(self.x1, self.y1, self.z1)
    }

    /// Half-open `z0 <= z < z1`. Always false for the flat cap at the end of the road.
    #[inline]
    pub fn contains_z(&self, z: f64) -> bool {
        self.z0 <= z && z < self.z1
    }
}

/// Ordered, immutable road. Segments are stored by ascending `z0` and there is at least one.
#[derive(Debug, Clone)]
pub struct Road {
    segments: Vec<RoadSegment>,
}

impl Road {
    /// Wraps an already stitched segment list. Callers guarantee ascending `z0` and a non-empty list.
    pub(crate) fn from_segments(segments: Vec<RoadSegment>) -> Self {
        debug_assert!(!segments.is_empty(), "a road needs at least one segment");
        debug_assert!(segments.windows(2).all(|w| w[0].z0 <= w[1].z0));
        Self { segments }
    }

    #[inline]
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&RoadSegment> {
        self.segments.get(index)
    }

    #[inline]
    pub fn first(&self) -> &RoadSegment {
        &self.segments[0]
    }

    #[inline]
    pub fn last(&self) -> &RoadSegment {
        &self.segments[self.segments.len() - 1]
    }

    /// Drivable span along z: from the first near edge to the last far edge.
    pub fn length(&self) -> f64 {
        self.last().z1 - self.first().z0
    }

    /// Index of the segment containing `z`, scanning forward from `hint`.
    ///
    /// The hint is the previous result while the player moves forward, which keeps the scan to a
    /// step or two per tick. A hint past `z` falls back to a binary search.
    pub fn locate(&self, z: f64, hint: usize) -> Option<usize> {
        let start = match self.segments.get(hint) {
            Some(seg) if seg.z0 <= z => hint,
            _ => self.segments.partition_point(|s| s.z0 <= z).saturating_sub(1),
        };

        self.segments[start..]
            .iter()
            .position(|s| s.contains_z(z))
            .map(|offset| start + offset)
    }

    /// Contiguous run of segments with `lo <= z0 <= hi`, in stored order.
    pub fn between(&self, lo: f64, hi: f64) -> &[RoadSegment] {
        let begin = self.segments.partition_point(|s| s.z0 < lo);
        let end = self.segments.partition_point(|s| s.z0 <= hi);
        if begin >= end {
            return &[];
        }
        &self.segments[begin..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(count: usize, length: f64) -> Road {
        let mut segments: Vec<RoadSegment> = (0..count)
            .map(|i| {
                let z = i as f64 * length;
                RoadSegment { x0: 0.0, y0: i as f64, z0: z, x1: 0.0, y1: 0.0, z1: z, is_strip: false }
            })
            .collect();
        for i in 1..count {
            segments[i - 1].y1 = segments[i].y0;
            segments[i - 1].z1 = segments[i].z0;
        }
        Road::from_segments(segments)
    }

    #[test]
    fn locate_uses_half_open_intervals() {
        let road = straight(10, 100.0);
        assert_eq!(road.locate(0.0, 0), Some(0));
        assert_eq!(road.locate(99.9, 0), Some(0));
        assert_eq!(road.locate(100.0, 0), Some(1));
        assert_eq!(road.locate(850.0, 3), Some(8));
    }

    #[test]
    fn locate_recovers_from_a_stale_hint() {
        let road = straight(10, 100.0);
        assert_eq!(road.locate(150.0, 7), Some(1));
        assert_eq!(road.locate(150.0, 999), Some(1));
    }

    #[test]
    fn locate_past_the_end_finds_nothing() {
        let road = straight(10, 100.0);
        assert_eq!(road.length(), 900.0);
        assert_eq!(road.locate(900.0, 8), None);
        assert_eq!(road.locate(12_345.0, 0), None);
    }

    #[test]
    fn between_is_inclusive_on_both_ends() {
        let road = straight(10, 100.0);
        let run = road.between(200.0, 500.0);
        let zs: Vec<f64> = run.iter().map(|s| s.z0).collect();
        assert_eq!(zs, vec![200.0, 300.0, 400.0, 500.0]);

        assert!(road.between(950.0, 2000.0).is_empty());
        assert_eq!(road.between(-50.0, 40.0).len(), 1);
    }
}
