//! Fixed-timestep player and camera state.

use crate::math::Vec3;
use crate::road::Road;

/// What happens when the player drives past the last segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndOfRoad {
    /// Jump back by the road length so the road never ends.
    #[default]
    Wrap,
    /// Stop at the end of the road.
    Clamp,
}

/// Result of a single [`SimulationState::advance`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still on the road.
    Moved,
    /// Passed an end of the road and wrapped around. `lap` is the lap count after wrapping.
    Wrapped { lap: i64 },
    /// Hit an end of the road and stopped.
    Clamped,
}

/// Player and camera state. Only the fixed tick writes to it.
///
/// The camera is never set on its own: it is always `player_position + camera_offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub player_position: Vec3,
    pub camera_position: Vec3,
    /// World units per second along z
    pub speed: f64,
    camera_offset: Vec3,
    end_of_road: EndOfRoad,
    /// Segment found on the previous step, where the next lookup starts
    segment_index: usize,
    laps: i64,
}

impl SimulationState {
    pub fn new(speed: f64, camera_offset: Vec3, end_of_road: EndOfRoad) -> Self {
        Self {
            player_position: Vec3::ZERO,
            camera_position: camera_offset,
            speed,
            camera_offset,
            end_of_road,
            segment_index: 0,
            laps: 0,
        }
    }

    #[inline]
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    #[inline]
    pub fn laps(&self) -> i64 {
        self.laps
    }

    #[inline]
    pub fn camera_offset(&self) -> Vec3 {
        self.camera_offset
    }

    /// Moves the player `speed * dt` along z, snaps it to the elevation of the segment under it
    /// and re-derives the camera.
    pub fn advance(&mut self, dt: f64, road: &Road) -> Advance {
        self.player_position.z += self.speed * dt;
        let outcome = self.keep_on_road(road);

        let index = road
            .locate(self.player_position.z, self.segment_index)
            .unwrap_or_else(|| last_drivable(road));
        self.segment_index = index;
        if let Some(segment) = road.get(index) {
            self.player_position.y = segment.y0;
        }

        self.camera_position = self.player_position + self.camera_offset;
        outcome
    }

    /// Brings `player_position.z` back into the drivable span according to the end-of-road policy.
    fn keep_on_road(&mut self, road: &Road) -> Advance {
        let start = road.first().z0;
        let length = road.length();
        let z = self.player_position.z;

        // A single-segment road has nowhere to go.
        if length <= 0.0 {
            self.player_position.z = start;
            return if z == start { Advance::Moved } else { Advance::Clamped };
        }

        let end = start + length;
        if (start..end).contains(&z) {
            return Advance::Moved;
        }

        match self.end_of_road {
            EndOfRoad::Wrap => {
                let offset = z - start;
                self.laps += (offset / length).floor() as i64;
                // rem_euclid rounds tiny negative offsets up to `length`
                self.player_position.z = (start + offset.rem_euclid(length)).min(just_below(end));
                self.segment_index = 0;
                log::debug!("wrapped to z={:.1}, lap {}", self.player_position.z, self.laps);
                Advance::Wrapped { lap: self.laps }
            }
            EndOfRoad::Clamp => {
                self.player_position.z = if z >= end { just_below(end) } else { start };
                self.speed = 0.0;
                log::debug!("reached the end of the road at z={:.1}", self.player_position.z);
                Advance::Clamped
            }
        }
    }
}

fn last_drivable(road: &Road) -> usize {
    road.len().saturating_sub(2)
}

/// Largest z still inside the half-open span ending at `end`.
fn just_below(end: f64) -> f64 {
    end - end.abs().max(1.0) * f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RoadConfig;
    use crate::math::vec3;
    use crate::road::RoadGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const OFFSET: Vec3 = vec3(0.0, 3.0, -5.0);

    fn road(segment_count: usize) -> Road {
        let config = RoadConfig { segment_count, ..RoadConfig::default() };
        RoadGenerator::new(&config).unwrap().generate(&mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn one_second_of_ticks_at_400() {
        let road = road(4096);
        let mut sim = SimulationState::new(400.0, OFFSET, EndOfRoad::Wrap);
        for _ in 0..50 {
            assert_eq!(sim.advance(1.0 / 50.0, &road), Advance::Moved);
        }
        assert_eq!(sim.player_position.z, 400.0);
        assert_eq!(sim.segment_index(), 4);
    }

    #[test]
    fn player_snaps_to_segment_elevation_and_camera_follows() {
        let road = road(4096);
        let mut sim = SimulationState::new(400.0, OFFSET, EndOfRoad::Wrap);
        for _ in 0..200 {
            sim.advance(0.02, &road);
            let seg = road.get(sim.segment_index()).unwrap();
            assert!(seg.contains_z(sim.player_position.z));
            assert_eq!(sim.player_position.y, seg.y0);
            assert_eq!(sim.camera_position, sim.player_position + OFFSET);
        }
    }

    #[test]
    fn wraps_past_the_end() {
        let road = road(10);
        assert_eq!(road.length(), 900.0);

        let mut sim = SimulationState::new(1000.0, OFFSET, EndOfRoad::Wrap);
        assert_eq!(sim.advance(1.0, &road), Advance::Wrapped { lap: 1 });
        assert_eq!(sim.player_position.z, 100.0);
        assert_eq!(sim.segment_index(), 1);
        assert_eq!(sim.player_position.y, road.get(1).unwrap().y0);
        assert_eq!(sim.camera_position.z, 95.0);
    }

    #[test]
    fn wraps_backwards_when_reversing() {
        let road = road(10);
        let mut sim = SimulationState::new(-50.0, OFFSET, EndOfRoad::Wrap);
        assert_eq!(sim.advance(1.0, &road), Advance::Wrapped { lap: -1 });
        assert_eq!(sim.player_position.z, 850.0);
        assert_eq!(sim.segment_index(), 8);
    }

    #[test]
    fn clamp_stops_at_the_end() {
        let road = road(10);
        let mut sim = SimulationState::new(1000.0, OFFSET, EndOfRoad::Clamp);
        assert_eq!(sim.advance(1.0, &road), Advance::Clamped);
        let z = sim.player_position.z;
        assert!(z < 900.0 && z > 899.999, "z = {z}");
        assert_eq!(sim.speed, 0.0);
        assert_eq!(sim.segment_index(), 8);

        let seg = road.get(sim.segment_index()).unwrap();
        assert!(seg.contains_z(z));
        assert_eq!(sim.player_position.y, seg.y0);

        // Stopped for good
        sim.advance(1.0, &road);
        assert_eq!(sim.player_position.z, z);
    }

    #[test]
    fn clamp_at_the_start_when_reversing() {
        let road = road(10);
        let mut sim = SimulationState::new(-1000.0, OFFSET, EndOfRoad::Clamp);
        assert_eq!(sim.advance(1.0, &road), Advance::Clamped);
        assert_eq!(sim.player_position.z, 0.0);
        assert_eq!(sim.segment_index(), 0);
        assert!(road.get(0).unwrap().contains_z(0.0));
    }

    #[test]
    fn tiny_reverse_step_wraps_onto_the_last_drivable_segment() {
        let road = road(10);
        let mut sim = SimulationState::new(-1e-14, OFFSET, EndOfRoad::Wrap);
        assert_eq!(sim.advance(1.0, &road), Advance::Wrapped { lap: -1 });

        let z = sim.player_position.z;
        assert!(z < 900.0, "z = {z}");
        assert_eq!(sim.segment_index(), 8);
        assert!(road.get(8).unwrap().contains_z(z));
        assert_eq!(sim.player_position.y, road.get(8).unwrap().y0);
    }

    #[test]
    fn single_segment_road_pins_the_player() {
        let road = road(1);
        let mut sim = SimulationState::new(400.0, OFFSET, EndOfRoad::Wrap);
        assert_eq!(sim.advance(0.02, &road), Advance::Clamped);
        assert_eq!(sim.player_position.z, 0.0);
        assert_eq!(sim.segment_index(), 0);
    }
}
