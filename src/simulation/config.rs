//! Tunable parameters for a simulation run

use super::error::{SimError, SimResult};
use super::types::{
    Node, CAR_LENGTH, DEFAULT_FILL_FRACTION, DEPARTURE_MEAN, MAX_ITERATIONS, MEAN_TRAVEL_TIME,
    MEAN_WAITING_TIME, WEST_TOLERANCE,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Vehicle footprint used to turn segment length into capacity
    pub car_length: f64,
    /// Mean of the exponential gap between departures from a lot
    pub departure_mean: f64,
    pub travel_time: f64,
    pub waiting_time: f64,
    pub west_tolerance: f64,
    /// Fraction of each lot's spaces holding a departing vehicle
    pub fill_fraction: f64,
    pub max_iterations: u64,
    pub exits: Vec<Node>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            car_length: CAR_LENGTH,
            departure_mean: DEPARTURE_MEAN,
            travel_time: MEAN_TRAVEL_TIME,
            waiting_time: MEAN_WAITING_TIME,
            west_tolerance: WEST_TOLERANCE,
            fill_fraction: DEFAULT_FILL_FRACTION,
            max_iterations: MAX_ITERATIONS,
            exits: Vec::new(),
        }
    }
}

impl SimConfig {
    pub fn with_exits(exits: Vec<Node>) -> Self {
        Self {
            exits,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(0.0..=1.0).contains(&self.fill_fraction) {
            return Err(SimError::InvalidConfig(format!(
                "fill fraction {} is outside [0, 1]",
                self.fill_fraction
            )));
        }
        if !(self.car_length > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "car length must be positive, got {}",
                self.car_length
            )));
        }
        if !(self.departure_mean > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "departure mean must be positive, got {}",
                self.departure_mean
            )));
        }
        // A zero waiting time would let a blocked vehicle spin without time advancing
        if !(self.waiting_time > 0.0) || self.travel_time < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "waiting time must be positive and travel time non-negative, got {} / {}",
                self.waiting_time, self.travel_time
            )));
        }
        Ok(())
    }
}
