//! Evacuation Simulation Library
//!
//! A discrete-event simulation of vehicles evacuating through a
//! capacity-constrained road network.

pub mod simulation;
