//! Run metrics and reporting
//!
//! The recorder is passive: the runner pushes samples into it and
//! reporting code reads them back out.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::error::SimResult;
use super::types::{Node, VehicleId};

/// Free capacity across the network right after an event was processed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacitySample {
    pub time: f64,
    pub free: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SimMetrics {
    pub capacity_series: Vec<CapacitySample>,
    /// Visited nodes per vehicle, starting at its lot
    pub paths: BTreeMap<VehicleId, Vec<Node>>,
    pub exit_counts: BTreeMap<Node, u32>,
    pub vehicles_generated: u64,
    pub vehicles_exited: u64,
    pub processed_events: u64,
    /// Whether the run stopped at the iteration cap
    pub truncated: bool,
}

impl SimMetrics {
    pub fn new(exits: &[Node]) -> Self {
        Self {
            exit_counts: exits.iter().map(|exit| (*exit, 0)).collect(),
            ..Self::default()
        }
    }

    pub fn record_vehicle(&mut self, id: VehicleId) {
        self.vehicles_generated += 1;
        self.paths.insert(id, vec![id.origin]);
    }

    pub fn record_move(&mut self, id: VehicleId, next: Node) {
        self.paths.entry(id).or_default().push(next);
    }

    pub fn record_exit(&mut self, exit: Node) {
        *self.exit_counts.entry(exit).or_default() += 1;
        self.vehicles_exited += 1;
    }

    pub fn record_capacity(&mut self, time: f64, free: u64) {
        self.capacity_series.push(CapacitySample { time, free });
    }

    pub fn in_flight(&self) -> u64 {
        self.vehicles_generated - self.vehicles_exited
    }

    pub fn path(&self, id: &VehicleId) -> Option<&[Node]> {
        self.paths.get(id).map(Vec::as_slice)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            vehicles_generated: self.vehicles_generated,
            vehicles_exited: self.vehicles_exited,
            in_flight: self.in_flight(),
            processed_events: self.processed_events,
            truncated: self.truncated,
            final_time: self.capacity_series.last().map(|s| s.time).unwrap_or(0.0),
            exit_counts: self.exit_counts.clone(),
        }
    }
}

/// End-of-run numbers handed to reporting
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub vehicles_generated: u64,
    pub vehicles_exited: u64,
    pub in_flight: u64,
    pub processed_events: u64,
    pub truncated: bool,
    pub final_time: f64,
    pub exit_counts: BTreeMap<Node, u32>,
}

impl RunSummary {
    pub fn log(&self) {
        log::info!("=== SIMULATION COMPLETE ===");
        log::info!("Final time: {:.2}", self.final_time);
        log::info!("Processed events: {}", self.processed_events);
        log::info!("Vehicles generated: {}", self.vehicles_generated);
        log::info!("Vehicles exited: {}", self.vehicles_exited);
        log::info!("Vehicles in flight: {}", self.in_flight);
        for (exit, count) in &self.exit_counts {
            log::info!("Exit {}: {}", exit, count);
        }
        if self.truncated {
            log::warn!("Run halted at the iteration cap");
        } else {
            log::info!("Run drained naturally");
        }
    }

    pub fn print(&self) {
        println!("=== Evacuation Summary ===");
        println!("Final time: {:.2}", self.final_time);
        println!("Processed events: {}", self.processed_events);
        println!(
            "Vehicles: generated={}, exited={}, in_flight={}",
            self.vehicles_generated, self.vehicles_exited, self.in_flight
        );
        println!("--- Exits ---");
        for (exit, count) in &self.exit_counts {
            println!("  {}: {}", exit, count);
        }
        println!(
            "Termination: {}",
            if self.truncated {
                "iteration cap reached"
            } else {
                "queue drained"
            }
        );
    }
}

pub fn write_capacity_csv<W: Write>(metrics: &SimMetrics, writer: W) -> SimResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["event", "time", "free_capacity"])?;
    for (index, sample) in metrics.capacity_series.iter().enumerate() {
        wtr.write_record([
            index.to_string(),
            sample.time.to_string(),
            sample.free.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_exit_counts_csv<W: Write>(metrics: &SimMetrics, writer: W) -> SimResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["exit_x", "exit_y", "vehicles"])?;
    for (exit, count) in &metrics.exit_counts {
        wtr.write_record([exit.x.to_string(), exit.y.to_string(), count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// One row per visited node, in visiting order
pub fn write_paths_csv<W: Write>(metrics: &SimMetrics, writer: W) -> SimResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["origin_x", "origin_y", "sequence", "step", "x", "y"])?;
    for (id, path) in &metrics.paths {
        for (step, node) in path.iter().enumerate() {
            wtr.write_record([
                id.origin.x.to_string(),
                id.origin.y.to_string(),
                id.sequence.to_string(),
                step.to_string(),
                node.x.to_string(),
                node.y.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `capacity.csv`, `exits.csv` and `paths.csv` into `dir`
pub fn export_to_dir(metrics: &SimMetrics, dir: &Path) -> SimResult<()> {
    std::fs::create_dir_all(dir)?;
    write_capacity_csv(metrics, std::fs::File::create(dir.join("capacity.csv"))?)?;
    write_exit_counts_csv(metrics, std::fs::File::create(dir.join("exits.csv"))?)?;
    write_paths_csv(metrics, std::fs::File::create(dir.join("paths.csv"))?)?;
    log::info!("Exported metrics to {}", dir.display());
    Ok(())
}
