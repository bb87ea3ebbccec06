//! World-file loading
//!
//! A world file is a CSV stream whose first line is a header and whose
//! remaining lines are `Street,x1,y1,x2,y2,lanes` or
//! `Parking,x1,y1,x2,y2,capacity`.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::error::{SimError, SimResult};
use super::types::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
enum RecordKind {
    Street,
    Parking,
}

#[derive(Debug, Deserialize)]
struct WorldRow {
    kind: RecordKind,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    value: u32,
}

/// One line of a world file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyRecord {
    /// Bidirectional street with `lanes` lanes in each direction
    Street { a: Node, b: Node, lanes: u32 },
    /// Parking lot at `lot` with `capacity` spaces emptying into `egress`
    Parking { lot: Node, egress: Node, capacity: u32 },
}

impl From<WorldRow> for TopologyRecord {
    fn from(row: WorldRow) -> Self {
        let first = Node::new(row.x1, row.y1);
        let second = Node::new(row.x2, row.y2);
        match row.kind {
            RecordKind::Street => TopologyRecord::Street {
                a: first,
                b: second,
                lanes: row.value,
            },
            RecordKind::Parking => TopologyRecord::Parking {
                lot: first,
                egress: second,
                capacity: row.value,
            },
        }
    }
}

pub fn load_world_file(path: &Path) -> SimResult<Vec<TopologyRecord>> {
    let file = std::fs::File::open(path)?;
    load_world_reader(file)
}

/// Like [`load_world_file`] but accepts any `Read` source.
pub fn load_world_reader<R: Read>(reader: R) -> SimResult<Vec<TopologyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: WorldRow = record.deserialize(None).map_err(|e| SimError::Parse {
            line,
            message: e.to_string(),
        })?;
        records.push(row.into());
    }

    log::debug!("Loaded {} world records", records.len());
    Ok(records)
}

/// A small built-in town used when no world file is given
///
/// A 3x3 grid 20 units apart with two-lane east-west streets and
/// single-lane north-south streets, four parking lots off the western and
/// southern edges, and two exits on the eastern edge.
pub fn demo_world() -> (Vec<TopologyRecord>, Vec<Node>) {
    let spacing = 20;
    let grid = |col: i32, row: i32| Node::new(col * spacing, row * spacing);
    let mut records = Vec::new();

    for row in 0..3 {
        for col in 0..2 {
            records.push(TopologyRecord::Street {
                a: grid(col, row),
                b: grid(col + 1, row),
                lanes: 2,
            });
        }
    }
    for row in 0..2 {
        for col in 0..3 {
            records.push(TopologyRecord::Street {
                a: grid(col, row),
                b: grid(col, row + 1),
                lanes: 1,
            });
        }
    }

    let lots = [
        (Node::new(-10, 0), grid(0, 0), 120),
        (Node::new(-10, 40), grid(0, 2), 80),
        (Node::new(20, -10), grid(1, 0), 60),
        (Node::new(0, -10), grid(0, 0), 40),
    ];
    for (lot, egress, capacity) in lots {
        records.push(TopologyRecord::Parking {
            lot,
            egress,
            capacity,
        });
    }

    (records, vec![grid(2, 0), grid(2, 2)])
}
