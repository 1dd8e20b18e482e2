use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tile::TileCoordinate;

/// Illumina mate flag written after the read name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingFlag {
    Read1,
    Read2,
}

impl Display for PairingFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingFlag::Read1 => write!(f, "1:N:0"),
            PairingFlag::Read2 => write!(f, "2:N:0"),
        }
    }
}

///
/// Instrument and run identifiers shared by every read of a simulation.
///
/// Formats headers such as
/// `@A00226:970:H5FGVMXY:1:1101:2645:1000 2:N:0:CAGAGAGG`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadHeader {
    pub instrument_id: String,
    pub run_id: String,
    pub flowcell_id: String,
    pub lane: u32,
    pub tile: u32,
    pub sample_id: String,
}

impl Default for ReadHeader {
    fn default() -> Self {
        Self {
            instrument_id: DEFAULT_INSTRUMENT_ID.to_string(),
            run_id: DEFAULT_RUN_ID.to_string(),
            flowcell_id: DEFAULT_FLOWCELL_ID.to_string(),
            lane: DEFAULT_LANE,
            tile: DEFAULT_TILE,
            sample_id: DEFAULT_SAMPLE_ID.to_string(),
        }
    }
}

impl ReadHeader {
    pub fn format(&self, coordinate: TileCoordinate, flag: PairingFlag) -> String {
        format!(
            "@{}:{}:{}:{}:{}:{}:{} {}:{}",
            self.instrument_id,
            self.run_id,
            self.flowcell_id,
            self.lane,
            self.tile,
            coordinate.x,
            coordinate.y,
            flag,
            self.sample_id
        )
    }
}
