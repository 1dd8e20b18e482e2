pub const SIMULATE_CMD: &str = "simulate";
pub const VERSION: &str = "0.1.0";

// flow-cell tile bounds observed in BD Rhapsody runs
pub const TILE_X_MIN: u64 = 1000;
pub const TILE_X_MAX: u64 = 32967;
pub const TILE_Y_MIN: u64 = 1000;
pub const TILE_Y_MAX: u64 = 37059;
pub const TILE_PITCH: u64 = 9;

/// Number of distinct cell labels: three segments of 384 sequences each.
pub const MAX_CELL_LABELS: u64 = 384 * 384 * 384;

pub const DEFAULT_INSTRUMENT_ID: &str = "A00226";
pub const DEFAULT_RUN_ID: &str = "970";
pub const DEFAULT_FLOWCELL_ID: &str = "H5FGVMXY";
pub const DEFAULT_LANE: u32 = 1;
pub const DEFAULT_TILE: u32 = 1101;
pub const DEFAULT_SAMPLE_ID: &str = "CAGAGAGG";

pub const QUALITY_CHAR: char = 'I';
pub const FILLER_BASE: char = 'N';
pub const UMI_BASES: [char; 4] = ['A', 'C', 'G', 'T'];

pub const DEFAULT_NUM_CELLS: u64 = 100;
pub const DEFAULT_READS_PER_CELL: u64 = 1000;
pub const DEFAULT_UMI_LENGTH: usize = 14;
pub const DEFAULT_TRANSCRIPT_LENGTH: usize = 42;
pub const DEFAULT_PREFIX: &str = "WTAreads";

/// Cells generated per parallel batch when streaming to disk.
pub const CELLS_PER_BATCH: u64 = 64;

pub const DEFAULT_THREAD_COUNT: usize = 4;

pub fn get_thread_count(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_THREAD_COUNT)
}
