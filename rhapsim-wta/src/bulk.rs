use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use rhapsim_core::RhapsimError;
use rhapsim_core::utils::{finish_dynamic_writer, get_dynamic_writer};

use crate::cell_label::CellLabelEncoder;
use crate::consts::CELLS_PER_BATCH;
use crate::read_pair::ReadPairAssembler;

/// All R1 and R2 records of one cell, already formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellReads {
    pub r1: String,
    pub r2: String,
}

/// Summary of a run written to disk.
#[derive(Debug, Clone)]
pub struct BulkStats {
    pub cells: u64,
    pub read_pairs: u64,
    pub r1_bases: u64,
    pub r2_bases: u64,
    pub r1_path: PathBuf,
    pub r2_path: PathBuf,
}

///
/// Generates reads for a range of cells.
///
/// Cell `c` draws from its own random stream derived from the generator seed,
/// so the output depends only on the seed and the parameters: cells can be
/// produced in parallel and concatenated in cell order without changing a
/// single byte.
///
pub struct BulkGenerator<'a, E: CellLabelEncoder> {
    assembler: ReadPairAssembler<'a, E>,
    seed: u64,
    batch_size: u64,
}

impl<'a, E: CellLabelEncoder> BulkGenerator<'a, E> {
    pub fn new(assembler: ReadPairAssembler<'a, E>, seed: u64) -> Self {
        Self {
            assembler,
            seed,
            batch_size: CELLS_PER_BATCH,
        }
    }

    /// Number of cells held in memory at once by [`BulkGenerator::write_fastq_files`].
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn cell_rng(&self, cell_index: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ cell_index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    ///
    /// Check the reference and the last cell up front so nothing is written
    /// for an invalid request. The outcome does not depend on the seed.
    ///
    fn validate(&self, num_cells: u64, reads_per_cell: u64) -> Result<(), RhapsimError> {
        if num_cells == 0 || reads_per_cell == 0 {
            return Ok(());
        }
        self.assembler.check_reference()?;
        let max_cells = self.assembler.max_cells();
        if num_cells > max_cells {
            return Err(RhapsimError::CellIndexOutOfRange {
                index: num_cells - 1,
                limit: max_cells,
            });
        }
        self.assembler.cell_label(num_cells - 1)?;
        Ok(())
    }

    /// Generate `reads_per_cell` read pairs for one cell.
    pub fn generate_cell(
        &self,
        cell_index: u64,
        reads_per_cell: u64,
    ) -> Result<CellReads, RhapsimError> {
        let mut reads = CellReads::default();
        if reads_per_cell == 0 {
            return Ok(reads);
        }

        let mut rng = self.cell_rng(cell_index);
        let coordinate = self.assembler.coordinate(cell_index)?;
        let cell_label = self.assembler.cell_label(cell_index)?;
        for _ in 0..reads_per_cell {
            let pair = self
                .assembler
                .assemble_with_label(coordinate, &cell_label, &mut rng)?;
            pair.r1.write_into(&mut reads.r1);
            pair.r2.write_into(&mut reads.r2);
        }

        Ok(reads)
    }

    fn generate_batch(
        &self,
        cells: std::ops::Range<u64>,
        reads_per_cell: u64,
    ) -> Result<Vec<CellReads>, RhapsimError> {
        let indices: Vec<u64> = cells.collect();
        indices
            .par_iter()
            .map(|&cell_index| self.generate_cell(cell_index, reads_per_cell))
            .collect()
    }

    ///
    /// Generate every read of every cell into two in-memory FASTQ buffers,
    /// cell-major then read-minor. Cells are generated in parallel.
    ///
    pub fn generate(
        &self,
        num_cells: u64,
        reads_per_cell: u64,
    ) -> Result<(String, String), RhapsimError> {
        self.validate(num_cells, reads_per_cell)?;
        if reads_per_cell == 0 {
            return Ok((String::new(), String::new()));
        }

        let cells = self.generate_batch(0..num_cells, reads_per_cell)?;
        Ok(concat_cells(cells))
    }

    /// Single-threaded equivalent of [`BulkGenerator::generate`].
    pub fn generate_sequential(
        &self,
        num_cells: u64,
        reads_per_cell: u64,
    ) -> Result<(String, String), RhapsimError> {
        self.validate(num_cells, reads_per_cell)?;
        let cells = (0..num_cells)
            .map(|cell_index| self.generate_cell(cell_index, reads_per_cell))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(concat_cells(cells))
    }

    ///
    /// Stream all reads to `{output_dir}/{prefix}_R1.fq.gz` and
    /// `{output_dir}/{prefix}_R2.fq.gz`.
    ///
    /// Cells are produced in parallel batches and written in cell order, so
    /// the files decompress to exactly what [`BulkGenerator::generate`] returns.
    ///
    pub fn write_fastq_files(
        &self,
        num_cells: u64,
        reads_per_cell: u64,
        output_dir: &Path,
        prefix: &str,
    ) -> Result<BulkStats> {
        self.validate(num_cells, reads_per_cell)?;

        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
        let r1_path = output_dir.join(format!("{}_R1.fq.gz", prefix));
        let r2_path = output_dir.join(format!("{}_R2.fq.gz", prefix));

        let result = self.stream_fastq_files(num_cells, reads_per_cell, &r1_path, &r2_path);
        if result.is_err() {
            // never leave truncated output behind
            for path in [&r1_path, &r2_path] {
                if path.exists() {
                    let _ = std::fs::remove_file(path);
                }
            }
        }
        result
    }

    fn stream_fastq_files(
        &self,
        num_cells: u64,
        reads_per_cell: u64,
        r1_path: &Path,
        r2_path: &Path,
    ) -> Result<BulkStats> {
        let mut r1_writer = get_dynamic_writer(r1_path)?;
        let mut r2_writer = get_dynamic_writer(r2_path)?;

        info!(
            "Generating {} cells x {} reads (seed {})",
            num_cells, reads_per_cell, self.seed
        );

        let pb = ProgressBar::new(num_cells);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} cells generated")?,
        );

        let mut stats = BulkStats {
            cells: num_cells,
            read_pairs: num_cells * reads_per_cell,
            r1_bases: 0,
            r2_bases: 0,
            r1_path: r1_path.to_path_buf(),
            r2_path: r2_path.to_path_buf(),
        };

        let mut batch_start = 0;
        while batch_start < num_cells && reads_per_cell > 0 {
            let batch_end = (batch_start + self.batch_size).min(num_cells);
            let batch = self.generate_batch(batch_start..batch_end, reads_per_cell)?;
            for cell in batch {
                stats.r1_bases += sequence_bases(&cell.r1);
                stats.r2_bases += sequence_bases(&cell.r2);
                r1_writer
                    .write_all(cell.r1.as_bytes())
                    .with_context(|| format!("Failed to write to {:?}", r1_path))?;
                r2_writer
                    .write_all(cell.r2.as_bytes())
                    .with_context(|| format!("Failed to write to {:?}", r2_path))?;
            }
            debug!("Wrote cells {}..{}", batch_start, batch_end);
            pb.inc(batch_end - batch_start);
            batch_start = batch_end;
        }

        finish_dynamic_writer(r1_writer)?;
        finish_dynamic_writer(r2_writer)?;
        pb.finish_with_message("Read generation complete");

        info!(
            "Wrote {} read pairs to {} and {}",
            stats.read_pairs,
            r1_path.display(),
            r2_path.display()
        );

        Ok(stats)
    }
}

fn concat_cells(cells: Vec<CellReads>) -> (String, String) {
    let r1_len = cells.iter().map(|c| c.r1.len()).sum();
    let r2_len = cells.iter().map(|c| c.r2.len()).sum();
    let mut r1 = String::with_capacity(r1_len);
    let mut r2 = String::with_capacity(r2_len);
    for cell in cells {
        r1.push_str(&cell.r1);
        r2.push_str(&cell.r2);
    }
    (r1, r2)
}

/// Count sequence bases in formatted FASTQ text (the second line of each record).
fn sequence_bases(fastq: &str) -> u64 {
    fastq
        .lines()
        .skip(1)
        .step_by(4)
        .map(|line| line.len() as u64)
        .sum()
}
