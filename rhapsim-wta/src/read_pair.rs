use std::fmt::{self, Display};

use rand::Rng;
use serde::{Deserialize, Serialize};

use rhapsim_core::RhapsimError;
use rhapsim_core::models::Reference;

use crate::cell_label::{BeadVersion, CellLabelEncoder};
use crate::consts::*;
use crate::header::{PairingFlag, ReadHeader};
use crate::tile::{TileCoordinate, TileGrid};
use crate::transcript::TranscriptSynthesizer;

/// A single four-line FASTQ record with a constant quality string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub header: String,
    pub sequence: String,
    pub quality: String,
}

impl FastqRecord {
    pub fn new(header: String, sequence: String) -> Self {
        let quality = QUALITY_CHAR.to_string().repeat(sequence.len());
        Self {
            header,
            sequence,
            quality,
        }
    }

    /// Append the formatted record to `buf`.
    pub fn write_into(&self, buf: &mut String) {
        for line in [self.header.as_str(), self.sequence.as_str(), "+", self.quality.as_str()] {
            buf.push_str(line);
            buf.push('\n');
        }
    }
}

impl Display for FastqRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n+\n{}\n", self.header, self.sequence, self.quality)
    }
}

/// R1 carries cell label and UMI, R2 carries the transcript fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    pub r1: FastqRecord,
    pub r2: FastqRecord,
}

/// Shape of the reads produced for every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadLayout {
    pub bead_version: BeadVersion,
    pub umi_length: usize,
    pub transcript_length: usize,
}

impl Default for ReadLayout {
    fn default() -> Self {
        Self {
            bead_version: BeadVersion::default(),
            umi_length: DEFAULT_UMI_LENGTH,
            transcript_length: DEFAULT_TRANSCRIPT_LENGTH,
        }
    }
}

/// Draw `length` bases independently and uniformly from `ACGT`.
pub fn random_umi<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    (0..length)
        .map(|_| UMI_BASES[rng.random_range(0..UMI_BASES.len())])
        .collect()
}

///
/// Assembles the (R1, R2) pair for one read of one cell.
///
/// R1 is `cell label ++ UMI`; R2 is a transcript fragment of a random gene.
/// Both headers carry the cell's tile coordinate and differ only in the
/// pairing flag.
///
pub struct ReadPairAssembler<'a, E: CellLabelEncoder> {
    synthesizer: TranscriptSynthesizer<'a>,
    encoder: &'a E,
    grid: TileGrid,
    header: ReadHeader,
    layout: ReadLayout,
}

impl<'a, E: CellLabelEncoder> ReadPairAssembler<'a, E> {
    pub fn new(reference: &'a Reference, encoder: &'a E, layout: ReadLayout) -> Self {
        Self {
            synthesizer: TranscriptSynthesizer::new(reference),
            encoder,
            grid: TileGrid::default(),
            header: ReadHeader::default(),
            layout,
        }
    }

    pub fn with_header(mut self, header: ReadHeader) -> Self {
        self.header = header;
        self
    }

    pub fn with_grid(mut self, grid: TileGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn layout(&self) -> &ReadLayout {
        &self.layout
    }

    /// Largest number of cells both the tile grid and the label space can hold.
    pub fn max_cells(&self) -> u64 {
        self.grid.capacity().min(MAX_CELL_LABELS)
    }

    /// Fail early on a reference or layout no cell could be generated from.
    pub fn check_reference(&self) -> Result<(), RhapsimError> {
        self.synthesizer.check(self.layout.transcript_length)
    }

    /// Tile position shared by every read of `cell_index`.
    pub fn coordinate(&self, cell_index: u64) -> Result<TileCoordinate, RhapsimError> {
        self.grid.coordinate(cell_index)
    }

    /// The cell label written into every R1 of `cell_index`.
    pub fn cell_label(&self, cell_index: u64) -> Result<String, RhapsimError> {
        if cell_index >= MAX_CELL_LABELS {
            return Err(RhapsimError::CellIndexOutOfRange {
                index: cell_index,
                limit: MAX_CELL_LABELS,
            });
        }
        self.encoder.encode(cell_index + 1, self.layout.bead_version)
    }

    pub fn assemble<R: Rng + ?Sized>(
        &self,
        cell_index: u64,
        rng: &mut R,
    ) -> Result<ReadPair, RhapsimError> {
        let coordinate = self.grid.coordinate(cell_index)?;
        let cell_label = self.cell_label(cell_index)?;
        self.assemble_with_label(coordinate, &cell_label, rng)
    }

    /// Assemble a pair for a cell whose coordinate and label are already known.
    pub(crate) fn assemble_with_label<R: Rng + ?Sized>(
        &self,
        coordinate: TileCoordinate,
        cell_label: &str,
        rng: &mut R,
    ) -> Result<ReadPair, RhapsimError> {
        let umi = random_umi(self.layout.umi_length, rng);
        let r1 = FastqRecord::new(
            self.header.format(coordinate, PairingFlag::Read1),
            format!("{}{}", cell_label, umi),
        );

        let transcript = self
            .synthesizer
            .synthesize(self.layout.transcript_length, rng)?;
        let r2 = FastqRecord::new(
            self.header.format(coordinate, PairingFlag::Read2),
            transcript,
        );

        Ok(ReadPair { r1, r2 })
    }
}
