//! # rhapsim-wta: synthetic BD Rhapsody WTA reads
//!
//! Generates paired FASTQ reads that look like a BD Rhapsody whole
//! transcriptome analysis (WTA) run, for exercising analysis pipelines
//! end to end.
//!
//! For every simulated cell:
//! - **R1** is the cell label (three CLS segments for the chosen bead version)
//!   followed by a random UMI.
//! - **R2** is a fragment of a uniformly chosen gene, built by stitching its
//!   exons from the reference genome and padding with `N`.
//! - Both headers carry the cell's flow-cell tile coordinate and differ only in
//!   the pairing flag.
//!
//! Output is deterministic for a given seed, including when cells are
//! generated in parallel.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rhapsim_core::models::Reference;
//! use rhapsim_wta::{BulkGenerator, ReadLayout, ReadPairAssembler, SegmentTableEncoder};
//!
//! let reference = Reference::from_files("genome.fa.gz".as_ref(), "genes.gtf.gz".as_ref())?;
//! let encoder = SegmentTableEncoder::from_yaml("cell_labels.yaml".as_ref())?;
//! let assembler = ReadPairAssembler::new(&reference, &encoder, ReadLayout::default());
//!
//! let generator = BulkGenerator::new(assembler, 42);
//! let stats = generator.write_fastq_files(100, 1000, "out".as_ref(), "WTAreads")?;
//! ```
//!
//! ## Module Structure
//!
//! - [`tile`] - cell index to flow-cell coordinate
//! - [`cell_label`] - bead versions and cell label encoding
//! - [`header`] - FASTQ header formatting
//! - [`transcript`] - exon-stitched transcript fragments
//! - [`read_pair`] - one R1/R2 pair
//! - [`bulk`] - many cells, in memory or streamed to gzip
//! - [`config`] - YAML run configuration

pub mod bulk;
pub mod cell_label;
pub mod config;
pub mod consts;
pub mod header;
pub mod read_pair;
pub mod tile;
pub mod transcript;

pub use bulk::{BulkGenerator, BulkStats, CellReads};
pub use cell_label::{BeadVersion, CellLabelEncoder, SegmentLists, SegmentTableEncoder};
pub use config::SimulationConfig;
pub use consts::SIMULATE_CMD;
pub use header::{PairingFlag, ReadHeader};
pub use read_pair::{FastqRecord, ReadLayout, ReadPair, ReadPairAssembler};
pub use tile::{TileCoordinate, TileGrid};
pub use transcript::TranscriptSynthesizer;
