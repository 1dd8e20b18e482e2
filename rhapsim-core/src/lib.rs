//! Core library for rhapsim.
//!
//! Holds the read-only reference context used by the read generators: a gene
//! annotation parsed from GTF and the reference sequences parsed from FASTA,
//! together with the shared error type and small I/O helpers for plain and
//! gzipped files.
//!
//! ```no_run
//! use std::path::Path;
//! use rhapsim_core::models::Reference;
//!
//! let reference = Reference::from_files(
//!     Path::new("reference_small.fa"),
//!     Path::new("reference_small.gtf"),
//! ).unwrap();
//! println!("{} genes", reference.annotation.len());
//! ```

pub mod errors;
pub mod models;
pub mod utils;

pub use errors::RhapsimError;
