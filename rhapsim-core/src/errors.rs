use thiserror::Error;

#[derive(Error, Debug)]
pub enum RhapsimError {
    #[error("Error parsing GTF line {line}: {reason}")]
    GtfParseError { line: usize, reason: String },

    #[error("Error parsing FASTA file: {0}")]
    FastaParseError(String),

    #[error("Annotation contains no genes")]
    EmptyAnnotation,

    #[error("Gene {0} has no exons")]
    GeneWithoutExons(String),

    #[error("Gene not found in annotation: {0}")]
    UnknownGene(String),

    #[error("Sequence {0} referenced by the annotation is missing from the reference FASTA")]
    UnknownSequence(String),

    #[error("Exon {start}-{end} lies outside sequence {seqid} (length {length})")]
    ExonOutOfBounds {
        seqid: String,
        start: u64,
        end: u64,
        length: usize,
    },

    #[error("Cell index {index} is out of range: must be below {limit}")]
    CellIndexOutOfRange { index: u64, limit: u64 },

    #[error("Cell label index {index} is out of range for bead version {version}: must be in 1..={limit}")]
    CellLabelIndexOutOfRange {
        index: u64,
        version: String,
        limit: u64,
    },

    #[error("Cell label {0} can't be decoded")]
    UndecodableCellLabel(String),

    #[error("Unknown bead version: {0}")]
    UnknownBeadVersion(String),

    #[error("Invalid cell label table: {0}")]
    InvalidCellLabelTable(String),

    #[error("Transcript length must be positive")]
    EmptyTranscript,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
