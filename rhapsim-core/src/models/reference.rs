use std::path::Path;

use anyhow::Result;

use super::annotation::{Exon, GeneAnnotation};
use super::sequences::SequenceDictionary;
use crate::errors::RhapsimError;

///
/// Immutable reference context: the gene annotation and the sequences it
/// points into. Built once from the same FASTA/GTF pair that is used to build
/// the pipeline reference, then shared read-only by every generator.
///
#[derive(Debug, Clone)]
pub struct Reference {
    pub annotation: GeneAnnotation,
    pub sequences: SequenceDictionary,
}

impl Reference {
    pub fn new(annotation: GeneAnnotation, sequences: SequenceDictionary) -> Self {
        Reference {
            annotation,
            sequences,
        }
    }

    /// Load the annotation and the sequences from disk. Both files may be gzipped.
    pub fn from_files(fasta: &Path, gtf: &Path) -> Result<Self> {
        let sequences = SequenceDictionary::from_fasta(fasta)?;
        let annotation = GeneAnnotation::from_gtf(gtf)?;
        Ok(Reference::new(annotation, sequences))
    }

    /// Bases of one exon.
    pub fn exon_sequence(&self, exon: &Exon) -> Result<&[u8], RhapsimError> {
        let sequence = self
            .sequences
            .get(&exon.seqid)
            .ok_or_else(|| RhapsimError::UnknownSequence(exon.seqid.clone()))?;
        exon.slice(sequence)
    }

    ///
    /// Check that every gene can be turned into a transcript: the annotation
    /// is not empty, every gene has at least one exon and every exon lies on
    /// a known sequence within its bounds.
    ///
    pub fn validate(&self) -> Result<(), RhapsimError> {
        if self.annotation.is_empty() {
            return Err(RhapsimError::EmptyAnnotation);
        }
        for gene in self.annotation.genes() {
            if gene.exons.is_empty() {
                return Err(RhapsimError::GeneWithoutExons(gene.id.clone()));
            }
            for exon in &gene.exons {
                self.exon_sequence(exon)?;
            }
        }
        Ok(())
    }
}
