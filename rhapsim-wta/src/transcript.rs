use rand::Rng;

use rhapsim_core::RhapsimError;
use rhapsim_core::models::{Gene, Reference};

use crate::consts::FILLER_BASE;

///
/// Builds mRNA-like fragments by stitching the exons of a gene.
///
/// Every fragment is exactly the requested length: exonic sequence is taken
/// in genomic order and cut at the requested length, and genes whose exons
/// are shorter than that are right-padded with `N`.
///
pub struct TranscriptSynthesizer<'a> {
    reference: &'a Reference,
}

impl<'a> TranscriptSynthesizer<'a> {
    pub fn new(reference: &'a Reference) -> Self {
        Self { reference }
    }

    /// Check up front that every gene can yield a fragment of `length` bases.
    pub fn check(&self, length: usize) -> Result<(), RhapsimError> {
        if length == 0 {
            return Err(RhapsimError::EmptyTranscript);
        }
        self.reference.validate()
    }

    /// Pick a gene uniformly at random and synthesize a fragment from it.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        length: usize,
        rng: &mut R,
    ) -> Result<String, RhapsimError> {
        let genes = self.reference.annotation.genes();
        if genes.is_empty() {
            return Err(RhapsimError::EmptyAnnotation);
        }
        let gene = &genes[rng.random_range(0..genes.len())];
        self.synthesize_gene(gene, length)
    }

    pub fn synthesize_by_id(&self, gene_id: &str, length: usize) -> Result<String, RhapsimError> {
        let gene = self
            .reference
            .annotation
            .gene(gene_id)
            .ok_or_else(|| RhapsimError::UnknownGene(gene_id.to_string()))?;
        self.synthesize_gene(gene, length)
    }

    pub fn synthesize_gene(&self, gene: &Gene, length: usize) -> Result<String, RhapsimError> {
        if length == 0 {
            return Err(RhapsimError::EmptyTranscript);
        }
        if gene.exons.is_empty() {
            return Err(RhapsimError::GeneWithoutExons(gene.id.clone()));
        }

        let target = (gene.total_exon_length() as usize).min(length);
        let mut sequence: Vec<u8> = Vec::with_capacity(length);

        for exon in &gene.exons {
            let bases = self.reference.exon_sequence(exon)?;
            let take = (target - sequence.len()).min(bases.len());
            sequence.extend_from_slice(&bases[..take]);
            if sequence.len() >= target {
                break;
            }
        }

        sequence.resize(length, FILLER_BASE as u8);

        Ok(sequence.iter().map(|&b| b as char).collect())
    }
}
