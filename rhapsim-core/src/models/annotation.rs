use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap;
use log::{debug, info};

use crate::errors::RhapsimError;
use crate::utils::get_dynamic_reader;

///
/// One exon of a gene. Coordinates are 1-based and inclusive, exactly as they
/// appear in the GTF file.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Exon {
    pub seqid: String,
    pub start: u64,
    pub end: u64,
}

impl Exon {
    pub fn new(seqid: &str, start: u64, end: u64) -> Self {
        Exon {
            seqid: seqid.to_string(),
            start,
            end,
        }
    }

    ///
    /// Number of bases covered by the exon, zero for an inverted interval
    ///
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        (self.end - self.start).saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    ///
    /// Slice the exon out of its reference sequence.
    ///
    /// Converts the 1-based inclusive interval into the 0-based half-open
    /// range `start - 1 .. end`.
    ///
    pub fn slice<'a>(&self, sequence: &'a [u8]) -> Result<&'a [u8], RhapsimError> {
        if self.start == 0 || self.end < self.start || self.end as usize > sequence.len() {
            return Err(RhapsimError::ExonOutOfBounds {
                seqid: self.seqid.clone(),
                start: self.start,
                end: self.end,
                length: sequence.len(),
            });
        }
        Ok(&sequence[(self.start - 1) as usize..self.end as usize])
    }
}

///
/// A gene and all of its exons, ordered by genomic start position.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    pub id: String,
    pub exons: Vec<Exon>,
}

impl Gene {
    pub fn new(id: &str) -> Self {
        Gene {
            id: id.to_string(),
            exons: Vec::new(),
        }
    }

    /// Sum of the lengths of all exons.
    pub fn total_exon_length(&self) -> u64 {
        self.exons.iter().map(|e| e.len()).sum()
    }
}

///
/// In-memory gene annotation.
///
/// Genes are inferred from the `gene_id` attribute of any record, so a GTF
/// without explicit `gene` lines still yields one gene per `gene_id`. Genes
/// keep the order in which they first appear in the file.
///
#[derive(Debug, Clone, Default)]
pub struct GeneAnnotation {
    genes: Vec<Gene>,
    index: FxHashMap<String, usize>,
}

impl GeneAnnotation {
    /// Load an annotation from a GTF (or GTF.gz) file.
    pub fn from_gtf(path: &Path) -> anyhow::Result<Self> {
        info!("Loading gene annotation: {}", path.display());
        let reader = get_dynamic_reader(path)?;
        let annotation = Self::from_reader(reader)?;
        info!(
            "Loaded {} genes ({} exons) from {}",
            annotation.len(),
            annotation.genes.iter().map(|g| g.exons.len()).sum::<usize>(),
            path.display()
        );
        Ok(annotation)
    }

    /// Parse GTF records from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, RhapsimError> {
        let mut annotation = GeneAnnotation::default();

        for (line_number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = line_number + 1;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 9 {
                return Err(RhapsimError::GtfParseError {
                    line: line_number,
                    reason: format!("expected 9 columns, found {}", fields.len()),
                });
            }

            let Some(gene_id) = extract_gtf_attribute(fields[8], "gene_id") else {
                debug!("Skipping GTF line {} without gene_id", line_number);
                continue;
            };

            let gene_idx = annotation.gene_index_or_insert(&gene_id);

            if fields[2] != "exon" {
                continue;
            }

            let start = parse_position(fields[3], line_number, "start")?;
            let end = parse_position(fields[4], line_number, "end")?;
            if start == 0 || end < start {
                return Err(RhapsimError::GtfParseError {
                    line: line_number,
                    reason: format!("invalid exon interval {}-{}", start, end),
                });
            }

            annotation.genes[gene_idx]
                .exons
                .push(Exon::new(fields[0], start, end));
        }

        // stable sort keeps file order for exons sharing a start
        for gene in annotation.genes.iter_mut() {
            gene.exons.sort_by_key(|e| e.start);
        }

        Ok(annotation)
    }

    fn gene_index_or_insert(&mut self, gene_id: &str) -> usize {
        if let Some(&idx) = self.index.get(gene_id) {
            return idx;
        }
        let idx = self.genes.len();
        self.genes.push(Gene::new(gene_id));
        self.index.insert(gene_id.to_string(), idx);
        idx
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn gene(&self, gene_id: &str) -> Option<&Gene> {
        self.index.get(gene_id).map(|&idx| &self.genes[idx])
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl From<Vec<Gene>> for GeneAnnotation {
    fn from(genes: Vec<Gene>) -> Self {
        let mut annotation = GeneAnnotation::default();
        for mut gene in genes {
            gene.exons.sort_by_key(|e| e.start);
            let idx = annotation.gene_index_or_insert(&gene.id);
            annotation.genes[idx].exons.extend(gene.exons);
        }
        annotation
    }
}

fn parse_position(field: &str, line: usize, name: &str) -> Result<u64, RhapsimError> {
    field
        .trim()
        .parse::<u64>()
        .map_err(|e| RhapsimError::GtfParseError {
            line,
            reason: format!("parsing {} '{}': {}", name, field, e),
        })
}

/// Extract an attribute from a GTF attributes string (column 9).
///
/// Looks for the pattern `key "VALUE"` and returns VALUE.
fn extract_gtf_attribute(attrs: &str, key: &str) -> Option<String> {
    attrs.split(';').find_map(|attr| {
        let attr = attr.trim();
        let value = attr.strip_prefix(key)?.trim_start();
        let value = value.strip_prefix('"')?;
        let end = value.find('"')?;
        Some(value[..end].to_string())
    })
}
