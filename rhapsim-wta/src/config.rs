use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use rhapsim_core::models::Reference;

use crate::bulk::{BulkGenerator, BulkStats};
use crate::cell_label::{BeadVersion, SegmentTableEncoder};
use crate::consts::*;
use crate::header::ReadHeader;
use crate::read_pair::{ReadLayout, ReadPairAssembler};
use crate::tile::TileGrid;

///
/// Everything needed to reproduce one simulated run.
///
/// Loaded from YAML; relative paths are resolved against the directory that
/// contains the config file.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub reference_fasta: PathBuf,
    pub reference_gtf: PathBuf,
    /// YAML table of CLS1/CLS2/CLS3 segment lists per bead version.
    pub cell_labels: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_num_cells")]
    pub num_cells: u64,
    #[serde(default = "default_reads_per_cell")]
    pub reads_per_cell: u64,
    #[serde(default)]
    pub bead_version: BeadVersion,
    #[serde(default = "default_umi_length")]
    pub umi_length: usize,
    #[serde(default = "default_transcript_length")]
    pub transcript_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub header: ReadHeader,
    #[serde(default)]
    pub tile_grid: TileGrid,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}
fn default_num_cells() -> u64 {
    DEFAULT_NUM_CELLS
}
fn default_reads_per_cell() -> u64 {
    DEFAULT_READS_PER_CELL
}
fn default_umi_length() -> usize {
    DEFAULT_UMI_LENGTH
}
fn default_transcript_length() -> usize {
    DEFAULT_TRANSCRIPT_LENGTH
}

impl SimulationConfig {
    fn resolve_config_path(path: &Path, base_dir: &Path) -> PathBuf {
        if path.is_absolute() || path.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file from {:?}", path))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config from {:?}", path))?;

        let config_dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Config file path has no parent directory"))?;

        config.reference_fasta = Self::resolve_config_path(&config.reference_fasta, config_dir);
        config.reference_gtf = Self::resolve_config_path(&config.reference_gtf, config_dir);
        config.cell_labels = Self::resolve_config_path(&config.cell_labels, config_dir);
        config.output_dir = Self::resolve_config_path(&config.output_dir, config_dir);

        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file to {:?}", path))?;
        Ok(())
    }

    /// A config with default run parameters and no seed.
    pub fn new(reference_fasta: PathBuf, reference_gtf: PathBuf, cell_labels: PathBuf) -> Self {
        Self {
            reference_fasta,
            reference_gtf,
            cell_labels,
            output_dir: default_output_dir(),
            prefix: default_prefix(),
            num_cells: DEFAULT_NUM_CELLS,
            reads_per_cell: DEFAULT_READS_PER_CELL,
            bead_version: BeadVersion::default(),
            umi_length: DEFAULT_UMI_LENGTH,
            transcript_length: DEFAULT_TRANSCRIPT_LENGTH,
            seed: None,
            header: ReadHeader::default(),
            tile_grid: TileGrid::default(),
        }
    }

    /// A config with every field filled in, used as a starting template.
    pub fn example() -> Self {
        Self {
            seed: Some(42),
            ..Self::new(
                PathBuf::from("reference/genome.fa.gz"),
                PathBuf::from("reference/genes.gtf.gz"),
                PathBuf::from("reference/cell_labels.yaml"),
            )
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.transcript_length == 0 {
            anyhow::bail!("transcript_length must be at least 1");
        }
        if self.prefix.is_empty() {
            anyhow::bail!("prefix must not be empty");
        }
        if self.tile_grid.pitch == 0 {
            anyhow::bail!("tile_grid.pitch must be at least 1");
        }
        Ok(())
    }

    pub fn layout(&self) -> ReadLayout {
        ReadLayout {
            bead_version: self.bead_version,
            umi_length: self.umi_length,
            transcript_length: self.transcript_length,
        }
    }

    /// The configured seed, or a fresh one that is logged so the run can be repeated.
    pub fn resolve_seed(&self) -> u64 {
        match self.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!("No seed configured, using random seed {}", seed);
                seed
            }
        }
    }

    /// Load the reference and cell label table, then write both FASTQ files.
    pub fn run(&self) -> Result<BulkStats> {
        self.validate()?;

        let reference = Reference::from_files(&self.reference_fasta, &self.reference_gtf)?;
        let encoder = SegmentTableEncoder::from_yaml(&self.cell_labels)?;
        let assembler = ReadPairAssembler::new(&reference, &encoder, self.layout())
            .with_header(self.header.clone())
            .with_grid(self.tile_grid);

        let generator = BulkGenerator::new(assembler, self.resolve_seed());
        generator.write_fastq_files(
            self.num_cells,
            self.reads_per_cell,
            &self.output_dir,
            &self.prefix,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    fn data_path(name: &str) -> PathBuf {
        std::fs::canonicalize(Path::new("../tests/data").join(name)).unwrap()
    }

    #[rstest]
    fn test_minimal_yaml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "reference_fasta: ref/genome.fa\nreference_gtf: /abs/genes.gtf\ncell_labels: labels.yaml\n",
        )
        .unwrap();

        let config = SimulationConfig::from_yaml(&path).unwrap();
        assert_eq!(config.reference_fasta, dir.path().join("ref/genome.fa"));
        assert_eq!(config.reference_gtf, PathBuf::from("/abs/genes.gtf"));
        assert_eq!(config.cell_labels, dir.path().join("labels.yaml"));
        assert_eq!(config.output_dir, dir.path().join("."));
        assert_eq!(config.prefix, "WTAreads");
        assert_eq!(config.num_cells, 100);
        assert_eq!(config.reads_per_cell, 1000);
        assert_eq!(config.bead_version, BeadVersion::EnhV2);
        assert_eq!(config.umi_length, 14);
        assert_eq!(config.transcript_length, 42);
        assert_eq!(config.seed, None);
        assert_eq!(config.header, ReadHeader::default());
        assert_eq!(config.tile_grid, TileGrid::default());
    }

    #[rstest]
    #[case("enhv2", BeadVersion::EnhV2)]
    #[case("ENH", BeadVersion::Enh)]
    #[case("Original", BeadVersion::Original)]
    fn test_bead_version_any_case(#[case] name: &str, #[case] expected: BeadVersion) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let content = format!(
            "reference_fasta: a.fa\nreference_gtf: a.gtf\ncell_labels: c.yaml\nbead_version: {}\n",
            name
        );
        std::fs::write(&path, content).unwrap();
        let config = SimulationConfig::from_yaml(&path).unwrap();
        assert_eq!(config.bead_version, expected);
    }

    #[rstest]
    fn test_example_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example.yaml");
        let example = SimulationConfig::example();
        example.to_yaml(&path).unwrap();

        let loaded = SimulationConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.reference_fasta, dir.path().join("reference/genome.fa.gz"));
        assert_eq!(loaded.seed, Some(42));
        assert_eq!(loaded.layout(), example.layout());
        assert_eq!(loaded.header, example.header);
    }

    #[rstest]
    #[case("transcript_length: 0\n")]
    #[case("prefix: ''\n")]
    #[case("bead_version: EnhV3\n")]
    #[case("num_cells: -1\n")]
    fn test_invalid_config(#[case] extra: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let content = format!(
            "reference_fasta: a.fa\nreference_gtf: a.gtf\ncell_labels: c.yaml\n{}",
            extra
        );
        std::fs::write(&path, content).unwrap();
        assert!(SimulationConfig::from_yaml(&path).is_err());
    }

    #[rstest]
    fn test_missing_config_file() {
        let result = SimulationConfig::from_yaml(Path::new("does/not/exist.yaml"));
        assert!(result.is_err());
    }

    #[rstest]
    fn test_resolve_seed() {
        let mut config = SimulationConfig::example();
        config.seed = Some(7);
        assert_eq!(config.resolve_seed(), 7);
    }

    #[rstest]
    fn test_run_writes_fastq_files() {
        let dir = tempdir().unwrap();
        let config = SimulationConfig {
            reference_fasta: data_path("reference_small.fa.gz"),
            reference_gtf: data_path("reference_small.gtf"),
            cell_labels: data_path("cell_labels.yaml"),
            output_dir: dir.path().join("out"),
            prefix: "run".to_string(),
            num_cells: 8,
            reads_per_cell: 5,
            bead_version: BeadVersion::Enh,
            seed: Some(3),
            ..SimulationConfig::example()
        };

        let stats = config.run().unwrap();
        assert_eq!(stats.cells, 8);
        assert_eq!(stats.read_pairs, 40);
        assert_eq!(stats.r1_bases, 40 * (27 + 14));
        assert_eq!(stats.r2_bases, 40 * 42);
        assert!(dir.path().join("out/run_R1.fq.gz").exists());
        assert!(dir.path().join("out/run_R2.fq.gz").exists());
    }
}
