//! Cell label (cell barcode) encoding.
//!
//! A BD Rhapsody cell label is three fixed-length segments (CLS1, CLS2, CLS3),
//! each drawn from a bead-version-specific list. A 1-based cell label index
//! addresses one combination of the three lists in mixed radix.
//!
//! The read generator only depends on the [`CellLabelEncoder`] trait. The
//! bundled [`SegmentTableEncoder`] performs the index arithmetic over segment
//! lists loaded from a YAML table; the chemistry's real lists are supplied by
//! the user.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use fxhash::FxHashMap;
use log::info;
use serde::{Deserialize, Serialize};

use rhapsim_core::RhapsimError;

/// Bead chemistry version. Names are matched case-insensitively when parsed or deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BeadVersion {
    Original,
    Enh,
    #[default]
    EnhV2,
}

impl FromStr for BeadVersion {
    type Err = RhapsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" | "v1" => Ok(BeadVersion::Original),
            "enh" | "enhanced" => Ok(BeadVersion::Enh),
            "enhv2" | "enhancedv2" => Ok(BeadVersion::EnhV2),
            _ => Err(RhapsimError::UnknownBeadVersion(s.to_string())),
        }
    }
}

impl TryFrom<String> for BeadVersion {
    type Error = RhapsimError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for BeadVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BeadVersion::Original => "Original",
            BeadVersion::Enh => "Enh",
            BeadVersion::EnhV2 => "EnhV2",
        };
        write!(f, "{}", name)
    }
}

///
/// Bijection between 1-based cell label indices and label sequences.
///
/// Implementations must be deterministic and collision free for each bead
/// version: `decode(encode(i, v), v) == i` for every valid `i`.
///
pub trait CellLabelEncoder: Send + Sync {
    fn encode(&self, index: u64, version: BeadVersion) -> Result<String, RhapsimError>;

    fn decode(&self, label: &str, version: BeadVersion) -> Result<u64, RhapsimError>;

    /// Length of every label produced for `version`.
    fn label_length(&self, version: BeadVersion) -> Result<usize, RhapsimError>;
}

/// One segment list with its reverse lookup.
#[derive(Debug, Clone)]
struct Segment {
    sequences: Vec<String>,
    lookup: FxHashMap<String, u64>,
    width: usize,
}

impl Segment {
    fn new(name: &str, sequences: Vec<String>) -> Result<Self, RhapsimError> {
        let width = match sequences.first() {
            Some(first) => first.len(),
            None => {
                return Err(RhapsimError::InvalidCellLabelTable(format!(
                    "{} is empty",
                    name
                )));
            }
        };

        let mut lookup = FxHashMap::default();
        for (i, seq) in sequences.iter().enumerate() {
            if seq.len() != width || width == 0 {
                return Err(RhapsimError::InvalidCellLabelTable(format!(
                    "{} entries must share one non-zero length, found {} and {}",
                    name,
                    width,
                    seq.len()
                )));
            }
            if !seq.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')) {
                return Err(RhapsimError::InvalidCellLabelTable(format!(
                    "{} entry {} is not an ACGT sequence",
                    name, seq
                )));
            }
            if lookup.insert(seq.clone(), i as u64).is_some() {
                return Err(RhapsimError::InvalidCellLabelTable(format!(
                    "{} entry {} is duplicated",
                    name, seq
                )));
            }
        }

        Ok(Segment {
            sequences,
            lookup,
            width,
        })
    }

    fn len(&self) -> u64 {
        self.sequences.len() as u64
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentLists {
    pub cls1: Vec<String>,
    pub cls2: Vec<String>,
    pub cls3: Vec<String>,
}

#[derive(Debug, Clone)]
struct SegmentTable {
    segments: [Segment; 3],
}

impl SegmentTable {
    fn new(lists: SegmentLists) -> Result<Self, RhapsimError> {
        Ok(SegmentTable {
            segments: [
                Segment::new("cls1", lists.cls1)?,
                Segment::new("cls2", lists.cls2)?,
                Segment::new("cls3", lists.cls3)?,
            ],
        })
    }

    fn capacity(&self) -> u64 {
        self.segments.iter().map(|s| s.len()).product()
    }

    fn label_length(&self) -> usize {
        self.segments.iter().map(|s| s.width).sum()
    }
}

///
/// Table-driven cell label encoder.
///
/// With segment sizes `n1, n2, n3` and `i = index - 1`, the label is
/// `cls1[i / (n2 * n3)] ++ cls2[(i / n3) % n2] ++ cls3[i % n3]`.
///
#[derive(Debug, Clone, Default)]
pub struct SegmentTableEncoder {
    tables: HashMap<BeadVersion, SegmentTable>,
}

impl SegmentTableEncoder {
    pub fn new(lists: HashMap<BeadVersion, SegmentLists>) -> Result<Self, RhapsimError> {
        let tables = lists
            .into_iter()
            .map(|(version, lists)| Ok((version, SegmentTable::new(lists)?)))
            .collect::<Result<HashMap<_, _>, RhapsimError>>()?;
        Ok(SegmentTableEncoder { tables })
    }

    /// Load segment lists from a YAML file keyed by bead version.
    ///
    /// ```yaml
    /// EnhV2:
    ///   cls1: [AACGGCAGC, ...]
    ///   cls2: [AATAGGCAA, ...]
    ///   cls3: [AAGATACAT, ...]
    /// ```
    pub fn from_yaml(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read cell label table from {:?}", path))?;
        let encoder = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to load cell label table from {:?}", path))?;
        for (version, table) in &encoder.tables {
            info!(
                "Loaded {} cell labels of length {} for bead version {}",
                table.capacity(),
                table.label_length(),
                version
            );
        }
        Ok(encoder)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let lists: HashMap<BeadVersion, SegmentLists> = serde_yaml::from_str(content)?;
        Ok(Self::new(lists)?)
    }

    /// Number of labels available for `version`.
    pub fn capacity(&self, version: BeadVersion) -> Result<u64, RhapsimError> {
        Ok(self.table(version)?.capacity())
    }

    fn table(&self, version: BeadVersion) -> Result<&SegmentTable, RhapsimError> {
        self.tables
            .get(&version)
            .ok_or_else(|| RhapsimError::UnknownBeadVersion(version.to_string()))
    }
}

impl CellLabelEncoder for SegmentTableEncoder {
    fn encode(&self, index: u64, version: BeadVersion) -> Result<String, RhapsimError> {
        let table = self.table(version)?;
        let capacity = table.capacity();
        if index == 0 || index > capacity {
            return Err(RhapsimError::CellLabelIndexOutOfRange {
                index,
                version: version.to_string(),
                limit: capacity,
            });
        }

        let [cls1, cls2, cls3] = &table.segments;
        let i = index - 1;
        let i1 = i / (cls2.len() * cls3.len());
        let i2 = (i / cls3.len()) % cls2.len();
        let i3 = i % cls3.len();

        let mut label = String::with_capacity(table.label_length());
        label.push_str(&cls1.sequences[i1 as usize]);
        label.push_str(&cls2.sequences[i2 as usize]);
        label.push_str(&cls3.sequences[i3 as usize]);
        Ok(label)
    }

    fn decode(&self, label: &str, version: BeadVersion) -> Result<u64, RhapsimError> {
        let table = self.table(version)?;
        if label.len() != table.label_length() || !label.is_ascii() {
            return Err(RhapsimError::UndecodableCellLabel(label.to_string()));
        }

        let [cls1, cls2, cls3] = &table.segments;
        let (part1, rest) = label.split_at(cls1.width);
        let (part2, part3) = rest.split_at(cls2.width);

        let lookup = |segment: &Segment, part: &str| {
            segment
                .lookup
                .get(part)
                .copied()
                .ok_or_else(|| RhapsimError::UndecodableCellLabel(label.to_string()))
        };
        let i1 = lookup(cls1, part1)?;
        let i2 = lookup(cls2, part2)?;
        let i3 = lookup(cls3, part3)?;

        Ok(i1 * cls2.len() * cls3.len() + i2 * cls3.len() + i3 + 1)
    }

    fn label_length(&self, version: BeadVersion) -> Result<usize, RhapsimError> {
        Ok(self.table(version)?.label_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::HashSet;

    #[fixture]
    fn encoder() -> SegmentTableEncoder {
        SegmentTableEncoder::from_yaml(Path::new("../tests/data/cell_labels.yaml")).unwrap()
    }

    #[rstest]
    #[case("EnhV2", BeadVersion::EnhV2)]
    #[case("enhv2", BeadVersion::EnhV2)]
    #[case("Enh", BeadVersion::Enh)]
    #[case("Original", BeadVersion::Original)]
    fn test_parse_bead_version(#[case] name: &str, #[case] expected: BeadVersion) {
        assert_eq!(name.parse::<BeadVersion>().unwrap(), expected);
    }

    #[rstest]
    #[case("EnhV2", BeadVersion::EnhV2)]
    #[case("enhv2", BeadVersion::EnhV2)]
    #[case("ENH", BeadVersion::Enh)]
    #[case("original", BeadVersion::Original)]
    fn test_deserialize_bead_version(#[case] name: &str, #[case] expected: BeadVersion) {
        let version: BeadVersion = serde_yaml::from_str(name).unwrap();
        assert_eq!(version, expected);
        assert_eq!(serde_yaml::to_string(&version).unwrap().trim(), expected.to_string());
    }

    #[rstest]
    fn test_unknown_bead_version() {
        assert!(matches!(
            "EnhV3".parse::<BeadVersion>(),
            Err(RhapsimError::UnknownBeadVersion(_))
        ));
    }

    #[rstest]
    fn test_capacity(encoder: SegmentTableEncoder) {
        assert_eq!(encoder.capacity(BeadVersion::Original).unwrap(), 8);
        assert_eq!(encoder.capacity(BeadVersion::Enh).unwrap(), 24);
        assert_eq!(encoder.capacity(BeadVersion::EnhV2).unwrap(), 60);
        assert_eq!(encoder.label_length(BeadVersion::EnhV2).unwrap(), 27);
    }

    #[rstest]
    fn test_encode_layout(encoder: SegmentTableEncoder) {
        // first and last combination of the EnhV2 lists
        assert_eq!(
            encoder.encode(1, BeadVersion::EnhV2).unwrap(),
            "AACGGCAGCAATAGGCAAAAGATACAT"
        );
        assert_eq!(
            encoder.encode(2, BeadVersion::EnhV2).unwrap(),
            "AACGGCAGCAATAGGCAAAAGTGTTTT"
        );
        assert_eq!(
            encoder.encode(6, BeadVersion::EnhV2).unwrap(),
            "AACGGCAGCTATATTAAAAAGATACAT"
        );
        assert_eq!(
            encoder.encode(60, BeadVersion::EnhV2).unwrap(),
            "TTGCACCTATGACGGATATTCGTGCTC"
        );
    }

    #[rstest]
    fn test_bijection(encoder: SegmentTableEncoder) {
        for version in [BeadVersion::Original, BeadVersion::Enh, BeadVersion::EnhV2] {
            let capacity = encoder.capacity(version).unwrap();
            let mut seen = HashSet::new();
            for index in 1..=capacity {
                let label = encoder.encode(index, version).unwrap();
                assert!(seen.insert(label.clone()), "duplicate label {}", label);
                assert_eq!(encoder.decode(&label, version).unwrap(), index);
            }
        }
    }

    #[rstest]
    #[case(0)]
    #[case(61)]
    fn test_encode_out_of_range(encoder: SegmentTableEncoder, #[case] index: u64) {
        assert!(matches!(
            encoder.encode(index, BeadVersion::EnhV2),
            Err(RhapsimError::CellLabelIndexOutOfRange { limit: 60, .. })
        ));
    }

    #[rstest]
    #[case("AACGGCAGC")]
    #[case("GGGGGGGGGAATAGGCAAAAGATACAT")]
    fn test_decode_invalid(encoder: SegmentTableEncoder, #[case] label: &str) {
        assert!(matches!(
            encoder.decode(label, BeadVersion::EnhV2),
            Err(RhapsimError::UndecodableCellLabel(_))
        ));
    }

    #[rstest]
    #[case("EnhV2:\n  cls1: []\n  cls2: [ACGT]\n  cls3: [ACGT]\n")]
    #[case("EnhV2:\n  cls1: [ACGT, ACG]\n  cls2: [ACGT]\n  cls3: [ACGT]\n")]
    #[case("EnhV2:\n  cls1: [ACGT, ACGT]\n  cls2: [ACGT]\n  cls3: [ACGT]\n")]
    #[case("EnhV2:\n  cls1: [ACGN]\n  cls2: [ACGT]\n  cls3: [ACGT]\n")]
    fn test_invalid_tables(#[case] yaml: &str) {
        assert!(SegmentTableEncoder::from_yaml_str(yaml).is_err());
    }

    #[rstest]
    fn test_table_keys_ignore_case() {
        let encoder = SegmentTableEncoder::from_yaml_str(
            "enhv2:\n  cls1: [AC]\n  cls2: [GT]\n  cls3: [CA]\n",
        )
        .unwrap();
        assert_eq!(encoder.encode(1, BeadVersion::EnhV2).unwrap(), "ACGTCA");
    }

    #[rstest]
    fn test_missing_version() {
        let encoder = SegmentTableEncoder::from_yaml_str(
            "Enh:\n  cls1: [AC]\n  cls2: [GT]\n  cls3: [CA]\n",
        )
        .unwrap();
        assert_eq!(encoder.encode(1, BeadVersion::Enh).unwrap(), "ACGTCA");
        assert!(matches!(
            encoder.encode(1, BeadVersion::EnhV2),
            Err(RhapsimError::UnknownBeadVersion(_))
        ));
    }
}
