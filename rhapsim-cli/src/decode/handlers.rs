use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use rhapsim_wta::{BeadVersion, CellLabelEncoder, SegmentTableEncoder};

/// Decode the cell label at the start of `sequence` into its 1-based index.
pub fn decode_sequence(
    encoder: &impl CellLabelEncoder,
    sequence: &str,
    version: BeadVersion,
) -> Result<u64> {
    let label_length = encoder.label_length(version)?;
    let label = sequence.get(..label_length).with_context(|| {
        format!(
            "Sequence is shorter than a {} cell label ({} bases)",
            version, label_length
        )
    })?;
    Ok(encoder.decode(label, version)?)
}

pub fn run_decode(matches: &ArgMatches) -> Result<()> {
    let sequence = matches
        .get_one::<String>("sequence")
        .ok_or_else(|| anyhow::anyhow!("A sequence is required"))?;
    let cell_labels = matches
        .get_one::<String>("cell_labels")
        .ok_or_else(|| anyhow::anyhow!("A cell label table is required"))?;
    let version: BeadVersion = matches
        .get_one::<String>("bead_version")
        .map(|v| v.parse::<BeadVersion>())
        .transpose()?
        .unwrap_or_default();

    let encoder = SegmentTableEncoder::from_yaml(Path::new(cell_labels))?;
    let index = decode_sequence(&encoder, &sequence.to_uppercase(), version)?;

    println!("cell_label_index\t{}", index);
    println!("cell_index\t{}", index - 1);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn encoder() -> SegmentTableEncoder {
        SegmentTableEncoder::from_yaml(Path::new("../tests/data/cell_labels.yaml")).unwrap()
    }

    #[rstest]
    #[case(BeadVersion::EnhV2, 1)]
    #[case(BeadVersion::EnhV2, 60)]
    #[case(BeadVersion::Enh, 17)]
    #[case(BeadVersion::Original, 8)]
    fn test_decode_label_with_umi(
        encoder: SegmentTableEncoder,
        #[case] version: BeadVersion,
        #[case] index: u64,
    ) {
        let sequence = format!("{}ACGTACGTACGTAC", encoder.encode(index, version).unwrap());
        assert_eq!(decode_sequence(&encoder, &sequence, version).unwrap(), index);
    }

    #[rstest]
    fn test_decode_short_sequence(encoder: SegmentTableEncoder) {
        assert!(decode_sequence(&encoder, "AACGG", BeadVersion::EnhV2).is_err());
    }

    #[rstest]
    fn test_decode_unknown_label(encoder: SegmentTableEncoder) {
        let sequence = "N".repeat(27);
        assert!(decode_sequence(&encoder, &sequence, BeadVersion::EnhV2).is_err());
    }
}
