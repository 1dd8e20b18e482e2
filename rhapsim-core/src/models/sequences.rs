use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap;
use log::info;

use crate::errors::RhapsimError;
use crate::utils::get_dynamic_reader;

///
/// Reference sequences keyed by FASTA identifier.
///
/// The identifier is the first whitespace-delimited token of the header line,
/// so `>chr1 AC:CM000663.2` is stored as `chr1`. Sequence data is upper-cased.
///
#[derive(Debug, Clone, Default)]
pub struct SequenceDictionary {
    names: Vec<String>,
    sequences: FxHashMap<String, Vec<u8>>,
}

impl SequenceDictionary {
    /// Load every record of a FASTA (or FASTA.gz) file into memory.
    pub fn from_fasta(path: &Path) -> anyhow::Result<Self> {
        info!("Loading FASTA file with data: {}", path.display());
        let reader = get_dynamic_reader(path)?;
        let dictionary = Self::from_reader(reader)?;
        info!(
            "Loaded {} sequences ({} bp) from {}",
            dictionary.len(),
            dictionary.total_length(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, RhapsimError> {
        let mut dictionary = SequenceDictionary::default();
        let mut current: Option<(String, Vec<u8>)> = None;
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = reader.read_line(&mut line)?;
            if bytes_read == 0 {
                if let Some((name, data)) = current.take() {
                    dictionary.insert(name, data)?;
                }
                break;
            }

            if let Some(header) = line.strip_prefix('>') {
                if let Some((name, data)) = current.take() {
                    dictionary.insert(name, data)?;
                }
                let name = header.split_whitespace().next().ok_or_else(|| {
                    RhapsimError::FastaParseError("record with an empty header".to_string())
                })?;
                current = Some((name.to_string(), Vec::new()));
            } else {
                let trimmed = line.trim_end();
                if trimmed.is_empty() {
                    continue;
                }
                if !trimmed.is_ascii() {
                    return Err(RhapsimError::FastaParseError(
                        "sequence line contains non-ASCII characters".to_string(),
                    ));
                }
                match current.as_mut() {
                    Some((_, data)) => {
                        data.extend_from_slice(trimmed.to_ascii_uppercase().as_bytes())
                    }
                    None => {
                        return Err(RhapsimError::FastaParseError(
                            "sequence data before the first header".to_string(),
                        ));
                    }
                }
            }
        }

        Ok(dictionary)
    }

    fn insert(&mut self, name: String, data: Vec<u8>) -> Result<(), RhapsimError> {
        if self.sequences.contains_key(&name) {
            return Err(RhapsimError::FastaParseError(format!(
                "duplicate sequence name: {}",
                name
            )));
        }
        self.names.push(name.clone());
        self.sequences.insert(name, data);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.sequences.get(name).map(|s| s.as_slice())
    }

    /// Sequence names in file order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn total_length(&self) -> usize {
        self.sequences.values().map(|s| s.len()).sum()
    }
}

impl<S: Into<String>, D: Into<Vec<u8>>> FromIterator<(S, D)> for SequenceDictionary {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        let mut dictionary = SequenceDictionary::default();
        for (name, data) in iter {
            let name = name.into();
            if !dictionary.sequences.contains_key(&name) {
                dictionary.names.push(name.clone());
            }
            dictionary.sequences.insert(name, data.into());
        }
        dictionary
    }
}
