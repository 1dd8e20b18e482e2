pub mod annotation;
pub mod reference;
pub mod sequences;

// re-export for cleaner imports
pub use self::annotation::{Exon, Gene, GeneAnnotation};
pub use self::reference::Reference;
pub use self::sequences::SequenceDictionary;
