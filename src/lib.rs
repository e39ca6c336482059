use lazy_static::lazy_static;
use nucleases::Nucleases;

pub mod error;
pub mod genetic_sequence;
pub mod iupac_code;
pub mod locus;
pub mod nuclease;
pub mod nucleases;
pub mod search;

pub use error::{CutSiteError, Result};
pub use genetic_sequence::GeneticSequence;
pub use locus::{Locus, Strand};
pub use search::{SearchMatchHandler, SharedHandler, Site, SiteSearch};

lazy_static! {
    // Nuclease catalogue
    pub static ref NUCLEASES: Nucleases = Nucleases::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalogue() {
        assert!(NUCLEASES.by_name("SpCas9").is_some());
    }
}
