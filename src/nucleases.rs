use crate::{
    error::{CutSiteError, Result},
    genetic_sequence::GeneticSequence,
    nuclease::{Cas, CasSite, Hit},
    search::SiteSearch,
};
use std::{fs, sync::Arc};

const RUNTIME_NUCLEASES_PATH: &str = "data/resources/nucleases.json";
const BUILTIN_NUCLEASES_JSON: &str = include_str!("../assets/nucleases.json");

#[derive(Clone, Debug)]
pub struct Nucleases {
    nucleases: Vec<Arc<Cas>>,
    max_pam_length: usize,
}

impl Nucleases {
    pub fn empty() -> Self {
        Self {
            nucleases: vec![],
            max_pam_length: 0,
        }
    }

    fn new(json_text: &str) -> Result<Self> {
        let mut ret = Self::empty();
        let res: serde_json::Value = serde_json::from_str(json_text)?;
        let arr = res
            .as_array()
            .ok_or(CutSiteError::Catalog("Nucleases file is not a JSON array".to_string()))?;
        for row in arr {
            let cas: Cas = match serde_json::from_value(row.to_owned()) {
                Ok(cas) => cas,
                Err(e) => return Err(CutSiteError::Catalog(format!("Bad nuclease {row}: {e}"))),
            };
            if cas.name.trim().is_empty() {
                return Err(CutSiteError::Catalog(format!("Nameless nuclease: {row}")));
            }
            if cas.pam.is_empty() {
                return Err(CutSiteError::Catalog(format!(
                    "Nuclease '{}' has an empty PAM",
                    cas.name
                )));
            }
            ret.add(cas);
        }
        Ok(ret)
    }

    pub fn add(&mut self, cas: Cas) {
        self.max_pam_length = self.max_pam_length.max(cas.pam.len());
        self.nucleases.push(Arc::new(cas));
    }

    pub fn nucleases(&self) -> &[Arc<Cas>] {
        &self.nucleases
    }

    pub fn max_pam_length(&self) -> usize {
        self.max_pam_length
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<Cas>> {
        let key = name.trim().to_ascii_uppercase();
        self.nucleases
            .iter()
            .find(|cas| cas.name.to_ascii_uppercase() == key)
    }

    pub fn nucleases_by_name(&self, names: &[&str]) -> Self {
        let mut ret = Self::empty();
        for cas in self
            .nucleases
            .iter()
            .filter(|cas| names.contains(&cas.name.as_str()))
        {
            ret.max_pam_length = ret.max_pam_length.max(cas.pam.len());
            ret.nucleases.push(cas.clone());
        }
        ret
    }

    /// A search with the PAM of every nuclease registered.
    pub fn build_search(&self) -> SiteSearch<Hit> {
        let mut search = SiteSearch::new();
        for cas in &self.nucleases {
            cas.register(&mut search);
        }
        search
    }

    pub fn search(&self, sequence: &GeneticSequence) -> Result<Vec<CasSite>> {
        Ok(self
            .build_search()
            .search_in(sequence)?
            .into_iter()
            .filter_map(Hit::into_cas_site)
            .collect())
    }
}

pub fn load_nucleases_from_json_text(json_text: &str) -> Result<Nucleases> {
    Nucleases::new(json_text)
}

pub fn load_nucleases_from_path(path: &str) -> Result<Nucleases> {
    let text = fs::read_to_string(path)?;
    load_nucleases_from_json_text(&text)
}

impl Default for Nucleases {
    fn default() -> Self {
        if let Ok(text) = fs::read_to_string(RUNTIME_NUCLEASES_PATH) {
            match Nucleases::new(&text) {
                Ok(custom) if !custom.nucleases.is_empty() => return custom,
                Ok(_) => {}
                Err(e) => log::warn!("Ignoring {RUNTIME_NUCLEASES_PATH}: {e}"),
            }
        }
        Nucleases::new(BUILTIN_NUCLEASES_JSON).unwrap_or_else(|e| {
            log::warn!("Built-in nuclease catalogue is unreadable: {e}");
            Nucleases::empty()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locus::Locus;
    use std::io::Write;

    #[test]
    fn test_builtin_catalogue() {
        let nucleases = Nucleases::new(BUILTIN_NUCLEASES_JSON).unwrap();
        let sp = nucleases.by_name("spcas9").unwrap();
        assert_eq!(sp.pam.get_forward_string(), "NGG");
        assert_eq!(sp.spacer, Locus::forward(-20, 20));
        assert_eq!(sp.cuts, vec![Locus::forward(-3, 0)]);
        assert!(nucleases.by_name("AsCas12a").is_some());
        assert_eq!(nucleases.max_pam_length(), 6);
    }

    #[test]
    fn test_catalogue_errors() {
        assert!(matches!(
            load_nucleases_from_json_text("{}"),
            Err(CutSiteError::Catalog(_))
        ));
        assert!(matches!(
            load_nucleases_from_json_text("[{\"name\": \"X\"}]"),
            Err(CutSiteError::Catalog(_))
        ));
        assert!(matches!(
            load_nucleases_from_json_text(
                r#"[{"name": "X", "pam": "", "spacer": {"position": 0, "length": 1, "strand": "+"}}]"#
            ),
            Err(CutSiteError::Catalog(_))
        ));
        assert!(matches!(
            load_nucleases_from_json_text("not json"),
            Err(CutSiteError::Json(_))
        ));
        assert!(matches!(
            load_nucleases_from_path("test_files/missing.json"),
            Err(CutSiteError::Io(_))
        ));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "TestCas", "pam": "TTTV",
                 "spacer": {{"position": 4, "length": 23, "strand": "+"}},
                 "note": "test only"}}]"#
        )
        .unwrap();
        let nucleases = load_nucleases_from_path(file.path().to_str().unwrap()).unwrap();
        assert_eq!(nucleases.nucleases().len(), 1);
        let cas = &nucleases.nucleases()[0];
        assert!(cas.cuts.is_empty());
        assert_eq!(cas.note.as_deref(), Some("test only"));
    }

    #[test]
    fn test_subset_by_name() {
        let nucleases = Nucleases::new(BUILTIN_NUCLEASES_JSON).unwrap();
        let subset = nucleases.nucleases_by_name(&["SpCas9", "Unknown"]);
        assert_eq!(subset.nucleases().len(), 1);
        assert_eq!(subset.max_pam_length(), 3);
    }

    #[test]
    fn test_search() {
        let nucleases = Nucleases::new(BUILTIN_NUCLEASES_JSON)
            .unwrap()
            .nucleases_by_name(&["SpCas9"]);
        let target = GeneticSequence::from("AAAAAAAAAAAAAAAAAAAAAAAATGGAAAA");
        let sites = nucleases.search(&target).unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].at, Locus::forward(24, 3));
        assert_eq!(sites[0].spacer().get_forward_string(), "A".repeat(20));
    }
}
