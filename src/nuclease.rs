//! CRISPR nucleases as search match handlers.
//!
//! A [`Cas`] describes its PAM motif and, relative to a PAM match, where the
//! spacer sits and where the nuclease cuts. Registered with a [`SiteSearch`],
//! it turns every PAM match into a [`CasSite`].

use crate::{
    genetic_sequence::GeneticSequence,
    locus::{Locus, Strand},
    search::{SearchMatchHandler, SharedHandler, Site, SiteSearch},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt, sync::Arc};

/// Describes one site on its own, independent of any other site.
pub trait CasLocalModel: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, site: &CasSite) -> anyhow::Result<Value>;
}

/// Describes one site in the context of every site found in the same scan.
pub trait CasGlobalModel: Send + Sync {
    fn name(&self) -> &str;

    /// `counterparts` holds every site of the scan, `site` included.
    fn evaluate(&self, site: &CasSite, counterparts: &[CasSite]) -> anyhow::Result<Value>;
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Cas {
    pub name: String,
    pub pam: GeneticSequence,
    /// Spacer window, relative to the PAM match
    pub spacer: Locus,
    /// Zero-length cut positions, relative to the PAM match
    #[serde(default)]
    pub cuts: Vec<Locus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip)]
    models: Vec<Arc<dyn CasLocalModel>>,
}

impl Cas {
    pub fn new(name: &str, pam: GeneticSequence, spacer: Locus, cuts: Vec<Locus>) -> Self {
        Self {
            name: name.to_string(),
            pam,
            spacer,
            cuts,
            note: None,
            models: vec![],
        }
    }

    pub fn with_model(mut self, model: Arc<dyn CasLocalModel>) -> Self {
        self.models.push(model);
        self
    }

    pub fn models(&self) -> &[Arc<dyn CasLocalModel>] {
        &self.models
    }

    /// Builds the site for a PAM match and runs every local model on it.
    pub fn site_at(&self, on: &GeneticSequence, at: Locus) -> anyhow::Result<CasSite> {
        let mut site = CasSite {
            of: Arc::new(self.clone()),
            on: on.clone(),
            at,
            aspects: BTreeMap::new(),
        };
        let spacer = site.spacer().get_forward_string();
        site.aspects.insert("spacer".to_string(), Value::String(spacer));
        for model in &self.models {
            let value = model.evaluate(&site)?;
            site.aspects.insert(model.name().to_string(), value);
        }
        Ok(site)
    }

    /// Registers the PAM of this nuclease with `search`, with itself as the
    /// match handler.
    pub fn register(self: &Arc<Self>, search: &mut SiteSearch<Hit>) {
        let handler: SharedHandler<Hit> = self.clone();
        search.add_query(&self.pam, Some(handler));
    }
}

impl SearchMatchHandler<Hit> for Cas {
    fn on_match(&self, sequence: &GeneticSequence, locus: Locus) -> anyhow::Result<Hit> {
        Ok(Hit::Cas(self.site_at(sequence, locus)?))
    }
}

impl fmt::Debug for Cas {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cas")
            .field("name", &self.name)
            .field("pam", &self.pam)
            .field("spacer", &self.spacer)
            .field("cuts", &self.cuts)
            .field(
                "models",
                &self.models.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct CasSite {
    pub of: Arc<Cas>,
    pub on: GeneticSequence,
    /// The PAM match
    pub at: Locus,
    pub aspects: BTreeMap<String, Value>,
}

#[derive(Serialize)]
struct CasSiteSummary<'a> {
    of: &'a str,
    at: i64,
    strand: Strand,
}

impl CasSite {
    pub fn pam(&self) -> GeneticSequence {
        self.on.extract(&self.at)
    }

    pub fn spacer_locus(&self) -> Locus {
        self.at.oriented(self.of.spacer)
    }

    pub fn spacer(&self) -> GeneticSequence {
        self.on.extract(&self.spacer_locus())
    }

    pub fn cut_loci(&self) -> Vec<Locus> {
        self.of.cuts.iter().map(|cut| self.at.oriented(*cut)).collect()
    }

    pub fn site(&self) -> Site {
        Site::new(self.on.clone(), self.at)
    }

    pub fn aspect(&self, name: &str) -> Option<&Value> {
        self.aspects.get(name)
    }
}

impl fmt::Display for CasSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{} site {} {}>", self.of.name, self.pam(), self.spacer())
    }
}

impl Serialize for CasSite {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CasSiteSummary {
            of: &self.of.name,
            at: self.at.position,
            strand: self.at.strand,
        }
        .serialize(serializer)
    }
}

/// A search result: a plain site for queries registered without a handler,
/// or a nuclease site.
#[derive(Clone, Debug)]
pub enum Hit {
    Site(Site),
    Cas(CasSite),
}

impl Hit {
    pub fn locus(&self) -> Locus {
        match self {
            Hit::Site(site) => site.at,
            Hit::Cas(site) => site.at,
        }
    }

    pub fn into_cas_site(self) -> Option<CasSite> {
        match self {
            Hit::Cas(site) => Some(site),
            Hit::Site(_) => None,
        }
    }
}

impl From<Site> for Hit {
    fn from(site: Site) -> Self {
        Hit::Site(site)
    }
}

/// Runs every global model over `sites`, storing each result as an aspect
/// named after its model.
pub fn apply_global_models(
    sites: &mut [CasSite],
    models: &[Arc<dyn CasGlobalModel>],
) -> anyhow::Result<()> {
    for model in models {
        let values = {
            let all: &[CasSite] = sites;
            all.iter()
                .map(|site| model.evaluate(site, all))
                .collect::<anyhow::Result<Vec<_>>>()?
        };
        for (site, value) in sites.iter_mut().zip(values) {
            site.aspects.insert(model.name().to_string(), value);
        }
    }
    Ok(())
}
