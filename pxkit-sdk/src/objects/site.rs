use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All sites the gateway operates in
pub enum Site {
    #[serde(rename = "MLA")]
    Argentina,
    #[serde(rename = "MLB")]
    Brazil,
    #[serde(rename = "MLC")]
    Chile,
    #[serde(rename = "MLM")]
    Mexico,
    #[serde(rename = "MCO")]
    Colombia,
    #[serde(rename = "MLV")]
    Venezuela,
    #[serde(rename = "MLU")]
    Uruguay,
    #[serde(rename = "MPE")]
    Peru,
}

impl Site {
    /// The gateway site id, e.g. `MLA`.
    pub fn id(&self) -> &'static str {
        match self {
            Site::Argentina => "MLA",
            Site::Brazil => "MLB",
            Site::Chile => "MLC",
            Site::Mexico => "MLM",
            Site::Colombia => "MCO",
            Site::Venezuela => "MLV",
            Site::Uruguay => "MLU",
            Site::Peru => "MPE",
        }
    }

    /// ISO currency used for amounts on this site.
    pub fn currency_id(&self) -> &'static str {
        match self {
            Site::Argentina => "ARS",
            Site::Brazil => "BRL",
            Site::Chile => "CLP",
            Site::Mexico => "MXN",
            Site::Colombia => "COP",
            Site::Venezuela => "VES",
            Site::Uruguay => "UYU",
            Site::Peru => "PEN",
        }
    }

    /// Look a site up by its gateway id.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "MLA" => Some(Site::Argentina),
            "MLB" => Some(Site::Brazil),
            "MLC" => Some(Site::Chile),
            "MLM" => Some(Site::Mexico),
            "MCO" => Some(Site::Colombia),
            "MLV" => Some(Site::Venezuela),
            "MLU" => Some(Site::Uruguay),
            "MPE" => Some(Site::Peru),
            _ => None,
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Site {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| UnknownSite(s.to_owned()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown site id: {0}")]
pub struct UnknownSite(pub String);
