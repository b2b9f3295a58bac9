use crate::models::{Certificate, CertificateElement};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    /// Hex encoding of the store-assigned id; empty until first stored.
    pub id: String,
    pub name: String,
    pub bg_image: String,
    pub elements: Vec<CertificateElement>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Certificate> for CertificateResponse {
    fn from(cert: Certificate) -> Self {
        Self {
            id: cert.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: cert.name,
            bg_image: cert.bg_image,
            elements: cert.elements,
            created_at: cert.created_at.to_rfc3339(),
            updated_at: cert.updated_at.to_rfc3339(),
        }
    }
}

/// Body of the save endpoint. Client-supplied timestamps are ignored; the
/// server stamps them on every save.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCertificateRequest {
    /// Absent or empty means create; a hex id means update in place.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub bg_image: String,
    #[serde(default)]
    pub elements: Vec<CertificateElement>,
}

#[derive(Debug, Deserialize)]
pub struct ListCertificatesParams {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoadCertificateParams {
    pub id: Option<String>,
}
