pub mod certificates;

pub use certificates::{
    CertificateResponse, ListCertificatesParams, LoadCertificateParams, SaveCertificateRequest,
};
