pub mod certificate;

pub use certificate::{Certificate, CertificateElement};
