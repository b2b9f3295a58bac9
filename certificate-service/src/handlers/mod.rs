pub mod certificates;
pub mod health;

pub use certificates::{
    default_certificate, list_certificates, load_certificate, save_certificate,
};
pub use health::health_check;
