use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One positioned visual primitive within a certificate. Elements live inside
/// their parent certificate's `elements` array and are never stored on their own.
///
/// Style fields are optional and omitted from both bson and JSON when absent;
/// the consuming editor supplies defaults for anything that is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

/// A named visual template stored in the `certificates` collection.
///
/// `id` stays `None` until the document has been inserted; the store assigns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub bg_image: String,
    pub elements: Vec<CertificateElement>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    pub fn new(name: String, bg_image: String, elements: Vec<CertificateElement>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            bg_image,
            elements,
            created_at: now,
            updated_at: now,
        }
    }

    /// The fixed template served by the default endpoint and inserted when the
    /// collection is empty at startup. Both call sites share this constructor so
    /// the two payloads cannot drift.
    pub fn default_template() -> Self {
        fn text(id: &str, content: String, y: f64, font_size: f64, z_index: i32) -> CertificateElement {
            CertificateElement {
                id: id.to_string(),
                kind: "text".to_string(),
                content,
                x: 400.0,
                y,
                width: None,
                height: None,
                font_size: Some(font_size),
                color: Some("#2c3e50".to_string()),
                font_family: Some("Times New Roman".to_string()),
                font_weight: None,
                z_index,
                text_align: Some("center".to_string()),
                border_color: Some("transparent".to_string()),
                border_width: None,
                border_style: Some("solid".to_string()),
                border_radius: None,
            }
        }

        let mut title = text(
            "title",
            "CERTIFICATE OF ACHIEVEMENT".to_string(),
            100.0,
            36.0,
            1,
        );
        title.font_weight = Some("bold".to_string());

        Self::new(
            "Default Certificate".to_string(),
            String::new(),
            vec![
                title,
                text(
                    "recipient",
                    "This certificate is awarded to [Recipient Name]".to_string(),
                    200.0,
                    20.0,
                    2,
                ),
                text(
                    "description",
                    "For outstanding performance and dedication".to_string(),
                    250.0,
                    20.0,
                    3,
                ),
                text(
                    "date",
                    format!("Date: {}", Utc::now().format("%d/%m/%Y")),
                    350.0,
                    18.0,
                    4,
                ),
                text("signature", "Authorized Signature".to_string(), 450.0, 18.0, 5),
            ],
        )
    }
}
