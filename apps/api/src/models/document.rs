use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

fn pdf_content_type() -> String {
    PDF_CONTENT_TYPE.to_string()
}

/// A rendered résumé as it travels between stages: base64 text in `body`.
///
/// `/api/v1/generate` produces it and `/api/v1/users/:user/publish` accepts it
/// unchanged, so one stage's response can be forwarded as the next request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfDocument {
    #[serde(default = "pdf_content_type")]
    pub content_type: String,
    pub body: String,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl PdfDocument {
    pub fn encode(pdf: &[u8]) -> Self {
        Self {
            content_type: pdf_content_type(),
            body: STANDARD.encode(pdf),
            is_base64_encoded: true,
        }
    }

    pub fn decode(&self) -> Result<Bytes, AppError> {
        let bytes = STANDARD
            .decode(self.body.trim())
            .map_err(|e| AppError::Validation(format!("PDF body is not valid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("PDF body is empty".to_string()));
        }
        Ok(Bytes::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_marks_envelope_as_pdf() {
        let doc = PdfDocument::encode(b"%PDF-1.7");
        assert_eq!(doc.content_type, "application/pdf");
        assert!(doc.is_base64_encoded);
        assert_eq!(doc.body, "JVBERi0xLjc=");
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(PdfDocument::encode(b"%PDF")).unwrap_or_default();
        assert_eq!(value["contentType"], "application/pdf");
        assert_eq!(value["isBase64Encoded"], true);
    }

    #[test]
    fn test_accepts_bare_body() {
        let doc: PdfDocument = serde_json::from_value(json!({ "body": "JVBERi0xLjc=" }))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(doc.content_type, PDF_CONTENT_TYPE);
        assert_eq!(doc.decode().ok(), Some(Bytes::from_static(b"%PDF-1.7")));
    }

    #[test]
    fn test_invalid_base64_is_validation_error() {
        let doc = PdfDocument {
            content_type: pdf_content_type(),
            body: "not base64!!".to_string(),
            is_base64_encoded: true,
        };
        assert!(matches!(doc.decode(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_body_is_rejected() {
        let doc = PdfDocument {
            content_type: pdf_content_type(),
            body: String::new(),
            is_base64_encoded: true,
        };
        assert!(matches!(doc.decode(), Err(AppError::Validation(_))));
    }
}
