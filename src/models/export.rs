use serde::{Deserialize, Serialize};
use crate::errors::RepurposeError;

/// Payloads at or below this size that are not labelled as PDF are treated
/// as error pages, even on HTTP 200.
pub const MIN_REPORT_BYTES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Pptx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Pptx => "pptx",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub formats: Vec<ExportFormat>,
    pub include_audit_trail: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            formats: vec![ExportFormat::Pdf],
            include_audit_trail: true,
        }
    }
}

/// A report downloaded from the export endpoint.
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub filename: String,
}

impl ExportPayload {
    /// Accept the payload only if it is labelled as a PDF or is larger than
    /// [`MIN_REPORT_BYTES`].
    pub fn accept(
        job_id: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
        content_disposition: Option<&str>,
    ) -> Result<Self, RepurposeError> {
        let is_pdf = content_type
            .as_deref()
            .map_or(false, |ct| ct.to_ascii_lowercase().starts_with("application/pdf"));

        if !is_pdf && bytes.len() <= MIN_REPORT_BYTES {
            let text = String::from_utf8_lossy(&bytes);
            let detail = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("message"))
                        .and_then(|d| d.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| text.trim().to_string());
            let detail = if detail.is_empty() { "empty report payload".to_string() } else { detail };
            return Err(RepurposeError::Export(detail));
        }

        let filename = content_disposition
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| default_report_filename(job_id));

        Ok(Self { bytes, content_type, filename })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// `FDA21_Report_<job>.pdf`, with the display `#` dropped from demo ids.
pub fn default_report_filename(job_id: &str) -> String {
    format!("FDA21_Report_{}.pdf", job_id.trim_start_matches('#'))
}

fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains('/') && !name.contains('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_pdf_content_type_even_if_small() {
        let payload = ExportPayload::accept("job-1", b"%PDF-1.4".to_vec(), Some("application/pdf".into()), None).unwrap();
        assert_eq!(payload.filename, "FDA21_Report_job-1.pdf");
    }

    #[test]
    fn test_accepts_large_unlabelled_payload() {
        let payload = ExportPayload::accept("job-1", vec![0u8; 1001], Some("application/octet-stream".into()), None).unwrap();
        assert_eq!(payload.size(), 1001);
    }

    #[test]
    fn test_rejects_small_json_payload_on_success() {
        let body = br#"{"exportId": "e1", "status": "ready"}"#.to_vec();
        let err = ExportPayload::accept("job-1", body, Some("application/json".into()), None).unwrap_err();
        assert!(matches!(err, RepurposeError::Export(_)));
    }

    #[test]
    fn test_rejection_surfaces_backend_detail() {
        let body = br#"{"detail": "report generator offline"}"#.to_vec();
        let err = ExportPayload::accept("job-1", body, None, None).unwrap_err();
        assert!(matches!(err, RepurposeError::Export(ref m) if m == "report generator offline"));
    }

    #[test]
    fn test_filename_from_disposition() {
        let payload = ExportPayload::accept(
            "job-1",
            vec![1u8; 2000],
            Some("application/pdf".into()),
            Some("attachment; filename=FDA21_Report_abc.pdf"),
        ).unwrap();
        assert_eq!(payload.filename, "FDA21_Report_abc.pdf");
    }

    #[test]
    fn test_default_filename_drops_hash() {
        assert_eq!(default_report_filename("#AB12CD34"), "FDA21_Report_AB12CD34.pdf");
    }

    #[test]
    fn test_export_request_wire_shape() {
        let json = serde_json::to_value(ExportRequest::default()).unwrap();
        assert_eq!(json["formats"][0], "pdf");
        assert_eq!(json["includeAuditTrail"], true);
    }
}
