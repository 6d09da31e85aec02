use serde::{Deserialize, Serialize};
use super::null_as_empty;

/// Backends hand out numeric or string candidate ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSource {
    pub doc_id: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub drug: String,
    /// 0..=1
    pub score: f64,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub market_estimate: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub patent_flags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub safety_flags: Vec<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sources: Vec<CandidateSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    Insufficient,
}

impl Candidate {
    pub fn confidence_tier(&self) -> ConfidenceTier {
        let pct = self.score * 100.0;
        if pct >= 85.0 {
            ConfidenceTier::High
        } else if pct >= 70.0 {
            ConfidenceTier::Medium
        } else if pct >= 50.0 {
            ConfidenceTier::Low
        } else {
            ConfidenceTier::Insufficient
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobResultsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub explanation: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_parse_with_optional_fields() {
        let raw = r#"{
            "candidates": [
                {"id": 1, "drug": "Baricitinib", "score": 0.91, "summary": "JAK1/2 inhibitor",
                 "marketEstimate": "$8.2B by 2030", "patentFlags": ["US-123"], "safetyFlags": null,
                 "sources": [{"docId": "PMID:1", "snippet": "reduced tau"}]},
                {"id": "c-2", "drug": "Metformin", "score": 0.72}
            ],
            "explanation": {"graph_nodes": ["Query"]}
        }"#;
        let parsed: JobResultsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.candidates[0].id, CandidateId::Number(1));
        assert!(parsed.candidates[0].safety_flags.is_empty());
        assert_eq!(parsed.candidates[0].sources[0].doc_id, "PMID:1");
        assert_eq!(parsed.candidates[1].id.to_string(), "c-2");
        assert!(parsed.candidates[1].summary.is_empty());
    }

    #[test]
    fn test_missing_candidates_is_empty() {
        let parsed: JobResultsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn test_confidence_tiers() {
        let mut c: Candidate = serde_json::from_str(r#"{"id": 1, "drug": "X", "score": 0.9}"#).unwrap();
        assert_eq!(c.confidence_tier(), ConfidenceTier::High);
        c.score = 0.75;
        assert_eq!(c.confidence_tier(), ConfidenceTier::Medium);
        c.score = 0.55;
        assert_eq!(c.confidence_tier(), ConfidenceTier::Low);
        c.score = 0.2;
        assert_eq!(c.confidence_tier(), ConfidenceTier::Insufficient);
    }
}
