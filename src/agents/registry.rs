use serde::{Deserialize, Serialize};

/// The six evidence-domain agents, in dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum AgentName {
    Clinical,
    Genomics,
    Research,
    Market,
    Patent,
    Safety,
}

impl AgentName {
    pub const ALL: [AgentName; 6] = [
        AgentName::Clinical,
        AgentName::Genomics,
        AgentName::Research,
        AgentName::Market,
        AgentName::Patent,
        AgentName::Safety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clinical => "Clinical",
            Self::Genomics => "Genomics",
            Self::Research => "Research",
            Self::Market => "Market",
            Self::Patent => "Patent",
            Self::Safety => "Safety",
        }
    }

    /// Case-insensitive lookup, as backends report names in either case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn matches(&self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name.trim())
    }

    pub fn definition(&self) -> &'static AgentDefinition {
        // Registry order mirrors the enum order
        &AGENT_REGISTRY[*self as usize]
    }
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AgentDefinition {
    pub name: AgentName,
    pub display_name: &'static str,
    /// Tag used in activity lines, e.g. `[CLINICAL]`.
    pub log_tag: &'static str,
    /// Ordered phase descriptions. The last one is reserved for completion.
    pub phases: &'static [&'static str],
}

pub static AGENT_REGISTRY: [AgentDefinition; 6] = [
    AgentDefinition {
        name: AgentName::Clinical,
        display_name: "Clinical trials agent",
        log_tag: "CLINICAL",
        phases: &[
            "Initializing ClinicalTrials.gov API...",
            "Querying 50,000+ clinical trials...",
            "Analyzing Phase II/III outcomes...",
            "Extracting adverse event data...",
            "Validating efficacy signals...",
            "Compiling trial metadata...",
        ],
    },
    AgentDefinition {
        name: AgentName::Genomics,
        display_name: "Genomics agent",
        log_tag: "GENOMICS",
        phases: &[
            "Connecting to AlphaFold2 endpoint...",
            "Loading protein interaction networks...",
            "Analyzing binding affinity predictions...",
            "Validating pathway engagement...",
            "Processing STRING database...",
            "Finalizing target confidence scores...",
        ],
    },
    AgentDefinition {
        name: AgentName::Research,
        display_name: "Literature agent",
        log_tag: "RESEARCH",
        phases: &[
            "Initializing PubMed search engine...",
            "Mining 5,000+ research papers...",
            "Extracting key findings...",
            "Analyzing publication trends...",
            "Computing h-index scores...",
            "Aggregating evidence chains...",
        ],
    },
    AgentDefinition {
        name: AgentName::Market,
        display_name: "Market intelligence agent",
        log_tag: "MARKET",
        phases: &[
            "Connecting to market intelligence APIs...",
            "Analyzing competitive landscape...",
            "Calculating market size projections...",
            "Assessing reimbursement outlook...",
            "Evaluating pricing strategies...",
            "Finalizing commercial viability...",
        ],
    },
    AgentDefinition {
        name: AgentName::Patent,
        display_name: "Patent agent",
        log_tag: "PATENT",
        phases: &[
            "Querying USPTO database...",
            "Scanning EPO patent registry...",
            "Analyzing prior art landscape...",
            "Checking blocking patents...",
            "Evaluating FTO status...",
            "Compiling IP risk assessment...",
        ],
    },
    AgentDefinition {
        name: AgentName::Safety,
        display_name: "Safety agent",
        log_tag: "SAFETY",
        phases: &[
            "Accessing FDA AERS database...",
            "Analyzing toxicity profiles...",
            "Reviewing black box warnings...",
            "Processing adverse event reports...",
            "Validating safety margins...",
            "Generating risk summary...",
        ],
    },
];
