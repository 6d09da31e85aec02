use serde::{Deserialize, Serialize};

/// Who is using the dashboard and whether they have seen the onboarding
/// tour. Owned by the API state and passed explicitly to handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppContext {
    pub name: String,
    pub role: String,
    pub has_onboarded: bool,
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            name: "Researcher".to_string(),
            role: "researcher".to_string(),
            has_onboarded: false,
        }
    }
}

impl AppContext {
    pub fn new(name: &str, role: &str) -> Self {
        Self {
            name: name.to_string(),
            role: role.to_string(),
            has_onboarded: false,
        }
    }

    /// Switching role restarts onboarding for the new role.
    pub fn switch_role(&mut self, role: &str) {
        self.role = role.to_string();
        self.has_onboarded = false;
    }

    pub fn complete_onboarding(&mut self) {
        self.has_onboarded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_flow() {
        let mut ctx = AppContext::new("Dr. Rivera", "researcher");
        assert!(!ctx.has_onboarded);
        ctx.complete_onboarding();
        assert!(ctx.has_onboarded);
        ctx.switch_role("analyst");
        assert_eq!(ctx.role, "analyst");
        assert!(!ctx.has_onboarded);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(AppContext::default()).unwrap();
        assert_eq!(json["hasOnboarded"], false);
        assert_eq!(json["role"], "researcher");
    }
}
