//! The calling contract every component is checked against

use serde::Serialize;

/// Default contract operation on constructed TYPE components
pub const DEFAULT_METHOD: &str = "greet";

/// Default name of the single parameter the contract passes
pub const DEFAULT_PARAMETER: &str = "s";

/// Default canonical result template
pub const DEFAULT_TEMPLATE: &str = "GREETING:{input}:{unit}";

/// Input used when none is configured
pub const DEFAULT_SAMPLE_INPUT: &str = "abc";

const INPUT_PLACEHOLDER: &str = "{input}";
const UNIT_PLACEHOLDER: &str = "{unit}";

/// Calling contract: which operation is called, how the argument is named and
/// what the canonical result looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub method: String,
    pub parameter: String,
    pub template: ContractTemplate,
}

impl Default for Contract {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            parameter: DEFAULT_PARAMETER.to_string(),
            template: ContractTemplate::default(),
        }
    }
}

/// Canonical result template with `{input}` and `{unit}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContractTemplate(String);

impl Default for ContractTemplate {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE.to_string())
    }
}

impl ContractTemplate {
    /// Create a template; it must reference the input so results depend on it
    pub fn new(template: impl Into<String>) -> Result<Self, String> {
        let template = template.into();
        if !template.contains(INPUT_PLACEHOLDER) {
            return Err(format!(
                "Contract template '{}' must contain {}",
                template, INPUT_PLACEHOLDER
            ));
        }
        Ok(Self(template))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expected result for an input and the unit a component came from
    pub fn render(&self, input: &str, unit_name: &str) -> String {
        // Single pass so substituted text is never expanded again
        let mut rendered = String::with_capacity(self.0.len() + input.len() + unit_name.len());
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find('{') {
            rendered.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix(INPUT_PLACEHOLDER) {
                rendered.push_str(input);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(UNIT_PLACEHOLDER) {
                rendered.push_str(unit_name);
                rest = after;
            } else {
                rendered.push('{');
                rest = &tail[1..];
            }
        }
        rendered.push_str(rest);
        rendered
    }
}

impl std::fmt::Display for ContractTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
