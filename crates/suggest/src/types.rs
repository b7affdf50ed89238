use serde::{Deserialize, Serialize};

/// Form payload submitted by a visitor proposing a new airdrop.
///
/// Field names follow the web form (`projectName`, `officialLink`, ...), so the
/// struct deserializes straight from the JSON the UI posts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    pub project_name: String,
    pub description: String,
    pub official_link: String,
    /// Optional contact address of the submitter.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional free-form eligibility notes.
    #[serde(default)]
    pub criteria: Option<String>,
}

impl SuggestionInput {
    pub fn new(
        project_name: impl Into<String>,
        description: impl Into<String>,
        official_link: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            description: description.into(),
            official_link: official_link.into(),
            email: None,
            criteria: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = Some(criteria.into());
        self
    }

    /// Submitter address, `None` when absent or blank.
    pub fn contact_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Criteria notes, `None` when absent or blank.
    pub fn criteria_notes(&self) -> Option<&str> {
        non_blank(self.criteria.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_form_field_names() {
        let json = r#"{
            "projectName": "Zeta",
            "description": "A new layer-2 rollup project",
            "officialLink": "https://zeta.example",
            "email": "",
            "criteria": "hold 10 ZETA"
        }"#;
        let input: SuggestionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.project_name, "Zeta");
        assert_eq!(input.official_link, "https://zeta.example");
        assert_eq!(input.email.as_deref(), Some(""));
        assert_eq!(input.criteria_notes(), Some("hold 10 ZETA"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{"projectName":"Zeta","description":"d","officialLink":"x"}"#;
        let input: SuggestionInput = serde_json::from_str(json).unwrap();
        assert!(input.email.is_none());
        assert!(input.criteria.is_none());
    }

    #[test]
    fn blank_optionals_are_treated_as_missing() {
        let input = SuggestionInput::new("Zeta", "desc", "https://zeta.example")
            .with_email("   ")
            .with_criteria("");
        assert_eq!(input.contact_email(), None);
        assert_eq!(input.criteria_notes(), None);

        let input = input.with_email(" me@zeta.example ");
        assert_eq!(input.contact_email(), Some("me@zeta.example"));
    }
}
