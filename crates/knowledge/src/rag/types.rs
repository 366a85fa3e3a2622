//! Routing decisions and exchange records.

use advisor_core::AppError;
use advisor_llm::StructuredOutput;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which knowledge source answers a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryType {
    /// The question names one or more subjects
    #[serde(rename = "subject_content")]
    SubjectContent,

    /// Anything else: rules, policies, program structure
    #[serde(rename = "general_handbook_query")]
    GeneralHandbook,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::SubjectContent => "subject_content",
            QueryType::GeneralHandbook => "general_handbook_query",
        }
    }

    /// Parse the router's label.
    ///
    /// `general_handbook` is accepted as a shorter spelling of the handbook label.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "subject_content" => Some(QueryType::SubjectContent),
            "general_handbook_query" | "general_handbook" => Some(QueryType::GeneralHandbook),
            _ => None,
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw router reply, before the label is checked.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterOutput {
    pub query_type: String,

    #[serde(default)]
    pub subjects: Option<Vec<String>>,
}

impl StructuredOutput for RouterOutput {
    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query_type": {
                    "type": "string",
                    "enum": ["subject_content", "general_handbook_query"],
                    "description": "subject_content if the question is about specific subjects, otherwise general_handbook_query"
                },
                "subjects": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Subject keys from the known list that the question refers to"
                }
            },
            "required": ["query_type", "subjects"]
        })
    }
}

/// A validated routing decision.
///
/// `subjects` may name keys that are not in the subject store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterDecision {
    pub query_type: QueryType,
    pub subjects: Vec<String>,
}

impl RouterDecision {
    pub fn subject_content<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query_type: QueryType::SubjectContent,
            subjects: subjects.into_iter().map(Into::into).collect(),
        }
    }

    pub fn general_handbook() -> Self {
        Self {
            query_type: QueryType::GeneralHandbook,
            subjects: Vec::new(),
        }
    }
}

impl TryFrom<RouterOutput> for RouterDecision {
    type Error = AppError;

    fn try_from(output: RouterOutput) -> Result<Self, Self::Error> {
        let query_type = QueryType::parse(&output.query_type).ok_or_else(|| {
            AppError::Routing(format!(
                "Router returned unknown query_type '{}'",
                output.query_type
            ))
        })?;

        let subjects = output
            .subjects
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            query_type,
            subjects,
        })
    }
}

/// One question's pass through router, resolver and generator.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub question: String,
    pub decision: RouterDecision,
    pub context: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_llm::parse_structured;

    #[test]
    fn test_decode_subject_decision() {
        let output: RouterOutput = parse_structured(
            r#"{"query_type": "subject_content", "subjects": ["stats101", " cs101 ", ""]}"#,
        )
        .unwrap();

        let decision = RouterDecision::try_from(output).unwrap();
        assert_eq!(decision.query_type, QueryType::SubjectContent);
        assert_eq!(decision.subjects, vec!["stats101", "cs101"]);
    }

    #[test]
    fn test_decode_handbook_decision_without_subjects() {
        let output: RouterOutput =
            parse_structured(r#"{"query_type": "general_handbook_query"}"#).unwrap();

        let decision = RouterDecision::try_from(output).unwrap();
        assert_eq!(decision, RouterDecision::general_handbook());
    }

    #[test]
    fn test_null_subjects_treated_as_empty() {
        let output: RouterOutput =
            parse_structured(r#"{"query_type": "subject_content", "subjects": null}"#).unwrap();

        assert!(RouterDecision::try_from(output).unwrap().subjects.is_empty());
    }

    #[test]
    fn test_unknown_query_type_is_routing_error() {
        let output: RouterOutput =
            parse_structured(r#"{"query_type": "weather", "subjects": []}"#).unwrap();

        let err = RouterDecision::try_from(output).unwrap_err();
        assert!(matches!(err, AppError::Routing(msg) if msg.contains("weather")));
    }

    #[test]
    fn test_schema_lists_both_labels() {
        let schema = RouterOutput::schema();
        let labels = schema["properties"]["query_type"]["enum"].as_array().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(schema["required"][0], "query_type");
    }

    #[test]
    fn test_query_type_serializes_as_label() {
        let json = serde_json::to_value(RouterDecision::subject_content(["x"])).unwrap();
        assert_eq!(json["query_type"], "subject_content");
        assert_eq!(json["subjects"][0], "x");
    }
}
