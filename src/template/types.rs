use serde::{Deserialize, Serialize};

/// How involved the described workflow is; drives the model recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Simple,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarterInputType {
    ShortText,
    LongText,
    FileUpload,
    Dropdown,
    Checkboxes,
}

impl StarterInputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StarterInputType::ShortText => "short_text",
            StarterInputType::LongText => "long_text",
            StarterInputType::FileUpload => "file_upload",
            StarterInputType::Dropdown => "dropdown",
            StarterInputType::Checkboxes => "checkboxes",
        }
    }
}

/// A suggested input field for the generated assistant's start screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterInput {
    #[serde(rename = "type")]
    pub input_type: StarterInputType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub expertise: String,
    pub role: String,
    pub target_audience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub step_number: usize,
    pub description: String,
    pub sub_bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub steps: Vec<WorkflowStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRules {
    pub tone: String,
    pub style: String,
    pub structure: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidelines {
    pub boundaries: Vec<String>,
    pub limitations: Vec<String>,
    pub requirements: Vec<String>,
    pub default_guidelines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMemory {
    pub enabled: bool,
    pub tracking_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub model: String,
    pub knowledge_file_types: Vec<String>,
    pub starter_inputs: Vec<StarterInput>,
    pub app_name: String,
    pub app_description: String,
    pub user_memory: UserMemory,
}

/// The complete synthesized template. Immutable once produced; one per
/// completed interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub background: Background,
    pub workflow: Workflow,
    pub conversation_rules: ConversationRules,
    pub guidelines: Guidelines,
    pub recommendations: Recommendations,
}
