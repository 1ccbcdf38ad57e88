//! Deterministic template synthesis.
//!
//! A pure function of the five confirmed answers: identical answers always
//! produce byte-identical output. Every extraction that finds nothing yields
//! an explicit bracketed placeholder, never a blank field.

use super::catalog::{
    model_best_for, COMPLEX_KEYWORDS, CONVERSATION_STRUCTURE, DEFAULT_GUIDELINES,
    DEFAULT_KNOWLEDGE_FILE, KNOWLEDGE_FILE_KEYWORDS, MODEL_HIGH, MODEL_MEDIUM, MODEL_REASONING,
    MODEL_SIMPLE, SIMPLE_KEYWORDS, STEP_TRANSITIONS, USER_MEMORY_FIELDS,
};
use super::types::{
    Background, Complexity, ConversationRules, Guidelines, Recommendations, StarterInput,
    StarterInputType, Template, UserMemory, Workflow, WorkflowStep,
};

const EXPERTISE_KEYWORDS: &[&str] = &["coach", "advisor", "specialist", "expert", "consultant", "mentor"];

/// Build the structured template from the five answers, in question order:
/// vision, journey, tone, success outcome, boundaries.
pub fn synthesize(answers: &[String; 5]) -> Template {
    let vision = answers[0].as_str();
    let journey = answers[1].as_str();
    let tone = answers[2].as_str();
    let boundaries = answers[4].as_str();

    Template {
        background: build_background(vision),
        workflow: build_workflow(journey),
        conversation_rules: build_conversation_rules(tone),
        guidelines: build_guidelines(boundaries),
        recommendations: build_recommendations(vision, journey, boundaries),
    }
}

fn build_background(vision: &str) -> Background {
    let expertise = extract_expertise(vision);
    let role = vision.trim();

    Background {
        expertise: or_placeholder(&expertise, "**[Specify expertise area]**"),
        role: or_placeholder(role, "**[Specify role/title]**"),
        target_audience: extract_audience(vision),
    }
}

/// A short noun phrase around the first role keyword found, else the first
/// 100 characters of the answer.
fn extract_expertise(answer: &str) -> String {
    let words: Vec<&str> = answer.split(' ').collect();

    for keyword in EXPERTISE_KEYWORDS {
        if let Some(index) = words
            .iter()
            .position(|w| w.to_lowercase().contains(keyword))
        {
            let start = index.saturating_sub(2);
            return words[start..=index].join(" ");
        }
    }

    answer.chars().take(100).collect()
}

fn extract_audience(answer: &str) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return "**[Specify your target audience]**".to_string();
    }

    if trimmed.split(' ').count() < 3 {
        return format!("{} **[Add more context about their needs/situation]**", trimmed);
    }

    trimmed.to_string()
}

fn build_workflow(journey: &str) -> Workflow {
    let steps: Vec<WorkflowStep> = sentences(journey)
        .into_iter()
        .take(5)
        .enumerate()
        .map(|(i, sentence)| WorkflowStep {
            step_number: i + 1,
            description: sentence,
            sub_bullets: vec!["**[What specific actions are taken in this step?]**".to_string()],
        })
        .collect();

    if steps.is_empty() {
        return Workflow {
            steps: vec![WorkflowStep {
                step_number: 1,
                description: "**[What is the first step users take?]**".to_string(),
                sub_bullets: vec!["**[What information do you need to gather?]**".to_string()],
            }],
        };
    }

    Workflow { steps }
}

fn build_conversation_rules(tone_answer: &str) -> ConversationRules {
    let lower = tone_answer.to_lowercase();

    let tone_table: &[(&str, &[&str])] = &[
        ("Formal", &["formal", "professional", "official"]),
        ("Friendly", &["friendly", "warm", "approachable"]),
        ("Encouraging", &["encouraging", "supportive", "positive"]),
        ("Direct", &["direct", "straightforward", "concise"]),
    ];

    let tone = tone_table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "Professional and supportive".to_string());

    let style = if lower.contains("question") || lower.contains("ask") {
        "Question-driven dialogue"
    } else if lower.contains("answer") || lower.contains("provide") {
        "Direct answer-driven"
    } else if lower.contains("conversation") || lower.contains("chat") {
        "Conversational"
    } else {
        "Balanced question and answer approach"
    };

    ConversationRules {
        tone,
        style: style.to_string(),
        structure: CONVERSATION_STRUCTURE.iter().map(|s| s.to_string()).collect(),
    }
}

fn build_guidelines(boundaries_answer: &str) -> Guidelines {
    let negation_markers = ["not", "avoid", "don't"];
    let obligation_markers = ["must", "require", "only"];

    let boundaries = matching_sentences(boundaries_answer, &negation_markers);
    let requirements = matching_sentences(boundaries_answer, &obligation_markers);

    Guidelines {
        boundaries: or_placeholder_list(boundaries, "**[What topics should be avoided?]**"),
        limitations: or_placeholder_list(Vec::new(), "**[What are the limitations of this assistant?]**"),
        requirements: or_placeholder_list(requirements, "**[What specific requirements must be met?]**"),
        default_guidelines: DEFAULT_GUIDELINES.iter().map(|s| s.to_string()).collect(),
    }
}

fn build_recommendations(vision: &str, journey: &str, boundaries: &str) -> Recommendations {
    let complexity = classify_complexity(journey);
    let model = recommend_model(complexity, vision);
    let knowledge_file_types = recommend_knowledge_files(boundaries);
    let starter_inputs = recommend_starter_inputs(journey);

    let role = vision.trim();
    let app_name = if role.is_empty() {
        "Custom AI Assistant".to_string()
    } else {
        role.replace("**", "").trim().to_string()
    };

    Recommendations {
        model,
        knowledge_file_types,
        starter_inputs,
        app_name,
        app_description: app_description(vision, journey),
        user_memory: UserMemory {
            enabled: true,
            tracking_fields: USER_MEMORY_FIELDS.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn classify_complexity(journey: &str) -> Complexity {
    let lower = journey.to_lowercase();

    let has_complex_keywords = COMPLEX_KEYWORDS.iter().any(|k| lower.contains(k));
    let has_multiple_steps = split_on_markers(&lower, STEP_TRANSITIONS) > 4;

    if has_complex_keywords || has_multiple_steps {
        return Complexity::High;
    }

    let has_simple_keywords = SIMPLE_KEYWORDS.iter().any(|k| lower.contains(k));
    let is_brief = lower.split(' ').count() < 30;

    if has_simple_keywords && is_brief {
        return Complexity::Simple;
    }

    Complexity::Medium
}

fn recommend_model(complexity: Complexity, vision: &str) -> String {
    let lower = vision.to_lowercase();
    let needs_reasoning =
        lower.contains("math") || lower.contains("problem") || lower.contains("analysis");

    if needs_reasoning {
        return MODEL_REASONING.to_string();
    }

    match complexity {
        Complexity::High => MODEL_HIGH.to_string(),
        Complexity::Medium => MODEL_MEDIUM.to_string(),
        Complexity::Simple => MODEL_SIMPLE.to_string(),
    }
}

fn recommend_knowledge_files(boundaries: &str) -> Vec<String> {
    let lower = boundaries.to_lowercase();
    let mut recommendations = Vec::new();

    for (label, keywords) in KNOWLEDGE_FILE_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) && !recommendations.contains(&label.to_string())
        {
            recommendations.push(label.to_string());
        }
    }

    if recommendations.is_empty() {
        recommendations.push(DEFAULT_KNOWLEDGE_FILE.to_string());
    }

    recommendations
}

fn recommend_starter_inputs(journey: &str) -> Vec<StarterInput> {
    let lower = journey.to_lowercase();
    let mut inputs = Vec::new();

    if lower.contains("grade") || lower.contains("level") {
        inputs.push(StarterInput {
            input_type: StarterInputType::Dropdown,
            label: "Grade Level".to_string(),
            placeholder: None,
            options: Some(
                ["K", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            required: true,
        });
    }

    if lower.contains("subject") || lower.contains("topic") {
        inputs.push(StarterInput {
            input_type: StarterInputType::Dropdown,
            label: "Subject Area".to_string(),
            placeholder: None,
            options: Some(
                ["English/Language Arts", "Mathematics", "Science", "Social Studies", "Other"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            required: true,
        });
    }

    if lower.contains("upload") || lower.contains("document") || lower.contains("file") {
        inputs.push(StarterInput {
            input_type: StarterInputType::FileUpload,
            label: "Upload Document".to_string(),
            placeholder: None,
            options: None,
            required: false,
        });
    }

    if lower.contains("describe") || lower.contains("explain") || lower.contains("detail") {
        inputs.push(StarterInput {
            input_type: StarterInputType::LongText,
            label: "Description".to_string(),
            placeholder: Some("Provide details...".to_string()),
            options: None,
            required: true,
        });
    }

    if inputs.is_empty() {
        inputs.push(StarterInput {
            input_type: StarterInputType::LongText,
            label: "Your Request".to_string(),
            placeholder: Some("Describe what you need help with...".to_string()),
            options: None,
            required: true,
        });
    }

    inputs
}

fn app_description(vision: &str, journey: &str) -> String {
    let role = vision.trim();
    let clean_role = if role.is_empty() {
        "assistant".to_string()
    } else {
        role.replace("**", "").trim().to_lowercase()
    };

    let first_sentence = journey
        .split(['.', '!', '?'])
        .next()
        .unwrap_or("")
        .to_lowercase();

    format!("An AI-powered {} that helps you {}.", clean_role, first_sentence)
}

/// Render the structured template in the fixed markdown section order.
pub fn render_markdown(template: &Template) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", template.recommendations.app_name));
    md.push_str(&format!("{}\n\n", template.recommendations.app_description));
    md.push_str("---\n\n");

    md.push_str("## Background\n\n");
    md.push_str(&format!("**Expertise:** {}\n\n", template.background.expertise));
    md.push_str(&format!("**Role:** {}\n\n", template.background.role));
    md.push_str(&format!("**Target Audience:** {}\n\n", template.background.target_audience));
    md.push_str("---\n\n");

    md.push_str("## Workflow\n\n");
    for step in &template.workflow.steps {
        md.push_str(&format!("### Step {}: {}\n\n", step.step_number, step.description));
        for bullet in &step.sub_bullets {
            md.push_str(&format!("- {}\n", bullet));
        }
        md.push('\n');
    }
    md.push_str("---\n\n");

    md.push_str("## Formatting and Conversation Rules\n\n");
    md.push_str(&format!("**Tone:** {}\n\n", template.conversation_rules.tone));
    md.push_str(&format!("**Style:** {}\n\n", template.conversation_rules.style));
    md.push_str("**Structure Guidelines:**\n");
    for rule in &template.conversation_rules.structure {
        md.push_str(&format!("- {}\n", rule));
    }
    md.push_str("\n---\n\n");

    md.push_str("## Guidelines & Guardrails\n\n");
    md.push_str("### Default Guidelines\n");
    for guideline in &template.guidelines.default_guidelines {
        md.push_str(&format!("- {}\n", guideline));
    }
    md.push_str("\n### Boundaries\n");
    for boundary in &template.guidelines.boundaries {
        md.push_str(&format!("- {}\n", boundary));
    }
    if !template.guidelines.limitations.is_empty() {
        md.push_str("\n### Limitations\n");
        for limitation in &template.guidelines.limitations {
            md.push_str(&format!("- {}\n", limitation));
        }
    }
    if !template.guidelines.requirements.is_empty() {
        md.push_str("\n### Requirements\n");
        for requirement in &template.guidelines.requirements {
            md.push_str(&format!("- {}\n", requirement));
        }
    }
    md.push_str("\n---\n\n");

    md.push_str("## Recommended Model\n\n");
    md.push_str(&format!("**{}**\n\n", template.recommendations.model));
    if let Some(best_for) = model_best_for(&template.recommendations.model) {
        md.push_str(&format!("*Best for: {}*\n\n", best_for.join(", ")));
    }
    md.push_str("---\n\n");

    md.push_str("## Recommended Knowledge Files\n\n");
    for file_type in &template.recommendations.knowledge_file_types {
        md.push_str(&format!("- {}\n", file_type));
    }
    md.push_str("\n---\n\n");

    md.push_str("## Recommended Starter Inputs\n\n");
    for (i, input) in template.recommendations.starter_inputs.iter().enumerate() {
        md.push_str(&format!(
            "### {}. {} ({})\n",
            i + 1,
            input.label,
            input.input_type.as_str()
        ));
        if let Some(placeholder) = &input.placeholder {
            md.push_str(&format!("- Placeholder: \"{}\"\n", placeholder));
        }
        if let Some(options) = &input.options {
            md.push_str(&format!("- Options: {}\n", options.join(", ")));
        }
        md.push_str(&format!(
            "- Required: {}\n\n",
            if input.required { "Yes" } else { "No" }
        ));
    }
    md.push_str("---\n\n");

    md.push_str("## Recommended User Memory\n\n");
    md.push_str("**Track between sessions:**\n");
    for field in &template.recommendations.user_memory.tracking_fields {
        md.push_str(&format!("- {}\n", field));
    }
    md.push_str("\n---\n\n");
    md.push_str("*Generated by Voice Builder for Playlab.ai*\n");

    md
}

/// Non-empty trimmed sentences, split on sentence-ending punctuation.
fn sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sentences containing at least one of the markers (case-insensitive).
fn matching_sentences(text: &str, markers: &[&str]) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| {
            let lower = s.to_lowercase();
            !s.is_empty() && markers.iter().any(|m| lower.contains(m))
        })
        .map(str::to_string)
        .collect()
}

/// Number of segments produced by splitting on any of the markers,
/// scanning left to right.
fn split_on_markers(text: &str, markers: &[&str]) -> usize {
    let mut segments = 1;
    let mut rest = text;

    loop {
        let next = markers
            .iter()
            .filter_map(|m| rest.find(m).map(|pos| (pos, m.len())))
            .min();

        match next {
            Some((pos, len)) => {
                segments += 1;
                rest = &rest[pos + len..];
            }
            None => return segments,
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn or_placeholder_list(values: Vec<String>, placeholder: &str) -> Vec<String> {
    if values.is_empty() {
        vec![placeholder.to_string()]
    } else {
        values
    }
}
