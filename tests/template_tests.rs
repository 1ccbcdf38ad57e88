// Integration tests for deterministic template synthesis.
//
// The synthesizer is a pure function of the five confirmed answers, so these
// tests assert on exact extractions and on the rendered markdown shape.

use voice_builder::template::{render_markdown, synthesize, StarterInputType};

fn answers(
    vision: &str,
    journey: &str,
    tone: &str,
    outcome: &str,
    boundaries: &str,
) -> [String; 5] {
    [
        vision.to_string(),
        journey.to_string(),
        tone.to_string(),
        outcome.to_string(),
        boundaries.to_string(),
    ]
}

fn full_answers() -> [String; 5] {
    answers(
        "A certified financial advisor for young families",
        "Users describe their budget. Then I analyze their spending. Finally I suggest a savings plan.",
        "Friendly and warm, but keep it concrete",
        "They leave with a monthly plan they actually follow",
        "Don't give investment advice. Avoid specific stock picks. You must cite your sources.",
    )
}

#[test]
fn test_identical_answers_produce_identical_output() {
    let a = render_markdown(&synthesize(&full_answers()));
    let b = render_markdown(&synthesize(&full_answers()));
    assert_eq!(a, b, "synthesis must be byte-identical for identical input");
}

#[test]
fn test_empty_answers_yield_bracketed_placeholders() {
    let template = synthesize(&answers("", "", "", "", ""));

    assert_eq!(template.background.expertise, "**[Specify expertise area]**");
    assert_eq!(template.background.role, "**[Specify role/title]**");
    assert_eq!(
        template.background.target_audience,
        "**[Specify your target audience]**"
    );

    assert_eq!(template.workflow.steps.len(), 1);
    assert_eq!(
        template.workflow.steps[0].description,
        "**[What is the first step users take?]**"
    );

    assert_eq!(
        template.guidelines.boundaries,
        vec!["**[What topics should be avoided?]**".to_string()]
    );
    assert_eq!(
        template.guidelines.requirements,
        vec!["**[What specific requirements must be met?]**".to_string()]
    );

    assert_eq!(template.recommendations.app_name, "Custom AI Assistant");
}

#[test]
fn test_default_guidelines_always_present_verbatim() {
    let expected = [
        "Avoid language that might seem judgmental or dismissive.",
        "Be inclusive in your examples and explanations, consider multiple perspectives, and avoid stereotypes.",
        "Provide clear and concise responses.",
        "If off-topic, prompt users to return to the main subject.",
    ];

    for template in [
        synthesize(&full_answers()),
        synthesize(&answers("", "", "", "", "")),
    ] {
        assert_eq!(template.guidelines.default_guidelines, expected);
        let markdown = render_markdown(&template);
        for guideline in &expected {
            assert!(
                markdown.contains(guideline),
                "rendered output must carry: {}",
                guideline
            );
        }
    }
}

#[test]
fn test_expertise_extracted_around_role_keyword() {
    let template = synthesize(&full_answers());
    assert_eq!(template.background.expertise, "certified financial advisor");
}

#[test]
fn test_short_vision_prompts_for_more_audience_context() {
    let template = synthesize(&answers("Math tutor", "", "", "", ""));
    assert_eq!(
        template.background.target_audience,
        "Math tutor **[Add more context about their needs/situation]**"
    );
}

#[test]
fn test_workflow_steps_from_sentences_capped_at_five() {
    let template = synthesize(&full_answers());
    let steps = &template.workflow.steps;
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].step_number, 1);
    assert_eq!(steps[0].description, "Users describe their budget");
    assert_eq!(steps[2].description, "Finally I suggest a savings plan");

    let long_journey = "One. Two. Three. Four. Five. Six. Seven.";
    let template = synthesize(&answers("", long_journey, "", "", ""));
    assert_eq!(template.workflow.steps.len(), 5, "workflow is capped at five steps");
}

#[test]
fn test_tone_and_style_keyword_extraction() {
    let template = synthesize(&full_answers());
    assert_eq!(template.conversation_rules.tone, "Friendly");
    assert_eq!(
        template.conversation_rules.style,
        "Balanced question and answer approach"
    );

    let template = synthesize(&answers("", "", "It should ask questions one at a time", "", ""));
    assert_eq!(template.conversation_rules.tone, "Professional and supportive");
    assert_eq!(template.conversation_rules.style, "Question-driven dialogue");

    let template = synthesize(&answers("", "", "Be direct and concise", "", ""));
    assert_eq!(template.conversation_rules.tone, "Direct");
}

#[test]
fn test_boundaries_and_requirements_from_marker_sentences() {
    let template = synthesize(&full_answers());

    assert_eq!(
        template.guidelines.boundaries,
        vec![
            "Don't give investment advice".to_string(),
            "Avoid specific stock picks".to_string(),
        ]
    );
    assert_eq!(
        template.guidelines.requirements,
        vec!["You must cite your sources".to_string()]
    );
}

#[test]
fn test_complexity_drives_model_recommendation() {
    // "analyze" marks the journey as complex
    let template = synthesize(&full_answers());
    assert_eq!(template.recommendations.model, "Claude 4 Opus");

    // short journey with a simple keyword
    let template = synthesize(&answers("A helper", "Generate a quick summary", "", "", ""));
    assert_eq!(template.recommendations.model, "Claude 3.5 Haiku");

    // nothing notable either way
    let template = synthesize(&answers("A helper", "Users talk through their day", "", "", ""));
    assert_eq!(template.recommendations.model, "Claude 3.7 Sonnet");
}

#[test]
fn test_many_step_transitions_mean_high_complexity() {
    let journey = "They sign up, then pick a goal, then log meals, then review charts, then share results";
    let template = synthesize(&answers("A helper", journey, "", "", ""));
    assert_eq!(template.recommendations.model, "Claude 4 Opus");
}

#[test]
fn test_reasoning_override_beats_complexity() {
    let template = synthesize(&answers(
        "A math problem coach",
        "Generate a quick worksheet",
        "",
        "",
        "",
    ));
    assert_eq!(template.recommendations.model, "Claude 4 Sonnet (Reasoning)");
}

#[test]
fn test_knowledge_files_from_boundary_keywords() {
    let template = synthesize(&answers(
        "",
        "",
        "",
        "",
        "Stay within the district curriculum and use student grades only for context",
    ));
    assert_eq!(
        template.recommendations.knowledge_file_types,
        vec!["PDF documents".to_string(), "CSV/Excel files".to_string()]
    );

    let template = synthesize(&answers("", "", "", "", ""));
    assert_eq!(
        template.recommendations.knowledge_file_types,
        vec!["PDF documents (general reference materials)".to_string()]
    );
}

#[test]
fn test_starter_inputs_from_journey_keywords() {
    let journey = "Pick a grade and subject, upload a document, and describe the assignment";
    let template = synthesize(&answers("", journey, "", "", ""));
    let inputs = &template.recommendations.starter_inputs;

    assert_eq!(inputs.len(), 4);
    assert_eq!(inputs[0].label, "Grade Level");
    assert_eq!(inputs[0].input_type, StarterInputType::Dropdown);
    assert_eq!(inputs[0].options.as_ref().map(|o| o.len()), Some(13));
    assert_eq!(inputs[1].label, "Subject Area");
    assert_eq!(inputs[2].input_type, StarterInputType::FileUpload);
    assert!(!inputs[2].required);
    assert_eq!(inputs[3].label, "Description");
    assert_eq!(inputs[3].input_type, StarterInputType::LongText);
}

#[test]
fn test_default_starter_input_when_nothing_matches() {
    let template = synthesize(&answers("", "Users talk about their week", "", "", ""));
    let inputs = &template.recommendations.starter_inputs;

    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].label, "Your Request");
    assert_eq!(inputs[0].input_type, StarterInputType::LongText);
    assert!(inputs[0].required);
}

#[test]
fn test_app_name_and_description_from_vision_and_journey() {
    let template = synthesize(&full_answers());
    assert_eq!(
        template.recommendations.app_name,
        "A certified financial advisor for young families"
    );
    assert_eq!(
        template.recommendations.app_description,
        "An AI-powered a certified financial advisor for young families that helps you users describe their budget."
    );
}

#[test]
fn test_user_memory_fields_are_fixed() {
    let template = synthesize(&full_answers());
    assert!(template.recommendations.user_memory.enabled);
    assert_eq!(template.recommendations.user_memory.tracking_fields.len(), 5);
}

#[test]
fn test_rendered_sections_in_fixed_order() {
    let markdown = render_markdown(&synthesize(&full_answers()));

    let sections = [
        "## Background",
        "## Workflow",
        "## Formatting and Conversation Rules",
        "## Guidelines & Guardrails",
        "## Recommended Model",
        "## Recommended Knowledge Files",
        "## Recommended Starter Inputs",
        "## Recommended User Memory",
    ];

    let mut last_pos = 0;
    for section in sections {
        let pos = markdown
            .find(section)
            .unwrap_or_else(|| panic!("missing section: {}", section));
        assert!(pos > last_pos, "section out of order: {}", section);
        last_pos = pos;
    }

    assert!(markdown.ends_with("*Generated by Voice Builder for Playlab.ai*\n"));
}

#[test]
fn test_template_serializes_with_camel_case_fields() {
    let template = synthesize(&full_answers());
    let json = serde_json::to_value(&template).unwrap();

    assert!(json["background"]["targetAudience"].is_string());
    assert!(json["conversationRules"]["structure"].is_array());
    assert!(json["guidelines"]["defaultGuidelines"].is_array());
    assert_eq!(
        json["recommendations"]["starterInputs"][0]["type"],
        serde_json::json!("long_text")
    );
    assert!(json["recommendations"]["userMemory"]["trackingFields"].is_array());
}
