//! Prompt templating for AI quiz generation.

use crate::model::QuestionType;

const DEFAULT_OPTION_COUNT: u32 = 4;

/// Authoring-form settings driving a generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub question_count: Option<u32>,
    pub option_count: Option<u32>,
    pub topic: String,
    pub question_types: Vec<QuestionType>,
    pub language: String,
    pub include_explanations: bool,
    pub difficulty: String,
}

fn readable_language(tag: &str) -> &str {
    match tag {
        "pt-BR" => "Brazilian Portuguese",
        "en" | "en-US" => "English",
        other => other,
    }
}

/// Render the generation prompt for the given settings.
pub fn build_prompt(settings: &GeneratorSettings) -> String {
    let question_count = settings.question_count.unwrap_or(5);
    let option_count = settings.option_count.unwrap_or(DEFAULT_OPTION_COUNT);
    let has_multiple = settings.question_types.contains(&QuestionType::Multiple);
    let mixed_types = settings.question_types.len() > 1;

    let question_type_text = if mixed_types {
        format!(
            "a mix of multiple-choice questions with {option_count} options and true/false questions"
        )
    } else if has_multiple {
        format!("multiple-choice questions with {option_count} options each")
    } else {
        "true/false questions".to_string()
    };

    let explanations_text = if settings.include_explanations {
        "Please include an explanation for each answer."
    } else {
        "Explanations for the answers are not required."
    };

    let difficulty_text = if settings.difficulty == "varied" {
        "Create questions spanning every difficulty level, from very easy to very hard.".to_string()
    } else {
        format!("The difficulty level must be \"{}\".", settings.difficulty)
    };

    let mixed_types_instruction = if mixed_types {
        "\n\nCreate a mix of both types (multiple choice and true/false).\n\
         Use the \"type\" field on each question to indicate the type:\n\
         - For multiple-choice questions, use: \"type\": \"multiple\"\n\
         - For true/false questions, use: \"type\": \"truefalse\" (these must have exactly 2 options)"
    } else {
        ""
    };

    let example_type = if mixed_types {
        "multiple or truefalse".to_string()
    } else {
        settings
            .question_types
            .first()
            .copied()
            .unwrap_or(QuestionType::TrueFalse)
            .as_str()
            .to_string()
    };

    let mut example_options = String::from(
        "        { \"text\": \"Option 1\", \"isCorrect\": false },\n\
         \x20       { \"text\": \"Option 2\", \"isCorrect\": true }",
    );
    if has_multiple {
        example_options.push_str(",\n        { \"text\": \"Option 3\", \"isCorrect\": false }");
        if option_count > 3 {
            example_options.push_str(",\n        { \"text\": \"Option 4\", \"isCorrect\": false }");
        }
    }

    let example_explanation = if settings.include_explanations {
        ",\n      \"explanation\": \"Explanation for the correct answer here.\""
    } else {
        ""
    };

    let type_field_requirement = if mixed_types {
        "\n5. The \"type\" field is present on every question"
    } else {
        ""
    };

    format!(
        "Create a quiz about \"{topic}\" with {question_count} {question_type_text} in {language}. \
         {difficulty_text} {explanations_text}{mixed_types_instruction}\n\n\
         Please format your response as a JSON object with the following structure:\n\
         {{\n\
         \x20 \"title\": \"Quiz Title\",\n\
         \x20 \"description\": \"Short description of the quiz\",\n\
         \x20 \"questions\": [\n\
         \x20   {{\n\
         \x20     \"text\": \"Question text here?\",\n\
         \x20     \"type\": \"{example_type}\",\n\
         \x20     \"options\": [\n\
         {example_options}\n\
         \x20     ]{example_explanation}\n\
         \x20   }}\n\
         \x20 ]\n\
         }}\n\n\
         Make sure that:\n\
         1. Each question has exactly one correct answer\n\
         2. The content is accurate and educational\n\
         3. The JSON is correctly formatted and valid\n\
         4. True/false questions have exactly 2 options{type_field_requirement}\n\
         6. The questions match the requested difficulty level: \"{difficulty}\"",
        topic = settings.topic,
        language = readable_language(&settings.language),
        difficulty = settings.difficulty,
    )
}
