// ============================================================
// TEMPLATE WRITER
// ============================================================
// Sample spreadsheets operators download and fill in

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::question::Skill;

type SampleRow = [&'static str; 7];

const READING_SAMPLES: &[SampleRow] = &[
    [
        "1",
        "Reading",
        "True/False/Not Given",
        "People had expected Andy Murray to become the world's top tennis player for at least five years before 2016.",
        "TRUE;FALSE;NOT GIVEN",
        "FALSE",
        "The passage states Murray was regarded as an outsider before 2016.",
    ],
    [
        "2",
        "Reading",
        "Sentence Completion",
        "Mike and Bob Bryan made changes to the types of ______ used on their racket frames.",
        "",
        "paint",
        "The passage mentions they experimented with different kinds of paint.",
    ],
    [
        "3",
        "Reading",
        "Multiple Choice",
        "What is the main benefit of racket modifications according to the passage?",
        "A) Increased speed;B) Better control;C) Reduced weight;D) Enhanced power",
        "B",
        "The passage emphasizes control as a key benefit.",
    ],
];

const LISTENING_SAMPLES: &[SampleRow] = &[
    [
        "1",
        "Listening",
        "Multiple Choice",
        "What is the main topic of the conversation?",
        "A) Travel plans;B) Hotel booking;C) Restaurant reservation;D) Meeting schedule",
        "B",
        "The speakers discuss hotel arrangements.",
    ],
    [
        "2",
        "Listening",
        "Form Completion",
        "The caller's name is ______",
        "",
        "Sarah Johnson",
        "As stated by the caller at the beginning.",
    ],
    [
        "3",
        "Listening",
        "Table Completion",
        "Complete the table: Day | Activity | Time",
        "Monday;Meeting;9:00 AM",
        "Monday=Meeting;9:00 AM",
        "Based on the schedule discussion.",
    ],
];

const WRITING_SAMPLES: &[SampleRow] = &[
    [
        "1",
        "Writing",
        "Task 1 - Graph Description",
        "Describe the trends shown in the graph",
        "",
        "The graph shows a steady increase...",
        "Model answer describing key trends.",
    ],
    [
        "2",
        "Writing",
        "Task 2 - Essay",
        "Discuss both views and give your opinion",
        "",
        "While some argue that...",
        "Model essay with balanced arguments.",
    ],
];

const SPEAKING_SAMPLES: &[SampleRow] = &[
    [
        "1",
        "Speaking",
        "Part 1 - Introduction and Interview",
        "What do you do for work or study?",
        "",
        "I work as a software developer...",
        "Sample response with details.",
    ],
    [
        "2",
        "Speaking",
        "Part 2 - Long Turn (Cue Card)",
        "Describe a memorable journey",
        "",
        "I'd like to talk about a trip...",
        "Sample 2-minute response.",
    ],
];

fn samples_for(skill: Skill) -> &'static [SampleRow] {
    match skill {
        Skill::Reading => READING_SAMPLES,
        Skill::Listening => LISTENING_SAMPLES,
        Skill::Writing => WRITING_SAMPLES,
        Skill::Speaking => SPEAKING_SAMPLES,
    }
}

/// File name offered for a skill's template download
pub fn template_file_name(skill: Skill) -> String {
    format!("{}_questions_sample.csv", skill.as_str())
}

/// Write the header row and the sample rows of a skill as CSV text.
///
/// Sample cells follow the standard column order, so `headers` must name the slots in
/// that order as well.
pub fn write_template(headers: &[String], skill: Skill) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .map_err(|e| AppError::Internal(format!("Failed to write template header: {}", e)))?;
    for row in samples_for(skill) {
        writer
            .write_record(row.iter())
            .map_err(|e| AppError::Internal(format!("Failed to write template row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush template: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("Template is not valid UTF-8: {}", e)))
}
