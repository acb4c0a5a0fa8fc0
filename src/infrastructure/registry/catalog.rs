//! Built-in question type catalog.
//!
//! Holds the official IELTS question types per skill and the table of common spellings
//! operators use in spreadsheets ("T/F/NG", "Map labelling", "Cue Card", ...). Every test
//! module currently shares the same catalog.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::QuestionTypeRegistry;
use crate::domain::question::{QuestionTypeDefinition, Skill, TestModule};

type Entry = (&'static str, &'static str, &'static str);

const READING_TYPES: &[Entry] = &[
    ("Matching Headings", "Read paragraphs and choose best topic from a list of headings", "Understand main vs supporting ideas; read the list of headings first; answers are often numbers"),
    ("Matching Paragraph Information", "Choose statements that fit specific paragraph content", "Use keywords and paraphrasing; answers are not necessarily consecutive"),
    ("Matching Features", "Match facts, ideas, or opinions (e.g., researcher to discovery)", "Focus on specifics, synonyms, and keywords"),
    ("Matching Sentence Endings", "Match incomplete sentences to appropriate ending alternatives", "Practice grammar like subject-verb agreement and tenses"),
    ("True/False/Not Given", "Verify statements against passage content", "True if matches passage, False if contradicts, Not Given if not mentioned"),
    ("Yes/No/Not Given", "Evaluate views, claims, or opinions in the passage", "Yes if matches author's view, No if contradicts, Not Given if not mentioned"),
    ("Multiple Choice", "Choose the correct answer from multiple options", "Understand main ideas and specific information; use skimming and elimination"),
    ("List of Options", "Select multiple answers from a list (e.g., 'Which THREE?')", "Similar to multiple choice but requires selecting several correct options"),
    ("Choose a Title", "Select the most appropriate title for the passage", "Understand main ideas vs supporting details and overall purpose"),
    ("Short-answer Questions", "Answer questions with specific information from the passage", "Questions usually follow the order of information in the passage"),
    ("Sentence Completion", "Complete sentences using words from the passage", "Use paraphrasing and look for synonyms"),
    ("Summary Completion", "Complete a summary of part of the passage", "Identify parts of speech and grammatical requirements"),
    ("Table Completion", "Fill in missing information in a table format", "Follow the logical flow of information in the table structure"),
    ("Flow Chart Completion", "Fill in missing steps or information in a flow chart", "Understand the sequence and logical progression"),
    ("Diagram Label Completion", "Fill in labels or parts of diagrams", "Use synonyms and paraphrases; focus on technical or descriptive vocabulary"),
];

const LISTENING_TYPES: &[Entry] = &[
    ("Multiple Choice", "Choose the correct answer from options while listening", "Listen for specific information and main ideas"),
    ("Matching", "Match items from two lists", "Listen for relationships between different pieces of information"),
    ("Plan/Map/Diagram Labelling", "Label parts of a visual representation", "Follow directions and spatial relationships described in audio"),
    ("Form Completion", "Fill in missing information on a form", "Listen for specific details like names, numbers, dates"),
    ("Note Completion", "Complete notes with missing information", "Focus on key points and main ideas"),
    ("Table Completion", "Fill in missing information in table format", "Follow the structure and categories in the table"),
    ("Flow-chart Completion", "Complete steps in a process or sequence", "Listen for sequence markers and logical progression"),
    ("Summary Completion", "Complete a summary of the listening passage", "Focus on main ideas and overall content"),
    ("Sentence Completion", "Complete sentences with information from audio", "Pay attention to grammar and word limits"),
    ("Short-answer Questions", "Answer questions with brief responses", "Listen for specific factual information"),
];

const WRITING_TYPES: &[Entry] = &[
    ("Task 1 - Graph Description", "Describe data presented in graphs, charts, or tables", "Focus on trends, comparisons, and key features"),
    ("Task 1 - Map Description", "Describe changes shown in maps over time", "Describe locations, changes, and spatial relationships"),
    ("Task 1 - Process Description", "Describe how something works or is made", "Use sequence words and passive voice appropriately"),
    ("Task 2 - Essay", "Write an essay responding to a question or statement", "Present clear arguments with examples and logical structure"),
];

const SPEAKING_TYPES: &[Entry] = &[
    ("Part 1 - Introduction and Interview", "Answer questions about yourself and familiar topics", "Give personal responses with some detail and examples"),
    ("Part 2 - Long Turn (Cue Card)", "Speak for 1-2 minutes on a given topic using cue card", "Use the preparation time to plan and cover all points on the card"),
    ("Part 3 - Discussion", "Discuss abstract topics related to Part 2 theme", "Give detailed answers with explanations, examples, and analysis"),
];

/// Common spellings found in operator spreadsheets
const ALIASES: &[(&str, &str)] = &[
    // Reading
    ("True False Not Given", "True/False/Not Given"),
    ("True False Not Given or Yes No Not Given", "True/False/Not Given"),
    ("TF/NG", "True/False/Not Given"),
    ("T/F/NG", "True/False/Not Given"),
    ("Yes No Not Given", "Yes/No/Not Given"),
    ("Y/N/NG", "Yes/No/Not Given"),
    ("Multiple choice (reading)", "Multiple Choice"),
    ("Short answer", "Short-answer Questions"),
    ("Completion Diagrams", "Diagram Label Completion"),
    ("Diagram completion", "Diagram Label Completion"),
    ("Flow chart", "Flow Chart Completion"),
    ("Flowchart", "Flow Chart Completion"),
    ("Table completion (reading)", "Table Completion"),
    ("Summary completion (reading)", "Summary Completion"),
    ("Sentence completion (reading)", "Sentence Completion"),
    ("Matching headings", "Matching Headings"),
    ("Matching features", "Matching Features"),
    // Listening
    ("Multiple choice (listening)", "Multiple Choice"),
    ("Plan labelling", "Plan/Map/Diagram Labelling"),
    ("Map labelling", "Plan/Map/Diagram Labelling"),
    ("Diagram labelling", "Plan/Map/Diagram Labelling"),
    ("Form completion", "Form Completion"),
    ("Note completion", "Note Completion"),
    ("Table completion (listening)", "Table Completion"),
    ("Summary completion (listening)", "Summary Completion"),
    ("Sentence completion (listening)", "Sentence Completion"),
    ("Short answer (listening)", "Short-answer Questions"),
    // Writing
    ("Task 1 Graph", "Task 1 - Graph Description"),
    ("Task 1 Map", "Task 1 - Map Description"),
    ("Task 1 Process", "Task 1 - Process Description"),
    ("Task 2 Essay", "Task 2 - Essay"),
    ("Essay", "Task 2 - Essay"),
    // Speaking
    ("Part 1", "Part 1 - Introduction and Interview"),
    ("Part 2", "Part 2 - Long Turn (Cue Card)"),
    ("Part 3", "Part 3 - Discussion"),
    ("Cue Card", "Part 2 - Long Turn (Cue Card)"),
];

static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

fn entries_for(skill: Skill) -> &'static [Entry] {
    match skill {
        Skill::Reading => READING_TYPES,
        Skill::Listening => LISTENING_TYPES,
        Skill::Writing => WRITING_TYPES,
        Skill::Speaking => SPEAKING_TYPES,
    }
}

fn normalize_label(label: &str) -> String {
    WHITESPACE_PATTERN
        .replace_all(label.trim(), " ")
        .to_lowercase()
}

/// Registry backed by the built-in catalog plus optional extra aliases
pub struct CatalogRegistry {
    /// Exact label -> canonical type
    exact: HashMap<String, String>,
    /// Lower-cased, whitespace-collapsed label -> canonical type
    normalized: HashMap<String, String>,
}

impl Default for CatalogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self::with_aliases(&HashMap::new())
    }

    /// Catalog with operator-defined aliases layered over the built-in ones
    pub fn with_aliases(extra_aliases: &HashMap<String, String>) -> Self {
        let mut exact = HashMap::new();
        let mut normalized = HashMap::new();

        // first registration wins: canonical names, then built-in aliases, then extras
        let mut register = |label: &str, value: &str| {
            exact
                .entry(label.to_string())
                .or_insert_with(|| value.to_string());
            normalized
                .entry(normalize_label(label))
                .or_insert_with(|| value.to_string());
        };
        for skill in Skill::ALL {
            for (value, _, _) in entries_for(skill) {
                register(*value, *value);
            }
        }
        for (label, value) in ALIASES {
            register(*label, *value);
        }
        for (label, value) in extra_aliases {
            register(label.as_str(), value.as_str());
        }

        Self { exact, normalized }
    }
}

impl QuestionTypeRegistry for CatalogRegistry {
    fn definitions(&self, _module: TestModule, skill: Skill) -> Vec<QuestionTypeDefinition> {
        entries_for(skill)
            .iter()
            .map(|(value, description, tips)| QuestionTypeDefinition::new(value, description, tips))
            .collect()
    }

    fn map_free_text_to_canonical(&self, raw_label: &str) -> String {
        if let Some(value) = self.exact.get(raw_label) {
            return value.clone();
        }
        if let Some(value) = self.normalized.get(&normalize_label(raw_label)) {
            return value.clone();
        }
        raw_label.to_string()
    }
}
