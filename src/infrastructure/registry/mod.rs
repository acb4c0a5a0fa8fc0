mod catalog;

pub use catalog::CatalogRegistry;

use crate::domain::question::{QuestionTypeDefinition, Skill, TestModule};

/// Source of truth for which question types a module/skill accepts
pub trait QuestionTypeRegistry: Send + Sync {
    /// Type definitions offered for a module and skill, in display order
    fn definitions(&self, module: TestModule, skill: Skill) -> Vec<QuestionTypeDefinition>;

    /// Map a free-text label to a canonical type. Unknown labels come back unchanged.
    fn map_free_text_to_canonical(&self, raw_label: &str) -> String;

    fn list_valid_types(&self, module: TestModule, skill: Skill) -> Vec<String> {
        self.definitions(module, skill)
            .into_iter()
            .map(|definition| definition.value)
            .collect()
    }

    fn is_type_valid_for_skill(&self, canonical: &str, module: TestModule, skill: Skill) -> bool {
        self.list_valid_types(module, skill)
            .iter()
            .any(|value| value == canonical)
    }
}
