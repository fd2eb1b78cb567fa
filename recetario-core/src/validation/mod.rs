//! Field, step and item validation for recipe drafts.
//!
//! Every field rule has the same shape (`FieldValue -> Option<FieldError>`)
//! and lives in a [`ValidationRules`] registry keyed by [`Field`]. Step and
//! whole-draft validation are lookups over that registry.

mod items;
pub mod rules;

use std::collections::{BTreeMap, HashMap};

use crate::config::FormConfig;
use crate::error::FieldError;
use crate::types::{Field, FieldValue, RecipeDraft};
use crate::wizard::WizardStep;

pub use items::{
    check_ingredient, check_step, limit, INGREDIENT_NAME_MAX_LENGTH, QUANTITY_MAX_LENGTH,
    STEP_DESCRIPTION_MAX_LENGTH, STEP_TIP_MAX_LENGTH, UNIT_MAX_LENGTH,
};

/// Current error per field. Fields without an error are absent.
pub type ValidationState = BTreeMap<Field, FieldError>;

type Rule = Box<dyn for<'a> Fn(FieldValue<'a>) -> Option<FieldError> + Send + Sync>;

/// Registry mapping fields to their validation rule.
pub struct ValidationRules {
    rules: HashMap<Field, Rule>,
}

impl ValidationRules {
    /// Create a registry with no rules.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// The standard recipe rules.
    pub fn standard(config: &FormConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Field::Name, rules::name);
        registry.register(Field::Description, rules::description);
        registry.register(Field::PrepTime, rules::prep_time);
        registry.register(Field::Servings, rules::servings);
        registry.register(Field::Difficulty, rules::difficulty);
        registry.register(Field::Calories, rules::calories);
        if config.strict_image_urls {
            registry.register(Field::MainImageUrl, rules::strict_image_url);
        } else {
            registry.register(Field::MainImageUrl, rules::image_url);
        }
        registry.register(Field::Tags, rules::tags);
        registry.register(Field::Ingredients, rules::non_empty_list);
        registry.register(Field::Steps, rules::non_empty_list);
        registry
    }

    /// Register (or replace) the rule for a field.
    pub fn register<F>(&mut self, field: Field, rule: F)
    where
        F: for<'a> Fn(FieldValue<'a>) -> Option<FieldError> + Send + Sync + 'static,
    {
        self.rules.insert(field, Box::new(rule));
    }

    /// Validate one value. Fields without a rule always pass.
    pub fn validate(&self, field: Field, value: FieldValue<'_>) -> Option<FieldError> {
        self.rules.get(&field).and_then(|rule| rule(value))
    }

    /// Whether a rule is registered for `field`.
    pub fn has_rule(&self, field: Field) -> bool {
        self.rules.contains_key(&field)
    }

    /// Validate the given fields of a draft.
    pub fn validate_fields(&self, draft: &RecipeDraft, fields: &[Field]) -> ValidationState {
        fields
            .iter()
            .filter_map(|&field| {
                self.validate(field, draft.value(field))
                    .map(|error| (field, error))
            })
            .collect()
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::standard(&FormConfig::default())
    }
}

/// Validate the fields that belong to one wizard step.
pub fn validate_step(
    step: WizardStep,
    draft: &RecipeDraft,
    rules: &ValidationRules,
) -> ValidationState {
    rules.validate_fields(draft, step.fields())
}

/// Validate every field that has a registered rule.
pub fn validate_draft(draft: &RecipeDraft, rules: &ValidationRules) -> ValidationState {
    let fields: Vec<Field> = Field::ALL
        .iter()
        .copied()
        .filter(|f| rules.has_rule(*f))
        .collect();
    rules.validate_fields(draft, &fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewIngredient;

    fn basic_info() -> RecipeDraft {
        RecipeDraft {
            name: "Tomato Soup".to_string(),
            prep_time: "20".to_string(),
            servings: "4".to_string(),
            difficulty: Some(3),
            ..RecipeDraft::default()
        }
    }

    #[test]
    fn basic_info_step_passes_with_required_fields_only() {
        let rules = ValidationRules::default();
        assert!(validate_step(WizardStep::BasicInfo, &basic_info(), &rules).is_empty());
    }

    #[test]
    fn basic_info_step_reports_each_missing_field() {
        let rules = ValidationRules::default();
        let errors = validate_step(WizardStep::BasicInfo, &RecipeDraft::default(), &rules);
        let fields: Vec<Field> = errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![
                Field::Name,
                Field::PrepTime,
                Field::Servings,
                Field::Difficulty
            ]
        );
    }

    #[test]
    fn optional_fields_never_block_when_blank() {
        let rules = ValidationRules::default();
        let mut draft = basic_info();
        draft.calories = String::new();
        draft.main_image_url = String::new();
        assert!(validate_step(WizardStep::BasicInfo, &draft, &rules).is_empty());

        draft.main_image_url = "not a url".to_string();
        let errors = validate_step(WizardStep::BasicInfo, &draft, &rules);
        assert_eq!(errors.get(&Field::MainImageUrl), Some(&FieldError::InvalidUrl));
    }

    #[test]
    fn ingredients_step_requires_one_ingredient() {
        let rules = ValidationRules::default();
        let mut draft = basic_info();
        let errors = validate_step(WizardStep::Ingredients, &draft, &rules);
        assert_eq!(errors.get(&Field::Ingredients), Some(&FieldError::Required));
        assert_eq!(errors.len(), 1);

        draft
            .ingredients
            .push(NewIngredient::new("tomato", "4", "").placed(1));
        assert!(validate_step(WizardStep::Ingredients, &draft, &rules).is_empty());
    }

    #[test]
    fn whole_draft_covers_every_step() {
        let rules = ValidationRules::default();
        let errors = validate_draft(&basic_info(), &rules);
        assert!(errors.contains_key(&Field::Ingredients));
        assert!(errors.contains_key(&Field::Steps));
        assert!(!errors.contains_key(&Field::Name));
    }

    #[test]
    fn strict_mode_swaps_image_rule() {
        let rules = ValidationRules::standard(&FormConfig {
            strict_image_urls: true,
            ..FormConfig::default()
        });
        assert_eq!(
            rules.validate(
                Field::MainImageUrl,
                FieldValue::Text("https://cdn.example.com/soup")
            ),
            Some(FieldError::InvalidImageType)
        );
    }

    #[test]
    fn custom_rules_can_be_registered() {
        let mut rules = ValidationRules::new();
        assert_eq!(rules.validate(Field::Name, FieldValue::Text("")), None);

        rules.register(Field::Description, |value| {
            if value.as_text().contains("TODO") {
                Some(FieldError::Required)
            } else {
                None
            }
        });
        assert_eq!(
            rules.validate(Field::Description, FieldValue::Text("TODO: write")),
            Some(FieldError::Required)
        );
    }
}
