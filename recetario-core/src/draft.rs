//! Draft state transitions.
//!
//! [`reduce`] is the only way a draft changes: it takes the current draft and
//! an action and returns the next draft. Appends assign the next dense
//! position; any replaced list is renumbered so positions stay `1..=N`.

use crate::reorder::renumber;
use crate::types::{Field, FieldValue, Ingredient, NewIngredient, NewStep, RecipeDraft, Step, Tag};
use crate::validation::rules::MAX_TAGS;

/// A new value for one scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    Description(String),
    PrepTime(String),
    Servings(String),
    Difficulty(Option<i32>),
    Calories(String),
    MainImageUrl(String),
    IsPublic(bool),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Name(_) => Field::Name,
            FieldUpdate::Description(_) => Field::Description,
            FieldUpdate::PrepTime(_) => Field::PrepTime,
            FieldUpdate::Servings(_) => Field::Servings,
            FieldUpdate::Difficulty(_) => Field::Difficulty,
            FieldUpdate::Calories(_) => Field::Calories,
            FieldUpdate::MainImageUrl(_) => Field::MainImageUrl,
            FieldUpdate::IsPublic(_) => Field::IsPublic,
        }
    }

    pub fn value(&self) -> FieldValue<'_> {
        match self {
            FieldUpdate::Name(s)
            | FieldUpdate::Description(s)
            | FieldUpdate::PrepTime(s)
            | FieldUpdate::Servings(s)
            | FieldUpdate::Calories(s)
            | FieldUpdate::MainImageUrl(s) => FieldValue::Text(s),
            FieldUpdate::Difficulty(d) => FieldValue::Rating(*d),
            FieldUpdate::IsPublic(b) => FieldValue::Flag(*b),
        }
    }

    /// Build an update from a text input keyed by its API field name.
    /// Returns `None` for fields that are not plain text inputs.
    pub fn from_text(field: Field, value: &str) -> Option<Self> {
        let value = value.to_string();
        match field {
            Field::Name => Some(FieldUpdate::Name(value)),
            Field::Description => Some(FieldUpdate::Description(value)),
            Field::PrepTime => Some(FieldUpdate::PrepTime(value)),
            Field::Servings => Some(FieldUpdate::Servings(value)),
            Field::Calories => Some(FieldUpdate::Calories(value)),
            Field::MainImageUrl => Some(FieldUpdate::MainImageUrl(value)),
            _ => None,
        }
    }
}

/// Partial draft: every `Some` replaces the corresponding attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub prep_time: Option<String>,
    pub servings: Option<String>,
    pub difficulty: Option<Option<i32>>,
    pub calories: Option<String>,
    pub main_image_url: Option<String>,
    pub tags: Option<Vec<Tag>>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<Step>>,
    pub is_public: Option<bool>,
}

impl DraftPatch {
    pub fn ingredients(ingredients: Vec<Ingredient>) -> Self {
        Self {
            ingredients: Some(ingredients),
            ..Self::default()
        }
    }

    pub fn steps(steps: Vec<Step>) -> Self {
        Self {
            steps: Some(steps),
            ..Self::default()
        }
    }

    /// A patch that replaces every attribute with those of `draft`.
    pub fn from_draft(draft: RecipeDraft) -> Self {
        Self {
            name: Some(draft.name),
            description: Some(draft.description),
            prep_time: Some(draft.prep_time),
            servings: Some(draft.servings),
            difficulty: Some(draft.difficulty),
            calories: Some(draft.calories),
            main_image_url: Some(draft.main_image_url),
            tags: Some(draft.tags),
            ingredients: Some(draft.ingredients),
            steps: Some(draft.steps),
            is_public: Some(draft.is_public),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftAction {
    UpdateField(FieldUpdate),
    AddIngredient(NewIngredient),
    AddStep(NewStep),
    UpdateTags(Vec<Tag>),
    UpdateState(DraftPatch),
    Reset,
}

/// Apply one action to a draft.
pub fn reduce(draft: &RecipeDraft, action: DraftAction) -> RecipeDraft {
    match action {
        DraftAction::UpdateField(update) => {
            let mut next = draft.clone();
            apply_field(&mut next, update);
            next
        }
        DraftAction::AddIngredient(ingredient) => {
            let mut next = draft.clone();
            let order = next_position(next.ingredients.len());
            next.ingredients.push(ingredient.placed(order));
            next
        }
        DraftAction::AddStep(step) => {
            let mut next = draft.clone();
            let order = next_position(next.steps.len());
            next.steps.push(step.placed(order));
            next
        }
        DraftAction::UpdateTags(tags) => match normalize_tags(tags) {
            Some(tags) => RecipeDraft {
                tags,
                ..draft.clone()
            },
            None => draft.clone(),
        },
        DraftAction::UpdateState(patch) => apply_patch(draft.clone(), patch),
        DraftAction::Reset => RecipeDraft::default(),
    }
}

fn apply_field(draft: &mut RecipeDraft, update: FieldUpdate) {
    match update {
        FieldUpdate::Name(v) => draft.name = v,
        FieldUpdate::Description(v) => draft.description = v,
        FieldUpdate::PrepTime(v) => draft.prep_time = v,
        FieldUpdate::Servings(v) => draft.servings = v,
        FieldUpdate::Difficulty(v) => draft.difficulty = v,
        FieldUpdate::Calories(v) => draft.calories = v,
        FieldUpdate::MainImageUrl(v) => draft.main_image_url = v,
        FieldUpdate::IsPublic(v) => draft.is_public = v,
    }
}

fn apply_patch(mut draft: RecipeDraft, patch: DraftPatch) -> RecipeDraft {
    if let Some(v) = patch.name {
        draft.name = v;
    }
    if let Some(v) = patch.description {
        draft.description = v;
    }
    if let Some(v) = patch.prep_time {
        draft.prep_time = v;
    }
    if let Some(v) = patch.servings {
        draft.servings = v;
    }
    if let Some(v) = patch.difficulty {
        draft.difficulty = v;
    }
    if let Some(v) = patch.calories {
        draft.calories = v;
    }
    if let Some(v) = patch.main_image_url {
        draft.main_image_url = v;
    }
    if let Some(tags) = patch.tags.and_then(normalize_tags) {
        draft.tags = tags;
    }
    if let Some(v) = patch.ingredients {
        draft.ingredients = renumber(v);
    }
    if let Some(v) = patch.steps {
        draft.steps = renumber(v);
    }
    if let Some(v) = patch.is_public {
        draft.is_public = v;
    }
    draft
}

/// Collapse duplicate ids; refuse sets above the tag limit.
fn normalize_tags(tags: Vec<Tag>) -> Option<Vec<Tag>> {
    let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.iter().any(|t| t.id == tag.id) {
            unique.push(tag);
        }
    }
    if unique.len() > MAX_TAGS {
        tracing::debug!(count = unique.len(), max = MAX_TAGS, "tag update refused");
        return None;
    }
    Some(unique)
}

fn next_position(len: usize) -> u32 {
    u32::try_from(len + 1).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::is_dense;

    fn tag(id: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: format!("tag {}", id),
            color: None,
        }
    }

    #[test]
    fn update_field_replaces_one_attribute() {
        let draft = RecipeDraft::default();
        let next = reduce(
            &draft,
            DraftAction::UpdateField(FieldUpdate::Name("Tomato Soup".to_string())),
        );
        assert_eq!(next.name, "Tomato Soup");
        assert_eq!(next.prep_time, draft.prep_time);
        assert_eq!(draft.name, "");
    }

    #[test]
    fn appends_assign_next_position() {
        let mut draft = RecipeDraft::default();
        for name in ["flour", "sugar", "eggs"] {
            draft = reduce(
                &draft,
                DraftAction::AddIngredient(NewIngredient::new(name, "1", "cup")),
            );
        }
        let orders: Vec<u32> = draft.ingredients.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);

        draft = reduce(&draft, DraftAction::AddStep(NewStep::new("Mix")));
        assert_eq!(draft.steps[0].order, 1);
    }

    #[test]
    fn update_state_renumbers_replaced_lists() {
        let draft = RecipeDraft::default();
        let mut ingredients: Vec<Ingredient> = ["a", "b", "c"]
            .iter()
            .map(|n| NewIngredient::new(n, "", "").placed(9))
            .collect();
        ingredients.swap(0, 2);

        let next = reduce(
            &draft,
            DraftAction::UpdateState(DraftPatch::ingredients(ingredients)),
        );
        assert!(is_dense(&next.ingredients));
        assert_eq!(next.ingredients[0].name, "c");
    }

    #[test]
    fn tags_are_capped_and_deduplicated() {
        let draft = RecipeDraft::default();
        let next = reduce(
            &draft,
            DraftAction::UpdateTags(vec![tag("1"), tag("2"), tag("1")]),
        );
        assert_eq!(next.tags.len(), 2);

        let refused = reduce(
            &next,
            DraftAction::UpdateTags(vec![tag("1"), tag("2"), tag("3"), tag("4"), tag("5")]),
        );
        assert_eq!(refused, next);
    }

    #[test]
    fn reset_returns_initial_draft() {
        let draft = reduce(
            &RecipeDraft::default(),
            DraftAction::UpdateField(FieldUpdate::IsPublic(false)),
        );
        assert!(!draft.is_public);
        assert_eq!(reduce(&draft, DraftAction::Reset), RecipeDraft::default());
    }

    #[test]
    fn text_updates_map_to_their_field() {
        let update = FieldUpdate::from_text(Field::Servings, "4").unwrap();
        assert_eq!(update.field(), Field::Servings);
        assert_eq!(update.value(), FieldValue::Text("4"));
        assert_eq!(FieldUpdate::from_text(Field::Difficulty, "3"), None);
    }
}
