use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Form fields of a recipe draft, keyed the way the REST API names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "description")]
    Description,
    #[serde(rename = "prepTime")]
    PrepTime,
    #[serde(rename = "servings")]
    Servings,
    #[serde(rename = "difficulty")]
    Difficulty,
    #[serde(rename = "calories")]
    Calories,
    #[serde(rename = "mainImageURL")]
    MainImageUrl,
    #[serde(rename = "tags")]
    Tags,
    #[serde(rename = "ingredients")]
    Ingredients,
    #[serde(rename = "steps")]
    Steps,
    #[serde(rename = "isPublic")]
    IsPublic,
}

impl Field {
    /// All fields in form order
    pub const ALL: &'static [Field] = &[
        Field::Name,
        Field::Description,
        Field::PrepTime,
        Field::Servings,
        Field::Difficulty,
        Field::Calories,
        Field::MainImageUrl,
        Field::Tags,
        Field::Ingredients,
        Field::Steps,
        Field::IsPublic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::PrepTime => "prepTime",
            Field::Servings => "servings",
            Field::Difficulty => "difficulty",
            Field::Calories => "calories",
            Field::MainImageUrl => "mainImageURL",
            Field::Tags => "tags",
            Field::Ingredients => "ingredients",
            Field::Steps => "steps",
            Field::IsPublic => "isPublic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Field::ALL.iter().copied().find(|f| f.as_str() == s)
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed view of a field's current value, the uniform input of every validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Rating(Option<i32>),
    Flag(bool),
    /// Number of items in a collection field (tags, ingredients, steps)
    Count(usize),
}

impl<'a> FieldValue<'a> {
    /// Text content, or the empty string for non-text values.
    pub fn as_text(&self) -> &'a str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_rating(&self) -> Option<i32> {
        match self {
            FieldValue::Rating(r) => *r,
            _ => None,
        }
    }

    pub fn as_count(&self) -> usize {
        match self {
            FieldValue::Count(n) => *n,
            _ => 0,
        }
    }
}

/// A tag from the external catalog. Referenced by drafts, never owned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An ingredient line as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub optional: bool,
    /// 1-based position, dense within the draft
    #[serde(default)]
    pub order: u32,
}

/// An ingredient before it is placed in the list (no position yet).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub optional: bool,
}

impl NewIngredient {
    pub fn new(name: &str, quantity: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            optional: false,
        }
    }

    pub(crate) fn placed(self, order: u32) -> Ingredient {
        Ingredient {
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            optional: self.optional,
            order,
        }
    }
}

/// One instruction of the cooking procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order: u32,
}

/// A recipe step before it is placed in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStep {
    pub description: String,
    #[serde(default)]
    pub tip: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewStep {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            ..Self::default()
        }
    }

    pub fn with_tip(mut self, tip: &str) -> Self {
        self.tip = Some(tip.to_string());
        self
    }

    pub(crate) fn placed(self, order: u32) -> Step {
        // Blank optional inputs are stored as absent
        let non_blank = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Step {
            description: self.description,
            tip: non_blank(self.tip),
            image_url: non_blank(self.image_url),
            order,
        }
    }
}

/// The recipe being authored. Numeric inputs are kept as the raw text typed
/// so validation can report unparseable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeDraft {
    pub name: String,
    pub description: String,
    pub prep_time: String,
    pub servings: String,
    pub difficulty: Option<i32>,
    pub calories: String,
    #[serde(rename = "mainImageURL")]
    pub main_image_url: String,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub is_public: bool,
}

impl Default for RecipeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            prep_time: String::new(),
            servings: String::new(),
            difficulty: None,
            calories: String::new(),
            main_image_url: String::new(),
            tags: Vec::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            is_public: true,
        }
    }
}

impl RecipeDraft {
    /// Current value of a field, as seen by the validation rules.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Name => FieldValue::Text(&self.name),
            Field::Description => FieldValue::Text(&self.description),
            Field::PrepTime => FieldValue::Text(&self.prep_time),
            Field::Servings => FieldValue::Text(&self.servings),
            Field::Difficulty => FieldValue::Rating(self.difficulty),
            Field::Calories => FieldValue::Text(&self.calories),
            Field::MainImageUrl => FieldValue::Text(&self.main_image_url),
            Field::Tags => FieldValue::Count(self.tags.len()),
            Field::Ingredients => FieldValue::Count(self.ingredients.len()),
            Field::Steps => FieldValue::Count(self.steps.len()),
            Field::IsPublic => FieldValue::Flag(self.is_public),
        }
    }
}

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl AuthContext {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }
}

/// Typed submission payload built from a valid draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub description: String,
    pub prep_time: u32,
    pub servings: u32,
    pub difficulty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(
        rename = "mainImageURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub main_image_url: Option<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub is_public: bool,
    #[serde(rename = "user_id")]
    pub user_id: Uuid,
    pub created_date: DateTime<Utc>,
}

/// A recipe persisted by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "prep_time")]
    pub prep_time: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default, rename = "mainImageURL", alias = "main_image_url")]
    pub main_image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default = "default_true", alias = "is_public")]
    pub is_public: bool,
    #[serde(default, rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Ids arrive as strings from some endpoints and integers from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
    })
}
