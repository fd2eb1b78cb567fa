pub mod api;
pub mod auth_form;
pub mod config;
pub mod draft;
pub mod error;
pub mod reorder;
pub mod types;
pub mod validation;
pub mod wizard;

pub use api::{ApiError, FakeApi, HttpApi, RecipeStore, TagCatalog};
pub use auth_form::{AuthErrors, AuthField, LoginForm, RegisterForm};
pub use config::{ClientConfig, ConfigError, FormConfig};
pub use draft::{reduce, DraftAction, DraftPatch, FieldUpdate};
pub use error::{FieldError, ItemError, WizardError};
pub use reorder::{DragSession, Modality, MoveKey, ReorderError, RowBounds};
pub use types::{
    AuthContext, Field, FieldValue, Ingredient, NewIngredient, NewRecipe, NewStep, Recipe,
    RecipeDraft, Step, Tag,
};
pub use validation::{validate_draft, validate_step, ValidationRules, ValidationState};
pub use wizard::{IngredientEdit, ListKind, PendingSubmission, RecipeWizard, StepEdit, WizardStep};
