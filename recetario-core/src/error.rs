use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::reorder::ReorderError;
use crate::validation::ValidationState;
use crate::wizard::WizardStep;

/// Why a single field value was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Must be a whole number")]
    NotANumber,

    #[error("Must be at least {min}")]
    BelowMin { min: i64 },

    #[error("Must be at most {max}")]
    AboveMax { max: i64 },

    #[error("Must be a valid URL")]
    InvalidUrl,

    #[error("Must point to an image file (jpg, jpeg, png, gif, bmp, webp, svg)")]
    InvalidImageType,

    #[error("Must be a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    Mismatch,

    #[error("At most {max} items allowed")]
    TooMany { max: usize },
}

impl FieldError {
    /// Short kind used in translation keys.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::Required => "required",
            FieldError::TooShort { .. } => "minLength",
            FieldError::TooLong { .. } => "maxLength",
            FieldError::NotANumber | FieldError::InvalidUrl | FieldError::InvalidEmail => {
                "invalid"
            }
            FieldError::BelowMin { .. } => "min",
            FieldError::AboveMax { .. } => "max",
            FieldError::InvalidImageType => "invalidImageType",
            FieldError::Mismatch => "noMatch",
            FieldError::TooMany { .. } => "tooMany",
        }
    }

    /// Translation key, e.g. `validation.prepTime.max`.
    pub fn message_key(&self, field: &str) -> String {
        format!("validation.{}.{}", field, self.kind())
    }
}

/// A rejected ingredient or recipe step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {error}")]
pub struct ItemError {
    pub field: &'static str,
    pub error: FieldError,
}

impl ItemError {
    pub fn new(field: &'static str, error: FieldError) -> Self {
        Self { field, error }
    }
}

/// Refused wizard transitions.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Step {step} has {} invalid field(s)", .errors.len())]
    StepInvalid {
        step: WizardStep,
        errors: ValidationState,
    },

    #[error("Recipe has {} invalid field(s)", .0.len())]
    DraftInvalid(ValidationState),

    #[error("Already on the last step")]
    NoNextStep,

    #[error("Submit is only available on the last step")]
    NotOnLastStep,

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("No submission in progress")]
    NoSubmissionInFlight,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("At most {max} tags allowed")]
    TooManyTags { max: usize },

    #[error("Invalid item: {0}")]
    Item(#[from] ItemError),

    #[error(transparent)]
    Reorder(#[from] ReorderError),

    #[error("No drag in progress")]
    NoActiveDrag,

    #[error("Recipe could not be saved: {0}")]
    Submission(#[from] ApiError),
}
