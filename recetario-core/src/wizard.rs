//! Multi-step recipe creation wizard.
//!
//! The wizard owns the draft and is the only component that mutates it. Each
//! user gesture maps to one method; draft changes go through
//! [`reduce`](crate::draft::reduce). Validation and list operations are pure
//! functions called from here.

use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};

use crate::api::{ApiError, RecipeStore};
use crate::config::FormConfig;
use crate::draft::{reduce, DraftAction, DraftPatch, FieldUpdate};
use crate::error::{FieldError, ItemError, WizardError};
use crate::reorder::{self, DragSession, Modality, MoveKey, ReorderError, RowBounds};
use crate::types::{
    AuthContext, Field, FieldValue, NewIngredient, NewRecipe, NewStep, Recipe, RecipeDraft, Tag,
};
use crate::validation::rules::{parse_leading_int, MAX_TAGS};
use crate::validation::{
    self, check_ingredient, check_step, validate_draft, validate_step, ValidationRules,
    ValidationState,
};

/// Longest raw input accepted for numeric text fields.
pub const PREP_TIME_INPUT_MAX: usize = 4;
pub const SERVINGS_INPUT_MAX: usize = 3;
pub const CALORIES_INPUT_MAX: usize = 5;

/// Pages of the wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    BasicInfo,
    Ingredients,
    Steps,
}

impl WizardStep {
    pub const ALL: &'static [WizardStep] = &[
        WizardStep::BasicInfo,
        WizardStep::Ingredients,
        WizardStep::Steps,
    ];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::BasicInfo => 0,
            WizardStep::Ingredients => 1,
            WizardStep::Steps => 2,
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }

    /// Fields validated before leaving this step.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            WizardStep::BasicInfo => &[
                Field::Name,
                Field::Description,
                Field::PrepTime,
                Field::Servings,
                Field::Difficulty,
                Field::Calories,
                Field::MainImageUrl,
            ],
            WizardStep::Ingredients => &[Field::Ingredients],
            WizardStep::Steps => &[Field::Steps],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::BasicInfo => "basic_info",
            WizardStep::Ingredients => "ingredients",
            WizardStep::Steps => "steps",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "basic_info" => Some(WizardStep::BasicInfo),
            "ingredients" => Some(WizardStep::Ingredients),
            "steps" => Some(WizardStep::Steps),
            _ => None,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ordered list of the draft an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ingredients,
    Steps,
}

/// In-place change to one ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientEdit {
    Name(String),
    Quantity(String),
    Unit(String),
    Optional(bool),
}

/// In-place change to one recipe step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEdit {
    Description(String),
    Tip(Option<String>),
    ImageUrl(Option<String>),
}

/// A validated payload waiting for the API, produced by
/// [`RecipeWizard::begin_submit`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub recipe: NewRecipe,
    pub auth: AuthContext,
}

/// Controller for the recipe creation form.
pub struct RecipeWizard {
    config: FormConfig,
    rules: ValidationRules,
    draft: RecipeDraft,
    step: WizardStep,
    errors: ValidationState,
    touched: BTreeSet<Field>,
    submit_attempted: bool,
    in_flight: bool,
    succeeded_at: Option<Instant>,
    submit_error: Option<String>,
    drag: Option<(ListKind, DragSession)>,
}

impl Default for RecipeWizard {
    fn default() -> Self {
        Self::new(FormConfig::default())
    }
}

impl RecipeWizard {
    /// Start a wizard with an empty draft and the standard rules.
    pub fn new(config: FormConfig) -> Self {
        let rules = ValidationRules::standard(&config);
        Self::with_rules(config, rules)
    }

    /// Start a wizard with a custom rule registry.
    pub fn with_rules(config: FormConfig, rules: ValidationRules) -> Self {
        Self {
            config,
            rules,
            draft: RecipeDraft::default(),
            step: WizardStep::BasicInfo,
            errors: ValidationState::new(),
            touched: BTreeSet::new(),
            submit_attempted: false,
            in_flight: false,
            succeeded_at: None,
            submit_error: None,
            drag: None,
        }
    }

    /// Start a wizard pre-filled with `draft`. Positions and tags are
    /// normalized on the way in.
    pub fn from_draft(config: FormConfig, draft: RecipeDraft) -> Self {
        let mut wizard = Self::new(config);
        wizard.dispatch(DraftAction::UpdateState(DraftPatch::from_draft(draft)));
        wizard
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Errors from the last validation pass.
    pub fn errors(&self) -> &ValidationState {
        &self.errors
    }

    pub fn touched(&self) -> &BTreeSet<Field> {
        &self.touched
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Message of the last failed submission, until dismissed.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn dismiss_submit_error(&mut self) {
        self.submit_error = None;
    }

    /// Error to display next to `field`: only once the field was touched or
    /// a submit was attempted.
    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        if self.submit_attempted || self.touched.contains(&field) {
            self.errors.get(&field)
        } else {
            None
        }
    }

    /// Live validation of the current step.
    pub fn step_errors(&self) -> ValidationState {
        validate_step(self.step, &self.draft, &self.rules)
    }

    pub fn can_advance(&self) -> bool {
        !self.step.is_last() && self.step_errors().is_empty()
    }

    pub fn can_submit(&self) -> bool {
        self.step.is_last() && !self.in_flight && self.step_errors().is_empty()
    }

    fn dispatch(&mut self, action: DraftAction) {
        self.draft = reduce(&self.draft, action);
    }

    /// Apply a keystroke-level update. Returns `false` when the input was
    /// refused (raw numeric input longer than its cap). A field that already
    /// has an error is revalidated against the new value: the error is
    /// replaced, or cleared once the value is valid. Fields without an error
    /// only get one from [`next`](Self::next) and submit.
    pub fn update_field(&mut self, update: FieldUpdate) -> bool {
        if exceeds_input_cap(&update) {
            return false;
        }

        let field = update.field();
        if self.errors.contains_key(&field) {
            match self.rules.validate(field, update.value()) {
                Some(error) => {
                    self.errors.insert(field, error);
                }
                None => {
                    self.errors.remove(&field);
                }
            }
        }
        self.dispatch(DraftAction::UpdateField(update));
        true
    }

    /// The user left `field`.
    pub fn blur(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn clear_main_image(&mut self) {
        self.update_field(FieldUpdate::MainImageUrl(String::new()));
    }

    pub fn update_tags(&mut self, tags: Vec<Tag>) -> Result<(), WizardError> {
        let mut ids: Vec<&str> = tags.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() > MAX_TAGS {
            return Err(WizardError::TooManyTags { max: MAX_TAGS });
        }

        self.dispatch(DraftAction::UpdateTags(tags));
        self.errors.remove(&Field::Tags);
        Ok(())
    }

    pub fn add_ingredient(&mut self, ingredient: NewIngredient) -> Result<(), WizardError> {
        check_ingredient(&ingredient)?;
        self.dispatch(DraftAction::AddIngredient(ingredient));
        self.errors.remove(&Field::Ingredients);
        Ok(())
    }

    pub fn add_step(&mut self, step: NewStep) -> Result<(), WizardError> {
        check_step(&step)?;
        self.dispatch(DraftAction::AddStep(step));
        self.errors.remove(&Field::Steps);
        Ok(())
    }

    /// Edit one ingredient in place. Length limits apply; a blank name is
    /// allowed while editing.
    pub fn edit_ingredient(&mut self, index: usize, edit: IngredientEdit) -> Result<(), WizardError> {
        let mut ingredients = self.draft.ingredients.clone();
        let len = ingredients.len();
        let item = ingredients
            .get_mut(index)
            .ok_or(ReorderError::OutOfBounds { index, len })?;

        match edit {
            IngredientEdit::Name(v) => {
                validation::limit("name", &v, validation::INGREDIENT_NAME_MAX_LENGTH)?;
                item.name = v;
            }
            IngredientEdit::Quantity(v) => {
                validation::limit("quantity", &v, validation::QUANTITY_MAX_LENGTH)?;
                item.quantity = v;
            }
            IngredientEdit::Unit(v) => {
                validation::limit("unit", &v, validation::UNIT_MAX_LENGTH)?;
                item.unit = v;
            }
            IngredientEdit::Optional(v) => item.optional = v,
        }

        self.dispatch(DraftAction::UpdateState(DraftPatch::ingredients(ingredients)));
        Ok(())
    }

    pub fn edit_step(&mut self, index: usize, edit: StepEdit) -> Result<(), WizardError> {
        let mut steps = self.draft.steps.clone();
        let len = steps.len();
        let item = steps
            .get_mut(index)
            .ok_or(ReorderError::OutOfBounds { index, len })?;

        match edit {
            StepEdit::Description(v) => {
                validation::limit("description", &v, validation::STEP_DESCRIPTION_MAX_LENGTH)?;
                item.description = v;
            }
            StepEdit::Tip(v) => {
                if let Some(tip) = &v {
                    validation::limit("tip", tip, validation::STEP_TIP_MAX_LENGTH)?;
                }
                item.tip = v.filter(|t| !t.trim().is_empty());
            }
            StepEdit::ImageUrl(v) => {
                if let Some(url) = &v {
                    if let Some(err) = validation::rules::image_url(FieldValue::Text(url)) {
                        return Err(ItemError::new("imageUrl", err).into());
                    }
                }
                item.image_url = v.filter(|u| !u.trim().is_empty());
            }
        }

        self.dispatch(DraftAction::UpdateState(DraftPatch::steps(steps)));
        Ok(())
    }

    pub fn remove_item(&mut self, list: ListKind, index: usize) -> Result<(), WizardError> {
        let patch = match list {
            ListKind::Ingredients => {
                DraftPatch::ingredients(reorder::remove(&self.draft.ingredients, index)?)
            }
            ListKind::Steps => DraftPatch::steps(reorder::remove(&self.draft.steps, index)?),
        };
        let ended = match self.drag.as_mut() {
            Some((dragging, session)) if *dragging == list => !session.follow_removal(index),
            _ => false,
        };
        if ended {
            self.drag = None;
        }
        self.dispatch(DraftAction::UpdateState(patch));
        Ok(())
    }

    /// Move the item at `from` to index `to`.
    pub fn move_item(&mut self, list: ListKind, from: usize, to: usize) -> Result<(), WizardError> {
        let patch = match list {
            ListKind::Ingredients => {
                DraftPatch::ingredients(reorder::reorder(&self.draft.ingredients, from, to)?)
            }
            ListKind::Steps => DraftPatch::steps(reorder::reorder(&self.draft.steps, from, to)?),
        };
        if let Some((dragging, session)) = self.drag.as_mut() {
            if *dragging == list {
                session.follow_move(from, to);
            }
        }
        self.dispatch(DraftAction::UpdateState(patch));
        Ok(())
    }

    /// Keyboard reorder of the focused item. Returns its new index, or
    /// `None` when the key does not move it (e.g. Up on the first item).
    pub fn keyboard_move(
        &mut self,
        list: ListKind,
        index: usize,
        key: MoveKey,
    ) -> Result<Option<usize>, WizardError> {
        let Some(to) = key.target(index, self.list_len(list)) else {
            return Ok(None);
        };
        self.move_item(list, index, to)?;
        Ok(Some(to))
    }

    /// Begin dragging the item at `index` (pointer or touch).
    pub fn start_drag(
        &mut self,
        list: ListKind,
        index: usize,
        modality: Modality,
    ) -> Result<(), WizardError> {
        let len = self.list_len(list);
        if index >= len {
            return Err(ReorderError::OutOfBounds { index, len }.into());
        }
        tracing::debug!(?list, index, ?modality, "drag started");
        self.drag = Some((list, DragSession::start(index, modality)));
        Ok(())
    }

    /// Index currently occupied by the dragged item.
    pub fn dragged_index(&self) -> Option<usize> {
        self.drag.as_ref().map(|(_, session)| session.dragged_index())
    }

    /// The dragged item is over row `hover`; the list is reordered
    /// immediately. Returns whether the list changed.
    pub fn drag_over(&mut self, hover: usize) -> Result<bool, WizardError> {
        self.drag_step(|session, list, draft| match list {
            ListKind::Ingredients => Ok(session
                .hover(&draft.ingredients, hover)?
                .map(DraftPatch::ingredients)),
            ListKind::Steps => Ok(session.hover(&draft.steps, hover)?.map(DraftPatch::steps)),
        })
    }

    /// Touch drag moved to vertical position `y` over `rows`.
    pub fn touch_drag(&mut self, y: f64, rows: &[RowBounds]) -> Result<bool, WizardError> {
        self.drag_step(|session, list, draft| match list {
            ListKind::Ingredients => Ok(session
                .touch_move(&draft.ingredients, y, rows)?
                .map(DraftPatch::ingredients)),
            ListKind::Steps => Ok(session
                .touch_move(&draft.steps, y, rows)?
                .map(DraftPatch::steps)),
        })
    }

    /// Drop, drag end, touch end or cancel. The list keeps its last
    /// computed order. Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    fn drag_step<F>(&mut self, f: F) -> Result<bool, WizardError>
    where
        F: FnOnce(&mut DragSession, ListKind, &RecipeDraft) -> Result<Option<DraftPatch>, ReorderError>,
    {
        let (list, mut session) = self.drag.take().ok_or(WizardError::NoActiveDrag)?;
        let result = f(&mut session, list, &self.draft);
        self.drag = Some((list, session));

        match result? {
            Some(patch) => {
                self.dispatch(DraftAction::UpdateState(patch));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_len(&self, list: ListKind) -> usize {
        match list {
            ListKind::Ingredients => self.draft.ingredients.len(),
            ListKind::Steps => self.draft.steps.len(),
        }
    }

    /// Advance to the next step if the current one validates. On failure the
    /// step's errors are stored and their fields marked touched.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let Some(next) = self.step.next() else {
            return Err(WizardError::NoNextStep);
        };

        let errors = self.step_errors();
        self.errors = errors.clone();
        if !errors.is_empty() {
            self.touched.extend(errors.keys().copied());
            tracing::debug!(step = %self.step, invalid = errors.len(), "step blocked");
            return Err(WizardError::StepInvalid {
                step: self.step,
                errors,
            });
        }

        tracing::debug!(from = %self.step, to = %next, "step advanced");
        self.step = next;
        Ok(next)
    }

    /// Go back one step. Never blocked; stays put on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// First half of a submit: check preconditions, validate the whole
    /// draft, build the payload and mark the submission in flight.
    pub fn begin_submit(
        &mut self,
        auth: Option<&AuthContext>,
        created: DateTime<Utc>,
    ) -> Result<PendingSubmission, WizardError> {
        if !self.step.is_last() {
            return Err(WizardError::NotOnLastStep);
        }
        if self.in_flight {
            return Err(WizardError::SubmissionInFlight);
        }
        self.submit_attempted = true;

        let Some(auth) = auth else {
            tracing::warn!("submit refused: no authenticated user");
            return Err(WizardError::NotAuthenticated);
        };

        let errors = validate_draft(&self.draft, &self.rules);
        self.errors = errors.clone();
        if !errors.is_empty() {
            tracing::debug!(invalid = errors.len(), "submit blocked by validation");
            return Err(WizardError::DraftInvalid(errors));
        }

        let recipe = build_payload(&self.draft, auth, created)?;
        self.in_flight = true;
        self.submit_error = None;

        Ok(PendingSubmission {
            recipe,
            auth: auth.clone(),
        })
    }

    /// Second half of a submit: apply the API outcome. Success resets the
    /// wizard to an empty draft on the first step and raises the success
    /// signal; failure keeps the draft and records the message. Without a
    /// pending [`begin_submit`](Self::begin_submit) the outcome is refused
    /// and the wizard is left untouched.
    pub fn finish_submit(
        &mut self,
        result: Result<Recipe, ApiError>,
        now: Instant,
    ) -> Result<Recipe, WizardError> {
        if !self.in_flight {
            return Err(WizardError::NoSubmissionInFlight);
        }
        self.in_flight = false;

        match result {
            Ok(recipe) => {
                tracing::info!(id = %recipe.id, name = %recipe.name, "recipe created");
                self.dispatch(DraftAction::Reset);
                self.errors.clear();
                self.touched.clear();
                self.submit_attempted = false;
                self.drag = None;
                self.step = WizardStep::BasicInfo;
                self.succeeded_at = Some(now);
                Ok(recipe)
            }
            Err(e) => {
                tracing::warn!(error = %e, "recipe creation failed");
                self.submit_error = Some(e.to_string());
                Err(WizardError::Submission(e))
            }
        }
    }

    /// Validate, call the store, and apply the outcome.
    pub async fn submit(
        &mut self,
        store: &dyn RecipeStore,
        auth: Option<&AuthContext>,
    ) -> Result<Recipe, WizardError> {
        let pending = self.begin_submit(auth, Utc::now())?;
        let result = store
            .create_recipe(&pending.recipe, &pending.auth)
            .instrument(info_span!("create_recipe", name = %pending.recipe.name))
            .await;
        self.finish_submit(result, Instant::now())
    }

    /// Whether the "recipe saved" signal is showing at `now`.
    pub fn success_visible(&self, now: Instant) -> bool {
        self.succeeded_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.config.success_banner)
    }

    /// Drop the success signal once its window has passed.
    pub fn clear_expired_success(&mut self, now: Instant) {
        if !self.success_visible(now) {
            self.succeeded_at = None;
        }
    }

    /// Leave the wizard: the draft and all interaction state are dropped.
    pub fn discard(&mut self) {
        self.dispatch(DraftAction::Reset);
        self.step = WizardStep::BasicInfo;
        self.errors.clear();
        self.touched.clear();
        self.submit_attempted = false;
        self.submit_error = None;
        self.drag = None;
    }
}

fn exceeds_input_cap(update: &FieldUpdate) -> bool {
    let (text, cap) = match update {
        FieldUpdate::PrepTime(s) => (s, PREP_TIME_INPUT_MAX),
        FieldUpdate::Servings(s) => (s, SERVINGS_INPUT_MAX),
        FieldUpdate::Calories(s) => (s, CALORIES_INPUT_MAX),
        _ => return false,
    };
    text.chars().count() > cap
}

fn build_payload(
    draft: &RecipeDraft,
    auth: &AuthContext,
    created: DateTime<Utc>,
) -> Result<NewRecipe, WizardError> {
    let calories = if draft.calories.trim().is_empty() {
        None
    } else {
        Some(whole_number(Field::Calories, &draft.calories)?)
    };

    let difficulty = draft
        .difficulty
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| invalid(Field::Difficulty, FieldError::Required))?;

    let main_image_url = Some(draft.main_image_url.trim().to_string()).filter(|u| !u.is_empty());

    Ok(NewRecipe {
        name: draft.name.trim().to_string(),
        description: draft.description.clone(),
        prep_time: whole_number(Field::PrepTime, &draft.prep_time)?,
        servings: whole_number(Field::Servings, &draft.servings)?,
        difficulty,
        calories,
        main_image_url,
        tags: draft.tags.clone(),
        ingredients: draft.ingredients.clone(),
        steps: draft.steps.clone(),
        is_public: draft.is_public,
        user_id: auth.user_id,
        created_date: created,
    })
}

fn whole_number(field: Field, text: &str) -> Result<u32, WizardError> {
    parse_leading_int(text)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| invalid(field, FieldError::NotANumber))
}

fn invalid(field: Field, error: FieldError) -> WizardError {
    WizardError::DraftInvalid(ValidationState::from([(field, error)]))
}
