//! Checks for a single ingredient or recipe step before it enters the draft.

use crate::error::{FieldError, ItemError};
use crate::types::{FieldValue, NewIngredient, NewStep};

use super::rules::{image_url, max_length};

pub const INGREDIENT_NAME_MAX_LENGTH: usize = 50;
pub const QUANTITY_MAX_LENGTH: usize = 10;
pub const UNIT_MAX_LENGTH: usize = 15;
pub const STEP_DESCRIPTION_MAX_LENGTH: usize = 600;
pub const STEP_TIP_MAX_LENGTH: usize = 200;

pub fn check_ingredient(ingredient: &NewIngredient) -> Result<(), ItemError> {
    if ingredient.name.trim().is_empty() {
        return Err(ItemError::new("name", FieldError::Required));
    }
    limit("name", &ingredient.name, INGREDIENT_NAME_MAX_LENGTH)?;
    limit("quantity", &ingredient.quantity, QUANTITY_MAX_LENGTH)?;
    limit("unit", &ingredient.unit, UNIT_MAX_LENGTH)
}

pub fn check_step(step: &NewStep) -> Result<(), ItemError> {
    if step.description.trim().is_empty() {
        return Err(ItemError::new("description", FieldError::Required));
    }
    limit("description", &step.description, STEP_DESCRIPTION_MAX_LENGTH)?;
    if let Some(tip) = &step.tip {
        limit("tip", tip, STEP_TIP_MAX_LENGTH)?;
    }
    if let Some(url) = &step.image_url {
        if let Some(err) = image_url(FieldValue::Text(url)) {
            return Err(ItemError::new("imageUrl", err));
        }
    }
    Ok(())
}

pub fn limit(field: &'static str, text: &str, max: usize) -> Result<(), ItemError> {
    match max_length(text, max) {
        Some(err) => Err(ItemError::new(field, err)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredient_needs_a_name() {
        let err = check_ingredient(&NewIngredient::new("  ", "2", "cups")).unwrap_err();
        assert_eq!(err, ItemError::new("name", FieldError::Required));
        assert!(check_ingredient(&NewIngredient::new("flour", "2", "cups")).is_ok());
    }

    #[test]
    fn ingredient_length_limits() {
        let long_unit = NewIngredient::new("flour", "2", "tablespoonsfuls!");
        assert_eq!(
            check_ingredient(&long_unit).unwrap_err(),
            ItemError::new("unit", FieldError::TooLong { max: 15 })
        );

        let long_quantity = NewIngredient::new("flour", "12345678901", "g");
        assert_eq!(check_ingredient(&long_quantity).unwrap_err().field, "quantity");
    }

    #[test]
    fn step_checks() {
        assert_eq!(
            check_step(&NewStep::new("")).unwrap_err().error,
            FieldError::Required
        );
        assert!(check_step(&NewStep::new("Simmer for 20 minutes").with_tip("Stir often")).is_ok());

        let long_tip = NewStep::new("Simmer").with_tip(&"x".repeat(201));
        assert_eq!(check_step(&long_tip).unwrap_err().field, "tip");

        let bad_image = NewStep {
            image_url: Some("photo.jpg".to_string()),
            ..NewStep::new("Plate")
        };
        assert_eq!(
            check_step(&bad_image).unwrap_err(),
            ItemError::new("imageUrl", FieldError::InvalidUrl)
        );

        // Step images only need to be well-formed URLs
        let extensionless = NewStep {
            image_url: Some("https://cdn.example.com/p/123".to_string()),
            ..NewStep::new("Plate")
        };
        assert!(check_step(&extensionless).is_ok());
    }
}
