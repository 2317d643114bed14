use std::collections::HashSet;

use super::{
    error::ValidationError,
    form::{filled, FormRows},
    quantity::Quantity,
    reconcile::{Snapshot, Target},
    schema::{normalized_notes, Ingredient},
};

pub const RECIPE_NAME_LENGTH: std::ops::RangeInclusive<usize> = 1..=35;
pub const INGREDIENT_NAME_LENGTH: std::ops::RangeInclusive<usize> = 1..=100;
pub const DIRECTION_LENGTH: std::ops::RangeInclusive<usize> = 1..=100;

/// Checks a submission against the snapshot it edits. Rules run in a fixed
/// order and the first failure is returned.
pub fn validate(snapshot: &Snapshot, form: &FormRows) -> Result<(), ValidationError> {
    if snapshot.target.is_recipe() {
        validate_recipe(snapshot, form)?;
        validate_steps(snapshot, form)?;
    }
    validate_ingredients(snapshot, form)
}

/// The name the target recipe ends up with, if the target is a recipe.
pub(crate) fn submitted_recipe_name<'a>(
    snapshot: &'a Snapshot,
    form: &'a FormRows,
) -> Option<&'a str> {
    match &snapshot.target {
        Target::NewRecipe => Some(form.recipe_name.as_deref().unwrap_or("").trim()),
        Target::Recipe { recipe, .. } => Some(
            form.recipe_name
                .as_deref()
                .map(str::trim)
                .unwrap_or(recipe.name.as_str()),
        ),
        Target::Pantry => None,
    }
}

fn validate_recipe(snapshot: &Snapshot, form: &FormRows) -> Result<(), ValidationError> {
    let Some(name) = submitted_recipe_name(snapshot, form) else {
        return Ok(());
    };

    if !RECIPE_NAME_LENGTH.contains(&name.chars().count()) {
        return Err(ValidationError::RecipeNameLength);
    }

    let current_id = snapshot.target.recipe().map(|recipe| recipe.id);
    if snapshot
        .recipes
        .iter()
        .any(|recipe| recipe.name == name && Some(recipe.id) != current_id)
    {
        return Err(ValidationError::RecipeNameTaken);
    }

    Ok(())
}

fn validate_steps(snapshot: &Snapshot, form: &FormRows) -> Result<(), ValidationError> {
    // (direction, has notes) for every step the submission would leave behind
    let mut steps: Vec<(String, bool)> = form
        .new_steps
        .values()
        .map(|row| {
            (
                row.direction.as_deref().unwrap_or("").trim().to_string(),
                normalized_notes(row.notes.as_deref()).is_some(),
            )
        })
        .collect();

    let mut edited = Vec::new();
    for step in snapshot.target.steps() {
        if form.deleted_steps.contains(&step.id) {
            continue;
        }
        let Some(edit) = form.step_edits.get(&step.id) else {
            continue;
        };
        let direction = edit
            .direction
            .as_deref()
            .unwrap_or(step.direction.as_str())
            .trim()
            .to_string();
        let has_notes = match &edit.notes {
            Some(notes) => normalized_notes(Some(notes)).is_some(),
            None => step.notes.is_some(),
        };
        edited.push((direction, has_notes));
    }

    if steps
        .iter()
        .chain(edited.iter())
        .any(|(direction, has_notes)| *has_notes && direction.is_empty())
    {
        return Err(ValidationError::NotesWithoutDirection);
    }

    // new rows without a direction are simply skipped; stored steps must keep one
    steps.retain(|(direction, _)| !direction.is_empty());
    if steps
        .iter()
        .any(|(direction, _)| direction.chars().count() > *DIRECTION_LENGTH.end())
        || edited
            .iter()
            .any(|(direction, _)| !DIRECTION_LENGTH.contains(&direction.chars().count()))
    {
        return Err(ValidationError::DirectionLength);
    }

    Ok(())
}

fn validate_ingredients(snapshot: &Snapshot, form: &FormRows) -> Result<(), ValidationError> {
    let editable: HashSet<_> = snapshot
        .target
        .editable_ingredients(snapshot.ingredients)
        .iter()
        .map(|ingredient| ingredient.id)
        .collect();

    let edits: Vec<_> = form
        .ingredient_edits
        .iter()
        .filter(|(id, _)| editable.contains(*id) && !form.deleted_ingredients.contains(*id))
        .map(|(_, fields)| fields)
        .collect();

    check_unique_names(snapshot, form)?;

    let orphans: Vec<_> = form
        .new_ingredients
        .values()
        .filter(|row| row.filled_name().is_none())
        .collect();
    if orphans.iter().any(|row| filled(&row.cost).is_some()) {
        return Err(ValidationError::OrphanedCost);
    }
    if orphans.iter().any(|row| {
        filled(&row.amount_in_recipe).is_some() || filled(&row.amount_in_pantry).is_some()
    }) {
        return Err(ValidationError::OrphanedAmount);
    }
    if orphans
        .iter()
        .any(|row| filled(&row.number_per_purchase).is_some())
    {
        return Err(ValidationError::OrphanedNumberPerPurchase);
    }

    let new_name_too_long = form
        .new_ingredients
        .values()
        .filter_map(|row| row.filled_name())
        .any(|name| name.chars().count() > *INGREDIENT_NAME_LENGTH.end());
    let edited_name_invalid = edits.iter().any(|fields| match &fields.name {
        Some(name) => !INGREDIENT_NAME_LENGTH.contains(&name.trim().chars().count()),
        None => false,
    });
    if new_name_too_long || edited_name_invalid {
        return Err(ValidationError::IngredientNameLength);
    }

    let rows = form.new_ingredients.values().chain(edits.iter().copied());

    let mut costs = rows.clone().filter_map(|row| filled(&row.cost));
    if costs.any(|cost| !is_well_formed_cost(cost)) {
        return Err(ValidationError::MalformedCost);
    }

    let mut amounts = rows.flat_map(|row| {
        [filled(&row.amount_in_recipe), filled(&row.amount_in_pantry)]
            .into_iter()
            .flatten()
    });
    if amounts.any(|amount| !is_well_formed_amount(amount)) {
        return Err(ValidationError::MalformedAmount);
    }

    Ok(())
}

/// The name a stored ingredient ends up with after the submission, `None`
/// when the submission deletes it.
pub(crate) fn final_ingredient_name(
    snapshot: &Snapshot,
    form: &FormRows,
    ingredient: &Ingredient,
) -> Option<String> {
    if form.deleted_ingredients.contains(&ingredient.id) {
        return None;
    }
    let editable = snapshot
        .target
        .editable_ingredients(snapshot.ingredients)
        .iter()
        .any(|candidate| candidate.id == ingredient.id);
    let edited = editable
        .then(|| form.ingredient_edits.get(&ingredient.id))
        .flatten()
        .and_then(|fields| fields.name.as_deref());
    Some(edited.unwrap_or(ingredient.name.as_str()).trim().to_string())
}

fn check_unique_names(snapshot: &Snapshot, form: &FormRows) -> Result<(), ValidationError> {
    let stored: Vec<(&Ingredient, String)> = snapshot
        .ingredients
        .iter()
        .filter_map(|ingredient| {
            final_ingredient_name(snapshot, form, ingredient).map(|name| (ingredient, name))
        })
        .collect();
    if has_duplicates(
        stored
            .iter()
            .map(|(_, name)| name.as_str())
            .filter(|name| !name.is_empty()),
    ) {
        return Err(ValidationError::IngredientNameTaken);
    }

    let new_names: Vec<&str> = form
        .new_ingredients
        .values()
        .filter_map(|row| row.filled_name())
        .collect();
    if has_duplicates(new_names.iter().copied()) {
        return Err(ValidationError::IngredientNameTaken);
    }

    // A new row may only name a stored ingredient that keeps its name, and
    // only when it's being added to a recipe.
    for name in new_names.iter() {
        let Some((ingredient, _)) = stored.iter().find(|(_, final_name)| final_name == name) else {
            continue;
        };
        if ingredient.name != *name || !snapshot.target.is_recipe() {
            return Err(ValidationError::IngredientNameTaken);
        }
    }

    // A recipe can't list the same ingredient twice.
    if let Target::Recipe { pairings, .. } = &snapshot.target {
        let paired: HashSet<String> = pairings
            .iter()
            .filter(|ingredient| !form.unpaired_ingredients.contains(&ingredient.id))
            .filter_map(|ingredient| final_ingredient_name(snapshot, form, ingredient))
            .collect();
        if new_names.iter().any(|name| paired.contains(*name)) {
            return Err(ValidationError::IngredientNameTaken);
        }
    }

    Ok(())
}

fn has_duplicates<'a>(names: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return true;
        }
    }
    false
}

/// Digits, at most one `.` and at most one `$`.
pub fn is_well_formed_cost(cost: &str) -> bool {
    cost.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '$')
        && cost.matches('$').count() <= 1
        && cost.matches('.').count() <= 1
        && Quantity::parse_cost(cost).is_ok()
}

/// Digits and spaces with at most one `.` or `/` in total.
pub fn is_well_formed_amount(amount: &str) -> bool {
    amount
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '/' || c == ' ')
        && amount.chars().filter(|c| *c == '.' || *c == '/').count() <= 1
        && Quantity::parse(amount).is_ok()
}

const ALLOWED_CREDENTIAL_SYMBOLS: &str = "!@#%&$*^";

fn is_well_formed_credential(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || ALLOWED_CREDENTIAL_SYMBOLS.contains(c))
}

pub fn validate_signup(
    username: &str,
    password: &str,
    confirm_password: &str,
    username_taken: bool,
) -> Result<(), ValidationError> {
    if username.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingSignupField);
    }
    if username_taken {
        return Err(ValidationError::UsernameTaken);
    }
    if !is_well_formed_credential(username) {
        return Err(ValidationError::MalformedUsername);
    }
    if !is_well_formed_credential(password) {
        return Err(ValidationError::MalformedPassword);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        form::FormData,
        schema::{Recipe, Step},
    };
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> FormRows {
        let data: FormData = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        FormRows::from(data)
    }

    fn new_recipe(recipes: &[Recipe], pairs: &[(&str, &str)]) -> Result<(), ValidationError> {
        let snapshot = Snapshot {
            user_id: 1,
            recipes,
            ingredients: &[],
            target: Target::NewRecipe,
        };
        validate(&snapshot, &form(pairs))
    }

    #[test]
    fn recipe_name_rules() {
        assert_eq!(
            new_recipe(&[], &[("recipe_name", "  ")]),
            Err(ValidationError::RecipeNameLength)
        );
        let long = "a".repeat(36);
        assert_eq!(
            new_recipe(&[], &[("recipe_name", long.as_str())]),
            Err(ValidationError::RecipeNameLength)
        );
        let toast = [Recipe::new(1, 1, "Toast", None)];
        assert_eq!(
            new_recipe(&toast, &[("recipe_name", "Toast")]),
            Err(ValidationError::RecipeNameTaken)
        );
        assert_eq!(new_recipe(&toast, &[("recipe_name", "Bagel")]), Ok(()));
    }

    #[test]
    fn keeping_the_recipes_own_name_is_allowed() {
        let recipe = Recipe::new(1, 1, "Toast", None);
        let recipes = vec![recipe.clone()];
        let steps = vec![Step::new(1, 1, "Toast the bread", None)];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &recipes,
            ingredients: &[],
            target: Target::Recipe {
                recipe: &recipe,
                pairings: &[],
                steps: &steps,
            },
        };

        assert_eq!(validate(&snapshot, &form(&[("recipe_name", "Toast")])), Ok(()));
        assert_eq!(
            validate(&snapshot, &form(&[("1_step_direction", "")])),
            Err(ValidationError::DirectionLength)
        );
    }

    #[test]
    fn step_rules() {
        assert_eq!(
            new_recipe(
                &[],
                &[("recipe_name", "Toast"), ("1_new_step_notes", "golden brown")]
            ),
            Err(ValidationError::NotesWithoutDirection)
        );
        let long = "a".repeat(101);
        assert_eq!(
            new_recipe(
                &[],
                &[("recipe_name", "Toast"), ("1_new_step_direction", long.as_str())]
            ),
            Err(ValidationError::DirectionLength)
        );
        assert_eq!(
            new_recipe(
                &[],
                &[("recipe_name", "Toast"), ("1_new_step_direction", "")]
            ),
            Ok(())
        );
    }

    #[test]
    fn ingredient_rules() {
        let cases = [
            (
                vec![("1_new_ingredient_name", "egg"), ("2_new_ingredient_name", "egg")],
                ValidationError::IngredientNameTaken,
            ),
            (
                vec![("1_new_ingredient_cost", "3")],
                ValidationError::OrphanedCost,
            ),
            (
                vec![("1_new_ingredient_amount_in_recipe", "2")],
                ValidationError::OrphanedAmount,
            ),
            (
                vec![("1_new_ingredient_number_per_purchase", "12")],
                ValidationError::OrphanedNumberPerPurchase,
            ),
            (
                vec![("1_new_ingredient_cost", "five"), ("1_new_ingredient_name", "egg")],
                ValidationError::MalformedCost,
            ),
            (
                vec![
                    ("1_new_ingredient_name", "flour"),
                    ("1_new_ingredient_amount_in_recipe", "2 cups"),
                ],
                ValidationError::MalformedAmount,
            ),
        ];

        for (pairs, expected) in cases {
            let mut pairs = pairs;
            pairs.push(("recipe_name", "Toast"));
            assert_eq!(new_recipe(&[], &pairs), Err(expected));
        }

        let long = "a".repeat(101);
        assert_eq!(
            new_recipe(
                &[],
                &[("recipe_name", "Toast"), ("1_new_ingredient_name", long.as_str())]
            ),
            Err(ValidationError::IngredientNameLength)
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        assert_eq!(
            new_recipe(
                &[],
                &[
                    ("recipe_name", ""),
                    ("1_new_ingredient_cost", "3"),
                    ("1_new_step_notes", "stir"),
                ]
            ),
            Err(ValidationError::RecipeNameLength)
        );
        assert_eq!(
            new_recipe(
                &[],
                &[
                    ("recipe_name", "Toast"),
                    ("1_new_ingredient_cost", "3"),
                    ("1_new_step_notes", "stir"),
                ]
            ),
            Err(ValidationError::NotesWithoutDirection)
        );
        assert_eq!(
            new_recipe(
                &[],
                &[
                    ("recipe_name", "Toast"),
                    ("1_new_ingredient_name", "egg"),
                    ("2_new_ingredient_name", "egg"),
                    ("3_new_ingredient_amount_in_pantry", "2"),
                    ("1_new_ingredient_cost", "five"),
                ]
            ),
            Err(ValidationError::IngredientNameTaken)
        );
        assert_eq!(
            new_recipe(
                &[],
                &[
                    ("recipe_name", "Toast"),
                    ("1_new_ingredient_amount_in_recipe", "2"),
                    ("2_new_ingredient_number_per_purchase", "12"),
                    ("3_new_ingredient_cost", "1"),
                ]
            ),
            Err(ValidationError::OrphanedCost)
        );
    }

    #[test]
    fn cost_format() {
        assert!(is_well_formed_cost("$5.50"));
        assert!(is_well_formed_cost("3"));
        assert!(!is_well_formed_cost("$$5"));
        assert!(!is_well_formed_cost("5.5.0"));
        assert!(!is_well_formed_cost("five"));
        assert!(!is_well_formed_cost("$."));
    }

    #[test]
    fn amount_format() {
        assert!(is_well_formed_amount("1 1/2"));
        assert!(is_well_formed_amount("0.5"));
        assert!(is_well_formed_amount("30"));
        assert!(!is_well_formed_amount("1.5/2"));
        assert!(!is_well_formed_amount("1/2/3"));
        assert!(!is_well_formed_amount("2 cups"));
        assert!(!is_well_formed_amount("1/0"));
        assert!(!is_well_formed_amount("1\t1/2"));
    }

    #[test]
    fn signup_rules_in_order() {
        assert_eq!(
            validate_signup("", "", "", true),
            Err(ValidationError::MissingSignupField)
        );
        assert_eq!(
            validate_signup("admin", "secret", "secret", true),
            Err(ValidationError::UsernameTaken)
        );
        assert_eq!(
            validate_signup("ad min", "secret", "secret", false),
            Err(ValidationError::MalformedUsername)
        );
        assert_eq!(
            validate_signup("admin", "sec ret", "sec ret", false),
            Err(ValidationError::MalformedPassword)
        );
        assert_eq!(
            validate_signup("admin", "secret", "secret!", false),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(validate_signup("admin", "s3cr^t!", "s3cr^t!", false), Ok(()));
    }
}
