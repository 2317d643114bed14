use std::collections::BTreeSet;

use serde::Serialize;

use super::{
    cost::purchase_normalized_cost,
    error::ValidationError,
    form::{filled, FormRows, IngredientFields, StepFields},
    quantity::Quantity,
    schema::{normalized_notes, Ingredient, Recipe, Step, Uuid},
    validation::{final_ingredient_name, submitted_recipe_name, validate},
};

/// What a submission edits.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    NewRecipe,
    Recipe {
        recipe: &'a Recipe,
        /// The recipe's ingredients, each carrying its `amount_in_recipe`.
        pairings: &'a [Ingredient],
        steps: &'a [Step],
    },
    Pantry,
}

impl<'a> Target<'a> {
    pub fn is_recipe(&self) -> bool {
        !matches!(self, Target::Pantry)
    }

    pub fn recipe(&self) -> Option<&'a Recipe> {
        match *self {
            Target::Recipe { recipe, .. } => Some(recipe),
            _ => None,
        }
    }

    pub fn steps(&self) -> &'a [Step] {
        match *self {
            Target::Recipe { steps, .. } => steps,
            _ => &[],
        }
    }

    pub fn pairings(&self) -> &'a [Ingredient] {
        match *self {
            Target::Recipe { pairings, .. } => pairings,
            _ => &[],
        }
    }

    /// Stored ingredients whose fields the form may edit.
    pub fn editable_ingredients(&self, pantry: &'a [Ingredient]) -> &'a [Ingredient] {
        match *self {
            Target::NewRecipe => &[],
            Target::Recipe { pairings, .. } => pairings,
            Target::Pantry => pantry,
        }
    }
}

/// Everything the engine needs to know about the user's current data.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub user_id: Uuid,
    pub recipes: &'a [Recipe],
    pub ingredients: &'a [Ingredient],
    pub target: Target<'a>,
}

impl<'a> Snapshot<'a> {
    fn owns_ingredient(&self, id: Uuid) -> bool {
        self.ingredients.iter().any(|ingredient| ingredient.id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RecipeChange {
    Create { name: String },
    Update(Recipe),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewIngredient {
    pub name: String,
    pub cost: Option<Quantity>,
    pub amount_in_pantry: Option<Quantity>,
}

/// Ingredients created by the same submission don't have an id yet and are
/// referenced by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum IngredientRef {
    Existing(Uuid),
    New(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PairRequest {
    pub ingredient: IngredientRef,
    pub amount_in_recipe: Option<Quantity>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewStep {
    pub direction: String,
    pub notes: Option<String>,
}

/// Writes resulting from one submission. Pairings and steps always belong to
/// the submission's target recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OperationSet {
    pub recipe: Option<RecipeChange>,
    pub create_ingredients: Vec<NewIngredient>,
    pub pair_ingredients: Vec<PairRequest>,
    pub update_ingredients: Vec<Ingredient>,
    pub delete_ingredients: Vec<Uuid>,
    pub unpair_ingredients: Vec<Uuid>,
    pub create_steps: Vec<NewStep>,
    pub update_steps: Vec<Step>,
    pub delete_steps: Vec<Uuid>,
}

impl OperationSet {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Notice {
    /// Submitted costs that lost to the cost already in the pantry.
    CostMismatch { ingredients: Vec<String> },
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::CostMismatch { .. } => {
                "One or more added ingredients had a different listed cost than the ingredient's \
                 cost in your pantry. They have defaulted to the cost listed in your pantry. To \
                 update the ingredients' cost for all recipes, go to your pantry."
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub operations: OperationSet,
    pub notice: Option<Notice>,
}

/// Turns a parsed form into the writes it asks for. Validation runs first;
/// a rejected form yields no operations at all.
pub fn reconcile(
    snapshot: &Snapshot,
    form: &FormRows,
) -> Result<Reconciliation, ValidationError> {
    validate(snapshot, form)?;

    let mut operations = OperationSet {
        recipe: recipe_change(snapshot, form),
        ..OperationSet::default()
    };

    let mismatched = extract_new_ingredients(snapshot, form, &mut operations);
    if snapshot.target.is_recipe() {
        operations.create_steps = extract_new_steps(form);
    }

    operations.update_ingredients = edited_ingredients(snapshot, form);
    operations.update_steps = edited_steps(snapshot, form);

    detect_removals(snapshot, form, &mut operations);

    let notice = (snapshot.target.is_recipe() && !mismatched.is_empty())
        .then(|| Notice::CostMismatch {
            ingredients: mismatched,
        });

    log::trace!(
        "> Reconciled form for user {}: {} created, {} paired, {} updated, {} deleted",
        snapshot.user_id,
        operations.create_ingredients.len(),
        operations.pair_ingredients.len(),
        operations.update_ingredients.len() + operations.update_steps.len(),
        operations.delete_ingredients.len() + operations.delete_steps.len(),
    );

    Ok(Reconciliation { operations, notice })
}

fn recipe_change(snapshot: &Snapshot, form: &FormRows) -> Option<RecipeChange> {
    let name = submitted_recipe_name(snapshot, form)?;
    match snapshot.target {
        Target::NewRecipe => Some(RecipeChange::Create {
            name: name.to_string(),
        }),
        Target::Recipe { recipe, .. } => {
            let mut updated = recipe.clone();
            updated.set_name(name);
            (&updated != recipe).then_some(RecipeChange::Update(updated))
        }
        Target::Pantry => None,
    }
}

fn parsed_cost(value: &Option<String>) -> Option<Quantity> {
    filled(value).and_then(|cost| Quantity::parse_cost(cost).ok())
}

fn parsed_amount(value: &Option<String>) -> Option<Quantity> {
    filled(value).and_then(|amount| Quantity::parse(amount).ok())
}

/// Collects creations and pairings for every named new-ingredient row.
/// Returns the names whose submitted cost lost to an existing pantry cost.
fn extract_new_ingredients(
    snapshot: &Snapshot,
    form: &FormRows,
    operations: &mut OperationSet,
) -> Vec<String> {
    let mut mismatched = Vec::new();

    for row in form.new_ingredients.values() {
        let Some(name) = row.filled_name() else {
            continue;
        };

        let submitted_cost = parsed_cost(&row.cost).and_then(Quantity::normalized);

        // validation only lets a new row reach a stored ingredient that keeps
        // its name
        let existing = snapshot.ingredients.iter().find(|ingredient| {
            final_ingredient_name(snapshot, form, ingredient).as_deref() == Some(name)
        });

        let ingredient = match existing {
            Some(existing) => {
                if submitted_cost.is_some() && submitted_cost != existing.cost {
                    mismatched.push(existing.name.to_owned());
                }
                IngredientRef::Existing(existing.id)
            }
            None => {
                let cost = submitted_cost.and_then(|cost| {
                    purchase_normalized_cost(cost, row.number_per_purchase.as_deref())
                        .normalized()
                });
                operations.create_ingredients.push(NewIngredient {
                    name: name.to_string(),
                    cost,
                    amount_in_pantry: parsed_amount(&row.amount_in_pantry)
                        .and_then(Quantity::normalized),
                });
                IngredientRef::New(name.to_string())
            }
        };

        if snapshot.target.is_recipe() {
            operations.pair_ingredients.push(PairRequest {
                ingredient,
                amount_in_recipe: parsed_amount(&row.amount_in_recipe)
                    .and_then(Quantity::normalized),
            });
        }
    }

    mismatched
}

fn extract_new_steps(form: &FormRows) -> Vec<NewStep> {
    form.new_steps
        .values()
        .filter_map(|row| {
            let direction = row.filled_direction()?;
            Some(NewStep {
                direction: direction.to_string(),
                notes: normalized_notes(row.notes.as_deref()),
            })
        })
        .collect()
}

fn apply_ingredient_fields(
    ingredient: &mut Ingredient,
    fields: &IngredientFields,
    in_recipe: bool,
) {
    if let Some(name) = &fields.name {
        ingredient.set_name(name);
    }
    if fields.cost.is_some() {
        ingredient.set_cost(parsed_cost(&fields.cost));
    }
    if fields.amount_in_pantry.is_some() {
        ingredient.set_amount_in_pantry(parsed_amount(&fields.amount_in_pantry));
    }
    if in_recipe && fields.amount_in_recipe.is_some() {
        ingredient.set_amount_in_recipe(parsed_amount(&fields.amount_in_recipe));
    }
}

fn apply_step_fields(step: &mut Step, fields: &StepFields) {
    if let Some(direction) = &fields.direction {
        step.set_direction(direction);
    }
    if fields.notes.is_some() {
        step.set_notes(fields.notes.as_deref());
    }
}

/// Applies submitted fields to a copy of each stored ingredient and keeps the
/// copies that actually changed.
fn edited_ingredients(snapshot: &Snapshot, form: &FormRows) -> Vec<Ingredient> {
    let in_recipe = matches!(snapshot.target, Target::Recipe { .. });

    snapshot
        .target
        .editable_ingredients(snapshot.ingredients)
        .iter()
        .filter(|ingredient| !form.deleted_ingredients.contains(&ingredient.id))
        .filter_map(|original| {
            let fields = form.ingredient_edits.get(&original.id)?;
            let mut ingredient = original.clone();
            apply_ingredient_fields(&mut ingredient, fields, in_recipe);
            (&ingredient != original).then_some(ingredient)
        })
        .collect()
}

fn edited_steps(snapshot: &Snapshot, form: &FormRows) -> Vec<Step> {
    snapshot
        .target
        .steps()
        .iter()
        .filter(|step| !form.deleted_steps.contains(&step.id))
        .filter_map(|original| {
            let fields = form.step_edits.get(&original.id)?;
            let mut step = original.clone();
            apply_step_fields(&mut step, fields);
            (&step != original).then_some(step)
        })
        .collect()
}

/// Deletions and unpairings by marker presence. Ids outside the snapshot are
/// ignored. Deleting an ingredient that is paired to the target recipe also
/// unpairs it.
fn detect_removals(snapshot: &Snapshot, form: &FormRows, operations: &mut OperationSet) {
    operations.delete_ingredients = form
        .deleted_ingredients
        .iter()
        .copied()
        .filter(|id| snapshot.owns_ingredient(*id))
        .collect();

    let paired: BTreeSet<Uuid> = snapshot
        .target
        .pairings()
        .iter()
        .map(|ingredient| ingredient.id)
        .collect();

    operations.unpair_ingredients = form
        .unpaired_ingredients
        .iter()
        .chain(operations.delete_ingredients.iter())
        .filter(|id| paired.contains(id))
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let steps: BTreeSet<Uuid> = snapshot.target.steps().iter().map(|step| step.id).collect();
    operations.delete_steps = form
        .deleted_steps
        .iter()
        .copied()
        .filter(|id| steps.contains(id))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::form::FormData;
    use serde_json::json;

    fn form(pairs: &[(&str, &str)]) -> FormRows {
        let data: FormData = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        FormRows::from(data)
    }

    fn q(text: &str) -> Quantity {
        Quantity::parse(text).unwrap()
    }

    fn pantry() -> Vec<Ingredient> {
        vec![
            Ingredient::new(1, 1, "pack of sliced ham", Some(q("3.99")), None),
            Ingredient::new(2, 1, "slice of bread", Some(q("0.17")), Some(q("30"))),
            Ingredient::new(3, 1, "jar of mayonnaise", Some(q("5.69")), Some(q("1"))),
            Ingredient::new(4, 1, "pack of turkey", Some(q("4.99")), Some(q("2/3"))),
            Ingredient::new(5, 1, "egg", Some(q("4.99")), None),
        ]
    }

    fn ham_sandwich() -> (Recipe, Vec<Ingredient>, Vec<Step>) {
        let pantry = pantry();
        let recipe = Recipe::new(1, 1, "Ham Sandwich", None);
        let pairings = vec![
            pantry[0].clone().with_amount_in_recipe(Some(q("1/5"))),
            pantry[1].clone().with_amount_in_recipe(Some(q("2"))),
            pantry[2].clone(),
        ];
        let steps = vec![Step::new(
            1,
            1,
            "Assemble sandwich",
            Some("You should be able to figure it out."),
        )];
        (recipe, pairings, steps)
    }

    fn unchanged_recipe_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("recipe_name", "Ham Sandwich"),
            ("1_ingredient_amount_in_recipe", "1/5"),
            ("2_ingredient_amount_in_recipe", "2"),
            ("3_ingredient_amount_in_recipe", ""),
            ("1_step_direction", "Assemble sandwich"),
            ("1_step_notes", "You should be able to figure it out."),
        ]
    }

    #[test]
    fn resubmitting_unchanged_values_is_a_no_op() {
        let pantry = pantry();
        let (recipe, pairings, steps) = ham_sandwich();
        let recipes = vec![recipe.clone()];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &recipes,
            ingredients: &pantry,
            target: Target::Recipe {
                recipe: &recipe,
                pairings: &pairings,
                steps: &steps,
            },
        };

        let result = reconcile(&snapshot, &form(&unchanged_recipe_form())).unwrap();
        assert!(result.operations.is_empty());
        assert_eq!(result.notice, None);
    }

    #[test]
    fn edits_emit_only_changed_rows() {
        let pantry = pantry();
        let (recipe, pairings, steps) = ham_sandwich();
        let recipes = vec![recipe.clone()];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &recipes,
            ingredients: &pantry,
            target: Target::Recipe {
                recipe: &recipe,
                pairings: &pairings,
                steps: &steps,
            },
        };

        let mut fields = unchanged_recipe_form();
        fields.retain(|(key, _)| !key.starts_with("2_") && !key.starts_with("1_step"));
        fields.push(("2_ingredient_amount_in_recipe", "3"));
        fields.push(("1_step_direction", "test1"));
        fields.push(("1_step_notes", "test2"));

        let operations = reconcile(&snapshot, &form(&fields)).unwrap().operations;
        assert_eq!(operations.update_ingredients.len(), 1);
        assert_eq!(operations.update_ingredients[0].id, 2);
        assert_eq!(operations.update_ingredients[0].amount_in_recipe, Some(q("3")));
        assert_eq!(operations.update_steps.len(), 1);
        assert_eq!(operations.update_steps[0].direction, "test1");
        assert_eq!(operations.update_steps[0].notes.as_deref(), Some("test2"));
        assert_eq!(operations.recipe, None);
    }

    #[test]
    fn renaming_the_recipe_updates_it() {
        let pantry = pantry();
        let (recipe, pairings, steps) = ham_sandwich();
        let recipes = vec![recipe.clone()];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &recipes,
            ingredients: &pantry,
            target: Target::Recipe {
                recipe: &recipe,
                pairings: &pairings,
                steps: &steps,
            },
        };

        let operations = reconcile(&snapshot, &form(&[("recipe_name", " test ")]))
            .unwrap()
            .operations;
        match operations.recipe {
            Some(RecipeChange::Update(updated)) => assert_eq!(updated.name, "test"),
            other => panic!("expected a rename, got {other:?}"),
        }
    }

    #[test]
    fn new_rows_create_or_reference_ingredients() {
        let pantry = pantry();
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::NewRecipe,
        };

        let result = reconcile(
            &snapshot,
            &form(&[
                ("recipe_name", "test1"),
                ("1_new_ingredient_name", "test2"),
                ("1_new_ingredient_cost", "3"),
                ("1_new_ingredient_amount_in_recipe", "4"),
                ("2_new_ingredient_name", "pack of turkey"),
                ("2_new_ingredient_cost", ""),
                ("2_new_ingredient_amount_in_recipe", "1/3"),
                ("3_new_ingredient_name", ""),
            ]),
        )
        .unwrap();

        let operations = result.operations;
        assert_eq!(
            operations.recipe,
            Some(RecipeChange::Create {
                name: String::from("test1")
            })
        );
        assert_eq!(
            operations.create_ingredients,
            vec![NewIngredient {
                name: String::from("test2"),
                cost: Some(q("3")),
                amount_in_pantry: None,
            }]
        );
        assert_eq!(
            operations.pair_ingredients,
            vec![
                PairRequest {
                    ingredient: IngredientRef::New(String::from("test2")),
                    amount_in_recipe: Some(q("4")),
                },
                PairRequest {
                    ingredient: IngredientRef::Existing(4),
                    amount_in_recipe: Some(q("1/3")),
                },
            ]
        );
        assert_eq!(result.notice, None);
    }

    #[test]
    fn existing_cost_wins_with_a_notice() {
        let pantry = pantry();
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::NewRecipe,
        };

        let result = reconcile(
            &snapshot,
            &form(&[
                ("recipe_name", "Omelette"),
                ("1_new_ingredient_name", "egg"),
                ("1_new_ingredient_cost", "$5.50"),
            ]),
        )
        .unwrap();

        assert!(result.operations.create_ingredients.is_empty());
        assert_eq!(
            result.operations.pair_ingredients[0].ingredient,
            IngredientRef::Existing(5)
        );
        assert_eq!(
            result.notice,
            Some(Notice::CostMismatch {
                ingredients: vec![String::from("egg")]
            })
        );
    }

    #[test]
    fn pantry_rows_apply_purchase_counts() {
        let pantry = pantry();
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::Pantry,
        };

        let operations = reconcile(
            &snapshot,
            &form(&[
                ("1_new_ingredient_name", "test"),
                ("1_new_ingredient_cost", "3"),
                ("1_new_ingredient_amount_in_pantry", "4"),
                ("1_new_ingredient_number_per_purchase", "2"),
            ]),
        )
        .unwrap()
        .operations;

        assert_eq!(
            operations.create_ingredients,
            vec![NewIngredient {
                name: String::from("test"),
                cost: Some(q("1.5")),
                amount_in_pantry: Some(q("4")),
            }]
        );
        assert!(operations.pair_ingredients.is_empty());
        assert_eq!(operations.recipe, None);
    }

    #[test]
    fn pantry_edits_ignore_recipe_amounts() {
        let pantry = pantry();
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::Pantry,
        };

        let operations = reconcile(
            &snapshot,
            &form(&[
                ("1_ingredient_name", "test"),
                ("1_ingredient_cost", "3"),
                ("1_ingredient_amount_in_pantry", "4"),
                ("2_ingredient_amount_in_recipe", "7"),
            ]),
        )
        .unwrap()
        .operations;

        assert_eq!(operations.update_ingredients.len(), 1);
        let edited = &operations.update_ingredients[0];
        assert_eq!(edited.name, "test");
        assert_eq!(edited.cost, Some(q("3")));
        assert_eq!(edited.amount_in_pantry, Some(q("4")));
    }

    #[test]
    fn deleting_a_paired_ingredient_also_unpairs_it() {
        let pantry = pantry();
        let (recipe, pairings, steps) = ham_sandwich();
        let recipes = vec![recipe.clone()];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &recipes,
            ingredients: &pantry,
            target: Target::Recipe {
                recipe: &recipe,
                pairings: &pairings,
                steps: &steps,
            },
        };

        let operations = reconcile(
            &snapshot,
            &form(&[
                ("1_ingredient_delete", "on"),
                ("1_ingredient_amount_in_recipe", "9"),
                ("3_ingredient_unpair", "on"),
                ("99_ingredient_delete", "on"),
                ("1_step_delete", "on"),
                ("7_step_delete", "on"),
            ]),
        )
        .unwrap()
        .operations;

        assert_eq!(operations.delete_ingredients, vec![1]);
        assert_eq!(operations.unpair_ingredients, vec![1, 3]);
        assert_eq!(operations.delete_steps, vec![1]);
        assert!(operations.update_ingredients.is_empty());
    }

    #[test]
    fn any_violation_rejects_everything() {
        let pantry = pantry();
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::Pantry,
        };

        let result = reconcile(
            &snapshot,
            &form(&[
                ("1_new_ingredient_name", "butter"),
                ("2_new_ingredient_cost", "3"),
                ("3_new_ingredient_name", "milk"),
                ("3_new_ingredient_amount_in_pantry", "a lot"),
            ]),
        );
        assert_eq!(result, Err(ValidationError::OrphanedCost));
    }

    #[test]
    fn new_row_cannot_take_a_renamed_ingredients_name() {
        let pantry = vec![Ingredient::new(1, 1, "salt", None, None)];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::Pantry,
        };

        let result = reconcile(
            &snapshot,
            &form(&[
                ("1_ingredient_name", "pepper"),
                ("1_new_ingredient_name", "pepper"),
            ]),
        );
        assert_eq!(result, Err(ValidationError::IngredientNameTaken));
    }

    #[test]
    fn new_row_with_a_renamed_ingredients_old_name_creates_it() {
        let pantry = pantry();
        let (recipe, pairings, steps) = ham_sandwich();
        let recipes = vec![recipe.clone()];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &recipes,
            ingredients: &pantry,
            target: Target::Recipe {
                recipe: &recipe,
                pairings: &pairings,
                steps: &steps,
            },
        };

        let operations = reconcile(
            &snapshot,
            &form(&[
                ("1_ingredient_name", "pack of smoked ham"),
                ("1_new_ingredient_name", "pack of sliced ham"),
            ]),
        )
        .unwrap()
        .operations;

        assert_eq!(operations.update_ingredients.len(), 1);
        assert_eq!(operations.update_ingredients[0].name, "pack of smoked ham");
        assert_eq!(
            operations.pair_ingredients,
            vec![PairRequest {
                ingredient: IngredientRef::New(String::from("pack of sliced ham")),
                amount_in_recipe: None,
            }]
        );
        assert_eq!(operations.create_ingredients.len(), 1);
    }

    #[test]
    fn pantry_rows_cannot_repeat_a_stored_name() {
        let pantry = vec![Ingredient::new(1, 1, "egg", Some(q("4.99")), None)];
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::Pantry,
        };

        let result = reconcile(
            &snapshot,
            &form(&[
                ("1_ingredient_name", "egg"),
                ("1_new_ingredient_name", "egg"),
                ("1_new_ingredient_cost", "5"),
                ("1_new_ingredient_amount_in_pantry", "12"),
            ]),
        );
        assert_eq!(result, Err(ValidationError::IngredientNameTaken));
    }

    #[test]
    fn cost_mismatch_compares_the_listed_cost() {
        let pantry = pantry();
        let snapshot = Snapshot {
            user_id: 1,
            recipes: &[],
            ingredients: &pantry,
            target: Target::NewRecipe,
        };

        // 9.98 for two would be 4.99 each, but the listed cost still differs
        let result = reconcile(
            &snapshot,
            &form(&[
                ("recipe_name", "Omelette"),
                ("1_new_ingredient_name", "egg"),
                ("1_new_ingredient_cost", "9.98"),
                ("1_new_ingredient_number_per_purchase", "2"),
            ]),
        )
        .unwrap();

        assert!(result.operations.create_ingredients.is_empty());
        assert_eq!(
            result.notice,
            Some(Notice::CostMismatch {
                ingredients: vec![String::from("egg")]
            })
        );
    }
}
