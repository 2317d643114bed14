use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet, HashMap},
};

use serde_json::Value;

use super::schema::Uuid;

pub type FormData = HashMap<String, Value>;

pub struct Form {
    inner: HashMap<String, Value>,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    pub fn get_optional_str(&self, key: &str) -> Option<String> {
        self.inner.get(key).and_then(value_text)
    }

    /// Groups every row-addressed key into [`FormRows`]. Keys that don't
    /// follow one of the row schemes are ignored.
    pub fn rows(&self) -> FormRows {
        let mut rows = FormRows {
            recipe_name: self.get_optional_str(RECIPE_NAME_KEY),
            ..FormRows::default()
        };

        for (key, value) in self.inner.iter() {
            let Some(key) = FormKey::parse(key) else {
                continue;
            };

            match key {
                FormKey::NewIngredient(token, field) => {
                    let row = rows.new_ingredients.entry(token).or_default();
                    row.set(field, value_text(value));
                }
                FormKey::NewStep(token, field) => {
                    let row = rows.new_steps.entry(token).or_default();
                    row.set(field, value_text(value));
                }
                FormKey::Ingredient(id, field) => {
                    let row = rows.ingredient_edits.entry(id).or_default();
                    row.set(field, value_text(value));
                }
                FormKey::Step(id, field) => {
                    let row = rows.step_edits.entry(id).or_default();
                    row.set(field, value_text(value));
                }
                FormKey::DeleteIngredient(id) => {
                    rows.deleted_ingredients.insert(id);
                }
                FormKey::UnpairIngredient(id) => {
                    rows.unpaired_ingredients.insert(id);
                }
                FormKey::DeleteStep(id) => {
                    rows.deleted_steps.insert(id);
                }
            }
        }

        rows
    }
}

pub const RECIPE_NAME_KEY: &str = "recipe_name";

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Caller chosen token grouping the fields of one not yet persisted row.
/// Numeric tokens sort numerically and before any other token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RowToken(String);

impl RowToken {
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for RowToken {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for RowToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngredientField {
    Name,
    Cost,
    AmountInRecipe,
    AmountInPantry,
    NumberPerPurchase,
}

impl IngredientField {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "name" => Some(Self::Name),
            "cost" => Some(Self::Cost),
            "amount_in_recipe" => Some(Self::AmountInRecipe),
            "amount_in_pantry" => Some(Self::AmountInPantry),
            "number_per_purchase" => Some(Self::NumberPerPurchase),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepField {
    Direction,
    Notes,
}

impl StepField {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "direction" => Some(Self::Direction),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }
}

/*
<row>_new_ingredient_<field>     candidate ingredient row
<row>_new_step_<field>           candidate step row
<id>_ingredient_<field>          edit of a stored ingredient
<id>_step_<field>                edit of a stored step
<id>_ingredient_delete           presence only
<id>_ingredient_unpair           presence only
<id>_step_delete                 presence only
*/
#[derive(Clone, Debug, PartialEq, Eq)]
enum FormKey {
    NewIngredient(RowToken, IngredientField),
    NewStep(RowToken, StepField),
    Ingredient(Uuid, IngredientField),
    Step(Uuid, StepField),
    DeleteIngredient(Uuid),
    UnpairIngredient(Uuid),
    DeleteStep(Uuid),
}

impl FormKey {
    fn parse(key: &str) -> Option<Self> {
        let (prefix, rest) = key.split_once('_')?;
        if prefix.is_empty() {
            return None;
        }

        if let Some(suffix) = rest.strip_prefix("new_ingredient_") {
            return IngredientField::from_suffix(suffix)
                .map(|field| Self::NewIngredient(RowToken::new(prefix), field));
        }
        if let Some(suffix) = rest.strip_prefix("new_step_") {
            return StepField::from_suffix(suffix)
                .map(|field| Self::NewStep(RowToken::new(prefix), field));
        }

        let id: Uuid = prefix.parse().ok()?;

        if let Some(suffix) = rest.strip_prefix("ingredient_") {
            return match suffix {
                "delete" => Some(Self::DeleteIngredient(id)),
                "unpair" => Some(Self::UnpairIngredient(id)),
                _ => IngredientField::from_suffix(suffix).map(|field| Self::Ingredient(id, field)),
            };
        }
        if let Some(suffix) = rest.strip_prefix("step_") {
            return match suffix {
                "delete" => Some(Self::DeleteStep(id)),
                _ => StepField::from_suffix(suffix).map(|field| Self::Step(id, field)),
            };
        }

        None
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngredientFields {
    pub name: Option<String>,
    pub cost: Option<String>,
    pub amount_in_recipe: Option<String>,
    pub amount_in_pantry: Option<String>,
    pub number_per_purchase: Option<String>,
}

impl IngredientFields {
    fn set(&mut self, field: IngredientField, value: Option<String>) {
        match field {
            IngredientField::Name => self.name = value,
            IngredientField::Cost => self.cost = value,
            IngredientField::AmountInRecipe => self.amount_in_recipe = value,
            IngredientField::AmountInPantry => self.amount_in_pantry = value,
            IngredientField::NumberPerPurchase => self.number_per_purchase = value,
        }
    }

    /// Trimmed name, `None` when missing or blank.
    pub fn filled_name(&self) -> Option<&str> {
        filled(&self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepFields {
    pub direction: Option<String>,
    pub notes: Option<String>,
}

impl StepFields {
    fn set(&mut self, field: StepField, value: Option<String>) {
        match field {
            StepField::Direction => self.direction = value,
            StepField::Notes => self.notes = value,
        }
    }

    pub fn filled_direction(&self) -> Option<&str> {
        filled(&self.direction)
    }
}

/// Trimmed, non-empty value of an optional field.
pub fn filled(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// A submitted form, parsed once into per-row records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormRows {
    pub recipe_name: Option<String>,
    pub new_ingredients: BTreeMap<RowToken, IngredientFields>,
    pub new_steps: BTreeMap<RowToken, StepFields>,
    pub ingredient_edits: BTreeMap<Uuid, IngredientFields>,
    pub step_edits: BTreeMap<Uuid, StepFields>,
    pub deleted_ingredients: BTreeSet<Uuid>,
    pub unpaired_ingredients: BTreeSet<Uuid>,
    pub deleted_steps: BTreeSet<Uuid>,
}

impl From<FormData> for FormRows {
    fn from(data: FormData) -> Self {
        Form::from_data(data).rows()
    }
}
