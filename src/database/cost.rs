use super::{quantity::Quantity, schema::Ingredient};

pub fn ingredient_cost(ingredient: &Ingredient) -> Option<&Quantity> {
    ingredient.cost.as_ref()
}

/// Cost of one recipe line. Unknown cost or amount leaves the line unknown
/// rather than free.
pub fn line_cost(ingredient: &Ingredient, amount_in_recipe: Option<&Quantity>) -> Option<Quantity> {
    match (ingredient_cost(ingredient), amount_in_recipe) {
        (Some(cost), Some(amount)) => Some(cost * amount),
        _ => None,
    }
}

/// Total of every known line cost of a recipe; unknown lines count as zero.
pub fn recipe_cost<'a, I>(pairings: I) -> Quantity
where
    I: IntoIterator<Item = &'a Ingredient>,
{
    pairings
        .into_iter()
        .filter_map(|ingredient| line_cost(ingredient, ingredient.amount_in_recipe.as_ref()))
        .sum()
}

/// Unit cost after splitting a purchase into `number_per_purchase` pieces.
/// Missing, non-numeric or zero counts leave the cost unchanged.
pub fn purchase_normalized_cost(cost: Quantity, number_per_purchase: Option<&str>) -> Quantity {
    let count = number_per_purchase
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .and_then(|n| Quantity::parse(n).ok());

    match count {
        Some(count) => cost.checked_div(&count).unwrap_or(cost),
        None => cost,
    }
}

/// "$12.00"; nothing for zero or negative values.
pub fn formatted_cost(value: &Quantity) -> Option<String> {
    if !value.is_positive() {
        return None;
    }
    Some(format!("${}", value.to_decimal(2)))
}

pub fn formatted_line_cost(ingredient: &Ingredient) -> Option<String> {
    line_cost(ingredient, ingredient.amount_in_recipe.as_ref())
        .as_ref()
        .and_then(formatted_cost)
}
