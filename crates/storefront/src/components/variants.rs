//! Variant resolution from option selections.

use std::collections::BTreeMap;

use serde::Serialize;
use wix_headless_core::{ChoiceId, OptionId};

use crate::wix::{Product, Variant};

/// Selected choice per option.
pub type Selection = BTreeMap<OptionId, ChoiceId>;

/// Variant whose choices are exactly the selection.
///
/// Every choice of the variant must be selected and the variant must have
/// as many choices as the selection has entries.
#[must_use]
pub fn find_exact_variant<'a>(variants: &'a [Variant], selection: &Selection) -> Option<&'a Variant> {
    variants.iter().find(|variant| {
        let mut count = 0;
        let all_match = variant.choice_ids().all(|(option, choice)| {
            count += 1;
            selection.get(option) == Some(choice)
        });
        all_match && count == selection.len()
    })
}

/// Variant for a selection, falling back to the first variant.
///
/// Returns `None` only when the product has no variants.
#[must_use]
pub fn resolve_variant<'a>(variants: &'a [Variant], selection: &Selection) -> Option<&'a Variant> {
    find_exact_variant(variants, selection).or_else(|| variants.first())
}

/// Choices of a variant as a selection.
#[must_use]
pub fn selection_of(variant: &Variant) -> Selection {
    variant
        .choice_ids()
        .map(|(option, choice)| (option.clone(), choice.clone()))
        .collect()
}

/// Initial selection: the first visible purchasable variant, else the first variant.
#[must_use]
pub fn default_selection(product: &Product) -> Selection {
    let variants = product.variants();
    variants
        .iter()
        .find(|v| v.visible != Some(false) && v.is_purchasable())
        .or_else(|| variants.first())
        .map(selection_of)
        .unwrap_or_default()
}

/// Whether one choice of an option can be picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceAvailability {
    pub choice_id: ChoiceId,
    /// A visible variant exists for the resulting selection.
    pub exists: bool,
    /// That variant can be bought.
    pub available: bool,
}

/// Availability of each choice of `option_id`, keeping the other selections.
///
/// `is_available` decides stock for a variant, so live inventory can
/// override the catalog flags.
pub fn choice_availability<F>(
    product: &Product,
    selection: &Selection,
    option_id: &OptionId,
    is_available: F,
) -> Vec<ChoiceAvailability>
where
    F: Fn(&Variant) -> bool,
{
    let Some(option) = product.options.iter().find(|o| &o.id == option_id) else {
        return Vec::new();
    };

    option
        .choices()
        .iter()
        .filter(|c| c.visible != Some(false))
        .map(|choice| {
            let mut candidate = selection.clone();
            candidate.insert(option_id.clone(), choice.choice_id.clone());
            let variant = find_exact_variant(product.variants(), &candidate)
                .filter(|v| v.visible != Some(false));
            ChoiceAvailability {
                choice_id: choice.choice_id.clone(),
                exists: variant.is_some(),
                available: variant.is_some_and(&is_available),
            }
        })
        .collect()
}
