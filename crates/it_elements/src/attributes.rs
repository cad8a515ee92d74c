//! Declarative attribute tables: one entry per observed attribute mapping the name to a parser
//! into the component state and the narrowest update path that keeps the fragment current.

use leptos::logging::debug_warn;

use crate::model::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Work performed after an attribute change has been applied to the state.
pub enum Update {
    /// Discard and rebuild the whole fragment.
    Render,
    /// Rebuild only the internal control element and sync its live properties.
    Patch,
    /// Re-apply accessibility attributes only.
    Accessibility,
    /// State-only attribute.
    Ignore,
}

/// One observed attribute of a component state `S`.
pub struct AttributeSpec<S> {
    /// Host attribute name.
    pub name: &'static str,
    /// Update path taken after a change.
    pub update: Update,
    /// Writes the attribute value (`None` when absent) into the state.
    pub apply: fn(&mut S, Option<&str>),
}

/// Looks up `name` across a component's attribute tables.
pub fn find<'a, S>(
    tables: &'a [&'a [AttributeSpec<S>]],
    name: &str,
) -> Option<&'a AttributeSpec<S>> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .find(|spec| spec.name == name)
}

/// Every attribute of a component's tables, in declaration order.
pub fn all<'a, S>(
    tables: &'a [&'a [AttributeSpec<S>]],
) -> impl Iterator<Item = &'a AttributeSpec<S>> {
    tables.iter().flat_map(|table| table.iter())
}

/// Boolean attribute: presence means `true`, whatever the value.
pub fn flag(raw: Option<&str>) -> bool {
    raw.is_some()
}

/// String attribute with an empty default.
pub fn text(raw: Option<&str>) -> String {
    raw.unwrap_or_default().to_string()
}

/// String attribute where the empty string counts as absent.
pub fn optional(raw: Option<&str>) -> Option<String> {
    raw.filter(|value| !value.is_empty()).map(str::to_string)
}

/// Positive integer attribute parsed from its leading digits (`"12px"` is 12).
///
/// Zero, negative and non-numeric values are treated as absent.
pub fn number(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim_start();
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(digits.len(), |(index, _)| index);
    digits[..end].parse::<u32>().ok().filter(|value| *value > 0)
}

/// Enumerated attribute with a default; unknown tokens coerce to the default.
pub fn token<T: Token + Default>(attribute: &str, raw: Option<&str>) -> T {
    optional_token(attribute, raw).unwrap_or_default()
}

/// Enumerated attribute without a default.
pub fn optional_token<T: Token>(attribute: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw.filter(|value| !value.is_empty())?;
    let parsed = T::from_token(raw);
    if parsed.is_none() {
        debug_warn!("ignoring unknown `{attribute}` value `{raw}`");
    }
    parsed
}
