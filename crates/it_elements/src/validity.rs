//! Constraint validation of internal form controls.

use leptos::logging::debug_warn;
use regex::Regex;
use serde::Serialize;

use crate::model::InputType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Browser-style `ValidityState` flags.
pub struct ValidityState {
    /// Required control without a value.
    pub value_missing: bool,
    /// Value does not match the input type (email, url).
    pub type_mismatch: bool,
    /// Value does not match `pattern`.
    pub pattern_mismatch: bool,
    /// Value longer than `maxlength`.
    pub too_long: bool,
    /// Value shorter than `minlength`.
    pub too_short: bool,
    /// Number below `min`.
    pub range_underflow: bool,
    /// Number above `max`.
    pub range_overflow: bool,
    /// Number off the `step` grid.
    pub step_mismatch: bool,
    /// Number input holding a non-numeric value.
    pub bad_input: bool,
    /// Message installed with `setCustomValidity`.
    pub custom_error: bool,
}

impl ValidityState {
    /// Whether no flag is raised.
    pub fn valid(&self) -> bool {
        !(self.value_missing
            || self.type_mismatch
            || self.pattern_mismatch
            || self.too_long
            || self.too_short
            || self.range_underflow
            || self.range_overflow
            || self.step_mismatch
            || self.bad_input
            || self.custom_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Kind of internal control being validated.
pub enum ControlKind {
    /// `<input>` of the given type.
    Input(InputType),
    /// `<textarea>`.
    TextArea,
    /// `<select>`.
    Select,
    /// Checkbox or toggle.
    Checkbox,
    /// Radio button; `group_checked` covers the whole name group.
    Radio,
    /// File picker.
    File,
}

#[derive(Debug, Clone, Default)]
/// Constraint attributes and live values of one control.
pub struct Constraints<'a> {
    /// Current value.
    pub value: &'a str,
    /// `required` flag.
    pub required: bool,
    /// `disabled` flag.
    pub disabled: bool,
    /// `pattern` attribute.
    pub pattern: Option<&'a str>,
    /// `minlength` attribute.
    pub min_length: Option<u32>,
    /// `maxlength` attribute.
    pub max_length: Option<u32>,
    /// `min` attribute.
    pub min: Option<&'a str>,
    /// `max` attribute.
    pub max: Option<&'a str>,
    /// `step` attribute.
    pub step: Option<&'a str>,
    /// Checked state of a checkable control.
    pub checked: bool,
    /// Whether any radio sharing the name is checked.
    pub group_checked: bool,
    /// Number of selected files.
    pub file_count: usize,
    /// Message from `setCustomValidity`.
    pub custom_validity: &'a str,
}

/// Evaluates `constraints` for a control of `kind`. Disabled controls are always valid.
pub fn evaluate(kind: ControlKind, constraints: &Constraints<'_>) -> ValidityState {
    let mut validity = ValidityState::default();
    if constraints.disabled {
        return validity;
    }
    validity.custom_error = !constraints.custom_validity.is_empty();

    let value = constraints.value;
    validity.value_missing = constraints.required
        && match kind {
            ControlKind::Checkbox => !constraints.checked,
            ControlKind::Radio => !constraints.group_checked,
            ControlKind::File => constraints.file_count == 0,
            ControlKind::Input(_) | ControlKind::TextArea | ControlKind::Select => {
                value.is_empty()
            }
        };

    if value.is_empty() {
        return validity;
    }

    match kind {
        ControlKind::Input(input_type) => {
            match input_type {
                InputType::Email => validity.type_mismatch = !is_simple_email(value),
                InputType::Url => validity.type_mismatch = !is_url_like(value),
                _ => {}
            }
            if supports_length(input_type) {
                check_length(constraints, &mut validity);
                validity.pattern_mismatch = pattern_mismatch(constraints.pattern, value);
            }
            if input_type == InputType::Number {
                check_number(constraints, &mut validity);
            }
        }
        ControlKind::TextArea => check_length(constraints, &mut validity),
        _ => {}
    }
    validity
}

fn supports_length(input_type: InputType) -> bool {
    matches!(
        input_type,
        InputType::Text
            | InputType::Search
            | InputType::Url
            | InputType::Tel
            | InputType::Email
            | InputType::Password
    )
}

fn check_length(constraints: &Constraints<'_>, validity: &mut ValidityState) {
    let length = constraints.value.chars().count();
    if let Some(min) = constraints.min_length {
        validity.too_short = length < min as usize;
    }
    if let Some(max) = constraints.max_length {
        validity.too_long = length > max as usize;
    }
}

fn pattern_mismatch(pattern: Option<&str>, value: &str) -> bool {
    let Some(pattern) = pattern.filter(|pattern| !pattern.is_empty()) else {
        return false;
    };
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => !regex.is_match(value),
        Err(err) => {
            debug_warn!("ignoring invalid pattern `{pattern}`: {err}");
            false
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn check_number(constraints: &Constraints<'_>, validity: &mut ValidityState) {
    let Some(number) = parse_number(constraints.value) else {
        validity.bad_input = true;
        return;
    };
    let min = constraints.min.and_then(parse_number);
    if let Some(min) = min {
        validity.range_underflow = number < min;
    }
    if let Some(max) = constraints.max.and_then(parse_number) {
        validity.range_overflow = number > max;
    }

    let step = constraints.step.unwrap_or_default();
    if step.eq_ignore_ascii_case("any") {
        return;
    }
    let step = parse_number(step).filter(|step| *step > 0.0).unwrap_or(1.0);
    let ratio = (number - min.unwrap_or(0.0)) / step;
    validity.step_mismatch = (ratio - ratio.round()).abs() > 1e-7;
}

fn is_email_local_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(ch)
}

fn is_email_domain_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && label.starts_with(|ch: char| ch.is_ascii_alphanumeric())
        && label.ends_with(|ch: char| ch.is_ascii_alphanumeric())
        && label.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

fn is_simple_email(value: &str) -> bool {
    let Some((local, domain)) = value.trim().split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local.chars().all(is_email_local_char)
        && !domain.contains('@')
        && domain.split('.').all(is_email_domain_label)
}

fn is_url_like(value: &str) -> bool {
    let Some((scheme, rest)) = value.trim().split_once(':') else {
        return false;
    };
    scheme.starts_with(|ch: char| ch.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
        && !rest.is_empty()
}
