//! Shared value types: node identifiers, tri-state validation, and the enumerated attribute
//! tokens recognized by the element catalogue.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier of one host node inside a [`crate::Document`].
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Tri-state validation attached to form controls and groups.
pub enum Validation {
    /// No validation state (`validation` attribute absent or unrecognized).
    #[default]
    Unset,
    /// Control reported as valid.
    Valid,
    /// Control reported as invalid.
    Invalid,
}

impl Validation {
    /// Parses the `validation` attribute; anything but `valid`/`invalid` is [`Validation::Unset`].
    pub fn from_attribute(raw: Option<&str>) -> Self {
        match raw {
            Some("valid") => Self::Valid,
            Some("invalid") => Self::Invalid,
            _ => Self::Unset,
        }
    }

    /// Attribute token, or `None` when the attribute should be absent.
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Valid => Some("valid"),
            Self::Invalid => Some("invalid"),
        }
    }

    /// Whether a state is set.
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// Stylesheet class applied to the control for this state.
    pub fn control_class(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Valid => Some("is-valid"),
            Self::Invalid => Some("is-invalid"),
        }
    }

    /// Stylesheet class of the feedback element for this state.
    pub fn feedback_class(self) -> &'static str {
        match self {
            Self::Invalid => "invalid-feedback",
            _ => "valid-feedback",
        }
    }

    /// `aria-invalid` token; absent while unset.
    pub fn aria_invalid(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Valid => Some("false"),
            Self::Invalid => Some("true"),
        }
    }
}

/// Enumerated attribute tokens with a documented default.
pub trait Token: Sized + Copy + 'static {
    /// All recognized values.
    const ALL: &'static [Self];

    /// Attribute spelling of this value.
    fn token(self) -> &'static str;

    /// Parses a recognized token.
    fn from_token(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.token() == raw)
    }
}

macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        $name:ident default $default:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$variant_meta])* #[serde(rename = $token)] $variant,)+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl Token for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn token(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }
    };
}

token_enum! {
    /// Alert contextual type.
    AlertKind default Info {
        /// Informational alert.
        Info => "info",
        /// Success alert.
        Success => "success",
        /// Warning alert.
        Warning => "warning",
        /// Danger alert.
        Danger => "danger",
    }
}

token_enum! {
    /// Button contextual type (`btn-{type}`).
    ButtonKind default Primary {
        /// Primary action.
        Primary => "primary",
        /// Secondary action.
        Secondary => "secondary",
        /// Success action.
        Success => "success",
        /// Destructive action.
        Danger => "danger",
        /// Warning action.
        Warning => "warning",
        /// Informational action.
        Info => "info",
        /// Light button.
        Light => "light",
        /// Dark button.
        Dark => "dark",
        /// Link-styled button.
        Link => "link",
    }
}

token_enum! {
    /// Button fill variant.
    ButtonVariant default Outline {
        /// Outlined button (`btn-outline-{type}`).
        Outline => "outline",
        /// Ghost button (`btn-ghost-{type}`).
        Ghost => "ghost",
    }
}

token_enum! {
    /// Button and button-group size.
    ButtonSize default Sm {
        /// Extra small.
        Xs => "xs",
        /// Small.
        Sm => "sm",
        /// Large.
        Lg => "lg",
    }
}

token_enum! {
    /// Icon placement relative to button text.
    IconPosition default Left {
        /// Icon before text.
        Left => "left",
        /// Icon after text.
        Right => "right",
    }
}

token_enum! {
    /// Native `type` of the internal `<button>`.
    NativeButtonType default Button {
        /// Plain button.
        Button => "button",
        /// Form submit button.
        Submit => "submit",
        /// Form reset button.
        Reset => "reset",
    }
}

token_enum! {
    /// Supported `it-form-input` types.
    InputType default Text {
        /// Plain text.
        Text => "text",
        /// Email address.
        Email => "email",
        /// Password.
        Password => "password",
        /// Number.
        Number => "number",
        /// Telephone.
        Tel => "tel",
        /// URL.
        Url => "url",
        /// Search.
        Search => "search",
        /// Date.
        Date => "date",
        /// Time.
        Time => "time",
        /// Local date and time.
        DateTimeLocal => "datetime-local",
        /// Month.
        Month => "month",
        /// Week.
        Week => "week",
        /// Color.
        Color => "color",
    }
}

token_enum! {
    /// Layout of the `it-form-group` content area.
    GroupLayout default Vertical {
        /// Stacked children.
        Vertical => "vertical",
        /// Wrapped row of children.
        Horizontal => "horizontal",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// File selected in an `it-form-file` control.
pub struct FileDescriptor {
    /// File name as reported by the picker.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileDescriptor {
    /// Builds a descriptor.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
/// Value submitted for one form entry.
pub enum FormValue {
    /// Text value.
    Text(String),
    /// Selected file.
    File(FileDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One `(name, value)` pair of a group submission payload.
pub struct FormEntry {
    /// Declared `name` of the contributing control.
    pub name: String,
    /// Submitted value.
    pub value: FormValue,
}

impl FormEntry {
    /// Text entry.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text(value.into()),
        }
    }

    /// File entry.
    pub fn file(name: impl Into<String>, file: FileDescriptor) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File(file),
        }
    }
}

/// Formats a byte count with binary units: `0 Bytes`, `512 Bytes`, `1.5 KB`, `2 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{scaled:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_parses_only_known_tokens() {
        assert_eq!(Validation::from_attribute(Some("valid")), Validation::Valid);
        assert_eq!(
            Validation::from_attribute(Some("invalid")),
            Validation::Invalid
        );
        assert_eq!(Validation::from_attribute(Some("maybe")), Validation::Unset);
        assert_eq!(Validation::from_attribute(None), Validation::Unset);
        assert_eq!(Validation::Unset.aria_invalid(), None);
        assert_eq!(Validation::Invalid.aria_invalid(), Some("true"));
    }

    #[test]
    fn tokens_round_trip_through_attribute_spelling() {
        assert_eq!(AlertKind::from_token("danger"), Some(AlertKind::Danger));
        assert_eq!(AlertKind::from_token("fatal"), None);
        assert_eq!(AlertKind::default(), AlertKind::Info);
        assert_eq!(
            InputType::from_token("datetime-local"),
            Some(InputType::DateTimeLocal)
        );
        assert_eq!(ButtonKind::Link.token(), "link");
    }

    #[test]
    fn file_sizes_use_binary_units() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
    }
}
