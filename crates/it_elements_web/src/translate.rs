//! Translation of native events on internal controls into element interactions.

use it_elements::{FileDescriptor, Interaction};
use serde::{Deserialize, Serialize};

/// What the runtime needs to know about the internal control a native event targeted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    /// Lowercase tag name.
    pub tag: String,
    /// `type` of an `<input>`.
    pub input_type: Option<String>,
    /// Current value of inputs, textareas and selects.
    pub value: String,
    /// Current checked state of checkbox and radio inputs.
    pub checked: bool,
    /// Files reported by a file input.
    pub files: Vec<FileDescriptor>,
    /// `data-index` of a per-file remove button.
    pub remove_index: Option<usize>,
}

impl ControlSnapshot {
    /// Snapshot of a control with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    fn is_checkable(&self) -> bool {
        matches!(self.input_type.as_deref(), Some("checkbox" | "radio"))
    }

    fn is_file(&self) -> bool {
        self.input_type.as_deref() == Some("file")
    }
}

/// Interaction delivered for a native `event_type` on `control`, if any.
///
/// Text entry arrives through `input`; checkables, selects and file pickers through `change`.
/// Clicks only count on buttons, where a `data-index` marks a per-file remove control.
pub fn interaction(event_type: &str, control: &ControlSnapshot) -> Option<Interaction> {
    match (event_type, control.tag.as_str()) {
        ("focusin", _) => Some(Interaction::Focus),
        ("focusout", _) => Some(Interaction::Blur),
        ("click", "button") => Some(
            control
                .remove_index
                .map_or(Interaction::Click, Interaction::RemoveFile),
        ),
        ("input", "textarea") => Some(Interaction::Input(control.value.clone())),
        ("input", "input") if !control.is_checkable() && !control.is_file() => {
            Some(Interaction::Input(control.value.clone()))
        }
        ("change", "select") => Some(Interaction::Select(control.value.clone())),
        ("change", "input") if control.is_checkable() => {
            Some(Interaction::Toggle(control.checked))
        }
        ("change", "input") if control.is_file() => {
            Some(Interaction::Files(control.files.clone()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn input(kind: &str) -> ControlSnapshot {
        ControlSnapshot {
            input_type: Some(kind.to_string()),
            ..ControlSnapshot::new("input")
        }
    }

    #[test]
    fn text_entry_comes_from_input_events() {
        let mut email = input("email");
        email.value = "ada@example.it".to_string();
        assert_eq!(
            interaction("input", &email),
            Some(Interaction::Input("ada@example.it".to_string()))
        );
        assert_eq!(interaction("change", &email), None);

        let mut textarea = ControlSnapshot::new("textarea");
        textarea.value = "note".to_string();
        assert_eq!(
            interaction("input", &textarea),
            Some(Interaction::Input("note".to_string()))
        );
    }

    #[test]
    fn checkables_and_pickers_come_from_change_events() {
        let mut checkbox = input("checkbox");
        checkbox.checked = true;
        assert_eq!(interaction("input", &checkbox), None);
        assert_eq!(interaction("change", &checkbox), Some(Interaction::Toggle(true)));

        let mut picker = input("file");
        picker.files = vec![FileDescriptor::new("a.pdf", 3)];
        assert_eq!(
            interaction("change", &picker),
            Some(Interaction::Files(vec![FileDescriptor::new("a.pdf", 3)]))
        );

        let mut select = ControlSnapshot::new("select");
        select.value = "rm".to_string();
        assert_eq!(
            interaction("change", &select),
            Some(Interaction::Select("rm".to_string()))
        );
    }

    #[test]
    fn clicks_only_count_on_buttons() {
        let button = ControlSnapshot::new("button");
        assert_eq!(interaction("click", &button), Some(Interaction::Click));

        let remove = ControlSnapshot {
            remove_index: Some(2),
            ..ControlSnapshot::new("button")
        };
        assert_eq!(interaction("click", &remove), Some(Interaction::RemoveFile(2)));
        assert_eq!(interaction("click", &input("checkbox")), None);
    }

    #[test]
    fn focus_moves_map_to_focus_and_blur() {
        let control = ControlSnapshot::new("select");
        assert_eq!(interaction("focusin", &control), Some(Interaction::Focus));
        assert_eq!(interaction("focusout", &control), Some(Interaction::Blur));
        assert_eq!(interaction("keydown", &control), None);
    }
}
