//! `it-form-file`: file picker with a removable list of the selected files.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    flag_properties, optional_properties, Component, Effect, ElementRef, Host, IdAllocator,
    Interaction,
};
use crate::events::{Event, EventDetail, EventKind};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::{format_file_size, FileDescriptor, FormEntry, NodeId};
use crate::validity::{self, Constraints, ControlKind, ValidityState};

use super::field::{field_attributes, FieldIds, FieldState, HasField};

/// State of one `it-form-file`.
#[derive(Debug, Clone)]
pub struct FileInput {
    ids: FieldIds,
    field: FieldState,
    accept: Option<String>,
    multiple: bool,
    files: Vec<FileDescriptor>,
}

impl FileInput {
    fn file_list(&self, host: &Host<'_>) -> Option<MarkupElement> {
        if self.files.is_empty() {
            return None;
        }
        let remove_label = &host.config().remove_file_label;
        let items = self.files.iter().enumerate().map(|(index, file)| {
            MarkupElement::new("div")
                .classes(["file-item"])
                .child(
                    MarkupElement::new("span")
                        .classes(["file-name"])
                        .text(file.name.as_str()),
                )
                .child(
                    MarkupElement::new("span")
                        .classes(["file-size"])
                        .text(format_file_size(file.size)),
                )
                .child(
                    MarkupElement::new("button")
                        .attr("type", "button")
                        .classes(["file-remove"])
                        .attr("data-index", index.to_string())
                        .attr("aria-label", format!("{remove_label} {}", file.name))
                        .text("×"),
                )
        });
        Some(
            MarkupElement::new("div")
                .classes(["file-list"])
                .children_from(items),
        )
    }

    fn files_event(&self, kind: EventKind, files: &[FileDescriptor], node: NodeId) -> Effect {
        Effect::emit(Event::element(
            Self::TAG,
            kind,
            EventDetail::Files {
                files: files.to_vec(),
                element: node,
            },
        ))
    }
}

/// Removes the live file at `index` and returns the re-render, remove event and announcement.
fn removal(node: NodeId, live: &mut LiveControl, index: usize, announce: &str) -> Vec<Effect> {
    if index >= live.files.len() {
        return Vec::new();
    }
    let removed = live.files.remove(index);
    vec![
        Effect::Render(node),
        Effect::emit(Event::element(
            FileInput::TAG,
            EventKind::Remove,
            EventDetail::FileRemoved {
                files: live.files.clone(),
                removed_index: index,
                element: node,
            },
        )),
        Effect::Announce(format!("{announce} {}", removed.name)),
    ]
}

impl HasField for FileInput {
    fn field_state(&self) -> &FieldState {
        &self.field
    }

    fn field_state_mut(&mut self) -> &mut FieldState {
        &mut self.field
    }
}

impl Component for FileInput {
    const TAG: &'static str = "it-form-file";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[
        field_attributes!(FileInput),
        &[
            AttributeSpec {
                name: "accept",
                update: Update::Patch,
                apply: |state, raw| state.accept = attributes::optional(raw),
            },
            AttributeSpec {
                name: "multiple",
                update: Update::Patch,
                apply: |state, raw| state.multiple = attributes::flag(raw),
            },
        ],
    ];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            ids: FieldIds::new(ids, "file"),
            field: FieldState::default(),
            accept: None,
            multiple: false,
            files: Vec::new(),
        }
    }

    fn control_id(&self) -> &str {
        &self.ids.control
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        let label = self
            .field
            .label_element(&self.ids, "form-label", &host.config().required_marker);
        self.field.fragment(
            &self.ids,
            "form-group",
            label,
            self.control(host),
            self.file_list(host),
        )
    }

    fn control(&self, _host: &Host<'_>) -> MarkupElement {
        MarkupElement::new("input")
            .attr("type", "file")
            .attr("id", self.ids.control.as_str())
            .classes(self.field.control_classes("form-control-file"))
            .attr_opt("accept", self.accept.as_deref())
            .flag("multiple", self.multiple)
            .flag("required", self.field.required)
            .flag("disabled", self.field.disabled)
            .attr_opt("name", self.field.name.as_deref())
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        self.field.accessibility(&self.ids, tree);
    }

    fn live(&self, _host: &Host<'_>) -> LiveControl {
        LiveControl {
            files: self.files.clone(),
            ..LiveControl::default()
        }
    }

    fn adopt_live(&mut self, live: &LiveControl) {
        self.files.clone_from(&live.files);
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        let node = host.node();
        match interaction {
            Interaction::Focus => vec![self.files_event(EventKind::Focus, &live.files, node)],
            Interaction::Blur => vec![self.files_event(EventKind::Blur, &live.files, node)],
            Interaction::Files(mut files) if !self.field.disabled => {
                if !self.multiple {
                    files.truncate(1);
                }
                live.files.clone_from(&files);
                self.files = files;
                vec![
                    Effect::Render(node),
                    self.files_event(EventKind::Change, &live.files, node),
                ]
            }
            Interaction::RemoveFile(index) if !self.field.disabled => {
                let effects =
                    removal(node, live, index, &host.config().file_removed_announcement);
                self.files.clone_from(&live.files);
                effects
            }
            _ => Vec::new(),
        }
    }

    fn focusable(&self) -> bool {
        !self.field.disabled
    }

    fn field(&self) -> Option<&FieldState> {
        Some(&self.field)
    }

    fn validity(&self, _host: &Host<'_>, live: &LiveControl) -> Option<ValidityState> {
        let constraints = Constraints {
            required: self.field.required,
            disabled: self.field.disabled,
            file_count: live.files.len(),
            custom_validity: &live.custom_validity,
            ..Constraints::default()
        };
        Some(validity::evaluate(ControlKind::File, &constraints))
    }

    fn form_entries(&self, live: &LiveControl) -> Vec<FormEntry> {
        let Some(name) = self.field.name.as_deref() else {
            return Vec::new();
        };
        live.files
            .iter()
            .map(|file| FormEntry::file(name, file.clone()))
            .collect()
    }
}

optional_properties!(FileInput {
    accept / set_accept => "accept" : |state| state.accept.clone();
});

flag_properties!(FileInput {
    multiple / set_multiple => "multiple" : |state| state.multiple;
});

impl ElementRef<'_, FileInput> {
    /// Selected files: the live list once rendered, the in-memory list before.
    pub fn files(&self) -> Vec<FileDescriptor> {
        self.read(|state, live| match live {
            Some(live) => live.files.clone(),
            None => state.files.clone(),
        })
    }

    /// Removes the file at `index`, keeping the order of the others; out of range is a no-op.
    ///
    /// Works on a disabled picker too; only the per-file remove buttons are inert then.
    pub fn remove_file(&mut self, index: usize) {
        let node = self.node();
        let announce = self.document().config().file_removed_announcement.clone();
        let mut effects = Vec::new();
        self.with_live(|live| effects = removal(node, live, index, &announce));
        self.document_mut().apply(effects);
    }

    /// Empties the file list and emits `it-form-file-clear`.
    pub fn clear_files(&mut self) {
        if self.shadow().is_none() {
            return;
        }
        self.with_live(|live| live.files.clear());
        let node = self.node();
        self.document_mut().apply(vec![
            Effect::Render(node),
            Effect::emit(Event::element(
                FileInput::TAG,
                EventKind::Clear,
                EventDetail::Element { element: node },
            )),
        ]);
    }
}
