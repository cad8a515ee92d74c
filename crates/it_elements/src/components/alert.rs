//! `it-alert`: contextual message box with optional dismiss control.

use crate::attributes::{self, AttributeSpec, Update};
use crate::element::{
    flag_properties, optional_properties, token_properties, Component, Effect, ElementRef, Host,
    IdAllocator, Interaction,
};
use crate::events::{Event, EventDetail, EventKind};
use crate::markup::{LiveControl, MarkupElement};
use crate::model::{AlertKind, NodeId, Token};
use crate::styles::{style_block, HostDisplay};

/// State of one `it-alert`.
#[derive(Debug, Clone)]
pub struct Alert {
    id: String,
    kind: AlertKind,
    dismissible: bool,
    dismissed: bool,
    role: Option<String>,
    aria_live: Option<String>,
    aria_label: Option<String>,
}

impl Alert {
    /// Contextual type.
    pub fn kind(&self) -> AlertKind {
        self.kind
    }

    /// Whether the alert is hidden.
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    fn close_button(&self, label: &str) -> MarkupElement {
        MarkupElement::new("button")
            .attr("type", "button")
            .classes(["btn-close"])
            .attr("aria-label", label)
    }

    fn dismiss_effects(&self, node: NodeId) -> Vec<Effect> {
        vec![
            Effect::attribute(node, "dismissed", Some("")),
            Effect::Emit {
                event: Event::element(
                    Self::TAG,
                    EventKind::Dismiss,
                    EventDetail::Alert {
                        kind: self.kind,
                        element: node,
                    },
                )
                .cancelable(),
                revert: vec![Effect::attribute(node, "dismissed", None)],
            },
        ]
    }
}

impl Component for Alert {
    const TAG: &'static str = "it-alert";
    const ATTRIBUTES: &'static [&'static [AttributeSpec<Self>]] = &[&[
        AttributeSpec {
            name: "type",
            update: Update::Patch,
            apply: |state, raw| state.kind = attributes::token("type", raw),
        },
        AttributeSpec {
            name: "dismissible",
            update: Update::Render,
            apply: |state, raw| state.dismissible = attributes::flag(raw),
        },
        AttributeSpec {
            name: "dismissed",
            update: Update::Patch,
            apply: |state, raw| state.dismissed = attributes::flag(raw),
        },
        AttributeSpec {
            name: "role",
            update: Update::Accessibility,
            apply: |state, raw| state.role = attributes::optional(raw),
        },
        AttributeSpec {
            name: "aria-live",
            update: Update::Accessibility,
            apply: |state, raw| state.aria_live = attributes::optional(raw),
        },
        AttributeSpec {
            name: "aria-label",
            update: Update::Accessibility,
            apply: |state, raw| state.aria_label = attributes::optional(raw),
        },
    ]];

    fn new(ids: &mut IdAllocator) -> Self {
        Self {
            id: ids.allocate("alert"),
            kind: AlertKind::default(),
            dismissible: false,
            dismissed: false,
            role: None,
            aria_live: None,
            aria_label: None,
        }
    }

    fn control_id(&self) -> &str {
        &self.id
    }

    fn render(&self, host: &Host<'_>) -> MarkupElement {
        MarkupElement::fragment()
            .child(style_block(HostDisplay::Block))
            .child(self.control(host))
    }

    fn control(&self, host: &Host<'_>) -> MarkupElement {
        let kind = format!("alert-{}", self.kind.token());
        let dismissible = if self.dismissible {
            "alert-dismissible"
        } else {
            ""
        };
        MarkupElement::new("div")
            .attr("id", self.id.as_str())
            .classes(["alert", kind.as_str(), dismissible])
            .flag("hidden", self.dismissed)
            .child(MarkupElement::new("slot"))
            .child_opt(
                self.dismissible
                    .then(|| self.close_button(&host.config().close_label)),
            )
    }

    fn accessibility(&self, _host: &Host<'_>, tree: &mut MarkupElement) {
        let Some(alert) = tree.by_id_mut(&self.id) else {
            return;
        };
        alert.set_attribute("role", self.role.as_deref().unwrap_or("alert"));
        alert.set_or_remove("aria-live", self.aria_live.as_deref());
        alert.set_or_remove("aria-label", self.aria_label.as_deref());
    }

    fn interact(
        &mut self,
        host: &Host<'_>,
        _live: &mut LiveControl,
        interaction: Interaction,
    ) -> Vec<Effect> {
        match interaction {
            Interaction::Click if self.dismissible && !self.dismissed => {
                self.dismiss_effects(host.node())
            }
            _ => Vec::new(),
        }
    }

    fn focusable(&self) -> bool {
        self.dismissible && !self.dismissed
    }
}

token_properties!(Alert {
    kind / set_kind => "type" : AlertKind : |state| state.kind;
});

flag_properties!(Alert {
    dismissible / set_dismissible => "dismissible" : |state| state.dismissible;
    dismissed / set_dismissed => "dismissed" : |state| state.dismissed;
});

optional_properties!(Alert {
    role / set_role => "role" : |state| state.role.clone();
    aria_live / set_aria_live => "aria-live" : |state| state.aria_live.clone();
    aria_label / set_aria_label => "aria-label" : |state| state.aria_label.clone();
});

impl ElementRef<'_, Alert> {
    /// Hides the alert and emits a cancelable `it-alert-dismiss`; cancelling shows it again.
    pub fn dismiss(&mut self) {
        let node = self.node();
        let effects = self
            .state()
            .map(|state| state.dismiss_effects(node))
            .unwrap_or_default();
        self.document_mut().apply(effects);
    }

    /// Shows a dismissed alert.
    pub fn show(&mut self) {
        self.set_dismissed(false);
    }
}
