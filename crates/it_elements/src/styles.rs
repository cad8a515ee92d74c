//! Structural and accessibility-only style sheets shipped inside each fragment.
//!
//! Visual presentation comes from the globally loaded Bootstrap Italia stylesheet.

use crate::markup::MarkupElement;

const SHARED: &str = "\
:focus-visible{outline:2px solid currentColor;outline-offset:2px}\
.visually-hidden{position:absolute!important;width:1px!important;height:1px!important;\
padding:0!important;margin:-1px!important;overflow:hidden!important;\
clip:rect(0,0,0,0)!important;white-space:nowrap!important;border:0!important}\
[hidden]{display:none!important}\
@media (prefers-reduced-motion:reduce){*{transition:none!important;animation:none!important}}\
@media (forced-colors:active){:focus-visible{outline-color:Highlight}}";

/// `:host` display mode of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostDisplay {
    /// Form controls, groups and alerts.
    Block,
    /// Buttons and button groups.
    InlineBlock,
}

/// `<style>` element opening every fragment.
pub fn style_block(display: HostDisplay) -> MarkupElement {
    let host = match display {
        HostDisplay::Block => ":host{display:block}",
        HostDisplay::InlineBlock => ":host{display:inline-block}",
    };
    MarkupElement::new("style").raw(format!("{host}{SHARED}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_block_carries_host_display_and_a11y_rules() {
        let html = style_block(HostDisplay::InlineBlock).to_html();
        assert!(html.starts_with("<style>:host{display:inline-block}"));
        assert!(html.contains(".visually-hidden"));
        assert!(html.contains("prefers-reduced-motion"));
        assert!(html.contains("forced-colors"));
    }
}
