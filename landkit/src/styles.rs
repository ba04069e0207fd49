//! Style blocks injected by components at init.

use landkit_dom::{Document, DomError, NodeId};

pub const NAV_STYLES_ID: &str = "nav-styles";
pub const ANIMATION_STYLES_ID: &str = "animation-styles";

/// Mobile menu layout and toggle button.
pub const NAV_STYLES: &str = "\
.nav-toggle { display: none; background: none; border: 0; cursor: pointer; padding: 0.5rem; }
.nav-toggle-bar { display: block; width: 24px; height: 2px; margin: 5px 0; background: currentColor; transition: transform 0.3s ease; }
@media (max-width: 767px) {
  .nav-toggle { display: block; }
  nav ul { display: none; flex-direction: column; }
  nav.nav-open ul { display: flex; }
}";

/// Reveal transition for scroll-animated elements.
pub const ANIMATION_STYLES: &str = "\
.animate-on-scroll { opacity: 0; transform: translateY(30px); transition: opacity 0.6s ease-out, transform 0.6s ease-out; }
.animate-on-scroll.visible { opacity: 1; transform: translateY(0); }
@media (prefers-reduced-motion: reduce) {
  .animate-on-scroll { opacity: 1; transform: none; transition: none; }
}";

/// Append `<style id="{id}">` to the head unless an element with that id
/// already exists. Returns the style element either way.
///
/// # Errors
///
/// Returns an error if the head cannot take a new child.
pub fn inject_style(doc: &mut Document, id: &str, css: &str) -> Result<NodeId, DomError> {
    if let Some(existing) = doc.element_by_id(id) {
        return Ok(existing);
    }
    let head = doc.head();
    let style = doc.append_element(head, "style")?;
    doc.set_attr(style, "id", id)?;
    doc.set_text_content(style, css)?;
    Ok(style)
}
