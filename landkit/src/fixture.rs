//! The canonical landing page document.

use landkit_dom::{Document, DomError, NodeId, Rect};

use crate::context::{PageContext, Viewport};

pub const VIEWPORT_WIDTH: i64 = 1280;
pub const VIEWPORT_HEIGHT: i64 = 800;
pub const HEADER_HEIGHT: i64 = 80;

fn element(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
) -> Result<NodeId, DomError> {
    let node = doc.append_element(parent, tag)?;
    for (name, value) in attrs {
        doc.set_attr(node, name, value)?;
    }
    Ok(node)
}

fn text_element(
    doc: &mut Document,
    parent: NodeId,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<NodeId, DomError> {
    let node = element(doc, parent, tag, attrs)?;
    doc.set_text_content(node, text)?;
    Ok(node)
}

fn header(doc: &mut Document, body: NodeId) -> Result<(), DomError> {
    let header = element(doc, body, "header", &[("class", "site-header")])?;
    doc.set_rect(header, Rect::new(0, 0, VIEWPORT_WIDTH, HEADER_HEIGHT))?;
    text_element(doc, header, "a", &[("class", "logo"), ("href", "#top")], "Landkit")?;
    let nav = element(doc, header, "nav", &[("class", "main-nav"), ("aria-label", "Primary")])?;
    let menu = element(doc, nav, "ul", &[("class", "nav-menu")])?;
    for (href, label) in [("#features", "Features"), ("#pricing", "Pricing"), ("#contact", "Contact")] {
        let item = element(doc, menu, "li", &[])?;
        text_element(doc, item, "a", &[("href", href)], label)?;
    }
    Ok(())
}

fn lazy_image(doc: &mut Document, parent: NodeId, src: &str, alt: &str, rect: Rect) -> Result<(), DomError> {
    let img = element(
        doc,
        parent,
        "img",
        &[("class", "lazy"), ("data-src", src), ("alt", alt)],
    )?;
    doc.set_rect(img, rect)
}

fn reveal(doc: &mut Document, parent: NodeId, title: &str, rect: Rect) -> Result<(), DomError> {
    let card = element(doc, parent, "div", &[("class", "card animate-on-scroll")])?;
    doc.set_rect(card, rect)?;
    text_element(doc, card, "h3", &[], title)?;
    Ok(())
}

fn sections(doc: &mut Document, body: NodeId) -> Result<(), DomError> {
    let hero = element(doc, body, "section", &[("id", "top"), ("class", "hero")])?;
    doc.set_rect(hero, Rect::new(0, HEADER_HEIGHT, VIEWPORT_WIDTH, 720))?;
    text_element(doc, hero, "h1", &[], "Launch your next product faster")?;
    lazy_image(doc, hero, "/images/hero.webp", "Product screenshot", Rect::new(340, 300, 600, 400))?;

    let features = element(doc, body, "section", &[("id", "features")])?;
    doc.set_rect(features, Rect::new(0, 800, VIEWPORT_WIDTH, 900))?;
    for (i, title) in ["Fast", "Accessible", "Responsive"].into_iter().enumerate() {
        let x = 40 + 420 * i64::try_from(i).unwrap_or_default();
        reveal(doc, features, title, Rect::new(x, 900, 380, 300))?;
    }
    lazy_image(doc, features, "/images/features.webp", "Feature overview", Rect::new(340, 1300, 600, 300))?;

    let pricing = element(doc, body, "section", &[("id", "pricing")])?;
    doc.set_rect(pricing, Rect::new(0, 1700, VIEWPORT_WIDTH, 800))?;
    reveal(doc, pricing, "Pro plan", Rect::new(440, 1800, 400, 250))?;
    lazy_image(doc, pricing, "/images/pricing.webp", "Pricing chart", Rect::new(340, 2100, 600, 300))?;
    Ok(())
}

fn form_group(
    doc: &mut Document,
    form: NodeId,
    tag: &str,
    name: &str,
    label: &str,
    attrs: &[(&str, &str)],
) -> Result<(), DomError> {
    let group = element(doc, form, "div", &[("class", "form-group")])?;
    let id = format!("contact-{name}");
    text_element(doc, group, "label", &[("for", &id)], label)?;
    let control = element(doc, group, tag, &[("id", &id), ("name", name)])?;
    for (attr, value) in attrs {
        doc.set_attr(control, attr, value)?;
    }
    Ok(())
}

fn contact(doc: &mut Document, body: NodeId) -> Result<(), DomError> {
    let section = element(doc, body, "section", &[("id", "contact")])?;
    doc.set_rect(section, Rect::new(0, 2500, VIEWPORT_WIDTH, 900))?;
    text_element(doc, section, "h2", &[], "Get in touch")?;
    let form = element(doc, section, "form", &[("id", "contact-form"), ("novalidate", "")])?;
    doc.set_rect(form, Rect::new(240, 2600, 800, 700))?;

    form_group(doc, form, "input", "name", "Name", &[("type", "text"), ("required", "")])?;
    form_group(doc, form, "input", "email", "Email", &[("type", "email"), ("required", "")])?;
    form_group(doc, form, "input", "phone", "Phone (optional)", &[("type", "tel")])?;
    form_group(doc, form, "input", "subject", "Subject", &[("type", "text"), ("required", "")])?;
    form_group(doc, form, "textarea", "message", "Message", &[("rows", "5"), ("required", "")])?;
    text_element(doc, form, "button", &[("type", "submit"), ("class", "btn btn-primary")], "Send Message")?;
    Ok(())
}

/// Build the landing page document.
///
/// # Errors
///
/// Returns an error if building the tree fails.
pub fn standard_document() -> Result<Document, DomError> {
    let mut doc = Document::new();
    let body = doc.body();
    header(&mut doc, body)?;
    sections(&mut doc, body)?;
    contact(&mut doc, body)?;
    Ok(doc)
}

/// The landing page in a 1280x800 viewport scrolled to the top.
///
/// # Errors
///
/// Returns an error if building the tree fails.
pub fn standard_page() -> Result<PageContext, DomError> {
    Ok(PageContext::new(
        standard_document()?,
        Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
    ))
}
