//! Turns the reply page into the plain text of the letter.
//!
//! The page is parsed once, then each of [`CLEANUP_STEPS`] rewrites the tree in
//! order. A step whose markup is absent leaves the tree as it was. The cleaned
//! tree is finally rendered without links, images, emphasis markers or wrapping.

use html2text::render::TrivialDecorator;
use once_cell::sync::Lazy;
use scraper::{node::Text, ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

use crate::cfemail;

/// Wide enough that no line of a reply page is ever wrapped.
pub const UNWRAPPED_WIDTH: usize = 10_000;

static NO_PRINT: Lazy<Selector> = Lazy::new(|| Selector::parse(".noprint").unwrap());
static SKIP_MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("a.skip-main").unwrap());
static NO_SCRIPT: Lazy<Selector> = Lazy::new(|| Selector::parse("noscript").unwrap());
static OBFUSCATED_EMAIL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-cfemail]").unwrap());
static SIGNATURE: Lazy<Selector> = Lazy::new(|| Selector::parse("img.santaSig").unwrap());
static IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());

pub type CleanupStep = fn(&mut Html);

/// Applied in this order by [`clean`].
pub const CLEANUP_STEPS: &[(&str, CleanupStep)] = &[
    ("no-print regions", remove_no_print),
    ("skip link", remove_skip_link),
    ("noscript blocks", remove_noscript),
    ("obfuscated addresses", decode_obfuscated_emails),
    ("signature", replace_signature),
    ("images", remove_images),
];

/// Parses the page and applies every cleanup step.
pub fn clean(html: &str) -> Html {
    let mut document = Html::parse_document(html);
    for (name, step) in CLEANUP_STEPS {
        debug!(step = *name, "applying cleanup step");
        step(&mut document);
    }
    document
}

/// The plain text of a reply page.
pub fn reply_text(html: &str, width: usize) -> String {
    render(&clean(html), width)
}

/// Renders an already cleaned document. Never fails: if the renderer rejects the
/// document the bare text content is returned instead.
pub fn render(document: &Html, width: usize) -> String {
    let html = document.html();
    let text = html2text::config::with_decorator(TrivialDecorator::new())
        .string_from_read(html.as_bytes(), width)
        .unwrap_or_else(|err| {
            warn!(error = %err, "failed to render reply page, falling back to its raw text");
            document.root_element().text().collect()
        });
    text.trim().to_owned()
}

pub fn remove_no_print(document: &mut Html) {
    replace_elements(document, &NO_PRINT, |_| Replacement::Remove);
}

pub fn remove_skip_link(document: &mut Html) {
    replace_elements(document, &SKIP_MAIN, |_| Replacement::Remove);
}

pub fn remove_noscript(document: &mut Html) {
    replace_elements(document, &NO_SCRIPT, |_| Replacement::Remove);
}

/// Replaces each obfuscated address with the address itself.
pub fn decode_obfuscated_emails(document: &mut Html) {
    replace_elements(document, &OBFUSCATED_EMAIL, |element| {
        let Some(encoded) = element.value().attr("data-cfemail") else {
            return Replacement::Keep;
        };
        match cfemail::decode(encoded) {
            Ok(address) => Replacement::Text(address),
            Err(err) => {
                warn!(error = %err, encoded, "leaving undecodable address in place");
                Replacement::Keep
            }
        }
    });
}

/// Replaces the signature image with its alt text.
pub fn replace_signature(document: &mut Html) {
    replace_elements(document, &SIGNATURE, |element| {
        element
            .value()
            .attr("alt")
            .map_or(Replacement::Remove, |alt| Replacement::Text(alt.into()))
    });
}

pub fn remove_images(document: &mut Html) {
    replace_elements(document, &IMAGE, |_| Replacement::Remove);
}

enum Replacement {
    Keep,
    Remove,
    Text(String),
}

fn replace_elements(
    document: &mut Html,
    selector: &Selector,
    replacement: impl Fn(ElementRef<'_>) -> Replacement,
) {
    let planned = document
        .select(selector)
        .map(|element| (element.id(), replacement(element)))
        .collect::<Vec<_>>();

    for (id, replacement) in planned {
        let Some(mut node) = document.tree.get_mut(id) else {
            continue;
        };
        match replacement {
            Replacement::Keep => continue,
            Replacement::Remove => {}
            Replacement::Text(text) => {
                node.insert_before(Node::Text(Text { text: text.into() }));
            }
        }
        node.detach();
    }
}
