//! Defines the [`MarkdownCollector`], which renders every file of the
//! markdown directory to HTML, and the [`to_html`] conversion it uses.

use crate::context::Mapping;
use crate::walk::{FileEntry, Visitor};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use std::collections::HashMap;
use std::convert::Infallible;

/// Converts markdown to HTML. Conversion never fails; malformed markdown is
/// rendered as well as CommonMark allows.
///
/// Besides CommonMark, tables, strikethrough, footnotes, task lists, and
/// smart punctuation are enabled. Every heading gets an `id` derived from its
/// text so pages can link to sections (e.g., `# Hello` renders as
/// `<h1 id="hello">Hello</h1>`).
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(
        &mut out,
        with_heading_ids(Parser::new_ext(markdown, options)).into_iter(),
    );
    out
}

// Replaces the start and end tags of each heading with raw HTML carrying an
// `id` attribute. Heading contents pass through untouched so they are still
// escaped by the HTML writer.
fn with_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut anchors = Anchors::default();
    let mut out = Vec::new();
    let mut heading: Option<Vec<Event<'a>>> = None;

    for ev in events {
        match ev {
            Event::Start(Tag::Heading(_)) => heading = Some(Vec::new()),
            Event::End(Tag::Heading(level)) => {
                let inner = heading.take().unwrap_or_default();
                let id = anchors.claim(&plain_text(&inner));
                out.push(raw_html(format!("<h{} id=\"{}\">", level, id)));
                out.extend(inner);
                out.push(raw_html(format!("</h{}>\n", level)));
            }
            ev => match &mut heading {
                Some(inner) => inner.push(ev),
                None => out.push(ev),
            },
        }
    }

    out
}

fn raw_html<'a>(html: String) -> Event<'a> {
    Event::Html(CowStr::Boxed(html.into_boxed_str()))
}

fn plain_text(events: &[Event]) -> String {
    let mut text = String::new();
    for ev in events {
        match ev {
            Event::Text(s) | Event::Code(s) => text.push_str(s),
            _ => {}
        }
    }
    text
}

/// Hands out heading ids that are unique within one document. The first
/// `Intro` heading gets `intro`, the next one `intro-1`, and so on.
#[derive(Default)]
struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    fn claim(&mut self, text: &str) -> String {
        let mut base = slug::slugify(text);
        if base.is_empty() {
            base = String::from("section");
        }
        let count = self.seen.entry(base.clone()).or_insert(0);
        let id = match *count {
            0 => base,
            n => format!("{}-{}", base, n),
        };
        *count += 1;
        id
    }
}

/// Collects rendered markdown files by name. Run it over the markdown
/// directory with [`crate::walk::iterate_dir`], then take the result with
/// [`MarkdownCollector::into_mapping`].
#[derive(Default)]
pub struct MarkdownCollector {
    parsed: Mapping,
}

impl MarkdownCollector {
    pub fn new() -> MarkdownCollector {
        MarkdownCollector::default()
    }

    /// Consumes the collector, returning rendered HTML keyed by file name.
    pub fn into_mapping(self) -> Mapping {
        self.parsed
    }
}

impl Visitor for MarkdownCollector {
    type Error = Infallible;

    /// Renders `entry` and stores the HTML under its file name. Invalid UTF-8
    /// is replaced rather than rejected.
    fn visit(&mut self, entry: &FileEntry) -> Result<(), Infallible> {
        self.parsed.insert(&entry.name, to_html(&entry.text()));
        Ok(())
    }
}
