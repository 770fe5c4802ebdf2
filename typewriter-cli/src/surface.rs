//! Terminal surfaces.
//!
//! Each unit is written and flushed immediately so the reveal is visible
//! as it happens. Write errors are kept and reported once the run ends,
//! since `Surface::render` cannot fail.

use std::io::{self, Write};

use typewriter_core::{html, RevealUnit, Surface};

/// Writes every unit verbatim.
pub struct MarkupSurface<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> MarkupSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for MarkupSurface<W> {
    fn render(&mut self, unit: &str) {
        write_unit(&mut self.out, unit, &mut self.error);
    }

    fn finish(&mut self) {
        write_unit(&mut self.out, "\n", &mut self.error);
    }
}

/// Writes only text, the way a browser would show it: tags are hidden,
/// `script`/`style` content is skipped and character references are
/// decoded.
pub struct TextSurface<W: Write> {
    out: W,
    /// Name of the raw-text element being skipped
    hidden: Option<String>,
    error: Option<io::Error>,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            hidden: None,
            error: None,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TextSurface<W> {
    /// Plain text; references are decoded.
    fn render(&mut self, unit: &str) {
        if self.hidden.is_none() {
            let text = html_escape::decode_html_entities(unit);
            write_unit(&mut self.out, &text, &mut self.error);
        }
    }

    fn render_unit(&mut self, unit: &RevealUnit<'_>) {
        match unit {
            RevealUnit::OpenTag(_) => {
                if self.hidden.is_none() {
                    self.hidden = unit
                        .tag_name()
                        .filter(|name| html::is_raw_text(name))
                        .map(str::to_owned);
                }
            }
            RevealUnit::CloseTag(_) => {
                if self.hidden.as_deref() == unit.tag_name() {
                    self.hidden = None;
                }
            }
            RevealUnit::Char(text) | RevealUnit::Text(text) => self.render(text),
        }
    }

    fn finish(&mut self) {
        write_unit(&mut self.out, "\n", &mut self.error);
    }
}

/// Surfaces that buffer a write failure for later.
pub trait TakeError {
    fn take_error(&mut self) -> Option<io::Error>;
}

impl<W: Write> TakeError for MarkupSurface<W> {
    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<W: Write> TakeError for TextSurface<W> {
    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

fn write_unit<W: Write>(out: &mut W, unit: &str, error: &mut Option<io::Error>) {
    if error.is_some() {
        return;
    }
    if let Err(e) = out.write_all(unit.as_bytes()).and_then(|_| out.flush()) {
        *error = Some(e);
    }
}
