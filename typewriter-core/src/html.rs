//! Element classes and name rules.

use std::borrow::Cow;

use phf::phf_set;
use unicode_xid::UnicodeXID;

/// Elements that never have content or an end tag.
static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "source", "track", "wbr",
};

/// Elements whose content is taken verbatim up to the matching end tag.
/// Character references inside are not references.
static RAW_TEXT_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "script", "style",
};

/// Scanned like raw text, but character references still apply.
static RCDATA_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "textarea", "title",
};

#[inline]
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(name)
}

#[inline]
pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(name)
}

#[inline]
pub fn is_rcdata(name: &str) -> bool {
    RCDATA_ELEMENTS.contains(name)
}

/// Content runs to the matching end tag without being lexed as markup.
#[inline]
pub fn is_verbatim(name: &str) -> bool {
    is_raw_text(name) || is_rcdata(name)
}

#[inline]
pub fn is_tag_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

#[inline]
pub fn is_attr_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | ':' | '@')
}

/// Continuation characters shared by tag and attribute names.
#[inline]
pub fn is_name_continue(c: char) -> bool {
    c.is_xid_continue() || matches!(c, '-' | ':' | '.')
}

/// Lower-case a name, borrowing when it already is.
pub fn lowercase(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_uppercase) {
        Cow::Owned(name.to_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Length in bytes of a complete character reference at the start of `s`
/// (`&amp;`, `&#38;`, `&#x26;`), or None when `s` starts with a bare `&`.
pub fn char_ref_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }
    let body = &bytes[1..];
    let digits = match *body.first()? {
        b'#' => match *body.get(1)? {
            b'x' | b'X' => {
                let n = body[2..].iter().take_while(|b| b.is_ascii_hexdigit()).count();
                (n > 0).then_some(2 + n)?
            }
            _ => {
                let n = body[1..].iter().take_while(|b| b.is_ascii_digit()).count();
                (n > 0).then_some(1 + n)?
            }
        },
        b if b.is_ascii_alphabetic() => body.iter().take_while(|b| b.is_ascii_alphanumeric()).count(),
        _ => return None,
    };
    (body.get(digits) == Some(&b';')).then_some(digits + 2)
}
