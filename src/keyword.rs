/// Tags recognized by the machine.
///
/// `Newline` is synthetic: it is produced internally by the tokenizer's
/// newline handling and has no bracketed spelling, so a literal `<nl>` in
/// the input is an unknown tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Bold,
    Italic,
    Center,
    Fixed,
    Underline,
    Indent,
    IndentRight,
    Bigger,
    Smaller,
    FlushLeft,
    FlushRight,
    FlushBoth,
    NoFill,
    Param,
    Excerpt,
    Newline,
}

/// Whether a tag is the opening form (`<bold>`) or the closing form
/// (`</bold>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    On,
    Off,
}

/// A recognized tag: which keyword it names and which polarity it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tag {
    pub keyword: Keyword,
    pub polarity: Polarity,
}

impl Tag {
    /// The synthetic line-break tag dispatched by the tokenizer's newline
    /// handling. Its polarity carries no meaning.
    pub(crate) const NEWLINE: Tag = Tag {
        keyword: Keyword::Newline,
        polarity: Polarity::On,
    };
}

/// The recognized keyword names, ordered by expected frequency of use to
/// shorten the linear search for common tags.
const KEYWORDS: [(&str, Keyword); 15] = [
    ("bold", Keyword::Bold),
    ("italic", Keyword::Italic),
    ("center", Keyword::Center),
    ("fixed", Keyword::Fixed),
    ("underline", Keyword::Underline),
    ("indent", Keyword::Indent),
    ("indentright", Keyword::IndentRight),
    ("bigger", Keyword::Bigger),
    ("smaller", Keyword::Smaller),
    ("flushleft", Keyword::FlushLeft),
    ("flushright", Keyword::FlushRight),
    ("flushboth", Keyword::FlushBoth),
    ("nofill", Keyword::NoFill),
    ("param", Keyword::Param),
    ("excerpt", Keyword::Excerpt),
];

/// Tries to match a buffered bracketed run, `<` and `>` included, against
/// the keyword table.
///
/// The buffer is case-folded in place (ASCII only) before comparison, so a
/// caller that passes an unmatched tag through to the output will emit the
/// folded spelling. A leading `/` after the `<` selects the off polarity.
pub(crate) fn recognize(buf: &mut String) -> Option<Tag> {
    buf.make_ascii_lowercase();
    let inner = buf.strip_prefix('<')?.strip_suffix('>')?;
    let (name, polarity) = match inner.strip_prefix('/') {
        Some(rest) => (rest, Polarity::Off),
        None => (inner, Polarity::On),
    };
    KEYWORDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, keyword)| Tag { keyword, polarity })
}
