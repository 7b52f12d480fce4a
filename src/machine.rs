use bitflags::bitflags;
use thiserror::Error;

use crate::keyword::{self, Keyword, Polarity, Tag};
use crate::{EtHandler, IndentDir, IndentSide, Warning};

/// Default initial font size, in points.
pub const NORMAL_FONT_SIZE: i32 = 10;

/// Floor applied to the font size at emission time. The stored size is
/// deliberately left unclamped so that unbalanced size-step tags still
/// restore correctly later.
pub const MIN_FONT_SIZE: i32 = 6;

/// Points added or removed by one `<bigger>`/`<smaller>` step.
const SIZE_STEP: i32 = 2;

/// Maximum nesting depth of justification modes.
pub const MAX_JUSTIFY_DEPTH: usize = 16;

bitflags! {
    /// Character attribute mask. The three bits combine freely, selecting
    /// one of eight font variants; the fixed-width switch is an attribute
    /// rather than a family change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontStyle: u8 {
        const BOLD = 1;
        const ITALIC = 2;
        const FIXED = 4;
    }
}

/// Justification modes, numbered as the serialization target expects them
/// (`JU 0` = left through `JU 3` = full).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
    Full,
}

impl Justify {
    /// The mode's stable numeric code.
    pub const fn code(self) -> u8 {
        match self {
            Justify::Left => 0,
            Justify::Center => 1,
            Justify::Right => 2,
            Justify::Full => 3,
        }
    }
}

/// Fatal conditions that abort a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// More justification modes were opened than the stack can hold.
    #[error("justification stack overflow: more than {MAX_JUSTIFY_DEPTH} nested modes")]
    JustifyOverflow,
    /// A justification mode was closed with none open.
    #[error("justification stack underflow: close without a matching open")]
    JustifyUnderflow,
}

/// Configuration consumed by the machine itself.
///
/// Serializer-side options (primary font family, page decoration) live on
/// [`crate::PsRenderer`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial font size in points.
    pub font_size: i32,
    /// Pass unrecognized tags through to the output as literal text
    /// instead of discarding them.
    pub show_tags: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_size: NORMAL_FONT_SIZE,
            show_tags: false,
        }
    }
}

/// Bounded LIFO of previously active justification modes.
#[derive(Debug)]
struct JustifyStack {
    slots: [Justify; MAX_JUSTIFY_DEPTH],
    len: usize,
}

impl JustifyStack {
    const fn new() -> Self {
        Self {
            slots: [Justify::Left; MAX_JUSTIFY_DEPTH],
            len: 0,
        }
    }

    fn push(&mut self, mode: Justify) -> Result<(), Error> {
        if self.len == MAX_JUSTIFY_DEPTH {
            return Err(Error::JustifyOverflow);
        }
        self.slots[self.len] = mode;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<Justify, Error> {
        if self.len == 0 {
            return Err(Error::JustifyUnderflow);
        }
        self.len -= 1;
        Ok(self.slots[self.len])
    }
}

/// Tokenizer state. The two `After*` states stand in for one byte of
/// lookahead: the byte after a mid-line newline decides between a line
/// break and a space, and the byte after a `<` decides between a literal
/// bracket and the start of a keyword.
#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Scan,
    AfterNewline,
    AfterLt,
}

pub struct EtMachine<H> {
    handler: H,
    state: State,
    /// The literal run being accumulated, including any serializer escapes.
    buf: String,
    /// Mid-run of consecutive space characters.
    space: bool,
    /// A bracketed keyword is open and not yet closed by `>`.
    keyword: bool,
    style: FontStyle,
    underline: bool,
    font_size: i32,
    justify: Justify,
    jstack: JustifyStack,
    /// The next emitted content starts a fresh line.
    at_margin: bool,
    /// Inside a `<param>` region: tokens are parsed but not emitted.
    suppress: bool,
    show_tags: bool,
}

impl<H> EtMachine<H> {
    pub fn new(handler: H) -> Self {
        Self::with_config(Config::default(), handler)
    }

    pub fn with_config(config: Config, handler: H) -> Self {
        Self {
            handler,
            state: State::Scan,
            buf: String::new(),
            space: false,
            keyword: false,
            style: FontStyle::empty(),
            underline: false,
            font_size: config.font_size,
            justify: Justify::Left,
            jstack: JustifyStack::new(),
            at_margin: true,
            suppress: false,
            show_tags: config.show_tags,
        }
    }

    #[inline(always)]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    #[inline(always)]
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    #[inline(always)]
    pub fn take_handler(self) -> H {
        self.handler
    }
}

impl<H: EtHandler> EtMachine<H> {
    /// Feeds a chunk of the input stream to the machine.
    ///
    /// A fatal error leaves the machine in an unspecified state; the run
    /// should be abandoned.
    pub fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        for &b in data {
            self.write_byte(b)?;
        }
        Ok(())
    }

    pub fn write_byte(&mut self, b: u8) -> Result<(), Error> {
        match self.state {
            State::Scan => self.scan_byte(b),
            State::AfterNewline => {
                self.state = State::Scan;
                if b == b'\n' {
                    // Two consecutive newlines collapse to one break.
                    self.flush_token();
                    self.dispatch(Tag::NEWLINE)?;
                    return Ok(());
                }
                // An isolated newline is a space; the deferred byte is
                // then reprocessed as ordinary input.
                if !self.space {
                    self.flush_token();
                    self.space = true;
                }
                self.buf.push(' ');
                self.scan_byte(b)
            }
            State::AfterLt => {
                self.state = State::Scan;
                if b == b'<' {
                    // Doubled bracket: one literal `<`, no keyword.
                    self.buf.push('<');
                    return Ok(());
                }
                self.flush_token();
                self.buf.push('<');
                self.keyword = true;
                self.scan_byte(b)
            }
        }
    }

    /// Finishes the run: resolves any deferred lookahead and flushes the
    /// remaining buffered token.
    pub fn finish(&mut self) {
        match self.state {
            State::Scan => {}
            State::AfterNewline => {
                // A trailing lone newline is still a space; there is no
                // end-of-stream suppression.
                self.state = State::Scan;
                if !self.space {
                    self.flush_token();
                    self.space = true;
                }
                self.buf.push(' ');
            }
            State::AfterLt => {
                self.state = State::Scan;
                self.flush_token();
                self.buf.push('<');
            }
        }
        self.flush_token();
    }

    fn scan_byte(&mut self, b: u8) -> Result<(), Error> {
        match b {
            // At the margin a newline is itself a break; mid-line the
            // next byte decides.
            b'\n' => {
                if self.at_margin {
                    self.dispatch(Tag::NEWLINE)?;
                } else {
                    self.state = State::AfterNewline;
                }
                Ok(())
            }
            b'\t' => {
                self.flush_token();
                if !self.suppress {
                    self.handler.tab(self.underline);
                }
                Ok(())
            }
            // Carriage returns are ignored.
            b'\r' => Ok(()),
            b' ' => {
                if !self.space {
                    self.flush_token();
                    self.space = true;
                }
                self.buf.push(' ');
                Ok(())
            }
            b'<' => {
                if self.space {
                    self.flush_token();
                }
                self.state = State::AfterLt;
                Ok(())
            }
            b'>' => {
                if self.space {
                    self.flush_token();
                }
                self.buf.push('>');
                if self.keyword {
                    match keyword::recognize(&mut self.buf) {
                        Some(tag) => self.dispatch(tag)?,
                        None if self.show_tags => self.flush_token(),
                        None => {
                            // Discard the junk tag as if it never
                            // appeared, leaving the margin state fresh.
                            self.buf.clear();
                            self.space = false;
                            self.keyword = false;
                            self.at_margin = true;
                        }
                    }
                }
                Ok(())
            }
            // Characters special to the serialization target are escaped
            // as they are buffered.
            b'\\' | b'(' | b')' => {
                if self.space {
                    self.flush_token();
                }
                self.buf.push('\\');
                self.buf.push(b as char);
                if !self.keyword {
                    self.at_margin = false;
                }
                Ok(())
            }
            _ => {
                if self.space {
                    self.flush_token();
                }
                self.buf.push(b as char);
                if !self.keyword {
                    self.at_margin = false;
                }
                Ok(())
            }
        }
    }

    /// Applies a recognized tag to the attribute state, emitting whatever
    /// directives the transition calls for.
    fn dispatch(&mut self, tag: Tag) -> Result<(), Error> {
        let on = tag.polarity == Polarity::On;
        match tag.keyword {
            Keyword::Newline => self.line_break(),
            Keyword::Bold => self.style.set(FontStyle::BOLD, on),
            Keyword::Italic => self.style.set(FontStyle::ITALIC, on),
            Keyword::Fixed => self.style.set(FontStyle::FIXED, on),
            Keyword::Underline => self.underline = on,
            Keyword::Center
            | Keyword::FlushLeft
            | Keyword::FlushRight
            | Keyword::FlushBoth
            | Keyword::NoFill => {
                let mode = match tag.keyword {
                    Keyword::Center => Justify::Center,
                    Keyword::FlushRight => Justify::Right,
                    Keyword::FlushBoth => Justify::Full,
                    // `<nofill>` takes flush-left semantics.
                    _ => Justify::Left,
                };
                if !self.at_margin {
                    self.line_break();
                }
                if on {
                    self.push_justify(mode)?;
                } else {
                    self.pop_justify(mode)?;
                }
                self.handler.set_justify(self.justify);
            }
            Keyword::Indent | Keyword::IndentRight => {
                let side = if tag.keyword == Keyword::Indent {
                    IndentSide::Left
                } else {
                    IndentSide::Right
                };
                let dir = if on { IndentDir::In } else { IndentDir::Out };
                self.handler.indent(dir, side, self.at_margin);
            }
            Keyword::Bigger => {
                self.font_size += if on { SIZE_STEP } else { -SIZE_STEP };
            }
            Keyword::Smaller => {
                self.font_size += if on { -SIZE_STEP } else { SIZE_STEP };
            }
            Keyword::Param => self.suppress = on,
            Keyword::Excerpt => {
                if !self.at_margin {
                    self.line_break();
                }
                if on {
                    self.handler.enter_excerpt();
                    self.handler.set_font_family(true);
                } else {
                    self.handler.exit_excerpt();
                    self.handler.set_font_family(false);
                }
            }
        }
        self.buf.clear();
        self.keyword = false;
        Ok(())
    }

    /// Flushes the buffered literal run as one output directive.
    ///
    /// A no-op on an empty buffer. While suppressed, the bookkeeping still
    /// happens but nothing is emitted.
    fn flush_token(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        if !self.suppress {
            if self.space && self.buf.len() == 1 {
                // Shortcut directive for a single space.
                self.handler.show_space(self.underline);
            } else {
                let action = (self.space as u8) * 2 + self.underline as u8;
                let size = self.font_size.max(MIN_FONT_SIZE);
                self.handler.show_text(&self.buf, size, self.style, action);
            }
        }
        self.buf.clear();
        self.space = false;
        self.keyword = false;
        self.at_margin = false;
    }

    fn line_break(&mut self) {
        self.handler.line_break();
        self.at_margin = true;
    }

    fn push_justify(&mut self, mode: Justify) -> Result<(), Error> {
        self.jstack.push(self.justify)?;
        self.justify = mode;
        Ok(())
    }

    fn pop_justify(&mut self, closed: Justify) -> Result<(), Error> {
        if closed != self.justify {
            self.handler.warning(Warning::JustifyMismatch {
                closed,
                active: self.justify,
            });
        }
        self.justify = self.jstack.pop()?;
        Ok(())
    }
}
