use thiserror::Error;

use crate::{FontStyle, Justify};

/// Direction of an indentation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentDir {
    In,
    Out,
}

/// Which margin an indentation change applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSide {
    Left,
    Right,
}

/// Non-fatal diagnostics reported while a run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Warning {
    /// A justification mode was closed while a different one was active.
    /// The machine forces the pop anyway; output may be weird.
    #[error("incorrect nesting of justification: closing {closed:?} while {active:?} is active")]
    JustifyMismatch { closed: Justify, active: Justify },
}

/// Trait for implementations that can process directives from an
/// [`crate::EtMachine`].
///
/// All of the provided method implementations perform no action at all.
pub trait EtHandler {
    /// Shows a literal run of text.
    ///
    /// `text` already carries the serialization target's escapes. `size` is
    /// the effective point size, floored at [`crate::MIN_FONT_SIZE`].
    /// `action` is `2*is_space_run + is_underlined`, so it is always in
    /// `0..=3`.
    #[inline(always)]
    fn show_text(&mut self, text: &str, size: i32, font: FontStyle, action: u8) {
        let _ = (text, size, font, action);
        // Silently ignored by default.
    }

    /// Shows a single space, the shortcut form of a one-space
    /// [`EtHandler::show_text`] run.
    #[inline(always)]
    fn show_space(&mut self, underlined: bool) {
        let _ = underlined;
        // Silently ignored by default.
    }

    /// Advances to the next tab stop.
    #[inline(always)]
    fn tab(&mut self, underlined: bool) {
        let _ = underlined;
        // Silently ignored by default.
    }

    /// Ends the current line.
    #[inline(always)]
    fn line_break(&mut self) {
        // Silently ignored by default.
    }

    /// Changes the active justification mode. Always preceded by a
    /// [`EtHandler::line_break`] when the change happens mid-line.
    #[inline(always)]
    fn set_justify(&mut self, mode: Justify) {
        let _ = mode;
        // Silently ignored by default.
    }

    /// Changes the indentation by one step.
    ///
    /// `fresh_line` is true when the change lands at the start of a line;
    /// otherwise the consumer is expected to break the line first.
    #[inline(always)]
    fn indent(&mut self, dir: IndentDir, side: IndentSide, fresh_line: bool) {
        let _ = (dir, side, fresh_line);
        // Silently ignored by default.
    }

    /// Enters an excerpt (block quotation) region. Followed by a
    /// [`EtHandler::set_font_family`] selecting the alternate family.
    #[inline(always)]
    fn enter_excerpt(&mut self) {
        // Silently ignored by default.
    }

    /// Leaves an excerpt region. Followed by a
    /// [`EtHandler::set_font_family`] restoring the primary family.
    #[inline(always)]
    fn exit_excerpt(&mut self) {
        // Silently ignored by default.
    }

    /// Selects the primary or the alternate font family for the variable
    /// pitch slots. Which concrete family each slot names is the
    /// consumer's configuration.
    #[inline(always)]
    fn set_font_family(&mut self, alternate: bool) {
        let _ = alternate;
        // Silently ignored by default.
    }

    /// Reports a non-fatal diagnostic. The run continues.
    #[inline(always)]
    fn warning(&mut self, warning: Warning) {
        let _ = warning;
        // Silently ignored by default.
    }
}

/// Represents formatting directives delivered to a callback through
/// [`et_handler_fn`].
///
/// Each variant corresponds to a method of [`EtHandler`]. Unlike when
/// implementing `EtHandler` directly, the text of a `ShowText` is owned and
/// independent of the machine's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EtEvent {
    ShowText {
        text: String,
        size: i32,
        font: FontStyle,
        action: u8,
    },
    ShowSpace {
        underlined: bool,
    },
    Tab {
        underlined: bool,
    },
    LineBreak,
    SetJustify(Justify),
    Indent {
        dir: IndentDir,
        side: IndentSide,
        fresh_line: bool,
    },
    EnterExcerpt,
    ExitExcerpt,
    SetFontFamily {
        alternate: bool,
    },
    Warning(Warning),
}

/// Returns an [`EtHandler`] that calls the given function for each
/// directive produced by an associated [`crate::EtMachine`].
///
/// This can be a convenient way to implement `EtHandler`, but it forces a
/// copy of the text of every `ShowText` directive, whereas directly
/// implementing `EtHandler` borrows the machine's buffer.
pub fn et_handler_fn(f: impl FnMut(EtEvent)) -> impl EtHandler {
    EtHandlerFn { f }
}

struct EtHandlerFn<F> {
    f: F,
}

impl<F: FnMut(EtEvent)> EtHandler for EtHandlerFn<F> {
    #[inline(always)]
    fn show_text(&mut self, text: &str, size: i32, font: FontStyle, action: u8) {
        (self.f)(EtEvent::ShowText {
            text: text.to_owned(),
            size,
            font,
            action,
        });
    }

    #[inline(always)]
    fn show_space(&mut self, underlined: bool) {
        (self.f)(EtEvent::ShowSpace { underlined });
    }

    #[inline(always)]
    fn tab(&mut self, underlined: bool) {
        (self.f)(EtEvent::Tab { underlined });
    }

    #[inline(always)]
    fn line_break(&mut self) {
        (self.f)(EtEvent::LineBreak);
    }

    #[inline(always)]
    fn set_justify(&mut self, mode: Justify) {
        (self.f)(EtEvent::SetJustify(mode));
    }

    #[inline(always)]
    fn indent(&mut self, dir: IndentDir, side: IndentSide, fresh_line: bool) {
        (self.f)(EtEvent::Indent {
            dir,
            side,
            fresh_line,
        });
    }

    #[inline(always)]
    fn enter_excerpt(&mut self) {
        (self.f)(EtEvent::EnterExcerpt);
    }

    #[inline(always)]
    fn exit_excerpt(&mut self) {
        (self.f)(EtEvent::ExitExcerpt);
    }

    #[inline(always)]
    fn set_font_family(&mut self, alternate: bool) {
        (self.f)(EtEvent::SetFontFamily { alternate });
    }

    #[inline(always)]
    fn warning(&mut self, warning: Warning) {
        (self.f)(EtEvent::Warning(warning));
    }
}
