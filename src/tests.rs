use super::*;

use pretty_assertions::assert_eq;

use crate::keyword::{recognize, Keyword, Polarity};

fn text(text: &str, size: i32, font: FontStyle, action: u8) -> EtEvent {
    EtEvent::ShowText {
        text: text.to_owned(),
        size,
        font,
        action,
    }
}

fn plain(t: &str) -> EtEvent {
    text(t, 10, FontStyle::empty(), 0)
}

const SPACE: EtEvent = EtEvent::ShowSpace { underlined: false };

#[test]
fn literal_words() {
    let mut m = testing_machine();
    m.write(b"Hello world").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[plain("Hello"), SPACE, plain("world")]
    );
}

#[test]
fn bold_region() {
    let mut m = testing_machine();
    m.write(b"Hello <bold>world</bold>!").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            plain("Hello"),
            SPACE,
            text("world", 10, FontStyle::BOLD, 0),
            plain("!"),
        ]
    );
}

#[test]
fn attribute_bits_combine() {
    let mut m = testing_machine();
    m.write(b"<fixed><italic>x</italic>y").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            text("x", 10, FontStyle::FIXED | FontStyle::ITALIC, 0),
            text("y", 10, FontStyle::FIXED, 0),
        ]
    );
}

#[test]
fn keywords_fold_case() {
    let mut m = testing_machine();
    m.write(b"<BoLd>x").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[text("x", 10, FontStyle::BOLD, 0)]);
}

#[test]
fn paragraph_break() {
    let mut m = testing_machine();
    m.write(b"line one\n\nline two").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            plain("line"),
            SPACE,
            plain("one"),
            EtEvent::LineBreak,
            plain("line"),
            SPACE,
            plain("two"),
        ]
    );
}

#[test]
fn lone_newline_is_a_space() {
    let mut m = testing_machine();
    m.write(b"a\nb").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[plain("a"), SPACE, plain("b")]);
}

#[test]
fn newline_at_margin_breaks_immediately() {
    let mut m = testing_machine();
    m.write(b"\n\na").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[EtEvent::LineBreak, EtEvent::LineBreak, plain("a")]
    );
}

#[test]
fn trailing_lone_newline_becomes_space() {
    // No special end-of-stream suppression.
    let mut m = testing_machine();
    m.write(b"x\n").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[plain("x"), SPACE]);
}

#[test]
fn carriage_returns_ignored() {
    let mut m = testing_machine();
    m.write(b"a\rb").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[plain("ab")]);
}

#[test]
fn tab_directives() {
    let mut m = testing_machine();
    m.write(b"a\tb<underline>\t").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            plain("a"),
            EtEvent::Tab { underlined: false },
            text("b", 10, FontStyle::empty(), 0),
            EtEvent::Tab { underlined: true },
        ]
    );
}

#[test]
fn underline_action_codes() {
    // action = 2*is_space_run + is_underlined
    let mut m = testing_machine();
    m.write(b"<underline>a  b").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            text("a", 10, FontStyle::empty(), 1),
            text("  ", 10, FontStyle::empty(), 3),
            text("b", 10, FontStyle::empty(), 1),
        ]
    );
}

#[test]
fn underlined_single_space() {
    let mut m = testing_machine();
    m.write(b"<underline>a b").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            text("a", 10, FontStyle::empty(), 1),
            EtEvent::ShowSpace { underlined: true },
            text("b", 10, FontStyle::empty(), 1),
        ]
    );
}

#[test]
fn doubled_bracket_is_literal() {
    let mut m = testing_machine();
    m.write(b"<<x").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[plain("<x")]);
}

#[test]
fn doubled_bracket_then_unknown_tag() {
    let mut m = testing_machine();
    m.write(b"<<literal<bracket>>").unwrap();
    m.finish();
    // The unknown tag is dropped; the stray closing bracket is literal.
    assert_eq!(m.handler().log(), &[plain("<literal"), plain(">")]);
}

#[test]
fn target_specials_are_escaped() {
    let mut m = testing_machine();
    m.write(b"(x)\\").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[plain("\\(x\\)\\\\")]);
}

#[test]
fn unknown_tag_dropped_resets_margin() {
    let mut m = testing_machine();
    m.write(b"<junk>\n").unwrap();
    m.finish();
    // The drop leaves the machine at the margin, so the newline is a break.
    assert_eq!(m.handler().log(), &[EtEvent::LineBreak]);
}

#[test]
fn unknown_tag_shown_when_configured() {
    let config = Config {
        show_tags: true,
        ..Config::default()
    };
    let mut m = EtMachine::with_config(config, LogHandler::new());
    m.write(b"<JuNk>").unwrap();
    m.finish();
    // Passed through in the folded spelling the recognizer left behind.
    assert_eq!(m.handler().log(), &[plain("<junk>")]);
}

#[test]
fn center_at_margin_round_trips() {
    let mut m = testing_machine();
    m.write(b"<center>Title</center>").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            EtEvent::SetJustify(Justify::Center),
            plain("Title"),
            EtEvent::LineBreak,
            EtEvent::SetJustify(Justify::Left),
        ]
    );
}

#[test]
fn nested_justification_restores_outer_mode() {
    let mut m = testing_machine();
    m.write(b"<center><flushright>a</flushright>b</center>").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            EtEvent::SetJustify(Justify::Center),
            EtEvent::SetJustify(Justify::Right),
            plain("a"),
            EtEvent::LineBreak,
            EtEvent::SetJustify(Justify::Center),
            plain("b"),
            EtEvent::LineBreak,
            EtEvent::SetJustify(Justify::Left),
        ]
    );
}

#[test]
fn nofill_takes_flush_left_semantics() {
    let mut m = testing_machine();
    m.write(b"<nofill>a</nofill>").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            EtEvent::SetJustify(Justify::Left),
            plain("a"),
            EtEvent::LineBreak,
            EtEvent::SetJustify(Justify::Left),
        ]
    );
}

#[test]
fn justification_mismatch_warns_and_continues() {
    let mut m = testing_machine();
    m.write(b"<center>x</flushright>y").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            EtEvent::SetJustify(Justify::Center),
            plain("x"),
            EtEvent::LineBreak,
            EtEvent::Warning(Warning::JustifyMismatch {
                closed: Justify::Right,
                active: Justify::Center,
            }),
            EtEvent::SetJustify(Justify::Left),
            plain("y"),
        ]
    );
}

#[test]
fn justification_overflow_is_fatal() {
    let mut m = testing_machine();
    m.write(&b"<center>".repeat(MAX_JUSTIFY_DEPTH)).unwrap();
    assert_eq!(m.write(b"<center>"), Err(Error::JustifyOverflow));
}

#[test]
fn justification_underflow_is_fatal() {
    let mut m = testing_machine();
    assert_eq!(m.write(b"</flushleft>"), Err(Error::JustifyUnderflow));
}

#[test]
fn size_steps_floor_at_emission_only() {
    let mut m = testing_machine();
    let input = b"<smaller><smaller><smaller><smaller><smaller>x\
</smaller></smaller></smaller></smaller></smaller>y";
    m.write(input).unwrap();
    m.finish();
    // Stored size reaches 0 but emits as 6; balanced closes restore 10.
    assert_eq!(
        m.handler().log(),
        &[
            text("x", 6, FontStyle::empty(), 0),
            text("y", 10, FontStyle::empty(), 0),
        ]
    );
}

#[test]
fn bigger_raises_size() {
    let mut m = testing_machine();
    m.write(b"<bigger>x</bigger>y").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            text("x", 12, FontStyle::empty(), 0),
            text("y", 10, FontStyle::empty(), 0),
        ]
    );
}

#[test]
fn param_region_is_parsed_but_not_emitted() {
    let mut m = testing_machine();
    m.write(b"a<param>secret <bold>stuff</bold></param>b").unwrap();
    m.finish();
    // The attribute changes inside the region still happened.
    assert_eq!(
        m.handler().log(),
        &[plain("a"), text("b", 10, FontStyle::empty(), 0)]
    );
}

#[test]
fn excerpt_toggles_family_and_indents() {
    let mut m = testing_machine();
    m.write(b"a<excerpt>q</excerpt>").unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            plain("a"),
            EtEvent::LineBreak,
            EtEvent::EnterExcerpt,
            EtEvent::SetFontFamily { alternate: true },
            plain("q"),
            EtEvent::LineBreak,
            EtEvent::ExitExcerpt,
            EtEvent::SetFontFamily { alternate: false },
        ]
    );
}

#[test]
fn indent_sub_cases() {
    let mut m = testing_machine();
    m.write(b"<indent>x<indentright></indent>\n\n</indentright>")
        .unwrap();
    m.finish();
    assert_eq!(
        m.handler().log(),
        &[
            EtEvent::Indent {
                dir: IndentDir::In,
                side: IndentSide::Left,
                fresh_line: true,
            },
            plain("x"),
            EtEvent::Indent {
                dir: IndentDir::In,
                side: IndentSide::Right,
                fresh_line: false,
            },
            EtEvent::Indent {
                dir: IndentDir::Out,
                side: IndentSide::Left,
                fresh_line: false,
            },
            EtEvent::LineBreak,
            EtEvent::Indent {
                dir: IndentDir::Out,
                side: IndentSide::Right,
                fresh_line: true,
            },
        ]
    );
}

#[test]
fn initial_size_comes_from_config() {
    let config = Config {
        font_size: 14,
        ..Config::default()
    };
    let mut m = EtMachine::with_config(config, LogHandler::new());
    m.write(b"x").unwrap();
    m.finish();
    assert_eq!(m.handler().log(), &[text("x", 14, FontStyle::empty(), 0)]);
}

#[test]
fn recognizer_polarity_and_fold() {
    let mut buf = String::from("<bold>");
    let tag = recognize(&mut buf).unwrap();
    assert_eq!((tag.keyword, tag.polarity), (Keyword::Bold, Polarity::On));

    let mut buf = String::from("</ITALIC>");
    let tag = recognize(&mut buf).unwrap();
    assert_eq!((tag.keyword, tag.polarity), (Keyword::Italic, Polarity::Off));
    assert_eq!(buf, "</italic>");
}

#[test]
fn recognizer_rejects_junk() {
    for junk in ["<nl>", "<bol d>", "<>", "</>", "<boldx>"] {
        let mut buf = String::from(junk);
        assert_eq!(recognize(&mut buf), None, "{junk}");
    }
}

fn testing_machine() -> EtMachine<LogHandler> {
    EtMachine::new(LogHandler::new())
}

struct LogHandler {
    log: Vec<EtEvent>,
}

impl LogHandler {
    pub fn new() -> Self {
        Self { log: Vec::new() }
    }

    pub fn log(&self) -> &[EtEvent] {
        &self.log
    }
}

impl EtHandler for LogHandler {
    fn show_text(&mut self, text: &str, size: i32, font: FontStyle, action: u8) {
        self.log.push(EtEvent::ShowText {
            text: text.to_owned(),
            size,
            font,
            action,
        });
    }

    fn show_space(&mut self, underlined: bool) {
        self.log.push(EtEvent::ShowSpace { underlined });
    }

    fn tab(&mut self, underlined: bool) {
        self.log.push(EtEvent::Tab { underlined });
    }

    fn line_break(&mut self) {
        self.log.push(EtEvent::LineBreak);
    }

    fn set_justify(&mut self, mode: Justify) {
        self.log.push(EtEvent::SetJustify(mode));
    }

    fn indent(&mut self, dir: IndentDir, side: IndentSide, fresh_line: bool) {
        self.log.push(EtEvent::Indent {
            dir,
            side,
            fresh_line,
        });
    }

    fn enter_excerpt(&mut self) {
        self.log.push(EtEvent::EnterExcerpt);
    }

    fn exit_excerpt(&mut self) {
        self.log.push(EtEvent::ExitExcerpt);
    }

    fn set_font_family(&mut self, alternate: bool) {
        self.log.push(EtEvent::SetFontFamily { alternate });
    }

    fn warning(&mut self, warning: Warning) {
        self.log.push(EtEvent::Warning(warning));
    }
}
