use std::fmt;
use std::io::{self, Write};

use crate::{EtHandler, FontStyle, IndentDir, IndentSide, Justify, Warning};

/// The pagination macro package prepended to the output.
const PROLOG: &str = include_str!("paginate.ps");

/// Short-hand font names used in emitted tokens, indexed by the attribute
/// mask. The first four are the variable pitch slots, the last four the
/// fixed pitch (Courier) slots.
const FONT_NAMES: [&str; 8] = ["f1", "f1b", "f1i", "f1bi", "f2", "f2b", "f2i", "f2bi"];

const HELVETICA: [&str; 4] = [
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
];
const TIMES: [&str; 4] = [
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
];
const COURIER: [&str; 4] = [
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
];

/// Serializer-side options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Prepend the pagination prolog. Turning this off is mostly useful
    /// when debugging the directive stream itself.
    pub prolog: bool,
    /// Draw a box along the margins of each page.
    pub draw_box: bool,
    /// Print a running header on each page.
    pub headers: bool,
    /// Use Times rather than Helvetica as the primary variable pitch
    /// family, making Helvetica the excerpt (alternate) family.
    pub times_primary: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            prolog: true,
            draw_box: false,
            headers: false,
            times_primary: false,
        }
    }
}

/// Renders the directive stream as PostScript for a paginated device.
///
/// Write errors occurring inside [`EtHandler`] callbacks are latched and
/// surfaced by [`PsRenderer::epilog`] or [`PsRenderer::into_inner`];
/// emission becomes a no-op once an error has been recorded. Warnings go
/// to stderr, unbuffered and line oriented.
pub struct PsRenderer<W: Write> {
    out: W,
    opts: RenderOptions,
    err: Option<io::Error>,
}

impl<W: Write> PsRenderer<W> {
    pub fn new(out: W, opts: RenderOptions) -> Self {
        Self {
            out,
            opts,
            err: None,
        }
    }

    /// Writes the document header, macro package and setup section.
    pub fn prolog(&mut self) -> io::Result<()> {
        if !self.opts.prolog {
            return Ok(());
        }
        writeln!(self.out, "%!PS")?;
        writeln!(self.out, "%%Creator: et2ps")?;
        writeln!(self.out, "%%BeginProlog")?;
        self.out.write_all(PROLOG.as_bytes())?;
        writeln!(self.out, "%%EndProlog")?;
        writeln!(self.out, "%%BeginSetup")?;
        if self.opts.draw_box {
            writeln!(self.out, "/BOX true def\nDB\t% draw box for first page")?;
        } else {
            writeln!(self.out, "/BOX false def")?;
        }
        if self.opts.headers {
            writeln!(self.out, "/HDR true def\n/PG 1 def")?;
            writeln!(self.out, "/MSG (Message converted by et2ps) def")?;
            writeln!(self.out, "PH\t% print header for first page")?;
        } else {
            writeln!(self.out, "/HDR false def")?;
        }
        writeln!(
            self.out,
            "{}",
            variable_font_defs(self.opts.times_primary)
        )?;
        writeln!(self.out, "{}", fixed_font_defs())?;
        writeln!(self.out, "%%EndSetup")?;
        Ok(())
    }

    /// Writes the trailer, forcing the final page out, and reports any
    /// write error latched during the run.
    pub fn epilog(&mut self) -> io::Result<()> {
        if let Some(err) = self.err.take() {
            return Err(err);
        }
        writeln!(self.out, "/BOX false def\n/HDR false def")?;
        writeln!(self.out, "NP")?;
        writeln!(self.out, "%%EOF")?;
        Ok(())
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        match self.err.take() {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = self.out.write_fmt(args) {
            self.err = Some(err);
        }
    }
}

/// Definitions binding the variable pitch slots to one concrete family.
fn variable_font_defs(times: bool) -> String {
    let family = if times { &TIMES } else { &HELVETICA };
    font_defs(&FONT_NAMES[..4], family)
}

fn fixed_font_defs() -> String {
    font_defs(&FONT_NAMES[4..], &COURIER)
}

fn font_defs(slots: &[&str], names: &[&str; 4]) -> String {
    use fmt::Write as _;
    let mut line = String::new();
    for (slot, name) in slots.iter().zip(names.iter()) {
        let _ = write!(line, "({name}) cvlit /{slot} exch def ");
    }
    line.pop(); // trailing space
    line
}

impl<W: Write> EtHandler for PsRenderer<W> {
    fn show_text(&mut self, text: &str, size: i32, font: FontStyle, action: u8) {
        let name = FONT_NAMES[font.bits() as usize];
        self.emit(format_args!("[({text}) {size} {name} {action}] C\n"));
    }

    fn show_space(&mut self, underlined: bool) {
        self.emit(format_args!("{}\n", if underlined { "US" } else { "S" }));
    }

    fn tab(&mut self, underlined: bool) {
        self.emit(format_args!("{} ", if underlined { "UT" } else { "T" }));
    }

    fn line_break(&mut self) {
        self.emit(format_args!("NL\n"));
    }

    fn set_justify(&mut self, mode: Justify) {
        self.emit(format_args!("/JU {} def\n", mode.code()));
    }

    fn indent(&mut self, dir: IndentDir, side: IndentSide, fresh_line: bool) {
        let name = match (side, dir, fresh_line) {
            (IndentSide::Left, IndentDir::In, true) => "ILM",
            (IndentSide::Left, IndentDir::In, false) => "DILM",
            (IndentSide::Left, IndentDir::Out, true) => "DLM",
            (IndentSide::Left, IndentDir::Out, false) => "DDLM",
            (IndentSide::Right, IndentDir::In, true) => "IRM",
            (IndentSide::Right, IndentDir::In, false) => "DIRM",
            (IndentSide::Right, IndentDir::Out, true) => "DRM",
            (IndentSide::Right, IndentDir::Out, false) => "DDRM",
        };
        self.emit(format_args!("{name}\n"));
    }

    fn enter_excerpt(&mut self) {
        self.emit(format_args!("ILM\n"));
    }

    fn exit_excerpt(&mut self) {
        self.emit(format_args!("DLM\n"));
    }

    fn set_font_family(&mut self, alternate: bool) {
        // The excerpt family is resolved against the configured primary:
        // entering an excerpt under a Times primary selects Helvetica.
        let times = alternate != self.opts.times_primary;
        self.emit(format_args!("{}\n", variable_font_defs(times)));
    }

    fn warning(&mut self, warning: Warning) {
        eprintln!("Warning: {warning}; output may be weird.");
    }
}
