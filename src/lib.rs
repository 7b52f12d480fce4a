//! Enriched-text state machine implementation.
//!
//! This library provides the lowest-level handling of an RFC 1563
//! "text/enriched" data stream, recognizing bracketed formatting tags and
//! collapsing whitespace, and delivering the resulting formatting
//! directives to a caller-provided handler.
//!
//! For example, given the input `"Hello, <bold>world</bold>!"` this library
//! can report that `world` is to be shown in the bold variant of the
//! current font, but it's up to the provided handler to turn that into
//! output for a concrete device. [`PsRenderer`] is one such handler,
//! producing PostScript for a paginated printer the way the classic
//! `et2ps` filter did.
//!
//! The main entry point in this crate is [`EtMachine`], which implements
//! the tokenizer and attribute state machine and delivers directives to an
//! implementation of trait [`EtHandler`].
//!
//! ```rust
//! # use etmachine::{et_handler_fn, EtEvent, EtMachine, FontStyle};
//! # let mut evts: Vec<EtEvent> = Vec::new();
//! let mut machine = EtMachine::new(et_handler_fn(|event| {
//!     println!("{event:?}");
//! #   evts.push(event);
//! }));
//! machine.write(b"Hello, <bold>world</bold>!").unwrap();
//! machine.finish();
//! # drop(machine);
//! # assert_eq!(&evts[..], &[
//! #     EtEvent::ShowText { text: "Hello,".into(), size: 10, font: FontStyle::empty(), action: 0 },
//! #     EtEvent::ShowSpace { underlined: false },
//! #     EtEvent::ShowText { text: "world".into(), size: 10, font: FontStyle::BOLD, action: 0 },
//! #     EtEvent::ShowText { text: "!".into(), size: 10, font: FontStyle::empty(), action: 0 },
//! # ]);
//! ```
//!
//! ```plaintext
//! ShowText { text: "Hello,", size: 10, font: FontStyle(0x0), action: 0 }
//! ShowSpace { underlined: false }
//! ShowText { text: "world", size: 10, font: FontStyle(BOLD), action: 0 }
//! ShowText { text: "!", size: 10, font: FontStyle(0x0), action: 0 }
//! ```

mod handler;
mod keyword;
mod machine;
mod render;

pub use handler::{et_handler_fn, EtEvent, EtHandler, IndentDir, IndentSide, Warning};
pub use machine::{
    Config, Error, EtMachine, FontStyle, Justify, MAX_JUSTIFY_DEPTH, MIN_FONT_SIZE,
    NORMAL_FONT_SIZE,
};
pub use render::{PsRenderer, RenderOptions};

#[cfg(test)]
mod tests;
