use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use etmachine::{Config, EtMachine, PsRenderer, RenderOptions};

/// Convert MIME enriched text (RFC 1563) on stdin to PostScript on stdout.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Draw a box along the page margins
    #[arg(short = 'b', long = "box")]
    draw_box: bool,

    /// Suppress the PostScript prolog, leaving the bare directive stream
    #[arg(short = 'p', long = "no-prolog")]
    no_prolog: bool,

    /// Use Times rather than Helvetica as the primary font family
    #[arg(short = 't', long = "times")]
    times: bool,

    /// Pass unrecognized tags through to the output
    #[arg(short = 'u', long = "show-tags")]
    show_tags: bool,

    /// Print a running header on each page
    #[arg(long = "headers")]
    headers: bool,

    /// Initial font size in points
    #[arg(
        short = 's',
        long = "size",
        value_name = "POINTS",
        default_value_t = 10,
        value_parser = clap::value_parser!(i32).range(1..=35)
    )]
    size: i32,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("et2ps: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout().lock();
    let mut renderer = PsRenderer::new(
        io::BufWriter::new(stdout),
        RenderOptions {
            prolog: !args.no_prolog,
            draw_box: args.draw_box,
            headers: args.headers,
            times_primary: args.times,
        },
    );
    renderer.prolog()?;

    let config = Config {
        font_size: args.size,
        show_tags: args.show_tags,
    };
    let mut machine = EtMachine::with_config(config, renderer);

    let mut stdin = io::stdin().lock();
    let mut buf = [0_u8; 4096];
    loop {
        let read_len = stdin.read(&mut buf)?;
        if read_len == 0 {
            break;
        }
        machine.write(&buf[..read_len])?;
    }
    machine.finish();

    let mut renderer = machine.take_handler();
    renderer.epilog()?;
    renderer.into_inner()?.flush()?;
    Ok(())
}
