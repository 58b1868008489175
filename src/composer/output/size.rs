//! Output size resolution when no input image supplies one.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::composer::common::argb::Size;
use crate::composer::common::error::Result;

/// Asks for the size of the output image. `Ok(None)` means the user
/// declined; an error means the query itself could not be carried out.
pub trait SizeQuery {
    fn ask_size(&mut self, initial: Size) -> Result<Option<Size>>;
}

impl<Q: SizeQuery + ?Sized> SizeQuery for &mut Q {
    fn ask_size(&mut self, initial: Size) -> Result<Option<Size>> {
        (**self).ask_size(initial)
    }
}

impl<Q: SizeQuery + ?Sized> SizeQuery for Box<Q> {
    fn ask_size(&mut self, initial: Size) -> Result<Option<Size>> {
        (**self).ask_size(initial)
    }
}

/// Answers every query with the same size, without interaction.
#[derive(Debug, Clone, Copy)]
pub struct FixedSize(pub Size);

impl SizeQuery for FixedSize {
    fn ask_size(&mut self, _initial: Size) -> Result<Option<Size>> {
        Ok(Some(self.0))
    }
}

/// Line-oriented prompt, normally over stdin/stderr.
///
/// An empty answer accepts the suggested size, `q` or end of input cancels,
/// anything unparsable asks again. Failing to read or write the streams is
/// an `Io` error, not a cancellation.
pub struct TerminalSizePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalSizePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, initial: Size) -> std::io::Result<Option<Size>> {
        writeln!(self.output, "What image size?")?;
        writeln!(
            self.output,
            "Since no input images were selected, you must tell me what size to make the output image."
        )?;

        loop {
            write!(self.output, "Size as WIDTHxHEIGHT [{initial}] (q to cancel): ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let answer = line.trim();
            if answer.is_empty() {
                return Ok(Some(initial));
            }
            if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
                return Ok(None);
            }

            match answer.parse::<Size>() {
                Ok(size) => return Ok(Some(size)),
                Err(reason) => writeln!(self.output, "{reason}")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> SizeQuery for TerminalSizePrompt<R, W> {
    fn ask_size(&mut self, initial: Size) -> Result<Option<Size>> {
        Ok(self.prompt(initial)?)
    }
}

/// Resolves the output size through `query`, seeded with `fallback_initial`
/// (a previously used size, or 1x1).
pub fn resolve_size(query: &mut dyn SizeQuery, fallback_initial: Size) -> Result<Option<Size>> {
    let initial = if fallback_initial.is_empty() {
        Size::default()
    } else {
        fallback_initial
    };

    let resolved = query.ask_size(initial)?;
    match resolved {
        Some(size) => debug!(%size, "Output size resolved"),
        None => debug!("Output size query cancelled"),
    }
    Ok(resolved)
}
