// SPDX: CC0-1.0

use crate::{Function, Number};
use anyhow::{bail, Context};
use core::fmt;
use std::io::{self, stdin, BufRead, Write};

/// Candidates scoring at or below this are not worth suggesting.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Add,
    List,
    Eval,
    Remove,
    Save,
    Load,
}

impl Command {
    pub const fn exhaustive() -> &'static [Command] {
        &[
            Self::Help,
            Self::Quit,
            Self::Add,
            Self::List,
            Self::Eval,
            Self::Remove,
            Self::Save,
            Self::Load,
        ]
    }

    pub const fn help(&self) -> &'static str {
        match self {
            Self::Help => "display help for each command",
            Self::Quit => "quit the shell",
            Self::Add => "add a function to the workspace",
            Self::List => "show function descriptions and sampled values",
            Self::Eval => "evaluate a function at a particular value",
            Self::Remove => "delete a function from the workspace",
            Self::Save => "save the workspace to a file",
            Self::Load => "load a workspace from a file, replacing the current one",
        }
    }

    pub const fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Help => &["?"],
            Self::Quit => &["exit", "q"],
            Self::List => &["ls"],
            Self::Remove => &["rm"],
            Self::Add | Self::Eval | Self::Save | Self::Load => &[],
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Add => "add",
            Self::List => "list",
            Self::Eval => "eval",
            Self::Remove => "remove",
            Self::Save => "save",
            Self::Load => "load",
        }
    }
}

impl core::str::FromStr for Command {
    type Err = ();

    /// Accepts the command name or one of its aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::exhaustive()
            .iter()
            .copied()
            .find(|c| c.name() == s || c.aliases().contains(&s))
            .ok_or(())
    }
}

/// Writes `prompt` and reads one trimmed line from `source`. Running out of
/// input is an error, so callers never spin on a closed stream.
pub fn read_line<R: BufRead, W: Write>(
    mut source: R,
    mut out: W,
    prompt: impl fmt::Display,
) -> anyhow::Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    let n = source
        .read_line(&mut line)
        .context("read from standard input failed")?;
    if n == 0 {
        bail!("standard input closed");
    }
    Ok(line.trim().to_string())
}

pub fn input<W: Write>(out: W, prompt: impl fmt::Display) -> anyhow::Result<String> {
    read_line(stdin().lock(), out, prompt)
}

/// Parses `text`, pointing at it on `out` and giving `None` if it is rejected.
pub fn parse_reply<W: Write, T: core::str::FromStr>(mut out: W, text: &str) -> io::Result<Option<T>>
where
    T::Err: fmt::Display,
{
    match text.parse() {
        Ok(val) => Ok(Some(val)),
        Err(err) => {
            writeln!(out)?;
            underline(&mut out, text, 0, text.len().max(1))?;
            writeln!(out, "parse error: {err}")?;
            Ok(None)
        }
    }
}

/// Like [`parse_reply`], but only finite numbers are accepted.
pub fn parse_number<W: Write>(mut out: W, text: &str) -> io::Result<Option<Number>> {
    match parse_reply::<_, Number>(&mut out, text)? {
        Some(val) if !val.is_finite() => {
            writeln!(out, "error: {text} is not a finite number")?;
            Ok(None)
        }
        reply => Ok(reply),
    }
}

/// Prompts for a finite number. `None` if the reply was rejected.
pub fn read_number<W: Write>(mut out: W, prompt: impl fmt::Display) -> anyhow::Result<Option<Number>> {
    let text = input(&mut out, prompt)?;
    Ok(parse_number(out, &text)?)
}

pub fn underline<W: Write>(mut out: W, src: &str, start: usize, len: usize) -> io::Result<()> {
    writeln!(out, "{src}")?;
    writeln!(out, "{}{}", " ".repeat(start), "^".repeat(len))?;
    Ok(())
}

/// Finds the candidate most similar to `text`, ignoring case.
pub fn most_similar<'a>(
    text: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<(f64, &'a str)> {
    let text = text.to_ascii_lowercase();
    candidates
        .into_iter()
        .map(|c| {
            (
                strsim::normalized_damerau_levenshtein(&text, &c.to_ascii_lowercase()),
                c,
            )
        })
        .reduce(|(acc_sim, acc), (sim, c)| if sim > acc_sim { (sim, c) } else { (acc_sim, acc) })
}

pub fn note_similar<'a, W: Write>(
    mut out: W,
    what: &str,
    text: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> io::Result<()> {
    if let Some((sim, key)) = most_similar(text, candidates) {
        if sim > SIMILARITY_THRESHOLD {
            writeln!(out, "note: {what} '{key}' has a similar name")?;
        }
    }
    Ok(())
}

pub fn dump_function<W: Write>(mut out: W, name: &str, function: &Function) -> io::Result<()> {
    writeln!(out, "{name}: {function}")?;
    if function.is_empty() {
        writeln!(out, "  (no samples)")?;
    }
    for p in function.points() {
        writeln!(out, "  f({x}) = {y}", x = p.x, y = p.y)?;
    }
    Ok(())
}

pub fn workspace_empty<W: Write>(mut out: W) -> io::Result<()> {
    writeln!(out, "error: workspace is empty, add at least one function first")
}

pub fn no_such_function<W: Write>(mut out: W, name: &str) -> io::Result<()> {
    writeln!(out, "error: no function named '{name}'")
}
