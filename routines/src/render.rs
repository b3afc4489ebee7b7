//! Rust source rendering for routine sets.
//!
//! Every routine renders as a private `fn(&[u8]) -> Option<usize>` preceded
//! by a comment carrying its annotation. The entry routine is the only public
//! item and is always rendered last.

use std::fmt::Display;

use crate::*;

const SIGNATURE: &str = "(input: &[u8]) -> Option<usize>";

/// Renders the members of a set as a byte-literal pattern, i.e.
/// `0x30..=0x39 | 0x5f`.
struct BytePattern<'a>(&'a ByteSet);

impl Display for BytePattern<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, range) in self.0.ranges().into_iter().enumerate() {
            if idx != 0 {
                write!(f, " | ")?;
            }

            if range.start() == range.end() {
                write!(f, "{:#04x}", range.start())?;
            } else {
                write!(f, "{:#04x}..={:#04x}", range.start(), range.end())?;
            }
        }

        Ok(())
    }
}

impl Display for AtomRoutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "// {}", self.annotation)?;
        writeln!(f, "fn {}{} {{", self.id, SIGNATURE)?;
        match &self.matcher {
            AtomMatcher::Charset(set) if set.is_empty() => {
                writeln!(f, "    let _ = input;")?;
                writeln!(f, "    None")?;
            }
            AtomMatcher::Charset(set) => {
                writeln!(f, "    match input.first().copied() {{")?;
                writeln!(f, "        Some({}) => Some(1),", BytePattern(set))?;
                writeln!(f, "        _ => None,")?;
                writeln!(f, "    }}")?;
            }
            AtomMatcher::Group(regex) => writeln!(f, "    {}(input)", regex)?,
        }
        write!(f, "}}")
    }
}

impl Display for PieceRoutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Bound { min, max } = self.bound;
        let atom = self.atom;

        writeln!(f, "// {}", self.annotation)?;
        writeln!(f, "fn {}{} {{", self.id, SIGNATURE)?;

        if min == 0 && max == Some(0) {
            writeln!(f, "    let _ = (input, {});", atom)?;
            writeln!(f, "    Some(0)")?;
            return write!(f, "}}");
        }

        writeln!(f, "    let mut len = 0;")?;
        if min > 0 {
            writeln!(f, "    for _ in 0..{} {{", min)?;
            writeln!(f, "        len += {}(&input[len..])?;", atom)?;
            writeln!(f, "    }}")?;
        }

        match max {
            Some(max) if max == min => (),
            Some(max) => {
                writeln!(f, "    for _ in {}..{} {{", min, max)?;
                writeln!(f, "        match {}(&input[len..]) {{", atom)?;
                writeln!(f, "            Some(step) => len += step,")?;
                writeln!(f, "            None => break,")?;
                writeln!(f, "        }}")?;
                writeln!(f, "    }}")?;
            }
            None => {
                writeln!(f, "    let mut empty = false;")?;
                writeln!(f, "    while let Some(step) = {}(&input[len..]) {{", atom)?;
                writeln!(f, "        if step == 0 {{")?;
                writeln!(f, "            if empty {{")?;
                writeln!(f, "                break;")?;
                writeln!(f, "            }}")?;
                writeln!(f, "            empty = true;")?;
                writeln!(f, "        }} else {{")?;
                writeln!(f, "            empty = false;")?;
                writeln!(f, "        }}")?;
                writeln!(f, "        len += step;")?;
                writeln!(f, "    }}")?;
            }
        }

        writeln!(f, "    Some(len)")?;
        write!(f, "}}")
    }
}

impl Display for BranchRoutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "// {}", self.annotation)?;
        writeln!(f, "fn {}{} {{", self.id, SIGNATURE)?;

        if self.pieces.is_empty() {
            writeln!(f, "    let _ = input;")?;
            writeln!(f, "    Some(0)")?;
        } else {
            writeln!(f, "    let mut len = 0;")?;
            for piece in self.pieces.iter() {
                writeln!(f, "    len += {}(&input[len..])?;", piece)?;
            }
            writeln!(f, "    Some(len)")?;
        }

        write!(f, "}}")
    }
}

impl Display for RegexRoutine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "// {}", self.annotation)?;
        writeln!(f, "fn {}{} {{", self.id, SIGNATURE)?;

        match self.branches.as_slice() {
            [] => {
                writeln!(f, "    let _ = input;")?;
                writeln!(f, "    None")?;
            }
            [branch] => writeln!(f, "    {}(input)", branch)?,
            branches => {
                let calls = branches
                    .iter()
                    .map(|branch| format!("{}(input)", branch))
                    .collect::<Vec<_>>()
                    .join(", ");

                writeln!(f, "    [{}].iter().flatten().max().copied()", calls)?;
            }
        }

        write!(f, "}}")
    }
}

impl Display for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Routine::Atom(r) => Display::fmt(r, f),
            Routine::Piece(r) => Display::fmt(r, f),
            Routine::Branch(r) => Display::fmt(r, f),
            Routine::Regex(r) => Display::fmt(r, f),
        }
    }
}

impl Display for Routines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for routine in self.routines.iter() {
            writeln!(f, "{}\n", routine)?;
        }

        if let Some(entry) = self.entry {
            let annotation = self
                .regex(entry)
                .map(|regex| regex.annotation().to_string())
                .unwrap_or_default();

            writeln!(
                f,
                "/// Returns the length of the longest prefix of `input` matched by `{}`.",
                annotation
            )?;
            writeln!(f, "pub fn {}{} {{", self.entry_name, SIGNATURE)?;
            writeln!(f, "    {}(input)", entry)?;
            writeln!(f, "}}")?;
        }

        Ok(())
    }
}
