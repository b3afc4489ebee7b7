//! The lowered form of a compiled pattern: an ordered set of matcher
//! routines that call each other by id, and the Rust source they render to.
//!
//! Every routine accepts the remaining input and either returns the number of
//! bytes it consumed or fails. Four kinds of routine exist, one per syntax
//! tree node kind, and each kind is numbered independently in creation order.
//!
//! # Example
//!
//! ```
//! use regcc_routines::*;
//!
//! // approximate to `a+`
//! let mut routines = Routines::default();
//! let atom = AtomMatcher::Charset(ByteSet::single(b'a'));
//! let atom = routines.push_atom(Annotation::from("a"), atom);
//! let piece = routines.push_piece(Annotation::from("a+"), atom, Bound::new(1, None));
//! let branch = routines.push_branch(Annotation::from("a+"), vec![piece]);
//! let regex = routines.push_regex(Annotation::from("a+"), vec![branch]);
//! let routines = routines.with_entry(regex);
//!
//! assert_eq!(Some(3), run(&routines, b"aaab"));
//! assert_eq!(None, run(&routines, b"baaa"));
//! assert!(routines.to_string().contains("pub fn matches(input: &[u8]) -> Option<usize> {"));
//! ```

mod byte_set;
mod render;

use std::fmt::{Debug, Display};

pub use byte_set::ByteSet;

/// The name given to the public entry routine unless overridden.
pub const DEFAULT_ENTRY_NAME: &str = "matches";

/// A repetition count for a piece. An unset `max` denotes an unbounded
/// repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    pub min: u32,
    pub max: Option<u32>,
}

impl Bound {
    /// Exactly one occurrence, the bound of an unquantified atom.
    pub const ONCE: Self = Self::new(1, Some(1));

    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{{{}}}", self.min),
            Some(max) => write!(f, "{{{},{}}}", self.min, max),
            None => write!(f, "{{{},}}", self.min),
        }
    }
}

/// Source text reconstructed for a node, carried into its generated routine
/// for traceability.
///
/// Printable ASCII renders verbatim, every other byte renders as `\xNN` so an
/// annotation always fits on a single comment line.
#[derive(Default, Clone, PartialEq, Eq, Hash)]
pub struct Annotation(Vec<u8>);

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, byte: u8) {
        self.0.push(byte)
    }

    pub fn append(&mut self, other: &Annotation) {
        self.0.extend_from_slice(&other.0)
    }
}

impl From<&[u8]> for Annotation {
    fn from(src: &[u8]) -> Self {
        Self(src.to_vec())
    }
}

impl From<&str> for Annotation {
    fn from(src: &str) -> Self {
        Self(src.as_bytes().to_vec())
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for &byte in self.0.iter() {
            match byte {
                0x20..=0x7e => write!(f, "{}", char::from(byte))?,
                _ => write!(f, "\\x{:02x}", byte)?,
            }
        }

        Ok(())
    }
}

impl Debug for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

macro_rules! routine_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(usize);

        impl From<usize> for $name {
            fn from(id: usize) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{:03}"), self.0)
            }
        }
    };
}

routine_id!(
    /// Identifies an atom routine, rendered as `atom_NNN`.
    AtomId,
    "atom"
);
routine_id!(
    /// Identifies a piece routine, rendered as `piece_NNN`.
    PieceId,
    "piece"
);
routine_id!(
    /// Identifies a branch routine, rendered as `branch_NNN`.
    BranchId,
    "branch"
);
routine_id!(
    /// Identifies a regex routine, rendered as `regex_NNN`.
    RegexId,
    "regex"
);

/// The match rule of an atom routine.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomMatcher {
    /// Consumes exactly one byte when it is a member of the set.
    Charset(ByteSet),
    /// Delegates to a nested regex routine.
    Group(RegexId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomRoutine {
    id: AtomId,
    annotation: Annotation,
    matcher: AtomMatcher,
}

impl AtomRoutine {
    pub fn id(&self) -> AtomId {
        self.id
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn matcher(&self) -> &AtomMatcher {
        &self.matcher
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieceRoutine {
    id: PieceId,
    annotation: Annotation,
    atom: AtomId,
    bound: Bound,
}

impl PieceRoutine {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn atom(&self) -> AtomId {
        self.atom
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchRoutine {
    id: BranchId,
    annotation: Annotation,
    pieces: Vec<PieceId>,
}

impl BranchRoutine {
    pub fn id(&self) -> BranchId {
        self.id
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegexRoutine {
    id: RegexId,
    annotation: Annotation,
    branches: Vec<BranchId>,
}

impl RegexRoutine {
    pub fn id(&self) -> RegexId {
        self.id
    }

    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn branches(&self) -> &[BranchId] {
        &self.branches
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Routine {
    Atom(AtomRoutine),
    Piece(PieceRoutine),
    Branch(BranchRoutine),
    Regex(RegexRoutine),
}

impl Routine {
    pub fn annotation(&self) -> &Annotation {
        match self {
            Routine::Atom(r) => r.annotation(),
            Routine::Piece(r) => r.annotation(),
            Routine::Branch(r) => r.annotation(),
            Routine::Regex(r) => r.annotation(),
        }
    }
}

/// The ordered output of a single compilation.
///
/// Ids are handed out by the `push_*` methods, one counter per routine kind,
/// so every id is assigned exactly once and in creation order. Routines are
/// kept, and rendered, in the order they were pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct Routines {
    routines: Vec<Routine>,
    atoms: Vec<usize>,
    pieces: Vec<usize>,
    branches: Vec<usize>,
    regexes: Vec<usize>,
    entry: Option<RegexId>,
    entry_name: String,
}

impl Default for Routines {
    fn default() -> Self {
        Self {
            routines: vec![],
            atoms: vec![],
            pieces: vec![],
            branches: vec![],
            regexes: vec![],
            entry: None,
            entry_name: DEFAULT_ENTRY_NAME.to_string(),
        }
    }
}

impl Routines {
    pub fn push_atom(&mut self, annotation: Annotation, matcher: AtomMatcher) -> AtomId {
        let id = AtomId(self.atoms.len());
        self.atoms.push(self.routines.len());
        self.routines.push(Routine::Atom(AtomRoutine {
            id,
            annotation,
            matcher,
        }));

        id
    }

    pub fn push_piece(&mut self, annotation: Annotation, atom: AtomId, bound: Bound) -> PieceId {
        let id = PieceId(self.pieces.len());
        self.pieces.push(self.routines.len());
        self.routines.push(Routine::Piece(PieceRoutine {
            id,
            annotation,
            atom,
            bound,
        }));

        id
    }

    pub fn push_branch(&mut self, annotation: Annotation, pieces: Vec<PieceId>) -> BranchId {
        let id = BranchId(self.branches.len());
        self.branches.push(self.routines.len());
        self.routines.push(Routine::Branch(BranchRoutine {
            id,
            annotation,
            pieces,
        }));

        id
    }

    pub fn push_regex(&mut self, annotation: Annotation, branches: Vec<BranchId>) -> RegexId {
        let id = RegexId(self.regexes.len());
        self.regexes.push(self.routines.len());
        self.routines.push(Routine::Regex(RegexRoutine {
            id,
            annotation,
            branches,
        }));

        id
    }

    /// Marks `entry` as the regex routine the public entry routine calls.
    #[must_use]
    pub fn with_entry(self, entry: RegexId) -> Self {
        Self {
            entry: Some(entry),
            ..self
        }
    }

    /// Renames the public entry routine.
    #[must_use]
    pub fn with_entry_name(self, entry_name: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
            ..self
        }
    }

    pub fn entry(&self) -> Option<RegexId> {
        self.entry
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    pub fn atom(&self, id: AtomId) -> Option<&AtomRoutine> {
        match self.atoms.get(id.0).and_then(|idx| self.routines.get(*idx)) {
            Some(Routine::Atom(routine)) => Some(routine),
            _ => None,
        }
    }

    pub fn piece(&self, id: PieceId) -> Option<&PieceRoutine> {
        match self.pieces.get(id.0).and_then(|idx| self.routines.get(*idx)) {
            Some(Routine::Piece(routine)) => Some(routine),
            _ => None,
        }
    }

    pub fn branch(&self, id: BranchId) -> Option<&BranchRoutine> {
        match self.branches.get(id.0).and_then(|idx| self.routines.get(*idx)) {
            Some(Routine::Branch(routine)) => Some(routine),
            _ => None,
        }
    }

    pub fn regex(&self, id: RegexId) -> Option<&RegexRoutine> {
        match self.regexes.get(id.0).and_then(|idx| self.routines.get(*idx)) {
            Some(Routine::Regex(routine)) => Some(routine),
            _ => None,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Routine> {
        self.routines.iter()
    }
}

/// Evaluates a routine set against `input`, following the same control flow
/// as its rendered source, and returns the length of the matched prefix.
///
/// Returns `None` when the pattern does not match at the start of `input` or
/// when no entry has been set.
pub fn run(routines: &Routines, input: &[u8]) -> Option<usize> {
    let entry = routines.entry()?;
    eval_regex(routines, entry, input)
}

fn eval_atom(routines: &Routines, id: AtomId, input: &[u8]) -> Option<usize> {
    match routines.atom(id)?.matcher() {
        AtomMatcher::Charset(set) => match input.first() {
            Some(byte) if set.contains(*byte) => Some(1),
            _ => None,
        },
        AtomMatcher::Group(regex) => eval_regex(routines, *regex, input),
    }
}

fn eval_piece(routines: &Routines, id: PieceId, input: &[u8]) -> Option<usize> {
    let piece = routines.piece(id)?;
    let atom = piece.atom();
    let Bound { min, max } = piece.bound();

    // mandatory repetitions, any failure fails the whole piece.
    let mut len = 0;
    for _ in 0..min {
        len += eval_atom(routines, atom, &input[len..])?;
    }

    match max {
        Some(max) => {
            for _ in min..max {
                match eval_atom(routines, atom, &input[len..]) {
                    Some(step) => len += step,
                    None => break,
                }
            }
        }
        None => {
            // a second consecutive empty step would repeat forever.
            let mut empty = false;
            while let Some(step) = eval_atom(routines, atom, &input[len..]) {
                if step == 0 {
                    if empty {
                        break;
                    }
                    empty = true;
                } else {
                    empty = false;
                }
                len += step;
            }
        }
    }

    Some(len)
}

fn eval_branch(routines: &Routines, id: BranchId, input: &[u8]) -> Option<usize> {
    routines
        .branch(id)?
        .pieces()
        .iter()
        .try_fold(0, |len, piece| {
            eval_piece(routines, *piece, &input[len..]).map(|step| len + step)
        })
}

fn eval_regex(routines: &Routines, id: RegexId, input: &[u8]) -> Option<usize> {
    // every branch is attempted from the same start, the longest wins.
    routines
        .regex(id)?
        .branches()
        .iter()
        .filter_map(|branch| eval_branch(routines, *branch, input))
        .max()
}
