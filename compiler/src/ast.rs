use regcc_routines::{Annotation, Bound, ByteSet};

#[derive(Debug, Clone, PartialEq)]
pub struct Regex {
    pub branches: Vec<Branch>,
    pub annotation: Annotation,
}

impl Regex {
    pub fn new(branches: Vec<Branch>, annotation: Annotation) -> Self {
        debug_assert!(!annotation.is_empty(), "regex annotation must be non-empty");
        Self {
            branches,
            annotation,
        }
    }
}

// Branch

/// A concatenation of pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub pieces: Vec<Piece>,
    pub annotation: Annotation,
}

impl Branch {
    pub fn new(pieces: Vec<Piece>, annotation: Annotation) -> Self {
        debug_assert!(!annotation.is_empty(), "branch annotation must be non-empty");
        Self {
            pieces,
            annotation,
        }
    }
}

// Piece

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub atom: Atom,
    pub bound: Bound,
    pub annotation: Annotation,
}

impl Piece {
    pub fn new(atom: Atom, bound: Bound, annotation: Annotation) -> Self {
        debug_assert!(!annotation.is_empty(), "piece annotation must be non-empty");
        Self {
            atom,
            bound,
            annotation,
        }
    }
}

// Atom

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// Matches exactly one byte that is a member of the set.
    Charset { set: ByteSet, annotation: Annotation },
    /// A parenthesized regex.
    Group {
        regex: Box<Regex>,
        annotation: Annotation,
    },
}

impl Atom {
    pub fn charset(set: ByteSet, annotation: Annotation) -> Self {
        debug_assert!(!annotation.is_empty(), "atom annotation must be non-empty");
        Self::Charset { set, annotation }
    }

    pub fn group(regex: Regex, annotation: Annotation) -> Self {
        debug_assert!(!annotation.is_empty(), "atom annotation must be non-empty");
        Self::Group {
            regex: Box::new(regex),
            annotation,
        }
    }

    pub fn annotation(&self) -> &Annotation {
        match self {
            Self::Charset { annotation, .. } | Self::Group { annotation, .. } => annotation,
        }
    }
}
