use crate::ast;
use regcc_routines::{AtomId, AtomMatcher, BranchId, PieceId, RegexId, Routines};

/// Lowers a syntax tree into a routine set whose entry calls the root regex.
///
/// Children are always lowered before their parent is assigned an id.
pub fn compile(regex: &ast::Regex) -> Routines {
    let mut routines = Routines::default();
    let root = lower_regex(&mut routines, regex);

    routines.with_entry(root)
}

fn lower_regex(routines: &mut Routines, regex: &ast::Regex) -> RegexId {
    let branches = regex
        .branches
        .iter()
        .map(|branch| lower_branch(routines, branch))
        .collect();

    routines.push_regex(regex.annotation.clone(), branches)
}

fn lower_branch(routines: &mut Routines, branch: &ast::Branch) -> BranchId {
    let pieces = branch
        .pieces
        .iter()
        .map(|piece| lower_piece(routines, piece))
        .collect();

    routines.push_branch(branch.annotation.clone(), pieces)
}

fn lower_piece(routines: &mut Routines, piece: &ast::Piece) -> PieceId {
    let atom = lower_atom(routines, &piece.atom);

    routines.push_piece(piece.annotation.clone(), atom, piece.bound)
}

fn lower_atom(routines: &mut Routines, atom: &ast::Atom) -> AtomId {
    let matcher = match atom {
        ast::Atom::Charset { set, .. } => AtomMatcher::Charset(*set),
        ast::Atom::Group { regex, .. } => AtomMatcher::Group(lower_regex(routines, regex)),
    };

    routines.push_atom(atom.annotation().clone(), matcher)
}
