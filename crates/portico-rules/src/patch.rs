//! Applies planned edits to the original text

use portico_foundation::{Edit, RewriteError, RewriteResult};

/// Build the rewritten text from `original` and disjoint `edits`.
///
/// Every edit range indexes the original text. Edits are taken in
/// descending start order so that each one is cut from a region no other
/// edit has touched yet; the output is assembled once from those pieces.
pub fn apply_edits(original: &str, edits: &[Edit]) -> RewriteResult<String> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    // Pieces are collected right to left and reversed at the end
    let mut pieces: Vec<&str> = Vec::with_capacity(ordered.len() * 2 + 1);
    let mut tail_start = original.len();
    for edit in ordered {
        check_edit(original, edit, tail_start)?;
        pieces.push(&original[edit.end..tail_start]);
        pieces.push(&edit.content);
        tail_start = edit.start;
    }
    pieces.push(&original[..tail_start]);

    pieces.reverse();
    Ok(pieces.concat())
}

/// `tail_start` is the start of the edit applied just before, i.e. the
/// closest edit to the right
fn check_edit(original: &str, edit: &Edit, tail_start: usize) -> RewriteResult<()> {
    if edit.start > edit.end {
        return Err(RewriteError::invalid_edit(format!(
            "range {:?} is reversed",
            edit.range()
        )));
    }
    if edit.end > original.len() {
        return Err(RewriteError::invalid_edit(format!(
            "range {:?} exceeds text length {}",
            edit.range(),
            original.len()
        )));
    }
    if edit.end > tail_start {
        return Err(RewriteError::invalid_edit(format!(
            "range {:?} overlaps the edit starting at {}",
            edit.range(),
            tail_start
        )));
    }
    if !original.is_char_boundary(edit.start) || !original.is_char_boundary(edit.end) {
        return Err(RewriteError::invalid_edit(format!(
            "range {:?} splits a character",
            edit.range()
        )));
    }
    Ok(())
}
