//! Line-level diff computation.
//!
//! Alignment is the classic longest-matching-block scheme: repeatedly find
//! the longest run of identical lines (ties broken by the earliest position
//! in the original, then the earliest in the updated text), recurse into the
//! unmatched regions on both sides, and read the change runs off the gaps
//! between matches. Every public function here is pure: no I/O, no shared
//! state, identical inputs give identical outputs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Operation kind of a [`DiffHunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HunkKind {
    Replace,
    Delete,
    Insert,
}

/// A maximal contiguous run of changed lines.
///
/// Starts are 1-based and ends are inclusive under that numbering: a run
/// covering original lines 2 and 3 has `original_start = 2, original_end = 3`.
/// A pure insert covers no original lines, so its `original_end` lands one
/// below its `original_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub kind: HunkKind,
    pub original_start: usize,
    pub original_end: usize,
    pub original_lines: Vec<String>,
    pub updated_start: usize,
    pub updated_end: usize,
    pub updated_lines: Vec<String>,
}

/// Row kind in a side-by-side rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Equal,
    Delete,
    Insert,
}

/// One display row of a side-by-side diff. `line_num` increments once per
/// emitted row; the absent side of a delete/insert row is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBySideRow {
    pub line_num: usize,
    pub kind: RowKind,
    pub original: String,
    pub updated: String,
}

/// Line-churn summary of a change.
///
/// A replace run counts `min(deleted, inserted)` lines as modified; the
/// excess of the longer side counts as deleted or added. This is a churn
/// lower bound, not a per-line classification, and the arithmetic is part of
/// the contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added_lines: usize,
    pub deleted_lines: usize,
    pub modified_lines: usize,
    pub total_changes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// Half-open line ranges `[a_start, a_end)` / `[b_start, b_end)` covered by
/// one aligned run.
#[derive(Debug, Clone, Copy)]
struct Opcode {
    tag: OpTag,
    a_start: usize,
    a_end: usize,
    b_start: usize,
    b_end: usize,
}

#[derive(Debug, Clone, Copy)]
struct MatchBlock {
    a: usize,
    b: usize,
    len: usize,
}

/// Render a conventional unified diff with `a/`/`b/` path prefixes and
/// `context_lines` of unchanged context. Identical inputs render as an empty
/// string (no headers).
pub fn unified_diff(original: &str, updated: &str, label: &str, context_lines: usize) -> String {
    let a = split_lines(original);
    let b = split_lines(updated);
    let groups = grouped_opcodes(opcodes(&a, &b), context_lines);

    let mut out = String::new();
    for (index, group) in groups.iter().enumerate() {
        if index == 0 {
            out.push_str(&format!("--- a/{label}\n"));
            out.push_str(&format!("+++ b/{label}\n"));
        }
        let first = group[0];
        let last = group[group.len() - 1];
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            format_range(first.a_start, last.a_end),
            format_range(first.b_start, last.b_end),
        ));
        for op in group {
            match op.tag {
                OpTag::Equal => {
                    for line in &a[op.a_start..op.a_end] {
                        out.push(' ');
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                OpTag::Replace | OpTag::Delete => {
                    for line in &a[op.a_start..op.a_end] {
                        out.push('-');
                        out.push_str(line);
                        out.push('\n');
                    }
                    if op.tag == OpTag::Replace {
                        for line in &b[op.b_start..op.b_end] {
                            out.push('+');
                            out.push_str(line);
                            out.push('\n');
                        }
                    }
                }
                OpTag::Insert => {
                    for line in &b[op.b_start..op.b_end] {
                        out.push('+');
                        out.push_str(line);
                        out.push('\n');
                    }
                }
            }
        }
    }
    out
}

/// One [`DiffHunk`] per maximal non-equal run; equal runs are omitted.
pub fn hunk_list(original: &str, updated: &str) -> Vec<DiffHunk> {
    let a = split_lines(original);
    let b = split_lines(updated);

    opcodes(&a, &b)
        .into_iter()
        .filter_map(|op| {
            let kind = match op.tag {
                OpTag::Equal => return None,
                OpTag::Replace => HunkKind::Replace,
                OpTag::Delete => HunkKind::Delete,
                OpTag::Insert => HunkKind::Insert,
            };
            Some(DiffHunk {
                kind,
                original_start: op.a_start + 1,
                original_end: op.a_end,
                original_lines: match kind {
                    HunkKind::Insert => Vec::new(),
                    _ => owned_lines(&a[op.a_start..op.a_end]),
                },
                updated_start: op.b_start + 1,
                updated_end: op.b_end,
                updated_lines: match kind {
                    HunkKind::Delete => Vec::new(),
                    _ => owned_lines(&b[op.b_start..op.b_end]),
                },
            })
        })
        .collect()
}

/// Ordered display rows for a side-by-side rendering.
///
/// A replace run emits all its deleted original lines before all its
/// inserted updated lines; there is no line pairing inside the run.
pub fn side_by_side(original: &str, updated: &str) -> Vec<SideBySideRow> {
    let a = split_lines(original);
    let b = split_lines(updated);

    let mut rows = Vec::new();
    let mut line_num = 1;
    for op in opcodes(&a, &b) {
        match op.tag {
            OpTag::Equal => {
                for offset in 0..(op.a_end - op.a_start) {
                    rows.push(SideBySideRow {
                        line_num,
                        kind: RowKind::Equal,
                        original: a[op.a_start + offset].to_string(),
                        updated: b[op.b_start + offset].to_string(),
                    });
                    line_num += 1;
                }
            }
            OpTag::Replace | OpTag::Delete => {
                for line in &a[op.a_start..op.a_end] {
                    rows.push(SideBySideRow {
                        line_num,
                        kind: RowKind::Delete,
                        original: (*line).to_string(),
                        updated: String::new(),
                    });
                    line_num += 1;
                }
                if op.tag == OpTag::Replace {
                    for line in &b[op.b_start..op.b_end] {
                        rows.push(SideBySideRow {
                            line_num,
                            kind: RowKind::Insert,
                            original: String::new(),
                            updated: (*line).to_string(),
                        });
                        line_num += 1;
                    }
                }
            }
            OpTag::Insert => {
                for line in &b[op.b_start..op.b_end] {
                    rows.push(SideBySideRow {
                        line_num,
                        kind: RowKind::Insert,
                        original: String::new(),
                        updated: (*line).to_string(),
                    });
                    line_num += 1;
                }
            }
        }
    }
    rows
}

/// Line-churn summary across all change runs.
pub fn change_summary(original: &str, updated: &str) -> DiffSummary {
    let a = split_lines(original);
    let b = split_lines(updated);

    let mut summary = DiffSummary::default();
    for op in opcodes(&a, &b) {
        let original_len = op.a_end - op.a_start;
        let updated_len = op.b_end - op.b_start;
        match op.tag {
            OpTag::Equal => {}
            OpTag::Insert => summary.added_lines += updated_len,
            OpTag::Delete => summary.deleted_lines += original_len,
            OpTag::Replace => {
                summary.modified_lines += original_len.min(updated_len);
                if original_len > updated_len {
                    summary.deleted_lines += original_len - updated_len;
                } else {
                    summary.added_lines += updated_len - original_len;
                }
            }
        }
    }
    summary.total_changes =
        summary.added_lines + summary.deleted_lines + summary.modified_lines;
    summary
}

fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

fn owned_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| (*line).to_string()).collect()
}

/// Longest matching run within `a[alo..ahi]` and the positions `b_index`
/// records for `b[blo..bhi]`. Ties go to the earliest start in `a`, then the
/// earliest start in `b`: ascending iteration plus the strict `>` on length
/// guarantee it.
fn longest_match(
    a: &[&str],
    b_index: &HashMap<&str, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchBlock {
    let mut best = MatchBlock {
        a: alo,
        b: blo,
        len: 0,
    };
    // run_lengths[j] = length of the match ending at (i, j) for the current i.
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_index.get(a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let prior = if j == 0 {
                    0
                } else {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0)
                };
                let len = prior + 1;
                next_runs.insert(j, len);
                if len > best.len {
                    best = MatchBlock {
                        a: i + 1 - len,
                        b: j + 1 - len,
                        len,
                    };
                }
            }
        }
        run_lengths = next_runs;
    }
    best
}

/// All matching blocks in order, adjacent blocks merged, with a zero-length
/// sentinel at the end so gap-walking sees the trailing change run.
fn matching_blocks(a: &[&str], b: &[&str]) -> Vec<MatchBlock> {
    let mut b_index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, line) in b.iter().enumerate() {
        b_index.entry(line).or_default().push(j);
    }

    let mut regions = vec![(0, a.len(), 0, b.len())];
    let mut blocks = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let found = longest_match(a, &b_index, alo, ahi, blo, bhi);
        if found.len > 0 {
            if alo < found.a && blo < found.b {
                regions.push((alo, found.a, blo, found.b));
            }
            if found.a + found.len < ahi && found.b + found.len < bhi {
                regions.push((found.a + found.len, ahi, found.b + found.len, bhi));
            }
            blocks.push(found);
        }
    }
    blocks.sort_by_key(|block| (block.a, block.b));

    let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
    for block in blocks {
        match merged.last_mut() {
            Some(last) if last.a + last.len == block.a && last.b + last.len == block.b => {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged.push(MatchBlock {
        a: a.len(),
        b: b.len(),
        len: 0,
    });
    merged
}

/// Change and equal runs covering both sequences end to end.
fn opcodes(a: &[&str], b: &[&str]) -> Vec<Opcode> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    for block in matching_blocks(a, b) {
        let tag = if i < block.a && j < block.b {
            Some(OpTag::Replace)
        } else if i < block.a {
            Some(OpTag::Delete)
        } else if j < block.b {
            Some(OpTag::Insert)
        } else {
            None
        };
        if let Some(tag) = tag {
            result.push(Opcode {
                tag,
                a_start: i,
                a_end: block.a,
                b_start: j,
                b_end: block.b,
            });
        }
        i = block.a + block.len;
        j = block.b + block.len;
        if block.len > 0 {
            result.push(Opcode {
                tag: OpTag::Equal,
                a_start: block.a,
                a_end: i,
                b_start: block.b,
                b_end: j,
            });
        }
    }
    result
}

/// Cluster opcodes into hunk groups separated by more than `2 * n` unchanged
/// lines, trimming leading/trailing context to `n` lines.
fn grouped_opcodes(codes: Vec<Opcode>, n: usize) -> Vec<Vec<Opcode>> {
    let mut codes = codes;
    if codes.is_empty() {
        codes.push(Opcode {
            tag: OpTag::Equal,
            a_start: 0,
            a_end: 1,
            b_start: 0,
            b_end: 1,
        });
    }
    if codes[0].tag == OpTag::Equal {
        let first = &mut codes[0];
        first.a_start = first.a_start.max(first.a_end.saturating_sub(n));
        first.b_start = first.b_start.max(first.b_end.saturating_sub(n));
    }
    if let Some(last) = codes.last_mut() {
        if last.tag == OpTag::Equal {
            last.a_end = last.a_end.min(last.a_start + n);
            last.b_end = last.b_end.min(last.b_start + n);
        }
    }

    let mut groups = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();
    for code in codes {
        if code.tag == OpTag::Equal && code.a_end - code.a_start > 2 * n {
            group.push(Opcode {
                a_end: (code.a_start + n).min(code.a_end),
                b_end: (code.b_start + n).min(code.b_end),
                ..code
            });
            groups.push(std::mem::take(&mut group));
            group.push(Opcode {
                a_start: code.a_start.max(code.a_end - n),
                b_start: code.b_start.max(code.b_end - n),
                ..code
            });
        } else {
            group.push(code);
        }
    }
    let lone_context = group.len() == 1 && group[0].tag == OpTag::Equal;
    if !group.is_empty() && !lone_context {
        groups.push(group);
    }
    groups
}

/// Unified-diff range text: `start,length`, with the length omitted when it
/// is exactly one and the start shifted back for empty ranges.
fn format_range(start: usize, stop: usize) -> String {
    let length = stop - start;
    if length == 1 {
        return (start + 1).to_string();
    }
    let beginning = if length == 0 { start } else { start + 1 };
    format!("{beginning},{length}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL: &str = "Line 1\nLine 2\nLine 3";
    const UPDATED: &str = "Line 1\nLine 2 Modified\nLine 3\nLine 4";

    #[test]
    fn test_hunks_for_replace_and_insert() {
        let hunks = hunk_list(ORIGINAL, UPDATED);
        assert_eq!(hunks.len(), 2);

        let replace = &hunks[0];
        assert_eq!(replace.kind, HunkKind::Replace);
        assert_eq!(replace.original_start, 2);
        assert_eq!(replace.original_end, 2);
        assert_eq!(replace.original_lines, ["Line 2"]);
        assert_eq!(replace.updated_start, 2);
        assert_eq!(replace.updated_end, 2);
        assert_eq!(replace.updated_lines, ["Line 2 Modified"]);

        let insert = &hunks[1];
        assert_eq!(insert.kind, HunkKind::Insert);
        assert!(insert.original_lines.is_empty());
        assert_eq!(insert.updated_start, 4);
        assert_eq!(insert.updated_end, 4);
        assert_eq!(insert.updated_lines, ["Line 4"]);
    }

    #[test]
    fn test_summary_counts_replace_as_modified() {
        let summary = change_summary(ORIGINAL, UPDATED);
        assert_eq!(summary.added_lines, 1);
        assert_eq!(summary.modified_lines, 1);
        assert_eq!(summary.deleted_lines, 0);
        assert_eq!(summary.total_changes, 2);
    }

    #[test]
    fn test_summary_excess_of_longer_replace_side() {
        // Three old lines collapse into one new line: one modified, two deleted.
        let summary = change_summary("a\nb\nc\n", "x\n");
        assert_eq!(summary.modified_lines, 1);
        assert_eq!(summary.deleted_lines, 2);
        assert_eq!(summary.added_lines, 0);
        assert_eq!(summary.total_changes, 3);
    }

    #[test]
    fn test_summary_pure_insert_and_delete() {
        let inserted = change_summary("a\nb", "a\nb\nc\nd");
        assert_eq!(inserted.added_lines, 2);
        assert_eq!(inserted.total_changes, 2);

        let deleted = change_summary("a\nb\nc", "a");
        assert_eq!(deleted.deleted_lines, 2);
        assert_eq!(deleted.total_changes, 2);
    }

    #[test]
    fn test_unified_diff_exact_rendering() {
        let expected = "\
--- a/test.md
+++ b/test.md
@@ -1,3 +1,4 @@
 Line 1
-Line 2
+Line 2 Modified
 Line 3
+Line 4
";
        assert_eq!(unified_diff(ORIGINAL, UPDATED, "test.md", 3), expected);
    }

    #[test]
    fn test_unified_diff_contains_headers_and_hunk_marker() {
        let diff = unified_diff(ORIGINAL, UPDATED, "test.md", 3);
        assert!(diff.contains("--- a/test.md"));
        assert!(diff.contains("+++ b/test.md"));
        assert!(diff.contains("@@"));
    }

    #[test]
    fn test_unified_diff_of_identical_inputs_is_empty() {
        assert_eq!(unified_diff(ORIGINAL, ORIGINAL, "same.md", 3), "");
        assert!(hunk_list(ORIGINAL, ORIGINAL).is_empty());
        assert_eq!(change_summary(ORIGINAL, ORIGINAL).total_changes, 0);
    }

    #[test]
    fn test_unified_diff_splits_distant_changes_into_hunks() {
        let original: String = (1..=20).map(|n| format!("line {n}\n")).collect();
        let updated = original
            .replace("line 2\n", "line 2 changed\n")
            .replace("line 18\n", "line 18 changed\n");

        let diff = unified_diff(&original, &updated, "long.md", 3);
        let hunk_headers = diff
            .lines()
            .filter(|line| line.starts_with("@@"))
            .count();
        assert_eq!(hunk_headers, 2);
    }

    #[test]
    fn test_side_by_side_replace_emits_deletes_before_inserts() {
        let rows = side_by_side("a\nb\nc", "a\nB\nC2\nc");
        let kinds: Vec<RowKind> = rows.iter().map(|row| row.kind).collect();
        assert_eq!(
            kinds,
            [
                RowKind::Equal,
                RowKind::Delete,
                RowKind::Insert,
                RowKind::Insert,
                RowKind::Equal,
            ]
        );

        // Row numbers increment once per emitted row, not per source line.
        let numbers: Vec<usize> = rows.iter().map(|row| row.line_num).collect();
        assert_eq!(numbers, [1, 2, 3, 4, 5]);

        assert_eq!(rows[1].original, "b");
        assert_eq!(rows[1].updated, "");
        assert_eq!(rows[2].original, "");
        assert_eq!(rows[2].updated, "B");
    }

    #[test]
    fn test_side_by_side_equal_rows_carry_both_sides() {
        let rows = side_by_side("same", "same");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, RowKind::Equal);
        assert_eq!(rows[0].original, "same");
        assert_eq!(rows[0].updated, "same");
    }

    #[test]
    fn test_alignment_prefers_earliest_match() {
        // "x" matches at updated lines 1 and 3; the earliest wins, so the
        // trailing "x" reads as an insertion.
        let hunks = hunk_list("x", "x\ny\nx");
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].kind, HunkKind::Insert);
        assert_eq!(hunks[0].updated_lines, ["y", "x"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(hunk_list("", "").is_empty());
        assert_eq!(unified_diff("", "", "empty.md", 3), "");

        let all_new = hunk_list("", "a\nb");
        assert_eq!(all_new.len(), 1);
        assert_eq!(all_new[0].kind, HunkKind::Insert);

        let all_gone = change_summary("a\nb", "");
        assert_eq!(all_gone.deleted_lines, 2);
    }
}
