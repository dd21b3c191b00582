use crate::line::LinePair;

/// Render a match result, one row per left line, with 1-based line numbers.
///
/// Rows are `left,right`, or `left:content,right:content` when
/// `with_content` is set. Deleted lines render as `left,_`.
///
/// Example output:
/// ```text
/// 1,1
/// 2,_
/// 3:return total;,2:return totals;
/// ```
pub fn format_pairs(result: &[Option<LinePair>], with_content: bool) -> String {
    let mut out = String::new();

    for (index, slot) in result.iter().enumerate() {
        let row = match slot {
            None => format!("{},_", index + 1),
            Some(pair) if with_content => format!(
                "{}:{},{}:{}",
                pair.left.line_number() + 1,
                pair.left.content().trim(),
                pair.right.line_number() + 1,
                pair.right.content().trim()
            ),
            Some(pair) => format!(
                "{},{}",
                pair.left.line_number() + 1,
                pair.right.line_number() + 1
            ),
        };
        out.push_str(&row);
        out.push('\n');
    }

    out
}
