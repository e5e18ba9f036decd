use crate::{RenderableReview, RenderableSeverity};

/// 1-based line and column (in chars) of a byte offset into `text`.
///
/// Offsets past the end clamp to the end; offsets inside a multi-byte char
/// resolve to that char.
pub fn line_col(text: &str, offset: usize) -> (u32, u32) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line as u32, col as u32)
}

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col}::{message}`
pub fn render_github_annotations(review: &RenderableReview) -> Vec<String> {
    let mut out = Vec::new();

    for v in &review.violations {
        let level = match v.severity {
            RenderableSeverity::High => "error",
            RenderableSeverity::Medium => "warning",
            RenderableSeverity::Low => "notice",
        };

        let mut meta = String::new();
        if let Some(loc) = &v.location {
            meta.push_str(&format!("file={}", loc.path));
            if let Some(line) = loc.line {
                meta.push_str(&format!(",line={}", line));
            }
            if let Some(col) = loc.col {
                meta.push_str(&format!(",col={}", col));
            }
        }

        let message = format!("[{}] {}", v.rule_id, v.message)
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");

        if meta.is_empty() {
            out.push(format!("::{}::{}", level, message));
        } else {
            out.push(format!("::{} {}::{}", level, meta, message));
        }
    }

    out
}
