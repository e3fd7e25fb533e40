pub use text_size::{TextRange, TextSize};

/// A zero-indexed line/column pair, used only for user-facing rendering.
/// Internally everything addresses source by byte offset (`TextRange`);
/// `LineIndex` is the sole place offsets are translated to line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Precomputed table of line-start offsets for O(log n) offset -> LineCol.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line; `newlines[0] == 0`.
    newlines: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut newlines = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                newlines.push(i as u32 + 1);
            }
        }
        Self { newlines }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset: u32 = offset.into();
        let line = match self.newlines.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.newlines[line];
        LineCol {
            line: line as u32,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_line_col_across_lines() {
        let idx = LineIndex::new("module x {\n  leaf y;\n}\n");
        assert_eq!(idx.line_col(TextSize::from(0)), LineCol { line: 0, col: 0 });
        assert_eq!(idx.line_col(TextSize::from(13)), LineCol { line: 1, col: 2 });
    }
}
