use serde::{Deserialize, Serialize};

/// Comment style used when appending the extracted text next to a replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStyle {
    /// Line comment: `// text`
    Line,
    /// Block comment: `/* text */`
    #[default]
    Block,
}

impl CommentStyle {
    /// Returns true if this is line comment style.
    pub fn is_line(&self) -> bool {
        matches!(self, CommentStyle::Line)
    }

    /// Format `text` as a comment of this style.
    ///
    /// Line comments are kept on one line and block comments cannot be closed early.
    pub fn format(&self, text: &str) -> String {
        match self {
            CommentStyle::Line => {
                let single_line: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                format!("// {}", single_line)
            }
            CommentStyle::Block => format!("/* {} */", text.replace("*/", "* /")),
        }
    }
}
