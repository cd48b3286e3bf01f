use crate::operations::Precedence;

/// Running text of what the brain has been asked to do.
///
/// The text is kept as a committed part (`"7 + "`) and the token of the
/// operand currently being built (`"√(9)"`). Binary operators commit the
/// token; unary and percent rewrite it in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct Description {
    committed: String,
    token: Option<String>,
    /// Loosest binary operator at the top level of `committed`.
    loosest: Option<Precedence>,
}

impl Description {
    pub fn clear(&mut self) {
        self.committed.clear();
        self.token = None;
        self.loosest = None;
    }

    pub fn render(&self) -> String {
        let mut out = self.committed.clone();
        if let Some(token) = &self.token {
            out.push_str(token);
        }
        out.trim_end().to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.trim().is_empty() && self.token.is_none()
    }

    /// An operand, constant or random value. Outside a pending operation it
    /// starts a fresh expression.
    pub fn set_token(&mut self, text: String, continues_expression: bool) {
        if !continues_expression {
            self.clear();
        }
        self.token = Some(text);
    }

    /// `prefix(token)` for a unary applied to the second operand.
    pub fn wrap_token(&mut self, prefix: &str, fallback: String) {
        let inner = self.token.take().unwrap_or(fallback);
        self.token = Some(format!("{prefix}({inner})"));
    }

    /// `prefix(everything so far)` for a unary applied to a finished value.
    pub fn wrap_all(&mut self, prefix: &str, fallback: String) {
        let whole = self.whole_or(fallback);
        self.committed = format!("{prefix}({whole})");
        self.token = None;
        self.loosest = None;
    }

    pub fn suffix_token(&mut self, suffix: &str, fallback: String) {
        let inner = self.token.take().unwrap_or(fallback);
        self.token = Some(format!("{inner}{suffix}"));
    }

    pub fn suffix_all(&mut self, suffix: &str, fallback: String) {
        let whole = self.whole_or(fallback);
        self.committed = if self.loosest.is_some() {
            format!("({whole}){suffix}")
        } else {
            format!("{whole}{suffix}")
        };
        self.token = None;
        self.loosest = None;
    }

    /// Commits the token (or `fallback` when there is none) and appends a
    /// binary operator, parenthesising the left side when it binds looser
    /// than the new operator.
    pub fn push_binary(&mut self, glyph: &str, precedence: Precedence, fallback: Option<String>) {
        self.commit_token(fallback);
        let left = self.committed.trim_end();
        let grouped = self.loosest.is_some_and(|loosest| loosest < precedence);
        self.committed = if grouped {
            format!("({left}) {glyph} ")
        } else {
            format!("{left} {glyph} ")
        };
        self.loosest = Some(match self.loosest {
            Some(loosest) if !grouped => loosest.min(precedence),
            _ => precedence,
        });
    }

    /// Folds the token into the committed text, e.g. on `=`.
    pub fn commit_token(&mut self, fallback: Option<String>) {
        if let Some(text) = self.token.take().or(fallback) {
            self.committed.push_str(&text);
        }
    }

    fn whole_or(&self, fallback: String) -> String {
        if self.is_empty() {
            fallback
        } else {
            self.render()
        }
    }
}
