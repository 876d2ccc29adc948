use crate::ast::Pos;
use crate::error::SemanticError;
use color_print::{cformat, ceprintln};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: Pos,
    pub error: SemanticError,
}

impl Diagnostic {
    pub fn cformat(&self, file: &str) -> String {
        cformat!(
            "<red,bold>error</>: {}\n     <blue>--></> <underline>{}:{}</>",
            self.error,
            file,
            self.pos
        )
    }
}

/// Sink for user-facing faults. Reporting never stops a pass.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, pos: Pos, error: SemanticError) {
        self.0.push(Diagnostic { pos, error });
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Just the errors, in report order.
    pub fn errors(&self) -> Vec<SemanticError> {
        self.0.iter().map(|d| d.error).collect()
    }

    pub fn print(&self, file: &str) {
        for diag in &self.0 {
            ceprintln!("{}", diag.cformat(file));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_keeps_order() {
        let mut diags = Diagnostics::new();
        diags.report(Pos::new(3, 1), SemanticError::TypeMismatch);
        diags.report(Pos::new(1, 7), SemanticError::UndeclaredIdentifier);
        assert_eq!(diags.len(), 2);
        assert_eq!(
            diags.errors(),
            vec![
                SemanticError::TypeMismatch,
                SemanticError::UndeclaredIdentifier
            ]
        );
        assert_eq!(diags.iter().next().map(|d| d.pos), Some(Pos::new(3, 1)));
    }

    #[test]
    fn message_text() {
        let diag = Diagnostic {
            pos: Pos::new(4, 2),
            error: SemanticError::MissingReturnValue,
        };
        let text = diag.cformat("main.yaml");
        assert!(text.contains("Missing return value"));
        assert!(text.contains("main.yaml:4:2"));
    }
}
