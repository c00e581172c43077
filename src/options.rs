//! Driver options.

use nz_compiler::CheckOptions;

/// Options for [`compile`](crate::compile).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Extension appended to module paths when asking for documents.
    pub extension: String,
    /// Names of the special structs.
    pub check: CheckOptions,
    /// Whether to compute the concrete instantiations after a clean check.
    pub monomorphize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            extension: "nz".to_string(),
            check: CheckOptions::default(),
            monomorphize: true,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Rename the structs used for conditions, literals and statements.
    pub fn with_builtin_names(
        mut self,
        bool_name: impl Into<String>,
        string_name: impl Into<String>,
        void_name: impl Into<String>,
    ) -> Self {
        self.check = CheckOptions {
            bool_name: bool_name.into(),
            string_name: string_name.into(),
            void_name: void_name.into(),
        };
        self
    }

    pub fn with_monomorphize(mut self, monomorphize: bool) -> Self {
        self.monomorphize = monomorphize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CompileOptions::default();
        assert_eq!(options.extension, "nz");
        assert_eq!(options.check.bool_name, "Bool");
        assert!(options.monomorphize);
    }

    #[test]
    fn builder() {
        let options = CompileOptions::new()
            .with_extension("src")
            .with_builtin_names("Truth", "Text", "Unit")
            .with_monomorphize(false);
        assert_eq!(options.extension, "src");
        assert_eq!(options.check.string_name, "Text");
        assert_eq!(options.check.void_name, "Unit");
        assert!(!options.monomorphize);
    }
}
