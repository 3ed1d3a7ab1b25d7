//! Program derivation
//!
//! Turns user-supplied text into a compilable Java source file. Detection is
//! a plain pattern match on `public class <Name>`; comments, string literals
//! and nested classes are not understood.

use std::sync::LazyLock;

use regex::Regex;

/// Class name used when the code declares none
pub const DEFAULT_CLASS_NAME: &str = "Main";

static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+class\s+([A-Za-z0-9_]+)").expect("class declaration pattern is valid")
});

/// Infer the class name from the first `public class` declaration
pub fn infer_class_name(code: &str) -> Option<&str> {
    CLASS_DECLARATION
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Compilable program derived from user code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    class_name: String,
    source: String,
    wrapped: bool,
}

impl Program {
    /// Derive a program from a full class or a statement fragment.
    ///
    /// Code declaring a public class passes through unchanged. Anything else
    /// becomes the body of a generated `main` in `public class Main`.
    pub fn from_code(code: &str) -> Self {
        match infer_class_name(code) {
            Some(class_name) => Self {
                class_name: class_name.to_owned(),
                source: code.to_owned(),
                wrapped: false,
            },
            None => Self {
                class_name: DEFAULT_CLASS_NAME.to_owned(),
                source: wrap_in_main(DEFAULT_CLASS_NAME, code),
                wrapped: true,
            },
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The generated source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the code was wrapped in a synthesized entry point
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// File name `javac` requires for a public class
    pub fn source_file_name(&self) -> String {
        format!("{}.java", self.class_name)
    }

    /// File name of the compiled top-level class
    pub fn class_file_name(&self) -> String {
        format!("{}.class", self.class_name)
    }
}

fn wrap_in_main(class_name: &str, body: &str) -> String {
    format!(
        "public class {class_name} {{\n    public static void main(String[] args) {{\n        {body}\n    }}\n}}"
    )
}
