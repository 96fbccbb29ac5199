//! Editor language ids and the formatter's `-l` flag values

use ucfg_core::prelude::*;

/// Editor language ids the formatter is registered for
pub const SUPPORTED_MODES: &[&str] = &[
    "apex",
    "c",
    "cpp",
    "csharp",
    "d",
    "java",
    "objective-c",
    "pawn",
    "vala",
];

/// A language the formatter accepts via `-l`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    CSharp,
    D,
    Java,
    ObjectiveC,
    Pawn,
    Vala,
    Apex,
}

impl Language {
    /// Map an editor language id
    pub fn from_language_id(id: &str) -> Result<Self> {
        let language = match id {
            "c" => Language::C,
            "cpp" => Language::Cpp,
            "cs" | "csharp" => Language::CSharp,
            "d" => Language::D,
            "java" => Language::Java,
            "objective-c" => Language::ObjectiveC,
            "pawn" => Language::Pawn,
            "vala" => Language::Vala,
            "apex" => Language::Apex,
            other => return Err(Error::unsupported_language(other)),
        };
        Ok(language)
    }

    /// Value passed to `-l`
    pub fn flag(&self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "CPP",
            Language::CSharp => "CS",
            Language::D => "D",
            Language::Java => "JAVA",
            Language::ObjectiveC => "OC",
            Language::Pawn => "PAWN",
            Language::Vala => "VALA",
            Language::Apex => "APEX",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_language_id(s)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.flag())
    }
}
