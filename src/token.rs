//! Token & Modifier Catalog: the closed set of directive keywords and the
//! per-directive modifier bitflags.

use bitflags::bitflags;

/// A `.keyword` directive, drawn from the closed set Smali defines. Unknown
/// keywords are a [`crate::error::ParseError::UnknownDirective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Annotation,
    ArrayData,
    Catch,
    CatchAll,
    Class,
    End,
    Enum,
    Field,
    Implements,
    Line,
    Local,
    Locals,
    Method,
    PackedSwitch,
    Param,
    Prologue,
    Registers,
    Restart,
    Source,
    SparseSwitch,
    Subannotation,
    Super,
}

impl Directive {
    /// Look up a directive by its keyword (without the leading `.`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "annotation" => Self::Annotation,
            "array-data" => Self::ArrayData,
            "catch" => Self::Catch,
            "catchall" => Self::CatchAll,
            "class" => Self::Class,
            "end" => Self::End,
            "enum" => Self::Enum,
            "field" => Self::Field,
            "implements" => Self::Implements,
            "line" => Self::Line,
            "local" => Self::Local,
            "locals" => Self::Locals,
            "method" => Self::Method,
            "packed-switch" => Self::PackedSwitch,
            "param" => Self::Param,
            "prologue" => Self::Prologue,
            "registers" => Self::Registers,
            "restart" => Self::Restart,
            "source" => Self::Source,
            "sparse-switch" => Self::SparseSwitch,
            "subannotation" => Self::Subannotation,
            "super" => Self::Super,
            _ => return None,
        })
    }

    /// The keyword this directive serializes as (without the leading `.`).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Annotation => "annotation",
            Self::ArrayData => "array-data",
            Self::Catch => "catch",
            Self::CatchAll => "catchall",
            Self::Class => "class",
            Self::End => "end",
            Self::Enum => "enum",
            Self::Field => "field",
            Self::Implements => "implements",
            Self::Line => "line",
            Self::Local => "local",
            Self::Locals => "locals",
            Self::Method => "method",
            Self::PackedSwitch => "packed-switch",
            Self::Param => "param",
            Self::Prologue => "prologue",
            Self::Registers => "registers",
            Self::Restart => "restart",
            Self::Source => "source",
            Self::SparseSwitch => "sparse-switch",
            Self::Subannotation => "subannotation",
            Self::Super => "super",
        }
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.keyword())
    }
}

/// A family of modifier bitflags with a fixed serialization order.
///
/// Each `bitflags!`-generated type below implements this by listing its
/// flags, in the order spec.md §3 declares them, alongside the
/// lower-case-hyphenated name each serializes as.
pub trait ModifierSet: Sized + Copy + 'static {
    /// `(flag, serialized name)` pairs, in declared order.
    const ORDER: &'static [(Self, &'static str)];

    fn contains_flag(&self, flag: Self) -> bool;

    /// Find the flag named by one lower-case-hyphenated modifier word.
    fn find(word: &str) -> Option<Self> {
        Self::ORDER
            .iter()
            .find(|(_, name)| *name == word)
            .map(|(flag, _)| *flag)
    }

    /// Serialize the set flags, space-separated, in declared order.
    fn serialize(&self) -> String {
        Self::ORDER
            .iter()
            .filter(|(flag, _)| self.contains_flag(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassModifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const INTERFACE = 1 << 5;
        const ABSTRACT = 1 << 6;
        const SYNTHETIC = 1 << 7;
        const ANNOTATION = 1 << 8;
        const ENUM = 1 << 9;
    }
}

impl ModifierSet for ClassModifiers {
    const ORDER: &'static [(Self, &'static str)] = &[
        (Self::PUBLIC, "public"),
        (Self::PRIVATE, "private"),
        (Self::PROTECTED, "protected"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::INTERFACE, "interface"),
        (Self::ABSTRACT, "abstract"),
        (Self::SYNTHETIC, "synthetic"),
        (Self::ANNOTATION, "annotation"),
        (Self::ENUM, "enum"),
    ];

    fn contains_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldModifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const VOLATILE = 1 << 5;
        const BRIDGE = 1 << 6;
        const TRANSIENT = 1 << 7;
        const SYNTHETIC = 1 << 8;
        const ENUM = 1 << 9;
    }
}

impl ModifierSet for FieldModifiers {
    const ORDER: &'static [(Self, &'static str)] = &[
        (Self::PUBLIC, "public"),
        (Self::PRIVATE, "private"),
        (Self::PROTECTED, "protected"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::VOLATILE, "volatile"),
        (Self::BRIDGE, "bridge"),
        (Self::TRANSIENT, "transient"),
        (Self::SYNTHETIC, "synthetic"),
        (Self::ENUM, "enum"),
    ];

    fn contains_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodModifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const SYNCHRONIZED = 1 << 5;
        const BRIDGE = 1 << 6;
        const VARARGS = 1 << 7;
        const NATIVE = 1 << 8;
        const INTERFACE = 1 << 9;
        const ABSTRACT = 1 << 10;
        const STRICTFP = 1 << 11;
        const SYNTHETIC = 1 << 12;
        const CONSTRUCTOR = 1 << 13;
        const DECLARED_SYNCHRONIZED = 1 << 14;
    }
}

impl ModifierSet for MethodModifiers {
    const ORDER: &'static [(Self, &'static str)] = &[
        (Self::PUBLIC, "public"),
        (Self::PRIVATE, "private"),
        (Self::PROTECTED, "protected"),
        (Self::STATIC, "static"),
        (Self::FINAL, "final"),
        (Self::SYNCHRONIZED, "synchronized"),
        (Self::BRIDGE, "bridge"),
        (Self::VARARGS, "varargs"),
        (Self::NATIVE, "native"),
        (Self::INTERFACE, "interface"),
        (Self::ABSTRACT, "abstract"),
        (Self::STRICTFP, "strictfp"),
        (Self::SYNTHETIC, "synthetic"),
        (Self::CONSTRUCTOR, "constructor"),
        (Self::DECLARED_SYNCHRONIZED, "declared-synchronized"),
    ];

    fn contains_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AnnotationModifiers: u8 {
        const BUILD = 1 << 0;
        const RUNTIME = 1 << 1;
        const SYSTEM = 1 << 2;
    }
}

impl ModifierSet for AnnotationModifiers {
    const ORDER: &'static [(Self, &'static str)] = &[
        (Self::BUILD, "build"),
        (Self::RUNTIME, "runtime"),
        (Self::SYSTEM, "system"),
    ];

    fn contains_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EndModifiers: u16 {
        const ANNOTATION = 1 << 0;
        const ARRAY_DATA = 1 << 1;
        const FIELD = 1 << 2;
        const LOCAL = 1 << 3;
        const METHOD = 1 << 4;
        const PACKED_SWITCH = 1 << 5;
        const PARAM = 1 << 6;
        const SPARSE_SWITCH = 1 << 7;
        const SUBANNOTATION = 1 << 8;
    }
}

impl ModifierSet for EndModifiers {
    const ORDER: &'static [(Self, &'static str)] = &[
        (Self::ANNOTATION, "annotation"),
        (Self::ARRAY_DATA, "array-data"),
        (Self::FIELD, "field"),
        (Self::LOCAL, "local"),
        (Self::METHOD, "method"),
        (Self::PACKED_SWITCH, "packed-switch"),
        (Self::PARAM, "param"),
        (Self::SPARSE_SWITCH, "sparse-switch"),
        (Self::SUBANNOTATION, "subannotation"),
    ];

    fn contains_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RestartModifiers: u8 {
        const LOCAL = 1 << 0;
    }
}

impl ModifierSet for RestartModifiers {
    const ORDER: &'static [(Self, &'static str)] = &[(Self::LOCAL, "local")];

    fn contains_flag(&self, flag: Self) -> bool {
        self.contains(flag)
    }
}
