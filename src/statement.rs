//! Statement Parser: turns one logical line (already comment-and-newline
//! aware) into one or more [`Statement`] values.
//!
//! A single physical line can yield more than one statement: an assignment
//! line splits on a top-level `=`, and a line that glues a block terminator
//! onto following text (`} }`, `{ .locals 1`) splits on the brace.

use crate::attributes::StatementAttributes;
use crate::error::ParseError;
use crate::lex::{self, FieldCursor};
use crate::literal::IntLiteral;
use crate::token::{
    AnnotationModifiers, ClassModifiers, Directive, EndModifiers, FieldModifiers,
    MethodModifiers, ModifierSet, RestartModifiers,
};

macro_rules! payload_variants {
    ($($name:ident($payload:ty)),+ $(,)?) => {
        /// The parsed, variant-specific content of a statement.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Variant {
            Blank,
            Comment,
            BlockStart,
            BlockEnd,
            Body,
            Prologue,
            SparseSwitch,
            $($name($payload)),+
        }

        /// A [`Variant`] without its payload, used to query a block for
        /// statements of a given kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum VariantTag {
            Blank,
            Comment,
            BlockStart,
            BlockEnd,
            Body,
            Prologue,
            SparseSwitch,
            $($name),+
        }

        impl Variant {
            pub fn tag(&self) -> VariantTag {
                match self {
                    Self::Blank => VariantTag::Blank,
                    Self::Comment => VariantTag::Comment,
                    Self::BlockStart => VariantTag::BlockStart,
                    Self::BlockEnd => VariantTag::BlockEnd,
                    Self::Body => VariantTag::Body,
                    Self::Prologue => VariantTag::Prologue,
                    Self::SparseSwitch => VariantTag::SparseSwitch,
                    $(Self::$name(_) => VariantTag::$name),+
                }
            }
        }
    };
}

payload_variants! {
    Annotation(AnnotationStmt),
    ArrayData(ArrayDataStmt),
    Catch(CatchStmt),
    CatchAll(CatchAllStmt),
    Class(ClassStmt),
    End(EndStmt),
    Enum(EnumStmt),
    Field(FieldStmt),
    Implements(ImplementsStmt),
    Line(LineStmt),
    Local(LocalStmt),
    Locals(LocalsStmt),
    Method(MethodStmt),
    PackedSwitch(PackedSwitchStmt),
    Param(ParamStmt),
    Registers(RegistersStmt),
    Restart(RestartStmt),
    Source(SourceStmt),
    Subannotation(SubannotationStmt),
    Super(SuperStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationStmt {
    pub modifiers: AnnotationModifiers,
    pub class_descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDataStmt {
    pub element_width: IntLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchStmt {
    pub type_descriptor: String,
    pub try_start_label: String,
    pub try_end_label: String,
    pub catch_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchAllStmt {
    pub try_start_label: String,
    pub try_end_label: String,
    pub catch_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassStmt {
    pub modifiers: ClassModifiers,
    pub class_descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndStmt {
    pub kind: EndModifiers,
    pub local_register: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumStmt {
    pub field_reference: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldStmt {
    pub modifiers: FieldModifiers,
    pub member_name: String,
    pub type_descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplementsStmt {
    pub class_descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStmt {
    pub line_no: IntLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalStmt {
    pub register: String,
    pub variable_name: Option<String>,
    pub variable_type_descriptor: Option<String>,
    pub literal: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalsStmt {
    pub local_count: IntLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodStmt {
    pub modifiers: MethodModifiers,
    pub member_name: String,
    pub method_params: String,
    pub method_result_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackedSwitchStmt {
    pub switch_literal: IntLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamStmt {
    pub register: String,
    pub register_literal: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistersStmt {
    pub register_count: IntLiteral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestartStmt {
    pub modifiers: RestartModifiers,
    pub register: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceStmt {
    pub source_target: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubannotationStmt {
    pub class_descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperStmt {
    pub class_descriptor: String,
}

/// What kind of terminator closes a `BLOCK_START`/`MAYBE_BLOCK_START`
/// statement: a bare `}`, or a `.end <kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEnds {
    BlockEnd,
    End(EndModifiers),
}

/// One parsed statement: its source text, any trailing comment, the
/// attributes driving block resolution and printing, and its variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The original line, with only a trailing `\r`/`\n`/`\r\n` removed.
    pub raw_line: String,
    /// `raw_line`, left-stripped, with the EOL comment removed.
    pub clean_line: String,
    /// The EOL comment, including any whitespace that preceded it.
    pub eol_comment: String,
    pub attributes: StatementAttributes,
    pub variant: Variant,
}

impl Statement {
    pub fn tag(&self) -> VariantTag {
        self.variant.tag()
    }

    pub fn has_attr(&self, attr: StatementAttributes) -> bool {
        self.attributes.contains(attr)
    }

    /// The terminator that closes this statement's block, if it opens one.
    pub fn block_ends_with(&self) -> Option<BlockEnds> {
        match &self.variant {
            Variant::BlockStart => Some(BlockEnds::BlockEnd),
            Variant::Annotation(_) => Some(BlockEnds::End(EndModifiers::ANNOTATION)),
            Variant::ArrayData(_) => Some(BlockEnds::End(EndModifiers::ARRAY_DATA)),
            Variant::Field(_) => Some(BlockEnds::End(EndModifiers::FIELD)),
            Variant::Method(_) => Some(BlockEnds::End(EndModifiers::METHOD)),
            Variant::PackedSwitch(_) => Some(BlockEnds::End(EndModifiers::PACKED_SWITCH)),
            Variant::Param(_) => Some(BlockEnds::End(EndModifiers::PARAM)),
            Variant::SparseSwitch => Some(BlockEnds::End(EndModifiers::SPARSE_SWITCH)),
            Variant::Subannotation(_) => Some(BlockEnds::End(EndModifiers::SUBANNOTATION)),
            _ => None,
        }
    }

    /// The terminator signature this statement represents, if it is one.
    pub fn terminator_signature(&self) -> Option<BlockEnds> {
        match &self.variant {
            Variant::BlockEnd => Some(BlockEnds::BlockEnd),
            Variant::End(e) => Some(BlockEnds::End(e.kind)),
            _ => None,
        }
    }

    /// Re-serialize this statement to Smali source text (without a trailing
    /// newline).
    pub fn serialize(&self) -> String {
        let eol = &self.eol_comment;
        match &self.variant {
            Variant::Blank => String::new(),
            Variant::Comment => self.raw_line.trim_start().to_string(),
            Variant::BlockStart => format!("{}{eol}", self.raw_line.trim_start()),
            Variant::BlockEnd => format!("}}{eol}"),
            Variant::Body => format!("{}{eol}", self.clean_line),
            Variant::Prologue => format!("{}{eol}", Directive::Prologue),
            Variant::SparseSwitch => format!("{}{eol}", Directive::SparseSwitch),
            Variant::Annotation(s) => format!(
                "{} {}{}{eol}",
                Directive::Annotation,
                mods_prefix(&s.modifiers),
                s.class_descriptor
            ),
            Variant::ArrayData(s) => {
                format!("{} {}{eol}", Directive::ArrayData, s.element_width)
            }
            Variant::Catch(s) => format!(
                "{} {} {{:{} .. :{}}} :{}{eol}",
                Directive::Catch,
                s.type_descriptor,
                s.try_start_label,
                s.try_end_label,
                s.catch_label
            ),
            Variant::CatchAll(s) => format!(
                "{} {{:{} .. :{}}} :{}{eol}",
                Directive::CatchAll,
                s.try_start_label,
                s.try_end_label,
                s.catch_label
            ),
            Variant::Class(s) => format!(
                "{} {}{}{eol}",
                Directive::Class,
                mods_prefix(&s.modifiers),
                s.class_descriptor
            ),
            Variant::End(s) => {
                if s.kind.contains(EndModifiers::LOCAL) {
                    format!(
                        "{} {}{}{eol}",
                        Directive::End,
                        mods_prefix(&s.kind),
                        s.local_register.as_deref().unwrap_or_default()
                    )
                } else {
                    format!("{} {}{eol}", Directive::End, s.kind.serialize())
                }
            }
            Variant::Enum(s) => format!("{} {}{eol}", Directive::Enum, s.field_reference),
            Variant::Field(s) => format!(
                "{} {}{}:{}{eol}",
                Directive::Field,
                mods_prefix(&s.modifiers),
                s.member_name,
                s.type_descriptor
            ),
            Variant::Implements(s) => {
                format!("{} {}{eol}", Directive::Implements, s.class_descriptor)
            }
            Variant::Line(s) => format!("{} {}{eol}", Directive::Line, s.line_no),
            Variant::Local(s) => {
                let mut out = format!("{} {}", Directive::Local, s.register);
                if let (Some(name), Some(ty)) = (&s.variable_name, &s.variable_type_descriptor) {
                    out.push_str(&format!(", {name}:{ty}"));
                }
                if let Some(literal) = &s.literal {
                    out.push_str(&format!(", {literal}"));
                }
                out.push_str(eol);
                out
            }
            Variant::Locals(s) => format!("{} {}{eol}", Directive::Locals, s.local_count),
            Variant::Method(s) => format!(
                "{} {}{}({}){}{eol}",
                Directive::Method,
                mods_prefix(&s.modifiers),
                s.member_name,
                s.method_params,
                s.method_result_type
            ),
            Variant::PackedSwitch(s) => {
                format!("{} {}{eol}", Directive::PackedSwitch, s.switch_literal)
            }
            Variant::Param(s) => match &s.register_literal {
                Some(literal) => format!(
                    "{} {}, {}{eol}",
                    Directive::Param,
                    s.register,
                    literal
                ),
                None => format!("{} {}{eol}", Directive::Param, s.register),
            },
            Variant::Registers(s) => {
                format!("{} {}{eol}", Directive::Registers, s.register_count)
            }
            Variant::Restart(s) => format!(
                "{} {}{}{eol}",
                Directive::Restart,
                mods_prefix(&s.modifiers),
                s.register
            ),
            Variant::Source(s) => {
                format!("{} \"{}\"{eol}", Directive::Source, s.source_target)
            }
            Variant::Subannotation(s) => {
                format!("{} {}{eol}", Directive::Subannotation, s.class_descriptor)
            }
            Variant::Super(s) => format!("{} {}{eol}", Directive::Super, s.class_descriptor),
        }
    }
}

fn mods_prefix<M: ModifierSet>(mods: &M) -> String {
    let s = mods.serialize();
    if s.is_empty() {
        String::new()
    } else {
        format!("{s} ")
    }
}

fn next_field(cursor: &mut FieldCursor, raw: &str) -> Result<String, ParseError> {
    cursor
        .next()
        .ok_or_else(|| ParseError::UnexpectedEndOfLine(raw.to_string()))
}

fn next_int(cursor: &mut FieldCursor, raw: &str) -> Result<IntLiteral, ParseError> {
    let field = next_field(cursor, raw)?;
    IntLiteral::parse(&field).ok_or_else(|| ParseError::UnexpectedEndOfLine(raw.to_string()))
}

fn strip_first_last(s: &str) -> String {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.collect()
}

fn consume_modifiers<M: ModifierSet + Default + std::ops::BitOrAssign>(
    cursor: &mut FieldCursor,
) -> M {
    let mut mods = M::default();
    while let Some(word) = cursor.peek() {
        match M::find(word) {
            Some(flag) => {
                mods |= flag;
                cursor.next();
            }
            None => break,
        }
    }
    mods
}

fn method_prototype_regex() -> &'static regex::Regex {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"^(.*?)\((.*)\)(.*)$").unwrap())
}

/// Split a bare `(params)returnType` prototype string, as passed to
/// `SmaliFile::find_method`, into its two halves.
pub fn parse_prototype(prototype: &str) -> Option<(String, String)> {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| regex::Regex::new(r"^\((.*)\)(.*)$").unwrap());
    let caps = re.captures(prototype)?;
    Some((
        caps.get(1).unwrap().as_str().to_string(),
        caps.get(2).unwrap().as_str().to_string(),
    ))
}

fn parse_directive_payload(
    directive: Directive,
    cursor: &mut FieldCursor,
    raw: &str,
) -> Result<(Variant, StatementAttributes), ParseError> {
    use StatementAttributes as SA;
    Ok(match directive {
        Directive::Annotation => {
            let modifiers = consume_modifiers::<AnnotationModifiers>(cursor);
            let class_descriptor = next_field(cursor, raw)?;
            (
                Variant::Annotation(AnnotationStmt {
                    modifiers,
                    class_descriptor,
                }),
                SA::BLOCK_START,
            )
        }
        Directive::ArrayData => {
            let element_width = next_int(cursor, raw)?;
            (
                Variant::ArrayData(ArrayDataStmt { element_width }),
                SA::BLOCK_START,
            )
        }
        Directive::Catch => {
            let type_descriptor = next_field(cursor, raw)?;
            let start_field = next_field(cursor, raw)?;
            let try_start_label = start_field.get(2..).unwrap_or_default().to_string();
            let _dotdot = next_field(cursor, raw)?;
            let end_field = next_field(cursor, raw)?;
            let try_end_label = strip_first_last(&end_field);
            let catch_field = next_field(cursor, raw)?;
            let catch_label = catch_field.get(1..).unwrap_or_default().to_string();
            (
                Variant::Catch(CatchStmt {
                    type_descriptor,
                    try_start_label,
                    try_end_label,
                    catch_label,
                }),
                SA::SINGLE_LINE,
            )
        }
        Directive::CatchAll => {
            let start_field = next_field(cursor, raw)?;
            let try_start_label = start_field.get(2..).unwrap_or_default().to_string();
            let _dotdot = next_field(cursor, raw)?;
            let end_field = next_field(cursor, raw)?;
            let try_end_label = strip_first_last(&end_field);
            let catch_field = next_field(cursor, raw)?;
            let catch_label = catch_field.get(1..).unwrap_or_default().to_string();
            (
                Variant::CatchAll(CatchAllStmt {
                    try_start_label,
                    try_end_label,
                    catch_label,
                }),
                SA::SINGLE_LINE,
            )
        }
        Directive::Class => {
            let modifiers = consume_modifiers::<ClassModifiers>(cursor);
            let class_descriptor = next_field(cursor, raw)?;
            (
                Variant::Class(ClassStmt {
                    modifiers,
                    class_descriptor,
                }),
                SA::SINGLE_LINE,
            )
        }
        Directive::End => {
            let modifiers = consume_modifiers::<EndModifiers>(cursor);
            if modifiers.contains(EndModifiers::LOCAL) {
                let local_register = Some(next_field(cursor, raw)?);
                (
                    Variant::End(EndStmt {
                        kind: modifiers,
                        local_register,
                    }),
                    SA::SINGLE_LINE,
                )
            } else {
                (
                    Variant::End(EndStmt {
                        kind: modifiers,
                        local_register: None,
                    }),
                    SA::BLOCK_END,
                )
            }
        }
        Directive::Enum => {
            let field_reference = next_field(cursor, raw)?;
            (Variant::Enum(EnumStmt { field_reference }), SA::SINGLE_LINE)
        }
        Directive::Field => {
            let modifiers = consume_modifiers::<FieldModifiers>(cursor);
            let field_tok = next_field(cursor, raw)?;
            let mut parts = field_tok.splitn(2, ':');
            let member_name = parts.next().unwrap_or_default().to_string();
            let type_descriptor = parts.next().unwrap_or_default().to_string();
            (
                Variant::Field(FieldStmt {
                    modifiers,
                    member_name,
                    type_descriptor,
                }),
                SA::MAYBE_BLOCK_START,
            )
        }
        Directive::Implements => {
            let class_descriptor = next_field(cursor, raw)?;
            (
                Variant::Implements(ImplementsStmt { class_descriptor }),
                SA::SINGLE_LINE,
            )
        }
        Directive::Line => {
            let line_no = next_int(cursor, raw)?;
            (Variant::Line(LineStmt { line_no }), SA::SINGLE_LINE)
        }
        Directive::Local => {
            let mut register = next_field(cursor, raw)?;
            let (mut variable_name, mut variable_type_descriptor, mut literal) = (None, None, None);
            if register.ends_with(',') {
                register.pop();
                let var_field = next_field(cursor, raw)?;
                let mut parts = var_field.splitn(2, ':');
                let name = parts.next().unwrap_or_default().to_string();
                let mut ty = parts.next().unwrap_or_default().to_string();
                if ty.ends_with(',') {
                    ty.pop();
                    literal = Some(next_field(cursor, raw)?);
                }
                variable_name = Some(name);
                variable_type_descriptor = Some(ty);
            }
            (
                Variant::Local(LocalStmt {
                    register,
                    variable_name,
                    variable_type_descriptor,
                    literal,
                }),
                SA::SINGLE_LINE,
            )
        }
        Directive::Locals => {
            let local_count = next_int(cursor, raw)?;
            (Variant::Locals(LocalsStmt { local_count }), SA::SINGLE_LINE)
        }
        Directive::Method => {
            let modifiers = consume_modifiers::<MethodModifiers>(cursor);
            let proto_field = next_field(cursor, raw)?;
            let caps = method_prototype_regex()
                .captures(&proto_field)
                .ok_or_else(|| ParseError::InvalidMethodPrototype(raw.to_string()))?;
            let member_name = caps.get(1).unwrap().as_str().to_string();
            let method_params = caps.get(2).unwrap().as_str().to_string();
            let method_result_type = caps.get(3).unwrap().as_str().to_string();
            (
                Variant::Method(MethodStmt {
                    modifiers,
                    member_name,
                    method_params,
                    method_result_type,
                }),
                SA::BLOCK_START,
            )
        }
        Directive::PackedSwitch => {
            let switch_literal = next_int(cursor, raw)?;
            (
                Variant::PackedSwitch(PackedSwitchStmt { switch_literal }),
                SA::BLOCK_START,
            )
        }
        Directive::Param => {
            let mut register = next_field(cursor, raw)?;
            let register_literal = if register.ends_with(',') {
                register.pop();
                Some(next_field(cursor, raw)?)
            } else {
                None
            };
            (
                Variant::Param(ParamStmt {
                    register,
                    register_literal,
                }),
                SA::MAYBE_BLOCK_START,
            )
        }
        Directive::Prologue => (Variant::Prologue, SA::SINGLE_LINE),
        Directive::Registers => {
            let register_count = next_int(cursor, raw)?;
            (
                Variant::Registers(RegistersStmt { register_count }),
                SA::SINGLE_LINE,
            )
        }
        Directive::Restart => {
            let modifiers = consume_modifiers::<RestartModifiers>(cursor);
            let register = next_field(cursor, raw)?;
            (
                Variant::Restart(RestartStmt { modifiers, register }),
                SA::SINGLE_LINE,
            )
        }
        Directive::Source => {
            let raw_field = next_field(cursor, raw)?;
            let source_target = strip_first_last(&raw_field);
            (Variant::Source(SourceStmt { source_target }), SA::SINGLE_LINE)
        }
        Directive::SparseSwitch => (Variant::SparseSwitch, SA::BLOCK_START),
        Directive::Subannotation => {
            let class_descriptor = next_field(cursor, raw)?;
            (
                Variant::Subannotation(SubannotationStmt { class_descriptor }),
                SA::BLOCK_START,
            )
        }
        Directive::Super => {
            let class_descriptor = next_field(cursor, raw)?;
            (Variant::Super(SuperStmt { class_descriptor }), SA::SINGLE_LINE)
        }
    })
}

/// Split a line that starts or ends with `{`/`}` into pieces, each matching
/// `{`, `}`, or a run of other text, discarding the single space adjacent
/// to a brace (after a `{`, before a `}`) the way the original's
/// lookahead-based regex did.
fn split_braces(s: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' => {
                if !current.trim().is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                current.clear();
                pieces.push("{".to_string());
                i += 1;
                if i < chars.len() && chars[i] == ' ' {
                    i += 1;
                }
            }
            '}' => {
                if current.ends_with(' ') {
                    current.pop();
                }
                if !current.trim().is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                current.clear();
                pieces.push("}".to_string());
                i += 1;
            }
            c => {
                current.push(c);
                i += 1;
            }
        }
    }
    if !current.trim().is_empty() {
        pieces.push(current);
    }
    pieces.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

/// Parse one logical line into one or more statements. `validate` gates the
/// statement-level check that every field was consumed.
pub fn parse_line(line: &str, validate: bool) -> Result<Vec<Statement>, ParseError> {
    let raw = lex::strip_newline(line);
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(vec![Statement {
            raw_line: raw.to_string(),
            clean_line: String::new(),
            eol_comment: String::new(),
            attributes: StatementAttributes::SINGLE_LINE | StatementAttributes::NO_INDENT,
            variant: Variant::Blank,
        }]);
    }

    if trimmed.starts_with('#') {
        return Ok(vec![Statement {
            raw_line: raw.to_string(),
            clean_line: String::new(),
            eol_comment: String::new(),
            attributes: StatementAttributes::SINGLE_LINE,
            variant: Variant::Comment,
        }]);
    }

    if let Some(eq_idx) = lex::find_top_level(trimmed, '=') {
        let (lhs_src, rhs_src) = (&trimmed[..eq_idx], &trimmed[eq_idx + 1..]);
        let mut lhs = parse_line(lhs_src, validate)?;
        let mut rhs = parse_line(rhs_src, validate)?;
        if lhs.is_empty() || rhs.is_empty() {
            return Err(ParseError::AssignmentWrongSides(raw.to_string()));
        }
        lhs[0].attributes |= StatementAttributes::ASSIGNMENT_LHS;
        rhs[0].attributes |= StatementAttributes::ASSIGNMENT_RHS;
        lhs.extend(rhs);
        return Ok(lhs);
    }

    if trimmed.ends_with('}') {
        if trimmed == "}" {
            let (_, eol_comment) = lex::split_eol_comment(raw.trim_start());
            return Ok(vec![Statement {
                raw_line: raw.to_string(),
                clean_line: String::new(),
                eol_comment: eol_comment.to_string(),
                attributes: StatementAttributes::BLOCK_END,
                variant: Variant::BlockEnd,
            }]);
        }
        let mut out = Vec::new();
        for piece in split_braces(trimmed) {
            out.extend(parse_line(&piece, validate)?);
        }
        for stmt in out.iter_mut().skip(1) {
            stmt.attributes |= StatementAttributes::NO_BREAK;
        }
        return Ok(out);
    }

    if trimmed.ends_with('{') {
        let (_, eol_comment) = lex::split_eol_comment(raw.trim_start());
        return Ok(vec![Statement {
            raw_line: raw.to_string(),
            clean_line: String::new(),
            eol_comment: eol_comment.to_string(),
            attributes: StatementAttributes::BLOCK_START,
            variant: Variant::BlockStart,
        }]);
    }

    if trimmed.starts_with('{') {
        let mut out = Vec::new();
        for piece in split_braces(trimmed) {
            out.extend(parse_line(&piece, validate)?);
        }
        for stmt in out.iter_mut().skip(1) {
            stmt.attributes |= StatementAttributes::NO_BREAK;
        }
        return Ok(out);
    }

    if trimmed.starts_with('.') {
        let clean_lstripped = raw.trim_start();
        let (body, eol_comment) = lex::split_eol_comment(clean_lstripped);
        let fields = lex::split_fields(body);
        let first = fields
            .first()
            .ok_or_else(|| ParseError::DirectiveTooShort(raw.to_string()))?;
        if first.len() <= 1 {
            return Err(ParseError::DirectiveTooShort(raw.to_string()));
        }
        let keyword = &first[1..];
        let directive = Directive::from_keyword(keyword)
            .ok_or_else(|| ParseError::UnknownDirective(keyword.to_string()))?;
        let mut cursor = FieldCursor::new(fields[1..].to_vec());
        let (variant, attributes) = parse_directive_payload(directive, &mut cursor, body)?;
        if validate && !cursor.is_empty() {
            return Err(ParseError::LineNotEmpty(raw.to_string()));
        }
        return Ok(vec![Statement {
            raw_line: raw.to_string(),
            clean_line: body.to_string(),
            eol_comment: eol_comment.to_string(),
            attributes,
            variant,
        }]);
    }

    let clean_lstripped = raw.trim_start();
    let (body, eol_comment) = lex::split_eol_comment(clean_lstripped);
    Ok(vec![Statement {
        raw_line: raw.to_string(),
        clean_line: body.to_string(),
        eol_comment: eol_comment.to_string(),
        attributes: StatementAttributes::SINGLE_LINE,
        variant: Variant::Body,
    }])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_blank_line() {
        let stmts = parse_line("   \n", true).unwrap();
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].tag(), VariantTag::Blank);
        assert_eq!(stmts[0].serialize(), "");
    }

    #[test]
    fn parses_comment_line() {
        let stmts = parse_line("  # hello", true).unwrap();
        assert_eq!(stmts[0].tag(), VariantTag::Comment);
        assert_eq!(stmts[0].serialize(), "# hello");
    }

    #[test]
    fn parses_class_directive_with_modifiers() {
        let stmts = parse_line(".class public final LFoo;", true).unwrap();
        assert_eq!(stmts.len(), 1);
        match &stmts[0].variant {
            Variant::Class(c) => {
                assert!(c.modifiers.contains(ClassModifiers::PUBLIC));
                assert!(c.modifiers.contains(ClassModifiers::FINAL));
                assert_eq!(c.class_descriptor, "LFoo;");
            }
            other => panic!("expected Class, got {other:?}"),
        }
        assert_eq!(stmts[0].serialize(), ".class public final LFoo;");
    }

    #[test]
    fn class_without_modifiers_omits_modifier_section() {
        let stmts = parse_line(".class LFoo;", true).unwrap();
        assert_eq!(stmts[0].serialize(), ".class LFoo;");
    }

    #[test]
    fn parses_method_prototype() {
        let stmts = parse_line(".method public static main([Ljava/lang/String;)V", true).unwrap();
        match &stmts[0].variant {
            Variant::Method(m) => {
                assert_eq!(m.member_name, "main");
                assert_eq!(m.method_params, "[Ljava/lang/String;");
                assert_eq!(m.method_result_type, "V");
            }
            other => panic!("expected Method, got {other:?}"),
        }
        assert!(stmts[0].attributes.contains(StatementAttributes::BLOCK_START));
        assert_eq!(
            stmts[0].block_ends_with(),
            Some(BlockEnds::End(EndModifiers::METHOD))
        );
    }

    #[test]
    fn field_is_maybe_block_start() {
        let stmts = parse_line(".field private foo:I", true).unwrap();
        assert!(stmts[0]
            .attributes
            .contains(StatementAttributes::MAYBE_BLOCK_START));
        match &stmts[0].variant {
            Variant::Field(f) => {
                assert_eq!(f.member_name, "foo");
                assert_eq!(f.type_descriptor, "I");
            }
            other => panic!("expected Field, got {other:?}"),
        }
    }

    #[test]
    fn parses_end_local_as_single_line() {
        let stmts = parse_line(".end local v0", true).unwrap();
        assert!(stmts[0].attributes.contains(StatementAttributes::SINGLE_LINE));
        assert_eq!(stmts[0].serialize(), ".end local v0");
    }

    #[test]
    fn parses_end_method_as_block_end() {
        let stmts = parse_line(".end method", true).unwrap();
        assert!(stmts[0].attributes.contains(StatementAttributes::BLOCK_END));
        assert_eq!(
            stmts[0].terminator_signature(),
            Some(BlockEnds::End(EndModifiers::METHOD))
        );
        assert_eq!(stmts[0].serialize(), ".end method");
    }

    #[test]
    fn parses_bare_block_markers() {
        let open = parse_line("    {", true).unwrap();
        assert_eq!(open[0].tag(), VariantTag::BlockStart);
        assert_eq!(open[0].serialize(), "{");

        let close = parse_line("    }", true).unwrap();
        assert_eq!(close[0].tag(), VariantTag::BlockEnd);
        assert_eq!(close[0].serialize(), "}");
    }

    #[test]
    fn splits_double_close_brace() {
        let stmts = parse_line("} }", true).unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(stmts.iter().all(|s| s.tag() == VariantTag::BlockEnd));
        assert!(!stmts[0].has_attr(StatementAttributes::NO_BREAK));
        assert!(stmts[1].has_attr(StatementAttributes::NO_BREAK));
    }

    #[test]
    fn splits_assignment_on_top_level_equals() {
        let stmts = parse_line(r#".param p1 = "description""#, true).unwrap();
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].has_attr(StatementAttributes::ASSIGNMENT_LHS));
        assert!(stmts[1].has_attr(StatementAttributes::ASSIGNMENT_RHS));
    }

    #[test]
    fn parses_catch() {
        let stmts =
            parse_line(".catch Ljava/lang/Exception; {:try_start_0 .. :try_end_0} :handler_0", true)
                .unwrap();
        match &stmts[0].variant {
            Variant::Catch(c) => {
                assert_eq!(c.type_descriptor, "Ljava/lang/Exception;");
                assert_eq!(c.try_start_label, "try_start_0");
                assert_eq!(c.try_end_label, "try_end_0");
                assert_eq!(c.catch_label, "handler_0");
            }
            other => panic!("expected Catch, got {other:?}"),
        }
        assert_eq!(
            stmts[0].serialize(),
            ".catch Ljava/lang/Exception; {:try_start_0 .. :try_end_0} :handler_0"
        );
    }

    #[test]
    fn parses_source_quoted() {
        let stmts = parse_line(r#".source "Foo.java""#, true).unwrap();
        match &stmts[0].variant {
            Variant::Source(s) => assert_eq!(s.source_target, "Foo.java"),
            other => panic!("expected Source, got {other:?}"),
        }
        assert_eq!(stmts[0].serialize(), r#".source "Foo.java""#);
    }

    #[test]
    fn parses_local_with_name_type_and_literal() {
        let stmts = parse_line(".local v1, x:I, \"note\"", true).unwrap();
        match &stmts[0].variant {
            Variant::Local(l) => {
                assert_eq!(l.register, "v1");
                assert_eq!(l.variable_name.as_deref(), Some("x"));
                assert_eq!(l.variable_type_descriptor.as_deref(), Some("I"));
                assert_eq!(l.literal.as_deref(), Some("\"note\""));
            }
            other => panic!("expected Local, got {other:?}"),
        }
    }

    #[test]
    fn unknown_directive_is_an_error() {
        let err = parse_line(".bogus foo", true).unwrap_err();
        assert!(matches!(err, ParseError::UnknownDirective(_)));
    }

    #[test]
    fn directive_too_short_is_an_error() {
        let err = parse_line(".", true).unwrap_err();
        assert!(matches!(err, ParseError::DirectiveTooShort(_)));
    }

    #[test]
    fn trailing_field_fails_statement_level_validation() {
        let err = parse_line(".super LFoo; extra", true).unwrap_err();
        assert!(matches!(err, ParseError::LineNotEmpty(_)));
    }

    #[test]
    fn trailing_field_allowed_when_validation_disabled() {
        let stmts = parse_line(".super LFoo; extra", false).unwrap();
        assert_eq!(stmts.len(), 1);
    }

    #[test]
    fn plain_instruction_is_body() {
        let stmts = parse_line("    invoke-static {}, LFoo;->bar()V", true).unwrap();
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].tag(), VariantTag::Body);
        assert_eq!(stmts[0].serialize(), "invoke-static {}, LFoo;->bar()V");
    }

    #[test]
    fn line_round_trips_hex_and_decimal() {
        let hex = parse_line(".line 0x2A", true).unwrap();
        match &hex[0].variant {
            Variant::Line(l) => assert_eq!(l.line_no.value, 42),
            other => panic!("expected Line, got {other:?}"),
        }
        assert_eq!(hex[0].serialize(), ".line 0x2a");

        let dec = parse_line(".line 42", true).unwrap();
        match &dec[0].variant {
            Variant::Line(l) => assert_eq!(l.line_no.value, 42),
            other => panic!("expected Line, got {other:?}"),
        }
        assert_eq!(dec[0].serialize(), ".line 42");
    }

    fn parse_all(lines: &[&str]) -> Vec<Statement> {
        lines
            .iter()
            .flat_map(|line| parse_line(line, true).unwrap())
            .collect()
    }

    #[test]
    fn packed_switch_resolves_to_a_block() {
        let stmts = parse_all(&[".packed-switch 0x0", "    :case_0", ".end packed-switch"]);
        let root = crate::resolver::resolve(stmts).unwrap();
        assert_eq!(root.items.len(), 1);
        match &root.items[0] {
            crate::block::Item::Block(b) => {
                let head = b.head().unwrap();
                match &head.variant {
                    Variant::PackedSwitch(p) => {
                        assert_eq!(p.switch_literal.base, 16);
                        assert_eq!(p.switch_literal.value, 0);
                    }
                    other => panic!("expected PackedSwitch, got {other:?}"),
                }
                assert!(head.attributes.contains(StatementAttributes::BLOCK_START));
                assert_eq!(
                    head.block_ends_with(),
                    Some(BlockEnds::End(EndModifiers::PACKED_SWITCH))
                );
                assert_eq!(b.flatten().len(), 3);
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn sparse_switch_resolves_to_a_block() {
        let stmts = parse_all(&[".sparse-switch", "    0x1 -> :case_1", ".end sparse-switch"]);
        let root = crate::resolver::resolve(stmts).unwrap();
        match &root.items[0] {
            crate::block::Item::Block(b) => {
                let head = b.head().unwrap();
                assert_eq!(head.tag(), VariantTag::SparseSwitch);
                assert_eq!(
                    head.block_ends_with(),
                    Some(BlockEnds::End(EndModifiers::SPARSE_SWITCH))
                );
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn array_data_resolves_to_a_block() {
        let stmts = parse_all(&[".array-data 4", "    0x1", ".end array-data"]);
        let root = crate::resolver::resolve(stmts).unwrap();
        match &root.items[0] {
            crate::block::Item::Block(b) => match &b.head().unwrap().variant {
                Variant::ArrayData(a) => assert_eq!(a.element_width.value, 4),
                other => panic!("expected ArrayData, got {other:?}"),
            },
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn parses_subannotation_block() {
        let stmts = parse_all(&[".subannotation Lfoo;", ".end subannotation"]);
        let root = crate::resolver::resolve(stmts).unwrap();
        match &root.items[0] {
            crate::block::Item::Block(b) => match &b.head().unwrap().variant {
                Variant::Subannotation(s) => assert_eq!(s.class_descriptor, "Lfoo;"),
                other => panic!("expected Subannotation, got {other:?}"),
            },
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn parses_registers() {
        let stmts = parse_line(".registers 4", true).unwrap();
        match &stmts[0].variant {
            Variant::Registers(r) => assert_eq!(r.register_count.value, 4),
            other => panic!("expected Registers, got {other:?}"),
        }
        assert_eq!(stmts[0].serialize(), ".registers 4");
    }

    #[test]
    fn parses_restart_local() {
        let stmts = parse_line(".restart local v0", true).unwrap();
        match &stmts[0].variant {
            Variant::Restart(r) => {
                assert!(r.modifiers.contains(RestartModifiers::LOCAL));
                assert_eq!(r.register, "v0");
            }
            other => panic!("expected Restart, got {other:?}"),
        }
        assert_eq!(stmts[0].serialize(), ".restart local v0");
    }

    #[test]
    fn parses_prologue() {
        let stmts = parse_line(".prologue", true).unwrap();
        assert_eq!(stmts[0].tag(), VariantTag::Prologue);
        assert_eq!(stmts[0].serialize(), ".prologue");
    }

    #[test]
    fn parses_implements() {
        let stmts = parse_line(".implements Ljava/io/Serializable;", true).unwrap();
        match &stmts[0].variant {
            Variant::Implements(i) => assert_eq!(i.class_descriptor, "Ljava/io/Serializable;"),
            other => panic!("expected Implements, got {other:?}"),
        }
        assert_eq!(stmts[0].serialize(), ".implements Ljava/io/Serializable;");
    }

    #[test]
    fn parses_enum() {
        let stmts = parse_line(".enum Lfoo/Bar;->VALUE:Lfoo/Bar;", true).unwrap();
        match &stmts[0].variant {
            Variant::Enum(e) => assert_eq!(e.field_reference, "Lfoo/Bar;->VALUE:Lfoo/Bar;"),
            other => panic!("expected Enum, got {other:?}"),
        }
        assert_eq!(stmts[0].serialize(), ".enum Lfoo/Bar;->VALUE:Lfoo/Bar;");
    }

    #[test]
    fn parses_catchall() {
        let stmts =
            parse_line(".catchall {:try_start_0 .. :try_end_0} :handler_0", true).unwrap();
        match &stmts[0].variant {
            Variant::CatchAll(c) => {
                assert_eq!(c.try_start_label, "try_start_0");
                assert_eq!(c.try_end_label, "try_end_0");
                assert_eq!(c.catch_label, "handler_0");
            }
            other => panic!("expected CatchAll, got {other:?}"),
        }
        assert_eq!(
            stmts[0].serialize(),
            ".catchall {:try_start_0 .. :try_end_0} :handler_0"
        );
    }
}
