//! Declarations and declaration contexts.
//!
//! Declarations live in an arena owned by [`crate::AstContext`]; a
//! [`DeclId`] is an index into it. Records and namespaces double as
//! declaration contexts: their member declarations are children in the
//! arena, while record *fields* are payload of the record itself (they are
//! never looked up independently).

use smol_str::SmolStr;

use crate::source::{SourceLocation, SourceRange};
use crate::types::QualType;

/// Stable identifier of a declaration.
///
/// Redeclarations of one entity share a canonical id; see
/// [`crate::AstContext::canonical`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(pub usize);

/// The name of a declaration as the AST sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclName {
    /// An ordinary identifier; empty for unnamed entities.
    Identifier(SmolStr),
    Constructor,
    Destructor,
    /// `operator+` and friends; the payload is the operator token.
    Operator(SmolStr),
    /// `operator T()` conversion functions.
    Conversion,
}

impl DeclName {
    pub fn ident(name: &str) -> Self {
        DeclName::Identifier(SmolStr::new(name))
    }

    /// The plain identifier, if this is one and it is non-empty.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            DeclName::Identifier(name) if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

/// C++ member access, including Clang's "no specifier seen" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
    #[default]
    None,
}

/// Reference qualification of an instance method (`&`, `&&`, or none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

/// Classification of a constructor, as the AST computes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CtorInfo {
    pub is_explicit: bool,
    pub is_default: bool,
    pub is_copy: bool,
    pub is_move: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodKind {
    #[default]
    Plain,
    Constructor(CtorInfo),
    Destructor,
}

/// Member-function facts attached to a [`FunctionDecl`].
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// The record this method belongs to.
    pub parent: DeclId,
    pub access: AccessSpecifier,
    /// `false` for static member functions.
    pub is_instance: bool,
    pub is_const: bool,
    pub is_virtual: bool,
    pub ref_qualifier: RefQualifier,
    pub kind: MethodKind,
}

impl MethodInfo {
    /// A public instance method with no qualifiers.
    pub fn instance(parent: DeclId) -> Self {
        Self {
            parent,
            access: AccessSpecifier::Public,
            is_instance: true,
            is_const: false,
            is_virtual: false,
            ref_qualifier: RefQualifier::None,
            kind: MethodKind::Plain,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    /// Empty for unnamed parameters.
    pub name: SmolStr,
    pub ty: QualType,
}

impl ParamDecl {
    pub fn new(name: &str, ty: QualType) -> Self {
        Self { name: SmolStr::new(name), ty }
    }

    pub fn unnamed(ty: QualType) -> Self {
        Self { name: SmolStr::default(), ty }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub return_type: QualType,
    pub params: Vec<ParamDecl>,
    pub is_deleted: bool,
    /// True for the pattern declaration inside a function template.
    pub is_templated: bool,
    pub is_inline: bool,
    pub method: Option<MethodInfo>,
}

impl FunctionDecl {
    pub fn new(return_type: QualType) -> Self {
        Self {
            return_type,
            params: Vec::new(),
            is_deleted: false,
            is_templated: false,
            is_inline: false,
            method: None,
        }
    }

    pub fn with_params(mut self, params: Vec<ParamDecl>) -> Self {
        self.params = params;
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.method = Some(method);
        self
    }
}

/// How a special member function is defined, at the granularity the
/// downstream code generator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialMemberDefinition {
    #[default]
    Trivial,
    /// Non-trivial only because members (or bases) require calls.
    NontrivialMembers,
    /// User-provided or otherwise non-trivial for the type itself.
    NontrivialSelf,
    Deleted,
}

#[derive(Debug, Clone, Copy)]
pub struct SpecialMemberInfo {
    pub definition: SpecialMemberDefinition,
    pub access: AccessSpecifier,
}

impl Default for SpecialMemberInfo {
    fn default() -> Self {
        Self { definition: SpecialMemberDefinition::Trivial, access: AccessSpecifier::Public }
    }
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Empty for unnamed fields.
    pub name: SmolStr,
    pub ty: QualType,
    pub access: AccessSpecifier,
    /// Location of the field's name, used for doc-comment attachment.
    pub loc: SourceLocation,
}

impl FieldDecl {
    pub fn new(name: &str, ty: QualType, access: AccessSpecifier, loc: SourceLocation) -> Self {
        Self { name: SmolStr::new(name), ty, access, loc }
    }
}

#[derive(Debug, Clone)]
pub struct RecordDecl {
    /// `class` vs `struct`; decides the default member access.
    pub is_class: bool,
    pub is_union: bool,
    pub is_complete_definition: bool,
    pub is_invalid: bool,
    /// The implicit `S` re-declared inside `struct S`.
    pub is_injected_class_name: bool,
    /// The pattern record of a class template.
    pub is_described_class_template: bool,
    pub is_template_specialization: bool,
    pub is_effectively_final: bool,
    /// Whether values of this type can be passed in registers (trivial ABI).
    pub can_pass_in_registers: bool,
    pub fields: Vec<FieldDecl>,
    pub copy_constructor: SpecialMemberInfo,
    pub move_constructor: SpecialMemberInfo,
    pub destructor: SpecialMemberInfo,
    /// The defining declaration, if one exists in the translation unit.
    pub definition: Option<DeclId>,
}

impl RecordDecl {
    /// A complete, trivially copyable definition.
    pub fn definition(is_class: bool) -> Self {
        Self {
            is_class,
            is_union: false,
            is_complete_definition: true,
            is_invalid: false,
            is_injected_class_name: false,
            is_described_class_template: false,
            is_template_specialization: false,
            is_effectively_final: false,
            can_pass_in_registers: true,
            fields: Vec::new(),
            copy_constructor: SpecialMemberInfo::default(),
            move_constructor: SpecialMemberInfo::default(),
            destructor: SpecialMemberInfo::default(),
            definition: None,
        }
    }

    pub fn union_definition() -> Self {
        Self { is_union: true, ..Self::definition(false) }
    }

    pub fn forward_declaration(is_class: bool) -> Self {
        Self { is_complete_definition: false, ..Self::definition(is_class) }
    }
}

#[derive(Debug, Clone)]
pub struct TypedefDecl {
    pub underlying_type: QualType,
}

#[derive(Debug)]
pub enum DeclKind {
    /// The root declaration context.
    TranslationUnit,
    Function(FunctionDecl),
    Record(RecordDecl),
    TypedefName(TypedefDecl),
    /// A namespace; children are its member declarations.
    Namespace,
    FunctionTemplate {
        /// The templated function declaration.
        templated: DeclId,
    },
    ClassTemplate,
    Enum,
    Var,
}

/// A declaration in the arena.
#[derive(Debug)]
pub struct Decl {
    pub id: DeclId,
    pub canonical: DeclId,
    pub name: DeclName,
    pub kind: DeclKind,
    /// Lexical parent context; `None` only for the translation unit.
    pub parent: Option<DeclId>,
    pub range: SourceRange,
    /// The declaration's primary location (its name).
    pub loc: SourceLocation,
}

impl Decl {
    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordDecl> {
        match &self.kind {
            DeclKind::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_typedef(&self) -> Option<&TypedefDecl> {
        match &self.kind {
            DeclKind::TypedefName(typedef) => Some(typedef),
            _ => None,
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, DeclKind::Namespace)
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, DeclKind::Record(_))
    }

    pub fn is_function_or_method(&self) -> bool {
        matches!(self.kind, DeclKind::Function(_))
    }
}
