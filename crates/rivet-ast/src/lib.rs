//! C++ translation-unit model for the rivet importer.
//!
//! This crate provides:
//! - a declaration arena with contexts, canonical ids and source ranges
//! - qualified types with thin sugar (typedefs are not desugared implicitly)
//! - a source manager with an include graph and translation-unit ordering
//! - raw comments with doc-comment attachment
//! - record layout computation and Itanium-style name mangling
//! - the `Sema` facade for forcing implicit special members
//!
//! The driver that would populate a context from real C++ source is a
//! separate concern; tests and tools build contexts through the
//! [`AstContext`] API directly.

mod comments;
mod context;
mod decl;
mod layout;
mod mangle;
mod sema;
mod source;
mod types;

pub use comments::RawComment;
pub use context::AstContext;
pub use decl::{
    AccessSpecifier, CtorInfo, Decl, DeclId, DeclKind, DeclName, FieldDecl, FunctionDecl,
    MethodInfo, MethodKind, ParamDecl, RecordDecl, RefQualifier, SpecialMemberDefinition,
    SpecialMemberInfo, TypedefDecl,
};
pub use layout::RecordLayout;
pub use mangle::{CtorKind, DtorKind, GlobalDecl, NameMangler};
pub use sema::Sema;
pub use source::{FileId, FileKind, SourceLocation, SourceManager, SourceRange};
pub use types::{BuiltinKind, QualType, Type};
