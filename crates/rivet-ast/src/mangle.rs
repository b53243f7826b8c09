//! Itanium-style name mangling.
//!
//! Constructors and destructors have several global-declaration variants
//! because one source-level declaration produces more than one symbol. The
//! importer only ever asks for the `Complete` variants; the others exist so
//! the encoding table is honest about the ABI.

use std::fmt::Write as _;

use crate::context::AstContext;
use crate::decl::{Decl, DeclId, MethodInfo};
use crate::types::{BuiltinKind, QualType, Type};

/// Which constructor symbol is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtorKind {
    /// Constructs the whole object, virtual bases included.
    Complete,
    /// Constructs the object excluding virtual base subobjects.
    Base,
    Comdat,
}

/// Which destructor symbol is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtorKind {
    /// Destroys the whole object and calls `operator delete`.
    Deleting,
    /// Destroys the whole object, virtual bases included.
    Complete,
    /// Destroys the object excluding virtual base subobjects.
    Base,
    Comdat,
}

/// A declaration plus the symbol variant to mangle.
#[derive(Debug, Clone, Copy)]
pub enum GlobalDecl {
    Function(DeclId),
    Constructor(DeclId, CtorKind),
    Destructor(DeclId, DtorKind),
}

/// Mangles names against a context.
pub struct NameMangler<'ctx> {
    ctx: &'ctx AstContext,
}

impl AstContext {
    pub fn mangler(&self) -> NameMangler<'_> {
        NameMangler { ctx: self }
    }
}

impl<'ctx> NameMangler<'ctx> {
    pub fn mangle(&self, decl: GlobalDecl) -> String {
        let (id, structor) = match decl {
            GlobalDecl::Function(id) => (id, None),
            GlobalDecl::Constructor(id, kind) => (id, Some(ctor_code(kind))),
            GlobalDecl::Destructor(id, kind) => (id, Some(dtor_code(kind))),
        };
        let decl = self.ctx.decl(id);
        let func = decl.as_function().expect("mangling a non-function decl");

        let mut out = String::from("_Z");
        self.mangle_entity_name(decl, func.method.as_ref(), structor, &mut out);
        if func.params.is_empty() {
            out.push('v');
        } else {
            for param in &func.params {
                self.mangle_type(&param.ty, &mut out);
            }
        }
        out
    }

    fn mangle_entity_name(
        &self,
        decl: &Decl,
        method: Option<&MethodInfo>,
        structor: Option<&'static str>,
        out: &mut String,
    ) {
        let prefix = self.named_ancestors(decl);
        let unqualified = match structor {
            Some(code) => code.to_string(),
            None => {
                let name = decl
                    .name
                    .as_identifier()
                    .expect("mangling a declaration without a plain identifier");
                source_name(name)
            }
        };

        if prefix.is_empty() {
            out.push_str(&unqualified);
        } else {
            out.push('N');
            if method.is_some_and(|m| m.is_const) {
                out.push('K');
            }
            for segment in prefix {
                out.push_str(&source_name(&segment));
            }
            out.push_str(&unqualified);
            out.push('E');
        }
    }

    fn named_ancestors(&self, decl: &Decl) -> Vec<String> {
        let mut segments = Vec::new();
        let mut cursor = decl.parent;
        while let Some(parent_id) = cursor {
            let parent = self.ctx.decl(parent_id);
            if let Some(name) = parent.name.as_identifier() {
                segments.push(name.to_string());
            }
            cursor = parent.parent;
        }
        segments.reverse();
        segments
    }

    fn mangle_type(&self, ty: &QualType, out: &mut String) {
        match &*ty.ty {
            Type::Builtin(kind) => out.push_str(builtin_code(*kind)),
            Type::Pointer(pointee) => {
                out.push('P');
                self.mangle_pointee(pointee, out);
            }
            Type::LValueReference(pointee) => {
                out.push('R');
                self.mangle_pointee(pointee, out);
            }
            Type::RValueReference(pointee) => {
                out.push('O');
                self.mangle_pointee(pointee, out);
            }
            Type::Tag(decl) => self.mangle_named_type(*decl, out),
            // The canonical type is mangled, so typedefs desugar.
            Type::Typedef(decl) => {
                let underlying = self
                    .ctx
                    .decl(*decl)
                    .as_typedef()
                    .expect("typedef type must reference a typedef declaration")
                    .underlying_type
                    .clone();
                self.mangle_type(&underlying, out);
            }
        }
    }

    fn mangle_pointee(&self, pointee: &QualType, out: &mut String) {
        if pointee.is_const {
            out.push('K');
        }
        self.mangle_type(pointee, out);
    }

    fn mangle_named_type(&self, id: DeclId, out: &mut String) {
        let decl = self.ctx.decl(id);
        let prefix = self.named_ancestors(decl);
        let name = decl.name.as_identifier().unwrap_or("");
        if prefix.is_empty() {
            out.push_str(&source_name(name));
        } else {
            out.push('N');
            for segment in prefix {
                out.push_str(&source_name(&segment));
            }
            out.push_str(&source_name(name));
            out.push('E');
        }
    }
}

fn source_name(name: &str) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}{}", name.len(), name);
    out
}

fn ctor_code(kind: CtorKind) -> &'static str {
    match kind {
        CtorKind::Complete => "C1",
        CtorKind::Base => "C2",
        CtorKind::Comdat => "C5",
    }
}

fn dtor_code(kind: DtorKind) -> &'static str {
    match kind {
        DtorKind::Deleting => "D0",
        DtorKind::Complete => "D1",
        DtorKind::Base => "D2",
        DtorKind::Comdat => "D5",
    }
}

fn builtin_code(kind: BuiltinKind) -> &'static str {
    match kind {
        BuiltinKind::Void => "v",
        BuiltinKind::Bool => "b",
        BuiltinKind::Char => "c",
        BuiltinKind::SChar => "a",
        BuiltinKind::UChar => "h",
        BuiltinKind::Short => "s",
        BuiltinKind::UShort => "t",
        BuiltinKind::Int => "i",
        BuiltinKind::UInt => "j",
        BuiltinKind::Long => "l",
        BuiltinKind::ULong => "m",
        BuiltinKind::LongLong => "x",
        BuiltinKind::ULongLong => "y",
        BuiltinKind::Float => "f",
        BuiltinKind::Double => "d",
        BuiltinKind::WChar => "w",
        BuiltinKind::Char16 => "Ds",
        BuiltinKind::Char32 => "Di",
        BuiltinKind::Int128 => "n",
    }
}
