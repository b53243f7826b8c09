//! Conversion of C++ types into mapped types with lifetime annotations.

use rustc_hash::FxHashSet;
use thiserror::Error;

use rivet_ast::{AstContext, BuiltinKind, DeclId, QualType};
use rivet_ir::{LifetimeId, MappedType};
use rivet_lifetimes::TypeLifetimes;

use crate::names::translated_identifier;
use crate::type_map::well_known_type;

/// Payload key under which conversion errors carry the original type
/// spelling, so downstream tooling can recover it.
pub const TYPE_STATUS_PAYLOAD_URL: &str =
    "type.googleapis.com/devtools.rust.cc_interop.rs_binding_from_cc.type";

/// A type that has no mapped representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported type '{spelling}'")]
pub struct ConvertTypeError {
    /// The canonical unqualified spelling of the offending type.
    pub spelling: String,
}

impl ConvertTypeError {
    /// The auxiliary payload: `(key, original spelling)`.
    pub fn payload(&self) -> (&'static str, &str) {
        (TYPE_STATUS_PAYLOAD_URL, &self.spelling)
    }
}

/// Recursive descent from qualified C++ types to mapped types.
///
/// Tag and typedef types only resolve if their declaration has already been
/// imported into `known_type_decls`; the set is keyed by canonical decl ids.
pub struct TypeConverter<'a> {
    pub ctx: &'a AstContext,
    pub known_type_decls: &'a FxHashSet<DeclId>,
}

impl<'a> TypeConverter<'a> {
    /// Converts one type. `lifetimes`, when present, is a stack whose back
    /// holds the lifetime of the outermost pointer/reference position; each
    /// pointer or lvalue reference consumes exactly one entry. An empty
    /// stack at a pointer position is a programmer error.
    pub fn convert(
        &self,
        qual_type: &QualType,
        mut lifetimes: Option<TypeLifetimes>,
        nullable: bool,
    ) -> Result<MappedType, ConvertTypeError> {
        // Qualifiers are handled separately at the end, so the dictionary
        // and the error payload both see the unqualified spelling.
        let type_string = self.ctx.unqualified_type_spelling(qual_type);

        let mut mapped: Option<MappedType> = None;
        if let Some(rs_name) = well_known_type(&type_string) {
            mapped = Some(MappedType::simple(rs_name, type_string.clone()));
        } else if let Some(pointee) = qual_type.ty.as_pointer() {
            let lifetime = Self::consume_lifetime(&mut lifetimes);
            if let Ok(pointee_type) = self.convert(pointee, lifetimes.take(), true) {
                mapped = Some(MappedType::pointer_to(pointee_type, lifetime, nullable));
            }
        } else if let Some(pointee) = qual_type.ty.as_lvalue_reference() {
            let lifetime = Self::consume_lifetime(&mut lifetimes);
            if let Ok(pointee_type) = self.convert(pointee, lifetimes.take(), true) {
                mapped = Some(MappedType::lvalue_reference_to(pointee_type, lifetime));
            }
        } else if let Some(builtin) = qual_type.ty.as_builtin() {
            mapped = self.convert_builtin(builtin, &type_string);
        } else if let Some(tag_decl) = qual_type.ty.as_tag() {
            mapped = self.convert_known_decl(tag_decl);
        } else if let Some(typedef_decl) = qual_type.ty.as_typedef() {
            mapped = self.convert_known_decl(typedef_decl);
        }

        let mut mapped = mapped.ok_or(ConvertTypeError { spelling: type_string })?;

        // Outer const-qualification is carried on the mapped type. Volatile
        // pointers do not exist in Rust, so volatile is ignored.
        mapped.is_const = qual_type.is_const;
        Ok(mapped)
    }

    fn consume_lifetime(lifetimes: &mut Option<TypeLifetimes>) -> Option<LifetimeId> {
        lifetimes.as_mut().map(|stack| {
            let lifetime = stack
                .pop()
                .expect("lifetime stack exhausted at a pointer/reference position");
            LifetimeId(lifetime.id())
        })
    }

    fn convert_builtin(&self, builtin: BuiltinKind, type_string: &str) -> Option<MappedType> {
        match builtin {
            BuiltinKind::Bool => Some(MappedType::simple("bool", "bool")),
            BuiltinKind::Float => Some(MappedType::simple("f32", "float")),
            BuiltinKind::Double => Some(MappedType::simple("f64", "double")),
            BuiltinKind::Void => Some(MappedType::void_()),
            _ if builtin.is_integer() => {
                let size = self.ctx.type_size_bits(builtin);
                if matches!(size, 8 | 16 | 32 | 64) {
                    let sign = if builtin.is_signed_integer() { 'i' } else { 'u' };
                    Some(MappedType::simple(format!("{sign}{size}"), type_string))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn convert_known_decl(&self, decl: DeclId) -> Option<MappedType> {
        let canonical = self.ctx.canonical(decl);
        if !self.known_type_decls.contains(&canonical) {
            return None;
        }
        let identifier = translated_identifier(self.ctx, decl)?;
        let decl_id = rivet_ir::DeclId(canonical.0);
        Some(MappedType::with_decl_ids(
            identifier.identifier.clone(),
            decl_id,
            identifier.identifier,
            decl_id,
        ))
    }
}
