//! Record layout computation (Itanium C++ ABI, x86-64).

use crate::context::AstContext;
use crate::decl::DeclId;
use crate::types::{QualType, Type};

/// Size, alignment and per-field offsets of a complete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub size_bytes: u64,
    pub alignment_bytes: u64,
    /// One entry per field, in declaration order, in bits.
    pub field_offsets_bits: Vec<u64>,
}

impl AstContext {
    /// Lays the record out with natural alignment and tail padding. The
    /// record must have a complete definition somewhere in the unit.
    pub fn record_layout(&self, record: DeclId) -> RecordLayout {
        let payload = self.record_of(record);
        let payload = if payload.is_complete_definition {
            payload
        } else {
            let definition = payload
                .definition
                .expect("record layout requested for an incomplete record");
            self.record_of(definition)
        };

        let mut offset = 0u64;
        let mut alignment = 1u64;
        let mut field_offsets_bits = Vec::with_capacity(payload.fields.len());
        for field in &payload.fields {
            let field_align = self.type_alignment_bytes(&field.ty);
            let field_size = self.type_size_bytes(&field.ty);
            offset = round_up(offset, field_align);
            field_offsets_bits.push(offset * 8);
            offset += field_size;
            alignment = alignment.max(field_align);
        }

        // Empty records still occupy one byte.
        let size_bytes = round_up(offset, alignment).max(1);
        RecordLayout { size_bytes, alignment_bytes: alignment, field_offsets_bits }
    }

    pub fn type_size_bytes(&self, ty: &QualType) -> u64 {
        match &*ty.ty {
            Type::Builtin(kind) => kind.size_bits() / 8,
            Type::Pointer(_) | Type::LValueReference(_) | Type::RValueReference(_) => 8,
            Type::Tag(decl) => self.record_layout(self.canonical(*decl)).size_bytes,
            Type::Typedef(decl) => {
                let underlying = self
                    .decl(*decl)
                    .as_typedef()
                    .expect("typedef type must reference a typedef declaration")
                    .underlying_type
                    .clone();
                self.type_size_bytes(&underlying)
            }
        }
    }

    pub fn type_alignment_bytes(&self, ty: &QualType) -> u64 {
        match &*ty.ty {
            Type::Builtin(kind) => (kind.size_bits() / 8).max(1),
            Type::Pointer(_) | Type::LValueReference(_) | Type::RValueReference(_) => 8,
            Type::Tag(decl) => self.record_layout(self.canonical(*decl)).alignment_bytes,
            Type::Typedef(decl) => {
                let underlying = self
                    .decl(*decl)
                    .as_typedef()
                    .expect("typedef type must reference a typedef declaration")
                    .underlying_type
                    .clone();
                self.type_alignment_bytes(&underlying)
            }
        }
    }
}

fn round_up(value: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{AccessSpecifier, DeclKind, DeclName, FieldDecl, RecordDecl};
    use crate::source::{SourceLocation, SourceRange};
    use crate::types::BuiltinKind;

    fn field(name: &str, ty: QualType) -> FieldDecl {
        FieldDecl::new(name, ty, AccessSpecifier::None, SourceLocation::invalid())
    }

    #[test]
    fn char_after_int_pads_to_int_alignment() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let int = ctx.builtin(BuiltinKind::Int);
        let ch = ctx.builtin(BuiltinKind::Char);
        ctx.set_record_fields(rec, vec![field("a", int), field("b", ch)]);
        let layout = ctx.record_layout(rec);
        assert_eq!(layout.size_bytes, 8);
        assert_eq!(layout.alignment_bytes, 4);
        assert_eq!(layout.field_offsets_bits, vec![0, 32]);
    }

    #[test]
    fn char_before_int_inserts_padding() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let int = ctx.builtin(BuiltinKind::Int);
        let ch = ctx.builtin(BuiltinKind::Char);
        ctx.set_record_fields(rec, vec![field("a", ch), field("b", int)]);
        let layout = ctx.record_layout(rec);
        assert_eq!(layout.field_offsets_bits, vec![0, 32]);
        assert_eq!(layout.size_bytes, 8);
    }

    #[test]
    fn empty_record_occupies_one_byte() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("Empty"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let layout = ctx.record_layout(rec);
        assert_eq!(layout.size_bytes, 1);
        assert_eq!(layout.alignment_bytes, 1);
    }

    #[test]
    fn pointer_fields_are_word_sized() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("Node"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let int = ctx.builtin(BuiltinKind::Int);
        let next = ctx.pointer_to(ctx.tag_type(rec));
        ctx.set_record_fields(rec, vec![field("value", int), field("next", next)]);
        let layout = ctx.record_layout(rec);
        assert_eq!(layout.size_bytes, 16);
        assert_eq!(layout.alignment_bytes, 8);
        assert_eq!(layout.field_offsets_bits, vec![0, 64]);
    }

    #[test]
    fn nested_record_fields_use_the_inner_layout() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let inner = ctx.add_decl(
            tu,
            DeclName::ident("Inner"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let long = ctx.builtin(BuiltinKind::Long);
        ctx.set_record_fields(inner, vec![field("l", long)]);

        let outer = ctx.add_decl(
            tu,
            DeclName::ident("Outer"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let ch = ctx.builtin(BuiltinKind::Char);
        let inner_ty = ctx.tag_type(inner);
        ctx.set_record_fields(outer, vec![field("c", ch), field("i", inner_ty)]);
        let layout = ctx.record_layout(outer);
        assert_eq!(layout.field_offsets_bits, vec![0, 64]);
        assert_eq!(layout.size_bytes, 16);
        assert_eq!(layout.alignment_bytes, 8);
    }
}
