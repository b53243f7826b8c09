//! Name services: translated identifiers and mangled names.

use rivet_ast::{
    AstContext, CtorKind, DeclId, DeclName, DtorKind, FieldDecl, GlobalDecl, MethodKind, ParamDecl,
};
use rivet_ir::{Identifier, UnqualifiedIdentifier};

/// The name a declaration gets on the Rust side.
///
/// Constructors and destructors map to their special-name variants. All
/// other special name kinds (operators, conversion functions, literal
/// operators, deduction guides) yield `None` and make the caller skip the
/// declaration.
pub fn translated_name(ctx: &AstContext, decl: DeclId) -> Option<UnqualifiedIdentifier> {
    match &ctx.decl(decl).name {
        DeclName::Identifier(name) if !name.is_empty() => {
            Some(UnqualifiedIdentifier::Identifier(Identifier::new(name.as_str())))
        }
        DeclName::Identifier(_) => None,
        DeclName::Constructor => Some(UnqualifiedIdentifier::Constructor),
        DeclName::Destructor => Some(UnqualifiedIdentifier::Destructor),
        DeclName::Operator(_) | DeclName::Conversion => None,
    }
}

/// The plain-identifier form, for declarations that can only carry one
/// (records, typedefs).
pub fn translated_identifier(ctx: &AstContext, decl: DeclId) -> Option<Identifier> {
    match translated_name(ctx, decl)? {
        UnqualifiedIdentifier::Identifier(identifier) => Some(identifier),
        _ => None,
    }
}

/// Parameter names always translate: unnamed parameters get a positional
/// `__param_<N>` synthetic name.
pub fn translated_param_identifier(param: &ParamDecl, position: usize) -> Identifier {
    if param.name.is_empty() {
        Identifier::new(format!("__param_{position}"))
    } else {
        Identifier::new(param.name.as_str())
    }
}

/// Field names have no synthetic fallback; an unnamed field is untranslatable.
pub fn translated_field_identifier(field: &FieldDecl) -> Option<Identifier> {
    (!field.name.is_empty()).then(|| Identifier::new(field.name.as_str()))
}

/// The linker symbol for a function.
///
/// Constructors and destructors are always mangled as their complete-object
/// variants; the base-subobject, deleting and comdat symbols are never
/// referenced by generated bindings.
pub fn mangled_name(ctx: &AstContext, decl: DeclId) -> String {
    let func = ctx.decl(decl).as_function().expect("mangled names are only needed for functions");
    let global = match func.method.as_ref().map(|m| m.kind) {
        Some(MethodKind::Constructor(_)) => GlobalDecl::Constructor(decl, CtorKind::Complete),
        Some(MethodKind::Destructor) => GlobalDecl::Destructor(decl, DtorKind::Complete),
        _ => GlobalDecl::Function(decl),
    };
    ctx.mangler().mangle(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivet_ast::{
        BuiltinKind, DeclKind, FunctionDecl, MethodInfo, QualType, RecordDecl, SourceRange,
    };

    fn int_fn(ctx: &AstContext) -> FunctionDecl {
        FunctionDecl::new(ctx.builtin(BuiltinKind::Int))
    }

    #[test]
    fn plain_identifiers_translate_verbatim() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let func = ctx.add_decl(
            tu,
            DeclName::ident("return_value"),
            DeclKind::Function(int_fn(&ctx)),
            SourceRange::default(),
        );
        assert_eq!(
            translated_name(&ctx, func),
            Some(UnqualifiedIdentifier::Identifier(Identifier::new("return_value")))
        );
    }

    #[test]
    fn operators_and_conversions_do_not_translate() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let op = ctx.add_decl(
            tu,
            DeclName::Operator("==".into()),
            DeclKind::Function(int_fn(&ctx)),
            SourceRange::default(),
        );
        assert_eq!(translated_name(&ctx, op), None);
        let conv = ctx.add_decl(
            tu,
            DeclName::Conversion,
            DeclKind::Function(int_fn(&ctx)),
            SourceRange::default(),
        );
        assert_eq!(translated_name(&ctx, conv), None);
    }

    #[test]
    fn special_member_names() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let mut info = MethodInfo::instance(rec);
        info.kind = MethodKind::Constructor(Default::default());
        let ctor = ctx.add_decl(
            rec,
            DeclName::Constructor,
            DeclKind::Function(int_fn(&ctx).with_method(info)),
            SourceRange::default(),
        );
        assert_eq!(translated_name(&ctx, ctor), Some(UnqualifiedIdentifier::Constructor));
        assert_eq!(translated_identifier(&ctx, ctor), None);
    }

    #[test]
    fn unnamed_parameters_get_positional_names() {
        let ctx = AstContext::new();
        let int: QualType = ctx.builtin(BuiltinKind::Int);
        let named = ParamDecl::new("p1", int.clone());
        let unnamed = ParamDecl::unnamed(int);
        assert_eq!(translated_param_identifier(&named, 0), Identifier::new("p1"));
        assert_eq!(translated_param_identifier(&unnamed, 2), Identifier::new("__param_2"));
    }

    #[test]
    fn mangled_names_use_complete_object_variants() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let mut info = MethodInfo::instance(rec);
        info.kind = MethodKind::Constructor(Default::default());
        let void = ctx.builtin(BuiltinKind::Void);
        let ctor = ctx.add_decl(
            rec,
            DeclName::Constructor,
            DeclKind::Function(FunctionDecl::new(void.clone()).with_method(info)),
            SourceRange::default(),
        );
        assert_eq!(mangled_name(&ctx, ctor), "_ZN1SC1Ev");
        let mut dtor_info = MethodInfo::instance(rec);
        dtor_info.kind = MethodKind::Destructor;
        let dtor = ctx.add_decl(
            rec,
            DeclName::Destructor,
            DeclKind::Function(FunctionDecl::new(void).with_method(dtor_info)),
            SourceRange::default(),
        );
        assert_eq!(mangled_name(&ctx, dtor), "_ZN1SD1Ev");
    }
}
