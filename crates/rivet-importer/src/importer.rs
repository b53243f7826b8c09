//! The import driver and per-kind declaration importers.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use rivet_ast::{
    AstContext, Decl, DeclId, DeclKind, MethodKind, RawComment, RefQualifier, SourceRange,
};
use rivet_ir::{
    AccessSpecifier, Comment, Field, Func, FuncParam, HeaderName, Identifier,
    InstanceMethodMetadata, Item, Label, LifetimeName, MemberFuncMetadata, Record,
    ReferenceQualification, SpecialMemberFunc, TypeAlias, UnsupportedItem, IR,
};
use rivet_lifetimes::{
    get_lifetime_annotations, Lifetime, LifetimeContext, LifetimeSymbolTable,
};
use thiserror::Error;

use crate::convert::TypeConverter;
use crate::location::convert_source_location;
use crate::names::{
    mangled_name, translated_field_identifier, translated_identifier, translated_name,
    translated_param_identifier,
};
use crate::target::TargetResolver;
use crate::type_map::well_known_type;

/// Configuration for one import: the target bindings are generated for, its
/// entry headers, and the header-to-target ownership map.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub current_target: Label,
    pub entry_headers: Vec<HeaderName>,
    pub header_targets: FxHashMap<HeaderName, Label>,
}

impl Invocation {
    pub fn new(
        current_target: Label,
        entry_headers: Vec<HeaderName>,
        header_targets: FxHashMap<HeaderName, Label>,
    ) -> Self {
        Self { current_target, entry_headers, header_targets }
    }

    pub fn header_target(&self, header: &HeaderName) -> Option<&Label> {
        self.header_targets.get(header)
    }
}

/// The memoized outcome of importing one declaration.
#[derive(Debug, Clone, Default)]
pub enum LookupResult {
    Item(Item),
    Errors(Vec<String>),
    /// Nothing to emit; the declaration is silently skipped.
    #[default]
    Skip,
}

impl LookupResult {
    fn item(&self) -> Option<&Item> {
        match self {
            LookupResult::Item(item) => Some(item),
            _ => None,
        }
    }

    fn errors(&self) -> &[String] {
        match self {
            LookupResult::Errors(errors) => errors,
            _ => &[],
        }
    }
}

impl From<Func> for LookupResult {
    fn from(func: Func) -> Self {
        LookupResult::Item(func.into())
    }
}

impl From<Record> for LookupResult {
    fn from(record: Record) -> Self {
        LookupResult::Item(record.into())
    }
}

impl From<TypeAlias> for LookupResult {
    fn from(type_alias: TypeAlias) -> Self {
        LookupResult::Item(type_alias.into())
    }
}

impl From<Comment> for LookupResult {
    fn from(comment: Comment) -> Self {
        LookupResult::Item(comment.into())
    }
}

impl From<&str> for LookupResult {
    fn from(error: &str) -> Self {
        LookupResult::Errors(vec![error.to_string()])
    }
}

impl From<String> for LookupResult {
    fn from(error: String) -> Self {
        LookupResult::Errors(vec![error])
    }
}

/// Why a record's fields could not be imported. The record importer reports
/// the generic "Importing field failed"; the specific cause stays internal.
#[derive(Debug, Error)]
enum FieldImportError {
    #[error("Field type '{0}' is not supported")]
    UnsupportedType(String),
    #[error("Cannot translate name for field '{0}'")]
    UntranslatableName(String),
}

/// Imports every declaration of a translation unit and assembles the IR.
pub fn import_translation_unit(
    invocation: &Invocation,
    ctx: &AstContext,
    lifetime_ctx: &LifetimeContext,
) -> IR {
    let mut importer = Importer::new(invocation, ctx, lifetime_ctx);
    importer.import()
}

/// Walks declarations, memoizes per-decl results, and owns the set of type
/// declarations that later type references may resolve against. All state
/// lives for one import call.
pub struct Importer<'tu> {
    invocation: &'tu Invocation,
    ctx: &'tu AstContext,
    lifetime_ctx: &'tu LifetimeContext,
    lookup_cache: FxHashMap<DeclId, LookupResult>,
    known_type_decls: FxHashSet<DeclId>,
}

impl<'tu> Importer<'tu> {
    pub fn new(
        invocation: &'tu Invocation,
        ctx: &'tu AstContext,
        lifetime_ctx: &'tu LifetimeContext,
    ) -> Self {
        Self {
            invocation,
            ctx,
            lifetime_ctx,
            lookup_cache: FxHashMap::default(),
            known_type_decls: FxHashSet::default(),
        }
    }

    pub fn import(&mut self) -> IR {
        debug!(current_target = %self.invocation.current_target.0, "importing translation unit");
        self.import_decls_from_decl_context(self.ctx.translation_unit());

        // IR items are emitted in the order of the decls they were generated
        // for; decls that emit multiple items use a stable secondary order.
        type OrderedItem = (SourceRange, i32, Item);
        let mut items: Vec<OrderedItem> = Vec::new();

        let mut cached: Vec<(DeclId, &LookupResult)> =
            self.lookup_cache.iter().map(|(id, result)| (*id, result)).collect();
        cached.sort_by_key(|(id, _)| *id);

        for (decl_id, result) in &cached {
            let decl = self.ctx.decl(*decl_id);
            let local_order = local_order(self.ctx, decl);

            if let Some(item) = result.item() {
                if self.is_from_current_target(decl) {
                    items.push((decl.range, local_order, item.clone()));
                }
            }
            if self.is_from_current_target(decl) {
                for error in result.errors() {
                    items.push((
                        decl.range,
                        local_order,
                        UnsupportedItem {
                            name: self.unsupported_name(decl),
                            message: error.clone(),
                            source_loc: convert_source_location(self.ctx, decl.range.begin),
                        }
                        .into(),
                    ));
                }
            }
        }

        for comment in self.import_free_comments() {
            items.push((
                comment.range,
                0,
                Comment { text: comment.formatted_text() }.into(),
            ));
        }

        let sm = &self.ctx.source_manager;
        items.sort_by(|a, b| {
            use std::cmp::Ordering;
            let (a_range, b_range) = (a.0, b.0);
            if a_range.is_valid() != b_range.is_valid() {
                // The invalid range sorts first.
                return if a_range.is_valid() { Ordering::Greater } else { Ordering::Less };
            }
            if a_range.is_valid() {
                let begin = sm.order_key(a_range.begin).cmp(&sm.order_key(b_range.begin));
                if begin != Ordering::Equal {
                    return begin;
                }
                let end = sm.order_key(a_range.end).cmp(&sm.order_key(b_range.end));
                if end != Ordering::Equal {
                    return end;
                }
            }
            a.1.cmp(&b.1)
        });

        let ir = IR {
            used_headers: self.invocation.entry_headers.clone(),
            current_target: self.invocation.current_target.clone(),
            items: items.into_iter().map(|(_, _, item)| item).collect(),
        };
        debug!(items = ir.items.len(), "import finished");
        ir
    }

    fn import_decls_from_decl_context(&mut self, context: DeclId) {
        for &decl in self.ctx.decls_of(context) {
            self.lookup_decl(self.ctx.canonical(decl));

            // Recurse into namespaces for discovery only; their members are
            // rejected at import time.
            if self.ctx.decl(decl).is_namespace() {
                self.import_decls_from_decl_context(decl);
            }
        }
    }

    fn lookup_decl(&mut self, decl: DeclId) -> LookupResult {
        if !self.lookup_cache.contains_key(&decl) {
            let result = self.import_decl(decl);
            self.lookup_cache.insert(decl, result);
        }
        self.lookup_cache[&decl].clone()
    }

    fn import_decl(&mut self, decl_id: DeclId) -> LookupResult {
        let decl = self.ctx.decl(decl_id);
        if decl.parent.is_some_and(|parent| self.ctx.decl(parent).is_namespace()) {
            return "Items contained in namespaces are not supported yet".into();
        }

        match &decl.kind {
            DeclKind::Function(_) => self.import_function(decl_id),
            DeclKind::FunctionTemplate { templated } => self.import_function(*templated),
            DeclKind::Record(_) => {
                let result = self.import_record(decl_id);
                // Visit nested decls even when the record itself failed, so
                // they still produce error messages.
                self.import_decls_from_decl_context(decl_id);
                result
            }
            DeclKind::TypedefName(_) => self.import_typedef_name(decl_id),
            DeclKind::ClassTemplate => "Class templates are not supported yet".into(),
            _ => LookupResult::Skip,
        }
    }

    fn import_function(&mut self, func_id: DeclId) -> LookupResult {
        let decl = self.ctx.decl(func_id);
        let func = decl.as_function().expect("import_function on a non-function decl");
        if !self.is_from_current_target(decl) {
            return LookupResult::Skip;
        }
        if func.is_deleted {
            return LookupResult::Skip;
        }
        if func.is_templated {
            return "Function templates are not supported yet".into();
        }

        let mut symbol_table = LifetimeSymbolTable::new();
        let lifetimes =
            get_lifetime_annotations(func_id, self.ctx, self.lifetime_ctx, &mut symbol_table)
                .ok();
        let mut all_lifetimes: FxHashSet<Lifetime> = FxHashSet::default();

        let mut params: Vec<FuncParam> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        if let Some(method) = &func.method {
            if !self.known_type_decls.contains(&self.ctx.canonical(method.parent)) {
                return "Couldn't import the parent".into();
            }

            // Non-static member functions receive an implicit `this`.
            if method.is_instance {
                let this_lifetimes = lifetimes.as_ref().map(|l| {
                    let this = l
                        .this_lifetimes
                        .clone()
                        .expect("instance methods always carry `this` lifetimes");
                    all_lifetimes.extend(this.iter().copied());
                    this
                });
                match self.converter().convert(
                    &self.ctx.this_type(func_id),
                    this_lifetimes,
                    false,
                ) {
                    Ok(param_type) => params
                        .push(FuncParam { type_: param_type, identifier: Identifier::new("__this") }),
                    Err(error) => errors.push(error.to_string()),
                }
            }
        }

        if let Some(lifetimes) = &lifetimes {
            assert_eq!(
                lifetimes.param_lifetimes.len(),
                func.params.len(),
                "lifetime annotations disagree with the parameter count"
            );
        }
        for (position, param) in func.params.iter().enumerate() {
            let param_lifetimes = lifetimes.as_ref().map(|l| {
                let param_lifetimes = l.param_lifetimes[position].clone();
                all_lifetimes.extend(param_lifetimes.iter().copied());
                param_lifetimes
            });
            let param_type = match self.converter().convert(&param.ty, param_lifetimes, true) {
                Ok(param_type) => param_type,
                Err(_) => {
                    errors.push(format!(
                        "Parameter type '{}' is not supported",
                        self.ctx.type_spelling(&param.ty)
                    ));
                    continue;
                }
            };

            // Non-trivial-ABI aggregates have a different by-value
            // representation, which is not supported.
            if self.is_nontrivial_abi_record(&param.ty) {
                errors.push(format!(
                    "Non-trivial_abi type '{}' is not supported by value as a parameter",
                    self.ctx.type_spelling(&param.ty)
                ));
            }

            params.push(FuncParam {
                type_: param_type,
                identifier: translated_param_identifier(param, position),
            });
        }

        if self.is_nontrivial_abi_record(&func.return_type) {
            errors.push(format!(
                "Non-trivial_abi type '{}' is not supported by value as a return type",
                self.ctx.type_spelling(&func.return_type)
            ));
        }

        let return_lifetimes = lifetimes.as_ref().map(|l| {
            all_lifetimes.extend(l.return_lifetimes.iter().copied());
            l.return_lifetimes.clone()
        });
        let return_type =
            match self.converter().convert(&func.return_type, return_lifetimes, true) {
                Ok(return_type) => Some(return_type),
                Err(_) => {
                    errors.push(format!(
                        "Return type '{}' is not supported",
                        self.ctx.type_spelling(&func.return_type)
                    ));
                    None
                }
            };

        let mut lifetime_params: Vec<LifetimeName> = all_lifetimes
            .iter()
            .map(|lifetime| LifetimeName {
                name: symbol_table
                    .lookup_name(*lifetime)
                    .expect("every consumed lifetime has a name")
                    .to_string(),
                id: rivet_ir::LifetimeId(lifetime.id()),
            })
            .collect();
        lifetime_params.sort_by(|a, b| a.name.cmp(&b.name));

        let mut member_func_metadata = None;
        if let Some(method) = &func.method {
            match method.access {
                rivet_ast::AccessSpecifier::Public => {}
                // Private methods (and protected ones, for now) do not
                // appear in the IR at all.
                rivet_ast::AccessSpecifier::Protected
                | rivet_ast::AccessSpecifier::Private
                | rivet_ast::AccessSpecifier::None => return LookupResult::Skip,
            }
            let instance_method_metadata = method.is_instance.then(|| InstanceMethodMetadata {
                reference: match method.ref_qualifier {
                    RefQualifier::LValue => ReferenceQualification::LValue,
                    RefQualifier::RValue => ReferenceQualification::RValue,
                    RefQualifier::None => ReferenceQualification::Unqualified,
                },
                is_const: method.is_const,
                is_virtual: method.is_virtual,
                is_explicit_ctor: matches!(
                    method.kind,
                    MethodKind::Constructor(info) if info.is_explicit
                ),
            });
            member_func_metadata = Some(MemberFuncMetadata {
                record_id: generate_decl_id(self.ctx, method.parent),
                instance_method_metadata,
            });
        }

        if !errors.is_empty() {
            return LookupResult::Errors(errors);
        }

        let Some(name) = translated_name(self.ctx, func_id) else {
            return LookupResult::Skip;
        };
        let return_type =
            return_type.expect("a missing return type would have produced an error");
        Func {
            name,
            owning_target: self.owning_target(decl),
            doc_comment: self.get_comment(self.ctx.raw_comment_for_decl(func_id)),
            mangled_name: mangled_name(self.ctx, func_id),
            return_type,
            params,
            lifetime_params,
            is_inline: func.is_inline,
            member_func_metadata,
            source_loc: convert_source_location(self.ctx, decl.range.begin),
        }
        .into()
    }

    fn import_record(&mut self, record_id: DeclId) -> LookupResult {
        let decl = self.ctx.decl(record_id);
        let record = decl.as_record().expect("import_record on a non-record decl");
        let parent = decl.parent.map(|parent| self.ctx.decl(parent));
        if parent.is_some_and(Decl::is_function_or_method) {
            return LookupResult::Skip;
        }
        if record.is_injected_class_name {
            return LookupResult::Skip;
        }
        if parent.is_some_and(Decl::is_record) {
            return "Nested classes are not supported yet".into();
        }
        if record.is_union {
            return "Unions are not supported yet".into();
        }

        // Resolve to the definition so the record layout can be computed.
        let Some(definition_id) = record.definition else {
            return LookupResult::Skip;
        };
        let definition = self.ctx.decl(definition_id);
        let record = definition.as_record().expect("record definition is not a record");
        if record.is_invalid || !record.is_complete_definition {
            return LookupResult::Skip;
        }
        if record.is_described_class_template || record.is_template_specialization {
            return "Class templates are not supported yet".into();
        }

        self.ctx.sema.force_declaration_of_implicit_members(definition_id);
        let default_access = if record.is_class {
            rivet_ast::AccessSpecifier::Private
        } else {
            rivet_ast::AccessSpecifier::Public
        };
        let is_final = record.is_effectively_final;

        let Some(identifier) = translated_identifier(self.ctx, definition_id) else {
            return LookupResult::Skip;
        };

        // Provisionally assume the record is known so fields whose type
        // mentions the record itself resolve; withdraw on failure.
        let canonical = self.ctx.canonical(definition_id);
        self.known_type_decls.insert(canonical);
        let fields = match self.import_fields(definition_id, default_access) {
            Ok(fields) => fields,
            Err(_) => {
                self.known_type_decls.remove(&canonical);
                return "Importing field failed".into();
            }
        };

        let layout = self.ctx.record_layout(definition_id);
        Record {
            identifier,
            id: generate_decl_id(self.ctx, definition_id),
            owning_target: self.owning_target(definition),
            doc_comment: self.get_comment(self.ctx.raw_comment_for_decl(definition_id)),
            fields,
            size: layout.size_bytes,
            alignment: layout.alignment_bytes,
            copy_constructor: translate_special_member(&record.copy_constructor),
            move_constructor: translate_special_member(&record.move_constructor),
            destructor: translate_special_member(&record.destructor),
            is_trivial_abi: record.can_pass_in_registers,
            is_final,
        }
        .into()
    }

    fn import_fields(
        &self,
        record_id: DeclId,
        default_access: rivet_ast::AccessSpecifier,
    ) -> Result<Vec<Field>, FieldImportError> {
        let record = self.ctx.record_of(record_id);
        let layout = self.ctx.record_layout(record_id);
        let mut fields = Vec::with_capacity(record.fields.len());
        for (index, field) in record.fields.iter().enumerate() {
            let type_ = self
                .converter()
                .convert(&field.ty, None, true)
                .map_err(|_| {
                    FieldImportError::UnsupportedType(self.ctx.type_spelling(&field.ty))
                })?;
            let access = if field.access == rivet_ast::AccessSpecifier::None {
                default_access
            } else {
                field.access
            };
            let identifier = translated_field_identifier(field).ok_or_else(|| {
                FieldImportError::UntranslatableName(field.name.to_string())
            })?;
            fields.push(Field {
                identifier,
                doc_comment: self.get_comment(self.ctx.raw_comment_before(field.loc)),
                type_,
                access: translate_access_specifier(access),
                offset: layout.field_offsets_bits[index],
            });
        }
        Ok(fields)
    }

    fn import_typedef_name(&mut self, typedef_id: DeclId) -> LookupResult {
        let decl = self.ctx.decl(typedef_id);
        let parent = decl.parent.map(|parent| self.ctx.decl(parent));
        if parent.is_some_and(Decl::is_function_or_method) {
            return LookupResult::Skip;
        }
        if parent.is_some_and(Decl::is_record) {
            return "Typedefs nested in classes are not supported yet".into();
        }

        // A user alias spelling a well-known type is pre-empted by the
        // canonical mapping.
        let typedef_type = self.ctx.typedef_type(typedef_id);
        if well_known_type(&self.ctx.unqualified_type_spelling(&typedef_type)).is_some() {
            return LookupResult::Skip;
        }

        let Some(identifier) = translated_identifier(self.ctx, typedef_id) else {
            panic!("couldn't get identifier for typedef-name declaration");
        };
        let typedef = decl.as_typedef().expect("import_typedef_name on a non-typedef decl");
        match self.converter().convert(&typedef.underlying_type, None, true) {
            Ok(underlying_type) => {
                self.known_type_decls.insert(self.ctx.canonical(typedef_id));
                TypeAlias {
                    identifier,
                    id: generate_decl_id(self.ctx, typedef_id),
                    owning_target: self.owning_target(decl),
                    underlying_type,
                }
                .into()
            }
            Err(error) => error.to_string().into(),
        }
    }

    /// Gathers comments from all entry headers in source order, then drops
    /// doc comments of imported decls and every comment inside an imported
    /// decl's source range. The residue is emitted as free comments.
    fn import_free_comments(&self) -> Vec<&'tu RawComment> {
        let sm = &self.ctx.source_manager;
        let mut ordered: BTreeMap<(u32, u32, u32), &'tu RawComment> = BTreeMap::new();
        for header in &self.invocation.entry_headers {
            let Some(file) = sm.file_by_name(&header.name) else { continue };
            for comment in self.ctx.comments_in_file(file) {
                if let Some(key) = sm.order_key(comment.range.begin) {
                    ordered.insert(key, comment);
                }
            }
        }

        for (decl_id, result) in &self.lookup_cache {
            if result.item().is_none() {
                continue;
            }
            if let Some(doc) = self.ctx.raw_comment_for_decl(*decl_id) {
                if let Some(key) = sm.order_key(doc.range.begin) {
                    ordered.remove(&key);
                }
            }
            let range = self.ctx.decl(*decl_id).range;
            if let (Some(begin), Some(end)) =
                (sm.order_key(range.begin), sm.order_key(range.end))
            {
                let inside: Vec<_> = ordered.range(begin..=end).map(|(key, _)| *key).collect();
                for key in inside {
                    ordered.remove(&key);
                }
            }
        }

        ordered.into_values().collect()
    }

    fn converter(&self) -> TypeConverter<'_> {
        TypeConverter { ctx: self.ctx, known_type_decls: &self.known_type_decls }
    }

    fn resolver(&self) -> TargetResolver<'_> {
        TargetResolver::new(
            self.ctx,
            &self.invocation.header_targets,
            &self.invocation.current_target,
        )
    }

    fn owning_target(&self, decl: &Decl) -> Label {
        self.resolver().owning_target(decl)
    }

    fn is_from_current_target(&self, decl: &Decl) -> bool {
        self.resolver().is_from_current_target(decl)
    }

    /// True if the type is directly a record whose values cannot be passed
    /// in registers. Pointers and references to such records are fine.
    fn is_nontrivial_abi_record(&self, ty: &rivet_ast::QualType) -> bool {
        ty.ty.as_tag().is_some_and(|tag| {
            self.ctx
                .decl(tag)
                .as_record()
                .is_some_and(|record| !record.can_pass_in_registers)
        })
    }

    /// Doc-comment text with lint-suppression lines removed; `None` when
    /// nothing is left.
    fn get_comment(&self, raw: Option<&RawComment>) -> Option<String> {
        let formatted = raw?.formatted_text();
        let cleaned: Vec<&str> =
            formatted.lines().filter(|line| should_keep_comment_line(line)).collect();
        let cleaned = cleaned.join("\n");
        (!cleaned.is_empty()).then_some(cleaned)
    }

    /// The qualified name used for unsupported items, or "unnamed".
    fn unsupported_name(&self, decl: &Decl) -> String {
        match &decl.name {
            rivet_ast::DeclName::Identifier(_) => self
                .ctx
                .qualified_name(decl.id)
                .unwrap_or_else(|| "unnamed".to_string()),
            rivet_ast::DeclName::Constructor => self.structor_name(decl, ""),
            rivet_ast::DeclName::Destructor => self.structor_name(decl, "~"),
            _ => "unnamed".to_string(),
        }
    }

    fn structor_name(&self, decl: &Decl, prefix: &str) -> String {
        let parent = decl
            .as_function()
            .and_then(|func| func.method.as_ref())
            .map(|method| method.parent);
        match parent.and_then(|parent| self.ctx.qualified_name(parent)) {
            Some(record) => {
                let own = record.rsplit("::").next().unwrap_or(&record).to_string();
                format!("{record}::{prefix}{own}")
            }
            None => "unnamed".to_string(),
        }
    }
}

/// Secondary ordering for items sharing a source range. Records sort before
/// their members; special members sort default, copy, move, other, then the
/// destructor; everything else comes last.
fn local_order(ctx: &AstContext, decl: &Decl) -> i32 {
    match &decl.kind {
        DeclKind::Record(_) => {
            let in_record =
                decl.parent.is_some_and(|parent| ctx.decl(parent).is_record());
            if in_record {
                1
            } else {
                0
            }
        }
        DeclKind::Function(func) => match func.method.as_ref().map(|m| m.kind) {
            Some(MethodKind::Constructor(info)) => {
                if info.is_default {
                    2
                } else if info.is_copy {
                    3
                } else if info.is_move {
                    4
                } else {
                    5
                }
            }
            Some(MethodKind::Destructor) => 6,
            _ => 7,
        },
        _ => 7,
    }
}

fn generate_decl_id(ctx: &AstContext, decl: DeclId) -> rivet_ir::DeclId {
    rivet_ir::DeclId(ctx.canonical(decl).0)
}

fn translate_access_specifier(access: rivet_ast::AccessSpecifier) -> AccessSpecifier {
    match access {
        rivet_ast::AccessSpecifier::Public => AccessSpecifier::Public,
        rivet_ast::AccessSpecifier::Protected => AccessSpecifier::Protected,
        rivet_ast::AccessSpecifier::Private => AccessSpecifier::Private,
        rivet_ast::AccessSpecifier::None => {
            unreachable!("field access must be defaulted before translation")
        }
    }
}

fn translate_special_member(info: &rivet_ast::SpecialMemberInfo) -> SpecialMemberFunc {
    use rivet_ast::SpecialMemberDefinition as Ast;
    use rivet_ir::SpecialMemberDefinition as Ir;
    SpecialMemberFunc {
        definition: match info.definition {
            Ast::Trivial => Ir::Trivial,
            Ast::NontrivialMembers => Ir::NontrivialMembers,
            Ast::NontrivialSelf => Ir::NontrivialSelf,
            Ast::Deleted => Ir::Deleted,
        },
        access: translate_access_specifier(info.access),
    }
}

/// Filters out clang-tidy suppression comments, based on the documented
/// NOLINT comment forms.
fn should_keep_comment_line(line: &str) -> bool {
    static PATTERNS_TO_IGNORE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^[\s/]*(NOLINT|NOLINTNEXTLINE|NOLINTBEGIN|NOLINTEND)(\([^)\s]*\)?)?\s*$",
        )
        .unwrap()
    });
    !PATTERNS_TO_IGNORE.is_match(line)
}
