//! The translation-unit context: decl arena, files, comments, sema.

use rustc_hash::FxHashMap;

use crate::comments::RawComment;
use crate::decl::{Decl, DeclId, DeclKind, DeclName, MethodInfo, RecordDecl};
use crate::sema::Sema;
use crate::source::{FileId, FileKind, SourceLocation, SourceManager, SourceRange};
use crate::types::{BuiltinKind, QualType, Type};

/// Owns everything the importer reads: declarations, source files, raw
/// comments, and the `Sema` facade. One context models one translation unit.
pub struct AstContext {
    decls: Vec<Decl>,
    children: Vec<Vec<DeclId>>,
    comments: FxHashMap<FileId, Vec<RawComment>>,
    pub source_manager: SourceManager,
    pub sema: Sema,
}

impl AstContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            decls: Vec::new(),
            children: Vec::new(),
            comments: FxHashMap::default(),
            source_manager: SourceManager::new(),
            sema: Sema::new(),
        };
        // Decl 0 is always the translation unit.
        ctx.push_decl(
            DeclName::ident(""),
            DeclKind::TranslationUnit,
            None,
            SourceRange::default(),
        );
        ctx
    }

    pub fn translation_unit(&self) -> DeclId {
        DeclId(0)
    }

    fn push_decl(
        &mut self,
        name: DeclName,
        kind: DeclKind,
        parent: Option<DeclId>,
        range: SourceRange,
    ) -> DeclId {
        let id = DeclId(self.decls.len());
        let mut kind = kind;
        if let DeclKind::Record(record) = &mut kind {
            if record.is_complete_definition && record.definition.is_none() {
                record.definition = Some(id);
            }
        }
        self.decls.push(Decl { id, canonical: id, name, kind, parent, range, loc: range.begin });
        self.children.push(Vec::new());
        if let Some(parent) = parent {
            self.children[parent.0].push(id);
        }
        id
    }

    /// Adds a declaration to a context. Children are kept in declaration
    /// order, which is the order the import driver walks them in.
    pub fn add_decl(
        &mut self,
        parent: DeclId,
        name: DeclName,
        kind: DeclKind,
        range: SourceRange,
    ) -> DeclId {
        self.push_decl(name, kind, Some(parent), range)
    }

    /// Adds a declaration with a lexical parent but outside the parent's
    /// visible declaration list, like the pattern declaration of a template.
    pub fn add_detached_decl(
        &mut self,
        parent: DeclId,
        name: DeclName,
        kind: DeclKind,
        range: SourceRange,
    ) -> DeclId {
        let id = self.push_decl(name, kind, Some(parent), range);
        let children = &mut self.children[parent.0];
        if let Some(position) = children.iter().position(|&child| child == id) {
            children.remove(position);
        }
        id
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.0]
    }

    /// The canonical representative for all redeclarations of an entity.
    pub fn canonical(&self, id: DeclId) -> DeclId {
        self.decls[id.0].canonical
    }

    /// Marks `id` as a redeclaration of `canonical`.
    pub fn set_canonical(&mut self, id: DeclId, canonical: DeclId) {
        self.decls[id.0].canonical = canonical;
    }

    /// Member declarations of a context, in declaration order.
    pub fn decls_of(&self, context: DeclId) -> &[DeclId] {
        &self.children[context.0]
    }

    /// Replaces a record's fields. The record must already be declared; this
    /// exists so field types may reference the record itself.
    pub fn set_record_fields(&mut self, record: DeclId, fields: Vec<crate::decl::FieldDecl>) {
        match &mut self.decls[record.0].kind {
            DeclKind::Record(payload) => payload.fields = fields,
            _ => panic!("set_record_fields on a non-record decl"),
        }
    }

    pub fn record_of(&self, id: DeclId) -> &RecordDecl {
        self.decl(id).as_record().expect("expected a record decl")
    }

    // ---------------------------------------------------------------------
    // Type construction.

    pub fn builtin(&self, kind: BuiltinKind) -> QualType {
        QualType::new(Type::Builtin(kind))
    }

    pub fn pointer_to(&self, pointee: QualType) -> QualType {
        QualType::new(Type::Pointer(pointee))
    }

    pub fn lvalue_reference_to(&self, pointee: QualType) -> QualType {
        QualType::new(Type::LValueReference(pointee))
    }

    pub fn rvalue_reference_to(&self, pointee: QualType) -> QualType {
        QualType::new(Type::RValueReference(pointee))
    }

    pub fn tag_type(&self, decl: DeclId) -> QualType {
        QualType::new(Type::Tag(decl))
    }

    pub fn typedef_type(&self, decl: DeclId) -> QualType {
        QualType::new(Type::Typedef(decl))
    }

    /// The type of `this` inside an instance method: `S*`, with a const
    /// pointee for const methods.
    pub fn this_type(&self, method: DeclId) -> QualType {
        let func = self.decl(method).as_function().expect("this_type of a non-function");
        let info: &MethodInfo =
            func.method.as_ref().expect("this_type of a non-member function");
        let mut pointee = self.tag_type(info.parent);
        if info.is_const {
            pointee = pointee.with_const();
        }
        self.pointer_to(pointee)
    }

    // ---------------------------------------------------------------------
    // Spellings.

    /// The type's C++ spelling including qualifiers, as used in diagnostics.
    pub fn type_spelling(&self, ty: &QualType) -> String {
        let base = self.spell_unqualified(ty);
        if ty.is_const {
            format!("const {base}")
        } else {
            base
        }
    }

    /// The spelling with outer qualifiers dropped; this is the form the
    /// well-known-type dictionary is keyed by.
    pub fn unqualified_type_spelling(&self, ty: &QualType) -> String {
        self.spell_unqualified(ty)
    }

    fn spell_unqualified(&self, ty: &QualType) -> String {
        match &*ty.ty {
            Type::Builtin(kind) => kind.spelling().to_string(),
            Type::Pointer(pointee) => format!("{} *", self.type_spelling(pointee)),
            Type::LValueReference(pointee) => format!("{} &", self.type_spelling(pointee)),
            Type::RValueReference(pointee) => format!("{} &&", self.type_spelling(pointee)),
            Type::Tag(decl) | Type::Typedef(decl) => self
                .qualified_name(*decl)
                .unwrap_or_else(|| "(unnamed)".to_string()),
        }
    }

    /// `Ns::Inner::Name` for identifier-named decls, walking named ancestor
    /// contexts. `None` if the decl itself has no plain identifier.
    pub fn qualified_name(&self, id: DeclId) -> Option<String> {
        let decl = self.decl(id);
        let own = decl.name.as_identifier()?;
        let mut segments = vec![own.to_string()];
        let mut cursor = decl.parent;
        while let Some(parent_id) = cursor {
            let parent = self.decl(parent_id);
            if let Some(name) = parent.name.as_identifier() {
                segments.push(name.to_string());
            }
            cursor = parent.parent;
        }
        segments.reverse();
        Some(segments.join("::"))
    }

    pub fn type_size_bits(&self, kind: BuiltinKind) -> u64 {
        kind.size_bits()
    }

    // ---------------------------------------------------------------------
    // Files and comments.

    pub fn add_file(
        &mut self,
        name: Option<&str>,
        kind: FileKind,
        include_loc: SourceLocation,
    ) -> FileId {
        self.source_manager.add_file(name, kind, include_loc)
    }

    pub fn location(&mut self, file: FileId, line: u32, column: u32) -> SourceLocation {
        self.source_manager.location(file, line, column)
    }

    pub fn range(
        &mut self,
        file: FileId,
        begin_line: u32,
        begin_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> SourceRange {
        let begin = self.source_manager.location(file, begin_line, begin_col);
        let end = self.source_manager.location(file, end_line, end_col);
        SourceRange::new(begin, end)
    }

    /// Registers a raw comment. Comments are expected in source order per
    /// file, as a parser would produce them.
    pub fn add_comment(&mut self, text: &str, range: SourceRange) {
        let file = self
            .source_manager
            .file_of(range.begin)
            .expect("comment with an invalid begin location");
        self.comments.entry(file).or_default().push(RawComment::new(text, range));
    }

    pub fn comments_in_file(&self, file: FileId) -> &[RawComment] {
        self.comments.get(&file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The doc comment attached to a decl: a comment in the same file ending
    /// on the line directly above the decl's begin line.
    pub fn raw_comment_for_decl(&self, id: DeclId) -> Option<&RawComment> {
        self.raw_comment_before(self.decl(id).range.begin)
    }

    /// Attachment by position; also used for record fields.
    pub fn raw_comment_before(&self, loc: SourceLocation) -> Option<&RawComment> {
        let file = self.source_manager.file_of(loc)?;
        let line = self.source_manager.spelling_line(loc);
        self.comments_in_file(file).iter().find(|comment| {
            self.source_manager.spelling_line(comment.range.end) + 1 == line
        })
    }
}

impl Default for AstContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{FieldDecl, AccessSpecifier, FunctionDecl};

    #[test]
    fn translation_unit_is_decl_zero() {
        let ctx = AstContext::new();
        let tu = ctx.translation_unit();
        assert!(matches!(ctx.decl(tu).kind, DeclKind::TranslationUnit));
        assert!(ctx.decl(tu).parent.is_none());
    }

    #[test]
    fn children_keep_declaration_order() {
        let mut ctx = AstContext::new();
        let file = ctx.add_file(Some("t.h"), FileKind::User, SourceLocation::invalid());
        let tu = ctx.translation_unit();
        let r1 = ctx.range(file, 1, 1, 1, 20);
        let r2 = ctx.range(file, 2, 1, 2, 20);
        let int = ctx.builtin(BuiltinKind::Int);
        let a = ctx.add_decl(
            tu,
            DeclName::ident("a"),
            DeclKind::Function(FunctionDecl::new(int.clone())),
            r1,
        );
        let b = ctx.add_decl(
            tu,
            DeclName::ident("b"),
            DeclKind::Function(FunctionDecl::new(int)),
            r2,
        );
        assert_eq!(ctx.decls_of(tu), &[a, b]);
    }

    #[test]
    fn qualified_names_walk_named_ancestors() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let ns = ctx.add_decl(tu, DeclName::ident("std"), DeclKind::Namespace, SourceRange::default());
        let td = ctx.add_decl(
            ns,
            DeclName::ident("size_t"),
            DeclKind::TypedefName(crate::decl::TypedefDecl {
                underlying_type: ctx.builtin(BuiltinKind::ULong),
            }),
            SourceRange::default(),
        );
        assert_eq!(ctx.qualified_name(td).as_deref(), Some("std::size_t"));
        let spelling = ctx.type_spelling(&ctx.typedef_type(td));
        assert_eq!(spelling, "std::size_t");
    }

    #[test]
    fn type_spellings() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let int = ctx.builtin(BuiltinKind::Int);
        assert_eq!(ctx.type_spelling(&int), "int");
        let const_int = int.clone().with_const();
        assert_eq!(ctx.type_spelling(&const_int), "const int");
        assert_eq!(ctx.unqualified_type_spelling(&const_int), "int");
        let ptr = ctx.pointer_to(const_int);
        assert_eq!(ctx.type_spelling(&ptr), "const int *");
        let reference = ctx.lvalue_reference_to(int.clone());
        assert_eq!(ctx.type_spelling(&reference), "int &");
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        assert_eq!(ctx.type_spelling(&ctx.tag_type(rec)), "S");
    }

    #[test]
    fn this_type_of_const_method() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let int = ctx.builtin(BuiltinKind::Int);
        let mut info = MethodInfo::instance(rec);
        info.is_const = true;
        let method = ctx.add_decl(
            rec,
            DeclName::ident("get"),
            DeclKind::Function(FunctionDecl::new(int).with_method(info)),
            SourceRange::default(),
        );
        let this = ctx.this_type(method);
        let pointee = this.ty.as_pointer().unwrap();
        assert!(pointee.is_const);
        assert_eq!(pointee.ty.as_tag(), Some(rec));
    }

    #[test]
    fn doc_comment_attaches_to_the_next_line() {
        let mut ctx = AstContext::new();
        let file = ctx.add_file(Some("t.h"), FileKind::User, SourceLocation::invalid());
        let comment_range = ctx.range(file, 1, 1, 1, 20);
        ctx.add_comment("// the answer", comment_range);
        let tu = ctx.translation_unit();
        let int = ctx.builtin(BuiltinKind::Int);
        let decl_range = ctx.range(file, 2, 1, 2, 30);
        let func = ctx.add_decl(
            tu,
            DeclName::ident("f"),
            DeclKind::Function(FunctionDecl::new(int.clone())),
            decl_range,
        );
        assert!(ctx.raw_comment_for_decl(func).is_some());

        // A blank line in between breaks the attachment.
        let far_range = ctx.range(file, 9, 1, 9, 30);
        let far = ctx.add_decl(
            tu,
            DeclName::ident("g"),
            DeclKind::Function(FunctionDecl::new(int)),
            far_range,
        );
        assert!(ctx.raw_comment_for_decl(far).is_none());
    }

    #[test]
    fn record_definition_points_at_itself() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("S"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        assert_eq!(ctx.record_of(rec).definition, Some(rec));
        let fwd = ctx.add_decl(
            tu,
            DeclName::ident("T"),
            DeclKind::Record(RecordDecl::forward_declaration(false)),
            SourceRange::default(),
        );
        assert_eq!(ctx.record_of(fwd).definition, None);
    }

    #[test]
    fn fields_can_reference_their_own_record() {
        let mut ctx = AstContext::new();
        let tu = ctx.translation_unit();
        let rec = ctx.add_decl(
            tu,
            DeclName::ident("Node"),
            DeclKind::Record(RecordDecl::definition(false)),
            SourceRange::default(),
        );
        let next_ty = ctx.pointer_to(ctx.tag_type(rec));
        ctx.set_record_fields(
            rec,
            vec![FieldDecl::new("next", next_ty, AccessSpecifier::None, SourceLocation::invalid())],
        );
        let field = &ctx.record_of(rec).fields[0];
        assert_eq!(field.ty.ty.as_pointer().unwrap().ty.as_tag(), Some(rec));
    }
}
