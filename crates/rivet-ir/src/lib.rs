//! Types and (de)serialization logic for the rivet IR.
//!
//! The IR is an ordered, deduplicated stream of items describing the subset
//! of a C++ API that can be exposed with borrow-checked references. It is
//! produced by the importer and consumed by the code generators; this crate
//! only defines the data model.

use std::io::Read;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub fn deserialize_ir<R: Read>(reader: R) -> Result<IR> {
    Ok(serde_json::from_reader(reader)?)
}

/// A header path as seen in the include graph, with a leading `./` trimmed.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct HeaderName {
    pub name: String,
}

impl HeaderName {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.strip_prefix("./").map(str::to_string).unwrap_or(name);
        Self { name }
    }
}

/// A build-system target label.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub String);

impl Label {
    /// The synthetic target owning compiler builtin buffers.
    pub fn builtin() -> Self {
        Label("//:builtin".to_string())
    }

    /// The synthetic target standing in for the compiler resource directory.
    pub fn virtual_clang_resource_dir() -> Self {
        Label("//:virtual_clang_resource_dir_target".to_string())
    }
}

impl<T: Into<String>> From<T> for Label {
    fn from(label: T) -> Self {
        Self(label.into())
    }
}

/// Identifies the declaration an item was generated from. Equal for all
/// redeclarations of one entity within a single import.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub usize);

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct SourceLoc {
    pub filename: String,
    pub line: u64,
    pub column: u64,
}

/// A plain, non-empty identifier.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub identifier: String,
}

impl Identifier {
    pub fn new(identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        assert!(!identifier.is_empty(), "identifiers must be non-empty");
        Self { identifier }
    }
}

/// A function name: a plain identifier or one of the special member names.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum UnqualifiedIdentifier {
    Identifier(Identifier),
    Constructor,
    Destructor,
}

/// A lifetime variable. Distinct lifetimes with the same textual name get
/// distinct ids; the id-to-name mapping comes from the symbol table that
/// produced them.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LifetimeId(pub u32);

/// A lifetime parameter binding of a function.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct LifetimeName {
    pub name: String,
    pub id: LifetimeId,
}

/// The mapped form of a C++ type.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum MappedTypeKind {
    /// A builtin scalar with fixed spellings on both sides.
    Simple { rs_name: String, cc_name: String },
    PointerTo {
        pointee: Box<MappedType>,
        lifetime: Option<LifetimeId>,
        nullable: bool,
    },
    /// Always non-null.
    LValueReferenceTo {
        pointee: Box<MappedType>,
        lifetime: Option<LifetimeId>,
    },
    Void,
    /// A tag or typedef type resolved against already-imported decls.
    WithDeclIds {
        rs_name: String,
        rs_decl_id: DeclId,
        cc_name: String,
        cc_decl_id: DeclId,
    },
}

/// A mapped type plus the outer const-qualification of the C++ side.
/// Volatile is ignored.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct MappedType {
    pub kind: MappedTypeKind,
    pub is_const: bool,
}

impl MappedType {
    pub fn simple(rs_name: impl Into<String>, cc_name: impl Into<String>) -> Self {
        Self {
            kind: MappedTypeKind::Simple { rs_name: rs_name.into(), cc_name: cc_name.into() },
            is_const: false,
        }
    }

    pub fn pointer_to(pointee: MappedType, lifetime: Option<LifetimeId>, nullable: bool) -> Self {
        Self {
            kind: MappedTypeKind::PointerTo { pointee: Box::new(pointee), lifetime, nullable },
            is_const: false,
        }
    }

    pub fn lvalue_reference_to(pointee: MappedType, lifetime: Option<LifetimeId>) -> Self {
        Self {
            kind: MappedTypeKind::LValueReferenceTo { pointee: Box::new(pointee), lifetime },
            is_const: false,
        }
    }

    pub fn void_() -> Self {
        Self { kind: MappedTypeKind::Void, is_const: false }
    }

    pub fn with_decl_ids(
        rs_name: impl Into<String>,
        rs_decl_id: DeclId,
        cc_name: impl Into<String>,
        cc_decl_id: DeclId,
    ) -> Self {
        Self {
            kind: MappedTypeKind::WithDeclIds {
                rs_name: rs_name.into(),
                rs_decl_id,
                cc_name: cc_name.into(),
                cc_decl_id,
            },
            is_const: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct FuncParam {
    #[serde(rename = "type")]
    pub type_: MappedType,
    pub identifier: Identifier,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum ReferenceQualification {
    LValue,
    RValue,
    Unqualified,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct InstanceMethodMetadata {
    pub reference: ReferenceQualification,
    pub is_const: bool,
    pub is_virtual: bool,
    /// Only meaningful for constructors.
    pub is_explicit_ctor: bool,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct MemberFuncMetadata {
    pub record_id: DeclId,
    pub instance_method_metadata: Option<InstanceMethodMetadata>,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Func {
    pub name: UnqualifiedIdentifier,
    pub owning_target: Label,
    pub doc_comment: Option<String>,
    pub mangled_name: String,
    pub return_type: MappedType,
    pub params: Vec<FuncParam>,
    /// Sorted ascending by lifetime name.
    pub lifetime_params: Vec<LifetimeName>,
    pub is_inline: bool,
    pub member_func_metadata: Option<MemberFuncMetadata>,
    pub source_loc: SourceLoc,
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Field {
    pub identifier: Identifier,
    pub doc_comment: Option<String>,
    #[serde(rename = "type")]
    pub type_: MappedType,
    pub access: AccessSpecifier,
    /// Offset within the record, in bits.
    pub offset: u64,
}

/// How a special member function is defined.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum SpecialMemberDefinition {
    Trivial,
    NontrivialMembers,
    NontrivialSelf,
    Deleted,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct SpecialMemberFunc {
    pub definition: SpecialMemberDefinition,
    pub access: AccessSpecifier,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Record {
    pub identifier: Identifier,
    pub id: DeclId,
    pub owning_target: Label,
    pub doc_comment: Option<String>,
    pub fields: Vec<Field>,
    /// Size in bytes.
    pub size: u64,
    /// Alignment in bytes.
    pub alignment: u64,
    pub copy_constructor: SpecialMemberFunc,
    pub move_constructor: SpecialMemberFunc,
    pub destructor: SpecialMemberFunc,
    pub is_trivial_abi: bool,
    pub is_final: bool,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct TypeAlias {
    pub identifier: Identifier,
    pub id: DeclId,
    pub owning_target: Label,
    pub underlying_type: MappedType,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct UnsupportedItem {
    pub name: String,
    pub message: String,
    pub source_loc: SourceLoc,
}

/// A free comment preserved from an entry header.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub enum Item {
    Func(Func),
    Record(Record),
    TypeAlias(TypeAlias),
    UnsupportedItem(UnsupportedItem),
    Comment(Comment),
}

impl From<Func> for Item {
    fn from(func: Func) -> Item {
        Item::Func(func)
    }
}

impl From<Record> for Item {
    fn from(record: Record) -> Item {
        Item::Record(record)
    }
}

impl From<TypeAlias> for Item {
    fn from(type_alias: TypeAlias) -> Item {
        Item::TypeAlias(type_alias)
    }
}

impl From<UnsupportedItem> for Item {
    fn from(unsupported: UnsupportedItem) -> Item {
        Item::UnsupportedItem(unsupported)
    }
}

impl From<Comment> for Item {
    fn from(comment: Comment) -> Item {
        Item::Comment(comment)
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
pub struct IR {
    #[serde(default)]
    pub used_headers: Vec<HeaderName>,
    pub current_target: Label,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl IR {
    pub fn functions(&self) -> impl Iterator<Item = &Func> {
        self.items.iter().filter_map(|item| match item {
            Item::Func(func) => Some(func),
            _ => None,
        })
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.items.iter().filter_map(|item| match item {
            Item::Record(record) => Some(record),
            _ => None,
        })
    }

    pub fn type_aliases(&self) -> impl Iterator<Item = &TypeAlias> {
        self.items.iter().filter_map(|item| match item {
            Item::TypeAlias(type_alias) => Some(type_alias),
            _ => None,
        })
    }

    pub fn unsupported_items(&self) -> impl Iterator<Item = &UnsupportedItem> {
        self.items.iter().filter_map(|item| match item {
            Item::UnsupportedItem(unsupported) => Some(unsupported),
            _ => None,
        })
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.items.iter().filter_map(|item| match item {
            Item::Comment(comment) => Some(comment),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_headers() {
        let input = r#"
        {
            "used_headers": [{ "name": "foo/bar.h" }],
            "current_target": "//foo:bar"
        }
        "#;
        let ir = deserialize_ir(input.as_bytes()).unwrap();
        let expected = IR {
            used_headers: vec![HeaderName::new("foo/bar.h")],
            current_target: "//foo:bar".into(),
            items: vec![],
        };
        assert_eq!(ir, expected);
    }

    #[test]
    fn test_header_name_trims_leading_dot_slash() {
        assert_eq!(HeaderName::new("./foo.h"), HeaderName::new("foo.h"));
        assert_eq!(HeaderName::new("foo.h").name, "foo.h");
    }

    #[test]
    fn test_member_access_specifiers() {
        let input = r#"
        {
            "current_target": "//foo:bar",
            "items": [
                { "Record": {
                    "identifier": { "identifier": "SomeStruct" },
                    "id": 42,
                    "owning_target": "//foo:bar",
                    "doc_comment": null,
                    "fields": [
                        {
                            "identifier": { "identifier": "public_int" },
                            "doc_comment": null,
                            "type": {
                                "kind": { "Simple": { "rs_name": "i32", "cc_name": "int" } },
                                "is_const": false
                            },
                            "access": "Public",
                            "offset": 0
                        },
                        {
                            "identifier": { "identifier": "private_int" },
                            "doc_comment": null,
                            "type": {
                                "kind": { "Simple": { "rs_name": "i32", "cc_name": "int" } },
                                "is_const": false
                            },
                            "access": "Private",
                            "offset": 32
                        }
                    ],
                    "size": 8,
                    "alignment": 4,
                    "copy_constructor": { "definition": "NontrivialSelf", "access": "Private" },
                    "move_constructor": { "definition": "Deleted", "access": "Protected" },
                    "destructor": { "definition": "Trivial", "access": "Public" },
                    "is_trivial_abi": true,
                    "is_final": false
                }}
            ]
        }
        "#;
        let ir = deserialize_ir(input.as_bytes()).unwrap();
        let record = ir.records().next().unwrap();
        assert_eq!(record.identifier, Identifier::new("SomeStruct"));
        assert_eq!(record.id, DeclId(42));
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[0].access, AccessSpecifier::Public);
        assert_eq!(record.fields[1].access, AccessSpecifier::Private);
        assert_eq!(record.fields[1].offset, 32);
        assert_eq!(
            record.copy_constructor,
            SpecialMemberFunc {
                definition: SpecialMemberDefinition::NontrivialSelf,
                access: AccessSpecifier::Private,
            }
        );
        assert_eq!(record.move_constructor.definition, SpecialMemberDefinition::Deleted);
        assert!(record.is_trivial_abi);
        assert!(!record.is_final);
    }

    #[test]
    fn test_pointer_member_round_trips() {
        let pointee = MappedType::with_decl_ids("SomeStruct", DeclId(42), "SomeStruct", DeclId(42));
        let ty = MappedType::pointer_to(pointee, None, true);
        let json = serde_json::to_string(&ty).unwrap();
        let back: MappedType = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, back);
        match &back.kind {
            MappedTypeKind::PointerTo { pointee, lifetime, nullable } => {
                assert!(*nullable);
                assert!(lifetime.is_none());
                match &pointee.kind {
                    MappedTypeKind::WithDeclIds { rs_decl_id, .. } => {
                        assert_eq!(*rs_decl_id, DeclId(42))
                    }
                    other => panic!("unexpected pointee {other:?}"),
                }
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_item_filters() {
        let ir = IR {
            used_headers: vec![],
            current_target: "//foo:bar".into(),
            items: vec![
                Item::Comment(Comment { text: "hi".to_string() }),
                Item::UnsupportedItem(UnsupportedItem {
                    name: "U".to_string(),
                    message: "Unions are not supported yet".to_string(),
                    source_loc: SourceLoc { filename: "u.h".to_string(), line: 1, column: 1 },
                }),
            ],
        };
        assert_eq!(ir.functions().count(), 0);
        assert_eq!(ir.comments().count(), 1);
        assert_eq!(ir.unsupported_items().next().unwrap().name, "U");
    }
}
