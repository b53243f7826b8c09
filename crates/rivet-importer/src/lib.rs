//! Imports a C++ translation unit into the rivet IR.
//!
//! The importer walks every declaration the AST exposes, decides whether it
//! is supportable, converts types into their mapped representation with
//! lifetime annotations, and produces an ordered, deduplicated item stream
//! together with preserved free-floating comments. Everything user-facing is
//! reified into the IR itself: unsupported declarations become
//! [`rivet_ir::UnsupportedItem`]s rather than errors.
//!
//! # Architecture
//!
//! ```text
//! AstContext ──> Importer ──> IR items
//!                  │
//!                  ├─ TargetResolver   (include-stack walk)
//!                  ├─ TypeConverter    (recursive type mapping)
//!                  └─ rivet-lifetimes  (annotations per signature)
//! ```

mod convert;
mod importer;
mod location;
mod names;
mod target;
mod type_map;

pub use convert::{ConvertTypeError, TypeConverter, TYPE_STATUS_PAYLOAD_URL};
pub use importer::{import_translation_unit, Importer, Invocation, LookupResult};
pub use location::convert_source_location;
pub use names::{
    mangled_name, translated_field_identifier, translated_identifier, translated_name,
    translated_param_identifier,
};
pub use target::TargetResolver;
pub use type_map::well_known_type;
