//! A thin facade over the semantic layer.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use crate::decl::DeclId;

/// The one mutable collaborator: forcing declaration of implicit special
/// members. The call is idempotent per record, and the set is interior state
/// so the importer can hold the context by shared reference.
#[derive(Default)]
pub struct Sema {
    forced: RefCell<FxHashSet<DeclId>>,
}

impl Sema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the record's implicit special members queryable. Safe to call
    /// any number of times for the same record.
    pub fn force_declaration_of_implicit_members(&self, record: DeclId) {
        self.forced.borrow_mut().insert(record);
    }

    pub fn implicit_members_declared(&self, record: DeclId) -> bool {
        self.forced.borrow().contains(&record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forcing_is_idempotent() {
        let sema = Sema::new();
        let record = DeclId(3);
        assert!(!sema.implicit_members_declared(record));
        sema.force_declaration_of_implicit_members(record);
        sema.force_declaration_of_implicit_members(record);
        assert!(sema.implicit_members_declared(record));
    }
}
