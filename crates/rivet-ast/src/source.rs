//! Source files, locations and the include graph.
//!
//! Locations are opaque handles into the [`SourceManager`], which knows how
//! to resolve them to `(file, line, column)` and how to order them in
//! translation-unit order. The include graph is recorded per file: every
//! file remembers the location of the `#include` that pulled it in.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

/// Index of a file known to the source manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub u32);

/// Whether a file entered the translation unit as user or system code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileKind {
    #[default]
    User,
    System,
}

/// An opaque handle to a position in the translation unit.
///
/// Handle `0` is the invalid location. Two handles compare equal iff they
/// denote the same file/line/column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation(u32);

impl SourceLocation {
    pub fn invalid() -> Self {
        SourceLocation(0)
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::invalid()
    }
}

/// A half-open region of source between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRange {
    pub begin: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(begin: SourceLocation, end: SourceLocation) -> Self {
        Self { begin, end }
    }

    pub fn is_valid(self) -> bool {
        self.begin.is_valid() && self.end.is_valid()
    }
}

struct FileEntry {
    /// `None` models builtin buffers such as `<built-in>`.
    name: Option<SmolStr>,
    kind: FileKind,
    /// Location of the `#include` directive that brought this file in.
    include_loc: SourceLocation,
}

#[derive(Debug, Clone, Copy)]
struct LocationEntry {
    file: FileId,
    line: u32,
    column: u32,
}

/// Owns the file table and the interned location table.
pub struct SourceManager {
    files: Vec<FileEntry>,
    // Entry 0 is a placeholder for the invalid location.
    locations: Vec<LocationEntry>,
    interned: FxHashMap<(u32, u32, u32), u32>,
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceManager {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            locations: vec![LocationEntry { file: FileId(0), line: 0, column: 0 }],
            interned: FxHashMap::default(),
        }
    }

    /// Registers a file. Files are created in the order the translation unit
    /// reaches them, which is also the order used for cross-file location
    /// comparisons.
    pub fn add_file(
        &mut self,
        name: Option<&str>,
        kind: FileKind,
        include_loc: SourceLocation,
    ) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(FileEntry { name: name.map(SmolStr::new), kind, include_loc });
        id
    }

    /// Interns a `(file, line, column)` position.
    pub fn location(&mut self, file: FileId, line: u32, column: u32) -> SourceLocation {
        let key = (file.0, line, column);
        if let Some(&handle) = self.interned.get(&key) {
            return SourceLocation(handle);
        }
        let handle = self.locations.len() as u32;
        self.locations.push(LocationEntry { file, line, column });
        self.interned.insert(key, handle);
        SourceLocation(handle)
    }

    /// The filename as spelled in the include graph, or `None` for builtin
    /// buffers.
    pub fn filename(&self, file: FileId) -> Option<&str> {
        self.files[file.0 as usize].name.as_deref()
    }

    /// Looks a file up by its registered name.
    pub fn file_by_name(&self, name: &str) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.name.as_deref() == Some(name))
            .map(|idx| FileId(idx as u32))
    }

    pub fn file_of(&self, loc: SourceLocation) -> Option<FileId> {
        loc.is_valid().then(|| self.locations[loc.0 as usize].file)
    }

    pub fn spelling_line(&self, loc: SourceLocation) -> u32 {
        self.locations[loc.0 as usize].line
    }

    pub fn spelling_column(&self, loc: SourceLocation) -> u32 {
        self.locations[loc.0 as usize].column
    }

    pub fn include_loc(&self, file: FileId) -> SourceLocation {
        self.files[file.0 as usize].include_loc
    }

    pub fn is_in_system_header(&self, loc: SourceLocation) -> bool {
        match self.file_of(loc) {
            Some(file) => self.files[file.0 as usize].kind == FileKind::System,
            None => false,
        }
    }

    /// Totally orders valid locations: files in creation order, positions
    /// within a file by line then column. Callers are expected to handle
    /// invalid locations themselves.
    pub fn is_before_in_translation_unit(&self, a: SourceLocation, b: SourceLocation) -> bool {
        self.order_key(a) < self.order_key(b)
    }

    /// Sort key for translation-unit order. `None` for the invalid location.
    pub fn order_key(&self, loc: SourceLocation) -> Option<(u32, u32, u32)> {
        if !loc.is_valid() {
            return None;
        }
        let entry = self.locations[loc.0 as usize];
        Some((entry.file.0, entry.line, entry.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_intern_to_the_same_handle() {
        let mut sm = SourceManager::new();
        let f = sm.add_file(Some("a.h"), FileKind::User, SourceLocation::invalid());
        let l1 = sm.location(f, 3, 1);
        let l2 = sm.location(f, 3, 1);
        assert_eq!(l1, l2);
        assert_ne!(l1, sm.location(f, 3, 2));
    }

    #[test]
    fn translation_unit_order_spans_files() {
        let mut sm = SourceManager::new();
        let a = sm.add_file(Some("a.h"), FileKind::User, SourceLocation::invalid());
        let inc = sm.location(a, 1, 1);
        let b = sm.add_file(Some("b.h"), FileKind::User, inc);
        let in_a = sm.location(a, 10, 1);
        let in_b = sm.location(b, 2, 1);
        assert!(sm.is_before_in_translation_unit(in_a, in_b));
        assert!(!sm.is_before_in_translation_unit(in_b, in_a));
    }

    #[test]
    fn include_graph_round_trip() {
        let mut sm = SourceManager::new();
        let outer = sm.add_file(Some("outer.h"), FileKind::User, SourceLocation::invalid());
        let inc = sm.location(outer, 5, 1);
        let inner = sm.add_file(Some("inner.h"), FileKind::User, inc);
        assert_eq!(sm.include_loc(inner), inc);
        assert_eq!(sm.file_of(inc), Some(outer));
        assert!(!sm.include_loc(outer).is_valid());
    }

    #[test]
    fn builtin_files_have_no_name() {
        let mut sm = SourceManager::new();
        let f = sm.add_file(None, FileKind::User, SourceLocation::invalid());
        assert_eq!(sm.filename(f), None);
        assert_eq!(sm.file_by_name("<built-in>"), None);
    }

    #[test]
    fn system_header_query() {
        let mut sm = SourceManager::new();
        let sys = sm.add_file(Some("stddef.h"), FileKind::System, SourceLocation::invalid());
        let loc = sm.location(sys, 1, 1);
        assert!(sm.is_in_system_header(loc));
        assert!(!sm.is_in_system_header(SourceLocation::invalid()));
    }
}
