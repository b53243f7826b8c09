//! Resolution of declarations to their owning build target.

use rustc_hash::FxHashMap;

use rivet_ast::{AstContext, Decl};
use rivet_ir::{HeaderName, Label};

/// Walks the include stack to find which target a declaration belongs to.
pub struct TargetResolver<'a> {
    ctx: &'a AstContext,
    header_targets: &'a FxHashMap<HeaderName, Label>,
    current_target: &'a Label,
}

impl<'a> TargetResolver<'a> {
    pub fn new(
        ctx: &'a AstContext,
        header_targets: &'a FxHashMap<HeaderName, Label>,
        current_target: &'a Label,
    ) -> Self {
        Self { ctx, header_targets, current_target }
    }

    /// The target owning the header the declaration was written in.
    ///
    /// Headers not associated with any target are treated as textual: the
    /// walk continues up the include stack until a header with an owning
    /// target is found. Builtin buffers map to the `//:builtin` label, and
    /// everything that bottoms out in a system header (or runs out of
    /// include locations) maps to the virtual compiler-resources target.
    pub fn owning_target(&self, decl: &Decl) -> Label {
        let sm = &self.ctx.source_manager;
        let mut location = decl.loc;

        while location.is_valid() && !sm.is_in_system_header(location) {
            let file = sm.file_of(location).expect("valid locations always have a file");
            match sm.filename(file) {
                None => return Label::builtin(),
                Some(filename) => {
                    let filename = filename.strip_prefix("./").unwrap_or(filename);
                    if let Some(target) = self.header_targets.get(&HeaderName::new(filename)) {
                        return target.clone();
                    }
                }
            }
            location = sm.include_loc(file);
        }

        Label::virtual_clang_resource_dir()
    }

    pub fn is_from_current_target(&self, decl: &Decl) -> bool {
        *self.current_target == self.owning_target(decl)
    }
}
