//! Lifetime elision over function signatures.

use rivet_ast::{AstContext, DeclId, QualType, Type};

use crate::{
    FunctionLifetimes, Lifetime, LifetimeContext, LifetimeError, LifetimeSymbolTable,
    TypeLifetimes,
};

/// Produces lifetime annotations for a function declaration.
///
/// Every pointer and lvalue-reference position of `this` and the parameters
/// receives a fresh lifetime, outermost positions named first. Output
/// positions elide to `this`'s outermost lifetime for instance methods, or
/// to the unique input lifetime if there is exactly one.
pub fn get_lifetime_annotations(
    func_id: DeclId,
    ast: &AstContext,
    ctx: &LifetimeContext,
    table: &mut LifetimeSymbolTable,
) -> Result<FunctionLifetimes, LifetimeError> {
    let decl = ast.decl(func_id);
    let func = decl.as_function().expect("lifetime annotations requested for a non-function");
    let is_instance_method = func.method.as_ref().is_some_and(|m| m.is_instance);

    let this_positions = if is_instance_method {
        lifetime_positions(&ast.this_type(func_id))
    } else {
        0
    };
    let param_positions: Vec<usize> =
        func.params.iter().map(|param| lifetime_positions(&param.ty)).collect();
    let return_positions = lifetime_positions(&func.return_type);
    let total_inputs: usize = this_positions + param_positions.iter().sum::<usize>();

    if !ctx.elision_enabled {
        if total_inputs + return_positions == 0 {
            return Ok(FunctionLifetimes {
                param_lifetimes: vec![TypeLifetimes::new(); func.params.len()],
                return_lifetimes: TypeLifetimes::new(),
                this_lifetimes: is_instance_method.then(TypeLifetimes::new),
            });
        }
        return Err(LifetimeError::ElisionDisabled);
    }

    let this_lifetimes = is_instance_method.then(|| annotate_fresh(this_positions, table));
    let param_lifetimes: Vec<TypeLifetimes> =
        param_positions.iter().map(|&n| annotate_fresh(n, table)).collect();

    let return_lifetimes = if return_positions == 0 {
        TypeLifetimes::new()
    } else if let Some(this_lifetimes) = &this_lifetimes {
        // The outermost `this` lifetime flows into every output position.
        let this_outer = *this_lifetimes.last().expect("`this` is always a pointer");
        vec![this_outer; return_positions]
    } else {
        let inputs: Vec<Lifetime> = param_lifetimes.iter().flatten().copied().collect();
        match inputs.as_slice() {
            [unique] => vec![*unique; return_positions],
            _ => {
                let name = decl.name.as_identifier().unwrap_or("(unnamed)").to_string();
                return Err(LifetimeError::CannotElideReturn(name));
            }
        }
    };

    Ok(FunctionLifetimes { param_lifetimes, return_lifetimes, this_lifetimes })
}

/// Number of lifetime positions in a type: one per pointer or
/// lvalue-reference, recursively. Typedefs are opaque, matching the type
/// converter, which resolves known typedefs without descending into them.
fn lifetime_positions(ty: &QualType) -> usize {
    match &*ty.ty {
        Type::Pointer(pointee) | Type::LValueReference(pointee) => {
            1 + lifetime_positions(pointee)
        }
        _ => 0,
    }
}

/// Fresh lifetimes for `n` positions, outermost named first, stored
/// innermost-first so the outermost ends up at the back.
fn annotate_fresh(n: usize, table: &mut LifetimeSymbolTable) -> TypeLifetimes {
    let mut outer_first: Vec<Lifetime> = (0..n).map(|_| table.create_fresh()).collect();
    outer_first.reverse();
    outer_first
}
