//! Two-pass semantic analyzer (C8): closure/scope model (C7's compile-time
//! half), declaration checks, type resolution, and assignment validation.
//!
//! Follows the redesign note on delayed semantic tasks (spec §9): the
//! original queued closures capturing the analyzer's live scope and drained
//! them later. Rust's scopes are exact and don't need capturing, so the two
//! conceptual passes collapse into one traversal per function body, fed by
//! two side tables built ahead of time — [`block_return::collect`]'s
//! block-id → return-expression-id map (so an if-expression used as a value
//! can be typed from its then-block) and the root-scope function/builtin
//! signatures registered before any body is walked (so forward references
//! between top-level functions resolve).

mod block_return;
mod builtins;
mod closure;
mod error;
mod resolve;

use std::collections::HashMap;

use ember_parser::ast::{Node, NodeId, UnitType};

pub use closure::{ClosureItem, ClosureStack};
pub use error::SemaError;

/// Output of a successful analysis: every node the analyzer resolved a type
/// for, keyed by node id. `ember-eval` does not consult this — the
/// evaluator re-derives behavior from runtime values — but `emberc`'s
/// `--emit-ast` debug dump uses it to annotate the tree it prints.
pub struct SemaResult {
    pub resolved_types: HashMap<NodeId, UnitType>,
}

/// Run the semantic analyzer over a whole program (§4.6). Returns on the
/// first failure, per §7's "only the first error is reported" rule.
pub fn analyze(ast: &Node) -> Result<SemaResult, SemaError> {
    let Node::Start { functions, .. } = ast else {
        panic!("analyze expects the Start node produced by ember_parser::parse");
    };

    let mut block_return = HashMap::new();
    for f in functions {
        block_return::collect(f, &mut block_return);
    }

    let mut closure = ClosureStack::new();
    builtins::register(&mut closure);

    for f in functions {
        resolve::register_function_signature(&mut closure, f)?;
    }

    let mut resolved_types = HashMap::new();
    for f in functions {
        resolve::validate_function(&mut closure, &block_return, &mut resolved_types, f)?;
    }

    Ok(SemaResult { resolved_types })
}
