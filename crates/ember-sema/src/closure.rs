//! Static closure/scope stack (C7's compile-time half, feeding C8).
//!
//! Shaped like `snow-typeck::env::TypeEnv`: a `Vec` of frames addressed by
//! depth, lookup walking from the innermost frame outward. Unlike
//! `TypeEnv`, each binding is a full [`ClosureItem`] — a variable with its
//! bound/const flags, or a function's signature — since §4.6's declaration
//! and validation passes need more than a bare type per name. A vector of
//! frames is safe here (spec §9's "single-owner-with-parent-index
//! representation") because every scope is entered and left within one
//! recursive call; nothing about this analysis is allowed to outlive its
//! enclosing frame.

use rustc_hash::FxHashMap;

use ember_parser::ast::UnitType;

/// One binding the closure can hold. Mirrors spec §3's closure item
/// variants `Variable(name, type, isBound, isConst) | Function(name,
/// returnType, params, body)` — the name itself is the map key, and
/// `body` is irrelevant to static analysis so it's dropped here.
#[derive(Debug, Clone, PartialEq)]
pub enum ClosureItem {
    Variable { ty: UnitType, is_bound: bool, is_const: bool },
    Function { params: Vec<UnitType>, return_type: UnitType },
}

impl ClosureItem {
    /// Synthesize the [`UnitType`] this item presents to `resolve_type`
    /// (§4.6: "Identifier → type of the looked-up closure item (for a
    /// Function item, synthesize a FunctionType)").
    pub fn as_type(&self) -> UnitType {
        match self {
            ClosureItem::Variable { ty, .. } => ty.clone(),
            ClosureItem::Function { params, return_type } => {
                UnitType::Function { params: params.clone(), ret: Box::new(return_type.clone()) }
            }
        }
    }
}

pub struct ClosureStack {
    frames: Vec<FxHashMap<String, ClosureItem>>,
}

impl ClosureStack {
    pub fn new() -> Self {
        Self { frames: vec![FxHashMap::default()] }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    /// # Panics
    /// Panics if called with only the root scope remaining — every caller
    /// pairs this with an earlier `push_scope`.
    pub fn pop_scope(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the root scope");
        self.frames.pop();
    }

    /// Insert into the innermost scope (§3's `assignValue` semantics).
    pub fn declare(&mut self, name: impl Into<String>, item: ClosureItem) {
        self.frames.last_mut().expect("frame stack never empty").insert(name.into(), item);
    }

    /// Whether `name` is already bound in the *current* (innermost) scope —
    /// used to detect a second `let`/`var` declaration of the same name in
    /// the same block (§7's InvalidRedeclaration).
    pub fn declared_in_current_scope(&self, name: &str) -> bool {
        self.frames.last().expect("frame stack never empty").contains_key(name)
    }

    /// Walk the parent chain outward (§3's `lookup`).
    pub fn lookup(&self, name: &str) -> Option<&ClosureItem> {
        self.frames.iter().rev().find_map(|f| f.get(name))
    }

    /// Find the innermost scope that already defines `name` and hand back a
    /// mutable reference into it (§3's `reassignValue`: "updates the
    /// innermost enclosing scope that already defines the name").
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut ClosureItem> {
        self.frames.iter_mut().rev().find_map(|f| f.get_mut(name))
    }
}

impl Default for ClosureStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(ty: UnitType, is_bound: bool, is_const: bool) -> ClosureItem {
        ClosureItem::Variable { ty, is_bound, is_const }
    }

    #[test]
    fn lookup_finds_outer_scope_binding() {
        let mut stack = ClosureStack::new();
        stack.declare("x", var(UnitType::Simple("int".into()), true, true));
        stack.push_scope();
        assert!(stack.lookup("x").is_some());
    }

    #[test]
    fn shadowing_prefers_innermost_scope() {
        let mut stack = ClosureStack::new();
        stack.declare("x", var(UnitType::Simple("int".into()), true, true));
        stack.push_scope();
        stack.declare("x", var(UnitType::Simple("str".into()), true, true));
        assert_eq!(stack.lookup("x").unwrap().as_type(), UnitType::Simple("str".into()));
        stack.pop_scope();
        assert_eq!(stack.lookup("x").unwrap().as_type(), UnitType::Simple("int".into()));
    }

    #[test]
    fn reassign_mutates_the_defining_scope_not_the_innermost() {
        let mut stack = ClosureStack::new();
        stack.declare("x", var(UnitType::Simple("int".into()), false, false));
        stack.push_scope();
        if let Some(ClosureItem::Variable { is_bound, .. }) = stack.lookup_mut("x") {
            *is_bound = true;
        }
        stack.pop_scope();
        let ClosureItem::Variable { is_bound, .. } = stack.lookup("x").unwrap() else { panic!() };
        assert!(*is_bound);
    }

    #[test]
    fn declared_in_current_scope_is_scope_local() {
        let mut stack = ClosureStack::new();
        stack.declare("x", var(UnitType::Simple("int".into()), true, true));
        stack.push_scope();
        assert!(!stack.declared_in_current_scope("x"));
    }

    #[test]
    #[should_panic(expected = "cannot pop the root scope")]
    fn pop_root_scope_panics() {
        let mut stack = ClosureStack::new();
        stack.pop_scope();
    }
}
