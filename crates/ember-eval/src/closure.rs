//! Runtime closure/environment chain (C7's run-time half).
//!
//! Shaped like `ember_sema::ClosureStack` — a vector of frames addressed by
//! depth — but frames are `Rc<RefCell<_>>` rather than owned, because a
//! function value has to *capture* the chain active at its declaration (§2's
//! "function_declaration binds by reference, not by value": the original
//! installs the closure once and re-enters a fresh nested frame per call,
//! never re-resolving the declaration site). Every top-level function is
//! declared directly under the root frame, so in practice every captured
//! chain is the one-frame root snapshot, but the representation stays
//! general rather than special-cased to that fact.
//!
//! Each frame keeps functions and variables in separate maps: §2's
//! `Closure.lookup` resolution order checks a frame's functions before its
//! variables.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ember_parser::ast::Node;
use rustc_hash::FxHashMap;

use crate::value::Value;

pub struct Frame {
    functions: FxHashMap<String, Value>,
    variables: FxHashMap<String, Value>,
}

impl Frame {
    fn new() -> Self {
        Self { functions: FxHashMap::default(), variables: FxHashMap::default() }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("variables", &self.variables.keys().collect::<Vec<_>>())
            .finish()
    }
}

type FrameRef = Rc<RefCell<Frame>>;

/// A user function's signature and body, paired with the frame chain active
/// where it was declared.
#[derive(Clone)]
pub struct FunctionValue {
    pub decl: Rc<Node>,
    captured: Vec<FrameRef>,
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionValue(..)")
    }
}

#[derive(Clone)]
pub struct Closure {
    frames: Vec<FrameRef>,
}

impl Closure {
    pub fn root() -> Self {
        Self { frames: vec![Rc::new(RefCell::new(Frame::new()))] }
    }

    fn from_frames(frames: Vec<FrameRef>) -> Self {
        Self { frames }
    }

    pub fn push_scope(&mut self) {
        self.frames.push(Rc::new(RefCell::new(Frame::new())));
    }

    pub fn pop_scope(&mut self) {
        assert!(self.frames.len() > 1, "cannot pop the root frame");
        self.frames.pop();
    }

    /// Capture the current chain for a function declared right now (§2:
    /// bound by reference to the enclosing closure, not re-resolved per call).
    pub fn capture(&self) -> Vec<FrameRef> {
        self.frames.clone()
    }

    pub fn make_function(&self, decl: Rc<Node>) -> FunctionValue {
        FunctionValue { decl, captured: self.capture() }
    }

    /// Build the closure a function call executes in: the chain captured at
    /// declaration, with nothing from the call site spliced in.
    pub fn enter_function(function: &FunctionValue) -> Self {
        Self::from_frames(function.captured.clone())
    }

    pub fn declare_variable(&mut self, name: impl Into<String>, value: Value) {
        self.frames.last().expect("frame stack never empty").borrow_mut().variables.insert(name.into(), value);
    }

    pub fn declare_function(&mut self, name: impl Into<String>, value: Value) {
        self.frames.last().expect("frame stack never empty").borrow_mut().functions.insert(name.into(), value);
    }

    /// Walk outward; within each frame, functions shadow variables (§2).
    pub fn lookup(&self, name: &str) -> Option<Value> {
        for frame in self.frames.iter().rev() {
            let frame = frame.borrow();
            if let Some(f) = frame.functions.get(name) {
                return Some(f.clone());
            }
            if let Some(v) = frame.variables.get(name) {
                return Some(v.clone());
            }
        }
        None
    }

    /// Update the innermost scope that already defines `name` as a
    /// variable, returning whether one was found (§3's `reassignValue`).
    pub fn reassign(&mut self, name: &str, value: Value) -> bool {
        for frame in self.frames.iter().rev() {
            let mut frame = frame.borrow_mut();
            if frame.variables.contains_key(name) {
                frame.variables.insert(name.to_string(), value);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_function_over_variable_in_same_frame() {
        let mut closure = Closure::root();
        closure.declare_variable("x", Value::Int(1));
        closure.declare_function("x", Value::Int(2));
        assert_eq!(closure.lookup("x"), Some(Value::Int(2)));
    }

    #[test]
    fn reassign_updates_defining_scope() {
        let mut closure = Closure::root();
        closure.declare_variable("x", Value::Int(1));
        closure.push_scope();
        assert!(closure.reassign("x", Value::Int(5)));
        closure.pop_scope();
        assert_eq!(closure.lookup("x"), Some(Value::Int(5)));
    }

    #[test]
    fn reassign_reports_missing_binding() {
        let mut closure = Closure::root();
        assert!(!closure.reassign("missing", Value::Int(1)));
    }
}
