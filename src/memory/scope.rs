//! Lexical scope chain
//!
//! Scopes live in an arena ([`ScopeChain`]) and point at their parent by
//! index, so there are no ownership cycles between a scope and its
//! enclosing scope:
//!
//! - [`ScopeChain::push`] appends a child of the current scope
//! - [`ScopeChain::pop`] drops the current scope and returns to its parent
//!   (a no-op at the global scope)
//!
//! Blocks and procedure activations push and pop in strict LIFO order, so the
//! arena only ever grows and shrinks at its end.
//!
//! # Lookup rules
//!
//! Reads and assignments walk from the innermost scope outwards. Assignment
//! mutates the nearest existing binding and fails for an unknown name; only
//! [`ScopeChain::declare`] creates a binding, always in the current scope.

use super::value::Value;
use crate::parser::ast::Type;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Index of a scope inside the arena
pub type ScopeId = usize;

/// A variable binding: value plus its current type tag
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub value: Value,
    pub var_type: Type,
}

impl Variable {
    pub fn new(value: Value, var_type: Type) -> Self {
        Variable { value, var_type }
    }
}

#[derive(Debug, Clone)]
struct ScopeRecord {
    vars: FxHashMap<String, Variable>,
    parent: Option<ScopeId>,
}

impl ScopeRecord {
    fn new(parent: Option<ScopeId>) -> Self {
        ScopeRecord {
            vars: FxHashMap::default(),
            parent,
        }
    }
}

/// Arena of scopes with a cursor on the innermost live scope
#[derive(Debug, Clone)]
pub struct ScopeChain {
    scopes: Vec<ScopeRecord>,
    current: ScopeId,
}

impl ScopeChain {
    /// A chain holding a single empty global scope
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![ScopeRecord::new(None)],
            current: 0,
        }
    }

    /// Drop every scope and start again from one empty global scope
    pub fn reset(&mut self) {
        self.scopes.truncate(1);
        self.scopes[0].vars.clear();
        self.current = 0;
    }

    /// Enter a child of the current scope
    pub fn push(&mut self) -> ScopeId {
        self.scopes.push(ScopeRecord::new(Some(self.current)));
        self.current = self.scopes.len() - 1;
        self.current
    }

    /// Leave the current scope. Does nothing at the global scope.
    pub fn pop(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.scopes.truncate(self.current);
            self.current = parent;
        }
    }

    /// Number of live scopes on the chain, global scope included
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Create or replace a binding in the current scope
    pub fn declare(&mut self, name: &str, variable: Variable) {
        self.scopes[self.current]
            .vars
            .insert(name.to_string(), variable);
    }

    /// Innermost visible binding for `name`
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.chain()
            .find_map(|id| self.scopes[id].vars.get(name))
    }

    /// Mutable access to the innermost visible binding for `name`
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let owner = self
            .chain()
            .find(|&id| self.scopes[id].vars.contains_key(name))?;
        self.scopes[owner].vars.get_mut(name)
    }

    /// Assign to the nearest existing binding. Returns `false` if `name` is
    /// not declared anywhere on the chain.
    pub fn assign(&mut self, name: &str, value: Value, var_type: Type) -> bool {
        match self.get_mut(name) {
            Some(variable) => {
                variable.value = value;
                variable.var_type = var_type;
                true
            }
            None => false,
        }
    }

    /// Every visible binding, inner scopes shadowing outer ones
    pub fn visible(&self) -> BTreeMap<&str, &Variable> {
        let mut visible = BTreeMap::new();
        for id in self.chain() {
            for (name, variable) in &self.scopes[id].vars {
                visible.entry(name.as_str()).or_insert(variable);
            }
        }
        visible
    }

    /// Scope ids from innermost to global
    fn chain(&self) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(self.current), move |&id| self.scopes[id].parent)
    }
}

impl Default for ScopeChain {
    fn default() -> Self {
        Self::new()
    }
}
