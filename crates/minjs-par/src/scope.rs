//! Lexical scope tree and symbol tables.
//!
//! Scopes are created by the parser as it goes: the global scope at the
//! root, a function scope per function object, a block scope per statement
//! block, and dedicated scopes for `with` bodies and `catch` parameters.
//! Field tables are insertion-ordered so later passes see declarations in
//! source order.
//!
//! Declarations land where JavaScript puts them: `var` and function
//! declarations hoist to the nearest function (or global) scope, `let` and
//! `const` bind in the current block, parameters and the function's own
//! name bind in the function scope, and a catch parameter lives alone in
//! its catch scope.
//!
//! The [`resolve_references`] pass binds every `Lookup` to a field and
//! reports the ones that miss as undefined-reference events. What an
//! *optimizer* does with the result (renaming, pruning) is somebody else's
//! business.

use indexmap::IndexMap;

use minjs_util::{Handler, ReferenceType, Span, Symbol};

use crate::ast::*;
use crate::visit::{self, Visitor};

/// Index of a scope in its [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

impl ScopeId {
    /// The global scope is always created first.
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// What kind of construct opened a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    With,
    Catch,
}

/// How a name was declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Var,
    Let,
    Const,
    Parameter { position: usize },
    FunctionDecl,
    CatchArgument,
}

/// A declared name inside one scope.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: Symbol,
    pub kind: FieldKind,
    pub decl_span: Span,
    /// Number of resolved references, maintained by [`resolve_references`]
    pub references: usize,
}

/// One lexical scope: kind, parent link, strictness, ordered field table.
#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub strict: bool,
    pub fields: IndexMap<Symbol, Field>,
}

/// The scope tree for one parse. Index 0 is the global scope.
#[derive(Clone, Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Create a tree holding just the global scope.
    pub fn new(strict: bool) -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Global,
                parent: None,
                strict,
                fields: IndexMap::new(),
            }],
        }
    }

    /// Open a child scope and return its id.
    pub fn push_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let strict = self.scopes[parent.0].strict;
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            strict,
            fields: IndexMap::new(),
        });
        ScopeId(self.scopes.len() - 1)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Declare `name` in `scope`. The first declaration wins; redeclaring
    /// an existing field returns `false` and leaves it untouched.
    pub fn define(&mut self, scope: ScopeId, name: Symbol, kind: FieldKind, span: Span) -> bool {
        let fields = &mut self.scopes[scope.0].fields;
        if fields.contains_key(&name) {
            return false;
        }
        fields.insert(
            name,
            Field {
                name,
                kind,
                decl_span: span,
                references: 0,
            },
        );
        true
    }

    /// The nearest enclosing function or global scope, where `var` hoists.
    pub fn hoist_target(&self, from: ScopeId) -> ScopeId {
        let mut id = from;
        loop {
            let scope = &self.scopes[id.0];
            match scope.kind {
                ScopeKind::Global | ScopeKind::Function => return id,
                _ => id = scope.parent.expect("non-root scope has a parent"),
            }
        }
    }

    /// Resolve `name` starting at `from`, walking parent links.
    pub fn resolve(&self, from: ScopeId, name: Symbol) -> Option<(ScopeId, &Field)> {
        let mut id = Some(from);
        while let Some(current) = id {
            let scope = &self.scopes[current.0];
            if let Some(field) = scope.fields.get(&name) {
                return Some((current, field));
            }
            id = scope.parent;
        }
        None
    }

    /// Record one resolved reference on a field.
    pub fn add_reference(&mut self, scope: ScopeId, name: Symbol) {
        if let Some(field) = self.scopes[scope.0].fields.get_mut(&name) {
            field.references += 1;
        }
    }
}

/// Walk the program and bind every `Lookup` to a scope field, emitting an
/// undefined-reference event for each miss.
///
/// `with` scopes make resolution unsound, so anything under a `with` object
/// resolves optimistically and never reports a miss.
pub fn resolve_references(tree: &mut ScopeTree, program: &Block, handler: &Handler) {
    let mut resolver = Resolver {
        tree,
        handler,
        scope_stack: vec![ScopeId::GLOBAL],
        with_depth: 0,
        assignment_target: None,
    };
    resolver.visit_block(program);
}

struct Resolver<'a> {
    tree: &'a mut ScopeTree,
    handler: &'a Handler,
    scope_stack: Vec<ScopeId>,
    with_depth: usize,
    /// Span of a `Lookup` currently serving as an assignment target
    assignment_target: Option<Span>,
}

impl<'a> Resolver<'a> {
    fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack never empties")
    }

    fn in_scope(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self)) {
        self.scope_stack.push(scope);
        f(self);
        self.scope_stack.pop();
    }
}

impl<'a> Visitor for Resolver<'a> {
    fn visit_lookup(&mut self, node: &Lookup) {
        let resolved = self
            .tree
            .resolve(self.current_scope(), node.name)
            .map(|(scope, _)| scope);
        match resolved {
            Some(scope) => self.tree.add_reference(scope, node.name),
            None if self.with_depth > 0 => {}
            None => {
                let ref_type = if self.assignment_target == Some(node.span) {
                    ReferenceType::Assignment
                } else {
                    ReferenceType::Reference
                };
                self.handler.undefined_reference(node.name, node.span, ref_type);
            }
        }
    }

    fn visit_binary(&mut self, node: &BinaryExpr) {
        if node.op.is_assignment() {
            if let Expr::Lookup(target) = node.left.unwrap_grouping() {
                let previous = self.assignment_target.replace(target.span);
                node.left.accept(self);
                self.assignment_target = previous;
                node.right.accept(self);
                return;
            }
        }
        visit::walk_binary(self, node);
    }

    fn visit_block(&mut self, node: &Block) {
        match node.scope {
            Some(scope) => self.in_scope(scope, |r| visit::walk_block(r, node)),
            None => visit::walk_block(self, node),
        }
    }

    fn visit_function(&mut self, node: &FunctionObject) {
        let scope = node.scope;
        self.in_scope(scope, |r| visit::walk_function(r, node));
    }

    fn visit_with(&mut self, node: &WithStatement) {
        node.object.accept(self);
        self.with_depth += 1;
        self.in_scope(node.scope, |r| node.body.accept(r));
        self.with_depth -= 1;
    }

    fn visit_try(&mut self, node: &TryStatement) {
        self.visit_block(&node.try_block);
        if let Some(catch_block) = &node.catch_block {
            match &node.catch_var {
                Some(var) => self.in_scope(var.scope, |r| r.visit_block(catch_block)),
                None => self.visit_block(catch_block),
            }
        }
        if let Some(finally_block) = &node.finally_block {
            self.visit_block(finally_block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_hoists_past_block_scopes() {
        let mut tree = ScopeTree::new(false);
        let func = tree.push_scope(ScopeKind::Function, ScopeId::GLOBAL);
        let block = tree.push_scope(ScopeKind::Block, func);
        assert_eq!(tree.hoist_target(block), func);
        assert_eq!(tree.hoist_target(ScopeId::GLOBAL), ScopeId::GLOBAL);
    }

    #[test]
    fn test_resolution_walks_parents() {
        let mut tree = ScopeTree::new(false);
        let name = Symbol::intern("hoisted");
        tree.define(ScopeId::GLOBAL, name, FieldKind::Var, Span::DUMMY);
        let func = tree.push_scope(ScopeKind::Function, ScopeId::GLOBAL);
        let (found_in, field) = tree.resolve(func, name).expect("should resolve");
        assert_eq!(found_in, ScopeId::GLOBAL);
        assert_eq!(field.kind, FieldKind::Var);
    }

    #[test]
    fn test_shadowing_resolves_innermost() {
        let mut tree = ScopeTree::new(false);
        let name = Symbol::intern("shadowed");
        tree.define(ScopeId::GLOBAL, name, FieldKind::Var, Span::DUMMY);
        let func = tree.push_scope(ScopeKind::Function, ScopeId::GLOBAL);
        tree.define(func, name, FieldKind::Parameter { position: 0 }, Span::DUMMY);
        let (found_in, _) = tree.resolve(func, name).expect("should resolve");
        assert_eq!(found_in, func);
    }

    #[test]
    fn test_first_declaration_wins() {
        let mut tree = ScopeTree::new(false);
        let name = Symbol::intern("duplicated");
        assert!(tree.define(ScopeId::GLOBAL, name, FieldKind::Var, Span::DUMMY));
        assert!(!tree.define(ScopeId::GLOBAL, name, FieldKind::Let, Span::DUMMY));
        assert_eq!(
            tree.scope(ScopeId::GLOBAL).fields[&name].kind,
            FieldKind::Var
        );
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let mut tree = ScopeTree::new(false);
        for name in ["zebra", "alpha", "middle"] {
            tree.define(ScopeId::GLOBAL, Symbol::intern(name), FieldKind::Var, Span::DUMMY);
        }
        let names: Vec<_> = tree
            .scope(ScopeId::GLOBAL)
            .fields
            .values()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["zebra", "alpha", "middle"]);
    }

    #[test]
    fn test_strict_inherited_by_children() {
        let mut tree = ScopeTree::new(true);
        let func = tree.push_scope(ScopeKind::Function, ScopeId::GLOBAL);
        assert!(tree.scope(func).strict);
    }
}
