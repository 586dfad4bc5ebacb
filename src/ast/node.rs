// Cinder - A sandboxed scripting language compiler with budgeted loops
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The tree-wide phases every node takes part in before analysis.
//!
//! A compilation visits the whole tree four times, always in this order:
//! [`Node::configure`], [`Node::collect_free_variables`], analysis
//! (`crate::analyzer`) and emission (`crate::codegen`). The first two are
//! plain tree walks and live here.

use std::collections::BTreeSet;

use crate::settings::CompilerSettings;

use super::{
    Block, DeclBlock, DoWhileStatement, Expr, ExprKind, ForInit, ForStatement, IfStatement,
    Program, Statement, StatementKind, WhileStatement,
};

/// Pre-analysis phases shared by all AST nodes.
pub trait Node {
    /// Propagate compiler settings to this node and its children.
    fn configure(&mut self, settings: &CompilerSettings);

    /// Add every variable name this subtree declares or references.
    fn collect_free_variables(&self, variables: &mut BTreeSet<String>);
}

impl<T: Node> Node for Option<T> {
    fn configure(&mut self, settings: &CompilerSettings) {
        if let Some(node) = self {
            node.configure(settings);
        }
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        if let Some(node) = self {
            node.collect_free_variables(variables);
        }
    }
}

impl Node for Program {
    fn configure(&mut self, settings: &CompilerSettings) {
        self.settings = *settings;
        for statement in &mut self.statements {
            statement.configure(settings);
        }
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        for statement in &self.statements {
            statement.collect_free_variables(variables);
        }
    }
}

impl Node for Block {
    fn configure(&mut self, settings: &CompilerSettings) {
        for statement in &mut self.statements {
            statement.configure(settings);
        }
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        for statement in &self.statements {
            statement.collect_free_variables(variables);
        }
    }
}

impl Node for Statement {
    fn configure(&mut self, settings: &CompilerSettings) {
        match &mut self.kind {
            StatementKind::Declaration(decl) => decl.configure(settings),
            StatementKind::Expression(expr) => expr.configure(settings),
            StatementKind::If(stmt) => stmt.configure(settings),
            StatementKind::While(stmt) => stmt.configure(settings),
            StatementKind::DoWhile(stmt) => stmt.configure(settings),
            StatementKind::For(stmt) => stmt.configure(settings),
            StatementKind::Block(block) => block.configure(settings),
            StatementKind::Return(value) => value.configure(settings),
            StatementKind::Break | StatementKind::Continue => {}
        }
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        match &self.kind {
            StatementKind::Declaration(decl) => decl.collect_free_variables(variables),
            StatementKind::Expression(expr) => expr.collect_free_variables(variables),
            StatementKind::If(stmt) => stmt.collect_free_variables(variables),
            StatementKind::While(stmt) => stmt.collect_free_variables(variables),
            StatementKind::DoWhile(stmt) => stmt.collect_free_variables(variables),
            StatementKind::For(stmt) => stmt.collect_free_variables(variables),
            StatementKind::Block(block) => block.collect_free_variables(variables),
            StatementKind::Return(value) => value.collect_free_variables(variables),
            StatementKind::Break | StatementKind::Continue => {}
        }
    }
}

impl Node for DeclBlock {
    fn configure(&mut self, settings: &CompilerSettings) {
        for decl in &mut self.declarations {
            decl.initializer.configure(settings);
        }
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        for decl in &self.declarations {
            variables.insert(decl.name.clone());
            decl.initializer.collect_free_variables(variables);
        }
    }
}

impl Node for IfStatement {
    fn configure(&mut self, settings: &CompilerSettings) {
        self.condition.configure(settings);
        self.then_branch.configure(settings);
        self.else_branch.configure(settings);
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        self.condition.collect_free_variables(variables);
        self.then_branch.collect_free_variables(variables);
        self.else_branch.collect_free_variables(variables);
    }
}

impl Node for ForInit {
    fn configure(&mut self, settings: &CompilerSettings) {
        match self {
            ForInit::Declaration(decl) => decl.configure(settings),
            ForInit::Expression(expr) => expr.configure(settings),
        }
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        match self {
            ForInit::Declaration(decl) => decl.collect_free_variables(variables),
            ForInit::Expression(expr) => expr.collect_free_variables(variables),
        }
    }
}

impl Node for ForStatement {
    fn configure(&mut self, settings: &CompilerSettings) {
        self.settings = *settings;
        self.initializer.configure(settings);
        self.condition.configure(settings);
        self.afterthought.configure(settings);
        self.body.configure(settings);
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        self.initializer.collect_free_variables(variables);
        self.condition.collect_free_variables(variables);
        self.afterthought.collect_free_variables(variables);
        self.body.collect_free_variables(variables);
    }
}

impl Node for WhileStatement {
    fn configure(&mut self, settings: &CompilerSettings) {
        self.settings = *settings;
        self.condition.configure(settings);
        self.body.configure(settings);
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        self.condition.collect_free_variables(variables);
        self.body.collect_free_variables(variables);
    }
}

impl Node for DoWhileStatement {
    fn configure(&mut self, settings: &CompilerSettings) {
        self.settings = *settings;
        self.body.configure(settings);
        self.condition.configure(settings);
    }

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        self.body.collect_free_variables(variables);
        self.condition.collect_free_variables(variables);
    }
}

impl Node for Expr {
    // Expressions carry no settings of their own.
    fn configure(&mut self, _settings: &CompilerSettings) {}

    fn collect_free_variables(&self, variables: &mut BTreeSet<String>) {
        match &self.kind {
            ExprKind::Literal(_) => {}
            ExprKind::Variable { name, .. } | ExprKind::IncDec { name, .. } => {
                variables.insert(name.clone());
            }
            ExprKind::Assign { name, value, .. } => {
                variables.insert(name.clone());
                value.collect_free_variables(variables);
            }
            ExprKind::Binary { left, right, .. } => {
                left.collect_free_variables(variables);
                right.collect_free_variables(variables);
            }
            ExprKind::Unary { operand, .. } => operand.collect_free_variables(variables),
            ExprKind::Call { args, .. } => {
                for arg in args {
                    arg.collect_free_variables(variables);
                }
            }
            ExprKind::Cast { expr, .. } => expr.collect_free_variables(variables),
        }
    }
}
