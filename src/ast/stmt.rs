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

//! Statement AST nodes for the Cinder compiler.

use crate::error::Span;
use crate::settings::CompilerSettings;

use super::{Block, Expr, Slot, Type};

/// Control-flow summary of a statement or block, filled by analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlow {
    /// Every path leaves the enclosing routine.
    pub method_escape: bool,
    /// Every path leaves the enclosing loop.
    pub loop_escape: bool,
    /// Every path leaves this statement abnormally.
    pub all_escape: bool,
    /// Some path reaches a `continue` of the enclosing loop.
    pub any_continue: bool,
    /// Some path reaches a `break` of the enclosing loop.
    pub any_break: bool,
    /// Budget weight of one execution.
    pub statement_count: u32,
}

/// A statement in the Cinder language.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The kind of statement.
    pub kind: StatementKind,
    /// The source span of this statement.
    pub span: Span,
    pub flow: ControlFlow,
}

impl Statement {
    /// Create a new statement.
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self {
            kind,
            span,
            flow: ControlFlow::default(),
        }
    }
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// One or more variable declarations of the same type.
    Declaration(DeclBlock),

    /// An expression evaluated for its side effect.
    Expression(Expr),

    /// An if statement, with or without else.
    If(IfStatement),

    /// A while loop.
    While(WhileStatement),

    /// A do-while loop.
    DoWhile(DoWhileStatement),

    /// A for loop.
    For(ForStatement),

    /// A nested block with its own scope.
    Block(Block),

    /// A break statement.
    Break,

    /// A continue statement.
    Continue,

    /// A return statement.
    Return(Option<Expr>),
}

/// `int a = 1, b;`
#[derive(Debug, Clone, PartialEq)]
pub struct DeclBlock {
    pub var_type: Type,
    pub declarations: Vec<Declaration>,
    pub span: Span,
}

/// A single declarator inside a [`DeclBlock`].
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub initializer: Option<Expr>,
    pub span: Span,
    /// Frame slot assigned by analysis.
    pub slot: Option<Slot>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, initializer: Option<Expr>, span: Span) -> Self {
        Self {
            name: name.into(),
            initializer,
            span,
            slot: None,
        }
    }
}

/// An if statement.
///
/// Branches are always parsed as blocks; an empty block stands for a
/// missing branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<Block>,
}

/// The initializer slot of a `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declaration(DeclBlock),
    Expression(Expr),
}

/// `for (initializer; condition; afterthought) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub initializer: Option<ForInit>,
    pub condition: Option<Expr>,
    pub afterthought: Option<Expr>,
    /// `None` for `;` and `{}` bodies.
    pub body: Option<Block>,
    /// Set by analysis when the condition is absent or constant `true`.
    pub continuous: bool,
    /// Budget counter slot claimed by analysis.
    pub loop_counter: Option<Slot>,
    pub settings: CompilerSettings,
}

impl ForStatement {
    pub fn new(
        initializer: Option<ForInit>,
        condition: Option<Expr>,
        afterthought: Option<Expr>,
        body: Option<Block>,
    ) -> Self {
        Self {
            initializer,
            condition,
            afterthought,
            body,
            continuous: false,
            loop_counter: None,
            settings: CompilerSettings::default(),
        }
    }
}

/// `while (condition) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expr,
    pub body: Option<Block>,
    pub continuous: bool,
    pub loop_counter: Option<Slot>,
    pub settings: CompilerSettings,
}

impl WhileStatement {
    pub fn new(condition: Expr, body: Option<Block>) -> Self {
        Self {
            condition,
            body,
            continuous: false,
            loop_counter: None,
            settings: CompilerSettings::default(),
        }
    }
}

/// `do body while (condition);`
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub body: Block,
    pub condition: Expr,
    pub continuous: bool,
    pub loop_counter: Option<Slot>,
    pub settings: CompilerSettings,
}

impl DoWhileStatement {
    pub fn new(body: Block, condition: Expr) -> Self {
        Self {
            body,
            condition,
            continuous: false,
            loop_counter: None,
            settings: CompilerSettings::default(),
        }
    }
}
