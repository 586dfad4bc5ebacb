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

//! Control flow code generation.
//!
//! This module provides code generation for control flow statements:
//! - if/else statements
//! - while, do-while and for loops, including their budget checks
//! - break and continue statements
//! - return statements
//!
//! Loops use up to three labels: `start` heads the loop, `begin` is where
//! `continue` goes, `end` is where `break` goes. A budgeted loop charges its
//! cost once per iteration, after the condition and before the body.

use tracing::trace;

use super::emit::EmitHelpers;
use super::expressions::ExpressionEmitter;
use super::instructions::Instruction;
use super::labels::{Label, LabelManager, LoopTargets};
use super::statements::StatementEmitter;
use super::CodeGenerator;
use crate::ast::{
    Block, DoWhileStatement, Expr, ForInit, ForStatement, IfStatement, WhileStatement,
};
use crate::error::{CompileError, Result, Span};

/// Extension trait for control flow code generation.
pub trait ControlFlowEmitter {
    /// Generate code for an if statement.
    fn generate_if(&mut self, if_stmt: &IfStatement, targets: Option<LoopTargets>)
        -> Result<()>;

    /// Generate code for a while loop.
    fn generate_while(&mut self, while_stmt: &WhileStatement) -> Result<()>;

    /// Generate code for a do-while loop.
    fn generate_do_while(&mut self, do_stmt: &DoWhileStatement) -> Result<()>;

    /// Generate code for a for loop.
    fn generate_for(&mut self, for_stmt: &ForStatement) -> Result<()>;

    /// Generate code for a break statement.
    fn generate_break(&mut self, targets: Option<LoopTargets>, span: Span) -> Result<()>;

    /// Generate code for a continue statement.
    fn generate_continue(&mut self, targets: Option<LoopTargets>, span: Span) -> Result<()>;

    /// Generate code for a return statement.
    fn generate_return(&mut self, value: Option<&Expr>) -> Result<()>;
}

/// Budget cost of one iteration of a loop with `body`.
fn body_cost(body: Option<&Block>) -> u32 {
    body.map_or(1, |block| block.flow.statement_count.max(1))
}

fn always_escapes(body: Option<&Block>) -> bool {
    body.is_some_and(|block| block.flow.all_escape)
}

impl CodeGenerator {
    /// Emit a loop condition test, unless the loop never tests.
    fn generate_loop_test(
        &mut self,
        condition: Option<&Expr>,
        continuous: bool,
        end: Label,
        span: Span,
    ) -> Result<()> {
        if continuous {
            return Ok(());
        }
        let condition = condition.ok_or_else(|| {
            CompileError::illegal_tree("Loop without a condition is not marked continuous", span)
        })?;
        self.generate_expression(condition)?;
        self.emit_jump_if_false(end);
        Ok(())
    }

    fn generate_discarded(&mut self, expr: &Expr) -> Result<()> {
        let actual = expr.actual.ok_or_else(|| {
            CompileError::illegal_tree(format!("Expression '{}' has no type", expr), expr.span)
        })?;
        self.generate_expression(expr)?;
        self.emit_discard(actual);
        Ok(())
    }
}

impl ControlFlowEmitter for CodeGenerator {
    fn generate_if(
        &mut self,
        if_stmt: &IfStatement,
        targets: Option<LoopTargets>,
    ) -> Result<()> {
        let end_label = self.make_label("endif");

        self.generate_expression(&if_stmt.condition)?;

        match &if_stmt.else_branch {
            None => {
                self.emit_jump_if_false(end_label);
                self.generate_block(&if_stmt.then_branch, targets)?;
            }
            Some(else_branch) => {
                let else_label = self.make_label("else");
                self.emit_jump_if_false(else_label);
                self.generate_block(&if_stmt.then_branch, targets)?;
                if !if_stmt.then_branch.flow.all_escape {
                    self.emit_jump(end_label);
                }
                self.define_label(else_label);
                self.generate_block(else_branch, targets)?;
            }
        }

        self.define_label(end_label);
        Ok(())
    }

    fn generate_while(&mut self, while_stmt: &WhileStatement) -> Result<()> {
        let begin = self.make_label("while_begin");
        let end = self.make_label("while_end");
        let body = while_stmt.body.as_ref();

        self.define_label(begin);
        self.generate_loop_test(
            Some(&while_stmt.condition),
            while_stmt.continuous,
            end,
            while_stmt.condition.span,
        )?;

        if let Some(slot) = while_stmt.loop_counter {
            self.emit_loop_counter(slot, body_cost(body));
        }

        if let Some(body) = body {
            self.generate_block(body, Some(LoopTargets { begin, end }))?;
        }

        if !always_escapes(body) {
            self.emit_jump(begin);
        }
        self.define_label(end);
        Ok(())
    }

    fn generate_do_while(&mut self, do_stmt: &DoWhileStatement) -> Result<()> {
        let start = self.make_label("do_start");
        let begin = self.make_label("do_begin");
        let end = self.make_label("do_end");

        self.define_label(start);
        self.generate_block(&do_stmt.body, Some(LoopTargets { begin, end }))?;

        self.define_label(begin);
        self.generate_loop_test(
            Some(&do_stmt.condition),
            do_stmt.continuous,
            end,
            do_stmt.condition.span,
        )?;

        if let Some(slot) = do_stmt.loop_counter {
            self.emit_loop_counter(slot, body_cost(Some(&do_stmt.body)));
        }

        self.emit_jump(start);
        self.define_label(end);
        Ok(())
    }

    fn generate_for(&mut self, for_stmt: &ForStatement) -> Result<()> {
        let start = self.make_label("for_start");
        let end = self.make_label("for_end");
        let begin = match for_stmt.afterthought {
            Some(_) => self.make_label("for_begin"),
            None => start,
        };
        let body = for_stmt.body.as_ref();

        match &for_stmt.initializer {
            Some(ForInit::Declaration(decl)) => self.generate_declarations(decl)?,
            Some(ForInit::Expression(expr)) => self.generate_discarded(expr)?,
            None => {}
        }

        self.define_label(start);
        let span = for_stmt
            .condition
            .as_ref()
            .map_or_else(Span::default, |condition| condition.span);
        self.generate_loop_test(for_stmt.condition.as_ref(), for_stmt.continuous, end, span)?;

        if let Some(slot) = for_stmt.loop_counter {
            let cost = match body {
                Some(block) => {
                    body_cost(Some(block)) + u32::from(for_stmt.afterthought.is_some())
                }
                None => 1,
            };
            trace!(slot = slot.0, cost, "budget check for loop");
            self.emit_loop_counter(slot, cost);
        }

        if let Some(body) = body {
            self.generate_block(body, Some(LoopTargets { begin, end }))?;
        }

        if let Some(afterthought) = &for_stmt.afterthought {
            self.define_label(begin);
            self.generate_discarded(afterthought)?;
        }

        if for_stmt.afterthought.is_some() || !always_escapes(body) {
            self.emit_jump(start);
        }
        self.define_label(end);
        Ok(())
    }

    fn generate_break(&mut self, targets: Option<LoopTargets>, span: Span) -> Result<()> {
        let targets = targets
            .ok_or_else(|| CompileError::illegal_tree("'break' outside of a loop", span))?;
        self.emit_jump(targets.end);
        Ok(())
    }

    fn generate_continue(&mut self, targets: Option<LoopTargets>, span: Span) -> Result<()> {
        let targets = targets
            .ok_or_else(|| CompileError::illegal_tree("'continue' outside of a loop", span))?;
        self.emit_jump(targets.begin);
        Ok(())
    }

    fn generate_return(&mut self, value: Option<&Expr>) -> Result<()> {
        match value {
            Some(expr) => {
                self.generate_expression(expr)?;
                self.emit(Instruction::Return);
            }
            None => self.emit(Instruction::ReturnVoid),
        }
        Ok(())
    }
}
