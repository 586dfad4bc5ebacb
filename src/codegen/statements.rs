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

//! Statement code generation.
//!
//! This module provides code generation for:
//! - Variable declarations
//! - Expression statements
//! - Blocks and statement dispatch

use super::control_flow::ControlFlowEmitter;
use super::emit::EmitHelpers;
use super::expressions::ExpressionEmitter;
use super::instructions::Instruction;
use super::labels::LoopTargets;
use super::CodeGenerator;
use crate::ast::{Block, DeclBlock, Statement, StatementKind};
use crate::error::{CompileError, Result};

/// Extension trait for statement code generation.
pub trait StatementEmitter {
    /// Generate code for a statement inside the loop described by `targets`.
    fn generate_statement(&mut self, stmt: &Statement, targets: Option<LoopTargets>)
        -> Result<()>;

    /// Generate code for each statement of a block.
    fn generate_block(&mut self, block: &Block, targets: Option<LoopTargets>) -> Result<()>;

    /// Generate code for a declaration block.
    fn generate_declarations(&mut self, decl: &DeclBlock) -> Result<()>;
}

impl StatementEmitter for CodeGenerator {
    fn generate_statement(
        &mut self,
        stmt: &Statement,
        targets: Option<LoopTargets>,
    ) -> Result<()> {
        match &stmt.kind {
            StatementKind::Declaration(decl) => self.generate_declarations(decl),
            StatementKind::Expression(expr) => {
                self.generate_expression(expr)?;
                let actual = expr.actual.ok_or_else(|| {
                    CompileError::illegal_tree(format!("Statement '{}' has no type", expr), expr.span)
                })?;
                self.emit_discard(actual);
                Ok(())
            }
            StatementKind::If(if_stmt) => self.generate_if(if_stmt, targets),
            StatementKind::While(while_stmt) => self.generate_while(while_stmt),
            StatementKind::DoWhile(do_stmt) => self.generate_do_while(do_stmt),
            StatementKind::For(for_stmt) => self.generate_for(for_stmt),
            StatementKind::Block(block) => self.generate_block(block, targets),
            StatementKind::Break => self.generate_break(targets, stmt.span),
            StatementKind::Continue => self.generate_continue(targets, stmt.span),
            StatementKind::Return(value) => self.generate_return(value.as_ref()),
        }
    }

    fn generate_block(&mut self, block: &Block, targets: Option<LoopTargets>) -> Result<()> {
        for stmt in &block.statements {
            self.generate_statement(stmt, targets)?;
        }
        Ok(())
    }

    fn generate_declarations(&mut self, decl: &DeclBlock) -> Result<()> {
        for declaration in &decl.declarations {
            let slot = declaration.slot.ok_or_else(|| {
                CompileError::illegal_tree(
                    format!("Variable '{}' has no slot", declaration.name),
                    declaration.span,
                )
            })?;

            match &declaration.initializer {
                Some(init) => self.generate_expression(init)?,
                // Slots are reused between sibling scopes, so always reset.
                None => {
                    let zero = decl.var_type.zero_value().ok_or_else(|| {
                        CompileError::illegal_tree(
                            format!("Variable '{}' declared as {}", declaration.name, decl.var_type),
                            declaration.span,
                        )
                    })?;
                    self.emit(Instruction::PushConst(zero));
                }
            }
            self.emit(Instruction::Store(slot));
        }
        Ok(())
    }
}
