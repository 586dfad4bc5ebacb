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

//! Statement analysis for the semantic analyzer.
//!
//! This module provides statement analysis functionality:
//! - Statement dispatch to the control-flow handlers
//! - Blocks and the escape summary of a statement sequence
//! - Variable declarations

use super::context::StatementContext;
use super::control_flow::ControlFlowAnalyzer;
use super::expressions::ExpressionAnalyzer;
use super::Analyzer;
use crate::ast::{Block, ControlFlow, DeclBlock, Declaration, Statement, StatementKind};
use crate::error::{CompileError, ErrorCode, Result};

/// Extension trait for statement analysis.
pub trait StatementAnalyzer {
    /// Analyze a statement, returning it with its control-flow summary.
    fn analyze_statement(&mut self, stmt: Statement, ctx: StatementContext) -> Result<Statement>;

    /// Analyze a block in a fresh scope.
    fn analyze_block(&mut self, block: Block, ctx: StatementContext) -> Result<Block>;

    /// Analyze a statement sequence in the current scope.
    fn analyze_statements(
        &mut self,
        statements: Vec<Statement>,
        ctx: StatementContext,
    ) -> Result<(Vec<Statement>, ControlFlow)>;

    /// Analyze a declaration block, declaring each name after its initializer.
    fn analyze_declarations(&mut self, decl: DeclBlock) -> Result<DeclBlock>;
}

/// Flow of a statement that always completes normally.
pub(crate) fn plain_flow() -> ControlFlow {
    ControlFlow {
        statement_count: 1,
        ..ControlFlow::default()
    }
}

impl StatementAnalyzer for Analyzer {
    fn analyze_statement(&mut self, stmt: Statement, ctx: StatementContext) -> Result<Statement> {
        let Statement { kind, span, .. } = stmt;

        let (kind, flow) = match kind {
            StatementKind::Declaration(decl) => (
                StatementKind::Declaration(self.analyze_declarations(decl)?),
                plain_flow(),
            ),
            StatementKind::Expression(expr) => (
                StatementKind::Expression(self.analyze_statement_expression(expr)?),
                plain_flow(),
            ),
            StatementKind::If(if_stmt) => {
                let (if_stmt, flow) = self.analyze_if_statement(if_stmt, span, ctx)?;
                (StatementKind::If(if_stmt), flow)
            }
            StatementKind::While(while_stmt) => {
                let (while_stmt, flow) = self.analyze_while_statement(while_stmt, span)?;
                (StatementKind::While(while_stmt), flow)
            }
            StatementKind::DoWhile(do_stmt) => {
                let (do_stmt, flow) = self.analyze_do_while_statement(do_stmt, span)?;
                (StatementKind::DoWhile(do_stmt), flow)
            }
            StatementKind::For(for_stmt) => {
                let (for_stmt, flow) = self.analyze_for_statement(for_stmt, span)?;
                (StatementKind::For(for_stmt), flow)
            }
            StatementKind::Block(block) => {
                let block = self.analyze_block(block, ctx.nested())?;
                let flow = block.flow;
                (StatementKind::Block(block), flow)
            }
            StatementKind::Break => (StatementKind::Break, self.analyze_break(span, ctx)?),
            StatementKind::Continue => (StatementKind::Continue, self.analyze_continue(span, ctx)?),
            StatementKind::Return(value) => {
                let (value, flow) = self.analyze_return(value)?;
                (StatementKind::Return(value), flow)
            }
        };

        Ok(Statement { kind, span, flow })
    }

    fn analyze_block(&mut self, block: Block, ctx: StatementContext) -> Result<Block> {
        self.symbols.push_scope();
        let analyzed = self.analyze_statements(block.statements, ctx);
        self.symbols.pop_scope();

        let (statements, flow) = analyzed?;
        Ok(Block {
            statements,
            span: block.span,
            flow,
        })
    }

    fn analyze_statements(
        &mut self,
        statements: Vec<Statement>,
        ctx: StatementContext,
    ) -> Result<(Vec<Statement>, ControlFlow)> {
        let count = statements.len();
        let mut flow = ControlFlow::default();
        let mut analyzed = Vec::with_capacity(count);

        for (index, statement) in statements.into_iter().enumerate() {
            if flow.all_escape {
                return Err(CompileError::new(
                    ErrorCode::UnreachableStatement,
                    "Unreachable statement",
                    statement.span,
                )
                .with_hint("the statement before this one never completes normally"));
            }

            let statement = self.analyze_statement(statement, ctx.child(index, count))?;

            // Escapes describe the sequence's last statement; the rest accumulate.
            flow.method_escape = statement.flow.method_escape;
            flow.loop_escape = statement.flow.loop_escape;
            flow.all_escape = statement.flow.all_escape;
            flow.any_continue |= statement.flow.any_continue;
            flow.any_break |= statement.flow.any_break;
            flow.statement_count = flow
                .statement_count
                .saturating_add(statement.flow.statement_count);

            analyzed.push(statement);
        }

        Ok((analyzed, flow))
    }

    fn analyze_declarations(&mut self, decl: DeclBlock) -> Result<DeclBlock> {
        let var_type = decl.var_type;
        let mut declarations = Vec::with_capacity(decl.declarations.len());

        for declaration in decl.declarations {
            let initializer = match declaration.initializer {
                Some(init) => Some(self.analyze_operand(init, var_type)?),
                None => None,
            };
            let symbol = self
                .symbols
                .declare(&declaration.name, var_type, declaration.span)?;

            declarations.push(Declaration {
                name: declaration.name,
                initializer,
                span: declaration.span,
                slot: Some(symbol.slot),
            });
        }

        Ok(DeclBlock {
            var_type,
            declarations,
            span: decl.span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Slot, Type};
    use crate::lexer::tokenize;
    use crate::parser::parse;
    use crate::settings::CompilerSettings;

    fn analyze_statements(source: &str) -> Result<(Vec<Statement>, ControlFlow)> {
        let tokens = tokenize(source)?;
        let program = parse(&tokens)?;
        Analyzer::new(&CompilerSettings::unbudgeted())
            .analyze_statements(program.statements, StatementContext::routine())
    }

    #[test]
    fn test_declarations_get_consecutive_slots() {
        let (statements, _) = analyze_statements("int a = 1, b; long c;").unwrap();
        match &statements[0].kind {
            StatementKind::Declaration(decl) => {
                assert_eq!(decl.declarations[0].slot, Some(Slot(0)));
                assert_eq!(decl.declarations[1].slot, Some(Slot(1)));
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
        match &statements[1].kind {
            StatementKind::Declaration(decl) => {
                assert_eq!(decl.var_type, Type::Long);
                assert_eq!(decl.declarations[0].slot, Some(Slot(2)));
            }
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_initializer_cannot_see_its_own_name() {
        let err = analyze_statements("int a = a;").unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredVariable);
    }

    #[test]
    fn test_duplicate_variable() {
        let err = analyze_statements("int a = 1; long a = 2;").unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateVariable);
    }

    #[test]
    fn test_shadowing_in_nested_block() {
        assert!(analyze_statements("int a = 1; { int a = 2; }").is_ok());
    }

    #[test]
    fn test_block_scope_ends() {
        let err = analyze_statements("{ int a = 1; } a = 2;").unwrap_err();
        assert_eq!(err.code, ErrorCode::UndeclaredVariable);
    }

    #[test]
    fn test_statement_counts_accumulate() {
        let (_, flow) = analyze_statements("int a = 1; a = 2; a++;").unwrap();
        assert_eq!(flow.statement_count, 3);
        assert!(!flow.all_escape);
    }

    #[test]
    fn test_return_escapes_sequence() {
        let (_, flow) = analyze_statements("int a = 1; return a;").unwrap();
        assert!(flow.method_escape);
        assert!(flow.all_escape);
    }

    #[test]
    fn test_statement_after_return_is_unreachable() {
        let err = analyze_statements("return 1; int a = 2;").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnreachableStatement);
    }
}
