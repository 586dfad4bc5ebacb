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

//! Control flow analysis for the semantic analyzer.
//!
//! This module provides control flow statement analysis:
//! - If/else statements
//! - While, do-while and for loops
//! - Break, continue and return
//!
//! Loops are where the budget is wired in: every analyzed loop records
//! whether its condition is always true, and claims the routine's budget
//! counter slot when budgeting is enabled.

use tracing::debug;

use super::context::StatementContext;
use super::expressions::ExpressionAnalyzer;
use super::statements::{plain_flow, StatementAnalyzer};
use super::symbol_table::LOOP_COUNTER;
use super::Analyzer;
use crate::ast::{
    Block, ControlFlow, DoWhileStatement, Expr, ForInit, ForStatement, IfStatement, Slot,
    Type, WhileStatement,
};
use crate::error::{CompileError, ErrorCode, Result, Span};
use crate::settings::CompilerSettings;

/// Extension trait for control flow analysis.
pub trait ControlFlowAnalyzer {
    /// Analyze an if statement.
    fn analyze_if_statement(
        &mut self,
        stmt: IfStatement,
        span: Span,
        ctx: StatementContext,
    ) -> Result<(IfStatement, ControlFlow)>;

    /// Analyze a while loop.
    fn analyze_while_statement(
        &mut self,
        stmt: WhileStatement,
        span: Span,
    ) -> Result<(WhileStatement, ControlFlow)>;

    /// Analyze a do-while loop.
    fn analyze_do_while_statement(
        &mut self,
        stmt: DoWhileStatement,
        span: Span,
    ) -> Result<(DoWhileStatement, ControlFlow)>;

    /// Analyze a for loop.
    fn analyze_for_statement(
        &mut self,
        stmt: ForStatement,
        span: Span,
    ) -> Result<(ForStatement, ControlFlow)>;

    /// Analyze a break statement.
    fn analyze_break(&mut self, span: Span, ctx: StatementContext) -> Result<ControlFlow>;

    /// Analyze a continue statement.
    fn analyze_continue(&mut self, span: Span, ctx: StatementContext) -> Result<ControlFlow>;

    /// Analyze a return statement.
    fn analyze_return(&mut self, value: Option<Expr>) -> Result<(Option<Expr>, ControlFlow)>;
}

fn extraneous_loop(keyword: &str, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::ExtraneousLoop,
        format!("Extraneous {} loop", keyword),
        span,
    )
}

fn no_escape(keyword: &str, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::NoEscape,
        format!("No paths escape from the {} loop", keyword),
        span,
    )
    .with_hint("the loop has no body and nothing stops it from repeating")
}

fn extraneous_if(message: &str, span: Span) -> CompileError {
    CompileError::new(ErrorCode::ExtraneousIf, message, span)
}

/// Flow of a loop statement: one budget unit, escaping only when it never ends.
fn loop_flow(escapes: bool) -> ControlFlow {
    ControlFlow {
        method_escape: escapes,
        all_escape: escapes,
        ..plain_flow()
    }
}

impl Analyzer {
    /// Counter slot for a loop configured with `settings`.
    fn claim_loop_counter(&self, settings: &CompilerSettings) -> Option<Slot> {
        if !settings.budget_enabled() {
            return None;
        }
        self.symbols.get_reserved(LOOP_COUNTER).map(|symbol| symbol.slot)
    }

    /// Analyze a loop body block, rejecting bodies that can never repeat.
    fn analyze_loop_body(&mut self, body: Block, keyword: &str) -> Result<Block> {
        let mut body = self.analyze_block(body, StatementContext::loop_body())?;

        if body.flow.loop_escape && !body.flow.any_continue {
            return Err(extraneous_loop(keyword, body.span)
                .with_hint("every path through the body leaves the loop, so it never repeats"));
        }

        body.flow.statement_count = body.flow.statement_count.max(1);
        Ok(body)
    }

    /// Fold a constant loop condition into the `continuous` flag.
    ///
    /// Returns `true` when the condition is the constant `true`.
    fn check_loop_condition(&self, condition: &Expr, keyword: &str) -> Result<bool> {
        match condition.constant.and_then(|c| c.as_bool()) {
            Some(false) => Err(extraneous_loop(keyword, condition.span)
                .with_hint("the condition is always false, so the body never runs")),
            Some(true) => Ok(true),
            None => Ok(false),
        }
    }

    fn analyze_for_scoped(
        &mut self,
        stmt: ForStatement,
        span: Span,
    ) -> Result<(ForStatement, ControlFlow)> {
        let ForStatement {
            initializer,
            condition,
            afterthought,
            body,
            settings,
            ..
        } = stmt;

        let initializer = match initializer {
            Some(ForInit::Declaration(decl)) => {
                Some(ForInit::Declaration(self.analyze_declarations(decl)?))
            }
            Some(ForInit::Expression(expr)) => {
                Some(ForInit::Expression(self.analyze_statement_expression(expr)?))
            }
            None => None,
        };

        let (condition, continuous) = match condition {
            Some(condition) => {
                let condition = self.analyze_condition(condition)?;
                let continuous = self.check_loop_condition(&condition, "for")?;
                if continuous && body.is_none() {
                    return Err(no_escape("for", span));
                }
                (Some(condition), continuous)
            }
            None => (None, true),
        };

        let afterthought = afterthought
            .map(|expr| self.analyze_statement_expression(expr))
            .transpose()?;

        if body.is_none() && condition.is_none() && afterthought.is_none() {
            return Err(no_escape("for", span));
        }

        let mut escapes = false;
        let body = match body {
            Some(body) => {
                let body = self.analyze_loop_body(body, "for")?;
                escapes = continuous && !body.flow.any_break;
                Some(body)
            }
            None => None,
        };

        let loop_counter = self.claim_loop_counter(&settings);
        debug!(
            continuous,
            counter = ?loop_counter,
            body_count = body.as_ref().map_or(0, |b| b.flow.statement_count),
            "analyzed for loop"
        );

        Ok((
            ForStatement {
                initializer,
                condition,
                afterthought,
                body,
                continuous,
                loop_counter,
                settings,
            },
            loop_flow(escapes),
        ))
    }

    fn analyze_while_scoped(
        &mut self,
        stmt: WhileStatement,
        span: Span,
    ) -> Result<(WhileStatement, ControlFlow)> {
        let WhileStatement {
            condition,
            body,
            settings,
            ..
        } = stmt;

        let condition = self.analyze_condition(condition)?;
        let continuous = self.check_loop_condition(&condition, "while")?;
        if continuous && body.is_none() {
            return Err(no_escape("while", span));
        }

        let mut escapes = false;
        let body = match body {
            Some(body) => {
                let body = self.analyze_loop_body(body, "while")?;
                escapes = continuous && !body.flow.any_break;
                Some(body)
            }
            None => None,
        };

        let loop_counter = self.claim_loop_counter(&settings);
        debug!(continuous, counter = ?loop_counter, "analyzed while loop");

        Ok((
            WhileStatement {
                condition,
                body,
                continuous,
                loop_counter,
                settings,
            },
            loop_flow(escapes),
        ))
    }

    fn analyze_do_while_scoped(
        &mut self,
        stmt: DoWhileStatement,
        span: Span,
    ) -> Result<(DoWhileStatement, ControlFlow)> {
        let DoWhileStatement {
            body,
            condition,
            settings,
            ..
        } = stmt;

        if body.is_empty() {
            return Err(extraneous_loop("do-while", span).with_hint("the body is empty"));
        }

        let body = self.analyze_loop_body(body, "do-while")?;
        let condition = self.analyze_condition(condition)?;
        let continuous = self.check_loop_condition(&condition, "do-while")?;
        let escapes = continuous && !body.flow.any_break;

        let loop_counter = self.claim_loop_counter(&settings);
        debug!(continuous, counter = ?loop_counter, "analyzed do-while loop");

        Ok((
            DoWhileStatement {
                body,
                condition,
                continuous,
                loop_counter,
                settings,
            },
            loop_flow(escapes),
        ))
    }
}

impl ControlFlowAnalyzer for Analyzer {
    fn analyze_if_statement(
        &mut self,
        stmt: IfStatement,
        span: Span,
        ctx: StatementContext,
    ) -> Result<(IfStatement, ControlFlow)> {
        let condition = self.analyze_condition(stmt.condition)?;
        if let Some(value) = condition.constant {
            return Err(extraneous_if("Extraneous if statement", condition.span)
                .with_hint(format!("the condition is always {}", value)));
        }
        if stmt.then_branch.is_empty() {
            return Err(extraneous_if("If statement has an empty body", span));
        }

        let then_branch = self.analyze_block(stmt.then_branch, ctx.nested())?;

        let (else_branch, flow) = match stmt.else_branch {
            None => {
                let flow = ControlFlow {
                    any_continue: then_branch.flow.any_continue,
                    any_break: then_branch.flow.any_break,
                    statement_count: then_branch.flow.statement_count,
                    ..ControlFlow::default()
                };
                (None, flow)
            }
            Some(else_branch) if else_branch.is_empty() => {
                return Err(extraneous_if("Else branch is empty", else_branch.span));
            }
            Some(else_branch) => {
                let else_branch = self.analyze_block(else_branch, ctx.nested())?;
                let (t, e) = (then_branch.flow, else_branch.flow);
                let flow = ControlFlow {
                    method_escape: t.method_escape && e.method_escape,
                    loop_escape: t.loop_escape && e.loop_escape,
                    all_escape: t.all_escape && e.all_escape,
                    any_continue: t.any_continue || e.any_continue,
                    any_break: t.any_break || e.any_break,
                    statement_count: t.statement_count.max(e.statement_count),
                };
                (Some(else_branch), flow)
            }
        };

        Ok((
            IfStatement {
                condition,
                then_branch,
                else_branch,
            },
            flow,
        ))
    }

    fn analyze_while_statement(
        &mut self,
        stmt: WhileStatement,
        span: Span,
    ) -> Result<(WhileStatement, ControlFlow)> {
        self.symbols.push_scope();
        let analyzed = self.analyze_while_scoped(stmt, span);
        self.symbols.pop_scope();
        analyzed
    }

    fn analyze_do_while_statement(
        &mut self,
        stmt: DoWhileStatement,
        span: Span,
    ) -> Result<(DoWhileStatement, ControlFlow)> {
        self.symbols.push_scope();
        let analyzed = self.analyze_do_while_scoped(stmt, span);
        self.symbols.pop_scope();
        analyzed
    }

    fn analyze_for_statement(
        &mut self,
        stmt: ForStatement,
        span: Span,
    ) -> Result<(ForStatement, ControlFlow)> {
        self.symbols.push_scope();
        let analyzed = self.analyze_for_scoped(stmt, span);
        self.symbols.pop_scope();
        analyzed
    }

    fn analyze_break(&mut self, span: Span, ctx: StatementContext) -> Result<ControlFlow> {
        if !ctx.in_loop {
            return Err(CompileError::new(
                ErrorCode::BreakOutsideLoop,
                "'break' outside of a loop",
                span,
            ));
        }

        Ok(ControlFlow {
            loop_escape: true,
            all_escape: true,
            any_break: true,
            ..plain_flow()
        })
    }

    fn analyze_continue(&mut self, span: Span, ctx: StatementContext) -> Result<ControlFlow> {
        if !ctx.in_loop {
            return Err(CompileError::new(
                ErrorCode::ContinueOutsideLoop,
                "'continue' outside of a loop",
                span,
            ));
        }
        if ctx.last_loop {
            return Err(CompileError::new(
                ErrorCode::ExtraneousContinue,
                "Extraneous continue statement",
                span,
            )
            .with_hint("the loop continues here anyway"));
        }

        Ok(ControlFlow {
            all_escape: true,
            any_continue: true,
            ..plain_flow()
        })
    }

    fn analyze_return(&mut self, value: Option<Expr>) -> Result<(Option<Expr>, ControlFlow)> {
        let value = match value {
            Some(value) => {
                let value = self.analyze_expression(value)?;
                if value.actual == Some(Type::Void) {
                    return Err(CompileError::new(
                        ErrorCode::TypeMismatch,
                        "Cannot return a void value",
                        value.span,
                    ));
                }
                Some(value)
            }
            None => None,
        };

        Ok((
            value,
            ControlFlow {
                method_escape: true,
                loop_escape: true,
                all_escape: true,
                ..plain_flow()
            },
        ))
    }
}
