use super::ast::{Expr, ExprKind, Function, Program, Stmt, StmtKind, Type};
use super::expr::{closing, find_depth0, ExprParser};
use super::parsercore::Parser;
use super::scope::{Symbol, SymbolKind};
use super::token::{Keyword, Token, TokenKind::*};
use crate::error::{Error, Result};
use crate::{check, expect, optional, repeat};

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn parse(mut self) -> Result<Program> {
        let body = self.parse_block()?;
        if let Some(token) = self.next() {
            return Err(Error::Syntax(
                token.pos.line,
                format!("unmatched {}", token.kind),
            ));
        }
        Ok(Program {
            body,
            symbols: self.scope.global().symbols(),
        })
    }
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Line of the next token
    fn here(&mut self) -> usize {
        match self.peek() {
            Some(token) => token.pos.line,
            None => self.line(),
        }
    }

    fn exprs(&self, line: usize) -> ExprParser<'_> {
        ExprParser::new(&self.scope, line)
    }

    fn parse_ident(&mut self) -> Result<String> {
        match expect!(self, Ident(_), "an identifier")?.kind {
            Ident(name) => Ok(name),
            _ => unreachable!(),
        }
    }

    /// type = "int" | "float" | "string" | "char" | "bool" | "[" "]" type
    fn parse_type(&mut self) -> Result<Type> {
        if optional!(self, LBracket).is_some() {
            expect!(self, RBracket, "']'")?;
            let elem = self.parse_type()?;
            return Ok(Type::Array(Box::new(elem)));
        }
        let token = self.expect_tobe(|t| matches!(&t.kind, Kw(kw) if kw.is_type()), "a type")?;
        match token.kind {
            Kw(Keyword::Int) => Ok(Type::Int),
            Kw(Keyword::Float) => Ok(Type::Float),
            Kw(Keyword::String) => Ok(Type::String),
            Kw(Keyword::Char) => Ok(Type::Char),
            Kw(Keyword::Bool) => Ok(Type::Bool),
            _ => unreachable!(),
        }
    }

    fn end_statement(&mut self) {
        optional!(self, Semicolon);
    }

    /// block = { stmt }, up to a closing '}' or the end of file
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        let mut body = Vec::new();
        while self.peek().is_some() && !check!(self, RCurly) {
            if let Some(stmt) = self.parse_stmt()? {
                body.push(stmt);
            }
        }
        Ok(body)
    }

    /// "{" block "}"
    fn parse_body(&mut self) -> Result<Vec<Stmt>> {
        expect!(self, LCurly, "'{'")?;
        let body = self.parse_block()?;
        expect!(self, RCurly, "'}'")?;
        Ok(body)
    }

    fn parse_stmt(&mut self) -> Result<Option<Stmt>> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        let stmt = match token.kind.clone() {
            Semicolon => {
                self.next();
                return Ok(None);
            }
            Kw(kw) if kw.is_type() => self.parse_declaration(false)?,
            LBracket => self.parse_declaration(false)?,
            Kw(Keyword::Global) => {
                self.next();
                if self.scope.in_function() {
                    return Err(self.syntax_error("global declarations are only allowed at top level"));
                }
                self.parse_declaration(true)?
            }
            Kw(Keyword::Func) => self.parse_function()?,
            Kw(Keyword::Write) => self.parse_write()?,
            Kw(Keyword::If) => self.parse_if()?,
            Kw(Keyword::Else) => {
                self.next();
                return Err(self.syntax_error("else without a preceding if"));
            }
            Kw(Keyword::For) => self.parse_for()?,
            Kw(Keyword::While) => self.parse_while()?,
            Kw(Keyword::Return) => self.parse_return()?,
            _ => {
                let line = self.here();
                let span = self.span(|kind| *kind == Semicolon)?;
                let stmt = self.parse_simple(&span, line)?;
                self.end_statement();
                stmt
            }
        };
        Ok(Some(stmt))
    }

    /// decl = type ident [ "=" expr ] ";"
    fn parse_declaration(&mut self, global: bool) -> Result<Stmt> {
        let line = self.here();
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        let init = optional!(self, Equal, {
            let span = self.span(|kind| *kind == Semicolon)?;
            self.exprs(line).parse(&span)?
        });
        if let Some(init) = &init {
            if !ty.accepts(&init.ty) {
                return Err(Error::Type(
                    line,
                    format!("cannot initialize {} {} with {}", ty, name, init.ty),
                ));
            }
        }
        let kind = match (&ty, global) {
            (_, true) => SymbolKind::Global,
            (Type::Array(_), false) => SymbolKind::Array,
            _ => SymbolKind::Variable,
        };
        self.scope.declare(line, Symbol::new(&name, kind, ty.clone()))?;
        self.end_statement();
        Ok(Stmt::new(line, StmtKind::Declare { name, ty, init }))
    }

    /// param = type ident
    fn parse_param(&mut self) -> Result<(String, Type)> {
        let ty = self.parse_type()?;
        let name = self.parse_ident()?;
        Ok((name, ty))
    }

    /// func = "func" ident "(" [ param { "," param } ] ")" [ type ] "{" block "}"
    fn parse_function(&mut self) -> Result<Stmt> {
        let line = self.here();
        expect!(self, Kw(Keyword::Func), "'func'")?;
        if self.scope.in_function() {
            return Err(self.syntax_error("functions may only be declared at global scope"));
        }
        let name = self.parse_ident()?;
        if self.scope.lookup(&name).is_some() {
            return Err(Error::Scope(line, format!("{} has already been declared", name)));
        }
        expect!(self, LParen, "'('")?;
        let params = repeat!(self, self.parse_param(), Comma, RParen);
        expect!(self, RParen, "')'")?;
        let ret = if check!(self, LCurly) {
            Type::Void
        } else {
            self.parse_type()?
        };

        self.scope.open_function();
        for (param, ty) in &params {
            let kind = match ty {
                Type::Array(_) => SymbolKind::Array,
                _ => SymbolKind::Variable,
            };
            self.scope.declare(line, Symbol::new(param, kind, ty.clone()))?;
        }
        self.func = Some((name.clone(), ret.clone()));
        let body = self.parse_body();
        self.func = None;
        let scope = self.scope.close_function();
        let body = body?;

        let sig = params.iter().map(|(_, ty)| ty.clone()).collect();
        self.scope
            .declare(line, Symbol::new(&name, SymbolKind::Function(sig), ret.clone()))?;
        Ok(Stmt::new(
            line,
            StmtKind::Function(Function {
                name,
                params,
                ret,
                body,
                symbols: scope.symbols(),
            }),
        ))
    }

    /// write = "write" "(" expr ")" ";"
    fn parse_write(&mut self) -> Result<Stmt> {
        let line = self.here();
        expect!(self, Kw(Keyword::Write), "'write'")?;
        expect!(self, LParen, "'('")?;
        let span = self.span(|_| false)?;
        expect!(self, RParen, "')'")?;
        let mut args = self.exprs(line).list(&span)?;
        if args.len() != 1 {
            return Err(Error::Syntax(
                line,
                format!("write expects 1 argument but got {}", args.len()),
            ));
        }
        let arg = args.remove(0);
        if !arg.ty.is_scalar() {
            return Err(Error::Type(line, format!("cannot write a value of type {}", arg.ty)));
        }
        self.end_statement();
        Ok(Stmt::new(line, StmtKind::Write(arg)))
    }

    /// "(" expr ")" where expr is bool
    fn parse_condition(&mut self) -> Result<Expr> {
        let line = self.here();
        expect!(self, LParen, "'('")?;
        let span = self.span(|_| false)?;
        expect!(self, RParen, "')'")?;
        self.check_condition(&span, line)
    }

    fn check_condition(&self, span: &[Token], line: usize) -> Result<Expr> {
        let cond = self.exprs(line).parse(span)?;
        if cond.ty != Type::Bool {
            return Err(Error::Type(
                line,
                format!("condition must be bool but is {}", cond.ty),
            ));
        }
        Ok(cond)
    }

    /// if = "if" "(" expr ")" "{" block "}" [ "else" ( if | "{" block "}" ) ]
    fn parse_if(&mut self) -> Result<Stmt> {
        let line = self.here();
        expect!(self, Kw(Keyword::If), "'if'")?;
        let cond = self.parse_condition()?;
        let then_body = self.parse_body()?;
        let else_body = match optional!(self, Kw(Keyword::Else)) {
            Some(_) if check!(self, Kw(Keyword::If)) => vec![self.parse_if()?],
            Some(_) => self.parse_body()?,
            None => Vec::new(),
        };
        Ok(Stmt::new(
            line,
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
        ))
    }

    /// for = "for" "(" [ decl | assign ] ";" expr ";" [ assign ] ")" "{" block "}"
    fn parse_for(&mut self) -> Result<Stmt> {
        let line = self.here();
        expect!(self, Kw(Keyword::For), "'for'")?;
        expect!(self, LParen, "'('")?;

        let init = if optional!(self, Semicolon).is_some() {
            None
        } else {
            match self.parse_stmt()? {
                Some(stmt @ Stmt {
                    kind: StmtKind::Declare { .. } | StmtKind::Assign { .. },
                    ..
                }) => Some(Box::new(stmt)),
                _ => return Err(self.syntax_error("for loop init must be a declaration or an assignment")),
            }
        };

        let cond_line = self.here();
        let span = self.span(|kind| *kind == Semicolon)?;
        expect!(self, Semicolon, "';'")?;
        let cond = self.check_condition(&span, cond_line)?;

        let step_line = self.here();
        let span = self.span(|_| false)?;
        let step = match span.is_empty() {
            true => None,
            false => match self.parse_simple(&span, step_line)? {
                stmt @ Stmt {
                    kind: StmtKind::Assign { .. },
                    ..
                } => Some(Box::new(stmt)),
                _ => return Err(Error::Syntax(step_line, "for loop step must be an assignment".to_string())),
            },
        };
        expect!(self, RParen, "')'")?;

        let body = self.parse_body()?;
        Ok(Stmt::new(
            line,
            StmtKind::For {
                init,
                cond,
                step,
                body,
            },
        ))
    }

    /// while = "while" "(" expr ")" "{" block "}"
    fn parse_while(&mut self) -> Result<Stmt> {
        let line = self.here();
        expect!(self, Kw(Keyword::While), "'while'")?;
        let cond = self.parse_condition()?;
        let body = self.parse_body()?;
        Ok(Stmt::new(line, StmtKind::While { cond, body }))
    }

    /// return = "return" expr ";"
    fn parse_return(&mut self) -> Result<Stmt> {
        let line = self.here();
        expect!(self, Kw(Keyword::Return), "'return'")?;
        let Some((func, ret)) = self.func.clone() else {
            return Err(Error::Syntax(line, "return outside of a function".to_string()));
        };
        let span = self.span(|kind| *kind == Semicolon)?;
        let value = self.exprs(line).parse(&span)?;
        if ret == Type::Void {
            return Err(Error::Type(
                line,
                format!("unexpected return in function {} which returns nothing", func),
            ));
        }
        if !ret.accepts(&value.ty) {
            return Err(Error::Type(
                line,
                format!("{} returns {} but the returned value is {}", func, ret, value.ty),
            ));
        }
        self.end_statement();
        Ok(Stmt::new(line, StmtKind::Return(value)))
    }

    /// simple = ident "=" expr | ident "(" [ expr { "," expr } ] ")"
    fn parse_simple(&self, span: &[Token], line: usize) -> Result<Stmt> {
        let exprs = self.exprs(line);

        if let Some(idx) = find_depth0(span, |kind| *kind == Equal) {
            let name = match &span[..idx] {
                [Token { kind: Ident(name), .. }] => name.clone(),
                _ => return Err(Error::Syntax(line, "invalid assignment target".to_string())),
            };
            let symbol = self.scope.resolve(line, &name)?;
            if let SymbolKind::Function(_) = symbol.kind {
                return Err(Error::Type(line, format!("cannot assign to function {}", name)));
            }
            let ty = symbol.ty.clone();
            let value = exprs.parse(&span[idx + 1..])?;
            if !ty.accepts(&value.ty) {
                return Err(Error::Type(
                    line,
                    format!("cannot assign {} to {} of type {}", value.ty, name, ty),
                ));
            }
            return Ok(Stmt::new(line, StmtKind::Assign { name, value }));
        }

        match span {
            [Token { kind: Ident(name), .. }, Token { kind: LParen, .. }, ..]
                if closing(span, 1) == Some(span.len() - 1) =>
            {
                let args = exprs.list(&span[2..span.len() - 1])?;
                exprs.check_call(name, &args)?;
                Ok(Stmt::new(line, StmtKind::Call(name.clone(), args)))
            }
            _ => {
                let expr = exprs.parse(span)?;
                match expr.kind {
                    ExprKind::Call(name, args) => Ok(Stmt::new(line, StmtKind::Call(name, args))),
                    _ => Err(Error::Syntax(
                        line,
                        "expression statement must be a call or an assignment".to_string(),
                    )),
                }
            }
        }
    }
}
