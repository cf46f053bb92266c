use super::ast::{BinaryOp, Expr, ExprKind, Literal, Type};
use super::scope::{Resolver, SymbolKind};
use super::token::{Keyword, Token, TokenKind};
use crate::error::{Error, Result};

/// Operator class of a token and the operator it denotes.
/// Classes are scanned lowest number first; a span is split at the first
/// depth-0 occurrence of the first class present.
fn operator(kind: &TokenKind) -> Option<(usize, BinaryOp)> {
    use TokenKind::*;
    match kind {
        EqualEqual => Some((0, BinaryOp::Eq)),
        ExclEqual => Some((0, BinaryOp::Ne)),
        LAngle => Some((0, BinaryOp::Lt)),
        LAngleEqual => Some((0, BinaryOp::Le)),
        RAngle => Some((0, BinaryOp::Gt)),
        RAngleEqual => Some((0, BinaryOp::Ge)),
        Percent => Some((1, BinaryOp::Mod)),
        Star => Some((2, BinaryOp::Mul)),
        Slash => Some((2, BinaryOp::Div)),
        Plus => Some((3, BinaryOp::Add)),
        Minus => Some((3, BinaryOp::Sub)),
        _ => None,
    }
}

const CLASSES: usize = 4;

pub struct ExprParser<'r> {
    scope: &'r Resolver,
    line: usize,
}

impl<'r> ExprParser<'r> {
    pub fn new(scope: &'r Resolver, line: usize) -> Self {
        Self { scope, line }
    }

    fn syntax(&self, msg: String) -> Error {
        Error::Syntax(self.line, msg)
    }

    fn type_error(&self, msg: String) -> Error {
        Error::Type(self.line, msg)
    }

    pub fn parse(&self, span: &[Token]) -> Result<Expr> {
        let Some(first) = span.first() else {
            return Err(self.syntax("expected an expression".to_string()));
        };

        // 1. Literal
        if let Some(lit) = literal(span) {
            return Ok(Expr::literal(lit));
        }

        // 2. Grouping
        if first.kind == TokenKind::LParen && closing(span, 0) == Some(span.len() - 1) {
            return self.parse(&span[1..span.len() - 1]);
        }

        // 3. Binary operators
        if find_depth0(span, |kind| *kind == TokenKind::Equal).is_some() {
            return Err(self.syntax("unexpected '=' inside an expression".to_string()));
        }
        for class in 0..CLASSES {
            if let Some((idx, op)) = split_point(span, class) {
                let lhs = self.parse(&span[..idx])?;
                let rhs = self.parse(&span[idx + 1..])?;
                return self.binary(op, lhs, rhs);
            }
        }

        // 4. Unary minus on a non-literal operand: 0 - x
        if first.kind == TokenKind::Minus {
            let operand = self.parse(&span[1..])?;
            let zero = match operand.ty {
                Type::Int => Literal::Int(0),
                Type::Float => Literal::Float(0.0),
                ref ty => return Err(self.type_error(format!("cannot negate {}", ty))),
            };
            return self.binary(BinaryOp::Sub, Expr::literal(zero), operand);
        }

        // 5. Call, array literal, index, identifier
        match (&first.kind, span.get(1).map(|t| &t.kind)) {
            (TokenKind::Ident(name), Some(TokenKind::LParen))
                if closing(span, 1) == Some(span.len() - 1) =>
            {
                self.call(name, &span[2..span.len() - 1])
            }
            (TokenKind::Kw(Keyword::Write), _) => {
                Err(self.syntax("write cannot be used as a value".to_string()))
            }
            (TokenKind::LCurly, _) if closing(span, 0) == Some(span.len() - 1) => {
                self.array(&span[1..span.len() - 1])
            }
            (TokenKind::Ident(name), Some(TokenKind::LBracket))
                if closing(span, 1) == Some(span.len() - 1) =>
            {
                self.index(name, &span[2..span.len() - 1])
            }
            (TokenKind::Ident(name), None) => self.ident(name),
            (kind, _) => Err(self.syntax(format!("unexpected {} in expression", kind))),
        }
    }

    fn binary(&self, op: BinaryOp, lhs: Expr, rhs: Expr) -> Result<Expr> {
        if lhs.ty != rhs.ty {
            return Err(self.type_error(format!(
                "operands of '{}' have different types: {} and {}",
                op, lhs.ty, rhs.ty
            )));
        }
        let ty = lhs.ty.clone();
        let allowed = match op {
            BinaryOp::Add => matches!(ty, Type::Int | Type::Float | Type::String),
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => matches!(ty, Type::Int | Type::Float),
            BinaryOp::Mod => ty == Type::Int,
            BinaryOp::Eq | BinaryOp::Ne => ty.is_scalar(),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                matches!(ty, Type::Int | Type::Float | Type::Char)
            }
        };
        if !allowed {
            return Err(self.type_error(format!("operator '{}' is not defined for {}", op, ty)));
        }
        let ty = if op.is_comparison() { Type::Bool } else { ty };
        Ok(Expr::new(
            ty,
            ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)),
        ))
    }

    fn ident(&self, name: &str) -> Result<Expr> {
        let symbol = self.scope.resolve(self.line, name)?;
        if let SymbolKind::Function(_) = symbol.kind {
            return Err(self.type_error(format!("function {} used as a value", name)));
        }
        Ok(Expr::new(symbol.ty.clone(), ExprKind::Ident(name.to_string())))
    }

    /// Arguments: comma separated expressions
    pub fn list(&self, span: &[Token]) -> Result<Vec<Expr>> {
        if span.is_empty() {
            return Ok(Vec::new());
        }
        let mut items = Vec::new();
        let mut rest = span;
        while let Some(idx) = find_depth0(rest, |kind| *kind == TokenKind::Comma) {
            items.push(self.parse(&rest[..idx])?);
            rest = &rest[idx + 1..];
        }
        items.push(self.parse(rest)?);
        Ok(items)
    }

    fn call(&self, name: &str, span: &[Token]) -> Result<Expr> {
        let args = self.list(span)?;
        let ret = self.check_call(name, &args)?;
        if ret == Type::Void {
            return Err(self.type_error(format!("{} does not return a value", name)));
        }
        Ok(Expr::new(ret, ExprKind::Call(name.to_string(), args)))
    }

    /// Validate a call against the callee's signature, giving its return type
    pub fn check_call(&self, name: &str, args: &[Expr]) -> Result<Type> {
        let symbol = self.scope.resolve(self.line, name)?;
        let SymbolKind::Function(params) = &symbol.kind else {
            return Err(self.type_error(format!("{} is not a function", name)));
        };
        if params.len() != args.len() {
            return Err(self.syntax(format!(
                "{} expects {} arguments but got {}",
                name,
                params.len(),
                args.len()
            )));
        }
        for (idx, (param, arg)) in params.iter().zip(args).enumerate() {
            if !param.accepts(&arg.ty) {
                return Err(self.type_error(format!(
                    "argument {} of {} must be {} but is {}",
                    idx + 1,
                    name,
                    param,
                    arg.ty
                )));
            }
        }
        Ok(symbol.ty.clone())
    }

    fn array(&self, span: &[Token]) -> Result<Expr> {
        let elems = self.list(span)?;
        let elem_ty = match elems.first() {
            Some(first) => first.ty.clone(),
            None => Type::Any,
        };
        if let Some(bad) = elems.iter().find(|e| e.ty != elem_ty) {
            return Err(self.type_error(format!(
                "array elements must all be {} but found {}",
                elem_ty, bad.ty
            )));
        }
        Ok(Expr::new(
            Type::Array(Box::new(elem_ty)),
            ExprKind::Array(elems),
        ))
    }

    fn index(&self, name: &str, span: &[Token]) -> Result<Expr> {
        let symbol = self.scope.resolve(self.line, name)?;
        let Type::Array(elem) = &symbol.ty else {
            return Err(self.type_error(format!("{} is not an array", name)));
        };
        let elem = (**elem).clone();
        let idx = self.parse(span)?;
        if idx.ty != Type::Int {
            return Err(self.type_error(format!("array index must be int but is {}", idx.ty)));
        }
        Ok(Expr::new(
            elem,
            ExprKind::Index(name.to_string(), Box::new(idx)),
        ))
    }
}

fn literal(span: &[Token]) -> Option<Literal> {
    match span {
        [tok] => match &tok.kind {
            TokenKind::Int(v) => Some(Literal::Int(*v)),
            TokenKind::Float(v) => Some(Literal::Float(*v)),
            TokenKind::Text(s) => Some(Literal::Str(s.clone())),
            TokenKind::Char(c) => Some(Literal::Char(*c)),
            TokenKind::Bool(b) => Some(Literal::Bool(*b)),
            _ => None,
        },
        [minus, tok] if minus.kind == TokenKind::Minus => match &tok.kind {
            TokenKind::Int(v) => Some(Literal::Int(v.wrapping_neg())),
            TokenKind::Float(v) => Some(Literal::Float(-v)),
            _ => None,
        },
        _ => None,
    }
}

/// Index of the bracket closing the one opened at `open`
pub(crate) fn closing(span: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, tok) in span.iter().enumerate().skip(open) {
        if tok.kind.is_open() {
            depth += 1;
        } else if tok.kind.is_close() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

pub(crate) fn find_depth0<F: Fn(&TokenKind) -> bool>(span: &[Token], pred: F) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, tok) in span.iter().enumerate() {
        if tok.kind.is_open() {
            depth += 1;
        } else if tok.kind.is_close() {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && pred(&tok.kind) {
            return Some(idx);
        }
    }
    None
}

/// First binary occurrence of an operator of `class`.
/// A `-` at the start or right after another operator is a sign, not a split point.
fn split_point(span: &[Token], class: usize) -> Option<(usize, BinaryOp)> {
    let mut depth = 0usize;
    for (idx, tok) in span.iter().enumerate() {
        if tok.kind.is_open() {
            depth += 1;
            continue;
        }
        if tok.kind.is_close() {
            depth = depth.saturating_sub(1);
            continue;
        }
        if depth != 0 {
            continue;
        }
        let Some((_, op)) = operator(&tok.kind).filter(|(c, _)| *c == class) else {
            continue;
        };
        let unary = idx == 0 || operator(&span[idx - 1].kind).is_some();
        if tok.kind == TokenKind::Minus && unary {
            continue;
        }
        return Some((idx, op));
    }
    None
}
