use crate::compile::tac::{Instr, Operand, Tac};
use crate::error::{Error, Result};
use crate::grammer::ast::{Literal, Type};
use bimap::BiMap;
use indexmap::IndexMap;
use mips::{DataDecl, Directive};

/// First emission pass: every slot the code touches, plus pooled float constants.
#[derive(Debug, Default)]
pub struct Storage {
    slots: IndexMap<String, Directive>,
    /// Label and bit pattern of each float constant
    floats: BiMap<String, u64>,
}

fn initial(op: &Operand, slot: &str) -> Result<Directive> {
    match op.ty() {
        Type::Int | Type::Bool => Ok(Directive::Word(0)),
        Type::Float => Ok(Directive::Float(0.0)),
        Type::Char => Ok(Directive::Byte(0)),
        Type::String => Ok(Directive::Asciiz(String::new())),
        ty => Err(Error::Emit(format!("cannot allocate {} of type {}", slot, ty))),
    }
}

impl Storage {
    pub fn collect(tac: &Tac) -> Result<Self> {
        let mut storage = Storage::default();
        let mut strings: IndexMap<String, String> = IndexMap::new();

        for instr in &tac.0 {
            for op in instr.operands() {
                storage.visit(op)?;
            }

            // String slots are filled in the data section
            if let Instr::Copy {
                dst,
                src: Operand::Const(Literal::Str(text)),
            } = instr
            {
                let Some(slot) = dst.slot() else { continue };
                match strings.get(&slot) {
                    Some(prev) if prev != text => {
                        return Err(Error::Emit(format!(
                            "{} is assigned both {:?} and {:?}",
                            dst, prev, text
                        )));
                    }
                    _ => {
                        strings.insert(slot.clone(), text.clone());
                        storage.slots.insert(slot, Directive::Asciiz(text.clone()));
                    }
                }
            }
        }
        Ok(storage)
    }

    fn visit(&mut self, op: &Operand) -> Result<()> {
        match op {
            Operand::Var(..) | Operand::Temp(..) => {
                let Some(slot) = op.slot() else { return Ok(()) };
                if !self.slots.contains_key(&slot) {
                    let directive = initial(op, &slot)?;
                    self.slots.insert(slot, directive);
                }
            }
            Operand::Const(Literal::Float(v)) => {
                if !self.floats.contains_right(&v.to_bits()) {
                    let label = format!("flt_{}", self.floats.len());
                    self.floats.insert(label, v.to_bits());
                }
            }
            Operand::Const(_) => {}
            Operand::Aggregate(_, ty) => {
                return Err(Error::Emit(format!("cannot allocate array storage of type {}", ty)));
            }
        }
        Ok(())
    }

    pub fn float_label(&self, value: f64) -> Option<&str> {
        self.floats.get_by_right(&value.to_bits()).map(|s| s.as_str())
    }

    /// Data section ordered for alignment: words and floats, bytes, then strings
    pub fn data(&self) -> Vec<DataDecl> {
        let mut decls: Vec<DataDecl> = self
            .slots
            .iter()
            .map(|(label, d)| DataDecl::new(label.clone(), d.clone()))
            .collect();
        let mut pool: Vec<(&String, &u64)> = self.floats.iter().collect();
        pool.sort_by_key(|(label, _)| label[4..].parse::<usize>().unwrap_or(0));
        decls.extend(
            pool.into_iter()
                .map(|(label, bits)| DataDecl::new(label.clone(), Directive::Float(f64::from_bits(*bits)))),
        );
        decls.sort_by_key(|decl| decl.directive.align());
        decls
    }
}
