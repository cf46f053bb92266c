use super::storage::Storage;
use crate::compile::tac::{Instr, Operand};
use crate::error::{Error, Result};
use crate::grammer::ast::{BinaryOp, Literal, Type};
use mips::{FReg, Inst, Reg, Syscall};

/// Second emission pass: one instruction template per TAC line.
pub struct TextGen<'s> {
    storage: &'s Storage,
    text: Vec<Inst>,
}

fn slot(op: &Operand) -> Result<String> {
    op.slot()
        .ok_or_else(|| Error::Emit(format!("{} has no storage", op)))
}

impl<'s> TextGen<'s> {
    pub fn new(storage: &'s Storage) -> Self {
        Self {
            storage,
            text: Vec::new(),
        }
    }

    pub fn finish(mut self) -> Vec<Inst> {
        self.text.extend(Inst::syscall(Syscall::Exit));
        self.text
    }

    fn push(&mut self, inst: Inst) {
        self.text.push(inst);
    }

    /// Load an int, bool or char operand into a general register
    fn load(&mut self, reg: Reg, op: &Operand) -> Result<()> {
        let inst = match op {
            Operand::Const(Literal::Int(v)) => Inst::LI(reg, *v),
            Operand::Const(Literal::Bool(b)) => Inst::LI(reg, *b as i32),
            Operand::Const(Literal::Char(c)) => Inst::LI(reg, *c as i32),
            Operand::Var(..) | Operand::Temp(..) => match op.ty() {
                Type::Int | Type::Bool => Inst::LW(reg, slot(op)?),
                Type::Char => Inst::LB(reg, slot(op)?),
                ty => return Err(Error::Emit(format!("cannot load {} of type {}", op, ty))),
            },
            _ => return Err(Error::Emit(format!("cannot load {} into {}", op, reg))),
        };
        self.push(inst);
        Ok(())
    }

    fn store(&mut self, reg: Reg, dst: &Operand) -> Result<()> {
        let inst = match dst.ty() {
            Type::Char => Inst::SB(reg, slot(dst)?),
            _ => Inst::SW(reg, slot(dst)?),
        };
        self.push(inst);
        Ok(())
    }

    fn load_float(&mut self, reg: FReg, op: &Operand) -> Result<()> {
        let label = match op {
            Operand::Const(Literal::Float(v)) => self
                .storage
                .float_label(*v)
                .map(str::to_string)
                .ok_or_else(|| Error::Emit(format!("float constant {:?} was not pooled", v)))?,
            Operand::Var(..) | Operand::Temp(..) => slot(op)?,
            _ => return Err(Error::Emit(format!("cannot load {} into {}", op, reg))),
        };
        self.push(Inst::LS(reg, label));
        Ok(())
    }

    pub fn instr(&mut self, instr: &Instr) -> Result<()> {
        match instr {
            Instr::Copy { dst, src } => match dst.ty() {
                Type::Int | Type::Bool | Type::Char => {
                    self.load(Reg::T0, src)?;
                    self.store(Reg::T0, dst)?;
                }
                Type::Float => {
                    self.load_float(FReg::F0, src)?;
                    self.push(Inst::SS(FReg::F0, slot(dst)?));
                }
                // Initialised in the data section
                Type::String if matches!(src, Operand::Const(Literal::Str(_))) => {}
                ty => {
                    return Err(Error::Emit(format!(
                        "cannot copy {} into {} of type {}",
                        src, dst, ty
                    )))
                }
            },

            Instr::Binary { dst, op, lhs, rhs } => match lhs.ty() {
                Type::Int | Type::Bool | Type::Char => {
                    self.load(Reg::T0, lhs)?;
                    self.load(Reg::T1, rhs)?;
                    self.int_op(*op)?;
                    self.store(Reg::T2, dst)?;
                }
                Type::Float => {
                    self.load_float(FReg::F0, lhs)?;
                    self.load_float(FReg::F1, rhs)?;
                    self.float_op(*op, dst)?;
                }
                ty => {
                    return Err(Error::Emit(format!(
                        "operator '{}' on {} is not supported",
                        op, ty
                    )))
                }
            },

            Instr::Call { name, args } => match (name.as_str(), args.as_slice()) {
                ("write", [arg]) => self.write(arg)?,
                _ => return Err(Error::Emit(format!("unsupported call to {}", name))),
            },

            Instr::IfGoto { cond, label } => {
                self.load(Reg::T0, cond)?;
                self.push(Inst::BNE(Reg::T0, Reg::Zero, label.clone()));
            }
            Instr::Goto(label) => self.push(Inst::J(label.clone())),
            Instr::Label(label) => self.push(Inst::Label(label.clone())),

            Instr::FuncBegin(_) | Instr::FuncEnd | Instr::Return(_) => {
                return Err(Error::Emit(format!("unsupported instruction '{}'", instr)));
            }
        }
        Ok(())
    }

    /// `$t2 = $t0 op $t1`
    fn int_op(&mut self, op: BinaryOp) -> Result<()> {
        let (d, s, t) = (Reg::T2, Reg::T0, Reg::T1);
        match op {
            BinaryOp::Add => self.push(Inst::ADD(d, s, t)),
            BinaryOp::Sub => self.push(Inst::SUB(d, s, t)),
            BinaryOp::Mul => self.push(Inst::MUL(d, s, t)),
            BinaryOp::Div => {
                self.push(Inst::DIV(s, t));
                self.push(Inst::MFLO(d));
            }
            BinaryOp::Mod => {
                self.push(Inst::DIV(s, t));
                self.push(Inst::MFHI(d));
            }
            BinaryOp::Eq => self.push(Inst::SEQ(d, s, t)),
            BinaryOp::Ne => self.push(Inst::SNE(d, s, t)),
            BinaryOp::Lt => self.push(Inst::SLT(d, s, t)),
            BinaryOp::Le => self.push(Inst::SLE(d, s, t)),
            BinaryOp::Gt => self.push(Inst::SGT(d, s, t)),
            BinaryOp::Ge => self.push(Inst::SGE(d, s, t)),
        }
        Ok(())
    }

    /// `$f0 op $f1`, stored into `dst`
    fn float_op(&mut self, op: BinaryOp, dst: &Operand) -> Result<()> {
        let (d, s, t) = (FReg::F2, FReg::F0, FReg::F1);
        let arith = match op {
            BinaryOp::Add => Some(Inst::ADDS(d, s, t)),
            BinaryOp::Sub => Some(Inst::SUBS(d, s, t)),
            BinaryOp::Mul => Some(Inst::MULS(d, s, t)),
            BinaryOp::Div => Some(Inst::DIVS(d, s, t)),
            _ => None,
        };
        if let Some(inst) = arith {
            self.push(inst);
            self.push(Inst::SS(d, slot(dst)?));
            return Ok(());
        }

        // Comparisons set the FPU flag; movt copies $t1 into $t2 when it is set
        let (test, hit, miss) = match op {
            BinaryOp::Eq => (Inst::CEQS(s, t), 1, 0),
            BinaryOp::Ne => (Inst::CEQS(s, t), 0, 1),
            BinaryOp::Lt => (Inst::CLTS(s, t), 1, 0),
            BinaryOp::Le => (Inst::CLES(s, t), 1, 0),
            BinaryOp::Gt => (Inst::CLTS(t, s), 1, 0),
            BinaryOp::Ge => (Inst::CLES(t, s), 1, 0),
            _ => return Err(Error::Emit(format!("operator '{}' on float is not supported", op))),
        };
        self.push(Inst::LI(Reg::T2, miss));
        self.push(Inst::LI(Reg::T1, hit));
        self.push(test);
        self.push(Inst::MOVT(Reg::T2, Reg::T1));
        self.store(Reg::T2, dst)
    }

    fn write(&mut self, arg: &Operand) -> Result<()> {
        let service = match arg.ty() {
            Type::Int | Type::Bool => {
                self.load(Reg::A0, arg)?;
                Syscall::PrintInt
            }
            Type::Char => {
                self.load(Reg::A0, arg)?;
                Syscall::PrintChar
            }
            Type::Float => {
                self.load_float(FReg::F12, arg)?;
                Syscall::PrintFloat
            }
            Type::String => {
                self.push(Inst::LA(Reg::A0, slot(arg)?));
                Syscall::PrintString
            }
            ty => return Err(Error::Emit(format!("cannot write a value of type {}", ty))),
        };
        self.text.extend(Inst::syscall(service));
        Ok(())
    }
}
