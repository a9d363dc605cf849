use super::{Expression, FunctionCall, TypeDescriptor};
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    Return(Return),
    If(If),
    For(For),
    FunctionDeclaration(Rc<FunctionDeclaration>),
    Call(FunctionCall),
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::VariableDeclaration(stmt) => write!(f, "{}", stmt),
            Self::Assignment(stmt) => write!(f, "{}", stmt),
            Self::Return(stmt) => write!(f, "{}", stmt),
            Self::If(stmt) => write!(f, "{}", stmt),
            Self::For(stmt) => write!(f, "{}", stmt),
            Self::FunctionDeclaration(stmt) => write!(f, "{}", stmt),
            Self::Call(stmt) => write!(f, "{};", stmt),
        }
    }
}

impl Statement {
    /// Whether a `return` appears in this statement or any block nested in it.
    /// Function declarations are opaque: their returns belong to them.
    pub fn contains_return(&self) -> bool {
        match self {
            Self::Return(_) => true,
            Self::If(stmt) => {
                blocks_contain_return(&stmt.then_branch) || blocks_contain_return(&stmt.else_branch)
            }
            Self::For(stmt) => {
                stmt.init.contains_return()
                    || stmt.increment.contains_return()
                    || blocks_contain_return(&stmt.body)
            }
            _ => false,
        }
    }
}

fn blocks_contain_return(statements: &[Statement]) -> bool {
    statements.iter().any(Statement::contains_return)
}

fn write_block(f: &mut Formatter, statements: &[Statement]) -> fmt::Result {
    write!(f, "{{")?;
    for stmt in statements {
        write!(f, " {}", stmt)?;
    }
    write!(f, " }}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub declared_type: TypeDescriptor,
    pub initializer: Option<Expression>,
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "var {}: {}", self.name, self.declared_type)?;
        if let Some(init) = &self.initializer {
            write!(f, " = {}", init)?;
        }
        write!(f, ";")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: String,
    pub value: Expression,
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} = {};", self.target, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
}

impl Display for Return {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "return {};", value),
            None => write!(f, "return;"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub else_branch: Vec<Statement>,
}

impl Display for If {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "if {} ", self.condition)?;
        write_block(f, &self.then_branch)?;
        if !self.else_branch.is_empty() {
            write!(f, " else ")?;
            write_block(f, &self.else_branch)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub init: Box<Statement>,
    pub condition: Expression,
    pub increment: Box<Statement>,
    pub body: Vec<Statement>,
}

impl Display for For {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "for ({} {}; {}) ",
            self.init, self.condition, self.increment
        )?;
        write_block(f, &self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub declared_type: TypeDescriptor,
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.declared_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    /// `None` for functions that produce no value.
    pub return_type: Option<TypeDescriptor>,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let parameters: Vec<String> = self.parameters.iter().map(Parameter::to_string).collect();
        write!(f, "func {}({})", self.name, parameters.join(", "))?;
        if let Some(return_type) = &self.return_type {
            write!(f, ": {}", return_type)?;
        }
        write!(f, " ")?;
        write_block(f, &self.body)
    }
}
