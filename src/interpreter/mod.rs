mod ops;
#[cfg(test)]
mod tests;

use crate::ast::{
    ArrayAccess, Assignment, Expression, For, FunctionCall, FunctionDeclaration, If, Program,
    Return, Statement, VariableDeclaration,
};
use crate::config::Config;
use crate::environment::{Environment, State, Variable};
use crate::value::{Result, RuntimeError, Value};
use log::{debug, trace};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::rc::Rc;

/// How a statement finished: fell through, or hit a `return`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    Normal,
    Return(Option<Value>),
}

pub struct Interpreter {
    functions: HashMap<String, Rc<FunctionDeclaration>>,
    env: Environment,
    config: Config,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            functions: HashMap::new(),
            env: Environment::new(),
            config,
        }
    }

    /// Runs every statement of the program and returns the global variables.
    ///
    /// Declarations made before a failing statement stay visible through
    /// [`Interpreter::state`], so a prompt can keep going after an error.
    pub fn interpret(&mut self, program: &Program) -> Result<State> {
        trace!("interpreting {} statements", program.statements.len());
        self.execute_statements(&program.statements)?;
        Ok(self.state())
    }

    pub fn state(&self) -> State {
        self.env.globals()
    }

    fn execute(&mut self, stmt: &Statement) -> Result<ExecResult> {
        match stmt {
            Statement::VariableDeclaration(decl) => self.execute_variable_declaration(decl),
            Statement::Assignment(assignment) => self.execute_assignment(assignment),
            Statement::FunctionDeclaration(function) => self.declare_function(function),
            Statement::Call(call) => {
                self.call_function(call)?;
                Ok(ExecResult::Normal)
            }
            Statement::If(stmt) => self.execute_if(stmt),
            Statement::For(stmt) => self.execute_for(stmt),
            Statement::Return(stmt) => self.execute_return(stmt),
        }
    }

    fn execute_statements(&mut self, statements: &[Statement]) -> Result<ExecResult> {
        for stmt in statements {
            if let ExecResult::Return(value) = self.execute(stmt)? {
                return Ok(ExecResult::Return(value));
            }
        }
        Ok(ExecResult::Normal)
    }

    fn execute_variable_declaration(&mut self, decl: &VariableDeclaration) -> Result<ExecResult> {
        if self.env.declared_in_frame(&decl.name) {
            return Err(RuntimeError::VariableRedeclared {
                name: decl.name.clone(),
            });
        }

        let value = match &decl.initializer {
            Some(initializer) => {
                let value = self.evaluate(initializer)?;
                if !value.conforms_to(&decl.declared_type) {
                    return Err(RuntimeError::DeclarationTypeMismatch {
                        name: decl.name.clone(),
                        expected: decl.declared_type.to_string(),
                        found: value.type_name(),
                    });
                }
                value
            }
            None => Value::default_for(&decl.declared_type),
        };

        debug!(
            "declared variable: {} {} = {}",
            decl.declared_type, decl.name, value
        );
        self.env.declare(Variable::new(
            decl.name.clone(),
            decl.declared_type.clone(),
            value,
        ))?;
        Ok(ExecResult::Normal)
    }

    fn execute_assignment(&mut self, assignment: &Assignment) -> Result<ExecResult> {
        if self.env.get(&assignment.target).is_none() {
            return Err(RuntimeError::UndefinedVariable {
                name: assignment.target.clone(),
            });
        }

        let value = self.evaluate(&assignment.value)?;
        debug!("assigned: {} = {}", assignment.target, value);
        self.env.assign(&assignment.target, value)?;
        Ok(ExecResult::Normal)
    }

    fn declare_function(&mut self, function: &Rc<FunctionDeclaration>) -> Result<ExecResult> {
        if self.functions.contains_key(&function.name) {
            return Err(RuntimeError::FunctionRedeclared {
                name: function.name.clone(),
            });
        }

        debug!("declared function: {}", function.name);
        self.functions
            .insert(function.name.clone(), Rc::clone(function));
        Ok(ExecResult::Normal)
    }

    fn execute_if(&mut self, stmt: &If) -> Result<ExecResult> {
        if self.evaluate_condition(&stmt.condition)? {
            self.execute_statements(&stmt.then_branch)
        } else {
            self.execute_statements(&stmt.else_branch)
        }
    }

    /// Variables a loop declares, in its init clause or its body, belong to the
    /// loop: body declarations are released after every iteration and the init
    /// declarations once the loop ends. Everything else shares the frame, so
    /// redeclaring a name that already exists there still fails.
    fn execute_for(&mut self, stmt: &For) -> Result<ExecResult> {
        let outside = self.env.declared_names();
        let result = self.run_loop(stmt);
        self.env.release_except(&outside);
        result
    }

    fn run_loop(&mut self, stmt: &For) -> Result<ExecResult> {
        if let ExecResult::Return(value) = self.execute(&stmt.init)? {
            return Ok(ExecResult::Return(value));
        }

        let loop_variables = self.env.declared_names();
        while self.evaluate_condition(&stmt.condition)? {
            let outcome = self.execute_statements(&stmt.body);
            self.env.release_except(&loop_variables);
            if let ExecResult::Return(value) = outcome? {
                return Ok(ExecResult::Return(value));
            }
            if let ExecResult::Return(value) = self.execute(&stmt.increment)? {
                return Ok(ExecResult::Return(value));
            }
        }

        Ok(ExecResult::Normal)
    }

    fn execute_return(&mut self, stmt: &Return) -> Result<ExecResult> {
        if self.env.call_depth() == 0 {
            return Err(RuntimeError::ReturnOutsideFunction);
        }

        let value = match &stmt.value {
            Some(expr) => Some(self.evaluate(expr)?),
            None => None,
        };
        Ok(ExecResult::Return(value))
    }

    fn evaluate_condition(&mut self, condition: &Expression) -> Result<bool> {
        match self.evaluate(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::NonBooleanCondition {
                found: other.type_name(),
            }),
        }
    }

    /// Invokes a user function in a fresh frame. Yields `None` for functions
    /// without a return type.
    fn call_function(&mut self, call: &FunctionCall) -> Result<Option<Value>> {
        let function = self.functions.get(&call.name).cloned().ok_or_else(|| {
            RuntimeError::UndefinedFunction {
                name: call.name.clone(),
            }
        })?;

        let arguments = call
            .arguments
            .iter()
            .map(|argument| self.evaluate(argument))
            .collect::<Result<Vec<Value>>>()?;

        if function.parameters.len() != arguments.len() {
            return Err(RuntimeError::ArityMismatch {
                function: function.name.clone(),
                expected: function.parameters.len(),
                found: arguments.len(),
            });
        }

        for (parameter, argument) in function.parameters.iter().zip(arguments.iter()) {
            if !argument.conforms_to(&parameter.declared_type) {
                return Err(RuntimeError::ArgumentTypeMismatch {
                    function: function.name.clone(),
                    parameter: parameter.name.clone(),
                    expected: parameter.declared_type.to_string(),
                    found: argument.type_name(),
                });
            }
        }

        if self.env.call_depth() >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            });
        }

        debug!("calling {} with {} arguments", function.name, arguments.len());
        self.env.push_frame();
        let outcome = self.run_function(&function, arguments);
        self.env.pop_frame();

        let returned = match outcome? {
            ExecResult::Return(value) => value,
            ExecResult::Normal => None,
        };

        match (&function.return_type, returned) {
            (Some(return_type), Some(value)) => {
                if !value.conforms_to(return_type) {
                    return Err(RuntimeError::ReturnTypeMismatch {
                        function: function.name.clone(),
                        expected: return_type.to_string(),
                        found: value.type_name(),
                    });
                }
                debug!("{} returned {}", function.name, value);
                Ok(Some(value))
            }
            (Some(_), None) => Err(RuntimeError::MissingReturnValue {
                function: function.name.clone(),
            }),
            (None, Some(value)) => Err(RuntimeError::ReturnTypeMismatch {
                function: function.name.clone(),
                expected: "void".to_owned(),
                found: value.type_name(),
            }),
            (None, None) => Ok(None),
        }
    }

    fn run_function(
        &mut self,
        function: &FunctionDeclaration,
        arguments: Vec<Value>,
    ) -> Result<ExecResult> {
        for (parameter, value) in function.parameters.iter().zip(arguments) {
            self.env.declare(Variable::new(
                parameter.name.clone(),
                parameter.declared_type.clone(),
                value,
            ))?;
        }
        self.execute_statements(&function.body)
    }

    fn evaluate(&mut self, expr: &Expression) -> Result<Value> {
        match expr {
            Expression::Literal(literal) => Ok(Value::from_literal(&literal.raw)),
            Expression::Array(array) => array
                .elements
                .iter()
                .map(|element| self.evaluate(element))
                .collect::<Result<Vec<Value>>>()
                .map(Value::Array),
            Expression::Identifier(identifier) => self
                .env
                .get(&identifier.name)
                .map(|variable| variable.value.clone())
                .ok_or_else(|| RuntimeError::UndefinedVariable {
                    name: identifier.name.clone(),
                }),
            Expression::Index(access) => self.evaluate_index(access),
            Expression::Unary(unary) => {
                let operand = self.evaluate(&unary.operand)?;
                ops::unary(unary.operator, operand)
            }
            Expression::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                ops::binary(binary.operator, left, right)
            }
            Expression::Call(call) => {
                self.call_function(call)?
                    .ok_or_else(|| RuntimeError::VoidValue {
                        function: call.name.clone(),
                    })
            }
        }
    }

    fn evaluate_index(&mut self, access: &ArrayAccess) -> Result<Value> {
        let mut elements = match self.evaluate(&access.array)? {
            Value::Array(elements) => elements,
            other => {
                return Err(RuntimeError::NotAnArray {
                    target: access.array.to_string(),
                    found: other.type_name(),
                })
            }
        };

        let index = match self.evaluate(&access.index)? {
            Value::Int(index) => index,
            other => {
                return Err(RuntimeError::NonIntegerIndex {
                    found: other.type_name(),
                })
            }
        };

        let length = elements.len();
        let position = usize::try_from(index)
            .ok()
            .filter(|&position| position < length)
            .ok_or(RuntimeError::IndexOutOfRange { index, length })?;
        Ok(elements.swap_remove(position))
    }
}
