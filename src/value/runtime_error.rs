use crate::ast::{Operator, UnaryOperator};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub RuntimeError

    VariableRedeclared{name: String} = "variable '{name}' is already declared",
    FunctionRedeclared{name: String} = "function '{name}' is already declared",
    UndefinedVariable{name: String} = "variable '{name}' is not defined",
    UndefinedFunction{name: String} = "function '{name}' is not defined",
    DeclarationTypeMismatch{name: String, expected: String, found: String} = "type mismatch: variable '{name}' of type '{expected}' cannot be initialised with a value of type '{found}'",
    AssignmentTypeMismatch{name: String, expected: String, found: String} = "type mismatch: cannot assign a value of type '{found}' to variable '{name}' of type '{expected}'",
    ArgumentTypeMismatch{function: String, parameter: String, expected: String, found: String} = "type mismatch: parameter '{parameter}' of function '{function}' expects '{expected}', got '{found}'",
    ReturnTypeMismatch{function: String, expected: String, found: String} = "type mismatch: function '{function}' returns '{expected}', got '{found}'",
    ArityMismatch{function: String, expected: usize, found: usize} = "function '{function}' expects {expected} arguments, but {found} were provided",
    NonBooleanCondition{found: String} = "condition must evaluate to a boolean, got '{found}'",
    NotAnArray{target: String, found: String} = "'{target}' is not an array, got '{found}'",
    NonIntegerIndex{found: String} = "array index must be an integer, got '{found}'",
    IndexOutOfRange{index: i64, length: usize} = "array index {index} is out of bounds for length {length}",
    UnsupportedOperator{operator: Operator, left: String, right: String} = "unsupported operand types for operator '{operator}': '{left}' and '{right}'",
    UnsupportedUnaryOperator{operator: UnaryOperator, operand: String} = "unsupported operand type for operator '{operator}': '{operand}'",
    DivisionByZero = "division by zero",
    IntegerOverflow{operator: Operator} = "integer overflow in '{operator}'",
    ReturnOutsideFunction = "unsupported node: return outside of a function",
    MissingReturnValue{function: String} = "function '{function}' finished without returning a value",
    VoidValue{function: String} = "function '{function}' does not return a value",
    CallDepthExceeded{limit: usize} = "maximum call depth of {limit} exceeded",
}
