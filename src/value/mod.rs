use crate::ast::TypeDescriptor;
use std::fmt::{self, Display, Formatter};

mod runtime_error;
pub use runtime_error::RuntimeError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Bool(bool),
    String(String),
    Array(Vec<Value>),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Real(x) => write!(f, "{:?}", x),
            Self::Bool(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(Value::to_string).collect();
                write!(f, "[{}]", elements.join(", "))
            }
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Real(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Self::Array(elements)
    }
}

fn looks_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

impl Value {
    /// Resolves literal text to a value: integer, then real, then boolean,
    /// otherwise the text itself as a string.
    pub fn from_literal(text: &str) -> Self {
        if let Ok(n) = text.parse::<i64>() {
            return Self::Int(n);
        }
        if looks_numeric(text) {
            if let Ok(x) = text.parse::<f64>() {
                return Self::Real(x);
            }
        }
        if text.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        Self::String(text.to_owned())
    }

    /// The value a declaration without an initializer starts with.
    pub fn default_for(ty: &TypeDescriptor) -> Self {
        match ty {
            TypeDescriptor::Int => Self::Int(0),
            TypeDescriptor::Real => Self::Real(0.0),
            TypeDescriptor::Bool => Self::Bool(false),
            TypeDescriptor::String => Self::String(String::new()),
            TypeDescriptor::Array(entries) if entries.len() > 1 => {
                Self::Array(entries.iter().map(Value::default_for).collect())
            }
            TypeDescriptor::Array(_) => Self::Array(vec![]),
        }
    }

    /// Describes the runtime type, e.g. `int` or `[int, string]` for arrays.
    pub fn type_name(&self) -> String {
        match self {
            Self::Int(_) => "int".to_owned(),
            Self::Real(_) => "float64".to_owned(),
            Self::Bool(_) => "bool".to_owned(),
            Self::String(_) => "string".to_owned(),
            Self::Array(elements) => {
                let names: Vec<String> = elements.iter().map(Value::type_name).collect();
                format!("[{}]", names.join(", "))
            }
        }
    }

    pub fn conforms_to(&self, ty: &TypeDescriptor) -> bool {
        match (ty, self) {
            (TypeDescriptor::Int, Self::Int(_))
            | (TypeDescriptor::Real, Self::Real(_))
            | (TypeDescriptor::Bool, Self::Bool(_))
            | (TypeDescriptor::String, Self::String(_)) => true,
            (TypeDescriptor::Array(entries), Self::Array(elements)) => match entries.as_slice() {
                [element_type] => elements.iter().all(|e| e.conforms_to(element_type)),
                _ => {
                    entries.len() == elements.len()
                        && entries
                            .iter()
                            .zip(elements.iter())
                            .all(|(entry, element)| element.conforms_to(entry))
                }
            },
            _ => false,
        }
    }
}
