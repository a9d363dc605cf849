use std::fmt::{self, Display, Formatter};

/// Declared type of a variable, parameter or function result.
///
/// An `Array` with a single entry is a homogeneous array of any length. With
/// several entries it is a fixed-size tuple whose elements are checked
/// positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Int,
    Real,
    Bool,
    String,
    Array(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::Array(entries) if entries.len() > 1)
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Real => write!(f, "float64"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::Array(entries) => {
                let names: Vec<String> = entries.iter().map(TypeDescriptor::to_string).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}
