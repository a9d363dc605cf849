use crate::ast::TypeDescriptor;
use crate::value::{Result, RuntimeError, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Final variable state handed back to the caller, ordered by name.
pub type State = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub declared_type: TypeDescriptor,
    pub value: Value,
}

impl Variable {
    pub fn new<S: Into<String>>(name: S, declared_type: TypeDescriptor, value: Value) -> Self {
        Self {
            name: name.into(),
            declared_type,
            value,
        }
    }
}

/// The variables of one function invocation. Branches and loop bodies declare
/// straight into it.
pub type Frame = HashMap<String, Variable>;

/// Call stack of frames. The bottom frame holds the globals, which stay
/// visible and assignable from every frame unless a local of the same name
/// hides them.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of active function invocations.
    pub fn call_depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    fn current_frame(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Binds a new variable in the current frame.
    pub fn declare(&mut self, variable: Variable) -> Result<()> {
        let frame = self.current_frame_mut();
        if frame.contains_key(&variable.name) {
            return Err(RuntimeError::VariableRedeclared {
                name: variable.name,
            });
        }
        frame.insert(variable.name.clone(), variable);
        Ok(())
    }

    pub fn declared_in_frame(&self, name: &str) -> bool {
        self.current_frame().contains_key(name)
    }

    /// Names bound in the current frame, for [`Environment::release_except`].
    pub fn declared_names(&self) -> HashSet<String> {
        self.current_frame().keys().cloned().collect()
    }

    /// Drops every binding of the current frame not named in `keep`.
    pub fn release_except(&mut self, keep: &HashSet<String>) {
        self.current_frame_mut()
            .retain(|name, _| keep.contains(name));
    }

    fn locate(&self, name: &str) -> Option<usize> {
        let current = self.frames.len() - 1;
        if self.frames[current].contains_key(name) {
            Some(current)
        } else if self.frames[0].contains_key(name) {
            Some(0)
        } else {
            None
        }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.locate(name)
            .and_then(|frame| self.frames[frame].get(name))
    }

    /// Rebinds an existing variable, enforcing its declared type.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        let variable = self
            .locate(name)
            .and_then(|frame| self.frames[frame].get_mut(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_owned(),
            })?;

        if !value.conforms_to(&variable.declared_type) {
            return Err(RuntimeError::AssignmentTypeMismatch {
                name: name.to_owned(),
                expected: variable.declared_type.to_string(),
                found: value.type_name(),
            });
        }
        variable.value = value;
        Ok(())
    }

    pub fn globals(&self) -> State {
        self.frames[0]
            .values()
            .map(|variable| (variable.name.clone(), variable.value.clone()))
            .collect()
    }
}
