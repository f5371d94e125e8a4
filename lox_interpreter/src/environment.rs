use crate::error::RuntimeError;
use crate::value::Value;
use lox_syntax::Token;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;

/// One scope frame. Frames link to their enclosing frame and form a chain
/// ending at the global frame, which has no parent.
#[derive(Debug, Default)]
pub struct Environment {
    parent: Option<EnvironmentPtr>,
    variables: HashMap<String, Value>,
}

pub type EnvironmentPtr = Rc<RefCell<Environment>>;

impl Environment {
    pub fn new_ptr(parent: EnvironmentPtr) -> EnvironmentPtr {
        Rc::new(RefCell::new(Self {
            parent: Some(parent),
            variables: HashMap::new(),
        }))
    }

    pub fn new_globals_ptr() -> EnvironmentPtr {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Looks `name` up from this frame outward.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.variables.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            Err(RuntimeError::UndefinedVariable { name: name.clone() })
        }
    }

    /// Rebinds `name` in the nearest frame that defines it. Never creates a
    /// binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.variables.get_mut(&name.lexeme) {
            trace!(name = %name.lexeme, value = %value, "assign");
            *slot = value;
            Ok(())
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().assign(name, value)
        } else {
            Err(RuntimeError::UndefinedVariable { name: name.clone() })
        }
    }

    /// Binds `name` in this frame only. Shadowing an enclosing frame's binding
    /// is fine; binding the same name twice in one frame is not.
    pub fn define(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        match self.variables.entry(name.lexeme.clone()) {
            Entry::Occupied(_) => Err(RuntimeError::DuplicateVariableName { name: name.clone() }),
            Entry::Vacant(entry) => {
                trace!(name = %name.lexeme, value = %value, "define");
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Whether `name` is bound in this frame, ignoring enclosing frames.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of frames between this one and the global frame.
    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.borrow().depth() + 1,
            None => 0,
        }
    }
}
