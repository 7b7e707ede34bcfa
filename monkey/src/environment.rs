use crate::object::Object;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A scope of bindings chained to the scope it was opened in. Closures hold
/// an `Rc` to the scope they were created in, so later `set`s on that same
/// scope are visible to them.
///
/// A closure bound in the scope it captures (`let f = fn() {..}` inside a
/// call, or a recursive top-level function) forms an `Rc` cycle with that
/// scope and is never freed. The link can't be `Weak`: a returned closure
/// must keep its call scope alive after the call ends.
#[derive(Default)]
pub struct Environment {
    store: RefCell<HashMap<String, Object>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    pub fn enclosed(outer: Rc<Environment>) -> Environment {
        Environment{store: RefCell::new(HashMap::new()), outer: Some(outer)}
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.borrow().get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    pub fn set<S: Into<String>>(&self, name: S, value: Object) {
        self.store.borrow_mut().insert(name.into(), value);
    }
}
