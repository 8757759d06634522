use std::cell::RefCell;
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Lifetime owner for effects.
///
/// While [`Scope::run`] is executing, every [`crate::effect`] created registers
/// its `stop` here. Disposing the scope, explicitly or by dropping its last
/// handle, stops them all.
#[derive(Clone, Default)]
pub struct Scope(Rc<ScopeInner>);

#[derive(Default)]
struct ScopeInner {
    owned: RefCell<Vec<Owned>>,
}

enum Owned {
    Scope(Scope),
    Cleanup(Box<dyn FnOnce()>),
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with this scope current; the previous one is restored after.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let outer = CURRENT_SCOPE.with(|c| c.borrow_mut().replace(Rc::downgrade(&self.0)));
        let _restore = Restore(outer);
        f()
    }

    pub fn add_disposer(&self, cleanup: impl FnOnce() + 'static) {
        self.0
            .owned
            .borrow_mut()
            .push(Owned::Cleanup(Box::new(cleanup)));
    }

    /// A nested scope, disposed together with (and before) this one.
    pub fn child(&self) -> Scope {
        let child = Scope::new();
        self.0.owned.borrow_mut().push(Owned::Scope(child.clone()));
        child
    }

    pub fn dispose(self) {
        self.0.dispose();
    }
}

impl ScopeInner {
    fn dispose(&self) {
        let owned = std::mem::take(&mut *self.owned.borrow_mut());
        let (scopes, cleanups): (Vec<_>, Vec<_>) = owned
            .into_iter()
            .partition(|o| matches!(o, Owned::Scope(_)));
        for owned in scopes.into_iter().chain(cleanups) {
            match owned {
                Owned::Scope(scope) => scope.0.dispose(),
                Owned::Cleanup(cleanup) => cleanup(),
            }
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// The scope whose [`Scope::run`] is executing, if it is still alive.
pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|c| c.borrow().as_ref().and_then(Weak::upgrade).map(Scope))
}

struct Restore(Option<Weak<ScopeInner>>);

impl Drop for Restore {
    fn drop(&mut self) {
        let outer = self.0.take();
        let _ = CURRENT_SCOPE.try_with(|c| *c.borrow_mut() = outer);
    }
}
