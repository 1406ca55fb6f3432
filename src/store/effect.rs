use futures_util::future::BoxFuture;
use futures_util::{Future, FutureExt};

/// Work a reducer asks the store to do after the state was updated.
pub enum Effect<A> {
    Nothing,
    /// Feed another action back into the reducer
    Action(A),
    /// Run a future, its output is fed back into the reducer
    Future(BoxFuture<'static, A>),
    /// Run a future and ignore its output
    FireForget(BoxFuture<'static, ()>),
    Multiple(Vec<Effect<A>>),
}

impl<A: Send + 'static> Effect<A> {
    pub const NONE: Self = Effect::Nothing;

    pub fn action(action: A) -> Self {
        Effect::Action(action)
    }

    pub fn future<T, F, M>(future: F, mapper: M) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        M: FnOnce(T) -> A + Send + 'static,
    {
        Effect::Future(async move { mapper(future.await) }.boxed())
    }

    pub fn fire_forget<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Effect::FireForget(future.boxed())
    }

    pub fn merge2(first: Self, second: Self) -> Self {
        Effect::Multiple(vec![first, second])
    }

    pub fn is_none(&self) -> bool {
        match self {
            Effect::Nothing => true,
            Effect::Multiple(effects) => effects.iter().all(|e| e.is_none()),
            _ => false,
        }
    }

    /// Lift the effect of a child reducer into the action type of its parent
    pub fn map<B, F>(self, mapper: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Clone + Send + 'static,
    {
        match self {
            Effect::Nothing => Effect::Nothing,
            Effect::Action(action) => Effect::Action(mapper(action)),
            Effect::Future(future) => Effect::Future(future.map(mapper).boxed()),
            Effect::FireForget(future) => Effect::FireForget(future),
            Effect::Multiple(effects) => Effect::Multiple(
                effects
                    .into_iter()
                    .map(|effect| effect.map(mapper.clone()))
                    .collect(),
            ),
        }
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nothing => write!(f, "Nothing"),
            Self::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Self::Future(_) => write!(f, "Future"),
            Self::FireForget(_) => write!(f, "FireForget"),
            Self::Multiple(effects) => f.debug_list().entries(effects).finish(),
        }
    }
}
