//! A small reducer store.
//!
//! Actions are applied one at a time under the state lock. The effects a
//! reducer returns are driven to completion by [`Store::send`], which
//! feeds their resulting actions back into the reducer until nothing is
//! left to run.

mod effect;

pub use effect::Effect;

use std::collections::VecDeque;
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};

pub trait Reducer {
    type Action: std::fmt::Debug + Clone + Send + 'static;
    type State;
    type Environment;

    fn reduce(
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action>;

    fn initial_action() -> Option<Self::Action> {
        None
    }
}

pub struct Store<R: Reducer> {
    state: Mutex<R::State>,
    environment: R::Environment,
    subscribers: Mutex<Vec<flume::Sender<()>>>,
}

impl<R: Reducer> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("reducer", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: Reducer> Store<R>
where
    R::State: Clone,
{
    pub fn new(state: R::State, environment: R::Environment) -> Self {
        Self {
            state: Mutex::new(state),
            environment,
            subscribers: Mutex::default(),
        }
    }

    pub fn environment(&self) -> &R::Environment {
        &self.environment
    }

    /// A snapshot of the current state
    pub fn state(&self) -> Option<R::State> {
        self.state.lock().ok().map(|state| state.clone())
    }

    pub fn with<T>(&self, action: impl FnOnce(&R::State) -> T) -> Option<T> {
        self.state.lock().ok().map(|state| action(&state))
    }

    /// Receives a message after every reducer run
    pub fn subscribe(&self) -> flume::Receiver<()> {
        let (sender, receiver) = flume::unbounded();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        receiver
    }

    /// Dispatch the reducer's initial action, if any
    pub async fn start(&self) {
        if let Some(action) = R::initial_action() {
            self.send(action).await;
        }
    }

    /// Dispatch `action` and wait until every effect it caused has settled
    pub async fn send(&self, action: R::Action) {
        let mut queue = VecDeque::from([action]);
        let mut running: FuturesUnordered<BoxFuture<'static, R::Action>> =
            FuturesUnordered::new();
        loop {
            while let Some(action) = queue.pop_front() {
                let effect = self.apply(action);
                Self::schedule(effect, &mut queue, &mut running);
            }
            match running.next().await {
                Some(action) => queue.push_back(action),
                None => break,
            }
        }
    }

    fn apply(&self, action: R::Action) -> Effect<R::Action> {
        let effect = {
            let Ok(mut state) = self.state.lock() else {
                log::error!("State lock poisoned, dropping {action:?}");
                return Effect::NONE
            };
            R::reduce(action, &mut state, &self.environment)
        };
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|s| s.send(()).is_ok());
        }
        effect
    }

    fn schedule(
        effect: Effect<R::Action>,
        queue: &mut VecDeque<R::Action>,
        running: &mut FuturesUnordered<BoxFuture<'static, R::Action>>,
    ) {
        match effect {
            Effect::Nothing => {}
            Effect::Action(action) => queue.push_back(action),
            Effect::Future(future) => running.push(future),
            Effect::FireForget(future) => {
                tokio::spawn(future);
            }
            Effect::Multiple(effects) => {
                for effect in effects {
                    Self::schedule(effect, queue, running);
                }
            }
        }
    }
}
