//! Listener bookkeeping.
//!
//! The entity here is an [`EventMap`]: event names mapped to ordered
//! listener lists. Listeners are compared by pointer identity, so the same
//! closure value registered twice counts twice and only the exact handle
//! removes it.
//!
//! Edits go through the usual single-yield reducers; [`once`] is the async
//! one: it registers a hook, suspends until the event fires, then yields
//! again to deregister itself before completing with the payload.

use super::entity::{SetEntity, Settable, propose};
use crate::coroutine::{AsyncCoroutine, Proposal, Step, YieldOnce, yield_once};
use crate::reducer::EntityUseCase;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// A shared event handler, compared by pointer identity.
pub struct Listener<E>(Arc<dyn Fn(&E) + Send + Sync>);

impl<E> Listener<E> {
    /// Wraps a handler.
    pub fn new(f: impl Fn(&E) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Invokes the handler.
    pub fn call(&self, event: &E) {
        (self.0)(event);
    }
}

impl<E> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> PartialEq for Listener<E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<E> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Listener(..)")
    }
}

/// Event names mapped to ordered listener lists.
pub struct EventMap<E> {
    entries: HashMap<String, Vec<Listener<E>>>,
}

impl<E> EventMap<E> {
    /// An empty map.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Appends `listener` under `name`.
    #[must_use]
    pub fn appended(mut self, name: impl Into<String>, listener: Listener<E>) -> Self {
        self.entries.entry(name.into()).or_default().push(listener);
        self
    }

    /// Prepends `listener` under `name`.
    #[must_use]
    pub fn prepended(mut self, name: impl Into<String>, listener: Listener<E>) -> Self {
        self.entries
            .entry(name.into())
            .or_default()
            .insert(0, listener);
        self
    }

    /// Removes the first occurrence of `listener` under `name`. A listener
    /// that is not registered leaves the map untouched.
    #[must_use]
    pub fn removed(mut self, name: &str, listener: &Listener<E>) -> Self {
        if let Some(listeners) = self.entries.get_mut(name) {
            if let Some(index) = listeners.iter().position(|l| l == listener) {
                listeners.remove(index);
            }
            if listeners.is_empty() {
                self.entries.remove(name);
            }
        }
        self
    }

    /// Drops every listener under `name`, or all listeners with `None`.
    #[must_use]
    pub fn cleared(mut self, name: Option<&str>) -> Self {
        match name {
            Some(name) => {
                self.entries.remove(name);
            }
            None => self.entries.clear(),
        }
        self
    }

    /// Calls every listener registered under `name`, in order. Returns
    /// whether any listener was called.
    pub fn emit(&self, name: &str, event: &E) -> bool {
        let Some(listeners) = self.entries.get(name) else {
            return false;
        };
        for listener in listeners {
            listener.call(event);
        }
        !listeners.is_empty()
    }

    /// Names with at least one listener, unordered.
    pub fn event_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of listeners under `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.entries.get(name).map_or(0, Vec::len)
    }
}

impl<E> Default for EventMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventMap<E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<E> PartialEq for EventMap<E> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<E> fmt::Debug for EventMap<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, listeners) in &self.entries {
            map.entry(name, &listeners.len());
        }
        map.finish()
    }
}

/// Reducer set for listener maps. Yielded maps replace the current one
/// wholesale.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventOps;

impl<E> EntityUseCase<EventMap<E>> for EventOps {
    type Settable = Settable<EventMap<E>>;
    type Commit = SetEntity<EventMap<E>>;

    fn set_entity(
        &self,
        entity: EventMap<E>,
        settable: Settable<EventMap<E>>,
    ) -> SetEntity<EventMap<E>> {
        let candidate = settable.resolve(entity.clone());
        propose(&entity, candidate)
    }
}

type MapReducer<E> = YieldOnce<EventMap<E>, fn(EventMap<E>)>;

/// Appends a listener.
pub fn on<E: 'static>(name: impl Into<String>, listener: Listener<E>) -> MapReducer<E> {
    let name = name.into();
    yield_once(
        Proposal::derive(move |map: EventMap<E>| map.appended(name, listener)),
        |_: EventMap<E>| (),
    )
}

/// Prepends a listener.
pub fn prepend<E: 'static>(name: impl Into<String>, listener: Listener<E>) -> MapReducer<E> {
    let name = name.into();
    yield_once(
        Proposal::derive(move |map: EventMap<E>| map.prepended(name, listener)),
        |_: EventMap<E>| (),
    )
}

/// Removes a listener.
pub fn off<E: 'static>(name: impl Into<String>, listener: Listener<E>) -> MapReducer<E> {
    let name = name.into();
    yield_once(
        Proposal::derive(move |map: EventMap<E>| map.removed(&name, &listener)),
        |_: EventMap<E>| (),
    )
}

/// Drops every listener under `name`, or all listeners with `None`.
pub fn remove_all<E: 'static>(name: Option<String>) -> MapReducer<E> {
    yield_once(
        Proposal::derive(move |map: EventMap<E>| map.cleared(name.as_deref())),
        |_: EventMap<E>| (),
    )
}

struct OnceShared<E> {
    fired: Option<E>,
    waker: Option<Waker>,
}

/// Awaits one occurrence of an event.
///
/// Created by [`once`]. The computation yields a map with a hook listener
/// appended, suspends until the hook fires, yields the hook's removal
/// against whatever the map has become by then, and completes with the
/// event payload.
#[must_use = "futures do nothing unless polled"]
pub struct Once<E> {
    name: String,
    hook: Listener<E>,
    shared: Arc<Mutex<OnceShared<E>>>,
    stage: OnceStage<E>,
}

enum OnceStage<E> {
    Register,
    Wait,
    Finish(E),
    Done,
}

// The payload is held by value and never pinned.
impl<E> Unpin for Once<E> {}

impl<E: fmt::Debug> fmt::Debug for Once<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Once")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Awaits one `name` event, completing with its payload.
pub fn once<E>(name: impl Into<String>) -> Once<E>
where
    E: Clone + Send + 'static,
{
    let shared = Arc::new(Mutex::new(OnceShared {
        fired: None,
        waker: None,
    }));
    let inner = Arc::clone(&shared);
    let hook = Listener::new(move |event: &E| {
        let mut state = inner.lock();
        if state.fired.is_none() {
            state.fired = Some(event.clone());
        }
        if let Some(waker) = state.waker.take() {
            waker.wake();
        }
    });
    Once {
        name: name.into(),
        hook,
        shared,
        stage: OnceStage::Register,
    }
}

impl<E> AsyncCoroutine<EventMap<E>> for Once<E>
where
    E: Clone + Send + 'static,
{
    type Return = E;
    type Error = Infallible;

    fn poll_resume(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        _entity: &EventMap<E>,
    ) -> Poll<Result<Step<EventMap<E>, E>, Infallible>> {
        let this = self.get_mut();
        match std::mem::replace(&mut this.stage, OnceStage::Done) {
            OnceStage::Register => {
                this.stage = OnceStage::Wait;
                let name = this.name.clone();
                let hook = this.hook.clone();
                Poll::Ready(Ok(Step::Yield(Proposal::derive(move |map: EventMap<E>| {
                    map.appended(name, hook)
                }))))
            }
            OnceStage::Wait => {
                let mut state = this.shared.lock();
                if let Some(event) = state.fired.take() {
                    drop(state);
                    this.stage = OnceStage::Finish(event);
                    let name = this.name.clone();
                    let hook = this.hook.clone();
                    Poll::Ready(Ok(Step::Yield(Proposal::derive(move |map: EventMap<E>| {
                        map.removed(&name, &hook)
                    }))))
                } else {
                    state.waker = Some(cx.waker().clone());
                    drop(state);
                    this.stage = OnceStage::Wait;
                    Poll::Pending
                }
            }
            OnceStage::Finish(event) => Poll::Ready(Ok(Step::Complete(event))),
            OnceStage::Done => panic!("Once resumed after completion"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineOptions, bind_with_entity};
    use std::future::Future;
    use std::sync::Mutex as StdMutex;
    use std::task::Wake;

    fn init_test(name: &str) {
        crate::test_logging::init_test_logging();
        crate::test_phase!(name);
    }

    struct NoopWaker;

    impl Wake for NoopWaker {
        fn wake(self: Arc<Self>) {}
    }

    fn noop_context() -> Context<'static> {
        static WAKER: std::sync::OnceLock<Waker> = std::sync::OnceLock::new();
        Context::from_waker(WAKER.get_or_init(|| Waker::from(Arc::new(NoopWaker))))
    }

    #[test]
    fn on_emit_off_round() {
        init_test("on_emit_off_round");
        let engine = bind_with_entity(EventOps, EventMap::<i32>::new(), EngineOptions::new());
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let log = seen.clone();
        let listener = Listener::new(move |event: &i32| {
            log.lock().unwrap().push(*event);
        });

        engine.dispatch(on("tick", listener.clone())).unwrap();
        let heard = engine.entity().emit("tick", &7);
        crate::assert_with_log!(heard, "heard", true, heard);

        engine.dispatch(off("tick", listener)).unwrap();
        let heard = engine.entity().emit("tick", &8);
        crate::assert_with_log!(!heard, "silent", false, heard);

        let seen = seen.lock().unwrap();
        crate::assert_with_log!(*seen == vec![7], "payloads", vec![7], *seen);
        crate::test_complete!("on_emit_off_round");
    }

    #[test]
    fn prepend_runs_first() {
        init_test("prepend_runs_first");
        let engine = bind_with_entity(EventOps, EventMap::<i32>::new(), EngineOptions::new());
        let order = Arc::new(StdMutex::new(Vec::new()));

        let log = order.clone();
        engine
            .dispatch(on("tick", Listener::new(move |_: &i32| log.lock().unwrap().push("second"))))
            .unwrap();
        let log = order.clone();
        engine
            .dispatch(prepend("tick", Listener::new(move |_: &i32| log.lock().unwrap().push("first"))))
            .unwrap();

        engine.entity().emit("tick", &0);
        let order = order.lock().unwrap();
        let expected = vec!["first", "second"];
        crate::assert_with_log!(*order == expected, "order", expected, *order);
        crate::test_complete!("prepend_runs_first");
    }

    #[test]
    fn identity_distinguishes_equal_closures() {
        init_test("identity_distinguishes_equal_closures");
        let a = Listener::new(|_: &i32| {});
        let b = Listener::new(|_: &i32| {});
        crate::assert_with_log!(a == a.clone(), "same handle", true, a == a.clone());
        crate::assert_with_log!(a != b, "distinct handles", true, a != b);

        // Removing the other closure leaves the registration alone.
        let map = EventMap::new().appended("tick", a).removed("tick", &b);
        let count = map.listener_count("tick");
        crate::assert_with_log!(count == 1, "count", 1, count);
        crate::test_complete!("identity_distinguishes_equal_closures");
    }

    #[test]
    fn remove_all_clears_names() {
        init_test("remove_all_clears_names");
        let engine = bind_with_entity(EventOps, EventMap::<i32>::new(), EngineOptions::new());
        engine.dispatch(on("a", Listener::new(|_: &i32| {}))).unwrap();
        engine.dispatch(on("b", Listener::new(|_: &i32| {}))).unwrap();

        engine.dispatch(remove_all(Some("a".to_string()))).unwrap();
        let mut names: Vec<String> = engine.entity().event_names().iter().map(|s| (*s).to_string()).collect();
        names.sort_unstable();
        crate::assert_with_log!(names == vec!["b"], "names", vec!["b"], names);

        engine.dispatch(remove_all(None)).unwrap();
        let empty = engine.entity().event_names().is_empty();
        crate::assert_with_log!(empty, "empty", true, empty);
        crate::test_complete!("remove_all_clears_names");
    }

    #[test]
    fn once_registers_waits_and_cleans_up() {
        init_test("once_registers_waits_and_cleans_up");
        let engine = bind_with_entity(EventOps, EventMap::<String>::new(), EngineOptions::new());
        let mut future = Box::pin(engine.dispatch_async(once::<String>("ready")));
        let mut cx = noop_context();

        // First poll registers the hook and parks.
        let poll = future.as_mut().poll(&mut cx);
        crate::assert_with_log!(poll.is_pending(), "parked", true, poll.is_pending());
        let count = engine.entity().listener_count("ready");
        crate::assert_with_log!(count == 1, "hook registered", 1, count);

        // Fire the event, then poll again: the hook is removed and the
        // payload comes back.
        engine.entity().emit("ready", &"go".to_string());
        let poll = future.as_mut().poll(&mut cx);
        let resolved = match poll {
            Poll::Ready(Ok((map, payload))) => {
                payload == "go" && map.listener_count("ready") == 0
            }
            _ => false,
        };
        crate::assert_with_log!(resolved, "resolved", true, resolved);
        let count = engine.entity().listener_count("ready");
        crate::assert_with_log!(count == 0, "hook removed", 0, count);
        crate::test_complete!("once_registers_waits_and_cleans_up");
    }
}
