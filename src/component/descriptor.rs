//! Component descriptor - what a constructor returns.

use std::fmt;
use std::rc::Rc;

use crate::element::{Element, ElementFactory, PropTypes, Props};
use crate::engine::{ReducerEnvelope, Sources};
use crate::error::Result;
use crate::stream::Streams;
use crate::types::{Action, State};

/// `view(state, props, factory)`
pub type ViewFn<S> = Rc<dyn Fn(&S, &Props, &ElementFactory) -> Result<Element>>;

/// `actions(sources, props)`
pub type ActionsFn<S> = Rc<dyn Fn(&Sources<S>, &Props) -> Streams<Option<Action>>>;

/// `reducers(sources, props)`
pub type ReducersFn<S> = Rc<dyn Fn(&Sources<S>, &Props) -> Streams<ReducerEnvelope<S>>>;

/// `should_component_update(next_props, next_state, prev_props, prev_state)`
pub type ShouldUpdateFn<S> = Rc<dyn Fn(&Props, &S, &Props, &S) -> bool>;

/// Declarative description of a component.
///
/// Only `view` is required. Without `reducers` the component is
/// presentational: its state stays `initial_state` and its `actions`
/// output is still forwarded to the parent.
pub struct ComponentDescriptor<S> {
    pub(crate) view: ViewFn<S>,
    pub(crate) actions: Option<ActionsFn<S>>,
    pub(crate) reducers: Option<ReducersFn<S>>,
    pub(crate) initial_state: S,
    pub(crate) should_component_update: Option<ShouldUpdateFn<S>>,
    pub(crate) prop_types: Option<PropTypes>,
    pub(crate) default_props: Option<Props>,
    pub(crate) display_name: Option<String>,
}

impl<S: State> ComponentDescriptor<S> {
    /// Descriptor starting from `S::default()`.
    pub fn new(view: impl Fn(&S, &Props, &ElementFactory) -> Result<Element> + 'static) -> Self
    where
        S: Default,
    {
        Self::with_state(S::default(), view)
    }

    pub fn with_state(
        initial_state: S,
        view: impl Fn(&S, &Props, &ElementFactory) -> Result<Element> + 'static,
    ) -> Self {
        Self {
            view: Rc::new(view),
            actions: None,
            reducers: None,
            initial_state,
            should_component_update: None,
            prop_types: None,
            default_props: None,
            display_name: None,
        }
    }

    /// Map sources to actions. Return one stream or a vector of them, of
    /// `Action` or `Option<Action>` (`None` is dropped).
    pub fn actions<A>(mut self, actions: impl Fn(&Sources<S>, &Props) -> A + 'static) -> Self
    where
        A: Into<Streams<Option<Action>>>,
    {
        self.actions = Some(Rc::new(move |sources: &Sources<S>, props: &Props| {
            actions(sources, props).into()
        }));
        self
    }

    /// Map sources to reducer envelopes.
    pub fn reducers<R>(mut self, reducers: impl Fn(&Sources<S>, &Props) -> R + 'static) -> Self
    where
        R: Into<Streams<ReducerEnvelope<S>>>,
    {
        self.reducers = Some(Rc::new(move |sources: &Sources<S>, props: &Props| {
            reducers(sources, props).into()
        }));
        self
    }

    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = state;
        self
    }

    /// Replace the default "always update" decision.
    pub fn should_component_update(
        mut self,
        decide: impl Fn(&Props, &S, &Props, &S) -> bool + 'static,
    ) -> Self {
        self.should_component_update = Some(Rc::new(decide));
        self
    }

    pub fn prop_types(mut self, prop_types: PropTypes) -> Self {
        self.prop_types = Some(prop_types);
        self
    }

    pub fn default_props(mut self, props: Props) -> Self {
        self.default_props = Some(props);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn has_actions(&self) -> bool {
        self.actions.is_some()
    }

    pub fn has_reducers(&self) -> bool {
        self.reducers.is_some()
    }
}

impl<S: fmt::Debug> fmt::Debug for ComponentDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("display_name", &self.display_name)
            .field("initial_state", &self.initial_state)
            .field("actions", &self.actions.is_some())
            .field("reducers", &self.reducers.is_some())
            .finish_non_exhaustive()
    }
}
