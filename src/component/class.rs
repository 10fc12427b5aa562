//! The component class synthesized for each node.

use std::rc::Rc;

use spark_signals::Signal;

use crate::dom::DomNode;
use crate::element::{Element, PropTypes, Props};
use crate::engine::{
    create_actions_stream, create_state_stream, generate_sources, LifecycleBus, LifecycleEvent,
};
use crate::error::{RecycleError, Result};
use crate::host::{ComponentClass, ComponentInstance, Updater};
use crate::types::{Action, State};

use super::node::{InstanceId, WeakNode};
use super::{ComponentDescriptor, ComponentNode};

pub(crate) struct RecycleClass<S: State> {
    name: String,
    descriptor: Rc<ComponentDescriptor<S>>,
    node: WeakNode,
    lifecycle: LifecycleBus<S>,
    latest: Signal<S>,
}

impl<S: State> RecycleClass<S> {
    pub(crate) fn new(
        name: String,
        descriptor: ComponentDescriptor<S>,
        node: WeakNode,
        lifecycle: LifecycleBus<S>,
        latest: Signal<S>,
    ) -> Self {
        Self {
            name,
            descriptor: Rc::new(descriptor),
            node,
            lifecycle,
            latest,
        }
    }
}

impl<S: State> ComponentClass for RecycleClass<S> {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn default_props(&self) -> Option<&Props> {
        self.descriptor.default_props.as_ref()
    }

    fn prop_types(&self) -> Option<&PropTypes> {
        self.descriptor.prop_types.as_ref()
    }

    fn instantiate(&self, props: &Props, updater: Updater) -> Result<Box<dyn ComponentInstance>> {
        let node = self.node.upgrade().ok_or(RecycleError::Detached)?;
        if let Some(prop_types) = &self.descriptor.prop_types {
            prop_types.check(&self.name, props);
        }

        // A remounted node resumes from its latest state
        let instance = node.attach_instance();
        Ok(Box::new(RecycleInstance {
            node,
            instance,
            name: self.name.clone(),
            descriptor: self.descriptor.clone(),
            lifecycle: self.lifecycle.clone(),
            latest: self.latest.clone(),
            updater,
            props: props.clone(),
            state: self.latest.get(),
        }))
    }
}

/// A mounted instance of a [`RecycleClass`].
///
/// `state` and `props` are what the last render used. `latest` is written by
/// the state stream and committed on the next update.
struct RecycleInstance<S: State> {
    node: ComponentNode,
    instance: InstanceId,
    name: String,
    descriptor: Rc<ComponentDescriptor<S>>,
    lifecycle: LifecycleBus<S>,
    latest: Signal<S>,
    updater: Updater,
    props: Props,
    state: S,
}

impl<S: State> ComponentInstance for RecycleInstance<S> {
    fn render(&mut self) -> Result<Element> {
        let pass = self.node.begin_render();
        tracing::trace!(component = %self.name, pass, "rendering component");
        (self.descriptor.view)(&self.state, &self.props, &self.node.element_factory())
    }

    fn should_component_update(&mut self, next_props: &Props) -> bool {
        if let Some(prop_types) = &self.descriptor.prop_types {
            prop_types.check(&self.name, next_props);
        }

        let next_state = self.latest.get();
        let update = match &self.descriptor.should_component_update {
            Some(decide) => decide(next_props, &next_state, &self.props, &self.state),
            None => true,
        };

        self.props = next_props.clone();
        self.state = next_state;
        update
    }

    fn component_did_mount(&mut self, dom: &dyn DomNode) {
        let sources = generate_sources(
            self.node.dom_registry(),
            self.node.child_actions(),
            &self.lifecycle,
        );

        if let Some(actions) = &self.descriptor.actions {
            let stream = create_actions_stream(actions(&sources, &self.props)).share();
            let sink = sources.action_sink().clone();
            self.node.track(
                self.instance,
                stream.subscribe(move |action: &Action| sink.emit(action)),
            );
            self.node.set_actions(stream);
        }

        if let Some(reducers) = &self.descriptor.reducers {
            let state = create_state_stream(
                reducers(&sources, &self.props),
                self.latest.get(),
                &self.lifecycle,
            );
            let latest = self.latest.clone();
            let updater = self.updater.clone();
            let subscription = state.subscribe(move |next: &S| {
                // Equal states do not schedule a render
                if latest.get() != *next {
                    latest.set(next.clone());
                    updater();
                }
            });
            self.node.track(self.instance, subscription);
        }

        self.node.update_child_actions();
        self.node.rebind_dom(dom);

        tracing::debug!(component = %self.name, key = ?self.node.key(), "component mounted");
        self.lifecycle.publish(LifecycleEvent::ComponentMounted {
            state: self.state.clone(),
        });
    }

    fn component_did_update(&mut self, dom: &dyn DomNode) {
        self.node.rebind_dom(dom);
        tracing::debug!(component = %self.name, "component updated");
        self.lifecycle.publish(LifecycleEvent::ComponentUpdated {
            state: self.state.clone(),
        });
    }

    fn component_will_unmount(&mut self) {
        self.node.detach_instance(self.instance);
    }
}
