//! Widget runtime
//!
//! Owns the host and one controller per widget type, and routes native
//! events and timer tasks to the controller that attached the listener.

use morph_dom::{Document, EventType, Listener, NodeId, UiEvent};

use crate::accordion::AccordionController;
use crate::config::WidgetConfig;
use crate::floating::FloatingController;
use crate::host::{Host, HostTask};
use crate::overlay::OverlayController;
use crate::tabs::TabsController;
use crate::text_input::TextInputController;

/// Lifecycle every widget controller implements
pub trait Controller {
    /// Name listeners and timer tasks are tagged with
    fn owner(&self) -> &'static str;

    /// Scan `root`, project initial state and attach listeners
    fn initialize(&mut self, host: &mut Host, root: NodeId);

    /// React to a native event reaching one of this controller's listeners
    fn handle_event(&mut self, host: &mut Host, listener: &Listener, event: &mut UiEvent);

    /// React to a timer task this controller scheduled
    fn handle_task(&mut self, _host: &mut Host, _task: &HostTask) {}

    /// Detach every listener and restore the markup
    fn destroy(&mut self, host: &mut Host);

    /// Rebuild after markup changed
    fn refresh(&mut self, host: &mut Host, root: NodeId) {
        self.destroy(host);
        self.initialize(host, root);
    }
}

/// Host plus every controller
#[derive(Debug)]
pub struct WidgetRuntime {
    pub host: Host,
    pub accordion: AccordionController,
    pub tabs: TabsController,
    pub modal: OverlayController,
    pub drawer: OverlayController,
    pub dropdown: FloatingController,
    pub tooltip: FloatingController,
    pub text_input: TextInputController,
}

impl WidgetRuntime {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, WidgetConfig::default())
    }

    pub fn with_config(document: Document, config: WidgetConfig) -> Self {
        Self {
            host: Host::new(document),
            accordion: AccordionController::new(config.accordion),
            tabs: TabsController::new(config.tabs),
            modal: OverlayController::new(config.modal),
            drawer: OverlayController::new(config.drawer),
            dropdown: FloatingController::new(config.dropdown),
            tooltip: FloatingController::new(config.tooltip),
            text_input: TextInputController::new(config.text_input),
        }
    }

    /// Host plus every controller in registration order
    fn parts(&mut self) -> (&mut Host, [&mut dyn Controller; 7]) {
        let Self {
            host,
            accordion,
            tabs,
            modal,
            drawer,
            dropdown,
            tooltip,
            text_input,
        } = self;
        (host, [accordion, tabs, modal, drawer, dropdown, tooltip, text_input])
    }

    /// Initialize every controller against the whole document
    pub fn initialize(&mut self) {
        let root = self.host.document.root();
        self.initialize_at(root);
    }

    /// Initialize every controller against a subtree
    pub fn initialize_at(&mut self, root: NodeId) {
        let (host, controllers) = self.parts();
        for controller in controllers {
            controller.initialize(host, root);
        }
    }

    /// Deliver a native event along its propagation path.
    ///
    /// Listeners at each node run in registration order against a
    /// snapshot; one removed by an earlier listener in the same dispatch
    /// is skipped. A stopped propagation ends the walk after the current
    /// node.
    pub fn dispatch(&mut self, mut event: UiEvent) -> UiEvent {
        let path: Vec<NodeId> = if event.event_type.bubbles() {
            self.host.document.tree().ancestors(event.target).collect()
        } else {
            vec![event.target]
        };
        tracing::trace!(event = event.event_type.as_str(), target = %event.target, "dispatch");

        for node in path {
            let listeners: Vec<Listener> = self
                .host
                .document
                .listeners()
                .at(node, event.event_type)
                .cloned()
                .collect();

            for listener in &listeners {
                if self.host.document.listeners().contains(listener.handle) {
                    self.route(listener, &mut event);
                }
            }

            if event.is_propagation_stopped() {
                break;
            }
        }
        event
    }

    fn route(&mut self, listener: &Listener, event: &mut UiEvent) {
        let (host, controllers) = self.parts();
        match controllers.into_iter().find(|c| c.owner() == listener.owner) {
            Some(controller) => controller.handle_event(host, listener, event),
            None => tracing::debug!(owner = listener.owner, "event for unknown owner dropped"),
        }
    }

    /// Advance the host clock and run the tasks that came due
    pub fn advance(&mut self, ms: u64) {
        for task in self.host.timers.advance(ms) {
            let (host, controllers) = self.parts();
            match controllers.into_iter().find(|c| c.owner() == task.owner()) {
                Some(controller) => controller.handle_task(host, &task),
                None => tracing::debug!(owner = task.owner(), "task for unknown owner dropped"),
            }
        }
    }

    /// Change the viewport and fire a window resize
    pub fn resize(&mut self, width: f64, height: f64) -> UiEvent {
        self.host.document.set_viewport(width, height);
        self.dispatch(UiEvent::resize())
    }

    /// Tear down and rebuild every controller
    pub fn refresh(&mut self) {
        let root = self.host.document.root();
        let (host, controllers) = self.parts();
        for controller in controllers {
            controller.refresh(host, root);
        }
        tracing::info!("widgets refreshed");
    }

    /// Destroy every controller in reverse registration order
    pub fn destroy(&mut self) {
        let (host, controllers) = self.parts();
        for controller in controllers.into_iter().rev() {
            controller.destroy(host);
        }
        tracing::info!("widgets destroyed");
    }

    // ---- input helpers ----------------------------------------------

    pub fn document(&self) -> &Document {
        &self.host.document
    }

    /// Element by id; `NodeId::NONE` when absent
    pub fn node(&self, id: &str) -> NodeId {
        self.host.document.get_element_by_id(id).unwrap_or(NodeId::NONE)
    }

    pub fn click(&mut self, target: NodeId) -> UiEvent {
        self.dispatch(UiEvent::click(target))
    }

    pub fn key_down(&mut self, target: NodeId, key: &str) -> UiEvent {
        self.dispatch(UiEvent::key_down(target, key))
    }

    /// Key press on whatever has focus (the body when nothing does)
    pub fn press(&mut self, key: &str) -> UiEvent {
        let target = self.focus_target();
        self.dispatch(UiEvent::key_down(target, key))
    }

    pub fn press_tab(&mut self, shift: bool) -> UiEvent {
        let target = self.focus_target();
        let mut event = UiEvent::key_down(target, "Tab");
        if shift {
            event = event.with_shift();
        }
        self.dispatch(event)
    }

    fn focus_target(&self) -> NodeId {
        self.host
            .document
            .active_element()
            .unwrap_or_else(|| self.host.document.body())
    }

    pub fn hover(&mut self, target: NodeId) -> UiEvent {
        self.dispatch(UiEvent::mouse_enter(target))
    }

    pub fn unhover(&mut self, target: NodeId) -> UiEvent {
        self.dispatch(UiEvent::mouse_leave(target))
    }

    /// Move focus and fire `focus` on the element
    pub fn focus(&mut self, target: NodeId) -> UiEvent {
        self.host.document.focus(target);
        self.dispatch(UiEvent::focus(target))
    }

    /// Fire `blur` on the element and clear focus
    pub fn blur(&mut self, target: NodeId) -> UiEvent {
        if self.host.document.active_element() == Some(target) {
            self.host.document.blur();
        }
        self.dispatch(UiEvent::blur(target))
    }

    /// Replace the input's value and fire `input`
    pub fn type_text(&mut self, input: NodeId, value: &str) -> UiEvent {
        self.host.document.set_value(input, value);
        self.dispatch(UiEvent::input(input))
    }

    /// Whether a listener of `event_type` is attached at `node`
    pub fn is_listening(&self, node: NodeId, event_type: EventType) -> bool {
        self.host.document.listeners().at(node, event_type).next().is_some()
    }
}
