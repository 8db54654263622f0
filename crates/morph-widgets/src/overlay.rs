//! Modal and drawer overlays
//!
//! One controller type serves both variants; `OverlayOptions` carries the
//! policy differences (focus trap, `aria-modal`, attribute names). Open
//! overlays are tracked on the host's shared stack so Escape always
//! closes the most recently opened one, whichever controller owns it.

use morph_a11y::aria::{ARIA_EXPANDED, ARIA_HIDDEN, ARIA_LABEL, ARIA_LABELLEDBY, ARIA_MODAL, ROLE};
use morph_a11y::{focusable_descendants, AriaRole, Key};
use morph_dom::{
    EventDetail, EventType, Listener, ListenerHandle, NodeId, SimpleSelector, TimerId, UiEvent,
};

use crate::config::{OverlayKind, OverlayOptions};
use crate::host::{Host, HostTask};
use crate::runtime::Controller;
use crate::util::{dispatch, query_inclusive, trap_focus, AttrJournal};
use crate::WidgetError;

/// Backdrop attribute value that suppresses dismissal
const STATIC_BACKDROP: &str = "static";

#[derive(Debug, Clone)]
struct Overlay {
    id: String,
    element: NodeId,
    open: bool,
    /// Trigger whose `aria-expanded` was raised by the last show
    expanded: Option<NodeId>,
}

/// Modal/drawer controller
#[derive(Debug)]
pub struct OverlayController {
    options: OverlayOptions,
    selector: Option<SimpleSelector>,
    backdrop: Option<SimpleSelector>,
    overlays: Vec<Overlay>,
    journal: AttrJournal,
    listeners: Vec<ListenerHandle>,
    /// Element to refocus once every overlay of this controller is closed
    return_focus: Option<NodeId>,
    resize_timer: Option<TimerId>,
    shake_timer: Option<(TimerId, NodeId)>,
}

impl OverlayController {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            options,
            selector: None,
            backdrop: None,
            overlays: Vec::new(),
            journal: AttrJournal::new(),
            listeners: Vec::new(),
            return_focus: None,
            resize_timer: None,
            shake_timer: None,
        }
    }

    pub fn modal() -> Self {
        Self::new(OverlayOptions::modal())
    }

    pub fn drawer() -> Self {
        Self::new(OverlayOptions::drawer())
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn kind(&self) -> OverlayKind {
        self.options.kind
    }

    fn owner(&self) -> &'static str {
        self.options.kind.as_str()
    }

    pub fn initialize(&mut self, host: &mut Host, root: NodeId) {
        let (selector, backdrop) = match (
            SimpleSelector::parse(&self.options.selector),
            SimpleSelector::parse(&self.options.backdrop_selector),
        ) {
            (Ok(s), Ok(b)) => (s, b),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(kind = self.owner(), error = %err, "overlay selectors rejected");
                return;
            }
        };

        for element in query_inclusive(&host.document, root, &selector) {
            match self.register(host, element) {
                Ok(Some(id)) => tracing::debug!(kind = self.owner(), id = %id, "overlay registered"),
                Ok(None) => {}
                Err(err) => tracing::warn!(error = %err, "overlay skipped"),
            }
        }

        if !self.overlays.is_empty() {
            let owner = self.owner();
            self.listeners.push(host.listen(owner, NodeId::ROOT, EventType::Click));
            self.listeners.push(host.listen(owner, NodeId::ROOT, EventType::KeyDown));
            if self.options.close_above_width.is_some() {
                self.listeners.push(host.listen(owner, NodeId::ROOT, EventType::Resize));
            }
        }
        self.selector = Some(selector);
        self.backdrop = Some(backdrop);
        tracing::info!("Initialized {} {}(s)", self.overlays.len(), self.owner());
    }

    /// Register one overlay element; `Ok(None)` when it is already known
    fn register(&mut self, host: &mut Host, element: NodeId) -> Result<Option<String>, WidgetError> {
        let kind = self.owner();
        let doc = &mut host.document;
        let id = doc
            .element(element)
            .and_then(|e| e.id())
            .map(str::to_owned)
            .ok_or(WidgetError::MissingId { kind, node: element })?;
        if self.overlays.iter().any(|o| o.id == id) {
            return Ok(None);
        }

        self.journal.set_if_missing(doc, element, ROLE, AriaRole::Dialog.as_str());
        if self.options.aria_modal {
            self.journal.set_if_missing(doc, element, ARIA_MODAL, "true");
        }
        self.journal.set(doc, element, ARIA_HIDDEN, "true");
        self.journal.set(doc, element, &self.options.state_attr, "hidden");

        match self.options.kind {
            OverlayKind::Modal if !doc.has_attr(element, ARIA_LABELLEDBY) => {
                tracing::warn!(id = %id, "modal missing aria-labelledby");
            }
            OverlayKind::Drawer
                if !doc.has_attr(element, ARIA_LABEL) && !doc.has_attr(element, ARIA_LABELLEDBY) =>
            {
                tracing::warn!(id = %id, "drawer missing aria-label or aria-labelledby");
            }
            _ => {}
        }

        self.overlays.push(Overlay {
            id: id.clone(),
            element,
            open: false,
            expanded: None,
        });
        Ok(Some(id))
    }

    fn find(&self, id: &str) -> Option<usize> {
        let found = self.overlays.iter().position(|o| o.id == id);
        if found.is_none() {
            let err = WidgetError::UnknownOverlay {
                kind: self.owner(),
                id: id.to_string(),
            };
            tracing::warn!(error = %err, "overlay operation ignored");
        }
        found
    }

    /// Open overlay `id`; returns false when unknown or already open
    pub fn show(&mut self, host: &mut Host, id: &str, trigger: Option<NodeId>) -> bool {
        let Some(index) = self.find(id) else {
            return false;
        };
        if self.overlays[index].open {
            return false;
        }
        let owner = self.owner();
        let element = self.overlays[index].element;
        let doc = &mut host.document;

        if self.options.return_focus {
            match trigger {
                Some(trigger) => self.return_focus = Some(trigger),
                None if self.return_focus.is_none() => self.return_focus = doc.active_element(),
                None => {}
            }
        }
        if let Some(trigger) = trigger.filter(|&t| doc.has_attr(t, ARIA_EXPANDED)) {
            self.journal.set(doc, trigger, ARIA_EXPANDED, "true");
            self.overlays[index].expanded = Some(trigger);
        }

        self.journal.set(doc, element, &self.options.state_attr, "open");
        self.journal.set(doc, element, ARIA_HIDDEN, "false");
        self.overlays[index].open = true;
        host.overlays.push(owner, id);
        if self.options.lock_scroll {
            host.scroll_lock.acquire(&mut host.document);
        }

        let doc = &mut host.document;
        if self.options.trap_focus {
            if let Some(trap) = trap_focus(doc, element) {
                doc.focus(trap.first());
            }
        } else if let Some(&first) = focusable_descendants(doc.tree(), element).first() {
            doc.focus(first);
        }

        tracing::debug!(kind = owner, id, "overlay shown");
        dispatch(
            doc,
            element,
            &format!("{owner}:show"),
            EventDetail {
                trigger,
                id: Some(id.to_string()),
                ..EventDetail::default()
            },
        );
        true
    }

    /// Close overlay `id`; returns false when unknown or already hidden
    pub fn hide(&mut self, host: &mut Host, id: &str) -> bool {
        let Some(index) = self.find(id) else {
            return false;
        };
        if !self.overlays[index].open {
            return false;
        }
        let owner = self.owner();
        let element = self.overlays[index].element;

        self.journal.set(&mut host.document, element, &self.options.state_attr, "hidden");
        self.journal.set(&mut host.document, element, ARIA_HIDDEN, "true");
        self.overlays[index].open = false;
        host.overlays.remove(owner, id);
        if self.options.lock_scroll {
            host.scroll_lock.release(&mut host.document);
        }

        let doc = &mut host.document;
        let expanded = self.overlays[index].expanded.take();
        let triggers: Vec<NodeId> = [
            &self.options.target_attr,
            &self.options.toggle_attr,
            &self.options.show_attr,
        ]
        .into_iter()
        .flat_map(|attr| {
            let selector = SimpleSelector::AttrEquals(attr.clone(), id.to_string());
            doc.tree().query_all(doc.root(), &selector)
        })
        .chain(expanded)
        .filter(|&t| doc.has_attr(t, ARIA_EXPANDED))
        .collect();
        for trigger in triggers {
            self.journal.set(doc, trigger, ARIA_EXPANDED, "false");
        }

        if self.options.return_focus && !self.overlays.iter().any(|o| o.open) {
            if let Some(node) = self.return_focus.take() {
                doc.focus(node);
            }
        }

        tracing::debug!(kind = owner, id, "overlay hidden");
        dispatch(
            doc,
            element,
            &format!("{owner}:hide"),
            EventDetail {
                id: Some(id.to_string()),
                ..EventDetail::default()
            },
        );
        true
    }

    pub fn toggle(&mut self, host: &mut Host, id: &str, trigger: Option<NodeId>) -> bool {
        if self.is_open(id) {
            self.hide(host, id)
        } else {
            self.show(host, id, trigger)
        }
    }

    /// Close every open overlay, oldest first
    pub fn hide_all(&mut self, host: &mut Host) {
        for id in self.open_overlays(host) {
            self.hide(host, &id);
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.overlays.iter().any(|o| o.id == id && o.open)
    }

    /// Ids of this controller's open overlays in opening order
    pub fn open_overlays(&self, host: &Host) -> Vec<String> {
        host.overlays.ids_for(self.owner())
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    fn on_click(&mut self, host: &mut Host, event: &mut UiEvent) {
        let target = event.target;
        let attrs = [
            (&self.options.target_attr, Action::Show),
            (&self.options.toggle_attr, Action::Toggle),
            (&self.options.show_attr, Action::Show),
            (&self.options.hide_attr, Action::Hide),
        ];
        let actions: Vec<(NodeId, String, Action)> = attrs
            .into_iter()
            .filter_map(|(attr, action)| {
                let tree = host.document.tree();
                let button = tree.closest(target, &SimpleSelector::attr(attr))?;
                let id = host.document.attr(button, attr)?.to_string();
                Some((button, id, action))
            })
            .collect();

        for (button, id, action) in actions {
            event.prevent_default();
            match action {
                Action::Show => self.show(host, &id, Some(button)),
                Action::Toggle => self.toggle(host, &id, Some(button)),
                Action::Hide => self.hide(host, &id),
            };
        }

        self.on_backdrop_click(host, event);
    }

    fn on_backdrop_click(&mut self, host: &mut Host, event: &mut UiEvent) {
        let (Some(selector), Some(backdrop)) = (&self.selector, &self.backdrop) else {
            return;
        };
        let tree = host.document.tree();
        let Some(element) = tree
            .closest(event.target, backdrop)
            .and_then(|b| tree.closest(b, selector))
        else {
            return;
        };
        let Some(overlay) = self.overlays.iter().find(|o| o.element == element && o.open) else {
            return;
        };

        let id = overlay.id.clone();
        if host.document.attr(element, &self.options.backdrop_attr) == Some(STATIC_BACKDROP) {
            self.shake(host, element);
        } else if self.options.close_on_backdrop {
            event.prevent_default();
            self.hide(host, &id);
        }
    }

    /// Cosmetic nudge for a static backdrop; state does not change
    fn shake(&mut self, host: &mut Host, element: NodeId) {
        if let Some((timer, node)) = self.shake_timer.take() {
            host.timers.clear_timeout(timer);
            host.document.remove_class(node, &self.options.shake_class);
        }
        host.document.add_class(element, &self.options.shake_class);
        let timer = host.timers.set_timeout(
            self.options.shake_ms,
            HostTask::ShakeReset {
                owner: self.owner(),
                node: element,
                class: self.options.shake_class.clone(),
            },
        );
        self.shake_timer = Some((timer, element));
        tracing::debug!(kind = self.owner(), %element, "static backdrop");
    }

    fn on_key_down(&mut self, host: &mut Host, event: &mut UiEvent) {
        let owner = self.owner();
        let Some(top) = host.overlays.top().filter(|e| e.owner == owner).map(|e| e.id.clone()) else {
            return;
        };

        match Key::parse(event.key.as_deref().unwrap_or("")) {
            Key::Escape if self.options.close_on_escape && !event.is_default_prevented() => {
                event.prevent_default();
                self.hide(host, &top);
            }
            Key::Tab if self.options.trap_focus => {
                let Some(element) = self.overlays.iter().find(|o| o.id == top).map(|o| o.element) else {
                    return;
                };
                if let Some(trap) = trap_focus(&host.document, element) {
                    event.prevent_default();
                    let next = trap.step(host.document.active_element(), event.shift_key);
                    host.document.focus(next);
                }
            }
            _ => {}
        }
    }

    /// Restart the debounce; only the last resize in a burst counts
    fn on_resize(&mut self, host: &mut Host) {
        if let Some(timer) = self.resize_timer.take() {
            host.timers.clear_timeout(timer);
        }
        let timer = host.timers.set_timeout(
            self.options.resize_debounce_ms,
            HostTask::ResizeSettled { owner: self.owner() },
        );
        self.resize_timer = Some(timer);
    }

    fn on_resize_settled(&mut self, host: &mut Host) {
        self.resize_timer = None;
        let Some(breakpoint) = self.options.close_above_width else {
            return;
        };
        let width = host.document.viewport().width;
        if width >= breakpoint && self.overlays.iter().any(|o| o.open) {
            tracing::debug!(kind = self.owner(), width, "viewport past breakpoint, closing overlays");
            self.hide_all(host);
        }
    }

    /// Close everything, detach listeners and put the markup back
    pub fn destroy(&mut self, host: &mut Host) {
        self.hide_all(host);
        if let Some(timer) = self.resize_timer.take() {
            host.timers.clear_timeout(timer);
        }
        if let Some((timer, node)) = self.shake_timer.take() {
            host.timers.clear_timeout(timer);
            host.document.remove_class(node, &self.options.shake_class);
        }
        host.unlisten(&mut self.listeners);
        self.journal.restore(&mut host.document);
        self.overlays.clear();
        self.return_focus = None;
        tracing::debug!("{}s destroyed", self.owner());
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Show,
    Toggle,
    Hide,
}

impl Controller for OverlayController {
    fn owner(&self) -> &'static str {
        OverlayController::owner(self)
    }

    fn initialize(&mut self, host: &mut Host, root: NodeId) {
        OverlayController::initialize(self, host, root);
    }

    fn handle_event(&mut self, host: &mut Host, _listener: &Listener, event: &mut UiEvent) {
        match event.event_type {
            EventType::Click => self.on_click(host, event),
            EventType::KeyDown => self.on_key_down(host, event),
            EventType::Resize => self.on_resize(host),
            _ => {}
        }
    }

    fn handle_task(&mut self, host: &mut Host, task: &HostTask) {
        match task {
            HostTask::ResizeSettled { .. } => self.on_resize_settled(host),
            HostTask::ShakeReset { node, class, .. } => {
                self.shake_timer = None;
                host.document.remove_class(*node, class);
            }
        }
    }

    fn destroy(&mut self, host: &mut Host) {
        OverlayController::destroy(self, host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = r##"
        <button id="open" data-modal-target="confirm" aria-expanded="false">Open</button>
        <button id="show" data-modal-show="confirm" aria-expanded="false">Show</button>
        <button id="menu" aria-expanded="false">Menu</button>
        <div class="modal" id="confirm" aria-labelledby="confirm-title">
            <div class="modal__backdrop"></div>
            <h2 id="confirm-title">Sure?</h2>
            <button id="ok">OK</button>
            <button id="cancel" data-modal-hide="confirm">Cancel</button>
        </div>
        <div class="modal" id="static" data-modal-backdrop="static">
            <div class="modal__backdrop" id="static-backdrop"></div>
            <a href="#x" id="link">x</a>
        </div>
        <div class="modal">no id</div>
    "##;

    fn setup() -> (Host, OverlayController) {
        let mut host = Host::new(morph_html::parse(MARKUP).unwrap());
        let mut modal = OverlayController::modal();
        let root = host.document.root();
        modal.initialize(&mut host, root);
        (host, modal)
    }

    fn node(host: &Host, id: &str) -> NodeId {
        host.document.get_element_by_id(id).unwrap()
    }

    #[test]
    fn test_initialize_skips_missing_id() {
        let (host, modal) = setup();
        assert_eq!(modal.len(), 2);
        let confirm = node(&host, "confirm");
        assert_eq!(host.document.attr(confirm, "role"), Some("dialog"));
        assert_eq!(host.document.attr(confirm, "aria-modal"), Some("true"));
        assert_eq!(host.document.attr(confirm, "aria-hidden"), Some("true"));
        assert_eq!(host.document.attr(confirm, "data-modal-state"), Some("hidden"));
    }

    #[test]
    fn test_show_twice_emits_once() {
        let (mut host, mut modal) = setup();
        assert!(modal.show(&mut host, "confirm", None));
        assert!(!modal.show(&mut host, "confirm", None));
        assert!(!modal.hide(&mut host, "static"));

        let names: Vec<&str> = host.document.dispatched().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["modal:show"]);
        assert_eq!(host.document.active_element(), Some(node(&host, "ok")));
        assert!(host.scroll_lock.is_locked());
    }

    #[test]
    fn test_trigger_click_and_focus_return() {
        let (mut host, mut modal) = setup();
        let open = node(&host, "open");
        host.document.focus(open);

        let mut click = UiEvent::click(open);
        modal.on_click(&mut host, &mut click);
        assert!(click.is_default_prevented());
        assert!(modal.is_open("confirm"));
        assert_eq!(host.document.attr(open, "aria-expanded"), Some("true"));

        let mut cancel = UiEvent::click(node(&host, "cancel"));
        modal.on_click(&mut host, &mut cancel);
        assert!(!modal.is_open("confirm"));
        assert_eq!(host.document.attr(open, "aria-expanded"), Some("false"));
        assert_eq!(host.document.active_element(), Some(open));
        assert!(!host.scroll_lock.is_locked());
    }

    #[test]
    fn test_hide_collapses_every_trigger_that_expanded() {
        let (mut host, mut modal) = setup();
        let show = node(&host, "show");
        modal.on_click(&mut host, &mut UiEvent::click(show));
        assert_eq!(host.document.attr(show, "aria-expanded"), Some("true"));
        modal.hide(&mut host, "confirm");
        assert_eq!(host.document.attr(show, "aria-expanded"), Some("false"));

        // a trigger passed in directly carries no data attribute
        let menu = node(&host, "menu");
        modal.show(&mut host, "confirm", Some(menu));
        assert_eq!(host.document.attr(menu, "aria-expanded"), Some("true"));
        modal.hide(&mut host, "confirm");
        assert_eq!(host.document.attr(menu, "aria-expanded"), Some("false"));
    }

    #[test]
    fn test_static_backdrop_shakes() {
        let (mut host, mut modal) = setup();
        modal.show(&mut host, "static", None);
        let element = node(&host, "static");

        let mut click = UiEvent::click(node(&host, "static-backdrop"));
        modal.on_click(&mut host, &mut click);
        assert!(modal.is_open("static"));
        assert!(host.document.has_class(element, "modal--shake"));

        for task in host.timers.advance(500) {
            modal.handle_task(&mut host, &task);
        }
        assert!(!host.document.has_class(element, "modal--shake"));
    }

    #[test]
    fn test_tab_wraps_inside_trap() {
        let (mut host, mut modal) = setup();
        modal.show(&mut host, "confirm", None);
        let ok = node(&host, "ok");
        let cancel = node(&host, "cancel");

        let mut tab = UiEvent::key_down(ok, "Tab");
        modal.on_key_down(&mut host, &mut tab);
        assert_eq!(host.document.active_element(), Some(cancel));

        let mut tab = UiEvent::key_down(cancel, "Tab");
        modal.on_key_down(&mut host, &mut tab);
        assert!(tab.is_default_prevented());
        assert_eq!(host.document.active_element(), Some(ok));

        let mut back = UiEvent::key_down(ok, "Tab").with_shift();
        modal.on_key_down(&mut host, &mut back);
        assert_eq!(host.document.active_element(), Some(cancel));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let (mut host, mut modal) = setup();
        assert!(!modal.show(&mut host, "nope", None));
        assert!(!modal.toggle(&mut host, "nope", None));
        assert!(host.document.dispatched().is_empty());
    }
}
