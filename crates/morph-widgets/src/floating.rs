//! Dropdowns and tooltips
//!
//! A trigger names its panel through a target attribute. Each pair owns
//! a positioning session that is recomputed on every show, since the
//! trigger may have moved since the last one.

use std::fmt;

use morph_dom::{EventType, Listener, ListenerHandle, NodeId, SimpleSelector, UiEvent};

use crate::config::{FloatingKind, FloatingOptions};
use crate::host::Host;
use crate::positioning::{
    ComputedPosition, FloatingSession, Offset, Placement, PlacementEngine, PlacementOptions,
    ViewportEngine,
};
use crate::runtime::Controller;
use crate::util::{query_inclusive, AttrJournal};
use crate::WidgetError;

struct Pair {
    trigger: NodeId,
    panel: NodeId,
    panel_id: String,
    session: FloatingSession,
    listeners: Vec<ListenerHandle>,
    shown: bool,
}

/// Dropdown/tooltip controller
pub struct FloatingController {
    options: FloatingOptions,
    engine: Box<dyn PlacementEngine>,
    pairs: Vec<Pair>,
    journal: AttrJournal,
    /// Document-level listeners (dropdown outside click)
    listeners: Vec<ListenerHandle>,
}

impl fmt::Debug for FloatingController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FloatingController")
            .field("kind", &self.options.kind)
            .field("pairs", &self.pairs.len())
            .field("shown", &self.pairs.iter().filter(|p| p.shown).count())
            .finish_non_exhaustive()
    }
}

impl FloatingController {
    pub fn new(options: FloatingOptions) -> Self {
        Self::with_engine(options, Box::new(ViewportEngine))
    }

    /// Use a custom placement engine
    pub fn with_engine(options: FloatingOptions, engine: Box<dyn PlacementEngine>) -> Self {
        Self {
            options,
            engine,
            pairs: Vec::new(),
            journal: AttrJournal::new(),
            listeners: Vec::new(),
        }
    }

    pub fn dropdown() -> Self {
        Self::new(FloatingOptions::dropdown())
    }

    pub fn tooltip() -> Self {
        Self::new(FloatingOptions::tooltip())
    }

    pub fn options(&self) -> &FloatingOptions {
        &self.options
    }

    fn owner(&self) -> &'static str {
        self.options.kind.as_str()
    }

    pub fn initialize(&mut self, host: &mut Host, root: NodeId) {
        let selector = SimpleSelector::attr(&self.options.target_attr);
        for trigger in query_inclusive(&host.document, root, &selector) {
            if self.index_of(trigger).is_some() {
                continue;
            }
            if host.document.has_attr(trigger, "disabled") {
                tracing::debug!(kind = self.owner(), %trigger, "disabled trigger skipped");
                continue;
            }
            if let Err(err) = self.register(host, trigger) {
                tracing::warn!(error = %err, "floating trigger skipped");
            }
        }

        if self.options.kind == FloatingKind::Dropdown && !self.pairs.is_empty() {
            self.listeners.push(host.listen(self.owner(), NodeId::ROOT, EventType::Click));
        }
        tracing::info!("Initialized {} {}(s)", self.pairs.len(), self.owner());
    }

    fn register(&mut self, host: &mut Host, trigger: NodeId) -> Result<(), WidgetError> {
        let kind = self.owner();
        let doc = &host.document;
        let target = doc.attr(trigger, &self.options.target_attr).unwrap_or("").trim().to_string();
        if target.is_empty() {
            return Err(WidgetError::MissingTarget {
                kind,
                node: trigger,
                attr: self.options.target_attr.clone(),
            });
        }
        let panel = doc
            .get_element_by_id(&target)
            .ok_or_else(|| WidgetError::UnresolvedTarget { kind, id: target.clone() })?;

        let placement = match doc.attr(trigger, &self.options.placement_attr) {
            Some(raw) if !raw.trim().is_empty() => Placement::parse(raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, %trigger, "using default placement");
                self.options.placement
            }),
            _ => self.options.placement,
        };
        let offset = match doc.attr(trigger, &self.options.offset_attr) {
            Some(raw) if !raw.trim().is_empty() => Offset::parse(raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, %trigger, "using default offset");
                self.options.offset
            }),
            _ => self.options.offset,
        };
        let shown = doc.has_attr(panel, &self.options.shown_attr);

        let session = FloatingSession::new(
            trigger,
            panel,
            PlacementOptions {
                placement,
                offset,
                flip: self.options.flip,
                fallbacks: self.options.fallbacks.clone(),
                padding: self.options.padding,
                same_width: self.options.same_width,
                prevent_overflow: self.options.prevent_overflow,
            },
        );

        let events: &[EventType] = match self.options.kind {
            FloatingKind::Dropdown => &[EventType::Click],
            FloatingKind::Tooltip => &[
                EventType::MouseEnter,
                EventType::MouseLeave,
                EventType::Focus,
                EventType::Blur,
            ],
        };
        let listeners = events.iter().map(|&e| host.listen(kind, trigger, e)).collect();

        tracing::debug!(kind, %trigger, panel = %target, %placement, "floating pair registered");
        self.pairs.push(Pair {
            trigger,
            panel,
            panel_id: target,
            session,
            listeners,
            shown,
        });
        Ok(())
    }

    fn index_of(&self, trigger: NodeId) -> Option<usize> {
        self.pairs.iter().position(|p| p.trigger == trigger)
    }

    /// Show the panel of `trigger` and recompute its position
    pub fn show(&mut self, host: &mut Host, trigger: NodeId) -> bool {
        let Some(index) = self.index_of(trigger) else {
            return false;
        };
        let pair = &mut self.pairs[index];
        if pair.shown {
            return false;
        }
        self.journal.set(&mut host.document, pair.panel, &self.options.shown_attr, "");
        pair.session.recompute(&mut host.document, self.engine.as_ref());
        pair.shown = true;
        tracing::debug!(kind = self.options.kind.as_str(), panel = %pair.panel_id, "floating shown");
        true
    }

    pub fn hide(&mut self, host: &mut Host, trigger: NodeId) -> bool {
        let Some(index) = self.index_of(trigger) else {
            return false;
        };
        let pair = &mut self.pairs[index];
        if !pair.shown {
            return false;
        }
        self.journal.remove(&mut host.document, pair.panel, &self.options.shown_attr);
        pair.shown = false;
        tracing::debug!(kind = self.options.kind.as_str(), panel = %pair.panel_id, "floating hidden");
        true
    }

    pub fn toggle(&mut self, host: &mut Host, trigger: NodeId) -> bool {
        if self.is_shown(trigger) {
            self.hide(host, trigger)
        } else {
            self.show(host, trigger)
        }
    }

    /// Hide every shown panel except the one belonging to `keep`
    fn hide_others(&mut self, host: &mut Host, keep: Option<NodeId>) {
        let keep_panel = keep.and_then(|t| self.index_of(t)).map(|i| self.pairs[i].panel);
        let others: Vec<NodeId> = self
            .pairs
            .iter()
            .filter(|p| p.shown && Some(p.panel) != keep_panel)
            .map(|p| p.trigger)
            .collect();
        for trigger in others {
            self.hide(host, trigger);
        }
    }

    pub fn is_shown(&self, trigger: NodeId) -> bool {
        self.index_of(trigger).is_some_and(|i| self.pairs[i].shown)
    }

    /// Position written by the most recent show
    pub fn position(&self, trigger: NodeId) -> Option<ComputedPosition> {
        self.index_of(trigger).and_then(|i| self.pairs[i].session.last())
    }

    pub fn triggers(&self) -> Vec<NodeId> {
        self.pairs.iter().map(|p| p.trigger).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn on_trigger_event(&mut self, host: &mut Host, trigger: NodeId, event: &mut UiEvent) {
        match (self.options.kind, event.event_type) {
            (FloatingKind::Dropdown, EventType::Click) => {
                event.stop_propagation();
                self.hide_others(host, Some(trigger));
                self.toggle(host, trigger);
            }
            (FloatingKind::Tooltip, EventType::MouseEnter | EventType::Focus) => {
                self.show(host, trigger);
            }
            (FloatingKind::Tooltip, EventType::MouseLeave | EventType::Blur) => {
                self.hide(host, trigger);
            }
            _ => {}
        }
    }

    /// Clicks outside every trigger and every shown panel close all dropdowns
    fn on_outside_click(&mut self, host: &mut Host, event: &UiEvent) {
        let tree = host.document.tree();
        let inside = self.pairs.iter().any(|p| {
            tree.contains(p.trigger, event.target) || (p.shown && tree.contains(p.panel, event.target))
        });
        if !inside {
            self.hide_others(host, None);
        }
    }

    /// Detach one trigger and dispose its session; other pairs are untouched
    pub fn destroy_trigger(&mut self, host: &mut Host, trigger: NodeId) -> bool {
        let Some(index) = self.index_of(trigger) else {
            return false;
        };
        let mut pair = self.pairs.remove(index);
        host.unlisten(&mut pair.listeners);
        self.journal.restore_nodes(&mut host.document, &[pair.panel]);
        pair.session.dispose(&mut host.document);
        tracing::debug!(kind = self.owner(), %trigger, "floating trigger destroyed");

        if self.pairs.is_empty() {
            host.unlisten(&mut self.listeners);
        }
        true
    }

    pub fn destroy_all(&mut self, host: &mut Host) {
        for trigger in self.triggers() {
            self.destroy_trigger(host, trigger);
        }
        host.unlisten(&mut self.listeners);
        self.journal.restore(&mut host.document);
    }
}

impl Controller for FloatingController {
    fn owner(&self) -> &'static str {
        FloatingController::owner(self)
    }

    fn initialize(&mut self, host: &mut Host, root: NodeId) {
        FloatingController::initialize(self, host, root);
    }

    fn handle_event(&mut self, host: &mut Host, listener: &Listener, event: &mut UiEvent) {
        if listener.target == NodeId::ROOT {
            if event.event_type == EventType::Click {
                self.on_outside_click(host, event);
            }
        } else {
            self.on_trigger_event(host, listener.target, event);
        }
    }

    fn destroy(&mut self, host: &mut Host) {
        self.destroy_all(host);
    }
}
