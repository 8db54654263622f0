//! Accordion
//!
//! Groups of trigger/panel items inside `[data-accordion]` containers.
//! The attribute value selects the group mode; triggers carry their
//! initial state in `aria-expanded`.

use morph_a11y::aria::{bool_str, parse_bool, ARIA_CONTROLS, ARIA_EXPANDED, ARIA_LABELLEDBY, ROLE};
use morph_a11y::{roving_target, AriaRole, Key, Orientation};
use morph_dom::{
    Document, EventDetail, EventType, Listener, ListenerHandle, NodeId, SimpleSelector, UiEvent,
};

use crate::config::AccordionOptions;
use crate::disclosure::{Group, GroupMode, GroupRegistry, Item, ItemState, Transition};
use crate::host::Host;
use crate::runtime::Controller;
use crate::util::{dispatch, ensure_id, is_disabled, query_inclusive, AttrJournal};
use crate::WidgetError;

const OWNER: &str = "accordion";

/// Compiled selectors
#[derive(Debug, Clone)]
struct Selectors {
    container: SimpleSelector,
    item: SimpleSelector,
    trigger: SimpleSelector,
    panel: SimpleSelector,
}

impl Selectors {
    fn compile(options: &AccordionOptions) -> Result<Self, WidgetError> {
        Ok(Self {
            container: SimpleSelector::attr(&options.container_attr),
            item: SimpleSelector::parse(&options.item_selector)?,
            trigger: SimpleSelector::parse(&options.trigger_selector)?,
            panel: SimpleSelector::parse(&options.panel_selector)?,
        })
    }
}

/// Accordion controller
#[derive(Debug, Default)]
pub struct AccordionController {
    options: AccordionOptions,
    selectors: Option<Selectors>,
    groups: GroupRegistry,
    journal: AttrJournal,
    listeners: Vec<ListenerHandle>,
}

impl AccordionController {
    pub fn new(options: AccordionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &AccordionOptions {
        &self.options
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    /// Scan `root` and register every accordion group found
    pub fn initialize(&mut self, host: &mut Host, root: NodeId) {
        let selectors = match Selectors::compile(&self.options) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "accordion selectors rejected");
                return;
            }
        };

        for container in query_inclusive(&host.document, root, &selectors.container) {
            if self.groups.by_container(container).is_some() {
                continue;
            }
            match self.scan_group(&mut host.document, &selectors, container) {
                Ok(group) => {
                    tracing::debug!(%container, mode = ?group.mode, items = group.items.len(), "accordion registered");
                    self.groups.insert(group);
                }
                Err(err) => tracing::warn!(error = %err, "accordion skipped"),
            }
        }

        if !self.groups.is_empty() {
            self.listeners.push(host.listen(OWNER, NodeId::ROOT, EventType::Click));
            if self.options.keyboard_nav {
                self.listeners.push(host.listen(OWNER, NodeId::ROOT, EventType::KeyDown));
            }
        }
        self.selectors = Some(selectors);
        tracing::info!("Initialized {} accordion(s)", self.groups.len());
    }

    fn scan_group(
        &mut self,
        doc: &mut Document,
        selectors: &Selectors,
        container: NodeId,
    ) -> Result<Group, WidgetError> {
        let raw = doc.attr(container, &self.options.container_attr).unwrap_or("").to_string();
        let mode = if raw.trim().is_empty() {
            GroupMode::Independent
        } else {
            GroupMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(%container, mode = %raw, "unknown accordion mode, using independent");
                GroupMode::Independent
            })
        };

        // Items of nested accordions belong to the nested container
        let owned: Vec<NodeId> = doc
            .tree()
            .query_all(container, &selectors.item)
            .into_iter()
            .filter(|&item| doc.tree().closest(item, &selectors.container) == Some(container))
            .collect();

        let g = self.groups.len();
        let mut items = Vec::new();
        for node in owned {
            let trigger = doc.tree().query_first(node, &selectors.trigger);
            let panel = doc.tree().query_first(node, &selectors.panel);
            let (Some(trigger), Some(panel)) = (trigger, panel) else {
                let err = WidgetError::MissingPart {
                    kind: OWNER,
                    container: node,
                    part: "trigger or content".into(),
                };
                tracing::warn!(error = %err, "incomplete accordion item");
                continue;
            };

            let i = items.len();
            let trigger_id = ensure_id(doc, trigger, &self.options.trigger_id_prefix, g, i);
            let panel_id = ensure_id(doc, panel, &self.options.panel_id_prefix, g, i);
            items.push(Item {
                trigger,
                panel,
                trigger_id,
                panel_id,
                open: parse_bool(doc.attr(trigger, ARIA_EXPANDED)),
                disabled: is_disabled(doc, trigger),
            });
        }

        if items.is_empty() {
            return Err(WidgetError::MissingPart {
                kind: OWNER,
                container,
                part: "items".into(),
            });
        }

        let mut group = Group::new(container, mode, items);
        if group.normalize() {
            tracing::debug!(%container, "accordion markup had several open items");
        }
        for item in &group.items {
            project(&mut self.journal, doc, item);
        }
        Ok(group)
    }

    /// Flip the item owning `trigger`; returns whether anything changed
    pub fn toggle(&mut self, host: &mut Host, trigger: NodeId) -> bool {
        match self.groups.by_trigger(trigger) {
            Some((gi, ii)) => {
                let plan = self.groups.get(gi).map(|g| g.plan_toggle(ii)).unwrap_or_default();
                self.run(host, gi, plan)
            }
            None => false,
        }
    }

    pub fn open_by_id(&mut self, host: &mut Host, panel_id: &str) -> bool {
        self.set_by_id(host, panel_id, Some(true))
    }

    pub fn close_by_id(&mut self, host: &mut Host, panel_id: &str) -> bool {
        self.set_by_id(host, panel_id, Some(false))
    }

    pub fn toggle_by_id(&mut self, host: &mut Host, panel_id: &str) -> bool {
        self.set_by_id(host, panel_id, None)
    }

    fn set_by_id(&mut self, host: &mut Host, panel_id: &str, open: Option<bool>) -> bool {
        let Some((gi, ii)) = self.groups.by_panel_id(panel_id) else {
            tracing::debug!(panel_id, "no accordion item with that panel");
            return false;
        };
        let plan = self
            .groups
            .get(gi)
            .map(|g| match open {
                Some(open) => g.plan(ii, open),
                None => g.plan_toggle(ii),
            })
            .unwrap_or_default();
        self.run(host, gi, plan)
    }

    /// Open every item of the group at `container`, one after another.
    /// An exclusive group ends with its last item open.
    pub fn open_all(&mut self, host: &mut Host, container: NodeId) -> bool {
        self.set_all(host, container, true)
    }

    pub fn close_all(&mut self, host: &mut Host, container: NodeId) -> bool {
        self.set_all(host, container, false)
    }

    fn set_all(&mut self, host: &mut Host, container: NodeId, open: bool) -> bool {
        let Some(gi) = self.groups.by_container(container) else {
            return false;
        };
        let len = self.groups.get(gi).map_or(0, |g| g.items.len());
        let mut changed = false;
        for ii in 0..len {
            let plan = self.groups.get(gi).map(|g| g.plan(ii, open)).unwrap_or_default();
            changed |= self.run(host, gi, plan);
        }
        changed
    }

    /// Apply planned transitions in order: model, markup, then event
    fn run(&mut self, host: &mut Host, gi: usize, plan: Vec<Transition>) -> bool {
        if plan.is_empty() {
            return false;
        }
        let Some(group) = self.groups.get_mut(gi) else {
            return false;
        };
        let doc = &mut host.document;
        for transition in plan {
            group.apply(transition);
            let index = transition.index();
            let item = &group.items[index];
            project(&mut self.journal, doc, item);

            let name = match transition {
                Transition::Open(_) => "accordion:open",
                Transition::Close(_) => "accordion:close",
            };
            tracing::debug!(panel = %item.panel_id, open = item.open, "accordion item changed");
            dispatch(
                doc,
                group.container,
                name,
                EventDetail {
                    trigger: Some(item.trigger),
                    panel: Some(item.panel),
                    index: Some(index),
                    id: None,
                },
            );
        }
        true
    }

    pub fn is_open(&self, panel_id: &str) -> bool {
        self.groups
            .by_panel_id(panel_id)
            .and_then(|(gi, ii)| self.groups.get(gi).map(|g| g.items[ii].open))
            .unwrap_or(false)
    }

    pub fn state(&self, container: NodeId) -> Vec<ItemState> {
        self.groups
            .by_container(container)
            .and_then(|gi| self.groups.get(gi))
            .map(Group::state)
            .unwrap_or_default()
    }

    fn on_click(&mut self, host: &mut Host, event: &UiEvent) {
        let Some(selectors) = &self.selectors else {
            return;
        };
        let Some(trigger) = host.document.tree().closest(event.target, &selectors.trigger) else {
            return;
        };
        let Some((gi, ii)) = self.groups.by_trigger(trigger) else {
            return;
        };
        if self.groups.get(gi).is_some_and(|g| g.items[ii].disabled) {
            return;
        }
        self.toggle(host, trigger);
    }

    /// Arrow/Home/End move focus between triggers; state never changes
    fn on_key_down(&mut self, host: &mut Host, event: &mut UiEvent) {
        let Some((gi, ii)) = self.groups.by_trigger(event.target) else {
            return;
        };
        let Some(group) = self.groups.get(gi) else {
            return;
        };
        let key = Key::parse(event.key.as_deref().unwrap_or(""));
        let target = roving_target(&key, Orientation::Vertical, ii, group.items.len(), |i| {
            group.items[i].disabled
        });
        if let Some(target) = target {
            event.prevent_default();
            host.document.focus(group.items[target].trigger);
        }
    }

    /// Detach listeners and put the markup back
    pub fn destroy(&mut self, host: &mut Host) {
        host.unlisten(&mut self.listeners);
        self.journal.restore(&mut host.document);
        self.groups.clear();
        tracing::debug!("accordions destroyed");
    }
}

/// Write one item's state onto its trigger and panel
fn project(journal: &mut AttrJournal, doc: &mut Document, item: &Item) {
    journal.set(doc, item.trigger, ARIA_EXPANDED, bool_str(item.open));
    journal.set(doc, item.trigger, ARIA_CONTROLS, &item.panel_id);
    journal.set(doc, item.panel, ROLE, AriaRole::Region.as_str());
    journal.set(doc, item.panel, ARIA_LABELLEDBY, &item.trigger_id);
    journal.set_hidden(doc, item.panel, !item.open);
}

impl Controller for AccordionController {
    fn owner(&self) -> &'static str {
        OWNER
    }

    fn initialize(&mut self, host: &mut Host, root: NodeId) {
        AccordionController::initialize(self, host, root);
    }

    fn handle_event(&mut self, host: &mut Host, _listener: &Listener, event: &mut UiEvent) {
        match event.event_type {
            EventType::Click => self.on_click(host, event),
            EventType::KeyDown => self.on_key_down(host, event),
            _ => {}
        }
    }

    fn destroy(&mut self, host: &mut Host) {
        AccordionController::destroy(self, host);
    }
}
