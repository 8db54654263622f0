//! Tabs
//!
//! Single-select groups: triggers and panels are paired by position
//! inside each `.tabs` container, exactly one pair is active, and the
//! active trigger is the only tab stop (roving tabindex). Arrow keys
//! move focus and activate in one step.

use morph_a11y::aria::{
    bool_str, parse_bool, ARIA_CONTROLS, ARIA_LABELLEDBY, ARIA_SELECTED, ROLE, TABINDEX,
};
use morph_a11y::{roving_target, AriaRole, Key, Orientation};
use morph_dom::{
    Document, EventDetail, EventType, Listener, ListenerHandle, NodeId, SimpleSelector, UiEvent,
};

use crate::config::TabsOptions;
use crate::disclosure::{Group, GroupMode, GroupRegistry, Item, ItemState};
use crate::host::Host;
use crate::runtime::Controller;
use crate::util::{dispatch, ensure_id, is_disabled, query_inclusive, AttrJournal};
use crate::WidgetError;

const OWNER: &str = "tabs";

#[derive(Debug, Clone)]
struct Selectors {
    container: SimpleSelector,
    list: SimpleSelector,
    trigger: SimpleSelector,
    panel: SimpleSelector,
}

impl Selectors {
    fn compile(options: &TabsOptions) -> Result<Self, WidgetError> {
        Ok(Self {
            container: SimpleSelector::parse(&options.selector)?,
            list: SimpleSelector::parse(&options.list_selector)?,
            trigger: SimpleSelector::parse(&options.trigger_selector)?,
            panel: SimpleSelector::parse(&options.panel_selector)?,
        })
    }
}

/// Tabs controller
#[derive(Debug, Default)]
pub struct TabsController {
    options: TabsOptions,
    selectors: Option<Selectors>,
    groups: GroupRegistry,
    journal: AttrJournal,
    listeners: Vec<ListenerHandle>,
}

impl TabsController {
    pub fn new(options: TabsOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &TabsOptions {
        &self.options
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn initialize(&mut self, host: &mut Host, root: NodeId) {
        let selectors = match Selectors::compile(&self.options) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "tabs selectors rejected");
                return;
            }
        };

        for container in query_inclusive(&host.document, root, &selectors.container) {
            if self.groups.by_container(container).is_some() {
                continue;
            }
            match self.scan_group(&mut host.document, &selectors, container) {
                Ok(group) => {
                    tracing::debug!(%container, tabs = group.items.len(), active = ?group.active_index(), "tabs registered");
                    self.groups.insert(group);
                }
                Err(err) => tracing::warn!(error = %err, "tabs skipped"),
            }
        }

        if !self.groups.is_empty() {
            self.listeners.push(host.listen(OWNER, NodeId::ROOT, EventType::Click));
            if self.options.keyboard_nav {
                self.listeners.push(host.listen(OWNER, NodeId::ROOT, EventType::KeyDown));
            }
        }
        self.selectors = Some(selectors);
        tracing::info!("Initialized {} tabs group(s)", self.groups.len());
    }

    fn scan_group(
        &mut self,
        doc: &mut Document,
        selectors: &Selectors,
        container: NodeId,
    ) -> Result<Group, WidgetError> {
        let owned = |doc: &Document, selector: &SimpleSelector| -> Vec<NodeId> {
            doc.tree()
                .query_all(container, selector)
                .into_iter()
                .filter(|&n| doc.tree().closest(n, &selectors.container) == Some(container))
                .collect()
        };
        let triggers = owned(&*doc, &selectors.trigger);
        let panels = owned(&*doc, &selectors.panel);

        if triggers.is_empty() || panels.is_empty() {
            return Err(WidgetError::MissingPart {
                kind: OWNER,
                container,
                part: if triggers.is_empty() { "triggers" } else { "panels" }.into(),
            });
        }
        if triggers.len() != panels.len() {
            let err = WidgetError::CountMismatch {
                kind: OWNER,
                container,
                triggers: triggers.len(),
                panels: panels.len(),
            };
            tracing::warn!(error = %err, "pairing tabs by position");
        }

        let g = self.groups.len();
        let items: Vec<Item> = triggers
            .iter()
            .zip(&panels)
            .enumerate()
            .map(|(i, (&trigger, &panel))| Item {
                trigger,
                panel,
                trigger_id: ensure_id(doc, trigger, &self.options.trigger_id_prefix, g, i),
                panel_id: ensure_id(doc, panel, &self.options.panel_id_prefix, g, i),
                open: parse_bool(doc.attr(trigger, ARIA_SELECTED)),
                disabled: is_disabled(doc, trigger),
            })
            .collect();

        if let Some(list) = doc.tree().query_first(container, &selectors.list) {
            self.journal.set_if_missing(doc, list, ROLE, AriaRole::TabList.as_str());
        }

        let mut group = Group::new(container, GroupMode::SingleSelect, items);
        if group.normalize() {
            tracing::debug!(%container, active = ?group.active_index(), "tabs active state normalized");
        }
        for item in &group.items {
            project(&mut self.journal, doc, item);
        }
        Ok(group)
    }

    /// Activate the tab at `trigger`; false when disabled, unknown or
    /// already active
    pub fn activate(&mut self, host: &mut Host, trigger: NodeId) -> bool {
        match self.groups.by_trigger(trigger) {
            Some((gi, ii)) => self.activate_at(host, gi, ii),
            None => false,
        }
    }

    pub fn activate_by_id(&mut self, host: &mut Host, panel_id: &str) -> bool {
        match self.groups.by_panel_id(panel_id) {
            Some((gi, ii)) => self.activate_at(host, gi, ii),
            None => {
                tracing::debug!(panel_id, "no tab with that panel");
                false
            }
        }
    }

    pub fn activate_by_index(&mut self, host: &mut Host, container: NodeId, index: usize) -> bool {
        match self.groups.by_container(container) {
            Some(gi) => self.activate_at(host, gi, index),
            None => false,
        }
    }

    fn activate_at(&mut self, host: &mut Host, gi: usize, ii: usize) -> bool {
        let Some(group) = self.groups.get_mut(gi) else {
            return false;
        };
        match group.items.get(ii) {
            Some(item) if !item.disabled => {}
            _ => return false,
        }
        let plan = group.plan(ii, true);
        if plan.is_empty() {
            return false;
        }

        let doc = &mut host.document;
        for transition in plan {
            group.apply(transition);
            project(&mut self.journal, doc, &group.items[transition.index()]);
        }

        let item = &group.items[ii];
        tracing::debug!(panel = %item.panel_id, index = ii, "tab activated");
        dispatch(
            doc,
            group.container,
            "tabs:change",
            EventDetail {
                trigger: Some(item.trigger),
                panel: Some(item.panel),
                index: Some(ii),
                id: None,
            },
        );
        true
    }

    pub fn active_index(&self, container: NodeId) -> Option<usize> {
        self.groups
            .by_container(container)
            .and_then(|gi| self.groups.get(gi))
            .and_then(Group::active_index)
    }

    pub fn state(&self, container: NodeId) -> Vec<ItemState> {
        self.groups
            .by_container(container)
            .and_then(|gi| self.groups.get(gi))
            .map(Group::state)
            .unwrap_or_default()
    }

    fn on_click(&mut self, host: &mut Host, event: &mut UiEvent) {
        let Some(selectors) = &self.selectors else {
            return;
        };
        let Some(trigger) = host.document.tree().closest(event.target, &selectors.trigger) else {
            return;
        };
        if self.groups.by_trigger(trigger).is_some() {
            event.prevent_default();
            self.activate(host, trigger);
        }
    }

    fn on_key_down(&mut self, host: &mut Host, event: &mut UiEvent) {
        let Some((gi, ii)) = self.groups.by_trigger(event.target) else {
            return;
        };
        let Some(group) = self.groups.get(gi) else {
            return;
        };
        let key = Key::parse(event.key.as_deref().unwrap_or(""));
        let Some(target) = roving_target(&key, Orientation::Horizontal, ii, group.items.len(), |i| {
            group.items[i].disabled
        }) else {
            return;
        };

        let trigger = group.items[target].trigger;
        event.prevent_default();
        self.activate_at(host, gi, target);
        host.document.focus(trigger);
    }

    pub fn destroy(&mut self, host: &mut Host) {
        host.unlisten(&mut self.listeners);
        self.journal.restore(&mut host.document);
        self.groups.clear();
        tracing::debug!("tabs destroyed");
    }
}

fn project(journal: &mut AttrJournal, doc: &mut Document, item: &Item) {
    journal.set(doc, item.trigger, ROLE, AriaRole::Tab.as_str());
    journal.set(doc, item.trigger, ARIA_SELECTED, bool_str(item.open));
    journal.set(doc, item.trigger, ARIA_CONTROLS, &item.panel_id);
    journal.set(doc, item.trigger, TABINDEX, if item.open { "0" } else { "-1" });
    journal.set(doc, item.panel, ROLE, AriaRole::TabPanel.as_str());
    journal.set(doc, item.panel, ARIA_LABELLEDBY, &item.trigger_id);
    journal.set_hidden(doc, item.panel, !item.open);
}

impl Controller for TabsController {
    fn owner(&self) -> &'static str {
        OWNER
    }

    fn initialize(&mut self, host: &mut Host, root: NodeId) {
        TabsController::initialize(self, host, root);
    }

    fn handle_event(&mut self, host: &mut Host, _listener: &Listener, event: &mut UiEvent) {
        match event.event_type {
            EventType::Click => self.on_click(host, event),
            EventType::KeyDown => self.on_key_down(host, event),
            _ => {}
        }
    }

    fn destroy(&mut self, host: &mut Host) {
        TabsController::destroy(self, host);
    }
}
