//! Text input affordances
//!
//! `.input-text` wrappers: clicking the wrapper focuses its input, a
//! clear button empties it, and a password toggle flips between masked
//! and plain text.

use morph_a11y::aria::ARIA_LABEL;
use morph_dom::{
    Document, EventDetail, EventType, Listener, ListenerHandle, NodeId, SimpleSelector, UiEvent,
};

use crate::config::TextInputOptions;
use crate::host::Host;
use crate::runtime::Controller;
use crate::util::{dispatch, query_inclusive, AttrJournal};
use crate::WidgetError;

const OWNER: &str = "text-input";

#[derive(Debug, Clone)]
struct Selectors {
    wrapper: SimpleSelector,
    input: SimpleSelector,
    action: SimpleSelector,
    clear: SimpleSelector,
    toggle: SimpleSelector,
}

impl Selectors {
    fn compile(options: &TextInputOptions) -> Result<Self, WidgetError> {
        Ok(Self {
            wrapper: SimpleSelector::parse(&options.wrapper_selector)?,
            input: SimpleSelector::parse(&options.input_selector)?,
            action: SimpleSelector::parse(&options.action_selector)?,
            clear: SimpleSelector::parse(&options.clear_selector)?,
            toggle: SimpleSelector::parse(&options.password_toggle_selector)?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Field {
    wrapper: NodeId,
    input: NodeId,
    clear: Option<NodeId>,
    toggle: Option<NodeId>,
}

/// Text input controller
#[derive(Debug, Default)]
pub struct TextInputController {
    options: TextInputOptions,
    selectors: Option<Selectors>,
    fields: Vec<Field>,
    journal: AttrJournal,
    listeners: Vec<ListenerHandle>,
}

impl TextInputController {
    pub fn new(options: TextInputOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn initialize(&mut self, host: &mut Host, root: NodeId) {
        let selectors = match Selectors::compile(&self.options) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(error = %err, "text input selectors rejected");
                return;
            }
        };

        for wrapper in query_inclusive(&host.document, root, &selectors.wrapper) {
            if self.fields.iter().any(|f| f.wrapper == wrapper) {
                continue;
            }
            let tree = host.document.tree();
            let Some(input) = tree.query_first(wrapper, &selectors.input) else {
                let err = WidgetError::MissingPart {
                    kind: OWNER,
                    container: wrapper,
                    part: "input".into(),
                };
                tracing::warn!(error = %err, "text input skipped");
                continue;
            };
            let field = Field {
                wrapper,
                input,
                clear: tree.query_first(wrapper, &selectors.clear),
                toggle: tree.query_first(wrapper, &selectors.toggle),
            };
            self.sync_clear(&mut host.document, &field);
            self.fields.push(field);
        }

        if !self.fields.is_empty() {
            self.listeners.push(host.listen(OWNER, NodeId::ROOT, EventType::Click));
            self.listeners.push(host.listen(OWNER, NodeId::ROOT, EventType::Input));
        }
        self.selectors = Some(selectors);
        tracing::info!("Initialized {} text input(s)", self.fields.len());
    }

    /// Clear button is visible only while the input has a value
    fn sync_clear(&mut self, doc: &mut Document, field: &Field) {
        if let Some(clear) = field.clear {
            let empty = doc.value(field.input).is_empty();
            self.journal.set_hidden(doc, clear, empty);
        }
    }

    fn field_at(&self, doc: &Document, node: NodeId) -> Option<Field> {
        self.fields
            .iter()
            .find(|f| doc.tree().contains(f.wrapper, node))
            .copied()
    }

    /// Empty the input, refocus it and announce the change
    pub fn clear(&mut self, host: &mut Host, input: NodeId) -> bool {
        let Some(field) = self.fields.iter().find(|f| f.input == input).copied() else {
            return false;
        };
        let doc = &mut host.document;
        doc.set_value(field.input, "");
        doc.focus(field.input);
        if let Some(clear) = field.clear {
            self.journal.set_hidden(doc, clear, true);
        }
        dispatch(doc, field.input, "input", EventDetail::default());
        true
    }

    /// Flip between masked and plain text; returns whether the value is
    /// now visible
    pub fn toggle_password(&mut self, host: &mut Host, input: NodeId) -> Option<bool> {
        let field = self.fields.iter().find(|f| f.input == input).copied()?;
        let doc = &mut host.document;
        let reveal = doc.attr(field.input, "type") == Some("password");
        self.journal.set(doc, field.input, "type", if reveal { "text" } else { "password" });

        if let Some(button) = field.toggle {
            let label = if reveal {
                &self.options.hide_password_label
            } else {
                &self.options.show_password_label
            };
            self.journal.set(doc, button, ARIA_LABEL, label);

            let icon = if reveal {
                &self.options.icon_revealed
            } else {
                &self.options.icon_masked
            };
            let sprite = doc.tree().query_first(button, &SimpleSelector::Tag("use".into()));
            if let Some(sprite) = sprite {
                let href = doc.attr(sprite, "href").unwrap_or("");
                let base = href.rsplit_once('#').map_or("", |(base, _)| base);
                let href = format!("{base}#{icon}");
                self.journal.set(doc, sprite, "href", &href);
            }
        }
        tracing::debug!(%input, reveal, "password visibility toggled");
        Some(reveal)
    }

    fn on_click(&mut self, host: &mut Host, event: &mut UiEvent) {
        let target = event.target;
        let Some(field) = self.field_at(&host.document, target) else {
            return;
        };
        let tree = host.document.tree();
        let within = |node: Option<NodeId>| node.is_some_and(|n| tree.contains(n, target));
        let on_clear = within(field.clear);
        let on_toggle = within(field.toggle);
        let on_action = self
            .selectors
            .as_ref()
            .and_then(|s| tree.closest(target, &s.action))
            .is_some_and(|action| tree.contains(field.wrapper, action));

        if on_clear {
            event.prevent_default();
            self.clear(host, field.input);
        } else if on_toggle {
            event.prevent_default();
            self.toggle_password(host, field.input);
        }

        if target != field.input && !on_action {
            host.document.focus(field.input);
        }
    }

    fn on_input(&mut self, host: &mut Host, event: &UiEvent) {
        if let Some(field) = self.fields.iter().find(|f| f.input == event.target).copied() {
            self.sync_clear(&mut host.document, &field);
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn destroy(&mut self, host: &mut Host) {
        host.unlisten(&mut self.listeners);
        self.journal.restore(&mut host.document);
        self.fields.clear();
    }
}

impl Controller for TextInputController {
    fn owner(&self) -> &'static str {
        OWNER
    }

    fn initialize(&mut self, host: &mut Host, root: NodeId) {
        TextInputController::initialize(self, host, root);
    }

    fn handle_event(&mut self, host: &mut Host, _listener: &Listener, event: &mut UiEvent) {
        match event.event_type {
            EventType::Click => self.on_click(host, event),
            EventType::Input => self.on_input(host, event),
            _ => {}
        }
    }

    fn destroy(&mut self, host: &mut Host) {
        TextInputController::destroy(self, host);
    }
}
