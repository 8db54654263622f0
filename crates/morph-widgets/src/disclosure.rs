//! Disclosure model
//!
//! The item/group state shared by accordion and tabs. Controllers never
//! read state back from markup after the scan: operations plan a list of
//! transitions against the model, apply them, and then project the model
//! onto attributes.

use morph_dom::NodeId;

/// Group behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// Any subset of items may be open
    #[default]
    Independent,
    /// At most one item open; zero is allowed
    Exclusive,
    /// Exactly one item active at all times
    SingleSelect,
}

impl GroupMode {
    /// Parse a mode attribute. The theme's `collapse`/`open` values map
    /// to exclusive/independent.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "independent" | "open" => Some(Self::Independent),
            "exclusive" | "collapse" => Some(Self::Exclusive),
            "single-select" | "single" => Some(Self::SingleSelect),
            _ => None,
        }
    }
}

/// One trigger/panel pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub trigger: NodeId,
    pub panel: NodeId,
    pub trigger_id: String,
    pub panel_id: String,
    /// Open (accordion) or active (tabs)
    pub open: bool,
    pub disabled: bool,
}

/// Single state change planned for an item index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Open(usize),
    Close(usize),
}

impl Transition {
    pub fn index(&self) -> usize {
        match self {
            Self::Open(i) | Self::Close(i) => *i,
        }
    }
}

/// Snapshot of one item for `state()` queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemState {
    pub panel_id: String,
    pub trigger_id: String,
    pub open: bool,
}

/// Items sharing one container
#[derive(Debug, Clone)]
pub struct Group {
    pub container: NodeId,
    pub mode: GroupMode,
    pub items: Vec<Item>,
}

impl Group {
    pub fn new(container: NodeId, mode: GroupMode, items: Vec<Item>) -> Self {
        Self {
            container,
            mode,
            items,
        }
    }

    /// Bring markup-derived state in line with the mode invariant.
    ///
    /// Exclusive groups keep only their first open item. Single-select
    /// groups with zero or several active items fall back to the first
    /// enabled item. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let open: Vec<usize> = self.open_indices();
        match self.mode {
            GroupMode::Independent => false,
            GroupMode::Exclusive if open.len() > 1 => {
                for &i in &open[1..] {
                    self.items[i].open = false;
                }
                true
            }
            GroupMode::SingleSelect if open.len() != 1 && !self.items.is_empty() => {
                let target = self.first_enabled().unwrap_or(0);
                for (i, item) in self.items.iter_mut().enumerate() {
                    item.open = i == target;
                }
                true
            }
            _ => false,
        }
    }

    /// Transitions that set item `index` to `open`, honouring the mode.
    ///
    /// Sibling closes always come before the open. Requests that would not
    /// change state, or would leave a single-select group empty, plan
    /// nothing.
    pub fn plan(&self, index: usize, open: bool) -> Vec<Transition> {
        let Some(item) = self.items.get(index) else {
            return Vec::new();
        };
        if item.open == open {
            return Vec::new();
        }
        if !open {
            return match self.mode {
                GroupMode::SingleSelect => Vec::new(),
                _ => vec![Transition::Close(index)],
            };
        }

        let mut plan: Vec<Transition> = match self.mode {
            GroupMode::Independent => Vec::new(),
            GroupMode::Exclusive | GroupMode::SingleSelect => self
                .open_indices()
                .into_iter()
                .filter(|&i| i != index)
                .map(Transition::Close)
                .collect(),
        };
        plan.push(Transition::Open(index));
        plan
    }

    /// Plan flipping item `index`
    pub fn plan_toggle(&self, index: usize) -> Vec<Transition> {
        match self.items.get(index) {
            Some(item) => self.plan(index, !item.open),
            None => Vec::new(),
        }
    }

    /// Apply one transition to the model
    pub fn apply(&mut self, transition: Transition) {
        if let Some(item) = self.items.get_mut(transition.index()) {
            item.open = matches!(transition, Transition::Open(_));
        }
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.open)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn open_count(&self) -> usize {
        self.items.iter().filter(|item| item.open).count()
    }

    /// First open item
    pub fn active_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.open)
    }

    pub fn first_enabled(&self) -> Option<usize> {
        self.items.iter().position(|item| !item.disabled)
    }

    pub fn index_of_trigger(&self, trigger: NodeId) -> Option<usize> {
        self.items.iter().position(|item| item.trigger == trigger)
    }

    pub fn index_of_panel_id(&self, panel_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.panel_id == panel_id)
    }

    pub fn state(&self) -> Vec<ItemState> {
        self.items
            .iter()
            .map(|item| ItemState {
                panel_id: item.panel_id.clone(),
                trigger_id: item.trigger_id.clone(),
                open: item.open,
            })
            .collect()
    }
}

/// Groups registered by one controller, keyed by container
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: Vec<Group>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group; returns its index
    pub fn insert(&mut self, group: Group) -> usize {
        self.groups.push(group);
        self.groups.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Group> {
        self.groups.get_mut(index)
    }

    pub fn by_container(&self, container: NodeId) -> Option<usize> {
        self.groups.iter().position(|g| g.container == container)
    }

    /// (group, item) owning `trigger`
    pub fn by_trigger(&self, trigger: NodeId) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(gi, g)| g.index_of_trigger(trigger).map(|ii| (gi, ii)))
    }

    /// (group, item) whose panel carries `panel_id`
    pub fn by_panel_id(&self, panel_id: &str) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(gi, g)| g.index_of_panel_id(panel_id).map(|ii| (gi, ii)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
