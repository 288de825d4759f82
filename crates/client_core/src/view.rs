//! Pane selection state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pane {
    #[default]
    Passengers,
    Invoices,
    Summary,
}

impl Pane {
    pub const ALL: [Pane; 3] = [Pane::Passengers, Pane::Invoices, Pane::Summary];

    pub fn label(self) -> &'static str {
        match self {
            Self::Passengers => "Passengers",
            Self::Invoices => "Invoices",
            Self::Summary => "Summary",
        }
    }

    /// The data load a pane needs every time it becomes visible.
    pub fn load(self) -> PaneLoad {
        match self {
            Self::Passengers => PaneLoad::Passengers,
            Self::Invoices => PaneLoad::Invoices,
            Self::Summary => PaneLoad::Summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneLoad {
    Passengers,
    Invoices,
    Summary,
}

/// Exactly one pane is visible at a time. Selecting a pane, even the one
/// already showing, always asks for a fresh load.
#[derive(Debug, Clone, Default)]
pub struct ViewSelector {
    active: Pane,
}

impl ViewSelector {
    pub fn new(initial: Pane) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> Pane {
        self.active
    }

    pub fn is_visible(&self, pane: Pane) -> bool {
        self.active == pane
    }

    pub fn visibility(&self) -> [(Pane, bool); 3] {
        Pane::ALL.map(|pane| (pane, self.is_visible(pane)))
    }

    pub fn select(&mut self, pane: Pane) -> PaneLoad {
        self.active = pane;
        pane.load()
    }
}
