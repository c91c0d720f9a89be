use crate::field::{DialScale, FieldSet};
use crate::input::ButtonMap;
use crate::presenter::Layout;

/// Engine configuration.
///
/// The default edits every field with a 12 bit dial, uses S1 to enter edit
/// mode, S2 to advance, S4 to confirm, and shows everything at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Fields reachable in edit mode. The rest are display only.
    pub editable: FieldSet,
    pub dial: DialScale,
    pub buttons: ButtonMap,
    pub layout: Layout,
}

impl EngineConfig {
    pub fn with_editable(mut self, editable: FieldSet) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_buttons(mut self, buttons: ButtonMap) -> Self {
        self.buttons = buttons;
        self
    }
}
