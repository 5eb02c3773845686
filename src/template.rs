// 🔢 Digit Template - Fixed-width layout of the reveal display

/// Ten digit slots, commas at thousands positions
pub const MAX_DIGIT_TEMPLATE: &str = "#,###,###,###";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Digit,
    Separator,
}

#[derive(Debug, Clone)]
pub struct DigitTemplate {
    slots: Vec<SlotKind>,
}

impl DigitTemplate {
    pub fn standard() -> Self {
        Self::from_pattern(MAX_DIGIT_TEMPLATE)
    }

    /// `,` becomes a separator slot, any other character a digit slot
    pub fn from_pattern(pattern: &str) -> Self {
        let slots = pattern
            .chars()
            .map(|c| if c == ',' { SlotKind::Separator } else { SlotKind::Digit })
            .collect();

        DigitTemplate { slots }
    }

    pub fn slots(&self) -> &[SlotKind] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn digit_slot_count(&self) -> usize {
        self.slots.iter().filter(|k| **k == SlotKind::Digit).count()
    }

    /// Largest price the template can display
    pub fn capacity(&self) -> u64 {
        10u64.pow(self.digit_slot_count() as u32) - 1
    }
}
