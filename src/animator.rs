// 🎰 Digit Reveal Animator
//
// Slot-machine style reveal of a price:
// 1. Every template slot starts rolling random digits
// 2. True digits lock in one at a time, least significant first
// 3. Unused leading slots and orphaned commas are removed
// 4. The currency symbol is prepended
//
// The animator owns no timers. The caller drives it by advancing a clock,
// which keeps the whole sequence deterministic for a given RNG seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, TimingConfig};
use crate::currency::Currency;
use crate::price::Price;
use crate::template::{DigitTemplate, SlotKind};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimatorError {
    #[error("a reveal is already running")]
    Busy,

    #[error("price has {digits} digits but the template only holds {slots}")]
    Capacity { digits: usize, slots: usize },
}

// ============================================================================
// REQUEST & STATE
// ============================================================================

/// Everything a single run needs, fixed for the run's duration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealRequest {
    pub price: Price,
    pub currency: Currency,
}

impl RevealRequest {
    pub fn new(price: Price, currency: Currency) -> Self {
        RevealRequest { price, currency }
    }

    /// What the display shows once the run completes
    pub fn expected_display(&self) -> String {
        self.currency.format(&self.price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    Idle,
    Running,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPhase {
    /// Separator, never changes
    Static,
    /// Idle random rolling, no reveal started yet
    Rolling,
    /// Reveal in progress, still cycling random digits
    FastRoll,
    /// Showing its true digit
    Locked,
}

/// Animation record of one template slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotState {
    /// Position in the template
    pub index: usize,
    pub kind: SlotKind,
    /// True digit, for slots that receive one
    pub target: Option<char>,
    pub phase: SlotPhase,
    /// Character currently displayed (None before the first roll)
    pub shown: Option<char>,
}

impl SlotState {
    fn shows_digit(&self) -> bool {
        self.kind == SlotKind::Digit && self.shown.is_some_and(|c| c.is_ascii_digit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Symbol,
    Digit,
    Separator,
}

/// One visible character of the display region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub ch: char,
    pub phase: SlotPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// `position` counts from the least significant digit
    SlotLocked { slot: usize, position: usize, digit: char },
    Completed,
}

// ============================================================================
// ANIMATOR
// ============================================================================

pub struct Animator {
    timing: TimingConfig,
    template: DigitTemplate,
    rng: StdRng,
    phase: AnimatorPhase,
    request: Option<RevealRequest>,
    slots: Vec<SlotState>,
    /// Slot indices in reveal order (rightmost digit slot first)
    reveal_order: Vec<usize>,
    locked: usize,
    elapsed: Duration,
    since_roll: Duration,
    symbol: Option<char>,
}

impl Animator {
    pub fn new(timing: TimingConfig) -> Result<Self, ConfigError> {
        Self::with_rng(timing, StdRng::from_entropy())
    }

    pub fn with_seed(timing: TimingConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(timing, StdRng::seed_from_u64(seed))
    }

    /// Fails on timing the clock cannot run with (zero durations).
    pub fn with_rng(timing: TimingConfig, rng: StdRng) -> Result<Self, ConfigError> {
        timing.validate()?;

        Ok(Animator {
            timing,
            template: DigitTemplate::standard(),
            rng,
            phase: AnimatorPhase::Idle,
            request: None,
            slots: Vec::new(),
            reveal_order: Vec::new(),
            locked: 0,
            elapsed: Duration::ZERO,
            since_roll: Duration::ZERO,
            symbol: None,
        })
    }

    /// Swap the display template, e.g. for a narrower display
    pub fn with_template(mut self, template: DigitTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == AnimatorPhase::Running
    }

    pub fn request(&self) -> Option<&RevealRequest> {
        self.request.as_ref()
    }

    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// (locked digits, digits to reveal)
    pub fn progress(&self) -> (usize, usize) {
        (self.locked, self.reveal_order.len())
    }

    /// Begin a new run, discarding whatever the previous run left behind.
    pub fn start(&mut self, request: RevealRequest) -> Result<(), AnimatorError> {
        if self.is_running() {
            warn!(price = %request.price, "reveal rejected, animator busy");
            return Err(AnimatorError::Busy);
        }

        let digits = request.price.digit_count();
        let slots = self.template.digit_slot_count();
        if digits > slots {
            return Err(AnimatorError::Capacity { digits, slots });
        }

        self.clear();

        let mut states: Vec<SlotState> = Vec::with_capacity(self.template.len());
        for (index, kind) in self.template.slots().iter().enumerate() {
            let state = match kind {
                SlotKind::Separator => SlotState {
                    index,
                    kind: *kind,
                    target: None,
                    phase: SlotPhase::Static,
                    shown: Some(','),
                },
                SlotKind::Digit => SlotState {
                    index,
                    kind: *kind,
                    target: None,
                    phase: SlotPhase::Rolling,
                    shown: Some(random_digit(&mut self.rng)),
                },
            };
            states.push(state);
        }

        // Right-align the true digits onto the digit slots
        let digit_slots: Vec<usize> = states
            .iter()
            .filter(|s| s.kind == SlotKind::Digit)
            .map(|s| s.index)
            .collect();

        self.reveal_order = digit_slots
            .iter()
            .rev()
            .zip(request.price.digits().chars().rev())
            .map(|(&slot, digit)| {
                states[slot].target = Some(digit);
                slot
            })
            .collect();

        self.slots = states;
        self.phase = AnimatorPhase::Running;

        info!(
            price = %request.price,
            currency = %request.currency,
            digits,
            duration_ms = self.timing.total(digits).as_millis() as u64,
            "reveal started"
        );

        self.request = Some(request);
        Ok(())
    }

    /// Move the animation clock forward and report what happened.
    pub fn advance(&mut self, dt: Duration) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }

        self.elapsed += dt;
        let now = self.elapsed;

        self.since_roll += dt;
        let interval = self.timing.roll_interval();
        if self.since_roll >= interval {
            self.since_roll = remainder(self.since_roll, interval);
            self.roll();
        }

        let step = self.timing.step();
        let fast_roll = self.timing.fast_roll();

        for position in self.locked..self.reveal_order.len() {
            let start = step * position as u32;
            let lock_at = start + fast_roll;
            let slot = &mut self.slots[self.reveal_order[position]];

            if now >= lock_at {
                slot.phase = SlotPhase::Locked;
                slot.shown = slot.target;
                self.locked += 1;

                if let Some(digit) = slot.target {
                    debug!(slot = slot.index, position, %digit, "slot locked");
                    events.push(RevealEvent::SlotLocked {
                        slot: slot.index,
                        position,
                        digit,
                    });
                }
            } else {
                if now >= start {
                    slot.phase = SlotPhase::FastRoll;
                }
                break;
            }
        }

        if now >= self.timing.total(self.reveal_order.len()) {
            self.finish();
            events.push(RevealEvent::Completed);
        }

        events
    }

    /// Return to idle with an empty display.
    pub fn reset(&mut self) -> Result<(), AnimatorError> {
        if self.is_running() {
            warn!("reset rejected, animator busy");
            return Err(AnimatorError::Busy);
        }

        self.clear();
        debug!("animator reset");
        Ok(())
    }

    /// Visible cells, left to right
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.slots.len() + 1);

        if let Some(symbol) = self.symbol {
            cells.push(Cell {
                kind: CellKind::Symbol,
                ch: symbol,
                phase: SlotPhase::Static,
            });
        }

        for slot in &self.slots {
            let kind = match slot.kind {
                SlotKind::Digit => CellKind::Digit,
                SlotKind::Separator => CellKind::Separator,
            };
            cells.push(Cell {
                kind,
                ch: slot.shown.unwrap_or(' '),
                phase: slot.phase,
            });
        }

        cells
    }

    pub fn rendered(&self) -> String {
        self.cells().iter().map(|c| c.ch).collect()
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn clear(&mut self) {
        self.phase = AnimatorPhase::Idle;
        self.request = None;
        self.slots.clear();
        self.reveal_order.clear();
        self.locked = 0;
        self.elapsed = Duration::ZERO;
        self.since_roll = Duration::ZERO;
        self.symbol = None;
    }

    fn roll(&mut self) {
        for slot in &mut self.slots {
            if matches!(slot.phase, SlotPhase::Rolling | SlotPhase::FastRoll) {
                slot.shown = Some(random_digit(&mut self.rng));
            }
        }
    }

    fn finish(&mut self) {
        // Leading digit slots that never received a true digit
        let extra = self.template.digit_slot_count() - self.reveal_order.len();
        let mut removed = 0;
        self.slots.retain(|slot| {
            if slot.kind == SlotKind::Digit && removed < extra {
                removed += 1;
                false
            } else {
                true
            }
        });

        // A comma survives only between two digits of the pre-cleanup layout
        let snapshot = self.slots.clone();
        let keep: Vec<bool> = snapshot
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                if slot.kind != SlotKind::Separator {
                    return true;
                }
                let prev = i.checked_sub(1).and_then(|j| snapshot.get(j));
                let next = snapshot.get(i + 1);
                prev.is_some_and(SlotState::shows_digit) && next.is_some_and(SlotState::shows_digit)
            })
            .collect();

        let mut flags = keep.into_iter();
        self.slots.retain(|_| flags.next().unwrap_or(false));

        self.symbol = self.request.as_ref().map(|r| r.currency.symbol());
        self.phase = AnimatorPhase::Complete;

        info!(display = %self.rendered(), elapsed_ms = self.elapsed.as_millis() as u64, "reveal complete");
    }
}

fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'0' + rng.gen_range(0..10u8))
}

fn remainder(value: Duration, interval: Duration) -> Duration {
    let nanos = value.as_nanos() % interval.as_nanos();
    Duration::from_nanos(nanos as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    fn request(price: &str, currency: Currency) -> RevealRequest {
        RevealRequest::new(Price::parse(price).unwrap(), currency)
    }

    fn run_to_completion(animator: &mut Animator) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        while animator.is_running() {
            events.extend(animator.advance(TICK));
        }
        events
    }

    fn reveal(price: &str, currency: Currency) -> Animator {
        let mut animator = Animator::with_seed(TimingConfig::default(), 7).unwrap();
        animator.start(request(price, currency)).unwrap();
        run_to_completion(&mut animator);
        animator
    }

    #[test]
    fn test_known_examples() {
        assert_eq!(reveal("1234", Currency::Jpy).rendered(), "¥1,234");
        assert_eq!(reveal("500", Currency::Usd).rendered(), "$500");
        assert_eq!(reveal("1000000", Currency::Jpy).rendered(), "¥1,000,000");
        assert_eq!(reveal("9999999999", Currency::Usd).rendered(), "$9,999,999,999");
        assert_eq!(reveal("7", Currency::Jpy).rendered(), "¥7");
    }

    #[test]
    fn test_every_digit_count_reveals_exactly() {
        let source = "9876543210";
        for d in 1..=10 {
            let digits = &source[..d];
            let animator = reveal(digits, Currency::Usd);
            let cells = animator.cells();

            // Symbol first
            assert_eq!(cells[0].kind, CellKind::Symbol);
            assert_eq!(cells[0].ch, '$');

            // Digits match the input, in order
            let shown: String = cells
                .iter()
                .filter(|c| c.kind == CellKind::Digit)
                .map(|c| c.ch)
                .collect();
            assert_eq!(shown, digits);

            // One separator per thousands grouping
            let separators = cells.iter().filter(|c| c.kind == CellKind::Separator).count();
            assert_eq!(separators, (d - 1) / 3, "digit count {}", d);

            // Separators always sit between two digits
            for (i, cell) in cells.iter().enumerate() {
                if cell.kind == CellKind::Separator {
                    assert_eq!(cells[i - 1].kind, CellKind::Digit);
                    assert_eq!(cells.get(i + 1).map(|c| c.kind), Some(CellKind::Digit));
                }
            }

            assert_eq!(animator.rendered(), animator.request().unwrap().expected_display());
        }
    }

    #[test]
    fn test_locks_least_significant_first_on_schedule() {
        let timing = TimingConfig::default();
        let mut animator = Animator::with_seed(timing, 1).unwrap();
        animator.start(request("4321", Currency::Jpy)).unwrap();

        let mut locks = Vec::new();
        while animator.is_running() {
            for event in animator.advance(TICK) {
                if let RevealEvent::SlotLocked { position, digit, .. } = event {
                    locks.push((animator.elapsed(), position, digit));
                }
            }
        }

        let expected: Vec<(Duration, usize, char)> = vec![
            (Duration::from_millis(500), 0, '1'),
            (Duration::from_millis(2000), 1, '2'),
            (Duration::from_millis(3500), 2, '3'),
            (Duration::from_millis(5000), 3, '4'),
        ];
        assert_eq!(locks, expected);
        assert_eq!(animator.elapsed(), timing.total(4));
    }

    #[test]
    fn test_slots_right_aligned() {
        let mut animator = Animator::with_seed(TimingConfig::default(), 3).unwrap();
        animator.start(request("12", Currency::Jpy)).unwrap();

        let targets: Vec<(usize, char)> = animator
            .slots()
            .iter()
            .filter_map(|s| s.target.map(|t| (s.index, t)))
            .collect();
        assert_eq!(targets, vec![(11, '1'), (12, '2')]);
    }

    #[test]
    fn test_phases_during_run() {
        let mut animator = Animator::with_seed(TimingConfig::default(), 5).unwrap();
        animator.start(request("56", Currency::Jpy)).unwrap();

        // Before anything locks, every digit slot rolls a digit
        animator.advance(Duration::from_millis(100));
        for slot in animator.slots() {
            match slot.kind {
                SlotKind::Separator => assert_eq!(slot.shown, Some(',')),
                SlotKind::Digit => assert!(slot.shown.unwrap().is_ascii_digit()),
            }
        }
        assert_eq!(animator.slots()[12].phase, SlotPhase::FastRoll);
        assert_eq!(animator.slots()[11].phase, SlotPhase::Rolling);

        // First digit locked, second not yet started
        animator.advance(Duration::from_millis(500));
        assert_eq!(animator.slots()[12].phase, SlotPhase::Locked);
        assert_eq!(animator.slots()[12].shown, Some('6'));
        assert_eq!(animator.slots()[11].phase, SlotPhase::Rolling);

        // Settle done, second digit fast-rolling
        animator.advance(Duration::from_millis(1000));
        assert_eq!(animator.slots()[11].phase, SlotPhase::FastRoll);
        assert_eq!(animator.progress(), (1, 2));
    }

    #[test]
    fn test_not_complete_before_final_settle() {
        let timing = TimingConfig::default();
        let mut animator = Animator::with_seed(timing, 9).unwrap();
        animator.start(request("88", Currency::Usd)).unwrap();

        let events = animator.advance(timing.total(2) - Duration::from_millis(1));
        assert_eq!(events.len(), 2);
        assert!(animator.is_running());
        assert_eq!(animator.progress(), (2, 2));

        let events = animator.advance(Duration::from_millis(1));
        assert_eq!(events, vec![RevealEvent::Completed]);
        assert_eq!(animator.phase(), AnimatorPhase::Complete);
        assert_eq!(animator.rendered(), "$88");
    }

    #[test]
    fn test_single_large_advance_keeps_order() {
        let mut animator = Animator::with_seed(TimingConfig::default(), 11).unwrap();
        animator.start(request("123", Currency::Jpy)).unwrap();

        let events = animator.advance(Duration::from_secs(60));
        let positions: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                RevealEvent::SlotLocked { position, .. } => Some(*position),
                RevealEvent::Completed => None,
            })
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(events.last(), Some(&RevealEvent::Completed));
        assert_eq!(animator.rendered(), "¥123");
    }

    #[test]
    fn test_start_rejected_while_running() {
        let mut animator = Animator::with_seed(TimingConfig::default(), 2).unwrap();
        animator.start(request("100", Currency::Jpy)).unwrap();

        assert_eq!(
            animator.start(request("200", Currency::Usd)),
            Err(AnimatorError::Busy)
        );
        assert_eq!(animator.reset(), Err(AnimatorError::Busy));

        // The first run is untouched
        run_to_completion(&mut animator);
        assert_eq!(animator.rendered(), "¥100");
    }

    #[test]
    fn test_reset_then_independent_run() {
        let mut animator = reveal("1234567", Currency::Jpy);
        assert_eq!(animator.rendered(), "¥1,234,567");

        animator.reset().unwrap();
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
        assert!(animator.cells().is_empty());
        assert_eq!(animator.rendered(), "");
        assert_eq!(animator.elapsed(), Duration::ZERO);

        animator.start(request("42", Currency::Usd)).unwrap();
        run_to_completion(&mut animator);
        assert_eq!(animator.rendered(), "$42");
    }

    #[test]
    fn test_restart_after_complete_without_reset() {
        let mut animator = reveal("999", Currency::Usd);
        animator.start(request("1000", Currency::Jpy)).unwrap();

        // Fresh template, nothing from the previous run
        assert_eq!(animator.slots().len(), 13);
        assert_eq!(animator.progress(), (0, 4));

        run_to_completion(&mut animator);
        assert_eq!(animator.rendered(), "¥1,000");
    }

    #[test]
    fn test_advance_when_idle_is_noop() {
        let mut animator = Animator::with_seed(TimingConfig::default(), 0).unwrap();
        assert!(animator.advance(TICK).is_empty());
        assert_eq!(animator.phase(), AnimatorPhase::Idle);
    }

    #[test]
    fn test_custom_timing() {
        let timing = TimingConfig {
            roll_interval_ms: 10,
            fast_roll_ms: 20,
            settle_ms: 30,
        };
        let mut animator = Animator::with_seed(timing, 4).unwrap();
        animator.start(request("12345", Currency::Jpy)).unwrap();

        let events = animator.advance(Duration::from_millis(249));
        assert_eq!(events.len(), 5);
        assert!(animator.is_running());

        animator.advance(Duration::from_millis(1));
        assert_eq!(animator.rendered(), "¥12,345");
    }

    #[test]
    fn test_rejects_zero_roll_interval() {
        let timing = TimingConfig {
            roll_interval_ms: 0,
            fast_roll_ms: 500,
            settle_ms: 1000,
        };
        assert!(matches!(
            Animator::with_seed(timing, 1),
            Err(ConfigError::InvalidTiming(_))
        ));

        let timing = TimingConfig {
            roll_interval_ms: 50,
            fast_roll_ms: 500,
            settle_ms: 0,
        };
        assert!(Animator::with_seed(timing, 1).is_err());
    }

    #[test]
    fn test_capacity_of_narrow_template() {
        let mut animator = Animator::with_seed(TimingConfig::default(), 6)
            .unwrap()
            .with_template(DigitTemplate::from_pattern("###"));

        assert_eq!(
            animator.start(request("1234", Currency::Jpy)),
            Err(AnimatorError::Capacity { digits: 4, slots: 3 })
        );
        assert_eq!(animator.phase(), AnimatorPhase::Idle);

        animator.start(request("321", Currency::Usd)).unwrap();
        run_to_completion(&mut animator);
        assert_eq!(animator.rendered(), "$321");
    }
}
