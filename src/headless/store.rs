//! In-process shared game store
//!
//! Cloning a `GameStore` yields another handle to the same store.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::platform::{SharedGameStore, Subscription};
use crate::sim::{GamePhase, PhaseCommand};

type PhaseListener = Box<dyn FnMut(GamePhase)>;

struct StoreInner {
    phase: Cell<GamePhase>,
    blocks_count: Cell<u32>,
    speed_boost: Cell<bool>,
    speed_reduced: Cell<bool>,
    paused: Cell<bool>,
    /// Every command received, accepted or not
    commands: RefCell<Vec<PhaseCommand>>,
    listeners: RefCell<Vec<(u64, PhaseListener)>>,
    next_listener_id: Cell<u64>,
}

#[derive(Clone)]
pub struct GameStore {
    inner: Rc<StoreInner>,
}

impl GameStore {
    pub fn new(blocks_count: u32) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                phase: Cell::new(GamePhase::Ready),
                blocks_count: Cell::new(blocks_count),
                speed_boost: Cell::new(false),
                speed_reduced: Cell::new(false),
                paused: Cell::new(false),
                commands: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(1),
            }),
        }
    }

    pub fn set_paused(&self, paused: bool) {
        self.inner.paused.set(paused);
    }

    pub fn set_speed_boost(&self, active: bool) {
        self.inner.speed_boost.set(active);
    }

    pub fn set_speed_reduced(&self, active: bool) {
        self.inner.speed_reduced.set(active);
    }

    pub fn command_log(&self) -> Vec<PhaseCommand> {
        self.inner.commands.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Listeners must not call back into the store
    fn set_phase(&self, phase: GamePhase) {
        if self.inner.phase.get() == phase {
            return;
        }
        log::info!(
            "Phase {} -> {}",
            self.inner.phase.get().as_str(),
            phase.as_str()
        );
        self.inner.phase.set(phase);
        for (_, listener) in self.inner.listeners.borrow_mut().iter_mut() {
            listener(phase);
        }
    }

    fn record(&self, command: PhaseCommand) {
        self.inner.commands.borrow_mut().push(command);
    }
}

impl SharedGameStore for GameStore {
    fn phase(&self) -> GamePhase {
        self.inner.phase.get()
    }

    fn blocks_count(&self) -> u32 {
        self.inner.blocks_count.get()
    }

    fn is_speed_boost_active(&self) -> bool {
        self.inner.speed_boost.get()
    }

    fn is_speed_reduced(&self) -> bool {
        self.inner.speed_reduced.get()
    }

    fn is_paused(&self) -> bool {
        self.inner.paused.get()
    }

    fn start(&self) {
        self.record(PhaseCommand::Start);
        if self.phase() == GamePhase::Ready {
            self.set_phase(GamePhase::Playing);
        }
    }

    fn end(&self) {
        self.record(PhaseCommand::End);
        if self.phase() == GamePhase::Playing {
            self.set_phase(GamePhase::Ended);
        }
    }

    fn restart(&self) {
        self.record(PhaseCommand::Restart);
        if self.phase() != GamePhase::Ready {
            self.set_phase(GamePhase::Ready);
        }
    }

    fn on_phase_change(&self, callback: Box<dyn FnMut(GamePhase)>) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, callback));

        let weak: Weak<StoreInner> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
            }
        })
    }
}
