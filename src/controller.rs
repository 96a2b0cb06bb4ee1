//! Player controller
//!
//! Thin adapter between the frame loop and the pure `sim` logic. Owns the
//! controller state, the body handle and the subscriptions for the
//! lifetime of the player entity.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;

use crate::platform::{
    InputSource, PhysicsBody, ProgressionService, RenderSink, SharedGameStore, Subscription,
};
use crate::settings::ControllerSettings;
use crate::sim::{
    self, ControllerEvent, ControllerState, PhaseCommand, SpeedModifier, TickInput,
};

type Inbox = Rc<RefCell<VecDeque<ControllerEvent>>>;

pub struct PlayerController<B, I, S, P, R> {
    settings: ControllerSettings,
    state: ControllerState,
    /// `None` until the engine has created the rigid body
    body: Option<B>,
    input: I,
    store: S,
    progression: P,
    render: R,
    inbox: Inbox,
    /// Released on drop
    subscriptions: Vec<Subscription>,
}

impl<B, I, S, P, R> PlayerController<B, I, S, P, R>
where
    B: PhysicsBody,
    I: InputSource,
    S: SharedGameStore,
    P: ProgressionService,
    R: RenderSink,
{
    /// Create the controller and subscribe to phase changes and key presses
    pub fn mount(
        settings: ControllerSettings,
        session_id: u32,
        input: I,
        store: S,
        progression: P,
        render: R,
    ) -> Self {
        let inbox: Inbox = Rc::new(RefCell::new(VecDeque::new()));

        let phase_inbox = inbox.clone();
        let phase_sub = store.on_phase_change(Box::new(move |phase| {
            phase_inbox
                .borrow_mut()
                .push_back(ControllerEvent::PhaseChanged(phase));
        }));

        let key_inbox = inbox.clone();
        let key_sub = input.on_any_key(Box::new(move || {
            key_inbox.borrow_mut().push_back(ControllerEvent::AnyKey);
        }));

        log::info!("Player controller mounted (session {})", session_id);

        Self {
            state: ControllerState::new(session_id, &settings),
            settings,
            body: None,
            input,
            store,
            progression,
            render,
            inbox,
            subscriptions: vec![phase_sub, key_sub],
        }
    }

    pub fn attach_body(&mut self, body: B) {
        self.body = Some(body);
    }

    pub fn detach_body(&mut self) -> Option<B> {
        self.body.take()
    }

    /// Tear down, releasing all subscriptions
    pub fn unmount(mut self) {
        for sub in self.subscriptions.drain(..) {
            sub.release();
        }
        log::info!("Player controller unmounted (session {})", self.state.session_id);
    }

    /// Run one tick. Called once per rendered frame.
    pub fn on_frame(&mut self, dt: f32) {
        self.drain_events();

        if !dt.is_finite() || dt <= 0.0 {
            log::debug!("Skipping tick with dt={}", dt);
            return;
        }

        let Some(body) = self.body.as_mut() else {
            log::trace!("No body attached yet, tick skipped");
            return;
        };

        if self.store.is_paused() {
            body.set_linvel(Vec3::ZERO);
            body.set_angvel(Vec3::ZERO);
            return;
        }

        // Controls
        let modifier = SpeedModifier::from_flags(
            self.store.is_speed_boost_active(),
            self.store.is_speed_reduced(),
        );
        let held = self.input.held_directions();
        let drive = sim::translate(held, dt, modifier, &self.settings);
        body.apply_impulse(drive.impulse);
        body.apply_torque_impulse(drive.torque);

        // Camera, progression, outcome
        let input = TickInput {
            phase: self.store.phase(),
            blocks_count: self.store.blocks_count(),
            position: body.translation(),
        };
        let effects = sim::tick(&mut self.state, &input, dt, &self.settings);

        self.render.set_camera_position(effects.camera.position);
        self.render.set_camera_look_at(effects.camera.look_at);

        if let Some(row) = effects.reveal {
            log::debug!("Revealing row {} (session {})", row, self.state.session_id);
            if let Err(e) = self.progression.reveal_row(self.state.session_id, row) {
                log::warn!("Row {} reveal failed: {}", row, e);
            }
        }

        for command in effects.commands {
            self.issue(command);
        }

        // Commands may have changed the phase; apply entry actions this frame
        self.drain_events();
    }

    fn drain_events(&mut self) {
        // Borrow is dropped before handling: store commands push more events
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            let effects = sim::handle_event(&mut self.state, event, self.store.phase());
            if effects.respawn {
                self.respawn();
            }
            if let Some(command) = effects.command {
                self.issue(command);
            }
        }
    }

    fn respawn(&mut self) {
        let spawn = self.settings.spawn_position;
        match self.body.as_mut() {
            Some(body) => {
                body.set_translation(spawn);
                body.set_linvel(Vec3::ZERO);
                body.set_angvel(Vec3::ZERO);
                log::info!("Respawned at {}", spawn);
            }
            None => log::debug!("Respawn with no body attached"),
        }
    }

    fn issue(&mut self, command: PhaseCommand) {
        log::info!(
            "Requesting {:?} (phase {}, row {})",
            command,
            self.store.phase().as_str(),
            self.state.last_row()
        );
        match command {
            PhaseCommand::Start => self.store.start(),
            PhaseCommand::End => self.store.end(),
            PhaseCommand::Restart => self.store.restart(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut B> {
        self.body.as_mut()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn progression(&self) -> &P {
        &self.progression
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    /// Number of live subscriptions (2 while mounted)
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }
}
