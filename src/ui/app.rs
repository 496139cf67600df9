//! Application state and input handling
//!
//! One [`App`] owns every screen's state. Key events mutate it, ticks
//! advance the decorative and time-based pieces, and the dashboard screen
//! consumes poller snapshots. Drawing lives in [`super::view`].

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::watch;

use crate::auth::{FlashBoard, FlashLevel, LoginForm, OtpInput, RegisterForm, ResendCooldown};
use crate::client::{ApiClient, ApiError, AuthOutcome, ProfileResponse};
use crate::config::Config;
use crate::poller::{DashboardSnapshot, LivePoller, PollerConfig, PollerHandle};
use crate::ui::particles::ParticleField;

/// Which page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    Verify,
    Dashboard,
}

impl Screen {
    /// Number of focusable input fields on this screen.
    fn field_count(self) -> usize {
        match self {
            Screen::Login => 2,
            Screen::Register => 4,
            Screen::Verify => 1,
            Screen::Dashboard => 0,
        }
    }
}

/// Full client state
pub struct App {
    api: ApiClient,
    poller_config: PollerConfig,

    pub screen: Screen,
    pub focus: usize,
    pub should_quit: bool,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub otp: OtpInput,
    pub cooldown: ResendCooldown,
    pub flash: FlashBoard,

    pub snapshot: DashboardSnapshot,
    pub profile: Option<ProfileResponse>,
    pub particles: ParticleField,

    poller: Option<PollerHandle>,
    pending_updates: Option<watch::Receiver<DashboardSnapshot>>,
}

impl App {
    pub fn new(api: ApiClient, config: &Config) -> Self {
        Self {
            api,
            poller_config: PollerConfig::from(&config.poller),
            screen: Screen::Login,
            focus: 0,
            should_quit: false,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            otp: OtpInput::new(),
            cooldown: ResendCooldown::default(),
            flash: FlashBoard::default(),
            snapshot: DashboardSnapshot::default(),
            profile: None,
            particles: ParticleField::new(config.ui.particle_count),
            poller: None,
            pending_updates: None,
        }
    }

    /// Update stream of a freshly started poller, claimed once by the
    /// event loop.
    pub fn take_updates(&mut self) -> Option<watch::Receiver<DashboardSnapshot>> {
        self.pending_updates.take()
    }

    /// Poll cadence, for the dashboard footer.
    pub fn poll_interval_secs(&self) -> u64 {
        self.poller_config.poll_interval.as_secs()
    }

    /// Reconnection budget, for the status line.
    pub fn max_failures(&self) -> u32 {
        self.poller_config.max_consecutive_failures
    }

    pub fn set_snapshot(&mut self, snapshot: DashboardSnapshot) {
        self.snapshot = snapshot;
    }

    /// Advance animation and expire timed state. Called on every UI tick.
    pub fn on_tick(&mut self) {
        self.particles.advance();
        self.flash.purge(Instant::now());
    }

    /// Handle one key press.
    pub async fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        match self.screen {
            Screen::Login => self.on_login_key(key).await,
            Screen::Register => self.on_register_key(key).await,
            Screen::Verify => self.on_verify_key(key).await,
            Screen::Dashboard => self.on_dashboard_key(key),
        }
    }

    fn quit(&mut self) {
        if let Some(poller) = &self.poller {
            poller.stop();
        }
        self.should_quit = true;
    }

    fn focus_next(&mut self) {
        let count = self.screen.field_count();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    fn focus_prev(&mut self) {
        let count = self.screen.field_count();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    fn switch_to(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = 0;
    }

    fn flash_error(&mut self, error: &ApiError) {
        let message = match error {
            ApiError::Timeout => "Server timed out. Please try again.".to_string(),
            ApiError::Unavailable => "Server unreachable. Is it running?".to_string(),
            ApiError::Api { status, .. } => format!("Server rejected the request ({status})"),
            ApiError::Request(_) => "Something went wrong. Please try again.".to_string(),
        };
        self.flash.post(message, FlashLevel::Danger, Instant::now());
    }

    // ============================================
    // Login screen
    // ============================================

    async fn on_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.quit(),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::F(2) => {
                self.switch_to(Screen::Register);
            }
            KeyCode::Enter => self.submit_login().await,
            KeyCode::Backspace => {
                match self.focus {
                    0 => self.login.username.pop(),
                    _ => self.login.password.pop(),
                };
            }
            KeyCode::Char(c) => match self.focus {
                0 => self.login.username.push(c),
                _ => self.login.password.push(c),
            },
            _ => {}
        }
    }

    async fn submit_login(&mut self) {
        if let Some(error) = self.login.validate().first() {
            self.flash
                .post(error.message.clone(), FlashLevel::Warning, Instant::now());
            return;
        }

        let outcome = self
            .api
            .login(&self.login.username, &self.login.password)
            .await;
        match outcome {
            Ok(AuthOutcome::Accepted) => {
                tracing::info!(username = %self.login.username, "login accepted, code sent");
                self.otp.clear();
                self.switch_to(Screen::Verify);
                self.flash.post(
                    "A verification code was sent to your email",
                    FlashLevel::Info,
                    Instant::now(),
                );
            }
            Ok(AuthOutcome::Rejected) => {
                self.flash.post(
                    "Invalid username or password",
                    FlashLevel::Danger,
                    Instant::now(),
                );
            }
            Err(e) => self.flash_error(&e),
        }
    }

    // ============================================
    // Register screen
    // ============================================

    async fn on_register_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.switch_to(Screen::Login),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Enter => self.submit_register().await,
            KeyCode::Backspace => {
                self.register_field_mut().pop();
            }
            KeyCode::Char(c) => self.register_field_mut().push(c),
            _ => {}
        }
    }

    fn register_field_mut(&mut self) -> &mut String {
        match self.focus {
            0 => &mut self.register.username,
            1 => &mut self.register.email,
            2 => &mut self.register.password,
            _ => &mut self.register.confirm_password,
        }
    }

    async fn submit_register(&mut self) {
        if let Some(error) = self.register.validate().first() {
            self.flash
                .post(error.message.clone(), FlashLevel::Warning, Instant::now());
            return;
        }

        let outcome = self
            .api
            .register(
                &self.register.username,
                &self.register.email,
                &self.register.password,
                &self.register.confirm_password,
            )
            .await;

        match outcome {
            Ok(AuthOutcome::Accepted) => {
                tracing::info!(username = %self.register.username, "registration accepted");
                let email = self.register.email.clone();
                self.register = RegisterForm::default();
                self.switch_to(Screen::Login);
                self.flash.post(
                    format!("Activation link sent to {email}. Check your inbox."),
                    FlashLevel::Info,
                    Instant::now(),
                );
            }
            Ok(AuthOutcome::Rejected) => {
                self.flash.post(
                    "Registration failed: that username or email may be taken",
                    FlashLevel::Danger,
                    Instant::now(),
                );
            }
            Err(e) => self.flash_error(&e),
        }
    }

    // ============================================
    // Verify screen
    // ============================================

    async fn on_verify_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            self.resend_code().await;
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.otp.clear();
                self.switch_to(Screen::Login);
            }
            KeyCode::Enter => self.submit_code().await,
            KeyCode::Backspace => self.otp.backspace(),
            KeyCode::Char(c) => self.otp.push_char(c),
            _ => {}
        }
    }

    async fn submit_code(&mut self) {
        if !self.otp.is_complete() {
            self.flash.post(
                "Enter the 6-digit verification code",
                FlashLevel::Warning,
                Instant::now(),
            );
            return;
        }

        let outcome = self.api.verify_otp(self.otp.as_str()).await;
        match outcome {
            Ok(AuthOutcome::Accepted) => {
                tracing::info!("verification accepted, opening dashboard");
                self.enter_dashboard().await;
            }
            Ok(AuthOutcome::Rejected) => {
                self.otp.clear();
                self.flash.post(
                    "Wrong verification code. Please try again.",
                    FlashLevel::Danger,
                    Instant::now(),
                );
            }
            Err(e) => self.flash_error(&e),
        }
    }

    async fn resend_code(&mut self) {
        let now = Instant::now();
        if !self.cooldown.ready(now) {
            self.flash.post(
                "Please wait for the countdown before resending",
                FlashLevel::Warning,
                now,
            );
            return;
        }

        let outcome = self.api.resend_otp().await;
        match outcome {
            Ok(body) if body.is_success() => {
                self.cooldown.trigger(now);
                self.flash.post(body.message, FlashLevel::Success, now);
            }
            Ok(body) => {
                self.flash.post(body.message, FlashLevel::Danger, now);
            }
            Err(e) => self.flash_error(&e),
        }
    }

    // ============================================
    // Dashboard screen
    // ============================================

    /// Start polling and move to the dashboard.
    async fn enter_dashboard(&mut self) {
        let (mut poller, updates) =
            LivePoller::new(self.api.clone(), self.poller_config.clone());

        // Warm the chart with recent history so the first render is not a
        // blank axis.
        let history = self.api.measurements().await;
        match history {
            Ok(history) if history.is_connected() => {
                poller.warm_history(
                    &history.labels,
                    &history.heart_rate,
                    &history.spo2,
                    &history.resp,
                );
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "no history to warm the chart with"),
        }

        let profile = self.api.profile().await;
        match profile {
            Ok(profile) => {
                self.flash.post(
                    format!("Welcome, {}!", profile.username),
                    FlashLevel::Success,
                    Instant::now(),
                );
                self.profile = Some(profile);
            }
            Err(e) => tracing::debug!(error = %e, "profile fetch failed"),
        }

        self.snapshot = updates.borrow().clone();
        let handle = PollerHandle::launch(poller, updates.clone());
        self.pending_updates = Some(updates);
        self.poller = Some(handle);
        self.switch_to(Screen::Dashboard);
    }

    fn on_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }
}
