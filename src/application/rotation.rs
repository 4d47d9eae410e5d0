// Rotation controller - Which dashboard is visible and when it changes
use crate::application::timer::Timer;
use crate::domain::dashboard::{Dashboard, DashboardKind};
use crate::domain::embed::{embed_url, CacheBuster};
use crate::domain::settings::DisplaySettings;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPhase {
    Empty,
    Active,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderReason {
    Load,
    Rotate,
    Navigate,
    Refresh,
    Retry,
}

/// What the embedding frame should currently show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub dashboard_id: String,
    pub name: String,
    pub kind: DashboardKind,
    pub src: String,
    pub position: usize,
    pub total: usize,
    pub reason: RenderReason,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFailure {
    pub dashboard_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEffect {
    Render(Frame),
    ShowError(LoadFailure),
    ShowEmpty,
}

/// Commands accepted from the input adapters (keyboard, HTTP, frame events).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DisplayCommand {
    Next,
    Previous,
    TogglePause,
    Refresh,
    Retry,
    ToggleFullscreen,
    ExitFullscreen,
    VisibilityLost,
    VisibilityRestored,
    LoadFailed { dashboard_id: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub phase: RotationPhase,
    pub current_index: Option<usize>,
    pub total: usize,
    pub paused: bool,
    pub visible: bool,
    pub fullscreen: bool,
    pub frame: Option<Frame>,
    pub failure: Option<LoadFailure>,
    pub rotations: u64,
    pub refreshes: u64,
    pub next_rotation_ms: Option<u64>,
}

#[derive(Debug)]
pub struct RotationController {
    dashboards: Vec<Dashboard>,
    current_index: usize,
    paused: bool,
    visible: bool,
    fullscreen: bool,
    rotation_period: Duration,
    refresh_period: Duration,
    auto_refresh: bool,
    rotation_timer: Timer,
    refresh_timer: Timer,
    cache_buster: CacheBuster,
    frame: Option<Frame>,
    failure: Option<LoadFailure>,
    rotations: u64,
    refreshes: u64,
}

impl RotationController {
    pub fn new(settings: &DisplaySettings) -> Self {
        Self {
            dashboards: Vec::new(),
            current_index: 0,
            paused: false,
            visible: true,
            fullscreen: settings.fullscreen,
            rotation_period: settings.rotation_period(),
            refresh_period: settings.refresh_period(),
            auto_refresh: settings.auto_refresh,
            rotation_timer: Timer::default(),
            refresh_timer: Timer::default(),
            cache_buster: CacheBuster::new(),
            frame: None,
            failure: None,
            rotations: 0,
            refreshes: 0,
        }
    }

    pub fn phase(&self) -> RotationPhase {
        if self.dashboards.is_empty() {
            RotationPhase::Empty
        } else if self.paused {
            RotationPhase::Paused
        } else {
            RotationPhase::Active
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.dashboards.is_empty()).then_some(self.current_index)
    }

    pub fn current_dashboard(&self) -> Option<&Dashboard> {
        self.dashboards.get(self.current_index)
    }

    pub fn len(&self) -> usize {
        self.dashboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dashboards.is_empty()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Earliest armed deadline, for the driver to sleep on.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.rotation_timer.deadline(), self.refresh_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Replace the rotation with the active subset of `dashboards` and show
    /// the first one.
    pub fn load(&mut self, dashboards: Vec<Dashboard>, now: Instant) -> Vec<DisplayEffect> {
        self.dashboards = dashboards.into_iter().filter(Dashboard::is_active).collect();
        self.current_index = 0;
        self.paused = false;

        if self.dashboards.is_empty() {
            return self.enter_empty();
        }

        tracing::info!("Loaded {} dashboards into rotation", self.dashboards.len());
        let frame = self.render(RenderReason::Load);
        self.arm_rotation(now);
        self.arm_refresh(now);
        vec![DisplayEffect::Render(frame)]
    }

    /// Apply new dashboards and settings while running. The visible dashboard
    /// is kept when it survives, otherwise the index is clamped into range.
    pub fn reconfigure(
        &mut self,
        dashboards: Vec<Dashboard>,
        settings: &DisplaySettings,
        now: Instant,
    ) -> Vec<DisplayEffect> {
        self.rotation_period = settings.rotation_period();
        self.refresh_period = settings.refresh_period();
        self.auto_refresh = settings.auto_refresh;

        let was_empty = self.dashboards.is_empty();
        let current_id = self.frame.as_ref().map(|f| f.dashboard_id.clone());
        let dashboards: Vec<Dashboard> = dashboards.into_iter().filter(Dashboard::is_active).collect();

        if dashboards.is_empty() {
            self.dashboards = dashboards;
            return if was_empty { Vec::new() } else { self.enter_empty() };
        }
        if was_empty {
            return self.load(dashboards, now);
        }

        self.dashboards = dashboards;
        let kept = current_id
            .as_deref()
            .and_then(|id| self.dashboards.iter().position(|d| d.id() == id));

        let mut effects = Vec::new();
        match kept {
            Some(index) => self.current_index = index,
            None => {
                self.current_index = self.current_index.min(self.dashboards.len() - 1);
                effects.push(DisplayEffect::Render(self.render(RenderReason::Load)));
            }
        }
        if let Some(frame) = self.frame.as_mut() {
            frame.position = self.current_index;
            frame.total = self.dashboards.len();
        }

        self.arm_rotation(now);
        self.arm_refresh(now);
        effects
    }

    /// Manual navigation. Always restarts the rotation countdown.
    pub fn advance(&mut self, direction: Direction, now: Instant) -> Vec<DisplayEffect> {
        if self.dashboards.is_empty() {
            return Vec::new();
        }
        self.step(direction);
        let frame = self.render(RenderReason::Navigate);
        self.arm_rotation(now);
        vec![DisplayEffect::Render(frame)]
    }

    /// Automatic rotation step. Only fires while active and visible.
    pub fn tick_rotation(&mut self, now: Instant) -> Vec<DisplayEffect> {
        if self.phase() != RotationPhase::Active || !self.visible {
            self.rotation_timer.cancel();
            return Vec::new();
        }
        if self.dashboards.len() <= 1 {
            self.rotation_timer.cancel();
            return Vec::new();
        }
        self.step(Direction::Forward);
        self.rotations += 1;
        let frame = self.render(RenderReason::Rotate);
        self.arm_rotation(now);
        vec![DisplayEffect::Render(frame)]
    }

    /// Automatic refresh of the visible dashboard. Pause does not affect it.
    pub fn tick_refresh(&mut self, now: Instant) -> Vec<DisplayEffect> {
        if self.dashboards.is_empty() {
            self.refresh_timer.cancel();
            return Vec::new();
        }
        self.refreshes += 1;
        let frame = self.render(RenderReason::Refresh);
        self.arm_refresh(now);
        vec![DisplayEffect::Render(frame)]
    }

    /// Manual refresh. Restarts both countdowns.
    pub fn refresh_current(&mut self, now: Instant) -> Vec<DisplayEffect> {
        if self.dashboards.is_empty() {
            return Vec::new();
        }
        let frame = self.render(RenderReason::Refresh);
        self.arm_rotation(now);
        self.arm_refresh(now);
        vec![DisplayEffect::Render(frame)]
    }

    pub fn toggle_pause(&mut self, now: Instant) -> RotationPhase {
        if self.dashboards.is_empty() {
            return RotationPhase::Empty;
        }
        self.paused = !self.paused;
        self.arm_rotation(now);
        tracing::info!("Rotation {}", if self.paused { "paused" } else { "resumed" });
        self.phase()
    }

    pub fn visibility_lost(&mut self) {
        self.visible = false;
        self.rotation_timer.cancel();
    }

    pub fn visibility_restored(&mut self, now: Instant) {
        self.visible = true;
        self.arm_rotation(now);
    }

    /// The frame reported an error. Only the overlay changes; rotation keeps going.
    pub fn report_load_error(&mut self, dashboard_id: &str, message: &str) -> Vec<DisplayEffect> {
        let is_current = self
            .frame
            .as_ref()
            .is_some_and(|f| f.dashboard_id == dashboard_id);
        if !is_current {
            tracing::debug!("Ignoring stale load error for dashboard {}", dashboard_id);
            return Vec::new();
        }

        tracing::warn!("Dashboard {} failed to load: {}", dashboard_id, message);
        let failure = LoadFailure {
            dashboard_id: dashboard_id.to_string(),
            message: message.to_string(),
        };
        self.failure = Some(failure.clone());
        vec![DisplayEffect::ShowError(failure)]
    }

    /// Clear the error overlay, re-render and re-arm every timer.
    pub fn retry(&mut self, now: Instant) -> Vec<DisplayEffect> {
        if self.dashboards.is_empty() {
            return vec![DisplayEffect::ShowEmpty];
        }
        let frame = self.render(RenderReason::Retry);
        self.arm_rotation(now);
        self.arm_refresh(now);
        vec![DisplayEffect::Render(frame)]
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    pub fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    /// Fire whatever is due. Rotation goes first so a refresh at the same
    /// instant reloads the dashboard that is visible afterwards.
    pub fn poll(&mut self, now: Instant) -> Vec<DisplayEffect> {
        let mut effects = Vec::new();
        if self.rotation_timer.is_due(now) {
            effects.extend(self.tick_rotation(now));
        }
        if self.refresh_timer.is_due(now) {
            effects.extend(self.tick_refresh(now));
        }
        effects
    }

    pub fn apply(&mut self, command: DisplayCommand, now: Instant) -> Vec<DisplayEffect> {
        match command {
            DisplayCommand::Next => self.advance(Direction::Forward, now),
            DisplayCommand::Previous => self.advance(Direction::Backward, now),
            DisplayCommand::TogglePause => {
                self.toggle_pause(now);
                Vec::new()
            }
            DisplayCommand::Refresh => self.refresh_current(now),
            DisplayCommand::Retry => self.retry(now),
            DisplayCommand::ToggleFullscreen => {
                self.toggle_fullscreen();
                Vec::new()
            }
            DisplayCommand::ExitFullscreen => {
                self.exit_fullscreen();
                Vec::new()
            }
            DisplayCommand::VisibilityLost => {
                self.visibility_lost();
                Vec::new()
            }
            DisplayCommand::VisibilityRestored => {
                self.visibility_restored(now);
                Vec::new()
            }
            DisplayCommand::LoadFailed {
                dashboard_id,
                message,
            } => self.report_load_error(&dashboard_id, &message),
        }
    }

    pub fn snapshot(&self, now: Instant) -> DisplaySnapshot {
        DisplaySnapshot {
            phase: self.phase(),
            current_index: self.current_index(),
            total: self.dashboards.len(),
            paused: self.paused,
            visible: self.visible,
            fullscreen: self.fullscreen,
            frame: self.frame.clone(),
            failure: self.failure.clone(),
            rotations: self.rotations,
            refreshes: self.refreshes,
            next_rotation_ms: self
                .rotation_timer
                .remaining(now)
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    fn step(&mut self, direction: Direction) {
        let len = i64::try_from(self.dashboards.len()).unwrap_or(i64::MAX);
        let current = i64::try_from(self.current_index).unwrap_or(0);
        let next = (current + direction.step()).rem_euclid(len);
        self.current_index = usize::try_from(next).unwrap_or(0);
    }

    fn render(&mut self, reason: RenderReason) -> Frame {
        let token = self.cache_buster.next_token();
        let dashboard = &self.dashboards[self.current_index];
        let frame = Frame {
            dashboard_id: dashboard.id(),
            name: dashboard.name.clone(),
            kind: dashboard.kind,
            src: embed_url(dashboard, &token),
            position: self.current_index,
            total: self.dashboards.len(),
            reason,
        };
        tracing::debug!(
            "Showing {} ({}/{}) reason={:?}",
            frame.name,
            frame.position + 1,
            frame.total,
            reason
        );
        self.failure = None;
        self.frame = Some(frame.clone());
        frame
    }

    fn arm_rotation(&mut self, now: Instant) {
        if self.dashboards.len() > 1 && !self.paused && self.visible {
            self.rotation_timer.arm(now, self.rotation_period);
        } else {
            self.rotation_timer.cancel();
        }
    }

    fn arm_refresh(&mut self, now: Instant) {
        if !self.dashboards.is_empty() && self.auto_refresh {
            self.refresh_timer.arm(now, self.refresh_period);
        } else {
            self.refresh_timer.cancel();
        }
    }

    fn enter_empty(&mut self) -> Vec<DisplayEffect> {
        tracing::info!("No enabled dashboards, display is empty");
        self.dashboards.clear();
        self.current_index = 0;
        self.paused = false;
        self.rotation_timer.cancel();
        self.refresh_timer.cancel();
        self.frame = None;
        self.failure = None;
        vec![DisplayEffect::ShowEmpty]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn dashboards(n: usize) -> Vec<Dashboard> {
        (0..n)
            .map(|i| Dashboard::new(format!("Dashboard {i}"), format!("https://d{i}.example.com/")))
            .collect()
    }

    fn settings(rotation: i64, refresh: i64) -> DisplaySettings {
        DisplaySettings {
            rotation_interval: rotation,
            refresh_interval: refresh,
            ..DisplaySettings::default()
        }
    }

    fn loaded(n: usize) -> (RotationController, Instant) {
        let start = Instant::now();
        let mut controller = RotationController::new(&settings(30, 300));
        controller.load(dashboards(n), start);
        (controller, start)
    }

    fn rendered_frame(effects: &[DisplayEffect]) -> &Frame {
        match effects {
            [DisplayEffect::Render(frame)] => frame,
            other => panic!("expected a single render, got {other:?}"),
        }
    }

    #[test]
    fn test_load_selects_first_dashboard() {
        let start = Instant::now();
        let mut controller = RotationController::new(&DisplaySettings::default());
        let effects = controller.load(dashboards(3), start);

        let frame = rendered_frame(&effects);
        assert_eq!(frame.position, 0);
        assert_eq!(frame.total, 3);
        assert_eq!(frame.reason, RenderReason::Load);
        assert_eq!(controller.phase(), RotationPhase::Active);
    }

    #[test]
    fn test_load_skips_inactive_dashboards() {
        let start = Instant::now();
        let mut controller = RotationController::new(&DisplaySettings::default());
        let mut list = dashboards(2);
        list.push(Dashboard::new("off", "/off").disabled());
        list.push(Dashboard::new("", "/nameless"));
        controller.load(list, start);

        assert_eq!(controller.len(), 2);
    }

    #[test]
    fn test_advance_wraps_around_both_ways() {
        for n in 1..=5 {
            let (mut controller, start) = loaded(n);
            for _ in 0..n {
                controller.advance(Direction::Forward, start);
            }
            assert_eq!(controller.current_index(), Some(0), "n={n}");
        }

        let (mut controller, start) = loaded(4);
        controller.advance(Direction::Backward, start);
        assert_eq!(controller.current_index(), Some(3));
    }

    #[test]
    fn test_empty_controller_never_acts() {
        let start = Instant::now();
        let mut controller = RotationController::new(&DisplaySettings::default());
        let effects = controller.load(Vec::new(), start);

        assert_eq!(effects, vec![DisplayEffect::ShowEmpty]);
        assert_eq!(controller.phase(), RotationPhase::Empty);
        assert!(controller.advance(Direction::Forward, start).is_empty());
        assert!(controller.advance(Direction::Backward, start).is_empty());
        assert!(controller.tick_rotation(start).is_empty());
        assert!(controller.tick_refresh(start).is_empty());
        assert!(controller.poll(start + secs(1000)).is_empty());
        assert_eq!(controller.toggle_pause(start), RotationPhase::Empty);
        assert_eq!(controller.next_deadline(), None);
        assert_eq!(controller.current_index(), None);
    }

    #[test]
    fn test_manual_advance_resets_countdown() {
        let (mut controller, start) = loaded(3);

        controller.advance(Direction::Forward, start + secs(20));
        assert_eq!(controller.current_index(), Some(1));

        // The first deadline at 30s must not fire.
        assert!(controller.poll(start + secs(30)).is_empty());
        assert!(controller.poll(start + secs(49)).is_empty());

        let frame = rendered_frame(&controller.poll(start + secs(50))).clone();
        assert_eq!(frame.reason, RenderReason::Rotate);
        assert_eq!(controller.current_index(), Some(2));
    }

    #[test]
    fn test_pause_suspends_rotation_but_not_refresh() {
        let (mut controller, start) = loaded(2);

        assert_eq!(controller.toggle_pause(start + secs(10)), RotationPhase::Paused);
        assert!(controller.poll(start + secs(200)).is_empty());
        assert_eq!(controller.current_index(), Some(0));

        let frame = rendered_frame(&controller.poll(start + secs(300))).clone();
        assert_eq!(frame.reason, RenderReason::Refresh);
        assert_eq!(controller.current_index(), Some(0));
    }

    #[test]
    fn test_pause_resume_restores_cadence() {
        let (mut controller, start) = loaded(3);

        controller.toggle_pause(start + secs(5));
        assert_eq!(controller.toggle_pause(start + secs(12)), RotationPhase::Active);

        // Resuming restarts a full interval.
        assert!(controller.poll(start + secs(41)).is_empty());
        controller.poll(start + secs(42));
        assert_eq!(controller.current_index(), Some(1));
        controller.poll(start + secs(72));
        assert_eq!(controller.current_index(), Some(2));
    }

    #[test]
    fn test_tick_rotation_single_dashboard_is_noop() {
        let (mut controller, start) = loaded(1);
        assert!(controller.tick_rotation(start + secs(30)).is_empty());
        assert_eq!(controller.current_index(), Some(0));
    }

    #[test]
    fn test_visibility_preserves_pause_state() {
        let (mut controller, start) = loaded(3);

        controller.toggle_pause(start);
        controller.visibility_lost();
        controller.visibility_restored(start + secs(5));
        assert!(controller.is_paused());
        assert!(controller.poll(start + secs(100)).is_empty());

        let (mut controller, start) = loaded(3);
        controller.visibility_lost();
        assert!(controller.poll(start + secs(100)).is_empty());
        controller.visibility_restored(start + secs(100));
        assert!(!controller.is_paused());
        controller.poll(start + secs(130));
        assert_eq!(controller.current_index(), Some(1));
    }

    #[test]
    fn test_load_error_does_not_stall_rotation() {
        let (mut controller, start) = loaded(3);
        let id = controller.frame().unwrap().dashboard_id.clone();

        let effects = controller.report_load_error(&id, "HTTP 502");
        assert!(matches!(effects.as_slice(), [DisplayEffect::ShowError(f)] if f.message == "HTTP 502"));
        assert!(controller.snapshot(start).failure.is_some());

        controller.poll(start + secs(30));
        assert_eq!(controller.current_index(), Some(1));
        assert!(controller.snapshot(start + secs(30)).failure.is_none());
    }

    #[test]
    fn test_stale_load_error_is_ignored() {
        let (mut controller, _) = loaded(2);
        assert!(controller.report_load_error("not-current", "boom").is_empty());
    }

    #[test]
    fn test_retry_rearms_timers() {
        let (mut controller, start) = loaded(3);
        controller.visibility_lost();
        controller.toggle_pause(start);
        controller.toggle_pause(start);
        // Hidden: still no rotation timer.
        assert!(controller.poll(start + secs(60)).is_empty());

        controller.visibility_restored(start + secs(60));
        let effects = controller.retry(start + secs(61));
        assert_eq!(rendered_frame(&effects).reason, RenderReason::Retry);
        assert_eq!(controller.next_deadline(), Some(start + secs(91)));
    }

    #[test]
    fn test_refresh_uses_new_cache_token() {
        let (mut controller, start) = loaded(2);
        let before = controller.frame().unwrap().src.clone();
        let effects = controller.refresh_current(start + secs(10));
        let after = rendered_frame(&effects).src.clone();

        assert_ne!(before, after);
        assert_eq!(controller.current_index(), Some(0));
        assert_eq!(controller.next_deadline(), Some(start + secs(40)));
    }

    #[test]
    fn test_reconfigure_clamps_index() {
        let (mut controller, start) = loaded(4);
        controller.advance(Direction::Backward, start);
        assert_eq!(controller.current_index(), Some(3));

        let effects = controller.reconfigure(dashboards(5)[3..].to_vec(), &settings(30, 300), start);
        // Dashboard 3 survives as the first entry of the new list.
        assert!(effects.is_empty());
        assert_eq!(controller.current_index(), Some(0));

        let effects = controller.reconfigure(
            vec![Dashboard::new("x", "/x"), Dashboard::new("y", "/y")],
            &settings(30, 300),
            start,
        );
        assert_eq!(rendered_frame(&effects).position, 0);

        controller.advance(Direction::Forward, start);
        controller.reconfigure(vec![Dashboard::new("z", "/z")], &settings(30, 300), start);
        assert_eq!(controller.current_index(), Some(0));
    }

    #[test]
    fn test_reconfigure_to_empty_stops_timers() {
        let (mut controller, start) = loaded(3);
        let effects = controller.reconfigure(Vec::new(), &settings(30, 300), start);

        assert_eq!(effects, vec![DisplayEffect::ShowEmpty]);
        assert_eq!(controller.phase(), RotationPhase::Empty);
        assert_eq!(controller.next_deadline(), None);

        let effects = controller.reconfigure(dashboards(2), &settings(30, 300), start);
        assert_eq!(rendered_frame(&effects).reason, RenderReason::Load);
        assert_eq!(controller.phase(), RotationPhase::Active);
    }

    #[test]
    fn test_ninety_seconds_three_rotations_then_refresh() {
        let (mut controller, start) = loaded(3);

        let mut t = 0;
        while t < 90 {
            t += 1;
            controller.poll(start + secs(t));
        }
        let snapshot = controller.snapshot(start + secs(90));
        assert_eq!(snapshot.rotations, 3);
        assert_eq!(snapshot.current_index, Some(0));
        assert_eq!(snapshot.refreshes, 0);

        while t < 299 {
            t += 1;
            controller.poll(start + secs(t));
        }
        let index_before = controller.current_index();
        let effects = controller.poll(start + secs(300));

        // 300s is also a rotation boundary; the refresh reloads whatever is shown after it.
        let refresh = effects
            .iter()
            .find_map(|e| match e {
                DisplayEffect::Render(f) if f.reason == RenderReason::Refresh => Some(f),
                _ => None,
            })
            .unwrap();
        assert_eq!(Some(refresh.position), controller.current_index());
        assert_ne!(index_before, None);
        assert_eq!(controller.snapshot(start + secs(300)).refreshes, 1);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let (mut controller, start) = loaded(3);

        controller.apply(DisplayCommand::Previous, start);
        assert_eq!(controller.current_index(), Some(2));
        controller.apply(DisplayCommand::TogglePause, start);
        assert_eq!(controller.phase(), RotationPhase::Paused);
        assert!(controller.is_fullscreen());
        controller.apply(DisplayCommand::ToggleFullscreen, start);
        assert!(!controller.is_fullscreen());

        let command: DisplayCommand = serde_json::from_str(r#"{"command":"next"}"#).unwrap();
        controller.apply(command, start);
        assert_eq!(controller.current_index(), Some(0));
    }
}
