//! Graphics context
//!
//! Owns what used to be process-wide state: the error hook and the failure
//! policy that applies when none is registered. Also holds the default render
//! config handed to new surfaces and a clock.
//! Fallible surface operations are available here as thin wrappers that
//! report failures before handing them back.

use std::fmt;
use std::panic::Location;

use crate::config::{FailurePolicy, RenderConfig};
use crate::error::{Error, ErrorHook, ErrorReport, Result};
use crate::surface::Surface;
use crate::util::Clock;

pub struct Graphics {
    config: RenderConfig,
    policy: FailurePolicy,
    hook: Option<Box<dyn ErrorHook>>,
    clock: Clock,
}

impl Graphics {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            policy: FailurePolicy::default(),
            hook: None,
            clock: Clock::new(),
        }
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    /// `Abort` only applies while no hook is registered
    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
    }

    /// Register a hook, replacing any previous one
    pub fn set_error_hook(&mut self, hook: impl ErrorHook + 'static) {
        self.hook = Some(Box::new(hook));
    }

    /// Remove the hook, returning it if one was set
    pub fn take_error_hook(&mut self) -> Option<Box<dyn ErrorHook>> {
        self.hook.take()
    }

    /// Milliseconds since the context was created
    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn delay(&self, ms: u64) {
        self.clock.delay(ms);
    }

    // ========================================================================
    // Reported operations
    // ========================================================================

    /// Allocate a surface carrying this context's render config
    #[track_caller]
    pub fn surface(&self, width: u32, height: u32) -> Result<Surface> {
        let location = Location::caller();
        self.check(Surface::with_config(width, height, self.config), "surface", location)
    }

    #[track_caller]
    pub fn copy(&self, surface: &Surface) -> Result<Surface> {
        let location = Location::caller();
        self.check(surface.try_clone(), "copy", location)
    }

    #[track_caller]
    pub fn reset(&self, surface: &mut Surface, width: u32, height: u32) -> Result<()> {
        let location = Location::caller();
        self.check(surface.reset(width, height), "reset", location)
    }

    #[track_caller]
    pub fn resize(&self, surface: &Surface, width: u32, height: u32) -> Result<Surface> {
        let location = Location::caller();
        self.check(surface.resized(width, height), "resize", location)
    }

    #[track_caller]
    pub fn rotate(&self, surface: &Surface, degrees: f32) -> Result<Surface> {
        let location = Location::caller();
        self.check(surface.rotated(degrees), "rotate", location)
    }

    #[track_caller]
    pub fn quantize(&self, surface: &mut Surface, colors: i32) -> Result<()> {
        let location = Location::caller();
        self.check(surface.quantize(colors), "quantize", location)
    }

    fn check<T>(
        &self,
        result: Result<T>,
        operation: &'static str,
        location: &'static Location<'static>,
    ) -> Result<T> {
        if let Err(err) = &result {
            self.report(err, operation, location);
        }
        result
    }

    fn report(&self, err: &Error, operation: &'static str, location: &'static Location<'static>) {
        let report = ErrorReport::new(err, operation, location);
        tracing::error!(
            kind = %report.kind,
            operation,
            file = report.file,
            line = report.line,
            "{}",
            report.message
        );

        match &self.hook {
            Some(hook) => hook.on_error(&report),
            None if self.policy == FailurePolicy::Abort => std::process::abort(),
            None => {}
        }
    }
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graphics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graphics")
            .field("config", &self.config)
            .field("policy", &self.policy)
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::error::ErrorKind;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_surface_inherits_config() {
        let config = RenderConfig::default().with_chroma_key(Some(Color::MAGENTA));
        let gfx = Graphics::with_config(config);
        let s = gfx.surface(4, 4).unwrap();
        assert_eq!(s.config(), config);
    }

    #[test]
    fn test_hook_receives_report() {
        let seen: Arc<Mutex<Vec<ErrorReport>>> = Arc::default();
        let sink = Arc::clone(&seen);

        let mut gfx = Graphics::new();
        gfx.set_error_hook(move |r: &ErrorReport| sink.lock().unwrap().push(r.clone()));

        let s = gfx.surface(8, 8).unwrap();
        assert!(gfx.resize(&s, 0, 4).is_err());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ErrorKind::InvalidParameters);
        assert_eq!(seen[0].operation, "resize");
        assert!(seen[0].file.ends_with("context.rs"));
    }

    #[test]
    fn test_success_does_not_report() {
        let seen: Arc<Mutex<u32>> = Arc::default();
        let sink = Arc::clone(&seen);

        let mut gfx = Graphics::new();
        gfx.set_error_hook(move |_: &ErrorReport| *sink.lock().unwrap() += 1);

        let mut s = gfx.surface(3, 3).unwrap();
        gfx.reset(&mut s, 5, 2).unwrap();
        let _ = gfx.copy(&s).unwrap();
        gfx.quantize(&mut s, 4).unwrap();
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_return_policy_hands_error_back() {
        let gfx = Graphics::new();
        let s = gfx.surface(2, 2).unwrap();
        let err = gfx.resize(&s, 2, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }

    #[test]
    fn test_hook_takes_precedence_over_abort() {
        let seen: Arc<Mutex<u32>> = Arc::default();
        let sink = Arc::clone(&seen);

        let mut gfx = Graphics::new();
        assert_eq!(gfx.failure_policy(), FailurePolicy::Return);
        gfx.set_failure_policy(FailurePolicy::Abort);
        gfx.set_error_hook(move |_: &ErrorReport| *sink.lock().unwrap() += 1);

        let s = gfx.surface(2, 2).unwrap();
        assert_eq!(s.config(), RenderConfig::default());
        assert!(gfx.rotate(&s, f32::NAN).is_err());
        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(gfx.failure_policy(), FailurePolicy::Abort);
    }

    #[test]
    fn test_take_hook() {
        let mut gfx = Graphics::new();
        assert!(gfx.take_error_hook().is_none());
        gfx.set_error_hook(|_: &ErrorReport| {});
        assert!(gfx.take_error_hook().is_some());
    }
}
