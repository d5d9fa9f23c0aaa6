use std::iter::FusedIterator;

use log::{debug, info, warn};

use crate::{
    DisplayBackend, DisplayMode, DisplayResult, ModeConfig, RefreshRate, Resolution,
    ScalingFactor, ValidationOutcome,
};

/// Read-only view of every mode the display driver exposes.
pub struct ModeCatalog<'a, B: DisplayBackend> {
    backend: &'a B,
}

impl<'a, B: DisplayBackend> ModeCatalog<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Walks the modes in driver order. Every call queries the driver again.
    pub fn enumerate(&self) -> Modes<'a, B> {
        Modes {
            backend: self.backend,
            index: 0,
            exhausted: false,
        }
    }
}

/// Iterator returned by [`ModeCatalog::enumerate`]
pub struct Modes<'a, B: DisplayBackend> {
    backend: &'a B,
    index: u32,
    exhausted: bool,
}

impl<B: DisplayBackend> Iterator for Modes<'_, B> {
    type Item = DisplayMode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match self.backend.mode_at(self.index) {
            Some(mode) => {
                debug!("mode #{}: {}", self.index, mode);
                match self.index.checked_add(1) {
                    Some(next) => self.index = next,
                    None => self.exhausted = true,
                }
                Some(mode)
            }
            None => {
                if self.index == 0 {
                    warn!("the display driver reported no modes");
                }
                self.exhausted = true;
                None
            }
        }
    }
}

impl<B: DisplayBackend> FusedIterator for Modes<'_, B> {}

/// Progress of a validation scan.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ScanState {
    NoMatch,
    ResolutionMatched,
    FullMatch,
}

impl ScanState {
    /// Feeds one offered mode into the scan. States never move backwards.
    pub(crate) fn advance(self, requested: &DisplayMode, offered: &DisplayMode) -> Self {
        let next = if requested.accepts(offered) {
            ScanState::FullMatch
        } else if requested.resolution == offered.resolution {
            ScanState::ResolutionMatched
        } else {
            ScanState::NoMatch
        };
        self.max(next)
    }

    pub(crate) fn outcome(self) -> ValidationOutcome {
        match self {
            ScanState::NoMatch => ValidationOutcome::ResolutionUnsupported,
            ScanState::ResolutionMatched => ValidationOutcome::RefreshRateUnsupported,
            ScanState::FullMatch => ValidationOutcome::Valid,
        }
    }
}

/// Checks requested modes against the [`ModeCatalog`].
pub struct ModeValidator<'a, B: DisplayBackend> {
    catalog: ModeCatalog<'a, B>,
}

impl<'a, B: DisplayBackend> ModeValidator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self {
            catalog: ModeCatalog::new(backend),
        }
    }

    /// Classifies `requested`. A refresh rate of 0 matches any rate, any other
    /// rate has to be listed exactly for the requested resolution.
    pub fn validate(&self, requested: DisplayMode) -> ValidationOutcome {
        let mut state = ScanState::NoMatch;
        for offered in self.catalog.enumerate() {
            state = state.advance(&requested, &offered);
            if state == ScanState::FullMatch {
                break;
            }
        }

        let outcome = state.outcome();
        debug!("validated {}: {:?}", requested, outcome);
        outcome
    }
}

/// Applies resolution and scaling changes to the system.
pub struct DisplayMutator<'a, B: DisplayBackend> {
    backend: &'a B,
}

impl<'a, B: DisplayBackend> DisplayMutator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// The mode currently in effect on the primary display
    pub fn current_mode(&self) -> DisplayResult<DisplayMode> {
        Ok(self.backend.active_config()?.mode())
    }

    /// Changes the resolution, and the refresh rate unless it is unspecified,
    /// and stores the result as the new default.
    ///
    /// Only a change the OS fully accepted counts as success.
    pub fn apply_resolution(&self, resolution: Resolution, refresh_rate: RefreshRate) -> DisplayResult {
        let mut config = self.backend.active_config()?;
        config.set_resolution(resolution);
        if refresh_rate.is_specified() {
            config.set_refresh_rate(refresh_rate);
        }

        debug!("submitting display mode {}", config.mode());
        self.backend.submit_config(&mut config)?;
        info!("display mode changed to {}", config.mode());
        Ok(())
    }

    /// Stores the desktop DPI for `percentage` and notifies running programs.
    ///
    /// Fails without touching any settings when `percentage` is outside of
    /// 100..=500. The broadcast is best effort. A logout is usually needed
    /// before every program picks up the new value.
    pub fn apply_scaling(&self, percentage: i32) -> DisplayResult<ScalingFactor> {
        let scaling = ScalingFactor::new(percentage)?;
        self.backend.store_dpi(scaling.dpi())?;
        info!("desktop scaling set to {} ({} DPI)", scaling, scaling.dpi());

        if let Err(err) = self.backend.broadcast_settings_change() {
            warn!("failed to broadcast the settings change: {}", err);
        }
        Ok(scaling)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use test_log::test;

    use super::*;
    use crate::DisplayError;

    /// In-memory backend recording every change made through it
    #[derive(Default)]
    struct FakeBackend {
        modes: Vec<DisplayMode>,
        active: Option<DisplayMode>,
        reject_submit: bool,
        reject_store: bool,
        reject_broadcast: bool,
        queried: Cell<u32>,
        submitted: RefCell<Vec<DisplayMode>>,
        stored_dpi: RefCell<Vec<u32>>,
        broadcasts: Cell<u32>,
    }

    impl FakeBackend {
        fn with_modes(modes: &[(u32, u32, u32)]) -> Self {
            Self {
                modes: modes
                    .iter()
                    .map(|&(width, height, rate)| DisplayMode::new(width, height, rate))
                    .collect(),
                active: Some(DisplayMode::new(1280, 720, 60)),
                ..Default::default()
            }
        }
    }

    impl DisplayBackend for FakeBackend {
        type Config = DisplayMode;

        fn mode_at(&self, index: u32) -> Option<DisplayMode> {
            self.queried.set(self.queried.get() + 1);
            self.modes.get(index as usize).copied()
        }

        fn active_config(&self) -> DisplayResult<DisplayMode> {
            self.active.ok_or(DisplayError::NoActiveMode)
        }

        fn submit_config(&self, config: &mut DisplayMode) -> DisplayResult {
            if self.reject_submit {
                return Err(DisplayError::ApplyFailed("BADMODE".to_string()));
            }
            self.submitted.borrow_mut().push(*config);
            Ok(())
        }

        fn store_dpi(&self, dpi: u32) -> DisplayResult {
            if self.reject_store {
                return Err(DisplayError::UnsupportedPlatform);
            }
            self.stored_dpi.borrow_mut().push(dpi);
            Ok(())
        }

        fn broadcast_settings_change(&self) -> DisplayResult {
            self.broadcasts.set(self.broadcasts.get() + 1);
            if self.reject_broadcast {
                return Err(DisplayError::UnsupportedPlatform);
            }
            Ok(())
        }
    }

    fn scenario() -> FakeBackend {
        FakeBackend::with_modes(&[(1920, 1080, 60), (1920, 1080, 144), (1280, 720, 60)])
    }

    #[test]
    fn enumerate_keeps_driver_order() {
        let backend = FakeBackend::with_modes(&[(1280, 720, 60), (1920, 1080, 144), (1920, 1080, 60)]);
        let modes: Vec<_> = ModeCatalog::new(&backend).enumerate().collect();
        assert_eq!(
            modes,
            vec![
                DisplayMode::new(1280, 720, 60),
                DisplayMode::new(1920, 1080, 144),
                DisplayMode::new(1920, 1080, 60),
            ]
        );
    }

    #[test]
    fn enumerate_is_restartable_and_fused() {
        let backend = scenario();
        let catalog = ModeCatalog::new(&backend);
        assert_eq!(catalog.enumerate().count(), 3);

        let mut modes = catalog.enumerate();
        assert_eq!(modes.by_ref().count(), 3);
        let queries = backend.queried.get();
        assert_eq!(modes.next(), None);
        assert_eq!(backend.queried.get(), queries);
    }

    #[test]
    fn enumerate_reflects_current_driver_state() {
        let mut backend = scenario();
        assert_eq!(ModeCatalog::new(&backend).enumerate().count(), 3);
        backend.modes.push(DisplayMode::new(3840, 2160, 60));
        assert_eq!(ModeCatalog::new(&backend).enumerate().count(), 4);
    }

    #[test]
    fn enumerate_empty_catalog() {
        let backend = FakeBackend::default();
        assert_eq!(ModeCatalog::new(&backend).enumerate().next(), None);
    }

    #[test]
    fn enumerate_stops_at_last_mode_index() {
        struct Endless;
        impl DisplayBackend for Endless {
            type Config = DisplayMode;

            fn mode_at(&self, _index: u32) -> Option<DisplayMode> {
                Some(DisplayMode::new(640, 480, 60))
            }

            fn active_config(&self) -> DisplayResult<DisplayMode> {
                Err(DisplayError::NoActiveMode)
            }

            fn submit_config(&self, _config: &mut DisplayMode) -> DisplayResult {
                Ok(())
            }

            fn store_dpi(&self, _dpi: u32) -> DisplayResult {
                Ok(())
            }

            fn broadcast_settings_change(&self) -> DisplayResult {
                Ok(())
            }
        }

        let mut modes = Modes {
            backend: &Endless,
            index: u32::MAX - 1,
            exhausted: false,
        };
        assert_eq!(modes.by_ref().count(), 2);
        assert_eq!(modes.next(), None);
    }

    #[test]
    fn validate_scenario() {
        let backend = scenario();
        let validator = ModeValidator::new(&backend);

        assert_eq!(validator.validate(DisplayMode::new(1920, 1080, 0)), ValidationOutcome::Valid);
        assert_eq!(validator.validate(DisplayMode::new(1920, 1080, 144)), ValidationOutcome::Valid);
        assert_eq!(
            validator.validate(DisplayMode::new(1920, 1080, 120)),
            ValidationOutcome::RefreshRateUnsupported
        );
        assert_eq!(
            validator.validate(DisplayMode::new(2560, 1440, 0)),
            ValidationOutcome::ResolutionUnsupported
        );
        assert_eq!(
            validator.validate(DisplayMode::new(2560, 1440, 60)),
            ValidationOutcome::ResolutionUnsupported
        );
    }

    #[test]
    fn validate_stops_at_first_full_match() {
        let backend = scenario();
        let validator = ModeValidator::new(&backend);

        assert!(validator.validate(DisplayMode::new(1920, 1080, 0)).is_valid());
        assert_eq!(backend.queried.get(), 1);

        backend.queried.set(0);
        assert!(validator.validate(DisplayMode::new(1920, 1080, 144)).is_valid());
        assert_eq!(backend.queried.get(), 2);

        backend.queried.set(0);
        validator.validate(DisplayMode::new(1920, 1080, 120));
        assert_eq!(backend.queried.get(), 4);
    }

    #[test]
    fn validate_against_empty_catalog() {
        let backend = FakeBackend::default();
        assert_eq!(
            ModeValidator::new(&backend).validate(DisplayMode::new(1920, 1080, 0)),
            ValidationOutcome::ResolutionUnsupported
        );
    }

    #[test]
    fn validate_outcome_does_not_depend_on_order() {
        let forward = scenario();
        let mut reversed = scenario();
        reversed.modes.reverse();

        for request in [
            DisplayMode::new(1920, 1080, 0),
            DisplayMode::new(1920, 1080, 60),
            DisplayMode::new(1920, 1080, 120),
            DisplayMode::new(1280, 720, 144),
            DisplayMode::new(640, 480, 0),
        ] {
            assert_eq!(
                ModeValidator::new(&forward).validate(request),
                ModeValidator::new(&reversed).validate(request)
            );
        }
    }

    #[test]
    fn scan_state_never_regresses() {
        let requested = DisplayMode::new(1920, 1080, 144);
        let state = ScanState::NoMatch
            .advance(&requested, &DisplayMode::new(1920, 1080, 60))
            .advance(&requested, &DisplayMode::new(1280, 720, 60));
        assert_eq!(state, ScanState::ResolutionMatched);

        let state = state
            .advance(&requested, &DisplayMode::new(1920, 1080, 144))
            .advance(&requested, &DisplayMode::new(800, 600, 60));
        assert_eq!(state, ScanState::FullMatch);
        assert_eq!(state.outcome(), ValidationOutcome::Valid);
        assert_eq!(ScanState::NoMatch.outcome(), ValidationOutcome::ResolutionUnsupported);
    }

    #[test]
    fn apply_resolution_keeps_baseline_refresh_rate() {
        let backend = scenario();
        DisplayMutator::new(&backend)
            .apply_resolution(Resolution::new(1920, 1080), RefreshRate::UNSPECIFIED)
            .unwrap();
        assert_eq!(
            *backend.submitted.borrow(),
            vec![DisplayMode::new(1920, 1080, 60)]
        );
    }

    #[test]
    fn apply_resolution_with_refresh_rate() {
        let backend = scenario();
        DisplayMutator::new(&backend)
            .apply_resolution(Resolution::new(1920, 1080), RefreshRate(144))
            .unwrap();
        assert_eq!(
            *backend.submitted.borrow(),
            vec![DisplayMode::new(1920, 1080, 144)]
        );
    }

    #[test]
    fn apply_resolution_after_successful_validation() {
        let backend = scenario();
        let requested = DisplayMode::new(1920, 1080, 144);
        assert!(ModeValidator::new(&backend).validate(requested).is_valid());
        assert!(DisplayMutator::new(&backend)
            .apply_resolution(requested.resolution, requested.refresh_rate)
            .is_ok());
    }

    #[test]
    fn apply_resolution_fails_without_baseline() {
        let mut backend = scenario();
        backend.active = None;
        let result = DisplayMutator::new(&backend)
            .apply_resolution(Resolution::new(1920, 1080), RefreshRate(60));
        assert!(matches!(result, Err(DisplayError::NoActiveMode)));
        assert!(backend.submitted.borrow().is_empty());
    }

    #[test]
    fn apply_resolution_reports_rejection() {
        let mut backend = scenario();
        backend.reject_submit = true;
        let result = DisplayMutator::new(&backend)
            .apply_resolution(Resolution::new(7680, 4320), RefreshRate::UNSPECIFIED);
        assert!(matches!(result, Err(DisplayError::ApplyFailed(_))));
    }

    #[test]
    fn apply_resolution_tolerates_odd_input() {
        let backend = scenario();
        let mutator = DisplayMutator::new(&backend);
        assert!(mutator
            .apply_resolution(Resolution::new(0, u32::MAX), RefreshRate(u32::MAX))
            .is_ok());
    }

    #[test]
    fn current_mode_reads_active_config() {
        let backend = scenario();
        assert_eq!(
            DisplayMutator::new(&backend).current_mode().unwrap(),
            DisplayMode::new(1280, 720, 60)
        );
    }

    #[test]
    fn apply_scaling_stores_dpi_and_broadcasts() {
        let backend = scenario();
        let mutator = DisplayMutator::new(&backend);

        assert_eq!(mutator.apply_scaling(125).unwrap().dpi(), 120);
        assert_eq!(mutator.apply_scaling(100).unwrap().dpi(), 96);
        assert_eq!(mutator.apply_scaling(200).unwrap().dpi(), 192);
        assert_eq!(*backend.stored_dpi.borrow(), vec![120, 96, 192]);
        assert_eq!(backend.broadcasts.get(), 3);
    }

    #[test]
    fn apply_scaling_out_of_range_leaves_store_untouched() {
        let backend = scenario();
        let mutator = DisplayMutator::new(&backend);

        for percentage in [i32::MIN, -100, 0, 99, 501, 1000, i32::MAX] {
            assert!(matches!(
                mutator.apply_scaling(percentage),
                Err(DisplayError::ScalingOutOfRange(p)) if p == percentage
            ));
        }
        assert!(backend.stored_dpi.borrow().is_empty());
        assert_eq!(backend.broadcasts.get(), 0);
    }

    #[test]
    fn apply_scaling_fails_when_store_fails() {
        let mut backend = scenario();
        backend.reject_store = true;
        assert!(DisplayMutator::new(&backend).apply_scaling(150).is_err());
        assert_eq!(backend.broadcasts.get(), 0);
    }

    #[test]
    fn apply_scaling_ignores_broadcast_failure() {
        let mut backend = scenario();
        backend.reject_broadcast = true;
        let scaling = DisplayMutator::new(&backend).apply_scaling(150).unwrap();
        assert_eq!(scaling.percentage(), 150);
        assert_eq!(*backend.stored_dpi.borrow(), vec![144]);
    }
}
