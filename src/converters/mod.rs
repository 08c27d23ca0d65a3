//! Schema revision converters
//!
//! Each entity converts to the adjacent revision through the [`Upgrade`] and
//! [`Downgrade`] traits:
//!
//! - 2015 → 2018 → 2020 (upgrades, lossless)
//! - 2020 → 2018 → 2015 (downgrades, lossy)
//!
//! Conversions are total and pure: they borrow the source tree and build a
//! new one. Whatever the target revision cannot represent is dropped and
//! recorded in a [`ConversionReport`]. Conversions between non-adjacent
//! revisions chain through 2018.

mod downgrade_2018;
mod downgrade_2020;
mod report;
mod upgrade_2015;
mod upgrade_2018;

pub use report::{ConversionReport, Loss, LostFeature};

use crate::wildcards::AnyElement;

/// Conversion to the next newer schema revision
pub trait Upgrade {
    /// The same entity in the newer revision
    type Target;

    /// Upgrade, recording anything that could not be carried
    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target;

    /// Upgrade, discarding the report
    fn upgrade(&self) -> Self::Target {
        self.upgrade_with(&mut ConversionReport::new())
    }
}

/// Conversion to the next older schema revision
pub trait Downgrade {
    /// The same entity in the older revision
    type Target;

    /// Downgrade, recording every dropped feature
    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target;

    /// Downgrade, discarding the report
    fn downgrade(&self) -> Self::Target {
        self.downgrade_with(&mut ConversionReport::new())
    }
}

impl<T: Upgrade> Upgrade for Option<T> {
    type Target = Option<T::Target>;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        self.as_ref().map(|v| v.upgrade_with(report))
    }
}

impl<T: Downgrade> Downgrade for Option<T> {
    type Target = Option<T::Target>;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        self.as_ref().map(|v| v.downgrade_with(report))
    }
}

impl<T: Upgrade> Upgrade for Vec<T> {
    type Target = Vec<T::Target>;

    fn upgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        self.iter().map(|v| v.upgrade_with(report)).collect()
    }
}

impl<T: Downgrade> Downgrade for Vec<T> {
    type Target = Vec<T::Target>;

    fn downgrade_with(&self, report: &mut ConversionReport) -> Self::Target {
        self.iter().map(|v| v.downgrade_with(report)).collect()
    }
}

/// Copy captured elements, moving names from one core namespace to another
pub(crate) fn remap_all(elements: &[AnyElement], from: &str, to: &str) -> Vec<AnyElement> {
    elements.iter().map(|e| e.remapped(from, to)).collect()
}
