//! Ledgers collected while a run progresses

/// Packages whose local version could not be normalized, in discovery order.
///
/// Duplicates are kept: a module scanned twice is recorded twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLedger {
    packages: Vec<String>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, package: impl Into<String>) {
        self.packages.push(package.into());
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn extend(&mut self, other: ErrorLedger) {
        self.packages.extend(other.packages);
    }
}

/// Packages pinned to a development release, reported to the user at the end
/// of the run. Each package appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevLedger {
    packages: Vec<String>,
}

impl DevLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a dev package; returns `false` if it was already known
    pub fn record(&mut self, package: impl Into<String>) -> bool {
        let package = package.into();
        if self.packages.contains(&package) {
            return false;
        }
        self.packages.push(package);
        true
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn extend(&mut self, other: DevLedger) {
        for package in other.packages {
            self.record(package);
        }
    }
}
