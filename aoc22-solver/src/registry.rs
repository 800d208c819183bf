//! Solver registry for managing and creating solver instances

use crate::error::{ParseError, RegistrationError, SolverError};
use crate::instance::{DynSolver, SolverInstance};
use crate::solver::Solver;

// ============================================================================
// Storage Constants and Index Calculation
// ============================================================================

/// Base year for AoC (first year of Advent of Code)
pub const BASE_YEAR: u16 = 2015;
/// Maximum number of years supported (2015-2034)
pub const MAX_YEARS: usize = 20;
/// Days per year in AoC (1-25)
pub const DAYS_PER_YEAR: usize = 25;
/// Total capacity of the flat storage
pub const CAPACITY: usize = MAX_YEARS * DAYS_PER_YEAR;

/// Calculate flat index from year/day, returning None if out of bounds
#[inline]
fn calc_index(year: u16, day: u8) -> Option<usize> {
    if year < BASE_YEAR || year >= BASE_YEAR + MAX_YEARS as u16 {
        return None;
    }
    if day == 0 || day > DAYS_PER_YEAR as u8 {
        return None;
    }
    let y = (year - BASE_YEAR) as usize;
    let d = (day - 1) as usize;
    Some(y * DAYS_PER_YEAR + d)
}

// ============================================================================
// Factory Types
// ============================================================================

/// Thread-safe factory function type for creating solver instances
pub type SolverFactory =
    Box<dyn for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync>;

/// Metadata about a registered solver factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryInfo {
    pub year: u16,
    /// The day number (1-25)
    pub day: u8,
    /// Number of parts this solver supports
    pub parts: u8,
    /// Puzzle title shown by `list`
    pub title: &'static str,
    pub tags: &'static [&'static str],
}

struct SolverFactoryEntry {
    info: FactoryInfo,
    factory: SolverFactory,
}

/// Immutable storage for solver factories with O(1) access
///
/// A flat Vec indexed by `(year - BASE_YEAR) * 25 + (day - 1)`, so iteration
/// yields entries in (year, day) order.
pub struct SolverFactoryStorage {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverFactoryStorage {
    /// Iterate over metadata for all registered factories in (year, day) order
    pub fn iter_info(&self) -> impl Iterator<Item = FactoryInfo> + '_ {
        self.entries.iter().flatten().map(|e| e.info)
    }

    pub fn get_info(&self, year: u16, day: u8) -> Option<FactoryInfo> {
        self.entry(year, day).map(|e| e.info)
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.entry(year, day).is_some()
    }

    /// Most recently dated registered puzzle
    pub fn latest(&self) -> Option<FactoryInfo> {
        self.entries.iter().rev().flatten().map(|e| e.info).next()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    fn entry(&self, year: u16, day: u8) -> Option<&SolverFactoryEntry> {
        calc_index(year, day).and_then(|i| self.entries.get(i)?.as_ref())
    }
}

/// Builder for constructing a [`SolverRegistry`]
///
/// Registration is validated eagerly: out-of-range dates and duplicate
/// year/day pairs are rejected here rather than at lookup time.
///
/// ```no_run
/// # use aoc22_solver::SolverRegistryBuilder;
/// let registry = SolverRegistryBuilder::new()
///     .register_all_plugins()
///     .unwrap()
///     .build();
/// ```
pub struct SolverRegistryBuilder {
    entries: Vec<Option<SolverFactoryEntry>>,
}

impl SolverRegistryBuilder {
    /// Create a new empty registry builder with pre-allocated storage
    pub fn new() -> Self {
        Self {
            entries: (0..CAPACITY).map(|_| None).collect(),
        }
    }

    /// Register a solver factory described by `info`
    ///
    /// Returns error if year/day is out of bounds or already registered.
    pub fn register_factory<F>(self, info: FactoryInfo, factory: F) -> Result<Self, RegistrationError>
    where
        F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(info, boxed_factory(factory))
    }

    /// Register a concrete [`Solver`] type without going through the plugin inventory
    pub fn register_solver<S>(
        self,
        year: u16,
        day: u8,
        title: &'static str,
    ) -> Result<Self, RegistrationError>
    where
        S: Solver + 'static,
    {
        let info = FactoryInfo {
            year,
            day,
            parts: S::PARTS,
            title,
            tags: &[],
        };
        self.insert(info, solver_factory::<S>(year, day))
    }

    /// Register all collected solver plugins
    pub fn register_all_plugins(self) -> Result<Self, RegistrationError> {
        self.register_solver_plugins(|_| true)
    }

    /// Register solver plugins that match the given filter predicate
    ///
    /// ```no_run
    /// # use aoc22_solver::SolverRegistryBuilder;
    /// let registry = SolverRegistryBuilder::new()
    ///     .register_solver_plugins(|plugin| plugin.tags.contains(&"grid"))
    ///     .unwrap()
    ///     .build();
    /// ```
    pub fn register_solver_plugins<F>(mut self, filter: F) -> Result<Self, RegistrationError>
    where
        F: Fn(&SolverPlugin) -> bool,
    {
        for plugin in inventory::iter::<SolverPlugin>() {
            if filter(plugin) {
                self = self.register_plugin(plugin)?;
            }
        }
        Ok(self)
    }

    fn register_plugin(self, plugin: &SolverPlugin) -> Result<Self, RegistrationError> {
        let info = FactoryInfo {
            year: plugin.year,
            day: plugin.day,
            parts: plugin.solver.parts(),
            title: plugin.title,
            tags: plugin.tags,
        };
        self.insert(info, plugin.solver.factory(plugin.year, plugin.day))
    }

    fn insert(mut self, info: FactoryInfo, factory: SolverFactory) -> Result<Self, RegistrationError> {
        let index = calc_index(info.year, info.day)
            .ok_or(RegistrationError::InvalidYearDay(info.year, info.day))?;

        if self.entries[index].is_some() {
            return Err(RegistrationError::DuplicateSolver(info.year, info.day));
        }

        self.entries[index] = Some(SolverFactoryEntry { info, factory });
        Ok(self)
    }

    /// Build the immutable registry
    pub fn build(self) -> SolverRegistry {
        SolverRegistry {
            storage: SolverFactoryStorage {
                entries: self.entries,
            },
        }
    }
}

impl Default for SolverRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable registry wrapping storage with solver creation
///
/// `Send + Sync`, share it across worker threads behind an `Arc`.
pub struct SolverRegistry {
    storage: SolverFactoryStorage,
}

impl SolverRegistry {
    /// Readonly access to the factory storage for iteration/lookup
    pub fn storage(&self) -> &SolverFactoryStorage {
        &self.storage
    }

    /// Parse `input` with the solver registered for `year`/`day`
    pub fn create_solver<'a>(
        &self,
        year: u16,
        day: u8,
        input: &'a str,
    ) -> Result<Box<dyn DynSolver + 'a>, SolverError> {
        calc_index(year, day).ok_or(SolverError::InvalidYearDay(year, day))?;

        let entry = self
            .storage
            .entry(year, day)
            .ok_or(SolverError::NotFound(year, day))?;

        (entry.factory)(input).map_err(SolverError::ParseError)
    }
}

fn solver_factory<S>(year: u16, day: u8) -> SolverFactory
where
    S: Solver + 'static,
{
    boxed_factory(move |input| {
        let instance = SolverInstance::<S>::new(year, day, input)?;
        Ok(Box::new(instance))
    })
}

fn boxed_factory<F>(factory: F) -> SolverFactory
where
    F: for<'a> Fn(&'a str) -> Result<Box<dyn DynSolver + 'a>, ParseError> + Send + Sync + 'static,
{
    Box::new(factory)
}

/// Type-erased solver that the plugin inventory can hold
///
/// Blanket-implemented for every [`Solver`], so plugins never implement it
/// by hand.
pub trait RegisterableSolver: Sync {
    fn parts(&self) -> u8;

    fn factory(&self, year: u16, day: u8) -> SolverFactory;
}

impl<S> RegisterableSolver for S
where
    S: Solver + Sync + 'static,
{
    fn parts(&self) -> u8 {
        S::PARTS
    }

    fn factory(&self, year: u16, day: u8) -> SolverFactory {
        solver_factory::<S>(year, day)
    }
}

/// Plugin information for automatic solver registration
///
/// Submitted by `#[derive(AutoRegisterSolver)]`; written out by hand it looks like:
///
/// ```ignore
/// inventory::submit! {
///     SolverPlugin {
///         year: 2022,
///         day: 9,
///         title: "Rope Bridge",
///         solver: &RopeBridge,
///         tags: &["simulation"],
///     }
/// }
/// ```
pub struct SolverPlugin {
    pub year: u16,
    pub day: u8,
    pub title: &'static str,
    /// The solver instance (type-erased)
    pub solver: &'static dyn RegisterableSolver,
    /// Tags for filtering (e.g. "grid", "graph", "simulation")
    pub tags: &'static [&'static str],
}

inventory::collect!(SolverPlugin);
